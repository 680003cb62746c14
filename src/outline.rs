use crate::config::OutlineConfig;
use crate::ir::{Category, Graph};

/// Derive the markdown outline: nodes grouped by category, each followed by
/// its first relations rendered as "relation → other label" lines. Pure
/// function of the node/edge set; positions never matter.
pub fn derive_outline(graph: &Graph, config: &OutlineConfig) -> String {
    let mut out = String::from("# Structured Outline\n");

    for category in Category::ALL {
        let members: Vec<_> = graph
            .nodes
            .iter()
            .filter(|node| node.category == category && !node.is_ghost)
            .collect();
        if members.is_empty() {
            continue;
        }
        out.push('\n');
        out.push_str(&format!("## {}\n", category.as_str().to_uppercase()));
        for node in members {
            out.push_str(&format!("- {}\n", node.label));
            let mut shown = 0usize;
            for edge in &graph.edges {
                if shown >= config.max_relations {
                    break;
                }
                if edge.is_ghost {
                    continue;
                }
                let other_id = if edge.source == node.id {
                    &edge.target
                } else if edge.target == node.id {
                    &edge.source
                } else {
                    continue;
                };
                let Some(other) = graph.node(other_id) else {
                    continue;
                };
                let relation = edge
                    .label
                    .clone()
                    .unwrap_or_else(|| edge.kind.default_label().to_string());
                out.push_str(&format!("  - {} → {}\n", relation, other.label));
                shown += 1;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ConceptEdge, ConceptNode, EdgeDirection, EdgeKind};

    fn node(id: &str, label: &str, category: Category) -> ConceptNode {
        ConceptNode {
            id: id.to_string(),
            label: label.to_string(),
            category,
            description: None,
            source_snippet: None,
            is_high_yield: false,
            is_ghost: false,
        }
    }

    #[test]
    fn groups_by_category_with_relations() {
        let graph = Graph {
            nodes: vec![
                node("a", "Cells", Category::Science),
                node("b", "DNA", Category::Science),
            ],
            edges: vec![ConceptEdge {
                id: "e1".to_string(),
                source: "a".to_string(),
                target: "b".to_string(),
                kind: EdgeKind::Enables,
                label: None,
                direction: EdgeDirection::Uni,
                is_ghost: false,
            }],
        };
        let outline = derive_outline(&graph, &OutlineConfig::default());
        assert!(outline.starts_with("# Structured Outline\n"));
        assert!(outline.contains("## SCIENCE"));
        assert!(outline.contains("- Cells\n  - enables → DNA"));
        assert!(outline.contains("- DNA\n  - enables → Cells"));
    }

    #[test]
    fn ghosts_are_excluded() {
        let mut ghost = node("g", "Maybe", Category::Science);
        ghost.is_ghost = true;
        let graph = Graph {
            nodes: vec![node("a", "Cells", Category::Science), ghost],
            edges: vec![],
        };
        let outline = derive_outline(&graph, &OutlineConfig::default());
        assert!(!outline.contains("Maybe"));
    }

    #[test]
    fn relation_count_is_capped() {
        let mut nodes = vec![node("hub", "Hub", Category::General)];
        let mut edges = Vec::new();
        for index in 0..10 {
            let id = format!("n{index}");
            nodes.push(node(&id, &format!("Leaf {index}"), Category::General));
            edges.push(ConceptEdge {
                id: format!("e{index}"),
                source: "hub".to_string(),
                target: id,
                kind: EdgeKind::RelatesTo,
                label: None,
                direction: EdgeDirection::Uni,
                is_ghost: false,
            });
        }
        let graph = Graph { nodes, edges };
        let outline = derive_outline(&graph, &OutlineConfig { max_relations: 3 });
        let hub_block: Vec<&str> = outline
            .lines()
            .skip_while(|line| *line != "- Hub")
            .take_while(|line| *line == "- Hub" || line.starts_with("  - "))
            .collect();
        assert_eq!(hub_block.len(), 4);
    }
}
