mod force;
mod radial;
pub(crate) mod styling;
pub mod tree;
pub(crate) mod types;

pub use styling::apply_highlight;
pub use tree::SpanningTree;
pub use types::*;

use std::collections::{BTreeMap, BTreeSet};

use crate::config::LayoutConfig;
use crate::ir::{ConceptEdge, EdgeKind, Graph};
use crate::text_metrics;
use crate::theme::Theme;

use force::compute_force_positions;
use radial::compute_radial_positions;

const LAYOUT_PADDING: f32 = 40.0;

/// Caller-selectable layout options: algorithm, zen scale, edge filters and
/// label visibility. Options changes never touch the graph data itself.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub mode: LayoutMode,
    pub zen: bool,
    pub enabled_kinds: BTreeSet<EdgeKind>,
    pub show_edge_labels: bool,
    /// Radial only: whether non-tree (secondary) edges are drawn.
    pub show_secondary: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            mode: LayoutMode::Radial,
            zen: false,
            enabled_kinds: EdgeKind::ALL.into_iter().collect(),
            show_edge_labels: true,
            show_secondary: true,
        }
    }
}

/// Edges surviving the kind filter, in input order.
pub fn filter_edges<'a>(graph: &'a Graph, options: &LayoutOptions) -> Vec<&'a ConceptEdge> {
    graph
        .edges
        .iter()
        .filter(|edge| options.enabled_kinds.contains(&edge.kind))
        .collect()
}

/// Run the selected layout engine over a normalized graph. Deterministic and
/// idempotent: unchanged input yields byte-identical positions.
pub fn compute_layout(
    graph: &Graph,
    options: &LayoutOptions,
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    let filtered: Vec<ConceptEdge> = filter_edges(graph, options).into_iter().cloned().collect();

    let mut nodes: BTreeMap<String, NodeLayout> = BTreeMap::new();
    for node in &graph.nodes {
        let label = measure_label(&node.label, theme, config);
        let width = (label.width + config.node.padding_x * 2.0).max(config.node.min_width);
        let height = label.height + config.node.padding_y * 2.0;
        nodes.insert(
            node.id.clone(),
            NodeLayout {
                id: node.id.clone(),
                x: 0.0,
                y: 0.0,
                width,
                height,
                label,
                category: node.category,
                is_ghost: node.is_ghost,
                is_high_yield: node.is_high_yield,
            },
        );
    }

    let (centers, tree) = match options.mode {
        LayoutMode::Radial => {
            let tree = SpanningTree::build(graph);
            let centers = compute_radial_positions(&tree, &config.radial, options.zen);
            (centers, Some(tree))
        }
        LayoutMode::Force => {
            let centers = compute_force_positions(graph, &filtered, &config.force, options.zen);
            (centers, None)
        }
    };
    for (index, node) in graph.nodes.iter().enumerate() {
        if let Some(layout_node) = nodes.get_mut(&node.id) {
            layout_node.set_center(centers[index].0, centers[index].1);
        }
    }

    let edges = style_graph_edges(filtered, options, &nodes, tree.as_ref(), theme, config);

    let mut layout = Layout {
        mode: options.mode,
        nodes,
        edges,
        width: 0.0,
        height: 0.0,
    };
    layout.normalize_bounds(LAYOUT_PADDING);
    layout
}

/// Select the drawn edge subset (secondary-edge toggle) and resolve styles.
/// Split out from [`compute_layout`] so session views can restyle against
/// override-adjusted node positions without recomputing the whole layout.
pub(crate) fn style_graph_edges(
    filtered: Vec<ConceptEdge>,
    options: &LayoutOptions,
    nodes: &BTreeMap<String, NodeLayout>,
    tree: Option<&SpanningTree>,
    theme: &Theme,
    config: &LayoutConfig,
) -> Vec<EdgeLayout> {
    let drawn: Vec<ConceptEdge> = match tree {
        Some(tree) if !options.show_secondary => filtered
            .into_iter()
            .filter(|edge| edge.is_ghost || tree.is_tree_edge(&edge.source, &edge.target))
            .collect(),
        _ => filtered,
    };
    styling::style_edges(
        &drawn,
        nodes,
        tree,
        options.show_edge_labels,
        theme,
        &config.edge,
    )
}

/// Greedy word wrap against the measured (or estimated) text width.
pub(crate) fn measure_label(text: &str, theme: &Theme, config: &LayoutConfig) -> TextBlock {
    let max_width = config.node.max_label_width;
    let measure = |line: &str| -> f32 {
        text_metrics::measure_text_width(line, theme.font_size, &theme.font_family)
            .unwrap_or_else(|| line.chars().count() as f32 * theme.font_size * 0.56)
    };

    let mut lines: Vec<String> = Vec::new();
    for source_line in text.split('\n') {
        let mut current = String::new();
        for word in source_line.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if !current.is_empty() && measure(&candidate) > max_width {
                lines.push(std::mem::take(&mut current));
                current = word.to_string();
            } else {
                current = candidate;
            }
        }
        if !current.is_empty() || source_line.trim().is_empty() {
            lines.push(current);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    let width = lines
        .iter()
        .map(|line| measure(line))
        .fold(0.0f32, f32::max)
        .min(max_width);
    let height = lines.len() as f32 * theme.font_size * 1.25;
    TextBlock { lines, width, height }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Category, ConceptNode, EdgeDirection};

    fn node(id: &str, category: Category) -> ConceptNode {
        ConceptNode {
            id: id.to_string(),
            label: id.to_uppercase(),
            category,
            description: None,
            source_snippet: None,
            is_high_yield: false,
            is_ghost: false,
        }
    }

    fn edge(source: &str, target: &str, kind: EdgeKind) -> ConceptEdge {
        ConceptEdge {
            id: format!("{source}--{target}"),
            source: source.to_string(),
            target: target.to_string(),
            kind,
            label: None,
            direction: EdgeDirection::Uni,
            is_ghost: false,
        }
    }

    fn sample_graph() -> Graph {
        Graph {
            nodes: vec![
                node("hub", Category::Main),
                node("a", Category::Science),
                node("b", Category::History),
                node("c", Category::General),
            ],
            edges: vec![
                edge("hub", "a", EdgeKind::Enables),
                edge("hub", "b", EdgeKind::Challenges),
                edge("a", "c", EdgeKind::RelatesTo),
                edge("b", "c", EdgeKind::IsATypeOf),
            ],
        }
    }

    #[test]
    fn layout_covers_every_node() {
        let graph = sample_graph();
        let layout = compute_layout(
            &graph,
            &LayoutOptions::default(),
            &Theme::study_default(),
            &LayoutConfig::default(),
        );
        assert_eq!(layout.nodes.len(), 4);
        assert!(layout.width > 1.0);
        assert!(layout.height > 1.0);
    }

    #[test]
    fn layout_is_idempotent() {
        let graph = sample_graph();
        let options = LayoutOptions::default();
        let theme = Theme::study_default();
        let config = LayoutConfig::default();
        let first = compute_layout(&graph, &options, &theme, &config);
        let second = compute_layout(&graph, &options, &theme, &config);
        for (id, node) in &first.nodes {
            let other = &second.nodes[id];
            assert_eq!((node.x, node.y), (other.x, other.y));
        }
    }

    #[test]
    fn kind_filter_drops_edges_but_not_nodes() {
        let graph = sample_graph();
        let mut options = LayoutOptions::default();
        options.enabled_kinds = [EdgeKind::Enables].into_iter().collect();
        let layout = compute_layout(
            &graph,
            &options,
            &Theme::study_default(),
            &LayoutConfig::default(),
        );
        assert_eq!(layout.nodes.len(), 4);
        assert_eq!(layout.edges.len(), 1);
        assert_eq!(layout.edges[0].kind, EdgeKind::Enables);
    }

    #[test]
    fn hiding_secondary_edges_keeps_the_tree() {
        let graph = sample_graph();
        let mut options = LayoutOptions::default();
        options.show_secondary = false;
        let layout = compute_layout(
            &graph,
            &options,
            &Theme::study_default(),
            &LayoutConfig::default(),
        );
        // BFS from hub reaches c through a; b--c stays secondary.
        assert_eq!(layout.edges.len(), 3);
        assert!(layout.edges.iter().all(|edge| edge.is_primary));
    }

    #[test]
    fn force_mode_draws_all_filtered_edges() {
        let graph = sample_graph();
        let mut options = LayoutOptions::default();
        options.mode = LayoutMode::Force;
        let layout = compute_layout(
            &graph,
            &options,
            &Theme::study_default(),
            &LayoutConfig::default(),
        );
        assert_eq!(layout.edges.len(), 4);
    }

    #[test]
    fn long_labels_wrap() {
        let theme = Theme::study_default();
        let config = LayoutConfig::default();
        let block = measure_label(
            "an unreasonably long concept label that cannot fit on one line",
            &theme,
            &config,
        );
        assert!(block.lines.len() > 1);
        assert!(block.width <= config.node.max_label_width + 1e-3);
    }
}
