use std::collections::{BTreeMap, BTreeSet};

use crate::config::EdgeStyleConfig;
use crate::ir::{ConceptEdge, EdgeDirection, EdgeKind};
use crate::theme::Theme;

use super::tree::SpanningTree;
use super::types::{EdgeLayout, EdgeStyle, Layout, NodeLayout};

/// Produce render-ready edges from the filtered edge set: resolved style per
/// kind, ghost desaturation, parallel-edge fanning and label text.
pub(crate) fn style_edges(
    edges: &[ConceptEdge],
    nodes: &BTreeMap<String, NodeLayout>,
    tree: Option<&SpanningTree>,
    show_labels: bool,
    theme: &Theme,
    config: &EdgeStyleConfig,
) -> Vec<EdgeLayout> {
    // Curvature offsets per unordered endpoint pair so parallel edges fan
    // out instead of stacking.
    let mut groups: BTreeMap<(String, String), Vec<usize>> = BTreeMap::new();
    for (index, edge) in edges.iter().enumerate() {
        groups.entry(edge.unordered_pair()).or_default().push(index);
    }
    let mut curvature = vec![0.0f32; edges.len()];
    for members in groups.values() {
        let centroid = (members.len() as f32 - 1.0) / 2.0;
        for (position, &index) in members.iter().enumerate() {
            curvature[index] = (position as f32 - centroid) * config.curvature_step;
        }
    }

    let mut styled = Vec::with_capacity(edges.len());
    for (index, edge) in edges.iter().enumerate() {
        let (Some(from), Some(to)) = (nodes.get(&edge.source), nodes.get(&edge.target)) else {
            continue;
        };
        let is_primary = tree
            .map(|tree| tree.is_tree_edge(&edge.source, &edge.target))
            .unwrap_or(true);

        // Secondary edges under radial layout curve even when alone, so they
        // read as overlays rather than tree branches.
        let mut bend = curvature[index];
        if !is_primary && bend == 0.0 {
            bend = config.curvature_step * 0.75;
        }

        let start = from.center();
        let end = to.center();
        let points = if bend == 0.0 {
            vec![start, end]
        } else {
            vec![start, bend_control(start, end, bend), end]
        };

        let style = if edge.is_ghost {
            EdgeStyle {
                color: config.ghost_color.clone(),
                width: config.ghost_width,
                dasharray: Some(config.ghost_dash_pattern.clone()),
                opacity: 0.8,
            }
        } else {
            EdgeStyle {
                color: theme.edge_color(edge.kind).to_string(),
                width: kind_width(edge.kind, config),
                dasharray: (edge.kind == EdgeKind::Challenges)
                    .then(|| config.dash_pattern.clone()),
                opacity: 1.0,
            }
        };

        let label = if show_labels {
            Some(
                edge.label
                    .clone()
                    .unwrap_or_else(|| edge.kind.default_label().to_string()),
            )
        } else {
            None
        };

        styled.push(EdgeLayout {
            id: edge.id.clone(),
            from: edge.source.clone(),
            to: edge.target.clone(),
            kind: edge.kind,
            direction: edge.direction,
            is_ghost: edge.is_ghost,
            is_primary,
            points,
            label,
            arrow_start: edge.direction == EdgeDirection::Bi,
            arrow_end: true,
            style,
        });
    }
    styled
}

fn kind_width(kind: EdgeKind, config: &EdgeStyleConfig) -> f32 {
    match kind {
        EdgeKind::Enables | EdgeKind::EssentialFor => config.base_width + config.emphasis_width,
        _ => config.base_width,
    }
}

/// Quadratic control point: segment midpoint displaced along the left-hand
/// normal by the bend amount.
fn bend_control(start: (f32, f32), end: (f32, f32), bend: f32) -> (f32, f32) {
    let mid = ((start.0 + end.0) / 2.0, (start.1 + end.1) / 2.0);
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let length = (dx * dx + dy * dy).sqrt().max(1e-3);
    (mid.0 - dy / length * bend, mid.1 + dx / length * bend)
}

/// Dim everything outside the highlight set; edges fully inside it get full
/// opacity and a width bump.
pub fn apply_highlight(layout: &mut Layout, highlighted: &BTreeSet<String>, config: &EdgeStyleConfig) {
    for edge in layout.edges.iter_mut() {
        if highlighted.contains(&edge.from) && highlighted.contains(&edge.to) {
            edge.style.opacity = 1.0;
            edge.style.width += config.highlight_width_bonus;
        } else {
            edge.style.opacity = config.dim_opacity;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Category, EdgeDirection};
    use crate::layout::types::TextBlock;
    use float_cmp::approx_eq;

    fn node_layout(id: &str, x: f32, y: f32) -> NodeLayout {
        NodeLayout {
            id: id.to_string(),
            x,
            y,
            width: 80.0,
            height: 30.0,
            label: TextBlock {
                lines: vec![id.to_uppercase()],
                width: 40.0,
                height: 16.0,
            },
            category: Category::General,
            is_ghost: false,
            is_high_yield: false,
        }
    }

    fn edge(id: &str, source: &str, target: &str, kind: EdgeKind) -> ConceptEdge {
        ConceptEdge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            kind,
            label: None,
            direction: EdgeDirection::Uni,
            is_ghost: false,
        }
    }

    fn nodes_ab() -> BTreeMap<String, NodeLayout> {
        let mut nodes = BTreeMap::new();
        nodes.insert("a".to_string(), node_layout("a", 0.0, 0.0));
        nodes.insert("b".to_string(), node_layout("b", 200.0, 0.0));
        nodes
    }

    #[test]
    fn parallel_edges_fan_symmetrically() {
        let nodes = nodes_ab();
        let edges = vec![
            edge("e1", "a", "b", EdgeKind::Enables),
            edge("e2", "b", "a", EdgeKind::Challenges),
            edge("e3", "a", "b", EdgeKind::RelatesTo),
        ];
        let theme = Theme::study_default();
        let config = EdgeStyleConfig::default();
        let styled = style_edges(&edges, &nodes, None, false, &theme, &config);
        assert_eq!(styled.len(), 3);
        // Middle edge of the group stays straight, outer two curve
        // opposite ways.
        assert_eq!(styled[0].points.len(), 3);
        assert_eq!(styled[1].points.len(), 2);
        assert_eq!(styled[2].points.len(), 3);
        let mid_y = (styled[1].points[0].1 + styled[1].points[1].1) / 2.0;
        let first_control = styled[0].points[1];
        let third_control = styled[2].points[1];
        assert!(approx_eq!(
            f32,
            first_control.1 - mid_y,
            -(third_control.1 - mid_y),
            epsilon = 0.01
        ));
    }

    #[test]
    fn challenge_edges_are_dashed_and_distinct() {
        let nodes = nodes_ab();
        let edges = vec![
            edge("e1", "a", "b", EdgeKind::Challenges),
            edge("e2", "a", "b", EdgeKind::Enables),
        ];
        let theme = Theme::study_default();
        let config = EdgeStyleConfig::default();
        let styled = style_edges(&edges, &nodes, None, false, &theme, &config);
        assert!(styled[0].style.dasharray.is_some());
        assert!(styled[1].style.dasharray.is_none());
        assert!(styled[1].style.width > styled[0].style.width);
        assert_ne!(styled[0].style.color, styled[1].style.color);
    }

    #[test]
    fn ghost_edges_override_kind_styling() {
        let nodes = nodes_ab();
        let mut ghost = edge("e1", "a", "b", EdgeKind::Enables);
        ghost.is_ghost = true;
        let theme = Theme::study_default();
        let config = EdgeStyleConfig::default();
        let styled = style_edges(&[ghost], &nodes, None, false, &theme, &config);
        assert_eq!(styled[0].style.dasharray.as_deref(), Some("3 3"));
        assert!(styled[0].style.width < config.base_width + config.emphasis_width);
        assert_eq!(styled[0].style.color, config.ghost_color);
    }

    #[test]
    fn labels_follow_the_global_toggle() {
        let nodes = nodes_ab();
        let mut labeled = edge("e1", "a", "b", EdgeKind::EssentialFor);
        labeled.label = Some("unlocks".to_string());
        let plain = edge("e2", "a", "b", EdgeKind::EssentialFor);
        let theme = Theme::study_default();
        let config = EdgeStyleConfig::default();
        let visible = style_edges(
            &[labeled.clone(), plain.clone()],
            &nodes,
            None,
            true,
            &theme,
            &config,
        );
        assert_eq!(visible[0].label.as_deref(), Some("unlocks"));
        assert_eq!(visible[1].label.as_deref(), Some("essential for"));
        let hidden = style_edges(&[labeled, plain], &nodes, None, false, &theme, &config);
        assert!(hidden[0].label.is_none());
        assert!(hidden[1].label.is_none());
    }

    #[test]
    fn bidirectional_edges_get_both_arrowheads() {
        let nodes = nodes_ab();
        let mut bi = edge("e1", "a", "b", EdgeKind::RelatesTo);
        bi.direction = EdgeDirection::Bi;
        let theme = Theme::study_default();
        let config = EdgeStyleConfig::default();
        let styled = style_edges(&[bi], &nodes, None, false, &theme, &config);
        assert!(styled[0].arrow_start);
        assert!(styled[0].arrow_end);
    }

    #[test]
    fn highlight_dims_outsiders() {
        let nodes = nodes_ab();
        let edges = vec![
            edge("e1", "a", "b", EdgeKind::RelatesTo),
            edge("e2", "a", "a", EdgeKind::RelatesTo),
        ];
        let theme = Theme::study_default();
        let config = EdgeStyleConfig::default();
        let styled = style_edges(&edges, &nodes, None, false, &theme, &config);
        let mut layout = Layout {
            mode: super::super::types::LayoutMode::Force,
            nodes,
            edges: styled,
            width: 0.0,
            height: 0.0,
        };
        let highlighted: BTreeSet<String> = ["a".to_string()].into_iter().collect();
        apply_highlight(&mut layout, &highlighted, &config);
        assert!(approx_eq!(f32, layout.edges[0].style.opacity, config.dim_opacity, epsilon = 1e-6));
        assert!(approx_eq!(f32, layout.edges[1].style.opacity, 1.0, epsilon = 1e-6));
    }
}
