use std::f32::consts::TAU;

use crate::config::RadialConfig;

use super::tree::SpanningTree;

/// Half-open angular range owned by one node, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub start: f32,
    pub end: f32,
}

impl Sector {
    pub fn sweep(&self) -> f32 {
        self.end - self.start
    }

    pub fn midpoint(&self) -> f32 {
        (self.start + self.end) / 2.0
    }
}

/// Split every node's sector among its children proportionally to subtree
/// size. Sibling sectors never overlap, which is what keeps tree edges from
/// crossing in the radial rendering.
pub(crate) fn assign_sectors(tree: &SpanningTree, config: &RadialConfig) -> Vec<Sector> {
    let mut sectors = vec![Sector { start: 0.0, end: 0.0 }; tree.len()];
    if tree.is_empty() {
        return sectors;
    }
    sectors[tree.root] = Sector { start: 0.0, end: TAU };

    // Parents are always processed before children in BFS index order, but
    // the tree stores children explicitly, so walk it directly.
    let mut stack = vec![tree.root];
    while let Some(index) = stack.pop() {
        let children = &tree.children[index];
        if children.is_empty() {
            continue;
        }
        let sector = sectors[index];
        let total = sector.sweep();

        // One gap trails each child so the allocation also works for the
        // root's full circle. Clamp so padding never eats more than the
        // configured share of the sweep.
        let mut gap = config.sibling_gap;
        let max_padding = total * (1.0 - config.min_usable_sweep);
        if gap * children.len() as f32 > max_padding {
            gap = max_padding / children.len() as f32;
        }
        let usable = total - gap * children.len() as f32;
        let weight_total: usize = children.iter().map(|&child| tree.subtree_size[child]).sum();

        let mut cursor = sector.start;
        for &child in children {
            let share = if weight_total > 0 {
                usable * tree.subtree_size[child] as f32 / weight_total as f32
            } else {
                usable / children.len() as f32
            };
            sectors[child] = Sector {
                start: cursor,
                end: cursor + share,
            };
            cursor += share + gap;
            stack.push(child);
        }
    }
    sectors
}

/// Cartesian centers per arena index. Root at the origin, each depth level on
/// a concentric ring, node at its sector's midpoint angle.
pub(crate) fn compute_radial_positions(
    tree: &SpanningTree,
    config: &RadialConfig,
    zen: bool,
) -> Vec<(f32, f32)> {
    let spacing = if zen {
        config.layer_spacing * config.zen_spacing_scale
    } else {
        config.layer_spacing
    };
    let sectors = assign_sectors(tree, config);
    let mut positions = vec![(0.0f32, 0.0f32); tree.len()];
    for index in 0..tree.len() {
        let radius = tree.depth[index] as f32 * spacing;
        let angle = sectors[index].midpoint();
        positions[index] = (radius * angle.cos(), radius * angle.sin());
    }
    positions
}
