use std::f32::consts::TAU;

use crate::config::ForceConfig;
use crate::ir::{ConceptEdge, Graph};

/// Fixed-iteration force relaxation: pairwise repulsion plus Hooke springs
/// along the supplied edge set, damped position integration. No randomness
/// and no early exit, so identical input always produces identical output.
///
/// Returns centers indexed by node input order.
pub(crate) fn compute_force_positions(
    graph: &Graph,
    edges: &[ConceptEdge],
    config: &ForceConfig,
    zen: bool,
) -> Vec<(f32, f32)> {
    let count = graph.nodes.len();
    if count == 0 {
        return Vec::new();
    }

    let seed_radius = if zen {
        config.seed_radius * config.zen_seed_scale
    } else {
        config.seed_radius
    };
    let iterations = if zen { config.zen_iterations } else { config.iterations };

    // Even circle seeding avoids the degenerate all-at-origin start.
    let mut positions: Vec<(f32, f32)> = (0..count)
        .map(|index| {
            let angle = TAU * index as f32 / count as f32;
            (seed_radius * angle.cos(), seed_radius * angle.sin())
        })
        .collect();
    if count == 1 {
        return vec![(0.0, 0.0)];
    }

    // Springs as index pairs; edges referencing unknown ids were already
    // dropped by normalization but guard anyway.
    let springs: Vec<(usize, usize)> = edges
        .iter()
        .filter_map(|edge| {
            let source = graph.nodes.iter().position(|node| node.id == edge.source)?;
            let target = graph.nodes.iter().position(|node| node.id == edge.target)?;
            (source != target).then_some((source, target))
        })
        .collect();

    let mut forces = vec![(0.0f32, 0.0f32); count];
    for _ in 0..iterations {
        for force in forces.iter_mut() {
            *force = (0.0, 0.0);
        }

        // Repulsion between every pair, clamped near the singularity.
        for i in 0..count {
            for j in (i + 1)..count {
                let dx = positions[i].0 - positions[j].0;
                let dy = positions[i].1 - positions[j].1;
                let distance = (dx * dx + dy * dy).sqrt().max(config.min_distance);
                let magnitude = config.repulsion / (distance * distance);
                let ux = dx / distance;
                let uy = dy / distance;
                forces[i].0 += ux * magnitude;
                forces[i].1 += uy * magnitude;
                forces[j].0 -= ux * magnitude;
                forces[j].1 -= uy * magnitude;
            }
        }

        // Spring toward the rest length along each edge.
        for &(source, target) in &springs {
            let dx = positions[target].0 - positions[source].0;
            let dy = positions[target].1 - positions[source].1;
            let distance = (dx * dx + dy * dy).sqrt().max(1e-3);
            let stretch = distance - config.rest_length;
            let magnitude = config.spring * stretch;
            let ux = dx / distance;
            let uy = dy / distance;
            forces[source].0 += ux * magnitude;
            forces[source].1 += uy * magnitude;
            forces[target].0 -= ux * magnitude;
            forces[target].1 -= uy * magnitude;
        }

        // All forces accumulate before any node moves; the update order
        // therefore cannot influence the result.
        for index in 0..count {
            positions[index].0 += forces[index].0 * config.damping;
            positions[index].1 += forces[index].1 * config.damping;
        }
    }

    positions
}
