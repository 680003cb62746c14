use std::collections::BTreeMap;

use serde::Serialize;

use crate::ir::{Category, EdgeDirection, EdgeKind};

#[derive(Debug, Clone, Serialize)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeLayout {
    pub id: String,
    /// Top-left corner.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label: TextBlock,
    pub category: Category,
    pub is_ghost: bool,
    pub is_high_yield: bool,
}

impl NodeLayout {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn set_center(&mut self, cx: f32, cy: f32) {
        self.x = cx - self.width / 2.0;
        self.y = cy - self.height / 2.0;
    }
}

/// Resolved visual parameters for one edge.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeStyle {
    pub color: String,
    pub width: f32,
    pub dasharray: Option<String>,
    pub opacity: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeLayout {
    pub id: String,
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    pub direction: EdgeDirection,
    pub is_ghost: bool,
    /// True when the edge is part of the spanning tree under radial layout.
    pub is_primary: bool,
    /// Two points for a straight segment; three for a quadratic curve with
    /// the control point in the middle.
    pub points: Vec<(f32, f32)>,
    pub label: Option<String>,
    pub arrow_start: bool,
    pub arrow_end: bool,
    pub style: EdgeStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LayoutMode {
    Radial,
    Force,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub mode: LayoutMode,
    pub nodes: BTreeMap<String, NodeLayout>,
    pub edges: Vec<EdgeLayout>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    /// Shift all coordinates so the bounding box starts at the padding
    /// offset, and record the resulting canvas size.
    pub fn normalize_bounds(&mut self, padding: f32) {
        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;
        for node in self.nodes.values() {
            min_x = min_x.min(node.x);
            min_y = min_y.min(node.y);
            max_x = max_x.max(node.x + node.width);
            max_y = max_y.max(node.y + node.height);
        }
        if min_x == f32::MAX {
            self.width = 1.0;
            self.height = 1.0;
            return;
        }
        let shift_x = padding - min_x;
        let shift_y = padding - min_y;
        for node in self.nodes.values_mut() {
            node.x += shift_x;
            node.y += shift_y;
        }
        for edge in self.edges.iter_mut() {
            for point in edge.points.iter_mut() {
                point.0 += shift_x;
                point.1 += shift_y;
            }
        }
        self.width = (max_x - min_x).max(1.0) + padding * 2.0;
        self.height = (max_y - min_y).max(1.0) + padding * 2.0;
    }
}
