use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use crate::layout::{Layout, LayoutMode};

/// Serializable snapshot of a computed layout, for downstream renderers and
/// debugging.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub mode: String,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub category: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label_lines: Vec<String>,
    pub is_ghost: bool,
    pub is_high_yield: bool,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub from: String,
    pub to: String,
    pub kind: String,
    pub is_ghost: bool,
    pub is_primary: bool,
    pub arrow_start: bool,
    pub arrow_end: bool,
    pub points: Vec<[f32; 2]>,
    pub color: String,
    pub width: f32,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let nodes = layout
            .nodes
            .values()
            .map(|node| NodeDump {
                id: node.id.clone(),
                category: node.category.as_str().to_string(),
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                label_lines: node.label.lines.clone(),
                is_ghost: node.is_ghost,
                is_high_yield: node.is_high_yield,
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                from: edge.from.clone(),
                to: edge.to.clone(),
                kind: edge.kind.as_str().to_string(),
                is_ghost: edge.is_ghost,
                is_primary: edge.is_primary,
                arrow_start: edge.arrow_start,
                arrow_end: edge.arrow_end,
                points: edge.points.iter().map(|(x, y)| [*x, *y]).collect(),
                color: edge.style.color.clone(),
                width: edge.style.width,
            })
            .collect();

        LayoutDump {
            mode: match layout.mode {
                LayoutMode::Radial => "radial".to_string(),
                LayoutMode::Force => "force".to_string(),
            },
            width: layout.width,
            height: layout.height,
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
