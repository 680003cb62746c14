use serde::{Deserialize, Serialize};

use crate::ir::{Category, EdgeKind};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub node_text_color: String,
    pub node_border_color: String,
    pub ghost_fill: String,
    pub ghost_border: String,
    pub ghost_text_color: String,
    pub high_yield_ring: String,
    pub edge_label_color: String,
    pub edge_label_background: String,
    pub category_fills: Vec<String>,
    pub edge_colors: Vec<String>,
}

impl Theme {
    pub fn study_default() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            background: "#FFFFFF".to_string(),
            node_text_color: "#1C2430".to_string(),
            node_border_color: "#C7D2E5".to_string(),
            ghost_fill: "#F4F6FA".to_string(),
            ghost_border: "#B9C4D6".to_string(),
            ghost_text_color: "#7A8AA6".to_string(),
            high_yield_ring: "#F59E0B".to_string(),
            edge_label_color: "#4A5568".to_string(),
            edge_label_background: "#FFFFFF".to_string(),
            category_fills: CATEGORY_FILLS.iter().map(|value| value.to_string()).collect(),
            edge_colors: EDGE_COLORS.iter().map(|value| value.to_string()).collect(),
        }
    }

    pub fn midnight() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            background: "#0F172A".to_string(),
            node_text_color: "#E2E8F0".to_string(),
            node_border_color: "#334155".to_string(),
            ghost_fill: "#1E293B".to_string(),
            ghost_border: "#475569".to_string(),
            ghost_text_color: "#94A3B8".to_string(),
            high_yield_ring: "#FBBF24".to_string(),
            edge_label_color: "#CBD5E1".to_string(),
            edge_label_background: "#0F172A".to_string(),
            category_fills: CATEGORY_FILLS_DARK.iter().map(|value| value.to_string()).collect(),
            edge_colors: EDGE_COLORS.iter().map(|value| value.to_string()).collect(),
        }
    }

    pub fn category_fill(&self, category: Category) -> &str {
        let index = Category::ALL.iter().position(|c| *c == category).unwrap_or(7);
        pick(&self.category_fills, index).unwrap_or("#ECECFF")
    }

    pub fn edge_color(&self, kind: EdgeKind) -> &str {
        let index = EdgeKind::ALL.iter().position(|k| *k == kind).unwrap_or(3);
        pick(&self.edge_colors, index).unwrap_or("#7A8AA6")
    }
}

fn pick(values: &[String], index: usize) -> Option<&str> {
    if values.is_empty() {
        return None;
    }
    Some(values[index % values.len()].as_str())
}

// Fill per Category, in Category::ALL order.
const CATEGORY_FILLS: [&str; 12] = [
    "#DBEAFE", // science
    "#FEF3C7", // history
    "#EDE9FE", // math
    "#FCE7F3", // language
    "#D1FAE5", // technology
    "#E0E7FF", // philosophy
    "#FFE4E6", // art
    "#F1F5F9", // general
    "#E2E8F0", // concept
    "#FDE68A", // main
    "#E5E7EB", // section
    "#FECACA", // problem
];

const CATEGORY_FILLS_DARK: [&str; 12] = [
    "#1E3A5F", "#4A3B1A", "#3B2E5F", "#4A2239", "#1A4338", "#2B3160", "#4A2630", "#27303D",
    "#2C3A4D", "#4D3F14", "#333A44", "#4B2525",
];

// Stroke per EdgeKind, in EdgeKind::ALL order.
const EDGE_COLORS: [&str; 5] = [
    "#2563EB", // enables
    "#7C3AED", // essential_for
    "#DC2626", // challenges
    "#64748B", // relates_to
    "#059669", // is_a_type_of
];
