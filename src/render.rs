use std::path::Path;

use anyhow::Result;

use crate::config::{LayoutConfig, RenderConfig};
use crate::layout::{EdgeLayout, Layout, TextBlock};
use crate::theme::Theme;

pub fn render_svg(layout: &Layout, theme: &Theme, config: &LayoutConfig) -> String {
    let mut svg = String::new();
    let width = layout.width.max(200.0);
    let height = layout.height.max(200.0);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    svg.push_str("<defs>");
    // One marker per edge color keeps arrowheads matching their stroke.
    let mut marker_colors: Vec<&str> = layout.edges.iter().map(|edge| edge.style.color.as_str()).collect();
    marker_colors.sort_unstable();
    marker_colors.dedup();
    for color in marker_colors {
        svg.push_str(&format!(
            "<marker id=\"arrow-{}\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker>",
            marker_slug(color),
            color
        ));
    }
    svg.push_str("</defs>");

    for edge in &layout.edges {
        let d = edge_path(edge);
        let slug = marker_slug(&edge.style.color);
        let mut attrs = String::new();
        if edge.arrow_end {
            attrs.push_str(&format!(" marker-end=\"url(#arrow-{slug})\""));
        }
        if edge.arrow_start {
            attrs.push_str(&format!(" marker-start=\"url(#arrow-{slug})\""));
        }
        if let Some(dash) = &edge.style.dasharray {
            attrs.push_str(&format!(" stroke-dasharray=\"{dash}\""));
        }
        if edge.style.opacity < 1.0 {
            attrs.push_str(&format!(" stroke-opacity=\"{:.2}\"", edge.style.opacity));
        }
        svg.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{:.2}\"{}/>",
            d, edge.style.color, edge.style.width, attrs
        ));

        if let Some(label) = &edge.label {
            let (x, y) = edge_label_anchor(edge);
            let approx_width = label.chars().count() as f32 * theme.font_size * 0.56;
            svg.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"4\" ry=\"4\" fill=\"{}\" fill-opacity=\"0.85\"/>",
                x - approx_width / 2.0 - 4.0,
                y - theme.font_size / 2.0 - 3.0,
                approx_width + 8.0,
                theme.font_size + 6.0,
                theme.edge_label_background
            ));
            svg.push_str(&format!(
                "<text x=\"{x:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                y + theme.font_size * 0.35,
                theme.font_family,
                theme.font_size * 0.85,
                theme.edge_label_color,
                escape_xml(label)
            ));
        }
    }

    for node in layout.nodes.values() {
        let (fill, stroke, text_color, dash) = if node.is_ghost {
            (
                theme.ghost_fill.as_str(),
                theme.ghost_border.as_str(),
                theme.ghost_text_color.as_str(),
                " stroke-dasharray=\"4 3\"",
            )
        } else {
            (
                theme.category_fill(node.category),
                theme.node_border_color.as_str(),
                theme.node_text_color.as_str(),
                "",
            )
        };
        if node.is_high_yield {
            svg.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{:.1}\" ry=\"{:.1}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2.6\"/>",
                node.x - 3.0,
                node.y - 3.0,
                node.width + 6.0,
                node.height + 6.0,
                config.node.corner_radius + 3.0,
                config.node.corner_radius + 3.0,
                theme.high_yield_ring
            ));
        }
        svg.push_str(&format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{:.1}\" ry=\"{:.1}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.4\"{}/>",
            node.x,
            node.y,
            node.width,
            node.height,
            config.node.corner_radius,
            config.node.corner_radius,
            fill,
            stroke,
            dash
        ));
        let (center_x, center_y) = node.center();
        svg.push_str(&text_block_svg(center_x, center_y, &node.label, theme, text_color));
    }

    svg.push_str("</svg>");
    svg
}

fn marker_slug(color: &str) -> String {
    color
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

fn edge_path(edge: &EdgeLayout) -> String {
    match edge.points.as_slice() {
        [start, control, end] => format!(
            "M {:.2} {:.2} Q {:.2} {:.2} {:.2} {:.2}",
            start.0, start.1, control.0, control.1, end.0, end.1
        ),
        [start, end] => format!("M {:.2} {:.2} L {:.2} {:.2}", start.0, start.1, end.0, end.1),
        points => {
            let mut d = String::new();
            for (index, point) in points.iter().enumerate() {
                let op = if index == 0 { 'M' } else { 'L' };
                d.push_str(&format!("{op} {:.2} {:.2} ", point.0, point.1));
            }
            d.trim_end().to_string()
        }
    }
}

fn edge_label_anchor(edge: &EdgeLayout) -> (f32, f32) {
    match edge.points.as_slice() {
        // Quadratic midpoint at t = 0.5.
        [start, control, end] => (
            0.25 * start.0 + 0.5 * control.0 + 0.25 * end.0,
            0.25 * start.1 + 0.5 * control.1 + 0.25 * end.1,
        ),
        [start, end] => ((start.0 + end.0) / 2.0, (start.1 + end.1) / 2.0),
        _ => (0.0, 0.0),
    }
}

fn text_block_svg(x: f32, y: f32, label: &TextBlock, theme: &Theme, fill: &str) -> String {
    let line_height = theme.font_size * 1.25;
    let total_height = label.lines.len() as f32 * line_height;
    let start_y = y - total_height / 2.0 + theme.font_size;
    let mut text = String::new();
    text.push_str(&format!(
        "<text x=\"{x:.2}\" y=\"{start_y:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">",
        theme.font_family, theme.font_size, fill
    ));
    for (index, line) in label.lines.iter().enumerate() {
        let dy = if index == 0 { 0.0 } else { line_height };
        text.push_str(&format!(
            "<tspan x=\"{x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
            escape_xml(line)
        ));
    }
    text.push_str("</text>");
    text
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the `png` feature (resvg/usvg)"
    ))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
