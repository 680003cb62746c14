use knowledge_map_renderer::config::LayoutConfig;
use knowledge_map_renderer::layout::{LayoutMode, LayoutOptions, compute_layout};
use knowledge_map_renderer::layout_dump::LayoutDump;
use knowledge_map_renderer::parser::parse_payload;
use knowledge_map_renderer::render::render_svg;
use knowledge_map_renderer::theme::Theme;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MapRenderOptions {
    theme: Option<String>,
    layout: Option<String>,
    zen: Option<bool>,
    show_edge_labels: Option<bool>,
    show_secondary: Option<bool>,
}

fn build_options(options: &MapRenderOptions) -> (Theme, LayoutOptions) {
    let theme = if options.theme.as_deref() == Some("midnight") {
        Theme::midnight()
    } else {
        Theme::study_default()
    };
    let layout_options = LayoutOptions {
        mode: if options.layout.as_deref() == Some("force") {
            LayoutMode::Force
        } else {
            LayoutMode::Radial
        },
        zen: options.zen.unwrap_or(false),
        show_edge_labels: options.show_edge_labels.unwrap_or(true),
        show_secondary: options.show_secondary.unwrap_or(true),
        ..LayoutOptions::default()
    };
    (theme, layout_options)
}

fn parse_options(options_json: Option<String>) -> Result<MapRenderOptions, JsValue> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(MapRenderOptions::default()),
    }
}

/// Render a knowledge-map payload straight to SVG.
#[wasm_bindgen]
pub fn render_knowledge_map_svg(payload: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json)?;
    let (theme, layout_options) = build_options(&options);
    let graph = parse_payload(payload).map_err(|error| JsValue::from_str(&error.to_string()))?;
    let config = LayoutConfig::default();
    let layout = compute_layout(&graph, &layout_options, &theme, &config);
    Ok(render_svg(&layout, &theme, &config))
}

/// Positioned nodes and styled edges as JSON, for a JS graph widget that
/// does its own drawing and reports drags back.
#[wasm_bindgen]
pub fn layout_knowledge_map(payload: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = parse_options(options_json)?;
    let (theme, layout_options) = build_options(&options);
    let graph = parse_payload(payload).map_err(|error| JsValue::from_str(&error.to_string()))?;
    let config = LayoutConfig::default();
    let layout = compute_layout(&graph, &layout_options, &theme, &config);
    let dump = LayoutDump::from_layout(&layout);
    serde_json::to_string(&dump).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_payload_to_svg() {
        let payload = r#"{"nodes":[{"id":"a","label":"Alpha","category":"main"},
                                   {"id":"b","label":"Beta"}],
                          "edges":[{"source":"a","target":"b","type":"enables"}]}"#;
        let svg = render_knowledge_map_svg(payload, None).expect("payload should render");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Alpha"));
    }
}
