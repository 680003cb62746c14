use std::path::Path;

use knowledge_map_renderer::{
    LayoutConfig, LayoutMode, LayoutOptions, Theme, compute_layout, parse_payload, render_svg,
};

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
}

fn render_fixture(path: &Path, mode: LayoutMode) -> String {
    let input = std::fs::read_to_string(path).expect("fixture read failed");
    let graph = parse_payload(&input).expect("parse failed");
    let theme = Theme::study_default();
    let config = LayoutConfig::default();
    let options = LayoutOptions {
        mode,
        ..LayoutOptions::default()
    };
    let layout = compute_layout(&graph, &options, &theme, &config);
    render_svg(&layout, &theme, &config)
}

#[test]
fn render_all_fixtures() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");

    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = ["basic.json", "messy.json", "dense.json"];

    for rel in candidates {
        let path = root.join(rel);
        assert!(path.exists(), "fixture missing: {}", rel);
        for mode in [LayoutMode::Radial, LayoutMode::Force] {
            let svg = render_fixture(&path, mode);
            assert_valid_svg(&svg, rel);
        }
    }
}

#[test]
fn fixture_labels_all_appear_in_svg() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");
    let input = std::fs::read_to_string(root.join("dense.json")).unwrap();
    let graph = parse_payload(&input).unwrap();
    let theme = Theme::study_default();
    let config = LayoutConfig::default();
    let layout = compute_layout(&graph, &LayoutOptions::default(), &theme, &config);
    let svg = render_svg(&layout, &theme, &config);
    for node in &graph.nodes {
        // Labels may be wrapped; the first word always survives intact.
        let first_word = node.label.split_whitespace().next().unwrap();
        assert!(svg.contains(first_word), "label missing from svg: {}", node.label);
    }
}

#[test]
fn messy_fixture_normalizes_cleanly() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");
    let input = std::fs::read_to_string(root.join("messy.json")).unwrap();
    let graph = parse_payload(&input).unwrap();

    // Duplicate "rev" dropped, slug synthesized for the id-less node.
    assert_eq!(graph.nodes.len(), 4);
    assert!(graph.nodes.iter().any(|node| node.id == "enlightenment_ideas"));
    assert_eq!(
        graph.node("rev").unwrap().label,
        "French Revolution",
        "first occurrence wins"
    );
    // Dangling and source-less edges dropped.
    assert_eq!(graph.edges.len(), 3);
    // Legacy type and non-bi direction normalized.
    let challenge = graph
        .edges
        .iter()
        .find(|edge| edge.target == "mon")
        .unwrap();
    assert_eq!(challenge.kind.as_str(), "challenges");
    let enables = graph
        .edges
        .iter()
        .find(|edge| edge.source == "enlightenment_ideas")
        .unwrap();
    assert!(matches!(
        enables.direction,
        knowledge_map_renderer::ir::EdgeDirection::Uni
    ));
}

#[test]
fn both_modes_are_deterministic_end_to_end() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");
    let path = root.join("dense.json");
    for mode in [LayoutMode::Radial, LayoutMode::Force] {
        let first = render_fixture(&path, mode);
        let second = render_fixture(&path, mode);
        assert_eq!(first, second);
    }
}
