use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::theme::Theme;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadialConfig {
    /// Radial distance between consecutive depth rings.
    pub layer_spacing: f32,
    /// Multiplier applied to `layer_spacing` in zen (fullscreen) mode.
    pub zen_spacing_scale: f32,
    /// Minimum angular gap reserved between adjacent sibling sectors, radians.
    pub sibling_gap: f32,
    /// Fraction of a parent's sweep that must survive padding. Padding is
    /// clamped down rather than dropping below this floor.
    pub min_usable_sweep: f32,
}

impl Default for RadialConfig {
    fn default() -> Self {
        Self {
            layer_spacing: 150.0,
            zen_spacing_scale: 1.25,
            sibling_gap: 0.05,
            min_usable_sweep: 0.7,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForceConfig {
    /// Fixed iteration count. No early exit: determinism over speed.
    pub iterations: usize,
    pub zen_iterations: usize,
    /// Radius of the circle nodes are seeded on before the simulation.
    pub seed_radius: f32,
    pub zen_seed_scale: f32,
    /// Pairwise repulsion strength, divided by squared distance.
    pub repulsion: f32,
    /// Distance floor for the repulsion term.
    pub min_distance: f32,
    /// Spring rest length for connected nodes.
    pub rest_length: f32,
    /// Hooke coefficient for the spring term.
    pub spring: f32,
    /// Scale applied to the accumulated force before moving a node.
    pub damping: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            iterations: 300,
            zen_iterations: 450,
            seed_radius: 320.0,
            zen_seed_scale: 1.25,
            repulsion: 48_000.0,
            min_distance: 24.0,
            rest_length: 180.0,
            spring: 0.015,
            damping: 0.85,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeStyleConfig {
    pub base_width: f32,
    /// Extra width for `enables` / `essential_for` edges.
    pub emphasis_width: f32,
    pub dash_pattern: String,
    pub ghost_width: f32,
    pub ghost_dash_pattern: String,
    pub ghost_color: String,
    /// Curvature step between parallel edges on the same node pair.
    pub curvature_step: f32,
    /// Opacity applied to edges outside an active highlight set.
    pub dim_opacity: f32,
    pub highlight_width_bonus: f32,
}

impl Default for EdgeStyleConfig {
    fn default() -> Self {
        Self {
            base_width: 1.4,
            emphasis_width: 1.0,
            dash_pattern: "6 4".to_string(),
            ghost_width: 1.0,
            ghost_dash_pattern: "3 3".to_string(),
            ghost_color: "#B9C4D6".to_string(),
            curvature_step: 26.0,
            dim_opacity: 0.25,
            highlight_width_bonus: 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSizeConfig {
    pub padding_x: f32,
    pub padding_y: f32,
    pub min_width: f32,
    pub max_label_width: f32,
    pub corner_radius: f32,
}

impl Default for NodeSizeConfig {
    fn default() -> Self {
        Self {
            padding_x: 14.0,
            padding_y: 8.0,
            min_width: 64.0,
            max_label_width: 200.0,
            corner_radius: 10.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineConfig {
    /// Maximum relation lines rendered under each node.
    pub max_relations: usize,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self { max_relations: 6 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Bound on the undo stack; oldest snapshots fall off first.
    pub undo_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { undo_depth: 20 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub radial: RadialConfig,
    pub force: ForceConfig,
    pub edge: EdgeStyleConfig,
    pub node: NodeSizeConfig,
    pub outline: OutlineConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub label_line_height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            padding: 40.0,
            label_line_height: 1.25,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::study_default(),
            layout: LayoutConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    radial: Option<RadialConfig>,
    force: Option<ForceConfig>,
    edge: Option<EdgeStyleConfig>,
    node: Option<NodeSizeConfig>,
    outline: Option<OutlineConfig>,
    session: Option<SessionConfig>,
    render: Option<RenderConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    node_text_color: Option<String>,
    node_border_color: Option<String>,
    ghost_fill: Option<String>,
    ghost_border: Option<String>,
    high_yield_ring: Option<String>,
    category_fills: Option<Vec<String>>,
    edge_colors: Option<Vec<String>>,
}

/// Load configuration from a JSON (or JSON5) file, layered over defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = match serde_json::from_str(&contents) {
        Ok(parsed) => parsed,
        Err(err) => json5::from_str(&contents).map_err(|_| err)?,
    };

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "midnight" || theme_name == "dark" {
            config.theme = Theme::midnight();
        } else if theme_name == "study" || theme_name == "default" {
            config.theme = Theme::study_default();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.node_text_color {
            config.theme.node_text_color = v;
        }
        if let Some(v) = vars.node_border_color {
            config.theme.node_border_color = v;
        }
        if let Some(v) = vars.ghost_fill {
            config.theme.ghost_fill = v;
        }
        if let Some(v) = vars.ghost_border {
            config.theme.ghost_border = v;
        }
        if let Some(v) = vars.high_yield_ring {
            config.theme.high_yield_ring = v;
        }
        if let Some(v) = vars.category_fills {
            config.theme.category_fills = v;
        }
        if let Some(v) = vars.edge_colors {
            config.theme.edge_colors = v;
        }
    }

    if let Some(v) = parsed.radial {
        config.layout.radial = v;
    }
    if let Some(v) = parsed.force {
        config.layout.force = v;
    }
    if let Some(v) = parsed.edge {
        config.layout.edge = v;
    }
    if let Some(v) = parsed.node {
        config.layout.node = v;
    }
    if let Some(v) = parsed.outline {
        config.layout.outline = v;
    }
    if let Some(v) = parsed.session {
        config.layout.session = v;
    }
    if let Some(v) = parsed.render {
        config.render = v;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert!(config.layout.radial.min_usable_sweep > 0.5);
        assert!(config.layout.force.iterations > 0);
        assert!(config.layout.session.undo_depth >= 1);
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.outline.max_relations, 6);
    }
}
