#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod outline;
pub mod parser;
pub mod render;
pub mod session;
pub mod text_metrics;
pub mod theme;

pub use config::{Config, LayoutConfig};
pub use ir::Graph;
pub use layout::{Layout, LayoutMode, LayoutOptions, compute_layout};
pub use parser::{parse_payload, parse_scan_payload};
pub use render::render_svg;
pub use session::MapSession;
pub use theme::Theme;

#[cfg(feature = "cli")]
pub use cli::run;
