use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, ValueEnum};

use crate::config::load_config;
use crate::ir::EdgeKind;
use crate::layout::{LayoutMode, LayoutOptions};
use crate::layout_dump::write_layout_dump;
use crate::parser::{parse_payload, parse_scan_payload};
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::session::{FileOutlineStore, MapSession};

#[derive(Parser, Debug)]
#[command(name = "kmr", version, about = "Knowledge-map layout and renderer")]
pub struct Args {
    /// Input payload JSON ({nodes, edges}) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Gap-scan payload JSON ({ghost_nodes, ghost_edges}) merged before layout
    #[arg(short = 's', long = "scan")]
    pub scan: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON/JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Layout algorithm
    #[arg(short = 'l', long = "layout", value_enum, default_value = "radial")]
    pub layout: LayoutArg,

    /// Zen (fullscreen) scale: wider rings, longer force settling
    #[arg(long = "zen")]
    pub zen: bool,

    /// Comma-separated edge types to keep (default: all)
    #[arg(long = "edge-types")]
    pub edge_types: Option<String>,

    /// Hide edge labels
    #[arg(long = "hide-edge-labels")]
    pub hide_edge_labels: bool,

    /// Radial only: hide secondary (non-tree) edges
    #[arg(long = "tree-only")]
    pub tree_only: bool,

    /// Write the markdown outline here ('-' for stdout)
    #[arg(long = "outline")]
    pub outline: Option<PathBuf>,

    /// Directory for the best-effort outline store
    #[arg(long = "outline-store")]
    pub outline_store: Option<PathBuf>,

    /// Content id used as the outline store key
    #[arg(long = "content-id", default_value = "session")]
    pub content_id: String,

    /// Write the computed layout as JSON here
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,

    /// Width
    #[arg(short = 'w', long = "width", default_value_t = 1200.0)]
    pub width: f32,

    /// Height
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum LayoutArg {
    Radial,
    Force,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;

    let input = read_input(args.input.as_deref())?;
    let graph = parse_payload(&input)?;

    let mut options = LayoutOptions {
        mode: match args.layout {
            LayoutArg::Radial => LayoutMode::Radial,
            LayoutArg::Force => LayoutMode::Force,
        },
        zen: args.zen,
        show_edge_labels: !args.hide_edge_labels,
        show_secondary: !args.tree_only,
        ..LayoutOptions::default()
    };
    if let Some(list) = args.edge_types.as_deref() {
        options.enabled_kinds = list
            .split(',')
            .filter(|token| !token.trim().is_empty())
            .map(EdgeKind::from_token)
            .collect();
    }

    let mut session = MapSession::new(graph, options, config.theme.clone(), config.layout.clone());

    if let Some(scan_path) = args.scan.as_deref() {
        let scan_input = std::fs::read_to_string(scan_path)?;
        let scan = parse_scan_payload(&scan_input)?;
        let ticket = session.begin_scan();
        session.apply_scan(ticket, &scan);
    }

    if let Some(outline_path) = args.outline.as_deref() {
        let outline = session.outline().to_string();
        if outline_path == Path::new("-") {
            print!("{outline}");
        } else {
            std::fs::write(outline_path, &outline)?;
        }
    }
    if let Some(store_dir) = args.outline_store.as_deref() {
        let store = FileOutlineStore::new(store_dir);
        session.persist_outline(&store, &args.content_id);
    }

    let layout = session.view();
    if let Some(dump_path) = args.dump_layout.as_deref() {
        write_layout_dump(dump_path, &layout)?;
    }

    let svg = render_svg(&layout, &config.theme, &config.layout);
    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = args
                .output
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
            write_output_png(&svg, output, &config.render)?;
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
