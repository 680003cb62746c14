use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::LayoutConfig;
use crate::ir::{EdgeKind, Graph};
use crate::layout::{
    self, Layout, LayoutMode, LayoutOptions, SpanningTree, compute_layout, filter_edges,
};
use crate::outline::derive_outline;
use crate::parser::{ScanResult, merge_scan};
use crate::theme::Theme;

/// Identifies one in-flight gap-scan request. Only the most recently issued
/// ticket is accepted when results land (last-request-wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTicket(u64);

/// Best-effort sink for the derived outline. Failures must not block outline
/// display; callers log and move on.
pub trait OutlineStore {
    fn persist(&self, content_id: &str, outline: &str) -> anyhow::Result<()>;
}

/// Stores outlines as JSON records on disk, one file per content id. The
/// outline is merged into the record under its own key so unrelated fields
/// survive.
pub struct FileOutlineStore {
    dir: PathBuf,
}

impl FileOutlineStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl OutlineStore for FileOutlineStore {
    fn persist(&self, content_id: &str, outline: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{content_id}.json"));
        let mut record: serde_json::Value = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|_| serde_json::json!({})),
            Err(_) => serde_json::json!({}),
        };
        if !record.is_object() {
            record = serde_json::json!({});
        }
        record["structured_outline"] = serde_json::Value::String(outline.to_string());
        std::fs::write(&path, serde_json::to_string_pretty(&record)?)?;
        Ok(())
    }
}

/// Interactive state for one knowledge-map: an immutable computed layout plus
/// sparse user overrides merged at view time. Data refreshes never clobber
/// pending user edits.
pub struct MapSession {
    graph: Graph,
    options: LayoutOptions,
    theme: Theme,
    config: LayoutConfig,
    computed: Layout,
    position_overrides: BTreeMap<String, (f32, f32)>,
    label_overrides: BTreeMap<String, String>,
    undo_stack: Vec<BTreeMap<String, (f32, f32)>>,
    outline_cache: Option<String>,
    scan_serial: u64,
    active_scan: Option<u64>,
}

impl MapSession {
    pub fn new(graph: Graph, options: LayoutOptions, theme: Theme, config: LayoutConfig) -> Self {
        let computed = compute_layout(&graph, &options, &theme, &config);
        Self {
            graph,
            options,
            theme,
            config,
            computed,
            position_overrides: BTreeMap::new(),
            label_overrides: BTreeMap::new(),
            undo_stack: Vec::new(),
            outline_cache: None,
            scan_serial: 0,
            active_scan: None,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn computed(&self) -> &Layout {
        &self.computed
    }

    pub fn has_user_changes(&self) -> bool {
        !self.position_overrides.is_empty() || !self.label_overrides.is_empty()
    }

    /// The merged view: computed layout with label renames and dragged
    /// positions applied, edges restyled against the adjusted endpoints.
    pub fn view(&self) -> Layout {
        let mut nodes = self.computed.nodes.clone();
        for (id, label) in &self.label_overrides {
            if let Some(node) = nodes.get_mut(id) {
                let (cx, cy) = node.center();
                node.label = layout::measure_label(label, &self.theme, &self.config);
                node.width =
                    (node.label.width + self.config.node.padding_x * 2.0).max(self.config.node.min_width);
                node.height = node.label.height + self.config.node.padding_y * 2.0;
                node.set_center(cx, cy);
            }
        }
        for (id, &(x, y)) in &self.position_overrides {
            if let Some(node) = nodes.get_mut(id) {
                node.x = x;
                node.y = y;
            }
        }

        let effective = self.effective_graph();
        let tree = match self.options.mode {
            LayoutMode::Radial => Some(SpanningTree::build(&effective)),
            LayoutMode::Force => None,
        };
        let filtered = filter_edges(&effective, &self.options)
            .into_iter()
            .cloned()
            .collect();
        let edges = layout::style_graph_edges(
            filtered,
            &self.options,
            &nodes,
            tree.as_ref(),
            &self.theme,
            &self.config,
        );

        let mut view = Layout {
            mode: self.options.mode,
            nodes,
            edges,
            width: self.computed.width,
            height: self.computed.height,
        };
        extend_bounds(&mut view);
        view
    }

    /// Graph with label renames applied; the canonical data keeps the
    /// original labels so a re-fetch cannot clobber user edits.
    pub fn effective_graph(&self) -> Graph {
        let mut graph = self.graph.clone();
        for (id, label) in &self.label_overrides {
            if let Some(node) = graph.node_mut(id) {
                node.label = label.clone();
            }
        }
        graph
    }

    // --- option changes: recompute, overrides survive ---

    pub fn set_mode(&mut self, mode: LayoutMode) {
        self.options.mode = mode;
        self.relayout();
    }

    pub fn set_zen(&mut self, zen: bool) {
        self.options.zen = zen;
        self.relayout();
    }

    pub fn set_kind_enabled(&mut self, kind: EdgeKind, enabled: bool) {
        if enabled {
            self.options.enabled_kinds.insert(kind);
        } else {
            self.options.enabled_kinds.remove(&kind);
        }
        self.relayout();
    }

    pub fn set_show_edge_labels(&mut self, show: bool) {
        self.options.show_edge_labels = show;
        self.relayout();
    }

    pub fn set_show_secondary(&mut self, show: bool) {
        self.options.show_secondary = show;
        self.relayout();
    }

    fn relayout(&mut self) {
        self.computed = compute_layout(&self.graph, &self.options, &self.theme, &self.config);
    }

    // --- drags and undo ---

    /// Record a completed drag gesture: snapshot all current positions for
    /// undo, then pin the node at the new spot.
    pub fn apply_drag(&mut self, node_id: &str, x: f32, y: f32) {
        if !self.computed.nodes.contains_key(node_id) {
            return;
        }
        let snapshot = self.current_positions();
        self.undo_stack.push(snapshot);
        let depth = self.config.session.undo_depth.max(1);
        if self.undo_stack.len() > depth {
            let excess = self.undo_stack.len() - depth;
            self.undo_stack.drain(..excess);
        }
        self.position_overrides.insert(node_id.to_string(), (x, y));
    }

    /// Pop the latest snapshot and apply it as the new override set. No-op
    /// on an empty stack.
    pub fn undo(&mut self) {
        if let Some(snapshot) = self.undo_stack.pop() {
            self.position_overrides = snapshot;
        }
    }

    pub fn undo_depth_used(&self) -> usize {
        self.undo_stack.len()
    }

    fn current_positions(&self) -> BTreeMap<String, (f32, f32)> {
        let mut positions = BTreeMap::new();
        for (id, node) in &self.computed.nodes {
            positions.insert(id.clone(), (node.x, node.y));
        }
        for (id, &position) in &self.position_overrides {
            positions.insert(id.clone(), position);
        }
        positions
    }

    // --- renames ---

    pub fn rename_node(&mut self, node_id: &str, label: &str) {
        if !self.graph.contains_node(node_id) {
            return;
        }
        self.label_overrides.insert(node_id.to_string(), label.to_string());
        self.outline_cache = None;
    }

    // --- data refresh ---

    /// Replace the canonical graph. Without pending user changes the computed
    /// positions are replaced wholesale; with pending changes every existing
    /// node keeps its current position and only the edge set is refreshed.
    pub fn replace_data(&mut self, graph: Graph) {
        if self.has_user_changes() {
            let current = self.current_positions();
            for (id, position) in current {
                if graph.contains_node(&id) {
                    self.position_overrides.insert(id, position);
                }
            }
            self.position_overrides.retain(|id, _| graph.contains_node(id));
            self.label_overrides.retain(|id, _| graph.contains_node(id));
        } else {
            self.position_overrides.clear();
            self.label_overrides.clear();
            self.undo_stack.clear();
        }
        self.graph = graph;
        self.outline_cache = None;
        self.relayout();
    }

    // --- gap scanning ---

    /// Register a new scan request; any previously issued ticket goes stale.
    pub fn begin_scan(&mut self) -> ScanTicket {
        self.scan_serial += 1;
        self.active_scan = Some(self.scan_serial);
        ScanTicket(self.scan_serial)
    }

    /// Merge a scan result if its ticket is still current. Stale results are
    /// dropped without touching the graph.
    pub fn apply_scan(&mut self, ticket: ScanTicket, scan: &ScanResult) -> bool {
        if self.active_scan != Some(ticket.0) {
            log::debug!("dropping stale gap-scan result (ticket {})", ticket.0);
            return false;
        }
        self.active_scan = None;
        let merged = merge_scan(&self.graph, scan);
        // Ghost merge counts as a data refresh with pending changes: keep
        // every existing node where it is.
        let current = self.current_positions();
        for (id, position) in current {
            self.position_overrides.insert(id, position);
        }
        self.graph = merged;
        self.outline_cache = None;
        self.relayout();
        true
    }

    /// Confirm a proposed node: clears its ghost flag and that of every
    /// touching edge.
    pub fn accept_ghost(&mut self, node_id: &str) {
        let Some(node) = self.graph.node_mut(node_id) else {
            return;
        };
        if !node.is_ghost {
            return;
        }
        node.is_ghost = false;
        for edge in self.graph.edges.iter_mut() {
            if edge.touches(node_id) {
                edge.is_ghost = false;
            }
        }
        self.outline_cache = None;
        self.relayout();
    }

    /// Reject a proposed node: removes it and every edge referencing it.
    pub fn dismiss_ghost(&mut self, node_id: &str) {
        let is_ghost = self
            .graph
            .node(node_id)
            .map(|node| node.is_ghost)
            .unwrap_or(false);
        if !is_ghost {
            return;
        }
        self.graph.nodes.retain(|node| node.id != node_id);
        self.graph.edges.retain(|edge| !edge.touches(node_id));
        self.position_overrides.remove(node_id);
        self.label_overrides.remove(node_id);
        self.outline_cache = None;
        self.relayout();
    }

    // --- outline ---

    /// Cached outline of the current (renamed) graph; invalidated by data
    /// changes, never by position-only changes.
    pub fn outline(&mut self) -> &str {
        if self.outline_cache.is_none() {
            self.outline_cache = Some(derive_outline(&self.effective_graph(), &self.config.outline));
        }
        self.outline_cache.as_deref().unwrap_or_default()
    }

    /// Persist the outline, best effort: a failing store is logged and
    /// otherwise ignored.
    pub fn persist_outline(&mut self, store: &dyn OutlineStore, content_id: &str) {
        let outline = self.outline().to_string();
        if let Err(err) = store.persist(content_id, &outline) {
            log::warn!("outline persistence failed for {content_id}: {err:#}");
        }
    }

    // --- reset ---

    /// Drop all user overrides and undo history; the view falls back to the
    /// last computed layout.
    pub fn reset(&mut self) {
        self.position_overrides.clear();
        self.label_overrides.clear();
        self.undo_stack.clear();
        self.outline_cache = None;
    }
}

/// Grow width/height to cover dragged nodes without shifting coordinates;
/// shifting would move override positions the user just placed.
fn extend_bounds(layout: &mut Layout) {
    let mut max_x = layout.width;
    let mut max_y = layout.height;
    for node in layout.nodes.values() {
        max_x = max_x.max(node.x + node.width);
        max_y = max_y.max(node.y + node.height);
    }
    layout.width = max_x;
    layout.height = max_y;
}
