use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::ir::{Category, ConceptEdge, ConceptNode, EdgeDirection, EdgeKind, Graph};

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("payload contains no nodes")]
    Empty,
}

/// Raw node shape as produced by the AI analysis call. Every field is
/// optional; coercion into the closed enums happens in [`normalize`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNode {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source_snippet: Option<String>,
    #[serde(default)]
    pub is_high_yield: Option<bool>,
    #[serde(default)]
    pub is_ghost: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEdge {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub is_ghost: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMapPayload {
    #[serde(default)]
    pub nodes: Vec<RawNode>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawScanPayload {
    #[serde(default)]
    pub ghost_nodes: Vec<RawNode>,
    #[serde(default)]
    pub ghost_edges: Vec<RawEdge>,
}

/// Proposed-but-unconfirmed additions from a gap-scan pass.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub ghost_nodes: Vec<ConceptNode>,
    pub ghost_edges: Vec<ConceptEdge>,
}

/// Parse a knowledge-map payload. Strict JSON first, json5 as the fallback
/// for the sloppier output some models produce (trailing commas, unquoted
/// keys).
pub fn parse_payload(input: &str) -> Result<Graph, PayloadError> {
    let raw: RawMapPayload = match serde_json::from_str(input) {
        Ok(raw) => raw,
        Err(err) => json5::from_str(input).map_err(|_| PayloadError::Json(err))?,
    };
    if raw.nodes.is_empty() {
        return Err(PayloadError::Empty);
    }
    Ok(normalize(raw.nodes, raw.edges))
}

pub fn parse_scan_payload(input: &str) -> Result<ScanResult, PayloadError> {
    let raw: RawScanPayload = match serde_json::from_str(input) {
        Ok(raw) => raw,
        Err(err) => json5::from_str(input).map_err(|_| PayloadError::Json(err))?,
    };
    let graph = normalize(raw.ghost_nodes, raw.ghost_edges);
    Ok(ScanResult {
        ghost_nodes: graph
            .nodes
            .into_iter()
            .map(|mut node| {
                node.is_ghost = true;
                node
            })
            .collect(),
        ghost_edges: graph
            .edges
            .into_iter()
            .map(|mut edge| {
                edge.is_ghost = true;
                edge
            })
            .collect(),
    })
}

/// Coerce raw collections into a well-formed [`Graph`]: closed-enum
/// normalization, id synthesis, duplicate-id drop (first occurrence wins),
/// dangling-edge drop. Pure and idempotent.
pub fn normalize(raw_nodes: Vec<RawNode>, raw_edges: Vec<RawEdge>) -> Graph {
    let mut nodes: Vec<ConceptNode> = Vec::with_capacity(raw_nodes.len());
    let mut seen_ids: BTreeSet<String> = BTreeSet::new();

    for raw in raw_nodes {
        let label = raw
            .label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .or_else(|| raw.id.clone())
            .unwrap_or_else(|| "untitled".to_string());
        let id = match raw.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => id.to_string(),
            None => unique_slug(&label, &seen_ids),
        };
        if !seen_ids.insert(id.clone()) {
            continue;
        }
        nodes.push(ConceptNode {
            id,
            label,
            category: Category::from_token(raw.category.as_deref().unwrap_or("")),
            description: raw.description.filter(|text| !text.trim().is_empty()),
            source_snippet: raw.source_snippet.filter(|text| !text.trim().is_empty()),
            is_high_yield: raw.is_high_yield.unwrap_or(false),
            is_ghost: raw.is_ghost.unwrap_or(false),
        });
    }

    let mut edges: Vec<ConceptEdge> = Vec::with_capacity(raw_edges.len());
    for (index, raw) in raw_edges.into_iter().enumerate() {
        let (Some(source), Some(target)) = (raw.source, raw.target) else {
            continue;
        };
        if !seen_ids.contains(&source) || !seen_ids.contains(&target) {
            continue;
        }
        let id = raw
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("{source}--{target}--{index}"));
        edges.push(ConceptEdge {
            id,
            source,
            target,
            kind: EdgeKind::from_token(raw.kind.as_deref().unwrap_or("")),
            label: raw.label.filter(|label| !label.trim().is_empty()),
            direction: EdgeDirection::from_token(raw.direction.as_deref().unwrap_or("uni")),
            is_ghost: raw.is_ghost.unwrap_or(false),
        });
    }

    Graph { nodes, edges }
}

/// Merge a gap-scan result into a base graph. A ghost node whose id is
/// already present is dropped; its edges still attach to the existing node.
/// Ghost edges with a dangling endpoint are dropped.
pub fn merge_scan(base: &Graph, scan: &ScanResult) -> Graph {
    let mut merged = base.clone();
    for ghost in &scan.ghost_nodes {
        if !merged.contains_node(&ghost.id) {
            merged.nodes.push(ghost.clone());
        }
    }
    for ghost in &scan.ghost_edges {
        if merged.contains_node(&ghost.source) && merged.contains_node(&ghost.target) {
            merged.edges.push(ghost.clone());
        }
    }
    merged
}

fn unique_slug(label: &str, taken: &BTreeSet<String>) -> String {
    let base = SLUG_RE
        .replace_all(&label.to_ascii_lowercase(), "_")
        .trim_matches('_')
        .to_string();
    let base = if base.is_empty() { "node".to_string() } else { base };
    if !taken.contains(&base) {
        return base;
    }
    let mut counter = 2usize;
    loop {
        let candidate = format!("{base}_{counter}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}
