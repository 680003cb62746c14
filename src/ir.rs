use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Subject category attached to a concept node. Unrecognized input values
/// normalize to `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Science,
    History,
    Math,
    Language,
    Technology,
    Philosophy,
    Art,
    General,
    Concept,
    Main,
    Section,
    Problem,
}

impl Category {
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "science" => Self::Science,
            "history" => Self::History,
            "math" => Self::Math,
            "language" => Self::Language,
            "technology" => Self::Technology,
            "philosophy" => Self::Philosophy,
            "art" => Self::Art,
            "general" => Self::General,
            "concept" => Self::Concept,
            "main" => Self::Main,
            "section" => Self::Section,
            "problem" => Self::Problem,
            _ => Self::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Science => "science",
            Self::History => "history",
            Self::Math => "math",
            Self::Language => "language",
            Self::Technology => "technology",
            Self::Philosophy => "philosophy",
            Self::Art => "art",
            Self::General => "general",
            Self::Concept => "concept",
            Self::Main => "main",
            Self::Section => "section",
            Self::Problem => "problem",
        }
    }

    pub const ALL: [Category; 12] = [
        Self::Science,
        Self::History,
        Self::Math,
        Self::Language,
        Self::Technology,
        Self::Philosophy,
        Self::Art,
        Self::General,
        Self::Concept,
        Self::Main,
        Self::Section,
        Self::Problem,
    ];
}

/// Relationship type carried by a concept edge. Legacy synonyms
/// ("contradiction", "contradicts") alias to `Challenges`; unrecognized
/// values normalize to `RelatesTo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Enables,
    EssentialFor,
    Challenges,
    RelatesTo,
    IsATypeOf,
}

impl EdgeKind {
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "enables" => Self::Enables,
            "essential_for" => Self::EssentialFor,
            "challenges" | "contradiction" | "contradicts" => Self::Challenges,
            "relates_to" => Self::RelatesTo,
            "is_a_type_of" => Self::IsATypeOf,
            _ => Self::RelatesTo,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enables => "enables",
            Self::EssentialFor => "essential_for",
            Self::Challenges => "challenges",
            Self::RelatesTo => "relates_to",
            Self::IsATypeOf => "is_a_type_of",
        }
    }

    /// Human-readable label used when the edge carries no explicit label.
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Enables => "enables",
            Self::EssentialFor => "essential for",
            Self::Challenges => "challenges",
            Self::RelatesTo => "relates to",
            Self::IsATypeOf => "is a type of",
        }
    }

    pub const ALL: [EdgeKind; 5] = [
        Self::Enables,
        Self::EssentialFor,
        Self::Challenges,
        Self::RelatesTo,
        Self::IsATypeOf,
    ];
}

/// Whether an edge draws an arrowhead at one or both ends. Only the literal
/// value `bi` is accepted as bidirectional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDirection {
    Uni,
    Bi,
}

impl EdgeDirection {
    /// Anything other than the literal value `bi` is unidirectional.
    pub fn from_token(token: &str) -> Self {
        if token.trim() == "bi" { Self::Bi } else { Self::Uni }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptNode {
    pub id: String,
    pub label: String,
    pub category: Category,
    pub description: Option<String>,
    pub source_snippet: Option<String>,
    pub is_high_yield: bool,
    pub is_ghost: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
    pub label: Option<String>,
    pub direction: EdgeDirection,
    pub is_ghost: bool,
}

impl ConceptEdge {
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// Endpoint pair with the smaller id first, for grouping parallel edges.
    pub fn unordered_pair(&self) -> (String, String) {
        if self.source <= self.target {
            (self.source.clone(), self.target.clone())
        } else {
            (self.target.clone(), self.source.clone())
        }
    }
}

/// Normalized concept graph. Node order is input order and is part of the
/// determinism contract: root tie-breaks and force seeding follow it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<ConceptNode>,
    pub edges: Vec<ConceptEdge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&ConceptNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut ConceptNode> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Undirected degree per node id. Every edge counts both ways regardless
    /// of its logical direction.
    pub fn degrees(&self) -> BTreeMap<String, usize> {
        let mut degrees: BTreeMap<String, usize> = BTreeMap::new();
        for node in &self.nodes {
            degrees.insert(node.id.clone(), 0);
        }
        for edge in &self.edges {
            if let Some(count) = degrees.get_mut(&edge.source) {
                *count += 1;
            }
            if let Some(count) = degrees.get_mut(&edge.target) {
                *count += 1;
            }
        }
        degrees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_tokens_are_case_insensitive() {
        assert_eq!(Category::from_token("Science"), Category::Science);
        assert_eq!(Category::from_token("  MAIN "), Category::Main);
        assert_eq!(Category::from_token("biology"), Category::General);
        assert_eq!(Category::from_token(""), Category::General);
    }

    #[test]
    fn edge_kind_legacy_synonyms() {
        assert_eq!(EdgeKind::from_token("contradiction"), EdgeKind::Challenges);
        assert_eq!(EdgeKind::from_token("Contradicts"), EdgeKind::Challenges);
        assert_eq!(EdgeKind::from_token("supports"), EdgeKind::RelatesTo);
        assert_eq!(EdgeKind::from_token("essential_for"), EdgeKind::EssentialFor);
    }

    #[test]
    fn only_literal_bi_is_bidirectional() {
        assert_eq!(EdgeDirection::from_token("bi"), EdgeDirection::Bi);
        assert_eq!(EdgeDirection::from_token("BI"), EdgeDirection::Uni);
        assert_eq!(EdgeDirection::from_token("both"), EdgeDirection::Uni);
        assert_eq!(EdgeDirection::from_token("bidirectional"), EdgeDirection::Uni);
    }

    #[test]
    fn degrees_count_both_endpoints() {
        let graph = Graph {
            nodes: vec![node("a"), node("b"), node("c")],
            edges: vec![edge("e1", "a", "b"), edge("e2", "a", "c")],
        };
        let degrees = graph.degrees();
        assert_eq!(degrees["a"], 2);
        assert_eq!(degrees["b"], 1);
        assert_eq!(degrees["c"], 1);
    }

    fn node(id: &str) -> ConceptNode {
        ConceptNode {
            id: id.to_string(),
            label: id.to_uppercase(),
            category: Category::General,
            description: None,
            source_snippet: None,
            is_high_yield: false,
            is_ghost: false,
        }
    }

    fn edge(id: &str, source: &str, target: &str) -> ConceptEdge {
        ConceptEdge {
            id: id.to_string(),
            source: source.to_string(),
            target: target.to_string(),
            kind: EdgeKind::RelatesTo,
            label: None,
            direction: EdgeDirection::Uni,
            is_ghost: false,
        }
    }
}
