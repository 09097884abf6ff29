//! Single-hub network graph as returned by the candidate detail endpoint.

use serde::{Deserialize, Serialize};

/// A person in the network graph.
///
/// Coworker nodes carry an id of the form `cw:{numeric id}`; the center
/// node is marked by its `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl GraphNode {
    /// The numeric coworker id, when this node points at a coworker.
    pub fn coworker_id(&self) -> Option<i64> {
        let rest = self.id.strip_prefix("cw:")?;
        rest.parse().ok()
    }
}

/// An undirected connection between two nodes, referenced by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One designated hub plus its peripheral nodes and the edges between them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// Marker kind of the hub node.
pub const CENTER_KIND: &str = "中心";

impl NetworkGraph {
    /// The hub node: the one marked with [`CENTER_KIND`], falling back
    /// to the first node when none is marked.
    pub fn center(&self) -> Option<&GraphNode> {
        self.nodes
            .iter()
            .find(|n| n.kind.as_deref() == Some(CENTER_KIND))
            .or_else(|| self.nodes.first())
    }
}
