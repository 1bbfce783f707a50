//! Call graph projection.
//!
//! Converts the flat call log into caller/callee nodes joined by one edge
//! per call, ready for the network panel.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::model::CallLogEntry;

/// Identity of a call within one projection pass.
///
/// Derived by [`call_key`]: the backend's `callId` when present and
/// non-empty, otherwise the entry's position in the call log.
///
/// Both variants render as bare text (`"call-7"`, `"3"`), and the rendered
/// form is what node and edge ids are built from. A `callId` of `"1"` and
/// the id-less entry at position 1 therefore produce the same ids and the
/// later one wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CallKey {
    Id(String),
    Index(usize),
}

impl fmt::Display for CallKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallKey::Id(id) => f.write_str(id),
            CallKey::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Derive the identity key for the entry at `index`.
pub fn call_key(entry: &CallLogEntry, index: usize) -> CallKey {
    match entry.call_id() {
        Some(id) => CallKey::Id(id.to_string()),
        None => CallKey::Index(index),
    }
}

/// Role of a party in a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Caller,
    Callee,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Caller => "caller",
            NodeKind::Callee => "callee",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub id: String,
    /// Id of the caller node.
    pub source: String,
    /// Id of the callee node.
    pub target: String,
    pub label: String,
}

/// One element of the projected graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphElement {
    Node(GraphNode),
    Edge(GraphEdge),
}

impl GraphElement {
    pub fn id(&self) -> &str {
        match self {
            GraphElement::Node(node) => &node.id,
            GraphElement::Edge(edge) => &edge.id,
        }
    }
}

/// Project call logs into graph elements: every node, then every edge.
///
/// Entries without both a caller and a callee are skipped. Elements are
/// keyed by id and keep the position of their first insertion; a repeated
/// id replaces the earlier value in place (last write wins).
pub fn project(calls: &[CallLogEntry]) -> Vec<GraphElement> {
    let mut nodes: IndexMap<String, GraphNode> = IndexMap::new();
    let mut edges: IndexMap<String, GraphEdge> = IndexMap::new();

    for (index, entry) in calls.iter().enumerate() {
        let (Some(caller), Some(callee)) = (entry.caller(), entry.callee()) else {
            continue;
        };

        let key = call_key(entry, index);
        let caller_id = format!("caller-{}", key);
        let callee_id = format!("callee-{}", key);
        let edge_id = format!("edge-{}", key);

        nodes.insert(
            caller_id.clone(),
            GraphNode {
                id: caller_id.clone(),
                label: caller.to_string(),
                kind: NodeKind::Caller,
            },
        );
        nodes.insert(
            callee_id.clone(),
            GraphNode {
                id: callee_id.clone(),
                label: callee.to_string(),
                kind: NodeKind::Callee,
            },
        );
        edges.insert(
            edge_id.clone(),
            GraphEdge {
                id: edge_id,
                source: caller_id,
                target: callee_id,
                label: format!("Call {}", key),
            },
        );
    }

    nodes
        .into_values()
        .map(GraphElement::Node)
        .chain(edges.into_values().map(GraphElement::Edge))
        .collect()
}

/// Projected call graph with typed accessors for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallGraph {
    elements: Vec<GraphElement>,
}

impl CallGraph {
    /// Build the graph for a call log.
    pub fn from_calls(calls: &[CallLogEntry]) -> Self {
        Self {
            elements: project(calls),
        }
    }

    pub fn elements(&self) -> &[GraphElement] {
        &self.elements
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.elements.iter().filter_map(|e| match e {
            GraphElement::Node(node) => Some(node),
            GraphElement::Edge(_) => None,
        })
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.elements.iter().filter_map(|e| match e {
            GraphElement::Edge(edge) => Some(edge),
            GraphElement::Node(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Memoizes the projection on the identity of the call-log snapshot.
///
/// Sources replace their data `Arc` on every successful fetch, so an
/// unchanged pointer means an unchanged input.
#[derive(Debug, Default)]
pub struct GraphCache {
    input: Option<Arc<Vec<CallLogEntry>>>,
    graph: Arc<CallGraph>,
}

impl GraphCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the graph for `calls`, recomputing only when the data changed.
    pub fn get(&mut self, calls: &Arc<Vec<CallLogEntry>>) -> Arc<CallGraph> {
        let fresh = match &self.input {
            Some(prev) => Arc::ptr_eq(prev, calls),
            None => false,
        };
        if !fresh {
            self.graph = Arc::new(CallGraph::from_calls(calls));
            self.input = Some(Arc::clone(calls));
        }
        Arc::clone(&self.graph)
    }

    /// Drop the memoized graph.
    pub fn clear(&mut self) {
        self.input = None;
        self.graph = Arc::default();
    }
}

/// Evenly spaced positions on the unit circle for `n` nodes.
///
/// The first node sits at 12 o'clock and the rest follow clockwise. A
/// single node is placed at the centre.
pub fn circle_layout(n: usize) -> Vec<(f64, f64)> {
    if n == 1 {
        return vec![(0.0, 0.0)];
    }
    (0..n)
        .map(|i| {
            let angle = FRAC_PI_2 - TAU * i as f64 / n as f64;
            (angle.cos(), angle.sin())
        })
        .collect()
}
