//! Data models and derived state for the dashboard.
//!
//! ## Submodules
//!
//! - [`model`]: Wire types returned by the backend ([`CallLogEntry`], [`QosMetric`])
//! - [`graph`]: Projection of call logs into a caller/callee graph, plus the
//!   circular layout used to draw it
//! - [`duration`]: Parsing of interval strings (e.g. "3s", "500ms") and age formatting
//!
//! ## Data Flow
//!
//! ```text
//! GET /calls ──▶ Snapshot<CallLogEntry> ──┬──▶ call table (first N rows)
//!                                         │
//!                                         └──▶ GraphCache::get() ──▶ CallGraph ──▶ network panel
//!
//! GET /qos   ──▶ Snapshot<QosMetric> ─────────▶ bar chart
//! ```

pub mod duration;
pub mod graph;
pub mod model;

pub use graph::{
    call_key, circle_layout, project, CallGraph, CallKey, GraphCache, GraphEdge, GraphElement,
    GraphNode, NodeKind,
};
pub use model::{CallLogEntry, QosMetric};
