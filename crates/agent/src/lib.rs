//! Conversational agent graph
//!
//! Composes the session's tools into cooperating roles. The graph is data,
//! not behavior: an external model runtime walks it, decides when to speak,
//! when to invoke a tool, and when to follow a hand-off edge. This crate
//! guarantees the shape the runtime receives.

pub mod graph;
pub mod sales;

pub use graph::{AgentGraph, AgentNode};
pub use sales::{build_sales_graph, PRIMARY_AGENT, SPECIALIST_AGENT};

use thiserror::Error;

/// Agent graph construction errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Duplicate agent node: {0}")]
    DuplicateNode(String),

    #[error("Root node not found: {0}")]
    UnknownRoot(String),

    #[error("Hand-off from '{from}' targets unknown node '{to}'")]
    UnknownHandoffTarget { from: String, to: String },
}
