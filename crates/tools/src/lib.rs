//! Tools for the voice sales agent
//!
//! Defines the callable surface the conversational runtime may invoke
//! during a call. Every tool validates its input against a declared schema
//! and awaits the session readiness gate before producing any externally
//! visible effect. Tool failures are contained: they come back to the
//! runtime as failure text, never as a dropped session.

pub mod mcp;
pub mod registry;
pub mod sales;

pub use mcp::{ErrorCode, InputSchema, PropertySchema, Tool, ToolError, ToolOutput, ToolSchema};
pub use registry::ToolRegistry;
pub use sales::{build_toolset, SalesToolset, ToolContext};

impl From<ToolError> for voice_sales_core::Error {
    fn from(err: ToolError) -> Self {
        match err.code {
            ErrorCode::InvalidParams => voice_sales_core::Error::Validation(err.message),
            _ => voice_sales_core::Error::Tool(err.message),
        }
    }
}
