//! Core traits and types for the voice sales agent
//!
//! This crate provides foundational types used across all other crates:
//! - Error types
//! - Customer profile data
//! - The readiness gate shared by the session and its tools
//! - Caller-facing session event callbacks
//! - The termination requestor tools use to end a call

pub mod error;
pub mod events;
pub mod gate;
pub mod profile;
pub mod termination;

pub use error::{Error, Result};
pub use events::SessionEvents;
pub use gate::{ReadinessGate, ReadinessSignal};
pub use profile::PersonalData;
pub use termination::TerminationRequestor;
