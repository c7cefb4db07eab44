//! # Threadmill Core
//!
//! Core types and utilities for threadmill.
//! Provides the thread and tool data model, the validation error taxonomy,
//! and inch parsing/formatting helpers shared by the engine and the CLI.

pub mod data;
pub mod error;
pub mod units;

pub use data::{ThreadSpec, ToolSpec};
pub use error::{Error, Result, ThreadMillError, ThreadMillResult};
