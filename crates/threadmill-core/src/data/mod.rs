//! Data models for thread milling jobs
//!
//! This module provides:
//! - Thread geometry (`ThreadSpec`)
//! - Cutter and cutting data (`ToolSpec`)

pub mod thread;
pub mod tool;

pub use thread::ThreadSpec;
pub use tool::ToolSpec;
