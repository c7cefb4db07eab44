//! # Threadmill CAM Tools
//!
//! Toolpath synthesis and subprogram emission for single-point internal
//! thread milling.
//!
//! ## Pipeline
//!
//! - **Geometry Resolver**: Validates the thread and derives pitch, radii and revolutions
//! - **Pass Planner**: Splits the radial depth into 1 to 4 passes from fixed tables
//! - **Speeds and Feeds**: Spindle speed from surface speed, feed from chip load
//! - **Toolpath Synthesizer**: Lead-in arc, helical revolutions, lead-out arc per pass
//! - **Program Emitter**: Incremental G-code subprogram in a configurable dialect
//!
//! ## Supporting Infrastructure
//!
//! - **Helix Expander**: Chord expansion for controllers without helical interpolation
//!
//! [`ThreadMillGenerator`] runs the whole pipeline.

pub mod arc_expander;
pub mod emitter;
pub mod geometry;
pub mod passes;
pub mod program;
pub mod speeds_feeds;
pub mod thread_mill;
pub mod toolpath;

// Re-export commonly used items
pub use arc_expander::{HelixExpander, HelixExpanderConfig};
pub use emitter::{Dialect, ProgramEmitter};
pub use geometry::{GeometryResolver, ResolvedGeometry};
pub use passes::{PassPlanner, PassPolicy, RadialPass};
pub use program::Program;
pub use speeds_feeds::{SpeedsFeeds, SpeedsFeedsCalculator};
pub use thread_mill::{ThreadMillGenerator, ThreadMillOptions, ThreadMillParameters};
pub use toolpath::{
    ArcDirection, HelixArc, LinearFeed, MotionSegment, PassSpan, Toolpath, ToolpathBuilder,
    ToolpathSynthesizer,
};
