//! Synthesized thread mill program, before serialization.

use anyhow::{Context, Result};
use serde::Serialize;
use threadmill_core::{ThreadSpec, ToolSpec};

use crate::geometry::ResolvedGeometry;
use crate::passes::RadialPass;
use crate::speeds_feeds::SpeedsFeeds;
use crate::toolpath::Toolpath;

/// Everything needed to write the subprogram: inputs, derived data and the
/// finished toolpath.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub thread: ThreadSpec,
    pub tool: ToolSpec,
    pub geometry: ResolvedGeometry,
    pub passes: Vec<RadialPass>,
    /// Extra repeats of the final pass
    pub spring_passes: u32,
    pub speeds: SpeedsFeeds,
    pub toolpath: Toolpath,
}

impl Program {
    /// Absolute Z the program starts from and returns to
    pub fn clearance_z(&self) -> f64 {
        self.toolpath.start_point().z
    }

    /// Pretty-printed JSON of the whole plan
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize thread mill program")
    }
}
