//! Thread Mill Generator
//!
//! Entry point of the engine. Validates all inputs up front, then resolves
//! geometry, plans radial passes, derives speeds and feeds, synthesizes the
//! toolpath and hands it to the emitter. The same inputs always produce the
//! same program.

use serde::{Deserialize, Serialize};
use std::path::Path;
use threadmill_core::{Result, ThreadMillError, ThreadMillResult, ThreadSpec, ToolSpec};
use tracing::{debug, info};

use crate::emitter::{Dialect, ProgramEmitter};
use crate::geometry::GeometryResolver;
use crate::passes::{PassPlanner, PassPolicy};
use crate::program::Program;
use crate::speeds_feeds::SpeedsFeedsCalculator;
use crate::toolpath::ToolpathSynthesizer;

/// Machining options that are not part of the thread or tool definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadMillOptions {
    /// Allowed difference between `thread_depth` and `(major - minor) / 2`
    pub depth_tolerance: f64,
    /// Height above `start_z` the program starts from and ends at
    pub clearance_height: f64,
    /// Height above `start_z` the tool returns to between passes
    pub retract_height: f64,
    /// Largest radius of the quarter-turn entry and exit arcs
    pub lead_in_radius: f64,
    /// Feed for the move from the exit arc back to the axis (inches per minute)
    pub traverse_feed: f64,
    /// Scale cutting feed so chip load holds at the cutting edge
    pub compensate_feed: bool,
    /// Repeats of the final pass at the same radius
    pub spring_passes: u32,
    /// Machine spindle limit; higher computed speeds are rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_spindle_rpm: Option<f64>,
}

impl Default for ThreadMillOptions {
    fn default() -> Self {
        Self {
            depth_tolerance: 0.002,
            clearance_height: 0.25,
            retract_height: 0.1,
            lead_in_radius: 0.05,
            traverse_feed: 15.0,
            compensate_feed: true,
            spring_passes: 0,
            max_spindle_rpm: None,
        }
    }
}

impl ThreadMillOptions {
    /// Check the options for values no toolpath can be built from.
    pub fn validate(&self) -> ThreadMillResult<()> {
        let positive = [
            ("depth_tolerance", self.depth_tolerance),
            ("clearance_height", self.clearance_height),
            ("retract_height", self.retract_height),
            ("lead_in_radius", self.lead_in_radius),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ThreadMillError::geometry(
                    field,
                    format!("must be > 0, got {}", value),
                ));
            }
        }
        if self.retract_height > self.clearance_height {
            return Err(ThreadMillError::geometry(
                "retract_height",
                format!(
                    "must not exceed clearance_height ({} > {})",
                    self.retract_height, self.clearance_height
                ),
            ));
        }
        if !self.traverse_feed.is_finite() || self.traverse_feed <= 0.0 {
            return Err(ThreadMillError::speed_feed("traverse_feed", "must be > 0"));
        }
        if let Some(limit) = self.max_spindle_rpm {
            if !limit.is_finite() || limit <= 0.0 {
                return Err(ThreadMillError::speed_feed("max_spindle_rpm", "must be > 0"));
            }
        }
        Ok(())
    }
}

/// Parameters for the Thread Mill generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMillParameters {
    pub thread: ThreadSpec,
    pub tool: ToolSpec,
    /// Radial passes, 1 to 4
    pub pass_count: i64,
}

/// Generator for thread milling subprograms
#[derive(Debug, Clone)]
pub struct ThreadMillGenerator {
    params: ThreadMillParameters,
    options: ThreadMillOptions,
    dialect: Dialect,
}

impl ThreadMillGenerator {
    /// Create a generator with default options and dialect
    pub fn new(params: ThreadMillParameters) -> Self {
        Self {
            params,
            options: ThreadMillOptions::default(),
            dialect: Dialect::default(),
        }
    }

    pub fn with_options(mut self, options: ThreadMillOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Validate the inputs and synthesize the program without serializing it.
    ///
    /// Every check runs before any toolpath is built; the first violation is
    /// returned.
    pub fn plan(&self) -> ThreadMillResult<Program> {
        let p = &self.params;
        self.options.validate()?;
        let geometry = GeometryResolver::resolve(&p.thread, self.options.depth_tolerance)?;
        GeometryResolver::check_tool(&p.tool, &geometry)?;
        let policy = PassPolicy::new(p.pass_count)?;
        let speeds = SpeedsFeedsCalculator::calculate(&p.tool, self.options.max_spindle_rpm)?;

        let passes = PassPlanner::plan(&policy, &geometry, p.tool.tool_diameter);
        let toolpath = ToolpathSynthesizer::new(&geometry, &p.tool, &speeds, &self.options)
            .synthesize(&passes);

        Ok(Program {
            thread: p.thread,
            tool: p.tool,
            geometry,
            passes,
            spring_passes: self.options.spring_passes,
            speeds,
            toolpath,
        })
    }

    /// Generate the subprogram text
    pub fn generate(&self) -> ThreadMillResult<String> {
        let program = self.plan()?;
        let text = ProgramEmitter::new(self.dialect.clone()).emit(&program);
        info!(
            program_number = self.dialect.program_number,
            passes = program.passes.len(),
            spring_passes = program.spring_passes,
            revolutions = program.geometry.revolutions(),
            spindle_rpm = program.speeds.spindle_rpm.round(),
            lines = text.lines().count(),
            "Generated thread mill program"
        );
        Ok(text)
    }

    /// Generate the subprogram and write it to `path`
    pub fn generate_to_file(&self, path: &Path) -> Result<()> {
        let text = self.generate()?;
        std::fs::write(path, text)?;
        debug!(path = %path.display(), "Wrote thread mill program");
        Ok(())
    }
}
