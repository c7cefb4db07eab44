//! Geometry Resolver
//!
//! Converts raw thread inputs into the resolved values the rest of the engine
//! works from, and checks the cutter against that geometry.

use serde::{Deserialize, Serialize};
use threadmill_core::{ThreadMillError, ThreadMillResult, ThreadSpec, ToolSpec};
use tracing::debug;

/// Thread geometry after validation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGeometry {
    /// Axial advance per revolution
    pub pitch: f64,
    /// Radial thread depth
    pub thread_depth: f64,
    /// Half the minor diameter
    pub minor_radius: f64,
    /// Z of the top of the threaded section
    pub start_z: f64,
    /// Axial span the helix covers
    pub axial_length: f64,
}

impl ResolvedGeometry {
    /// Cutter-center radius at full engagement for a tool of the given diameter
    pub fn floor_radius(&self, tool_diameter: f64) -> f64 {
        self.minor_radius - tool_diameter / 2.0
    }

    /// Largest cutter-center radius that stays inside the major diameter wall
    pub fn wall_radius(&self, tool_diameter: f64) -> f64 {
        self.floor_radius(tool_diameter) + self.thread_depth
    }

    /// Whole helical revolutions needed to cover the axial span
    pub fn revolutions(&self) -> u32 {
        // A hair below an exact multiple of the pitch must not add a revolution
        let turns = (self.axial_length / self.pitch - 1e-9).ceil();
        turns.max(1.0) as u32
    }
}

/// Validates thread and tool inputs
#[derive(Debug)]
pub struct GeometryResolver;

impl GeometryResolver {
    /// Resolve and validate a thread specification
    ///
    /// `depth_tolerance` bounds the allowed disagreement between
    /// `thread_depth` and `(major_diameter - minor_diameter) / 2`.
    pub fn resolve(
        thread: &ThreadSpec,
        depth_tolerance: f64,
    ) -> ThreadMillResult<ResolvedGeometry> {
        require_positive("major_diameter", thread.major_diameter)?;
        require_positive("minor_diameter", thread.minor_diameter)?;
        require_positive("thread_depth", thread.thread_depth)?;
        require_positive("threads_per_inch", thread.threads_per_inch)?;
        if !thread.start_z.is_finite() {
            return Err(ThreadMillError::geometry("start_z", "must be a finite number"));
        }
        if let Some(length) = thread.thread_length {
            require_positive("thread_length", length)?;
        }

        if thread.minor_diameter >= thread.major_diameter {
            return Err(ThreadMillError::geometry(
                "minor_diameter",
                format!(
                    "must be less than major_diameter ({} >= {})",
                    thread.minor_diameter, thread.major_diameter
                ),
            ));
        }

        let nominal = thread.nominal_depth();
        if (thread.thread_depth - nominal).abs() > depth_tolerance {
            return Err(ThreadMillError::geometry(
                "thread_depth",
                format!(
                    "must be within {} of (major_diameter - minor_diameter) / 2 = {:.4}, got {}",
                    depth_tolerance, nominal, thread.thread_depth
                ),
            ));
        }

        let resolved = ResolvedGeometry {
            pitch: thread.pitch(),
            thread_depth: thread.thread_depth,
            minor_radius: thread.minor_diameter / 2.0,
            start_z: thread.start_z,
            axial_length: thread.axial_length(),
        };
        debug!(
            pitch = resolved.pitch,
            minor_radius = resolved.minor_radius,
            revolutions = resolved.revolutions(),
            "Resolved thread geometry"
        );
        Ok(resolved)
    }

    /// Check that the cutter fits the thread and has usable cutting data
    pub fn check_tool(tool: &ToolSpec, geometry: &ResolvedGeometry) -> ThreadMillResult<()> {
        if !tool.tool_diameter.is_finite() || tool.tool_diameter <= 0.0 {
            return Err(ThreadMillError::tool("tool_diameter", "must be > 0"));
        }
        let minor_diameter = geometry.minor_radius * 2.0;
        if tool.tool_diameter >= minor_diameter {
            return Err(ThreadMillError::tool(
                "tool_diameter",
                format!(
                    "must be less than minor_diameter ({} >= {})",
                    tool.tool_diameter, minor_diameter
                ),
            ));
        }
        if tool.flute_count == 0 {
            return Err(ThreadMillError::tool("flute_count", "must be > 0"));
        }
        if !tool.surface_speed_sfm.is_finite() || tool.surface_speed_sfm <= 0.0 {
            return Err(ThreadMillError::tool("surface_speed_sfm", "must be > 0"));
        }
        if !tool.feed_per_tooth.is_finite() || tool.feed_per_tooth <= 0.0 {
            return Err(ThreadMillError::tool("feed_per_tooth", "must be > 0"));
        }
        Ok(())
    }
}

fn require_positive(field: &str, value: f64) -> ThreadMillResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ThreadMillError::geometry(field, format!("must be > 0, got {}", value)))
    }
}
