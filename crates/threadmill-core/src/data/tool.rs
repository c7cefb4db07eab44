//! Single-pass thread mill definition.

use serde::{Deserialize, Serialize};

/// Thread mill geometry and cutting data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Cutting diameter (inches)
    pub tool_diameter: f64,
    /// Number of flutes
    pub flute_count: u32,
    /// Cutting speed in surface feet per minute
    pub surface_speed_sfm: f64,
    /// Chip load per tooth (inches)
    pub feed_per_tooth: f64,
}

impl ToolSpec {
    pub fn new(
        tool_diameter: f64,
        flute_count: u32,
        surface_speed_sfm: f64,
        feed_per_tooth: f64,
    ) -> Self {
        Self {
            tool_diameter,
            flute_count,
            surface_speed_sfm,
            feed_per_tooth,
        }
    }

    /// Cutter radius
    pub fn radius(&self) -> f64 {
        self.tool_diameter / 2.0
    }
}
