//! Pass Planner
//!
//! Splits the radial thread depth across one to four passes using fixed
//! percentage tables. The tables front-load the chip so side pressure on the
//! cutter stays roughly even as engagement grows.

use serde::{Deserialize, Serialize};
use threadmill_core::{ThreadMillError, ThreadMillResult};
use tracing::debug;

use crate::geometry::ResolvedGeometry;

/// Radial depth split in percent, indexed by pass count - 1
const PASS_TABLES: [&[u32]; 4] = [&[100], &[65, 35], &[50, 30, 20], &[40, 27, 20, 13]];

/// Number of radial passes, restricted to the published tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassPolicy {
    count: u8,
}

impl PassPolicy {
    /// Creates a policy for `count` passes.
    pub fn new(count: i64) -> ThreadMillResult<Self> {
        match count {
            1..=4 => Ok(Self { count: count as u8 }),
            _ => Err(ThreadMillError::InvalidPassCount { count }),
        }
    }

    pub fn count(&self) -> usize {
        self.count as usize
    }

    /// Percentages for this policy, largest first. Always sums to 100.
    pub fn percentages(&self) -> &'static [u32] {
        PASS_TABLES[self.count as usize - 1]
    }
}

/// One radial traversal of the full thread length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialPass {
    /// Zero-based pass number
    pub index: usize,
    /// Share of the radial depth removed by this pass
    pub fraction: f64,
    /// Share of the radial depth removed up to and including this pass
    pub cumulative_fraction: f64,
    /// Cutter-center radius about the thread axis
    pub center_radius: f64,
}

/// Expands a pass policy into absolute cutter-center radii
#[derive(Debug)]
pub struct PassPlanner;

impl PassPlanner {
    /// Plan the radial passes for a tool of the given diameter.
    ///
    /// The first pass sits closest to the major-diameter wall and each
    /// following pass steps inward; the last pass lands exactly on
    /// `minor_radius - tool_diameter / 2`.
    pub fn plan(
        policy: &PassPolicy,
        geometry: &ResolvedGeometry,
        tool_diameter: f64,
    ) -> Vec<RadialPass> {
        let floor = geometry.floor_radius(tool_diameter);
        let mut cumulative = 0u32;

        let passes: Vec<RadialPass> = policy
            .percentages()
            .iter()
            .enumerate()
            .map(|(index, &percent)| {
                cumulative += percent;
                let remaining = 100 - cumulative;
                RadialPass {
                    index,
                    fraction: percent as f64 / 100.0,
                    cumulative_fraction: cumulative as f64 / 100.0,
                    center_radius: floor + geometry.thread_depth * remaining as f64 / 100.0,
                }
            })
            .collect();

        debug!(
            radii = ?passes.iter().map(|p| p.center_radius).collect::<Vec<_>>(),
            "Planned radial passes"
        );
        passes
    }
}
