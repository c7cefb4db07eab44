//! Speeds and Feeds Calculator
//!
//! Derives spindle speed from surface speed and cutter diameter, and the
//! programmed feed from chip load, flute count and spindle speed.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use threadmill_core::{ThreadMillError, ThreadMillResult, ToolSpec};
use tracing::{debug, warn};

/// Derived cutting data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeedsFeeds {
    /// Spindle speed in revolutions per minute
    pub spindle_rpm: f64,
    /// Feed rate at the cutter center in inches per minute
    pub feed_rate_ipm: f64,
}

impl SpeedsFeeds {
    /// Feed that keeps the requested chip load at the cutting edge on an
    /// internal circular path of the given center radius.
    ///
    /// The controller applies feed at the tool center. Inside a bore the edge
    /// travels the larger circle `R + D/2`, so the center feed is scaled by
    /// `2R / (2R + D)`.
    pub fn compensated_feed(&self, center_radius: f64, tool_diameter: f64) -> f64 {
        let path = center_radius * 2.0;
        let feed = self.feed_rate_ipm * path / (path + tool_diameter);
        if feed < self.feed_rate_ipm * 0.5 {
            warn!(
                center_radius,
                base_feed = self.feed_rate_ipm,
                compensated_feed = feed,
                "Feed compensation more than halves the cutting feed"
            );
        }
        feed
    }
}

/// Calculates spindle speed and feed rate for a thread mill
#[derive(Debug)]
pub struct SpeedsFeedsCalculator;

impl SpeedsFeedsCalculator {
    /// Inches per foot, used to turn surface feet into spindle revolutions
    const INCHES_PER_FOOT: f64 = 12.0;

    /// Calculate speeds and feeds for a validated tool
    ///
    /// `max_spindle_rpm` is the machine's spindle limit, if known. Exceeding it
    /// is reported rather than clamped.
    pub fn calculate(
        tool: &ToolSpec,
        max_spindle_rpm: Option<f64>,
    ) -> ThreadMillResult<SpeedsFeeds> {
        if !tool.tool_diameter.is_finite() || tool.tool_diameter <= 0.0 {
            return Err(ThreadMillError::speed_feed(
                "tool_diameter",
                "must be > 0 to derive spindle speed",
            ));
        }

        let spindle_rpm =
            tool.surface_speed_sfm * Self::INCHES_PER_FOOT / (PI * tool.tool_diameter);
        if !spindle_rpm.is_finite() || spindle_rpm <= 0.0 {
            return Err(ThreadMillError::speed_feed(
                "spindle_rpm",
                format!("must be a positive finite value, got {}", spindle_rpm),
            ));
        }
        if let Some(limit) = max_spindle_rpm {
            if spindle_rpm > limit {
                return Err(ThreadMillError::speed_feed(
                    "spindle_rpm",
                    format!("{:.0} exceeds the machine limit of {:.0}", spindle_rpm, limit),
                ));
            }
        }

        let feed_rate_ipm = spindle_rpm * tool.flute_count as f64 * tool.feed_per_tooth;
        if !feed_rate_ipm.is_finite() || feed_rate_ipm <= 0.0 {
            return Err(ThreadMillError::speed_feed(
                "feed_rate_ipm",
                format!("must be a positive finite value, got {}", feed_rate_ipm),
            ));
        }

        debug!(spindle_rpm, feed_rate_ipm, "Derived speeds and feeds");
        Ok(SpeedsFeeds {
            spindle_rpm,
            feed_rate_ipm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_inch_cutter() {
        let tool = ToolSpec::new(0.25, 4, 300.0, 0.001);
        let result = SpeedsFeedsCalculator::calculate(&tool, None).unwrap();
        assert_eq!(result.spindle_rpm.round(), 4584.0);
        assert!((result.feed_rate_ipm - 18.33).abs() < 0.01);
    }

    #[test]
    fn test_degenerate_inputs() {
        let tool = ToolSpec::new(0.0, 4, 300.0, 0.001);
        let err = SpeedsFeedsCalculator::calculate(&tool, None).unwrap_err();
        assert!(matches!(err, ThreadMillError::InvalidSpeedFeed { .. }));

        let tool = ToolSpec::new(0.25, 4, 0.0, 0.001);
        let err = SpeedsFeedsCalculator::calculate(&tool, None).unwrap_err();
        assert_eq!(err.field(), Some("spindle_rpm"));

        let tool = ToolSpec::new(0.25, 4, f64::MAX, 0.001);
        assert!(SpeedsFeedsCalculator::calculate(&tool, None).is_err());
    }

    #[test]
    fn test_spindle_limit() {
        let tool = ToolSpec::new(0.25, 4, 300.0, 0.001);
        let err = SpeedsFeedsCalculator::calculate(&tool, Some(4000.0)).unwrap_err();
        assert_eq!(err.field(), Some("spindle_rpm"));
        assert!(SpeedsFeedsCalculator::calculate(&tool, Some(6000.0)).is_ok());
    }

    #[test]
    fn test_compensated_feed() {
        let speeds = SpeedsFeeds {
            spindle_rpm: 4000.0,
            feed_rate_ipm: 20.0,
        };
        // 2R = 0.25, D = 0.25 -> half the base feed
        assert!((speeds.compensated_feed(0.125, 0.25) - 10.0).abs() < 1e-12);
        assert!(speeds.compensated_feed(1.0, 0.25) < 20.0);
    }
}
