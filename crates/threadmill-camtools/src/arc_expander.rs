//! Helix Expander
//!
//! Converts helical moves to linear segments for controllers without helical
//! interpolation.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::toolpath::HelixArc;

/// Fewest segments a full revolution may be split into
pub const MIN_SEGMENTS_PER_REVOLUTION: u32 = 4;

/// Helix expansion configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelixExpanderConfig {
    /// Number of chords per full revolution
    pub segments_per_revolution: u32,
}

impl Default for HelixExpanderConfig {
    fn default() -> Self {
        Self {
            segments_per_revolution: 72,
        }
    }
}

/// Converts helical arcs to chord end points
#[derive(Debug)]
pub struct HelixExpander {
    config: HelixExpanderConfig,
}

impl HelixExpander {
    /// Create a new helix expander
    pub fn new(config: HelixExpanderConfig) -> Self {
        Self { config }
    }

    /// Chords to use for an arc of the given number of turns
    pub fn segment_count(&self, revolutions: f64) -> usize {
        let per_rev = self
            .config
            .segments_per_revolution
            .max(MIN_SEGMENTS_PER_REVOLUTION) as f64;
        ((revolutions * per_rev).ceil() as usize).max(1)
    }

    /// Expand an arc into chord end points, excluding the start point.
    ///
    /// The last point is the arc's exact end point and Z advances linearly
    /// with angle.
    pub fn expand(&self, arc: &HelixArc) -> Vec<Point3<f64>> {
        let count = self.segment_count(arc.revolutions);
        let mut points: Vec<Point3<f64>> = (1..count)
            .map(|i| arc.point_at(i as f64 / count as f64))
            .collect();
        points.push(arc.end_point());
        points
    }
}

impl Default for HelixExpander {
    fn default() -> Self {
        Self::new(HelixExpanderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolpath::ArcDirection;
    use nalgebra::Point2;

    fn helix(revolutions: f64) -> HelixArc {
        HelixArc {
            center: Point2::origin(),
            radius: 0.1,
            start_angle: 0.0,
            revolutions,
            start_z: 0.0,
            end_z: -0.05 * revolutions,
            direction: ArcDirection::Clockwise,
            feed: 10.0,
        }
    }

    #[test]
    fn test_full_turn_expansion() {
        let expander = HelixExpander::new(HelixExpanderConfig {
            segments_per_revolution: 8,
        });
        let points = expander.expand(&helix(1.0));
        assert_eq!(points.len(), 8);

        // Clockwise from +X: the first quarter lands on -Y
        assert!(points[1].x.abs() < 1e-12);
        assert!((points[1].y + 0.1).abs() < 1e-12);
        assert!((points[1].z + 0.0125).abs() < 1e-12);

        let last = points.last().unwrap();
        assert_eq!((last.x, last.y, last.z), (0.1, 0.0, -0.05));
    }

    #[test]
    fn test_points_stay_on_cylinder() {
        let points = HelixExpander::default().expand(&helix(3.0));
        assert_eq!(points.len(), 216);
        for p in &points {
            assert!(((p.x * p.x + p.y * p.y).sqrt() - 0.1).abs() < 1e-12);
        }
        for pair in points.windows(2) {
            assert!(pair[1].z < pair[0].z);
        }
    }

    #[test]
    fn test_quarter_turn_has_at_least_one_chord() {
        let expander = HelixExpander::new(HelixExpanderConfig {
            segments_per_revolution: 1,
        });
        assert_eq!(expander.segment_count(0.25), 1);
        assert_eq!(expander.segment_count(1.0), 4);
        assert_eq!(expander.expand(&helix(0.25)).len(), 1);
    }
}
