//! Toolpath segment types and data structures.

use nalgebra::{Point2, Point3, Vector2};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Rotational sense of circular interpolation, viewed from +Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcDirection {
    Clockwise,
    CounterClockwise,
}

impl ArcDirection {
    /// +1 for counter-clockwise, -1 for clockwise
    pub fn sign(&self) -> f64 {
        match self {
            ArcDirection::Clockwise => -1.0,
            ArcDirection::CounterClockwise => 1.0,
        }
    }
}

/// Feed mode of a straight move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LinearFeed {
    /// Positioning at machine rapid rate
    Rapid,
    /// Interpolated at the given feed (inches per minute)
    Feed(f64),
}

/// Circular interpolation about an axis parallel to Z, with linear Z travel.
///
/// A quarter-turn lead arc and a multi-revolution thread helix are both
/// represented here; `revolutions` may be fractional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HelixArc {
    pub center: Point2<f64>,
    pub radius: f64,
    /// Angle of the start point about `center`, radians
    pub start_angle: f64,
    /// Turns swept, always positive
    pub revolutions: f64,
    pub start_z: f64,
    pub end_z: f64,
    pub direction: ArcDirection,
    /// Feed rate (inches per minute)
    pub feed: f64,
}

impl HelixArc {
    /// Signed swept angle in radians
    pub fn sweep(&self) -> f64 {
        self.direction.sign() * self.revolutions * TAU
    }

    /// Point at parameter `t` in `[0, 1]` along the arc
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        let angle = self.start_angle + self.sweep() * t;
        Point3::new(
            self.center.x + self.radius * angle.cos(),
            self.center.y + self.radius * angle.sin(),
            self.start_z + (self.end_z - self.start_z) * t,
        )
    }

    pub fn start_point(&self) -> Point3<f64> {
        self.point_at(0.0)
    }

    /// End point. Whole-turn helices end exactly above or below their start.
    pub fn end_point(&self) -> Point3<f64> {
        match self.full_turns() {
            Some(_) => {
                let start = self.start_point();
                Point3::new(start.x, start.y, self.end_z)
            }
            None => self.point_at(1.0),
        }
    }

    /// Number of whole revolutions, if this arc closes on itself in XY
    pub fn full_turns(&self) -> Option<u32> {
        let rounded = self.revolutions.round();
        if rounded >= 1.0 && (self.revolutions - rounded).abs() < 1e-9 {
            Some(rounded as u32)
        } else {
            None
        }
    }

    /// Z travel per revolution
    pub fn lead(&self) -> f64 {
        (self.end_z - self.start_z) / self.revolutions
    }

    /// Greatest XY distance from `axis` reached anywhere on the arc
    pub fn max_distance_from(&self, axis: Point2<f64>) -> f64 {
        let offset: Vector2<f64> = self.center - axis;
        let distance = offset.norm();
        if distance < 1e-12 {
            return self.radius;
        }
        if self.revolutions >= 1.0 {
            return distance + self.radius;
        }

        // The farthest point faces directly away from the axis; check whether
        // the sweep passes through that angle.
        let far_angle = offset.y.atan2(offset.x);
        let travelled = match self.direction {
            ArcDirection::CounterClockwise => far_angle - self.start_angle,
            ArcDirection::Clockwise => self.start_angle - far_angle,
        }
        .rem_euclid(TAU);
        if travelled <= self.revolutions * TAU + 1e-12 {
            return distance + self.radius;
        }

        let start = self.start_point();
        let end = self.point_at(1.0);
        let start_distance = (Point2::new(start.x, start.y) - axis).norm();
        let end_distance = (Point2::new(end.x, end.y) - axis).norm();
        start_distance.max(end_distance)
    }
}

/// A single motion of the toolpath.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MotionSegment {
    Linear {
        start: Point3<f64>,
        end: Point3<f64>,
        feed: LinearFeed,
    },
    Helix(HelixArc),
}

impl MotionSegment {
    pub fn start_point(&self) -> Point3<f64> {
        match self {
            MotionSegment::Linear { start, .. } => *start,
            MotionSegment::Helix(arc) => arc.start_point(),
        }
    }

    pub fn end_point(&self) -> Point3<f64> {
        match self {
            MotionSegment::Linear { end, .. } => *end,
            MotionSegment::Helix(arc) => arc.end_point(),
        }
    }

    pub fn is_rapid(&self) -> bool {
        matches!(
            self,
            MotionSegment::Linear {
                feed: LinearFeed::Rapid,
                ..
            }
        )
    }

    /// Greatest XY distance from the thread axis (X0 Y0) reached by this move
    pub fn max_radial_distance(&self) -> f64 {
        let axis = Point2::origin();
        match self {
            // Distance along a line is convex, so an endpoint is the maximum
            MotionSegment::Linear { start, end, .. } => {
                let a = (Point2::new(start.x, start.y) - axis).norm();
                let b = (Point2::new(end.x, end.y) - axis).norm();
                a.max(b)
            }
            MotionSegment::Helix(arc) => arc.max_distance_from(axis),
        }
    }
}
