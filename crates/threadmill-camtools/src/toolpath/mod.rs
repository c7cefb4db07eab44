//! Toolpath model and synthesis.
//!
//! A [`Toolpath`] is an ordered, immutable list of [`MotionSegment`]s grouped
//! into one [`PassSpan`] per executed radial pass. It can only be produced by
//! a [`ToolpathBuilder`], which appends segments and never revisits them.

use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::passes::RadialPass;

pub mod segment;
pub mod synthesizer;

pub use segment::{ArcDirection, HelixArc, LinearFeed, MotionSegment};
pub use synthesizer::{ToolpathSynthesizer, CUT_DIRECTION, LEAD_Z_FRACTION};

/// The segments belonging to one executed pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassSpan {
    pub pass: RadialPass,
    /// Repeat of the final pass at the same radius
    pub spring: bool,
    pub segments: Range<usize>,
}

/// An ordered sequence of motions starting from a known position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toolpath {
    start: Point3<f64>,
    segments: Vec<MotionSegment>,
    spans: Vec<PassSpan>,
}

impl Toolpath {
    /// Position the first segment starts from
    pub fn start_point(&self) -> Point3<f64> {
        self.start
    }

    /// Position after the last segment
    pub fn end_point(&self) -> Point3<f64> {
        self.segments
            .last()
            .map(|s| s.end_point())
            .unwrap_or(self.start)
    }

    pub fn segments(&self) -> &[MotionSegment] {
        &self.segments
    }

    pub fn spans(&self) -> &[PassSpan] {
        &self.spans
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments of the given span
    pub fn span_segments(&self, span: &PassSpan) -> &[MotionSegment] {
        &self.segments[span.segments.clone()]
    }

    /// Greatest XY distance from the thread axis reached anywhere on the path
    pub fn max_radial_distance(&self) -> f64 {
        self.segments
            .iter()
            .map(MotionSegment::max_radial_distance)
            .fold(0.0, f64::max)
    }
}

/// Appends motions to a growing toolpath, tracking the current position.
#[derive(Debug)]
pub struct ToolpathBuilder {
    start: Point3<f64>,
    position: Point3<f64>,
    segments: Vec<MotionSegment>,
    spans: Vec<PassSpan>,
    open_span: Option<(RadialPass, bool, usize)>,
}

impl ToolpathBuilder {
    /// Creates a builder with the tool parked at `start`.
    pub fn new(start: Point3<f64>) -> Self {
        Self {
            start,
            position: start,
            segments: Vec::new(),
            spans: Vec::new(),
            open_span: None,
        }
    }

    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    /// Opens a pass span. Segments pushed until [`Self::end_pass`] belong to it.
    pub fn begin_pass(&mut self, pass: RadialPass, spring: bool) -> &mut Self {
        self.end_pass();
        self.open_span = Some((pass, spring, self.segments.len()));
        self
    }

    pub fn end_pass(&mut self) -> &mut Self {
        if let Some((pass, spring, first)) = self.open_span.take() {
            self.spans.push(PassSpan {
                pass,
                spring,
                segments: first..self.segments.len(),
            });
        }
        self
    }

    /// Rapid positioning move. Zero-length moves are not recorded.
    pub fn rapid_to(&mut self, end: Point3<f64>) -> &mut Self {
        self.linear(end, LinearFeed::Rapid)
    }

    /// Feed move. Zero-length moves are not recorded.
    pub fn feed_to(&mut self, end: Point3<f64>, feed: f64) -> &mut Self {
        self.linear(end, LinearFeed::Feed(feed))
    }

    /// Helical move about `center` from the current position.
    ///
    /// Radius and start angle follow from where the tool currently is, so
    /// consecutive segments always join.
    pub fn helix(
        &mut self,
        center: Point2<f64>,
        revolutions: f64,
        end_z: f64,
        direction: ArcDirection,
        feed: f64,
    ) -> &mut Self {
        let offset = Point2::new(self.position.x, self.position.y) - center;
        let arc = HelixArc {
            center,
            radius: offset.norm(),
            start_angle: offset.y.atan2(offset.x),
            revolutions,
            start_z: self.position.z,
            end_z,
            direction,
            feed,
        };
        self.position = match arc.full_turns() {
            Some(_) => Point3::new(self.position.x, self.position.y, end_z),
            None => arc.end_point(),
        };
        self.segments.push(MotionSegment::Helix(arc));
        self
    }

    /// Closes any open span and returns the finished toolpath.
    pub fn finish(mut self) -> Toolpath {
        self.end_pass();
        Toolpath {
            start: self.start,
            segments: self.segments,
            spans: self.spans,
        }
    }

    fn linear(&mut self, end: Point3<f64>, feed: LinearFeed) -> &mut Self {
        if end != self.position {
            self.segments.push(MotionSegment::Linear {
                start: self.position,
                end,
                feed,
            });
            self.position = end;
        }
        self
    }
}
