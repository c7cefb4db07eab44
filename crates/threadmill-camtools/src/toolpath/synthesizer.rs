//! Toolpath Synthesizer
//!
//! Turns planned radial passes into motion. Every pass follows the same
//! sequence about the thread axis (X0 Y0):
//!
//! 1. Rapid down the axis to just above the thread start.
//! 2. Feed out to the lead circle, then a quarter-turn helical blend that
//!    meets the thread helix tangentially at `(R, 0, start_z)`.
//! 3. Whole helical revolutions of radius `R`, one pitch of Z each.
//! 4. A mirrored quarter-turn blend off the wall, then feed back to the axis.
//! 5. Rapid up the axis to the retract plane.
//!
//! Circular motion is always clockwise travelling down (a right-hand thread).
//! The finished path ends on the axis at the clearance plane.

use nalgebra::{Point2, Point3};
use threadmill_core::ToolSpec;
use tracing::debug;

use super::{ArcDirection, Toolpath, ToolpathBuilder};
use crate::geometry::ResolvedGeometry;
use crate::passes::RadialPass;
use crate::speeds_feeds::SpeedsFeeds;
use crate::thread_mill::ThreadMillOptions;

/// Interpolation direction used for every pass.
pub const CUT_DIRECTION: ArcDirection = ArcDirection::Clockwise;

/// Z travel of each quarter-turn lead arc, as a fraction of the pitch.
pub const LEAD_Z_FRACTION: f64 = 0.125;

/// Builds the toolpath for a set of radial passes.
#[derive(Debug)]
pub struct ToolpathSynthesizer<'a> {
    geometry: &'a ResolvedGeometry,
    tool: &'a ToolSpec,
    speeds: &'a SpeedsFeeds,
    options: &'a ThreadMillOptions,
}

impl<'a> ToolpathSynthesizer<'a> {
    pub fn new(
        geometry: &'a ResolvedGeometry,
        tool: &'a ToolSpec,
        speeds: &'a SpeedsFeeds,
        options: &'a ThreadMillOptions,
    ) -> Self {
        Self {
            geometry,
            tool,
            speeds,
            options,
        }
    }

    /// Z of the plane the program starts from and returns to
    pub fn clearance_z(&self) -> f64 {
        self.geometry.start_z + self.options.clearance_height
    }

    /// Z the tool retracts to between passes
    pub fn retract_z(&self) -> f64 {
        self.geometry.start_z + self.options.retract_height
    }

    /// Synthesize the complete toolpath.
    ///
    /// Inputs must already be validated; this cannot fail.
    pub fn synthesize(&self, passes: &[RadialPass]) -> Toolpath {
        let mut builder = ToolpathBuilder::new(Point3::new(0.0, 0.0, self.clearance_z()));

        for pass in passes {
            self.append_pass(&mut builder, pass, false);
        }
        if let Some(last) = passes.last() {
            for _ in 0..self.options.spring_passes {
                self.append_pass(&mut builder, last, true);
            }
        }

        builder.rapid_to(Point3::new(0.0, 0.0, self.clearance_z()));
        let toolpath = builder.finish();
        debug!(
            segments = toolpath.len(),
            spans = toolpath.spans().len(),
            "Synthesized thread toolpath"
        );
        toolpath
    }

    fn append_pass(&self, builder: &mut ToolpathBuilder, pass: &RadialPass, spring: bool) {
        let g = self.geometry;
        let radius = pass.center_radius;
        let lead_radius = radius.min(self.options.lead_in_radius);
        let lead_center = Point2::new(radius - lead_radius, 0.0);
        let lead_z = g.pitch * LEAD_Z_FRACTION;
        let revolutions = g.revolutions();

        let entry_z = g.start_z + lead_z;
        let bottom_z = g.start_z - revolutions as f64 * g.pitch;
        let exit_z = bottom_z - lead_z;

        // The lead arc starts a quarter turn before the wall contact point,
        // on the side the cutter approaches from.
        let side = -CUT_DIRECTION.sign() * lead_radius;
        let feed = if self.options.compensate_feed {
            self.speeds
                .compensated_feed(radius, self.tool.tool_diameter)
        } else {
            self.speeds.feed_rate_ipm
        };

        builder
            .begin_pass(*pass, spring)
            .rapid_to(Point3::new(0.0, 0.0, entry_z))
            .feed_to(Point3::new(lead_center.x, side, entry_z), feed)
            .helix(lead_center, 0.25, g.start_z, CUT_DIRECTION, feed)
            .helix(
                Point2::origin(),
                revolutions as f64,
                bottom_z,
                CUT_DIRECTION,
                feed,
            )
            .helix(lead_center, 0.25, exit_z, CUT_DIRECTION, feed)
            .feed_to(Point3::new(0.0, 0.0, exit_z), self.options.traverse_feed)
            .rapid_to(Point3::new(0.0, 0.0, self.retract_z()))
            .end_pass();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::{PassPlanner, PassPolicy};
    use crate::toolpath::{LinearFeed, MotionSegment};

    fn fixture() -> (ResolvedGeometry, ToolSpec, SpeedsFeeds) {
        let geometry = ResolvedGeometry {
            pitch: 0.05,
            thread_depth: 0.031,
            minor_radius: 0.219,
            start_z: 0.0,
            axial_length: 0.031,
        };
        let tool = ToolSpec::new(0.25, 4, 300.0, 0.001);
        let speeds = SpeedsFeeds {
            spindle_rpm: 4583.66,
            feed_rate_ipm: 18.33,
        };
        (geometry, tool, speeds)
    }

    #[test]
    fn test_single_pass_sequence() {
        let (geometry, tool, speeds) = fixture();
        let options = ThreadMillOptions::default();
        let passes = PassPlanner::plan(&PassPolicy::new(1).unwrap(), &geometry, 0.25);
        let synth = ToolpathSynthesizer::new(&geometry, &tool, &speeds, &options);
        let toolpath = synth.synthesize(&passes);

        // rapid, feed, lead-in, helix, lead-out, feed, retract, return
        assert_eq!(toolpath.len(), 8);
        assert_eq!(toolpath.spans().len(), 1);
        assert_eq!(toolpath.spans()[0].segments, 0..7);

        let kinds: Vec<bool> = toolpath
            .segments()
            .iter()
            .map(|s| matches!(s, MotionSegment::Helix(_)))
            .collect();
        assert_eq!(kinds, [false, false, true, true, true, false, false, false]);

        match toolpath.segments()[3] {
            MotionSegment::Helix(arc) => {
                assert_eq!(arc.full_turns(), Some(1));
                assert!((arc.radius - 0.094).abs() < 1e-9);
                assert_eq!(arc.direction, ArcDirection::Clockwise);
                assert!((arc.start_z - 0.0).abs() < 1e-12);
                assert!((arc.end_z + 0.05).abs() < 1e-12);
            }
            _ => panic!("expected the thread helix"),
        }

        let end = toolpath.end_point();
        assert_eq!((end.x, end.y), (0.0, 0.0));
        assert!((end.z - synth.clearance_z()).abs() < 1e-12);
    }

    #[test]
    fn test_lead_in_is_tangent_to_thread_helix() {
        let (geometry, tool, speeds) = fixture();
        let options = ThreadMillOptions::default();
        let passes = PassPlanner::plan(&PassPolicy::new(1).unwrap(), &geometry, 0.25);
        let toolpath = ToolpathSynthesizer::new(&geometry, &tool, &speeds, &options)
            .synthesize(&passes);

        let (lead, helix) = match (toolpath.segments()[2], toolpath.segments()[3]) {
            (MotionSegment::Helix(a), MotionSegment::Helix(b)) => (a, b),
            _ => panic!("expected lead-in followed by helix"),
        };
        // Both arcs have their centers on the X axis and meet at (R, 0), so
        // their tangents there are both along -Y for clockwise motion.
        let contact = lead.end_point();
        assert!((contact.x - helix.radius).abs() < 1e-12);
        assert!(contact.y.abs() < 1e-12);
        assert!(lead.center.y.abs() < 1e-12 && lead.center.x < helix.radius);
        assert!((lead.radius - options.lead_in_radius).abs() < 1e-12);
    }

    #[test]
    fn test_lead_radius_limited_by_path_radius() {
        let (geometry, tool, speeds) = fixture();
        let options = ThreadMillOptions {
            lead_in_radius: 1.0,
            ..ThreadMillOptions::default()
        };
        let passes = PassPlanner::plan(&PassPolicy::new(1).unwrap(), &geometry, 0.25);
        let toolpath = ToolpathSynthesizer::new(&geometry, &tool, &speeds, &options)
            .synthesize(&passes);
        match toolpath.segments()[2] {
            MotionSegment::Helix(lead) => assert!((lead.radius - 0.094).abs() < 1e-9),
            _ => panic!("expected lead-in arc"),
        }
    }

    #[test]
    fn test_spring_passes_repeat_final_radius() {
        let (geometry, tool, speeds) = fixture();
        let options = ThreadMillOptions {
            spring_passes: 2,
            ..ThreadMillOptions::default()
        };
        let passes = PassPlanner::plan(&PassPolicy::new(2).unwrap(), &geometry, 0.25);
        let toolpath = ToolpathSynthesizer::new(&geometry, &tool, &speeds, &options)
            .synthesize(&passes);

        let spans = toolpath.spans();
        assert_eq!(spans.len(), 4);
        assert_eq!(
            spans.iter().map(|s| s.spring).collect::<Vec<_>>(),
            [false, false, true, true]
        );
        assert_eq!(spans[3].pass.center_radius, spans[1].pass.center_radius);
    }

    #[test]
    fn test_feed_modes() {
        let (geometry, tool, speeds) = fixture();
        let options = ThreadMillOptions {
            compensate_feed: false,
            ..ThreadMillOptions::default()
        };
        let passes = PassPlanner::plan(&PassPolicy::new(1).unwrap(), &geometry, 0.25);
        let toolpath = ToolpathSynthesizer::new(&geometry, &tool, &speeds, &options)
            .synthesize(&passes);

        for segment in toolpath.segments() {
            match segment {
                MotionSegment::Helix(arc) => assert_eq!(arc.feed, 18.33),
                MotionSegment::Linear {
                    feed: LinearFeed::Feed(f),
                    ..
                } => assert!(*f == 18.33 || *f == options.traverse_feed),
                MotionSegment::Linear { .. } => {}
            }
        }
    }
}
