//! Program Emitter
//!
//! Serializes a [`Program`] into a callable subprogram. The body is written in
//! incremental mode so the subprogram can be called over any hole: the caller
//! positions the spindle over the thread axis and the program never moves in
//! absolute X or Y.
//!
//! Incremental words are differences of coordinates quantized to the output
//! precision, so the rounded moves always sum to the rounded absolute
//! displacement and no drift builds up over many revolutions.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use threadmill_core::units::{format_fixed, format_quantized, quantize};

use crate::arc_expander::{HelixExpander, HelixExpanderConfig};
use crate::program::Program;
use crate::toolpath::{ArcDirection, HelixArc, LinearFeed, MotionSegment, PassSpan};

/// Controller dialect for the emitted program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dialect {
    /// Subprogram number following the program prefix
    pub program_number: u32,
    pub program_prefix: String,
    /// Written on the first and last line; empty to omit
    pub tape_marker: String,
    pub inch_units: String,
    pub plane_select: String,
    pub absolute_mode: String,
    pub incremental_mode: String,
    pub rapid: String,
    pub linear: String,
    pub arc_clockwise: String,
    pub arc_counter_clockwise: String,
    pub spindle_on: String,
    pub subprogram_return: String,
    /// Decimals for X, Y, Z, I and J words (1 to 6)
    pub coordinate_decimals: u32,
    /// Decimals for F words (1 to 6)
    pub feed_decimals: u32,
    pub comments: bool,
    pub line_numbers: bool,
    pub line_number_increment: u32,
    /// Use circular interpolation with Z; otherwise helices become G1 chords
    pub helical_arcs: bool,
    /// Chords per revolution when `helical_arcs` is off
    pub segments_per_revolution: u32,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            program_number: 1000,
            program_prefix: "O".to_string(),
            tape_marker: "%".to_string(),
            inch_units: "G20".to_string(),
            plane_select: "G17".to_string(),
            absolute_mode: "G90".to_string(),
            incremental_mode: "G91".to_string(),
            rapid: "G0".to_string(),
            linear: "G1".to_string(),
            arc_clockwise: "G2".to_string(),
            arc_counter_clockwise: "G3".to_string(),
            spindle_on: "M3".to_string(),
            subprogram_return: "M99".to_string(),
            coordinate_decimals: 4,
            feed_decimals: 2,
            comments: true,
            line_numbers: false,
            line_number_increment: 10,
            helical_arcs: true,
            segments_per_revolution: 72,
        }
    }
}

impl Dialect {
    /// Highest supported number of decimals
    pub const MAX_DECIMALS: u32 = 6;

    fn coordinate_decimals(&self) -> u32 {
        self.coordinate_decimals.clamp(1, Self::MAX_DECIMALS)
    }

    fn feed_decimals(&self) -> u32 {
        self.feed_decimals.clamp(1, Self::MAX_DECIMALS)
    }
}

/// Writes programs in a given dialect
#[derive(Debug, Clone, Default)]
pub struct ProgramEmitter {
    dialect: Dialect,
}

impl ProgramEmitter {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Emit the complete subprogram text. Output is identical for identical
    /// input.
    pub fn emit(&self, program: &Program) -> String {
        let mut writer = BlockWriter::new(&self.dialect, program.toolpath.start_point());
        self.write_header(&mut writer, program);
        self.write_body(&mut writer, program);
        self.write_footer(&mut writer);
        writer.finish()
    }

    fn write_header(&self, w: &mut BlockWriter, program: &Program) {
        let d = &self.dialect;
        let places = d.coordinate_decimals();
        let thread = &program.thread;
        let tool = &program.tool;

        if !d.tape_marker.is_empty() {
            w.raw(&d.tape_marker);
        }
        let mut title = format!("{}{:04}", d.program_prefix, d.program_number);
        if d.comments {
            title.push_str(&format!(
                " (THREAD MILL {} X {} TPI)",
                format_fixed(thread.major_diameter, places),
                thread.threads_per_inch
            ));
        }
        w.raw(&title);

        w.comment(&format!(
            "MAJOR DIA {} MINOR DIA {}",
            format_fixed(thread.major_diameter, places),
            format_fixed(thread.minor_diameter, places)
        ));
        w.comment(&format!(
            "THREAD DEPTH {} LENGTH {} PITCH {}",
            format_fixed(thread.thread_depth, places),
            format_fixed(program.geometry.axial_length, places),
            format_fixed(program.geometry.pitch, places)
        ));
        w.comment(&format!(
            "TOOL DIA {} FLUTES {} SFM {} FPT {}",
            format_fixed(tool.tool_diameter, places),
            tool.flute_count,
            tool.surface_speed_sfm,
            format_fixed(tool.feed_per_tooth, places)
        ));
        w.comment(&format!(
            "RADIAL PASSES {} SPRING PASSES {} REVS {}",
            program.passes.len(),
            program.spring_passes,
            program.geometry.revolutions()
        ));

        w.block(&format!("{} {}", d.inch_units, d.plane_select));
        w.block(&format!("S{:.0} {}", program.speeds.spindle_rpm, d.spindle_on));
        w.block(&format!(
            "{} {} Z{}",
            d.absolute_mode,
            d.rapid,
            format_fixed(program.clearance_z(), places)
        ));
        w.block(&d.incremental_mode);
    }

    fn write_body(&self, w: &mut BlockWriter, program: &Program) {
        let toolpath = &program.toolpath;
        let mut spans = toolpath.spans().iter().peekable();
        let expander = HelixExpander::new(HelixExpanderConfig {
            segments_per_revolution: self.dialect.segments_per_revolution,
        });

        for (index, segment) in toolpath.segments().iter().enumerate() {
            if let Some(span) = spans.next_if(|s| s.segments.start == index) {
                w.comment(&self.span_comment(span));
            }
            match segment {
                MotionSegment::Linear { end, feed, .. } => w.linear(*end, *feed),
                MotionSegment::Helix(arc) if self.dialect.helical_arcs => w.helix(arc),
                MotionSegment::Helix(arc) => {
                    for point in expander.expand(arc) {
                        w.linear(point, LinearFeed::Feed(arc.feed));
                    }
                }
            }
        }
    }

    fn write_footer(&self, w: &mut BlockWriter) {
        let d = &self.dialect;
        w.block(&d.absolute_mode);
        w.block(&d.subprogram_return);
        if !d.tape_marker.is_empty() {
            w.raw(&d.tape_marker);
        }
    }

    fn span_comment(&self, span: &PassSpan) -> String {
        let radius = format_fixed(span.pass.center_radius, self.dialect.coordinate_decimals());
        if span.spring {
            format!("SPRING PASS R{}", radius)
        } else {
            format!("PASS {} R{}", span.pass.index + 1, radius)
        }
    }
}

/// Accumulates program lines and the quantized tool position
struct BlockWriter<'a> {
    dialect: &'a Dialect,
    places: u32,
    feed_places: u32,
    output: String,
    line_number: u32,
    /// Current absolute position in `10^-places` units
    position: [i64; 3],
}

impl<'a> BlockWriter<'a> {
    fn new(dialect: &'a Dialect, start: Point3<f64>) -> Self {
        let places = dialect.coordinate_decimals();
        Self {
            dialect,
            places,
            feed_places: dialect.feed_decimals(),
            output: String::new(),
            line_number: 0,
            position: Self::quantize_point(start, places),
        }
    }

    fn quantize_point(point: Point3<f64>, places: u32) -> [i64; 3] {
        [
            quantize(point.x, places),
            quantize(point.y, places),
            quantize(point.z, places),
        ]
    }

    /// A line written without a sequence number
    fn raw(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn comment(&mut self, text: &str) {
        if self.dialect.comments {
            self.raw(&format!("({})", text));
        }
    }

    fn block(&mut self, text: &str) {
        if self.dialect.line_numbers {
            self.line_number += self.dialect.line_number_increment.max(1);
            self.output.push_str(&format!("N{} ", self.line_number));
        }
        self.raw(text);
    }

    fn word(&self, address: char, count: i64) -> String {
        format!("{}{}", address, format_quantized(count, self.places))
    }

    fn feed_word(&self, feed: f64) -> String {
        format!("F{}", format_fixed(feed, self.feed_places))
    }

    fn linear(&mut self, end: Point3<f64>, feed: LinearFeed) {
        let target = Self::quantize_point(end, self.places);
        let mut words = Vec::with_capacity(5);
        words.push(match feed {
            LinearFeed::Rapid => self.dialect.rapid.clone(),
            LinearFeed::Feed(_) => self.dialect.linear.clone(),
        });
        for (axis, address) in ['X', 'Y', 'Z'].into_iter().enumerate() {
            let delta = target[axis] - self.position[axis];
            if delta != 0 {
                words.push(self.word(address, delta));
            }
        }
        if words.len() == 1 {
            return;
        }
        if let LinearFeed::Feed(rate) = feed {
            words.push(self.feed_word(rate));
        }
        self.position = target;
        self.block(&words.join(" "));
    }

    fn helix(&mut self, arc: &HelixArc) {
        let center = [
            quantize(arc.center.x, self.places),
            quantize(arc.center.y, self.places),
        ];
        match arc.full_turns() {
            // One block per revolution, each closing on its own start point
            Some(turns) => {
                for turn in 1..=turns {
                    let z = if turn == turns {
                        arc.end_z
                    } else {
                        arc.start_z + arc.lead() * turn as f64
                    };
                    let target = [self.position[0], self.position[1], quantize(z, self.places)];
                    self.arc_block(arc, center, target);
                }
            }
            None => {
                let target = Self::quantize_point(arc.end_point(), self.places);
                self.arc_block(arc, center, target);
            }
        }
    }

    fn arc_block(&mut self, arc: &HelixArc, center: [i64; 2], target: [i64; 3]) {
        let code = match arc.direction {
            ArcDirection::Clockwise => &self.dialect.arc_clockwise,
            ArcDirection::CounterClockwise => &self.dialect.arc_counter_clockwise,
        };
        let text = format!(
            "{} {} {} {} {} {} {}",
            code,
            self.word('X', target[0] - self.position[0]),
            self.word('Y', target[1] - self.position[1]),
            self.word('Z', target[2] - self.position[2]),
            self.word('I', center[0] - self.position[0]),
            self.word('J', center[1] - self.position[1]),
            self.feed_word(arc.feed)
        );
        self.position = target;
        self.block(&text);
    }

    fn finish(self) -> String {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ResolvedGeometry;
    use crate::passes::RadialPass;
    use crate::speeds_feeds::SpeedsFeeds;
    use crate::toolpath::ToolpathBuilder;
    use nalgebra::Point2;
    use threadmill_core::{ThreadSpec, ToolSpec};

    fn pass() -> RadialPass {
        RadialPass {
            index: 0,
            fraction: 1.0,
            cumulative_fraction: 1.0,
            center_radius: 0.1,
        }
    }

    fn program() -> Program {
        let mut builder = ToolpathBuilder::new(Point3::new(0.0, 0.0, 0.25));
        builder
            .begin_pass(pass(), false)
            .rapid_to(Point3::new(0.0, 0.0, 0.0))
            .feed_to(Point3::new(0.1, 0.0, 0.0), 10.0)
            .helix(Point2::origin(), 2.0, -0.1, ArcDirection::Clockwise, 10.0)
            .feed_to(Point3::new(0.0, 0.0, -0.1), 15.0)
            .rapid_to(Point3::new(0.0, 0.0, 0.25))
            .end_pass();

        Program {
            thread: ThreadSpec::new(0.5, 0.438, 0.031, 0.0, 20.0),
            tool: ToolSpec::new(0.25, 4, 300.0, 0.001),
            geometry: ResolvedGeometry {
                pitch: 0.05,
                thread_depth: 0.031,
                minor_radius: 0.219,
                start_z: 0.0,
                axial_length: 0.1,
            },
            passes: vec![pass()],
            spring_passes: 0,
            speeds: SpeedsFeeds {
                spindle_rpm: 4583.66,
                feed_rate_ipm: 10.0,
            },
            toolpath: builder.finish(),
        }
    }

    #[test]
    fn test_default_layout() {
        let text = ProgramEmitter::default().emit(&program());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "%");
        assert_eq!(lines[1], "O1000 (THREAD MILL 0.5000 X 20 TPI)");
        assert!(lines.contains(&"G20 G17"));
        assert!(lines.contains(&"S4584 M3"));
        assert!(lines.contains(&"G90 G0 Z0.2500"));
        assert!(lines.contains(&"(PASS 1 R0.1000)"));

        let body: Vec<&str> = lines
            .iter()
            .copied()
            .skip_while(|l| *l != "G91")
            .collect();
        assert_eq!(
            body,
            [
                "G91",
                "(PASS 1 R0.1000)",
                "G0 Z-0.2500",
                "G1 X0.1000 F10.00",
                "G2 X0.0000 Y0.0000 Z-0.0500 I-0.1000 J0.0000 F10.00",
                "G2 X0.0000 Y0.0000 Z-0.0500 I-0.1000 J0.0000 F10.00",
                "G1 X-0.1000 F15.00",
                "G0 Z0.3500",
                "G90",
                "M99",
                "%",
            ]
        );
    }

    #[test]
    fn test_bare_dialect() {
        let dialect = Dialect {
            tape_marker: String::new(),
            comments: false,
            line_numbers: true,
            program_number: 42,
            ..Dialect::default()
        };
        let text = ProgramEmitter::new(dialect).emit(&program());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "O0042");
        assert_eq!(lines[1], "N10 G20 G17");
        assert_eq!(lines.last(), Some(&"N120 M99"));
        assert!(!text.contains('('));
        assert!(!text.contains('%'));
    }

    #[test]
    fn test_arc_free_dialect() {
        let dialect = Dialect {
            helical_arcs: false,
            segments_per_revolution: 8,
            ..Dialect::default()
        };
        let text = ProgramEmitter::new(dialect).emit(&program());
        assert!(!text.contains("G2 ") && !text.contains("G3 "));
        // Two revolutions of eight chords, each carrying the feed
        let chords = text
            .lines()
            .filter(|l| l.starts_with("G1") && l.ends_with("F10.00"))
            .count();
        assert_eq!(chords, 1 + 16);
    }

    #[test]
    fn test_decimals_are_clamped() {
        let dialect = Dialect {
            coordinate_decimals: 12,
            feed_decimals: 0,
            ..Dialect::default()
        };
        let text = ProgramEmitter::new(dialect).emit(&program());
        assert!(text.contains("G0 Z-0.250000\n"));
        assert!(text.contains("F10.0\n"));
    }
}
