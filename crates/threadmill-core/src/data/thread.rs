//! Internal thread geometry.

use serde::{Deserialize, Serialize};

/// Geometry of the internal thread to be milled (inches)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThreadSpec {
    /// Major diameter of the thread
    pub major_diameter: f64,
    /// Minor diameter of the thread (the tapped-hole bore)
    pub minor_diameter: f64,
    /// Radial thread depth, nominally `(major - minor) / 2`
    pub thread_depth: f64,
    /// Absolute Z of the top of the threaded section
    pub start_z: f64,
    /// Threads per inch
    pub threads_per_inch: f64,
    /// Axial length of the threaded section. Defaults to `thread_depth`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_length: Option<f64>,
}

impl ThreadSpec {
    /// Creates a thread whose axial span equals its depth.
    pub fn new(
        major_diameter: f64,
        minor_diameter: f64,
        thread_depth: f64,
        start_z: f64,
        threads_per_inch: f64,
    ) -> Self {
        Self {
            major_diameter,
            minor_diameter,
            thread_depth,
            start_z,
            threads_per_inch,
            thread_length: None,
        }
    }

    /// Sets the axial length of the threaded section.
    pub fn with_length(mut self, length: f64) -> Self {
        self.thread_length = Some(length);
        self
    }

    /// Axial advance per revolution
    pub fn pitch(&self) -> f64 {
        1.0 / self.threads_per_inch
    }

    /// Radial stock between the minor and major diameters
    pub fn nominal_depth(&self) -> f64 {
        (self.major_diameter - self.minor_diameter) / 2.0
    }

    /// Axial distance the helix must cover
    pub fn axial_length(&self) -> f64 {
        self.thread_length.unwrap_or(self.thread_depth)
    }
}
