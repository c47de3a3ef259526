// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Landmark topology, classifier margins, scoring thresholds, and session sampling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than one flat list.

/// One-euro filter presets and defaults
pub mod filter;
/// Pose landmark topology (33-point layout)
pub mod landmarks;

/// Geometry numerical floors
pub mod geometry {
    /// Minimum shin length (normalized units) before the knee-forward ratio is indeterminate
    pub const SHIN_LENGTH_EPS: f64 = 0.01;
    /// Knee-to-ankle horizontal offset under which both knees count as aligned
    pub const KNEE_ALIGNMENT_TOLERANCE: f64 = 0.05;
    /// Maximum left/right elbow disagreement (degrees) before the higher reading wins
    pub const ELBOW_MISMATCH_DEGREES: f64 = 35.0;
}

/// Phase classification constants
pub mod phase {
    /// Hysteresis margin (degrees) applied around neutral and active thresholds
    pub const HYSTERESIS_DEGREES: f64 = 10.0;
}

/// Repetition counting constants
pub mod reps {
    /// Fraction of samples trimmed from each end for the rep trimmed mean
    pub const TRIM_FRACTION: f64 = 0.1;
    /// Minimum sample count before trimming applies
    pub const TRIM_MIN_SAMPLES: usize = 10;
}

/// Scoring engine constants
pub mod scoring {
    /// Full marks on the 0-100 component scale
    pub const FULL_SCORE: f64 = 100.0;
    /// Denominator floor when an ideal bound equals its hard bound
    pub const DENOMINATOR_EPSILON: f64 = 1e-9;
    /// Worst-component score at or above which the generic success message is used
    pub const SUCCESS_THRESHOLD: f64 = 80.0;
    /// Worst-component score under which feedback is raised to a warning
    pub const WARNING_THRESHOLD: f64 = 50.0;
    /// Score version tag carried on rep results
    pub const SCORE_VERSION: &str = "v1";
}

/// Session aggregation constants
pub mod session {
    /// Minimum spacing between timeline samples (ms)
    pub const TIMELINE_INTERVAL_MS: f64 = 1000.0;
    /// Default capacity of the session event channel
    pub const EVENT_BUFFER_SIZE: usize = 64;
    /// Persistence service name used in error messages and logs
    pub const PERSISTENCE_SERVICE: &str = "session-store";
}
