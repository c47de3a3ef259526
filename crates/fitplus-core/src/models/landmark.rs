// ABOUTME: Pose landmark model and per-frame pose detector result
// ABOUTME: Landmarks are normalized image coordinates or world-space meters with visibility
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use crate::constants::landmarks::POSE_LANDMARK_COUNT;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tracked body keypoint
///
/// `visibility` is the detector's confidence in `[0, 1]`; it carries no
/// geometric meaning and is never smoothed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal coordinate (normalized 0-1, or meters in world space)
    pub x: f64,
    /// Vertical coordinate, growing downward in image space
    pub y: f64,
    /// Depth coordinate
    #[serde(default)]
    pub z: f64,
    /// Detector confidence in `[0, 1]`
    #[serde(default)]
    pub visibility: f64,
}

impl Landmark {
    /// Create a landmark
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, visibility: f64) -> Self {
        Self {
            x,
            y,
            z,
            visibility,
        }
    }

    /// Fetch a landmark by topology index, `None` when the pose is truncated
    #[must_use]
    pub fn at(landmarks: &[Self], index: usize) -> Option<&Self> {
        landmarks.get(index)
    }
}

/// Body side used for bilateral joints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Subject's left side
    #[default]
    Left,
    /// Subject's right side
    Right,
}

impl Side {
    /// The opposite side
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// One pose-detection result
///
/// An empty `landmarks` list means no person was found; consumers treat
/// it as "no update" rather than an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoseFrame {
    /// Capture timestamp in milliseconds (monotonic clock)
    pub timestamp_ms: f64,
    /// Normalized image-space landmarks (33 when a person is present)
    #[serde(default)]
    pub landmarks: Vec<Landmark>,
    /// Optional world-space landmarks in meters, parallel to `landmarks`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_landmarks: Option<Vec<Landmark>>,
}

impl PoseFrame {
    /// Whether the detector found a person in this frame
    #[must_use]
    pub fn has_person(&self) -> bool {
        !self.landmarks.is_empty()
    }

    /// Whether the frame carries the full landmark topology
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() >= POSE_LANDMARK_COUNT
    }

    /// World landmarks when present and non-empty
    #[must_use]
    pub fn world(&self) -> Option<&[Landmark]> {
        self.world_landmarks
            .as_deref()
            .filter(|world| !world.is_empty())
    }

    /// Timestamp in seconds, as used by the smoothing filters
    #[must_use]
    pub fn timestamp_seconds(&self) -> f64 {
        self.timestamp_ms / 1000.0
    }
}
