// ABOUTME: Closed metric vocabulary and per-frame metric extraction into snapshots
// ABOUTME: Each metric key owns its bilateral combination policy; unknown keys are unmapped
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

//! Metric extraction.
//!
//! Scoring profiles reference metrics by string key. Keys resolve once, at
//! profile load, into [`MetricSource`]: either a known [`MetricKey`] or an
//! `Unmapped` marker that always extracts to `None`. Every known key is
//! handled by one exhaustive `match`, so adding a variant without an
//! extraction rule does not compile.

/// Metric-level smoothing
pub mod smoother;

pub use smoother::MetricSmoother;

use crate::geometry::{AngleSource, Bilateral, BodyGeometry};
use crate::phase::{Phase, RepState};
use fitplus_core::constants::geometry::ELBOW_MISMATCH_DEGREES;
use fitplus_core::models::{PoseFrame, Side};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// How two per-side values combine into one bilateral metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SideCombine {
    /// Smaller value (the more flexed joint)
    Min,
    /// Larger value
    Max,
    /// Average
    Mean,
    /// Average, or the larger value when the sides disagree by more than the margin
    MeanUnlessMismatch(f64),
    /// Value of the visibility-chosen side
    Primary,
    /// Absolute difference; requires both sides
    Difference,
}

impl SideCombine {
    /// Combine a bilateral pair; a single present side is used as-is
    /// (except for `Difference`, which needs both)
    #[must_use]
    pub fn apply(self, pair: Bilateral, primary: Side) -> Option<f64> {
        match self {
            Self::Primary => pair.side(primary).or_else(|| pair.side(primary.opposite())),
            Self::Difference => pair.asymmetry(),
            Self::Min | Self::Max | Self::Mean | Self::MeanUnlessMismatch(_) => {
                match (pair.left, pair.right) {
                    (None, None) => None,
                    (Some(v), None) | (None, Some(v)) => Some(v),
                    (Some(l), Some(r)) => Some(match self {
                        Self::Min => l.min(r),
                        Self::Max => l.max(r),
                        Self::MeanUnlessMismatch(margin) if (l - r).abs() > margin => l.max(r),
                        _ => (l + r) / 2.0,
                    }),
                }
            }
        }
    }
}

/// Every metric the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    /// Knee flexion, more flexed side
    KneeAngle,
    /// Left knee flexion
    LeftKneeAngle,
    /// Right knee flexion
    RightKneeAngle,
    /// Knee flexion on the more visible side
    PrimaryKneeAngle,
    /// Mean knee flexion
    KneeDepth,
    /// Hip flexion, more flexed side
    HipAngle,
    /// Left hip flexion
    LeftHipAngle,
    /// Right hip flexion
    RightHipAngle,
    /// Hip flexion on the more visible side
    PrimaryHipAngle,
    /// Mean hip flexion
    HipHinge,
    /// Elbow flexion (mean, or the larger when sides disagree badly)
    ElbowAngle,
    /// Left elbow flexion
    LeftElbowAngle,
    /// Right elbow flexion
    RightElbowAngle,
    /// Elbow flexion on the more visible side
    PrimaryElbowAngle,
    /// Shoulder elevation, larger side
    ShoulderAngle,
    /// Left shoulder elevation
    LeftShoulderAngle,
    /// Right shoulder elevation
    RightShoulderAngle,
    /// Hip-midpoint to shoulder-midpoint lean from vertical
    SpineAngle,
    /// Primary-side torso lean from vertical
    TorsoLean,
    /// Primary-side shoulder-hip-ankle line
    BodyAngle,
    /// Left/right knee angle difference
    KneeSymmetry,
    /// Left/right elbow angle difference
    ElbowSymmetry,
    /// Left/right shoulder angle difference
    ShoulderSymmetry,
    /// 100 when both knees track over the ankles, 50 otherwise
    KneeAlignment,
    /// Knee-over-toe score from horizontal knee offsets
    KneeOverToe,
    /// Knee travel past the ankle over shin length
    KneeForwardRatio,
    /// Squat depth percentage from knee flexion
    Depth,
    /// Horizontal wrist to shoulder distance
    WristShoulderOffset,
    /// Time since the previous completed rep; set by the session on completion
    RepIntervalMs,
    /// Hold duration; not measurable from a single frame
    HoldTime,
    /// Movement tempo; not measurable from a single frame
    Tempo,
}

impl MetricKey {
    /// Every key, in declaration order
    pub const ALL: [Self; 31] = [
        Self::KneeAngle,
        Self::LeftKneeAngle,
        Self::RightKneeAngle,
        Self::PrimaryKneeAngle,
        Self::KneeDepth,
        Self::HipAngle,
        Self::LeftHipAngle,
        Self::RightHipAngle,
        Self::PrimaryHipAngle,
        Self::HipHinge,
        Self::ElbowAngle,
        Self::LeftElbowAngle,
        Self::RightElbowAngle,
        Self::PrimaryElbowAngle,
        Self::ShoulderAngle,
        Self::LeftShoulderAngle,
        Self::RightShoulderAngle,
        Self::SpineAngle,
        Self::TorsoLean,
        Self::BodyAngle,
        Self::KneeSymmetry,
        Self::ElbowSymmetry,
        Self::ShoulderSymmetry,
        Self::KneeAlignment,
        Self::KneeOverToe,
        Self::KneeForwardRatio,
        Self::Depth,
        Self::WristShoulderOffset,
        Self::RepIntervalMs,
        Self::HoldTime,
        Self::Tempo,
    ];

    /// Canonical key string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KneeAngle => "knee_angle",
            Self::LeftKneeAngle => "left_knee_angle",
            Self::RightKneeAngle => "right_knee_angle",
            Self::PrimaryKneeAngle => "primary_knee_angle",
            Self::KneeDepth => "knee_depth",
            Self::HipAngle => "hip_angle",
            Self::LeftHipAngle => "left_hip_angle",
            Self::RightHipAngle => "right_hip_angle",
            Self::PrimaryHipAngle => "primary_hip_angle",
            Self::HipHinge => "hip_hinge",
            Self::ElbowAngle => "elbow_angle",
            Self::LeftElbowAngle => "left_elbow_angle",
            Self::RightElbowAngle => "right_elbow_angle",
            Self::PrimaryElbowAngle => "primary_elbow_angle",
            Self::ShoulderAngle => "shoulder_angle",
            Self::LeftShoulderAngle => "left_shoulder_angle",
            Self::RightShoulderAngle => "right_shoulder_angle",
            Self::SpineAngle => "spine_angle",
            Self::TorsoLean => "torso_lean",
            Self::BodyAngle => "body_angle",
            Self::KneeSymmetry => "knee_symmetry",
            Self::ElbowSymmetry => "elbow_symmetry",
            Self::ShoulderSymmetry => "shoulder_symmetry",
            Self::KneeAlignment => "knee_alignment",
            Self::KneeOverToe => "knee_over_toe",
            Self::KneeForwardRatio => "knee_forward_ratio",
            Self::Depth => "depth",
            Self::WristShoulderOffset => "wrist_shoulder_offset",
            Self::RepIntervalMs => "rep_interval_ms",
            Self::HoldTime => "hold_time",
            Self::Tempo => "tempo",
        }
    }

    /// Resolve a key string, accepting a few legacy aliases
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let normalized = key.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "back_angle" => Some(Self::SpineAngle),
            "torso_angle" => Some(Self::TorsoLean),
            "body_line" => Some(Self::BodyAngle),
            "knee_forward" => Some(Self::KneeForwardRatio),
            other => Self::ALL.into_iter().find(|k| k.as_str() == other),
        }
    }

    /// Bilateral combination policy for keys derived from a left/right pair
    #[must_use]
    pub const fn side_policy(self) -> Option<SideCombine> {
        match self {
            Self::KneeAngle | Self::HipAngle => Some(SideCombine::Min),
            Self::ShoulderAngle => Some(SideCombine::Max),
            Self::KneeDepth | Self::HipHinge => Some(SideCombine::Mean),
            Self::ElbowAngle => Some(SideCombine::MeanUnlessMismatch(ELBOW_MISMATCH_DEGREES)),
            Self::PrimaryKneeAngle | Self::PrimaryHipAngle | Self::PrimaryElbowAngle => {
                Some(SideCombine::Primary)
            }
            Self::KneeSymmetry | Self::ElbowSymmetry | Self::ShoulderSymmetry => {
                Some(SideCombine::Difference)
            }
            _ => None,
        }
    }

    /// Whether the metric is a continuous signal worth smoothing
    #[must_use]
    pub const fn is_continuous(self) -> bool {
        !matches!(
            self,
            Self::KneeAlignment | Self::RepIntervalMs | Self::HoldTime | Self::Tempo
        )
    }

    /// Extract this metric from a frame's geometry
    #[must_use]
    pub fn extract(self, geometry: &BodyGeometry) -> Option<f64> {
        let side = geometry.side;
        let combine = |pair: Bilateral| self.side_policy().and_then(|policy| policy.apply(pair, side));
        match self {
            Self::KneeAngle | Self::PrimaryKneeAngle | Self::KneeDepth | Self::KneeSymmetry => {
                combine(geometry.knee)
            }
            Self::HipAngle | Self::PrimaryHipAngle | Self::HipHinge => combine(geometry.hip),
            Self::ElbowAngle | Self::PrimaryElbowAngle | Self::ElbowSymmetry => {
                combine(geometry.elbow)
            }
            Self::ShoulderAngle | Self::ShoulderSymmetry => combine(geometry.shoulder),
            Self::LeftKneeAngle => geometry.knee.left,
            Self::RightKneeAngle => geometry.knee.right,
            Self::LeftHipAngle => geometry.hip.left,
            Self::RightHipAngle => geometry.hip.right,
            Self::LeftElbowAngle => geometry.elbow.left,
            Self::RightElbowAngle => geometry.elbow.right,
            Self::LeftShoulderAngle => geometry.shoulder.left,
            Self::RightShoulderAngle => geometry.shoulder.right,
            Self::SpineAngle => geometry.spine,
            Self::TorsoLean => geometry.torso_lean,
            Self::BodyAngle => geometry.body_line,
            Self::KneeAlignment => geometry
                .knees_aligned()
                .map(|aligned| if aligned { 100.0 } else { 50.0 }),
            Self::KneeOverToe => {
                SideCombine::Mean
                    .apply(
                        Bilateral {
                            left: geometry.knee_offset.left.map(f64::abs),
                            right: geometry.knee_offset.right.map(f64::abs),
                        },
                        side,
                    )
                    .map(|offset| offset.mul_add(-500.0, 100.0).max(0.0))
            }
            Self::KneeForwardRatio => geometry.knee_forward,
            Self::Depth => SideCombine::Primary
                .apply(geometry.knee, side)
                .map(|knee| ((180.0 - knee) / 0.9).clamp(0.0, 100.0)),
            Self::WristShoulderOffset => geometry.wrist_shoulder_offset,
            Self::RepIntervalMs | Self::HoldTime | Self::Tempo => None,
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A profile's metric reference after resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetricSource {
    /// Resolved to an extractable metric
    Known(MetricKey),
    /// Not understood by this build; always extracts `None`
    Unmapped(String),
}

impl MetricSource {
    /// Resolve a key string, warning once when it is not understood
    #[must_use]
    pub fn resolve(key: &str) -> Self {
        MetricKey::from_key(key).map_or_else(
            || {
                warn!(metric_key = key, "Unmapped metric key; it will always score as missing");
                Self::Unmapped(key.to_owned())
            },
            Self::Known,
        )
    }

    /// Known key, if any
    #[must_use]
    pub const fn key(&self) -> Option<MetricKey> {
        match self {
            Self::Known(key) => Some(*key),
            Self::Unmapped(_) => None,
        }
    }

    /// Value of this metric in a snapshot
    #[must_use]
    pub fn value_in(&self, snapshot: &MetricsSnapshot) -> Option<f64> {
        self.key().and_then(|key| snapshot.get(key))
    }

    /// Key string as written
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(key) => key.as_str(),
            Self::Unmapped(raw) => raw,
        }
    }
}

/// Named metric values for one frame plus its phase labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Frame timestamp in milliseconds
    pub timestamp_ms: f64,
    /// Visibility-chosen side
    pub side: Side,
    /// Landmark set used for joint angles
    pub angle_source: AngleSource,
    /// Named phase (set by classification)
    pub phase: Phase,
    /// Rep state (set by classification)
    pub state: RepState,
    values: BTreeMap<MetricKey, f64>,
}

impl MetricsSnapshot {
    /// Empty snapshot with unknown phase
    #[must_use]
    pub const fn new(timestamp_ms: f64, side: Side, angle_source: AngleSource) -> Self {
        Self {
            timestamp_ms,
            side,
            angle_source,
            phase: Phase::Unknown,
            state: RepState::Unknown,
            values: BTreeMap::new(),
        }
    }

    /// Metric value; `None` when absent
    #[must_use]
    pub fn get(&self, key: MetricKey) -> Option<f64> {
        self.values.get(&key).copied()
    }

    /// Store or clear a metric value; non-finite values are treated as absent
    pub fn set(&mut self, key: MetricKey, value: Option<f64>) {
        match value.filter(|v| v.is_finite()) {
            Some(v) => {
                self.values.insert(key, v);
            }
            None => {
                self.values.remove(&key);
            }
        }
    }

    /// Present values in key order
    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

/// Builds snapshots for a fixed set of tracked metric keys
#[derive(Debug, Clone, Default)]
pub struct MetricExtractor {
    keys: Vec<MetricKey>,
}

impl MetricExtractor {
    /// Track the given keys (duplicates are ignored)
    #[must_use]
    pub fn new(keys: impl IntoIterator<Item = MetricKey>) -> Self {
        let mut tracked: Vec<MetricKey> = keys.into_iter().collect();
        tracked.sort_unstable();
        tracked.dedup();
        Self { keys: tracked }
    }

    /// Track every known key
    #[must_use]
    pub fn all() -> Self {
        Self::new(MetricKey::ALL)
    }

    /// Tracked keys
    #[must_use]
    pub fn keys(&self) -> &[MetricKey] {
        &self.keys
    }

    /// Snapshot a frame; `None` when the frame has no person
    #[must_use]
    pub fn snapshot(&self, frame: &PoseFrame) -> Option<MetricsSnapshot> {
        let geometry = BodyGeometry::measure(frame)?;
        Some(self.snapshot_geometry(frame.timestamp_ms, &geometry))
    }

    /// Snapshot already-measured geometry
    #[must_use]
    pub fn snapshot_geometry(&self, timestamp_ms: f64, geometry: &BodyGeometry) -> MetricsSnapshot {
        let mut snapshot = MetricsSnapshot::new(timestamp_ms, geometry.side, geometry.angle_source);
        for key in &self.keys {
            snapshot.set(*key, key.extract(geometry));
        }
        snapshot
    }
}
