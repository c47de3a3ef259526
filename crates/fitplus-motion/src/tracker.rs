// ABOUTME: Per-session frame pipeline: landmark smoothing, metric extraction, classification
// ABOUTME: Owns all filter state; resets it when tracking is lost
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use crate::filter::{LandmarkSmoother, SmootherPreset};
use crate::metrics::{MetricExtractor, MetricKey, MetricSmoother, MetricsSnapshot};
use crate::phase::{PhaseClassifier, RepState};
use fitplus_core::models::PoseFrame;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Smoothing applied by a tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerOptions {
    /// Landmark smoothing preset; `None` uses raw landmarks
    pub landmark_preset: Option<SmootherPreset>,
    /// Whether extracted metric values are smoothed as well
    pub smooth_metrics: bool,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            landmark_preset: Some(SmootherPreset::default()),
            smooth_metrics: true,
        }
    }
}

/// Turns pose frames into classified metric snapshots
#[derive(Debug, Clone)]
pub struct MotionTracker {
    landmarks: Option<LandmarkSmoother>,
    world_landmarks: Option<LandmarkSmoother>,
    metrics: Option<MetricSmoother>,
    extractor: MetricExtractor,
    classifier: Option<PhaseClassifier>,
    primary: MetricKey,
    last_timestamp_ms: Option<f64>,
}

impl MotionTracker {
    /// Track `keys` (plus `primary`) and classify phases from `primary`
    #[must_use]
    pub fn new(
        primary: MetricKey,
        keys: impl IntoIterator<Item = MetricKey>,
        classifier: Option<PhaseClassifier>,
        options: TrackerOptions,
    ) -> Self {
        Self {
            landmarks: options.landmark_preset.map(LandmarkSmoother::from_preset),
            world_landmarks: options.landmark_preset.map(LandmarkSmoother::from_preset),
            metrics: options.smooth_metrics.then(MetricSmoother::default),
            extractor: MetricExtractor::new(keys.into_iter().chain([primary])),
            classifier,
            primary,
            last_timestamp_ms: None,
        }
    }

    /// Process one frame
    ///
    /// Returns `None` for frames without a person (which also resets
    /// smoothing) and for frames whose timestamp does not advance.
    pub fn observe(&mut self, frame: &PoseFrame) -> Option<MetricsSnapshot> {
        if !frame.has_person() {
            trace!(timestamp_ms = frame.timestamp_ms, "No person in frame");
            self.reset_filters();
            return None;
        }
        if self
            .last_timestamp_ms
            .is_some_and(|last| frame.timestamp_ms <= last)
        {
            debug!(timestamp_ms = frame.timestamp_ms, "Dropping non-monotonic frame");
            return None;
        }
        self.last_timestamp_ms = Some(frame.timestamp_ms);

        let t = frame.timestamp_seconds();
        let smoothed = PoseFrame {
            timestamp_ms: frame.timestamp_ms,
            landmarks: match &mut self.landmarks {
                Some(smoother) => smoother.filter(t, &frame.landmarks),
                None => frame.landmarks.clone(),
            },
            world_landmarks: frame.world().map(|world| match &mut self.world_landmarks {
                Some(smoother) => smoother.filter(t, world),
                None => world.to_vec(),
            }),
        };

        let mut snapshot = self.extractor.snapshot(&smoothed)?;
        if let Some(smoother) = &mut self.metrics {
            smoother.smooth(&mut snapshot);
        }

        let primary = snapshot.get(self.primary);
        if let Some(classifier) = &self.classifier {
            snapshot.state = classifier.classify_state(primary);
            snapshot.phase = classifier.classify_phase(primary);
        } else {
            snapshot.state = RepState::Unknown;
        }
        Some(snapshot)
    }

    /// Primary metric key
    #[must_use]
    pub const fn primary(&self) -> MetricKey {
        self.primary
    }

    fn reset_filters(&mut self) {
        for smoother in [&mut self.landmarks, &mut self.world_landmarks]
            .into_iter()
            .flatten()
        {
            smoother.reset();
        }
        if let Some(smoother) = &mut self.metrics {
            smoother.reset();
        }
    }

    /// Forget all filter state and timing
    pub fn reset(&mut self) {
        self.reset_filters();
        self.last_timestamp_ms = None;
    }
}
