// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Quiet logging setup, synthetic side-view poses, and deterministic session config
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::similar_names
)]
//! Shared test utilities for `fitplus`

use fitplus::config::MotionConfig;
use fitplus_core::constants::landmarks::{
    LEFT_ANKLE, LEFT_ELBOW, LEFT_FOOT_INDEX, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, LEFT_WRIST,
    POSE_LANDMARK_COUNT, RIGHT_ANKLE, RIGHT_ELBOW, RIGHT_FOOT_INDEX, RIGHT_HIP, RIGHT_KNEE,
    RIGHT_SHOULDER, RIGHT_WRIST,
};
use fitplus_core::models::{Landmark, PoseFrame};
use fitplus_motion::TrackerOptions;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet test logging once per process
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };
        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Config with smoothing disabled so synthetic angles pass through exactly
pub fn raw_config() -> MotionConfig {
    MotionConfig {
        tracker: TrackerOptions {
            landmark_preset: None,
            smooth_metrics: false,
        },
        ..MotionConfig::default()
    }
}

/// Side-view pose parameters
#[derive(Debug, Clone, Copy)]
pub struct Pose {
    /// Hip-knee-ankle angle (degrees)
    pub knee_angle: f64,
    /// Torso lean from vertical, forward positive (degrees)
    pub torso_lean: f64,
    /// Horizontal knee travel past the ankle (normalized units)
    pub knee_shift: f64,
}

impl Pose {
    pub const fn squat(knee_angle: f64) -> Self {
        Self {
            knee_angle,
            torso_lean: 15.0,
            knee_shift: 0.0,
        }
    }
}

const SHIN: f64 = 0.2;
const THIGH: f64 = 0.2;
const TORSO: f64 = 0.3;

/// 33 landmarks for a subject seen from their left side, facing +x
///
/// The left side is fully visible; the right side mirrors it with low
/// visibility so left is chosen as the primary side.
pub fn side_view_landmarks(pose: Pose) -> Vec<Landmark> {
    let theta = pose.knee_angle.to_radians();
    let lean = pose.torso_lean.to_radians();

    let ankle = (0.5, 0.9);
    let rise = pose.knee_shift.mul_add(-pose.knee_shift, SHIN * SHIN).sqrt();
    let knee = (ankle.0 + pose.knee_shift, ankle.1 - rise);
    // knee->ankle direction rotated by theta gives knee->hip, hips travel backward
    let down = ((ankle.0 - knee.0) / SHIN, (ankle.1 - knee.1) / SHIN);
    let (sin, cos) = theta.sin_cos();
    let thigh_dir = (down.0 * cos - down.1 * sin, down.0 * sin + down.1 * cos);
    let hip = (knee.0 + THIGH * thigh_dir.0, knee.1 + THIGH * thigh_dir.1);
    let shoulder = (hip.0 + TORSO * lean.sin(), hip.1 - TORSO * lean.cos());
    let elbow = (shoulder.0 + 0.05, shoulder.1 + 0.12);
    let wrist = (elbow.0 + 0.08, elbow.1);
    let toe = (ankle.0 + 0.08, ankle.1 + 0.02);

    let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0, 0.5); POSE_LANDMARK_COUNT];
    let joints = [
        (LEFT_SHOULDER, RIGHT_SHOULDER, shoulder),
        (LEFT_ELBOW, RIGHT_ELBOW, elbow),
        (LEFT_WRIST, RIGHT_WRIST, wrist),
        (LEFT_HIP, RIGHT_HIP, hip),
        (LEFT_KNEE, RIGHT_KNEE, knee),
        (LEFT_ANKLE, RIGHT_ANKLE, ankle),
        (LEFT_FOOT_INDEX, RIGHT_FOOT_INDEX, toe),
    ];
    for (left, right, (x, y)) in joints {
        landmarks[left] = Landmark::new(x, y, 0.0, 0.95);
        landmarks[right] = Landmark::new(x, y, 0.0, 0.3);
    }
    landmarks
}

/// Frame with a side-view pose
pub fn frame(timestamp_ms: f64, pose: Pose) -> PoseFrame {
    PoseFrame {
        timestamp_ms,
        landmarks: side_view_landmarks(pose),
        world_landmarks: None,
    }
}

/// Frame without a person
pub fn empty_frame(timestamp_ms: f64) -> PoseFrame {
    PoseFrame {
        timestamp_ms,
        landmarks: Vec::new(),
        world_landmarks: None,
    }
}

/// Frame spacing used by the rep generators (25 fps)
pub const FRAME_STEP_MS: f64 = 40.0;

/// Duration of one generated rep
pub const REP_DURATION_MS: f64 = 1600.0;

/// One squat rep starting at `start_ms`
///
/// Knee angle runs standing (172) -> `depth` -> standing as a triangle wave
/// with the given torso lean held throughout.
pub fn squat_rep_with(start_ms: f64, depth: f64, torso_lean: f64) -> Vec<PoseFrame> {
    let steps = (REP_DURATION_MS / FRAME_STEP_MS).round() as usize;
    (0..=steps)
        .map(|i| {
            let progress = i as f64 / steps as f64;
            let dip = 1.0 - 2.0_f64.mul_add(progress, -1.0).abs();
            let pose = Pose {
                knee_angle: (172.0 - depth).mul_add(-dip, 172.0),
                torso_lean,
                knee_shift: 0.0,
            };
            frame((i as f64).mul_add(FRAME_STEP_MS, start_ms), pose)
        })
        .collect()
}

/// One well-formed squat rep
pub fn squat_rep(start_ms: f64) -> Vec<PoseFrame> {
    squat_rep_with(start_ms, 95.0, 15.0)
}

/// Back-to-back good reps; returns the frames and the next free timestamp
pub fn squat_reps(start_ms: f64, count: usize) -> (Vec<PoseFrame>, f64) {
    let mut frames = Vec::new();
    let mut t = start_ms;
    for _ in 0..count {
        frames.extend(squat_rep(t));
        t += REP_DURATION_MS + FRAME_STEP_MS;
    }
    (frames, t)
}

/// Standing still for `duration_ms`
pub fn standing(start_ms: f64, duration_ms: f64) -> Vec<PoseFrame> {
    let steps = (duration_ms / FRAME_STEP_MS).round() as usize;
    (0..steps)
        .map(|i| frame((i as f64).mul_add(FRAME_STEP_MS, start_ms), Pose::squat(172.0)))
        .collect()
}
