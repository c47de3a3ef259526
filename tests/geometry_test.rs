// ABOUTME: Integration tests for joint angles, side selection, and frame measurement
// ABOUTME: Uses synthetic side-view poses with known knee angles and torso lean
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{frame, side_view_landmarks, Pose};
use fitplus_core::constants::landmarks::{LEFT_HIP, LEFT_KNEE, LEFT_SIDE_GROUP, RIGHT_SIDE_GROUP};
use fitplus_core::models::{Landmark, PoseFrame, Side};
use fitplus_motion::geometry::{choose_primary_side, joint_angle, knee_forward_ratio};
use fitplus_motion::{AngleSource, BodyGeometry, MetricExtractor, MetricKey};

fn lm(x: f64, y: f64) -> Landmark {
    Landmark::new(x, y, 0.0, 1.0)
}

#[test]
fn test_coincident_points_yield_none() {
    let a = lm(0.3, 0.3);
    assert_eq!(joint_angle(Some(&a), Some(&a), Some(&lm(0.5, 0.5))), None);
    assert_eq!(joint_angle(Some(&lm(0.1, 0.1)), Some(&a), Some(&a)), None);
}

#[test]
fn test_straight_line_is_180() {
    let angle = joint_angle(Some(&lm(0.0, 0.0)), Some(&lm(0.5, 0.5)), Some(&lm(1.0, 1.0))).unwrap();
    assert!((angle - 180.0).abs() < 1e-9);
}

#[test]
fn test_angle_uses_depth() {
    let a = Landmark::new(1.0, 0.0, 0.0, 1.0);
    let b = Landmark::new(0.0, 0.0, 0.0, 1.0);
    let c = Landmark::new(0.0, 0.0, 1.0, 1.0);
    let angle = joint_angle(Some(&a), Some(&b), Some(&c)).unwrap();
    assert!((angle - 90.0).abs() < 1e-9);
}

#[test]
fn test_primary_side_prefers_visible_side() {
    let mut landmarks = vec![Landmark::new(0.5, 0.5, 0.0, 0.5); 33];
    for idx in RIGHT_SIDE_GROUP {
        landmarks[idx].visibility = 0.9;
    }
    assert_eq!(choose_primary_side(&landmarks), Side::Right);

    for idx in LEFT_SIDE_GROUP {
        landmarks[idx].visibility = 0.9;
    }
    assert_eq!(choose_primary_side(&landmarks), Side::Left);
}

#[test]
fn test_knee_forward_ratio_counts_only_forward_travel() {
    let ankle = lm(0.5, 0.9);
    let toe = lm(0.6, 0.92);
    let forward = knee_forward_ratio(Some(&lm(0.55, 0.7)), Some(&ankle), Some(&toe), None).unwrap();
    assert!(forward > 0.0);
    let behind = knee_forward_ratio(Some(&lm(0.45, 0.7)), Some(&ankle), Some(&toe), None).unwrap();
    assert!(behind.abs() < f64::EPSILON);
    // Facing -x: the same knee position is now behind the ankle
    let mirrored = knee_forward_ratio(Some(&lm(0.55, 0.7)), Some(&ankle), Some(&lm(0.4, 0.92)), None).unwrap();
    assert!(mirrored.abs() < f64::EPSILON);
}

#[test]
fn test_measure_side_view_pose() {
    let geometry = BodyGeometry::measure(&frame(0.0, Pose::squat(95.0))).unwrap();
    assert_eq!(geometry.side, Side::Left);
    assert_eq!(geometry.angle_source, AngleSource::Normalized);
    assert!((geometry.knee.left.unwrap() - 95.0).abs() < 1e-6);
    assert!((geometry.torso_lean.unwrap() - 15.0).abs() < 1e-6);
    assert!(geometry.knee_forward.unwrap().abs() < 1e-9);
}

#[test]
fn test_measure_prefers_world_landmarks_for_angles() {
    let normalized = side_view_landmarks(Pose::squat(170.0));
    let world = side_view_landmarks(Pose::squat(90.0));
    let frame = PoseFrame {
        timestamp_ms: 0.0,
        landmarks: normalized,
        world_landmarks: Some(world),
    };
    let geometry = BodyGeometry::measure(&frame).unwrap();
    assert_eq!(geometry.angle_source, AngleSource::World);
    assert!((geometry.knee.left.unwrap() - 90.0).abs() < 1e-6);
}

#[test]
fn test_missing_person_yields_no_geometry() {
    let frame = PoseFrame {
        timestamp_ms: 0.0,
        landmarks: Vec::new(),
        world_landmarks: None,
    };
    assert!(BodyGeometry::measure(&frame).is_none());
}

#[test]
fn test_snapshot_leaves_indeterminate_metrics_absent() {
    let mut landmarks = side_view_landmarks(Pose::squat(120.0));
    // Collapse the left thigh: hip sits on the knee
    landmarks[LEFT_HIP] = landmarks[LEFT_KNEE];
    let frame = PoseFrame {
        timestamp_ms: 0.0,
        landmarks,
        world_landmarks: None,
    };
    let snapshot = MetricExtractor::all().snapshot(&frame).unwrap();
    assert_eq!(snapshot.get(MetricKey::LeftKneeAngle), None);
    assert!(snapshot.get(MetricKey::RightKneeAngle).is_some());
}
