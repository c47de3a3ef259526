// ABOUTME: Fixed 33-point pose landmark topology indices
// ABOUTME: Shared by geometry, side selection, and smoothing code
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

/// Number of landmarks in a full pose
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Nose
pub const NOSE: usize = 0;
/// Left shoulder
pub const LEFT_SHOULDER: usize = 11;
/// Right shoulder
pub const RIGHT_SHOULDER: usize = 12;
/// Left elbow
pub const LEFT_ELBOW: usize = 13;
/// Right elbow
pub const RIGHT_ELBOW: usize = 14;
/// Left wrist
pub const LEFT_WRIST: usize = 15;
/// Right wrist
pub const RIGHT_WRIST: usize = 16;
/// Left hip
pub const LEFT_HIP: usize = 23;
/// Right hip
pub const RIGHT_HIP: usize = 24;
/// Left knee
pub const LEFT_KNEE: usize = 25;
/// Right knee
pub const RIGHT_KNEE: usize = 26;
/// Left ankle
pub const LEFT_ANKLE: usize = 27;
/// Right ankle
pub const RIGHT_ANKLE: usize = 28;
/// Left heel
pub const LEFT_HEEL: usize = 29;
/// Right heel
pub const RIGHT_HEEL: usize = 30;
/// Left foot index (toe)
pub const LEFT_FOOT_INDEX: usize = 31;
/// Right foot index (toe)
pub const RIGHT_FOOT_INDEX: usize = 32;

/// Joints compared when choosing the more visible body side (left)
pub const LEFT_SIDE_GROUP: [usize; 4] = [LEFT_SHOULDER, LEFT_HIP, LEFT_KNEE, LEFT_ANKLE];
/// Joints compared when choosing the more visible body side (right)
pub const RIGHT_SIDE_GROUP: [usize; 4] = [RIGHT_SHOULDER, RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE];
