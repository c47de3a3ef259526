// ABOUTME: Core data models shared across the FitPlus workspace
// ABOUTME: Landmarks and pose frames from the detector, plus session identity records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

/// Pose landmarks and per-frame detector results
pub mod landmark;
/// Session identity, mode, set and event records
pub mod session;

pub use landmark::{Landmark, PoseFrame, Side};
pub use session::{SessionEventRecord, SessionHandle, SessionMode, SetPhase, SetRecord};
