// ABOUTME: Session identity and bookkeeping records exchanged with persistence
// ABOUTME: Handles, workout modes, set records, and discrete session events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque handle identifying a workout session at the persistence boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionHandle(pub Uuid);

impl SessionHandle {
    /// Generate a fresh handle
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How the workout was started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionMode {
    /// Free exercise outside any plan
    #[default]
    Free,
    /// Part of a scheduled routine
    Routine,
    /// Part of a quest challenge
    Quest,
}

/// Phase of a recorded set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetPhase {
    /// Working set
    #[default]
    Work,
    /// Rest interval
    Rest,
}

/// One completed set within a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRecord {
    /// 1-based set number
    pub set_no: u32,
    /// Set phase
    pub phase: SetPhase,
    /// Reps actually completed in this set
    pub actual_reps: u32,
    /// Wall time of the set in whole seconds
    pub duration_sec: u64,
    /// Rest taken after the set in seconds
    pub rest_sec: u64,
}

/// Discrete event logged during a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEventRecord {
    /// Event type tag (e.g. `pause`, `tracking_lost`)
    #[serde(rename = "type")]
    pub event_type: String,
    /// Free-form payload
    pub payload: serde_json::Value,
    /// Milliseconds since session start
    pub timestamp_ms: f64,
}
