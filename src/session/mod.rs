// ABOUTME: Workout session layer: aggregation, live pipeline, lifecycle service, export types
// ABOUTME: One instance set per session; no state is shared between sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

/// Per-session aggregation
pub mod aggregator;
/// Session lifecycle against a repository
pub mod service;
/// Exported summary types
pub mod summary;
/// Live session pipeline
pub mod workout;

pub use aggregator::{Observation, SessionAggregator};
pub use service::{ActiveSession, SessionOutcome, WorkoutService};
pub use summary::{
    MetricResult, RepRecord, SessionDetail, SessionStats, SessionSummary, TimelineSample,
};
pub use workout::{FrameOutcome, WorkoutSession};
