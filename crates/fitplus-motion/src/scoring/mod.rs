// ABOUTME: Rep and frame scoring: curves, weighted totals, and coaching feedback
// ABOUTME: Re-exports the engine, rule, and feedback types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

/// Scoring engine and result types
pub mod engine;
/// Coaching feedback lookup
pub mod feedback;
/// Scoring curves
pub mod rule;

pub use engine::{
    round_to, weighted_total, ComponentScore, FrameScore, RepScoreResult, ScoringEngine,
};
pub use feedback::{Feedback, FeedbackLevel, FeedbackTable};
pub use rule::{RuleKind, ScoreStatus, ScoringRule};
