// ABOUTME: Exercise and scoring configuration: movement patterns and scoring profiles
// ABOUTME: Everything here validates at load time and fails fast on bad input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

/// Built-in scoring profiles
pub mod builtin;
/// Exercise movement patterns
pub mod exercise;
/// Scoring profile schema and validation
pub mod profile;

pub use exercise::{normalize_code, ExercisePattern, HoldPattern, Motion, RepPattern};
pub use profile::{
    ProfileMetricSpec, RuleSpec, ScoringComponent, ScoringProfile, ScoringProfileSpec,
};
