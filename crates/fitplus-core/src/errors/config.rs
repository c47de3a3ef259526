// ABOUTME: Configuration error types for scoring profile and exercise pattern validation
// ABOUTME: Defines error variants for inverted bounds, bad weights, and unknown enum names
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

//! Configuration error types.
//!
//! These are raised at profile-load time and are never recovered.

use std::env;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value outside acceptable range
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Ideal/hard bounds of a scoring rule are inverted or not nested
    #[error("Invalid bounds for metric '{metric}': {detail}")]
    InvalidBounds {
        /// Metric key the rule belongs to
        metric: String,
        /// What is wrong with the bounds
        detail: String,
    },

    /// Weight is negative or not finite
    #[error("Invalid weight for metric '{metric}': {weight}")]
    InvalidWeight {
        /// Metric key the weight belongs to
        metric: String,
        /// Offending weight
        weight: f64,
    },

    /// Aggregation kind is not one of min, max, mean, p05, p95, last
    #[error("Unknown aggregation kind: {0}")]
    UnknownAggregation(String),

    /// Rule kind is not one of min, max, range
    #[error("Unknown scoring rule kind: {0}")]
    UnknownRuleKind(String),

    /// Phase name is not part of the closed phase set
    #[error("Unknown phase: {0}")]
    UnknownPhase(String),

    /// Component is gated to phases its exercise never reports
    #[error("Metric '{metric}' is gated to phases [{phases}] that exercise '{exercise}' never reports")]
    UnreachablePhases {
        /// Component key
        metric: String,
        /// Exercise code
        exercise: String,
        /// Gating phases as written
        phases: String,
    },

    /// Unknown exercise code with no built-in pattern
    #[error("Unknown exercise: {0}")]
    UnknownExercise(String),

    /// Profile defines no metrics
    #[error("Scoring profile defines no metrics")]
    EmptyProfile,

    /// Environment variable access error
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] env::VarError),

    /// Failed to parse configuration value
    #[error("Parse error: {0}")]
    Parse(String),

    /// Numeric value outside valid range for parameter
    #[error("Value out of range: {0}")]
    ValueOutOfRange(&'static str),
}
