// ABOUTME: Motion analysis engine: smoothing, geometry, metrics, phases, reps, and scoring
// ABOUTME: Pure, synchronous, single-threaded; one instance per workout session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

#![deny(unsafe_code)]

//! # `FitPlus` Motion
//!
//! Turns a stream of pose landmarks into repetition counts and form scores.
//!
//! The per-frame path is
//! [`filter`] -> [`geometry`] -> [`metrics`] -> [`phase`] -> [`rep_counter`],
//! with [`accumulator`] collecting per-rep metric values for the
//! [`scoring`] engine. [`tracker::MotionTracker`] wires the first four
//! together; [`config`] supplies exercise patterns and scoring profiles.

/// Per-rep metric accumulation
pub mod accumulator;
/// Exercise patterns and scoring profiles
pub mod config;
/// One-euro smoothing
pub mod filter;
/// Landmark geometry
pub mod geometry;
/// Metric vocabulary and extraction
pub mod metrics;
/// Phase classification
pub mod phase;
/// Repetition counting
pub mod rep_counter;
/// Rep and frame scoring
pub mod scoring;
/// Frame-to-snapshot pipeline
pub mod tracker;

pub use accumulator::{AccumulatorSet, Aggregation, MetricAccumulator};
pub use config::{ExercisePattern, ScoringProfile};
pub use filter::{FilterParams, LandmarkSmoother, OneEuroFilter, SmootherPreset};
pub use geometry::{AngleSource, BodyGeometry};
pub use metrics::{MetricExtractor, MetricKey, MetricSource, MetricsSnapshot};
pub use phase::{Direction, Phase, PhaseClassifier, RepState, StateThresholds};
pub use rep_counter::{trimmed_mean, HoldStatus, HoldTracker, RepCounter, RepEvent, RepTiming};
pub use scoring::{
    ComponentScore, Feedback, FeedbackLevel, FrameScore, RepScoreResult, ScoreStatus,
    ScoringEngine,
};
pub use tracker::{MotionTracker, TrackerOptions};
