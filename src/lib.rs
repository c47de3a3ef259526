// ABOUTME: Main library entry point for FitPlus real-time exercise scoring
// ABOUTME: Wires the motion engine into sessions, events, persistence, and configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

#![deny(unsafe_code)]

//! # `FitPlus`
//!
//! Real-time exercise motion scoring. Pose frames from an on-device
//! detector flow through a [`session::WorkoutSession`], which smooths
//! landmarks, extracts joint metrics, counts repetitions, scores each rep
//! against a scoring profile, and aggregates a session summary.
//!
//! ## Architecture
//!
//! - [`fitplus_motion`]: the synchronous per-frame engine
//! - [`session`]: per-session aggregation and lifecycle
//! - [`events`]: broadcast bus for rep, feedback, set, and final events
//! - [`persistence`]: async repository boundary and rep forwarding
//! - [`config`] and [`logging`]: environment-driven runtime setup

/// Environment-driven session configuration
pub mod config;
/// Session event bus
pub mod events;
/// Structured logging setup
pub mod logging;
/// Session persistence
pub mod persistence;
/// Workout sessions
pub mod session;

pub use fitplus_core as core;
pub use fitplus_motion as motion;
