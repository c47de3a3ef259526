// ABOUTME: Core types and constants for the FitPlus motion-scoring platform
// ABOUTME: Foundation crate with error handling, landmark topology, and session models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

#![deny(unsafe_code)]

//! # `FitPlus` Core
//!
//! Foundation crate providing shared types and constants for the `FitPlus`
//! motion-scoring platform. It changes infrequently so the heavier engine
//! and session crates can build incrementally on top of it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `ConfigError`
//! - **constants**: Landmark topology, default thresholds, and filter presets
//! - **models**: Landmarks, pose frames, body sides, and session export shapes

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (landmarks, poses, session records)
pub mod models;
