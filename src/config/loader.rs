// ABOUTME: Async loading of scoring profiles and exercise patterns from JSON files
// ABOUTME: Falls back to the built-in catalogue when no file is given
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use fitplus_core::errors::{AppError, AppResult};
use fitplus_motion::{ExercisePattern, ScoringProfile};
use std::path::Path;
use tokio::fs;

async fn read(path: &Path, what: &str) -> AppResult<String> {
    fs::read_to_string(path).await.map_err(|e| {
        AppError::invalid_input(format!("cannot read {what} {}", path.display())).with_source(e)
    })
}

/// Load a scoring profile file, or the built-in profile for `exercise`
///
/// # Errors
///
/// Returns an error when the file cannot be read or fails validation, or
/// when no file is given and the exercise has no built-in profile
pub async fn load_profile(path: Option<&Path>, exercise: &str) -> AppResult<ScoringProfile> {
    match path {
        Some(path) => Ok(ScoringProfile::from_json(&read(path, "profile").await?)?),
        None => Ok(ScoringProfile::builtin(exercise)?),
    }
}

/// Load an exercise pattern file, or the built-in pattern for `exercise`
///
/// # Errors
///
/// Returns an error when the file cannot be read or fails validation, or
/// when no file is given and the exercise is not in the catalogue
pub async fn load_pattern(path: Option<&Path>, exercise: &str) -> AppResult<ExercisePattern> {
    match path {
        Some(path) => Ok(ExercisePattern::from_json(&read(path, "pattern").await?)?),
        None => Ok(ExercisePattern::builtin(exercise)?),
    }
}
