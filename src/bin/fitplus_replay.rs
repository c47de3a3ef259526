// ABOUTME: Command-line replay of recorded pose frames through a scored workout session
// ABOUTME: Reads JSON Lines frames, prints the session summary, and validates profiles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

//! Usage:
//! ```bash
//! # Replay a recording with the built-in side squat profile
//! fitplus-replay replay --frames session.jsonl --exercise side_squat
//!
//! # Replay with a custom profile and print every rep
//! fitplus-replay replay --frames session.jsonl --exercise push_up --profile push_up.json --reps
//!
//! # Check a profile document
//! fitplus-replay validate-profile push_up.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fitplus::config::{load_pattern, load_profile, MotionConfig};
use fitplus::logging::LoggingConfig;
use fitplus::persistence::InMemorySessionRepository;
use fitplus::session::WorkoutService;
use fitplus_core::models::{PoseFrame, SessionMode};
use fitplus_motion::{ExercisePattern, ScoringProfile};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "fitplus-replay",
    about = "Replay recorded pose frames through FitPlus scoring",
    long_about = "Feed JSON Lines pose frames (one PoseFrame per line) through a workout session and print the exported summary."
)]
struct ReplayArgs {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a frame recording
    Replay {
        /// JSON Lines file of pose frames
        #[arg(long)]
        frames: PathBuf,

        /// Exercise code: squat, side_squat, lunge, push_up, burpee, deadlift,
        /// shoulder_press, bicep_curl or plank
        #[arg(long)]
        exercise: String,

        /// Scoring profile JSON; defaults to the built-in profile for the exercise
        #[arg(long)]
        profile: Option<PathBuf>,

        /// Custom exercise pattern JSON overriding the built-in catalogue
        #[arg(long)]
        pattern: Option<PathBuf>,

        /// Print each rep score as it completes
        #[arg(long)]
        reps: bool,
    },
    /// Load and validate a scoring profile
    ValidateProfile {
        /// Profile JSON file
        path: PathBuf,
    },
}

async fn replay(
    frames: &Path,
    exercise: &str,
    profile: Option<&Path>,
    pattern: Option<&Path>,
    print_reps: bool,
) -> Result<()> {
    let config = MotionConfig::from_env()?;
    let profile = load_profile(profile, exercise).await?;
    let pattern = load_pattern(pattern, exercise).await?;

    let repository = Arc::new(InMemorySessionRepository::new());
    let service = WorkoutService::new(repository, config);
    let mut active = service.start(pattern, profile, SessionMode::Free).await?;

    let recording = fs::read_to_string(frames)
        .await
        .with_context(|| format!("reading frames {}", frames.display()))?;
    let mut processed = 0_usize;
    for (line_no, line) in recording.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let frame: PoseFrame = match serde_json::from_str(line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(line = line_no + 1, error = %e, "Skipping malformed frame");
                continue;
            }
        };
        let outcome = active.session.process_frame(&frame);
        processed += 1;
        if let (true, Some(rep)) = (print_reps, &outcome.rep) {
            println!("{}", serde_json::to_string(rep)?);
        }
    }
    info!(frames = processed, "Replay finished");

    let outcome = service.finish(active).await;
    if let Some(e) = outcome.persistence_error {
        warn!(error = %e, "Summary was not stored");
    }
    println!("{}", serde_json::to_string_pretty(&outcome.summary)?);
    Ok(())
}

async fn validate_profile(path: &Path) -> Result<()> {
    let json = fs::read_to_string(path)
        .await
        .with_context(|| format!("reading profile {}", path.display()))?;
    let profile = ScoringProfile::from_json(&json)?;
    if let Ok(pattern) = ExercisePattern::builtin(&profile.exercise_code) {
        pattern.check_profile(&profile)?;
    }
    let weight: f64 = profile.components.iter().map(|c| c.weight).sum();
    println!(
        "{}: {} components, total weight {weight:.2}",
        profile.exercise_code,
        profile.components.len()
    );
    for component in &profile.components {
        if component.metric.key().is_none() {
            println!(
                "  warning: '{}' uses unmapped metric '{}'",
                component.key,
                component.metric.as_str()
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ReplayArgs::parse();

    let mut logging = LoggingConfig::from_env().with_stderr();
    if args.verbose {
        logging.level = "debug".into();
    }
    logging.init()?;

    match args.command {
        Command::Replay {
            frames,
            exercise,
            profile,
            pattern,
            reps,
        } => {
            replay(
                &frames,
                &exercise,
                profile.as_deref(),
                pattern.as_deref(),
                reps,
            )
            .await
        }
        Command::ValidateProfile { path } => validate_profile(&path).await,
    }
}
