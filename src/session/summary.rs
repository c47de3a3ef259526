// ABOUTME: Exported session summary shape: totals, timeline, rep and set records, metric results
// ABOUTME: Serialized in camelCase for the persistence boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use chrono::{DateTime, Utc};
use fitplus_core::models::{SessionEventRecord, SetRecord};
use fitplus_motion::{Feedback, Phase};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One downsampled live-score sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSample {
    /// Milliseconds since the first frame
    pub relative_time_ms: f64,
    /// Weighted frame score
    pub score: f64,
    /// Phase at the sample
    pub phase: Phase,
    /// Component scores by key
    pub breakdown: BTreeMap<String, f64>,
}

/// One completed rep as recorded in the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepRecord {
    /// 1-based rep number
    pub rep_index: u32,
    /// Set the rep belongs to
    pub set_number: u32,
    /// Milliseconds since the first frame
    pub relative_time_ms: f64,
    /// Rep score (component total, or frame-score mean when no component was scored)
    pub score: Option<f64>,
    /// Rep duration
    pub duration_ms: f64,
    /// Time since the previous rep
    pub rep_interval_ms: f64,
    /// Rep-level coaching message
    pub feedback: Feedback,
}

/// Aggregate statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    /// Mean rep score
    pub average_rep_score: Option<f64>,
    /// Highest-scoring rep number
    pub best_rep: Option<u32>,
    /// Score of the best rep
    pub best_rep_score: Option<f64>,
    /// Number of sets
    pub total_sets: usize,
    /// Rep attempts discarded as noise
    pub rejected_reps: u32,
    /// Total held time for hold exercises (ms)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold_ms: Option<f64>,
}

/// Detailed session record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDetail {
    /// Downsampled live scores
    pub timeline: Vec<TimelineSample>,
    /// Completed reps
    pub rep_records: Vec<RepRecord>,
    /// Closed sets (one implicit set when none were closed)
    pub set_records: Vec<SetRecord>,
    /// Discrete events
    pub events: Vec<SessionEventRecord>,
    /// Aggregate statistics
    pub stats: SessionStats,
}

/// Per-metric session result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricResult {
    /// Component key
    pub key: String,
    /// Metric key
    pub metric_key: String,
    /// External metric identifier
    pub metric_id: Option<i64>,
    /// Mean component score across reps that scored it
    pub score: Option<f64>,
    /// Mean aggregated metric value across those reps
    pub raw: Option<f64>,
    /// Number of reps that scored it
    pub samples: usize,
}

/// Exported session summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Exercise code
    pub exercise_code: String,
    /// Wall-clock session start
    pub started_at: DateTime<Utc>,
    /// First to last frame, rounded to seconds
    pub duration_sec: u64,
    /// Completed reps
    pub total_reps: u32,
    /// Mean rep score, or mean timeline score when no rep completed
    pub final_score: Option<f64>,
    /// One-line coaching summary
    pub summary_feedback: String,
    /// Detailed record
    pub detail: SessionDetail,
    /// Per-metric results
    pub metric_results: Vec<MetricResult>,
}
