// ABOUTME: Session persistence boundary: start, per-rep events, end, and lookup
// ABOUTME: Implementations are async and best-effort from the frame loop's point of view
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

//! Session persistence.
//!
//! Local aggregation is the source of truth during a session. Rep events
//! reach the repository through [`RepEventForwarder`], which never blocks
//! scoring and only logs failures.

/// Forwards rep events from the session bus to a repository
pub mod forwarder;
/// In-memory repository
pub mod memory;

pub use forwarder::{ForwarderStats, RepEventForwarder};
pub use memory::InMemorySessionRepository;

use crate::session::SessionSummary;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fitplus_core::errors::AppResult;
use fitplus_core::models::{SessionHandle, SessionMode};
use fitplus_motion::RepScoreResult;
use serde::{Deserialize, Serialize};

/// Parameters for opening a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartSessionRequest {
    /// Exercise code
    pub exercise_id: String,
    /// Scoring profile identifier, when one came from storage
    pub scoring_profile_id: Option<i64>,
    /// Session mode
    pub mode: SessionMode,
}

/// One persisted rep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepEventPayload {
    /// 1-based rep number
    pub rep_index: u32,
    /// Time since the previous rep
    pub rep_interval_ms: f64,
    /// Full rep score
    pub score: RepScoreResult,
}

impl From<&RepScoreResult> for RepEventPayload {
    fn from(result: &RepScoreResult) -> Self {
        Self {
            rep_index: result.rep_index,
            rep_interval_ms: result.rep_interval_ms,
            score: result.clone(),
        }
    }
}

/// Lifecycle status of a stored session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Accepting rep events
    Active,
    /// Ended with a summary
    Completed,
    /// Discarded without a summary
    Aborted,
}

/// A stored session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session handle
    pub handle: SessionHandle,
    /// Exercise code
    pub exercise_id: String,
    /// Scoring profile identifier
    pub scoring_profile_id: Option<i64>,
    /// Session mode
    pub mode: SessionMode,
    /// Lifecycle status
    pub status: SessionStatus,
    /// When the session was opened
    pub started_at: DateTime<Utc>,
    /// When the session was ended or aborted
    pub ended_at: Option<DateTime<Utc>>,
    /// Rep events in arrival order
    pub rep_events: Vec<RepEventPayload>,
    /// Final summary, once completed
    pub summary: Option<SessionSummary>,
}

/// Storage for workout sessions
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Open a session and return its handle
    async fn start_session(&self, request: StartSessionRequest) -> AppResult<SessionHandle>;

    /// Append a rep event to an active session
    async fn record_rep_event(
        &self,
        handle: SessionHandle,
        event: RepEventPayload,
    ) -> AppResult<()>;

    /// Close a session with its summary
    async fn end_session(&self, handle: SessionHandle, summary: SessionSummary) -> AppResult<()>;

    /// Close a session without a summary
    async fn abort_session(&self, handle: SessionHandle) -> AppResult<()>;

    /// Look up a session
    async fn get_session(&self, handle: SessionHandle) -> AppResult<Option<SessionRecord>>;
}
