// ABOUTME: DashMap-backed session repository for the replay tool and tests
// ABOUTME: Enforces lifecycle rules: writes only to active sessions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use super::{
    RepEventPayload, SessionRecord, SessionRepository, SessionStatus, StartSessionRequest,
};
use crate::session::SessionSummary;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use fitplus_core::errors::{AppError, AppResult};
use fitplus_core::models::SessionHandle;
use tracing::{debug, info};

/// Session repository held in process memory
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: DashMap<SessionHandle, SessionRecord>,
}

impl InMemorySessionRepository {
    /// Create an empty repository
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no session is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn with_active<T>(
        &self,
        handle: SessionHandle,
        update: impl FnOnce(&mut SessionRecord) -> T,
    ) -> AppResult<T> {
        let mut record = self
            .sessions
            .get_mut(&handle)
            .ok_or_else(|| AppError::not_found(format!("Session {handle}")))?;
        if record.status != SessionStatus::Active {
            return Err(AppError::locked(format!("Session {handle}")));
        }
        Ok(update(&mut record))
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn start_session(&self, request: StartSessionRequest) -> AppResult<SessionHandle> {
        let handle = SessionHandle::new();
        info!(session = %handle, exercise = %request.exercise_id, "Session started");
        self.sessions.insert(
            handle,
            SessionRecord {
                handle,
                exercise_id: request.exercise_id,
                scoring_profile_id: request.scoring_profile_id,
                mode: request.mode,
                status: SessionStatus::Active,
                started_at: Utc::now(),
                ended_at: None,
                rep_events: Vec::new(),
                summary: None,
            },
        );
        Ok(handle)
    }

    async fn record_rep_event(
        &self,
        handle: SessionHandle,
        event: RepEventPayload,
    ) -> AppResult<()> {
        debug!(session = %handle, rep_index = event.rep_index, "Recording rep event");
        self.with_active(handle, |record| record.rep_events.push(event))
    }

    async fn end_session(&self, handle: SessionHandle, summary: SessionSummary) -> AppResult<()> {
        self.with_active(handle, |record| {
            info!(session = %handle, total_reps = summary.total_reps, "Session completed");
            record.status = SessionStatus::Completed;
            record.ended_at = Some(Utc::now());
            record.summary = Some(summary);
        })
    }

    async fn abort_session(&self, handle: SessionHandle) -> AppResult<()> {
        self.with_active(handle, |record| {
            info!(session = %handle, "Session aborted");
            record.status = SessionStatus::Aborted;
            record.ended_at = Some(Utc::now());
        })
    }

    async fn get_session(&self, handle: SessionHandle) -> AppResult<Option<SessionRecord>> {
        Ok(self.sessions.get(&handle).map(|record| record.clone()))
    }
}
