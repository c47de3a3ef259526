// ABOUTME: Session lifecycle against a repository: start, forward reps, finish or abort
// ABOUTME: Persistence errors at finish are reported alongside the locally computed summary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use super::summary::SessionSummary;
use super::workout::WorkoutSession;
use crate::config::MotionConfig;
use crate::persistence::{
    ForwarderStats, RepEventForwarder, SessionRepository, StartSessionRequest,
};
use fitplus_core::errors::{AppError, AppResult};
use fitplus_core::models::SessionMode;
use fitplus_motion::{ExercisePattern, ScoringProfile};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// A running session with its persistence forwarder
#[derive(Debug)]
pub struct ActiveSession {
    /// The live session
    pub session: WorkoutSession,
    forwarder: JoinHandle<ForwarderStats>,
}

/// Result of finishing a session
#[derive(Debug)]
pub struct SessionOutcome {
    /// Locally computed summary
    pub summary: SessionSummary,
    /// Rep forwarding counters
    pub forwarder: ForwarderStats,
    /// Error from storing the summary, if any
    pub persistence_error: Option<AppError>,
}

/// Opens and closes sessions against a repository
#[derive(Clone)]
pub struct WorkoutService {
    repository: Arc<dyn SessionRepository>,
    config: MotionConfig,
}

impl WorkoutService {
    /// Service over a repository
    #[must_use]
    pub fn new(repository: Arc<dyn SessionRepository>, config: MotionConfig) -> Self {
        Self { repository, config }
    }

    /// Repository in use
    #[must_use]
    pub fn repository(&self) -> &Arc<dyn SessionRepository> {
        &self.repository
    }

    /// Open a session and start forwarding its reps
    ///
    /// # Errors
    ///
    /// Returns an error when the repository cannot open the session or the
    /// pattern is invalid
    pub async fn start(
        &self,
        pattern: ExercisePattern,
        profile: ScoringProfile,
        mode: SessionMode,
    ) -> AppResult<ActiveSession> {
        let handle = self
            .repository
            .start_session(StartSessionRequest {
                exercise_id: pattern.code.clone(),
                scoring_profile_id: profile.profile_id,
                mode,
            })
            .await?;
        let session = WorkoutSession::new(handle, pattern, profile, &self.config)?;
        let forwarder =
            RepEventForwarder::new(Arc::clone(&self.repository), session.subscribe()).spawn();
        info!(session = %handle, exercise = %session.pattern().code, "Workout session ready");
        Ok(ActiveSession { session, forwarder })
    }

    async fn drain(forwarder: JoinHandle<ForwarderStats>) -> ForwarderStats {
        forwarder.await.unwrap_or_else(|e| {
            warn!(error = %e, "Rep event forwarder task failed");
            ForwarderStats::default()
        })
    }

    /// Finalize locally, let pending rep events drain, then store the summary
    pub async fn finish(&self, active: ActiveSession) -> SessionOutcome {
        let ActiveSession {
            mut session,
            forwarder,
        } = active;
        let handle = session.handle();
        let summary = session.finalize();
        drop(session);

        let forwarder = Self::drain(forwarder).await;
        let persistence_error = self
            .repository
            .end_session(handle, summary.clone())
            .await
            .err();
        if let Some(e) = &persistence_error {
            warn!(session = %handle, error = %e, "Failed to store session summary");
        }
        SessionOutcome {
            summary,
            forwarder,
            persistence_error,
        }
    }

    /// Discard a session without a summary
    ///
    /// # Errors
    ///
    /// Returns the repository error when the abort cannot be recorded
    pub async fn abort(&self, active: ActiveSession) -> AppResult<()> {
        let ActiveSession { session, forwarder } = active;
        let handle = session.handle();
        drop(session);
        Self::drain(forwarder).await;
        self.repository.abort_session(handle).await
    }
}
