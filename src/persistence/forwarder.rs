// ABOUTME: Background task relaying completed reps from a session bus to a repository
// ABOUTME: Persistence failures are logged and counted, never surfaced to the frame loop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use super::{RepEventPayload, SessionRepository};
use crate::events::SessionEvent;
use fitplus_core::constants::session::PERSISTENCE_SERVICE;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Counters reported when a forwarder stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwarderStats {
    /// Rep events stored
    pub forwarded: u64,
    /// Rep events the repository rejected
    pub failed: u64,
    /// Events dropped because the forwarder fell behind
    pub lagged: u64,
}

/// Relays `RepCompleted` events to a repository until the bus closes
pub struct RepEventForwarder {
    repository: Arc<dyn SessionRepository>,
    receiver: broadcast::Receiver<SessionEvent>,
}

impl RepEventForwarder {
    /// Forwarder over a subscribed receiver
    #[must_use]
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        receiver: broadcast::Receiver<SessionEvent>,
    ) -> Self {
        Self {
            repository,
            receiver,
        }
    }

    /// Run on the current tokio runtime
    #[must_use]
    pub fn spawn(self) -> JoinHandle<ForwarderStats> {
        tokio::spawn(self.run())
    }

    /// Forward until every sender is dropped
    pub async fn run(mut self) -> ForwarderStats {
        let mut stats = ForwarderStats::default();
        loop {
            match self.receiver.recv().await {
                Ok(SessionEvent::RepCompleted { handle, result }) => {
                    let payload = RepEventPayload::from(result.as_ref());
                    match self.repository.record_rep_event(handle, payload).await {
                        Ok(()) => stats.forwarded += 1,
                        Err(e) => {
                            stats.failed += 1;
                            warn!(
                                service = PERSISTENCE_SERVICE,
                                session = %handle,
                                rep_index = result.rep_index,
                                error = %e,
                                "Failed to persist rep event; local aggregation unaffected"
                            );
                        }
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    stats.lagged += skipped;
                    warn!(skipped, "Rep event forwarder lagged behind the session bus");
                }
                Err(RecvError::Closed) => break,
            }
        }
        debug!(?stats, "Rep event forwarder stopped");
        stats
    }
}
