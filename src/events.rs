// ABOUTME: Broadcast bus for session events: completed reps, feedback, sets, finalization
// ABOUTME: Consumers (persistence forwarder, UI bridges) subscribe without blocking the frame loop
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use crate::session::SessionSummary;
use fitplus_core::models::{SessionHandle, SetRecord};
use fitplus_motion::{Feedback, HoldStatus, RepScoreResult};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Something that happened in a workout session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A rep was completed and scored
    RepCompleted {
        /// Session the rep belongs to
        handle: SessionHandle,
        /// Rep score
        result: Box<RepScoreResult>,
    },
    /// Coaching message for the latest rep
    Feedback {
        /// Session the message belongs to
        handle: SessionHandle,
        /// Message
        feedback: Feedback,
    },
    /// Hold progress for time-based exercises
    Hold {
        /// Session
        handle: SessionHandle,
        /// Hold status
        status: HoldStatus,
    },
    /// A set was closed
    SetCompleted {
        /// Session
        handle: SessionHandle,
        /// Set record
        set: SetRecord,
    },
    /// The session was finalized
    Finalized {
        /// Session
        handle: SessionHandle,
        /// Final summary
        summary: Box<SessionSummary>,
    },
}

/// Broadcast channel for one session's events
#[derive(Debug, Clone)]
pub struct SessionEventBus {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEventBus {
    /// Create a bus with the specified buffer size
    #[must_use]
    pub fn new(buffer_size: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size.max(1));
        Self { sender }
    }

    /// Subscribe to events published after this call
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Publish an event; returns the number of receivers reached
    ///
    /// Publishing with no subscribers is not an error for a session, so the
    /// send failure is folded into a zero count.
    pub fn publish(&self, event: SessionEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Get count of active subscribers
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
