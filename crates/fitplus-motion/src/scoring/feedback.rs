// ABOUTME: Coaching message lookup by component and status, and rep-level feedback selection
// ABOUTME: The worst-scoring component drives the message; thresholds pick its severity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use super::rule::ScoreStatus;
use fitplus_core::constants::scoring::{SUCCESS_THRESHOLD, WARNING_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const SUCCESS_MESSAGE: &str = "Great! Your form is spot on.";
const WARNING_FALLBACK: &str = "Adjust your form.";
const INFO_FALLBACK: &str = "Pay a little more attention to your form.";

const SLOW_DOWN: &str = "Too fast. Move slowly and under control.";
const EASE_UP: &str = "Try going a little slower.";
const SPEED_UP: &str = "You can go a little faster.";

/// Severity of a feedback message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackLevel {
    /// Good rep
    Success,
    /// Minor correction
    Info,
    /// Significant correction
    Warning,
}

/// One coaching message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// Severity
    #[serde(rename = "type")]
    pub level: FeedbackLevel,
    /// Message text
    pub message: String,
    /// Component that triggered it, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

impl Feedback {
    fn new(level: FeedbackLevel, message: impl Into<String>, component: Option<String>) -> Self {
        Self {
            level,
            message: message.into(),
            component,
        }
    }
}

/// Message lookup keyed by component key and status
#[derive(Debug, Clone, Default)]
pub struct FeedbackTable {
    messages: HashMap<(String, ScoreStatus), String>,
    success_threshold: f64,
}

type Entry = (&'static str, ScoreStatus, &'static str);

const SQUAT_MESSAGES: &[Entry] = &[
    ("depth", ScoreStatus::TooLow, "Knees bent too deep. Stop when your thighs are parallel to the floor."),
    ("depth", ScoreStatus::Low, "You can sit a little shallower."),
    ("depth", ScoreStatus::TooHigh, "Not deep enough. Sit lower."),
    ("depth", ScoreStatus::High, "Sit a little deeper."),
    ("hip_hinge", ScoreStatus::TooHigh, "Your hips are pushed too far back."),
    ("hip_hinge", ScoreStatus::High, "Push your hips back a little less."),
    ("torso_lean", ScoreStatus::TooHigh, "Upper body leans too far forward. Keep your back more upright."),
    ("torso_lean", ScoreStatus::High, "Lift your chest a little more."),
    ("knee_forward", ScoreStatus::TooHigh, "Knees travel too far past your toes."),
    ("knee_forward", ScoreStatus::High, "Knees drift slightly forward."),
    ("tempo", ScoreStatus::TooLow, SLOW_DOWN),
    ("tempo", ScoreStatus::Low, EASE_UP),
    ("tempo", ScoreStatus::TooHigh, "Too slow. Try moving a bit faster."),
    ("tempo", ScoreStatus::High, SPEED_UP),
];

const PUSH_UP_MESSAGES: &[Entry] = &[
    ("depth", ScoreStatus::TooLow, "Arms bent too deep."),
    ("depth", ScoreStatus::Low, "You can go down a little less."),
    ("depth", ScoreStatus::TooHigh, "Go lower, until your elbows reach 90 degrees!"),
    ("depth", ScoreStatus::High, "Go a little deeper."),
    ("body_line", ScoreStatus::TooLow, "Your body is not in a straight line. Brace your core."),
    ("body_line", ScoreStatus::Low, "Straighten your body more."),
    ("wrist_stack", ScoreStatus::TooHigh, "Wrists are not under your shoulders. Adjust your hands."),
    ("wrist_stack", ScoreStatus::High, "Adjust your wrist position slightly."),
    ("hip_sag", ScoreStatus::TooLow, "Your hips are sagging. Lift them up."),
    ("hip_sag", ScoreStatus::Low, "Raise your hips a little."),
    ("tempo", ScoreStatus::TooLow, SLOW_DOWN),
    ("tempo", ScoreStatus::Low, EASE_UP),
    ("tempo", ScoreStatus::TooHigh, "Too slow."),
    ("tempo", ScoreStatus::High, SPEED_UP),
];

impl FeedbackTable {
    /// Empty table with the default success threshold
    #[must_use]
    pub fn new() -> Self {
        Self {
            messages: HashMap::new(),
            success_threshold: SUCCESS_THRESHOLD,
        }
    }

    /// Built-in messages for an exercise code; empty for exercises without a table
    #[must_use]
    pub fn for_exercise(exercise_code: &str) -> Self {
        let entries: &[Entry] = match exercise_code {
            "side_squat" | "squat" | "lunge" => SQUAT_MESSAGES,
            "push_up" => PUSH_UP_MESSAGES,
            _ => &[],
        };
        let mut table = Self::new();
        for (component, status, message) in entries {
            table.insert(component, *status, *message);
        }
        table
    }

    /// Minimum worst-component score counted as a clean rep
    #[must_use]
    pub const fn with_success_threshold(mut self, threshold: f64) -> Self {
        self.success_threshold = threshold;
        self
    }

    /// Add or replace a message
    pub fn insert(&mut self, component: &str, status: ScoreStatus, message: impl Into<String>) {
        self.messages
            .insert((component.to_owned(), status), message.into());
    }

    /// Message for a component in a status, if one is defined
    #[must_use]
    pub fn lookup(&self, component: &str, status: ScoreStatus) -> Option<&str> {
        self.messages
            .get(&(component.to_owned(), status))
            .map(String::as_str)
    }

    /// Rep-level feedback from the worst scored component
    ///
    /// `components` yields `(key, score, status)`; unscored components are skipped.
    #[must_use]
    pub fn summarize<'a>(
        &self,
        components: impl IntoIterator<Item = (&'a str, Option<f64>, ScoreStatus)>,
    ) -> Feedback {
        let worst = components
            .into_iter()
            .filter_map(|(key, score, status)| score.map(|s| (key, s, status)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let Some((key, score, status)) = worst.filter(|(_, s, _)| *s < self.success_threshold) else {
            return Feedback::new(FeedbackLevel::Success, SUCCESS_MESSAGE, None);
        };

        let message = self.lookup(key, status);
        if score < WARNING_THRESHOLD {
            Feedback::new(
                FeedbackLevel::Warning,
                message.unwrap_or(WARNING_FALLBACK),
                Some(key.to_owned()),
            )
        } else {
            Feedback::new(
                FeedbackLevel::Info,
                message.unwrap_or(INFO_FALLBACK),
                Some(key.to_owned()),
            )
        }
    }
}
