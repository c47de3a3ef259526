// ABOUTME: Movement phase vocabulary and the hysteresis-banded phase classifier
// ABOUTME: Maps a primary joint angle to a rep state and a named exercise phase
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use fitplus_core::constants::phase::HYSTERESIS_DEGREES;
use fitplus_core::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named movement phase used to gate metric accumulation
///
/// The set is closed: profiles naming any other phase fail to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Upright, between reps
    Standing,
    /// Descent has begun
    Start,
    /// Arms extended at the top of a push
    Up,
    /// Mid-range of motion
    Mid,
    /// Deepest band of motion
    Bottom,
    /// Rep state: rest position
    Neutral,
    /// Rep state: between rest and full range
    Transition,
    /// Rep state: full range reached
    Active,
    /// No usable primary signal
    Unknown,
}

impl Phase {
    /// Canonical lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standing => "standing",
            Self::Start => "start",
            Self::Up => "up",
            Self::Mid => "mid",
            Self::Bottom => "bottom",
            Self::Neutral => "neutral",
            Self::Transition => "transition",
            Self::Active => "active",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standing" => Ok(Self::Standing),
            "start" => Ok(Self::Start),
            "up" => Ok(Self::Up),
            "mid" => Ok(Self::Mid),
            "bottom" => Ok(Self::Bottom),
            "neutral" => Ok(Self::Neutral),
            "transition" => Ok(Self::Transition),
            "active" => Ok(Self::Active),
            "unknown" => Ok(Self::Unknown),
            _ => Err(ConfigError::UnknownPhase(s.to_owned())),
        }
    }
}

/// Coarse rep state driving the rep counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepState {
    /// Rest position
    #[default]
    Neutral,
    /// Between rest and full range
    Transition,
    /// Full range reached
    Active,
    /// Primary angle unavailable
    Unknown,
}

impl RepState {
    /// Phase name for this state
    #[must_use]
    pub const fn as_phase(self) -> Phase {
        match self {
            Self::Neutral => Phase::Neutral,
            Self::Transition => Phase::Transition,
            Self::Active => Phase::Active,
            Self::Unknown => Phase::Unknown,
        }
    }
}

/// Which way the primary angle moves from rest to full range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Angle shrinks toward the active threshold (squat, push-up)
    #[default]
    Decrease,
    /// Angle grows toward the active threshold (shoulder press)
    Increase,
}

/// Rest and full-range angles for one exercise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateThresholds {
    /// Angle at rest
    pub neutral: f64,
    /// Angle at full range
    pub active: f64,
}

/// Named phase reached once the primary angle exceeds `above`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseBand {
    /// Exclusive lower bound in degrees
    pub above: f64,
    /// Phase assigned in this band
    pub phase: Phase,
}

/// Ordered angle bands naming phases, highest bound first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseBands {
    /// Bands checked in order
    pub bands: Vec<PhaseBand>,
    /// Phase when no band matches
    pub floor: Phase,
}

impl PhaseBands {
    /// Squat-family bands: standing, start, mid, bottom
    #[must_use]
    pub fn squat() -> Self {
        Self {
            bands: vec![
                PhaseBand { above: 165.0, phase: Phase::Standing },
                PhaseBand { above: 140.0, phase: Phase::Start },
                PhaseBand { above: 110.0, phase: Phase::Mid },
            ],
            floor: Phase::Bottom,
        }
    }

    /// Push-up bands: up, mid, bottom
    #[must_use]
    pub fn push_up() -> Self {
        Self {
            bands: vec![
                PhaseBand { above: 150.0, phase: Phase::Up },
                PhaseBand { above: 110.0, phase: Phase::Mid },
            ],
            floor: Phase::Bottom,
        }
    }

    /// Every phase these bands can assign, floor included
    #[must_use]
    pub fn phases(&self) -> Vec<Phase> {
        let mut phases: Vec<Phase> = self.bands.iter().map(|band| band.phase).collect();
        phases.push(self.floor);
        phases.sort_unstable();
        phases.dedup();
        phases
    }

    /// Phase for an angle
    #[must_use]
    pub fn classify(&self, angle: f64) -> Phase {
        self.bands
            .iter()
            .find(|band| angle > band.above)
            .map_or(self.floor, |band| band.phase)
    }
}

/// Phases `PhaseClassifier::classify_phase` can report with `bands` attached
///
/// `Unknown` is always reachable through a missing primary angle.
#[must_use]
pub fn reachable_phases(bands: Option<&PhaseBands>) -> Vec<Phase> {
    let mut phases = bands.map_or_else(
        || vec![Phase::Neutral, Phase::Transition, Phase::Active],
        PhaseBands::phases,
    );
    phases.push(Phase::Unknown);
    phases
}

/// Classifies a primary joint angle into a rep state and a named phase
///
/// With direction `Decrease` and hysteresis `h`:
/// `angle >= neutral - h` is NEUTRAL, `angle <= active + h` is ACTIVE,
/// anything between is TRANSITION. `Increase` mirrors the comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseClassifier {
    thresholds: StateThresholds,
    direction: Direction,
    hysteresis: f64,
    bands: Option<PhaseBands>,
}

impl PhaseClassifier {
    /// Create a classifier with the default hysteresis margin
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidRange` when the thresholds point the
    /// wrong way for the direction or are not finite
    pub fn new(thresholds: StateThresholds, direction: Direction) -> Result<Self, ConfigError> {
        if !thresholds.neutral.is_finite() || !thresholds.active.is_finite() {
            return Err(ConfigError::InvalidRange("phase thresholds must be finite"));
        }
        let ordered = match direction {
            Direction::Decrease => thresholds.neutral > thresholds.active,
            Direction::Increase => thresholds.neutral < thresholds.active,
        };
        if !ordered {
            return Err(ConfigError::InvalidRange(
                "neutral and active thresholds are ordered against the movement direction",
            ));
        }
        Ok(Self {
            thresholds,
            direction,
            hysteresis: HYSTERESIS_DEGREES,
            bands: None,
        })
    }

    /// Attach named phase bands
    #[must_use]
    pub fn with_bands(mut self, bands: PhaseBands) -> Self {
        self.bands = Some(bands);
        self
    }

    /// Override the hysteresis margin (degrees)
    #[must_use]
    pub const fn with_hysteresis(mut self, hysteresis: f64) -> Self {
        self.hysteresis = hysteresis;
        self
    }

    /// Rep state for an angle; `None` yields `Unknown`
    #[must_use]
    pub fn classify_state(&self, angle: Option<f64>) -> RepState {
        let Some(angle) = angle.filter(|a| a.is_finite()) else {
            return RepState::Unknown;
        };
        let StateThresholds { neutral, active } = self.thresholds;
        let h = self.hysteresis;
        match self.direction {
            Direction::Decrease => {
                if angle >= neutral - h {
                    RepState::Neutral
                } else if angle <= active + h {
                    RepState::Active
                } else {
                    RepState::Transition
                }
            }
            Direction::Increase => {
                if angle <= neutral + h {
                    RepState::Neutral
                } else if angle >= active - h {
                    RepState::Active
                } else {
                    RepState::Transition
                }
            }
        }
    }

    /// Named phase for an angle
    ///
    /// Uses the attached bands when present, otherwise the rep state name.
    #[must_use]
    pub fn classify_phase(&self, angle: Option<f64>) -> Phase {
        match (&self.bands, angle.filter(|a| a.is_finite())) {
            (_, None) => Phase::Unknown,
            (Some(bands), Some(angle)) => bands.classify(angle),
            (None, Some(angle)) => self.classify_state(Some(angle)).as_phase(),
        }
    }

    /// Thresholds in use
    #[must_use]
    pub const fn thresholds(&self) -> StateThresholds {
        self.thresholds
    }

    /// Movement direction
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}
