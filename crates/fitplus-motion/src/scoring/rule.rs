// ABOUTME: Scoring curves mapping an aggregated metric value to a 0-100 score and status
// ABOUTME: Max, min, and range rules with ideal and hard bounds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use fitplus_core::constants::scoring::{DENOMINATOR_EPSILON, FULL_SCORE};
use fitplus_core::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape of a scoring curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Lower is better; penalized above the ideal maximum
    Max,
    /// Higher is better; penalized below the ideal minimum
    Min,
    /// Best inside the ideal band; penalized on both sides
    Range,
}

impl FromStr for RuleKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" => Ok(Self::Max),
            "min" => Ok(Self::Min),
            "range" => Ok(Self::Range),
            _ => Err(ConfigError::UnknownRuleKind(s.to_owned())),
        }
    }
}

/// Outcome category of a scored component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreStatus {
    /// Within the ideal band
    Ok,
    /// Below ideal, above the hard minimum
    Low,
    /// At or below the hard minimum
    TooLow,
    /// Above ideal, below the hard maximum
    High,
    /// At or above the hard maximum
    TooHigh,
    /// No value was available
    Missing,
    /// Not evaluated in the current phase
    Skipped,
}

impl ScoreStatus {
    /// Canonical name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Low => "low",
            Self::TooLow => "too_low",
            Self::High => "high",
            Self::TooHigh => "too_high",
            Self::Missing => "missing",
            Self::Skipped => "skipped",
        }
    }

    /// Whether the component contributes to the weighted total
    #[must_use]
    pub const fn is_scored(self) -> bool {
        !matches!(self, Self::Missing | Self::Skipped)
    }
}

impl fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreStatus {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ok" => Ok(Self::Ok),
            "low" => Ok(Self::Low),
            "too_low" => Ok(Self::TooLow),
            "high" => Ok(Self::High),
            "too_high" => Ok(Self::TooHigh),
            "missing" => Ok(Self::Missing),
            "skipped" => Ok(Self::Skipped),
            other => Err(ConfigError::Parse(format!("unknown score status '{other}'"))),
        }
    }
}

/// A scoring curve with ideal and hard `[min, max]` bounds
///
/// Invariant (checked by [`Self::validate`]):
/// `hard.0 <= ideal.0 <= ideal.1 <= hard.1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringRule {
    /// Curve shape
    pub kind: RuleKind,
    /// Full-score band
    pub ideal: (f64, f64),
    /// Zero-score limits
    pub hard: (f64, f64),
}

fn ramp(numerator: f64, denominator: f64) -> f64 {
    FULL_SCORE * (numerator / denominator.max(DENOMINATOR_EPSILON))
}

impl ScoringRule {
    /// Create a rule without validating it
    #[must_use]
    pub const fn new(kind: RuleKind, ideal: (f64, f64), hard: (f64, f64)) -> Self {
        Self { kind, ideal, hard }
    }

    /// Check bounds are finite, ordered, and nested
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBounds` naming `metric` when they are not
    pub fn validate(&self, metric: &str) -> Result<(), ConfigError> {
        let bad = |detail: &str| ConfigError::InvalidBounds {
            metric: metric.to_owned(),
            detail: detail.to_owned(),
        };
        let all = [self.ideal.0, self.ideal.1, self.hard.0, self.hard.1];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(bad("bounds must be finite"));
        }
        if self.ideal.0 > self.ideal.1 {
            return Err(bad("ideal minimum exceeds ideal maximum"));
        }
        if self.hard.0 > self.hard.1 {
            return Err(bad("hard minimum exceeds hard maximum"));
        }
        if self.hard.0 > self.ideal.0 || self.ideal.1 > self.hard.1 {
            return Err(bad("ideal band must lie within hard bounds"));
        }
        Ok(())
    }

    /// Score a value; the result is always within `[0, 100]`
    #[must_use]
    pub fn score(&self, value: f64) -> (f64, ScoreStatus) {
        let (ideal_min, ideal_max) = self.ideal;
        let (hard_min, hard_max) = self.hard;
        match self.kind {
            RuleKind::Max => Self::score_high_side(value, ideal_max, hard_max),
            RuleKind::Min => Self::score_low_side(value, ideal_min, hard_min),
            RuleKind::Range => {
                if value < ideal_min {
                    Self::score_low_side(value, ideal_min, hard_min)
                } else if value > ideal_max {
                    Self::score_high_side(value, ideal_max, hard_max)
                } else {
                    (FULL_SCORE, ScoreStatus::Ok)
                }
            }
        }
    }

    fn score_high_side(value: f64, ideal_max: f64, hard_max: f64) -> (f64, ScoreStatus) {
        if value <= ideal_max {
            (FULL_SCORE, ScoreStatus::Ok)
        } else if value >= hard_max {
            (0.0, ScoreStatus::TooHigh)
        } else {
            let score = ramp(hard_max - value, hard_max - ideal_max);
            (score.clamp(0.0, FULL_SCORE), ScoreStatus::High)
        }
    }

    fn score_low_side(value: f64, ideal_min: f64, hard_min: f64) -> (f64, ScoreStatus) {
        if value >= ideal_min {
            (FULL_SCORE, ScoreStatus::Ok)
        } else if value <= hard_min {
            (0.0, ScoreStatus::TooLow)
        } else {
            let score = ramp(value - hard_min, ideal_min - hard_min);
            (score.clamp(0.0, FULL_SCORE), ScoreStatus::Low)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_rule_ramp() {
        let rule = ScoringRule::new(RuleKind::Max, (0.0, 25.0), (0.0, 45.0));
        assert_eq!(rule.score(20.0), (100.0, ScoreStatus::Ok));
        let (score, status) = rule.score(35.0);
        assert!((score - 50.0).abs() < 1e-9);
        assert_eq!(status, ScoreStatus::High);
        assert_eq!(rule.score(50.0), (0.0, ScoreStatus::TooHigh));
    }

    #[test]
    fn test_min_rule_ramp() {
        let rule = ScoringRule::new(RuleKind::Min, (170.0, 180.0), (160.0, 180.0));
        let (score, status) = rule.score(165.0);
        assert!((score - 50.0).abs() < 1e-9);
        assert_eq!(status, ScoreStatus::Low);
    }

    #[test]
    fn test_degenerate_band_does_not_divide_by_zero() {
        let rule = ScoringRule::new(RuleKind::Max, (10.0, 10.0), (10.0, 10.0));
        let (score, _) = rule.score(10.0 + 1e-12);
        assert!(score.is_finite());
    }

    #[test]
    fn test_validate_rejects_unnested_bounds() {
        let rule = ScoringRule::new(RuleKind::Range, (60.0, 110.0), (70.0, 150.0));
        assert!(matches!(
            rule.validate("depth"),
            Err(ConfigError::InvalidBounds { .. })
        ));
    }
}
