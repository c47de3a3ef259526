// ABOUTME: Scoring profile schema, JSON loading, and fail-fast validation
// ABOUTME: Raw string fields resolve into typed rules, aggregations, phases, and metric sources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use crate::accumulator::{AccumulatorSet, Aggregation, MetricAccumulator};
use crate::config::exercise::normalize_code;
use crate::metrics::{MetricKey, MetricSource};
use crate::phase::Phase;
use crate::scoring::rule::{RuleKind, ScoreStatus, ScoringRule};
use fitplus_core::constants::scoring::FULL_SCORE;
use fitplus_core::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_max_score() -> f64 {
    FULL_SCORE
}

/// Scoring rule as written in a profile document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// `max`, `min`, or `range`
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
    /// Ideal lower bound
    pub ideal_min: f64,
    /// Ideal upper bound
    pub ideal_max: f64,
    /// Hard lower bound
    pub hard_min: f64,
    /// Hard upper bound
    pub hard_max: f64,
}

/// One metric entry as written in a profile document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetricSpec {
    /// Component key used for feedback and reporting
    pub key: String,
    /// Display label
    #[serde(default)]
    pub label: Option<String>,
    /// Metric to read from snapshots
    #[serde(alias = "metricKey")]
    pub metric_key: String,
    /// External metric identifier carried through to results
    #[serde(default, alias = "metricId")]
    pub metric_id: Option<i64>,
    /// Relative weight in the rep total
    pub weight: f64,
    /// Points awarded at a perfect score
    #[serde(default = "default_max_score", alias = "maxScore")]
    pub max_score: f64,
    /// How samples reduce over a rep
    #[serde(alias = "agg")]
    pub aggregation: String,
    /// Scoring curve
    pub rule: RuleSpec,
    /// Phases in which samples are accepted; all phases when absent
    #[serde(default)]
    pub phases: Option<Vec<String>>,
    /// Message overrides keyed by status name
    #[serde(default)]
    pub feedback: BTreeMap<String, String>,
}

/// A profile document before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringProfileSpec {
    /// Exercise this profile grades
    #[serde(alias = "exerciseCode")]
    pub exercise_code: String,
    /// External profile identifier
    #[serde(default, alias = "profileId")]
    pub profile_id: Option<i64>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Graded metrics
    pub metrics: Vec<ProfileMetricSpec>,
}

/// A validated, typed profile component
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringComponent {
    /// Component key
    pub key: String,
    /// Display label
    pub label: String,
    /// Resolved metric
    pub metric: MetricSource,
    /// External metric identifier
    pub metric_id: Option<i64>,
    /// Relative weight
    pub weight: f64,
    /// Points at a perfect score
    pub max_score: f64,
    /// Scoring curve
    pub rule: ScoringRule,
    /// Sample reduction
    pub aggregation: Aggregation,
    /// Accepting phases; `None` accepts every phase
    pub phases: Option<Vec<Phase>>,
    /// Per-status message overrides
    pub feedback: BTreeMap<ScoreStatus, String>,
}

impl ScoringComponent {
    /// Whether a phase is evaluated by this component
    #[must_use]
    pub fn accepts(&self, phase: Phase) -> bool {
        self.phases.as_ref().is_none_or(|phases| phases.contains(&phase))
    }

    fn accumulator(&self) -> MetricAccumulator {
        MetricAccumulator::new(self.metric.clone(), self.aggregation, self.phases.clone())
    }
}

impl TryFrom<ProfileMetricSpec> for ScoringComponent {
    type Error = ConfigError;

    fn try_from(spec: ProfileMetricSpec) -> Result<Self, Self::Error> {
        if !spec.weight.is_finite() || spec.weight < 0.0 {
            return Err(ConfigError::InvalidWeight {
                metric: spec.key,
                weight: spec.weight,
            });
        }
        if !spec.max_score.is_finite() || spec.max_score <= 0.0 {
            return Err(ConfigError::ValueOutOfRange("max_score must be > 0"));
        }

        let rule = ScoringRule::new(
            spec.rule.kind.parse::<RuleKind>()?,
            (spec.rule.ideal_min, spec.rule.ideal_max),
            (spec.rule.hard_min, spec.rule.hard_max),
        );
        rule.validate(&spec.key)?;

        let aggregation = spec.aggregation.parse::<Aggregation>()?;
        let phases = spec
            .phases
            .map(|names| {
                names
                    .iter()
                    .map(|name| name.parse::<Phase>())
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?
            .filter(|phases: &Vec<Phase>| !phases.is_empty());
        let feedback = spec
            .feedback
            .iter()
            .map(|(status, message)| Ok((status.parse::<ScoreStatus>()?, message.clone())))
            .collect::<Result<BTreeMap<_, _>, ConfigError>>()?;

        Ok(Self {
            label: spec.label.unwrap_or_else(|| spec.key.clone()),
            metric: MetricSource::resolve(&spec.metric_key),
            key: spec.key,
            metric_id: spec.metric_id,
            weight: spec.weight,
            max_score: spec.max_score,
            rule,
            aggregation,
            phases,
            feedback,
        })
    }
}

/// A validated scoring profile
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringProfile {
    /// Normalized exercise code
    pub exercise_code: String,
    /// External profile identifier
    pub profile_id: Option<i64>,
    /// Display name
    pub name: String,
    /// Graded components in declaration order
    pub components: Vec<ScoringComponent>,
}

impl TryFrom<ScoringProfileSpec> for ScoringProfile {
    type Error = ConfigError;

    fn try_from(spec: ScoringProfileSpec) -> Result<Self, Self::Error> {
        if spec.metrics.is_empty() {
            return Err(ConfigError::EmptyProfile);
        }
        let exercise_code = normalize_code(&spec.exercise_code);
        let components = spec
            .metrics
            .into_iter()
            .map(ScoringComponent::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: spec.name.unwrap_or_else(|| exercise_code.clone()),
            exercise_code,
            profile_id: spec.profile_id,
            components,
        })
    }
}

impl ScoringProfile {
    /// Parse and validate a profile document
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON, or the first
    /// validation error (bounds, weight, aggregation, rule kind, phase)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let spec: ScoringProfileSpec =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::try_from(spec)
    }

    /// Fresh accumulators, index-aligned with `components`
    #[must_use]
    pub fn accumulators(&self) -> AccumulatorSet {
        AccumulatorSet::new(
            self.components
                .iter()
                .map(ScoringComponent::accumulator)
                .collect(),
        )
    }

    /// Known metric keys referenced by the profile
    pub fn metric_keys(&self) -> impl Iterator<Item = MetricKey> + '_ {
        self.components.iter().filter_map(|c| c.metric.key())
    }
}
