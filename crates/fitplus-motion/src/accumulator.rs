// ABOUTME: Per-rep metric accumulators (min, max, mean, p05, p95, last) gated by phase
// ABOUTME: Percentiles use linear interpolation over the sorted samples
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use crate::metrics::{MetricKey, MetricSource, MetricsSnapshot};
use crate::phase::Phase;
use fitplus_core::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a rep's samples reduce to one value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Smallest sample
    Min,
    /// Largest sample
    Max,
    /// Arithmetic mean
    Mean,
    /// 5th percentile
    P05,
    /// 95th percentile
    P95,
    /// Most recent sample
    Last,
}

impl Aggregation {
    /// Canonical name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
            Self::Mean => "mean",
            Self::P05 => "p05",
            Self::P95 => "p95",
            Self::Last => "last",
        }
    }

    const fn needs_samples(self) -> bool {
        matches!(self, Self::P05 | Self::P95)
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "mean" | "avg" => Ok(Self::Mean),
            "p05" | "p5" => Ok(Self::P05),
            "p95" => Ok(Self::P95),
            "last" => Ok(Self::Last),
            _ => Err(ConfigError::UnknownAggregation(s.to_owned())),
        }
    }
}

/// Percentile of sorted samples with linear interpolation at `q * (n - 1)`
#[must_use]
pub fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = last as f64 * q.clamp(0.0, 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let fraction = pos - lower as f64;
    Some((sorted[upper] - sorted[lower]).mul_add(fraction, sorted[lower]))
}

/// Reduces one metric's per-frame values over a rep
#[derive(Debug, Clone)]
pub struct MetricAccumulator {
    source: MetricSource,
    aggregation: Aggregation,
    phases: Option<Vec<Phase>>,
    count: usize,
    sum: f64,
    min: f64,
    max: f64,
    last: Option<f64>,
    samples: Vec<f64>,
}

impl MetricAccumulator {
    /// Accumulate `source` with `aggregation`, only in `phases` when given
    #[must_use]
    pub fn new(source: MetricSource, aggregation: Aggregation, phases: Option<Vec<Phase>>) -> Self {
        Self {
            source,
            aggregation,
            phases: phases.filter(|p| !p.is_empty()),
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            last: None,
            samples: Vec::new(),
        }
    }

    /// Ingest a snapshot; ignored when its phase is outside the gate or the value is missing
    pub fn update(&mut self, snapshot: &MetricsSnapshot) {
        if let Some(phases) = &self.phases {
            if !phases.contains(&snapshot.phase) {
                return;
            }
        }
        if let Some(value) = self.source.value_in(snapshot) {
            self.push(value);
        }
    }

    /// Add one sample directly, bypassing the phase gate
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.last = Some(value);
        if self.aggregation.needs_samples() {
            self.samples.push(value);
        }
    }

    /// Aggregated value; `None` when no sample was accepted
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        match self.aggregation {
            Aggregation::Min => Some(self.min),
            Aggregation::Max => Some(self.max),
            Aggregation::Mean => Some(self.sum / self.count as f64),
            Aggregation::Last => self.last,
            Aggregation::P05 | Aggregation::P95 => {
                let mut sorted = self.samples.clone();
                sorted.sort_by(f64::total_cmp);
                let q = if self.aggregation == Aggregation::P05 { 0.05 } else { 0.95 };
                percentile(&sorted, q)
            }
        }
    }

    /// Accepted sample count
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Metric being accumulated
    #[must_use]
    pub const fn source(&self) -> &MetricSource {
        &self.source
    }

    /// Clear all samples
    pub fn reset(&mut self) {
        self.count = 0;
        self.sum = 0.0;
        self.min = f64::INFINITY;
        self.max = f64::NEG_INFINITY;
        self.last = None;
        self.samples.clear();
    }
}

/// Accumulators for every component of a scoring profile, index-aligned
#[derive(Debug, Clone, Default)]
pub struct AccumulatorSet {
    accumulators: Vec<MetricAccumulator>,
}

impl AccumulatorSet {
    /// Wrap accumulators in component order
    #[must_use]
    pub const fn new(accumulators: Vec<MetricAccumulator>) -> Self {
        Self { accumulators }
    }

    /// Feed a snapshot to every accumulator
    pub fn update(&mut self, snapshot: &MetricsSnapshot) {
        for acc in &mut self.accumulators {
            acc.update(snapshot);
        }
    }

    /// Push a rep-level value into every accumulator reading `key`
    pub fn record(&mut self, key: MetricKey, value: f64) {
        for acc in self
            .accumulators
            .iter_mut()
            .filter(|acc| acc.source.key() == Some(key))
        {
            acc.push(value);
        }
    }

    /// Aggregated value of the accumulator at `index`
    #[must_use]
    pub fn value(&self, index: usize) -> Option<f64> {
        self.accumulators.get(index).and_then(MetricAccumulator::value)
    }

    /// Number of accumulators
    #[must_use]
    pub fn len(&self) -> usize {
        self.accumulators.len()
    }

    /// Whether the set is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accumulators.is_empty()
    }

    /// Clear every accumulator
    pub fn reset(&mut self) {
        for acc in &mut self.accumulators {
            acc.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::AngleSource;
    use fitplus_core::models::Side;

    fn snap(phase: Phase, knee: f64) -> MetricsSnapshot {
        let mut s = MetricsSnapshot::new(0.0, Side::Left, AngleSource::Normalized);
        s.phase = phase;
        s.set(MetricKey::KneeAngle, Some(knee));
        s
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted: Vec<f64> = (0..=10).map(f64::from).collect();
        let p05 = percentile(&sorted, 0.05).unwrap();
        assert!((p05 - 0.5).abs() < 1e-12);
        assert_eq!(percentile(&[], 0.5), None);
    }

    #[test]
    fn test_phase_gating() {
        let mut acc = MetricAccumulator::new(
            MetricSource::Known(MetricKey::KneeAngle),
            Aggregation::Min,
            Some(vec![Phase::Bottom]),
        );
        acc.update(&snap(Phase::Standing, 60.0));
        acc.update(&snap(Phase::Bottom, 95.0));
        assert_eq!(acc.value(), Some(95.0));
        acc.reset();
        assert_eq!(acc.value(), None);
    }

    #[test]
    fn test_record_targets_only_matching_key() {
        let mut set = AccumulatorSet::new(vec![
            MetricAccumulator::new(
                MetricSource::Known(MetricKey::KneeAngle),
                Aggregation::Max,
                None,
            ),
            MetricAccumulator::new(
                MetricSource::Known(MetricKey::RepIntervalMs),
                Aggregation::Last,
                Some(vec![Phase::Bottom]),
            ),
        ]);
        set.update(&snap(Phase::Bottom, 95.0));
        set.record(MetricKey::RepIntervalMs, 1640.0);
        assert_eq!(set.value(0), Some(95.0));
        assert_eq!(set.value(1), Some(1640.0));
    }

    #[test]
    fn test_unknown_aggregation() {
        assert!(matches!(
            "median".parse::<Aggregation>(),
            Err(ConfigError::UnknownAggregation(_))
        ));
    }
}
