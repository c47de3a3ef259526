// ABOUTME: Per-metric one-euro smoothing applied to extracted snapshot values
// ABOUTME: Filters reset whenever the visibility-chosen side switches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlus Contributors

use super::{MetricKey, MetricsSnapshot};
use crate::filter::{FilterParams, OneEuroFilter};
use fitplus_core::constants::filter::{METRIC_BETA, METRIC_MIN_CUTOFF};
use fitplus_core::models::Side;
use std::collections::HashMap;
use tracing::debug;

/// Smooths continuous metric values of successive snapshots
#[derive(Debug, Clone)]
pub struct MetricSmoother {
    params: FilterParams,
    filters: HashMap<MetricKey, OneEuroFilter>,
    side: Option<Side>,
}

impl Default for MetricSmoother {
    fn default() -> Self {
        Self::new(FilterParams::new(METRIC_MIN_CUTOFF, METRIC_BETA))
    }
}

impl MetricSmoother {
    /// Create a smoother with explicit filter parameters
    #[must_use]
    pub fn new(params: FilterParams) -> Self {
        Self {
            params,
            filters: HashMap::new(),
            side: None,
        }
    }

    /// Smooth a snapshot in place
    ///
    /// Missing values leave their filter untouched.
    pub fn smooth(&mut self, snapshot: &mut MetricsSnapshot) {
        if self.side.is_some_and(|side| side != snapshot.side) {
            debug!(side = %snapshot.side, "Primary side switched, resetting metric filters");
            self.filters.clear();
        }
        self.side = Some(snapshot.side);

        let t = snapshot.timestamp_ms / 1000.0;
        let present: Vec<(MetricKey, f64)> = snapshot
            .iter()
            .filter(|(key, _)| key.is_continuous())
            .collect();
        for (key, value) in present {
            let params = self.params;
            let filter = self
                .filters
                .entry(key)
                .or_insert_with(|| OneEuroFilter::new(params));
            snapshot.set(key, Some(filter.filter(t, value)));
        }
    }

    /// Drop all filter state
    pub fn reset(&mut self) {
        self.filters.clear();
        self.side = None;
    }
}
