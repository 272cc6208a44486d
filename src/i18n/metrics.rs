//! Negotiation metrics and observability module.
//!
//! Each `LocaleStore` owns one `NegotiationMetrics`; counters are atomics so
//! they can be bumped through a shared reference.

use crate::i18n::negotiator::{Negotiation, DEFAULT_LOCALE};
use crate::i18n::tag::ParsedTag;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for negotiation outcomes.
#[derive(Debug, Default)]
pub struct NegotiationMetrics {
    /// Number of negotiations run
    negotiations: AtomicUsize,

    /// Number of negotiations won by the requested tag itself
    exact_hits: AtomicUsize,

    /// Number of negotiations won by a less specific subset of the requested tag
    fallbacks: AtomicUsize,

    /// Number of negotiations that only succeeded through the default locale
    default_fallbacks: AtomicUsize,

    /// Number of negotiations with no winner at all
    failures: AtomicUsize,
}

impl NegotiationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of negotiating `requested`.
    pub fn record(&self, requested: &ParsedTag, outcome: &Negotiation) {
        self.negotiations.fetch_add(1, Ordering::Relaxed);

        let counter = match outcome.found() {
            Some(tag) if tag == requested.canonical() => &self.exact_hits,
            Some(tag) if tag == DEFAULT_LOCALE && requested.language() != DEFAULT_LOCALE => {
                &self.default_fallbacks
            }
            Some(_) => &self.fallbacks,
            None => &self.failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn negotiations(&self) -> usize {
        self.negotiations.load(Ordering::Relaxed)
    }

    pub fn exact_hits(&self) -> usize {
        self.exact_hits.load(Ordering::Relaxed)
    }

    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    pub fn default_fallbacks(&self) -> usize {
        self.default_fallbacks.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let negotiations = self.negotiations();
        let failures = self.failures();
        let exact_hits = self.exact_hits();

        let rate = |count: usize| {
            if negotiations > 0 {
                (count as f64 / negotiations as f64) * 100.0
            } else {
                0.0
            }
        };

        MetricsReport {
            negotiations,
            exact_hits,
            fallbacks: self.fallbacks(),
            default_fallbacks: self.default_fallbacks(),
            failures,
            exact_hit_rate: rate(exact_hits),
            success_rate: rate(negotiations - failures),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.negotiations.store(0, Ordering::Relaxed);
        self.exact_hits.store(0, Ordering::Relaxed);
        self.fallbacks.store(0, Ordering::Relaxed);
        self.default_fallbacks.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of negotiation statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub negotiations: usize,
    pub exact_hits: usize,
    pub fallbacks: usize,
    pub default_fallbacks: usize,
    pub failures: usize,

    /// Exact hits as a percentage of negotiations (0-100)
    pub exact_hit_rate: f64,

    /// Negotiations with any winner as a percentage (0-100)
    pub success_rate: f64,
}
