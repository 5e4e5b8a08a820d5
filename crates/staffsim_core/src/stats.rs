//! Statistical aggregator
//!
//! Each iteration yields an immutable [`ShiftOutcome`]; a run folds them into
//! an [`OutcomeTally`]. Tallies merge associatively, so batches can be reduced
//! in any order before the final statistics are computed.

use crate::config::ConfidenceLevel;
use crate::model::WorkloadSummary;
use crate::workload::ShiftWorkload;

/// Completion rate below which risk grows linearly
pub const RISK_THRESHOLD: f64 = 80.0;

/// Result of one simulated shift
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftOutcome {
    pub workload: ShiftWorkload,
    pub primary_fits: bool,
    pub secondary_fits: bool,
}

impl ShiftOutcome {
    pub fn evaluate(workload: ShiftWorkload, capacity_minutes: f64) -> Self {
        Self {
            workload,
            primary_fits: workload.primary_minutes <= capacity_minutes,
            secondary_fits: workload.secondary_minutes <= capacity_minutes,
        }
    }

    pub fn completed(&self) -> bool {
        self.primary_fits && self.secondary_fits
    }

    /// Binary outcome on the 0/100 scale
    pub fn score(&self) -> f64 {
        if self.completed() { 100.0 } else { 0.0 }
    }
}

/// Running counts over a set of outcomes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OutcomeTally {
    pub iterations: usize,
    pub completed: usize,
    pub primary_overruns: usize,
    pub secondary_overruns: usize,
    pub primary_minutes: f64,
    pub secondary_minutes: f64,
}

impl OutcomeTally {
    pub fn record(&mut self, outcome: &ShiftOutcome) {
        self.iterations += 1;
        if outcome.completed() {
            self.completed += 1;
        }
        if !outcome.primary_fits {
            self.primary_overruns += 1;
        }
        if !outcome.secondary_fits {
            self.secondary_overruns += 1;
        }
        self.primary_minutes += outcome.workload.primary_minutes;
        self.secondary_minutes += outcome.workload.secondary_minutes;
    }

    #[must_use]
    pub fn merge(mut self, other: OutcomeTally) -> Self {
        self.iterations += other.iterations;
        self.completed += other.completed;
        self.primary_overruns += other.primary_overruns;
        self.secondary_overruns += other.secondary_overruns;
        self.primary_minutes += other.primary_minutes;
        self.secondary_minutes += other.secondary_minutes;
        self
    }

    fn percent(&self, count: usize) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            count as f64 / self.iterations as f64 * 100.0
        }
    }

    pub fn workload_summary(&self) -> WorkloadSummary {
        let n = self.iterations.max(1) as f64;
        WorkloadSummary {
            mean_primary_minutes: self.primary_minutes / n,
            mean_secondary_minutes: self.secondary_minutes / n,
            primary_overrun_rate: self.percent(self.primary_overruns),
            secondary_overrun_rate: self.percent(self.secondary_overruns),
        }
    }
}

impl FromIterator<ShiftOutcome> for OutcomeTally {
    fn from_iter<I: IntoIterator<Item = ShiftOutcome>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), |mut tally, outcome| {
            tally.record(&outcome);
            tally
        })
    }
}

/// Completion statistics for one scenario
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionStats {
    pub completion_rate: f64,
    pub std_dev: f64,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
    pub risk_score: f64,
    pub failure_probability: f64,
}

impl CompletionStats {
    /// Reduce a tally to mean, population std dev, normal-approximation
    /// interval, and risk.
    ///
    /// For 0/100 outcomes with completion fraction `p`, the population
    /// standard deviation is `100 * sqrt(p * (1 - p))`.
    pub fn from_tally(tally: &OutcomeTally, level: ConfidenceLevel) -> Self {
        let n = tally.iterations.max(1) as f64;
        let p = tally.completed as f64 / n;
        let completion_rate = p * 100.0;
        let std_dev = 100.0 * (p * (1.0 - p)).max(0.0).sqrt();
        let (confidence_lower, confidence_upper) =
            confidence_interval(completion_rate, std_dev, tally.iterations, level);

        Self {
            completion_rate,
            std_dev,
            confidence_lower,
            confidence_upper,
            risk_score: risk_score(completion_rate),
            failure_probability: 100.0 - completion_rate,
        }
    }
}

/// `mean ± z * std_dev / sqrt(n)`, clamped to `[0, 100]`
pub fn confidence_interval(
    mean: f64,
    std_dev: f64,
    iterations: usize,
    level: ConfidenceLevel,
) -> (f64, f64) {
    let margin = level.z_value() * std_dev / (iterations.max(1) as f64).sqrt();
    ((mean - margin).max(0.0), (mean + margin).min(100.0))
}

/// Linear below 80% completion, halved above it
pub fn risk_score(completion_rate: f64) -> f64 {
    let shortfall = 100.0 - completion_rate;
    if completion_rate < RISK_THRESHOLD {
        shortfall
    } else {
        shortfall * 0.5
    }
}
