//! Sensitivity analyzer: sweep one ratio around a simulated baseline

use serde::Serialize;

use super::relative_change;
use crate::config::SimulationConfig;
use crate::error::{Result, SimulationError};
use crate::model::{RatioParameter, ScenarioKey, SimulationResult, TaskProfileSet};
use crate::progress::SimulationProgress;
use crate::simulation::simulate_each;

/// One variant of a sensitivity sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityPoint {
    pub parameter_value: u32,
    pub completion_rate: f64,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
    pub risk_score: f64,
    /// Relative change against the baseline rate; `None` when the baseline
    /// completion rate is zero
    pub rate_change_percent: Option<f64>,
    pub partial: bool,
}

/// All variants of one sweep, in the order the values were supplied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensitivityReport {
    pub parameter: RatioParameter,
    pub baseline: ScenarioKey,
    pub baseline_rate: f64,
    pub points: Vec<SensitivityPoint>,
    /// Values that never ran because the sweep was stopped first
    pub skipped: Vec<u32>,
}

impl SensitivityReport {
    /// True if any variant stopped early or was skipped
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty() || self.points.iter().any(|p| p.partial)
    }

    /// Variant with the largest completion rate drop relative to baseline
    pub fn steepest_decline(&self) -> Option<&SensitivityPoint> {
        self.points
            .iter()
            .filter(|p| p.rate_change_percent.is_some_and(|c| c < 0.0))
            .min_by(|a, b| {
                a.rate_change_percent
                    .partial_cmp(&b.rate_change_percent)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

/// Re-simulate `baseline` once per value, substituting `parameter`.
///
/// The other ratio, the shift length, and the patient volume stay at the
/// baseline's values. Variants reuse the baseline's seed, iteration count,
/// and confidence level, so a value equal to the baseline ratio reproduces
/// the baseline exactly. Labor rates come from `config`.
///
/// Values whose variant had not started when `progress` stopped the sweep
/// are listed in [`SensitivityReport::skipped`]. The sweep fails with
/// [`SimulationError::Cancelled`] only if no variant ran.
pub fn run_sensitivity(
    baseline: &SimulationResult,
    parameter: RatioParameter,
    values: &[u32],
    profiles: &TaskProfileSet,
    config: &SimulationConfig,
    progress: Option<&SimulationProgress>,
) -> Result<SensitivityReport> {
    if values.is_empty() {
        return Err(SimulationError::invalid(
            "values",
            "sensitivity sweep needs at least one value",
        ));
    }

    let config = SimulationConfig {
        iterations: baseline.requested_iterations(),
        confidence_level: baseline.confidence_level,
        seed: Some(baseline.seed),
        ..config.clone()
    };

    let scenarios = values
        .iter()
        .map(|&value| baseline.scenario.with_ratio(parameter, value))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        parameter = parameter.name(),
        baseline = %baseline.key(),
        variants = scenarios.len(),
        "Running sensitivity sweep"
    );

    let variants = simulate_each(&scenarios, profiles, &config, progress)?;

    let baseline_rate = baseline.completion_rate;
    let mut points = Vec::with_capacity(values.len());
    let mut skipped = Vec::new();
    for (&value, variant) in values.iter().zip(variants) {
        let Some(variant) = variant else {
            skipped.push(value);
            continue;
        };
        points.push(SensitivityPoint {
            parameter_value: value,
            completion_rate: variant.completion_rate,
            confidence_lower: variant.confidence_lower,
            confidence_upper: variant.confidence_upper,
            risk_score: variant.risk_score,
            rate_change_percent: relative_change(baseline_rate, variant.completion_rate),
            partial: variant.is_partial(),
        });
    }

    if !skipped.is_empty() {
        tracing::warn!(
            parameter = parameter.name(),
            skipped = ?skipped,
            "Sensitivity sweep stopped before every variant started"
        );
    }

    Ok(SensitivityReport {
        parameter,
        baseline: baseline.key(),
        baseline_rate,
        points,
        skipped,
    })
}
