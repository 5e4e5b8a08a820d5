//! What-if comparator: metric deltas between two simulated scenarios

use serde::Serialize;

use crate::error::Result;
use crate::model::{ScenarioGroup, ScenarioKey, SimulationResult};

/// A metric the comparator tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TrackedMetric {
    CompletionRate,
    ConfidenceLower,
    ConfidenceUpper,
    RiskScore,
    FailureProbability,
    MeanPrimaryMinutes,
    MeanSecondaryMinutes,
    PrimaryHeadcount,
    SecondaryHeadcount,
    PrimaryRoleCost,
    SecondaryRoleCost,
    TotalCost,
}

impl TrackedMetric {
    pub const ALL: [TrackedMetric; 12] = [
        TrackedMetric::CompletionRate,
        TrackedMetric::ConfidenceLower,
        TrackedMetric::ConfidenceUpper,
        TrackedMetric::RiskScore,
        TrackedMetric::FailureProbability,
        TrackedMetric::MeanPrimaryMinutes,
        TrackedMetric::MeanSecondaryMinutes,
        TrackedMetric::PrimaryHeadcount,
        TrackedMetric::SecondaryHeadcount,
        TrackedMetric::PrimaryRoleCost,
        TrackedMetric::SecondaryRoleCost,
        TrackedMetric::TotalCost,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TrackedMetric::CompletionRate => "Completion Rate",
            TrackedMetric::ConfidenceLower => "Confidence Lower",
            TrackedMetric::ConfidenceUpper => "Confidence Upper",
            TrackedMetric::RiskScore => "Risk Score",
            TrackedMetric::FailureProbability => "Failure Probability",
            TrackedMetric::MeanPrimaryMinutes => "Primary Workload (min)",
            TrackedMetric::MeanSecondaryMinutes => "Secondary Workload (min)",
            TrackedMetric::PrimaryHeadcount => "Primary Headcount",
            TrackedMetric::SecondaryHeadcount => "Secondary Headcount",
            TrackedMetric::PrimaryRoleCost => "Primary Cost",
            TrackedMetric::SecondaryRoleCost => "Secondary Cost",
            TrackedMetric::TotalCost => "Total Cost",
        }
    }

    /// Read this metric from a result; headcount and cost metrics are absent
    /// when the result was not annotated
    pub fn value(&self, result: &SimulationResult) -> Option<f64> {
        match self {
            TrackedMetric::CompletionRate => Some(result.completion_rate),
            TrackedMetric::ConfidenceLower => Some(result.confidence_lower),
            TrackedMetric::ConfidenceUpper => Some(result.confidence_upper),
            TrackedMetric::RiskScore => Some(result.risk_score),
            TrackedMetric::FailureProbability => Some(result.failure_probability),
            TrackedMetric::MeanPrimaryMinutes => Some(result.workload.mean_primary_minutes),
            TrackedMetric::MeanSecondaryMinutes => Some(result.workload.mean_secondary_minutes),
            TrackedMetric::PrimaryHeadcount => result.headcount.map(|h| f64::from(h.primary)),
            TrackedMetric::SecondaryHeadcount => {
                result.headcount.map(|h| f64::from(h.secondary))
            }
            TrackedMetric::PrimaryRoleCost => result.primary_role_cost(),
            TrackedMetric::SecondaryRoleCost => result.secondary_role_cost(),
            TrackedMetric::TotalCost => result.total_cost(),
        }
    }
}

/// Change in one metric from the current to the proposed scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricDelta {
    pub metric: TrackedMetric,
    pub current_value: f64,
    pub proposed_value: f64,
    /// `proposed - current`
    pub change_value: f64,
    /// `change / current * 100`. Zero when nothing changed, `None` when the
    /// current value is zero and the proposed one is not.
    pub change_percent: Option<f64>,
}

impl MetricDelta {
    pub fn new(metric: TrackedMetric, current_value: f64, proposed_value: f64) -> Self {
        let change_value = proposed_value - current_value;
        let change_percent = if change_value == 0.0 {
            Some(0.0)
        } else {
            super::relative_change(current_value, proposed_value)
        };
        Self {
            metric,
            current_value,
            proposed_value,
            change_value,
            change_percent,
        }
    }
}

/// Deltas between two named scenarios of a group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhatIfComparison {
    pub current: ScenarioKey,
    pub proposed: ScenarioKey,
    pub deltas: Vec<MetricDelta>,
}

impl WhatIfComparison {
    pub fn delta(&self, metric: TrackedMetric) -> Option<&MetricDelta> {
        self.deltas.iter().find(|d| d.metric == metric)
    }
}

/// One delta per metric present on both results, in [`TrackedMetric::ALL`]
/// order
pub fn compare_results(current: &SimulationResult, proposed: &SimulationResult) -> Vec<MetricDelta> {
    TrackedMetric::ALL
        .iter()
        .filter_map(|&metric| {
            let current_value = metric.value(current)?;
            let proposed_value = metric.value(proposed)?;
            Some(MetricDelta::new(metric, current_value, proposed_value))
        })
        .collect()
}

/// Compare two scenarios looked up in `group`.
///
/// A key missing from the group is a [`crate::error::SimulationError::NotFound`],
/// never a zero-impact comparison.
pub fn compare_what_if(
    group: &ScenarioGroup,
    current: &ScenarioKey,
    proposed: &ScenarioKey,
) -> Result<WhatIfComparison> {
    let current_result = group.require(current)?;
    let proposed_result = group.require(proposed)?;

    Ok(WhatIfComparison {
        current: *current,
        proposed: *proposed,
        deltas: compare_results(current_result, proposed_result),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_percent_rules() {
        let delta = MetricDelta::new(TrackedMetric::CompletionRate, 80.0, 90.0);
        assert_eq!(delta.change_value, 10.0);
        assert_eq!(delta.change_percent, Some(12.5));

        let delta = MetricDelta::new(TrackedMetric::RiskScore, 0.0, 0.0);
        assert_eq!(delta.change_value, 0.0);
        assert_eq!(delta.change_percent, Some(0.0));

        let delta = MetricDelta::new(TrackedMetric::RiskScore, 0.0, 5.0);
        assert_eq!(delta.change_percent, None);
    }
}
