//! Simulation results and scenario groups
//!
//! Results are immutable once produced. A `ScenarioGroup` is the unit of input
//! for sensitivity, what-if, and optimal-staffing analyses.

use serde::Serialize;

use super::scenario::{Headcount, ScenarioKey, StaffingScenario};
use super::task::Role;
use crate::config::ConfidenceLevel;
use crate::error::{Result, SimulationError};

/// Whether all requested iterations actually ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SampleCoverage {
    Complete,
    /// The run stopped early (deadline or cancellation); statistics cover
    /// only `completed` of `requested` iterations
    Partial { requested: usize, completed: usize },
}

/// Qualitative band for a risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 20.0 {
            RiskLevel::Low
        } else if score < 40.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
        }
    }
}

/// Mean simulated workload per role and how often each role ran over
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WorkloadSummary {
    pub mean_primary_minutes: f64,
    pub mean_secondary_minutes: f64,
    /// Percentage of iterations where the primary role exceeded the shift
    pub primary_overrun_rate: f64,
    /// Percentage of iterations where the secondary role exceeded the shift
    pub secondary_overrun_rate: f64,
}

impl WorkloadSummary {
    pub fn mean_minutes(&self, role: Role) -> f64 {
        match role {
            Role::Primary => self.mean_primary_minutes,
            Role::Secondary => self.mean_secondary_minutes,
        }
    }
}

/// Labor cost for one scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub primary_cost: f64,
    pub secondary_cost: f64,
    /// `primary_cost + secondary_cost`
    pub total_cost: f64,
    /// `total_cost * overhead_multiplier`
    pub total_with_overhead: f64,
}

/// Output for one simulated scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub scenario: StaffingScenario,
    /// Iterations that actually contributed to the statistics
    pub iterations: usize,
    pub coverage: SampleCoverage,
    pub confidence_level: ConfidenceLevel,
    pub seed: u64,

    /// Mean of the 0/100 per-iteration outcomes, in `[0, 100]`
    pub completion_rate: f64,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
    /// Population standard deviation of the per-iteration outcomes
    pub std_dev: f64,
    pub risk_score: f64,
    /// `100 - completion_rate`
    pub failure_probability: f64,

    pub workload: WorkloadSummary,

    pub headcount: Option<Headcount>,
    pub cost: Option<CostBreakdown>,
}

impl SimulationResult {
    pub fn key(&self) -> ScenarioKey {
        self.scenario.key()
    }

    pub fn label(&self) -> String {
        self.scenario.label()
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.risk_score)
    }

    pub fn is_partial(&self) -> bool {
        matches!(self.coverage, SampleCoverage::Partial { .. })
    }

    /// Iterations the run was asked for, whether or not they all completed
    pub fn requested_iterations(&self) -> usize {
        match self.coverage {
            SampleCoverage::Complete => self.iterations,
            SampleCoverage::Partial { requested, .. } => requested,
        }
    }

    pub fn confidence_width(&self) -> f64 {
        self.confidence_upper - self.confidence_lower
    }

    /// Total labor cost including overhead
    pub fn total_cost(&self) -> Option<f64> {
        self.cost.map(|c| c.total_with_overhead)
    }

    pub fn primary_role_cost(&self) -> Option<f64> {
        self.cost.map(|c| c.primary_cost)
    }

    pub fn secondary_role_cost(&self) -> Option<f64> {
        self.cost.map(|c| c.secondary_cost)
    }
}

/// Ordered results sharing one iteration count and confidence level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioGroup {
    iterations: usize,
    confidence_level: ConfidenceLevel,
    results: Vec<SimulationResult>,
    /// Scenarios that never ran because the run stopped first
    skipped: Vec<ScenarioKey>,
}

impl ScenarioGroup {
    /// Group results.
    ///
    /// Rejects duplicate scenario keys, and any result whose confidence level
    /// or requested iteration count differs from the group's.
    pub fn new(
        iterations: usize,
        confidence_level: ConfidenceLevel,
        results: Vec<SimulationResult>,
    ) -> Result<Self> {
        let mut seen = rustc_hash::FxHashSet::default();
        for result in &results {
            if !seen.insert(result.key()) {
                return Err(SimulationError::invalid(
                    "scenarioGroup",
                    format!("scenario {} appears more than once", result.key()),
                ));
            }
            if result.confidence_level != confidence_level {
                return Err(SimulationError::invalid(
                    "scenarioGroup",
                    format!(
                        "scenario {} uses {:.0}% confidence, group uses {:.0}%",
                        result.key(),
                        result.confidence_level.fraction() * 100.0,
                        confidence_level.fraction() * 100.0
                    ),
                ));
            }
            if result.requested_iterations() != iterations {
                return Err(SimulationError::invalid(
                    "scenarioGroup",
                    format!(
                        "scenario {} requested {} iterations, group requested {}",
                        result.key(),
                        result.requested_iterations(),
                        iterations
                    ),
                ));
            }
        }
        Ok(Self {
            iterations,
            confidence_level,
            results,
            skipped: Vec::new(),
        })
    }

    /// Record scenarios that were never simulated
    pub fn with_skipped(mut self, skipped: Vec<ScenarioKey>) -> Result<Self> {
        if let Some(key) = skipped.iter().find(|k| self.get(k).is_some()) {
            return Err(SimulationError::invalid(
                "scenarioGroup",
                format!("scenario {key} is both simulated and skipped"),
            ));
        }
        self.skipped = skipped;
        Ok(self)
    }

    /// Requested iterations per scenario
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        self.confidence_level
    }

    pub fn results(&self) -> &[SimulationResult] {
        &self.results
    }

    pub fn iter(&self) -> impl Iterator<Item = &SimulationResult> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, key: &ScenarioKey) -> Option<&SimulationResult> {
        self.results.iter().find(|r| r.key() == *key)
    }

    /// Like [`ScenarioGroup::get`], but a missing scenario is an error
    pub fn require(&self, key: &ScenarioKey) -> Result<&SimulationResult> {
        self.get(key).ok_or(SimulationError::NotFound(*key))
    }

    /// Scenarios that never ran, in input order
    pub fn skipped(&self) -> &[ScenarioKey] {
        &self.skipped
    }

    /// True if any result stopped short of its requested iterations, or if
    /// any scenario was skipped
    pub fn has_partial_results(&self) -> bool {
        !self.skipped.is_empty() || self.results.iter().any(SimulationResult::is_partial)
    }

    /// Number of scenarios at or above the high-risk threshold
    pub fn high_risk_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.risk_level() == RiskLevel::High)
            .count()
    }

    /// `(min, max)` total cost across results that carry a cost
    pub fn cost_range(&self) -> Option<(f64, f64)> {
        self.results
            .iter()
            .filter_map(SimulationResult::total_cost)
            .fold(None, |range, cost| match range {
                None => Some((cost, cost)),
                Some((lo, hi)) => Some((lo.min(cost), hi.max(cost))),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(primary: u32, iterations: usize, coverage: SampleCoverage) -> SimulationResult {
        SimulationResult {
            scenario: StaffingScenario::new(primary, 10, 8.0).unwrap(),
            iterations,
            coverage,
            confidence_level: ConfidenceLevel::P95,
            seed: 1,
            completion_rate: 100.0,
            confidence_lower: 100.0,
            confidence_upper: 100.0,
            std_dev: 0.0,
            risk_score: 0.0,
            failure_probability: 0.0,
            workload: WorkloadSummary::default(),
            headcount: None,
            cost: None,
        }
    }

    #[test]
    fn test_group_accepts_partial_with_matching_request() {
        let partial = SampleCoverage::Partial {
            requested: 500,
            completed: 200,
        };
        let group = ScenarioGroup::new(
            500,
            ConfidenceLevel::P95,
            vec![
                result(3, 500, SampleCoverage::Complete),
                result(4, 200, partial),
            ],
        )
        .unwrap();
        assert_eq!(group.len(), 2);
        assert!(group.has_partial_results());
        assert_eq!(group.results()[1].requested_iterations(), 500);
    }

    #[test]
    fn test_group_rejects_mismatched_iterations() {
        let err = ScenarioGroup::new(
            500,
            ConfidenceLevel::P95,
            vec![result(3, 400, SampleCoverage::Complete)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidParameter {
                parameter: "scenarioGroup",
                ..
            }
        ));

        let partial = SampleCoverage::Partial {
            requested: 400,
            completed: 100,
        };
        let err = ScenarioGroup::new(500, ConfidenceLevel::P95, vec![result(3, 100, partial)]);
        assert!(err.is_err());
    }

    #[test]
    fn test_group_rejects_mismatched_confidence() {
        let err = ScenarioGroup::new(
            500,
            ConfidenceLevel::P99,
            vec![result(3, 500, SampleCoverage::Complete)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidParameter {
                parameter: "scenarioGroup",
                ..
            }
        ));
    }

    #[test]
    fn test_skipped_scenarios_mark_group_partial() {
        let group = ScenarioGroup::new(
            500,
            ConfidenceLevel::P95,
            vec![result(3, 500, SampleCoverage::Complete)],
        )
        .unwrap();
        assert!(!group.has_partial_results());

        let skipped = ScenarioKey::new(4, 10, 8.0);
        let group = group.with_skipped(vec![skipped]).unwrap();
        assert!(group.has_partial_results());
        assert_eq!(group.skipped(), &[skipped]);
        assert!(group.get(&skipped).is_none());

        let clash = group.clone().with_skipped(vec![ScenarioKey::new(3, 10, 8.0)]);
        assert!(clash.is_err());
    }

    #[test]
    fn test_risk_level_bands() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(19.9), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(20.0), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(39.9), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_score(40.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(100.0), RiskLevel::High);
    }
}
