//! Constraint types for the optimal staffing search

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Constraints a scenario must satisfy to be feasible
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaffingConstraints {
    /// Minimum acceptable completion rate, in percent
    #[serde(default = "default_min_completion_rate")]
    pub min_completion_rate: f64,

    /// Maximum total labor cost (with overhead) per shift
    #[serde(default = "default_max_budget")]
    pub max_budget: f64,
}

fn default_min_completion_rate() -> f64 {
    90.0
}

fn default_max_budget() -> f64 {
    10_000.0
}

impl Default for StaffingConstraints {
    fn default() -> Self {
        Self {
            min_completion_rate: default_min_completion_rate(),
            max_budget: default_max_budget(),
        }
    }
}

impl StaffingConstraints {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.min_completion_rate) {
            return Err(SimulationError::invalid(
                "minCompletionRate",
                format!("must be within [0, 100], got {}", self.min_completion_rate),
            ));
        }
        if !self.max_budget.is_finite() || self.max_budget <= 0.0 {
            return Err(SimulationError::invalid(
                "maxBudget",
                format!("must be positive, got {}", self.max_budget),
            ));
        }
        Ok(())
    }

    pub fn is_satisfied(&self, completion_rate: f64, total_cost: f64) -> bool {
        completion_rate >= self.min_completion_rate && total_cost <= self.max_budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(StaffingConstraints::default().validate().is_ok());
        let c = StaffingConstraints {
            min_completion_rate: 120.0,
            ..Default::default()
        };
        assert!(c.validate().is_err());
        let c = StaffingConstraints {
            max_budget: 0.0,
            ..Default::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let c = StaffingConstraints {
            min_completion_rate: 90.0,
            max_budget: 5000.0,
        };
        assert!(c.is_satisfied(90.0, 5000.0));
        assert!(!c.is_satisfied(89.9, 100.0));
        assert!(!c.is_satisfied(100.0, 5000.01));
    }
}
