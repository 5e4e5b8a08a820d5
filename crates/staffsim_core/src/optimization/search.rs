//! Constraint filtering and efficiency ranking

use std::cmp::Ordering;

use super::config::StaffingConstraints;
use super::result::RankedScenario;
use crate::error::Result;
use crate::model::{ScenarioGroup, SimulationResult};

/// Completion rate per thousand units of cost, rounded
pub fn efficiency_score(completion_rate: f64, total_cost: f64) -> i64 {
    (completion_rate / total_cost * 1000.0).round() as i64
}

/// Efficiency descending, then completion rate descending, cost ascending,
/// and finally ratios, so the order is total and stable across calls
fn rank_order(a: &RankedScenario, b: &RankedScenario) -> Ordering {
    let cost = |r: &RankedScenario| r.result.total_cost().unwrap_or(f64::INFINITY);
    b.efficiency_score
        .cmp(&a.efficiency_score)
        .then_with(|| b.result.completion_rate.total_cmp(&a.result.completion_rate))
        .then_with(|| cost(a).total_cmp(&cost(b)))
        .then_with(|| {
            let key = |r: &RankedScenario| {
                (
                    r.result.scenario.primary_ratio(),
                    r.result.scenario.secondary_ratio(),
                )
            };
            key(a).cmp(&key(b))
        })
}

fn rank(result: &SimulationResult, constraints: &StaffingConstraints) -> Option<RankedScenario> {
    let Some(total_cost) = result.total_cost() else {
        tracing::debug!(scenario = %result.key(), "Skipping scenario without cost annotation");
        return None;
    };
    Some(RankedScenario {
        result: result.clone(),
        efficiency_score: efficiency_score(result.completion_rate, total_cost),
        meets_requirements: constraints.is_satisfied(result.completion_rate, total_cost),
    })
}

/// Every cost-annotated scenario of the group, flagged and ranked
pub fn rank_scenarios(
    group: &ScenarioGroup,
    constraints: &StaffingConstraints,
) -> Result<Vec<RankedScenario>> {
    constraints.validate()?;
    let mut ranked: Vec<RankedScenario> = group
        .iter()
        .filter_map(|result| rank(result, constraints))
        .collect();
    ranked.sort_by(rank_order);
    Ok(ranked)
}

/// Feasible scenarios sorted by efficiency.
///
/// An empty vector means no scenario meets both constraints; that is a valid
/// outcome, not an error.
pub fn find_optimal(
    group: &ScenarioGroup,
    constraints: &StaffingConstraints,
) -> Result<Vec<RankedScenario>> {
    let feasible: Vec<RankedScenario> = rank_scenarios(group, constraints)?
        .into_iter()
        .filter(|r| r.meets_requirements)
        .collect();

    if feasible.is_empty() {
        tracing::info!(
            min_completion_rate = constraints.min_completion_rate,
            max_budget = constraints.max_budget,
            "No feasible staffing ratio found"
        );
    }
    Ok(feasible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_efficiency_score() {
        assert_eq!(efficiency_score(95.0, 4430.4), 21);
        assert_eq!(efficiency_score(100.0, 1000.0), 100);
        assert_eq!(efficiency_score(0.0, 1000.0), 0);
    }
}
