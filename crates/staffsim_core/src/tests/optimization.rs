//! Tests for the optimal staffing search

use super::fixtures::simulated_grid;
use crate::optimization::{StaffingConstraints, efficiency_score, find_optimal, rank_scenarios};

#[test]
fn test_find_optimal_is_idempotent() {
    let group = simulated_grid(13);
    let constraints = StaffingConstraints {
        min_completion_rate: 0.0,
        max_budget: 1_000_000.0,
    };

    let first = find_optimal(&group, &constraints).unwrap();
    let second = find_optimal(&group, &constraints).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), group.len());
}

#[test]
fn test_feasible_results_sorted_by_efficiency() {
    let group = simulated_grid(13);
    let constraints = StaffingConstraints {
        min_completion_rate: 0.0,
        max_budget: 1_000_000.0,
    };

    let ranked = find_optimal(&group, &constraints).unwrap();
    for pair in ranked.windows(2) {
        assert!(pair[0].efficiency_score >= pair[1].efficiency_score);
    }
    for entry in &ranked {
        let cost = entry.result.total_cost().unwrap();
        assert!(entry.meets_requirements);
        assert_eq!(
            entry.efficiency_score,
            efficiency_score(entry.result.completion_rate, cost)
        );
    }
}

#[test]
fn test_constraints_filter_results() {
    let group = simulated_grid(13);
    let constraints = StaffingConstraints {
        min_completion_rate: 50.0,
        max_budget: 5_000.0,
    };

    let feasible = find_optimal(&group, &constraints).unwrap();
    for entry in &feasible {
        assert!(entry.result.completion_rate >= 50.0);
        assert!(entry.result.total_cost().unwrap() <= 5_000.0);
    }

    let all = rank_scenarios(&group, &constraints).unwrap();
    assert_eq!(all.len(), group.len());
    assert_eq!(
        all.iter().filter(|r| r.meets_requirements).count(),
        feasible.len()
    );
}

#[test]
fn test_no_feasible_scenario_is_empty() {
    let group = simulated_grid(13);
    let constraints = StaffingConstraints {
        min_completion_rate: 100.0,
        max_budget: 1.0,
    };
    assert!(find_optimal(&group, &constraints).unwrap().is_empty());
}

#[test]
fn test_invalid_constraints_rejected() {
    let group = simulated_grid(13);
    let constraints = StaffingConstraints {
        min_completion_rate: -5.0,
        max_budget: 1_000.0,
    };
    assert!(find_optimal(&group, &constraints).is_err());
}
