//! Monte Carlo simulator
//!
//! One parameterized entry point, [`simulate`], covers every variant: the
//! iteration count, confidence level, and whether cost annotations are wanted
//! all come from [`SimulationConfig`].
//!
//! Iterations run in fixed-size batches. Each batch owns a `SmallRng` seeded
//! from the run seed, the scenario's ratios, and the batch index, so a run is
//! reproducible regardless of how batches are scheduled across threads.
//! Shift length does not enter the seed: the same ratios see the same sampled
//! workloads at every shift length.

use rand::SeedableRng;
use rand::rngs::SmallRng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::{RateCard, SimulationConfig};
use crate::cost::estimate_cost;
use crate::error::{Result, SimulationError};
use crate::model::{
    CostBreakdown, Headcount, SampleCoverage, ScenarioGrid, ScenarioGroup, SimulationResult,
    StaffingScenario, TaskProfileSet,
};
use crate::progress::SimulationProgress;
use crate::stats::{CompletionStats, OutcomeTally, ShiftOutcome};
use crate::workload::WorkloadModel;

const MAX_BATCH_SIZE: usize = 100;

/// SplitMix64 finalizer
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn scenario_seed(seed: u64, scenario: &StaffingScenario) -> u64 {
    let ratios = (u64::from(scenario.primary_ratio()) << 32) | u64::from(scenario.secondary_ratio());
    mix(seed ^ mix(ratios))
}

fn batch_seed(scenario_seed: u64, batch: usize) -> u64 {
    mix(scenario_seed ^ mix(batch as u64))
}

/// Simulate one scenario.
///
/// Fails before sampling anything if the config, the task data, or the cost
/// inputs are invalid.
pub fn simulate(
    scenario: &StaffingScenario,
    profiles: &TaskProfileSet,
    config: &SimulationConfig,
) -> Result<SimulationResult> {
    simulate_with_progress(scenario, profiles, config, None)
}

/// Simulate one scenario, reporting progress and honoring cancellation.
///
/// When `progress` signals a stop, batches not yet started are skipped and
/// the result is marked [`SampleCoverage::Partial`]. If nothing ran at all,
/// [`SimulationError::Cancelled`] is returned. The caller owns the progress
/// total; this only adds completed iterations.
pub fn simulate_with_progress(
    scenario: &StaffingScenario,
    profiles: &TaskProfileSet,
    config: &SimulationConfig,
    progress: Option<&SimulationProgress>,
) -> Result<SimulationResult> {
    config.validate()?;
    profiles.ensure_sample_size(config.min_responses)?;
    let (headcount, cost) = annotate_cost(scenario, config.rates.as_ref())?;
    let model = WorkloadModel::new(scenario, profiles)?;

    let seed = config.resolve_seed();
    let tally = run_iterations(
        &model,
        scenario.shift_minutes(),
        config.iterations,
        scenario_seed(seed, scenario),
        progress,
    );

    if tally.iterations == 0 {
        return Err(SimulationError::Cancelled);
    }

    let coverage = if tally.iterations < config.iterations {
        tracing::warn!(
            scenario = %scenario.key(),
            requested = config.iterations,
            completed = tally.iterations,
            "Simulation stopped early, result is partial"
        );
        SampleCoverage::Partial {
            requested: config.iterations,
            completed: tally.iterations,
        }
    } else {
        SampleCoverage::Complete
    };

    let stats = CompletionStats::from_tally(&tally, config.confidence_level);
    tracing::debug!(
        scenario = %scenario.key(),
        iterations = tally.iterations,
        completion_rate = stats.completion_rate,
        risk_score = stats.risk_score,
        "Scenario simulated"
    );

    Ok(SimulationResult {
        scenario: *scenario,
        iterations: tally.iterations,
        coverage,
        confidence_level: config.confidence_level,
        seed,
        completion_rate: stats.completion_rate,
        confidence_lower: stats.confidence_lower,
        confidence_upper: stats.confidence_upper,
        std_dev: stats.std_dev,
        risk_score: stats.risk_score,
        failure_probability: stats.failure_probability,
        workload: tally.workload_summary(),
        headcount,
        cost,
    })
}

fn annotate_cost(
    scenario: &StaffingScenario,
    rates: Option<&RateCard>,
) -> Result<(Option<Headcount>, Option<CostBreakdown>)> {
    let Some(rates) = rates else {
        return Ok((scenario.headcount(), None));
    };
    let headcount = scenario.headcount().ok_or_else(|| {
        SimulationError::invalid(
            "patientVolume",
            "required when labor rates are supplied",
        )
    })?;
    let cost = estimate_cost(headcount, scenario.shift_hours(), rates)?;
    Ok((Some(headcount), Some(cost)))
}

fn run_iterations(
    model: &WorkloadModel<'_>,
    capacity_minutes: f64,
    iterations: usize,
    seed: u64,
    progress: Option<&SimulationProgress>,
) -> OutcomeTally {
    let num_batches = iterations.div_ceil(MAX_BATCH_SIZE);

    let run_batch = |i: usize| -> OutcomeTally {
        if progress.is_some_and(SimulationProgress::should_stop) {
            return OutcomeTally::default();
        }

        let mut rng = SmallRng::seed_from_u64(batch_seed(seed, i));
        let batch_size = if i == num_batches - 1 {
            iterations - i * MAX_BATCH_SIZE
        } else {
            MAX_BATCH_SIZE
        };

        let tally: OutcomeTally = (0..batch_size)
            .map(|_| ShiftOutcome::evaluate(model.sample_shift(&mut rng), capacity_minutes))
            .collect();

        if let Some(progress) = progress {
            progress.add_completed(batch_size);
        }
        tally
    };

    // Batch tallies are collected in index order so the float sums reduce
    // identically on every run.
    #[cfg(feature = "parallel")]
    let batches: Vec<OutcomeTally> = (0..num_batches).into_par_iter().map(run_batch).collect();

    #[cfg(not(feature = "parallel"))]
    let batches: Vec<OutcomeTally> = (0..num_batches).map(run_batch).collect();

    batches
        .into_iter()
        .fold(OutcomeTally::default(), OutcomeTally::merge)
}

/// Simulate each scenario, keeping input order.
///
/// A scenario that had not started when `progress` signalled a stop comes
/// back as `None`. Any other failure aborts the whole batch.
pub(crate) fn simulate_each(
    scenarios: &[StaffingScenario],
    profiles: &TaskProfileSet,
    config: &SimulationConfig,
    progress: Option<&SimulationProgress>,
) -> Result<Vec<Option<SimulationResult>>> {
    let run = |scenario: &StaffingScenario| {
        match simulate_with_progress(scenario, profiles, config, progress) {
            Ok(result) => Ok(Some(result)),
            Err(SimulationError::Cancelled) => Ok(None),
            Err(err) => Err(err),
        }
    };

    #[cfg(feature = "parallel")]
    let outcomes = scenarios.par_iter().map(run).collect::<Result<Vec<_>>>()?;

    #[cfg(not(feature = "parallel"))]
    let outcomes = scenarios.iter().map(run).collect::<Result<Vec<_>>>()?;

    if !scenarios.is_empty() && outcomes.iter().all(Option::is_none) {
        return Err(SimulationError::Cancelled);
    }
    Ok(outcomes)
}

/// Simulate several scenarios into one group.
///
/// Scenarios run in parallel. An unset seed is resolved once, so every
/// scenario in the group shares the same base seed.
///
/// If `progress` stops the run partway, scenarios that never started are
/// listed in [`ScenarioGroup::skipped`] and the group reports
/// [`ScenarioGroup::has_partial_results`]. [`SimulationError::Cancelled`] is
/// returned only when no scenario ran at all.
pub fn simulate_scenarios(
    scenarios: &[StaffingScenario],
    profiles: &TaskProfileSet,
    config: &SimulationConfig,
    progress: Option<&SimulationProgress>,
) -> Result<ScenarioGroup> {
    config.validate()?;
    profiles.ensure_sample_size(config.min_responses)?;

    let config = SimulationConfig {
        seed: Some(config.resolve_seed()),
        ..config.clone()
    };

    tracing::info!(
        scenarios = scenarios.len(),
        iterations = config.iterations,
        "Running scenario batch"
    );

    let outcomes = simulate_each(scenarios, profiles, &config, progress)?;

    let mut results = Vec::with_capacity(scenarios.len());
    let mut skipped = Vec::new();
    for (scenario, outcome) in scenarios.iter().zip(outcomes) {
        match outcome {
            Some(result) => results.push(result),
            None => skipped.push(scenario.key()),
        }
    }

    if !skipped.is_empty() {
        tracing::warn!(
            simulated = results.len(),
            skipped = skipped.len(),
            "Run stopped before every scenario started"
        );
    }

    ScenarioGroup::new(config.iterations, config.confidence_level, results)?.with_skipped(skipped)
}

/// Simulate every ratio pair of a grid
pub fn simulate_grid(
    grid: &ScenarioGrid,
    profiles: &TaskProfileSet,
    config: &SimulationConfig,
    progress: Option<&SimulationProgress>,
) -> Result<ScenarioGroup> {
    let scenarios = grid.scenarios()?;
    simulate_scenarios(&scenarios, profiles, config, progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TaskProfileBuilder;

    #[test]
    fn test_seed_derivation_ignores_shift_length() {
        let short = StaffingScenario::new(4, 12, 8.0).unwrap();
        let long = StaffingScenario::new(4, 12, 12.0).unwrap();
        let other = StaffingScenario::new(5, 12, 8.0).unwrap();
        assert_eq!(scenario_seed(1, &short), scenario_seed(1, &long));
        assert_ne!(scenario_seed(1, &short), scenario_seed(1, &other));
        assert_ne!(scenario_seed(1, &short), scenario_seed(2, &short));
        assert_ne!(batch_seed(7, 0), batch_seed(7, 1));
    }

    #[test]
    fn test_batch_sizes_cover_all_iterations() {
        let profiles = TaskProfileSet::new(vec![
            TaskProfileBuilder::per_patient("Vitals")
                .secondary()
                .range(5.0, 10.0)
                .build()
                .unwrap(),
        ])
        .unwrap();
        let scenario = StaffingScenario::new(4, 10, 8.0).unwrap();
        let model = WorkloadModel::new(&scenario, &profiles).unwrap();

        for iterations in [1, 99, 100, 101, 250] {
            let tally = run_iterations(&model, 480.0, iterations, 3, None);
            assert_eq!(tally.iterations, iterations);
        }
    }

    #[test]
    fn test_cost_requires_patient_volume() {
        let scenario = StaffingScenario::new(4, 10, 8.0).unwrap();
        let err = annotate_cost(&scenario, Some(&RateCard::default())).unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidParameter {
                parameter: "patientVolume",
                ..
            }
        ));

        let (headcount, cost) = annotate_cost(&scenario, None).unwrap();
        assert!(headcount.is_none());
        assert!(cost.is_none());
    }
}
