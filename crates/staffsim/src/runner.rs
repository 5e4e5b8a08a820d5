//! Runs a converted study end to end
//!
//! Simulates the ratio grid, then runs the sensitivity sweeps, the what-if
//! comparison, and the optimal staffing search against the simulated group.

use std::time::{Duration, Instant};

use color_eyre::eyre::WrapErr;
use staffsim_core::analysis::{
    SensitivityReport, WhatIfComparison, compare_what_if, run_sensitivity,
};
use staffsim_core::config::SimulationConfig;
use staffsim_core::error::SimulationError;
use staffsim_core::model::{RatioParameter, ScenarioGroup};
use staffsim_core::optimization::{RankedScenario, StaffingConstraints, rank_scenarios};
use staffsim_core::progress::SimulationProgress;
use staffsim_core::simulation::simulate_grid;

use crate::data::StudyInputs;

/// Command-line overrides applied on top of the study file
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub iterations: Option<usize>,
    pub seed: Option<u64>,
    pub timeout: Option<Duration>,
}

/// Everything a study run produced
#[derive(Debug, Clone)]
pub struct StudyOutcome {
    pub name: String,
    pub generated_at: jiff::Timestamp,
    pub elapsed: Duration,
    pub group: ScenarioGroup,
    pub constraints: StaffingConstraints,
    /// Every costed scenario, best first, flagged against the constraints
    pub ranked: Vec<RankedScenario>,
    pub sensitivity: Vec<SensitivityReport>,
    pub what_if: Option<WhatIfComparison>,
}

impl StudyOutcome {
    /// Scenarios meeting both constraints, best first
    pub fn feasible(&self) -> impl Iterator<Item = &RankedScenario> {
        self.ranked.iter().filter(|r| r.meets_requirements)
    }

    pub fn optimal(&self) -> Option<&RankedScenario> {
        self.feasible().next()
    }
}

/// Run one study.
///
/// A timeout that expires mid-grid yields partial results: scenarios that
/// never started are listed as skipped, and analyses that depend on a skipped
/// scenario are left out with a warning. Nothing is returned only if no
/// scenario ran before the timeout.
pub fn run_study(inputs: &StudyInputs, options: &RunOptions) -> color_eyre::Result<StudyOutcome> {
    let started = Instant::now();

    let mut config = inputs.config.clone();
    if let Some(iterations) = options.iterations {
        config = config.iterations(iterations);
    }
    // Resolve once so the grid and every sweep share the same seed
    let seed = options.seed.unwrap_or_else(|| config.resolve_seed());
    config = config.seed(seed);

    let mut progress = SimulationProgress::new(inputs.grid.len() * config.iterations);
    if let Some(timeout) = options.timeout {
        progress = progress.with_timeout(timeout);
    }

    tracing::info!(
        study = %inputs.name,
        scenarios = inputs.grid.len(),
        iterations = config.iterations,
        seed,
        "Simulating scenario grid"
    );

    let group = simulate_grid(&inputs.grid, &inputs.profiles, &config, Some(&progress))
        .wrap_err("Failed to simulate scenario grid")?;

    if group.has_partial_results() {
        tracing::warn!(
            completed = progress.completed(),
            total = progress.total(),
            skipped = group.skipped().len(),
            "Grid stopped early; results are partial"
        );
    }

    let sensitivity = run_sweeps(inputs, &group, &config, &progress)?;

    let what_if = inputs
        .what_if
        .filter(|(current, proposed)| {
            let skipped = group.skipped();
            let missing = skipped.contains(current) || skipped.contains(proposed);
            if missing {
                tracing::warn!("What-if scenario was not simulated, skipping comparison");
            }
            !missing
        })
        .map(|(current, proposed)| compare_what_if(&group, &current, &proposed))
        .transpose()
        .wrap_err("What-if comparison failed")?;

    let ranked =
        rank_scenarios(&group, &inputs.constraints).wrap_err("Optimal staffing search failed")?;

    let outcome = StudyOutcome {
        name: inputs.name.clone(),
        generated_at: jiff::Timestamp::now(),
        elapsed: started.elapsed(),
        group,
        constraints: inputs.constraints,
        ranked,
        sensitivity,
        what_if,
    };

    match outcome.optimal() {
        Some(best) => tracing::info!(
            scenario = %best.result.key(),
            efficiency = best.efficiency_score,
            "Optimal staffing found"
        ),
        None => tracing::info!("No feasible staffing ratio found"),
    }
    tracing::info!(elapsed_ms = outcome.elapsed.as_millis() as u64, "Study complete");

    Ok(outcome)
}

fn run_sweeps(
    inputs: &StudyInputs,
    group: &ScenarioGroup,
    config: &SimulationConfig,
    progress: &SimulationProgress,
) -> color_eyre::Result<Vec<SensitivityReport>> {
    if group.skipped().contains(&inputs.sensitivity_baseline) {
        tracing::warn!(
            baseline = %inputs.sensitivity_baseline,
            "Sensitivity baseline was not simulated, skipping sweeps"
        );
        return Ok(Vec::new());
    }

    let baseline = group
        .require(&inputs.sensitivity_baseline)
        .wrap_err("Sensitivity baseline is not part of the scenario grid")?;

    let sweeps = [
        (RatioParameter::PrimaryRatio, &inputs.primary_values),
        (RatioParameter::SecondaryRatio, &inputs.secondary_values),
    ];

    let mut reports = Vec::new();
    for (parameter, values) in sweeps {
        if values.is_empty() {
            continue;
        }
        progress.add_total(values.len() * config.iterations);

        match run_sensitivity(
            baseline,
            parameter,
            values,
            &inputs.profiles,
            config,
            Some(progress),
        ) {
            Ok(report) => reports.push(report),
            Err(SimulationError::Cancelled) => {
                tracing::warn!(
                    parameter = parameter.name(),
                    "Time limit reached, skipping sensitivity sweep"
                );
            }
            Err(err) => {
                return Err(err).wrap_err_with(|| {
                    format!("Sensitivity sweep over {} failed", parameter.name())
                });
            }
        }
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StudyData;
    use staffsim_core::model::ScenarioKey;

    fn quick_options() -> RunOptions {
        RunOptions {
            iterations: Some(200),
            seed: Some(42),
            timeout: None,
        }
    }

    #[test]
    fn test_run_starter_study() {
        let inputs = StudyData::starter().to_inputs().unwrap();
        let outcome = run_study(&inputs, &quick_options()).unwrap();

        assert_eq!(outcome.group.len(), 9);
        assert!(outcome.group.iter().all(|r| r.iterations == 200));
        assert!(outcome.group.iter().all(|r| r.seed == 42));
        assert_eq!(outcome.ranked.len(), 9);
        assert_eq!(outcome.sensitivity.len(), 2);
        assert_eq!(outcome.sensitivity[0].points.len(), 5);
        assert_eq!(
            outcome.sensitivity[0].baseline,
            ScenarioKey::new(4, 12, 8.0)
        );

        let what_if = outcome.what_if.as_ref().unwrap();
        assert_eq!(what_if.current, ScenarioKey::new(4, 12, 8.0));
        assert_eq!(what_if.proposed, ScenarioKey::new(3, 10, 8.0));

        for best in outcome.feasible() {
            assert!(best.result.completion_rate >= 90.0);
            assert!(best.result.total_cost().unwrap() <= 10_000.0);
        }
    }

    #[test]
    fn test_seeded_runs_match() {
        let inputs = StudyData::starter().to_inputs().unwrap();
        let first = run_study(&inputs, &quick_options()).unwrap();
        let second = run_study(&inputs, &quick_options()).unwrap();

        assert_eq!(first.group, second.group);
        assert_eq!(first.ranked, second.ranked);
        assert_eq!(first.sensitivity, second.sensitivity);
    }

    #[test]
    fn test_what_if_outside_grid_fails() {
        let mut study = StudyData::starter();
        if let Some(what_if) = study.what_if.as_mut() {
            what_if.proposed.primary_ratio = 9;
        }
        let inputs = study.to_inputs().unwrap();

        let err = run_study(&inputs, &quick_options()).unwrap_err();
        let root = err.root_cause().downcast_ref::<SimulationError>();
        assert_eq!(
            root,
            Some(&SimulationError::NotFound(ScenarioKey::new(9, 10, 8.0)))
        );
    }

    #[test]
    fn test_expired_timeout_is_reported() {
        let inputs = StudyData::starter().to_inputs().unwrap();
        let options = RunOptions {
            timeout: Some(Duration::ZERO),
            ..quick_options()
        };

        // Nothing can run once the deadline has passed
        let err = run_study(&inputs, &options).unwrap_err();
        assert_eq!(
            err.root_cause().downcast_ref::<SimulationError>(),
            Some(&SimulationError::Cancelled)
        );
    }
}
