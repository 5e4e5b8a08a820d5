//! Plain-text study report

use std::fmt;

use staffsim_core::analysis::{SensitivityReport, WhatIfComparison};
use staffsim_core::model::{ScenarioGroup, SimulationResult};
use staffsim_core::optimization::RankedScenario;

use crate::runner::StudyOutcome;
use crate::util::format::{format_change, format_currency, format_percent};

const RULE: &str = "--------------------------------------------------------------------------------";

fn cost_or_dash(value: Option<f64>) -> String {
    value.map(format_currency).unwrap_or_else(|| "-".to_string())
}

fn scenario_row(f: &mut fmt::Formatter<'_>, result: &SimulationResult) -> fmt::Result {
    let partial = if result.is_partial() { " *" } else { "" };
    writeln!(
        f,
        "{:<32} {:>7} {:>17} {:>6.1} {:<9} {:>10}{}",
        result.label(),
        format_percent(result.completion_rate),
        format!(
            "[{:.1}, {:.1}]",
            result.confidence_lower, result.confidence_upper
        ),
        result.risk_score,
        result.risk_level().label(),
        cost_or_dash(result.total_cost()),
        partial,
    )
}

fn ranked_row(f: &mut fmt::Formatter<'_>, rank: usize, entry: &RankedScenario) -> fmt::Result {
    writeln!(
        f,
        "{:>3}. {:<32} {:>7} {:>10}  efficiency {}",
        rank,
        entry.result.label(),
        format_percent(entry.result.completion_rate),
        cost_or_dash(entry.result.total_cost()),
        entry.efficiency_score,
    )
}

fn group_section(f: &mut fmt::Formatter<'_>, group: &ScenarioGroup) -> fmt::Result {
    writeln!(
        f,
        "{:<32} {:>7} {:>17} {:>6} {:<9} {:>10}",
        "Scenario", "Rate", "Interval", "Risk", "Level", "Cost"
    )?;
    for result in group.iter() {
        scenario_row(f, result)?;
    }
    for key in group.skipped() {
        writeln!(f, "{:<32} not simulated", key.to_string())?;
    }
    if group.has_partial_results() {
        writeln!(f, "* stopped early; statistics cover fewer iterations")?;
    }
    if let Some((low, high)) = group.cost_range() {
        writeln!(
            f,
            "Cost range {} - {} | {} high-risk scenario(s)",
            format_currency(low),
            format_currency(high),
            group.high_risk_count()
        )?;
    }
    Ok(())
}

fn sensitivity_section(f: &mut fmt::Formatter<'_>, report: &SensitivityReport) -> fmt::Result {
    writeln!(
        f,
        "\n{} sweep around {} (baseline {})",
        report.parameter.name(),
        report.baseline,
        format_percent(report.baseline_rate)
    )?;
    for point in &report.points {
        writeln!(
            f,
            "  1:{:<4} {:>7} {:>9}{}",
            point.parameter_value,
            format_percent(point.completion_rate),
            format_change(point.rate_change_percent),
            if point.partial { " *" } else { "" },
        )?;
    }
    for value in &report.skipped {
        writeln!(f, "  1:{value:<4} not simulated")?;
    }
    if let Some(worst) = report.steepest_decline() {
        writeln!(
            f,
            "  steepest decline at 1:{} ({})",
            worst.parameter_value,
            format_change(worst.rate_change_percent)
        )?;
    }
    Ok(())
}

fn what_if_section(f: &mut fmt::Formatter<'_>, comparison: &WhatIfComparison) -> fmt::Result {
    writeln!(
        f,
        "\nWhat-if: {} -> {}",
        comparison.current, comparison.proposed
    )?;
    for delta in &comparison.deltas {
        writeln!(
            f,
            "  {:<26} {:>12.2} {:>12.2} {:>+12.2} {:>9}",
            delta.metric.label(),
            delta.current_value,
            delta.proposed_value,
            delta.change_value,
            format_change(delta.change_percent),
        )?;
    }
    Ok(())
}

/// Text rendering of a finished study
pub struct StudyReport<'a>(pub &'a StudyOutcome);

impl fmt::Display for StudyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = self.0;
        let group = &outcome.group;

        writeln!(f, "Staffing study: {}", outcome.name)?;
        writeln!(
            f,
            "Generated {} in {:.2}s | {} iterations per scenario | {:.0}% confidence",
            outcome.generated_at,
            outcome.elapsed.as_secs_f64(),
            group.iterations(),
            group.confidence_level().fraction() * 100.0
        )?;
        writeln!(f, "{RULE}")?;
        group_section(f, group)?;

        writeln!(f, "\n{RULE}")?;
        writeln!(
            f,
            "Optimal staffing (completion >= {}, budget <= {})",
            format_percent(outcome.constraints.min_completion_rate),
            format_currency(outcome.constraints.max_budget)
        )?;
        let mut feasible = outcome.feasible().peekable();
        if feasible.peek().is_none() {
            writeln!(f, "  No feasible staffing ratio found")?;
        }
        for (i, entry) in feasible.enumerate() {
            ranked_row(f, i + 1, entry)?;
        }

        if let Some(comparison) = &outcome.what_if {
            writeln!(f, "\n{RULE}")?;
            what_if_section(f, comparison)?;
        }

        if !outcome.sensitivity.is_empty() {
            writeln!(f, "\n{RULE}")?;
            for report in &outcome.sensitivity {
                sensitivity_section(f, report)?;
            }
        }
        Ok(())
    }
}

/// Render a finished study as text
pub fn render_report(outcome: &StudyOutcome) -> String {
    StudyReport(outcome).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::StudyData;
    use crate::runner::{RunOptions, run_study};
    use staffsim_core::model::ScenarioKey;

    #[test]
    fn test_report_sections() {
        let inputs = StudyData::starter().to_inputs().unwrap();
        let options = RunOptions {
            iterations: Some(100),
            seed: Some(9),
            timeout: None,
        };
        let outcome = run_study(&inputs, &options).unwrap();
        let report = render_report(&outcome);

        assert!(report.starts_with("Staffing study: Medical-Surgical Unit"));
        assert!(report.contains("Primary 1:4 | Secondary 1:12"));
        assert!(report.contains("Optimal staffing"));
        assert!(report.contains("What-if: Primary 1:4 | Secondary 1:12 (8h)"));
        assert!(report.contains("primaryRatio sweep"));
        assert!(report.contains("secondaryRatio sweep"));
        assert!(!report.contains(" *\n"));
        assert!(!report.contains("not simulated"));
    }

    #[test]
    fn test_report_lists_skipped_scenarios() {
        let inputs = StudyData::starter().to_inputs().unwrap();
        let options = RunOptions {
            iterations: Some(100),
            seed: Some(9),
            timeout: None,
        };
        let mut outcome = run_study(&inputs, &options).unwrap();

        let dropped = ScenarioKey::new(5, 14, 8.0);
        let kept = outcome
            .group
            .iter()
            .filter(|r| r.key() != dropped)
            .cloned()
            .collect();
        outcome.group = ScenarioGroup::new(100, outcome.group.confidence_level(), kept)
            .and_then(|g| g.with_skipped(vec![dropped]))
            .unwrap();
        if let Some(sweep) = outcome.sensitivity.first_mut() {
            sweep.skipped.push(7);
        }

        let report = render_report(&outcome);
        assert!(report.contains("Primary 1:5 | Secondary 1:14 (8h)"));
        assert!(report.contains("not simulated"));
        assert!(report.contains("  1:7    not simulated"));
        assert!(report.contains("* stopped early"));
    }
}
