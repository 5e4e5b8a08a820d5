//! Labor cost model

use crate::config::RateCard;
use crate::error::{Result, SimulationError};
use crate::model::{CostBreakdown, Headcount, Role};

fn ensure_positive(parameter: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::invalid(
            parameter,
            format!("must be positive, got {value}"),
        ))
    }
}

impl RateCard {
    pub fn hourly_rate(&self, role: Role) -> f64 {
        match role {
            Role::Primary => self.primary_hourly_rate,
            Role::Secondary => self.secondary_hourly_rate,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("primaryHourlyRate", self.primary_hourly_rate)?;
        ensure_positive("secondaryHourlyRate", self.secondary_hourly_rate)?;
        ensure_positive("overheadMultiplier", self.overhead_multiplier)
    }
}

/// Labor cost of one shift.
///
/// `role_cost = headcount * shift_hours * hourly_rate`, and the overhead
/// multiplier applies to the sum of both roles.
pub fn estimate_cost(
    headcount: Headcount,
    shift_hours: f64,
    rates: &RateCard,
) -> Result<CostBreakdown> {
    if headcount.primary == 0 {
        return Err(SimulationError::invalid(
            "primaryHeadcount",
            "must be positive",
        ));
    }
    if headcount.secondary == 0 {
        return Err(SimulationError::invalid(
            "secondaryHeadcount",
            "must be positive",
        ));
    }
    ensure_positive("shiftHours", shift_hours)?;
    rates.validate()?;

    let role_cost = |role| f64::from(headcount.get(role)) * shift_hours * rates.hourly_rate(role);
    let primary_cost = role_cost(Role::Primary);
    let secondary_cost = role_cost(Role::Secondary);
    let total_cost = primary_cost + secondary_cost;

    Ok(CostBreakdown {
        primary_cost,
        secondary_cost,
        total_cost,
        total_with_overhead: total_cost * rates.overhead_multiplier,
    })
}
