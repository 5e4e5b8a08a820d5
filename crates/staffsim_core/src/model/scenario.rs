//! Staffing scenarios and scenario grids

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use super::task::Role;
use crate::error::{Result, SimulationError};

/// Which ratio a sensitivity sweep varies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioParameter {
    PrimaryRatio,
    SecondaryRatio,
}

impl RatioParameter {
    pub fn role(&self) -> Role {
        match self {
            RatioParameter::PrimaryRatio => Role::Primary,
            RatioParameter::SecondaryRatio => Role::Secondary,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RatioParameter::PrimaryRatio => "primaryRatio",
            RatioParameter::SecondaryRatio => "secondaryRatio",
        }
    }
}

/// Identity of a scenario: two scenarios with the same key are interchangeable
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScenarioKey {
    pub primary_ratio: u32,
    pub secondary_ratio: u32,
    pub shift_hours: f64,
}

impl ScenarioKey {
    pub fn new(primary_ratio: u32, secondary_ratio: u32, shift_hours: f64) -> Self {
        Self {
            primary_ratio,
            secondary_ratio,
            shift_hours,
        }
    }
}

impl PartialEq for ScenarioKey {
    fn eq(&self, other: &Self) -> bool {
        self.primary_ratio == other.primary_ratio
            && self.secondary_ratio == other.secondary_ratio
            && self.shift_hours.to_bits() == other.shift_hours.to_bits()
    }
}

impl Eq for ScenarioKey {}

impl Hash for ScenarioKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.primary_ratio.hash(state);
        self.secondary_ratio.hash(state);
        self.shift_hours.to_bits().hash(state);
    }
}

impl fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Primary 1:{} | Secondary 1:{} ({}h)",
            self.primary_ratio, self.secondary_ratio, self.shift_hours
        )
    }
}

/// Providers needed per role to cover a patient census
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headcount {
    pub primary: u32,
    pub secondary: u32,
}

impl Headcount {
    pub fn get(&self, role: Role) -> u32 {
        match role {
            Role::Primary => self.primary,
            Role::Secondary => self.secondary,
        }
    }
}

/// `ceil(patient_volume / ratio)`
pub fn headcount_for(patient_volume: u32, ratio: u32) -> u32 {
    patient_volume.div_ceil(ratio.max(1))
}

/// One candidate staffing configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StaffingScenario {
    primary_ratio: u32,
    secondary_ratio: u32,
    shift_hours: f64,
    patient_volume: Option<u32>,
}

impl StaffingScenario {
    pub fn new(primary_ratio: u32, secondary_ratio: u32, shift_hours: f64) -> Result<Self> {
        if primary_ratio == 0 {
            return Err(SimulationError::invalid(
                "primaryRatio",
                "must be a positive integer",
            ));
        }
        if secondary_ratio == 0 {
            return Err(SimulationError::invalid(
                "secondaryRatio",
                "must be a positive integer",
            ));
        }
        if !shift_hours.is_finite() || shift_hours <= 0.0 {
            return Err(SimulationError::invalid(
                "shiftHours",
                format!("must be positive, got {shift_hours}"),
            ));
        }
        Ok(Self {
            primary_ratio,
            secondary_ratio,
            shift_hours,
            patient_volume: None,
        })
    }

    /// Attach a patient census, needed for headcount and cost
    pub fn with_patient_volume(mut self, patient_volume: u32) -> Result<Self> {
        if patient_volume == 0 {
            return Err(SimulationError::invalid(
                "patientVolume",
                "must be a positive integer",
            ));
        }
        self.patient_volume = Some(patient_volume);
        Ok(self)
    }

    pub fn primary_ratio(&self) -> u32 {
        self.primary_ratio
    }

    pub fn secondary_ratio(&self) -> u32 {
        self.secondary_ratio
    }

    pub fn ratio(&self, role: Role) -> u32 {
        match role {
            Role::Primary => self.primary_ratio,
            Role::Secondary => self.secondary_ratio,
        }
    }

    pub fn shift_hours(&self) -> f64 {
        self.shift_hours
    }

    pub fn shift_minutes(&self) -> f64 {
        self.shift_hours * 60.0
    }

    pub fn patient_volume(&self) -> Option<u32> {
        self.patient_volume
    }

    pub fn key(&self) -> ScenarioKey {
        ScenarioKey::new(self.primary_ratio, self.secondary_ratio, self.shift_hours)
    }

    /// `"Primary 1:4 | Secondary 1:12"`
    pub fn label(&self) -> String {
        format!(
            "Primary 1:{} | Secondary 1:{}",
            self.primary_ratio, self.secondary_ratio
        )
    }

    pub fn headcount(&self) -> Option<Headcount> {
        self.patient_volume.map(|volume| Headcount {
            primary: headcount_for(volume, self.primary_ratio),
            secondary: headcount_for(volume, self.secondary_ratio),
        })
    }

    /// Copy of this scenario with one ratio replaced
    pub fn with_ratio(&self, parameter: RatioParameter, value: u32) -> Result<Self> {
        let (primary, secondary) = match parameter {
            RatioParameter::PrimaryRatio => (value, self.secondary_ratio),
            RatioParameter::SecondaryRatio => (self.primary_ratio, value),
        };
        let scenario = Self::new(primary, secondary, self.shift_hours)?;
        Ok(Self {
            patient_volume: self.patient_volume,
            ..scenario
        })
    }
}

/// Cartesian product of primary and secondary ratio lists for one shift
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioGrid {
    pub primary_ratios: Vec<u32>,
    pub secondary_ratios: Vec<u32>,
    pub shift_hours: f64,
    pub patient_volume: Option<u32>,
}

impl ScenarioGrid {
    /// Expand into scenarios, primary ratio varying slowest
    pub fn scenarios(&self) -> Result<Vec<StaffingScenario>> {
        if self.primary_ratios.is_empty() || self.secondary_ratios.is_empty() {
            return Err(SimulationError::invalid(
                "ratios",
                "both ratio lists need at least one value",
            ));
        }
        let mut scenarios = Vec::with_capacity(self.len());
        for &primary in &self.primary_ratios {
            for &secondary in &self.secondary_ratios {
                let scenario = StaffingScenario::new(primary, secondary, self.shift_hours)?;
                let scenario = match self.patient_volume {
                    Some(volume) => scenario.with_patient_volume(volume)?,
                    None => scenario,
                };
                scenarios.push(scenario);
            }
        }
        Ok(scenarios)
    }

    pub fn len(&self) -> usize {
        self.primary_ratios.len() * self.secondary_ratios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Middle value of each ratio list, the default sensitivity baseline
    pub fn median_key(&self) -> Option<ScenarioKey> {
        let primary = self.primary_ratios.get(self.primary_ratios.len() / 2)?;
        let secondary = self.secondary_ratios.get(self.secondary_ratios.len() / 2)?;
        Some(ScenarioKey::new(*primary, *secondary, self.shift_hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_validation() {
        assert!(StaffingScenario::new(0, 10, 8.0).is_err());
        assert!(StaffingScenario::new(4, 0, 8.0).is_err());
        assert!(StaffingScenario::new(4, 10, 0.0).is_err());
        assert!(StaffingScenario::new(4, 10, f64::NAN).is_err());
        assert!(StaffingScenario::new(4, 10, 12.0).is_ok());
    }

    #[test]
    fn test_headcount_rounds_up() {
        let scenario = StaffingScenario::new(4, 12, 8.0)
            .unwrap()
            .with_patient_volume(30)
            .unwrap();
        assert_eq!(
            scenario.headcount(),
            Some(Headcount {
                primary: 8,
                secondary: 3
            })
        );
        assert_eq!(headcount_for(30, 5), 6);
    }

    #[test]
    fn test_key_identity() {
        let a = StaffingScenario::new(4, 12, 8.0).unwrap();
        let b = StaffingScenario::new(4, 12, 8.0)
            .unwrap()
            .with_patient_volume(40)
            .unwrap();
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), StaffingScenario::new(4, 12, 12.0).unwrap().key());
    }

    #[test]
    fn test_with_ratio_keeps_other_fields() {
        let base = StaffingScenario::new(4, 12, 8.0)
            .unwrap()
            .with_patient_volume(30)
            .unwrap();
        let variant = base.with_ratio(RatioParameter::SecondaryRatio, 16).unwrap();
        assert_eq!(variant.primary_ratio(), 4);
        assert_eq!(variant.secondary_ratio(), 16);
        assert_eq!(variant.shift_hours(), 8.0);
        assert_eq!(variant.patient_volume(), Some(30));
    }

    #[test]
    fn test_grid_expansion_and_median() {
        let grid = ScenarioGrid {
            primary_ratios: vec![3, 4, 5],
            secondary_ratios: vec![10, 12, 14],
            shift_hours: 8.0,
            patient_volume: Some(30),
        };
        let scenarios = grid.scenarios().unwrap();
        assert_eq!(scenarios.len(), 9);
        assert_eq!(scenarios[0].key(), ScenarioKey::new(3, 10, 8.0));
        assert_eq!(scenarios[1].key(), ScenarioKey::new(3, 12, 8.0));
        assert_eq!(scenarios[8].key(), ScenarioKey::new(5, 14, 8.0));
        assert_eq!(grid.median_key(), Some(ScenarioKey::new(4, 12, 8.0)));
        assert_eq!(scenarios[4].label(), "Primary 1:4 | Secondary 1:12");
    }

    #[test]
    fn test_empty_grid_rejected() {
        let grid = ScenarioGrid {
            primary_ratios: vec![],
            secondary_ratios: vec![10],
            shift_hours: 8.0,
            patient_volume: None,
        };
        assert!(grid.scenarios().is_err());
        assert_eq!(grid.median_key(), None);
    }
}
