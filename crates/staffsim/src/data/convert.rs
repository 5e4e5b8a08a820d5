use staffsim_core::config::{ConfidenceLevel, SimulationConfig, TaskProfileBuilder};
use staffsim_core::error::SimulationError;
use staffsim_core::model::{
    OccurrenceKind, ScenarioGrid, ScenarioKey, TaskProfile, TaskProfileSet,
};
use staffsim_core::optimization::StaffingConstraints;

use super::study::{ScenarioRef, StudyData, TaskData};

#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// Task has neither a min/max range nor survey observations
    MissingRange(String),
    /// The engine rejected a converted value
    Invalid(SimulationError),
}

impl std::fmt::Display for ConvertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertError::MissingRange(task) => write!(
                f,
                "Task '{}' needs min_minutes and max_minutes, or observations",
                task
            ),
            ConvertError::Invalid(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ConvertError {}

impl From<SimulationError> for ConvertError {
    fn from(err: SimulationError) -> Self {
        ConvertError::Invalid(err)
    }
}

/// Everything the engine needs to run a study
#[derive(Debug, Clone)]
pub struct StudyInputs {
    pub name: String,
    pub profiles: TaskProfileSet,
    pub grid: ScenarioGrid,
    pub config: SimulationConfig,
    pub constraints: StaffingConstraints,
    pub sensitivity_baseline: ScenarioKey,
    pub primary_values: Vec<u32>,
    pub secondary_values: Vec<u32>,
    pub what_if: Option<(ScenarioKey, ScenarioKey)>,
}

fn to_task_profile(task: &TaskData) -> Result<TaskProfile, ConvertError> {
    let mut builder = if task.observations.is_empty() {
        let (Some(min), Some(max)) = (task.min_minutes, task.max_minutes) else {
            return Err(ConvertError::MissingRange(task.name.clone()));
        };
        let builder = match task.occurrence {
            OccurrenceKind::OncePerShift => TaskProfileBuilder::once_per_shift(task.name.as_str()),
            OccurrenceKind::PerAssignedPatient => {
                TaskProfileBuilder::per_patient(task.name.as_str())
            }
        };
        builder.role(task.role).range(min, max)
    } else {
        TaskProfileBuilder::from_observations(
            task.name.as_str(),
            task.role,
            task.occurrence,
            &task.observations,
        )?
    };

    // Explicit values override anything aggregated from observations
    if let Some(std_dev) = task.std_dev {
        builder = builder.std_dev(std_dev);
    }
    if let Some(frequency) = task.frequency {
        builder = builder.frequency(frequency);
    }
    if let Some(responses) = task.responses {
        builder = builder.responses(responses);
    }
    Ok(builder.build()?)
}

fn to_key(scenario: ScenarioRef, shift_hours: f64) -> ScenarioKey {
    ScenarioKey::new(scenario.primary_ratio, scenario.secondary_ratio, shift_hours)
}

impl StudyData {
    /// Validate and convert into engine inputs.
    ///
    /// `what_if` and the sensitivity baseline are resolved to keys here but
    /// only checked against the simulated group later.
    pub fn to_inputs(&self) -> Result<StudyInputs, ConvertError> {
        let profiles = self
            .tasks
            .iter()
            .map(to_task_profile)
            .collect::<Result<Vec<_>, _>>()?;
        let profiles = TaskProfileSet::new(profiles)?;

        let grid = ScenarioGrid {
            primary_ratios: self.scenarios.primary_ratios.clone(),
            secondary_ratios: self.scenarios.secondary_ratios.clone(),
            shift_hours: self.scenarios.shift_hours,
            patient_volume: Some(self.scenarios.patient_volume),
        };
        // Surface bad ratios and volumes before any simulation starts
        grid.scenarios()?;

        self.rates.validate()?;
        self.constraints.validate()?;

        let mut config = SimulationConfig::default()
            .iterations(self.simulation.iterations)
            .confidence(ConfidenceLevel::from_fraction(
                self.simulation.confidence_level,
            )?)
            .min_responses(self.simulation.min_responses)
            .rates(self.rates);
        if let Some(seed) = self.simulation.seed {
            config = config.seed(seed);
        }
        config.validate()?;

        let shift_hours = grid.shift_hours;
        let sensitivity_baseline = match self.sensitivity.baseline {
            Some(baseline) => to_key(baseline, shift_hours),
            None => grid.median_key().ok_or_else(|| {
                ConvertError::Invalid(SimulationError::InvalidParameter {
                    parameter: "ratios",
                    reason: "both ratio lists need at least one value".to_string(),
                })
            })?,
        };

        Ok(StudyInputs {
            name: self.name.clone(),
            profiles,
            grid,
            config,
            constraints: self.constraints,
            sensitivity_baseline,
            primary_values: self.sensitivity.primary_values.clone(),
            secondary_values: self.sensitivity.secondary_values.clone(),
            what_if: self
                .what_if
                .map(|w| (to_key(w.current, shift_hours), to_key(w.proposed, shift_hours))),
        })
    }
}
