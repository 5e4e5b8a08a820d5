use serde::{Deserialize, Serialize};
use staffsim_core::config::{RateCard, TaskObservation};
use staffsim_core::model::{OccurrenceKind, Role};
use staffsim_core::optimization::StaffingConstraints;

/// A complete staffing study in human-readable format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyData {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Surveyed care tasks for both roles
    pub tasks: Vec<TaskData>,

    /// Ratio grid to simulate
    #[serde(default)]
    pub scenarios: ScenariosData,

    #[serde(default)]
    pub simulation: SimulationData,

    /// Hourly labor rates; every study is cost-annotated
    #[serde(default)]
    pub rates: RateCard,

    /// Feasibility bounds for the optimal staffing search
    #[serde(default)]
    pub constraints: StaffingConstraints,

    #[serde(default)]
    pub sensitivity: SensitivityData,

    /// Optional current vs proposed comparison
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub what_if: Option<WhatIfData>,
}

/// One surveyed task.
///
/// Either give `min_minutes`/`max_minutes` directly, or list raw survey
/// `observations` and let the bounds be aggregated from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskData {
    pub name: String,

    #[serde(default = "default_role")]
    pub role: Role,

    #[serde(default = "default_occurrence")]
    pub occurrence: OccurrenceKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_minutes: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_minutes: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,

    /// Probability in (0, 1] that the task occurs for one patient
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,

    /// Number of survey responses behind the aggregate numbers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub observations: Vec<TaskObservation>,
}

fn default_role() -> Role {
    Role::Primary
}

fn default_occurrence() -> OccurrenceKind {
    OccurrenceKind::PerAssignedPatient
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenariosData {
    #[serde(default = "default_primary_ratios")]
    pub primary_ratios: Vec<u32>,

    #[serde(default = "default_secondary_ratios")]
    pub secondary_ratios: Vec<u32>,

    #[serde(default = "default_shift_hours")]
    pub shift_hours: f64,

    /// Patient census used for headcount and cost
    #[serde(default = "default_patient_volume")]
    pub patient_volume: u32,
}

fn default_primary_ratios() -> Vec<u32> {
    vec![3, 4, 5]
}

fn default_secondary_ratios() -> Vec<u32> {
    vec![10, 12, 14]
}

fn default_shift_hours() -> f64 {
    8.0
}

fn default_patient_volume() -> u32 {
    30
}

impl Default for ScenariosData {
    fn default() -> Self {
        Self {
            primary_ratios: default_primary_ratios(),
            secondary_ratios: default_secondary_ratios(),
            shift_hours: default_shift_hours(),
            patient_volume: default_patient_volume(),
        }
    }
}

/// Run settings; mirrors the engine config with a plain fractional
/// confidence level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationData {
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// 0.90, 0.95 or 0.99
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(default = "default_min_responses")]
    pub min_responses: u32,
}

fn default_iterations() -> usize {
    1000
}

fn default_confidence_level() -> f64 {
    0.95
}

fn default_min_responses() -> u32 {
    3
}

impl Default for SimulationData {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            confidence_level: default_confidence_level(),
            seed: None,
            min_responses: default_min_responses(),
        }
    }
}

/// A ratio pair naming one scenario of the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRef {
    pub primary_ratio: u32,
    pub secondary_ratio: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityData {
    /// Scenario to sweep around; the middle of the grid when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<ScenarioRef>,

    #[serde(default = "default_primary_values")]
    pub primary_values: Vec<u32>,

    #[serde(default = "default_secondary_values")]
    pub secondary_values: Vec<u32>,
}

fn default_primary_values() -> Vec<u32> {
    vec![2, 3, 4, 5, 6]
}

fn default_secondary_values() -> Vec<u32> {
    vec![8, 10, 12, 14, 16]
}

impl Default for SensitivityData {
    fn default() -> Self {
        Self {
            baseline: None,
            primary_values: default_primary_values(),
            secondary_values: default_secondary_values(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatIfData {
    pub current: ScenarioRef,
    pub proposed: ScenarioRef,
}

impl StudyData {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    /// Starter study written by `staffsim init`
    pub fn starter() -> Self {
        let task = |name: &str, role: Role, occurrence: OccurrenceKind, min: f64, max: f64| {
            TaskData {
                name: name.to_string(),
                role,
                occurrence,
                min_minutes: Some(min),
                max_minutes: Some(max),
                std_dev: None,
                frequency: None,
                responses: None,
                observations: vec![],
            }
        };
        let per_patient = OccurrenceKind::PerAssignedPatient;
        let once = OccurrenceKind::OncePerShift;
        let with_frequency = |mut task: TaskData, frequency: f64| {
            task.frequency = Some(frequency);
            task
        };

        // Raw survey responses, aggregated at load time
        let hygiene = TaskData {
            name: "Patient Hygiene".to_string(),
            role: Role::Secondary,
            occurrence: per_patient,
            min_minutes: None,
            max_minutes: None,
            std_dev: None,
            frequency: None,
            responses: None,
            observations: vec![
                TaskObservation {
                    min_minutes: 15.0,
                    max_minutes: 30.0,
                    frequency: Some(0.6),
                },
                TaskObservation {
                    min_minutes: 20.0,
                    max_minutes: 35.0,
                    frequency: Some(0.5),
                },
                TaskObservation {
                    min_minutes: 15.0,
                    max_minutes: 25.0,
                    frequency: None,
                },
            ],
        };

        Self {
            name: "Medical-Surgical Unit".to_string(),
            description: Some("Starter study; replace the task data with survey results".into()),
            tasks: vec![
                with_frequency(
                    task("Medication Administration", Role::Primary, per_patient, 15.0, 30.0),
                    0.9,
                ),
                task("Assessment & Documentation", Role::Primary, per_patient, 20.0, 35.0),
                task("Handoff/Report", Role::Primary, once, 10.0, 20.0),
                with_frequency(
                    task("Chart Review", Role::Primary, per_patient, 10.0, 15.0),
                    0.8,
                ),
                with_frequency(
                    task("Vital Signs", Role::Secondary, per_patient, 5.0, 10.0),
                    0.9,
                ),
                hygiene,
                with_frequency(
                    task("Toileting Assistance", Role::Secondary, per_patient, 5.0, 15.0),
                    0.5,
                ),
                with_frequency(
                    task("Patient Mobility", Role::Secondary, per_patient, 10.0, 20.0),
                    0.4,
                ),
            ],
            scenarios: ScenariosData::default(),
            simulation: SimulationData::default(),
            rates: RateCard::default(),
            constraints: StaffingConstraints::default(),
            sensitivity: SensitivityData::default(),
            what_if: Some(WhatIfData {
                current: ScenarioRef {
                    primary_ratio: 4,
                    secondary_ratio: 12,
                },
                proposed: ScenarioRef {
                    primary_ratio: 3,
                    secondary_ratio: 10,
                },
            }),
        }
    }
}
