//! Task Profile Builder
//!
//! Fluent construction of validated [`TaskProfile`]s, either from aggregate
//! statistics the caller already has or from raw per-response observations.
//!
//! ```ignore
//! use staffsim_core::config::TaskProfileBuilder;
//!
//! let vitals = TaskProfileBuilder::per_patient("Vital Signs")
//!     .secondary()
//!     .range(5.0, 10.0)
//!     .std_dev(1.0)
//!     .frequency(0.9)
//!     .responses(14)
//!     .build()?;
//!
//! let handoff = TaskProfileBuilder::once_per_shift("Shift Handoff")
//!     .range(15.0, 30.0)
//!     .build()?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::model::{OccurrenceKind, Role, TaskProfile};

/// Frequency assumed when no response reported one
const DEFAULT_FREQUENCY: f64 = 0.5;

/// One survey response for a task
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskObservation {
    pub min_minutes: f64,
    pub max_minutes: f64,
    /// Reported probability that the task occurs for a patient
    #[serde(default)]
    pub frequency: Option<f64>,
}

/// Builder for a single task profile
#[derive(Debug, Clone)]
pub struct TaskProfileBuilder {
    name: String,
    min_minutes: f64,
    max_minutes: f64,
    std_dev: Option<f64>,
    frequency: f64,
    role: Role,
    occurrence: OccurrenceKind,
    sample_count: Option<u32>,
}

impl TaskProfileBuilder {
    fn new(name: impl Into<String>, occurrence: OccurrenceKind) -> Self {
        Self {
            name: name.into(),
            min_minutes: 0.0,
            max_minutes: 0.0,
            std_dev: None,
            frequency: 1.0,
            role: Role::Primary,
            occurrence,
            sample_count: None,
        }
    }

    /// A task sampled independently for every assigned patient
    #[must_use]
    pub fn per_patient(name: impl Into<String>) -> Self {
        Self::new(name, OccurrenceKind::PerAssignedPatient)
    }

    /// A task done exactly once per shift
    #[must_use]
    pub fn once_per_shift(name: impl Into<String>) -> Self {
        Self::new(name, OccurrenceKind::OncePerShift)
    }

    /// Aggregate raw survey responses into a builder.
    ///
    /// Bounds are the mean reported minimum and maximum, the standard
    /// deviation is taken across response midpoints (two or more responses),
    /// and frequency is the mean reported frequency, 0.5 when none was given.
    pub fn from_observations(
        name: impl Into<String>,
        role: Role,
        occurrence: OccurrenceKind,
        observations: &[TaskObservation],
    ) -> Result<Self> {
        let name = name.into();
        if observations.is_empty() {
            return Err(SimulationError::InsufficientData {
                task: Some(name),
                required: 1,
                actual: 0,
            });
        }

        let n = observations.len() as f64;
        let min_minutes = observations.iter().map(|o| o.min_minutes).sum::<f64>() / n;
        let max_minutes = observations.iter().map(|o| o.max_minutes).sum::<f64>() / n;

        let std_dev = (observations.len() > 1).then(|| {
            let midpoints = observations
                .iter()
                .map(|o| (o.min_minutes + o.max_minutes) / 2.0);
            let mean = midpoints.clone().sum::<f64>() / n;
            let variance = midpoints.map(|m| (m - mean).powi(2)).sum::<f64>() / (n - 1.0);
            variance.sqrt()
        });

        let frequencies: Vec<f64> = observations.iter().filter_map(|o| o.frequency).collect();
        let frequency = if frequencies.is_empty() {
            DEFAULT_FREQUENCY
        } else {
            frequencies.iter().sum::<f64>() / frequencies.len() as f64
        };

        Ok(Self {
            name,
            min_minutes,
            max_minutes,
            std_dev,
            frequency,
            role,
            occurrence,
            sample_count: Some(observations.len() as u32),
        })
    }

    /// Observed duration bounds in minutes
    #[must_use]
    pub fn range(mut self, min_minutes: f64, max_minutes: f64) -> Self {
        self.min_minutes = min_minutes;
        self.max_minutes = max_minutes;
        self
    }

    #[must_use]
    pub fn std_dev(mut self, std_dev: f64) -> Self {
        self.std_dev = Some(std_dev);
        self
    }

    #[must_use]
    pub fn frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn primary(self) -> Self {
        self.role(Role::Primary)
    }

    #[must_use]
    pub fn secondary(self) -> Self {
        self.role(Role::Secondary)
    }

    /// Number of survey responses behind the statistics
    #[must_use]
    pub fn responses(mut self, count: u32) -> Self {
        self.sample_count = Some(count);
        self
    }

    pub fn build(self) -> Result<TaskProfile> {
        TaskProfile::new(
            self.name,
            self.min_minutes,
            self.max_minutes,
            self.std_dev,
            self.frequency,
            self.role,
            self.occurrence,
            self.sample_count,
        )
    }
}
