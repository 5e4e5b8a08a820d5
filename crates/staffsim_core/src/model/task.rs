//! Task profiles: per-task duration and frequency statistics
//!
//! A `TaskProfile` is validated when it is built, so the simulation loop never
//! has to re-check `min < max` or frequency bounds.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// The two staffing roles being modeled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Higher-skill role (e.g. registered nurse)
    Primary,
    /// Lower-skill role (e.g. nursing assistant)
    Secondary,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Primary, Role::Secondary];

    pub fn label(&self) -> &'static str {
        match self {
            Role::Primary => "Primary",
            Role::Secondary => "Secondary",
        }
    }
}

/// How often a task shows up in a shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceKind {
    /// Exactly once per shift regardless of patient count (handoff, chart review)
    OncePerShift,
    /// Bernoulli-sampled once for every patient assigned to the provider
    PerAssignedPatient,
}

/// Aggregate survey statistics for one care task.
///
/// Build with [`crate::config::TaskProfileBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskProfile {
    pub(crate) name: String,
    pub(crate) min_minutes: f64,
    pub(crate) max_minutes: f64,
    pub(crate) std_dev: f64,
    pub(crate) frequency: f64,
    pub(crate) role: Role,
    pub(crate) occurrence: OccurrenceKind,
    pub(crate) sample_count: Option<u32>,
}

impl TaskProfile {
    /// Validate raw statistics and build a profile.
    ///
    /// `std_dev` defaults to `(max - min) / 4` when absent.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        name: String,
        min_minutes: f64,
        max_minutes: f64,
        std_dev: Option<f64>,
        frequency: f64,
        role: Role,
        occurrence: OccurrenceKind,
        sample_count: Option<u32>,
    ) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(SimulationError::invalid_task(&name, "name must not be empty"));
        }
        if !min_minutes.is_finite() || min_minutes <= 0.0 {
            return Err(SimulationError::invalid_task(
                &name,
                format!("minimum time must be positive, got {min_minutes}"),
            ));
        }
        if !max_minutes.is_finite() || min_minutes >= max_minutes {
            return Err(SimulationError::invalid_task(
                &name,
                format!("minimum time {min_minutes} must be below maximum {max_minutes}"),
            ));
        }
        let std_dev = std_dev.unwrap_or((max_minutes - min_minutes) / 4.0);
        if !std_dev.is_finite() || std_dev < 0.0 {
            return Err(SimulationError::invalid_task(
                &name,
                format!("standard deviation must be non-negative, got {std_dev}"),
            ));
        }
        if !(frequency > 0.0 && frequency <= 1.0) {
            return Err(SimulationError::invalid_task(
                &name,
                format!("frequency must be a probability in (0, 1], got {frequency}"),
            ));
        }

        Ok(Self {
            name,
            min_minutes,
            max_minutes,
            std_dev,
            frequency,
            role,
            occurrence,
            sample_count,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_minutes(&self) -> f64 {
        self.min_minutes
    }

    pub fn max_minutes(&self) -> f64 {
        self.max_minutes
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Midpoint of the observed range, the center of every sample
    pub fn midpoint(&self) -> f64 {
        (self.min_minutes + self.max_minutes) / 2.0
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn occurrence(&self) -> OccurrenceKind {
        self.occurrence
    }

    /// Number of survey responses behind these statistics, if known
    pub fn sample_count(&self) -> Option<u32> {
        self.sample_count
    }
}

/// An immutable set of task profiles with unique names
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskProfileSet {
    profiles: Vec<TaskProfile>,
}

impl TaskProfileSet {
    /// Build a set, rejecting duplicate task names
    pub fn new(profiles: Vec<TaskProfile>) -> Result<Self> {
        let mut seen = FxHashSet::default();
        for profile in &profiles {
            if !seen.insert(profile.name.as_str()) {
                return Err(SimulationError::invalid_task(
                    &profile.name,
                    "duplicate task name",
                ));
            }
        }
        Ok(Self { profiles })
    }

    pub fn profiles(&self) -> &[TaskProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TaskProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskProfile> {
        self.profiles.iter()
    }

    /// Profiles assigned to one role
    pub fn for_role(&self, role: Role) -> impl Iterator<Item = &TaskProfile> {
        self.profiles.iter().filter(move |p| p.role == role)
    }

    /// Refuse to simulate on statistics backed by too few responses.
    ///
    /// An empty set always fails. Profiles without a recorded sample count
    /// are trusted as-is.
    pub fn ensure_sample_size(&self, min_responses: u32) -> Result<()> {
        if self.profiles.is_empty() {
            return Err(SimulationError::InsufficientData {
                task: None,
                required: 1,
                actual: 0,
            });
        }
        for profile in &self.profiles {
            if let Some(count) = profile.sample_count
                && count < min_responses
            {
                return Err(SimulationError::InsufficientData {
                    task: Some(profile.name.clone()),
                    required: min_responses,
                    actual: count,
                });
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a TaskProfileSet {
    type Item = &'a TaskProfile;
    type IntoIter = std::slice::Iter<'a, TaskProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}
