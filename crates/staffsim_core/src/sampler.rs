//! Task time sampler
//!
//! Draws a bounded, roughly symmetric perturbation around the midpoint of a
//! task's observed range. Samples never leave `[min, max]`.

use rand::Rng;
use rand_distr::{Bernoulli, Distribution};

use crate::error::{Result, SimulationError};
use crate::model::{OccurrenceKind, Role, TaskProfile};

/// One duration sample, in minutes.
///
/// `midpoint + (U - 0.5) * 2 * std_dev` with `U ~ [0, 1)`, clamped to the
/// observed range.
pub fn sample_duration<R: Rng + ?Sized>(profile: &TaskProfile, rng: &mut R) -> f64 {
    let u: f64 = rng.random();
    let raw = profile.midpoint() + (u - 0.5) * 2.0 * profile.std_dev();
    raw.clamp(profile.min_minutes(), profile.max_minutes())
}

/// A task profile paired with its precomputed occurrence distribution
#[derive(Debug, Clone)]
pub struct TaskSampler<'a> {
    profile: &'a TaskProfile,
    occurrence: Bernoulli,
}

impl<'a> TaskSampler<'a> {
    pub fn new(profile: &'a TaskProfile) -> Result<Self> {
        let occurrence = Bernoulli::new(profile.frequency())
            .map_err(|e| SimulationError::invalid_task(profile.name(), e.to_string()))?;
        Ok(Self {
            profile,
            occurrence,
        })
    }

    pub fn profile(&self) -> &TaskProfile {
        self.profile
    }

    pub fn role(&self) -> Role {
        self.profile.role()
    }

    pub fn kind(&self) -> OccurrenceKind {
        self.profile.occurrence()
    }

    pub fn sample_duration<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        sample_duration(self.profile, rng)
    }

    /// Bernoulli trial: does the task happen for one patient?
    pub fn occurs<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        self.occurrence.sample(rng)
    }
}
