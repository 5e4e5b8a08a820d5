//! Simulation configuration
//!
//! `SimulationConfig` carries everything besides the scenario and task data
//! that a run needs: iteration count, confidence level, seed, the minimum
//! number of survey responses per task, and optional labor rates for cost
//! annotation.
//!
//! ```ignore
//! use staffsim_core::config::{ConfidenceLevel, RateCard, SimulationConfig};
//!
//! let config = SimulationConfig::default()
//!     .iterations(5_000)
//!     .confidence(ConfidenceLevel::P99)
//!     .seed(42)
//!     .rates(RateCard::default());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

pub mod builder;

pub use builder::{TaskObservation, TaskProfileBuilder};

/// Supported two-sided confidence levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum ConfidenceLevel {
    P90,
    #[default]
    P95,
    P99,
}

impl ConfidenceLevel {
    /// Map a fraction (0.90, 0.95, 0.99) to a level.
    ///
    /// Anything else is rejected rather than silently falling back to 95%.
    pub fn from_fraction(level: f64) -> Result<Self> {
        const TOLERANCE: f64 = 1e-9;
        [Self::P90, Self::P95, Self::P99]
            .into_iter()
            .find(|l| (l.fraction() - level).abs() < TOLERANCE)
            .ok_or_else(|| {
                SimulationError::invalid(
                    "confidenceLevel",
                    format!("unsupported level {level}, expected 0.90, 0.95 or 0.99"),
                )
            })
    }

    pub fn fraction(&self) -> f64 {
        match self {
            Self::P90 => 0.90,
            Self::P95 => 0.95,
            Self::P99 => 0.99,
        }
    }

    /// Two-sided normal critical value
    pub fn z_value(&self) -> f64 {
        match self {
            Self::P90 => 1.65,
            Self::P95 => 1.96,
            Self::P99 => 2.58,
        }
    }
}

impl TryFrom<f64> for ConfidenceLevel {
    type Error = SimulationError;

    fn try_from(level: f64) -> Result<Self> {
        Self::from_fraction(level)
    }
}

impl From<ConfidenceLevel> for f64 {
    fn from(level: ConfidenceLevel) -> Self {
        level.fraction()
    }
}

/// Hourly labor rates per role plus an overhead multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateCard {
    pub primary_hourly_rate: f64,
    pub secondary_hourly_rate: f64,
    #[serde(default = "default_overhead_multiplier")]
    pub overhead_multiplier: f64,
}

fn default_overhead_multiplier() -> f64 {
    1.3
}

impl Default for RateCard {
    fn default() -> Self {
        Self {
            primary_hourly_rate: 45.0,
            secondary_hourly_rate: 22.0,
            overhead_multiplier: default_overhead_multiplier(),
        }
    }
}

/// Run-level settings for [`crate::simulation::simulate`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Monte Carlo iterations per scenario
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    #[serde(default)]
    pub confidence_level: ConfidenceLevel,

    /// Base seed; `None` draws a fresh one per run
    #[serde(default)]
    pub seed: Option<u64>,

    /// Minimum survey responses behind each task profile
    #[serde(default = "default_min_responses")]
    pub min_responses: u32,

    /// When set, results are annotated with headcount and labor cost
    #[serde(default)]
    pub rates: Option<RateCard>,
}

fn default_iterations() -> usize {
    1000
}

fn default_min_responses() -> u32 {
    3
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            confidence_level: ConfidenceLevel::default(),
            seed: None,
            min_responses: default_min_responses(),
            rates: None,
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub fn confidence(mut self, level: ConfidenceLevel) -> Self {
        self.confidence_level = level;
        self
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn min_responses(mut self, min_responses: u32) -> Self {
        self.min_responses = min_responses;
        self
    }

    #[must_use]
    pub fn rates(mut self, rates: RateCard) -> Self {
        self.rates = Some(rates);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations < 1 {
            return Err(SimulationError::invalid(
                "iterations",
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// The configured seed, or a fresh one from the thread RNG
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}
