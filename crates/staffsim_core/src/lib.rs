//! Staffing simulation library
//!
//! This crate provides a Monte Carlo engine that estimates, for candidate
//! patient-to-provider ratios, how often two care roles finish all of their
//! work within a shift. It supports:
//! - Task profiles built from aggregate or raw survey statistics
//! - Once-per-shift and per-assigned-patient occurrence rules
//! - Completion rate, normal-approximation confidence intervals, and risk scores
//! - Headcount and labor cost estimates per scenario
//! - Sensitivity sweeps, what-if comparisons, and optimal ratio search
//!
//! # Example
//!
//! ```ignore
//! use staffsim_core::config::{SimulationConfig, TaskProfileBuilder};
//! use staffsim_core::model::{StaffingScenario, TaskProfileSet};
//! use staffsim_core::simulation::simulate;
//!
//! let profiles = TaskProfileSet::new(vec![
//!     TaskProfileBuilder::per_patient("Vital Signs")
//!         .secondary()
//!         .range(5.0, 10.0)
//!         .std_dev(1.0)
//!         .frequency(0.9)
//!         .build()?,
//! ])?;
//!
//! let scenario = StaffingScenario::new(4, 10, 8.0)?;
//! let config = SimulationConfig::default().min_responses(0).seed(42);
//! let result = simulate(&scenario, &profiles, &config)?;
//! println!("{}: {:.1}%", result.label(), result.completion_rate);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod analysis;
pub mod cost;
pub mod error;
pub mod optimization;
pub mod progress;
pub mod sampler;
pub mod simulation;
pub mod stats;
pub mod workload;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{ConfidenceLevel, RateCard, SimulationConfig, TaskProfileBuilder};
pub use error::{Result, SimulationError};
pub use progress::SimulationProgress;
pub use simulation::{simulate, simulate_grid, simulate_scenarios, simulate_with_progress};
