//! Post-simulation analyses.
//!
//! - [`run_sensitivity`] re-simulates a baseline while sweeping one ratio
//! - [`compare_what_if`] diffs two already-simulated scenarios metric by metric
//!
//! ```ignore
//! use staffsim_core::analysis::{compare_what_if, run_sensitivity};
//! use staffsim_core::model::{RatioParameter, ScenarioKey};
//!
//! let group = simulate_grid(&grid, &profiles, &config, None)?;
//! let baseline = group.require(&ScenarioKey::new(4, 12, 8.0))?;
//!
//! let sweep = run_sensitivity(
//!     baseline,
//!     RatioParameter::PrimaryRatio,
//!     &[2, 3, 4, 5, 6],
//!     &profiles,
//!     &config,
//!     None,
//! )?;
//!
//! let impact = compare_what_if(
//!     &group,
//!     &ScenarioKey::new(4, 12, 8.0),
//!     &ScenarioKey::new(3, 10, 8.0),
//! )?;
//! ```

mod sensitivity;
mod what_if;

pub use sensitivity::*;
pub use what_if::*;

/// `(new - base) / base * 100`, undefined when `base` is zero
pub fn relative_change(base: f64, new: f64) -> Option<f64> {
    if base == 0.0 {
        None
    } else {
        Some((new - base) / base * 100.0)
    }
}
