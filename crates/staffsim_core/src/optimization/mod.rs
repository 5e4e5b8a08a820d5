//! Optimal staffing search
//!
//! Filters and ranks an already-simulated [`crate::model::ScenarioGroup`]
//! against operator constraints.
//!
//! # Example
//!
//! ```ignore
//! use staffsim_core::optimization::{StaffingConstraints, find_optimal};
//!
//! let constraints = StaffingConstraints {
//!     min_completion_rate: 90.0,
//!     max_budget: 10_000.0,
//! };
//! let ranked = find_optimal(&group, &constraints)?;
//! match ranked.first() {
//!     Some(best) => println!("Best: {} (score {})", best.result.label(), best.efficiency_score),
//!     None => println!("No feasible staffing ratio found"),
//! }
//! ```

mod config;
mod result;
mod search;

pub use config::StaffingConstraints;
pub use result::RankedScenario;
pub use search::{efficiency_score, find_optimal, rank_scenarios};
