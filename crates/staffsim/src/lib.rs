//! Command-line driver for the staffing simulation engine
//!
//! Loads a YAML study file, runs the scenario grid and the follow-up analyses
//! through `staffsim_core`, logs to the data directory, and renders a
//! plain-text report.

pub mod data;
pub mod logging;
pub mod report;
pub mod runner;
pub mod util;

pub use logging::init_logging;
pub use report::{StudyReport, render_report};
pub use runner::{RunOptions, StudyOutcome, run_study};
