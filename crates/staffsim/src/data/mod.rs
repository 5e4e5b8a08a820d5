//! Study file data layer
//!
//! `StudyData` is the human-editable YAML form of a staffing study. It is
//! converted into core engine types by [`convert`].

pub mod convert;
pub mod study;

pub use convert::{ConvertError, StudyInputs};
pub use study::{
    ScenarioRef, ScenariosData, SensitivityData, SimulationData, StudyData, TaskData, WhatIfData,
};
