//! Shared fixtures for the integration tests

use crate::config::{RateCard, SimulationConfig, TaskProfileBuilder};
use crate::model::{ScenarioGrid, ScenarioGroup, TaskProfileSet};
use crate::simulation::simulate_grid;

/// The single vital-signs task used by the concrete scenario
pub fn vital_signs() -> TaskProfileSet {
    TaskProfileSet::new(vec![
        TaskProfileBuilder::per_patient("VitalSigns")
            .secondary()
            .range(5.0, 10.0)
            .std_dev(1.0)
            .frequency(0.9)
            .build()
            .unwrap(),
    ])
    .unwrap()
}

/// Every sample exceeds an 8 hour shift on its own
pub fn overloaded() -> TaskProfileSet {
    TaskProfileSet::new(vec![
        TaskProfileBuilder::once_per_shift("Double Census Charting")
            .range(500.0, 600.0)
            .build()
            .unwrap(),
    ])
    .unwrap()
}

/// One task whose samples are uniform on `[440, 520]`, so an 8 hour shift
/// completes about half the time
pub fn coin_flip() -> TaskProfileSet {
    TaskProfileSet::new(vec![
        TaskProfileBuilder::once_per_shift("Unit Inventory")
            .range(400.0, 560.0)
            .build()
            .unwrap(),
    ])
    .unwrap()
}

/// A mixed unit whose workload straddles an 8 hour shift across the grid
pub fn med_surg_unit() -> TaskProfileSet {
    TaskProfileSet::new(vec![
        TaskProfileBuilder::per_patient("Assessment")
            .range(40.0, 80.0)
            .responses(12)
            .build()
            .unwrap(),
        TaskProfileBuilder::per_patient("Medication Pass")
            .range(20.0, 40.0)
            .frequency(0.9)
            .responses(12)
            .build()
            .unwrap(),
        TaskProfileBuilder::once_per_shift("Shift Handoff")
            .range(20.0, 40.0)
            .responses(9)
            .build()
            .unwrap(),
        TaskProfileBuilder::per_patient("Bathing")
            .secondary()
            .range(20.0, 40.0)
            .frequency(0.7)
            .responses(8)
            .build()
            .unwrap(),
        TaskProfileBuilder::per_patient("Vital Signs")
            .secondary()
            .range(5.0, 10.0)
            .std_dev(1.0)
            .frequency(0.9)
            .responses(14)
            .build()
            .unwrap(),
        TaskProfileBuilder::per_patient("Ambulation")
            .secondary()
            .range(10.0, 20.0)
            .frequency(0.6)
            .responses(5)
            .build()
            .unwrap(),
    ])
    .unwrap()
}

pub fn default_grid() -> ScenarioGrid {
    ScenarioGrid {
        primary_ratios: vec![3, 4, 5],
        secondary_ratios: vec![10, 12, 14],
        shift_hours: 8.0,
        patient_volume: Some(30),
    }
}

pub fn costed_config(seed: u64) -> SimulationConfig {
    SimulationConfig::default()
        .iterations(500)
        .seed(seed)
        .rates(RateCard::default())
}

pub fn simulated_grid(seed: u64) -> ScenarioGroup {
    simulate_grid(&default_grid(), &med_surg_unit(), &costed_config(seed), None).unwrap()
}
