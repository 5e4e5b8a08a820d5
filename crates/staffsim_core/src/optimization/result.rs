//! Ranked search output

use serde::Serialize;

use crate::model::SimulationResult;

/// A simulated scenario annotated for ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedScenario {
    pub result: SimulationResult,
    /// `round(completion_rate / total_cost * 1000)`
    pub efficiency_score: i64,
    pub meets_requirements: bool,
}
