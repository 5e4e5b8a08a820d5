mod results;
mod scenario;
mod task;

pub use results::{
    CostBreakdown, RiskLevel, SampleCoverage, ScenarioGroup, SimulationResult, WorkloadSummary,
};
pub use scenario::{
    Headcount, RatioParameter, ScenarioGrid, ScenarioKey, StaffingScenario, headcount_for,
};
pub use task::{OccurrenceKind, Role, TaskProfile, TaskProfileSet};
