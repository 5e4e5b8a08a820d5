use std::fmt;

use crate::model::ScenarioKey;

/// Errors returned by every engine operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A caller-supplied number is out of range (ratio, shift length, rate,
    /// iteration count, confidence level, constraint).
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
    /// A task profile violates its invariants (`min >= max`, frequency
    /// outside `(0, 1]`, duplicate name, ...).
    InvalidTaskProfile { task: String, reason: String },
    /// A scenario referenced by key is missing from the supplied group
    NotFound(ScenarioKey),
    /// Too few underlying survey responses to trust the statistics
    InsufficientData {
        task: Option<String>,
        required: u32,
        actual: u32,
    },
    /// The run was cancelled or timed out before any iteration completed
    Cancelled,
}

impl SimulationError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        SimulationError::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_task(task: &str, reason: impl Into<String>) -> Self {
        SimulationError::InvalidTaskProfile {
            task: task.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::InvalidParameter { parameter, reason } => {
                write!(f, "invalid parameter `{parameter}`: {reason}")
            }
            SimulationError::InvalidTaskProfile { task, reason } => {
                write!(f, "invalid task profile {task:?}: {reason}")
            }
            SimulationError::NotFound(key) => write!(f, "scenario {key} not found"),
            SimulationError::InsufficientData {
                task: Some(task),
                required,
                actual,
            } => write!(
                f,
                "insufficient data for task {task:?}: {actual} responses, need at least {required}"
            ),
            SimulationError::InsufficientData {
                task: None,
                required,
                actual,
            } => write!(
                f,
                "insufficient data: {actual} task profiles, need at least {required}"
            ),
            SimulationError::Cancelled => write!(f, "simulation cancelled"),
        }
    }
}

impl std::error::Error for SimulationError {}

pub type Result<T> = std::result::Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SimulationError::invalid("iterations", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid parameter `iterations`: must be at least 1"
        );

        let err = SimulationError::InsufficientData {
            task: Some("Vital Signs".to_string()),
            required: 3,
            actual: 1,
        };
        assert!(err.to_string().contains("Vital Signs"));
        assert!(err.to_string().contains("need at least 3"));

        let err = SimulationError::NotFound(ScenarioKey::new(4, 12, 8.0));
        assert_eq!(err.to_string(), "scenario Primary 1:4 | Secondary 1:12 (8h) not found");
    }
}
