use crate::{model::Model, sat::Assignment, utils::StopCondition};
use anyhow::Result;
use std::fmt::Display;

/// The status of an optimization engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    /// The assignment is optimal.
    Optimal,
    /// An assignment was found, but its optimality was not proved.
    Feasible,
    /// The hard constraints are unsatisfiable.
    Unsatisfiable,
    /// The engine stopped without finding an assignment.
    Unknown,
}

impl Display for EngineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineStatus::Optimal => write!(f, "OPTIMUM FOUND"),
            EngineStatus::Feasible => write!(f, "SATISFIABLE"),
            EngineStatus::Unsatisfiable => write!(f, "UNSATISFIABLE"),
            EngineStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// The result of an optimization engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineResult {
    status: EngineStatus,
    assignment: Option<Assignment>,
    reported_cost: Option<u64>,
}

impl EngineResult {
    /// Builds a result holding an assignment and the cost the engine reports for it.
    ///
    /// The status must be [EngineStatus::Optimal] or [EngineStatus::Feasible].
    pub fn with_assignment(status: EngineStatus, assignment: Assignment, reported_cost: Option<u64>) -> Self {
        debug_assert!(matches!(status, EngineStatus::Optimal | EngineStatus::Feasible));
        Self {
            status,
            assignment: Some(assignment),
            reported_cost,
        }
    }

    /// Builds a result with no assignment.
    pub fn without_assignment(status: EngineStatus) -> Self {
        Self {
            status,
            assignment: None,
            reported_cost: None,
        }
    }

    /// Returns the status.
    pub fn status(&self) -> EngineStatus {
        self.status
    }

    /// Returns the assignment, if any.
    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }

    /// Returns the cost reported by the engine, in the unit of the soft literal weights.
    pub fn reported_cost(&self) -> Option<u64> {
        self.reported_cost
    }
}

/// A trait for engines optimizing the objective of a model under its hard constraints.
///
/// The objective is given by the soft literals of the model ([Objective::soft_literals](crate::encodings::Objective::soft_literals)):
/// engines minimize the sum of the weights of the falsified ones.
pub trait OptimizationEngine {
    /// Optimizes the model until optimality is proved or the stop condition is reached.
    fn optimize(&mut self, model: &Model, stop_condition: &StopCondition) -> Result<EngineResult>;
}
