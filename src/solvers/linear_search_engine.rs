use super::specs::{EngineResult, EngineStatus, OptimizationEngine};
use crate::{
    encodings::{CardinalityEncoding, CnfFormula, GeneralizedTotalizer, SoftLiteral},
    model::Model,
    sat::{Assignment, DefaultSatSolverFactory, SatSolverFactory, SolvingResult},
    utils::StopCondition,
};
use anyhow::Result;
use log::{debug, info};

/// A SAT-UNSAT linear search optimizing a model with a SAT solver.
///
/// The hard clauses are given to the SAT solver, and each model found gives an upper bound on the cost.
/// A generalized totalizer over the falsified soft literals is then used to ask for a strictly cheaper model,
/// until the solver proves that none exists.
/// If the stop condition is reached in between, the best model found so far is returned as a feasible one.
pub struct LinearSearchEngine {
    solver_factory: Box<dyn SatSolverFactory>,
    cardinality_encoding: CardinalityEncoding,
}

impl LinearSearchEngine {
    /// Builds a new engine.
    ///
    /// The underlying SAT solver is the one built by [DefaultSatSolverFactory].
    pub fn new() -> Self {
        Self::new_with_sat_solver_factory(Box::new(DefaultSatSolverFactory))
    }

    /// Builds a new engine.
    ///
    /// The SAT solver to use in given through the solver factory.
    pub fn new_with_sat_solver_factory(solver_factory: Box<dyn SatSolverFactory>) -> Self {
        Self {
            solver_factory,
            cardinality_encoding: CardinalityEncoding::default(),
        }
    }

    /// Sets the encoding used to lower the cardinality constraints of the model.
    pub fn set_cardinality_encoding(&mut self, cardinality_encoding: CardinalityEncoding) {
        self.cardinality_encoding = cardinality_encoding;
    }
}

impl Default for LinearSearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn cost_of(soft_literals: &[SoftLiteral], assignment: &Assignment) -> u64 {
    soft_literals
        .iter()
        .filter(|s| !assignment.satisfies(s.lit()))
        .map(|s| s.weight())
        .sum()
}

impl OptimizationEngine for LinearSearchEngine {
    fn optimize(&mut self, model: &Model, stop_condition: &StopCondition) -> Result<EngineResult> {
        let hard_clauses = model.hard_clauses(self.cardinality_encoding);
        let soft_literals = model.objective().soft_literals();
        info!(
            "linear search over {} hard clauses, {} variables and {} soft literals",
            hard_clauses.n_clauses(),
            hard_clauses.n_vars(),
            soft_literals.len()
        );
        let mut solver = self.solver_factory.new_solver(stop_condition.clone());
        hard_clauses.load_into(solver.as_mut());
        let mut best = match solver.solve() {
            SolvingResult::Satisfiable(assignment) => assignment,
            SolvingResult::Unsatisfiable => {
                return Ok(EngineResult::without_assignment(EngineStatus::Unsatisfiable))
            }
            SolvingResult::Unknown => {
                return Ok(EngineResult::without_assignment(EngineStatus::Unknown))
            }
        };
        let mut best_cost = cost_of(&soft_literals, &best);
        info!("first model has cost {}", best_cost);
        if best_cost == 0 {
            return Ok(EngineResult::with_assignment(
                EngineStatus::Optimal,
                best,
                Some(0),
            ));
        }
        let mut totalizer_clauses = CnfFormula::new(solver.n_vars());
        let inputs = soft_literals
            .iter()
            .map(|s| (s.lit().negate(), s.weight()))
            .collect::<Vec<_>>();
        let totalizer = GeneralizedTotalizer::new(&inputs, best_cost, &mut totalizer_clauses);
        debug!(
            "totalizer added {} clauses and {} variables",
            totalizer_clauses.n_clauses(),
            totalizer_clauses.n_vars() - solver.n_vars()
        );
        totalizer_clauses.load_into(solver.as_mut());
        loop {
            if stop_condition.is_stopped() {
                info!("stop condition reached; the best cost found is {}", best_cost);
                return Ok(EngineResult::with_assignment(
                    EngineStatus::Feasible,
                    best,
                    Some(best_cost),
                ));
            }
            totalizer
                .lits_to_block(best_cost)
                .into_iter()
                .for_each(|l| solver.add_clause(vec![l]));
            match solver.solve() {
                SolvingResult::Satisfiable(assignment) => {
                    best_cost = cost_of(&soft_literals, &assignment);
                    best = assignment;
                    info!("found a model with cost {}", best_cost);
                    if best_cost == 0 {
                        return Ok(EngineResult::with_assignment(
                            EngineStatus::Optimal,
                            best,
                            Some(0),
                        ));
                    }
                }
                SolvingResult::Unsatisfiable => {
                    info!("no model with a cost lower than {}", best_cost);
                    return Ok(EngineResult::with_assignment(
                        EngineStatus::Optimal,
                        best,
                        Some(best_cost),
                    ));
                }
                SolvingResult::Unknown => {
                    return Ok(EngineResult::with_assignment(
                        EngineStatus::Feasible,
                        best,
                        Some(best_cost),
                    ))
                }
            }
        }
    }
}
