use super::specs::{EngineResult, EngineStatus};
use crate::{
    encodings::CardinalityEncoding,
    model::{Model, Symbol, Weight},
    sat::{DefaultSatSolverFactory, SatSolverFactory, SolvingResult},
    utils::StopCondition,
};
use anyhow::Result;
use log::info;

/// A solver looking for a perfect seating, in which every table reaches its highest weight.
///
/// A perfect seating puts the members of each 2-seat table in each other's preferences,
/// and gives each member of a 3-seat table both other members as preferences.
/// Tables that are not perfect are forbidden by unit clauses, and a single SAT check decides whether such a seating exists.
pub struct PerfectSeatingSolver {
    solver_factory: Box<dyn SatSolverFactory>,
    cardinality_encoding: CardinalityEncoding,
}

impl PerfectSeatingSolver {
    /// Builds a new solver using the SAT solver given by [DefaultSatSolverFactory].
    pub fn new() -> Self {
        Self::new_with_sat_solver_factory(Box::new(DefaultSatSolverFactory))
    }

    /// Builds a new solver using the SAT solvers built by the given factory.
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

    /// Searches for a perfect seating.
    ///
    /// The status is [EngineStatus::Optimal] if one is found, [EngineStatus::Unsatisfiable] if none exists,
    /// and [EngineStatus::Unknown] if the stop condition was reached before the answer.
    pub fn search(&mut self, model: &Model, stop_condition: &StopCondition) -> Result<EngineResult> {
        let indexer = model.indexer();
        let weights = model.weights();
        let mut solver = self.solver_factory.new_solver(stop_condition.clone());
        model
            .hard_clauses(self.cardinality_encoding)
            .load_into(solver.as_mut());
        let mut n_forbidden = 0;
        for (var, weight) in weights.iter() {
            let max = match indexer.symbol_of(var) {
                Some(Symbol::Pair(_, _)) => Weight::PAIR_MAX,
                _ => Weight::TRIPLE_MAX,
            };
            if weight != max {
                solver.add_clause(vec![var.negative()]);
                n_forbidden += 1;
            }
        }
        info!(
            "{} tables out of {} are not perfect",
            n_forbidden,
            indexer.n_pairs() + indexer.n_triples()
        );
        Ok(match solver.solve() {
            SolvingResult::Satisfiable(assignment) => {
                EngineResult::with_assignment(EngineStatus::Optimal, assignment, None)
            }
            SolvingResult::Unsatisfiable => EngineResult::without_assignment(EngineStatus::Unsatisfiable),
            SolvingResult::Unknown => EngineResult::without_assignment(EngineStatus::Unknown),
        })
    }
}

impl Default for PerfectSeatingSolver {
    fn default() -> Self {
        Self::new()
    }
}
