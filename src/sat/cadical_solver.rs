use super::{
    sat_solver::{SolvingListener, SolvingResult},
    Assignment, Literal, SatSolver,
};
use crate::utils::StopCondition;
use cadical::{Callbacks, Solver as CadicalCSolver};

// Asks CaDiCaL to terminate as soon as the stop condition is reached.
struct StopConditionCallbacks {
    stop_condition: StopCondition,
}

impl Callbacks for StopConditionCallbacks {
    fn terminate(&mut self) -> bool {
        self.stop_condition.is_stopped()
    }
}

/// A wrapper around the CaDiCaL SAT solver.
///
/// The solver is interrupted natively when its stop condition is reached;
/// the interrupted call returns [SolvingResult::Unknown].
pub struct CadicalSolver {
    solver: CadicalCSolver<StopConditionCallbacks>,
    listeners: Vec<Box<dyn SolvingListener>>,
    n_vars: usize,
    n_clauses: usize,
}

impl CadicalSolver {
    /// Builds a new CaDiCaL solver bound to a stop condition.
    pub fn new_with_stop_condition(stop_condition: StopCondition) -> Self {
        let mut solver = CadicalCSolver::new();
        solver.set_callbacks(Some(StopConditionCallbacks { stop_condition }));
        Self {
            solver,
            listeners: vec![],
            n_vars: 0,
            n_clauses: 0,
        }
    }
}

impl Default for CadicalSolver {
    fn default() -> Self {
        Self::new_with_stop_condition(StopCondition::never())
    }
}

impl SatSolver for CadicalSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        cl.iter()
            .for_each(|l| self.n_vars = usize::max(self.n_vars, usize::from(l.var())));
        self.solver
            .add_clause(cl.into_iter().map(|l| isize::from(l) as i32));
        self.n_clauses += 1;
    }

    fn solve(&mut self) -> SolvingResult {
        self.solve_under_assumptions(&[])
    }

    fn solve_under_assumptions(&mut self, assumptions: &[Literal]) -> SolvingResult {
        self.listeners
            .iter()
            .for_each(|l| l.solving_start(self.n_vars, self.n_clauses));
        let solving_result = match self
            .solver
            .solve_with(assumptions.iter().map(|l| isize::from(*l) as i32))
        {
            Some(true) => {
                let max_solver_var = self.solver.max_variable() as usize;
                let assignment = Assignment::new(
                    (1..=self.n_vars)
                        .map(|i| {
                            if i <= max_solver_var {
                                self.solver.value(i as i32)
                            } else {
                                None
                            }
                        })
                        .collect(),
                );
                SolvingResult::Satisfiable(assignment)
            }
            Some(false) => SolvingResult::Unsatisfiable,
            None => SolvingResult::Unknown,
        };
        self.listeners
            .iter()
            .for_each(|l| l.solving_end(&solving_result));
        solving_result
    }

    fn n_vars(&self) -> usize {
        self.n_vars
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.listeners.push(listener);
    }

    fn reserve(&mut self, new_max_id: usize) {
        self.n_vars = usize::max(self.n_vars, new_max_id);
    }
}
