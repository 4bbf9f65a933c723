use super::{
    buffered_sat_solver::BufferedSatSolver,
    sat_solver::{SolvingListener, SolvingResult},
    Literal, SatSolver, SatSolverFactory,
};
use crate::utils::{
    process_runner::{self, ProcessOutcome},
    StopCondition,
};
use std::io::{Cursor, Read};

/// A SAT solver which execution is made by a system command.
///
/// The system command is composed by an executable program, and a potential list of CLI arguments.
///
/// The SAT solver must read from the standard input (if it does not by default, this may be possible with the right CLI arguments).
/// The input and output formats must follow the ones from the SAT competitions.
/// The process is killed when the stop condition of the solver is reached.
pub struct ExternalSatSolver {
    buffered_sat_solver: BufferedSatSolver,
}

impl ExternalSatSolver {
    /// Builds a new external SAT solver.
    ///
    /// The `program` argument is the path from a directory in execution path to the software to execute.
    /// The `options` parameter is the CLI options to provide to the software under execution.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use tcpc::sat::{ExternalSatSolver, Literal, SatSolver};
    /// # use tcpc::utils::StopCondition;
    /// let mut solver = ExternalSatSolver::new(
    ///     "/home/me/my_solver".to_string(),
    ///     vec!["-i".to_string(), "/dev/stdin".to_string()],
    ///     StopCondition::never(),
    /// );
    /// solver.add_clause(vec![Literal::from(-1), Literal::from(-2)]);
    /// solver.add_clause(vec![Literal::from(-1), Literal::from(2)]);
    /// let model = solver.solve().unwrap_model().unwrap();
    /// assert_eq!(Some(false), model.value_of(1));
    /// ```
    pub fn new(program: String, options: Vec<String>, stop_condition: StopCondition) -> Self {
        Self {
            buffered_sat_solver: BufferedSatSolver::new(Box::new(move |instance| {
                match process_runner::run_solver_process(
                    &program,
                    &options,
                    instance,
                    &stop_condition,
                ) {
                    Ok(ProcessOutcome::Finished(output)) => {
                        Some(Box::new(Cursor::new(output)) as Box<dyn Read>)
                    }
                    Ok(ProcessOutcome::Stopped) => None,
                    Err(e) => panic!("{:#}", e),
                }
            })),
        }
    }
}

impl SatSolver for ExternalSatSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        self.buffered_sat_solver.add_clause(cl)
    }

    fn solve(&mut self) -> SolvingResult {
        self.buffered_sat_solver.solve()
    }

    fn solve_under_assumptions(&mut self, assumptions: &[Literal]) -> SolvingResult {
        self.buffered_sat_solver
            .solve_under_assumptions(assumptions)
    }

    fn n_vars(&self) -> usize {
        self.buffered_sat_solver.n_vars()
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.buffered_sat_solver.add_listener(listener);
    }

    fn reserve(&mut self, new_max_id: usize) {
        self.buffered_sat_solver.reserve(new_max_id)
    }
}

/// A factory building [ExternalSatSolver] instances sharing the same command.
#[derive(Debug, Clone)]
pub struct ExternalSatSolverFactory {
    program: String,
    options: Vec<String>,
}

impl ExternalSatSolverFactory {
    /// Builds a new factory given the program to execute and its options.
    pub fn new(program: String, options: Vec<String>) -> Self {
        Self { program, options }
    }
}

impl SatSolverFactory for ExternalSatSolverFactory {
    fn new_solver(&self, stop_condition: StopCondition) -> Box<dyn SatSolver> {
        Box::new(ExternalSatSolver::new(
            self.program.clone(),
            self.options.clone(),
            stop_condition,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause;
    use std::time::Duration;

    fn get_echo_command(content: &str) -> Option<(String, Vec<String>)> {
        if cfg!(target_family = "unix") {
            Some(("echo".to_string(), vec![content.to_string()]))
        } else {
            None
        }
    }

    #[test]
    fn test_solve_output() {
        let (program, options) = match get_echo_command("s SATISFIABLE\nv 1 -2 0\n") {
            Some(cmd) => cmd,
            None => return,
        };
        let mut s = ExternalSatSolver::new(program, options, StopCondition::never());
        s.add_clause(clause![1, 2]);
        let model = s.solve().unwrap_model().unwrap();
        assert_eq!(Some(true), model.value_of(1));
        assert_eq!(Some(false), model.value_of(2));
        assert_eq!(2, s.n_vars());
    }

    #[test]
    fn test_factory_under_assumptions() {
        let (program, options) = match get_echo_command("s UNSATISFIABLE\n") {
            Some(cmd) => cmd,
            None => return,
        };
        let factory = ExternalSatSolverFactory::new(program, options);
        let mut s = factory.new_solver(StopCondition::never());
        s.add_clause(clause![1, 2]);
        let model = s
            .solve_under_assumptions(&[Literal::from(-1), Literal::from(-2)])
            .unwrap_model();
        assert!(model.is_none());
    }

    #[test]
    fn test_stopped_process() {
        if !cfg!(target_family = "unix") {
            return;
        }
        let mut s = ExternalSatSolver::new(
            "sleep".to_string(),
            vec!["30".to_string()],
            StopCondition::with_timeout(Duration::from_millis(100)),
        );
        s.add_clause(clause![1]);
        assert_eq!(SolvingResult::Unknown, s.solve());
    }
}
