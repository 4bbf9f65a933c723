use super::{
    sat_solver::{SolvingListener, SolvingResult},
    Assignment, Literal, SatSolver,
};
use std::io::{BufRead, BufReader, Chain, Cursor, Read};

/// The function a [BufferedSatSolver] delegates its calls to.
///
/// It receives the DIMACS instance and returns the SAT-competition formatted output of a solver,
/// or [Option::None] if the solver was interrupted before giving an answer.
pub type SolvingFn = dyn Fn(DimacsInstanceRead) -> Option<Box<dyn Read>>;

/// A reader over a DIMACS instance: preamble, buffered clauses, then assumptions as unit clauses.
pub struct DimacsInstanceRead(Chain<Chain<Cursor<String>, Cursor<String>>, Cursor<String>>);

impl Read for DimacsInstanceRead {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.0.read(buf)
    }
}

const DEFAULT_BUFFER_CAP: usize = 1 << 20;

const OUTPUT_CONTEXT: &str = "error while reading solving function output in BufferedSatSolver";

/// A SAT solver that buffers its clauses as DIMACS text and hands them to a [SolvingFn] at each call.
///
/// This is the basis of the solvers running as external processes.
/// Malformed outputs make this solver panic; an interrupted or incomplete output gives [SolvingResult::Unknown].
pub struct BufferedSatSolver {
    n_vars: usize,
    n_clauses: usize,
    clauses: String,
    solving_fn: Box<SolvingFn>,
    listeners: Vec<Box<dyn SolvingListener>>,
}

impl BufferedSatSolver {
    /// Builds a new buffered solver given the function in charge of the calls.
    pub fn new(solving_fn: Box<SolvingFn>) -> Self {
        Self {
            n_vars: 0,
            n_clauses: 0,
            clauses: String::with_capacity(DEFAULT_BUFFER_CAP),
            solving_fn,
            listeners: Vec::new(),
        }
    }

    fn instance_reader(&self, assumptions: &[Literal]) -> DimacsInstanceRead {
        let preamble = format!(
            "p cnf {} {}\n",
            self.n_vars,
            self.n_clauses + assumptions.len()
        );
        let units = assumptions.iter().fold(String::new(), |mut acc, a| {
            acc.push_str(&format!("{} 0\n", a));
            acc
        });
        DimacsInstanceRead(
            Cursor::new(preamble)
                .chain(Cursor::new(self.clauses.clone()))
                .chain(Cursor::new(units)),
        )
    }
}

impl SatSolver for BufferedSatSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        for l in cl {
            self.n_vars = usize::max(self.n_vars, usize::from(l.var()));
            self.clauses.push_str(&format!("{} ", l));
        }
        self.clauses.push_str("0\n");
        self.n_clauses += 1;
    }

    fn solve(&mut self) -> SolvingResult {
        self.solve_under_assumptions(&[])
    }

    fn solve_under_assumptions(&mut self, assumptions: &[Literal]) -> SolvingResult {
        self.listeners
            .iter()
            .for_each(|l| l.solving_start(self.n_vars, self.n_clauses));
        let solving_result = match (self.solving_fn)(self.instance_reader(assumptions)) {
            Some(output) => read_solver_output(output, self.n_vars),
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

fn read_solver_output(output: Box<dyn Read>, n_vars: usize) -> SolvingResult {
    let mut status = None;
    let mut values = vec![None; n_vars];
    let mut value_line_seen = false;
    let mut value_line_end = false;
    for line in BufReader::new(output).lines() {
        let line = line.unwrap_or_else(|e| panic!("{}: {}", OUTPUT_CONTEXT, e));
        let mut set_status = |b| {
            if status.replace(b).is_some() {
                panic!("{}: multiple status lines", OUTPUT_CONTEXT)
            }
        };
        match line.as_str() {
            "s SATISFIABLE" => set_status(true),
            "s UNSATISFIABLE" => set_status(false),
            "" | "c" | "v" => {}
            l if l.starts_with("c ") => {}
            l if l.starts_with("v ") => {
                value_line_seen = true;
                for w in l.split_ascii_whitespace().skip(1) {
                    let n = w
                        .parse::<isize>()
                        .unwrap_or_else(|_| panic!(r#"{}: "{}" is not a literal"#, OUTPUT_CONTEXT, w));
                    if n == 0 {
                        if value_line_end {
                            panic!("{}: multiple zeroes on value line", OUTPUT_CONTEXT)
                        }
                        value_line_end = true;
                        continue;
                    }
                    let index = n.unsigned_abs() - 1;
                    if index >= n_vars {
                        panic!("{}: a variable in value line is out of bounds", OUTPUT_CONTEXT)
                    }
                    values[index] = Some(n > 0);
                }
            }
            l => panic!(r#"{}: unexpected line "{}""#, OUTPUT_CONTEXT, l),
        }
    }
    match status {
        Some(true) if value_line_seen => SolvingResult::Satisfiable(Assignment::new(values)),
        Some(false) => SolvingResult::Unsatisfiable,
        _ => SolvingResult::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause;

    fn input_check_solving_fn(expected_input: &'static str) -> Box<SolvingFn> {
        Box::new(move |mut r| {
            let mut buffer = String::new();
            r.read_to_string(&mut buffer).unwrap();
            assert_eq!(expected_input, buffer);
            Some(Box::new(&[] as &[u8]))
        })
    }

    fn fake_output_solving_fn(output: &'static str) -> Box<SolvingFn> {
        Box::new(|_| Some(Box::new(output.as_bytes())))
    }

    fn solver_with_output(output: &'static str) -> BufferedSatSolver {
        let mut s = BufferedSatSolver::new(fake_output_solving_fn(output));
        s.add_clause(clause![1, 2]);
        s
    }

    #[test]
    fn test_input_with_assumptions() {
        let expected = "p cnf 2 3\n1 2 0\n-1 -2 0\n1 0\n";
        let mut s = BufferedSatSolver::new(input_check_solving_fn(expected));
        s.add_clause(clause![1, 2]);
        s.add_clause(clause![-1, -2]);
        s.solve_under_assumptions(&[1.into()]);
    }

    #[test]
    fn test_input_reserved_vars() {
        let expected = "p cnf 5 1\n-1 0\n";
        let mut s = BufferedSatSolver::new(input_check_solving_fn(expected));
        s.add_clause(clause![-1]);
        s.reserve(5);
        assert_eq!(SolvingResult::Unknown, s.solve());
    }

    #[test]
    fn test_output_sat() {
        let mut s = solver_with_output("c a comment\nc\ns SATISFIABLE\nv\nv -1 2 0\n");
        let assignment = s.solve().unwrap_model().unwrap();
        assert_eq!(Some(false), assignment.value_of(1));
        assert_eq!(Some(true), assignment.value_of(2));
    }

    #[test]
    fn test_output_sat_multiple_v_lines() {
        let mut s = solver_with_output("s SATISFIABLE\nv 1\nv 2\nv 0\n");
        let assignment = s.solve().unwrap_model().unwrap();
        assert_eq!(Some(true), assignment.value_of(1));
        assert_eq!(Some(true), assignment.value_of(2));
    }

    #[test]
    fn test_output_unsat() {
        let mut s = solver_with_output("s UNSATISFIABLE\n");
        assert!(s.solve().unwrap_model().is_none());
    }

    #[test]
    fn test_output_incomplete() {
        assert_eq!(SolvingResult::Unknown, solver_with_output("v 1 2 0\n").solve());
        assert_eq!(SolvingResult::Unknown, solver_with_output("s SATISFIABLE\n").solve());
        assert_eq!(SolvingResult::Unknown, solver_with_output("").solve());
    }

    #[test]
    fn test_interrupted() {
        let mut s = BufferedSatSolver::new(Box::new(|_| None));
        s.add_clause(clause![1]);
        assert_eq!(SolvingResult::Unknown, s.solve());
    }

    #[test]
    #[should_panic(expected = "a variable in value line is out of bounds")]
    fn test_output_var_out_of_bounds() {
        solver_with_output("s SATISFIABLE\nv 1 2 3 0\n").solve();
    }

    #[test]
    #[should_panic(expected = r#""foo" is not a literal"#)]
    fn test_output_not_a_literal() {
        solver_with_output("s SATISFIABLE\nv 1 foo 0\n").solve();
    }

    #[test]
    #[should_panic(expected = "multiple status lines")]
    fn test_output_multiple_status_lines() {
        solver_with_output("s SATISFIABLE\ns SATISFIABLE\nv 1 2 0\n").solve();
    }

    #[test]
    #[should_panic(expected = "multiple zeroes on value line")]
    fn test_output_multiple_zeroes() {
        solver_with_output("s SATISFIABLE\nv 1 0\nv 2 0\n").solve();
    }

    #[test]
    #[should_panic(expected = r#"unexpected line "foo""#)]
    fn test_output_unexpected_line() {
        solver_with_output("foo\ns SATISFIABLE\n").solve();
    }
}
