use crate::sat::{Literal, SatSolver, Variable};

/// A CNF formula under construction.
///
/// The formula knows the highest variable in use, so that encoders can ask it for fresh auxiliary variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CnfFormula {
    n_vars: usize,
    clauses: Vec<Vec<Literal>>,
}

impl CnfFormula {
    /// Builds an empty formula whose variables `1..=n_vars` are reserved.
    pub fn new(n_vars: usize) -> Self {
        Self {
            n_vars,
            clauses: vec![],
        }
    }

    /// Returns a variable that does not appear in the formula yet.
    pub fn fresh_var(&mut self) -> Variable {
        self.n_vars += 1;
        Variable::from(self.n_vars)
    }

    /// Adds a clause.
    pub fn add_clause(&mut self, cl: Vec<Literal>) {
        cl.iter()
            .for_each(|l| self.n_vars = usize::max(self.n_vars, usize::from(l.var())));
        self.clauses.push(cl);
    }

    /// Returns the highest variable index of the formula.
    pub fn n_vars(&self) -> usize {
        self.n_vars
    }

    /// Returns the number of clauses.
    pub fn n_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Returns the clauses.
    pub fn clauses(&self) -> &[Vec<Literal>] {
        &self.clauses
    }

    /// Adds the clauses of this formula to a SAT solver, and reserves its variables.
    pub fn load_into(&self, solver: &mut dyn SatSolver) {
        solver.reserve(self.n_vars);
        self.clauses
            .iter()
            .for_each(|cl| solver.add_clause(cl.clone()));
    }
}
