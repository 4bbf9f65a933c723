use super::cadical_solver::CadicalSolver;
use crate::utils::StopCondition;
use std::{
    fmt::Display,
    num::{NonZeroIsize, NonZeroUsize},
};

/// A variable in a SAT solver.
///
/// A variable is represented by a non-null positive integer.
/// It can be obtained through the [From] trait from an integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(NonZeroUsize);

macro_rules! impl_var_from {
    ($t: ty) => {
        impl From<$t> for Variable {
            fn from(v: $t) -> Self {
                Self(NonZeroUsize::try_from(v as usize).unwrap())
            }
        }
    };
}
impl_var_from!(usize);
impl_var_from!(u64);
impl_var_from!(u32);

macro_rules! impl_var_from_neg {
    ($t: ty) => {
        impl From<$t> for Variable {
            fn from(v: $t) -> Self {
                if v < 0 {
                    panic!("cannot build a variable from a negative integer")
                }
                Self(NonZeroUsize::try_from(v as usize).unwrap())
            }
        }
    };
}
impl_var_from_neg!(isize);
impl_var_from_neg!(i64);
impl_var_from_neg!(i32);

impl From<Variable> for usize {
    fn from(v: Variable) -> Self {
        v.0.into()
    }
}

impl Variable {
    /// Returns the positive literal of this variable.
    pub fn positive(self) -> Literal {
        Literal::from(usize::from(self) as isize)
    }

    /// Returns the negative literal of this variable.
    pub fn negative(self) -> Literal {
        Literal::from(-(usize::from(self) as isize))
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A literal in a SAT solver.
///
/// A literal is represented by a non-null integer.
/// It can be obtained through the [From] trait from a signed integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal(NonZeroIsize);

impl Literal {
    /// Returns the opposite literal.
    pub fn negate(self) -> Self {
        Self::from(-self.0.get())
    }

    /// Returns the variable of this literal.
    pub fn var(&self) -> Variable {
        Variable(self.0.unsigned_abs())
    }

    /// Returns `true` iff this literal is the positive one of its variable.
    pub fn is_positive(&self) -> bool {
        self.0.get() > 0
    }
}

macro_rules! impl_lit_from {
    ($t: ty) => {
        impl From<$t> for Literal {
            fn from(l: $t) -> Self {
                Self(NonZeroIsize::try_from(l as isize).unwrap())
            }
        }
    };
}
impl_lit_from!(isize);
impl_lit_from!(i64);
impl_lit_from!(i32);

impl From<Literal> for isize {
    fn from(l: Literal) -> Self {
        l.0.into()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builds a clause from a list of integers.
#[macro_export]
macro_rules! clause {
    () => (
        vec![] as Vec<$crate::sat::Literal>
    );
    ($($x:expr),+ $(,)?) => (
        [$($x),+].into_iter().map($crate::sat::Literal::from).collect::<Vec<$crate::sat::Literal>>()
    );
}

/// An assignment of a set of variables.
///
/// Inside the set of variables involved in the assignment, some may be unassigned.
/// This is the reason why accessors to assigned value returns an [Option<bool>].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment(Vec<Option<bool>>);

impl Assignment {
    /// Builds an assignment from the values of the variables `1..=values.len()`.
    pub fn new(values: Vec<Option<bool>>) -> Self {
        Self(values)
    }

    /// Builds an assignment from the list of the literals set to true.
    ///
    /// Variables not appearing in the list are unassigned.
    pub fn from_literals(n_vars: usize, literals: &[Literal]) -> Self {
        let mut values = vec![None; n_vars];
        literals.iter().for_each(|l| {
            let index = usize::from(l.var()) - 1;
            if index >= values.len() {
                values.resize(index + 1, None);
            }
            values[index] = Some(l.is_positive());
        });
        Self(values)
    }

    /// Returns the value potentially assigned to the variable.
    ///
    /// The result in an [Option].
    /// In case the variable is not assigned (or not covered by this assignment), [Option::None] is returned.
    /// Else, [Option::Some] is returned and contains the assigned value.
    pub fn value_of<T>(&self, v: T) -> Option<bool>
    where
        T: Into<Variable>,
    {
        self.0.get(usize::from(v.into()) - 1).copied().flatten()
    }

    /// Returns `true` iff the literal is set to true by this assignment.
    pub fn satisfies(&self, l: Literal) -> bool {
        self.value_of(l.var()) == Some(l.is_positive())
    }

    /// Returns the number of variables covered by this assignment.
    pub fn n_vars(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the `(variable index, value)` couples of this assignment.
    pub fn iter(&self) -> AssignmentIterator {
        AssignmentIterator {
            assignment: self,
            next: 0,
        }
    }
}

/// An iterator over the values of an [Assignment].
pub struct AssignmentIterator<'a> {
    assignment: &'a Assignment,
    next: usize,
}

impl Iterator for AssignmentIterator<'_> {
    type Item = (usize, Option<bool>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == self.assignment.0.len() {
            None
        } else {
            self.next += 1;
            Some((self.next, self.assignment.0[self.next - 1]))
        }
    }
}

/// The result of a SAT solver call.
#[derive(Debug, PartialEq, Eq)]
pub enum SolvingResult {
    /// The problem is satisfiable; a model is given.
    Satisfiable(Assignment),
    /// The problem is unsatisfiable.
    Unsatisfiable,
    /// The solver stopped without an answer (interruption, unexpected output).
    Unknown,
}

impl SolvingResult {
    /// Returns the underlying model if it exists, or [Option::None].
    ///
    /// # Panics
    ///
    /// If the solving result is set [SolvingResult::Unknown], this function panics.
    pub fn unwrap_model(self) -> Option<Assignment> {
        match self {
            SolvingResult::Satisfiable(assignment) => Some(assignment),
            SolvingResult::Unsatisfiable => None,
            SolvingResult::Unknown => {
                panic!(r#"cannot unwrap solving result when the solver returned "Unknown""#)
            }
        }
    }
}

/// A trait for SAT solvers.
pub trait SatSolver {
    /// Adds a clause to this solver.
    fn add_clause(&mut self, cl: Vec<Literal>);

    /// Solves the problem formed by the clauses added so far.
    fn solve(&mut self) -> SolvingResult;

    /// Solves the problem formed by the clauses added so far and the provided assumptions.
    fn solve_under_assumptions(&mut self, assumptions: &[Literal]) -> SolvingResult;

    /// Returns the highest variable index known by this solver.
    fn n_vars(&self) -> usize;

    /// Adds a listener notified at each solver call.
    fn add_listener(&mut self, listener: Box<dyn SolvingListener>);

    /// Makes the solver aware of the variables up to `new_max_id`, even if they appear in no clause.
    fn reserve(&mut self, new_max_id: usize);
}

/// A trait for objects listening to the calls of a SAT solver.
pub trait SolvingListener {
    /// Called when a solver call starts.
    fn solving_start(&self, n_vars: usize, n_clauses: usize);

    /// Called when a solver call ends.
    fn solving_end(&self, result: &SolvingResult);
}

/// A trait for objects building fresh SAT solvers.
///
/// The solvers are bound to a stop condition; when it is reached, pending calls return [SolvingResult::Unknown].
pub trait SatSolverFactory {
    /// Builds a new SAT solver bound to the given stop condition.
    fn new_solver(&self, stop_condition: StopCondition) -> Box<dyn SatSolver>;
}

/// A factory for the default SAT solver (CaDiCaL).
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSatSolverFactory;

impl SatSolverFactory for DefaultSatSolverFactory {
    fn new_solver(&self, stop_condition: StopCondition) -> Box<dyn SatSolver> {
        Box::new(CadicalSolver::new_with_stop_condition(stop_condition))
    }
}

/// The default SAT solver (CaDiCaL).
pub fn default_solver() -> Box<dyn SatSolver> {
    Box::<CadicalSolver>::default()
}
