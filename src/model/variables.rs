use super::{
    errors::{Result, TcpcError},
    preferences::{Student, MAX_STUDENTS},
};
use crate::sat::Variable;
use itertools::Itertools;
use std::fmt::Display;

/// The symbol a model variable stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Two students share a 2-seat table; members are given in increasing order.
    Pair(Student, Student),
    /// Three students share a 3-seat table; members are given in increasing order.
    Triple(Student, Student, Student),
    /// A student sits at a 2-seat table.
    Seat(Student),
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Pair(i, j) => write!(f, "x_{}_{}", i, j),
            Symbol::Triple(i, j, k) => write!(f, "x_{}_{}_{}", i, j, k),
            Symbol::Seat(i) => write!(f, "y_{}", i),
        }
    }
}

fn n_subsets_2(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

fn n_subsets_3(n: usize) -> usize {
    n * n.saturating_sub(1) * n.saturating_sub(2) / 6
}

/// Returns the number of students seated at 2-seat tables in a class of `n_students`.
///
/// The class is organized in base groups of seven students (two 2-seat tables and one 3-seat table),
/// so this count is the floor of `4n/7`.
pub fn two_seat_count(n_students: usize) -> usize {
    4 * n_students / 7
}

/// Checks that a class of `n_students` can be seated at 2-seat and 3-seat tables
/// with exactly [two_seat_count] students at 2-seat tables.
///
/// On success, returns this count.
pub fn check_class_size(n_students: usize) -> Result<usize> {
    let invalid = |reason: String| TcpcError::InvalidSize {
        n_students,
        reason,
    };
    if n_students < 2 {
        return Err(invalid("a class needs at least two students".to_string()));
    }
    if n_students > MAX_STUDENTS {
        return Err(invalid(format!(
            "a class has at most {} students",
            MAX_STUDENTS
        )));
    }
    let n_seats = two_seat_count(n_students);
    if n_seats % 2 != 0 {
        return Err(invalid(format!(
            "the {} students seated at 2-seat tables cannot form pairs",
            n_seats
        )));
    }
    if (n_students - n_seats) % 3 != 0 {
        return Err(invalid(format!(
            "the {} students seated at 3-seat tables cannot form triples",
            n_students - n_seats
        )));
    }
    Ok(n_seats)
}

/// Gives the ids of the model variables.
///
/// Pairs `(i,j)` come first in lexicographic order, then triples `(i,j,k)`, then seat indicators.
/// Ids start at 1 and are computed by closed-form ranking, so that two indexers built for the same class size agree.
///
/// # Example
///
/// ```
/// # use tcpc::model::{Symbol, VariableIndexer};
/// let indexer = VariableIndexer::new(7).unwrap();
/// assert_eq!(21, indexer.n_pairs());
/// assert_eq!(35, indexer.n_triples());
/// assert_eq!(1, usize::from(indexer.pair_var(1, 2)));
/// assert_eq!(22, usize::from(indexer.triple_var(1, 2, 3)));
/// assert_eq!(Some(Symbol::Seat(7)), indexer.symbol_of(indexer.seat_var(7)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableIndexer {
    n_students: usize,
    n_pairs: usize,
    n_triples: usize,
}

impl VariableIndexer {
    /// Builds the indexer for a class of `n_students`.
    ///
    /// Fails with [TcpcError::InvalidSize] if the class size is not valid (see [check_class_size]).
    pub fn new(n_students: usize) -> Result<Self> {
        check_class_size(n_students)?;
        Ok(Self {
            n_students,
            n_pairs: n_subsets_2(n_students),
            n_triples: n_subsets_3(n_students),
        })
    }

    /// Returns the number of students.
    pub fn n_students(&self) -> usize {
        self.n_students
    }

    /// Returns the number of pair variables.
    pub fn n_pairs(&self) -> usize {
        self.n_pairs
    }

    /// Returns the number of triple variables.
    pub fn n_triples(&self) -> usize {
        self.n_triples
    }

    /// Returns the number of seat indicators.
    pub fn n_seats(&self) -> usize {
        self.n_students
    }

    /// Returns the number of students that must sit at 2-seat tables.
    pub fn two_seat_count(&self) -> usize {
        two_seat_count(self.n_students)
    }

    /// Returns the total number of variables.
    pub fn n_vars(&self) -> usize {
        self.n_pairs + self.n_triples + self.n_students
    }

    fn check_student(&self, s: Student) {
        if s == 0 || s > self.n_students {
            panic!("no student {} in a class of {}", s, self.n_students)
        }
    }

    /// Returns the variable of the pair made of the two students, given in any order.
    ///
    /// # Panics
    ///
    /// If a student is out of range, or if both are the same.
    pub fn pair_var(&self, a: Student, b: Student) -> Variable {
        let (i, j) = if a < b { (a, b) } else { (b, a) };
        self.check_student(i);
        self.check_student(j);
        if i == j {
            panic!("a pair needs two distinct students")
        }
        let n = self.n_students;
        Variable::from(n_subsets_2(n) - n_subsets_2(n - i + 1) + (j - i))
    }

    /// Returns the variable of the triple made of the three students, given in any order.
    ///
    /// # Panics
    ///
    /// If a student is out of range, or if two of them are the same.
    pub fn triple_var(&self, a: Student, b: Student, c: Student) -> Variable {
        let mut members = [a, b, c];
        members.sort_unstable();
        let [i, j, k] = members;
        members.iter().for_each(|s| self.check_student(*s));
        if i == j || j == k {
            panic!("a triple needs three distinct students")
        }
        let n = self.n_students;
        let before_i = n_subsets_3(n) - n_subsets_3(n - i + 1);
        let before_j = n_subsets_2(n - i) - n_subsets_2(n - j + 1);
        Variable::from(self.n_pairs + before_i + before_j + (k - j))
    }

    /// Returns the seat indicator of a student.
    ///
    /// # Panics
    ///
    /// If the student is out of range.
    pub fn seat_var(&self, s: Student) -> Variable {
        self.check_student(s);
        Variable::from(self.n_pairs + self.n_triples + s)
    }

    /// Returns the symbol a variable stands for, or [Option::None] if the variable is not a model variable.
    pub fn symbol_of(&self, var: Variable) -> Option<Symbol> {
        let id = usize::from(var);
        let n = self.n_students;
        if id <= self.n_pairs {
            let rank = id - 1;
            let i = (1..n)
                .find(|i| rank < n_subsets_2(n) - n_subsets_2(n - i))?;
            let j = i + 1 + rank - (n_subsets_2(n) - n_subsets_2(n - i + 1));
            Some(Symbol::Pair(i, j))
        } else if id <= self.n_pairs + self.n_triples {
            let rank = id - self.n_pairs - 1;
            let i = (1..n - 1).find(|i| rank < n_subsets_3(n) - n_subsets_3(n - i))?;
            let rank_in_i = rank - (n_subsets_3(n) - n_subsets_3(n - i + 1));
            let j = (i + 1..n)
                .find(|j| rank_in_i < n_subsets_2(n - i) - n_subsets_2(n - j))?;
            let k = j + 1 + rank_in_i - (n_subsets_2(n - i) - n_subsets_2(n - j + 1));
            Some(Symbol::Triple(i, j, k))
        } else if id <= self.n_vars() {
            Some(Symbol::Seat(id - self.n_pairs - self.n_triples))
        } else {
            None
        }
    }

    /// Iterates over the pairs `(i,j)`, `i<j`, in the order of their variables.
    pub fn iter_pairs(&self) -> impl Iterator<Item = (Student, Student)> {
        (1..=self.n_students).tuple_combinations()
    }

    /// Iterates over the triples `(i,j,k)`, `i<j<k`, in the order of their variables.
    pub fn iter_triples(&self) -> impl Iterator<Item = (Student, Student, Student)> {
        (1..=self.n_students).tuple_combinations()
    }

    /// Iterates over the students, in the order of their seat indicators.
    pub fn iter_students(&self) -> impl Iterator<Item = Student> {
        1..=self.n_students
    }

    /// Returns the pair and triple variables a student takes part in, sorted by id.
    pub fn participation_vars(&self, s: Student) -> Vec<Variable> {
        self.check_student(s);
        let others = (1..=self.n_students).filter(|o| *o != s).collect::<Vec<_>>();
        let mut vars = others
            .iter()
            .map(|o| self.pair_var(s, *o))
            .chain(
                others
                    .iter()
                    .tuple_combinations()
                    .map(|(a, b)| self.triple_var(s, *a, *b)),
            )
            .collect::<Vec<_>>();
        vars.sort_unstable();
        vars
    }
}
