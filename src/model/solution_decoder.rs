use super::{
    errors::{Result, TcpcError},
    preferences::Student,
    tcpc_model::Model,
    variables::Symbol,
    weights::Weight,
};
use crate::sat::Assignment;
use itertools::Itertools;
use std::fmt::Display;

/// A table of a seating: its members, in increasing order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Table(Vec<Student>);

impl Table {
    /// Returns the members of the table.
    pub fn members(&self) -> &[Student] {
        &self.0
    }

    /// Returns the number of seats of the table.
    pub fn size(&self) -> usize {
        self.0.len()
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}

/// A seating of a class: a partition of the students into tables, together with its achieved weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seating {
    tables: Vec<Table>,
    achieved_weight: Weight,
}

impl Seating {
    /// Returns the tables, sorted by their smallest member.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Returns the sum of the weights of the tables.
    pub fn achieved_weight(&self) -> Weight {
        self.achieved_weight
    }
}

/// Translates an assignment of the variables of a model into a seating.
///
/// The decoder checks the assignment against the partition invariants instead of trusting the engine:
/// each student must sit at exactly one chosen table,
/// and the seat indicators must agree with the table sizes.
/// The achieved weight is recomputed from the weights of the model.
pub struct SolutionDecoder<'a> {
    model: &'a Model,
}

impl<'a> SolutionDecoder<'a> {
    /// Builds a decoder for the assignments of a model.
    pub fn new(model: &'a Model) -> Self {
        Self { model }
    }

    /// Decodes an assignment.
    ///
    /// Fails with [TcpcError::NoSolution] if no assignment is given,
    /// and with [TcpcError::DecodeInconsistency] if the assignment does not describe a valid seating.
    pub fn decode(&self, assignment: Option<&Assignment>) -> Result<Seating> {
        let assignment = assignment.ok_or_else(|| {
            TcpcError::NoSolution("the engine provided no assignment".to_string())
        })?;
        let indexer = self.model.indexer();
        let weights = self.model.weights();
        let mut table_of = vec![None; indexer.n_students()];
        let mut tables = Vec::new();
        let mut achieved_weight = Weight::ZERO;
        let table_vars = indexer.n_pairs() + indexer.n_triples();
        for (id, value) in assignment.iter().take(table_vars) {
            let var = id.into();
            let symbol = indexer.symbol_of(var).ok_or_else(|| {
                TcpcError::DecodeInconsistency(format!("variable {} is not a table", id))
            })?;
            match value {
                Some(true) => {}
                Some(false) => continue,
                None => {
                    return Err(TcpcError::DecodeInconsistency(format!(
                        "variable {} ({}) is unassigned",
                        id, symbol
                    )))
                }
            }
            let members = match symbol {
                Symbol::Pair(i, j) => vec![i, j],
                Symbol::Triple(i, j, k) => vec![i, j, k],
                Symbol::Seat(_) => unreachable!(),
            };
            for s in &members {
                if let Some(other) = table_of[s - 1].replace(tables.len()) {
                    return Err(TcpcError::DecodeInconsistency(format!(
                        "student {} is seated at both tables {{{}}} and {{{}}}",
                        s,
                        tables[other],
                        members.iter().join(" ")
                    )));
                }
            }
            achieved_weight += weights.weight_of(symbol);
            tables.push(Table(members));
        }
        if assignment.n_vars() < table_vars {
            return Err(TcpcError::DecodeInconsistency(format!(
                "the assignment covers {} variables; {} are needed",
                assignment.n_vars(),
                table_vars
            )));
        }
        if let Some(s) = table_of.iter().position(|t| t.is_none()) {
            return Err(TcpcError::DecodeInconsistency(format!(
                "student {} is not seated",
                s + 1
            )));
        }
        self.check_seat_indicators(assignment, &tables, &table_of)?;
        tables.sort_unstable();
        Ok(Seating {
            tables,
            achieved_weight,
        })
    }

    fn check_seat_indicators(
        &self,
        assignment: &Assignment,
        tables: &[Table],
        table_of: &[Option<usize>],
    ) -> Result<()> {
        let indexer = self.model.indexer();
        let mut n_two_seats = 0;
        for s in indexer.iter_students() {
            let at_two_seat_table = table_of[s - 1].map(|t| tables[t].size() == 2) == Some(true);
            if at_two_seat_table {
                n_two_seats += 1;
            }
            match assignment.value_of(indexer.seat_var(s)) {
                Some(y) if y != at_two_seat_table => {
                    return Err(TcpcError::DecodeInconsistency(format!(
                        "the seat indicator of student {} disagrees with the size of their table",
                        s
                    )))
                }
                _ => {}
            }
        }
        if n_two_seats != indexer.two_seat_count() {
            return Err(TcpcError::DecodeInconsistency(format!(
                "{} students sit at 2-seat tables; {} expected",
                n_two_seats,
                indexer.two_seat_count()
            )));
        }
        Ok(())
    }
}
