use super::{CardinalityEncoding, CnfFormula};
use crate::{model::VariableIndexer, sat::Literal};

/// A hard constraint in a solver-neutral form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HardConstraint {
    /// At least one of the literals is true.
    Clause(Vec<Literal>),
    /// At most `bound` of the literals are true.
    AtMost {
        /// the literals
        lits: Vec<Literal>,
        /// the bound
        bound: usize,
    },
    /// Exactly `bound` of the literals are true.
    Exactly {
        /// the literals
        lits: Vec<Literal>,
        /// the bound
        bound: usize,
    },
}

impl HardConstraint {
    /// Lowers this constraint to CNF, adding the clauses to the formula.
    pub fn encode(&self, encoding: CardinalityEncoding, formula: &mut CnfFormula) {
        match self {
            HardConstraint::Clause(lits) => formula.add_clause(lits.clone()),
            HardConstraint::AtMost { lits, bound } => {
                encoding.encode_at_most(lits, *bound, formula)
            }
            HardConstraint::Exactly { lits, bound } => {
                encoding.encode_exactly(lits, *bound, formula)
            }
        }
    }

    /// Returns the literals involved in this constraint.
    pub fn lits(&self) -> &[Literal] {
        match self {
            HardConstraint::Clause(lits)
            | HardConstraint::AtMost { lits, .. }
            | HardConstraint::Exactly { lits, .. } => lits,
        }
    }

    /// Returns `true` iff the literals set to true satisfy this constraint.
    pub fn is_satisfied_by<F>(&self, is_true: F) -> bool
    where
        F: Fn(Literal) -> bool,
    {
        let count = || self.lits().iter().filter(|l| is_true(**l)).count();
        match self {
            HardConstraint::Clause(_) => count() > 0,
            HardConstraint::AtMost { bound, .. } => count() <= *bound,
            HardConstraint::Exactly { bound, .. } => count() == *bound,
        }
    }
}

/// Builds the hard constraints of the seating problem.
///
/// They state that every student sits at exactly one table,
/// that the seat indicators agree with the table sizes,
/// and that the number of students at 2-seat tables is fixed.
pub struct ConstraintBuilder<'a> {
    indexer: &'a VariableIndexer,
}

impl<'a> ConstraintBuilder<'a> {
    /// Builds a constraint builder over the variables of an indexer.
    pub fn new(indexer: &'a VariableIndexer) -> Self {
        Self { indexer }
    }

    /// Builds the hard constraints.
    pub fn build(&self) -> Vec<HardConstraint> {
        let mut constraints = Vec::new();
        self.add_single_assignment_constraints(&mut constraints);
        self.add_table_validity_constraints(&mut constraints);
        self.add_seat_count_constraint(&mut constraints);
        constraints
    }

    fn add_single_assignment_constraints(&self, constraints: &mut Vec<HardConstraint>) {
        for s in self.indexer.iter_students() {
            let lits = self
                .indexer
                .participation_vars(s)
                .into_iter()
                .map(|v| v.positive())
                .collect::<Vec<_>>();
            constraints.push(HardConstraint::Clause(lits.clone()));
            constraints.push(HardConstraint::AtMost { lits, bound: 1 });
        }
    }

    fn add_table_validity_constraints(&self, constraints: &mut Vec<HardConstraint>) {
        let indexer = self.indexer;
        for (i, j) in indexer.iter_pairs() {
            let table = indexer.pair_var(i, j).negative();
            for s in [i, j] {
                constraints.push(HardConstraint::Clause(vec![
                    table,
                    indexer.seat_var(s).positive(),
                ]));
            }
        }
        for (i, j, k) in indexer.iter_triples() {
            let table = indexer.triple_var(i, j, k).negative();
            for s in [i, j, k] {
                constraints.push(HardConstraint::Clause(vec![
                    table,
                    indexer.seat_var(s).negative(),
                ]));
            }
        }
    }

    fn add_seat_count_constraint(&self, constraints: &mut Vec<HardConstraint>) {
        constraints.push(HardConstraint::Exactly {
            lits: self
                .indexer
                .iter_students()
                .map(|s| self.indexer.seat_var(s).positive())
                .collect(),
            bound: self.indexer.two_seat_count(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::Symbol, sat::Variable};

    #[test]
    fn test_constraint_counts() {
        let indexer = VariableIndexer::new(7).unwrap();
        let constraints = ConstraintBuilder::new(&indexer).build();
        let n_clauses = constraints
            .iter()
            .filter(|c| matches!(c, HardConstraint::Clause(_)))
            .count();
        assert_eq!(7 + 2 * 21 + 3 * 35, n_clauses);
        assert_eq!(
            7,
            constraints
                .iter()
                .filter(|c| matches!(c, HardConstraint::AtMost { bound: 1, .. }))
                .count()
        );
        assert_eq!(
            Some(&HardConstraint::Exactly {
                lits: (1..=7).map(|s| indexer.seat_var(s).positive()).collect(),
                bound: 4
            }),
            constraints.last()
        );
    }

    #[test]
    fn test_grouped_seating_satisfies_constraints() {
        let indexer = VariableIndexer::new(7).unwrap();
        let selected = [
            indexer.pair_var(1, 2),
            indexer.pair_var(3, 4),
            indexer.triple_var(5, 6, 7),
            indexer.seat_var(1),
            indexer.seat_var(2),
            indexer.seat_var(3),
            indexer.seat_var(4),
        ];
        let is_true = |l: Literal| selected.contains(&l.var()) == l.is_positive();
        assert!(ConstraintBuilder::new(&indexer)
            .build()
            .iter()
            .all(|c| c.is_satisfied_by(is_true)));
    }

    #[test]
    fn test_overlapping_tables_violate_constraints() {
        let indexer = VariableIndexer::new(7).unwrap();
        let selected = [
            indexer.pair_var(1, 2),
            indexer.pair_var(2, 3),
            indexer.triple_var(5, 6, 7),
        ];
        let is_true = |l: Literal| selected.contains(&l.var()) == l.is_positive();
        let violated = ConstraintBuilder::new(&indexer)
            .build()
            .into_iter()
            .filter(|c| !c.is_satisfied_by(is_true))
            .collect::<Vec<_>>();
        assert!(violated.contains(&HardConstraint::AtMost {
            lits: indexer
                .participation_vars(2)
                .into_iter()
                .map(Variable::positive)
                .collect(),
            bound: 1
        }));
        assert!(violated.iter().any(|c| matches!(
            c,
            HardConstraint::Clause(lits) if lits.len() == 2
                && indexer.symbol_of(lits[0].var()) == Some(Symbol::Pair(1, 2))
        )));
    }
}
