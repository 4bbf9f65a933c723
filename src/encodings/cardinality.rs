use super::CnfFormula;
use crate::sat::Literal;
use itertools::Itertools;
use log::debug;

/// The way cardinality constraints are lowered to CNF.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CardinalityEncoding {
    /// Sinz's sequential counter: `O(n·k)` clauses and auxiliary variables.
    #[default]
    SequentialCounter,
    /// Pairwise mutual exclusion: `O(n²)` binary clauses, no auxiliary variable.
    ///
    /// Only at-most-one constraints are encoded this way; other bounds fall back to the sequential counter.
    Pairwise,
}

impl CardinalityEncoding {
    /// Adds clauses forcing at most `bound` of the literals to be true.
    pub fn encode_at_most(&self, lits: &[Literal], bound: usize, formula: &mut CnfFormula) {
        if bound >= lits.len() {
            return;
        }
        if bound == 0 {
            lits.iter().for_each(|l| formula.add_clause(vec![l.negate()]));
            return;
        }
        match self {
            CardinalityEncoding::Pairwise if bound == 1 => encode_pairwise_at_most_one(lits, formula),
            CardinalityEncoding::Pairwise => {
                debug!(
                    "no pairwise encoding for an at-most-{} constraint; using a sequential counter",
                    bound
                );
                encode_sequential_counter(lits, bound, formula)
            }
            CardinalityEncoding::SequentialCounter => {
                encode_sequential_counter(lits, bound, formula)
            }
        }
    }

    /// Adds clauses forcing at least `bound` of the literals to be true.
    ///
    /// At-least-k over the literals is encoded as at-most-(n-k) over their negations.
    pub fn encode_at_least(&self, lits: &[Literal], bound: usize, formula: &mut CnfFormula) {
        match bound {
            0 => {}
            1 => formula.add_clause(lits.to_vec()),
            _ if bound > lits.len() => formula.add_clause(vec![]),
            _ => {
                let negated = lits.iter().map(|l| l.negate()).collect::<Vec<_>>();
                self.encode_at_most(&negated, lits.len() - bound, formula)
            }
        }
    }

    /// Adds clauses forcing exactly `bound` of the literals to be true.
    pub fn encode_exactly(&self, lits: &[Literal], bound: usize, formula: &mut CnfFormula) {
        self.encode_at_most(lits, bound, formula);
        self.encode_at_least(lits, bound, formula);
    }
}

fn encode_pairwise_at_most_one(lits: &[Literal], formula: &mut CnfFormula) {
    lits.iter()
        .tuple_combinations()
        .for_each(|(a, b)| formula.add_clause(vec![a.negate(), b.negate()]));
}

// requires 1 <= k < n
fn encode_sequential_counter(lits: &[Literal], k: usize, formula: &mut CnfFormula) {
    let n = lits.len();
    // s[i][j] is true if at least j+1 of the literals x_0..=x_i are true
    let s = (0..n - 1)
        .map(|_| (0..k).map(|_| formula.fresh_var()).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    formula.add_clause(vec![lits[0].negate(), s[0][0].positive()]);
    (1..k).for_each(|j| formula.add_clause(vec![s[0][j].negative()]));
    for i in 1..n - 1 {
        let x = lits[i];
        formula.add_clause(vec![x.negate(), s[i][0].positive()]);
        formula.add_clause(vec![s[i - 1][0].negative(), s[i][0].positive()]);
        for j in 1..k {
            formula.add_clause(vec![
                x.negate(),
                s[i - 1][j - 1].negative(),
                s[i][j].positive(),
            ]);
            formula.add_clause(vec![s[i - 1][j].negative(), s[i][j].positive()]);
        }
        formula.add_clause(vec![x.negate(), s[i - 1][k - 1].negative()]);
    }
    formula.add_clause(vec![lits[n - 1].negate(), s[n - 2][k - 1].negative()]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::{CadicalSolver, SatSolver};

    fn lits(n: usize) -> Vec<Literal> {
        (1..=n as isize).map(Literal::from).collect()
    }

    fn check_exhaustively<F>(encoding: CardinalityEncoding, encode: F, accepts: fn(usize, usize) -> bool)
    where
        F: Fn(&CardinalityEncoding, &[Literal], usize, &mut CnfFormula),
    {
        for n in 1..=5 {
            for k in 0..=n + 1 {
                let x = lits(n);
                let mut formula = CnfFormula::new(n);
                encode(&encoding, &x, k, &mut formula);
                let mut solver = CadicalSolver::default();
                formula.load_into(&mut solver);
                for bits in 0..(1usize << n) {
                    let assumptions = x
                        .iter()
                        .enumerate()
                        .map(|(i, l)| if bits & (1 << i) != 0 { *l } else { l.negate() })
                        .collect::<Vec<_>>();
                    let expected = accepts(bits.count_ones() as usize, k);
                    let actual = solver
                        .solve_under_assumptions(&assumptions)
                        .unwrap_model()
                        .is_some();
                    assert_eq!(expected, actual, "n={}, k={}, bits={:b}", n, k, bits);
                }
            }
        }
    }

    #[test]
    fn test_seqcounter_at_most() {
        check_exhaustively(
            CardinalityEncoding::SequentialCounter,
            CardinalityEncoding::encode_at_most,
            |count, k| count <= k,
        );
    }

    #[test]
    fn test_seqcounter_at_least() {
        check_exhaustively(
            CardinalityEncoding::SequentialCounter,
            CardinalityEncoding::encode_at_least,
            |count, k| count >= k,
        );
    }

    #[test]
    fn test_seqcounter_exactly() {
        check_exhaustively(
            CardinalityEncoding::SequentialCounter,
            CardinalityEncoding::encode_exactly,
            |count, k| count == k,
        );
    }

    #[test]
    fn test_pairwise_exactly() {
        check_exhaustively(
            CardinalityEncoding::Pairwise,
            CardinalityEncoding::encode_exactly,
            |count, k| count == k,
        );
    }

    #[test]
    fn test_pairwise_at_most_one_has_no_aux_var() {
        let mut formula = CnfFormula::new(4);
        CardinalityEncoding::Pairwise.encode_at_most(&lits(4), 1, &mut formula);
        assert_eq!(4, formula.n_vars());
        assert_eq!(6, formula.n_clauses());
    }

    #[test]
    fn test_seqcounter_aux_vars_follow_reserved_ones() {
        let mut formula = CnfFormula::new(10);
        CardinalityEncoding::SequentialCounter.encode_at_most(&lits(4), 2, &mut formula);
        assert_eq!(10 + 3 * 2, formula.n_vars());
    }

    #[test]
    fn test_trivial_bounds() {
        let mut formula = CnfFormula::new(3);
        CardinalityEncoding::default().encode_at_most(&lits(3), 3, &mut formula);
        CardinalityEncoding::default().encode_at_least(&lits(3), 0, &mut formula);
        assert_eq!(0, formula.n_clauses());
        CardinalityEncoding::default().encode_at_least(&lits(3), 4, &mut formula);
        assert_eq!(vec![Vec::<Literal>::new()], formula.clauses());
    }
}
