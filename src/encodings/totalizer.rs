use super::CnfFormula;
use crate::sat::Literal;
use std::collections::BTreeMap;

/// A generalized totalizer over weighted literals.
///
/// The encoding introduces an output literal `o_s` for each reachable partial sum `s` (sums above the cap are merged into the cap),
/// together with clauses ensuring that `o_s` is true whenever the weighted sum of the true input literals is at least `s`.
/// Bounding the sum below `c` is then a matter of asserting `¬o_s` for every output `s ≥ c`.
///
/// # Example
///
/// ```
/// # use tcpc::encodings::{CnfFormula, GeneralizedTotalizer};
/// # use tcpc::sat::Literal;
/// let mut formula = CnfFormula::new(3);
/// let inputs = vec![(Literal::from(1), 2), (Literal::from(2), 3), (Literal::from(3), 3)];
/// let totalizer = GeneralizedTotalizer::new(&inputs, 6, &mut formula);
/// assert_eq!(vec![2, 3, 5, 6], totalizer.sums().collect::<Vec<_>>());
/// ```
#[derive(Debug, Clone)]
pub struct GeneralizedTotalizer {
    outputs: BTreeMap<u64, Literal>,
}

impl GeneralizedTotalizer {
    /// Encodes the totalizer of the weighted literals into the formula.
    ///
    /// The inputs with a null weight are ignored.
    pub fn new(inputs: &[(Literal, u64)], cap: u64, formula: &mut CnfFormula) -> Self {
        let leaves = inputs
            .iter()
            .filter(|(_, w)| *w > 0)
            .map(|(l, w)| BTreeMap::from([(u64::min(*w, cap), *l)]))
            .collect::<Vec<_>>();
        let outputs = merge_nodes(leaves, cap, formula);
        Self { outputs }
    }

    /// Iterates over the sums for which an output literal exists, in increasing order.
    pub fn sums(&self) -> impl Iterator<Item = u64> + '_ {
        self.outputs.keys().copied()
    }

    /// Returns the literals that must be false to force the weighted sum strictly below `bound`.
    pub fn lits_to_block(&self, bound: u64) -> Vec<Literal> {
        self.outputs
            .range(bound..)
            .map(|(_, l)| l.negate())
            .collect()
    }
}

fn merge_nodes(
    mut nodes: Vec<BTreeMap<u64, Literal>>,
    cap: u64,
    formula: &mut CnfFormula,
) -> BTreeMap<u64, Literal> {
    while nodes.len() > 1 {
        let mut next = Vec::with_capacity((nodes.len() + 1) / 2);
        let mut it = nodes.into_iter();
        while let Some(left) = it.next() {
            match it.next() {
                Some(right) => next.push(merge(&left, &right, cap, formula)),
                None => next.push(left),
            }
        }
        nodes = next;
    }
    nodes.pop().unwrap_or_default()
}

fn merge(
    left: &BTreeMap<u64, Literal>,
    right: &BTreeMap<u64, Literal>,
    cap: u64,
    formula: &mut CnfFormula,
) -> BTreeMap<u64, Literal> {
    let mut outputs = BTreeMap::new();
    let mut output_for = |s: u64, formula: &mut CnfFormula| {
        *outputs
            .entry(u64::min(s, cap))
            .or_insert_with(|| formula.fresh_var().positive())
    };
    for (w, l) in left.iter().chain(right.iter()) {
        let o = output_for(*w, formula);
        formula.add_clause(vec![l.negate(), o]);
    }
    for (wl, ll) in left {
        for (wr, lr) in right {
            let o = output_for(wl + wr, formula);
            formula.add_clause(vec![ll.negate(), lr.negate(), o]);
        }
    }
    outputs
}
