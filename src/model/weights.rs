use super::{
    preferences::{PreferenceGraph, Student},
    variables::{Symbol, VariableIndexer},
};
use crate::sat::Variable;
use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign},
};

const EIGHTHS: u64 = 8;

/// A satisfaction weight, stored exactly as a number of eighths.
///
/// Triple weights are multiples of 3/8, so counting eighths keeps every computation integral.
///
/// # Example
///
/// ```
/// # use tcpc::model::Weight;
/// let w = Weight::from_eighths(21);
/// assert_eq!("2.625", w.to_string());
/// assert_eq!("7", (Weight::from_integer(4) + Weight::from_eighths(24)).to_string());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Weight(u64);

impl Weight {
    /// The null weight.
    pub const ZERO: Weight = Weight(0);

    /// The highest weight of a pair.
    pub const PAIR_MAX: Weight = Weight(2 * EIGHTHS);

    /// The highest weight of a triple.
    pub const TRIPLE_MAX: Weight = Weight(3 * EIGHTHS);

    /// Builds a weight from a number of eighths.
    pub fn from_eighths(eighths: u64) -> Self {
        Self(eighths)
    }

    /// Builds a weight from an integer value.
    pub fn from_integer(value: u64) -> Self {
        Self(value * EIGHTHS)
    }

    /// Returns the number of eighths of this weight.
    pub fn eighths(&self) -> u64 {
        self.0
    }

    /// Returns `true` iff this weight is null.
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the difference between this weight and a lower one, or [Option::None] if it is higher.
    pub fn checked_sub(self, other: Weight) -> Option<Weight> {
        self.0.checked_sub(other.0).map(Weight)
    }

    /// Returns this weight as a floating point value.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / EIGHTHS as f64
    }
}

impl Add for Weight {
    type Output = Weight;

    fn add(self, rhs: Self) -> Self::Output {
        Weight(self.0 + rhs.0)
    }
}

impl AddAssign for Weight {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

impl Sum for Weight {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Weight::ZERO, Add::add)
    }
}

impl Display for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let integral = self.0 / EIGHTHS;
        let thousandths = (self.0 % EIGHTHS) * 125;
        if thousandths == 0 {
            write!(f, "{}", integral)
        } else {
            let decimals = format!("{:03}", thousandths);
            write!(f, "{}.{}", integral, decimals.trim_end_matches('0'))
        }
    }
}

/// The satisfaction weights of every pair and triple of a class.
///
/// They are computed once by a [WeightCalculator] and looked up by variable or by members in any order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableWeights {
    indexer: VariableIndexer,
    weights: Vec<Weight>,
}

impl TableWeights {
    /// Returns the weight of the pair made of the two students.
    pub fn pair_weight(&self, a: Student, b: Student) -> Weight {
        self.weight_of_var(self.indexer.pair_var(a, b))
            .unwrap_or(Weight::ZERO)
    }

    /// Returns the weight of the triple made of the three students.
    pub fn triple_weight(&self, a: Student, b: Student, c: Student) -> Weight {
        self.weight_of_var(self.indexer.triple_var(a, b, c))
            .unwrap_or(Weight::ZERO)
    }

    /// Returns the weight of the table a variable stands for.
    ///
    /// Seat indicators and variables outside the model have no weight, and [Option::None] is returned.
    pub fn weight_of_var(&self, var: Variable) -> Option<Weight> {
        self.weights.get(usize::from(var) - 1).copied()
    }

    /// Returns the weight of a symbol (null for seat indicators).
    pub fn weight_of(&self, symbol: Symbol) -> Weight {
        match symbol {
            Symbol::Pair(i, j) => self.pair_weight(i, j),
            Symbol::Triple(i, j, k) => self.triple_weight(i, j, k),
            Symbol::Seat(_) => Weight::ZERO,
        }
    }

    /// Returns the indexer the weights are attached to.
    pub fn indexer(&self) -> &VariableIndexer {
        &self.indexer
    }

    /// Iterates over the table variables and their weights, in the order of the variables.
    pub fn iter(&self) -> impl Iterator<Item = (Variable, Weight)> + '_ {
        self.weights
            .iter()
            .enumerate()
            .map(|(i, w)| (Variable::from(i + 1), *w))
    }
}

/// Computes the satisfaction weights from the preferences.
///
/// For a pair `(i,j)`, the weight is `2·wi·wj` where `wi` is 1 if `i` prefers `j` and 0 otherwise.
/// For a triple `(i,j,k)`, the weight is `3·wi·wj·wk/8` where `wi` is the number of the two other members `i` prefers.
pub struct WeightCalculator<'a> {
    preferences: &'a PreferenceGraph,
    indexer: VariableIndexer,
}

impl<'a> WeightCalculator<'a> {
    /// Builds a calculator for the given preferences and variables.
    ///
    /// # Panics
    ///
    /// If the indexer and the preferences do not share the same number of students.
    pub fn new(preferences: &'a PreferenceGraph, indexer: VariableIndexer) -> Self {
        assert_eq!(
            preferences.n_students(),
            indexer.n_students(),
            "preferences and indexer disagree on the number of students"
        );
        Self {
            preferences,
            indexer,
        }
    }

    /// Computes the weights of every pair and triple.
    pub fn compute(&self) -> TableWeights {
        let p = self.preferences;
        let count = |a, b| p.prefers(a, b) as u64;
        let mut weights = Vec::with_capacity(self.indexer.n_pairs() + self.indexer.n_triples());
        weights.extend(
            self.indexer
                .iter_pairs()
                .map(|(i, j)| Weight::from_eighths(2 * EIGHTHS * count(i, j) * count(j, i))),
        );
        weights.extend(self.indexer.iter_triples().map(|(i, j, k)| {
            let wi = count(i, j) + count(i, k);
            let wj = count(j, i) + count(j, k);
            let wk = count(k, i) + count(k, j);
            Weight::from_eighths(3 * wi * wj * wk)
        }));
        TableWeights {
            indexer: self.indexer,
            weights,
        }
    }
}
