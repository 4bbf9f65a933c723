use super::HardConstraint;
use crate::{
    model::{EncodingMode, Symbol, TableWeights, Weight},
    sat::{Assignment, Literal, Variable},
};

/// A term of the objective: the coefficient is collected when the variable is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectiveTerm {
    var: Variable,
    coefficient: Weight,
}

impl ObjectiveTerm {
    /// Returns the variable of the term.
    pub fn var(&self) -> Variable {
        self.var
    }

    /// Returns the coefficient of the term.
    pub fn coefficient(&self) -> Weight {
        self.coefficient
    }
}

/// A weighted soft literal: the weight is paid when the literal is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SoftLiteral {
    lit: Literal,
    weight: u64,
}

impl SoftLiteral {
    /// Returns the literal.
    pub fn lit(&self) -> Literal {
        self.lit
    }

    /// Returns the weight paid when the literal is false.
    pub fn weight(&self) -> u64 {
        self.weight
    }
}

/// The objective of a seating model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Objective {
    mode: EncodingMode,
    terms: Vec<ObjectiveTerm>,
    pruned: Vec<Variable>,
    scale: u64,
}

impl Objective {
    /// Returns the encoding mode: in maximizing mode, the sum of the terms must be maximized; in minimizing mode, it must be minimized.
    pub fn mode(&self) -> EncodingMode {
        self.mode
    }

    /// Returns the terms of the objective.
    pub fn terms(&self) -> &[ObjectiveTerm] {
        &self.terms
    }

    /// Returns the unit clauses discarding the tables that cannot contribute to the objective.
    pub fn pruning_constraints(&self) -> Vec<HardConstraint> {
        self.pruned
            .iter()
            .map(|v| HardConstraint::Clause(vec![v.negative()]))
            .collect()
    }

    /// Returns the greatest common divisor of the coefficients, in eighths.
    ///
    /// Soft literal weights are the coefficients divided by this value.
    pub fn scale(&self) -> u64 {
        self.scale
    }

    /// Returns the objective as MaxSAT soft literals, with integral weights divided by [scale](Self::scale).
    ///
    /// Maximizing terms give positive soft literals (the table weight is lost when the table is not chosen);
    /// minimizing terms give negative ones (the deficiency is paid when the table is chosen).
    pub fn soft_literals(&self) -> Vec<SoftLiteral> {
        self.terms
            .iter()
            .map(|t| SoftLiteral {
                lit: match self.mode {
                    EncodingMode::Maximize => t.var.positive(),
                    EncodingMode::Minimize => t.var.negative(),
                },
                weight: t.coefficient.eighths() / self.scale,
            })
            .collect()
    }

    /// Returns the sum of the coefficients of the terms which variable is true.
    pub fn value_of(&self, assignment: &Assignment) -> Weight {
        self.terms
            .iter()
            .filter(|t| assignment.value_of(t.var) == Some(true))
            .map(|t| t.coefficient)
            .sum()
    }

    /// Returns the sum of the weights of the soft literals falsified by the assignment.
    ///
    /// This is the cost a MaxSAT engine reports for this assignment.
    pub fn cost_of(&self, assignment: &Assignment) -> u64 {
        self.soft_literals()
            .iter()
            .filter(|s| !assignment.satisfies(s.lit))
            .map(|s| s.weight)
            .sum()
    }
}

/// Builds the objective terms of a seating model from the table weights.
///
/// In maximizing mode, each table with a positive weight gives a term with this weight.
/// In minimizing mode, each table gives a term with its deficiency (2 minus the weight for pairs, 3 minus the weight for triples) when it is not null.
pub struct ObjectiveBuilder<'a> {
    weights: &'a TableWeights,
    mode: EncodingMode,
    prune_zero_weights: bool,
}

impl<'a> ObjectiveBuilder<'a> {
    /// Builds a new objective builder.
    pub fn new(weights: &'a TableWeights, mode: EncodingMode) -> Self {
        Self {
            weights,
            mode,
            prune_zero_weights: false,
        }
    }

    /// Sets whether the tables with a null weight must be discarded by hard constraints in maximizing mode.
    ///
    /// Pruning reduces the search space, but makes the model unsatisfiable
    /// as soon as the students cannot all be seated at tables of positive weight.
    pub fn with_zero_weight_pruning(mut self, prune: bool) -> Self {
        self.prune_zero_weights = prune;
        self
    }

    /// Builds the objective.
    pub fn build(&self) -> Objective {
        let indexer = self.weights.indexer();
        let mut terms = Vec::new();
        let mut pruned = Vec::new();
        for (var, weight) in self.weights.iter() {
            let coefficient = match self.mode {
                EncodingMode::Maximize => weight,
                EncodingMode::Minimize => {
                    let max = match indexer.symbol_of(var) {
                        Some(Symbol::Pair(_, _)) => Weight::PAIR_MAX,
                        _ => Weight::TRIPLE_MAX,
                    };
                    max.checked_sub(weight).unwrap_or(Weight::ZERO)
                }
            };
            if !coefficient.is_zero() {
                terms.push(ObjectiveTerm { var, coefficient });
            } else if self.mode == EncodingMode::Maximize && self.prune_zero_weights {
                pruned.push(var);
            }
        }
        let scale = terms
            .iter()
            .map(|t| t.coefficient.eighths())
            .fold(0, gcd)
            .max(1);
        Objective {
            mode: self.mode,
            terms,
            pruned,
            scale,
        }
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
