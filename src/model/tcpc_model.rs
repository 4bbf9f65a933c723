use super::{
    errors::{Result, TcpcError},
    preferences::PreferenceGraph,
    variables::VariableIndexer,
    weights::{TableWeights, Weight, WeightCalculator},
};
use crate::{
    encodings::{
        CardinalityEncoding, CnfFormula, ConstraintBuilder, HardConstraint, Objective,
        ObjectiveBuilder,
    },
    sat::Assignment,
};
use std::{fmt::Display, sync::Arc};

/// The way the objective of a model is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingMode {
    /// The sum of the weights of the chosen tables is maximized.
    Maximize,
    /// The sum of the deficiencies of the chosen tables is minimized.
    Minimize,
}

impl EncodingMode {
    /// Returns the dual mode.
    pub fn dual(&self) -> Self {
        match self {
            EncodingMode::Maximize => EncodingMode::Minimize,
            EncodingMode::Minimize => EncodingMode::Maximize,
        }
    }
}

impl TryFrom<&str> for EncodingMode {
    type Error = TcpcError;

    fn try_from(value: &str) -> Result<Self> {
        match value {
            "max" | "maximize" => Ok(EncodingMode::Maximize),
            "min" | "minimize" => Ok(EncodingMode::Minimize),
            _ => Err(TcpcError::InvalidEncodingMode(value.to_string())),
        }
    }
}

impl Display for EncodingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodingMode::Maximize => write!(f, "max"),
            EncodingMode::Minimize => write!(f, "min"),
        }
    }
}

/// Statistics about a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelStats {
    /// the number of students
    pub n_students: usize,
    /// the number of students seated at 2-seat tables
    pub two_seat_count: usize,
    /// the number of pair variables
    pub n_pairs: usize,
    /// the number of triple variables
    pub n_triples: usize,
    /// the total number of variables
    pub n_vars: usize,
    /// the number of hard constraints, before any CNF lowering
    pub n_hard_constraints: usize,
    /// the number of objective terms
    pub n_objective_terms: usize,
}

/// A seating model: variables, hard constraints, and objective.
///
/// The model is immutable once built.
/// Its table weights are computed once and shared with the models derived by [with_mode](Self::with_mode).
///
/// # Example
///
/// ```
/// # use tcpc::model::{EncodingMode, Model, PreferenceGraph};
/// let preferences = PreferenceGraph::new(7);
/// let model = Model::build(&preferences, EncodingMode::Maximize).unwrap();
/// assert_eq!(21 + 35 + 7, model.stats().n_vars);
/// let dual = model.with_mode(EncodingMode::Minimize);
/// assert_eq!(EncodingMode::Minimize, dual.mode());
/// ```
#[derive(Debug, Clone)]
pub struct Model {
    indexer: VariableIndexer,
    weights: Arc<TableWeights>,
    zero_weight_pruning: bool,
    hard_constraints: Vec<HardConstraint>,
    objective: Objective,
}

impl Model {
    /// Builds the model of a class given its preferences and an encoding mode.
    ///
    /// Fails with [TcpcError::InvalidSize] if the class size is not valid.
    pub fn build(preferences: &PreferenceGraph, mode: EncodingMode) -> Result<Self> {
        Self::build_with_options(preferences, mode, false)
    }

    /// Builds a model like [build](Self::build), setting whether null-weight tables are discarded in maximizing mode.
    ///
    /// See [ObjectiveBuilder::with_zero_weight_pruning] for the consequences of pruning.
    pub fn build_with_options(
        preferences: &PreferenceGraph,
        mode: EncodingMode,
        zero_weight_pruning: bool,
    ) -> Result<Self> {
        let indexer = VariableIndexer::new(preferences.n_students())?;
        let weights = Arc::new(WeightCalculator::new(preferences, indexer).compute());
        Ok(Self::build_from_weights(weights, mode, zero_weight_pruning))
    }

    fn build_from_weights(
        weights: Arc<TableWeights>,
        mode: EncodingMode,
        zero_weight_pruning: bool,
    ) -> Self {
        let indexer = *weights.indexer();
        let objective = ObjectiveBuilder::new(&weights, mode)
            .with_zero_weight_pruning(zero_weight_pruning)
            .build();
        let mut hard_constraints = ConstraintBuilder::new(&indexer).build();
        hard_constraints.append(&mut objective.pruning_constraints());
        Self {
            indexer,
            weights,
            zero_weight_pruning,
            hard_constraints,
            objective,
        }
    }

    /// Builds the model of the same class with another encoding mode, reusing the table weights.
    pub fn with_mode(&self, mode: EncodingMode) -> Self {
        Self::build_from_weights(Arc::clone(&self.weights), mode, self.zero_weight_pruning)
    }

    /// Returns the variable indexer.
    pub fn indexer(&self) -> &VariableIndexer {
        &self.indexer
    }

    /// Returns the table weights.
    pub fn weights(&self) -> &TableWeights {
        &self.weights
    }

    /// Returns the encoding mode.
    pub fn mode(&self) -> EncodingMode {
        self.objective.mode()
    }

    /// Returns the hard constraints, in solver-neutral form.
    pub fn hard_constraints(&self) -> &[HardConstraint] {
        &self.hard_constraints
    }

    /// Returns the objective.
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Lowers the hard constraints to CNF.
    ///
    /// The auxiliary variables of the cardinality encodings are numbered after the model variables.
    pub fn hard_clauses(&self, encoding: CardinalityEncoding) -> CnfFormula {
        let mut formula = CnfFormula::new(self.indexer.n_vars());
        self.hard_constraints
            .iter()
            .for_each(|c| c.encode(encoding, &mut formula));
        formula
    }

    /// Returns `true` iff the assignment satisfies every hard constraint.
    pub fn is_satisfied_by(&self, assignment: &Assignment) -> bool {
        self.hard_constraints
            .iter()
            .all(|c| c.is_satisfied_by(|l| assignment.satisfies(l)))
    }

    /// Returns the value of the objective for an assignment (weights in maximizing mode, deficiencies in minimizing mode).
    pub fn objective_value(&self, assignment: &Assignment) -> Weight {
        self.objective.value_of(assignment)
    }

    /// Returns statistics about this model.
    pub fn stats(&self) -> ModelStats {
        ModelStats {
            n_students: self.indexer.n_students(),
            two_seat_count: self.indexer.two_seat_count(),
            n_pairs: self.indexer.n_pairs(),
            n_triples: self.indexer.n_triples(),
            n_vars: self.indexer.n_vars(),
            n_hard_constraints: self.hard_constraints.len(),
            n_objective_terms: self.objective.terms().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::{CadicalSolver, SatSolver};

    fn grouped_preferences() -> PreferenceGraph {
        PreferenceGraph::new_with_preferences(
            7,
            &[
                (1, vec![2]),
                (2, vec![1]),
                (3, vec![4]),
                (4, vec![3]),
                (5, vec![6, 7]),
                (6, vec![5, 7]),
                (7, vec![5, 6]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(Ok(EncodingMode::Maximize), EncodingMode::try_from("max"));
        assert_eq!(Ok(EncodingMode::Minimize), EncodingMode::try_from("minimize"));
        assert_eq!(
            Err(TcpcError::InvalidEncodingMode("avg".to_string())),
            EncodingMode::try_from("avg")
        );
        assert_eq!("min", EncodingMode::Maximize.dual().to_string());
    }

    #[test]
    fn test_invalid_size() {
        assert!(matches!(
            Model::build(&PreferenceGraph::new(8), EncodingMode::Maximize),
            Err(TcpcError::InvalidSize { n_students: 8, .. })
        ));
    }

    #[test]
    fn test_with_mode_shares_weights() {
        let model = Model::build(&grouped_preferences(), EncodingMode::Maximize).unwrap();
        let dual = model.with_mode(EncodingMode::Minimize);
        assert!(Arc::ptr_eq(&model.weights, &dual.weights));
        assert_eq!(model.stats().n_vars, dual.stats().n_vars);
        assert_eq!(6, model.stats().n_objective_terms);
        assert_eq!(50, dual.stats().n_objective_terms);
    }

    #[test]
    fn test_pruning_adds_unit_constraints() {
        let preferences = grouped_preferences();
        let model = Model::build(&preferences, EncodingMode::Maximize).unwrap();
        let pruned =
            Model::build_with_options(&preferences, EncodingMode::Maximize, true).unwrap();
        assert_eq!(
            model.stats().n_hard_constraints + 50,
            pruned.stats().n_hard_constraints
        );
        assert_eq!(
            model.stats().n_hard_constraints,
            pruned.with_mode(EncodingMode::Minimize).stats().n_hard_constraints
        );
    }

    #[test]
    fn test_hard_clauses_models_are_valid_seatings() {
        for encoding in [CardinalityEncoding::SequentialCounter, CardinalityEncoding::Pairwise] {
            let model = Model::build(&PreferenceGraph::new(7), EncodingMode::Maximize).unwrap();
            let formula = model.hard_clauses(encoding);
            assert!(formula.n_vars() >= model.indexer().n_vars());
            let mut solver = CadicalSolver::default();
            formula.load_into(&mut solver);
            let assignment = solver.solve().unwrap_model().unwrap();
            assert!(model.is_satisfied_by(&assignment));
            let n_seats = model
                .indexer()
                .iter_students()
                .filter(|s| assignment.value_of(model.indexer().seat_var(*s)) == Some(true))
                .count();
            assert_eq!(4, n_seats);
        }
    }

    #[test]
    fn test_pruned_empty_preferences_is_unsat() {
        let model =
            Model::build_with_options(&PreferenceGraph::new(7), EncodingMode::Maximize, true)
                .unwrap();
        let mut solver = CadicalSolver::default();
        model
            .hard_clauses(CardinalityEncoding::default())
            .load_into(&mut solver);
        assert!(solver.solve().unwrap_model().is_none());
    }
}
