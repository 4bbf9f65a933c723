//! Objects used to encode the seating problem into solver-neutral constraints and CNF.

mod cardinality;
pub use cardinality::CardinalityEncoding;

mod cnf_formula;
pub use cnf_formula::CnfFormula;

mod constraints_builder;
pub use constraints_builder::ConstraintBuilder;
pub use constraints_builder::HardConstraint;

mod objective_builder;
pub use objective_builder::Objective;
pub use objective_builder::ObjectiveBuilder;
pub use objective_builder::ObjectiveTerm;
pub use objective_builder::SoftLiteral;

mod totalizer;
pub use totalizer::GeneralizedTotalizer;
