//! The seating model: preferences, variables, weights, model building and solution decoding.

mod errors;
pub use errors::Result;
pub use errors::TcpcError;

mod preferences;
pub use preferences::PreferenceGraph;
pub use preferences::MAX_STUDENTS;
pub use preferences::Student;

mod solution_decoder;
pub use solution_decoder::Seating;
pub use solution_decoder::SolutionDecoder;
pub use solution_decoder::Table;

mod tcpc_model;
pub use tcpc_model::EncodingMode;
pub use tcpc_model::Model;
pub use tcpc_model::ModelStats;

mod variables;
pub use variables::check_class_size;
pub use variables::two_seat_count;
pub use variables::Symbol;
pub use variables::VariableIndexer;

mod weights;
pub use weights::TableWeights;
pub use weights::Weight;
pub use weights::WeightCalculator;
