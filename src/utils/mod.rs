//! Utility objects shared by the engines.

pub(crate) mod process_runner;

mod stop_condition;
pub use stop_condition::StopCondition;
