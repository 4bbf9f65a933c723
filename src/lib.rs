//! TCPC seats the students of a classroom at 2-seat and 3-seat tables, maximizing their satisfaction with their tablemates.
//!
//! Preferences are turned into a constraint [Model](model::Model) whose objective is optimized by SAT-based or external MaxSAT engines,
//! and the engine assignments are decoded back into [Seatings](model::Seating).

#![warn(missing_docs)]

pub mod encodings;

pub mod io;

pub mod model;

pub mod sat;

pub mod solvers;

pub mod utils;
