//! Engines computing seatings from models.

mod external_maxsat_engine;
pub use external_maxsat_engine::ExternalMaxSatEngine;

mod linear_search_engine;
pub use linear_search_engine::LinearSearchEngine;

mod perfect_seating_solver;
pub use perfect_seating_solver::PerfectSeatingSolver;

mod specs;
pub use specs::EngineResult;
pub use specs::EngineStatus;
pub use specs::OptimizationEngine;
