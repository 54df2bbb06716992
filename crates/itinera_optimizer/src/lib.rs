pub mod problem;
pub mod solver;
pub mod trip_planner;
mod utils;
