pub mod nearest_neighbor;
pub mod route;
pub mod two_opt;
