pub mod as_the_crow_flies;
pub mod cache;
pub mod coordinate;
pub mod distance_matrix;
pub mod distance_matrix_builder;
pub mod distance_oracle_client;
pub mod distance_oracle_provider;
pub mod oracle;
pub mod osrm;
pub mod throttle;
