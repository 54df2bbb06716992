use std::future::Future;

use itinera_matrix_providers::coordinate::Coordinate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeocodingError {
    #[error("Location not found: {0}")]
    NotFound(String),

    #[error("Location {name} ({lat}, {lon}) is outside the supported region")]
    OutOfBounds { name: String, lat: f64, lon: f64 },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Turns a free-text place name into a coordinate.
pub trait LocationResolver: Send + Sync {
    fn resolve(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Coordinate, GeocodingError>> + Send;
}
