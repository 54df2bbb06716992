use std::{future::Future, sync::Arc};

use thiserror::Error;

use crate::coordinate::Coordinate;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("No route between {0} and {1}")]
    Unreachable(Coordinate, Coordinate),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl OracleError {
    /// A definitive answer will not change when asked again, it is safe to memoize.
    pub fn is_definitive(&self) -> bool {
        matches!(self, OracleError::Unreachable(..))
    }
}

/// Resolves the travel distance in meters between two coordinates.
pub trait DistanceOracle: Send + Sync {
    fn distance(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> impl Future<Output = Result<f64, OracleError>> + Send;
}

impl<O> DistanceOracle for Arc<O>
where
    O: DistanceOracle + ?Sized,
{
    fn distance(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> impl Future<Output = Result<f64, OracleError>> + Send {
        (**self).distance(from, to)
    }
}
