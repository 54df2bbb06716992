use std::future::Future;

use geo::{Distance, Haversine};

use crate::{
    coordinate::Coordinate,
    oracle::{DistanceOracle, OracleError},
};

/// Great-circle distance, useful offline or when no routing service is reachable.
#[derive(Debug, Default, Clone, Copy)]
pub struct AsTheCrowFlies;

pub fn haversine_distance<P>(from: P, to: P) -> f64
where
    P: Into<geo_types::Point>,
{
    Haversine.distance(from.into(), to.into())
}

impl DistanceOracle for AsTheCrowFlies {
    fn distance(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> impl Future<Output = Result<f64, OracleError>> + Send {
        std::future::ready(Ok(haversine_distance(from, to)))
    }
}
