use std::future::Future;

use crate::{
    as_the_crow_flies::AsTheCrowFlies,
    coordinate::Coordinate,
    distance_oracle_provider::DistanceOracleProvider,
    oracle::{DistanceOracle, OracleError},
    osrm::{OsrmRouteOracle, OsrmRouteOracleParams},
};

/// Dispatches distance queries to the configured provider.
pub struct DistanceOracleClient {
    provider: DistanceOracleProvider,
    osrm: Option<OsrmRouteOracle>,
}

impl DistanceOracleClient {
    pub fn new(provider: DistanceOracleProvider) -> Self {
        let osrm = match provider {
            DistanceOracleProvider::Osrm { profile } => Some(OsrmRouteOracle::new(
                OsrmRouteOracleParams::from_env(profile),
            )),
            DistanceOracleProvider::AsTheCrowFlies => None,
        };

        Self { provider, osrm }
    }

    pub fn provider(&self) -> DistanceOracleProvider {
        self.provider
    }
}

impl Default for DistanceOracleClient {
    fn default() -> Self {
        Self::new(DistanceOracleProvider::default())
    }
}

impl DistanceOracle for DistanceOracleClient {
    fn distance(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> impl Future<Output = Result<f64, OracleError>> + Send {
        async move {
            match &self.osrm {
                Some(osrm) => osrm.distance(from, to).await,
                None => AsTheCrowFlies.distance(from, to).await,
            }
        }
    }
}
