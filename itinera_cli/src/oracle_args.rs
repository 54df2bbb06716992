use std::time::Duration;

use clap::{Args, ValueEnum};
use itinera_matrix_providers::{
    distance_oracle_client::DistanceOracleClient, distance_oracle_provider::DistanceOracleProvider,
    osrm::OsrmProfile, throttle::ThrottlePolicy,
};

use crate::parsers;

#[derive(Clone, Copy, ValueEnum)]
pub enum OracleKind {
    /// Road distances from an OSRM route service
    Osrm,
    /// Great-circle distances, no network needed
    Crow,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ProfileArg {
    Driving,
    Cycling,
    Walking,
}

#[derive(Args)]
pub struct OracleArgs {
    #[arg(long, value_enum, default_value = "osrm")]
    oracle: OracleKind,

    #[arg(long, value_enum, default_value = "driving")]
    profile: ProfileArg,

    /// Minimum spacing between two distance queries (e.g., "1s", "500ms")
    #[arg(long, value_parser = parsers::parse_duration)]
    min_interval: Option<Duration>,

    /// Maximum number of distance queries in flight, 0 for no limit
    #[arg(long, default_value_t = 4)]
    max_concurrency: usize,
}

impl OracleArgs {
    pub fn provider(&self) -> DistanceOracleProvider {
        match self.oracle {
            OracleKind::Osrm => DistanceOracleProvider::Osrm {
                profile: match self.profile {
                    ProfileArg::Driving => OsrmProfile::Driving,
                    ProfileArg::Cycling => OsrmProfile::Cycling,
                    ProfileArg::Walking => OsrmProfile::Walking,
                },
            },
            OracleKind::Crow => DistanceOracleProvider::AsTheCrowFlies,
        }
    }

    pub fn client(&self) -> DistanceOracleClient {
        DistanceOracleClient::new(self.provider())
    }

    pub fn throttle(&self) -> ThrottlePolicy {
        let max_in_flight = (self.max_concurrency > 0).then_some(self.max_concurrency);
        ThrottlePolicy::new(self.min_interval, max_in_flight)
    }
}
