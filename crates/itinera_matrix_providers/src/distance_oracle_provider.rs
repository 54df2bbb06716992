use serde::{Deserialize, Serialize};

use crate::osrm::OsrmProfile;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DistanceOracleProvider {
    /// http://project-osrm.org/docs/v5.24.0/api/#route-service
    Osrm { profile: OsrmProfile },
    AsTheCrowFlies,
}

impl Default for DistanceOracleProvider {
    fn default() -> Self {
        DistanceOracleProvider::Osrm {
            profile: OsrmProfile::Driving,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_provider() {
        let provider: DistanceOracleProvider =
            serde_json::from_str(r#"{"type":"osrm","profile":"cycling"}"#).unwrap();
        assert_eq!(
            provider,
            DistanceOracleProvider::Osrm {
                profile: OsrmProfile::Cycling
            }
        );

        let provider: DistanceOracleProvider =
            serde_json::from_str(r#"{"type":"as_the_crow_flies"}"#).unwrap();
        assert_eq!(provider, DistanceOracleProvider::AsTheCrowFlies);
    }
}
