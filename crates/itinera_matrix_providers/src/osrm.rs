use std::{fmt::Display, future::Future};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    coordinate::Coordinate,
    oracle::{DistanceOracle, OracleError},
};

const OSRM_URL_ENV_VAR: &str = "ITINERA_OSRM_URL";

pub const OSRM_PUBLIC_URL: &str = "https://router.project-osrm.org";
pub const OSRM_ROUTE_API_PATH: &str = "/route/v1/";

#[derive(Deserialize, Serialize, Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OsrmProfile {
    #[default]
    Driving,
    Cycling,
    Walking,
}

impl Display for OsrmProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                OsrmProfile::Driving => "driving",
                OsrmProfile::Cycling => "cycling",
                OsrmProfile::Walking => "walking",
            }
        )
    }
}

#[derive(Deserialize)]
struct OsrmRoute {
    /// Distance in meters
    distance: f64,
}

#[derive(Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Clone)]
pub struct OsrmRouteOracleParams {
    pub osrm_url: String,
    pub profile: OsrmProfile,
}

impl OsrmRouteOracleParams {
    /// Uses `ITINERA_OSRM_URL` when set, the public demo server otherwise.
    pub fn from_env(profile: OsrmProfile) -> Self {
        Self {
            osrm_url: std::env::var(OSRM_URL_ENV_VAR)
                .unwrap_or_else(|_| OSRM_PUBLIC_URL.to_string()),
            profile,
        }
    }
}

pub struct OsrmRouteOracle {
    params: OsrmRouteOracleParams,
    client: reqwest::Client,
}

impl OsrmRouteOracle {
    pub fn new(params: OsrmRouteOracleParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    fn route_url(&self, from: Coordinate, to: Coordinate) -> String {
        let mut url = self.params.osrm_url.trim_end_matches('/').to_string();
        url.push_str(OSRM_ROUTE_API_PATH);
        url.push_str(&format!("{}/{};{}", self.params.profile, from, to));
        url
    }

    async fn fetch_distance(&self, from: Coordinate, to: Coordinate) -> Result<f64, OracleError> {
        let response = self
            .client
            .get(self.route_url(from, to))
            .query(&[("overview", "false"), ("alternatives", "false")])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("OsrmRouteOracle: {} -> {} answered with HTTP {}", from, to, status);

        parse_route_response(status, &body, from, to)
    }
}

/// OSRM answers a missing route with `NoRoute` (and an unsnappable coordinate
/// with `NoSegment`), usually alongside an HTTP 400.
fn parse_route_response(
    status: u16,
    body: &str,
    from: Coordinate,
    to: Coordinate,
) -> Result<f64, OracleError> {
    let response: OsrmRouteResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(_) if !(200..300).contains(&status) => {
            return Err(OracleError::Service(format!("HTTP {}", status)));
        }
        Err(err) => return Err(OracleError::MalformedResponse(err.to_string())),
    };

    match response.code.as_str() {
        "Ok" => response
            .routes
            .first()
            .map(|route| route.distance)
            .ok_or(OracleError::Unreachable(from, to)),
        "NoRoute" | "NoSegment" => Err(OracleError::Unreachable(from, to)),
        code => Err(OracleError::Service(format!(
            "{}: {}",
            code,
            response.message.unwrap_or_default()
        ))),
    }
}

impl DistanceOracle for OsrmRouteOracle {
    fn distance(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> impl Future<Output = Result<f64, OracleError>> + Send {
        self.fetch_distance(from, to)
    }
}
