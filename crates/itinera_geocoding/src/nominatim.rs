use std::future::Future;

use itinera_matrix_providers::coordinate::Coordinate;
use serde::Deserialize;
use tracing::debug;

use crate::{
    bounding_box::BoundingBox,
    resolver::{GeocodingError, LocationResolver},
};

const NOMINATIM_URL_ENV_VAR: &str = "ITINERA_NOMINATIM_URL";

pub const NOMINATIM_PUBLIC_URL: &str = "https://nominatim.openstreetmap.org";
pub const NOMINATIM_SEARCH_API_PATH: &str = "/search";

#[derive(Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

#[derive(Debug, Clone)]
pub struct NominatimResolverParams {
    pub nominatim_url: String,
    /// Appended to every query, e.g. `Pune,India`
    pub country: Option<String>,
    /// ISO 3166-1 alpha-2 codes restricting the search
    pub country_codes: Option<String>,
    pub bounds: Option<BoundingBox>,
    /// Nominatim's usage policy requires an identifying user agent
    pub user_agent: String,
}

impl NominatimResolverParams {
    /// Searches restricted to India, against `ITINERA_NOMINATIM_URL` or the public server.
    pub fn india_from_env() -> Self {
        Self {
            nominatim_url: std::env::var(NOMINATIM_URL_ENV_VAR)
                .unwrap_or_else(|_| NOMINATIM_PUBLIC_URL.to_string()),
            country: Some("India".to_string()),
            country_codes: Some("in".to_string()),
            bounds: Some(BoundingBox::INDIA),
            user_agent: format!("itinera/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

pub struct NominatimResolver {
    params: NominatimResolverParams,
    client: reqwest::Client,
}

impl NominatimResolver {
    pub fn new(params: NominatimResolverParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    fn search_query(&self, name: &str) -> Vec<(&'static str, String)> {
        let q = match &self.params.country {
            Some(country) => format!("{},{}", name, country),
            None => name.to_string(),
        };

        let mut query = vec![
            ("q", q),
            ("format", "json".to_string()),
            ("limit", "1".to_string()),
        ];

        if let Some(country_codes) = &self.params.country_codes {
            query.push(("countrycodes", country_codes.clone()));
        }

        query
    }

    async fn search(&self, name: &str) -> Result<Coordinate, GeocodingError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(GeocodingError::NotFound(name.to_string()));
        }

        let mut url = self.params.nominatim_url.trim_end_matches('/').to_string();
        url.push_str(NOMINATIM_SEARCH_API_PATH);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.params.user_agent)
            .query(&self.search_query(name))
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let coordinate = parse_search_response(name, &body)?;

        debug!("NominatimResolver: {} resolved to {}", name, coordinate);

        match &self.params.bounds {
            Some(bounds) if !bounds.contains(&coordinate) => Err(GeocodingError::OutOfBounds {
                name: name.to_string(),
                lat: coordinate.lat(),
                lon: coordinate.lon(),
            }),
            _ => Ok(coordinate),
        }
    }
}

fn parse_search_response(name: &str, body: &str) -> Result<Coordinate, GeocodingError> {
    let places: Vec<NominatimPlace> = serde_json::from_str(body)
        .map_err(|err| GeocodingError::MalformedResponse(err.to_string()))?;

    let place = places
        .first()
        .ok_or_else(|| GeocodingError::NotFound(name.to_string()))?;

    let parse = |value: &str| {
        value
            .parse::<f64>()
            .map_err(|err| GeocodingError::MalformedResponse(format!("{}: {}", value, err)))
    };

    Ok(Coordinate::from_lat_lon(parse(place.lat.as_str())?, parse(place.lon.as_str())?))
}

impl LocationResolver for NominatimResolver {
    fn resolve(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Coordinate, GeocodingError>> + Send {
        self.search(name)
    }
}
