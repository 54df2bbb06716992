use std::time::Duration;

use anyhow::Context;
use itinera_geocoding::{
    nominatim::{NominatimResolver, NominatimResolverParams},
    resolver::LocationResolver,
};
use itinera_matrix_providers::throttle::{FixedInterval, Throttle};
use itinera_optimizer::problem::location::Location;

// The public Nominatim instance allows one request per second
const NOMINATIM_INTERVAL: Duration = Duration::from_secs(1);

pub async fn resolve_locations(names: &[String]) -> Result<Vec<Location>, anyhow::Error> {
    let resolver = NominatimResolver::new(NominatimResolverParams::india_from_env());
    let throttle = FixedInterval::new(NOMINATIM_INTERVAL);

    resolve_with(&resolver, &throttle, names).await
}

async fn resolve_with<R, T>(
    resolver: &R,
    throttle: &T,
    names: &[String],
) -> Result<Vec<Location>, anyhow::Error>
where
    R: LocationResolver,
    T: Throttle,
{
    let mut locations = Vec::with_capacity(names.len());

    for name in names {
        let _guard = throttle.acquire().await;
        let coordinate = resolver
            .resolve(name)
            .await
            .with_context(|| format!("Could not resolve {:?}", name))?;

        locations.push(Location::new(name.trim(), coordinate));
    }

    Ok(locations)
}

#[cfg(test)]
mod tests {
    use itinera_geocoding::resolver::GeocodingError;
    use itinera_matrix_providers::{coordinate::Coordinate, throttle::Unthrottled};

    use super::*;

    struct FixedResolver;

    impl LocationResolver for FixedResolver {
        async fn resolve(&self, name: &str) -> Result<Coordinate, GeocodingError> {
            match name.trim() {
                "Delhi" => Ok(Coordinate::from_lat_lon(28.6139, 77.209)),
                "Agra" => Ok(Coordinate::from_lat_lon(27.1767, 78.0081)),
                other => Err(GeocodingError::NotFound(other.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_resolve_keeps_order_and_duplicates() {
        let names = vec![
            "Delhi".to_string(),
            " Agra ".to_string(),
            "Delhi".to_string(),
        ];

        let locations = resolve_with(&FixedResolver, &Unthrottled, &names)
            .await
            .unwrap();

        assert_eq!(
            locations.iter().map(|l| l.name()).collect::<Vec<_>>(),
            vec!["Delhi", "Agra", "Delhi"]
        );
        assert_eq!(locations[0].coordinate(), locations[2].coordinate());
    }

    #[tokio::test]
    async fn test_unknown_city_fails() {
        let names = vec!["Delhi".to_string(), "Atlantis".to_string()];

        let err = resolve_with(&FixedResolver, &Unthrottled, &names)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Atlantis"));
    }
}
