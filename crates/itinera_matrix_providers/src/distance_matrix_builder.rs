use fxhash::FxHashMap;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::{
    cache::{DistanceCache, PairKey},
    coordinate::Coordinate,
    distance_matrix::{Distance, DistanceMatrix, MatrixError},
    oracle::DistanceOracle,
    throttle::Throttle,
};

/// Builds symmetric distance matrices from pairwise oracle queries.
///
/// Every unordered pair is looked up in the cache first. The remaining pairs are
/// resolved concurrently, each call going through the throttle. A failed pair
/// ends up as `f64::INFINITY` in the matrix and never aborts the build.
pub struct DistanceMatrixBuilder<'a, O, C, T> {
    oracle: &'a O,
    cache: &'a C,
    throttle: &'a T,
}

impl<'a, O, C, T> DistanceMatrixBuilder<'a, O, C, T>
where
    O: DistanceOracle,
    C: DistanceCache,
    T: Throttle,
{
    pub fn new(oracle: &'a O, cache: &'a C, throttle: &'a T) -> Self {
        Self {
            oracle,
            cache,
            throttle,
        }
    }

    pub async fn build<P>(&self, points: &[P]) -> Result<DistanceMatrix, MatrixError>
    where
        for<'p> &'p P: Into<geo_types::Point>,
    {
        if points.is_empty() {
            return Err(MatrixError::InvalidArgument(
                "cannot build a distance matrix without locations".to_string(),
            ));
        }

        let coordinates: Vec<Coordinate> = points
            .iter()
            .map(|point| {
                let point: geo_types::Point = point.into();
                Coordinate::from(point)
            })
            .collect();
        let num_locations = coordinates.len();

        let mut matrix = DistanceMatrix::zeroed(num_locations);

        // Pairs sharing a key (duplicated coordinates) are resolved once
        let mut pending: FxHashMap<PairKey, Vec<(usize, usize)>> = FxHashMap::default();
        let mut cache_hits = 0;

        for i in 0..num_locations {
            for j in (i + 1)..num_locations {
                let key = PairKey::new(coordinates[i], coordinates[j]);

                if let Some(distance) = self.cache.get(&key) {
                    matrix.set_symmetric(i, j, distance);
                    cache_hits += 1;
                } else {
                    pending.entry(key).or_default().push((i, j));
                }
            }
        }

        debug!(
            "DistanceMatrixBuilder: {} locations, {} cached pairs, {} pairs to resolve",
            num_locations,
            cache_hits,
            pending.len()
        );

        let resolved = join_all(pending.into_iter().map(|(key, cells)| async move {
            let distance = self.resolve(key).await;
            (cells, distance)
        }))
        .await;

        for (cells, distance) in resolved {
            for (i, j) in cells {
                matrix.set_symmetric(i, j, distance);
            }
        }

        Ok(matrix)
    }

    async fn resolve(&self, key: PairKey) -> Distance {
        let (from, to) = key.endpoints();

        let result = {
            let _guard = self.throttle.acquire().await;
            self.oracle.distance(from, to).await
        };

        match result {
            Ok(distance) if distance >= 0.0 => {
                self.cache.insert(key, distance);
                distance
            }
            Ok(distance) => {
                warn!("Invalid distance {} between {} and {}", distance, from, to);
                f64::INFINITY
            }
            Err(err) if err.is_definitive() => {
                debug!("{}", err);
                self.cache.insert(key, f64::INFINITY);
                f64::INFINITY
            }
            Err(err) => {
                warn!("Failed to resolve distance between {} and {}: {}", from, to, err);
                f64::INFINITY
            }
        }
    }
}
