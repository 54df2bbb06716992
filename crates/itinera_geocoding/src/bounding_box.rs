use itinera_matrix_providers::coordinate::Coordinate;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Approximate extent of India.
    pub const INDIA: BoundingBox = BoundingBox {
        min_lat: 6.0,
        max_lat: 35.5,
        min_lon: 68.7,
        max_lon: 97.25,
    };

    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coordinate.lat())
            && (self.min_lon..=self.max_lon).contains(&coordinate.lon())
    }
}
