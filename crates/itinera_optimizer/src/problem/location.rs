use itinera_matrix_providers::coordinate::Coordinate;
use serde::{Deserialize, Serialize};

use crate::define_index_newtype;

define_index_newtype!(LocationIdx, Location);

/// A named place to visit. Locations are identified by their position in the
/// input list, two locations may share a name or even a coordinate.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Location {
    name: String,
    coordinate: Coordinate,
}

impl Location {
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            coordinate,
        }
    }

    pub fn from_lat_lon(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self::new(name, Coordinate::from_lat_lon(lat, lon))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

impl From<&Location> for geo_types::Point<f64> {
    fn from(location: &Location) -> Self {
        (&location.coordinate).into()
    }
}
