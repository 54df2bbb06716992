use itinera_matrix_providers::distance_matrix::DistanceMatrix;
use serde::Serialize;

use crate::problem::{location::LocationIdx, meters::Meters};

/// An open path over the locations of a matrix, never returning to its start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    path: Vec<LocationIdx>,
    total_distance: Meters,
}

impl Route {
    pub(crate) fn new(path: Vec<LocationIdx>, total_distance: Meters) -> Self {
        Self {
            path,
            total_distance,
        }
    }

    pub(crate) fn from_path(matrix: &DistanceMatrix, path: Vec<LocationIdx>) -> Self {
        let total_distance = path_distance(matrix, &path);
        Self::new(path, total_distance)
    }

    pub fn path(&self) -> &[LocationIdx] {
        &self.path
    }

    pub fn start(&self) -> Option<LocationIdx> {
        self.path.first().copied()
    }

    pub fn total_distance(&self) -> Meters {
        self.total_distance
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// A route stops early when the remaining locations are unreachable, callers
    /// must check this before treating the route as covering every location.
    pub fn is_complete(&self, num_locations: usize) -> bool {
        self.path.len() == num_locations
    }

    pub fn contains(&self, location_id: LocationIdx) -> bool {
        self.path.contains(&location_id)
    }

    /// Consecutive pairs of the path with the matrix distance between them.
    pub fn legs<'a>(
        &'a self,
        matrix: &'a DistanceMatrix,
    ) -> impl Iterator<Item = (LocationIdx, LocationIdx, Meters)> + 'a {
        self.path.windows(2).map(|pair| {
            (
                pair[0],
                pair[1],
                Meters::new(matrix.distance(pair[0].get(), pair[1].get())),
            )
        })
    }
}

pub(crate) fn path_distance(matrix: &DistanceMatrix, path: &[LocationIdx]) -> Meters {
    path.windows(2)
        .map(|pair| Meters::new(matrix.distance(pair[0].get(), pair[1].get())))
        .sum()
}
