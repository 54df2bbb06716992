use fixedbitset::FixedBitSet;
use itinera_matrix_providers::distance_matrix::DistanceMatrix;
use thiserror::Error;

use crate::{
    problem::{location::LocationIdx, meters::Meters},
    solver::route::Route,
};

#[derive(Debug, Error, PartialEq)]
pub enum SequenceError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// **Nearest Neighbor**
///
/// Greedy construction of a visiting order: from `start`, always move to the
/// closest location not visited yet. This is a heuristic and does not
/// guarantee the shortest possible route.
///
/// Ties go to the lowest index. When every remaining location is unreachable
/// from the current one the route stops there and is returned incomplete.
pub fn nearest_neighbor_route(
    matrix: &DistanceMatrix,
    start: LocationIdx,
) -> Result<Route, SequenceError> {
    let num_locations = matrix.num_locations();

    if num_locations == 0 {
        return Err(SequenceError::InvalidArgument(
            "cannot sequence an empty distance matrix".to_string(),
        ));
    }

    if !start.is_within(num_locations) {
        return Err(SequenceError::InvalidArgument(format!(
            "start location {} is out of range for {} locations",
            start, num_locations
        )));
    }

    let mut visited = FixedBitSet::with_capacity(num_locations);
    let mut path = Vec::with_capacity(num_locations);
    let mut total_distance = Meters::ZERO;

    let mut current = start;
    visited.insert(current.get());
    path.push(current);

    while path.len() < num_locations {
        let Some((next, distance)) = nearest_unvisited(matrix.row(current.get()), &visited) else {
            break;
        };

        visited.insert(next);
        current = LocationIdx::new(next);
        path.push(current);
        total_distance += Meters::new(distance);
    }

    Ok(Route::new(path, total_distance))
}

fn nearest_unvisited(row: &[f64], visited: &FixedBitSet) -> Option<(usize, f64)> {
    let mut nearest = None;
    let mut shortest = f64::INFINITY;

    // Strict comparison in ascending order keeps the lowest index on ties
    for index in visited.zeroes() {
        let distance = row[index];
        if distance < shortest {
            shortest = distance;
            nearest = Some(index);
        }
    }

    nearest.map(|index| (index, shortest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::route::path_distance;

    const INF: f64 = f64::INFINITY;

    fn ids(path: &[usize]) -> Vec<LocationIdx> {
        path.iter().copied().map(LocationIdx::new).collect()
    }

    fn four_cities() -> DistanceMatrix {
        // A-B=10, A-C=15, A-D=20, B-C=35, B-D=25, C-D=30
        DistanceMatrix::from_rows(vec![
            vec![0.0, 10.0, 15.0, 20.0],
            vec![10.0, 0.0, 35.0, 25.0],
            vec![15.0, 35.0, 0.0, 30.0],
            vec![20.0, 25.0, 30.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_four_cities_from_a() {
        let matrix = four_cities();
        let route = nearest_neighbor_route(&matrix, LocationIdx::new(0)).unwrap();

        // A -> B (10), B -> D (25) beats B -> C (35), D -> C (30)
        assert_eq!(route.path(), ids(&[0, 1, 3, 2]));
        assert_eq!(route.total_distance(), Meters::new(65.0));
        assert!(route.is_complete(4));
    }

    #[test]
    fn test_total_distance_matches_path() {
        let matrix = four_cities();

        for start in 0..4 {
            let route = nearest_neighbor_route(&matrix, LocationIdx::new(start)).unwrap();

            assert_eq!(route.start(), Some(LocationIdx::new(start)));
            assert_eq!(route.total_distance(), path_distance(&matrix, route.path()));

            let mut sorted = route.path().to_vec();
            sorted.sort();
            assert_eq!(sorted, ids(&[0, 1, 2, 3]));
        }
    }

    #[test]
    fn test_nearest_neighbor_is_not_optimal() {
        // Points on a line at 0, 1, -2 and 4
        let positions = [0.0f64, 1.0, -2.0, 4.0];
        let rows = positions
            .iter()
            .map(|a| positions.iter().map(|b| (a - b).abs()).collect())
            .collect();
        let matrix = DistanceMatrix::from_rows(rows).unwrap();

        let route = nearest_neighbor_route(&matrix, LocationIdx::new(0)).unwrap();

        // From 1, both 2 and 3 are 3 away: the lower index wins
        assert_eq!(route.path(), ids(&[0, 1, 2, 3]));
        assert_eq!(route.total_distance(), Meters::new(10.0));
        // 0 -> 2 -> 1 -> 3 would only be 8
        assert!(path_distance(&matrix, &ids(&[0, 2, 1, 3])) < route.total_distance());
    }

    #[test]
    fn test_ties_go_to_lowest_index() {
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0.0, 5.0, 5.0, 5.0],
            vec![5.0, 0.0, 7.0, 7.0],
            vec![5.0, 7.0, 0.0, 7.0],
            vec![5.0, 7.0, 7.0, 0.0],
        ])
        .unwrap();

        let first = nearest_neighbor_route(&matrix, LocationIdx::new(0)).unwrap();
        assert_eq!(first.path(), ids(&[0, 1, 2, 3]));

        for _ in 0..10 {
            let route = nearest_neighbor_route(&matrix, LocationIdx::new(0)).unwrap();
            assert_eq!(route, first);
        }

        let from_last = nearest_neighbor_route(&matrix, LocationIdx::new(3)).unwrap();
        assert_eq!(from_last.path(), ids(&[3, 0, 1, 2]));
    }

    #[test]
    fn test_unreachable_location_is_left_out() {
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0.0, 10.0, INF, 20.0],
            vec![10.0, 0.0, INF, 25.0],
            vec![INF, INF, 0.0, INF],
            vec![20.0, 25.0, INF, 0.0],
        ])
        .unwrap();

        let route = nearest_neighbor_route(&matrix, LocationIdx::new(0)).unwrap();

        assert_eq!(route.path(), ids(&[0, 1, 3]));
        assert_eq!(route.len(), 3);
        assert!(!route.is_complete(4));
        assert!(!route.contains(LocationIdx::new(2)));
        assert_eq!(route.total_distance(), Meters::new(35.0));
    }

    #[test]
    fn test_unreachable_start_stays_alone() {
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0.0, INF, INF],
            vec![INF, 0.0, 1.0],
            vec![INF, 1.0, 0.0],
        ])
        .unwrap();

        let route = nearest_neighbor_route(&matrix, LocationIdx::new(0)).unwrap();

        assert_eq!(route.path(), ids(&[0]));
        assert_eq!(route.total_distance(), Meters::ZERO);
    }

    #[test]
    fn test_single_location() {
        let matrix = DistanceMatrix::from_rows(vec![vec![0.0]]).unwrap();
        let route = nearest_neighbor_route(&matrix, LocationIdx::new(0)).unwrap();

        assert_eq!(route.path(), ids(&[0]));
        assert_eq!(route.total_distance(), Meters::ZERO);
        assert!(route.is_complete(1));
    }

    #[test]
    fn test_invalid_arguments() {
        let matrix = four_cities();
        assert!(matches!(
            nearest_neighbor_route(&matrix, LocationIdx::new(4)),
            Err(SequenceError::InvalidArgument(_))
        ));

        let empty = DistanceMatrix::from_rows(vec![]).unwrap();
        assert!(matches!(
            nearest_neighbor_route(&empty, LocationIdx::new(0)),
            Err(SequenceError::InvalidArgument(_))
        ));
    }
}
