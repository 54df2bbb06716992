use itinera_matrix_providers::distance_matrix::DistanceMatrix;
use tracing::debug;

use crate::{problem::location::LocationIdx, solver::route::Route};

const IMPROVEMENT_EPSILON: f64 = 1e-9;

/// **Open Path 2-Opt**
///
/// Reverses the sequence of locations between `from` and `to` (inclusive)
/// whenever doing so shortens the path. The start of the route never moves and
/// the last location has no successor.
///
/// ```text
/// BEFORE:
///    ... (prev) --x--> [from] -> ... -> [to] --x--> (next) ...
///
/// AFTER (Sequence Reversed):
///    ... (prev) -----> [to] -> ... -> [from] -----> (next) ...
/// ```
///
/// Only valid on symmetric matrices, where the reversed inner segment keeps its
/// length. Asymmetric matrices and incomplete routes are returned unchanged.
pub fn improve_with_two_opt(matrix: &DistanceMatrix, route: &Route) -> Route {
    let num_locations = matrix.num_locations();

    if route.len() < 3 || !route.is_complete(num_locations) || !matrix.is_symmetric() {
        return route.clone();
    }

    let mut path = route.path().to_vec();
    let mut iterations = 0;

    while let Some((from, to)) = find_improving_move(matrix, &path) {
        path[from..=to].reverse();
        iterations += 1;
    }

    let improved = Route::from_path(matrix, path);

    debug!(
        "2-opt: {} moves, {} -> {}",
        iterations,
        route.total_distance(),
        improved.total_distance()
    );

    improved
}

fn find_improving_move(matrix: &DistanceMatrix, path: &[LocationIdx]) -> Option<(usize, usize)> {
    let distance = |a: LocationIdx, b: LocationIdx| matrix.distance(a.get(), b.get());

    for from in 1..path.len() - 1 {
        for to in (from + 1)..path.len() {
            let prev = path[from - 1];
            let next = path.get(to + 1).copied();

            let current_cost = distance(prev, path[from])
                + next.map_or(0.0, |next| distance(path[to], next));
            let new_cost =
                distance(prev, path[to]) + next.map_or(0.0, |next| distance(path[from], next));

            if new_cost - current_cost < -IMPROVEMENT_EPSILON {
                return Some((from, to));
            }
        }
    }

    None
}
