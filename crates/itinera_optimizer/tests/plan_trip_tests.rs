use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use itinera_matrix_providers::{
    as_the_crow_flies::AsTheCrowFlies,
    cache::InMemoryDistanceCache,
    coordinate::Coordinate,
    oracle::{DistanceOracle, OracleError},
    throttle::{ThrottlePolicy, Unthrottled},
};
use itinera_optimizer::{
    problem::{
        location::{Location, LocationIdx},
        meters::Meters,
    },
    trip_planner::{PlannerError, RouteImprovement, TripPlanner, TripPlannerParams},
};

/// Distances along a straight line: one degree of longitude is one kilometer.
#[derive(Default)]
struct LineOracle {
    calls: AtomicUsize,
    unreachable: Option<Coordinate>,
}

impl DistanceOracle for LineOracle {
    async fn distance(&self, from: Coordinate, to: Coordinate) -> Result<f64, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if Some(from) == self.unreachable || Some(to) == self.unreachable {
            return Err(OracleError::Unreachable(from, to));
        }

        Ok((from.lon() - to.lon()).abs() * 1000.0)
    }
}

fn on_line(name: &str, position: f64) -> Location {
    Location::new(name, Coordinate::new(position, 0.0))
}

fn ids(path: &[usize]) -> Vec<LocationIdx> {
    path.iter().copied().map(LocationIdx::new).collect()
}

#[tokio::test]
async fn test_plan_visits_every_location_once() {
    let planner = TripPlanner::new(
        LineOracle::default(),
        InMemoryDistanceCache::new(),
        Unthrottled,
        TripPlannerParams::default(),
    );

    let locations = vec![
        on_line("Start", 0.0),
        on_line("Far", 9.0),
        on_line("Near", 1.0),
        on_line("Middle", 4.0),
    ];

    let trip = planner.plan(&locations, LocationIdx::new(0)).await.unwrap();

    assert!(trip.is_complete());
    assert_eq!(trip.route().path(), ids(&[0, 2, 3, 1]));
    assert_eq!(
        trip.stops().map(|l| l.name()).collect::<Vec<_>>(),
        vec!["Start", "Near", "Middle", "Far"]
    );
    assert_eq!(trip.total_distance(), Meters::new(9000.0));
    assert_eq!(trip.total_distance().to_string(), "9.0 km");

    let legs: Vec<Meters> = trip.legs().map(|(_, _, distance)| distance).collect();
    assert_eq!(legs, vec![Meters::new(1000.0), Meters::new(3000.0), Meters::new(5000.0)]);
    assert_eq!(trip.skipped().count(), 0);
}

#[tokio::test]
async fn test_invalid_start_is_rejected_before_any_query() {
    let planner = TripPlanner::new(
        LineOracle::default(),
        InMemoryDistanceCache::new(),
        Unthrottled,
        TripPlannerParams::default(),
    );

    let locations = vec![on_line("A", 0.0), on_line("B", 1.0)];

    let result = planner.plan(&locations, LocationIdx::new(2)).await;
    assert!(matches!(result, Err(PlannerError::InvalidArgument(_))));

    let result = planner.plan(&[], LocationIdx::new(0)).await;
    assert!(matches!(result, Err(PlannerError::InvalidArgument(_))));

    assert!(planner.cache().is_empty());
}

#[tokio::test]
async fn test_single_location_trip() {
    let planner = TripPlanner::new(
        LineOracle::default(),
        InMemoryDistanceCache::new(),
        Unthrottled,
        TripPlannerParams::default(),
    );

    let trip = planner
        .plan(&[on_line("Home", 3.0)], LocationIdx::new(0))
        .await
        .unwrap();

    assert!(trip.is_complete());
    assert_eq!(trip.route().path(), ids(&[0]));
    assert_eq!(trip.total_distance(), Meters::ZERO);
}

#[tokio::test]
async fn test_unreachable_location_makes_trip_incomplete() {
    let island = on_line("Island", 2.0);
    let planner = TripPlanner::new(
        LineOracle {
            unreachable: Some(island.coordinate()),
            ..LineOracle::default()
        },
        InMemoryDistanceCache::new(),
        Unthrottled,
        TripPlannerParams::default(),
    );

    let locations = vec![
        on_line("Start", 0.0),
        island,
        on_line("Shore", 5.0),
    ];

    let trip = planner.plan(&locations, LocationIdx::new(0)).await.unwrap();

    assert!(!trip.is_complete());
    assert_eq!(trip.route().path(), ids(&[0, 2]));
    assert_eq!(
        trip.skipped().map(|(id, l)| (id, l.name())).collect::<Vec<_>>(),
        vec![(LocationIdx::new(1), "Island")]
    );
}

#[tokio::test]
async fn test_two_opt_improvement_is_opt_in() {
    let locations = vec![
        on_line("Start", 0.0),
        on_line("East", 1.0),
        on_line("West", -2.0),
        on_line("Far East", 4.0),
    ];

    let greedy = TripPlanner::new(
        LineOracle::default(),
        InMemoryDistanceCache::new(),
        Unthrottled,
        TripPlannerParams::default(),
    )
    .plan(&locations, LocationIdx::new(0))
    .await
    .unwrap();

    let improved = TripPlanner::new(
        LineOracle::default(),
        InMemoryDistanceCache::new(),
        Unthrottled,
        TripPlannerParams {
            improvement: RouteImprovement::TwoOpt,
        },
    )
    .plan(&locations, LocationIdx::new(0))
    .await
    .unwrap();

    assert_eq!(greedy.total_distance(), Meters::new(10_000.0));
    assert_eq!(improved.total_distance(), Meters::new(8_000.0));
    assert_eq!(improved.route().path(), ids(&[0, 2, 1, 3]));
}

#[tokio::test]
async fn test_planners_can_share_a_cache() {
    let cache = Arc::new(InMemoryDistanceCache::new());
    let locations = vec![
        Location::from_lat_lon("Delhi", 28.6139, 77.209),
        Location::from_lat_lon("Agra", 27.1767, 78.0081),
        Location::from_lat_lon("Jaipur", 26.9124, 75.7873),
    ];

    let first = TripPlanner::new(
        AsTheCrowFlies,
        Arc::clone(&cache),
        ThrottlePolicy::default(),
        TripPlannerParams::default(),
    );
    first.plan(&locations, LocationIdx::new(0)).await.unwrap();
    assert_eq!(cache.len(), 3);

    let oracle = Arc::new(LineOracle::default());
    let second = TripPlanner::new(
        Arc::clone(&oracle),
        Arc::clone(&cache),
        Unthrottled,
        TripPlannerParams::default(),
    );
    let trip = second.plan(&locations, LocationIdx::new(2)).await.unwrap();

    assert!(trip.is_complete());
    assert_eq!(trip.route().start(), Some(LocationIdx::new(2)));
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
}
