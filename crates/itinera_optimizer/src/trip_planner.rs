use itinera_matrix_providers::{
    cache::DistanceCache,
    distance_matrix::{DistanceMatrix, MatrixError},
    distance_matrix_builder::DistanceMatrixBuilder,
    oracle::DistanceOracle,
    throttle::Throttle,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    problem::{
        location::{Location, LocationIdx},
        meters::Meters,
    },
    solver::{
        nearest_neighbor::{SequenceError, nearest_neighbor_route},
        route::Route,
        two_opt::improve_with_two_opt,
    },
    timer_debug,
};

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RouteImprovement {
    /// Keep the nearest neighbor order as is
    #[default]
    None,
    TwoOpt,
}

#[derive(Debug, Default, Clone)]
pub struct TripPlannerParams {
    pub improvement: RouteImprovement,
}

/// Visiting order over a list of locations, along with the matrix it was computed from.
pub struct Trip {
    locations: Vec<Location>,
    matrix: DistanceMatrix,
    route: Route,
}

impl Trip {
    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    pub fn total_distance(&self) -> Meters {
        self.route.total_distance()
    }

    pub fn is_complete(&self) -> bool {
        self.route.is_complete(self.locations.len())
    }

    pub fn stops(&self) -> impl Iterator<Item = &Location> {
        self.route.path().iter().map(|&id| &self.locations[id])
    }

    /// Locations left out because they could not be reached.
    pub fn skipped(&self) -> impl Iterator<Item = (LocationIdx, &Location)> {
        self.locations
            .iter()
            .enumerate()
            .map(|(index, location)| (LocationIdx::new(index), location))
            .filter(|(id, _)| !self.route.contains(*id))
    }

    pub fn legs(&self) -> impl Iterator<Item = (&Location, &Location, Meters)> {
        self.route
            .legs(&self.matrix)
            .map(|(from, to, distance)| (&self.locations[from], &self.locations[to], distance))
    }
}

/// Chains the distance matrix build and the route sequencing for a set of
/// already resolved locations.
pub struct TripPlanner<O, C, T> {
    oracle: O,
    cache: C,
    throttle: T,
    params: TripPlannerParams,
}

impl<O, C, T> TripPlanner<O, C, T>
where
    O: DistanceOracle,
    C: DistanceCache,
    T: Throttle,
{
    pub fn new(oracle: O, cache: C, throttle: T, params: TripPlannerParams) -> Self {
        Self {
            oracle,
            cache,
            throttle,
            params,
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub async fn distance_matrix(
        &self,
        locations: &[Location],
    ) -> Result<DistanceMatrix, PlannerError> {
        let builder = DistanceMatrixBuilder::new(&self.oracle, &self.cache, &self.throttle);
        let matrix = timer_debug!("Distance matrix", builder.build(locations).await?);

        Ok(matrix)
    }

    pub async fn plan(
        &self,
        locations: &[Location],
        start: LocationIdx,
    ) -> Result<Trip, PlannerError> {
        if locations.is_empty() {
            return Err(PlannerError::InvalidArgument(
                "at least one location is required".to_string(),
            ));
        }

        if !start.is_within(locations.len()) {
            return Err(PlannerError::InvalidArgument(format!(
                "start location {} is out of range for {} locations",
                start,
                locations.len()
            )));
        }

        let matrix = self.distance_matrix(locations).await?;
        let route = timer_debug!("Nearest neighbor", nearest_neighbor_route(&matrix, start)?);

        let route = match self.params.improvement {
            RouteImprovement::None => route,
            RouteImprovement::TwoOpt => improve_with_two_opt(&matrix, &route),
        };

        let trip = Trip {
            locations: locations.to_vec(),
            matrix,
            route,
        };

        if trip.is_complete() {
            info!(
                "Planned trip through {} locations: {}",
                locations.len(),
                trip.total_distance()
            );
        } else {
            let skipped = trip
                .skipped()
                .map(|(_, location)| location.name())
                .collect::<Vec<_>>()
                .join(", ");
            warn!("Trip is incomplete, unreachable locations: {}", skipped);
        }

        Ok(trip)
    }
}
