use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Distance = f64;

#[derive(Debug, Error, PartialEq)]
pub enum MatrixError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Square matrix of travel distances in meters, stored as a flat vector.
/// To find the index for a pair of locations, use the formula:
/// `index = from * num_locations + to`.
///
/// `f64::INFINITY` marks a pair for which no distance could be resolved.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(try_from = "RawDistanceMatrix")]
pub struct DistanceMatrix {
    #[serde(with = "infinity_as_null")]
    distances: Vec<Distance>,
    num_locations: usize,
}

#[derive(Deserialize)]
struct RawDistanceMatrix {
    #[serde(with = "infinity_as_null")]
    distances: Vec<Distance>,
    num_locations: usize,
}

impl TryFrom<RawDistanceMatrix> for DistanceMatrix {
    type Error = MatrixError;

    fn try_from(raw: RawDistanceMatrix) -> Result<Self, Self::Error> {
        let expected = raw.num_locations.checked_mul(raw.num_locations);

        if expected != Some(raw.distances.len()) {
            return Err(MatrixError::InvalidArgument(format!(
                "{} distances cannot form a {}x{} matrix",
                raw.distances.len(),
                raw.num_locations,
                raw.num_locations
            )));
        }

        Ok(Self {
            distances: raw.distances,
            num_locations: raw.num_locations,
        })
    }
}

impl DistanceMatrix {
    pub(crate) fn zeroed(num_locations: usize) -> Self {
        Self {
            distances: vec![0.0; num_locations * num_locations],
            num_locations,
        }
    }

    /// Builds a matrix from explicit rows, e.g. a matrix computed elsewhere.
    pub fn from_rows(rows: Vec<Vec<Distance>>) -> Result<Self, MatrixError> {
        let num_locations = rows.len();

        if let Some(row) = rows.iter().find(|row| row.len() != num_locations) {
            return Err(MatrixError::InvalidArgument(format!(
                "expected {} columns, found a row with {}",
                num_locations,
                row.len()
            )));
        }

        Ok(Self {
            distances: rows.into_iter().flatten().collect(),
            num_locations,
        })
    }

    #[inline(always)]
    fn index(&self, from: usize, to: usize) -> usize {
        from * self.num_locations + to
    }

    pub(crate) fn set_symmetric(&mut self, i: usize, j: usize, distance: Distance) {
        let ij = self.index(i, j);
        let ji = self.index(j, i);
        self.distances[ij] = distance;
        self.distances[ji] = distance;
    }

    #[inline(always)]
    pub fn distance(&self, from: usize, to: usize) -> Distance {
        if from == to {
            return 0.0;
        }

        self.distances[self.index(from, to)]
    }

    pub fn is_reachable(&self, from: usize, to: usize) -> bool {
        self.distance(from, to).is_finite()
    }

    pub fn row(&self, from: usize) -> &[Distance] {
        let start = self.index(from, 0);
        &self.distances[start..start + self.num_locations]
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    pub fn is_empty(&self) -> bool {
        self.num_locations == 0
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.num_locations).all(|i| {
            (i + 1..self.num_locations).all(|j| self.distance(i, j) == self.distance(j, i))
        })
    }
}

/// JSON has no representation for infinity, unreachable pairs are written as `null`.
mod infinity_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(values.iter().map(|value| value.is_finite().then_some(*value)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values: Vec<Option<f64>> = Vec::deserialize(deserializer)?;
        Ok(values
            .into_iter()
            .map(|value| value.unwrap_or(f64::INFINITY))
            .collect())
    }
}
