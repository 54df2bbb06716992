use std::{
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use fxhash::FxHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coordinate::Coordinate;

const CACHE_FOLDER_ENV_VAR: &str = "ITINERA_CACHE_FOLDER";
const CACHE_FILENAME: &str = "distances.json";

/// Order-independent key of a pair of coordinates: `PairKey::new(a, b) == PairKey::new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    first: [u64; 2],
    second: [u64; 2],
}

// -0.0 and 0.0 are the same position but have different bits
fn normalized_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

fn point_bits(point: geo_types::Point) -> [u64; 2] {
    [normalized_bits(point.x()), normalized_bits(point.y())]
}

impl PairKey {
    pub fn new<P>(a: P, b: P) -> Self
    where
        P: Into<geo_types::Point>,
    {
        let a = point_bits(a.into());
        let b = point_bits(b.into());

        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    /// Both coordinates of the pair, in canonical order.
    pub fn endpoints(&self) -> (Coordinate, Coordinate) {
        let to_coordinate =
            |bits: [u64; 2]| Coordinate::new(f64::from_bits(bits[0]), f64::from_bits(bits[1]));

        (to_coordinate(self.first), to_coordinate(self.second))
    }
}

/// Memoizes resolved pairwise distances across matrix builds.
///
/// Implementations are shared between concurrent lookups of the same build and
/// must never expose a partially written entry.
pub trait DistanceCache: Send + Sync {
    fn get(&self, key: &PairKey) -> Option<f64>;

    fn insert(&self, key: PairKey, distance: f64);
}

#[derive(Default)]
pub struct InMemoryDistanceCache {
    entries: RwLock<FxHashMap<PairKey, f64>>,
}

#[derive(Deserialize, Serialize)]
struct CacheSnapshot {
    /// `None` stands for an unreachable pair.
    entries: Vec<([f64; 2], [f64; 2], Option<f64>)>,
}

impl InMemoryDistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn save_to(&self, path: &Path) -> Result<(), anyhow::Error> {
        let mut entries = self
            .entries
            .read()
            .iter()
            .map(|(key, distance)| (*key, *distance))
            .collect::<Vec<_>>();
        entries.sort_by_key(|(key, _)| *key);

        let snapshot = CacheSnapshot {
            entries: entries
                .into_iter()
                .map(|(key, distance)| {
                    let (a, b) = key.endpoints();
                    (
                        [a.lon(), a.lat()],
                        [b.lon(), b.lat()],
                        distance.is_finite().then_some(distance),
                    )
                })
                .collect(),
        };

        let file = std::fs::File::create(path)?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        serde_json::to_writer(&mut writer, &snapshot)?;
        writer.flush()?;

        debug!("Saved {} cached distances to {:?}", snapshot.entries.len(), path);

        Ok(())
    }

    /// Loads a snapshot written by [`InMemoryDistanceCache::save_to`]. A missing
    /// file yields an empty cache.
    pub fn load_from(path: &Path) -> Result<Self, anyhow::Error> {
        if !path.is_file() {
            return Ok(Self::new());
        }

        let file = std::fs::File::open(path)?;
        let snapshot: CacheSnapshot = serde_json::from_reader(file)?;

        let entries = snapshot
            .entries
            .into_iter()
            .map(|([a_lon, a_lat], [b_lon, b_lat], distance)| {
                (
                    PairKey::new(Coordinate::new(a_lon, a_lat), Coordinate::new(b_lon, b_lat)),
                    distance.unwrap_or(f64::INFINITY),
                )
            })
            .collect::<FxHashMap<_, _>>();

        debug!("Loaded {} cached distances from {:?}", entries.len(), path);

        Ok(Self {
            entries: RwLock::new(entries),
        })
    }
}

impl DistanceCache for InMemoryDistanceCache {
    fn get(&self, key: &PairKey) -> Option<f64> {
        self.entries.read().get(key).copied()
    }

    fn insert(&self, key: PairKey, distance: f64) {
        self.entries.write().insert(key, distance);
    }
}

impl<C> DistanceCache for std::sync::Arc<C>
where
    C: DistanceCache + ?Sized,
{
    fn get(&self, key: &PairKey) -> Option<f64> {
        (**self).get(key)
    }

    fn insert(&self, key: PairKey, distance: f64) {
        (**self).insert(key, distance)
    }
}

/// Location of the snapshot file inside the folder named by `ITINERA_CACHE_FOLDER`.
/// Returns `Ok(None)` when the variable is not set.
pub fn snapshot_path_from_env() -> Result<Option<PathBuf>, anyhow::Error> {
    let Ok(cache_folder_path) = std::env::var(CACHE_FOLDER_ENV_VAR) else {
        return Ok(None);
    };

    let cache_folder = Path::new(&cache_folder_path);

    if !cache_folder.is_dir() {
        return Err(anyhow::anyhow!(format!(
            "Path {} is not a directory",
            cache_folder_path
        )));
    }

    Ok(Some(cache_folder.join(CACHE_FILENAME)))
}
