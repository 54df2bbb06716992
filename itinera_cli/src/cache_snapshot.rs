use itinera_matrix_providers::cache::{InMemoryDistanceCache, snapshot_path_from_env};
use tracing::info;

pub fn load_cache() -> Result<InMemoryDistanceCache, anyhow::Error> {
    match snapshot_path_from_env()? {
        Some(path) => {
            let cache = InMemoryDistanceCache::load_from(&path)?;
            info!("Loaded {} cached distances", cache.len());
            Ok(cache)
        }
        None => Ok(InMemoryDistanceCache::new()),
    }
}

pub fn save_cache(cache: &InMemoryDistanceCache) -> Result<(), anyhow::Error> {
    if let Some(path) = snapshot_path_from_env()? {
        cache.save_to(&path)?;
    }

    Ok(())
}
