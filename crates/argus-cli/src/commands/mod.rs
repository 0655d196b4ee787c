pub mod categories;
pub mod events;

use anyhow::{Context, Result};
use argus::sim::{SimSeed, SimSource};
use std::path::Path;

/// Load the seed file and build a simulator from it.
pub fn load_sim(seed_path: &Path) -> Result<(SimSeed, SimSource)> {
    let contents = std::fs::read_to_string(seed_path)
        .with_context(|| format!("Failed to read seed file {}", seed_path.display()))?;
    let seed: SimSeed = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse seed file {}", seed_path.display()))?;
    let sim = SimSource::from_seed(seed.clone());
    Ok((seed, sim))
}
