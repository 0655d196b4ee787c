//! Categories command implementation

use anyhow::{Context, Result};
use argus::EventSource;
use std::path::PathBuf;

pub async fn execute(seed_path: PathBuf, json: bool) -> Result<()> {
    let (_, sim) = super::load_sim(&seed_path)?;

    let categories = sim
        .event_categories()
        .await
        .context("Failed to fetch event categories")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
        return Ok(());
    }

    if categories.is_empty() {
        println!("No event categories in seed");
        return Ok(());
    }

    let mut entries: Vec<_> = categories.into_iter().collect();
    entries.sort();
    for (type_name, category) in entries {
        println!("{type_name}\t{category}");
    }

    Ok(())
}
