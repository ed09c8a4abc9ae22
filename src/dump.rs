//! One-shot fetch-and-dump command.
//!
//! Fetches a single environment and writes its JSON to a local file so the
//! remote payload can be inspected without pushing anything. A manual-testing
//! aid, not part of the served API.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::fetch::MetadataClient;

pub async fn run_dump(config: &Config, environment_id: &str, out: &Path) -> Result<()> {
    let client = MetadataClient::new(&config.metadata)?;

    let environment = client
        .fetch(environment_id)
        .await
        .with_context(|| format!("fetching environment {environment_id}"))?
        .with_context(|| format!("environment {environment_id} not found"))?;

    let json = serde_json::to_string_pretty(&environment)?;
    std::fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;

    println!("fetch {}", environment_id);
    println!("  name: {} ({})", environment.name, environment.system_name);
    println!("  schemas: {}", environment.schemas.len());
    println!("  tables: {}", environment.table_count());
    println!("  wrote {}", out.display());

    Ok(())
}
