//! Show the resolved configuration

use anyhow::Result;
use researcher_core::SCHEMA;
use tracing::info;

use crate::config::CliConfigLoader;
use crate::output::{use_color, ConfigFormatter};

/// Resolve and print every field with its source
pub async fn show_command(config_loader: CliConfigLoader, json: bool, reveal: bool) -> Result<()> {
    info!("Resolving configuration");

    let (config, provenance) = config_loader.load().await?;

    if json {
        let formatter = ConfigFormatter::new(false, reveal);
        let document = formatter.config_json(&SCHEMA, &config, &provenance);
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        let formatter = ConfigFormatter::new(use_color(), reveal);
        print!("{}", formatter.format_config(&SCHEMA, &config, &provenance));
    }

    Ok(())
}
