//! Validate the configuration

use anyhow::Result;
use tracing::info;

use crate::config::CliConfigLoader;

/// Resolve the configuration and report whether it is valid
pub async fn check_command(config_loader: CliConfigLoader) -> Result<()> {
    let (config, _) = config_loader.load().await?;

    let endpoint = config.llm_endpoint();
    info!(
        provider = %endpoint.provider,
        model = endpoint.model,
        base_url = endpoint.base_url.unwrap_or("(provider default)"),
        "LLM endpoint"
    );

    println!("configuration OK");

    Ok(())
}
