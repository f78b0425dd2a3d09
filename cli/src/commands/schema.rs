//! Print the configuration schema

use anyhow::Result;
use researcher_core::SCHEMA;

use crate::output::{use_color, ConfigFormatter};

/// Show every configurable field
pub async fn schema_command(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&SCHEMA.json_schema())?);
    } else {
        print!("{}", ConfigFormatter::new(use_color(), false).format_schema(&SCHEMA));
    }

    Ok(())
}
