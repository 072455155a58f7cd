//! Status command implementation.

use anyhow::{Context, Result};

use super::open_store;
use crate::cli::OutputFormat;
use crate::format::{format_state_json, format_state_text};

pub async fn cmd_status(url: &str, format: OutputFormat, no_color: bool) -> Result<()> {
    let store = open_store(url)?;
    let state = store
        .sync()
        .await
        .context("Failed to fetch device status")?;
    store.shutdown().await;

    let content = match format {
        OutputFormat::Json => format_state_json(&state)?,
        OutputFormat::Text => format_state_text(&state, no_color),
    };
    print!("{content}");
    Ok(())
}
