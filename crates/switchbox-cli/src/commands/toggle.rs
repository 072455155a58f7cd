//! Toggle command implementation.

use anyhow::{Context, Result};

use super::open_store;
use crate::format::format_power;

pub async fn cmd_toggle(url: &str, no_color: bool) -> Result<()> {
    let store = open_store(url)?;
    let state = store.toggle().await.context("Failed to toggle switch")?;
    store.shutdown().await;

    println!("Power: {}", format_power(state.power, no_color));
    Ok(())
}
