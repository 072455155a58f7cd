//! Timer command implementation.

use anyhow::{Context, Result, bail};

use super::open_store;
use crate::format::{format_power, format_timer_line};

pub async fn cmd_timer(url: &str, minutes: u32, seconds: u32, no_color: bool) -> Result<()> {
    // The store treats a zero-length timer as a silent no-op; the CLI tells
    // the user instead.
    if minutes == 0 && seconds == 0 {
        bail!("Timer length must be greater than zero");
    }

    let store = open_store(url)?;
    let state = store
        .start_timer(minutes, seconds)
        .await
        .context("Failed to start timer")?;
    store.shutdown().await;

    println!("Power: {}", format_power(state.power, no_color));
    if let Some(line) = format_timer_line(&state.timer) {
        println!("{line}");
    }
    Ok(())
}
