//! Watch command: follow store events until interrupted.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::broadcast::error::RecvError;
use tokio::time::interval;

use switchbox_core::SwitchEvent;

use super::open_store;
use crate::format::format_state_text;

pub async fn cmd_watch(url: &str, refresh_secs: u64, no_color: bool) -> Result<()> {
    let store = open_store(url)?;

    let mut last = store
        .sync()
        .await
        .context("Failed to fetch device status")?;
    print!("{}", format_state_text(&last, no_color));

    let mut events = store.subscribe();
    let mut refresh = interval(Duration::from_secs(refresh_secs.max(1)));
    refresh.tick().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = refresh.tick() => {
                if let Err(e) = store.sync().await {
                    tracing::warn!("Refresh failed: {e}");
                }
            }
            event = events.recv() => match event {
                Ok(SwitchEvent::StateChanged { state }) => {
                    if state != last {
                        print!("{}", format_state_text(&state, no_color));
                        last = state;
                    }
                }
                Ok(SwitchEvent::CountdownTick { projection }) => {
                    println!("Countdown: {projection}");
                }
                Ok(SwitchEvent::TimerExpired) => {
                    println!("Timer expired, switch predicted off");
                }
                Ok(SwitchEvent::IntentFailed { intent, reason }) => {
                    eprintln!("{intent} failed: {reason}");
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Dropped {skipped} events, continuing");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    store.shutdown().await;
    Ok(())
}
