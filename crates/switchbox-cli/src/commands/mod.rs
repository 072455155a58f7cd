//! Command implementations for the CLI.

mod schedule;
mod status;
mod timer;
mod toggle;
mod watch;

pub use schedule::{cmd_schedule_clear, cmd_schedule_set};
pub use status::cmd_status;
pub use timer::cmd_timer;
pub use toggle::cmd_toggle;
pub use watch::cmd_watch;

use std::sync::Arc;

use anyhow::{Context, Result};
use switchbox_core::{HttpGateway, SwitchStore};

/// Build a store over an HTTP gateway for `url`.
pub(crate) fn open_store(url: &str) -> Result<SwitchStore> {
    let gateway = HttpGateway::new(url).with_context(|| format!("Invalid service URL: {url}"))?;
    Ok(SwitchStore::new(Arc::new(gateway)))
}
