//! Core client library for the AasPas smart power switch.
//!
//! This crate talks to the remote actuator service over HTTP and keeps a
//! local, event-publishing mirror of the device state: power, the one-shot
//! countdown timer, and the clock schedule.
//!
//! # Features
//!
//! - **Gateway**: one round trip per operation against the service REST API
//! - **State store**: optimistic apply, reconcile from responses, revert on
//!   failure
//! - **Countdown projection**: a one-second local cadence over an active
//!   timer, with expiry prediction
//! - **Events**: broadcast channel fanning state snapshots, ticks, and
//!   failure notices out to observers
//! - **Mock gateway**: scripted responses and latency injection for tests
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use switchbox_core::{HttpGateway, SwitchStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let gateway = HttpGateway::new("https://apiaaspassmartbox.vercel.app")?;
//!     let store = SwitchStore::new(Arc::new(gateway));
//!
//!     // Load the authoritative state, then flip the switch.
//!     let state = store.sync().await?;
//!     println!("Power: {}", state.power);
//!
//!     let state = store.toggle().await?;
//!     println!("Power: {}", state.power);
//!     Ok(())
//! }
//! ```

pub mod countdown;
pub mod error;
pub mod events;
pub mod gateway;
pub mod mock;
pub mod store;
pub mod wire;

pub use countdown::{CountdownEvent, CountdownTicker, Projection, project};
pub use error::{GatewayError, Result};
pub use events::{EventDispatcher, EventReceiver, EventSender, Intent, SwitchEvent};
pub use gateway::{HttpGateway, SwitchGateway};
pub use mock::{MockGateway, Scripted, mock_failure};
pub use store::SwitchStore;
pub use wire::{PowerTimerUpdate, ScheduleRequest, TimerRequest};

// Re-export the domain types crate.
pub use switchbox_types as types;
pub use switchbox_types::{
    DeviceState, RecurrenceKind, ScheduleDraft, ScheduleState, TimerState, Weekday,
};
