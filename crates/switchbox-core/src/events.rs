//! Store event system for observers of the device state.
//!
//! The presentation boundary never touches [`DeviceState`] directly; it
//! subscribes here and re-renders from the snapshots the store publishes.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use switchbox_types::DeviceState;

use crate::countdown::Projection;

/// The user intent a failure report refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Initial status fetch.
    Sync,
    /// Power toggle.
    Toggle,
    /// Start countdown timer.
    StartTimer,
    /// Submit clock schedule.
    SetSchedule,
    /// Clear clock schedule.
    ClearSchedule,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Sync => write!(f, "sync"),
            Intent::Toggle => write!(f, "toggle"),
            Intent::StartTimer => write!(f, "start timer"),
            Intent::SetSchedule => write!(f, "set schedule"),
            Intent::ClearSchedule => write!(f, "clear schedule"),
        }
    }
}

/// Events published by the store.
///
/// All events are serializable for logging and IPC.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new event types
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum SwitchEvent {
    /// The composite device state changed (optimistic apply, reconciliation,
    /// or revert).
    StateChanged { state: DeviceState },
    /// One second of an active countdown elapsed.
    CountdownTick { projection: Projection },
    /// The local countdown reached zero. The accompanying power-off is a
    /// prediction until the next round trip confirms it.
    TimerExpired,
    /// A gateway round trip failed; any optimistic state was reverted
    /// (except for clear-schedule) and the session remains interactive.
    IntentFailed { intent: Intent, reason: String },
}

/// Sender for store events.
pub type EventSender = broadcast::Sender<SwitchEvent>;

/// Receiver for store events.
pub type EventReceiver = broadcast::Receiver<SwitchEvent>;

/// Event dispatcher fanning store events out to any number of observers.
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    sender: EventSender,
}

impl EventDispatcher {
    /// Create a new event dispatcher.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events.
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Send an event.
    pub fn send(&self, event: SwitchEvent) {
        // Ignore error if no receivers
        let _ = self.sender.send(event);
    }

    /// Get the number of active receivers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new(100)
    }
}
