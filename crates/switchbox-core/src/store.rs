//! The device state store: reconciliation authority for the session.
//!
//! Holds the single in-memory mirror of the remote actuator's state. Every
//! mutating user intent follows the optimistic-apply / reconcile-or-revert
//! protocol:
//!
//! 1. snapshot the fields the intent touches,
//! 2. apply the locally predicted state immediately,
//! 3. issue the gateway call,
//! 4. on success overwrite with the authoritative response fields,
//! 5. on failure revert the prediction and report a recoverable notice.
//!
//! Responses are trusted wholesale, never merged; two in-flight intents may
//! resolve out of issue order and the most recently resolved response wins.
//! The store also owns the countdown lifecycle: a cadence ticker is acquired
//! whenever reconciliation leaves an active timer and released as soon as
//! the timer deactivates, expires, or the store shuts down.

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use switchbox_types::{DeviceState, ScheduleDraft, ScheduleState, TimerState};

use crate::countdown::{CountdownEvent, CountdownTicker};
use crate::error::{GatewayError, Result};
use crate::events::{EventDispatcher, EventReceiver, Intent, SwitchEvent};
use crate::gateway::SwitchGateway;

struct ActiveCountdown {
    end_instant: OffsetDateTime,
    token: CancellationToken,
}

struct StoreInner {
    state: RwLock<DeviceState>,
    gateway: Arc<dyn SwitchGateway>,
    events: EventDispatcher,
    countdown: Mutex<Option<ActiveCountdown>>,
}

/// Cheaply cloneable handle to the session's device state store.
///
/// All clones share the same state, gateway, and event channel.
#[derive(Clone)]
pub struct SwitchStore {
    inner: Arc<StoreInner>,
}

impl SwitchStore {
    /// Create a store over a gateway, starting from the all-off default
    /// state. Call [`sync`](Self::sync) once to load the authoritative state.
    pub fn new(gateway: Arc<dyn SwitchGateway>) -> Self {
        Self::with_event_capacity(gateway, 100)
    }

    /// Create a store with a custom event channel capacity.
    pub fn with_event_capacity(gateway: Arc<dyn SwitchGateway>, capacity: usize) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(DeviceState::default()),
                gateway,
                events: EventDispatcher::new(capacity),
                countdown: Mutex::new(None),
            }),
        }
    }

    /// A snapshot of the current composite state.
    pub async fn state(&self) -> DeviceState {
        self.inner.state.read().await.clone()
    }

    /// Subscribe to store events.
    pub fn subscribe(&self) -> EventReceiver {
        self.inner.events.subscribe()
    }

    /// Get the event dispatcher.
    pub fn events(&self) -> &EventDispatcher {
        &self.inner.events
    }

    /// Fetch the authoritative state and replace the mirror wholesale.
    ///
    /// On failure the prior state is retained and the failure is reported as
    /// a non-blocking notice; the session stays usable.
    pub async fn sync(&self) -> Result<DeviceState> {
        match self.inner.gateway.fetch_status().await {
            Ok(fetched) => {
                let snapshot = {
                    let mut state = self.inner.state.write().await;
                    *state = fetched;
                    state.clone()
                };
                self.emit_state(snapshot.clone());
                self.sync_countdown(&snapshot.timer).await;
                Ok(snapshot)
            }
            Err(err) => self.report_failure(Intent::Sync, err),
        }
    }

    /// Toggle the actuator's power.
    ///
    /// Predicts the flip locally, then reconciles power and timer from the
    /// response. On failure only `power` is reverted; the other fields were
    /// never touched by the prediction.
    pub async fn toggle(&self) -> Result<DeviceState> {
        let (previous, optimistic) = {
            let mut state = self.inner.state.write().await;
            let previous = state.power;
            state.power = !previous;
            (previous, state.clone())
        };
        self.emit_state(optimistic);

        match self.inner.gateway.toggle().await {
            Ok(update) => {
                let snapshot = {
                    let mut state = self.inner.state.write().await;
                    state.power = update.power;
                    state.timer = update.timer;
                    state.clone()
                };
                self.emit_state(snapshot.clone());
                self.sync_countdown(&snapshot.timer).await;
                Ok(snapshot)
            }
            Err(err) => {
                let snapshot = {
                    let mut state = self.inner.state.write().await;
                    state.power = previous;
                    state.clone()
                };
                self.emit_state(snapshot);
                self.report_failure(Intent::Toggle, err)
            }
        }
    }

    /// Start a one-shot countdown of `whole_minutes` plus `whole_seconds`.
    ///
    /// A zero-length request is a local no-op: no prediction, no network
    /// call. On success `timer` is replaced wholesale and `power` is taken
    /// from the response, since the service may turn the device on as part
    /// of starting a timer.
    pub async fn start_timer(&self, whole_minutes: u32, whole_seconds: u32) -> Result<DeviceState> {
        let minutes_total = f64::from(whole_minutes) + f64::from(whole_seconds) / 60.0;
        if minutes_total <= 0.0 {
            debug!("ignoring zero-length timer request");
            return Ok(self.state().await);
        }

        // Nothing to predict: the end instant is only known once the service
        // answers.
        match self.inner.gateway.start_timer(minutes_total).await {
            Ok(update) => {
                let snapshot = {
                    let mut state = self.inner.state.write().await;
                    state.power = update.power;
                    state.timer = update.timer;
                    state.clone()
                };
                self.emit_state(snapshot.clone());
                self.sync_countdown(&snapshot.timer).await;
                Ok(snapshot)
            }
            Err(err) => self.report_failure(Intent::StartTimer, err),
        }
    }

    /// Submit a clock schedule from a draft.
    ///
    /// A draft that is not submit-valid is a local no-op; the gateway is
    /// never invoked. On success `schedule` is replaced wholesale from the
    /// response.
    pub async fn set_schedule(&self, draft: &ScheduleDraft) -> Result<DeviceState> {
        if !draft.is_submit_valid() {
            debug!("ignoring submission of incomplete schedule draft");
            return Ok(self.state().await);
        }

        match self.inner.gateway.set_schedule(draft).await {
            Ok(schedule) => {
                let snapshot = {
                    let mut state = self.inner.state.write().await;
                    state.schedule = schedule;
                    state.clone()
                };
                self.emit_state(snapshot.clone());
                Ok(snapshot)
            }
            Err(err) => self.report_failure(Intent::SetSchedule, err),
        }
    }

    /// Clear the clock schedule.
    ///
    /// The local schedule resets before confirmation; the result on the
    /// service side is deterministic and the response carries no state. A
    /// failed call does NOT restore the optimistic clear; the mirror stays
    /// empty until the next sync restores the truth.
    pub async fn clear_schedule(&self) -> Result<DeviceState> {
        let optimistic = {
            let mut state = self.inner.state.write().await;
            state.schedule = ScheduleState::default();
            state.clone()
        };
        self.emit_state(optimistic);

        match self.inner.gateway.clear_schedule().await {
            Ok(()) => Ok(self.state().await),
            Err(err) => self.report_failure(Intent::ClearSchedule, err),
        }
    }

    /// Release the countdown cadence, if any.
    pub async fn shutdown(&self) {
        let mut slot = self.inner.countdown.lock().await;
        if let Some(active) = slot.take() {
            active.token.cancel();
        }
    }

    fn emit_state(&self, state: DeviceState) {
        self.inner.events.send(SwitchEvent::StateChanged { state });
    }

    fn report_failure<T>(&self, intent: Intent, err: GatewayError) -> Result<T> {
        warn!(%intent, error = %err, "intent failed, state reverted where applicable");
        self.inner.events.send(SwitchEvent::IntentFailed {
            intent,
            reason: err.to_string(),
        });
        Err(err)
    }

    /// Align the countdown cadence with the reconciled timer state: acquire
    /// a ticker for a newly active timer, release it for an inactive one.
    async fn sync_countdown(&self, timer: &TimerState) {
        let mut slot = self.inner.countdown.lock().await;
        match (timer.active, timer.end_instant) {
            (true, Some(end_instant)) => {
                if let Some(active) = slot.as_ref() {
                    if active.end_instant == end_instant && !active.token.is_cancelled() {
                        return;
                    }
                    active.token.cancel();
                }
                let mut ticker = CountdownTicker::new(end_instant);
                let token = ticker.cancellation_token();
                *slot = Some(ActiveCountdown { end_instant, token });

                let store = self.clone();
                tokio::spawn(async move {
                    while let Some(event) = ticker.next_event().await {
                        match event {
                            CountdownEvent::Tick(projection) => {
                                store
                                    .inner
                                    .events
                                    .send(SwitchEvent::CountdownTick { projection });
                            }
                            CountdownEvent::Expired => {
                                store.apply_timer_expiry().await;
                                break;
                            }
                        }
                    }
                });
            }
            _ => {
                if let Some(active) = slot.take() {
                    active.token.cancel();
                }
            }
        }
    }

    /// Apply the locally detected expiry: the timer deactivates and the
    /// power is predicted off. No network call happens here; the next round
    /// trip confirms or corrects the prediction.
    async fn apply_timer_expiry(&self) {
        let snapshot = {
            let mut state = self.inner.state.write().await;
            if !state.timer.active {
                // A reconciliation already deactivated the timer.
                return;
            }
            state.timer.active = false;
            state.power = false;
            state.clone()
        };
        debug!("countdown expired, predicting power off");
        {
            let mut slot = self.inner.countdown.lock().await;
            *slot = None;
        }
        self.inner.events.send(SwitchEvent::TimerExpired);
        self.emit_state(snapshot);
    }
}
