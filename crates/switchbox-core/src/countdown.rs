//! Local countdown projection for an active one-shot timer.
//!
//! The actuator service owns the real timer; this module only projects the
//! remaining time against the local clock on a one-second cadence. The
//! cadence task is acquired when a countdown activates and released when it
//! expires, is closed, or the ticker is dropped, so no recurring work
//! survives disposal.

use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tokio::sync::mpsc;
use tokio::time::{Instant, interval};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A formatted "time remaining" value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    /// Whole minutes remaining.
    pub minutes: u64,
    /// Leftover whole seconds remaining (0-59).
    pub seconds: u64,
}

impl Projection {
    /// Project a remaining duration into whole minutes and leftover seconds.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use switchbox_core::countdown::Projection;
    ///
    /// let p = Projection::of(Duration::from_millis(125_000));
    /// assert_eq!((p.minutes, p.seconds), (2, 5));
    /// ```
    #[must_use]
    pub fn of(remaining: Duration) -> Self {
        let secs = remaining.as_secs();
        Self {
            minutes: secs / 60,
            seconds: secs % 60,
        }
    }
}

impl std::fmt::Display for Projection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The dashboard format: "2m 5s".
        write!(f, "{}m {}s", self.minutes, self.seconds)
    }
}

/// Project the remaining time until `end_instant` as seen at `now`.
///
/// Returns `None` once the end instant has been reached or passed.
#[must_use]
pub fn project(end_instant: OffsetDateTime, now: OffsetDateTime) -> Option<Projection> {
    let remaining = end_instant - now;
    if remaining.is_positive() {
        Duration::try_from(remaining).ok().map(Projection::of)
    } else {
        None
    }
}

/// Events produced by a [`CountdownTicker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// One second elapsed; the countdown is still running.
    Tick(Projection),
    /// The countdown reached zero. Emitted exactly once, then the ticker
    /// stops producing.
    Expired,
}

/// A one-second cadence over the remaining time of a countdown.
///
/// Spawns a background task on creation; the task stops on expiry, on
/// [`close`](Self::close), or when the ticker is dropped.
pub struct CountdownTicker {
    receiver: mpsc::Receiver<CountdownEvent>,
    handle: tokio::task::JoinHandle<()>,
    cancel_token: CancellationToken,
}

impl CountdownTicker {
    /// Start a ticker counting down to `end_instant`.
    ///
    /// The deadline is fixed against the tokio clock at creation, so an
    /// already-passed instant produces a single immediate `Expired`.
    #[must_use]
    pub fn new(end_instant: OffsetDateTime) -> Self {
        let remaining = Duration::try_from(end_instant - OffsetDateTime::now_utc())
            .unwrap_or(Duration::ZERO);
        Self::with_remaining(remaining)
    }

    /// Start a ticker for a known remaining duration.
    #[must_use]
    pub fn with_remaining(remaining: Duration) -> Self {
        let (tx, rx) = mpsc::channel(16);
        let cancel_token = CancellationToken::new();
        let task_token = cancel_token.clone();
        let deadline = Instant::now() + remaining;

        let handle = tokio::spawn(async move {
            let mut cadence = interval(Duration::from_secs(1));

            loop {
                tokio::select! {
                    _ = task_token.cancelled() => {
                        debug!("countdown cancelled, stopping");
                        break;
                    }
                    _ = cadence.tick() => {
                        let remaining = deadline.saturating_duration_since(Instant::now());
                        if remaining.is_zero() {
                            let _ = tx.send(CountdownEvent::Expired).await;
                            break;
                        }
                        if tx.send(CountdownEvent::Tick(Projection::of(remaining))).await.is_err() {
                            debug!("countdown receiver dropped, stopping");
                            break;
                        }
                    }
                }
            }
        });

        Self {
            receiver: rx,
            handle,
            cancel_token,
        }
    }

    /// Receive the next countdown event.
    ///
    /// Returns `None` after expiry or cancellation once the channel drains.
    pub async fn next_event(&mut self) -> Option<CountdownEvent> {
        self.receiver.recv().await
    }

    /// Stop the cadence task.
    pub fn close(self) {
        self.cancel_token.cancel();
    }

    /// A token that cancels this ticker, usable after the ticker itself has
    /// been moved into a consuming task.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Whether the cadence task is still running.
    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for CountdownTicker {
    fn drop(&mut self) {
        // No projection activity may continue after disposal.
        self.cancel_token.cancel();
    }
}

impl Stream for CountdownTicker {
    type Item = CountdownEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_recv(cx)
    }
}
