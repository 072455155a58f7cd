//! Platform-agnostic types for the AasPas Smart Box controller.
//!
//! This crate provides the shared state model used by the behavioral core
//! (`switchbox-core`) and any presentation surface:
//!
//! - [`DeviceState`] and its parts: the in-memory mirror of the remote
//!   actuator's power, countdown-timer, and clock-schedule state
//! - [`ScheduleDraft`]: the editing state machine for a not-yet-submitted
//!   schedule definition
//! - [`ParseError`]: errors from normalizing the service's loosely-typed
//!   wire values
//!
//! # Example
//!
//! ```
//! use switchbox_types::{RecurrenceKind, ScheduleDraft, Weekday, clock_time_from_str};
//!
//! let mut draft = ScheduleDraft::new();
//! draft.on_time = Some(clock_time_from_str("08:00")?);
//! draft.off_time = Some(clock_time_from_str("20:00")?);
//! draft.set_recurrence(RecurrenceKind::Weekly);
//! draft.toggle_day(Weekday::Monday);
//! assert!(draft.is_submit_valid());
//! # Ok::<(), switchbox_types::ParseError>(())
//! ```

pub mod error;
pub mod schedule;
pub mod state;

pub use error::{ParseError, ParseResult};
pub use schedule::ScheduleDraft;
pub use state::{
    DeviceState, RecurrenceKind, ScheduleState, TimerState, Weekday, calendar_date_from_str,
    calendar_date_to_string, clock_time_from_str, clock_time_to_string,
};
