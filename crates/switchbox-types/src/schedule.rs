//! In-progress schedule definition and its editing rules.
//!
//! A [`ScheduleDraft`] mirrors [`ScheduleState`](crate::ScheduleState) but
//! deliberately permits partial combinations while the user is composing
//! them. It is never authoritative; the store only accepts a draft once
//! [`ScheduleDraft::is_submit_valid`] holds.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::{Date, Time};

use crate::state::{RecurrenceKind, Weekday};

/// An in-progress, not-yet-submitted schedule definition.
///
/// The draft resets to defaults (`Daily`, everything else empty) after a
/// successful submission or an explicit clear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    /// Selected recurrence mode.
    pub recurrence: RecurrenceKind,
    /// Switch-on time of day.
    pub on_time: Option<Time>,
    /// Switch-off time of day.
    pub off_time: Option<Time>,
    /// Calendar date, required for [`RecurrenceKind::Once`].
    pub date: Option<Date>,
    /// Weekday selection, required non-empty for [`RecurrenceKind::Weekly`].
    pub days: BTreeSet<Weekday>,
}

impl ScheduleDraft {
    /// Create an empty draft with the default `Daily` recurrence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a recurrence kind.
    ///
    /// Fields that only matter to the *other* kinds are cleared so a stale
    /// date or weekday selection cannot satisfy the submit predicate later,
    /// but `on_time`/`off_time` are retained across switches.
    pub fn set_recurrence(&mut self, kind: RecurrenceKind) {
        self.recurrence = kind;
        if kind != RecurrenceKind::Once {
            self.date = None;
        }
        if kind != RecurrenceKind::Weekly {
            self.days.clear();
        }
    }

    /// Toggle a weekday in the selection.
    ///
    /// Adds the day if absent, removes it if present. The backing set makes
    /// the toggle idempotent in pairs and duplicates impossible.
    pub fn toggle_day(&mut self, day: Weekday) {
        if !self.days.insert(day) {
            self.days.remove(&day);
        }
    }

    /// Whether this draft may be submitted to the actuator service.
    ///
    /// Requires both times, plus a date for `Once` and a non-empty weekday
    /// selection for `Weekly`.
    #[must_use]
    pub fn is_submit_valid(&self) -> bool {
        if self.on_time.is_none() || self.off_time.is_none() {
            return false;
        }
        match self.recurrence {
            RecurrenceKind::Once => self.date.is_some(),
            RecurrenceKind::Daily => true,
            RecurrenceKind::Weekly => !self.days.is_empty(),
        }
    }

    /// Human-readable list of what is still missing before submission.
    ///
    /// Empty exactly when [`is_submit_valid`](Self::is_submit_valid) is true.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.on_time.is_none() {
            missing.push("on time");
        }
        if self.off_time.is_none() {
            missing.push("off time");
        }
        match self.recurrence {
            RecurrenceKind::Once if self.date.is_none() => missing.push("date"),
            RecurrenceKind::Weekly if self.days.is_empty() => missing.push("weekdays"),
            _ => {}
        }
        missing
    }

    /// Reset the draft to its defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::clock_time_from_str;

    fn draft_with_times() -> ScheduleDraft {
        let mut draft = ScheduleDraft::new();
        draft.on_time = Some(clock_time_from_str("08:00").unwrap());
        draft.off_time = Some(clock_time_from_str("20:00").unwrap());
        draft
    }

    #[test]
    fn test_default_draft_is_daily_and_empty() {
        let draft = ScheduleDraft::new();
        assert_eq!(draft.recurrence, RecurrenceKind::Daily);
        assert!(draft.on_time.is_none());
        assert!(draft.off_time.is_none());
        assert!(draft.date.is_none());
        assert!(draft.days.is_empty());
    }

    #[test]
    fn test_daily_with_both_times_is_valid() {
        let draft = draft_with_times();
        assert!(draft.is_submit_valid());
        assert!(draft.missing_fields().is_empty());
    }

    #[test]
    fn test_missing_times_is_invalid() {
        let mut draft = ScheduleDraft::new();
        assert!(!draft.is_submit_valid());
        assert_eq!(draft.missing_fields(), vec!["on time", "off time"]);

        draft.on_time = Some(clock_time_from_str("08:00").unwrap());
        assert!(!draft.is_submit_valid());
        assert_eq!(draft.missing_fields(), vec!["off time"]);
    }

    #[test]
    fn test_once_requires_date_regardless_of_times() {
        let mut draft = draft_with_times();
        draft.set_recurrence(RecurrenceKind::Once);
        assert!(!draft.is_submit_valid());
        assert_eq!(draft.missing_fields(), vec!["date"]);

        draft.date = Some(crate::state::calendar_date_from_str("2026-09-01").unwrap());
        assert!(draft.is_submit_valid());
    }

    #[test]
    fn test_weekly_requires_nonempty_days() {
        let mut draft = draft_with_times();
        draft.set_recurrence(RecurrenceKind::Weekly);
        assert!(!draft.is_submit_valid());

        draft.toggle_day(Weekday::Monday);
        assert!(draft.is_submit_valid());
    }

    #[test]
    fn test_toggle_day_is_idempotent_in_pairs() {
        let mut draft = ScheduleDraft::new();
        draft.set_recurrence(RecurrenceKind::Weekly);
        draft.toggle_day(Weekday::Tuesday);
        let with_tuesday = draft.days.clone();

        // Toggling Wednesday twice returns the set to where it was.
        draft.toggle_day(Weekday::Wednesday);
        draft.toggle_day(Weekday::Wednesday);
        assert_eq!(draft.days, with_tuesday);
    }

    #[test]
    fn test_switching_recurrence_clears_dependent_fields_keeps_times() {
        let mut draft = draft_with_times();
        draft.set_recurrence(RecurrenceKind::Weekly);
        draft.toggle_day(Weekday::Friday);

        draft.set_recurrence(RecurrenceKind::Once);
        assert!(draft.days.is_empty());
        assert!(draft.on_time.is_some());
        assert!(draft.off_time.is_some());

        draft.date = Some(crate::state::calendar_date_from_str("2026-09-01").unwrap());
        draft.set_recurrence(RecurrenceKind::Daily);
        assert!(draft.date.is_none());
        assert!(draft.on_time.is_some());
    }

    #[test]
    fn test_reset_returns_to_defaults() {
        let mut draft = draft_with_times();
        draft.set_recurrence(RecurrenceKind::Weekly);
        draft.toggle_day(Weekday::Saturday);

        draft.reset();
        assert_eq!(draft, ScheduleDraft::default());
    }
}
