//! Core state types for the smart switch controller.

use core::fmt;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};

use crate::error::ParseError;

/// Day of the week, numbered the way the actuator service numbers them:
/// `0` is Sunday through `6` is Saturday (JavaScript `Date#getDay()`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Weekday {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl Weekday {
    /// All weekdays in wire order (Sunday first).
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// The wire number of this weekday (0 = Sunday).
    #[must_use]
    pub fn number(self) -> u8 {
        self as u8
    }

    /// Parse a weekday from a human name.
    ///
    /// Matching is case-insensitive and accepts both full names and the
    /// usual three-letter abbreviations.
    ///
    /// # Examples
    ///
    /// ```
    /// use switchbox_types::Weekday;
    ///
    /// assert_eq!(Weekday::from_name("wed"), Some(Weekday::Wednesday));
    /// assert_eq!(Weekday::from_name("Sunday"), Some(Weekday::Sunday));
    /// assert_eq!(Weekday::from_name("someday"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "sun" | "sunday" => Some(Weekday::Sunday),
            "mon" | "monday" => Some(Weekday::Monday),
            "tue" | "tues" | "tuesday" => Some(Weekday::Tuesday),
            "wed" | "wednesday" => Some(Weekday::Wednesday),
            "thu" | "thur" | "thurs" | "thursday" => Some(Weekday::Thursday),
            "fri" | "friday" => Some(Weekday::Friday),
            "sat" | "saturday" => Some(Weekday::Saturday),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Weekday {
    type Error = ParseError;

    /// Convert a wire number to a `Weekday`.
    ///
    /// # Examples
    ///
    /// ```
    /// use switchbox_types::Weekday;
    ///
    /// assert_eq!(Weekday::try_from(0), Ok(Weekday::Sunday));
    /// assert_eq!(Weekday::try_from(3), Ok(Weekday::Wednesday));
    /// assert!(Weekday::try_from(7).is_err());
    /// ```
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Weekday::Sunday),
            1 => Ok(Weekday::Monday),
            2 => Ok(Weekday::Tuesday),
            3 => Ok(Weekday::Wednesday),
            4 => Ok(Weekday::Thursday),
            5 => Ok(Weekday::Friday),
            6 => Ok(Weekday::Saturday),
            other => Err(ParseError::InvalidWeekday(other)),
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weekday::Sunday => write!(f, "Sunday"),
            Weekday::Monday => write!(f, "Monday"),
            Weekday::Tuesday => write!(f, "Tuesday"),
            Weekday::Wednesday => write!(f, "Wednesday"),
            Weekday::Thursday => write!(f, "Thursday"),
            Weekday::Friday => write!(f, "Friday"),
            Weekday::Saturday => write!(f, "Saturday"),
        }
    }
}

/// Recurrence mode of a clock schedule. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    /// Fires on a single calendar date.
    Once,
    /// Fires every day.
    #[default]
    Daily,
    /// Fires on a chosen set of weekdays.
    Weekly,
}

impl RecurrenceKind {
    /// The string the actuator service uses for this kind.
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            RecurrenceKind::Once => "once",
            RecurrenceKind::Daily => "daily",
            RecurrenceKind::Weekly => "weekly",
        }
    }

    /// Parse a recurrence kind from its wire string (case-insensitive).
    ///
    /// # Examples
    ///
    /// ```
    /// use switchbox_types::RecurrenceKind;
    ///
    /// assert_eq!(RecurrenceKind::from_wire("daily"), Ok(RecurrenceKind::Daily));
    /// assert_eq!(RecurrenceKind::from_wire("Once"), Ok(RecurrenceKind::Once));
    /// assert!(RecurrenceKind::from_wire("fortnightly").is_err());
    /// ```
    pub fn from_wire(value: &str) -> Result<Self, ParseError> {
        match value.to_lowercase().as_str() {
            "once" => Ok(RecurrenceKind::Once),
            "daily" => Ok(RecurrenceKind::Daily),
            "weekly" => Ok(RecurrenceKind::Weekly),
            _ => Err(ParseError::UnknownRecurrence(value.to_string())),
        }
    }
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// One-shot countdown timer state.
///
/// When `active` is true the service has committed to switching the actuator
/// off at `end_instant`; the controller only projects the remaining time
/// locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    /// Whether a countdown is currently running.
    pub active: bool,
    /// Instant at which the countdown ends. Always set while `active`.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_instant: Option<OffsetDateTime>,
    /// Requested duration in (possibly fractional) minutes.
    pub duration_minutes: f64,
}

/// Clock schedule state as last confirmed by the actuator service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleState {
    /// Whether a schedule is currently armed.
    pub active: bool,
    /// Time of day the actuator switches on. Set while `active`.
    pub on_time: Option<Time>,
    /// Time of day the actuator switches off. Set while `active`.
    pub off_time: Option<Time>,
    /// Recurrence mode.
    pub recurrence: RecurrenceKind,
    /// Calendar date, set when `recurrence` is [`RecurrenceKind::Once`].
    pub date: Option<Date>,
    /// Selected weekdays, non-empty when `recurrence` is
    /// [`RecurrenceKind::Weekly`].
    pub days: BTreeSet<Weekday>,
}

/// Composite mirror of the remote actuator's state.
///
/// There is a single instance per session, owned by the store; it starts from
/// [`Default`] and is overwritten by the first successful status fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    /// Current actuator on/off state.
    pub power: bool,
    /// One-shot countdown timer.
    pub timer: TimerState,
    /// Clock schedule.
    pub schedule: ScheduleState,
}

const CLOCK_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]");
const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Parse a wall-clock time in the service's `HH:MM` form.
pub fn clock_time_from_str(value: &str) -> Result<Time, ParseError> {
    Time::parse(value, CLOCK_FORMAT).map_err(|_| ParseError::InvalidTime(value.to_string()))
}

/// Format a wall-clock time back into `HH:MM`.
#[must_use]
pub fn clock_time_to_string(value: Time) -> String {
    value
        .format(CLOCK_FORMAT)
        .unwrap_or_else(|_| format!("{:02}:{:02}", value.hour(), value.minute()))
}

/// Parse a calendar date in the service's `YYYY-MM-DD` form.
pub fn calendar_date_from_str(value: &str) -> Result<Date, ParseError> {
    Date::parse(value, DATE_FORMAT).map_err(|_| ParseError::InvalidDate(value.to_string()))
}

/// Format a calendar date back into `YYYY-MM-DD`.
#[must_use]
pub fn calendar_date_to_string(value: Date) -> String {
    value
        .format(DATE_FORMAT)
        .unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_numbers_match_wire_order() {
        assert_eq!(Weekday::Sunday.number(), 0);
        assert_eq!(Weekday::Wednesday.number(), 3);
        assert_eq!(Weekday::Saturday.number(), 6);
    }

    #[test]
    fn test_weekday_try_from_rejects_out_of_range() {
        assert_eq!(Weekday::try_from(5), Ok(Weekday::Friday));
        assert_eq!(Weekday::try_from(7), Err(ParseError::InvalidWeekday(7)));
        assert_eq!(Weekday::try_from(255), Err(ParseError::InvalidWeekday(255)));
    }

    #[test]
    fn test_weekday_from_name() {
        assert_eq!(Weekday::from_name("MON"), Some(Weekday::Monday));
        assert_eq!(Weekday::from_name("thursday"), Some(Weekday::Thursday));
        assert_eq!(Weekday::from_name(""), None);
    }

    #[test]
    fn test_recurrence_wire_round_trip() {
        for kind in [
            RecurrenceKind::Once,
            RecurrenceKind::Daily,
            RecurrenceKind::Weekly,
        ] {
            assert_eq!(RecurrenceKind::from_wire(kind.wire_name()), Ok(kind));
        }
    }

    #[test]
    fn test_recurrence_unknown_is_error() {
        let err = RecurrenceKind::from_wire("hourly").unwrap_err();
        assert!(err.to_string().contains("hourly"));
    }

    #[test]
    fn test_recurrence_default_is_daily() {
        assert_eq!(RecurrenceKind::default(), RecurrenceKind::Daily);
    }

    #[test]
    fn test_device_state_default_is_empty() {
        let state = DeviceState::default();
        assert!(!state.power);
        assert!(!state.timer.active);
        assert!(state.timer.end_instant.is_none());
        assert_eq!(state.timer.duration_minutes, 0.0);
        assert!(!state.schedule.active);
        assert!(state.schedule.days.is_empty());
        assert_eq!(state.schedule.recurrence, RecurrenceKind::Daily);
    }

    #[test]
    fn test_clock_time_parsing() {
        let t = clock_time_from_str("07:30").unwrap();
        assert_eq!((t.hour(), t.minute()), (7, 30));
        assert_eq!(clock_time_to_string(t), "07:30");

        assert!(clock_time_from_str("7:3").is_err());
        assert!(clock_time_from_str("25:00").is_err());
        assert!(clock_time_from_str("").is_err());
    }

    #[test]
    fn test_calendar_date_parsing() {
        let d = calendar_date_from_str("2026-08-25").unwrap();
        assert_eq!(calendar_date_to_string(d), "2026-08-25");

        assert!(calendar_date_from_str("25/08/2026").is_err());
        assert!(calendar_date_from_str("2026-13-01").is_err());
    }

    #[test]
    fn test_device_state_serde_round_trip() {
        let mut state = DeviceState::default();
        state.power = true;
        state.schedule.active = true;
        state.schedule.on_time = Some(clock_time_from_str("08:00").unwrap());
        state.schedule.off_time = Some(clock_time_from_str("20:00").unwrap());
        state.schedule.recurrence = RecurrenceKind::Weekly;
        state.schedule.days.insert(Weekday::Monday);
        state.schedule.days.insert(Weekday::Friday);

        let json = serde_json::to_string(&state).unwrap();
        let back: DeviceState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
