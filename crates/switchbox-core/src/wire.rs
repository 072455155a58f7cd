//! Wire-format payloads for the actuator service API.
//!
//! The service reads and writes loosely-typed JSON: `status` may arrive as a
//! boolean or the string `"1"`, absent fields mean their defaults, and
//! `timerEndTime` may be an RFC 3339 string or epoch milliseconds. All of
//! that looseness is resolved here, once, at the boundary; everything past
//! this module works with the strict types from `switchbox-types`.

use std::collections::BTreeSet;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use switchbox_types::{
    DeviceState, RecurrenceKind, ScheduleDraft, ScheduleState, TimerState, Weekday,
    calendar_date_from_str, calendar_date_to_string, clock_time_from_str, clock_time_to_string,
};

use crate::error::{GatewayError, Result};

/// Power and timer fields confirmed by a toggle or start-timer response.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerTimerUpdate {
    /// Confirmed actuator power state.
    pub power: bool,
    /// Confirmed timer state, replacing the local one wholesale.
    pub timer: TimerState,
}

fn de_loose_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    // "1" (string) and true (bool) both mean on; everything else means off.
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => s == "1",
        serde_json::Value::Number(n) => n.as_i64() == Some(1),
        _ => false,
    })
}

fn de_opt_instant<'de, D>(deserializer: D) -> std::result::Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => OffsetDateTime::parse(&s, &Rfc3339)
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid timerEndTime {s:?}: {e}"))),
        serde_json::Value::Number(n) => {
            let millis = n
                .as_i64()
                .ok_or_else(|| D::Error::custom(format!("invalid timerEndTime: {n}")))?;
            OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
                .map(Some)
                .map_err(|e| D::Error::custom(format!("invalid timerEndTime {millis}: {e}")))
        }
        other => Err(D::Error::custom(format!(
            "invalid timerEndTime: {other}"
        ))),
    }
}

/// Full status payload from `GET /api/status`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusPayload {
    #[serde(deserialize_with = "de_loose_bool")]
    pub status: bool,
    pub timer_active: bool,
    #[serde(deserialize_with = "de_opt_instant")]
    pub timer_end_time: Option<OffsetDateTime>,
    pub timer_duration: f64,
    pub schedule_active: bool,
    pub schedule_on_time: Option<String>,
    pub schedule_off_time: Option<String>,
    pub schedule_type: Option<String>,
    pub schedule_date: Option<String>,
    pub schedule_days: Vec<u8>,
}

impl StatusPayload {
    /// Resolve the payload into a strict [`DeviceState`].
    pub fn into_state(self) -> Result<DeviceState> {
        let timer = timer_state(self.timer_active, self.timer_end_time, self.timer_duration)?;
        let schedule = schedule_state(
            self.schedule_active,
            self.schedule_on_time.as_deref(),
            self.schedule_off_time.as_deref(),
            self.schedule_type.as_deref(),
            self.schedule_date.as_deref(),
            &self.schedule_days,
        )?;
        Ok(DeviceState {
            power: self.status,
            timer,
            schedule,
        })
    }
}

/// Payload from `POST /api/toggle` and `POST /api/schedule` (start timer).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PowerTimerPayload {
    #[serde(deserialize_with = "de_loose_bool")]
    pub status: bool,
    pub timer_active: bool,
    #[serde(deserialize_with = "de_opt_instant")]
    pub timer_end_time: Option<OffsetDateTime>,
    pub timer_duration: f64,
}

impl PowerTimerPayload {
    /// Resolve the payload into a strict [`PowerTimerUpdate`].
    pub fn into_update(self) -> Result<PowerTimerUpdate> {
        let timer = timer_state(self.timer_active, self.timer_end_time, self.timer_duration)?;
        Ok(PowerTimerUpdate {
            power: self.status,
            timer,
        })
    }
}

/// Payload from `POST /api/set-schedule`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchedulePayload {
    pub schedule_active: bool,
    pub schedule_on_time: Option<String>,
    pub schedule_off_time: Option<String>,
    pub schedule_type: Option<String>,
    pub schedule_date: Option<String>,
    pub schedule_days: Vec<u8>,
}

impl SchedulePayload {
    /// Resolve the payload into a strict [`ScheduleState`].
    pub fn into_schedule(self) -> Result<ScheduleState> {
        schedule_state(
            self.schedule_active,
            self.schedule_on_time.as_deref(),
            self.schedule_off_time.as_deref(),
            self.schedule_type.as_deref(),
            self.schedule_date.as_deref(),
            &self.schedule_days,
        )
    }
}

fn timer_state(
    active: bool,
    end_instant: Option<OffsetDateTime>,
    duration_minutes: f64,
) -> Result<TimerState> {
    if active && end_instant.is_none() {
        return Err(GatewayError::Parse(
            "timerActive without timerEndTime".to_string(),
        ));
    }
    Ok(TimerState {
        active,
        end_instant,
        duration_minutes,
    })
}

fn schedule_state(
    active: bool,
    on_time: Option<&str>,
    off_time: Option<&str>,
    kind: Option<&str>,
    date: Option<&str>,
    days: &[u8],
) -> Result<ScheduleState> {
    let on_time = on_time.map(clock_time_from_str).transpose()?;
    let off_time = off_time.map(clock_time_from_str).transpose()?;
    if active && (on_time.is_none() || off_time.is_none()) {
        return Err(GatewayError::Parse(
            "scheduleActive without scheduleOnTime/scheduleOffTime".to_string(),
        ));
    }
    // Absent scheduleType means the default; an unrecognized one is a parse
    // failure rather than a silent fallback.
    let recurrence = match kind {
        Some(value) => RecurrenceKind::from_wire(value)?,
        None => RecurrenceKind::default(),
    };
    let date = date.map(calendar_date_from_str).transpose()?;
    let days = days
        .iter()
        .map(|&n| Weekday::try_from(n))
        .collect::<std::result::Result<BTreeSet<_>, _>>()?;
    // An armed schedule must carry the fields its recurrence depends on.
    if active && recurrence == RecurrenceKind::Once && date.is_none() {
        return Err(GatewayError::Parse(
            "once schedule without scheduleDate".to_string(),
        ));
    }
    if active && recurrence == RecurrenceKind::Weekly && days.is_empty() {
        return Err(GatewayError::Parse(
            "weekly schedule without scheduleDays".to_string(),
        ));
    }
    Ok(ScheduleState {
        active,
        on_time,
        off_time,
        recurrence,
        date,
        days,
    })
}

/// Request body for `POST /api/schedule` (start timer).
#[derive(Debug, Clone, Serialize)]
pub struct TimerRequest {
    /// Total requested duration in (possibly fractional) minutes.
    pub minutes: f64,
}

/// Request body for `POST /api/set-schedule`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub on_time: String,
    pub off_time: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: Option<String>,
    pub days: Vec<u8>,
}

impl ScheduleRequest {
    /// Build the request body from a submit-valid draft.
    ///
    /// Callers gate on [`ScheduleDraft::is_submit_valid`] first; missing
    /// times here fall back to empty strings rather than panicking.
    #[must_use]
    pub fn from_draft(draft: &ScheduleDraft) -> Self {
        Self {
            on_time: draft.on_time.map(clock_time_to_string).unwrap_or_default(),
            off_time: draft.off_time.map(clock_time_to_string).unwrap_or_default(),
            kind: draft.recurrence.wire_name().to_string(),
            date: draft.date.map(calendar_date_to_string),
            days: draft.days.iter().map(|d| d.number()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_one_means_on() {
        let payload: StatusPayload = serde_json::from_str(r#"{"status": "1"}"#).unwrap();
        assert!(payload.status);

        let payload: StatusPayload = serde_json::from_str(r#"{"status": true}"#).unwrap();
        assert!(payload.status);

        let payload: StatusPayload = serde_json::from_str(r#"{"status": "0"}"#).unwrap();
        assert!(!payload.status);

        let payload: StatusPayload = serde_json::from_str(r#"{"status": false}"#).unwrap();
        assert!(!payload.status);

        // Absent field defaults to off.
        let payload: StatusPayload = serde_json::from_str("{}").unwrap();
        assert!(!payload.status);
    }

    #[test]
    fn test_timer_end_time_accepts_rfc3339_and_epoch_millis() {
        let payload: PowerTimerPayload = serde_json::from_str(
            r#"{"status": true, "timerActive": true, "timerEndTime": "2026-08-25T12:00:00Z", "timerDuration": 5}"#,
        )
        .unwrap();
        let end = payload.timer_end_time.unwrap();
        assert_eq!(end.unix_timestamp(), 1_787_659_200);

        let payload: PowerTimerPayload = serde_json::from_str(
            r#"{"status": true, "timerActive": true, "timerEndTime": 1787659200000, "timerDuration": 5}"#,
        )
        .unwrap();
        assert_eq!(payload.timer_end_time.unwrap().unix_timestamp(), 1_787_659_200);

        let result: std::result::Result<PowerTimerPayload, _> =
            serde_json::from_str(r#"{"timerEndTime": "tomorrow"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_initial_sync_payload_resolves_to_state() {
        // The shape the dashboard receives on first load.
        let json = r#"{
            "status": "1",
            "timerActive": false,
            "scheduleActive": true,
            "scheduleOnTime": "07:00",
            "scheduleOffTime": "22:00",
            "scheduleType": "daily"
        }"#;
        let state = serde_json::from_str::<StatusPayload>(json)
            .unwrap()
            .into_state()
            .unwrap();

        assert!(state.power);
        assert!(!state.timer.active);
        assert!(state.schedule.active);
        assert_eq!(state.schedule.recurrence, RecurrenceKind::Daily);
        assert_eq!(
            state.schedule.on_time.map(clock_time_to_string).as_deref(),
            Some("07:00")
        );
        assert_eq!(
            state.schedule.off_time.map(clock_time_to_string).as_deref(),
            Some("22:00")
        );
    }

    #[test]
    fn test_active_timer_without_end_instant_is_parse_failure() {
        let payload: PowerTimerPayload =
            serde_json::from_str(r#"{"status": true, "timerActive": true}"#).unwrap();
        let err = payload.into_update().unwrap_err();
        assert!(matches!(err, GatewayError::Parse(_)));
    }

    #[test]
    fn test_active_schedule_without_times_is_parse_failure() {
        let payload: SchedulePayload =
            serde_json::from_str(r#"{"scheduleActive": true}"#).unwrap();
        assert!(payload.into_schedule().is_err());
    }

    #[test]
    fn test_unknown_schedule_type_is_parse_failure() {
        let payload: SchedulePayload = serde_json::from_str(
            r#"{"scheduleActive": false, "scheduleType": "hourly"}"#,
        )
        .unwrap();
        let err = payload.into_schedule().unwrap_err();
        assert!(err.to_string().contains("hourly"));
    }

    #[test]
    fn test_active_once_schedule_without_date_is_parse_failure() {
        let json = r#"{
            "scheduleActive": true,
            "scheduleOnTime": "08:00",
            "scheduleOffTime": "20:00",
            "scheduleType": "once"
        }"#;
        let err = serde_json::from_str::<SchedulePayload>(json)
            .unwrap()
            .into_schedule()
            .unwrap_err();
        assert!(matches!(err, GatewayError::Parse(_)));

        // An inactive leftover without a date still resolves.
        let json = r#"{"scheduleActive": false, "scheduleType": "once"}"#;
        assert!(
            serde_json::from_str::<SchedulePayload>(json)
                .unwrap()
                .into_schedule()
                .is_ok()
        );
    }

    #[test]
    fn test_active_weekly_schedule_without_days_is_parse_failure() {
        let json = r#"{
            "scheduleActive": true,
            "scheduleOnTime": "08:00",
            "scheduleOffTime": "20:00",
            "scheduleType": "weekly",
            "scheduleDays": []
        }"#;
        let err = serde_json::from_str::<SchedulePayload>(json)
            .unwrap()
            .into_schedule()
            .unwrap_err();
        assert!(matches!(err, GatewayError::Parse(_)));

        let json = r#"{"scheduleActive": false, "scheduleType": "weekly"}"#;
        assert!(
            serde_json::from_str::<SchedulePayload>(json)
                .unwrap()
                .into_schedule()
                .is_ok()
        );
    }

    #[test]
    fn test_weekly_schedule_payload() {
        let json = r#"{
            "scheduleActive": true,
            "scheduleOnTime": "06:30",
            "scheduleOffTime": "23:00",
            "scheduleType": "weekly",
            "scheduleDays": [1, 3, 5]
        }"#;
        let schedule = serde_json::from_str::<SchedulePayload>(json)
            .unwrap()
            .into_schedule()
            .unwrap();

        assert_eq!(schedule.recurrence, RecurrenceKind::Weekly);
        assert_eq!(
            schedule.days.iter().copied().collect::<Vec<_>>(),
            vec![Weekday::Monday, Weekday::Wednesday, Weekday::Friday]
        );
    }

    #[test]
    fn test_schedule_request_from_draft() {
        let mut draft = ScheduleDraft::new();
        draft.on_time = Some(clock_time_from_str("08:00").unwrap());
        draft.off_time = Some(clock_time_from_str("20:00").unwrap());
        draft.set_recurrence(RecurrenceKind::Weekly);
        draft.toggle_day(Weekday::Sunday);
        draft.toggle_day(Weekday::Wednesday);

        let body = serde_json::to_value(ScheduleRequest::from_draft(&draft)).unwrap();
        assert_eq!(body["onTime"], "08:00");
        assert_eq!(body["offTime"], "20:00");
        assert_eq!(body["type"], "weekly");
        assert!(body["date"].is_null());
        assert_eq!(body["days"], serde_json::json!([0, 3]));
    }

    #[test]
    fn test_timer_request_serializes_fractional_minutes() {
        let body = serde_json::to_value(TimerRequest { minutes: 1.5 }).unwrap();
        assert_eq!(body["minutes"], 1.5);
    }
}
