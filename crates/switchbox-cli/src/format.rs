//! Output formatting helpers.

use std::collections::BTreeSet;

use anyhow::Result;
use owo_colors::OwoColorize;
use time::OffsetDateTime;

use switchbox_core::countdown::project;
use switchbox_types::{
    DeviceState, RecurrenceKind, ScheduleState, TimerState, Weekday, calendar_date_to_string,
    clock_time_to_string,
};

/// Format the power state as a colored ON/OFF label.
pub fn format_power(power: bool, no_color: bool) -> String {
    match (power, no_color) {
        (true, true) => "ON".to_string(),
        (false, true) => "OFF".to_string(),
        (true, false) => format!("{}", "ON".green().bold()),
        (false, false) => format!("{}", "OFF".red()),
    }
}

/// Format the timer state as a one-line remaining-time display, or `None`
/// when no countdown is running.
pub fn format_timer_line(timer: &TimerState) -> Option<String> {
    if !timer.active {
        return None;
    }
    let end = timer.end_instant?;
    let remaining = project(end, OffsetDateTime::now_utc())
        .map(|p| p.to_string())
        .unwrap_or_else(|| "0m 0s".to_string());
    Some(format!("Timer:    {} remaining", remaining))
}

/// Format the weekday set as a comma-separated list in wire order.
pub fn format_days(days: &BTreeSet<Weekday>) -> String {
    days.iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format the schedule state as a one-line summary.
pub fn format_schedule_line(schedule: &ScheduleState) -> String {
    if !schedule.active {
        return "Schedule: none".to_string();
    }
    let on = schedule
        .on_time
        .map(clock_time_to_string)
        .unwrap_or_else(|| "--:--".to_string());
    let off = schedule
        .off_time
        .map(clock_time_to_string)
        .unwrap_or_else(|| "--:--".to_string());
    let when = match schedule.recurrence {
        RecurrenceKind::Once => match schedule.date {
            Some(date) => format!("once on {}", calendar_date_to_string(date)),
            None => "once".to_string(),
        },
        RecurrenceKind::Daily => "daily".to_string(),
        RecurrenceKind::Weekly => format!("weekly on {}", format_days(&schedule.days)),
    };
    format!("Schedule: ON {} / OFF {} ({})", on, off, when)
}

/// Format the full device state as human-readable text.
pub fn format_state_text(state: &DeviceState, no_color: bool) -> String {
    let mut out = format!("Power:    {}\n", format_power(state.power, no_color));
    if let Some(timer) = format_timer_line(&state.timer) {
        out.push_str(&timer);
        out.push('\n');
    }
    out.push_str(&format_schedule_line(&state.schedule));
    out.push('\n');
    out
}

/// Format the full device state as pretty-printed JSON.
pub fn format_state_json(state: &DeviceState) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(state)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchbox_types::clock_time_from_str;

    #[test]
    fn test_format_power_plain() {
        assert_eq!(format_power(true, true), "ON");
        assert_eq!(format_power(false, true), "OFF");
    }

    #[test]
    fn test_inactive_timer_has_no_line() {
        assert!(format_timer_line(&TimerState::default()).is_none());
    }

    #[test]
    fn test_running_timer_shows_remaining() {
        let timer = TimerState {
            active: true,
            end_instant: Some(OffsetDateTime::now_utc() + time::Duration::seconds(125)),
            duration_minutes: 2.5,
        };
        let line = format_timer_line(&timer).unwrap();
        assert!(line.contains("remaining"), "got: {line}");
    }

    #[test]
    fn test_schedule_line_daily() {
        let schedule = ScheduleState {
            active: true,
            on_time: Some(clock_time_from_str("08:00").unwrap()),
            off_time: Some(clock_time_from_str("20:30").unwrap()),
            ..Default::default()
        };
        assert_eq!(
            format_schedule_line(&schedule),
            "Schedule: ON 08:00 / OFF 20:30 (daily)"
        );
    }

    #[test]
    fn test_schedule_line_weekly_lists_days() {
        let mut schedule = ScheduleState {
            active: true,
            on_time: Some(clock_time_from_str("07:00").unwrap()),
            off_time: Some(clock_time_from_str("22:00").unwrap()),
            recurrence: RecurrenceKind::Weekly,
            ..Default::default()
        };
        schedule.days.insert(Weekday::Friday);
        schedule.days.insert(Weekday::Monday);

        // BTreeSet keeps wire order: Monday before Friday.
        assert_eq!(
            format_schedule_line(&schedule),
            "Schedule: ON 07:00 / OFF 22:00 (weekly on Monday, Friday)"
        );
    }

    #[test]
    fn test_inactive_schedule_is_none() {
        assert_eq!(
            format_schedule_line(&ScheduleState::default()),
            "Schedule: none"
        );
    }

    #[test]
    fn test_state_json_is_valid() {
        let json = format_state_json(&DeviceState::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["power"], serde_json::json!(false));
    }
}
