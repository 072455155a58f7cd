//! Schedule commands: submit and clear.

use std::collections::BTreeSet;

use anyhow::{Context, Result, bail};

use switchbox_types::{
    ScheduleDraft, Weekday, calendar_date_from_str, clock_time_from_str,
};

use super::open_store;
use crate::cli::RepeatArg;
use crate::format::format_schedule_line;

pub async fn cmd_schedule_set(
    url: &str,
    on: &str,
    off: &str,
    repeat: RepeatArg,
    date: Option<&str>,
    days: &[String],
) -> Result<()> {
    let mut draft = ScheduleDraft::new();
    draft.on_time = Some(clock_time_from_str(on).context("Invalid --on time, expected HH:MM")?);
    draft.off_time = Some(clock_time_from_str(off).context("Invalid --off time, expected HH:MM")?);
    // Recurrence first: switching modes clears the fields the new mode does
    // not use, so the date and days must land afterwards.
    draft.set_recurrence(repeat.into());
    if let Some(date) = date {
        draft.date =
            Some(calendar_date_from_str(date).context("Invalid --date, expected YYYY-MM-DD")?);
    }
    for day in parse_days(days)? {
        draft.toggle_day(day);
    }

    if !draft.is_submit_valid() {
        bail!(
            "Schedule is incomplete: missing {}",
            draft.missing_fields().join(", ")
        );
    }

    let store = open_store(url)?;
    let state = store
        .set_schedule(&draft)
        .await
        .context("Failed to submit schedule")?;
    store.shutdown().await;

    println!("{}", format_schedule_line(&state.schedule));
    Ok(())
}

pub async fn cmd_schedule_clear(url: &str) -> Result<()> {
    let store = open_store(url)?;
    store
        .clear_schedule()
        .await
        .context("Failed to clear schedule")?;
    store.shutdown().await;

    println!("Schedule cleared");
    Ok(())
}

/// Parse day names into a deduplicated weekday set.
fn parse_days(days: &[String]) -> Result<BTreeSet<Weekday>> {
    let mut parsed = BTreeSet::new();
    for name in days {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        match Weekday::from_name(name) {
            Some(day) => {
                parsed.insert(day);
            }
            None => bail!("Unknown day name: {name}"),
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_days_accepts_short_names() {
        let days = vec!["mon".to_string(), "Wed".to_string(), "friday".to_string()];
        let parsed = parse_days(&days).unwrap();
        assert_eq!(
            parsed.into_iter().collect::<Vec<_>>(),
            vec![Weekday::Monday, Weekday::Wednesday, Weekday::Friday]
        );
    }

    #[test]
    fn test_parse_days_dedupes() {
        let days = vec!["mon".to_string(), "monday".to_string()];
        assert_eq!(parse_days(&days).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_days_rejects_unknown() {
        let days = vec!["someday".to_string()];
        assert!(parse_days(&days).is_err());
    }
}
