//! crates/portal_core/src/summary.rs
//!
//! Human-readable rendering of times and schedules for list and table rows.

use crate::domain::{ActiveDay, WeekDay};
use crate::labels;
use chrono::NaiveTime;

fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Converts a persisted 24-hour time into `h:MM AM/PM`.
///
/// Text that is not a valid time of day is returned unchanged.
pub fn format_time_12h(time: &str) -> String {
    match parse_time(time) {
        Some(parsed) => parsed.format("%-I:%M %p").to_string(),
        None => time.to_string(),
    }
}

/// `"7:00 PM - 8:30 PM"`, or just the start when there is no end.
pub fn format_time_range(start: &str, end: Option<&str>) -> String {
    match end.map(str::trim).filter(|e| !e.is_empty()) {
        Some(end) => format!("{} - {}", format_time_12h(start), format_time_12h(end)),
        None => format_time_12h(start),
    }
}

/// A short summary of when an activity happens.
///
/// Every day gives `"Daily"`, a single day gives `"<Day> at <time>"`, two to six
/// days give their abbreviations comma-joined, and no days give an empty string.
pub fn summarize(days: &[ActiveDay]) -> String {
    let mut distinct: Vec<WeekDay> = days.iter().map(|d| d.day).collect();
    distinct.sort();
    distinct.dedup();

    match distinct.len() {
        0 => String::new(),
        1 => {
            let only = &days[0];
            format!("{} at {}", only.day.name(), format_time_12h(&only.entry.start))
        }
        7 => labels::DAILY.to_string(),
        _ => distinct
            .iter()
            .map(|d| d.abbreviation())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// `"45 min"`, `"1 hr"`, `"1 hr 30 min"`. Zero or negative durations have no label.
pub fn duration_label(minutes: i32) -> Option<String> {
    if minutes <= 0 {
        return None;
    }
    let (hours, rest) = (minutes / 60, minutes % 60);
    Some(match (hours, rest) {
        (0, m) => format!("{} min", m),
        (h, 0) => format!("{} hr", h),
        (h, m) => format!("{} hr {} min", h, m),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScheduleEntry;

    fn active(day: WeekDay, start: &str) -> ActiveDay {
        ActiveDay {
            day,
            entry: ScheduleEntry::at(start),
        }
    }

    #[test]
    fn twelve_hour_formatting_handles_noon_and_midnight() {
        assert_eq!(format_time_12h("14:30"), "2:30 PM");
        assert_eq!(format_time_12h("00:00"), "12:00 AM");
        assert_eq!(format_time_12h("12:00"), "12:00 PM");
        assert_eq!(format_time_12h("23:59"), "11:59 PM");
        assert_eq!(format_time_12h("09:05"), "9:05 AM");
        assert_eq!(format_time_12h("06:45:00"), "6:45 AM");
    }

    #[test]
    fn unparseable_times_pass_through() {
        assert_eq!(format_time_12h("after Maariv"), "after Maariv");
        assert_eq!(format_time_12h("25:00"), "25:00");
        assert_eq!(format_time_12h(""), "");
    }

    #[test]
    fn time_range_omits_blank_end() {
        assert_eq!(format_time_range("19:00", Some("20:30")), "7:00 PM - 8:30 PM");
        assert_eq!(format_time_range("19:00", Some("")), "7:00 PM");
        assert_eq!(format_time_range("19:00", None), "7:00 PM");
    }

    #[test]
    fn summary_by_active_day_count() {
        let all: Vec<ActiveDay> = WeekDay::ALL.iter().map(|d| active(*d, "06:30")).collect();
        assert_eq!(summarize(&all), "Daily");

        assert_eq!(summarize(&[active(WeekDay::Tuesday, "09:15")]), "Tuesday at 9:15 AM");

        assert_eq!(
            summarize(&[active(WeekDay::Sunday, "08:00"), active(WeekDay::Wednesday, "20:00")]),
            "Sun, Wed"
        );

        let six: Vec<ActiveDay> = WeekDay::ALL[..6].iter().map(|d| active(*d, "06:30")).collect();
        assert_eq!(summarize(&six), "Sun, Mon, Tue, Wed, Thu, Fri");

        assert_eq!(summarize(&[]), "");
    }

    #[test]
    fn duration_labels() {
        assert_eq!(duration_label(45).as_deref(), Some("45 min"));
        assert_eq!(duration_label(60).as_deref(), Some("1 hr"));
        assert_eq!(duration_label(90).as_deref(), Some("1 hr 30 min"));
        assert_eq!(duration_label(0), None);
        assert_eq!(duration_label(-10), None);
    }
}
