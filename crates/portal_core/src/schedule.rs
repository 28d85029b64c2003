//! crates/portal_core/src/schedule.rs
//!
//! Decoding, encoding and normalization of the weekly recurrence model.
//!
//! Persisted schedules are read from raw JSON and decoded tolerantly: a bad key,
//! a non-object value or a non-string `start` drops that one day and nothing else.

use crate::domain::{ActiveDay, LegacyRecurrence, ScheduleEntry, Shiur, WeekDay, WeeklySchedule};
use serde_json::{json, Map, Value};
use tracing::debug;

//=========================================================================================
// Normalization
//=========================================================================================

/// Anything carrying a weekly map and/or the legacy single-day fields.
pub trait Recurring {
    fn schedule(&self) -> Option<&WeeklySchedule>;
    fn legacy(&self) -> &LegacyRecurrence;

    /// The canonical, Sunday-first list of days this activity happens on.
    fn active_days(&self) -> Vec<ActiveDay> {
        normalize(self.schedule(), self.legacy())
    }
}

impl Recurring for Shiur {
    fn schedule(&self) -> Option<&WeeklySchedule> {
        self.schedule.as_ref()
    }

    fn legacy(&self) -> &LegacyRecurrence {
        &self.legacy
    }
}

impl<T: Recurring + ?Sized> Recurring for &T {
    fn schedule(&self) -> Option<&WeeklySchedule> {
        (**self).schedule()
    }

    fn legacy(&self) -> &LegacyRecurrence {
        (**self).legacy()
    }
}

/// Produces the active days for a listing.
///
/// A present schedule is the whole answer, even when it has no active day. The
/// legacy pair is consulted only when there is no schedule at all.
pub fn normalize(schedule: Option<&WeeklySchedule>, legacy: &LegacyRecurrence) -> Vec<ActiveDay> {
    if let Some(schedule) = schedule {
        return schedule
            .iter()
            .filter(|(_, entry)| entry.is_active())
            .map(|(day, entry)| ActiveDay {
                day,
                entry: entry.clone(),
            })
            .collect();
    }

    match (legacy.day_of_week, legacy.time.as_deref()) {
        (Some(day), Some(time)) if !time.is_empty() => vec![ActiveDay {
            day,
            entry: ScheduleEntry::at(time),
        }],
        _ => Vec::new(),
    }
}

/// Normalizes a raw listing record with `schedule`, `dayOfWeek` and `time` fields.
pub fn normalize_record(record: &Value) -> Vec<ActiveDay> {
    let schedule = record.get("schedule").and_then(decode_schedule);
    let legacy = LegacyRecurrence {
        day_of_week: record
            .get("dayOfWeek")
            .and_then(Value::as_i64)
            .and_then(WeekDay::from_index),
        time: record
            .get("time")
            .and_then(Value::as_str)
            .map(str::to_string),
        duration_minutes: record
            .get("duration")
            .and_then(Value::as_i64)
            .and_then(|d| i32::try_from(d).ok()),
    };
    normalize(schedule.as_ref(), &legacy)
}

impl WeeklySchedule {
    /// Rebuilds a schedule from normalized pairs. Later duplicates of a day win.
    pub fn from_active_days(days: &[ActiveDay]) -> Self {
        days.iter().fold(WeeklySchedule::new(), |schedule, active| {
            schedule.with(active.day, active.entry.clone())
        })
    }
}

//=========================================================================================
// Wire Format
//=========================================================================================

/// Decodes a persisted `schedule` value.
///
/// Returns `None` for the values a listing uses to mean "no schedule": `null`,
/// `false`, `0` and the empty string. Any other value is a present schedule; only
/// its well-formed days survive.
pub fn decode_schedule(value: &Value) -> Option<WeeklySchedule> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Object(map) => Some(decode_map(map)),
        other => {
            debug!("Schedule value is not an object, treating as empty: {}", other);
            Some(WeeklySchedule::new())
        }
    }
}

fn decode_map(map: &Map<String, Value>) -> WeeklySchedule {
    for key in map.keys() {
        if WeekDay::from_key(key).is_none() {
            debug!("Ignoring schedule key {:?}", key);
        }
    }

    WeekDay::ALL
        .iter()
        .filter_map(|day| {
            let raw = map.get(day.key())?;
            match decode_entry(raw) {
                Some(entry) => Some((*day, entry)),
                None => {
                    debug!("Ignoring malformed schedule entry for {}: {}", day, raw);
                    None
                }
            }
        })
        .fold(WeeklySchedule::new(), |schedule, (day, entry)| {
            schedule.with(day, entry)
        })
}

fn decode_entry(value: &Value) -> Option<ScheduleEntry> {
    let object = value.as_object()?;
    let start = object.get("start")?.as_str()?.to_string();
    Some(ScheduleEntry {
        start,
        end: optional_text(object.get("end")),
        notes: optional_text(object.get("notes")),
    })
}

/// Non-empty strings survive; anything else reads as absent.
fn optional_text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Encodes a schedule in the persisted shape: string keys `"0"`..`"6"`, and
/// `end`/`notes` always present as strings.
pub fn encode_schedule(schedule: &WeeklySchedule) -> Value {
    let map: Map<String, Value> = schedule
        .iter()
        .map(|(day, entry)| {
            (
                day.key().to_string(),
                json!({
                    "start": entry.start,
                    "end": entry.end.as_deref().unwrap_or(""),
                    "notes": entry.notes.as_deref().unwrap_or(""),
                }),
            )
        })
        .collect();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy(day: Option<i64>, time: Option<&str>) -> LegacyRecurrence {
        LegacyRecurrence {
            day_of_week: day.and_then(WeekDay::from_index),
            time: time.map(str::to_string),
            duration_minutes: None,
        }
    }

    #[test]
    fn schedule_days_come_out_sunday_first() {
        let schedule = decode_schedule(&json!({
            "5": {"start": "19:00", "end": "20:00", "notes": ""},
            "1": {"start": "07:30", "end": "", "notes": "Beis midrash"},
            "3": {"start": "", "end": "", "notes": ""},
        }))
        .unwrap();

        let days = normalize(Some(&schedule), &LegacyRecurrence::default());
        let order: Vec<WeekDay> = days.iter().map(|d| d.day).collect();
        assert_eq!(order, vec![WeekDay::Monday, WeekDay::Friday]);
        assert_eq!(days[0].entry.notes.as_deref(), Some("Beis midrash"));
        assert_eq!(days[0].entry.end, None);
        assert_eq!(days[1].entry.end.as_deref(), Some("20:00"));
    }

    #[test]
    fn explicitly_empty_schedule_suppresses_legacy_fields() {
        let schedule = decode_schedule(&json!({
            "0": {"start": "", "end": "", "notes": ""},
            "4": {"start": "", "end": "", "notes": "cancelled"},
        }));
        assert!(schedule.is_some());

        let days = normalize(schedule.as_ref(), &legacy(Some(2), Some("10:00")));
        assert!(days.is_empty());
    }

    #[test]
    fn null_schedule_falls_back_to_legacy_pair() {
        let days = normalize(None, &legacy(Some(5), Some("19:00")));
        assert_eq!(
            days,
            vec![ActiveDay {
                day: WeekDay::Friday,
                entry: ScheduleEntry::at("19:00"),
            }]
        );
    }

    #[test]
    fn legacy_pair_needs_both_day_and_time() {
        assert!(normalize(None, &legacy(Some(0), None)).is_empty());
        assert!(normalize(None, &legacy(Some(0), Some(""))).is_empty());
        assert!(normalize(None, &legacy(None, Some("09:00"))).is_empty());
        // Sunday is index 0 and must not be mistaken for "unset".
        assert_eq!(normalize(None, &legacy(Some(0), Some("09:00"))).len(), 1);
    }

    #[test]
    fn malformed_entries_are_dropped_without_failing() {
        let schedule = decode_schedule(&json!({
            "9": {"start": "10:00"},
            "x": {"start": "10:00"},
            "1": {"start": 123},
            "2": "09:00",
            "3": null,
            "4": {"start": "18:00", "end": 5, "notes": ["x"]},
        }))
        .unwrap();

        let days = normalize(Some(&schedule), &LegacyRecurrence::default());
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].day, WeekDay::Thursday);
        assert_eq!(days[0].entry, ScheduleEntry::at("18:00"));
    }

    #[test]
    fn falsy_schedule_values_count_as_absent() {
        assert!(decode_schedule(&Value::Null).is_none());
        assert!(decode_schedule(&json!(false)).is_none());
        assert!(decode_schedule(&json!("")).is_none());
        assert!(decode_schedule(&json!(0)).is_none());
        assert_eq!(decode_schedule(&json!([])), Some(WeeklySchedule::new()));
        assert_eq!(decode_schedule(&json!("garbage")), Some(WeeklySchedule::new()));
    }

    #[test]
    fn normalizing_normalized_output_is_stable() {
        let schedule = decode_schedule(&json!({
            "0": {"start": "08:00", "end": "09:00", "notes": "Gemara"},
            "2": {"start": "20:15", "end": "", "notes": ""},
            "6": {"start": "", "end": "", "notes": ""},
        }))
        .unwrap();
        let first = normalize(Some(&schedule), &LegacyRecurrence::default());

        let rewrapped = WeeklySchedule::from_active_days(&first);
        let second = normalize(Some(&rewrapped), &LegacyRecurrence::default());
        assert_eq!(first, second);
    }

    #[test]
    fn encoded_schedule_uses_string_keys_and_blank_optionals() {
        let schedule = WeeklySchedule::new()
            .with(WeekDay::Sunday, ScheduleEntry::at("08:00"))
            .with(
                WeekDay::Tuesday,
                ScheduleEntry::at("19:30").with_end("20:30").with_notes("Women's shiur"),
            );

        assert_eq!(
            encode_schedule(&schedule),
            json!({
                "0": {"start": "08:00", "end": "", "notes": ""},
                "2": {"start": "19:30", "end": "20:30", "notes": "Women's shiur"},
            })
        );
        assert_eq!(decode_schedule(&encode_schedule(&schedule)), Some(schedule));
    }

    #[test]
    fn raw_records_are_normalized_directly() {
        let with_schedule = json!({
            "schedule": {"3": {"start": "21:00", "end": "", "notes": ""}},
            "dayOfWeek": 1,
            "time": "06:00",
        });
        let days = normalize_record(&with_schedule);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].day, WeekDay::Wednesday);

        let legacy_only = json!({"schedule": null, "dayOfWeek": 1, "time": "06:00", "duration": 45});
        assert_eq!(normalize_record(&legacy_only)[0].day, WeekDay::Monday);

        let out_of_range = json!({"dayOfWeek": 8, "time": "06:00"});
        assert!(normalize_record(&out_of_range).is_empty());

        assert!(normalize_record(&json!({})).is_empty());
    }
}
