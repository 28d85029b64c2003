//! crates/portal_core/src/domain.rs
//!
//! Defines the core data structures for the portal's listings and the weekly
//! recurrence model they embed. Persistence and HTTP shapes live in the `api`
//! service; only the two enums that cross the wire as-is derive serde here.

use crate::labels;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

//=========================================================================================
// WeekDay
//=========================================================================================

/// A day of the week, Sunday-first. Serialized as its index `0..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum WeekDay {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl WeekDay {
    /// All seven days in canonical display order.
    pub const ALL: [WeekDay; 7] = [
        WeekDay::Sunday,
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
        WeekDay::Saturday,
    ];

    /// Looks up a day by index, returning `None` for anything outside `0..=6`.
    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Parses a persisted map key. Only the exact strings `"0"`..`"6"` match.
    pub fn from_key(key: &str) -> Option<Self> {
        labels::WEEKDAY_KEYS
            .iter()
            .position(|k| *k == key)
            .map(|i| Self::ALL[i])
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn key(self) -> &'static str {
        labels::WEEKDAY_KEYS[self as usize]
    }

    pub fn name(self) -> &'static str {
        labels::WEEKDAY_NAMES[self as usize]
    }

    pub fn abbreviation(self) -> &'static str {
        labels::WEEKDAY_ABBREVIATIONS[self as usize]
    }
}

impl fmt::Display for WeekDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<WeekDay> for u8 {
    fn from(day: WeekDay) -> Self {
        day.index()
    }
}

/// Returned when an integer cannot name a weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("weekday index {0} is outside 0..=6")]
pub struct InvalidWeekDay(pub i64);

impl TryFrom<u8> for WeekDay {
    type Error = InvalidWeekDay;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        WeekDay::from_index(i64::from(value)).ok_or(InvalidWeekDay(i64::from(value)))
    }
}

impl From<WeekDay> for chrono::Weekday {
    fn from(day: WeekDay) -> Self {
        match day {
            WeekDay::Sunday => chrono::Weekday::Sun,
            WeekDay::Monday => chrono::Weekday::Mon,
            WeekDay::Tuesday => chrono::Weekday::Tue,
            WeekDay::Wednesday => chrono::Weekday::Wed,
            WeekDay::Thursday => chrono::Weekday::Thu,
            WeekDay::Friday => chrono::Weekday::Fri,
            WeekDay::Saturday => chrono::Weekday::Sat,
        }
    }
}

impl From<chrono::Weekday> for WeekDay {
    fn from(day: chrono::Weekday) -> Self {
        WeekDay::ALL[day.num_days_from_sunday() as usize]
    }
}

//=========================================================================================
// Weekly Recurrence Model
//=========================================================================================

/// One weekday's occurrence of a recurring activity.
///
/// `start` and `end` hold the persisted 24-hour `HH:MM` text. An entry whose
/// `start` is empty is treated as if the day were not scheduled at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduleEntry {
    pub start: String,
    pub end: Option<String>,
    pub notes: Option<String>,
}

impl ScheduleEntry {
    pub fn at(start: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: None,
            notes: None,
        }
    }

    pub fn with_end(mut self, end: impl Into<String>) -> Self {
        self.end = Some(end.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn is_active(&self) -> bool {
        !self.start.is_empty()
    }
}

/// A per-weekday map of time windows. Each day holds zero or one entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeeklySchedule {
    days: [Option<ScheduleEntry>; 7],
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, day: WeekDay) -> Option<&ScheduleEntry> {
        self.days[day as usize].as_ref()
    }

    /// Stores `entry` for `day`, returning whatever was there before.
    pub fn insert(&mut self, day: WeekDay, entry: ScheduleEntry) -> Option<ScheduleEntry> {
        self.days[day as usize].replace(entry)
    }

    pub fn remove(&mut self, day: WeekDay) -> Option<ScheduleEntry> {
        self.days[day as usize].take()
    }

    pub fn with(mut self, day: WeekDay, entry: ScheduleEntry) -> Self {
        self.insert(day, entry);
        self
    }

    /// Every stored entry, active or not, Sunday first.
    pub fn iter(&self) -> impl Iterator<Item = (WeekDay, &ScheduleEntry)> + '_ {
        WeekDay::ALL
            .iter()
            .filter_map(move |day| self.get(*day).map(|entry| (*day, entry)))
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Option::is_none)
    }
}

/// A normalized (day, entry) pair whose entry is known to be active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveDay {
    pub day: WeekDay,
    pub entry: ScheduleEntry,
}

/// The older single-day representation kept for records created before the
/// weekly map existed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LegacyRecurrence {
    pub day_of_week: Option<WeekDay>,
    pub time: Option<String>,
    pub duration_minutes: Option<i32>,
}

impl LegacyRecurrence {
    pub fn duration_label(&self) -> Option<String> {
        self.duration_minutes
            .and_then(crate::summary::duration_label)
    }
}

//=========================================================================================
// Listings
//=========================================================================================

/// A Torah class listing.
#[derive(Debug, Clone)]
pub struct Shiur {
    pub id: Uuid,
    pub title: String,
    pub teacher_title: Option<String>,
    pub teacher_name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    /// `None` means the record never had a weekly map; `Some` of an empty map
    /// means the owner explicitly cleared it.
    pub schedule: Option<WeeklySchedule>,
    pub legacy: LegacyRecurrence,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shiur {
    /// "Rabbi Cohen", or just the name when no honorific was given.
    pub fn teacher_display(&self) -> String {
        match self.teacher_title.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => {
                let title = labels::canonical_teacher_title(raw).unwrap_or(raw);
                format!("{} {}", title, self.teacher_name)
            }
            _ => self.teacher_name.clone(),
        }
    }
}

/// The editable fields of a shiur, used for both create and whole-record replace.
#[derive(Debug, Clone)]
pub struct NewShiur {
    pub title: String,
    pub teacher_title: Option<String>,
    pub teacher_name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub schedule: Option<WeeklySchedule>,
}

/// Which of the three daily prayer services a davening row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TefilahType {
    Shacharis,
    Mincha,
    Maariv,
}

impl TefilahType {
    pub const ALL: [TefilahType; 3] = [
        TefilahType::Shacharis,
        TefilahType::Mincha,
        TefilahType::Maariv,
    ];

    pub fn name(self) -> &'static str {
        labels::TEFILAH_NAMES[self as usize]
    }

    /// The lowercase value used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            TefilahType::Shacharis => "shacharis",
            TefilahType::Mincha => "mincha",
            TefilahType::Maariv => "maariv",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

/// Non-exclusive season and occasion markers on a davening row. None set means
/// year-round and not Shabbos-specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeasonFlags {
    pub is_winter: bool,
    pub is_summer: bool,
    pub is_shabbos: bool,
}

/// One row of a shul's prayer timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaveningSchedule {
    pub id: Uuid,
    pub shul_id: Uuid,
    pub tefilah_type: TefilahType,
    /// `None` means every day.
    pub day_of_week: Option<WeekDay>,
    pub time: String,
    pub notes: Option<String>,
    pub seasons: SeasonFlags,
}

#[derive(Debug, Clone)]
pub struct NewDavening {
    pub shul_id: Uuid,
    pub tefilah_type: TefilahType,
    pub day_of_week: Option<WeekDay>,
    pub time: String,
    pub notes: Option<String>,
    pub seasons: SeasonFlags,
}
