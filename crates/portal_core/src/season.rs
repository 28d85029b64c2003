//! crates/portal_core/src/season.rs
//!
//! Badges and ordering for a shul's davening timetable.

use crate::domain::{DaveningSchedule, SeasonFlags, WeekDay};
use crate::labels;
use crate::summary::format_time_12h;
use chrono::NaiveTime;

impl SeasonFlags {
    /// Badge labels in fixed Winter, Summer, Shabbos order; `["Year-round"]` when
    /// no flag is set.
    pub fn labels(&self) -> Vec<&'static str> {
        let badges: Vec<&'static str> = [
            (self.is_winter, labels::WINTER),
            (self.is_summer, labels::SUMMER),
            (self.is_shabbos, labels::SHABBOS),
        ]
        .into_iter()
        .filter_map(|(set, label)| set.then_some(label))
        .collect();

        if badges.is_empty() {
            vec![labels::YEAR_ROUND]
        } else {
            badges
        }
    }

    /// Builds flags from nullable stored booleans, where null means unset.
    pub fn from_nullable(
        is_winter: Option<bool>,
        is_summer: Option<bool>,
        is_shabbos: Option<bool>,
    ) -> Self {
        Self {
            is_winter: is_winter.unwrap_or(false),
            is_summer: is_summer.unwrap_or(false),
            is_shabbos: is_shabbos.unwrap_or(false),
        }
    }
}

impl DaveningSchedule {
    /// `"Daily"` for every-day rows, otherwise the day name.
    pub fn day_label(&self) -> &'static str {
        self.day_of_week.map_or(labels::DAILY, WeekDay::name)
    }

    pub fn applies_on(&self, day: WeekDay) -> bool {
        self.day_of_week.map_or(true, |d| d == day)
    }

    pub fn time_display(&self) -> String {
        format_time_12h(&self.time)
    }
}

/// Orders rows by tefilah, then every-day rows before specific days, then by
/// time. Rows whose time does not parse sort after those that do.
pub fn sort_for_display(rows: &mut [DaveningSchedule]) {
    rows.sort_by_cached_key(|row| {
        let parsed = NaiveTime::parse_from_str(row.time.trim(), "%H:%M").ok();
        (
            row.tefilah_type,
            row.day_of_week.map(|d| d.index()),
            parsed.is_none(),
            parsed,
            row.time.clone(),
        )
    });
}
