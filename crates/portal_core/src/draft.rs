//! crates/portal_core/src/draft.rs
//!
//! An editable working copy of a weekly schedule. Owners toggle days and type
//! times into the draft, then `commit` it into a `WeeklySchedule` in one step.

use crate::domain::{ScheduleEntry, WeekDay, WeeklySchedule};

/// Raised when a draft cannot be committed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("Please enter a start time for {day}")]
    MissingStart { day: WeekDay },
}

/// One day's slot in the draft. Disabled slots keep their text so toggling a
/// day back on restores what was typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayDraft {
    pub enabled: bool,
    pub start: String,
    pub end: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleDraft {
    days: [DayDraft; 7],
}

impl ScheduleDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a draft from a stored schedule. Days with an active entry are
    /// enabled; inactive stored entries keep their notes but stay disabled.
    pub fn from_schedule(schedule: &WeeklySchedule) -> Self {
        let mut draft = Self::new();
        for (day, entry) in schedule.iter() {
            draft.days[day as usize] = DayDraft {
                enabled: entry.is_active(),
                start: entry.start.clone(),
                end: entry.end.clone().unwrap_or_default(),
                notes: entry.notes.clone().unwrap_or_default(),
            };
        }
        draft
    }

    pub fn day(&self, day: WeekDay) -> &DayDraft {
        &self.days[day as usize]
    }

    pub fn enable(&mut self, day: WeekDay) -> &mut Self {
        self.days[day as usize].enabled = true;
        self
    }

    pub fn disable(&mut self, day: WeekDay) -> &mut Self {
        self.days[day as usize].enabled = false;
        self
    }

    pub fn toggle(&mut self, day: WeekDay) -> &mut Self {
        let slot = &mut self.days[day as usize];
        slot.enabled = !slot.enabled;
        self
    }

    pub fn set_start(&mut self, day: WeekDay, start: impl Into<String>) -> &mut Self {
        self.days[day as usize].start = start.into();
        self
    }

    pub fn set_end(&mut self, day: WeekDay, end: impl Into<String>) -> &mut Self {
        self.days[day as usize].end = end.into();
        self
    }

    pub fn set_notes(&mut self, day: WeekDay, notes: impl Into<String>) -> &mut Self {
        self.days[day as usize].notes = notes.into();
        self
    }

    /// Copies `from`'s start and end onto every other enabled day. Notes stay put.
    pub fn copy_times_to_enabled(&mut self, from: WeekDay) -> &mut Self {
        let source = self.days[from as usize].clone();
        for (index, slot) in self.days.iter_mut().enumerate() {
            if index != from as usize && slot.enabled {
                slot.start = source.start.clone();
                slot.end = source.end.clone();
            }
        }
        self
    }

    pub fn enabled_days(&self) -> Vec<WeekDay> {
        WeekDay::ALL
            .iter()
            .copied()
            .filter(|d| self.days[*d as usize].enabled)
            .collect()
    }

    /// Fails on the first enabled day, Sunday first, that has no start time.
    pub fn validate(&self) -> Result<(), DraftError> {
        match WeekDay::ALL
            .iter()
            .find(|d| {
                let slot = &self.days[**d as usize];
                slot.enabled && slot.start.trim().is_empty()
            }) {
            Some(day) => Err(DraftError::MissingStart { day: *day }),
            None => Ok(()),
        }
    }

    /// Produces the schedule holding exactly the enabled days, with values
    /// trimmed and blank `end`/`notes` dropped.
    pub fn commit(&self) -> Result<WeeklySchedule, DraftError> {
        self.validate()?;
        let schedule = WeekDay::ALL
            .iter()
            .filter(|d| self.days[**d as usize].enabled)
            .fold(WeeklySchedule::new(), |schedule, day| {
                let slot = &self.days[*day as usize];
                schedule.with(
                    *day,
                    ScheduleEntry {
                        start: slot.start.trim().to_string(),
                        end: non_blank(&slot.end),
                        notes: non_blank(&slot.notes),
                    },
                )
            });
        Ok(schedule)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::encode_schedule;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn commit_keeps_only_enabled_days() {
        let mut draft = ScheduleDraft::new();
        draft
            .enable(WeekDay::Monday)
            .set_start(WeekDay::Monday, " 20:00 ")
            .set_end(WeekDay::Monday, "21:00")
            .set_start(WeekDay::Tuesday, "19:00")
            .enable(WeekDay::Thursday)
            .set_start(WeekDay::Thursday, "20:00")
            .set_notes(WeekDay::Thursday, "Chumash");

        let schedule = draft.commit().unwrap();
        assert_eq!(
            encode_schedule(&schedule),
            json!({
                "1": {"start": "20:00", "end": "21:00", "notes": ""},
                "4": {"start": "20:00", "end": "", "notes": "Chumash"},
            })
        );
    }

    #[test]
    fn enabled_day_without_start_blocks_commit() {
        let mut draft = ScheduleDraft::new();
        draft
            .enable(WeekDay::Sunday)
            .set_start(WeekDay::Sunday, "09:00")
            .enable(WeekDay::Wednesday)
            .set_start(WeekDay::Wednesday, "   ")
            .enable(WeekDay::Friday);

        let err = draft.commit().unwrap_err();
        assert_matches!(&err, DraftError::MissingStart { day: WeekDay::Wednesday });
        assert_eq!(err.to_string(), "Please enter a start time for Wednesday");
    }

    #[test]
    fn end_before_start_is_not_rejected() {
        let mut draft = ScheduleDraft::new();
        draft
            .enable(WeekDay::Saturday)
            .set_start(WeekDay::Saturday, "22:00")
            .set_end(WeekDay::Saturday, "01:00");
        assert!(draft.commit().is_ok());
    }

    #[test]
    fn toggling_a_day_off_and_on_restores_its_times() {
        let mut draft = ScheduleDraft::new();
        draft.toggle(WeekDay::Tuesday).set_start(WeekDay::Tuesday, "07:00");
        draft.toggle(WeekDay::Tuesday);
        assert!(draft.commit().unwrap().is_empty());

        draft.toggle(WeekDay::Tuesday);
        assert_eq!(draft.enabled_days(), vec![WeekDay::Tuesday]);
        assert_eq!(draft.day(WeekDay::Tuesday).start, "07:00");
    }

    #[test]
    fn copying_times_fills_other_enabled_days() {
        let mut draft = ScheduleDraft::new();
        draft
            .enable(WeekDay::Sunday)
            .set_start(WeekDay::Sunday, "06:15")
            .set_end(WeekDay::Sunday, "07:00")
            .enable(WeekDay::Monday)
            .set_notes(WeekDay::Monday, "Vasikin")
            .copy_times_to_enabled(WeekDay::Sunday);

        assert_eq!(draft.day(WeekDay::Monday).start, "06:15");
        assert_eq!(draft.day(WeekDay::Monday).end, "07:00");
        assert_eq!(draft.day(WeekDay::Monday).notes, "Vasikin");
        assert_eq!(draft.day(WeekDay::Tuesday).start, "");
    }

    #[test]
    fn editing_a_stored_schedule_round_trips() {
        let stored = WeeklySchedule::new()
            .with(WeekDay::Sunday, ScheduleEntry::at("10:00").with_notes("Parsha"))
            .with(WeekDay::Friday, ScheduleEntry::default().with_notes("no class"));

        let draft = ScheduleDraft::from_schedule(&stored);
        assert_eq!(draft.enabled_days(), vec![WeekDay::Sunday]);
        assert_eq!(draft.day(WeekDay::Friday).notes, "no class");

        let committed = draft.commit().unwrap();
        assert_eq!(
            committed,
            WeeklySchedule::new().with(WeekDay::Sunday, ScheduleEntry::at("10:00").with_notes("Parsha"))
        );
    }
}
