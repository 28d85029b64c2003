//! crates/portal_core/src/grouping.rs
//!
//! Buckets listings by the first weekday they occur on, for calendar and
//! day-section views, plus the day filter behind the listing dropdown.

use crate::domain::{ActiveDay, WeekDay};
use crate::labels;
use crate::schedule::Recurring;

/// The calendar column a listing is rendered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DayBucket {
    Day(WeekDay),
    /// Listings with no active day ("Flexible Schedule").
    Unscheduled,
}

impl DayBucket {
    pub const UNSCHEDULED_INDEX: i8 = -1;

    /// The lowest active day, or `Unscheduled` when there is none.
    pub fn of(days: &[ActiveDay]) -> Self {
        days.iter()
            .map(|d| d.day)
            .min()
            .map_or(DayBucket::Unscheduled, DayBucket::Day)
    }

    /// `0..=6` for days, `-1` for the unscheduled bucket.
    pub fn index(self) -> i8 {
        match self {
            DayBucket::Day(day) => day.index() as i8,
            DayBucket::Unscheduled => Self::UNSCHEDULED_INDEX,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayBucket::Day(day) => day.name(),
            DayBucket::Unscheduled => labels::FLEXIBLE_SCHEDULE,
        }
    }
}

/// Listings split into the seven day buckets plus the unscheduled bucket.
/// Arrival order is kept within each bucket.
#[derive(Debug, Clone)]
pub struct ScheduleGroups<T> {
    days: [Vec<T>; 7],
    unscheduled: Vec<T>,
}

impl<T> ScheduleGroups<T> {
    fn new() -> Self {
        Self {
            days: std::array::from_fn(|_| Vec::new()),
            unscheduled: Vec::new(),
        }
    }

    fn push(&mut self, bucket: DayBucket, item: T) {
        match bucket {
            DayBucket::Day(day) => self.days[day as usize].push(item),
            DayBucket::Unscheduled => self.unscheduled.push(item),
        }
    }

    pub fn bucket(&self, bucket: DayBucket) -> &[T] {
        match bucket {
            DayBucket::Day(day) => &self.days[day as usize],
            DayBucket::Unscheduled => &self.unscheduled,
        }
    }

    /// Total number of listings across all buckets.
    pub fn len(&self) -> usize {
        self.days.iter().map(Vec::len).sum::<usize>() + self.unscheduled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every bucket, Sunday through Saturday, then unscheduled. Empty buckets
    /// are included so a calendar can render its full grid.
    pub fn into_buckets(self) -> Vec<(DayBucket, Vec<T>)> {
        WeekDay::ALL
            .iter()
            .map(|d| DayBucket::Day(*d))
            .zip(self.days)
            .chain(std::iter::once((DayBucket::Unscheduled, self.unscheduled)))
            .collect()
    }
}

pub fn group_by_primary_day<T, I>(items: I) -> ScheduleGroups<T>
where
    T: Recurring,
    I: IntoIterator<Item = T>,
{
    let mut groups = ScheduleGroups::new();
    for item in items {
        let bucket = DayBucket::of(&item.active_days());
        groups.push(bucket, item);
    }
    groups
}

/// Listings active on `day` at all, not only those whose first day it is.
pub fn filter_by_day<T: Recurring>(items: &[T], day: WeekDay) -> Vec<&T> {
    items
        .iter()
        .filter(|item| item.active_days().iter().any(|d| d.day == day))
        .collect()
}

/// The weekdays at least one listing is active on, ascending.
pub fn day_options<T: Recurring>(items: &[T]) -> Vec<WeekDay> {
    let mut seen = [false; 7];
    for item in items {
        for active in item.active_days() {
            seen[active.day as usize] = true;
        }
    }
    WeekDay::ALL
        .iter()
        .copied()
        .filter(|d| seen[*d as usize])
        .collect()
}
