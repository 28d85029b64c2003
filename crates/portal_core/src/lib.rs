pub mod domain;
pub mod draft;
pub mod grouping;
pub mod labels;
pub mod ports;
pub mod schedule;
pub mod season;
pub mod summary;

pub use domain::{
    ActiveDay, DaveningSchedule, InvalidWeekDay, LegacyRecurrence, NewDavening, NewShiur,
    ScheduleEntry, SeasonFlags, Shiur, TefilahType, WeekDay, WeeklySchedule,
};
pub use draft::{DraftError, ScheduleDraft};
pub use grouping::{day_options, filter_by_day, group_by_primary_day, DayBucket, ScheduleGroups};
pub use ports::{ListingRepository, PortError, PortResult};
pub use schedule::{decode_schedule, encode_schedule, normalize, normalize_record, Recurring};
pub use summary::{format_time_12h, format_time_range, summarize};
