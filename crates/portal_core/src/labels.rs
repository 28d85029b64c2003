//! crates/portal_core/src/labels.rs
//!
//! The one lookup table for every fixed display label in the portal. Components
//! read from here instead of re-declaring their own copies.

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

pub const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Persisted map keys, indexed by weekday.
pub const WEEKDAY_KEYS: [&str; 7] = ["0", "1", "2", "3", "4", "5", "6"];

pub const DAILY: &str = "Daily";
pub const FLEXIBLE_SCHEDULE: &str = "Flexible Schedule";

pub const TEFILAH_NAMES: [&str; 3] = ["Shacharis", "Mincha", "Maariv"];

pub const WINTER: &str = "Winter";
pub const SUMMER: &str = "Summer";
pub const SHABBOS: &str = "Shabbos";
pub const YEAR_ROUND: &str = "Year-round";

/// Honorifics offered when entering a shiur's teacher.
pub const TEACHER_TITLES: [&str; 7] = ["Rabbi", "Rav", "Rebbetzin", "Rebbi", "Dr.", "Mr.", "Mrs."];

/// Returns the canonical spelling of a known honorific, matching case-insensitively
/// and ignoring a trailing period.
pub fn canonical_teacher_title(raw: &str) -> Option<&'static str> {
    let wanted = raw.trim().trim_end_matches('.');
    TEACHER_TITLES
        .iter()
        .copied()
        .find(|title| title.trim_end_matches('.').eq_ignore_ascii_case(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teacher_titles_are_matched_loosely() {
        assert_eq!(canonical_teacher_title("rabbi"), Some("Rabbi"));
        assert_eq!(canonical_teacher_title(" DR "), Some("Dr."));
        assert_eq!(canonical_teacher_title("Mrs."), Some("Mrs."));
        assert_eq!(canonical_teacher_title("Professor"), None);
    }
}
