//! Canonical time axis handling.
//!
//! A point in time is always an integer: either a calendar year or a day
//! offset from the canonical epoch. Day-kind variables carry their own
//! `zeroDay` anchor, and their raw offsets are shifted onto the canonical
//! epoch before joining so that all day columns share one axis.

use chrono::NaiveDate;

use crate::variable::VariableMetadata;

/// Integer point on a time axis: a calendar year or a canonical day offset.
pub type Time = i64;

/// The date that canonical day offset `0` refers to.
pub const EPOCH_DATE: &str = "2020-01-21";

/// The two time representations a variable can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeKind {
    Year,
    Day,
}

impl TimeKind {
    pub fn slug(self) -> &'static str {
        match self {
            TimeKind::Year => "year",
            TimeKind::Day => "day",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeKind::Year => "Year",
            TimeKind::Day => "Day",
        }
    }
}

/// The canonical epoch as a calendar date.
pub fn epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 21).expect("valid epoch date literal")
}

/// Shifts a raw per-variable day offset onto the canonical Day axis.
///
/// `canonical = raw + (zeroDay - epoch)` in whole days. Pure arithmetic;
/// overflow is unreachable for realistic date ranges.
pub fn to_canonical_day(raw_offset: Time, zero_day: NaiveDate) -> Time {
    raw_offset + (zero_day - epoch_date()).num_days()
}

/// Picks the canonical time kind for one join call: Day wins as soon as any
/// ingested variable stores day offsets, otherwise Year.
pub fn determine_time_kind<'a, I>(variables: I) -> TimeKind
where
    I: IntoIterator<Item = &'a VariableMetadata>,
{
    if variables.into_iter().any(|meta| meta.display.year_is_day) {
        TimeKind::Day
    } else {
        TimeKind::Year
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::VariableMetadata;

    fn day_variable(zero_day: &str) -> VariableMetadata {
        let mut meta = VariableMetadata::default();
        meta.display.year_is_day = true;
        meta.display.zero_day = Some(zero_day.to_string());
        meta
    }

    #[test]
    fn canonical_day_shifts_by_zero_day_delta() {
        // zeroDay two days after the epoch, raw offset -4 -> canonical -6.
        let zero_day = NaiveDate::from_ymd_opt(2020, 1, 19).unwrap();
        assert_eq!(to_canonical_day(-4, zero_day), -6);

        let at_epoch = epoch_date();
        assert_eq!(to_canonical_day(-4, at_epoch), -4);
        assert_eq!(to_canonical_day(0, at_epoch), 0);
    }

    #[test]
    fn day_wins_over_year() {
        let year = VariableMetadata::default();
        let day = day_variable("2020-01-21");

        assert_eq!(determine_time_kind([&year]), TimeKind::Year);
        assert_eq!(determine_time_kind([&year, &day]), TimeKind::Day);
        assert_eq!(determine_time_kind([]), TimeKind::Year);
    }
}
