//! Calendar periods and day bucketing of visits.
//!
//! All comparisons happen on [`NaiveDate`] values: a visit belongs to a day
//! when its scheduled calendar date equals that day, whatever the time zone
//! of the viewer.

use chrono::{DateTime, Datelike, Days, Local, Months, NaiveDate, TimeZone};
use serde::Serialize;

use crate::domain::types::{CrewId, TypeConstraintError};
use crate::domain::visit::Visit;
use crate::filter::DateRange;

/// Canonical textual form of a calendar date.
pub const CALENDAR_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum Granularity {
    Day,
    /// Seven days starting on Monday.
    Week,
    Month,
}

/// Visits scheduled on one calendar date.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub visits: Vec<Visit>,
}

impl DayBucket {
    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }
}

/// Visits of a single crew, used by the daily view.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CrewBucket {
    pub crew_id: CrewId,
    /// Name copied from the first visit; the daily agenda replaces it with the
    /// current crew name.
    pub crew_name: String,
    pub visits: Vec<Visit>,
}

/// Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Ordered dates of the period containing `reference`.
pub fn period_dates(reference: NaiveDate, granularity: Granularity) -> Vec<NaiveDate> {
    match granularity {
        Granularity::Day => vec![reference],
        Granularity::Week => week_start(reference).iter_days().take(7).collect(),
        Granularity::Month => {
            let first = month_start(reference);
            first
                .iter_days()
                .take_while(|day| day.month() == first.month())
                .collect()
        }
    }
}

/// First and last date of the period containing `reference`.
pub fn period_range(reference: NaiveDate, granularity: Granularity) -> DateRange {
    let dates = period_dates(reference, granularity);
    let start = dates.first().copied().unwrap_or(reference);
    let end = dates.last().copied().unwrap_or(reference);
    DateRange::new(start, end)
}

/// Partitions `visits` into one bucket per date of the period.
///
/// Days without visits yield empty buckets. Visits outside the period are
/// not part of any bucket.
pub fn bucket(visits: &[Visit], reference: NaiveDate, granularity: Granularity) -> Vec<DayBucket> {
    period_dates(reference, granularity)
        .into_iter()
        .map(|date| DayBucket {
            date,
            visits: visits
                .iter()
                .filter(|visit| visit.scheduled_on == date)
                .cloned()
                .collect(),
        })
        .collect()
}

/// Groups `visits` by crew, crews ordered by first appearance.
pub fn bucket_by_crew(visits: &[Visit]) -> Vec<CrewBucket> {
    let mut buckets: Vec<CrewBucket> = Vec::new();
    for visit in visits {
        match buckets.iter_mut().find(|b| b.crew_id == visit.crew_id) {
            Some(bucket) => bucket.visits.push(visit.clone()),
            None => buckets.push(CrewBucket {
                crew_id: visit.crew_id.clone(),
                crew_name: visit.crew_name.to_string(),
                visits: vec![visit.clone()],
            }),
        }
    }
    buckets
}

/// Moves `reference` by `steps` periods. Month steps clamp the day of month.
///
/// Returns `reference` unchanged if the result would leave chrono's date range.
pub fn shift(reference: NaiveDate, granularity: Granularity, steps: i32) -> NaiveDate {
    let magnitude = steps.unsigned_abs();
    let shifted = match granularity {
        Granularity::Day | Granularity::Week => {
            let per_step = if granularity == Granularity::Week { 7 } else { 1 };
            let days = Days::new(u64::from(magnitude) * per_step);
            if steps >= 0 {
                reference.checked_add_days(days)
            } else {
                reference.checked_sub_days(days)
            }
        }
        Granularity::Month => {
            let months = Months::new(magnitude);
            if steps >= 0 {
                reference.checked_add_months(months)
            } else {
                reference.checked_sub_months(months)
            }
        }
    };
    shifted.unwrap_or(reference)
}

/// Reads a stored date string as a calendar date.
///
/// Accepts `YYYY-MM-DD` as well as a local timestamp such as
/// `YYYY-MM-DDTHH:MM:SS`, in which case only the date part is kept.
pub fn parse_calendar_date(value: &str) -> Result<NaiveDate, TypeConstraintError> {
    let trimmed = value.trim();
    let date_part = trimmed
        .split(['T', ' '])
        .next()
        .unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, CALENDAR_DATE_FORMAT)
        .map_err(|_| TypeConstraintError::InvalidDate(trimmed.to_string()))
}

pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(CALENDAR_DATE_FORMAT).to_string()
}

/// Calendar date of `instant` from its own local year, month and day.
///
/// A drop target at 22:00 on July 1st in UTC-5 is July 1st, even though the
/// same instant is already July 2nd in UTC.
pub fn local_calendar_date<Tz: TimeZone>(instant: &DateTime<Tz>) -> NaiveDate {
    instant.date_naive()
}

/// Today's date in the machine's local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Weekday};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_starts_on_monday_on_or_before_reference() {
        // Sunday 2024-06-30 belongs to the week of Monday 2024-06-24.
        let dates = period_dates(date(2024, 6, 30), Granularity::Week);
        assert_eq!(dates.len(), 7);
        assert_eq!(dates[0], date(2024, 6, 24));
        assert_eq!(dates[0].weekday(), Weekday::Mon);
        assert!(dates.windows(2).all(|w| w[1] == w[0].succ_opt().unwrap()));

        let monday = period_dates(date(2024, 6, 24), Granularity::Week);
        assert_eq!(monday[0], date(2024, 6, 24));
    }

    #[test]
    fn month_spans_all_days() {
        assert_eq!(period_dates(date(2024, 2, 10), Granularity::Month).len(), 29);
        assert_eq!(period_dates(date(2023, 2, 10), Granularity::Month).len(), 28);
        let december = period_dates(date(2024, 12, 31), Granularity::Month);
        assert_eq!(december.first(), Some(&date(2024, 12, 1)));
        assert_eq!(december.last(), Some(&date(2024, 12, 31)));
        assert_eq!(period_dates(date(2024, 5, 5), Granularity::Day), vec![date(2024, 5, 5)]);
    }

    #[test]
    fn shift_moves_by_period() {
        assert_eq!(shift(date(2024, 1, 31), Granularity::Month, 1), date(2024, 2, 29));
        assert_eq!(shift(date(2024, 3, 31), Granularity::Month, -1), date(2024, 2, 29));
        assert_eq!(shift(date(2024, 6, 25), Granularity::Week, -1), date(2024, 6, 18));
        assert_eq!(shift(date(2024, 6, 30), Granularity::Day, 2), date(2024, 7, 2));
    }

    #[test]
    fn parses_plain_and_timestamped_dates() {
        assert_eq!(parse_calendar_date("2024-06-25"), Ok(date(2024, 6, 25)));
        assert_eq!(
            parse_calendar_date("2024-06-25T00:00:00"),
            Ok(date(2024, 6, 25))
        );
        assert!(matches!(
            parse_calendar_date("25/06/2024"),
            Err(TypeConstraintError::InvalidDate(_))
        ));
        assert_eq!(format_calendar_date(date(2024, 7, 1)), "2024-07-01");
    }

    #[test]
    fn drop_target_uses_local_components() {
        let offset = FixedOffset::west_opt(5 * 3600).unwrap();
        let instant = offset.with_ymd_and_hms(2024, 7, 1, 22, 0, 0).unwrap();
        assert_eq!(local_calendar_date(&instant), date(2024, 7, 1));
        assert_eq!(instant.naive_utc().date(), date(2024, 7, 2));
    }
}
