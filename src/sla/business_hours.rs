//! Business-hours arithmetic
//!
//! Day-granularity model: every qualifying day in the inclusive
//! creation..resolution date range is credited a full 24-hour block,
//! including the start and end day themselves. A day qualifies iff it falls
//! Monday-Friday and is not a holiday in its own year's calendar. No
//! partial-hour credit on the boundary days; a same-day ticket is worth
//! 24h when the day qualifies and 0h otherwise.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::holidays::HolidayProvider;

pub struct BusinessHoursCalculator {
    holidays: Arc<HolidayProvider>,
}

impl BusinessHoursCalculator {
    pub fn new(holidays: Arc<HolidayProvider>) -> Self {
        Self { holidays }
    }

    /// Elapsed business hours between `start` and `end`.
    ///
    /// Returns `None` when either timestamp is absent (unresolved or
    /// malformed record) and `Some(0.0)` when `end` precedes `start` — the
    /// chronology anomaly is floored here and reported separately by the
    /// data-quality audit. The result is rounded to 2 decimal places and
    /// never negative.
    pub async fn business_hours(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Option<f64> {
        let (start, end) = match (start, end) {
            (Some(s), Some(e)) => (s, e),
            _ => return None,
        };

        if end < start {
            return Some(0.0);
        }

        // A range may cross a year boundary; classification needs the
        // union of every spanned year's holiday set.
        let mut holidays: BTreeSet<NaiveDate> = BTreeSet::new();
        for year in start.date().year()..=end.date().year() {
            let set = self.holidays.holidays_for(year).await;
            holidays.extend(set.iter().copied());
        }

        let mut business_days: u64 = 0;
        let mut day = start.date();
        let last = end.date();
        while day <= last {
            if is_business_day(day, &holidays) {
                business_days += 1;
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        Some(round_hours(business_days as f64 * 24.0))
    }
}

fn is_business_day(day: NaiveDate, holidays: &BTreeSet<NaiveDate>) -> bool {
    !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) && !holidays.contains(&day)
}

fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holidays::source::{HolidayFetchError, HolidaySource};
    use async_trait::async_trait;

    /// Source that always fails, for tests driving the calculator purely
    /// through seeded calendars.
    struct UnreachableSource;

    #[async_trait]
    impl HolidaySource for UnreachableSource {
        async fn fetch_year(&self, year: i32) -> Result<BTreeSet<NaiveDate>, HolidayFetchError> {
            Err(HolidayFetchError::Status { year, status: 503 })
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    async fn calculator_with(seeds: Vec<(i32, Vec<NaiveDate>)>) -> BusinessHoursCalculator {
        let provider = HolidayProvider::new(Arc::new(UnreachableSource));
        for (year, days) in seeds {
            provider.seed(year, days.into_iter().collect()).await;
        }
        BusinessHoursCalculator::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn test_missing_timestamp_yields_none() {
        let calc = calculator_with(vec![(2024, vec![])]).await;
        assert_eq!(calc.business_hours(None, Some(at(2024, 1, 2, 9))).await, None);
        assert_eq!(calc.business_hours(Some(at(2024, 1, 2, 9)), None).await, None);
        assert_eq!(calc.business_hours(None, None).await, None);
    }

    #[tokio::test]
    async fn test_reversed_chronology_floors_at_zero() {
        let calc = calculator_with(vec![(2024, vec![])]).await;
        let hours = calc
            .business_hours(Some(at(2024, 1, 5, 9)), Some(at(2024, 1, 2, 9)))
            .await;
        assert_eq!(hours, Some(0.0));
    }

    #[tokio::test]
    async fn test_same_day_business_day_counts_full_block() {
        // 2024-01-02 is a Tuesday
        let calc = calculator_with(vec![(2024, vec![])]).await;
        let hours = calc
            .business_hours(Some(at(2024, 1, 2, 9)), Some(at(2024, 1, 2, 17)))
            .await;
        assert_eq!(hours, Some(24.0));
    }

    #[tokio::test]
    async fn test_same_day_weekend_counts_zero() {
        // 2024-01-06 is a Saturday
        let calc = calculator_with(vec![(2024, vec![])]).await;
        let hours = calc
            .business_hours(Some(at(2024, 1, 6, 9)), Some(at(2024, 1, 6, 17)))
            .await;
        assert_eq!(hours, Some(0.0));
    }

    #[tokio::test]
    async fn test_same_day_holiday_counts_zero() {
        // 2024-05-01 is a Wednesday, seeded as a holiday
        let calc = calculator_with(vec![(2024, vec![date(2024, 5, 1)])]).await;
        let hours = calc
            .business_hours(Some(at(2024, 5, 1, 9)), Some(at(2024, 5, 1, 17)))
            .await;
        assert_eq!(hours, Some(0.0));
    }

    #[tokio::test]
    async fn test_weekend_span_skips_saturday_and_sunday() {
        // Friday 2024-01-05 through Monday 2024-01-08: Fri + Mon qualify
        let calc = calculator_with(vec![(2024, vec![])]).await;
        let hours = calc
            .business_hours(Some(at(2024, 1, 5, 9)), Some(at(2024, 1, 8, 9)))
            .await;
        assert_eq!(hours, Some(48.0));
    }

    #[tokio::test]
    async fn test_holiday_inside_range_is_excluded() {
        // Tue 2024-04-30 .. Thu 2024-05-02 with May 1 seeded: Tue + Thu
        let calc = calculator_with(vec![(2024, vec![date(2024, 5, 1)])]).await;
        let hours = calc
            .business_hours(Some(at(2024, 4, 30, 8)), Some(at(2024, 5, 2, 18)))
            .await;
        assert_eq!(hours, Some(48.0));
    }

    #[tokio::test]
    async fn test_year_boundary_unions_both_calendars() {
        // Fri 2023-12-29 .. Tue 2024-01-02. Jan 1 is a holiday only in the
        // 2024 calendar; the range must pick it up from there.
        let calc =
            calculator_with(vec![(2023, vec![]), (2024, vec![date(2024, 1, 1)])]).await;
        let hours = calc
            .business_hours(Some(at(2023, 12, 29, 9)), Some(at(2024, 1, 2, 9)))
            .await;
        // Fri 29 counts, Sat 30 / Sun 31 are weekend, Mon Jan 1 is a
        // holiday, Tue Jan 2 counts.
        assert_eq!(hours, Some(48.0));
    }

    #[tokio::test]
    async fn test_unavailable_calendar_degrades_to_holiday_free() {
        // Nothing seeded: every lookup fails and the year is treated as
        // having no holidays. Mon 2024-01-01 then qualifies.
        let calc = calculator_with(vec![]).await;
        let hours = calc
            .business_hours(Some(at(2024, 1, 1, 9)), Some(at(2024, 1, 1, 10)))
            .await;
        assert_eq!(hours, Some(24.0));
    }
}
