//! Calendar windows used by dashboards, budgets and reports.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// Granularity of a reporting window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// The window of this granularity that contains `today`.
    ///
    /// Weeks run Monday to Sunday.
    pub fn window(self, today: NaiveDate) -> ResultEngine<DateRange> {
        match self {
            Self::Daily => Ok(DateRange { start: today, end: today }),
            Self::Weekly => {
                let back = u64::from(today.weekday().num_days_from_monday());
                let start = today.checked_sub_days(Days::new(back)).ok_or_else(out_of_range)?;
                let end = start.checked_add_days(Days::new(6)).ok_or_else(out_of_range)?;
                Ok(DateRange { start, end })
            }
            Self::Monthly => DateRange::month(today.year(), today.month()),
            Self::Yearly => DateRange::year(today.year()),
        }
    }

    /// The window of the same granularity immediately preceding `window`.
    pub fn previous(self, window: DateRange) -> ResultEngine<DateRange> {
        let prev_end = window.start.pred_opt().ok_or_else(out_of_range)?;
        match self {
            Self::Daily => Ok(DateRange { start: prev_end, end: prev_end }),
            Self::Weekly => {
                let start = window
                    .start
                    .checked_sub_days(Days::new(7))
                    .ok_or_else(out_of_range)?;
                Ok(DateRange { start, end: prev_end })
            }
            Self::Monthly => DateRange::month(prev_end.year(), prev_end.month()),
            Self::Yearly => DateRange::year(prev_end.year()),
        }
    }
}

impl TryFrom<&str> for Period {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::InvalidInput(format!("invalid period: {other}"))),
        }
    }
}

/// Inclusive calendar date range `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> ResultEngine<Self> {
        if start > end {
            return Err(EngineError::InvalidInput(
                "invalid range: start must be <= end".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// The whole calendar month `year-month`.
    pub fn month(year: i32, month: u32) -> ResultEngine<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| EngineError::InvalidInput(format!("invalid month: {year}-{month}")))?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(out_of_range)?;
        Ok(Self { start, end })
    }

    /// January 1st to December 31st of `year`.
    pub fn year(year: i32) -> ResultEngine<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(out_of_range)?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(out_of_range)?;
        Ok(Self { start, end })
    }

    /// Every calendar day in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }
}

fn out_of_range() -> EngineError {
    EngineError::InvalidInput("date out of range".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekly_window_starts_on_monday() {
        // 2026-10-14 is a Wednesday.
        let window = Period::Weekly.window(date(2026, 10, 14)).unwrap();
        assert_eq!(window.start, date(2026, 10, 12));
        assert_eq!(window.end, date(2026, 10, 18));

        let prev = Period::Weekly.previous(window).unwrap();
        assert_eq!(prev.start, date(2026, 10, 5));
        assert_eq!(prev.end, date(2026, 10, 11));
    }

    #[test]
    fn monthly_window_covers_whole_month() {
        let window = Period::Monthly.window(date(2024, 2, 10)).unwrap();
        assert_eq!(window, DateRange::new(date(2024, 2, 1), date(2024, 2, 29)).unwrap());

        let prev = Period::Monthly.previous(window).unwrap();
        assert_eq!(prev, DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap());
    }

    #[test]
    fn previous_month_crosses_year_boundary() {
        let window = Period::Monthly.window(date(2026, 1, 5)).unwrap();
        let prev = Period::Monthly.previous(window).unwrap();
        assert_eq!(prev.start, date(2025, 12, 1));
        assert_eq!(prev.end, date(2025, 12, 31));
    }

    #[test]
    fn daily_and_yearly_windows() {
        let today = date(2026, 3, 1);
        let day = Period::Daily.window(today).unwrap();
        assert_eq!(Period::Daily.previous(day).unwrap().start, date(2026, 2, 28));

        let year = Period::Yearly.window(today).unwrap();
        assert_eq!(year.start, date(2026, 1, 1));
        assert_eq!(year.end, date(2026, 12, 31));
        assert_eq!(Period::Yearly.previous(year).unwrap().start, date(2025, 1, 1));
    }

    #[test]
    fn days_iterates_inclusive_range() {
        let range = DateRange::new(date(2026, 2, 27), date(2026, 3, 2)).unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(days.len(), 4);
        assert_eq!(days[3], date(2026, 3, 2));
    }

    #[test]
    fn rejects_inverted_range_and_bad_month() {
        assert!(DateRange::new(date(2026, 3, 2), date(2026, 3, 1)).is_err());
        assert!(DateRange::month(2026, 13).is_err());
    }
}
