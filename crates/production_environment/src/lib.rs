use chrono::Datelike;
use chrono::Months;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

pub mod order;
pub mod task;
pub mod time_range;
mod wire;
pub mod worker;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MonthWindowError
{
    #[error("month {0} is outside 0..=11")]
    InvalidMonth(u32),
    #[error("year {0} is outside the supported calendar")]
    YearOutOfRange(i32),
}

/// The (year, month) pair a calendar screen is currently showing.
///
/// The month is zero-based to match the convention of the dashboard
/// (`0` is January, `11` is December). Both month boundaries are resolved
/// on construction, so every accessor is infallible.
#[derive(Hash, Copy, Clone, Debug, PartialEq, PartialOrd, Ord, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMonthWindow", into = "RawMonthWindow")]
pub struct MonthWindow
{
    first_day: NaiveDate,
    last_day: NaiveDate,
}

#[derive(Serialize, Deserialize)]
struct RawMonthWindow
{
    year: i32,
    month: u32,
}

impl TryFrom<RawMonthWindow> for MonthWindow
{
    type Error = MonthWindowError;

    fn try_from(raw: RawMonthWindow) -> Result<Self, Self::Error>
    {
        MonthWindow::new(raw.year, raw.month)
    }
}

impl From<MonthWindow> for RawMonthWindow
{
    fn from(window: MonthWindow) -> Self
    {
        Self {
            year: window.year(),
            month: window.month0(),
        }
    }
}

impl MonthWindow
{
    pub fn new(year: i32, month0: u32) -> Result<Self, MonthWindowError>
    {
        if month0 > 11 {
            return Err(MonthWindowError::InvalidMonth(month0));
        }

        let first_day = NaiveDate::from_ymd_opt(year, month0 + 1, 1).ok_or(MonthWindowError::YearOutOfRange(year))?;

        // Last day is the day before the first of the next month, so leap
        // years fall out of the calendar arithmetic.
        let last_day = first_day
            .checked_add_months(Months::new(1))
            .and_then(|next_month| next_month.pred_opt())
            .ok_or(MonthWindowError::YearOutOfRange(year))?;

        Ok(Self { first_day, last_day })
    }

    pub fn from_date(date: NaiveDate) -> Result<Self, MonthWindowError>
    {
        Self::new(date.year(), date.month0())
    }

    pub fn year(&self) -> i32
    {
        self.first_day.year()
    }

    pub fn month0(&self) -> u32
    {
        self.first_day.month0()
    }

    pub fn first_day(&self) -> NaiveDate
    {
        self.first_day
    }

    pub fn last_day(&self) -> NaiveDate
    {
        self.last_day
    }

    pub fn days_in_month(&self) -> u32
    {
        self.last_day.day()
    }

    pub fn contains(&self, date: NaiveDate) -> bool
    {
        self.first_day <= date && date <= self.last_day
    }

    /// Date of the given 1-based day of this month.
    pub fn date_of(&self, day: u32) -> Option<NaiveDate>
    {
        if day == 0 || day > self.days_in_month() {
            return None;
        }
        self.first_day.with_day(day)
    }

    pub fn previous(&self) -> Result<Self, MonthWindowError>
    {
        match self.month0() {
            0 => Self::new(self.year() - 1, 11),
            month0 => Self::new(self.year(), month0 - 1),
        }
    }

    pub fn next(&self) -> Result<Self, MonthWindowError>
    {
        match self.month0() {
            11 => Self::new(self.year() + 1, 0),
            month0 => Self::new(self.year(), month0 + 1),
        }
    }
}

/// Number of days in the zero-based `month0` of `year`.
pub fn days_in_month(year: i32, month0: u32) -> Result<u32, MonthWindowError>
{
    Ok(MonthWindow::new(year, month0)?.days_in_month())
}

#[cfg(test)]
mod tests
{
    use chrono::NaiveDate;

    use super::MonthWindow;
    use super::MonthWindowError;
    use super::days_in_month;

    #[test]
    fn test_days_in_month_leap_year()
    {
        assert_eq!(days_in_month(2024, 1), Ok(29));
        assert_eq!(days_in_month(2023, 1), Ok(28));
        assert_eq!(days_in_month(1900, 1), Ok(28));
        assert_eq!(days_in_month(2000, 1), Ok(29));
        assert_eq!(days_in_month(2025, 0), Ok(31));
        assert_eq!(days_in_month(2025, 3), Ok(30));
        assert_eq!(days_in_month(2025, 11), Ok(31));
    }

    #[test]
    fn test_invalid_month()
    {
        assert_eq!(MonthWindow::new(2025, 12), Err(MonthWindowError::InvalidMonth(12)));
        assert_eq!(days_in_month(2025, 40), Err(MonthWindowError::InvalidMonth(40)));
    }

    #[test]
    fn test_window_boundaries()
    {
        let window = MonthWindow::new(2024, 1).unwrap();

        assert_eq!(window.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(window.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(window.contains(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert!(!window.contains(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));

        assert_eq!(window.date_of(29), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(window.date_of(30), None);
        assert_eq!(window.date_of(0), None);
    }

    #[test]
    fn test_month_navigation_wraps_years()
    {
        let january = MonthWindow::new(2025, 0).unwrap();
        let december = january.previous().unwrap();

        assert_eq!((december.year(), december.month0()), (2024, 11));
        assert_eq!(december.next().unwrap(), january);

        let june = MonthWindow::new(2025, 5).unwrap();
        assert_eq!(june.next().unwrap().month0(), 6);
        assert_eq!(june.previous().unwrap().month0(), 4);
    }

    #[test]
    fn test_window_serde_uses_zero_based_month()
    {
        let window: MonthWindow = serde_json::from_str(r#"{"year": 2024, "month": 1}"#).unwrap();
        assert_eq!(window.days_in_month(), 29);

        assert_eq!(serde_json::to_value(window).unwrap(), serde_json::json!({"year": 2024, "month": 1}));

        assert!(serde_json::from_str::<MonthWindow>(r#"{"year": 2024, "month": 12}"#).is_err());
    }
}
