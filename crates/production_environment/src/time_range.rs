use std::fmt;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Wire name of a date field, used to point at the offending value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DateField
{
    StartDate,
    DueDate,
}

impl fmt::Display for DateField
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            DateField::StartDate => write!(f, "start_date"),
            DateField::DueDate => write!(f, "due_date"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TimeRangeError
{
    #[error("could not parse `{field}` from {value:?}")]
    DateParseError
    {
        field: DateField,
        value: String,
    },
    #[error("due date {end_date} is before start date {start_date}")]
    InvariantViolation
    {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
}

/// Inclusive range of calendar days. `start_date <= end_date` always holds.
#[derive(Hash, Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange
{
    start_date: NaiveDate,
    end_date: NaiveDate,
}

#[derive(Deserialize)]
struct RawTimeRange
{
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl TryFrom<RawTimeRange> for TimeRange
{
    type Error = TimeRangeError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error>
    {
        TimeRange::new(raw.start_date, raw.end_date)
    }
}

impl TimeRange
{
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, TimeRangeError>
    {
        if end_date < start_date {
            return Err(TimeRangeError::InvariantViolation { start_date, end_date });
        }
        Ok(Self { start_date, end_date })
    }

    /// Parses the two wire strings of a dated record.
    pub fn parse(start_date: &str, due_date: &str) -> Result<Self, TimeRangeError>
    {
        let start_date = parse_date(DateField::StartDate, start_date)?;
        let end_date = parse_date(DateField::DueDate, due_date)?;
        Self::new(start_date, end_date)
    }

    pub fn start_date(&self) -> NaiveDate
    {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate
    {
        self.end_date
    }

    pub fn contains(&self, date: NaiveDate) -> bool
    {
        self.start_date <= date && date <= self.end_date
    }

    /// True if `other` lies completely inside this range, bounds included.
    pub fn contains_range(&self, other: &TimeRange) -> bool
    {
        self.start_date <= other.start_date && other.end_date <= self.end_date
    }

    /// Number of days covered, counting both ends.
    pub fn num_days(&self) -> i64
    {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Accepts `YYYY-MM-DD` as well as full timestamps; only the date part is kept.
pub fn parse_date(field: DateField, value: &str) -> Result<NaiveDate, TimeRangeError>
{
    let trimmed = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(date_time) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(date_time.date_naive());
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|date_time| date_time.date())
        .map_err(|_| TimeRangeError::DateParseError {
            field,
            value: value.to_string(),
        })
}
