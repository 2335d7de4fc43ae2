use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("the passed timestamp {0:?} wasn't either a \"%Y-%m-%d\" string or a \"%Y%j\" string")]
    Format(String),
    #[error("only strings or dates can be used as timestamps, got {0}")]
    UnsupportedType(&'static str),
}

/// A date as a caller may hand it over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeInput {
    /// Either "YYYY-MM-DD" or "YYYYDDD" (day of year).
    Text(String),
    Date(NaiveDate),
    /// Only the calendar date is kept.
    DateTime(NaiveDateTime),
}

impl TimeInput {
    pub fn to_date(&self) -> Result<NaiveDate, TimestampError> {
        match self {
            TimeInput::Date(date) => Ok(*date),
            TimeInput::DateTime(datetime) => Ok(datetime.date()),
            TimeInput::Text(text) => parse_iso(text)
                .or_else(|| parse_julian(text))
                .ok_or_else(|| TimestampError::Format(text.clone())),
        }
    }
}

impl From<&str> for TimeInput {
    fn from(text: &str) -> Self {
        TimeInput::Text(text.to_string())
    }
}

impl From<String> for TimeInput {
    fn from(text: String) -> Self {
        TimeInput::Text(text)
    }
}

impl From<NaiveDate> for TimeInput {
    fn from(date: NaiveDate) -> Self {
        TimeInput::Date(date)
    }
}

impl From<NaiveDateTime> for TimeInput {
    fn from(datetime: NaiveDateTime) -> Self {
        TimeInput::DateTime(datetime)
    }
}

impl TryFrom<&Value> for TimeInput {
    type Error = TimestampError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(TimeInput::Text(text.clone())),
            Value::Null => Err(TimestampError::UnsupportedType("null")),
            Value::Bool(_) => Err(TimestampError::UnsupportedType("boolean")),
            Value::Number(_) => Err(TimestampError::UnsupportedType("number")),
            Value::Array(_) => Err(TimestampError::UnsupportedType("array")),
            Value::Object(_) => Err(TimestampError::UnsupportedType("object")),
        }
    }
}

/// Normalise any accepted timestamp into a calendar date.
pub fn process_time_input<T: Into<TimeInput>>(timestamp: T) -> Result<NaiveDate, TimestampError> {
    timestamp.into().to_date()
}

fn parse_iso(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Parses "YYYYDDD", the date encoding used in MODIS file names.
pub fn parse_julian(text: &str) -> Option<NaiveDate> {
    if text.len() != 7 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = text[..4].parse().ok()?;
    let ordinal: u32 = text[4..].parse().ok()?;
    NaiveDate::from_yo_opt(year, ordinal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_iso_and_julian_agree() {
        let expected = NaiveDate::from_ymd_opt(2016, 2, 1).unwrap();

        assert_eq!(process_time_input("2016-02-01"), Ok(expected));
        assert_eq!(process_time_input("2016032"), Ok(expected));
    }

    #[test]
    fn test_leap_year_day_of_year() {
        assert_eq!(
            process_time_input("2016366"),
            Ok(NaiveDate::from_ymd_opt(2016, 12, 31).unwrap())
        );
        assert!(process_time_input("2017366").is_err());
    }

    #[test]
    fn test_native_values_pass_through() {
        let date = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
        assert_eq!(process_time_input(date), Ok(date));

        let datetime = date.and_hms_opt(10, 30, 0).unwrap();
        assert_eq!(process_time_input(datetime), Ok(date));
    }

    #[test]
    fn test_unparseable_strings() {
        for text in ["", "2016", "01-01-2016", "2016/01/01", "20160101", "2016-13-01", "2016000"] {
            assert_eq!(
                process_time_input(text),
                Err(TimestampError::Format(text.to_string())),
                "{text} should not parse"
            );
        }
    }

    #[test]
    fn test_untyped_values() {
        let text = TimeInput::try_from(&json!("2016001")).unwrap();
        assert_eq!(
            text.to_date(),
            Ok(NaiveDate::from_ymd_opt(2016, 1, 1).unwrap())
        );

        assert_eq!(
            TimeInput::try_from(&json!(2016001)),
            Err(TimestampError::UnsupportedType("number"))
        );
        assert_eq!(
            TimeInput::try_from(&json!(null)),
            Err(TimestampError::UnsupportedType("null"))
        );
    }
}
