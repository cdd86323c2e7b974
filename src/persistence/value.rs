use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::error::{Result, TableError};

const FALSE_MARKER: &str = "\u{0000}";
const TRUE_MARKER: &str = "\u{0001}";

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
const TIME_FORMATS: [&str; 3] = ["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"];

/// The declared type of a column, fixed when the column is created.
///
/// Every non-null [`Value`] variant maps to exactly one [`DataType`]. The null
/// sentinel has none, which is why it is accepted by every column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int,
    Long,
    Double,
    Text,
    DateTime,
    Date,
    Time,
    Duration,
    Json,
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let datatype = match self {
            DataType::Boolean => "BOOL",
            DataType::Int => "INT",
            DataType::Long => "LONG",
            DataType::Double => "DBL",
            DataType::Text => "TXT",
            DataType::DateTime => "DATETIME",
            DataType::Date => "DATE",
            DataType::Time => "TIME",
            DataType::Duration => "DURATION",
            DataType::Json => "JSON",
        };
        write!(f, "{}", datatype)
    }
}

/// A single runtime value stored in a [`super::Cell`].
///
/// [`Value::Null`] is the in-band database-null marker: the cell exists, its
/// content is unknown.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i32),
    Long(i64),
    Double(f64),
    Text(String),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Time(NaiveTime),
    Duration(TimeDelta),
    Json(serde_json::Value),
}

/// The calendar anchor used when a time or a duration has to become a date,
/// 0001-01-01.
pub fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1, 1, 1).unwrap_or(NaiveDate::MIN)
}

pub fn base_datetime() -> NaiveDateTime {
    base_date().and_time(NaiveTime::MIN)
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn datatype(&self) -> Option<DataType> {
        //! The declared type a column needs to hold this value.
        //!
        //! Returns [`None`] for the null sentinel.

        let datatype = match self {
            Value::Null => return None,
            Value::Boolean(_) => DataType::Boolean,
            Value::Int(_) => DataType::Int,
            Value::Long(_) => DataType::Long,
            Value::Double(_) => DataType::Double,
            Value::Text(_) => DataType::Text,
            Value::DateTime(_) => DataType::DateTime,
            Value::Date(_) => DataType::Date,
            Value::Time(_) => DataType::Time,
            Value::Duration(_) => DataType::Duration,
            Value::Json(_) => DataType::Json,
        };
        Some(datatype)
    }

    pub fn fits(&self, datatype: DataType) -> bool {
        //! Whether the value may be stored in a column of `datatype`.

        self.datatype().is_none_or(|own| own == datatype)
    }

    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        //! Natural ordering between two values of the same column.
        //!
        //! The null sentinel sorts first. NaN, JSON documents and values of
        //! different kinds have no ordering.

        match (self, other) {
            (Value::Null, Value::Null) => Some(Ordering::Equal),
            (Value::Null, _) => Some(Ordering::Less),
            (_, Value::Null) => Some(Ordering::Greater),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Long(a), Value::Long(b)) => Some(a.cmp(b)),
            (Value::Double(a), Value::Double(b)) => a.partial_cmp(b),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::Duration(a), Value::Duration(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    fn _conversion_error(&self, to: &'static str) -> TableError {
        TableError::ConversionError {
            from: self
                .datatype()
                .map_or_else(|| "NULL".to_string(), |datatype| datatype.to_string()),
            value: self.to_string(),
            to,
        }
    }

    pub fn as_long(&self) -> Result<i64> {
        //! Value-preserving conversion to a 64 bit integer.
        //!
        //! Doubles are rounded to the nearest integer, text is parsed after
        //! trimming, booleans become 0 or 1.

        match self {
            Value::Null => Ok(0),
            Value::Boolean(flag) => Ok(i64::from(*flag)),
            Value::Int(number) => Ok(i64::from(*number)),
            Value::Long(number) => Ok(*number),
            Value::Double(number) => {
                let rounded = number.round_ties_even();
                if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
                    Ok(rounded as i64)
                } else {
                    Err(self._conversion_error("LONG"))
                }
            }
            Value::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| self._conversion_error("LONG")),
            Value::Json(json) => json.as_i64().ok_or_else(|| self._conversion_error("LONG")),
            Value::DateTime(_) | Value::Date(_) | Value::Time(_) | Value::Duration(_) => {
                Err(self._conversion_error("LONG"))
            }
        }
    }

    pub fn as_int(&self) -> Result<i32> {
        let long = self.as_long().map_err(|_| self._conversion_error("INT"))?;
        i32::try_from(long).map_err(|_| self._conversion_error("INT"))
    }

    pub fn as_short(&self) -> Result<i16> {
        let long = self.as_long().map_err(|_| self._conversion_error("SHORT"))?;
        i16::try_from(long).map_err(|_| self._conversion_error("SHORT"))
    }

    pub fn as_double(&self) -> Result<f64> {
        match self {
            Value::Null => Ok(0.0),
            Value::Boolean(flag) => Ok(if *flag { 1.0 } else { 0.0 }),
            Value::Int(number) => Ok(f64::from(*number)),
            Value::Long(number) => Ok(*number as f64),
            Value::Double(number) => Ok(*number),
            Value::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| self._conversion_error("DBL")),
            Value::Json(json) => json.as_f64().ok_or_else(|| self._conversion_error("DBL")),
            Value::DateTime(_) | Value::Date(_) | Value::Time(_) | Value::Duration(_) => {
                Err(self._conversion_error("DBL"))
            }
        }
    }

    pub fn as_bool(&self) -> Result<bool> {
        //! Boolean conversion. Besides "true"/"false", text accepts the two
        //! single character markers `\u{0}` and `\u{1}`.

        match self {
            Value::Null => Ok(false),
            Value::Boolean(flag) => Ok(*flag),
            Value::Int(number) => Ok(*number != 0),
            Value::Long(number) => Ok(*number != 0),
            Value::Double(number) => Ok(*number != 0.0),
            Value::Text(text) if text == FALSE_MARKER => Ok(false),
            Value::Text(text) if text == TRUE_MARKER => Ok(true),
            Value::Text(text) => match text.trim().to_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(self._conversion_error("BOOL")),
            },
            Value::Json(json) => json.as_bool().ok_or_else(|| self._conversion_error("BOOL")),
            Value::DateTime(_) | Value::Date(_) | Value::Time(_) | Value::Duration(_) => {
                Err(self._conversion_error("BOOL"))
            }
        }
    }

    pub fn as_datetime(&self) -> Result<NaiveDateTime> {
        match self {
            Value::Null => Ok(base_datetime()),
            Value::DateTime(datetime) => Ok(*datetime),
            Value::Date(date) => Ok(date.and_time(NaiveTime::MIN)),
            Value::Time(time) => Ok(base_date().and_time(*time)),
            Value::Duration(duration) => base_datetime()
                .checked_add_signed(*duration)
                .ok_or_else(|| self._conversion_error("DATETIME")),
            Value::Text(text) => {
                _parse_datetime(text.trim()).ok_or_else(|| self._conversion_error("DATETIME"))
            }
            _ => Err(self._conversion_error("DATETIME")),
        }
    }

    pub fn as_date(&self) -> Result<NaiveDate> {
        match self {
            Value::Null => Ok(base_date()),
            Value::Date(date) => Ok(*date),
            Value::Time(_) => Ok(base_date()),
            _ => self
                .as_datetime()
                .map(|datetime| datetime.date())
                .map_err(|_| self._conversion_error("DATE")),
        }
    }

    pub fn as_time(&self) -> Result<NaiveTime> {
        match self {
            Value::Null => Ok(NaiveTime::MIN),
            Value::Time(time) => Ok(*time),
            Value::Text(text) => _parse_time(text.trim())
                .or_else(|| _parse_datetime(text.trim()).map(|datetime| datetime.time()))
                .ok_or_else(|| self._conversion_error("TIME")),
            _ => self
                .as_datetime()
                .map(|datetime| datetime.time())
                .map_err(|_| self._conversion_error("TIME")),
        }
    }

    pub fn as_duration(&self) -> Result<TimeDelta> {
        //! Dates and date-times become the span elapsed since 0001-01-01,
        //! times the span elapsed since midnight.

        match self {
            Value::Null => Ok(TimeDelta::MIN),
            Value::Duration(duration) => Ok(*duration),
            Value::Time(time) => Ok(time.signed_duration_since(NaiveTime::MIN)),
            _ => self
                .as_datetime()
                .map(|datetime| datetime.signed_duration_since(base_datetime()))
                .map_err(|_| self._conversion_error("DURATION")),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        //! Render the value for JSON exports. Temporal values become their
        //! string rendering, durations their length in milliseconds.

        match self {
            Value::Null => serde_json::Value::Null,
            Value::Boolean(flag) => serde_json::Value::from(*flag),
            Value::Int(number) => serde_json::Value::from(*number),
            Value::Long(number) => serde_json::Value::from(*number),
            Value::Double(number) => serde_json::Value::from(*number),
            Value::Text(text) => serde_json::Value::from(text.as_str()),
            Value::Duration(duration) => serde_json::Value::from(duration.num_milliseconds()),
            Value::Json(json) => json.clone(),
            Value::DateTime(_) | Value::Date(_) | Value::Time(_) => {
                serde_json::Value::from(self.to_string())
            }
        }
    }
}

fn _parse_datetime(text: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|datetime| datetime.naive_utc())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

fn _parse_time(text: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Boolean(flag) => write!(f, "{}", flag),
            Value::Int(number) => write!(f, "{}", number),
            Value::Long(number) => write!(f, "{}", number),
            Value::Double(number) => write!(f, "{}", number),
            Value::Text(text) => write!(f, "{}", text.trim()),
            Value::DateTime(datetime) => write!(f, "{}", datetime.format("%Y-%m-%d %H:%M:%S")),
            Value::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Value::Time(time) => write!(f, "{}", time.format("%H:%M:%S")),
            Value::Duration(duration) => write!(f, "{}", duration),
            Value::Json(json) => write!(f, "{}", json),
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Boolean(flag) => flag.hash(state),
            Value::Int(number) => number.hash(state),
            Value::Long(number) => number.hash(state),
            // 0.0 and -0.0 are equal, so they must hash alike
            Value::Double(number) if *number == 0.0 => 0.0f64.to_bits().hash(state),
            Value::Double(number) => number.to_bits().hash(state),
            Value::Text(text) => text.hash(state),
            Value::DateTime(datetime) => datetime.hash(state),
            Value::Date(date) => date.hash(state),
            Value::Time(time) => time.hash(state),
            Value::Duration(duration) => duration.hash(state),
            Value::Json(json) => json.to_string().hash(state),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Int(i32::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Double(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::Date(value)
    }
}

impl From<NaiveTime> for Value {
    fn from(value: NaiveTime) -> Self {
        Value::Time(value)
    }
}

impl From<TimeDelta> for Value {
    fn from(value: TimeDelta) -> Self {
        Value::Duration(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        Value::Json(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}
