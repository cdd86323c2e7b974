use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::{Hash, Hasher};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use regex::Regex;

use super::error::Result;
use super::value::{Value, base_date, base_datetime};

/// A single field value holder inside a [`super::Row`].
///
/// A cell always holds a [`Value`]; "unknown" is expressed by storing the
/// [`Value::Null`] sentinel, never by the absence of the cell. Equality and
/// hashing delegate to the wrapped value.
#[derive(Debug, Clone)]
pub struct Cell {
    value: Value,
}

/// A Rust type a [`Cell`] can be read as.
///
/// - `zero` is what a null cell reads as.
/// - `exact` succeeds only if the cell already holds that type.
/// - `convert` is the best-effort, value-preserving conversion.
pub trait CellType: Sized {
    fn zero() -> Self;

    fn exact(value: &Value) -> Option<Self>;

    fn convert(value: &Value) -> Result<Self>;
}

impl Cell {
    pub fn new(value: impl Into<Value>) -> Cell {
        Cell {
            value: value.into(),
        }
    }

    pub fn null() -> Cell {
        Cell { value: Value::Null }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn is_null(&self) -> bool {
        self.value.is_null()
    }

    pub fn to<T: CellType>(&self) -> Result<T> {
        //! Read the cell as `T`, converting when the stored type differs.
        //!
        //! A null cell reads as the type's zero value.

        if self.is_null() {
            return Ok(T::zero());
        }
        match T::exact(&self.value) {
            Some(value) => Ok(value),
            None => T::convert(&self.value),
        }
    }

    pub fn to_type<T: CellType>(&self) -> T {
        //! Read the cell as `T` without any conversion.
        //!
        //! Returns the type's zero value when the cell is null or holds a
        //! different type.

        T::exact(&self.value).unwrap_or_else(T::zero)
    }

    pub fn to_short(&self) -> Result<i16> {
        self.to()
    }

    pub fn to_int(&self) -> Result<i32> {
        self.to()
    }

    pub fn to_long(&self) -> Result<i64> {
        self.to()
    }

    pub fn to_float(&self) -> Result<f32> {
        self.to()
    }

    pub fn to_double(&self) -> Result<f64> {
        self.to()
    }

    pub fn to_bool(&self) -> Result<bool> {
        self.to()
    }

    pub fn to_datetime(&self) -> Result<NaiveDateTime> {
        self.to()
    }

    pub fn to_date(&self) -> Result<NaiveDate> {
        self.to()
    }

    pub fn to_time(&self) -> Result<NaiveTime> {
        self.to()
    }

    pub fn to_duration(&self) -> Result<TimeDelta> {
        self.to()
    }

    pub fn between<T: CellType + PartialOrd>(&self, lower: T, upper: T) -> Result<bool> {
        //! Inclusive range check on both ends, after converting the cell to
        //! the bounds' type.

        let value = self.to::<T>()?;
        Ok(value >= lower && value <= upper)
    }

    pub fn is_in(&self, candidates: &[Value]) -> bool {
        candidates.contains(&self.value)
    }

    pub fn string_compare(&self, text: &str) -> Ordering {
        self.to_string().as_str().cmp(text)
    }

    pub fn starts_with(&self, text: &str) -> bool {
        self.to_string().starts_with(text)
    }

    pub fn ends_with(&self, text: &str) -> bool {
        self.to_string().ends_with(text)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.to_string().contains(text)
    }

    pub fn regex_match(&self, pattern: &str) -> bool {
        //! Match the trimmed rendering against `pattern`.
        //!
        //! An empty or malformed pattern matches nothing.

        if pattern.is_empty() {
            return false;
        }
        match Regex::new(pattern) {
            Ok(regex) => regex.is_match(&self.to_string()),
            Err(_) => false,
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq<Value> for Cell {
    fn eq(&self, other: &Value) -> bool {
        &self.value == other
    }
}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state)
    }
}

impl CellType for bool {
    fn zero() -> Self {
        false
    }

    fn exact(value: &Value) -> Option<Self> {
        match value {
            Value::Boolean(flag) => Some(*flag),
            _ => None,
        }
    }

    fn convert(value: &Value) -> Result<Self> {
        value.as_bool()
    }
}

impl CellType for i16 {
    fn zero() -> Self {
        0
    }

    fn exact(_value: &Value) -> Option<Self> {
        None
    }

    fn convert(value: &Value) -> Result<Self> {
        value.as_short()
    }
}

impl CellType for i32 {
    fn zero() -> Self {
        0
    }

    fn exact(value: &Value) -> Option<Self> {
        match value {
            Value::Int(number) => Some(*number),
            _ => None,
        }
    }

    fn convert(value: &Value) -> Result<Self> {
        value.as_int()
    }
}

impl CellType for i64 {
    fn zero() -> Self {
        0
    }

    fn exact(value: &Value) -> Option<Self> {
        match value {
            Value::Long(number) => Some(*number),
            _ => None,
        }
    }

    fn convert(value: &Value) -> Result<Self> {
        value.as_long()
    }
}

impl CellType for f32 {
    fn zero() -> Self {
        0.0
    }

    fn exact(_value: &Value) -> Option<Self> {
        None
    }

    fn convert(value: &Value) -> Result<Self> {
        value.as_double().map(|number| number as f32)
    }
}

impl CellType for f64 {
    fn zero() -> Self {
        0.0
    }

    fn exact(value: &Value) -> Option<Self> {
        match value {
            Value::Double(number) => Some(*number),
            _ => None,
        }
    }

    fn convert(value: &Value) -> Result<Self> {
        value.as_double()
    }
}

impl CellType for String {
    fn zero() -> Self {
        String::new()
    }

    fn exact(value: &Value) -> Option<Self> {
        match value {
            Value::Text(text) => Some(text.clone()),
            _ => None,
        }
    }

    fn convert(value: &Value) -> Result<Self> {
        Ok(value.to_string())
    }
}

impl CellType for NaiveDateTime {
    fn zero() -> Self {
        base_datetime()
    }

    fn exact(value: &Value) -> Option<Self> {
        match value {
            Value::DateTime(datetime) => Some(*datetime),
            _ => None,
        }
    }

    fn convert(value: &Value) -> Result<Self> {
        value.as_datetime()
    }
}

impl CellType for NaiveDate {
    fn zero() -> Self {
        base_date()
    }

    fn exact(value: &Value) -> Option<Self> {
        match value {
            Value::Date(date) => Some(*date),
            _ => None,
        }
    }

    fn convert(value: &Value) -> Result<Self> {
        value.as_date()
    }
}

impl CellType for NaiveTime {
    fn zero() -> Self {
        NaiveTime::MIN
    }

    fn exact(value: &Value) -> Option<Self> {
        match value {
            Value::Time(time) => Some(*time),
            _ => None,
        }
    }

    fn convert(value: &Value) -> Result<Self> {
        value.as_time()
    }
}

impl CellType for TimeDelta {
    fn zero() -> Self {
        TimeDelta::MIN
    }

    fn exact(value: &Value) -> Option<Self> {
        match value {
            Value::Duration(duration) => Some(*duration),
            _ => None,
        }
    }

    fn convert(value: &Value) -> Result<Self> {
        value.as_duration()
    }
}
