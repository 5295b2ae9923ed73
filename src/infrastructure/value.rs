use crate::domain::DateRange;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickerError {
    #[error("Invalid input data type: {0}")]
    InvalidInputType(String),
    #[error("Invalid date '{0}'")]
    InvalidDate(String),
}

/// A value written into the picker by the host form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalValue {
    Range(DateRange),
    Date(NaiveDate),
    Text(String),
}

impl ExternalValue {
    /// Normalizes the value into a range. A bare date or a date string becomes
    /// a single-day range; a range is taken as is.
    pub fn into_range(self) -> Result<DateRange, PickerError> {
        match self {
            ExternalValue::Range(range) => Ok(range),
            ExternalValue::Date(date) => Ok(DateRange::single(date)),
            ExternalValue::Text(text) => parse_date(&text).map(DateRange::single),
        }
    }

    /// Interprets loosely typed JSON from a host form. `null` and the empty
    /// string mean "no value".
    pub fn from_json(value: Value) -> Result<Option<Self>, PickerError> {
        match value {
            Value::Null => Ok(None),
            Value::String(text) if text.is_empty() => Ok(None),
            Value::String(text) => Ok(Some(ExternalValue::Text(text))),
            Value::Object(map) => {
                let start = match map.get("start") {
                    Some(Value::String(start)) => parse_date(start)?,
                    _ => {
                        return Err(PickerError::InvalidInputType(
                            "object without a start date".to_string(),
                        ));
                    }
                };
                let end = match map.get("end") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(end)) => Some(parse_date(end)?),
                    Some(other) => {
                        return Err(PickerError::InvalidInputType(format!(
                            "range end must be a date string, got {}",
                            json_kind(other)
                        )));
                    }
                };
                Ok(Some(ExternalValue::Range(DateRange { start, end })))
            }
            other => Err(PickerError::InvalidInputType(json_kind(&other).to_string())),
        }
    }
}

impl From<DateRange> for ExternalValue {
    fn from(range: DateRange) -> Self {
        ExternalValue::Range(range)
    }
}

impl From<NaiveDate> for ExternalValue {
    fn from(date: NaiveDate) -> Self {
        ExternalValue::Date(date)
    }
}

impl From<&str> for ExternalValue {
    fn from(text: &str) -> Self {
        ExternalValue::Text(text.to_string())
    }
}

impl From<String> for ExternalValue {
    fn from(text: String) -> Self {
        ExternalValue::Text(text)
    }
}

/// What the picker hands back to the form: a date in single mode, a closed
/// range in range mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PickerValue {
    Date(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
}

impl From<PickerValue> for ExternalValue {
    fn from(value: PickerValue) -> Self {
        match value {
            PickerValue::Date(date) => ExternalValue::Date(date),
            PickerValue::Range { start, end } => ExternalValue::Range(DateRange::new(start, end)),
        }
    }
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` and RFC 3339 timestamps. Only
/// the calendar day as written is kept.
pub fn parse_date(text: &str) -> Result<NaiveDate, PickerError> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Ok(datetime.date());
    }
    DateTime::parse_from_rfc3339(text)
        .map(|datetime| datetime.date_naive())
        .map_err(|_| PickerError::InvalidDate(text.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
