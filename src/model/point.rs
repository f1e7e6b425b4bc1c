use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

/// One measurement sample. Immutable once built; consumed by the line
/// protocol encoder on write.
///
/// Tags and fields keep sorted key order so the encoded line is
/// deterministic.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Point {
    pub measurement: String,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, FieldValue>,

    /// Unix timestamp in nanoseconds. Scaled down to the write precision when
    /// encoded; the database assigns its own timestamp when unset.
    pub timestamp: Option<i64>,
}

impl Point {
    pub fn new(measurement: &str) -> Self {
        Self {
            measurement: measurement.to_string(),
            ..Default::default()
        }
    }

    /// Add one tag.
    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());

        self
    }

    /// Add one field of any supported value type.
    pub fn field(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.to_string(), value.into());

        self
    }

    pub fn field_float(self, key: &str, value: f64) -> Self {
        self.field(key, value)
    }

    pub fn field_integer(self, key: &str, value: i64) -> Self {
        self.field(key, value)
    }

    pub fn field_bool(self, key: &str, value: bool) -> Self {
        self.field(key, value)
    }

    pub fn field_string(self, key: &str, value: &str) -> Self {
        self.field(key, value)
    }

    /// Set the timestamp, unix nanoseconds.
    pub fn timestamp_ns(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);

        self
    }

    /// Set the timestamp from a datetime. Dates outside the range
    /// representable in nanoseconds (roughly years 1677..2262) leave the
    /// timestamp unset.
    pub fn timestamp_datetime(mut self, datetime: DateTime<Utc>) -> Self {
        self.timestamp = datetime.timestamp_nanos_opt();

        self
    }
}

/// A field value: float, integer, boolean or string.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
    Boolean(bool),
    String(String),
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}
