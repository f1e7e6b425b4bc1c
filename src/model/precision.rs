use std::{fmt::Display, str::FromStr};

use crate::error::InfluxError;

/// Timestamp precision for writes and for the query `epoch` parameter.
///
/// The wire tokens are the ones the HTTP API accepts: `n`, `u`, `ms`, `s`,
/// `m` and `h`. Parsing any other token fails with
/// [`InfluxError::ValidationFailed`] before a request is ever built.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    #[default]
    Nanosecond,
    Microsecond,
    Millisecond,
    Second,
    Minute,
    Hour,
}

impl Precision {
    /// How many nanoseconds one unit of this precision spans.
    pub(crate) fn nanos_per_unit(&self) -> i64 {
        match self {
            Precision::Nanosecond => 1,
            Precision::Microsecond => 1_000,
            Precision::Millisecond => 1_000_000,
            Precision::Second => 1_000_000_000,
            Precision::Minute => 60 * 1_000_000_000,
            Precision::Hour => 3_600 * 1_000_000_000,
        }
    }
}

impl Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Precision::Nanosecond => "n",
            Precision::Microsecond => "u",
            Precision::Millisecond => "ms",
            Precision::Second => "s",
            Precision::Minute => "m",
            Precision::Hour => "h",
        };

        write!(f, "{}", s)
    }
}

impl FromStr for Precision {
    type Err = InfluxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "n" => Ok(Precision::Nanosecond),
            "u" => Ok(Precision::Microsecond),
            "ms" => Ok(Precision::Millisecond),
            "s" => Ok(Precision::Second),
            "m" => Ok(Precision::Minute),
            "h" => Ok(Precision::Hour),
            _ => Err(InfluxError::ValidationFailed(format!(
                "invalid time precision: {} (use 'n', 'u', 'ms', 's', 'm' or 'h')",
                s
            ))),
        }
    }
}
