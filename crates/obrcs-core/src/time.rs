use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// RFC 3339 timestamp used on consent records.
///
/// Wraps [`OffsetDateTime`] so entities serialize with the wire format the
/// OBIE data models use, and so timestamps are totally ordered (the
/// `statusUpdatedDateTime >= creationDateTime` invariant is checked with
/// plain comparisons).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConsentDateTime(pub OffsetDateTime);

impl ConsentDateTime {
    pub fn new(datetime: OffsetDateTime) -> Self {
        Self(datetime)
    }

    pub fn inner(&self) -> &OffsetDateTime {
        &self.0
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    pub fn timestamp(&self) -> i64 {
        self.0.unix_timestamp()
    }

    /// Shift this timestamp by the given duration.
    pub fn saturating_add(&self, duration: time::Duration) -> Self {
        Self(self.0.saturating_add(duration))
    }

    /// Whether this timestamp is strictly before `other`.
    pub fn is_before(&self, other: &ConsentDateTime) -> bool {
        self.0 < other.0
    }
}

impl fmt::Display for ConsentDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .0
            .format(&time::format_description::well_known::Rfc3339)
            .map_err(|_| fmt::Error)?;
        write!(f, "{formatted}")
    }
}

impl FromStr for ConsentDateTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let datetime = OffsetDateTime::parse(s, &time::format_description::well_known::Rfc3339)
            .map_err(|e| {
                CoreError::invalid_date_time(format!("Failed to parse consent DateTime '{s}': {e}"))
            })?;
        Ok(ConsentDateTime(datetime))
    }
}

impl Serialize for ConsentDateTime {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self
            .0
            .format(&time::format_description::well_known::Rfc3339)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for ConsentDateTime {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ConsentDateTime::from_str(&s).map_err(serde::de::Error::custom)
    }
}

pub fn now_utc() -> ConsentDateTime {
    ConsentDateTime(OffsetDateTime::now_utc())
}
