use crate::error::CoreError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// An OBIE API schema version, e.g. `v3.1.10`.
///
/// Versions are totally ordered. The backward-compatibility policy lives in
/// [`ApiVersion::can_access`]: a consent created under version V stays
/// visible to V and every later version, and is hidden from earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApiVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl ApiVersion {
    #[must_use]
    pub const fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Backward-compatibility predicate: may a consent created under
    /// `created` be accessed through `requested`?
    ///
    /// True exactly when `requested >= created`. A consent created under a
    /// newer schema must not be exposed through an older contract.
    #[must_use]
    pub fn can_access(created: &ApiVersion, requested: &ApiVersion) -> bool {
        requested >= created
    }
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for ApiVersion {
    type Err = CoreError;

    /// Parses `v3.1.10`, `3.1.10`, or the short `3.1` form (patch 0).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoreError::invalid_api_version("empty version string"));
        }
        let digits = trimmed.strip_prefix('v').unwrap_or(trimmed);

        let mut parts = digits.split('.');
        let parse_part = |part: Option<&str>| -> Result<u16, CoreError> {
            part.ok_or_else(|| CoreError::invalid_api_version(s.to_string()))?
                .parse::<u16>()
                .map_err(|_| CoreError::invalid_api_version(s.to_string()))
        };

        let major = parse_part(parts.next())?;
        let minor = parse_part(parts.next())?;
        let patch = match parts.next() {
            Some(p) => p
                .parse::<u16>()
                .map_err(|_| CoreError::invalid_api_version(s.to_string()))?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(CoreError::invalid_api_version(s.to_string()));
        }

        Ok(ApiVersion::new(major, minor, patch))
    }
}

impl Serialize for ApiVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ApiVersion::from_str(&s).map_err(serde::de::Error::custom)
    }
}
