use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Field the library is sorted by within each year group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    CompletionDate,
    Platform,
    Name,
    Rating,
    MetacriticScore,
}

impl SortKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CompletionDate => "completionDate",
            Self::Platform => "platform",
            Self::Name => "name",
            Self::Rating => "rating",
            Self::MetacriticScore => "metacriticScore",
        }
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completionDate" => Ok(Self::CompletionDate),
            "platform" => Ok(Self::Platform),
            "name" => Ok(Self::Name),
            "rating" => Ok(Self::Rating),
            "metacriticScore" => Ok(Self::MetacriticScore),
            other => Err(Error::InvalidData(format!("unknown sort key: {other}"))),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(Error::InvalidData(format!("unknown sort order: {other}"))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The persisted sort choice. Defaults to newest completion first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortPreference {
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

impl SortPreference {
    #[must_use]
    pub const fn new(sort_by: SortKey, sort_order: SortOrder) -> Self {
        Self {
            sort_by,
            sort_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_parse_their_own_names() {
        for key in [
            SortKey::CompletionDate,
            SortKey::Platform,
            SortKey::Name,
            SortKey::Rating,
            SortKey::MetacriticScore,
        ] {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        assert!("score".parse::<SortKey>().is_err());
        assert!("DESC".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_default_preference() {
        let pref = SortPreference::default();
        assert_eq!(pref.sort_by, SortKey::CompletionDate);
        assert_eq!(pref.sort_order, SortOrder::Desc);
    }
}
