use crate::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::openapi::{RefOr, schema::Schema};
use utoipa::{PartialSchema, ToSchema};

/// Audience a photo or album is visible to. Declaration order is the
/// visibility order, `Private` is a sentinel above every role ceiling.
#[derive(
    Debug,
    Serialize,
    Deserialize,
    ToSchema,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    #[default]
    Public,
    Member,
    Friend,
    Family,
    Private,
}

impl PrivacyLevel {
    pub const ALL: [Self; 5] = [
        Self::Public,
        Self::Member,
        Self::Friend,
        Self::Family,
        Self::Private,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Member => "member",
            Self::Friend => "friend",
            Self::Family => "family",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for PrivacyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrivacyLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidPrivacy(s.to_owned()))
    }
}

/// Privacy value as it sits on a stored record.
///
/// Records written through the setters always hold a valid level, but data
/// imported from elsewhere may carry a literal that is not one of the five.
/// Such a value is kept so the access policy can deny it explicitly.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum StoredPrivacy {
    Level(PrivacyLevel),
    Unrecognized(String),
}

impl StoredPrivacy {
    #[must_use]
    pub const fn level(&self) -> Option<PrivacyLevel> {
        match self {
            Self::Level(level) => Some(*level),
            Self::Unrecognized(_) => None,
        }
    }
}

impl Default for StoredPrivacy {
    fn default() -> Self {
        Self::Level(PrivacyLevel::Public)
    }
}

impl From<PrivacyLevel> for StoredPrivacy {
    fn from(level: PrivacyLevel) -> Self {
        Self::Level(level)
    }
}

impl From<String> for StoredPrivacy {
    fn from(value: String) -> Self {
        value
            .parse::<PrivacyLevel>()
            .map_or(Self::Unrecognized(value), Self::Level)
    }
}

impl From<StoredPrivacy> for String {
    fn from(value: StoredPrivacy) -> Self {
        match value {
            StoredPrivacy::Level(level) => level.as_str().to_owned(),
            StoredPrivacy::Unrecognized(raw) => raw,
        }
    }
}

// Serialized as a bare string literal.
impl PartialSchema for StoredPrivacy {
    fn schema() -> RefOr<Schema> {
        String::schema()
    }
}

impl ToSchema for StoredPrivacy {}

impl fmt::Display for StoredPrivacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level(level) => level.fmt(f),
            Self::Unrecognized(raw) => f.write_str(raw),
        }
    }
}
