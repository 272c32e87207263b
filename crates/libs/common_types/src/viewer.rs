use crate::{PrivacyLevel, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

pub type UserId = i32;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ViewerRole {
    Anonymous,
    User,
    Friend,
    Family,
    Admin,
}

impl ViewerRole {
    pub const ALL: [Self; 5] = [
        Self::Anonymous,
        Self::User,
        Self::Friend,
        Self::Family,
        Self::Admin,
    ];

    /// Highest privacy level this role may see under the normal rules.
    /// `Private` is never a ceiling, it is decided by ownership.
    #[must_use]
    pub const fn ceiling(self) -> PrivacyLevel {
        match self {
            Self::Anonymous => PrivacyLevel::Public,
            Self::User => PrivacyLevel::Member,
            Self::Friend => PrivacyLevel::Friend,
            Self::Family | Self::Admin => PrivacyLevel::Family,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anonymous => "anonymous",
            Self::User => "user",
            Self::Friend => "friend",
            Self::Family => "family",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for ViewerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewerRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidRole(s.to_owned()))
    }
}

/// An authenticated viewer. Anonymous access is modelled as `Option<Viewer>::None`.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Viewer {
    pub id: UserId,
    pub email: String,
    pub role: ViewerRole,
}

impl Viewer {
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, ViewerRole::Admin)
    }
}
