use common_types::{UserId, ViewerRole};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Represents the claims contained within a JWT.
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthClaims {
    pub sub: UserId, // Subject (user ID)
    pub email: String,
    pub role: ViewerRole,
    pub exp: i64, // Expiration time
}
