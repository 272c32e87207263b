use crate::api::auth::error::AuthError;
use crate::api::auth::interfaces::AuthClaims;
use chrono::{Duration, Utc};
use common_types::Viewer;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// Creates a signed access token for `viewer`, valid for `ttl`.
///
/// Returns the token and its expiry as a unix timestamp.
pub fn create_access_token(
    jwt_secret: &str,
    viewer: &Viewer,
    ttl: Duration,
) -> Result<(String, u64), AuthError> {
    let exp = (Utc::now() + ttl).timestamp();
    let claims = AuthClaims {
        sub: viewer.id,
        email: viewer.email.clone(),
        role: viewer.role,
        exp,
    };
    let access_token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )?;

    Ok((access_token, exp as u64))
}

/// Decodes and verifies an access token. Expired, tampered and malformed tokens are all
/// `InvalidToken`.
pub fn decode_access_token(jwt_secret: &str, token: &str) -> Result<Viewer, AuthError> {
    decode::<AuthClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| Viewer {
        id: data.claims.sub,
        email: data.claims.email,
        role: data.claims.role,
    })
    .map_err(|_| AuthError::InvalidToken)
}
