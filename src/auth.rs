use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::{config::AppConfig, error::ApiError};

/// How long an issued admin session stays valid. There is no revocation list:
/// a token is honored for its full window even if the admin password changes
/// underneath it. Acceptable for a single-operator system; a shorter window is
/// the knob to turn if that ever stops being true.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Claims
///
/// The payload embedded in every admin session token. Signed with the server's
/// secret (HS256) and validated on every protected request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The single capability this API knows about. Always true for tokens we
    /// mint; carried explicitly so /admin/verify can echo it back.
    pub admin: bool,
    /// Expiration time (exp): timestamp after which the token must not be accepted.
    pub exp: usize,
    /// Issued at (iat): timestamp when the token was minted.
    pub iat: usize,
}

/// issue_token
///
/// Mints a signed admin session token valid for [`TOKEN_TTL_DAYS`] days.
/// The output is an opaque string safe to carry in an Authorization header.
pub fn issue_token(secret: &str) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        admin: true,
        iat: now.timestamp() as usize,
        exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("Failed to sign session token: {:?}", e);
        ApiError::Unavailable
    })
}

/// verify_token
///
/// Recomputes the signature and checks the embedded expiry.
/// An expired-but-otherwise-valid token is reported distinctly from a token
/// whose signature or structure does not check out.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::default();
    // Ensure expiration time validation is always active.
    validation.validate_exp = true;

    match decode::<Claims>(token, &decoding_key, &validation) {
        Ok(data) => Ok(data.claims),
        Err(e) => match e.kind() {
            // Token expired: the most common failure for a valid-but-old token.
            ErrorKind::ExpiredSignature => Err(ApiError::TokenExpired),
            // Bad signature, malformed structure, wrong algorithm, etc.
            _ => Err(ApiError::InvalidToken),
        },
    }
}

/// AdminUser
///
/// The resolved principal of an authenticated request. There is exactly one
/// privileged role in this system, so the principal carries nothing but the
/// admin claim — any valid AdminUser may perform any protected operation.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub admin: bool,
}

/// AdminUser Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AdminUser usable as a function
/// argument in any protected handler. This cleanly separates authentication
/// (extractor) from business logic (the handler).
///
/// The process:
/// 1. Dependency resolution: AppConfig (for the signing secret) from app state.
/// 2. Credential extraction: standard Bearer token from the Authorization header.
/// 3. Token validation via [`verify_token`].
///
/// The check is stateless; there is no per-request store lookup.
///
/// Rejection: 401 with the reason (not authenticated / expired / invalid).
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    // Allows the extractor to pull the AppConfig (for the JWT secret).
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AppConfig::from_ref(state);

        // Absence of the header and a header without the Bearer scheme are both
        // "no credential presented", not a malformed token.
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::NotAuthenticated)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::NotAuthenticated)?;

        let claims = verify_token(token, &config.jwt_secret)?;

        Ok(AdminUser {
            admin: claims.admin,
        })
    }
}
