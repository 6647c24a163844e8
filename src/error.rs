use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::store::StoreError;

/// ApiError
///
/// The single error surface handlers return to clients. Auth and not-found
/// failures map directly to their status codes; infrastructure failures are
/// collapsed into a generic 500 so that store internals never leak into
/// response bodies (they are logged where they occur instead).
///
/// Note: a wrong admin password is deliberately *not* part of this taxonomy.
/// The login endpoint answers 200 with `success: false`, matching the wire
/// contract the frontend was built against.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No bearer credential was presented on a protected route.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The token's embedded expiry has passed.
    #[error("Token expired")]
    TokenExpired,

    /// The token signature or structure did not check out.
    #[error("Invalid token")]
    InvalidToken,

    /// Exact-key lookup missed. Carries the entity name for the response body.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The request payload was structurally fine but semantically rejected
    /// (e.g. a review rating outside 1..=5). Checked before persistence.
    #[error("{0}")]
    Validation(String),

    /// The document store (or another piece of infrastructure) failed.
    #[error("Internal server error")]
    Unavailable,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotAuthenticated | ApiError::TokenExpired | ApiError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Same body shape the original API produced for its error paths.
        let body = Json(json!({ "detail": self.to_string() }));
        (self.status(), body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(_: StoreError) -> Self {
        // Details were already logged at the store layer.
        ApiError::Unavailable
    }
}
