use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use dayplan_auth::{PasswordError, TokenError};

/// Every outcome a handler can report besides success.
///
/// Only `Internal` is logged; everything else is an ordinary answer to
/// untrusted input.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unknown account or wrong password. The two are never told apart.
    #[error("invalid credentials")]
    InvalidCredentials,
    /// Missing, malformed, badly signed or expired token.
    #[error("invalid or expired token")]
    Unauthenticated,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("access denied")]
    Forbidden,
    #[error("{0}")]
    Validation(String),
    #[error("{0} already registered")]
    Conflict(&'static str),
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidCredentials | ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        if err.is_rejection() {
            ApiError::Unauthenticated
        } else {
            ApiError::Internal(err.into())
        }
    }
}

/// Bodies that are not JSON, or lack or mistype a field, are ordinary bad
/// input.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(cause) = &self {
            error!("Internal error: {:#}", cause);
        }

        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let cases = [
            (ApiError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (ApiError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ApiError::NotFound("plan"), StatusCode::NOT_FOUND),
            (ApiError::Forbidden, StatusCode::FORBIDDEN),
            (ApiError::validation("bad"), StatusCode::BAD_REQUEST),
            (ApiError::Conflict("username"), StatusCode::CONFLICT),
            (ApiError::Internal(anyhow::anyhow!("disk on fire")), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn token_rejections_are_unauthenticated() {
        for err in [TokenError::Malformed, TokenError::InvalidSignature, TokenError::Expired] {
            assert!(matches!(ApiError::from(err), ApiError::Unauthenticated));
        }
        assert!(matches!(ApiError::from(TokenError::MissingKey), ApiError::Internal(_)));
    }

    #[test]
    fn internal_cause_is_not_exposed() {
        let err = ApiError::Internal(anyhow::anyhow!("SELECT * FROM users exploded"));
        assert_eq!(err.to_string(), "internal server error");
    }
}
