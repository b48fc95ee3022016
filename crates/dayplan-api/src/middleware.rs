use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::debug;

use dayplan_types::{Identity, UserId};

use crate::auth::AppState;
use crate::error::ApiError;

/// Extract and validate the bearer token, then make the caller's
/// [`Identity`] available to the handlers behind this layer.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(ApiError::Unauthenticated)?;

    let identity = state.tokens.identify(bearer.token()).map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        ApiError::from(e)
    })?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Gate for the admin surface. Must sit inside [`require_auth`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    match req.extensions().get::<Identity>().copied() {
        Some(identity) if identity.is_admin() => Ok(next.run(req).await),
        Some(identity) => {
            debug!("Subject {} tried to reach an admin route", identity.subject());
            Err(ApiError::Forbidden)
        }
        None => Err(ApiError::Unauthenticated),
    }
}

/// The authenticated caller, when it is a regular account.
///
/// The admin identity owns no resources and has no profile, so it is
/// turned away with `Forbidden`.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<Identity>()
            .ok_or(ApiError::Unauthenticated)?;

        identity.user_id().map(CurrentUser).ok_or(ApiError::Forbidden)
    }
}
