use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tracing::{debug, error, info};

use dayplan_auth::password::burn_verification;
use dayplan_auth::{AdminCredential, TokenService, hash_password, verify_password};
use dayplan_db::Database;
use dayplan_db::models::UserRow;
use dayplan_types::Identity;
use dayplan_types::api::{AuthResponse, LoginRequest, RegisterRequest};

use crate::error::ApiError;
use crate::validate;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenService,
    pub admin: AdminCredential,
}

/// Run store and hashing work off the async runtime.
pub(crate) async fn run_blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppStateInner) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(anyhow::anyhow!("blocking task failed: {}", e))
        })?
}

/// Validate, check uniqueness, hash and store a new account. Shared by
/// self-registration and the admin surface.
pub(crate) fn create_account(state: &AppStateInner, req: RegisterRequest) -> Result<UserRow, ApiError> {
    let username = validate::username(&req.username)?;
    let phone_number = validate::phone_number(&req.phone_number)?;
    validate::password("password", &req.password)?;

    if let Some(field) = state.db.find_taken_field(&username, &phone_number)? {
        return Err(ApiError::Conflict(field));
    }

    let password_hash = hash_password(&req.password)?;

    state
        .db
        .create_user(&username, &phone_number, &password_hash)
        .map_err(|e| {
            // Lost a race with a concurrent registration.
            if dayplan_db::is_constraint_violation(&e) {
                ApiError::Conflict("username or phone number")
            } else {
                ApiError::Internal(e)
            }
        })
}

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let response = run_blocking(&state, move |state| {
        let user = create_account(state, req)?;
        let token = state.tokens.issue(Identity::User(user.user_id()))?;

        info!("User {} registered as {}", user.id, user.username);
        Ok(AuthResponse {
            token,
            user: user.to_user(),
        })
    })
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let response = run_blocking(&state, move |state| {
        let account = req
            .account()
            .ok_or_else(|| ApiError::validation("username or phone number is required"))?;

        let Some(user) = state.db.get_user_by_account(account)? else {
            burn_verification(&req.password);
            debug!("Login for unknown account");
            return Err(ApiError::InvalidCredentials);
        };

        if !verify_password(&req.password, &user.password) {
            debug!("Wrong password for user {}", user.id);
            return Err(ApiError::InvalidCredentials);
        }

        let token = state.tokens.issue(Identity::User(user.user_id()))?;
        Ok(AuthResponse {
            token,
            user: user.to_user(),
        })
    })
    .await?;

    Ok(Json(response))
}

/// Confirm that the presented token is still good.
pub async fn verify(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(id) = identity.user_id() else {
        return Ok(Json(json!({ "valid": true, "admin": true })));
    };

    let user = run_blocking(&state, move |state| {
        // A token can outlive its account.
        state.db.get_user_by_id(id)?.ok_or(ApiError::Unauthenticated)
    })
    .await?;

    Ok(Json(json!({ "valid": true, "user": user.to_user() })))
}
