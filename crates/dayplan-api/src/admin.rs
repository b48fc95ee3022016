use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tracing::{debug, info};

use dayplan_auth::hash_password;
use dayplan_types::api::{
    AdminLoginRequest, AdminLoginResponse, RegisterRequest, ResetPasswordRequest, UserListResponse,
};
use dayplan_types::{Identity, UserId};

use crate::auth::{AppState, create_account, run_blocking};
use crate::error::ApiError;
use crate::validate;

/// Log in with the configured administrator credential. The resulting
/// token carries the admin subject and goes through the same verification
/// path as any user token.
pub async fn admin_login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<AdminLoginRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let response = run_blocking(&state, move |state| {
        if !state.admin.matches(&req.username, &req.password) {
            debug!("Rejected admin login");
            return Err(ApiError::InvalidCredentials);
        }

        let token = state.tokens.issue(Identity::Admin)?;
        info!("Admin {} logged in", state.admin.username());
        Ok(AdminLoginResponse {
            token,
            username: state.admin.username().to_string(),
        })
    })
    .await?;

    Ok(Json(response))
}

pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rows = run_blocking(&state, |state| Ok(state.db.list_users()?)).await?;

    let users: Vec<_> = rows.iter().map(|row| row.to_user()).collect();
    Ok(Json(UserListResponse {
        total: users.len(),
        users,
    }))
}

pub async fn create_user(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let user = run_blocking(&state, move |state| create_account(state, req)).await?;

    info!("Admin created user {} ({})", user.id, user.username);
    Ok((StatusCode::CREATED, Json(user.to_user())))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    WithRejection(Json(req), _): WithRejection<Json<ResetPasswordRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    validate::password("new_password", &req.new_password)?;

    run_blocking(&state, move |state| {
        let id = UserId(id);
        if state.db.get_user_by_id(id)?.is_none() {
            return Err(ApiError::NotFound("user"));
        }

        let password_hash = hash_password(&req.new_password)?;
        if !state.db.set_password(id, &password_hash)? {
            return Err(ApiError::NotFound("user"));
        }

        info!("Admin reset password for user {}", id);
        Ok(())
    })
    .await?;

    Ok(Json(json!({ "message": "password reset successfully" })))
}
