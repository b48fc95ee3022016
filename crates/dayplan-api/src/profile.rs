use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tracing::{debug, info};

use dayplan_auth::{hash_password, verify_password};
use dayplan_types::api::{ChangePasswordRequest, UpdateProfileRequest};

use crate::auth::{AppState, run_blocking};
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::validate;

const MAX_NICKNAME_LEN: usize = 50;
const MAX_AVATAR_LEN: usize = 255;

pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(id): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = run_blocking(&state, move |state| {
        state.db.get_user_by_id(id)?.ok_or(ApiError::NotFound("user"))
    })
    .await?;

    Ok(Json(user.to_user()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(id): CurrentUser,
    WithRejection(Json(req), _): WithRejection<Json<UpdateProfileRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let nickname = req
        .nickname
        .map(|n| validate::bounded_text("nickname", &n, MAX_NICKNAME_LEN))
        .transpose()?;
    let avatar = req
        .avatar
        .map(|a| validate::bounded_text("avatar", &a, MAX_AVATAR_LEN))
        .transpose()?;

    let user = run_blocking(&state, move |state| {
        state
            .db
            .update_profile(id, nickname.as_deref(), avatar.as_deref())?
            .ok_or(ApiError::NotFound("user"))
    })
    .await?;

    Ok(Json(user.to_user()))
}

pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(id): CurrentUser,
    WithRejection(Json(req), _): WithRejection<Json<ChangePasswordRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    validate::password("new_password", &req.new_password)?;

    run_blocking(&state, move |state| {
        let user = state.db.get_user_by_id(id)?.ok_or(ApiError::NotFound("user"))?;

        if !verify_password(&req.old_password, &user.password) {
            debug!("Wrong current password for user {}", id);
            return Err(ApiError::InvalidCredentials);
        }

        let password_hash = hash_password(&req.new_password)?;
        state.db.set_password(id, &password_hash)?;

        info!("User {} changed password", id);
        Ok(())
    })
    .await?;

    Ok(Json(json!({ "message": "password updated successfully" })))
}
