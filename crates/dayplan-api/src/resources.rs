//! HTTP handlers shared by plans, expenses and reminders.
//!
//! A kind plugs in by implementing [`ResourceApi`], which turns its request
//! bodies into validated drafts and patches. Fetch-one, create, update and
//! delete are then mounted as `get_one::<Plan>` and so on; only the list
//! endpoints differ per kind.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::info;

use dayplan_db::{Database, ResourceStore};
use dayplan_types::OwnedResource;

use crate::auth::{AppState, run_blocking};
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::ownership;

pub trait ResourceApi: OwnedResource + Serialize {
    type CreateBody: DeserializeOwned + Send + 'static;
    type UpdateBody: DeserializeOwned + Send + 'static;

    fn draft(body: Self::CreateBody) -> Result<Self::Draft, ApiError>;

    /// Blank or missing fields become `None` and are left untouched.
    fn patch(body: Self::UpdateBody) -> Result<Self::Patch, ApiError>;
}

pub async fn get_one<R>(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
    R: ResourceApi,
    Database: ResourceStore<R>,
{
    let resource = run_blocking(&state, move |state| {
        ownership::fetch_owned::<R, _>(&state.db, id, caller)
    })
    .await?;

    Ok(Json(resource))
}

pub async fn create<R>(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    WithRejection(Json(body), _): WithRejection<Json<R::CreateBody>, ApiError>,
) -> Result<impl IntoResponse, ApiError>
where
    R: ResourceApi,
    Database: ResourceStore<R>,
{
    let draft = R::draft(body)?;

    let resource = run_blocking(&state, move |state| {
        ownership::create::<R, _>(&state.db, caller, draft)
    })
    .await?;

    info!("User {} created {} {}", caller, R::KIND, resource.id());
    Ok((StatusCode::CREATED, Json(resource)))
}

pub async fn update<R>(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i64>,
    WithRejection(Json(body), _): WithRejection<Json<R::UpdateBody>, ApiError>,
) -> Result<impl IntoResponse, ApiError>
where
    R: ResourceApi,
    Database: ResourceStore<R>,
{
    let patch = R::patch(body)?;

    let resource = run_blocking(&state, move |state| {
        ownership::update::<R, _>(&state.db, id, caller, patch)
    })
    .await?;

    Ok(Json(resource))
}

pub async fn remove<R>(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError>
where
    R: ResourceApi,
    Database: ResourceStore<R>,
{
    run_blocking(&state, move |state| {
        ownership::delete::<R, _>(&state.db, id, caller)
    })
    .await?;

    info!("User {} deleted {} {}", caller, R::KIND, id);
    Ok(Json(json!({ "message": format!("{} deleted", R::KIND) })))
}
