pub mod admin;
pub mod auth;
pub mod error;
pub mod expenses;
pub mod middleware;
pub mod ownership;
pub mod plans;
pub mod profile;
pub mod reminders;
pub mod resources;
pub mod validate;

use axum::{
    Router, middleware as layer,
    routing::{get, post, put},
};

use dayplan_types::models::{Expense, Plan, Reminder};

use crate::auth::AppState;
use crate::middleware::{require_admin, require_auth};
use crate::resources::{create, get_one, remove, update};

/// Every route of the REST API. Transport layers (CORS, tracing) are added
/// by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/admin/login", post(admin::admin_login));

    let admin_routes = Router::new()
        .route("/api/admin/users", get(admin::list_users).post(admin::create_user))
        .route("/api/admin/users/{id}/password", put(admin::reset_password))
        .layer(layer::from_fn(require_admin));

    let protected_routes = Router::new()
        .route("/api/auth/verify", get(auth::verify))
        .route("/api/user/profile", get(profile::get_profile).put(profile::update_profile))
        .route("/api/user/password", put(profile::change_password))
        .route("/api/plans", get(plans::list_plans).post(create::<Plan>))
        .route(
            "/api/plans/{id}",
            get(get_one::<Plan>).put(update::<Plan>).delete(remove::<Plan>),
        )
        .route("/api/expenses", get(expenses::list_expenses).post(create::<Expense>))
        .route(
            "/api/expenses/{id}",
            get(get_one::<Expense>).put(update::<Expense>).delete(remove::<Expense>),
        )
        .route("/api/reminders", get(reminders::list_reminders).post(create::<Reminder>))
        .route(
            "/api/reminders/{id}",
            get(get_one::<Reminder>).put(update::<Reminder>).delete(remove::<Reminder>),
        )
        .merge(admin_routes)
        .layer(layer::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
