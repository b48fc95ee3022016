use serde::{Deserialize, Serialize};

use crate::models::{Expense, User};

// -- JWT Claims --

/// Claim set carried by every bearer token, for users and the admin alike.
/// `sub` is the numeric subject, `0` for the administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub iat: i64,
    pub exp: i64,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub phone_number: String,
    pub password: String,
}

/// Login by username or phone number. Clients may name the identifier
/// `account`, `username` or `phone_number`, and may send more than one.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub password: String,
}

impl LoginRequest {
    /// First non-blank of `account`, `username`, `phone_number`.
    pub fn account(&self) -> Option<&str> {
        [&self.account, &self.username, &self.phone_number]
            .into_iter()
            .filter_map(|field| field.as_deref().map(str::trim))
            .find(|value| !value.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// -- Profile --

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
    pub nickname: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

// -- Admin --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdminLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub total: usize,
}

// -- Plans --

/// Resource payloads ignore unknown fields, so a client-supplied `user_id`
/// is dropped rather than honoured.
#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub content: String,
    /// `YYYY-MM-DD`
    pub execution_date: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePlanRequest {
    pub content: Option<String>,
    pub status: Option<String>,
    pub execution_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlanQuery {
    pub date: Option<String>,
}

// -- Expenses --

#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateExpenseRequest {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExpenseListResponse {
    pub total: f64,
    pub expenses: Vec<Expense>,
}

// -- Reminders --

#[derive(Debug, Deserialize)]
pub struct CreateReminderRequest {
    pub reminder_type: String,
    /// `HH:MM`
    pub scheduled_time: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateReminderRequest {
    pub scheduled_time: Option<String>,
    pub content: Option<String>,
    pub is_enabled: Option<bool>,
}
