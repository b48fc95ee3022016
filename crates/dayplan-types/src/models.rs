use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Subject reserved for the administrator. Stored accounts start at 1.
pub const ADMIN_SUBJECT: i64 = 0;

/// Identifier of a stored account. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Who is calling, decoded once from the token subject.
///
/// Downstream code matches on this instead of comparing raw subjects
/// against zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    User(UserId),
    Admin,
}

impl Identity {
    /// Map a token subject onto an identity. Negative subjects are never
    /// issued and yield `None`.
    pub fn from_subject(sub: i64) -> Option<Self> {
        match sub {
            ADMIN_SUBJECT => Some(Identity::Admin),
            id if id > 0 => Some(Identity::User(UserId(id))),
            _ => None,
        }
    }

    pub fn subject(&self) -> i64 {
        match self {
            Identity::User(id) => id.0,
            Identity::Admin => ADMIN_SUBJECT,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Identity::User(id) => Some(*id),
            Identity::Admin => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Identity::Admin)
    }
}

/// A resource that belongs to exactly one account.
///
/// The owner is stamped at creation and never reassigned. `Draft` is the
/// validated creation payload (it carries no owner), `Patch` the validated
/// partial update, `Filter` any extra list narrowing beyond the owner.
pub trait OwnedResource: Sized + Send + 'static {
    /// Human-readable kind, used in logs and error messages.
    const KIND: &'static str;

    type Draft: Send + 'static;
    type Patch: Send + 'static;
    type Filter: Default + Send + 'static;

    fn id(&self) -> i64;
    fn owner(&self) -> UserId;
}

/// Account as exposed over the API. The password hash never leaves the
/// database layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub phone_number: String,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// -- Plans --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    #[default]
    Pending,
    Completed,
}

impl PlanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Pending => "pending",
            PlanStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown plan status '{0}', expected 'pending' or 'completed'")]
pub struct ParsePlanStatusError(pub String);

impl FromStr for PlanStatus {
    type Err = ParsePlanStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PlanStatus::Pending),
            "completed" => Ok(PlanStatus::Completed),
            other => Err(ParsePlanStatusError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: i64,
    pub user_id: UserId,
    pub content: String,
    pub execution_date: NaiveDate,
    pub status: PlanStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPlan {
    pub content: String,
    pub execution_date: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct PlanPatch {
    pub content: Option<String>,
    pub status: Option<PlanStatus>,
    pub execution_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct PlanFilter {
    /// Only plans executing on this day.
    pub date: Option<NaiveDate>,
}

impl OwnedResource for Plan {
    const KIND: &'static str = "plan";

    type Draft = NewPlan;
    type Patch = PlanPatch;
    type Filter = PlanFilter;

    fn id(&self) -> i64 {
        self.id
    }

    fn owner(&self) -> UserId {
        self.user_id
    }
}

// -- Expenses --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: UserId,
    pub amount: f64,
    pub category: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub amount: f64,
    pub category: String,
    pub note: String,
}

#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub note: Option<String>,
}

impl OwnedResource for Expense {
    const KIND: &'static str = "expense";

    type Draft = NewExpense;
    type Patch = ExpensePatch;
    type Filter = ();

    fn id(&self) -> i64 {
        self.id
    }

    fn owner(&self) -> UserId {
        self.user_id
    }
}

// -- Reminders --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub user_id: UserId,
    pub reminder_type: String,
    /// Time of day, `HH:MM`.
    pub scheduled_time: String,
    pub content: String,
    pub is_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewReminder {
    pub reminder_type: String,
    pub scheduled_time: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReminderPatch {
    pub scheduled_time: Option<String>,
    pub content: Option<String>,
    pub is_enabled: Option<bool>,
}

impl OwnedResource for Reminder {
    const KIND: &'static str = "reminder";

    type Draft = NewReminder;
    type Patch = ReminderPatch;
    type Filter = ();

    fn id(&self) -> i64 {
        self.id
    }

    fn owner(&self) -> UserId {
        self.user_id
    }
}
