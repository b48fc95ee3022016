//! Storage for the owned resource kinds.
//!
//! Every kind is reached through the same [`ResourceStore`] surface so the
//! ownership policy above it can be written once. Updates use
//! `COALESCE(?, column)` so a `None` in a patch leaves the stored value alone.

use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, Row, types::Type};

use dayplan_types::models::{
    Expense, ExpensePatch, NewExpense, NewPlan, NewReminder, Plan, PlanFilter, PlanPatch,
    PlanStatus, Reminder, ReminderPatch,
};
use dayplan_types::{OwnedResource, UserId};

use crate::Database;
use crate::queries::OptionalExt;

/// Persistence for one resource kind, keyed by numeric id and owner.
///
/// The store does no access control of its own: `find_by_id` returns the
/// row whoever owns it.
pub trait ResourceStore<R: OwnedResource> {
    fn find_by_id(&self, id: i64) -> Result<Option<R>>;

    /// All rows owned by `owner`, in the kind's natural order.
    fn find_all(&self, owner: UserId, filter: &R::Filter) -> Result<Vec<R>>;

    fn insert(&self, owner: UserId, draft: R::Draft) -> Result<R>;

    /// Apply the fields present in `patch`. `None` if the row is gone.
    fn update_partial(&self, id: i64, patch: R::Patch) -> Result<Option<R>>;

    /// Remove the row permanently. Returns whether a row was deleted.
    fn delete(&self, id: i64) -> Result<bool>;
}

// -- Plans --

const PLAN_COLUMNS: &str = "id, user_id, content, execution_date, status, created_at, updated_at";

fn plan_from_row(row: &Row<'_>) -> rusqlite::Result<Plan> {
    let status: String = row.get(4)?;
    let status = status
        .parse::<PlanStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(Plan {
        id: row.get(0)?,
        user_id: UserId(row.get(1)?),
        content: row.get(2)?,
        execution_date: row.get(3)?,
        status,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn query_plan(conn: &Connection, id: i64) -> Result<Option<Plan>> {
    let sql = format!("SELECT {PLAN_COLUMNS} FROM plans WHERE id = ?1");
    conn.query_row(&sql, [id], plan_from_row).optional()
}

impl ResourceStore<Plan> for Database {
    fn find_by_id(&self, id: i64) -> Result<Option<Plan>> {
        self.with_conn(|conn| query_plan(conn, id))
    }

    fn find_all(&self, owner: UserId, filter: &PlanFilter) -> Result<Vec<Plan>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {PLAN_COLUMNS} FROM plans
                 WHERE user_id = ?1 AND (?2 IS NULL OR execution_date = ?2)
                 ORDER BY execution_date ASC, id ASC"
            );
            let mut stmt = conn.prepare(&sql)?;

            let rows = stmt
                .query_map(rusqlite::params![owner.0, filter.date], plan_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    fn insert(&self, owner: UserId, draft: NewPlan) -> Result<Plan> {
        self.with_conn(|conn| {
            let now = Utc::now();
            conn.execute(
                "INSERT INTO plans (user_id, content, execution_date, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                rusqlite::params![
                    owner.0,
                    draft.content,
                    draft.execution_date,
                    PlanStatus::default().as_str(),
                    now
                ],
            )?;

            let id = conn.last_insert_rowid();
            query_plan(conn, id)?.ok_or_else(|| anyhow::anyhow!("Plan {} vanished after insert", id))
        })
    }

    fn update_partial(&self, id: i64, patch: PlanPatch) -> Result<Option<Plan>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE plans SET
                    content = COALESCE(?1, content),
                    status = COALESCE(?2, status),
                    execution_date = COALESCE(?3, execution_date),
                    updated_at = ?4
                 WHERE id = ?5",
                rusqlite::params![
                    patch.content,
                    patch.status.map(|s| s.as_str()),
                    patch.execution_date,
                    Utc::now(),
                    id
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }

            query_plan(conn, id)
        })
    }

    fn delete(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM plans WHERE id = ?1", [id])? > 0))
    }
}

// -- Expenses --

const EXPENSE_COLUMNS: &str = "id, user_id, amount, category, note, created_at, updated_at";

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: UserId(row.get(1)?),
        amount: row.get(2)?,
        category: row.get(3)?,
        note: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn query_expense(conn: &Connection, id: i64) -> Result<Option<Expense>> {
    let sql = format!("SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = ?1");
    conn.query_row(&sql, [id], expense_from_row).optional()
}

impl ResourceStore<Expense> for Database {
    fn find_by_id(&self, id: i64) -> Result<Option<Expense>> {
        self.with_conn(|conn| query_expense(conn, id))
    }

    /// Newest first.
    fn find_all(&self, owner: UserId, _filter: &()) -> Result<Vec<Expense>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {EXPENSE_COLUMNS} FROM expenses
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;

            let rows = stmt
                .query_map([owner.0], expense_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    fn insert(&self, owner: UserId, draft: NewExpense) -> Result<Expense> {
        self.with_conn(|conn| {
            let now = Utc::now();
            conn.execute(
                "INSERT INTO expenses (user_id, amount, category, note, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                rusqlite::params![owner.0, draft.amount, draft.category, draft.note, now],
            )?;

            let id = conn.last_insert_rowid();
            query_expense(conn, id)?.ok_or_else(|| anyhow::anyhow!("Expense {} vanished after insert", id))
        })
    }

    fn update_partial(&self, id: i64, patch: ExpensePatch) -> Result<Option<Expense>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE expenses SET
                    amount = COALESCE(?1, amount),
                    category = COALESCE(?2, category),
                    note = COALESCE(?3, note),
                    updated_at = ?4
                 WHERE id = ?5",
                rusqlite::params![patch.amount, patch.category, patch.note, Utc::now(), id],
            )?;
            if changed == 0 {
                return Ok(None);
            }

            query_expense(conn, id)
        })
    }

    fn delete(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM expenses WHERE id = ?1", [id])? > 0))
    }
}

// -- Reminders --

const REMINDER_COLUMNS: &str =
    "id, user_id, reminder_type, scheduled_time, content, is_enabled, created_at, updated_at";

fn reminder_from_row(row: &Row<'_>) -> rusqlite::Result<Reminder> {
    Ok(Reminder {
        id: row.get(0)?,
        user_id: UserId(row.get(1)?),
        reminder_type: row.get(2)?,
        scheduled_time: row.get(3)?,
        content: row.get(4)?,
        is_enabled: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

fn query_reminder(conn: &Connection, id: i64) -> Result<Option<Reminder>> {
    let sql = format!("SELECT {REMINDER_COLUMNS} FROM reminders WHERE id = ?1");
    conn.query_row(&sql, [id], reminder_from_row).optional()
}

impl ResourceStore<Reminder> for Database {
    fn find_by_id(&self, id: i64) -> Result<Option<Reminder>> {
        self.with_conn(|conn| query_reminder(conn, id))
    }

    /// Ordered by time of day.
    fn find_all(&self, owner: UserId, _filter: &()) -> Result<Vec<Reminder>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {REMINDER_COLUMNS} FROM reminders
                 WHERE user_id = ?1
                 ORDER BY scheduled_time ASC, id ASC"
            );
            let mut stmt = conn.prepare(&sql)?;

            let rows = stmt
                .query_map([owner.0], reminder_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    fn insert(&self, owner: UserId, draft: NewReminder) -> Result<Reminder> {
        self.with_conn(|conn| {
            let now = Utc::now();
            conn.execute(
                "INSERT INTO reminders (user_id, reminder_type, scheduled_time, content, is_enabled, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)",
                rusqlite::params![owner.0, draft.reminder_type, draft.scheduled_time, draft.content, now],
            )?;

            let id = conn.last_insert_rowid();
            query_reminder(conn, id)?.ok_or_else(|| anyhow::anyhow!("Reminder {} vanished after insert", id))
        })
    }

    fn update_partial(&self, id: i64, patch: ReminderPatch) -> Result<Option<Reminder>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE reminders SET
                    scheduled_time = COALESCE(?1, scheduled_time),
                    content = COALESCE(?2, content),
                    is_enabled = COALESCE(?3, is_enabled),
                    updated_at = ?4
                 WHERE id = ?5",
                rusqlite::params![patch.scheduled_time, patch.content, patch.is_enabled, Utc::now(), id],
            )?;
            if changed == 0 {
                return Ok(None);
            }

            query_reminder(conn, id)
        })
    }

    fn delete(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM reminders WHERE id = ?1", [id])? > 0))
    }
}
