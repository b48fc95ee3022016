use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Ids are AUTOINCREMENT so they start at 1 and are never reused; subject 0
/// belongs to the administrator and can never be allocated to an account.
pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id              INTEGER PRIMARY KEY AUTOINCREMENT CHECK (id > 0),
            username        TEXT NOT NULL UNIQUE,
            phone_number    TEXT NOT NULL UNIQUE,
            password        TEXT NOT NULL,
            nickname        TEXT,
            avatar          TEXT,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS plans (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id         INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            content         TEXT NOT NULL,
            execution_date  TEXT NOT NULL,
            status          TEXT NOT NULL DEFAULT 'pending',
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_plans_user_date
            ON plans(user_id, execution_date);

        CREATE TABLE IF NOT EXISTS expenses (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id         INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            amount          REAL NOT NULL,
            category        TEXT NOT NULL,
            note            TEXT NOT NULL DEFAULT '',
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_expenses_user
            ON expenses(user_id, created_at);

        CREATE TABLE IF NOT EXISTS reminders (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id         INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            reminder_type   TEXT NOT NULL,
            scheduled_time  TEXT NOT NULL,
            content         TEXT NOT NULL DEFAULT '',
            is_enabled      INTEGER NOT NULL DEFAULT 1,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_reminders_user
            ON reminders(user_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
