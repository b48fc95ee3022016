use crate::Database;
use crate::models::UserRow;
use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, Row};

use dayplan_types::UserId;

const USER_COLUMNS: &str =
    "id, username, phone_number, password, nickname, avatar, created_at, updated_at";

impl Database {
    // -- Users --

    pub fn create_user(&self, username: &str, phone_number: &str, password_hash: &str) -> Result<UserRow> {
        self.with_conn(|conn| {
            let now = Utc::now();
            conn.execute(
                "INSERT INTO users (username, phone_number, password, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                rusqlite::params![username, phone_number, password_hash, now],
            )?;

            let id = conn.last_insert_rowid();
            query_user_by_id(conn, id)?.ok_or_else(|| anyhow::anyhow!("User {} vanished after insert", id))
        })
    }

    pub fn get_user_by_id(&self, id: UserId) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id.0))
    }

    /// Look up an account by username or phone number. An exact username
    /// match wins over a phone match.
    pub fn get_user_by_account(&self, account: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE username = ?1 OR phone_number = ?1
                 ORDER BY (username = ?1) DESC
                 LIMIT 1"
            );
            conn.query_row(&sql, [account], user_from_row).optional()
        })
    }

    /// Name of the first unique field already claimed by another account.
    pub fn find_taken_field(&self, username: &str, phone_number: &str) -> Result<Option<&'static str>> {
        self.with_conn(|conn| {
            let username_taken: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
                [username],
                |row| row.get(0),
            )?;
            if username_taken {
                return Ok(Some("username"));
            }

            let phone_taken: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE phone_number = ?1)",
                [phone_number],
                |row| row.get(0),
            )?;
            Ok(phone_taken.then_some("phone number"))
        })
    }

    /// All accounts, newest first.
    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC");
            let mut stmt = conn.prepare(&sql)?;

            let rows = stmt
                .query_map([], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Set whichever profile fields are given; `None` leaves a field as is.
    pub fn update_profile(
        &self,
        id: UserId,
        nickname: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET
                    nickname = COALESCE(?1, nickname),
                    avatar = COALESCE(?2, avatar),
                    updated_at = ?3
                 WHERE id = ?4",
                rusqlite::params![nickname, avatar, Utc::now(), id.0],
            )?;
            if changed == 0 {
                return Ok(None);
            }

            query_user_by_id(conn, id.0)
        })
    }

    /// Replace the stored password hash. Returns false if no such account.
    pub fn set_password(&self, id: UserId, password_hash: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE users SET password = ?1, updated_at = ?2 WHERE id = ?3",
                rusqlite::params![password_hash, Utc::now(), id.0],
            )?;
            Ok(changed > 0)
        })
    }
}

fn query_user_by_id(conn: &Connection, id: i64) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    conn.query_row(&sql, [id], user_from_row).optional()
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        phone_number: row.get(2)?,
        password: row.get(3)?,
        nickname: row.get(4)?,
        avatar: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Extension trait for optional query results
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
