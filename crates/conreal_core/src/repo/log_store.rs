//! Reality log store.
//!
//! # Invariants
//! - `set_logs` replaces a (group, day) list whole, inside one transaction.
//! - `get_logs` distinguishes "never written" (`None`) from an empty list.
//! - Dates of a group are returned in ascending order; entries of a day in
//!   the order they were written.

use crate::db::DbError;
use crate::model::reality_log::{GroupId, LogDate, LogId};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const COUNTER_NAME: &str = "count";

pub type StoreResult<T> = Result<T, StoreError>;

/// Log store failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted log data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One page of a group registry scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupScan {
    /// Cursor for the next page; `0` once the registry is exhausted.
    pub cursor: u64,
    pub groups: Vec<GroupId>,
}

/// Storage interface the services depend on.
pub trait LogStore {
    /// Registers a group id. Registering twice is a no-op.
    fn add_group(&self, group_id: GroupId) -> StoreResult<()>;
    /// All registered groups in registration order.
    fn list_groups(&self) -> StoreResult<Vec<GroupId>>;
    /// Pages through the registry. Start with cursor `0`.
    fn scan_groups(&self, cursor: u64, count: u32) -> StoreResult<GroupScan>;
    /// Replaces the list of entries stored for `group_id` on `date`.
    fn set_logs(&self, group_id: GroupId, date: &LogDate, logs: &[String]) -> StoreResult<()>;
    /// Entries stored for `group_id` on `date`, `None` when never written.
    fn get_logs(&self, group_id: GroupId, date: &LogDate) -> StoreResult<Option<Vec<String>>>;
    /// Records that `group_id` has entries on `date`.
    fn add_date_to_group(&self, group_id: GroupId, date: &LogDate) -> StoreResult<()>;
    fn dates_for_group(&self, group_id: GroupId) -> StoreResult<Vec<LogDate>>;
    fn is_date_in_group(&self, group_id: GroupId, date: &LogDate) -> StoreResult<bool>;
    /// Stores a log that belongs to no group. Overwrites an existing id.
    fn set_log(&self, log_id: LogId, text: &str) -> StoreResult<()>;
    fn get_log(&self, log_id: LogId) -> StoreResult<Option<String>>;
    /// Current value of the global counter (`0` when unset).
    fn get_count(&self) -> StoreResult<i64>;
    /// Adds `amount` to the global counter and returns the new value.
    fn incr_count(&self, amount: i64) -> StoreResult<i64>;
}

/// SQLite-backed log store over a migrated connection.
pub struct SqliteLogStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLogStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl LogStore for SqliteLogStore<'_> {
    fn add_group(&self, group_id: GroupId) -> StoreResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO reality_groups (group_id) VALUES (?1);",
            [group_id.to_string()],
        )?;
        Ok(())
    }

    fn list_groups(&self) -> StoreResult<Vec<GroupId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT group_id FROM reality_groups ORDER BY rowid ASC;")?;
        let mut rows = stmt.query([])?;
        let mut groups = Vec::new();
        while let Some(row) = rows.next()? {
            groups.push(parse_uuid(&row.get::<_, String>(0)?, "reality_groups.group_id")?);
        }
        Ok(groups)
    }

    fn scan_groups(&self, cursor: u64, count: u32) -> StoreResult<GroupScan> {
        let page_size = i64::from(count.max(1));
        let offset = i64::try_from(cursor).map_err(|_| {
            StoreError::InvalidData(format!("scan cursor `{cursor}` is out of range"))
        })?;

        let mut stmt = self.conn.prepare(
            "SELECT group_id
             FROM reality_groups
             ORDER BY rowid ASC
             LIMIT ?1 OFFSET ?2;",
        )?;
        let mut rows = stmt.query(params![page_size + 1, offset])?;
        let mut groups = Vec::new();
        while let Some(row) = rows.next()? {
            groups.push(parse_uuid(&row.get::<_, String>(0)?, "reality_groups.group_id")?);
        }

        // One extra row tells whether another page exists.
        let has_more = groups.len() as i64 > page_size;
        groups.truncate(page_size as usize);
        let next_cursor = if has_more {
            cursor + page_size as u64
        } else {
            0
        };

        Ok(GroupScan {
            cursor: next_cursor,
            groups,
        })
    }

    fn set_logs(&self, group_id: GroupId, date: &LogDate, logs: &[String]) -> StoreResult<()> {
        let group = group_id.to_string();
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "DELETE FROM group_logs WHERE group_id = ?1 AND log_date = ?2;",
            params![group, date.as_str()],
        )?;
        tx.execute(
            "INSERT INTO group_day_lists (group_id, log_date) VALUES (?1, ?2)
             ON CONFLICT (group_id, log_date)
             DO UPDATE SET updated_at = (strftime('%s', 'now') * 1000);",
            params![group, date.as_str()],
        )?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO group_logs (group_id, log_date, position, content)
                 VALUES (?1, ?2, ?3, ?4);",
            )?;
            for (position, text) in logs.iter().enumerate() {
                insert.execute(params![group, date.as_str(), position as i64, text])?;
            }
        }
        tx.commit()?;

        debug!(
            "event=logs_set module=repo status=ok group_id={group} log_date={date} entries={}",
            logs.len()
        );
        Ok(())
    }

    fn get_logs(&self, group_id: GroupId, date: &LogDate) -> StoreResult<Option<Vec<String>>> {
        let group = group_id.to_string();
        let written: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM group_day_lists WHERE group_id = ?1 AND log_date = ?2
            );",
            params![group, date.as_str()],
            |row| row.get(0),
        )?;
        if written == 0 {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(
            "SELECT content
             FROM group_logs
             WHERE group_id = ?1 AND log_date = ?2
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query(params![group, date.as_str()])?;
        let mut logs = Vec::new();
        while let Some(row) = rows.next()? {
            logs.push(row.get::<_, String>(0)?);
        }
        Ok(Some(logs))
    }

    fn add_date_to_group(&self, group_id: GroupId, date: &LogDate) -> StoreResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO group_dates (group_id, log_date) VALUES (?1, ?2);",
            params![group_id.to_string(), date.as_str()],
        )?;
        Ok(())
    }

    fn dates_for_group(&self, group_id: GroupId) -> StoreResult<Vec<LogDate>> {
        let mut stmt = self.conn.prepare(
            "SELECT log_date FROM group_dates WHERE group_id = ?1 ORDER BY log_date ASC;",
        )?;
        let mut rows = stmt.query([group_id.to_string()])?;
        let mut dates = Vec::new();
        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            let date = LogDate::parse(&value).map_err(|_| {
                StoreError::InvalidData(format!("invalid date `{value}` in group_dates.log_date"))
            })?;
            dates.push(date);
        }
        Ok(dates)
    }

    fn is_date_in_group(&self, group_id: GroupId, date: &LogDate) -> StoreResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM group_dates WHERE group_id = ?1 AND log_date = ?2
            );",
            params![group_id.to_string(), date.as_str()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn set_log(&self, log_id: LogId, text: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO standalone_logs (log_id, content) VALUES (?1, ?2)
             ON CONFLICT (log_id) DO UPDATE SET content = excluded.content;",
            params![log_id.to_string(), text],
        )?;
        Ok(())
    }

    fn get_log(&self, log_id: LogId) -> StoreResult<Option<String>> {
        let text = self
            .conn
            .query_row(
                "SELECT content FROM standalone_logs WHERE log_id = ?1;",
                [log_id.to_string()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(text)
    }

    fn get_count(&self) -> StoreResult<i64> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM counters WHERE name = ?1;",
                [COUNTER_NAME],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(value.unwrap_or(0))
    }

    fn incr_count(&self, amount: i64) -> StoreResult<i64> {
        let value = self.conn.query_row(
            "INSERT INTO counters (name, value) VALUES (?1, ?2)
             ON CONFLICT (name) DO UPDATE SET value = value + excluded.value
             RETURNING value;",
            params![COUNTER_NAME, amount],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(value)
    }
}

fn parse_uuid(value: &str, column: &str) -> StoreResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}
