use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// How long a session waits on a locked database before giving up
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Persisted expense row
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: i64,
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
}

/// Column values for an insert or a full overwrite (everything except `id`)
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    pub date: NaiveDate,
}

// ============================================================================
// DATABASE HANDLE & SESSIONS
// ============================================================================

/// Handle on the expense database file.
/// Cloning is cheap; every clone opens its own sessions.
#[derive(Debug, Clone)]
pub struct Database {
    path: Arc<PathBuf>,
}

impl Database {
    /// Open (or create) the database file and make sure the schema exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Self {
            path: Arc::new(path.as_ref().to_path_buf()),
        };

        let session = db.session()?;
        setup_database(&session).context("Failed to initialize expense schema")?;

        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Acquire a new session. The connection is closed when the session is dropped.
    pub fn session(&self) -> Result<Session> {
        let conn = Connection::open(self.path.as_path())
            .with_context(|| format!("Failed to open database at {}", self.path.display()))?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        tracing::trace!(path = %self.path.display(), "session opened");
        Ok(Session { conn })
    }

    /// Run one unit of work on a fresh session.
    /// The session is released when `f` returns, whether it succeeded or not.
    pub fn with_session<T>(&self, f: impl FnOnce(&Session) -> Result<T>) -> Result<T> {
        let session = self.session()?;
        f(&session)
    }
}

/// One connection scoped to a single unit of work
pub struct Session {
    conn: Connection,
}

impl Deref for Session {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        tracing::trace!("session closed");
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // WAL lets readers proceed while a writer holds the lock
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    tracing::debug!(journal_mode = %mode, "journal mode set");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            amount REAL NOT NULL,
            date TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

// ============================================================================
// EXPENSE RECORDS
// ============================================================================

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        date: row.get(3)?,
    })
}

/// Insert a new expense; storage assigns the id.
/// The returned record is read back, so it carries the values as stored.
pub fn insert_expense(conn: &Connection, expense: &NewExpense) -> Result<Expense> {
    conn.execute(
        "INSERT INTO expenses (description, amount, date) VALUES (?1, ?2, ?3)",
        params![expense.description, expense.amount, expense.date],
    )
    .context("Failed to insert expense")?;

    let id = conn.last_insert_rowid();
    get_expense(conn, id)?.with_context(|| format!("Inserted expense {} not found", id))
}

/// Page through expenses in storage order (no explicit sort)
pub fn list_expenses(conn: &Connection, skip: u32, limit: u32) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(
        "SELECT id, description, amount, date
         FROM expenses
         LIMIT ?1 OFFSET ?2",
    )?;

    let expenses = stmt
        .query_map(params![limit, skip], expense_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(expenses)
}

pub fn get_expense(conn: &Connection, id: i64) -> Result<Option<Expense>> {
    let expense = conn
        .query_row(
            "SELECT id, description, amount, date FROM expenses WHERE id = ?1",
            params![id],
            expense_from_row,
        )
        .optional()?;

    Ok(expense)
}

/// Overwrite every column of an existing expense and read it back.
/// Returns `None` when no row has that id.
pub fn update_expense(conn: &Connection, id: i64, expense: &NewExpense) -> Result<Option<Expense>> {
    let changed = conn
        .execute(
            "UPDATE expenses SET description = ?1, amount = ?2, date = ?3 WHERE id = ?4",
            params![expense.description, expense.amount, expense.date, id],
        )
        .with_context(|| format!("Failed to update expense {}", id))?;

    if changed == 0 {
        return Ok(None);
    }

    get_expense(conn, id)
}

/// Hard delete. Returns `false` when no row has that id.
pub fn delete_expense(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM expenses WHERE id = ?1", params![id])
        .with_context(|| format!("Failed to delete expense {}", id))?;

    Ok(deleted > 0)
}

pub fn count_expenses(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;

    Ok(count)
}
