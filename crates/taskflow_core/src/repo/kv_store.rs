//! Durable key-value slot store contracts and implementations.
//!
//! # Responsibility
//! - Provide byte-level read/write of named slots.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - A write fully replaces the previous value of the slot.
//! - Reading an absent slot is `Ok(None)`, not an error.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

const SLOT_TABLE: &str = "kv_slots";

pub type KvResult<T> = Result<T, KvError>;

/// Slot store error for storage access and connection readiness.
#[derive(Debug)]
pub enum KvError {
    Db(DbError),
    /// Connection was not bootstrapped through `open_db*`.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    /// Backend refused the operation (quota, disabled storage, ...).
    Unavailable(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "slot connection is not initialized: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::Unavailable(message) => write!(f, "slot storage unavailable: {message}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Byte-level named slot storage.
pub trait KeyValueStore {
    /// Returns the slot value, or `None` when the slot was never written.
    fn read(&self, key: &str) -> KvResult<Option<Vec<u8>>>;
    /// Replaces the slot value.
    fn write(&mut self, key: &str, value: &[u8]) -> KvResult<()>;
}

/// SQLite-backed slot store over a migrated connection.
pub struct SqliteKvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKvStore<'conn> {
    /// Wraps a connection returned by `open_db` / `open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` when the slot table is absent.
    pub fn try_new(conn: &'conn Connection) -> KvResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(KvError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [SLOT_TABLE],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(KvError::MissingRequiredTable(SLOT_TABLE));
        }

        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKvStore<'_> {
    fn read(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1;",
                [key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &[u8]) -> KvResult<()> {
        self.conn.execute(
            "INSERT INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-process slot store.
///
/// Counts successful writes and can be switched into a failing mode, which
/// makes it the store of choice for exercising persistence call patterns.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    slots: HashMap<String, Vec<u8>>,
    writes: usize,
    fail_writes: bool,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with one slot pre-populated.
    pub fn with_slot(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        let mut store = Self::default();
        store.slots.insert(key.into(), value.into());
        store
    }

    /// Number of successful writes since construction.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Makes every following write fail with `KvError::Unavailable`.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn slot(&self, key: &str) -> Option<&[u8]> {
        self.slots.get(key).map(Vec::as_slice)
    }
}

impl KeyValueStore for MemoryKvStore {
    fn read(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &[u8]) -> KvResult<()> {
        if self.fail_writes {
            return Err(KvError::Unavailable("writes disabled".to_string()));
        }
        self.slots.insert(key.to_string(), value.to_vec());
        self.writes += 1;
        Ok(())
    }
}
