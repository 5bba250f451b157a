// src/store.rs
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

const STORE_FILE_NAME: &str = "store.sqlite";
const APP_DATA_DIR: &str = "gym-tracker"; // Same dir name as config for consistency

// Custom Error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store connection failed")]
    Connection(#[from] rusqlite::Error),
    #[error("Failed to get application data directory")]
    DataDir,
    #[error("I/O error accessing store file")]
    Io(#[from] std::io::Error),
    #[error("Store read failed for key '{key}': {source}")]
    ReadFailed {
        key: String,
        source: rusqlite::Error,
    },
    #[error("Store write failed for key '{key}': {source}")]
    WriteFailed {
        key: String,
        source: rusqlite::Error,
    },
}

/// A synchronous string-keyed store. Values survive restarts, never expire
/// and are overwritten whole on every `set`.
pub trait KeyValueStore {
    /// # Errors
    /// Returns `StoreError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// # Errors
    /// Returns `StoreError` if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Returns whether a value was present.
    /// # Errors
    /// Returns `StoreError` if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<bool, StoreError>;

    /// # Errors
    /// Returns `StoreError` if the backend cannot be read.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// In-process store, lost when dropped. Used by tests and embedders.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Key-value table inside a SQLite database file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (and initializes) the store at `path`.
    /// # Errors
    /// Returns `StoreError::Connection` if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(StoreError::Connection)?;
        Self::from_connection(conn)
    }

    /// # Errors
    /// Returns `StoreError::Connection` if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::Connection)?;
        Self::from_connection(conn)
    }

    /// Wraps an existing connection, creating the table if needed.
    /// # Errors
    /// Returns `StoreError::Connection` if the schema cannot be created.
    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        init_store(&conn)?;
        Ok(Self { conn })
    }
}

/// Creates the key-value table if it doesn't exist.
pub fn init_store(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL -- JSON text of one slice
        )",
        [],
    )
    .map_err(StoreError::Connection)?;
    Ok(())
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|source| StoreError::ReadFailed {
                key: key.to_string(),
                source,
            })
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(|source| StoreError::WriteFailed {
                key: key.to_string(),
                source,
            })?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        let rows = self
            .conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(|source| StoreError::WriteFailed {
                key: key.to_string(),
                source,
            })?;
        Ok(rows > 0)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let read_err = |source: rusqlite::Error| StoreError::ReadFailed {
            key: "*".to_string(),
            source,
        };
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv ORDER BY key")
            .map_err(read_err)?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(read_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_err)?;
        Ok(keys)
    }
}

/// Gets the path to the store file within the app's data directory.
/// Creates the directory if it doesn't exist.
pub fn get_store_path() -> Result<PathBuf, StoreError> {
    let data_dir = dirs::data_dir().ok_or(StoreError::DataDir)?;
    let app_dir = data_dir.join(APP_DATA_DIR);
    if !app_dir.exists() {
        std::fs::create_dir_all(&app_dir)?;
    }
    Ok(app_dir.join(STORE_FILE_NAME))
}
