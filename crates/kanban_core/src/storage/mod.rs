//! Board snapshot persistence over a single key-value slot.
//!
//! # Responsibility
//! - Serialize the board tree into one versioned JSON document.
//! - Restore snapshots, reviving every temporal field into `DateTime<Utc>`.
//! - Keep all I/O and decode failures inside this boundary.
//!
//! # Invariants
//! - `save` never errors toward callers; failure is a logged `false`.
//! - `load` treats a missing key, a malformed payload, and a schema-version
//!   mismatch identically: `None`. Callers cannot distinguish first run
//!   from corrupt data, and must fall back to seed data uniformly.
//! - `clear` is idempotent.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::board::Board;
use log::{error, info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed key holding the current board document.
pub const BOARD_STORAGE_KEY: &str = "kanban.board";

/// Version tag written into every persisted document.
pub const SCHEMA_VERSION: u32 = 1;

const AVAILABILITY_PROBE_KEY: &str = "kanban.storage_probe";

pub type StorageResult<T> = Result<T, StorageError>;

/// Errors from board persistence operations.
///
/// These stay internal to the adapter; public entry points degrade them to
/// `false`/`None` after logging.
#[derive(Debug)]
pub enum StorageError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Board tree could not be encoded as JSON.
    Serialize(serde_json::Error),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "board document encode failed: {err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "board storage requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "board storage requires table `{table}`")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Persisted document shape: a version tag wrapping the entity tree.
///
/// Temporal fields travel as RFC 3339 text and are revived to
/// `DateTime<Utc>` by deserialization.
#[derive(Debug, Deserialize)]
struct StoredDocument {
    schema_version: u32,
    board: Board,
}

/// Borrowed counterpart of [`StoredDocument`] used on the write path.
#[derive(Serialize)]
struct StoredDocumentRef<'a> {
    schema_version: u32,
    board: &'a Board,
}

/// SQLite-backed persistence adapter for board snapshots.
#[derive(Debug)]
pub struct BoardStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> BoardStorage<'conn> {
    /// Creates an adapter from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        ensure_storage_ready(conn)?;
        Ok(Self { conn })
    }

    /// Persists the board under the fixed key.
    ///
    /// Returns `true` on success; encode and SQL failures are logged and
    /// reported as `false`, never raised.
    pub fn save(&self, board: &Board) -> bool {
        match self.try_save(board) {
            Ok(document_bytes) => {
                info!("event=board_save module=storage status=ok bytes={document_bytes}");
                true
            }
            Err(err) => {
                error!("event=board_save module=storage status=error error={err}");
                false
            }
        }
    }

    /// Loads the persisted board, if any.
    ///
    /// Returns `None` when the key is absent, the payload does not parse,
    /// or the schema version does not match.
    pub fn load(&self) -> Option<Board> {
        let raw = match self.read_raw() {
            Ok(raw) => raw?,
            Err(err) => {
                error!("event=board_load module=storage status=error error={err}");
                return None;
            }
        };

        match serde_json::from_str::<StoredDocument>(&raw) {
            Ok(document) if document.schema_version == SCHEMA_VERSION => {
                info!("event=board_load module=storage status=ok");
                Some(document.board)
            }
            Ok(document) => {
                warn!(
                    "event=board_load module=storage status=miss reason=schema_version expected={} got={}",
                    SCHEMA_VERSION, document.schema_version
                );
                None
            }
            Err(err) => {
                warn!("event=board_load module=storage status=miss reason=malformed_payload error={err}");
                None
            }
        }
    }

    /// Removes the persisted board. Removing an absent key is a success.
    pub fn clear(&self) -> bool {
        match self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [BOARD_STORAGE_KEY])
        {
            Ok(_) => {
                info!("event=board_clear module=storage status=ok");
                true
            }
            Err(err) => {
                error!("event=board_clear module=storage status=error error={err}");
                false
            }
        }
    }

    /// Probes whether the store accepts writes at all.
    ///
    /// Writes and removes a sentinel key; any failure reports `false`.
    pub fn is_available(&self) -> bool {
        let probe = self
            .conn
            .execute(
                "INSERT OR REPLACE INTO kv_store (key, value) VALUES (?1, ?2);",
                params![AVAILABILITY_PROBE_KEY, "probe"],
            )
            .and_then(|_| {
                self.conn
                    .execute("DELETE FROM kv_store WHERE key = ?1;", [AVAILABILITY_PROBE_KEY])
            });

        match probe {
            Ok(_) => true,
            Err(err) => {
                warn!("event=storage_probe module=storage status=error error={err}");
                false
            }
        }
    }

    /// Encodes and writes the document, returning its size in bytes.
    fn try_save(&self, board: &Board) -> StorageResult<usize> {
        let document = StoredDocumentRef {
            schema_version: SCHEMA_VERSION,
            board,
        };
        let serialized = serde_json::to_string(&document)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value) VALUES (?1, ?2);",
            params![BOARD_STORAGE_KEY, serialized.as_str()],
        )?;
        Ok(serialized.len())
    }

    fn read_raw(&self) -> StorageResult<Option<String>> {
        let raw = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [BOARD_STORAGE_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(raw)
    }
}

fn ensure_storage_ready(conn: &Connection) -> StorageResult<()> {
    let actual_version =
        conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(StorageError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_store'
        );",
        [],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(StorageError::MissingRequiredTable("kv_store"));
    }

    Ok(())
}
