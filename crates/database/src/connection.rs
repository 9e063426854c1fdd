use crate::error::DbError;
use duckdb::{AccessMode, Config, Connection};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Tables the dashboard queries. Opening a file without them fails early.
pub const REQUIRED_TABLES: [&str; 2] = ["dim_platforms", "fact_sales"];

/// The single, long-lived handle to the sales database.
///
/// Clones share the same connection. The mutex serialises access so one
/// render pass never interleaves with another. The handle is released with
/// [`SalesStore::close`] once every clone but one has been dropped.
#[derive(Clone)]
pub struct SalesStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SalesStore {
    /// Opens the DuckDB file at `path` in read-only mode and checks that the
    /// star schema is present.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DbError> {
        let path = path.as_ref();
        let unavailable = |source: duckdb::Error| DbError::Unavailable {
            path: path.to_path_buf(),
            source,
        };

        let config = Config::default()
            .access_mode(AccessMode::ReadOnly)
            .map_err(unavailable)?;
        let conn = Connection::open_with_flags(path, config).map_err(unavailable)?;
        verify_schema(&conn)?;

        tracing::info!(path = %path.display(), "Opened sales database (read-only).");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path.to_path_buf()),
        })
    }

    /// Wraps an already open connection. Used for in-memory stores.
    pub(crate) fn from_connection(conn: Connection) -> Result<Self, DbError> {
        verify_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    /// The file backing this store, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Takes the connection for one session.
    ///
    /// A panic in an earlier session poisons the mutex. The connection is
    /// read-only and keeps no state between sessions, so the guard is
    /// recovered and later passes keep working.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("A previous session panicked; reusing the connection.");
            self.conn.clear_poison();
            poisoned.into_inner()
        })
    }

    /// Closes the underlying connection.
    ///
    /// Fails without closing if another clone of this store is still alive.
    pub fn close(self) -> Result<(), DbError> {
        let mutex = Arc::try_unwrap(self.conn).map_err(|shared| {
            DbError::CloseError(format!(
                "connection is still held by {} other owner(s)",
                Arc::strong_count(&shared) - 1
            ))
        })?;
        let conn = mutex.into_inner().unwrap_or_else(PoisonError::into_inner);
        conn.close()
            .map_err(|(_, e)| DbError::CloseError(e.to_string()))?;

        match &self.path {
            Some(path) => tracing::info!(path = %path.display(), "Closed sales database."),
            None => tracing::info!("Closed in-memory sales database."),
        }
        Ok(())
    }
}

impl fmt::Debug for SalesStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SalesStore")
            .field("path", &self.path)
            .field("owners", &Arc::strong_count(&self.conn))
            .finish()
    }
}

fn verify_schema(conn: &Connection) -> Result<(), DbError> {
    for table in REQUIRED_TABLES {
        let count: i64 = conn.query_row(
            "SELECT count(*) FROM information_schema.tables WHERE table_name = ?",
            [table],
            |row| row.get(0),
        )?;
        if count == 0 {
            return Err(DbError::MissingTable(table));
        }
    }
    Ok(())
}
