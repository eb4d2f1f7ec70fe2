use rusqlite::{Connection, OpenFlags};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::AttestError;

/// Handle to the warehouse database. Holds only the path; every call to
/// `with_conn` opens a connection that lives for that call alone.
#[derive(Clone, Debug)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the warehouse read-only and runs `f` against it.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, AttestError>
    where
        F: FnOnce(&Connection) -> Result<T, AttestError>,
    {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            AttestError::DbError(format!("Open DB {} failed: {e}", self.path.display()))
        })?;
        debug!(path = %self.path.display(), "opened warehouse connection");

        f(&conn)
    }

    /// Like `with_conn`, but writable and creating the file when missing.
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T, AttestError>
    where
        F: FnOnce(&mut Connection) -> Result<T, AttestError>,
    {
        let mut conn = Connection::open(&self.path).map_err(|e| {
            AttestError::DbError(format!("Open DB {} failed: {e}", self.path.display()))
        })?;
        f(&mut conn)
    }
}

/// Initialize database from a SQL schema file
pub fn init_db(db: &Database, schema_path: impl AsRef<Path>) -> Result<(), AttestError> {
    let schema_path = schema_path.as_ref();
    let schema_sql = fs::read_to_string(schema_path)
        .map_err(|e| AttestError::DbError(format!("Failed to read schema file: {e}")))?;

    db.with_conn_mut(|conn| {
        conn.execute_batch(&schema_sql)
            .map_err(|e| AttestError::DbError(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })?;

    info!(schema = %schema_path.display(), db = %db.path().display(), "database initialized");
    Ok(())
}
