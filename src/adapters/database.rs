use crate::domain::ports::ConnectionProvider;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a new SQLite connection to a database file on every call.
#[derive(Debug, Clone)]
pub struct SqliteConnectionProvider {
    path: PathBuf,
}

impl SqliteConnectionProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionProvider for SqliteConnectionProvider {
    fn connect(&self) -> rusqlite::Result<Connection> {
        tracing::trace!("Opening SQLite database at {}", self.path.display());
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}
