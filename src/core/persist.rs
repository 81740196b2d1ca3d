use crate::domain::model::UserRecord;
use crate::domain::ports::ConnectionProvider;
use crate::utils::error::Result;
use rusqlite::params;

pub const INSERT_USER_SQL: &str = "INSERT INTO users (id, name, email, active) VALUES (?1, ?2, ?3, ?4)";

pub const CREATE_USERS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    active INTEGER NOT NULL
)";

/// Writes users to the `users` table, one transaction per call.
#[derive(Debug, Clone)]
pub struct UserWriter<P: ConnectionProvider> {
    provider: P,
}

impl<P: ConnectionProvider> UserWriter<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.provider.connect()?;
        conn.execute_batch(CREATE_USERS_TABLE_SQL)?;
        tracing::debug!("users table ready in {}", self.provider.describe());
        Ok(())
    }

    /// Inserts every user in one batch and commits. Returns the number of rows
    /// written.
    ///
    /// Nothing is committed unless every insert succeeds: on error the
    /// transaction is rolled back when it is dropped, and the connection is
    /// closed when it goes out of scope.
    pub fn try_save(&self, users: &[UserRecord]) -> Result<usize> {
        let mut conn = self.provider.connect()?;
        let tx = conn.transaction()?;

        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(INSERT_USER_SQL)?;
            for user in users {
                inserted += stmt.execute(params![user.id(), user.name(), user.email(), user.active()])?;
            }
        }

        tx.commit()?;
        tracing::debug!("Committed {} users to {}", inserted, self.provider.describe());
        Ok(inserted)
    }

    /// Boolean form of [`try_save`](Self::try_save): failures are logged and
    /// reported as `false`.
    pub fn save_to_database(&self, users: &[UserRecord]) -> bool {
        match self.try_save(users) {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(
                    "Failed to save {} users to {}: {}",
                    users.len(),
                    self.provider.describe(),
                    e
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::database::SqliteConnectionProvider;
    use rusqlite::Connection;
    use tempfile::TempDir;

    fn writer_with_schema(dir: &TempDir) -> UserWriter<SqliteConnectionProvider> {
        let writer = UserWriter::new(SqliteConnectionProvider::new(dir.path().join("users.db")));
        writer.ensure_schema().unwrap();
        writer
    }

    fn count_rows(writer: &UserWriter<SqliteConnectionProvider>) -> i64 {
        let conn = writer.provider().connect().unwrap();
        conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .unwrap()
    }

    fn sample_users() -> Vec<UserRecord> {
        vec![
            UserRecord::new("1", "Ann", "ann@example.com", true),
            UserRecord::new("2", "Bob", "", false),
            UserRecord::new("3", "", "cy@example.com", true),
        ]
    }

    #[test]
    fn test_save_inserts_one_row_per_user() {
        let dir = TempDir::new().unwrap();
        let writer = writer_with_schema(&dir);

        assert!(writer.save_to_database(&sample_users()));
        assert_eq!(count_rows(&writer), 3);

        let conn = writer.provider().connect().unwrap();
        let (name, email, active): (String, String, bool) = conn
            .query_row(
                "SELECT name, email, active FROM users WHERE id = ?1",
                ["2"],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(name, "Bob");
        assert_eq!(email, "");
        assert!(!active);
    }

    #[test]
    fn test_try_save_reports_row_count() {
        let dir = TempDir::new().unwrap();
        let writer = writer_with_schema(&dir);

        assert_eq!(writer.try_save(&sample_users()).unwrap(), 3);
        assert_eq!(writer.try_save(&[]).unwrap(), 0);
        assert_eq!(count_rows(&writer), 3);
    }

    #[test]
    fn test_empty_batch_succeeds() {
        let dir = TempDir::new().unwrap();
        let writer = writer_with_schema(&dir);

        assert!(writer.save_to_database(&[]));
        assert_eq!(count_rows(&writer), 0);
    }

    #[test]
    fn test_missing_table_returns_false() {
        let dir = TempDir::new().unwrap();
        let writer = UserWriter::new(SqliteConnectionProvider::new(dir.path().join("empty.db")));

        assert!(!writer.save_to_database(&sample_users()));
    }

    #[test]
    fn test_unreachable_database_returns_false() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("users.db");
        let writer = UserWriter::new(SqliteConnectionProvider::new(path));

        assert!(!writer.save_to_database(&sample_users()));
    }

    #[test]
    fn test_failure_mid_batch_commits_nothing() {
        let dir = TempDir::new().unwrap();
        let writer = writer_with_schema(&dir);

        let mut users = sample_users();
        users.push(UserRecord::new("1", "Duplicate", "dup@example.com", false));

        assert!(!writer.save_to_database(&users));
        assert_eq!(count_rows(&writer), 0);

        // 同一個資料庫之後仍可正常寫入
        assert!(writer.save_to_database(&sample_users()));
        assert_eq!(count_rows(&writer), 3);
    }

    #[test]
    fn test_conflict_with_existing_row_keeps_previous_data() {
        let dir = TempDir::new().unwrap();
        let writer = writer_with_schema(&dir);
        assert!(writer.save_to_database(&sample_users()[..1]));

        let err = writer.try_save(&sample_users()).unwrap_err();
        assert!(matches!(err, crate::utils::error::EtlError::DatabaseError(_)));

        let conn: Connection = writer.provider().connect().unwrap();
        let ids: Vec<String> = conn
            .prepare("SELECT id FROM users ORDER BY id")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(ids, vec!["1"]);
    }
}
