//! Builders for real SQLite database images, for use in tests.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::{ConnectOptions, Connection};

/// Run `statements` against a brand new database and return its file bytes.
///
/// Uses a rollback journal so that the main file is complete once the
/// connection closes (no `-wal` sidecar to fold back in).
///
/// Panics if any statement fails. If test setup is wrong, then test should
/// not pass.
pub async fn build_image<I, S>(statements: I) -> Vec<u8>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let dir = tempfile::tempdir().expect("create fixture directory");
    let path = dir.path().join("fixture.db");
    let mut conn = SqliteConnectOptions::new()
        .filename(&path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Delete)
        .connect()
        .await
        .expect("create fixture database");
    for statement in statements {
        let statement = statement.as_ref();
        sqlx::query(statement)
            .execute(&mut conn)
            .await
            .unwrap_or_else(|err| panic!("fixture statement failed: {statement}: {err}"));
    }
    conn.close().await.expect("close fixture database");
    std::fs::read(&path).expect("read fixture database")
}
