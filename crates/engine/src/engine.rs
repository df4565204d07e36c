use crate::Row;
use crate::error::{ErrorKind, Result, classify};
use exn::ResultExt;
use sqlx::{Connection, SqliteConnection};
use tempfile::NamedTempFile;
use tracing::instrument;

/// A private, read-only SQLite engine over one loaded [`DatabaseImage`](crate::DatabaseImage).
///
/// Every engine owns exactly one connection and one staged copy of its image;
/// nothing is shared between engines. Call [`close`](Self::close) once the
/// results are materialised. Dropping an engine without closing it still
/// releases the connection and removes the staged file.
#[derive(Debug)]
pub struct Engine {
    // Field order matters: the connection must be dropped before the file
    // backing it is removed.
    conn: SqliteConnection,
    staged: NamedTempFile,
}

impl Engine {
    pub(crate) fn new(conn: SqliteConnection, staged: NamedTempFile) -> Self {
        Self { conn, staged }
    }

    /// Execute a read-only statement and decode every row dynamically.
    #[instrument(skip(self), fields(rows))]
    pub async fn fetch_all(&mut self, sql: &str) -> Result<Vec<Row>> {
        let rows: Vec<Row> = match sqlx::query_as(sql).fetch_all(&mut self.conn).await {
            Ok(rows) => rows,
            Err(err) => {
                let kind = classify(&err, ErrorKind::Query);
                return Err(err).or_raise(|| kind);
            },
        };
        tracing::Span::current().record("rows", rows.len());
        Ok(rows)
    }

    /// Execute a read-only statement projecting exactly `(INTEGER, TEXT)`.
    ///
    /// The second column may be `NULL` (e.g. from an outer join).
    #[instrument(skip(self), fields(rows))]
    pub async fn fetch_pairs(&mut self, sql: &str) -> Result<Vec<(i64, Option<String>)>> {
        let rows: Vec<(i64, Option<String>)> = match sqlx::query_as(sql).fetch_all(&mut self.conn).await {
            Ok(rows) => rows,
            Err(err) => {
                let kind = classify(&err, ErrorKind::Query);
                return Err(err).or_raise(|| kind);
            },
        };
        tracing::Span::current().record("rows", rows.len());
        Ok(rows)
    }

    /// Close the connection and remove the staged image.
    ///
    /// Errors here happen after all results have been read, so they are
    /// logged rather than returned.
    pub async fn close(self) {
        let Self { conn, staged } = self;
        if let Err(err) = conn.close().await {
            tracing::warn!(error = %err, "failed to close database connection cleanly");
        }
        if let Err(err) = staged.close() {
            tracing::warn!(error = %err, "failed to remove staged database image");
        }
    }
}

/// Quote an identifier (table or column name) for interpolation into SQL.
///
/// # Examples
///
/// ```
/// use lensmerge_engine::quote_identifier;
///
/// assert_eq!(quote_identifier("cards"), r#""cards""#);
/// assert_eq!(quote_identifier(r#"odd"name"#), r#""odd""name""#);
/// ```
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::build_image;
    use crate::{DatabaseImage, Value};

    async fn engine(statements: &[&str]) -> Engine {
        DatabaseImage::new(build_image(statements).await).unwrap().load().await.unwrap()
    }

    #[tokio::test]
    async fn test_fetch_all_decodes_storage_classes() {
        let mut engine = engine(&[
            "CREATE TABLE cards (_id INTEGER PRIMARY KEY, card INTEGER, price REAL, note TEXT, scan BLOB)",
            "INSERT INTO cards VALUES (1, 42, 0.5, 'foil', X'CAFE')",
            "INSERT INTO cards VALUES (2, 43, NULL, NULL, NULL)",
        ])
        .await;
        let rows = engine.fetch_all("SELECT * FROM cards ORDER BY _id").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].columns(),
            &[
                ("_id".to_string(), Value::Integer(1)),
                ("card".to_string(), Value::Integer(42)),
                ("price".to_string(), Value::Real(0.5)),
                ("note".to_string(), Value::Text("foil".to_string())),
                ("scan".to_string(), Value::Blob(vec![0xCA, 0xFE])),
            ]
        );
        assert_eq!(rows[1].get("price"), Some(&Value::Null));
        assert_eq!(rows[1].get("scan"), Some(&Value::Null));
        engine.close().await;
    }

    #[tokio::test]
    async fn test_fetch_all_follows_value_not_declared_type() {
        let mut engine = engine(&[
            "CREATE TABLE loose (value INTEGER)",
            "INSERT INTO loose VALUES ('not a number')",
        ])
        .await;
        let rows = engine.fetch_all("SELECT value FROM loose").await.unwrap();
        assert_eq!(rows[0].get("value"), Some(&Value::Text("not a number".to_string())));
        engine.close().await;
    }

    #[tokio::test]
    async fn test_fetch_all_empty_table() {
        let mut engine = engine(&["CREATE TABLE cards (card INTEGER)"]).await;
        assert!(engine.fetch_all("SELECT * FROM cards").await.unwrap().is_empty());
        engine.close().await;
    }

    #[tokio::test]
    async fn test_fetch_all_missing_table() {
        let mut engine = engine(&["CREATE TABLE other (id INTEGER)"]).await;
        let err = engine.fetch_all("SELECT * FROM cards").await.unwrap_err();
        assert_eq!(*err, ErrorKind::Query);
        engine.close().await;
    }

    #[tokio::test]
    async fn test_fetch_pairs_join() {
        let mut engine = engine(&[
            "CREATE TABLE names (_id INTEGER PRIMARY KEY, name TEXT)",
            "CREATE TABLE cards (_id INTEGER PRIMARY KEY, name INTEGER REFERENCES names (_id))",
            "INSERT INTO names VALUES (10, 'Ace'), (20, 'King'), (30, NULL)",
            "INSERT INTO cards VALUES (1, 10), (2, 20), (3, 30), (4, 10)",
        ])
        .await;
        let pairs = engine
            .fetch_pairs(
                "SELECT cards._id, names.name FROM cards JOIN names ON cards.name = names._id ORDER BY cards._id",
            )
            .await
            .unwrap();
        assert_eq!(
            pairs,
            vec![
                (1, Some("Ace".to_string())),
                (2, Some("King".to_string())),
                (3, None),
                (4, Some("Ace".to_string())),
            ]
        );
        engine.close().await;
    }

    #[tokio::test]
    async fn test_fetch_pairs_missing_column() {
        let mut engine = engine(&["CREATE TABLE cards (_id INTEGER PRIMARY KEY)"]).await;
        let err = engine.fetch_pairs("SELECT _id, name FROM cards").await.unwrap_err();
        assert_eq!(*err, ErrorKind::Query);
        engine.close().await;
    }

    #[tokio::test]
    async fn test_corrupt_image_is_a_format_error() {
        let mut bytes = b"SQLite format 3\0".to_vec();
        bytes.resize(4096, 0xFF);
        let err = match DatabaseImage::new(bytes).unwrap().load().await {
            Ok(mut engine) => engine.fetch_all("SELECT * FROM sqlite_master").await.unwrap_err(),
            Err(err) => err,
        };
        assert_eq!(*err, ErrorKind::Format);
    }

    #[tokio::test]
    async fn test_close_removes_staged_file() {
        let engine = engine(&["CREATE TABLE cards (card INTEGER)"]).await;
        let path = engine.staged.path().to_path_buf();
        assert!(path.exists());
        engine.close().await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_drop_removes_staged_file() {
        let engine = engine(&["CREATE TABLE cards (card INTEGER)"]).await;
        let path = engine.staged.path().to_path_buf();
        drop(engine);
        assert!(!path.exists());
    }
}
