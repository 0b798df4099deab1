use crate::backend::Backend;
use crate::error::{HlxError, Operation, Result};
use crate::fields::{FieldSet, ID_FIELD};
use crate::options::IndexOptions;
use rusqlite::Connection;
use std::path::Path;

/// Location string that opens a private in-memory database.
pub const MEMORY: &str = ":memory:";

/// Open (creating when missing) the SQLite database at `uri`.
///
/// Accepts `:memory:`, plain paths and `file://` paths.
pub fn open_connection(uri: &str) -> Result<Connection> {
    if uri.is_empty() {
        return Err(HlxError::Config(
            "Storage location is empty and no connection was supplied".into(),
        ));
    }

    if uri == MEMORY {
        return Connection::open_in_memory().map_err(|e| HlxError::backend(Operation::Open, e));
    }

    let path = Path::new(uri.strip_prefix("file://").unwrap_or(uri));
    if path.is_dir() {
        return Err(HlxError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} is a directory", path.display()),
        )));
    }

    log::debug!("Opening index database at {}", path.display());
    Connection::open(path).map_err(|e| HlxError::backend(Operation::Open, e))
}

/// Apply the configured directives, in order, then create the index table.
pub fn initialize<B: Backend>(backend: &B, options: &IndexOptions, fields: &FieldSet) -> Result<()> {
    for pragma in &options.pragmas {
        log::debug!("Applying directive: {pragma}");
        backend
            .fetch(pragma, &[])
            .map_err(|e| HlxError::backend(Operation::Configure, e))?;
    }

    let sql = create_table_sql(&options.table, fields);
    log::debug!("Creating index table: {sql}");
    backend
        .exec(&sql, &[])
        .map_err(|e| HlxError::backend(Operation::CreateTable, e))?;
    Ok(())
}

/// Double-quote an identifier so keywords such as `order` can be columns.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn column_list<'a>(columns: impl IntoIterator<Item = &'a str>) -> String {
    columns
        .into_iter()
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn create_table_sql(table: &str, fields: &FieldSet) -> String {
    format!(
        "CREATE VIRTUAL TABLE IF NOT EXISTS {} USING fts5({})",
        quote_ident(table),
        column_list(fields.iter())
    )
}

pub(crate) fn insert_sql(table: &str, columns: &[&str]) -> String {
    let placeholders = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        quote_ident(table),
        column_list(columns.iter().copied())
    )
}

pub(crate) fn select_by_id_sql(table: &str, fields: &FieldSet) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = ?",
        column_list(fields.iter()),
        quote_ident(table),
        quote_ident(ID_FIELD)
    )
}

pub(crate) fn search_sql(table: &str, fields: &FieldSet) -> String {
    let table = quote_ident(table);
    format!(
        "SELECT {} FROM {table} WHERE {table} MATCH ?",
        column_list(fields.iter())
    )
}

pub(crate) fn delete_sql(table: &str) -> String {
    format!(
        "DELETE FROM {} WHERE {} = ?",
        quote_ident(table),
        quote_ident(ID_FIELD)
    )
}

pub(crate) fn count_sql(table: &str) -> String {
    format!("SELECT count(*) FROM {}", quote_ident(table))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_statements() {
        let fields = FieldSet::infer(["Id", "Title", "Content"]).unwrap();
        assert_eq!(
            create_table_sql("fulltext_search", &fields),
            r#"CREATE VIRTUAL TABLE IF NOT EXISTS "fulltext_search" USING fts5("id", "title", "content")"#
        );
        assert_eq!(
            insert_sql("t", &["id", "title"]),
            r#"INSERT INTO "t" ("id", "title") VALUES (?, ?)"#
        );
        assert_eq!(
            select_by_id_sql("t", &fields),
            r#"SELECT "id", "title", "content" FROM "t" WHERE "id" = ?"#
        );
        assert_eq!(
            search_sql("t", &fields),
            r#"SELECT "id", "title", "content" FROM "t" WHERE "t" MATCH ?"#
        );
        assert_eq!(delete_sql("t"), r#"DELETE FROM "t" WHERE "id" = ?"#);
        assert_eq!(count_sql("t"), r#"SELECT count(*) FROM "t""#);
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("order"), r#""order""#);
        assert_eq!(quote_ident(r#"we"ird"#), r#""we""ird""#);
    }

    #[test]
    fn test_keyword_columns_round_trip() {
        let conn = open_connection(MEMORY).unwrap();
        let fields = FieldSet::infer(["Id", "Order", "Group"]).unwrap();
        let options = IndexOptions::default().table("values");
        initialize(&conn, &options, &fields).unwrap();

        conn.exec(&insert_sql("values", &["id", "order", "group"]), &["k1", "first", "admins"])
            .unwrap();
        let found = conn.fetch(&search_sql("values", &fields), &["admins"]).unwrap();
        assert_eq!(found.columns, vec!["id", "order", "group"]);
        assert_eq!(found.rows.len(), 1);

        let by_id = conn.fetch(&select_by_id_sql("values", &fields), &["k1"]).unwrap();
        assert_eq!(by_id.rows.len(), 1);
        assert_eq!(conn.exec(&delete_sql("values"), &["k1"]).unwrap(), 1);
    }

    #[test]
    fn test_open_memory() {
        let conn = open_connection(MEMORY).unwrap();
        conn.execute_batch("CREATE TABLE x (a)").unwrap();
    }

    #[test]
    fn test_open_file_uri_creates_file() {
        let tmp = TempDir::new().unwrap();
        let db = tmp.path().join("test.db");
        let uri = format!("file://{}", db.display());

        let conn = open_connection(&uri).unwrap();
        conn.execute_batch("CREATE TABLE x (a)").unwrap();
        assert!(db.exists());
    }

    #[test]
    fn test_open_rejects_directory_and_empty() {
        let tmp = TempDir::new().unwrap();
        let err = open_connection(tmp.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("is a directory"));

        let err = open_connection("").unwrap_err();
        assert!(matches!(err, HlxError::Config(_)));
    }

    #[test]
    fn test_initialize_applies_pragmas_then_creates_table() {
        let conn = open_connection(MEMORY).unwrap();
        let fields = FieldSet::infer(["id", "body"]).unwrap();
        let options = IndexOptions::default()
            .table("notes")
            .pragmas(["PRAGMA cache_size=4321"]);

        initialize(&conn, &options, &fields).unwrap();

        let cache: i64 = conn
            .query_row("PRAGMA cache_size", [], |r| r.get(0))
            .unwrap();
        assert_eq!(cache, 4321);

        let tables: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_master WHERE name = 'notes'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn test_initialize_reports_bad_directive() {
        let conn = open_connection(MEMORY).unwrap();
        let fields = FieldSet::infer(["id"]).unwrap();
        let options = IndexOptions::default().pragmas(["PRAGMA nonsense("]);

        let err = initialize(&conn, &options, &fields).unwrap_err();
        assert_eq!(err.operation(), Some(Operation::Configure));
    }
}
