use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};

use crate::table::{parse_fixtures_csv, parse_results_csv};

/// One stored admin upload. The raw CSV text is kept so column presence
/// survives exactly as uploaded.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub upload_id: i64,
    pub uploaded_at: String,
    pub results_name: String,
    pub fixtures_name: String,
    pub results_csv: String,
    pub fixtures_csv: String,
}

#[derive(Debug, Clone)]
pub struct UploadSummary {
    pub upload_id: i64,
    pub uploaded_at: String,
    pub results_name: String,
    pub fixtures_name: String,
    pub results_rows: usize,
    pub fixtures_rows: usize,
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create store directory {}", parent.display()))?;
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS uploads (
            upload_id INTEGER PRIMARY KEY AUTOINCREMENT,
            uploaded_at TEXT NOT NULL,
            results_name TEXT NOT NULL,
            fixtures_name TEXT NOT NULL,
            results_csv TEXT NOT NULL,
            fixtures_csv TEXT NOT NULL,
            results_rows INTEGER NOT NULL,
            fixtures_rows INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_uploads_uploaded_at ON uploads(uploaded_at);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Validate and store a results/fixtures pair. Both tables must parse; a
/// broken upload never replaces the previous one.
pub fn save_upload(
    conn: &mut Connection,
    results_name: &str,
    results_csv: &str,
    fixtures_name: &str,
    fixtures_csv: &str,
) -> Result<UploadSummary> {
    let results = parse_results_csv(results_csv)
        .with_context(|| format!("results upload {results_name} rejected"))?;
    let fixtures = parse_fixtures_csv(fixtures_csv)
        .with_context(|| format!("fixtures upload {fixtures_name} rejected"))?;
    if fixtures.rows.is_empty() {
        return Err(anyhow!("fixtures upload {fixtures_name} has no usable rows"));
    }

    let uploaded_at = Utc::now().to_rfc3339();
    let tx = conn.transaction().context("begin upload transaction")?;
    tx.execute(
        "INSERT INTO uploads(uploaded_at, results_name, fixtures_name, results_csv, fixtures_csv, results_rows, fixtures_rows)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            uploaded_at,
            results_name,
            fixtures_name,
            results_csv,
            fixtures_csv,
            results.rows.len() as i64,
            fixtures.rows.len() as i64
        ],
    )
    .context("insert upload")?;
    let upload_id = tx.last_insert_rowid();
    tx.commit().context("commit upload transaction")?;

    Ok(UploadSummary {
        upload_id,
        uploaded_at,
        results_name: results_name.to_string(),
        fixtures_name: fixtures_name.to_string(),
        results_rows: results.rows.len(),
        fixtures_rows: fixtures.rows.len(),
    })
}

pub fn load_latest_upload(conn: &Connection) -> Result<Option<StoredUpload>> {
    conn.query_row(
        r#"
        SELECT upload_id, uploaded_at, results_name, fixtures_name, results_csv, fixtures_csv
        FROM uploads
        ORDER BY upload_id DESC
        LIMIT 1
        "#,
        [],
        |row| {
            Ok(StoredUpload {
                upload_id: row.get(0)?,
                uploaded_at: row.get(1)?,
                results_name: row.get(2)?,
                fixtures_name: row.get(3)?,
                results_csv: row.get(4)?,
                fixtures_csv: row.get(5)?,
            })
        },
    )
    .optional()
    .context("query latest upload")
}

pub fn list_uploads(conn: &Connection) -> Result<Vec<UploadSummary>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT upload_id, uploaded_at, results_name, fixtures_name, results_rows, fixtures_rows
            FROM uploads
            ORDER BY upload_id DESC
            "#,
        )
        .context("prepare list uploads query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok(UploadSummary {
                upload_id: row.get(0)?,
                uploaded_at: row.get(1)?,
                results_name: row.get(2)?,
                fixtures_name: row.get(3)?,
                results_rows: row.get::<_, i64>(4)? as usize,
                fixtures_rows: row.get::<_, i64>(5)? as usize,
            })
        })
        .context("query list uploads")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode upload row")?);
    }
    Ok(out)
}

/// Drop all but the `keep` newest uploads. Returns the number removed.
pub fn prune_uploads(conn: &Connection, keep: usize) -> Result<usize> {
    let removed = conn
        .execute(
            "DELETE FROM uploads WHERE upload_id NOT IN (
                SELECT upload_id FROM uploads ORDER BY upload_id DESC LIMIT ?1
             )",
            params![keep as i64],
        )
        .context("prune uploads")?;
    Ok(removed)
}
