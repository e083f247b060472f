//! `SQLite`-backed diagnosis history and tips repository.

use super::{acquire_lock, configure_connection, escape_like_wildcards, record_operation_metrics};
use crate::models::{DiagnosisRecord, HistoryStats, Symptom, Tip, TipCategory};
use crate::storage::{ConditionPattern, HealthStore};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing::instrument;

const BACKEND: &str = "sqlite";
const IN_MEMORY: &str = ":memory:";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS diagnoses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        recorded_at TEXT NOT NULL,
        symptoms TEXT NOT NULL,
        diagnosis TEXT NOT NULL,
        confidence REAL NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_diagnoses_diagnosis ON diagnoses(diagnosis);
    CREATE TABLE IF NOT EXISTS health_tips (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category TEXT NOT NULL,
        condition TEXT,
        tip_text TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_health_tips_category ON health_tips(category);
";

/// Diagnosis history and tips stored in one `SQLite` database.
pub struct SqliteHealthStore {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl SqliteHealthStore {
    /// Opens (or creates) the database at `db_path`.
    ///
    /// Parent directories are created. The schema is bootstrapped and the
    /// built-in tips are seeded if the tips table is empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the directory, database or schema
    /// cannot be created.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::operation("create_data_dir", e))?;
        }

        let conn = Connection::open(&db_path).map_err(|e| Error::operation("open_sqlite", e))?;
        Self::from_connection(conn, db_path)
    }

    /// Creates a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the schema cannot be created.
    pub fn in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| Error::operation("open_sqlite_memory", e))?;
        Self::from_connection(conn, PathBuf::from(IN_MEMORY))
    }

    fn from_connection(conn: Connection, db_path: PathBuf) -> Result<Self> {
        configure_connection(&conn)?;
        let store = Self {
            conn: Mutex::new(conn),
            db_path,
        };
        store.initialize()?;
        Ok(store)
    }

    /// Database location (`:memory:` for in-memory stores).
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn initialize(&self) -> Result<()> {
        let mut conn = acquire_lock(&self.conn);
        conn.execute_batch(SCHEMA)
            .map_err(|e| Error::operation("create_schema", e))?;

        let existing: i64 = conn
            .query_row("SELECT COUNT(*) FROM health_tips", [], |row| row.get(0))
            .map_err(|e| Error::operation("count_tips", e))?;
        if existing > 0 {
            return Ok(());
        }

        let tips = Tip::builtin();
        let tx = conn
            .transaction()
            .map_err(|e| Error::operation("seed_tips", e))?;
        for tip in &tips {
            tx.execute(
                "INSERT INTO health_tips (category, condition, tip_text) VALUES (?1, ?2, ?3)",
                params![tip.category.as_str(), tip.condition, tip.text],
            )
            .map_err(|e| Error::operation("seed_tips", e))?;
        }
        tx.commit().map_err(|e| Error::operation("seed_tips", e))?;

        tracing::debug!(count = tips.len(), "Seeded built-in tips");
        Ok(())
    }

    /// Runs `f` under the connection lock and records metrics for `operation`.
    fn observe<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&Connection) -> Result<T>,
    ) -> Result<T> {
        let start = Instant::now();
        let result = {
            let conn = acquire_lock(&self.conn);
            f(&conn)
        };
        let status = if result.is_ok() { "success" } else { "error" };
        record_operation_metrics(BACKEND, operation, start, status);
        result
    }

    fn storage_size(&self, conn: &Connection) -> Result<u64> {
        if self.db_path.as_os_str() != IN_MEMORY {
            if let Ok(metadata) = std::fs::metadata(&self.db_path) {
                return Ok(metadata.len());
            }
        }
        let page_count: i64 = conn
            .pragma_query_value(None, "page_count", |row| row.get(0))
            .map_err(|e| Error::operation("stats", e))?;
        let page_size: i64 = conn
            .pragma_query_value(None, "page_size", |row| row.get(0))
            .map_err(|e| Error::operation("stats", e))?;
        Ok(u64::try_from(page_count.saturating_mul(page_size)).unwrap_or(0))
    }
}

impl HealthStore for SqliteHealthStore {
    #[instrument(skip(self, symptoms), fields(symptoms = symptoms.len()))]
    fn save_diagnosis(
        &self,
        symptoms: &[Symptom],
        diagnosis: &str,
        confidence: f64,
    ) -> Result<i64> {
        let symptoms_json =
            serde_json::to_string(symptoms).map_err(|e| Error::operation("save_diagnosis", e))?;
        let recorded_at = Utc::now().to_rfc3339();

        self.observe("save_diagnosis", |conn| {
            conn.execute(
                "INSERT INTO diagnoses (recorded_at, symptoms, diagnosis, confidence)
                 VALUES (?1, ?2, ?3, ?4)",
                params![recorded_at, symptoms_json, diagnosis, confidence],
            )
            .map_err(|e| Error::operation("save_diagnosis", e))?;
            Ok(conn.last_insert_rowid())
        })
    }

    #[instrument(skip(self))]
    fn recent_records(&self, limit: usize) -> Result<Vec<DiagnosisRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.observe("recent_records", |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT id, recorded_at, symptoms, diagnosis, confidence
                     FROM diagnoses ORDER BY id DESC LIMIT ?1",
                )
                .map_err(|e| Error::operation("recent_records", e))?;
            let rows = stmt
                .query_map(params![limit], |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, f64>(4)?,
                    ))
                })
                .map_err(|e| Error::operation("recent_records", e))?;

            let mut records = Vec::new();
            for row in rows {
                let (id, recorded_at, symptoms, diagnosis, confidence) =
                    row.map_err(|e| Error::operation("recent_records", e))?;
                records.push(DiagnosisRecord {
                    id,
                    recorded_at: DateTime::parse_from_rfc3339(&recorded_at)
                        .map_err(|e| Error::operation("decode_recorded_at", e))?
                        .with_timezone(&Utc),
                    symptoms: serde_json::from_str(&symptoms)
                        .map_err(|e| Error::operation("decode_symptoms", e))?,
                    diagnosis,
                    confidence,
                });
            }
            Ok(records)
        })
    }

    fn tips_by_category(&self, category: TipCategory) -> Result<Vec<String>> {
        self.observe("tips_by_category", |conn| {
            query_texts(
                conn,
                "tips_by_category",
                "SELECT tip_text FROM health_tips WHERE category = ?1 ORDER BY id",
                category.as_str(),
            )
        })
    }

    fn tips_by_condition_pattern(&self, pattern: &ConditionPattern) -> Result<Vec<String>> {
        self.observe("tips_by_condition_pattern", |conn| match pattern {
            ConditionPattern::Exact(value) => query_texts(
                conn,
                "tips_by_condition_pattern",
                "SELECT tip_text FROM health_tips
                 WHERE condition = ?1 COLLATE NOCASE ORDER BY id",
                value,
            ),
            ConditionPattern::Contains(value) => query_texts(
                conn,
                "tips_by_condition_pattern",
                "SELECT tip_text FROM health_tips
                 WHERE condition LIKE '%' || ?1 || '%' ESCAPE '\\' ORDER BY id",
                &escape_like_wildcards(value),
            ),
        })
    }

    fn all_tips(&self) -> Result<Vec<(TipCategory, String)>> {
        self.observe("all_tips", |conn| {
            let mut stmt = conn
                .prepare("SELECT category, tip_text FROM health_tips ORDER BY id")
                .map_err(|e| Error::operation("all_tips", e))?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
                .map_err(|e| Error::operation("all_tips", e))?;

            let mut tips = Vec::new();
            for row in rows {
                let (category, text) = row.map_err(|e| Error::operation("all_tips", e))?;
                match TipCategory::parse(&category) {
                    Some(category) => tips.push((category, text)),
                    None => tracing::warn!(category = %category, "Skipping tip with unknown category"),
                }
            }
            Ok(tips)
        })
    }

    #[instrument(skip(self))]
    fn stats(&self) -> Result<HistoryStats> {
        self.observe("stats", |conn| {
            let total: i64 = conn
                .query_row("SELECT COUNT(*) FROM diagnoses", [], |row| row.get(0))
                .map_err(|e| Error::operation("stats", e))?;

            let most_frequent = conn
                .query_row(
                    "SELECT diagnosis, COUNT(*) AS count FROM diagnoses
                     GROUP BY diagnosis ORDER BY count DESC, MAX(id) DESC LIMIT 1",
                    [],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
                )
                .optional()
                .map_err(|e| Error::operation("stats", e))?
                .map(|(name, count)| (name, u64::try_from(count).unwrap_or(0)));

            Ok(HistoryStats {
                total_records: u64::try_from(total).unwrap_or(0),
                most_frequent,
                storage_size_bytes: self.storage_size(conn)?,
            })
        })
    }

    fn insert_tip(&self, tip: &Tip) -> Result<i64> {
        self.observe("insert_tip", |conn| {
            conn.execute(
                "INSERT INTO health_tips (category, condition, tip_text) VALUES (?1, ?2, ?3)",
                params![tip.category.as_str(), tip.condition, tip.text],
            )
            .map_err(|e| Error::operation("insert_tip", e))?;
            Ok(conn.last_insert_rowid())
        })
    }
}

fn query_texts(
    conn: &Connection,
    operation: &'static str,
    sql: &str,
    param: &str,
) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| Error::operation(operation, e))?;
    let rows = stmt
        .query_map(params![param], |row| row.get::<_, String>(0))
        .map_err(|e| Error::operation(operation, e))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::operation(operation, e))
}
