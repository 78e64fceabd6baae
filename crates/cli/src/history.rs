//! SQLite-backed query history.

use krishi_core::{AppError, AppResult};
use krishi_knowledge::{QueryRecord, QueryStore};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

/// A persisted history row, timestamp included.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: i64,
    pub user_id: String,
    pub query: String,
    pub offline_response: String,
    pub ai_response: Option<String>,
    pub created_at: String,
}

/// Aggregate counters over the history table.
#[derive(Debug, Clone)]
pub struct HistoryStats {
    pub total_queries: u64,
    pub ai_answered: u64,
    pub distinct_users: u64,
}

/// Query history stored in a local SQLite database.
///
/// Timestamps are assigned by the store at insert time, in UTC.
pub struct SqliteQueryStore {
    conn: Mutex<Connection>,
}

impl SqliteQueryStore {
    /// Open (and initialize if needed) the history database.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Store(format!("Failed to create history directory: {}", e))
                })?;
            }
        }

        let conn = Connection::open(db_path)
            .map_err(|e| AppError::Store(format!("Failed to open history database: {}", e)))?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS query_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                query TEXT NOT NULL,
                offline_response TEXT NOT NULL,
                ai_response TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX IF NOT EXISTS idx_history_user ON query_history(user_id);
            "#,
        )
        .map_err(|e| AppError::Store(format!("Failed to create history table: {}", e)))?;

        tracing::debug!("Opened query history at {:?}", db_path);

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Most recent entries, newest first. `user_id` of `None` spans all
    /// users.
    pub fn recent(&self, user_id: Option<&str>, limit: usize) -> AppResult<Vec<HistoryEntry>> {
        let conn = self.lock()?;

        let (sql, filter) = match user_id {
            Some(user) => (
                "SELECT id, user_id, query, offline_response, ai_response, created_at
                 FROM query_history WHERE user_id = ?1
                 ORDER BY id DESC LIMIT ?2",
                Some(user),
            ),
            None => (
                "SELECT id, user_id, query, offline_response, ai_response, created_at
                 FROM query_history
                 ORDER BY id DESC LIMIT ?1",
                None,
            ),
        };

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| AppError::Store(format!("Failed to prepare history query: {}", e)))?;

        let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<HistoryEntry> {
            Ok(HistoryEntry {
                id: row.get(0)?,
                user_id: row.get(1)?,
                query: row.get(2)?,
                offline_response: row.get(3)?,
                ai_response: row.get(4)?,
                created_at: row.get(5)?,
            })
        };

        let rows = match filter {
            Some(user) => stmt.query_map(params![user, limit as i64], map_row),
            None => stmt.query_map(params![limit as i64], map_row),
        }
        .map_err(|e| AppError::Store(format!("Failed to query history: {}", e)))?;

        let mut entries = Vec::new();
        for row in rows {
            entries
                .push(row.map_err(|e| AppError::Store(format!("Failed to read row: {}", e)))?);
        }
        Ok(entries)
    }

    /// Aggregate counters over the whole table.
    pub fn stats(&self) -> AppResult<HistoryStats> {
        let conn = self.lock()?;

        let (total_queries, ai_answered, distinct_users) = conn
            .query_row(
                "SELECT COUNT(*),
                        COUNT(ai_response),
                        COUNT(DISTINCT user_id)
                 FROM query_history",
                [],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .map_err(|e| AppError::Store(format!("Failed to compute stats: {}", e)))?;

        Ok(HistoryStats {
            total_queries: total_queries as u64,
            ai_answered: ai_answered as u64,
            distinct_users: distinct_users as u64,
        })
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Store("History database lock poisoned".to_string()))
    }
}

impl QueryStore for SqliteQueryStore {
    fn record(&self, record: &QueryRecord) -> AppResult<()> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO query_history (user_id, query, offline_response, ai_response)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.user_id,
                record.query,
                record.offline_response,
                record.ai_response,
            ],
        )
        .map_err(|e| AppError::Store(format!("Failed to record query: {}", e)))?;

        Ok(())
    }
}
