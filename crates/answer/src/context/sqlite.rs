//! SQLite-backed conversation context and exchange log.

use super::{ContextStore, ConversationContext, ExchangeLog, QaExchange};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wikiqa_core::{AppError, AppResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS conversation_context (
    conversation_id TEXT NOT NULL,
    installation_id INTEGER NOT NULL,
    last_question TEXT NOT NULL,
    last_answer TEXT NOT NULL,
    turn_count INTEGER NOT NULL DEFAULT 1,
    last_updated_at TEXT NOT NULL,
    PRIMARY KEY (conversation_id, installation_id)
);

CREATE TABLE IF NOT EXISTS qa_exchange (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    installation_id INTEGER NOT NULL,
    conversation_id TEXT,
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    citations TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_qa_exchange_installation ON qa_exchange(installation_id);
"#;

/// Context store over a single SQLite connection.
///
/// Every operation runs on the blocking pool and holds the connection lock
/// for exactly one statement, so concurrent upserts on one key serialize and
/// none is lost.
pub struct SqliteContextStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteContextStore {
    /// Open (or create) the database and its tables.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::ContextStore(format!("Failed to create database directory: {}", e))
            })?;
        }

        let conn = Connection::open(db_path)
            .map_err(|e| AppError::ContextStore(format!("Failed to open database: {}", e)))?;
        conn.busy_timeout(Duration::from_secs(5))
            .map_err(|e| AppError::ContextStore(format!("Failed to set busy timeout: {}", e)))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| AppError::ContextStore(format!("Failed to create tables: {}", e)))?;

        tracing::debug!("Opened context store at {:?}", db_path);
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| AppError::ContextStore("Connection lock poisoned".to_string()))?;
            f(&guard)
        })
        .await
        .map_err(|e| AppError::ContextStore(format!("Store task failed: {}", e)))?
    }
}

fn parse_timestamp(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn context_from_row(row: &Row<'_>) -> rusqlite::Result<ConversationContext> {
    Ok(ConversationContext {
        conversation_id: row.get(0)?,
        installation_id: row.get(1)?,
        last_question: row.get(2)?,
        last_answer: row.get(3)?,
        turn_count: row.get(4)?,
        last_updated_at: parse_timestamp(5, row.get(5)?)?,
    })
}

fn exchange_from_row(row: &Row<'_>) -> rusqlite::Result<QaExchange> {
    let citations: String = row.get(4)?;
    let citations = serde_json::from_str(&citations)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(QaExchange {
        installation_id: row.get(0)?,
        conversation_id: row.get(1)?,
        question: row.get(2)?,
        answer: row.get(3)?,
        citations,
        created_at: parse_timestamp(5, row.get(5)?)?,
    })
}

#[async_trait::async_trait]
impl ContextStore for SqliteContextStore {
    async fn get(
        &self,
        conversation_id: &str,
        installation_id: i64,
    ) -> AppResult<Option<ConversationContext>> {
        let conversation_id = conversation_id.to_string();
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT conversation_id, installation_id, last_question, last_answer, turn_count, last_updated_at
                 FROM conversation_context
                 WHERE conversation_id = ?1 AND installation_id = ?2",
                params![conversation_id, installation_id],
                context_from_row,
            )
            .optional()
            .map_err(|e| AppError::ContextStore(format!("Failed to load context: {}", e)))
        })
        .await
    }

    async fn upsert(
        &self,
        conversation_id: &str,
        installation_id: i64,
        question: &str,
        answer: &str,
    ) -> AppResult<()> {
        let conversation_id = conversation_id.to_string();
        let question = question.to_string();
        let answer = answer.to_string();
        let now = Utc::now().to_rfc3339();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO conversation_context
                    (conversation_id, installation_id, last_question, last_answer, turn_count, last_updated_at)
                 VALUES (?1, ?2, ?3, ?4, 1, ?5)
                 ON CONFLICT (conversation_id, installation_id) DO UPDATE SET
                    last_question = excluded.last_question,
                    last_answer = excluded.last_answer,
                    turn_count = conversation_context.turn_count + 1,
                    last_updated_at = excluded.last_updated_at",
                params![conversation_id, installation_id, question, answer, now],
            )
            .map_err(|e| AppError::ContextStore(format!("Failed to store context: {}", e)))?;
            Ok(())
        })
        .await
    }
}

#[async_trait::async_trait]
impl ExchangeLog for SqliteContextStore {
    async fn record_exchange(&self, exchange: &QaExchange) -> AppResult<()> {
        let citations = serde_json::to_string(&exchange.citations)?;
        let exchange = exchange.clone();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO qa_exchange
                    (installation_id, conversation_id, question, answer, citations, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    exchange.installation_id,
                    exchange.conversation_id,
                    exchange.question,
                    exchange.answer,
                    citations,
                    exchange.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| AppError::ContextStore(format!("Failed to record exchange: {}", e)))?;
            Ok(())
        })
        .await
    }

    async fn recent_exchanges(
        &self,
        installation_id: i64,
        limit: usize,
    ) -> AppResult<Vec<QaExchange>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.with_conn(move |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT installation_id, conversation_id, question, answer, citations, created_at
                     FROM qa_exchange
                     WHERE installation_id = ?1
                     ORDER BY id DESC
                     LIMIT ?2",
                )
                .map_err(|e| AppError::ContextStore(format!("Failed to prepare query: {}", e)))?;

            let rows = stmt
                .query_map(params![installation_id, limit], exchange_from_row)
                .map_err(|e| AppError::ContextStore(format!("Failed to query exchanges: {}", e)))?;

            rows.collect::<Result<Vec<_>, _>>()
                .map_err(|e| AppError::ContextStore(format!("Failed to read exchange: {}", e)))
        })
        .await
    }
}
