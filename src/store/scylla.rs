use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use scylla::batch::{Batch, BatchType};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::StoreConfig;
use crate::error::{AppError, Result};
use crate::models::session::{DEFAULT_DEVICE_NAME, Session};
use crate::statement_cache::StatementCache;
use crate::store::{RawPage, SessionStore};

/// Column list shared by every SELECT, in mapper order.
const SESSION_COLUMNS: &str = "token, user_id, device_id, device_name, created_at";

/// Raw shape of one session row as it comes off the wire.
type SessionRowTuple = (String, String, String, Option<String>, DateTime<Utc>);

/// The production [`SessionStore`] backend over a CQL cluster.
///
/// Owns no connection lifecycle: it wraps an already-established driver
/// session (see [`crate::db::connect`]) plus a prepared-statement cache.
pub struct ScyllaStore {
    session: scylla::Session,
    config: StoreConfig,
    statements: StatementCache,
    connected: AtomicBool,
}

/// A helper function to map a wire tuple to a `Session`.
///
/// Rows written by this crate always carry a device name, but a NULL left by
/// a foreign writer maps to the same default the writer would have applied.
fn row_to_session(row: SessionRowTuple) -> Session {
    let (token, user_id, device_id, device_name, created_at) = row;
    Session {
        token,
        user_id,
        device_id,
        device_name: device_name.unwrap_or_else(|| DEFAULT_DEVICE_NAME.to_string()),
        created_at,
    }
}

impl ScyllaStore {
    /// Wraps an established driver session.
    pub fn new(session: scylla::Session, config: StoreConfig) -> Self {
        Self {
            session,
            config,
            statements: StatementCache::new(),
            connected: AtomicBool::new(true),
        }
    }

    /// Marks the handle unreachable. The composition root owns reconnection.
    pub fn mark_disconnected(&self) {
        self.connected.store(false, Ordering::Relaxed);
    }

    fn select_cql(&self, filter: &str) -> String {
        format!(
            "SELECT {} FROM {}{}",
            SESSION_COLUMNS,
            self.config.qualified_table(),
            filter
        )
    }

    /// Runs one paged SELECT and repackages rows plus native paging state.
    async fn execute_page(
        &self,
        cql: &str,
        values: impl scylla::serialize::row::SerializeRow,
        page_size: i32,
        paging_state: Option<Vec<u8>>,
    ) -> Result<RawPage> {
        let mut statement = self.statements.get_or_prepare(&self.session, cql).await?;
        statement.set_page_size(page_size);

        let result = self
            .session
            .execute_paged(&statement, values, paging_state.map(Bytes::from))
            .await?;

        let next = result.paging_state.as_ref().map(|state| state.to_vec());
        let mut rows = Vec::new();
        for row in result
            .rows_typed::<SessionRowTuple>()
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            let row = row.map_err(|e| AppError::Database(e.to_string()))?;
            rows.push(row_to_session(row));
        }

        Ok(RawPage {
            rows,
            paging_state: next,
        })
    }
}

#[async_trait]
impl SessionStore for ScyllaStore {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.session
            .query(
                format!(
                    "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = \
                     {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
                    self.config.keyspace, self.config.replication_factor
                ),
                (),
            )
            .await?;

        self.session
            .query(
                format!(
                    "CREATE TABLE IF NOT EXISTS {} (\
                     token text PRIMARY KEY, \
                     user_id text, \
                     device_id text, \
                     device_name text, \
                     created_at timestamp)",
                    self.config.qualified_table()
                ),
                (),
            )
            .await?;

        self.session
            .query(
                format!(
                    "CREATE INDEX IF NOT EXISTS {}_user_id_idx ON {} (user_id)",
                    self.config.table,
                    self.config.qualified_table()
                ),
                (),
            )
            .await?;

        self.session.await_schema_agreement().await?;

        Ok(())
    }

    async fn insert_session(
        &self,
        token: &str,
        user_id: &str,
        device_id: &str,
        device_name: &str,
        ttl_seconds: i32,
    ) -> Result<()> {
        let cql = format!(
            "INSERT INTO {} (token, user_id, device_id, device_name, created_at) \
             VALUES (?, ?, ?, ?, toTimestamp(now())) USING TTL ?",
            self.config.qualified_table()
        );
        let statement = self.statements.get_or_prepare(&self.session, &cql).await?;

        self.session
            .execute(
                &statement,
                (token, user_id, device_id, device_name, ttl_seconds),
            )
            .await?;

        Ok(())
    }

    async fn get_by_token(&self, token: &str) -> Result<Option<Session>> {
        let cql = self.select_cql(" WHERE token = ?");
        let statement = self.statements.get_or_prepare(&self.session, &cql).await?;

        let row = self
            .session
            .execute(&statement, (token,))
            .await?
            .maybe_first_row_typed::<SessionRowTuple>()
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(row_to_session))
    }

    async fn page_by_user(
        &self,
        user_id: &str,
        page_size: i32,
        paging_state: Option<Vec<u8>>,
    ) -> Result<RawPage> {
        let cql = self.select_cql(" WHERE user_id = ?");
        self.execute_page(&cql, (user_id,), page_size, paging_state)
            .await
    }

    async fn scan_page(&self, page_size: i32, paging_state: Option<Vec<u8>>) -> Result<RawPage> {
        let cql = self.select_cql("");
        self.execute_page(&cql, (), page_size, paging_state).await
    }

    async fn delete_tokens(&self, tokens: &[String]) -> Result<()> {
        // One multi-statement unlogged batch: throughput, no cross-row atomicity.
        let cql = format!(
            "DELETE FROM {} WHERE token = ?",
            self.config.qualified_table()
        );
        let mut batch = Batch::new(BatchType::Unlogged);
        for _ in tokens {
            batch.append_statement(cql.as_str());
        }

        let values: Vec<(&str,)> = tokens.iter().map(|t| (t.as_str(),)).collect();
        self.session.batch(&batch, values).await?;

        Ok(())
    }

    async fn delete_token(&self, token: &str) -> Result<()> {
        let cql = format!(
            "DELETE FROM {} WHERE token = ?",
            self.config.qualified_table()
        );
        let statement = self.statements.get_or_prepare(&self.session, &cql).await?;
        self.session.execute(&statement, (token,)).await?;

        Ok(())
    }

    async fn select_existing(&self, tokens: &[String]) -> Result<Vec<String>> {
        let cql = format!(
            "SELECT token FROM {} WHERE token IN ?",
            self.config.qualified_table()
        );
        let statement = self.statements.get_or_prepare(&self.session, &cql).await?;

        let result = self
            .session
            .execute(&statement, (tokens.to_vec(),))
            .await?;

        let mut present = Vec::new();
        for row in result
            .rows_typed::<(String,)>()
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            let (token,) = row.map_err(|e| AppError::Database(e.to_string()))?;
            present.push(token);
        }

        Ok(present)
    }
}
