use scylla::Session;
use scylla::prepared_statement::PreparedStatement;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;

use crate::error::{AppError, Result};

/// A thread-safe, asynchronous cache for prepared CQL statements.
#[derive(Clone, Default)]
pub struct StatementCache {
    cache: Arc<Mutex<HashMap<String, PreparedStatement>>>,
}

impl StatementCache {
    /// Creates a new, empty `StatementCache`.
    pub fn new() -> Self {
        Self {
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Retrieves a prepared statement from the cache, preparing it if it
    /// doesn't exist.
    pub async fn get_or_prepare(&self, session: &Session, query: &str) -> Result<PreparedStatement> {
        let mut cache = self.cache.lock().await;

        if let Some(statement) = cache.get(query) {
            return Ok(statement.clone());
        }

        let statement = session
            .prepare(query)
            .await
            .map_err(AppError::from)?;

        cache.insert(query.to_string(), statement.clone());

        Ok(statement)
    }
}
