use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::session::Session;

/// An opaque pagination cursor.
///
/// Wraps the base64 encoding of the backend's native page-state bytes.
/// Callers pass it back unmodified to continue a search; it is never parsed
/// or reconstructed on the caller's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(String);

impl PageCursor {
    pub(crate) fn from_bytes(bytes: &[u8]) -> Self {
        Self(general_purpose::STANDARD.encode(bytes))
    }

    pub(crate) fn to_bytes(&self) -> Result<Vec<u8>> {
        general_purpose::STANDARD
            .decode(&self.0)
            .map_err(|_| AppError::Validation("Invalid paging cursor".to_string()))
    }

    /// The cursor as it travels over the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PageCursor {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One page of rows plus the backend's native resume point.
///
/// `paging_state == None` means the result set is exhausted.
#[derive(Debug, Clone, Default)]
pub struct RawPage {
    pub rows: Vec<Session>,
    pub paging_state: Option<Vec<u8>>,
}

/// The storage seam of the session store.
///
/// Implementations are pre-initialized, already-connected handles; they never
/// own connection lifecycle. Services check [`is_connected`] before issuing
/// queries and treat a `false` as a database error without touching the
/// network.
///
/// [`is_connected`]: SessionStore::is_connected
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Whether the handle currently believes it can reach the cluster.
    fn is_connected(&self) -> bool;

    /// Idempotently provisions keyspace, table, and the `user_id` index.
    async fn ensure_schema(&self) -> Result<()>;

    /// Inserts one session row with a server-side timestamp and the given
    /// TTL. Always an insert, never an upsert.
    async fn insert_session(
        &self,
        token: &str,
        user_id: &str,
        device_id: &str,
        device_name: &str,
        ttl_seconds: i32,
    ) -> Result<()>;

    /// Primary-key point lookup. Absent rows are `Ok(None)`.
    async fn get_by_token(&self, token: &str) -> Result<Option<Session>>;

    /// One page of the secondary-index lookup on `user_id`.
    async fn page_by_user(
        &self,
        user_id: &str,
        page_size: i32,
        paging_state: Option<Vec<u8>>,
    ) -> Result<RawPage>;

    /// One page of the unfiltered full-table scan.
    async fn scan_page(&self, page_size: i32, paging_state: Option<Vec<u8>>) -> Result<RawPage>;

    /// Deletes the given tokens as one batched, non-atomic request.
    async fn delete_tokens(&self, tokens: &[String]) -> Result<()>;

    /// Deletes a single token with one individually executed statement.
    async fn delete_token(&self, token: &str) -> Result<()>;

    /// Returns which of the given tokens still have a row (`token IN` probe).
    async fn select_existing(&self, tokens: &[String]) -> Result<Vec<String>>;
}
