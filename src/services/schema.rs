use crate::error::{AppError, Result};
use crate::store::SessionStore;

/// Idempotently provisions the keyspace, session table, and `user_id` index.
///
/// Safe to invoke before every write: every DDL statement carries
/// `IF NOT EXISTS`, so concurrent callers never conflict and repeated calls
/// leave the schema unchanged. There is no teardown counterpart; schema
/// lifecycle is tied to deployment, not request handling.
pub async fn ensure_schema<S: SessionStore + ?Sized>(store: &S) -> Result<()> {
    if !store.is_connected() {
        return Err(AppError::not_connected());
    }

    store.ensure_schema().await?;
    tracing::debug!("Session schema ensured");

    Ok(())
}
