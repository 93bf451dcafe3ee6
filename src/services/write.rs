use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::session::{NewSession, Session};
use crate::services::schema;
use crate::store::SessionStore;
use crate::validation::session::{validate_required, validate_ttl};

/// Creates a new session row for an issued refresh token.
///
/// Validation runs first; a missing required field fails without any I/O.
/// The write is always an insert, never an upsert — a new token is a new
/// session, not a correction of an existing one. The row becomes visible to
/// point lookups immediately; the `user_id` index catches up eventually.
///
/// The store assigns the row's authoritative `created_at`. The returned
/// session carries the client clock's reading of the same instant, so it can
/// differ from a later [`crate::services::read::get_by_token`] by clock skew
/// plus request latency; callers needing the stored value read the row back.
///
/// # Arguments
///
/// * `store` - The connected store handle.
/// * `input` - The session fields; see [`NewSession`] for defaults.
///
/// # Returns
///
/// A `Result` containing the stored `Session`.
pub async fn create_session<S: SessionStore + ?Sized>(
    store: &S,
    input: NewSession,
) -> Result<Session> {
    validate_required("userId", &input.user_id)?;
    validate_required("token", &input.token)?;
    validate_required("deviceId", &input.device_id)?;
    let ttl_seconds = input.ttl();
    validate_ttl(ttl_seconds)?;

    if !store.is_connected() {
        return Err(AppError::not_connected());
    }

    schema::ensure_schema(store).await?;

    let device_name = input.device_label().to_string();
    store
        .insert_session(
            &input.token,
            &input.user_id,
            &input.device_id,
            &device_name,
            ttl_seconds,
        )
        .await?;

    tracing::info!(
        "✅ Session stored for user {} (device: {}, ttl: {}s)",
        input.user_id,
        device_name,
        ttl_seconds
    );

    Ok(Session {
        token: input.token,
        user_id: input.user_id,
        device_id: input.device_id,
        device_name,
        // Client-clock mirror of the server-assigned timestamp; see the
        // doc comment above.
        created_at: Utc::now(),
    })
}
