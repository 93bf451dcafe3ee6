use crate::error::{AppError, Result};
use crate::services::read;
use crate::store::SessionStore;
use crate::validation::session::{validate_required, validate_token_list};

/// What a removal request targets. The two modes are mutually exclusive by
/// construction.
#[derive(Debug, Clone)]
pub enum RemovalTarget {
    /// Fast path: direct primary-key deletes of the listed tokens.
    Tokens(Vec<String>),
    /// Resolution path: enumerate the user's current tokens through the
    /// secondary index, then delete those.
    User(String),
}

/// Best-effort bulk removal, appropriate for user-initiated logout.
///
/// Token-list requests go straight to one batched delete. User requests
/// first resolve the token set via the index (secondary indexes support
/// filtered reads, not range deletes) and then use the same batch primitive.
/// No post-delete verification is performed; a session inserted for the same
/// user between the resolving SELECT and the DELETE batch survives. This is
/// "log out sessions active as of now", not a real-time guarantee. For
/// confirmed deletion see [`crate::services::audit::revoke_verified`].
///
/// # Returns
///
/// A `Result` containing the count of tokens targeted.
pub async fn remove_sessions<S: SessionStore + ?Sized>(
    store: &S,
    target: RemovalTarget,
) -> Result<usize> {
    match &target {
        RemovalTarget::Tokens(tokens) => validate_token_list(tokens)?,
        RemovalTarget::User(user_id) => validate_required("userId", user_id)?,
    }

    if !store.is_connected() {
        return Err(AppError::not_connected());
    }

    let tokens = match target {
        RemovalTarget::Tokens(tokens) => tokens,
        RemovalTarget::User(user_id) => {
            let resolved: Vec<String> = read::get_all_by_user(store, &user_id)
                .await?
                .into_iter()
                .map(|session| session.token)
                .collect();

            if resolved.is_empty() {
                tracing::debug!("No sessions to remove for user {}", user_id);
                return Ok(0);
            }
            resolved
        }
    };

    store.delete_tokens(&tokens).await?;
    tracing::info!("✅ Removed {} session(s)", tokens.len());

    Ok(tokens.len())
}
