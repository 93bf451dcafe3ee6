use serde::Serialize;
use std::collections::HashSet;

use crate::error::{AppError, Result};
use crate::store::SessionStore;
use crate::validation::session::validate_token_list;

/// Terminal state of one token in a verified revocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TokenOutcome {
    /// Confirmed absent after the batch delete.
    Removed,
    /// Survived the batch but the individual retry delete succeeded.
    RemovedAfterRetry,
    /// Could not be confirmed deleted; needs manual follow-up.
    Failed {
        /// Client-safe description of why.
        reason: String,
    },
}

/// A token the revocation could not confirm deleted.
#[derive(Debug, Clone, Serialize)]
pub struct FailedToken {
    pub token: String,
    pub reason: String,
}

/// Outcome of [`revoke_verified`]. Partial success is first-class: callers
/// are expected to act on `failed_tokens`, not treat the call as atomic.
#[derive(Debug, Clone, Serialize)]
pub struct RevocationReport {
    /// True only when `failed_tokens` is empty.
    pub success: bool,
    /// Tokens confirmed deleted, with or without a retry.
    pub successful_tokens: Vec<String>,
    /// Tokens that remain unconfirmed, each with its reason.
    pub failed_tokens: Vec<FailedToken>,
    /// Set when the operation as a whole failed before per-token outcomes
    /// could be established.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RevocationReport {
    fn from_outcomes(outcomes: Vec<(String, TokenOutcome)>, error: Option<String>) -> Self {
        let mut successful_tokens = Vec::new();
        let mut failed_tokens = Vec::new();

        for (token, outcome) in outcomes {
            match outcome {
                TokenOutcome::Removed | TokenOutcome::RemovedAfterRetry => {
                    successful_tokens.push(token)
                }
                TokenOutcome::Failed { reason } => failed_tokens.push(FailedToken { token, reason }),
            }
        }

        Self {
            success: failed_tokens.is_empty(),
            successful_tokens,
            failed_tokens,
            error,
        }
    }

    /// Every token reported failed with the same reason; used when a whole
    /// phase fails and no row's state can be trusted.
    fn unverified(tokens: &[String], reason: &str, error: String) -> Self {
        Self {
            success: false,
            successful_tokens: Vec::new(),
            failed_tokens: tokens
                .iter()
                .map(|token| FailedToken {
                    token: token.clone(),
                    reason: reason.to_string(),
                })
                .collect(),
            error: Some(error),
        }
    }
}

/// Revokes the given tokens with confirmed deletion, for security-sensitive
/// responses (e.g. compromised credentials) where best-effort is not enough.
///
/// Three strictly sequential phases:
///
/// 1. One non-atomic batched DELETE over all requested tokens. If the batch
///    request itself fails at the network level, the operation aborts and
///    every token is reported as an unverified failure.
/// 2. One `token IN` SELECT discovering which tokens still have a row —
///    the ones the batch did not durably remove.
/// 3. One individually executed DELETE per still-present token, issued
///    sequentially. A token failing here is a permanent failure; there is no
///    second retry. The single-pass bound is deliberate.
pub async fn revoke_verified<S: SessionStore + ?Sized>(
    store: &S,
    tokens: &[String],
) -> Result<RevocationReport> {
    validate_token_list(tokens)?;

    if !store.is_connected() {
        return Err(AppError::not_connected());
    }

    // Phase 1: fire-and-forget batch delete.
    if let Err(err) = store.delete_tokens(tokens).await {
        tracing::error!("❌ Revocation batch delete failed: {}", err);
        return Ok(RevocationReport::unverified(
            tokens,
            "delete not verified: batch request failed",
            err.public_message(),
        ));
    }

    // Phase 2: verify which rows the batch actually removed.
    let still_present: HashSet<String> = match store.select_existing(tokens).await {
        Ok(present) => present.into_iter().collect(),
        Err(err) => {
            // The batch may well have deleted rows, but without verification
            // no token can be confirmed. Re-running is safe: deletes are
            // idempotent.
            tracing::error!("❌ Revocation verification query failed: {}", err);
            return Ok(RevocationReport::unverified(
                tokens,
                "delete not verified: verification query failed",
                err.public_message(),
            ));
        }
    };

    // Phase 3: one sequential retry pass over the survivors.
    let mut outcomes = Vec::with_capacity(tokens.len());
    for token in tokens {
        if !still_present.contains(token) {
            outcomes.push((token.clone(), TokenOutcome::Removed));
            continue;
        }

        tracing::warn!("Token survived batch delete, retrying individually");
        match store.delete_token(token).await {
            Ok(()) => outcomes.push((token.clone(), TokenOutcome::RemovedAfterRetry)),
            Err(err) => {
                tracing::error!("❌ Retry delete failed: {}", err);
                outcomes.push((
                    token.clone(),
                    TokenOutcome::Failed {
                        reason: err.public_message(),
                    },
                ));
            }
        }
    }

    let report = RevocationReport::from_outcomes(outcomes, None);
    if report.success {
        tracing::info!(
            "✅ Revoked {} token(s) with verification",
            report.successful_tokens.len()
        );
    } else {
        tracing::warn!(
            "Revocation partially failed: {} ok, {} failed",
            report.successful_tokens.len(),
            report.failed_tokens.len()
        );
    }

    Ok(report)
}
