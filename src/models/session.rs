use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label stored when a client did not report a device name.
pub const DEFAULT_DEVICE_NAME: &str = "Unknown Device";

/// Default row TTL: 30 days, in seconds.
pub const DEFAULT_TTL_SECONDS: i32 = 2_592_000;

/// One per-device login session, one row per issued refresh token.
///
/// Rows are immutable once written: a token rotation inserts a new row and
/// never mutates an old one. There is no "revoked" flag; a row either exists
/// or has been deleted (explicitly, or by the store once its TTL elapses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The opaque refresh token. Primary key, globally unique.
    pub token: String,
    /// The ID of the user this session belongs to. Secondary-indexed.
    pub user_id: String,
    /// Identifier of the originating device/client instance.
    pub device_id: String,
    /// Human-readable device label.
    pub device_name: String,
    /// Server-assigned timestamp at insert time.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a session row.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSession {
    /// The owning user's ID. Required.
    pub user_id: String,
    /// The refresh token to store. Required.
    pub token: String,
    /// The originating device's ID. Required.
    pub device_id: String,
    /// Device label; defaults to [`DEFAULT_DEVICE_NAME`] when absent.
    pub device_name: Option<String>,
    /// Row TTL in seconds; defaults to [`DEFAULT_TTL_SECONDS`].
    pub ttl_seconds: Option<i32>,
}

impl NewSession {
    /// Creates an input with the required fields; optional fields unset.
    pub fn new(
        user_id: impl Into<String>,
        token: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
            device_id: device_id.into(),
            device_name: None,
            ttl_seconds: None,
        }
    }

    /// The device label to store, applying the default.
    pub fn device_label(&self) -> &str {
        self.device_name.as_deref().unwrap_or(DEFAULT_DEVICE_NAME)
    }

    /// The TTL to store, applying the default.
    pub fn ttl(&self) -> i32 {
        self.ttl_seconds.unwrap_or(DEFAULT_TTL_SECONDS)
    }
}
