//! Refresh-token session store over a Cassandra-family wide-column backend.
//!
//! One row per issued refresh token, expired server-side via TTL. Lookups
//! run by token (partition key), by user (secondary index), or as a paginated
//! administrative search; removal comes in a best-effort tier for logout and
//! a verify-and-retry tier for security-sensitive revocation.

pub mod config;
pub mod db;
pub mod error;
pub mod statement_cache;

pub mod models {
    pub mod session;
}

pub mod store {
    pub mod scylla;

    mod traits;
    pub use traits::*;
}

pub mod services {
    pub mod audit;
    pub mod read;
    pub mod remove;
    pub mod schema;
    pub mod write;
}

pub mod validation {
    pub mod session;
}

pub use config::StoreConfig;
pub use error::{AppError, Result};
pub use models::session::{NewSession, Session};
pub use store::{PageCursor, RawPage, SessionStore};
