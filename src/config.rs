use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Default keyspace holding the session table.
pub const DEFAULT_KEYSPACE: &str = "auth_keyspace";
/// Default session table name.
pub const DEFAULT_TABLE: &str = "refresh_tokens";

/// The session store's configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Contact points of the cluster, `host:port`.
    pub nodes: Vec<String>,
    /// Keyspace holding the session table.
    pub keyspace: String,
    /// Name of the session table.
    pub table: String,
    /// Replication factor used when the keyspace is first created.
    pub replication_factor: u32,
    /// Upper bound on establishing a connection to a node.
    pub connect_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            nodes: vec!["127.0.0.1:9042".to_string()],
            keyspace: DEFAULT_KEYSPACE.to_string(),
            table: DEFAULT_TABLE.to_string(),
            replication_factor: 1,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl StoreConfig {
    /// Creates a new `StoreConfig` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `StoreConfig`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let nodes = env::var("SCYLLA_NODES")
            .unwrap_or_else(|_| "127.0.0.1:9042".to_string())
            .split(',')
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>();

        if nodes.is_empty() {
            anyhow::bail!("SCYLLA_NODES must contain at least one contact point");
        }

        Ok(Self {
            nodes,
            keyspace: env::var("SESSION_KEYSPACE")
                .unwrap_or_else(|_| DEFAULT_KEYSPACE.to_string()),
            table: env::var("SESSION_TABLE").unwrap_or_else(|_| DEFAULT_TABLE.to_string()),
            replication_factor: env::var("SESSION_REPLICATION_FACTOR")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .context("Invalid SESSION_REPLICATION_FACTOR")?,
            connect_timeout: Duration::from_secs(
                env::var("SCYLLA_CONNECT_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .context("Invalid SCYLLA_CONNECT_TIMEOUT_SECS")?,
            ),
        })
    }

    /// Fully qualified `keyspace.table` name used in every statement.
    pub fn qualified_table(&self) -> String {
        format!("{}.{}", self.keyspace, self.table)
    }
}
