use scylla::SessionBuilder;

use crate::config::StoreConfig;
use crate::error::Result;
use crate::store::scylla::ScyllaStore;

/// Establishes a connection to the cluster and wraps it in a [`ScyllaStore`].
///
/// This is the composition root's job: every service function takes the
/// returned handle by reference and never connects on its own. The build is
/// bounded by [`StoreConfig::connect_timeout`], and a probe query confirms
/// the cluster answers before the handle is handed out.
///
/// # Arguments
///
/// * `config` - The store configuration.
///
/// # Returns
///
/// A `Result` containing the connected `ScyllaStore`.
pub async fn connect(config: StoreConfig) -> Result<ScyllaStore> {
    let session = SessionBuilder::new()
        .known_nodes(&config.nodes)
        .connection_timeout(config.connect_timeout)
        .build()
        .await?;

    session
        .query("SELECT release_version FROM system.local", ())
        .await?;

    tracing::info!(
        "✅ Connected to cluster via {} contact point(s)",
        config.nodes.len()
    );

    Ok(ScyllaStore::new(session, config))
}
