//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::info;

/// Ensure the local storage root exists before the backends touch it.
pub async fn ensure_env(data_root: &Path) -> anyhow::Result<()> {
    if tokio::fs::metadata(data_root).await.is_err() {
        info!(data_root = %data_root.display(), "creating local storage root");
    }
    tokio::fs::create_dir_all(data_root)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_root.display()))?;
    Ok(())
}
