//! JSON output helper for saving query results.

use livevol_core::{LiveVolError, Result};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Serialize `value` as JSON into the file at `path`, creating or truncating it.
///
/// # Errors
/// Returns [`LiveVolError::Io`] if the value cannot be serialized or the file cannot be written.
pub async fn write_json_file<T>(path: impl AsRef<Path>, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let path = path.as_ref();
    let json = serde_json::to_vec(value)
        .map_err(|e| LiveVolError::Io(format!("failed to serialize {}: {e}", path.display())))?;

    tokio::fs::write(path, &json)
        .await
        .map_err(|e| LiveVolError::Io(format!("failed to write {}: {e}", path.display())))?;

    debug!(path = %path.display(), bytes = json.len(), "Wrote JSON file");
    Ok(())
}
