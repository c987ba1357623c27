//! JSON snapshot files for the `scrape` command.
//!
//! Snapshots are grouped by date and named after the edition:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── morning.json
//!     ├── afternoon.json
//!     └── evening.json
//! ```
//! A later run in the same edition overwrites the earlier snapshot.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tokio::fs;
use tracing::{error, info, instrument};

use crate::error::Result;
use crate::models::{ApiResponse, ExtractionResult};
use crate::utils::edition_for;

/// Where the snapshot taken at `at` is stored under `json_output_dir`.
pub fn snapshot_path(json_output_dir: &str, at: DateTime<Local>) -> PathBuf {
    Path::new(json_output_dir)
        .join(at.date_naive().to_string())
        .join(format!("{}.json", edition_for(at.time())))
}

/// Write an [`ExtractionResult`] to a dated JSON snapshot.
///
/// The result is wrapped in the same success envelope `/api/news` returns,
/// so a snapshot can be replayed to API consumers unchanged.
///
/// # Arguments
///
/// * `result` - The extracted records (and diagnostics, if collected)
/// * `json_output_dir` - Base directory for JSON output
/// * `at` - When the snapshot was taken; picks the date and edition
///
/// # Returns
///
/// The path written, or an error if directory creation or file writing fails.
///
/// # Output Path
///
/// The file is written to: `{json_output_dir}/{date}/{edition}.json`
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_snapshot(
    result: &ExtractionResult,
    json_output_dir: &str,
    at: DateTime<Local>,
) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(&ApiResponse::Success(result.clone()))?;
    let path = snapshot_path(json_output_dir, at);

    if let Some(dir) = path.parent() {
        info!(dir = %dir.display(), "Ensuring JSON directory exists");
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), count = result.count, "Wrote JSON snapshot");
    Ok(path)
}
