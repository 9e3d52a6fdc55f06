//! # Snapshot writer
//!
//! Owns the snapshot directory, `<output>/<timestamp>_<host>/`, and the files
//! written into it.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use tracing::debug;

use crate::core::{SnapshotError, SnapshotReport};
use crate::utils::filename::sanitize_file_name;
use crate::utils::url::{host_with_port, Url};

/// `strftime` pattern of the timestamp prefix, second resolution
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const REPORT_FILE_NAME: &str = "report.json";

/// Name of the directory holding a snapshot of `base_url` taken at `timestamp`.
pub fn snapshot_dir_name<Tz: TimeZone>(timestamp: &DateTime<Tz>, base_url: &Url) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}_{}",
        timestamp.format(TIMESTAMP_FORMAT),
        sanitize_file_name(&host_with_port(base_url))
    )
}

pub struct SnapshotWriter {
    directory: PathBuf,
}

impl SnapshotWriter {
    /// Creates `directory` and its parents if they are missing.
    pub fn create(directory: &Path) -> Result<SnapshotWriter, SnapshotError> {
        fs::create_dir_all(directory).map_err(|source| SnapshotError::Io {
            path: directory.to_path_buf(),
            source,
        })?;

        Ok(SnapshotWriter {
            directory: directory.to_path_buf(),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Writes `html` as `file_name`, replacing any existing file of that name.
    pub fn write(&self, file_name: &str, html: &str) -> Result<PathBuf, SnapshotError> {
        let path = self.directory.join(file_name);

        fs::write(&path, html.as_bytes()).map_err(|source| SnapshotError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = html.len(), "wrote file");

        Ok(path)
    }

    pub fn write_report(&self, report: &SnapshotReport) -> Result<PathBuf, SnapshotError> {
        let json = serde_json::to_string_pretty(report)?;
        self.write(REPORT_FILE_NAME, &json)
    }
}

/// Writes one file into `snapshot_dir`, creating the directory when needed.
pub fn write(snapshot_dir: &Path, file_name: &str, html: &str) -> Result<PathBuf, SnapshotError> {
    SnapshotWriter::create(snapshot_dir)?.write(file_name, html)
}
