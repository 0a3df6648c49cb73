//! Asset download and persistence
//!
//! This module fetches the file behind a search record and stores it under
//! `<destination root>/<query>/<filename>`:
//! - Filenames come from `Content-Disposition`, falling back to the record name
//! - Filenames are sanitized before touching the filesystem
//! - An existing file is never fetched again or overwritten
//! - Bodies are streamed into a temporary file that is renamed on success

mod content_disposition;
mod sanitize;

pub use content_disposition::filename_from_content_disposition;
pub use sanitize::{sanitize_filename, RESERVED_CHARS};

use crate::config::DownloadConfig;
use crate::session::Session;
use crate::state::SearchRecord;
use crate::DownloadError;
use reqwest::header::CONTENT_DISPOSITION;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWriteExt, BufWriter};
use url::Url;

/// Result of a download that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The body was written to `path`
    Downloaded { path: PathBuf, bytes: u64 },

    /// A file already existed at `path`; the body was not read
    Skipped { path: PathBuf },
}

impl DownloadOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::Downloaded { path, .. } | Self::Skipped { path } => path,
        }
    }
}

/// Where a record's asset ends up on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub directory: PathBuf,
    pub filename: String,
    pub source_url: Url,
}

impl DownloadTarget {
    /// Builds a target, sanitizing `filename`
    ///
    /// A filename that sanitizes to nothing is replaced by the record id with
    /// the fallback extension.
    pub fn new(
        directory: PathBuf,
        filename: &str,
        record: &SearchRecord,
        fallback_extension: &str,
        source_url: Url,
    ) -> Self {
        let mut filename = sanitize_filename(filename);
        if filename.is_empty() {
            filename = sanitize_filename(&format!("{}.{}", record.id, fallback_extension));
        }

        Self {
            directory,
            filename,
            source_url,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

/// Directory name used when a query sanitizes to nothing
pub const UNNAMED_QUERY_DIR: &str = "unnamed-query";

/// Directory that holds the downloads of one query
///
/// Always a child of `destination_root`, even for queries such as `...`
/// that leave no usable characters.
pub fn query_directory(destination_root: &Path, query: &str) -> PathBuf {
    let name = sanitize_filename(query);
    if name.is_empty() {
        destination_root.join(UNNAMED_QUERY_DIR)
    } else {
        destination_root.join(name)
    }
}

/// Downloads the asset behind `record` into `destination_root/query`
///
/// # Steps
///
/// 1. Create the query directory (no error if it exists)
/// 2. GET `<record url>download/` through the session
/// 3. Pick the filename from `Content-Disposition` or `<name>.<fallback extension>`
/// 4. Return `Skipped` if that file already exists, without reading the body
/// 5. Otherwise stream the body to a temporary file and rename it into place
///
/// # Errors
///
/// * `DownloadError::HttpStatus` - non-2xx response
/// * `DownloadError::Network` - request or body stream failed
/// * `DownloadError::Io` - directory creation or file write failed
pub async fn download_asset(
    session: &Session,
    record: &SearchRecord,
    destination_root: &Path,
    query: &str,
    settings: &DownloadConfig,
) -> Result<DownloadOutcome, DownloadError> {
    let directory = query_directory(destination_root, query);
    tokio::fs::create_dir_all(&directory)
        .await
        .map_err(|source| DownloadError::Io {
            path: directory.display().to_string(),
            source,
        })?;

    let source_url = record.download_url()?;
    let mut response = session
        .client()
        .get(source_url.clone())
        .send()
        .await
        .map_err(|source| DownloadError::Network {
            url: source_url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::HttpStatus {
            url: source_url.to_string(),
            status: status.as_u16(),
        });
    }

    let filename = response
        .headers()
        .get(CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(filename_from_content_disposition)
        .unwrap_or_else(|| format!("{}.{}", record.name, settings.fallback_extension));

    let target = DownloadTarget::new(
        directory,
        &filename,
        record,
        &settings.fallback_extension,
        source_url,
    );
    let path = target.path();

    let shown = path.display().to_string();
    let io_error = |source: std::io::Error| DownloadError::Io {
        path: shown.clone(),
        source,
    };

    if tokio::fs::try_exists(&path).await.map_err(io_error)? {
        tracing::debug!("{} already present, not reading body", path.display());
        return Ok(DownloadOutcome::Skipped { path });
    }

    // Dropping the temp file on any early return removes it, so an
    // interrupted transfer never leaves a file under the final name.
    let part = tempfile::Builder::new()
        .prefix(".soundtrawl-")
        .suffix(".part")
        .tempfile_in(&target.directory)
        .map_err(io_error)?;

    let file = tokio::fs::File::from_std(part.reopen().map_err(io_error)?);
    let mut writer = BufWriter::with_capacity(settings.chunk_size, file);
    let mut bytes = 0u64;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|source| DownloadError::Network {
            url: target.source_url.to_string(),
            source,
        })?
    {
        if chunk.is_empty() {
            continue;
        }
        writer.write_all(&chunk).await.map_err(io_error)?;
        bytes += chunk.len() as u64;
    }
    writer.flush().await.map_err(io_error)?;
    drop(writer);

    match part.persist_noclobber(&path) {
        Ok(_) => Ok(DownloadOutcome::Downloaded { path, bytes }),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
            Ok(DownloadOutcome::Skipped { path })
        }
        Err(e) => Err(io_error(e.error)),
    }
}
