use crate::download::FetchError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CdnCacheError {
    #[error("Invalid usage: {details}")]
    Usage { details: String },

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Failed to load CDN configuration from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error(
        "Detected multiple dependencies downloading {filename} into {directory}. \
         Disambiguate filenames by declaring one dependency with both url and filename."
    )]
    ConfigConflict { directory: PathBuf, filename: String },

    #[error("Invalid dependency {url} in block {block}: {details}")]
    InvalidDependency {
        block: String,
        url: String,
        details: String,
    },

    #[error("Invalid template in block {block}: {details}")]
    InvalidTemplate { block: String, details: String },

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("Failed to hash local file {path}: {reason}")]
    LocalHashRead { path: PathBuf, reason: String },

    #[error("Failed to write dependency {url} to {path}: {reason}")]
    DependencyWrite {
        url: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Failed to load lockfile from {path}: {reason}")]
    LockfileLoad { path: PathBuf, reason: String },

    #[error("Failed to save lockfile to {path}: {reason}")]
    LockfileSave { path: PathBuf, reason: String },

    #[error("Download directory creation failed at {path}: {reason}")]
    DownloadDirectoryCreation { path: PathBuf, reason: String },

    #[error("Template I/O failed for {path}: {reason}")]
    TemplateIo { path: PathBuf, reason: String },

    #[error("{count} dependencies failed to download: {details}")]
    DownloadsFailed { count: usize, details: String },

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] eyre::Report),
}
