use crate::config::CdnConfig;
use crate::error::CdnCacheError;
use crate::utils::write_atomically;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockEntry {
    /// URL the content was fetched from
    pub url: String,
    /// Filename inside the block's download directory
    pub filename: String,
    /// Hex digest of the bytes last written to disk
    pub hash: String,
}

impl LockEntry {
    pub fn matches(&self, url: &str, filename: &str) -> bool {
        self.url == url && self.filename == filename
    }
}

/// Ledger of previously fetched dependencies, persisted between runs as a
/// JSON array keyed by `(url, filename)`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Lockfile {
    pub entries: Vec<LockEntry>,
}

impl Lockfile {
    pub const DEFAULT_FILE_NAME: &'static str = "cdn-lock.json";

    pub fn new(entries: Vec<LockEntry>) -> Self {
        Self { entries }
    }

    pub fn find(&self, url: &str, filename: &str) -> Option<&LockEntry> {
        self.entries.iter().find(|entry| entry.matches(url, filename))
    }

    /// Drops every entry whose `(url, filename)` no longer appears in `config`.
    pub fn reconcile(mut self, config: &CdnConfig) -> Self {
        let before = self.entries.len();
        self.entries
            .retain(|entry| config.contains(&entry.url, &entry.filename));
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!("Removed {} stale lockfile entries", removed);
        }
        self
    }

    /// Replaces the entry with the same `(url, filename)`, or appends it.
    pub fn upsert(&mut self, entry: LockEntry) {
        self.entries
            .retain(|existing| !existing.matches(&entry.url, &entry.filename));
        self.entries.push(entry);
    }

    /// Orders entries by URL, case-insensitively.
    pub fn sort(&mut self) {
        self.entries.sort_by_cached_key(|entry| {
            (entry.url.to_uppercase(), entry.filename.clone())
        });
    }

    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;
        Ok(buffer)
    }

    /// Sorts the ledger and overwrites `path` with its full contents.
    pub async fn save_to_file(&mut self, path: &Path) -> Result<(), CdnCacheError> {
        self.sort();
        let json = self.to_json().map_err(|e| CdnCacheError::LockfileSave {
            path: path.to_path_buf(),
            reason: format!("JSON serialization failed: {}", e),
        })?;
        write_atomically(path, json)
            .await
            .map_err(|e| CdnCacheError::LockfileSave {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(())
    }

    /// Loads the ledger from `path`. A missing file is an empty ledger.
    pub async fn load_from_file(path: &Path) -> Result<Self, CdnCacheError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No lockfile at {}, starting empty", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(CdnCacheError::LockfileLoad {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
        };

        serde_json::from_str(&content).map_err(|e| CdnCacheError::LockfileLoad {
            path: path.to_path_buf(),
            reason: format!("JSON parsing failed: {}", e),
        })
    }
}
