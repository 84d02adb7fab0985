use super::model::CdnConfig;
use crate::error::CdnCacheError;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// `tmp/js`, `./tmp/js` and `tmp/js/` name the same directory.
fn directory_key(directory: &Path) -> PathBuf {
    let key: PathBuf = directory
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect();
    if key.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        key
    }
}

/// Rejects configurations that would write two dependencies to the same file.
///
/// Filenames are grouped by download directory across all blocks. This runs
/// before any directory is created or any URL is fetched.
pub fn validate_config(config: &CdnConfig) -> Result<(), CdnCacheError> {
    let mut filenames_by_directory: BTreeMap<PathBuf, Vec<&str>> = BTreeMap::new();

    for block in &config.blocks {
        for dependency in &block.dependencies {
            if dependency.filename.is_empty() {
                return Err(CdnCacheError::InvalidDependency {
                    block: block.name.clone(),
                    url: dependency.url.clone(),
                    details: "Resolved filename is empty. Specify the dependency with both url and filename."
                        .to_string(),
                });
            }
        }

        filenames_by_directory
            .entry(directory_key(&block.download_directory))
            .or_default()
            .extend(block.dependencies.iter().map(|d| d.filename.as_str()));
    }

    for (directory, filenames) in filenames_by_directory {
        if let Some(filename) = filenames.into_iter().duplicates().next() {
            return Err(CdnCacheError::ConfigConflict {
                directory,
                filename: filename.to_string(),
            });
        }
    }

    Ok(())
}
