use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A dependency entry as written in the configuration document.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, untagged)]
pub enum RawDependency {
    Url(String),
    Explicit { url: String, filename: String },
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RawBlock {
    pub download_directory: PathBuf,
    pub dependencies: Vec<RawDependency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_template: Option<String>,
}

/// The configuration document as parsed, keyed by block name.
pub type RawCdnConfig = BTreeMap<String, RawBlock>;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Dependency {
    pub url: String,
    pub filename: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Block {
    pub name: String,
    pub download_directory: PathBuf,
    pub dependencies: Vec<Dependency>,
    pub replace_string: Option<String>,
    pub replace_template: Option<String>,
}

impl Block {
    /// Local path a dependency of this block is written to.
    pub fn dependency_path(&self, dependency: &Dependency) -> PathBuf {
        self.download_directory.join(&dependency.filename)
    }
}

/// Normalized configuration. Blocks are ordered by name.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CdnConfig {
    pub blocks: Vec<Block>,
}

impl CdnConfig {
    pub fn dependencies(&self) -> impl Iterator<Item = &Dependency> {
        self.blocks.iter().flat_map(|block| block.dependencies.iter())
    }

    pub fn contains(&self, url: &str, filename: &str) -> bool {
        self.dependencies()
            .any(|dependency| dependency.url == url && dependency.filename == filename)
    }
}
