use super::model::{Block, CdnConfig, Dependency, RawCdnConfig, RawDependency};

/// Everything after the final `/` of the URL, or the whole URL if it has none.
pub fn filename_from_url(url: &str) -> &str {
    url.rsplit_once('/').map_or(url, |(_, filename)| filename)
}

impl From<RawDependency> for Dependency {
    fn from(raw: RawDependency) -> Self {
        match raw {
            RawDependency::Explicit { url, filename } => Self { url, filename },
            RawDependency::Url(url) => {
                let filename = filename_from_url(&url).to_string();
                Self { url, filename }
            }
        }
    }
}

pub fn normalize_dependencies(raw: Vec<RawDependency>) -> Vec<Dependency> {
    raw.into_iter().map(Dependency::from).collect()
}

pub fn normalize_config(raw: RawCdnConfig) -> CdnConfig {
    let blocks = raw
        .into_iter()
        .map(|(name, block)| Block {
            name,
            download_directory: block.download_directory,
            dependencies: normalize_dependencies(block.dependencies),
            replace_string: block.replace_string,
            replace_template: block.replace_template,
        })
        .collect();

    CdnConfig { blocks }
}
