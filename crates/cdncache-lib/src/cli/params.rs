use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateTarget {
    pub source_path: PathBuf,
    pub destination_path: PathBuf,
}

/// Validated inputs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunParams {
    pub config_path: PathBuf,
    pub lockfile_path: PathBuf,
    pub download_libs: bool,
    pub template: Option<TemplateTarget>,
    pub fetch_timeout: Option<Duration>,
}
