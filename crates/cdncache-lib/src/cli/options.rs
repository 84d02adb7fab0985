use super::args::CliOverrides;
use super::params::{RunParams, TemplateTarget};
use crate::error::CdnCacheError;
use crate::lockfile::Lockfile;
use config::Config as ConfigBuilder;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "cdn.json";
pub const DEFAULT_SETTINGS_NAME: &str = "cdncache";
pub const ENV_PREFIX: &str = "CDNCACHE";

/// Options accepted by the programmatic entry point. Unset fields fall back
/// to their defaults in [`Options::resolve`].
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Options {
    pub config_file: Option<PathBuf>,
    pub lock_file: Option<PathBuf>,
    pub download_libs: Option<bool>,
    pub source_file: Option<PathBuf>,
    pub destination_file: Option<PathBuf>,
    pub fetch_timeout_secs: Option<u64>,
}

fn usage(details: impl Into<String>) -> CdnCacheError {
    CdnCacheError::Usage {
        details: details.into(),
    }
}

impl Options {
    /// Checks option combinations and applies defaults. Performs no I/O.
    pub fn resolve(self) -> Result<RunParams, CdnCacheError> {
        let template = match (self.source_file, self.destination_file) {
            (Some(source_path), Some(destination_path)) => Some(TemplateTarget {
                source_path,
                destination_path,
            }),
            (None, None) => None,
            _ => {
                return Err(usage(
                    "You must include both source_file and destination_file or neither",
                ));
            }
        };

        let download_libs = self.download_libs.unwrap_or(true);
        if !download_libs && template.is_none() {
            return Err(usage(
                "Nothing to do: download_libs is disabled and no source_file/destination_file given",
            ));
        }

        let fetch_timeout = match self.fetch_timeout_secs {
            Some(0) => return Err(usage("fetch_timeout_secs must be greater than 0")),
            secs => secs.map(Duration::from_secs),
        };

        Ok(RunParams {
            config_path: self
                .config_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
            lockfile_path: self
                .lock_file
                .unwrap_or_else(|| PathBuf::from(Lockfile::DEFAULT_FILE_NAME)),
            download_libs,
            template,
            fetch_timeout,
        })
    }
}

const OPTION_KEYS: [&str; 6] = [
    "config_file",
    "lock_file",
    "download_libs",
    "source_file",
    "destination_file",
    "fetch_timeout_secs",
];

/// `CDNCACHE_*` variables naming a known option. Other variables sharing the
/// prefix are ignored.
fn environment_source(vars: impl IntoIterator<Item = (String, String)>) -> config::Environment {
    let prefix = format!("{}_", ENV_PREFIX.to_lowercase());
    let known: config::Map<String, String> = vars
        .into_iter()
        .filter(|(key, _)| {
            key.to_lowercase()
                .strip_prefix(&prefix)
                .is_some_and(|option| OPTION_KEYS.contains(&option))
        })
        .collect();

    config::Environment::with_prefix(ENV_PREFIX)
        .try_parsing(true)
        .source(Some(known))
}

fn load_options_from(
    overrides: CliOverrides,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<Options, CdnCacheError> {
    let mut builder = ConfigBuilder::builder();

    builder = match &overrides.settings_path {
        Some(path) => builder.add_source(config::File::from(Path::new(path))),
        None => builder.add_source(config::File::with_name(DEFAULT_SETTINGS_NAME).required(false)),
    };

    let settings = builder
        .add_source(environment_source(vars))
        .set_override_option("config_file", overrides.config_path)?
        .set_override_option("lock_file", overrides.lockfile_path)?
        .set_override_option("download_libs", overrides.no_download.then_some(false))?
        .set_override_option("source_file", overrides.source_path)?
        .set_override_option("destination_file", overrides.destination_path)?
        .set_override_option("fetch_timeout_secs", overrides.fetch_timeout_secs)?
        .build()?;

    settings.try_deserialize().map_err(|e| usage(e.to_string()))
}

/// Layers the settings file, `CDNCACHE_*` environment variables and the
/// command line, in increasing order of precedence.
pub fn load_options(overrides: CliOverrides) -> Result<Options, CdnCacheError> {
    load_options_from(overrides, std::env::vars())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_file(contents: &str) -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, contents).unwrap();
        let path = path.to_str().unwrap().to_string();
        (dir, path)
    }

    #[test]
    fn test_resolve_defaults() {
        let params = Options::default().resolve().unwrap();

        assert_eq!(params.config_path, PathBuf::from("cdn.json"));
        assert_eq!(params.lockfile_path, PathBuf::from("cdn-lock.json"));
        assert!(params.download_libs);
        assert!(params.template.is_none());
        assert!(params.fetch_timeout.is_none());
    }

    #[test]
    fn test_resolve_rejects_half_template_pair() {
        let options = Options {
            source_file: Some("index.html".into()),
            ..Default::default()
        };

        assert!(matches!(
            options.resolve(),
            Err(CdnCacheError::Usage { .. })
        ));
    }

    #[test]
    fn test_resolve_rejects_no_work() {
        let options = Options {
            download_libs: Some(false),
            ..Default::default()
        };

        assert!(matches!(
            options.resolve(),
            Err(CdnCacheError::Usage { .. })
        ));
    }

    #[test]
    fn test_resolve_template_only() {
        let options = Options {
            download_libs: Some(false),
            source_file: Some("src/index.html".into()),
            destination_file: Some("dist/index.html".into()),
            fetch_timeout_secs: Some(30),
            ..Default::default()
        };

        let params = options.resolve().unwrap();

        assert!(!params.download_libs);
        assert_eq!(
            params.template,
            Some(TemplateTarget {
                source_path: "src/index.html".into(),
                destination_path: "dist/index.html".into(),
            })
        );
        assert_eq!(params.fetch_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_load_options_command_line_wins_over_settings_file() {
        let (_dir, path) = settings_file(
            "config_file = \"from-file.json\"\nlock_file = \"file-lock.json\"\ndownload_libs = true\n",
        );
        let overrides = CliOverrides {
            settings_path: Some(path),
            config_path: Some("from-cli.json".to_string()),
            no_download: true,
            source_path: Some("index.html".to_string()),
            destination_path: Some("out.html".to_string()),
            ..Default::default()
        };

        let options = load_options_from(overrides, std::iter::empty::<(String, String)>()).unwrap();

        assert_eq!(options.config_file, Some(PathBuf::from("from-cli.json")));
        assert_eq!(options.lock_file, Some(PathBuf::from("file-lock.json")));
        assert_eq!(options.download_libs, Some(false));
    }

    #[test]
    fn test_load_options_non_boolean_download_libs_is_usage_error() {
        let (_dir, path) = settings_file("download_libs = \"sometimes\"\n");
        let overrides = CliOverrides {
            settings_path: Some(path),
            ..Default::default()
        };

        assert!(matches!(
            load_options_from(overrides, std::iter::empty::<(String, String)>()),
            Err(CdnCacheError::Usage { .. })
        ));
    }

    #[test]
    fn test_load_options_unknown_setting_is_usage_error() {
        let (_dir, path) = settings_file("files_to_process = [\"index.html\"]\n");
        let overrides = CliOverrides {
            settings_path: Some(path),
            ..Default::default()
        };

        assert!(matches!(
            load_options_from(overrides, std::iter::empty::<(String, String)>()),
            Err(CdnCacheError::Usage { .. })
        ));
    }

    #[test]
    fn test_environment_sets_known_options_and_ignores_others() {
        let (_dir, path) = settings_file("download_libs = true\n");
        let overrides = CliOverrides {
            settings_path: Some(path),
            ..Default::default()
        };
        let vars = [
            ("CDNCACHE_DOWNLOAD_LIBS", "false"),
            ("CDNCACHE_LOCK_FILE", "env-lock.json"),
            ("CDNCACHE_HOME", "/opt/cdncache"),
            ("PATH", "/usr/bin"),
        ]
        .map(|(key, value)| (key.to_string(), value.to_string()));

        let options = load_options_from(overrides, vars).unwrap();

        assert_eq!(options.download_libs, Some(false));
        assert_eq!(options.lock_file, Some(PathBuf::from("env-lock.json")));
        assert_eq!(options.config_file, None);
    }
}
