use super::options::Options;
use super::params::RunParams;
use crate::config::{load_cdn_config, normalize_config, validate_config};
use crate::download::{Fetcher, HttpFetcher, ReconcileSummary, sync_dependencies};
use crate::error::CdnCacheError;
use crate::output::rewrite_template_file;
use eyre::eyre;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// `None` when downloading was disabled.
    pub dependencies: Option<ReconcileSummary>,
    pub template_rendered: bool,
}

/// Loads, normalizes and validates the CDN configuration, then downloads
/// dependencies and rewrites the template concurrently.
pub async fn run(params: &RunParams, fetcher: &dyn Fetcher) -> Result<RunSummary, CdnCacheError> {
    tracing::info!(
        "Loading CDN configuration from {}",
        params.config_path.display()
    );
    let config = normalize_config(load_cdn_config(&params.config_path).await?);
    validate_config(&config)?;

    let download = async {
        if !params.download_libs {
            return Ok(None);
        }
        tracing::info!(
            "Synchronizing {} dependencies...",
            config.dependencies().count()
        );
        sync_dependencies(&config, &params.lockfile_path, fetcher)
            .await
            .map(Some)
    };

    let render = async {
        match &params.template {
            Some(target) => {
                rewrite_template_file(&config, &target.source_path, &target.destination_path)
                    .await
                    .map(|()| true)
            }
            None => Ok(false),
        }
    };

    let (dependencies, template_rendered) = tokio::try_join!(download, render)?;

    if let Some(summary) = &dependencies {
        tracing::info!(
            "Dependencies synchronized: {} downloaded, {} up to date",
            summary.fetched,
            summary.up_to_date
        );
    }

    Ok(RunSummary {
        dependencies,
        template_rendered,
    })
}

/// Programmatic entry point: validates `options` and runs with an HTTP fetcher.
pub async fn run_with_options(options: Options) -> Result<RunSummary, CdnCacheError> {
    let params = options.resolve()?;
    let fetcher = HttpFetcher::new(params.fetch_timeout)
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

    run(&params, &fetcher).await
}
