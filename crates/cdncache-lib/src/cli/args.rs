use clap::{ArgAction, Parser};
use tracing::Level;

/// Values given on the command line. `None` leaves the setting to the
/// settings file, the environment or the built-in default.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub settings_path: Option<String>,
    pub config_path: Option<String>,
    pub lockfile_path: Option<String>,
    pub no_download: bool,
    pub source_path: Option<String>,
    pub destination_path: Option<String>,
    pub fetch_timeout_secs: Option<u64>,
}

pub struct Args {
    pub overrides: CliOverrides,
    pub log_level: Level,
}

#[derive(Debug, Parser)]
#[command(
    name = "cdncache",
    version,
    author = "Nick Guletskii",
    about = "Download third-party CDN assets declared in cdn.json, cache them locally and reference them from HTML templates"
)]
struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Sets the level of verbosity",
        action = ArgAction::Count
    )]
    verbose: u8,

    #[arg(
        long = "settings",
        value_name = "FILE",
        help = "Reads tool settings from this file instead of ./cdncache.{toml,json,yaml}"
    )]
    settings: Option<String>,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Sets the CDN configuration file [default: cdn.json]"
    )]
    config: Option<String>,

    #[arg(
        short = 'l',
        long = "lockfile",
        value_name = "FILE",
        help = "Sets the lockfile path [default: cdn-lock.json]"
    )]
    lockfile: Option<String>,

    #[arg(
        long = "no-download",
        help = "Skips downloading dependencies",
        action = ArgAction::SetTrue
    )]
    no_download: bool,

    #[arg(
        short = 's',
        long = "source",
        value_name = "FILE",
        help = "Template document containing placeholder tokens",
        requires = "destination"
    )]
    source: Option<String>,

    #[arg(
        short = 'd',
        long = "destination",
        value_name = "FILE",
        help = "Where the rewritten template is written",
        requires = "source"
    )]
    destination: Option<String>,

    #[arg(
        long = "timeout",
        value_name = "SECS",
        help = "Per-request timeout for dependency downloads"
    )]
    timeout: Option<u64>,
}

pub fn parse_args() -> Args {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy()
                .add_directive("hyper_util=warn".parse().unwrap())
                .add_directive("reqwest=warn".parse().unwrap()),
        )
        .init();

    let overrides = CliOverrides {
        settings_path: cli.settings,
        config_path: cli.config,
        lockfile_path: cli.lockfile,
        no_download: cli.no_download,
        source_path: cli.source,
        destination_path: cli.destination,
        fetch_timeout_secs: cli.timeout,
    };

    Args {
        overrides,
        log_level,
    }
}
