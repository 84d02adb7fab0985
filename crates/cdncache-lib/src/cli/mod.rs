mod args;
mod options;
mod params;
mod run;

pub use args::{Args, CliOverrides, parse_args};
pub use options::{DEFAULT_CONFIG_FILE, Options, load_options};
pub use params::{RunParams, TemplateTarget};
pub use run::{RunSummary, run, run_with_options};
