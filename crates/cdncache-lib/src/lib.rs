pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod lockfile;
pub mod output;
pub mod utils;
pub mod verification;

pub use config::CdnConfig;
pub use error::CdnCacheError;
