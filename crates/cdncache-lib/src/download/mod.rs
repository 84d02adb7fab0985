mod fetch;
mod reconcile;
mod types;

#[cfg(test)]
pub(crate) use fetch::testing;
pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use reconcile::{reconcile_dependencies, sync_dependencies};
pub use types::{DependencyOutcome, ReconcileSummary};
