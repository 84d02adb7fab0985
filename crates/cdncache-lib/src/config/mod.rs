mod loader;
mod model;
mod normalize;
mod validate;

pub use loader::load_cdn_config;
pub use model::{Block, CdnConfig, Dependency, RawBlock, RawCdnConfig, RawDependency};
pub use normalize::{filename_from_url, normalize_config, normalize_dependencies};
pub use validate::validate_config;
