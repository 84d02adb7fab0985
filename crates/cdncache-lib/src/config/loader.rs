use super::model::RawCdnConfig;
use crate::error::CdnCacheError;
use std::path::Path;

pub async fn load_cdn_config(config_path: &Path) -> Result<RawCdnConfig, CdnCacheError> {
    let content = tokio::fs::read_to_string(config_path).await.map_err(|e| {
        CdnCacheError::ConfigLoad {
            path: config_path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    serde_json::from_str(&content).map_err(|e| CdnCacheError::ConfigLoad {
        path: config_path.to_path_buf(),
        reason: format!("JSON parsing failed: {}", e),
    })
}
