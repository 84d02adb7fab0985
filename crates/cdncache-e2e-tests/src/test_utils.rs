use cdncache_lib::cli::Options;
use eyre::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const JQUERY_PATH: &str = "/ajax/libs/jquery/3.7.1/jquery.min.js";
pub const JQUERY_BODY: &[u8] = b"/*! jQuery v3.7.1 */ (function(){})();";
pub const BOOTSTRAP_PATH: &str = "/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";
pub const BOOTSTRAP_BODY: &[u8] = b".btn{display:inline-block}";

pub async fn start_cdn() -> MockServer {
    let server = MockServer::start().await;
    mount_asset(&server, JQUERY_PATH, JQUERY_BODY).await;
    mount_asset(&server, BOOTSTRAP_PATH, BOOTSTRAP_BODY).await;
    server
}

pub async fn mount_asset(server: &MockServer, asset_path: &str, body: &[u8]) {
    Mock::given(method("GET"))
        .and(path(asset_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}

/// Writes a `cdn.json` with a `js` and a `css` block pointing at `server`.
pub fn write_cdn_config(root: &Path, server: &MockServer) -> Result<PathBuf> {
    let config = serde_json::json!({
        "js": {
            "downloadDirectory": root.join("tmp/js"),
            "dependencies": [format!("{}{}", server.uri(), JQUERY_PATH)],
            "replaceString": "<!--CDN_JS-->",
            "replaceTemplate": "<script src=\"@\"></script>"
        },
        "css": {
            "downloadDirectory": root.join("tmp/css"),
            "dependencies": [{
                "url": format!("{}{}", server.uri(), BOOTSTRAP_PATH),
                "filename": "bootstrap.css"
            }],
            "replaceString": "<!--CDN_CSS-->",
            "replaceTemplate": "<link rel=\"stylesheet\" href=\"@\">"
        }
    });
    let config_path = root.join("cdn.json");
    std::fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    Ok(config_path)
}

pub fn setup_test_environment(server: &MockServer) -> Result<(TempDir, Options)> {
    let temp_dir = tempfile::tempdir()?;
    let config_path = write_cdn_config(temp_dir.path(), server)?;

    let options = Options {
        config_file: Some(config_path),
        lock_file: Some(temp_dir.path().join("cdn-lock.json")),
        fetch_timeout_secs: Some(10),
        ..Default::default()
    };

    Ok((temp_dir, options))
}

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter("cdncache_lib=debug,cdncache_e2e_tests=debug")
        .with_test_writer()
        .try_init()
        .ok();
}
