use std::ffi::OsString;
use std::path::{Path, PathBuf};

fn temporary_sibling(path: &Path) -> PathBuf {
    let mut file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| OsString::from("download"));
    file_name.push(".partial");
    path.with_file_name(file_name)
}

/// Writes `contents` next to `path` and renames it into place, so readers
/// never observe a truncated file at `path`.
pub async fn write_atomically(path: &Path, contents: impl AsRef<[u8]>) -> std::io::Result<()> {
    let temporary_path = temporary_sibling(path);
    tokio::fs::write(&temporary_path, contents.as_ref()).await?;
    if let Err(e) = tokio::fs::rename(&temporary_path, path).await {
        let _ = tokio::fs::remove_file(&temporary_path).await;
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_sibling_stays_in_same_directory() {
        assert_eq!(
            temporary_sibling(Path::new("tmp/js/jquery.min.js")),
            PathBuf::from("tmp/js/jquery.min.js.partial")
        );
    }

    #[tokio::test]
    async fn test_write_atomically_overwrites_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lib.js");
        std::fs::write(&path, "old").unwrap();

        write_atomically(&path, "new").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        assert!(!dir.path().join("lib.js.partial").exists());
    }

    #[tokio::test]
    async fn test_write_atomically_fails_when_directory_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("lib.js");

        assert!(write_atomically(&path, "data").await.is_err());
        assert!(!path.exists());
    }
}
