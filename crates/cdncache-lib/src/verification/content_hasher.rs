use digest::Digest;
use md5::Md5;
use std::path::Path;
use tokio::io::AsyncReadExt;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Fast change-detection digest over raw bytes. Not a security boundary.
#[derive(Default)]
pub struct ContentHasher {
    hasher: Md5,
}

impl ContentHasher {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        Digest::update(&mut self.hasher, data.as_ref());
    }

    pub fn finalize_hex(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}

pub fn hash_bytes(data: impl AsRef<[u8]>) -> String {
    let mut hasher = ContentHasher::new();
    hasher.update(data);
    hasher.finalize_hex()
}

/// State of a dependency's file on disk.
#[derive(Debug)]
pub enum LocalFileStat {
    Present(String),
    Absent,
    ReadFailed(std::io::Error),
}

/// Hashes the file at `path` in chunks. Only a missing file maps to `Absent`.
pub async fn stat_local_file(path: &Path) -> LocalFileStat {
    let file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LocalFileStat::Absent,
        Err(e) => return LocalFileStat::ReadFailed(e),
    };
    let mut reader = tokio::io::BufReader::new(file);
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    let mut hasher = ContentHasher::new();

    loop {
        let bytes_read = match reader.read(&mut buffer).await {
            Ok(bytes_read) => bytes_read,
            Err(e) => return LocalFileStat::ReadFailed(e),
        };
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    LocalFileStat::Present(hasher.finalize_hex())
}
