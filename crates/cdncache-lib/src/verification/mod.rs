pub mod content_hasher;

pub use content_hasher::{ContentHasher, LocalFileStat, hash_bytes, stat_local_file};
