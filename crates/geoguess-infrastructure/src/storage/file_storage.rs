//! File-backed key-value storage.
//!
//! Each key is stored as its own file. Writes go to a temporary file in the
//! same directory, are synced, and then atomically renamed over the target so
//! a process killed mid-write never leaves a half-written record behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use geoguess_core::error::Result;
use geoguess_core::storage::KeyValueStorage;
use tokio::io::AsyncWriteExt;

/// Durable storage rooted at one directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStorage {
    root: PathBuf,
}

impl FileKeyValueStorage {
    /// Creates a storage handle. The directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", encode_key(key)))
    }

    fn temp_path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!(".{}.{}.tmp", encode_key(key), uuid::Uuid::new_v4()))
    }
}

/// Maps a key onto a safe file stem.
fn encode_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl KeyValueStorage for FileKeyValueStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;

        let tmp_path = self.temp_path_for(key);
        let mut tmp_file = tokio::fs::File::create(&tmp_path).await?;
        tmp_file.write_all(value.as_bytes()).await?;
        tmp_file.sync_all().await?;
        drop(tmp_file);

        if let Err(e) = tokio::fs::rename(&tmp_path, self.path_for(key)).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
