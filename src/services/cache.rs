//! Flat JSON cache of WorldCat responses
//!
//! One `{oclcNumber}.json` file per record, holding the response as received.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tokio::fs;

use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct JsonCache {
    dir: PathBuf,
    keys: HashSet<u64>,
}

impl JsonCache {
    /// Open the cache directory, creating it if needed, and index its keys
    pub async fn open(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;

        let mut keys = HashSet::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u64>().ok())
            {
                keys.insert(key);
            }
        }

        tracing::debug!("Cache {} holds {} records", dir.display(), keys.len());
        Ok(Self { dir, keys })
    }

    pub fn contains(&self, oclc_number: u64) -> bool {
        self.keys.contains(&oclc_number)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn path(&self, oclc_number: u64) -> PathBuf {
        self.dir.join(format!("{}.json", oclc_number))
    }

    /// Load the raw record stored for `oclc_number`
    pub async fn load(&self, oclc_number: u64) -> AppResult<serde_json::Value> {
        let bytes = fs::read(self.path(oclc_number)).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write the raw record through to disk
    pub async fn store(&mut self, oclc_number: u64, record: &serde_json::Value) -> AppResult<()> {
        write_json(&self.path(oclc_number), record).await?;
        self.keys.insert(oclc_number);
        Ok(())
    }
}

/// Serialize with four-space indentation
pub fn to_pretty_json<T: Serialize>(value: &T) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Write a value as four-space indented JSON
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    fs::write(path, to_pretty_json(value)?).await?;
    Ok(())
}
