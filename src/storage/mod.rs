//! # Storage Module - Persistence Gateway
//!
//! Two independent JSON documents under the configured data directory:
//!
//! ```text
//! data/
//! ├── users.json      ← user ledger (ID → account)
//! └── record.json     ← all-time best enhancement record
//! ```
//!
//! Both are loaded once at startup and rewritten wholesale, pretty-printed,
//! after every mutating operation. There is no migration, no locking, and
//! no read-back after write: the engine's in-memory state is authoritative
//! and the files are a write-through mirror. A missing or unparsable file
//! is a first run, not an error; a failed write is fatal.

use anyhow::{anyhow, Result};
use log::warn;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::game::economy::{BestRecord, Ledger};

const LEDGER_FILE: &str = "users.json";
const RECORD_FILE: &str = "record.json";

/// Handle on the data directory holding both documents.
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    /// Open the gateway, creating the data directory if needed.
    pub async fn new(data_dir: &str) -> Result<Self> {
        let data_dir = PathBuf::from(data_dir);
        fs::create_dir_all(&data_dir)
            .await
            .map_err(|e| anyhow!("failed to create data dir {}: {}", data_dir.display(), e))?;
        Ok(Self { data_dir })
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(LEDGER_FILE)
    }

    pub fn record_path(&self) -> PathBuf {
        self.data_dir.join(RECORD_FILE)
    }

    /// Load the user ledger, or an empty one on the first run.
    pub async fn load_ledger(&self) -> Ledger {
        load_or_default(&self.ledger_path()).await
    }

    /// Overwrite the ledger document.
    pub async fn save_ledger(&self, ledger: &Ledger) -> Result<()> {
        write_json(&self.ledger_path(), ledger).await
    }

    /// Load the best record, or the sentinel default on the first run.
    pub async fn load_record(&self) -> BestRecord {
        load_or_default(&self.record_path()).await
    }

    /// Overwrite the best-record document.
    pub async fn save_record(&self, record: &BestRecord) -> Result<()> {
        write_json(&self.record_path(), record).await
    }
}

async fn load_or_default<T>(path: &Path) -> T
where
    T: Default + serde::de::DeserializeOwned,
{
    match fs::read_to_string(path).await {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                warn!("unparsable {}: {} (starting from defaults)", path.display(), e);
                T::default()
            }
        },
        Err(_) => T::default(),
    }
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_string_pretty(value)
        .map_err(|e| anyhow!("failed to serialize {}: {}", path.display(), e))?;
    fs::write(path, data)
        .await
        .map_err(|e| anyhow!("failed to write {}: {}", path.display(), e))
}
