//! Best score persistence
//!
//! The simulation reads the stored best once at startup and writes it back
//! when a finished game beats it. Storage failures never stop the game;
//! the caller logs them and carries on with an unpersisted best score.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed key the best score is stored under
pub const BEST_SCORE_KEY: &str = "skyshield_best_score";

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Format(serde_json::Error),
    /// Backing storage is not available on this platform/session
    Unavailable,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "storage io error: {err}"),
            Self::Format(err) => write!(f, "malformed best score record: {err}"),
            Self::Unavailable => write!(f, "storage unavailable"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Format(err) => Some(err),
            Self::Unavailable => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Format(err)
    }
}

/// Get/set a single best score
pub trait BestScoreStore {
    fn load_best_score(&mut self) -> Result<u64, StoreError>;
    fn save_best_score(&mut self, score: u64) -> Result<(), StoreError>;
}

/// On-disk/LocalStorage record
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct BestScoreRecord {
    #[serde(rename = "skyshield_best_score")]
    best_score: u64,
}

/// In-process store; nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub best_score: u64,
    /// Number of successful saves
    pub saves: u32,
}

impl MemoryStore {
    pub fn new(best_score: u64) -> Self {
        Self {
            best_score,
            saves: 0,
        }
    }
}

impl BestScoreStore for MemoryStore {
    fn load_best_score(&mut self) -> Result<u64, StoreError> {
        Ok(self.best_score)
    }

    fn save_best_score(&mut self, score: u64) -> Result<(), StoreError> {
        self.best_score = score;
        self.saves += 1;
        Ok(())
    }
}

/// JSON file store (native)
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl BestScoreStore for JsonFileStore {
    fn load_best_score(&mut self) -> Result<u64, StoreError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No best score at {}, starting fresh", self.path.display());
                return Ok(0);
            }
            Err(err) => return Err(err.into()),
        };
        let record: BestScoreRecord = serde_json::from_str(&json)?;
        log::info!("Loaded best score {}", record.best_score);
        Ok(record.best_score)
    }

    fn save_best_score(&mut self, score: u64) -> Result<(), StoreError> {
        let json = serde_json::to_string(&BestScoreRecord { best_score: score })?;
        // Write to a sibling temp file first so a crash never truncates the record
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::info!("Best score {} saved to {}", score, self.path.display());
        Ok(())
    }
}

/// Browser LocalStorage store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl BestScoreStore for LocalStorageStore {
    fn load_best_score(&mut self) -> Result<u64, StoreError> {
        let storage = Self::storage()?;
        match storage.get_item(BEST_SCORE_KEY) {
            Ok(Some(json)) => {
                let record: BestScoreRecord = serde_json::from_str(&json)?;
                Ok(record.best_score)
            }
            Ok(None) => Ok(0),
            Err(_) => Err(StoreError::Unavailable),
        }
    }

    fn save_best_score(&mut self, score: u64) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let json = serde_json::to_string(&BestScoreRecord { best_score: score })?;
        storage
            .set_item(BEST_SCORE_KEY, &json)
            .map_err(|_| StoreError::Unavailable)?;
        log::info!("Best score {} saved", score);
        Ok(())
    }
}
