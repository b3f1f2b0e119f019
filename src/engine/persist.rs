use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::model::tab::gate;
use crate::model::ui_state::UiState;

/// Bump whenever `UiState` changes shape. Older blobs are discarded, not migrated.
pub const STATE_VERSION: u32 = 3;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state storage i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("state storage rejected the write: {0}")]
    Rejected(String),
}

/// A single-key store holding the serialized shell state.
pub trait StateStore {
    fn read(&self) -> Result<Option<String>, StoreError>;
    fn write(&mut self, blob: &str) -> Result<(), StoreError>;
}

/* =========================
   File Store
   ========================= */

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<data dir>/eldritch-v2/ui_state.json`
    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("eldritch-v2");
        path.push("ui_state.json");
        path
    }
}

impl StateStore for FileStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, blob: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, blob)?;
        Ok(())
    }
}

/* =========================
   Memory Store
   ========================= */

#[derive(Default)]
pub struct MemoryStore {
    pub blob: Option<String>,
    pub writes: usize,
    /// Simulates a full or read-only store.
    pub fail_writes: bool,
}

impl StateStore for MemoryStore {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.blob.clone())
    }

    fn write(&mut self, blob: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Rejected("quota exceeded".into()));
        }
        self.writes += 1;
        self.blob = Some(blob.to_string());
        Ok(())
    }
}

/* =========================
   Load / Save
   ========================= */

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    state: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshReason {
    Missing,
    Unreadable,
    Malformed,
    VersionMismatch { found: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Fresh { state: UiState, reason: FreshReason },
    Restored(UiState),
}

impl LoadOutcome {
    pub fn into_state(self) -> UiState {
        match self {
            LoadOutcome::Fresh { state, .. } => state,
            LoadOutcome::Restored(state) => state,
        }
    }
}

pub fn load_state(store: &dyn StateStore) -> LoadOutcome {
    let fresh = |reason| LoadOutcome::Fresh {
        state: UiState::default(),
        reason,
    };

    let blob = match store.read() {
        Ok(Some(blob)) => blob,
        Ok(None) => return fresh(FreshReason::Missing),
        Err(e) => {
            log::warn!("Could not read saved state: {e}");
            return fresh(FreshReason::Unreadable);
        }
    };

    // Check the tag before the body so a stale schema is reported as such.
    let header: Envelope<serde_json::Value> = match serde_json::from_str(&blob) {
        Ok(h) => h,
        Err(_) => return fresh(FreshReason::Malformed),
    };
    if header.version != STATE_VERSION {
        return fresh(FreshReason::VersionMismatch {
            found: header.version,
        });
    }

    match serde_json::from_value::<UiState>(header.state) {
        Ok(mut state) => {
            state.active_tab = gate(state.active_tab, &state.life_jobs);
            LoadOutcome::Restored(state)
        }
        Err(_) => fresh(FreshReason::Malformed),
    }
}

/// Overwrite the stored blob. Failures are logged and otherwise ignored;
/// the session carries on with the in-memory state.
pub fn save_state(store: &mut dyn StateStore, state: &UiState) {
    let envelope = Envelope {
        version: STATE_VERSION,
        state,
    };

    match serde_json::to_string(&envelope) {
        Ok(json) => {
            if let Err(e) = store.write(&json) {
                log::warn!("Could not save state: {e}");
            }
        }
        Err(e) => log::warn!("Could not serialize state: {e}"),
    }
}
