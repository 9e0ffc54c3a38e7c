//! Save/load persistence
//!
//! Two formats:
//! - Legacy: whitespace-separated text, one record per entity
//! - Envelope: versioned JSON that also carries the spawner RNG stream
//!
//! Writes go to a temporary file first, then replace the save. The previous
//! save is kept as a backup.

pub mod envelope;
pub mod legacy;

pub use envelope::{ENVELOPE_VERSION, SaveEnvelope};
pub use legacy::LegacySave;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::error::SimError;
use crate::sim::{GameState, Spawner};
use crate::tuning::{Tuning, TuningError};

/// Failure to read, parse or validate a save
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("save I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed save JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("save ended while reading `{field}`")]
    UnexpectedEof { field: &'static str },

    #[error("invalid value for `{field}`: {token:?}")]
    InvalidNumber { field: &'static str, token: String },

    #[error("unknown entity tag {0}")]
    UnknownTag(u32),

    #[error("save declares {declared} entities but holds {found}")]
    CountMismatch { declared: usize, found: usize },

    #[error("unexpected data after the last entity: {0:?}")]
    TrailingData(String),

    #[error("save holds no player")]
    MissingPlayer,

    #[error("unsupported save version {0} (expected {expected})", expected = ENVELOPE_VERSION)]
    UnsupportedVersion(u32),

    #[error("invalid entity: {0}")]
    Entity(#[from] SimError),

    #[error("invalid saved spawner: {0}")]
    Tuning(#[from] TuningError),
}

/// On-disk representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    Legacy,
    Envelope,
}

/// Serialize a world in the given format
pub fn encode(state: &GameState, format: SaveFormat) -> Result<String, PersistError> {
    match format {
        SaveFormat::Legacy => legacy::encode(state),
        SaveFormat::Envelope => SaveEnvelope::capture(state).to_json(),
    }
}

/// Rebuild a world from saved text.
///
/// `seed` only matters for the legacy format, which does not record the
/// spawner stream; the envelope restores its own.
pub fn decode(
    text: &str,
    format: SaveFormat,
    seed: u64,
    tuning: Tuning,
) -> Result<GameState, PersistError> {
    match format {
        SaveFormat::Legacy => {
            let save = legacy::decode(text)?;
            let mut state = GameState::empty(seed, tuning)?;
            state.spawner = Spawner::new(
                state.tuning.spawner.clone(),
                state.tuning.hostile.clone(),
                save.time,
                seed,
            );
            state.restore(save.time, save.entities);
            Ok(state)
        }
        SaveFormat::Envelope => SaveEnvelope::from_json(text)?.into_state(tuning),
    }
}

pub fn save_to_file(
    state: &GameState,
    path: impl AsRef<Path>,
    format: SaveFormat,
) -> Result<(), PersistError> {
    let path = path.as_ref();
    let text = encode(state, format)?;

    let tmp = sibling(path, "tmp");
    fs::write(&tmp, text)?;
    if path.exists() {
        fs::rename(path, sibling(path, "bak"))?;
    }
    fs::rename(&tmp, path)?;

    log::info!(
        "Saved {} entities at t={:.2} to {}",
        state.entities.len(),
        state.now(),
        path.display()
    );
    Ok(())
}

pub fn load_from_file(
    path: impl AsRef<Path>,
    format: SaveFormat,
    seed: u64,
    tuning: Tuning,
) -> Result<GameState, PersistError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    match decode(&text, format, seed, tuning) {
        Ok(state) => {
            log::info!(
                "Loaded {} entities at t={:.2} from {}",
                state.entities.len(),
                state.now(),
                path.display()
            );
            Ok(state)
        }
        Err(err) => {
            log::warn!("Rejected save {}: {err}", path.display());
            Err(err)
        }
    }
}

/// `save.txt` -> `save.txt.tmp`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
