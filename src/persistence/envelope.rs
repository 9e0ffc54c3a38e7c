//! Versioned JSON save envelope

use serde::{Deserialize, Serialize};

use super::PersistError;
use crate::sim::{Entity, EntityTag, GameState, Spawner};
use crate::tuning::Tuning;

/// Current envelope version
pub const ENVELOPE_VERSION: u32 = 1;

/// Complete world snapshot, including entity IDs and the spawner RNG stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEnvelope {
    pub version: u32,
    pub seed: u64,
    pub time: f32,
    /// Next free entity ID, so removed IDs are never reused after a reload
    pub next_id: u32,
    pub entities: Vec<Entity>,
    pub spawner: Spawner,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

impl SaveEnvelope {
    pub fn capture(state: &GameState) -> Self {
        Self {
            version: ENVELOPE_VERSION,
            seed: state.seed,
            time: state.now(),
            next_id: state.id_watermark(),
            entities: state.entities.clone(),
            spawner: state.spawner.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate. The version is checked before anything else.
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        let probe: VersionProbe = serde_json::from_str(json)?;
        if probe.version != ENVELOPE_VERSION {
            return Err(PersistError::UnsupportedVersion(probe.version));
        }

        let envelope: Self = serde_json::from_str(json)?;
        for entity in &envelope.entities {
            entity.validate()?;
        }
        envelope.spawner.tuning.validate()?;
        envelope.spawner.hostile.validate()?;
        if !envelope.entities.iter().any(|e| e.tag() == EntityTag::Player) {
            return Err(PersistError::MissingPlayer);
        }
        Ok(envelope)
    }

    /// Rebuild a world. Balance values come from `tuning`; the spawner keeps
    /// its saved settings and stream position.
    pub fn into_state(self, tuning: Tuning) -> Result<GameState, PersistError> {
        let mut state = GameState::empty(self.seed, tuning)?;
        state.spawner = self.spawner;
        state.restore(self.time, self.entities);
        state.reserve_ids(self.next_id);
        Ok(state)
    }
}
