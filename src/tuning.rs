//! Data-driven game balance
//!
//! Every value has a default matching the shipped game. A tuning file only
//! needs to list what it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Failure to load or validate a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed tuning JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Closed interval sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRange {
    pub min: f32,
    pub max: f32,
}

impl SampleRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self, field: &'static str) -> Result<(), TuningError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
            return Err(TuningError::Invalid {
                field,
                reason: format!("expected finite min <= max, got [{}, {}]", self.min, self.max),
            });
        }
        Ok(())
    }
}

/// Player defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Eye height above the ground at spawn
    pub spawn_height: f32,
    pub radius: f32,
    pub hp: f32,
    pub speed: f32,
    /// Radians of turn per unit of cursor delta
    pub mouse_speed: f32,
    /// Seconds between shots, per trigger
    pub cooldown: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            spawn_height: 2.0,
            radius: 1.0,
            hp: 10.0,
            speed: 5.0,
            mouse_speed: 0.005,
            cooldown: 1.0,
            fov: 45.0,
        }
    }
}

/// Hostile defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostileTuning {
    pub radius: f32,
    /// Seconds between shots
    pub cooldown: f32,
}

impl Default for HostileTuning {
    fn default() -> Self {
        Self {
            radius: 1.0,
            cooldown: 5.0,
        }
    }
}

impl HostileTuning {
    pub fn validate(&self) -> Result<(), TuningError> {
        for (field, value) in [("hostile.radius", self.radius), ("hostile.cooldown", self.cooldown)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: format!("expected a finite non-negative value, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Parameters of one projectile type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotPreset {
    pub radius: f32,
    pub damage: f32,
    pub speed: f32,
    /// Seconds of flight before self-detonation
    pub lifetime: f32,
    /// Growth rate of the blast visual
    pub explosion_speed: f32,
    /// Seconds the blast lingers before removal
    pub explosion_duration: f32,
    /// Gap between the shooter's hull and the spawn point
    pub offset: f32,
}

impl Default for ShotPreset {
    fn default() -> Self {
        Self {
            radius: 0.1,
            damage: 1.0,
            speed: 10.0,
            lifetime: 10.0,
            explosion_speed: 10.0,
            explosion_duration: 1.0,
            offset: LIGHT_SHOT_OFFSET,
        }
    }
}

/// Projectile presets per weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotTuning {
    pub primary: ShotPreset,
    pub secondary: ShotPreset,
    pub hostile: ShotPreset,
}

impl Default for ShotTuning {
    fn default() -> Self {
        Self {
            primary: ShotPreset::default(),
            secondary: ShotPreset {
                radius: 1.0,
                damage: 2.0,
                speed: 1.0,
                lifetime: 20.0,
                offset: HEAVY_SHOT_OFFSET,
                ..ShotPreset::default()
            },
            hostile: ShotPreset {
                damage: 2.0,
                ..ShotPreset::default()
            },
        }
    }
}

/// Procedural spawner parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerTuning {
    /// Seconds between spawn attempts
    pub cooldown: f32,
    /// Placement attempts per spawn
    pub retries: u32,
    /// Probability that a spawn is a Hostile rather than a Passive target
    pub hostile_chance: f64,
    /// Distance from the reference point
    pub distance: SampleRange,
    pub hp: SampleRange,
    pub speed: SampleRange,
    pub radius: f32,
}

impl Default for SpawnerTuning {
    fn default() -> Self {
        Self {
            cooldown: 10.0,
            retries: 10,
            hostile_chance: 0.01,
            distance: SampleRange::new(30.0, 50.0),
            hp: SampleRange::new(1.0, 5.0),
            speed: SampleRange::new(1.0, 2.0),
            radius: 1.0,
        }
    }
}

impl SpawnerTuning {
    /// Also checked on its own when a saved spawner is restored
    pub fn validate(&self) -> Result<(), TuningError> {
        for (field, value) in [("spawner.cooldown", self.cooldown), ("spawner.radius", self.radius)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: format!("expected a finite non-negative value, got {value}"),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.hostile_chance) {
            return Err(TuningError::Invalid {
                field: "spawner.hostile_chance",
                reason: format!("expected a probability, got {}", self.hostile_chance),
            });
        }
        self.distance.validate("spawner.distance")?;
        self.hp.validate("spawner.hp")?;
        self.speed.validate("spawner.speed")?;
        if self.speed.min < 0.0 {
            return Err(TuningError::Invalid {
                field: "spawner.speed",
                reason: "speeds cannot be negative".to_string(),
            });
        }
        Ok(())
    }
}

/// Static world layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    pub ground_radius: f32,
    pub boundary_radius: f32,
    /// Fast-forward multiplier; slow motion divides by it
    pub time_coef: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            ground_radius: 100.0,
            boundary_radius: MAX_DISTANCE,
            time_coef: TIME_COEF,
        }
    }
}

/// Complete balance configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub hostile: HostileTuning,
    pub shots: ShotTuning,
    pub spawner: SpawnerTuning,
    pub world: WorldTuning,
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&text)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot honour
    pub fn validate(&self) -> Result<(), TuningError> {
        let non_negative = [
            ("player.radius", self.player.radius),
            ("player.speed", self.player.speed),
            ("player.cooldown", self.player.cooldown),
            ("world.ground_radius", self.world.ground_radius),
            ("world.boundary_radius", self.world.boundary_radius),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::Invalid {
                    field,
                    reason: format!("expected a finite non-negative value, got {value}"),
                });
            }
        }

        for (field, shot) in [
            ("shots.primary", &self.shots.primary),
            ("shots.secondary", &self.shots.secondary),
            ("shots.hostile", &self.shots.hostile),
        ] {
            let fields = [shot.radius, shot.speed, shot.lifetime, shot.explosion_duration];
            if fields.iter().any(|v| !(v.is_finite() && *v >= 0.0)) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "radius, speed, lifetime and explosion_duration must be non-negative"
                        .to_string(),
                });
            }
        }

        self.hostile.validate()?;
        self.spawner.validate()?;

        if !(self.world.time_coef.is_finite() && self.world.time_coef > 0.0) {
            return Err(TuningError::Invalid {
                field: "world.time_coef",
                reason: format!("expected a positive multiplier, got {}", self.world.time_coef),
            });
        }

        Ok(())
    }
}
