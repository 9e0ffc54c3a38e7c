//! Projectile state machine
//!
//! `Flying -> Exploding -> Removed`. A projectile explodes when its lifetime
//! runs out or when the resolver flags an impact. Once exploded it stops,
//! deals no damage, and lingers for `explosion_duration` seconds.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::entity::{Body, EntityView};
use crate::tuning::ShotPreset;

/// Observable phase of a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileState {
    Flying,
    Exploding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub damage: f32,
    /// Simulation time at which flight ends on its own
    pub expires_at: f32,
    pub exploded: bool,
    pub exploded_at: f32,
    pub explosion_speed: f32,
    pub explosion_duration: f32,
    /// Contact registered by the resolver, not yet turned into an explosion
    pub pending_impact: bool,
}

impl Projectile {
    pub fn new(preset: &ShotPreset, now: f32) -> Self {
        Self {
            damage: preset.damage,
            expires_at: now + preset.lifetime,
            exploded: false,
            exploded_at: 0.0,
            explosion_speed: preset.explosion_speed,
            explosion_duration: preset.explosion_duration,
            pending_impact: false,
        }
    }

    pub fn state(&self) -> ProjectileState {
        if self.exploded {
            ProjectileState::Exploding
        } else {
            ProjectileState::Flying
        }
    }

    /// Still able to deal damage
    #[inline]
    pub fn is_armed(&self) -> bool {
        !self.exploded
    }

    /// Flag an impact against anything solid. Never deals damage itself.
    pub fn react(&mut self, other: &EntityView) {
        if self.exploded {
            return;
        }
        if other.tag.is_actor() || other.tag.is_static() {
            self.pending_impact = true;
        }
    }

    pub fn explode(&mut self, body: &mut Body, now: f32) {
        self.exploded = true;
        self.exploded_at = now;
        self.pending_impact = false;
        body.direction = Vec3::ZERO;
    }

    /// Advance the state machine. `false` means the blast has faded.
    pub fn self_check(&mut self, body: &mut Body, now: f32) -> bool {
        if !self.exploded {
            if now >= self.expires_at || self.pending_impact {
                self.explode(body, now);
            }
            true
        } else {
            now - self.exploded_at < self.explosion_duration
        }
    }

    /// Blast growth consumed by the renderer
    pub fn explosion_progress(&self, now: f32) -> f32 {
        if self.exploded {
            (now - self.exploded_at) * self.explosion_speed
        } else {
            0.0
        }
    }
}
