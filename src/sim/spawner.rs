//! Procedural hostile placement
//!
//! Rejection sampling around a reference point: draw a candidate, keep it
//! only if nothing alive overlaps it, give up after a fixed number of tries.

use std::f32::consts::PI;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityView, mutual_range};
use crate::heading_to_vec;
use crate::tuning::{HostileTuning, SampleRange, SpawnerTuning};

/// Cooldown-gated spawner with its own seeded RNG stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    pub tuning: SpawnerTuning,
    /// Size and fire cooldown of spawned hostiles
    pub hostile: HostileTuning,
    next_allowed: f32,
    rng: Pcg32,
}

impl Spawner {
    /// The first attempt happens on the first call after `now`
    pub fn new(tuning: SpawnerTuning, hostile: HostileTuning, now: f32, seed: u64) -> Self {
        Self {
            tuning,
            hostile,
            next_allowed: now,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn next_allowed(&self) -> f32 {
        self.next_allowed
    }

    /// Try to place one new hostile or passive target around `reference`.
    ///
    /// Returns `None` while cooling down or when every candidate overlapped
    /// something in `live`.
    pub fn try_spawn(&mut self, now: f32, reference: Vec3, live: &[EntityView]) -> Option<Entity> {
        if now <= self.next_allowed {
            return None;
        }
        self.next_allowed = now + self.tuning.cooldown;

        let facing = heading_to_vec(self.rng.random_range(-PI..=PI));
        let hostile = self.rng.random_bool(self.tuning.hostile_chance);

        for attempt in 0..self.tuning.retries {
            let angle = self.rng.random_range(-PI..=PI);
            let distance = sample(&mut self.rng, self.tuning.distance);
            let position = reference + heading_to_vec(angle) * distance;
            let hp = sample(&mut self.rng, self.tuning.hp);

            let candidate = if hostile {
                let speed = sample(&mut self.rng, self.tuning.speed);
                Entity::hostile(
                    position,
                    facing,
                    self.hostile.radius,
                    hp,
                    speed,
                    self.hostile.cooldown,
                    now,
                )
            } else {
                Entity::passive(position, facing, self.tuning.radius, hp)
            };
            let candidate = match candidate {
                Ok(entity) => entity,
                Err(err) => {
                    log::warn!("Spawner produced an invalid candidate: {err}");
                    return None;
                }
            };

            let seen = candidate.view();
            if live.iter().all(|other| !mutual_range(&seen, other)) {
                log::debug!(
                    "Spawned {} at {:?} (attempt {})",
                    candidate.tag().as_str(),
                    position,
                    attempt + 1
                );
                return Some(candidate);
            }
        }

        log::debug!("Spawn skipped: {} placements rejected", self.tuning.retries);
        None
    }
}

fn sample(rng: &mut Pcg32, range: SampleRange) -> f32 {
    rng.random_range(range.min..=range.max)
}
