//! Game state and core simulation types
//!
//! The state owns the single ordered entity collection. Order matters for
//! which entity acts first and is preserved across frames.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::actor::Player;
use super::clock::SimulationClock;
use super::entity::{Entity, EntityId, EntityTag, EntityView};
use super::spawner::Spawner;
use crate::error::SimError;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Frames are being simulated
    Playing,
    /// The player died; further ticks are no-ops
    GameOver,
}

/// Read-only values for on-screen or logged display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub player_hp: f32,
    pub kills: u32,
    /// Live hostile and passive targets
    pub hostiles: usize,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub clock: SimulationClock,
    pub phase: GamePhase,
    /// Live entities in resolution order
    pub entities: Vec<Entity>,
    pub spawner: Spawner,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Standard world with default tuning
    pub fn new(seed: u64) -> Result<Self, SimError> {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Standard world: player, ground plane under the player, world boundary
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, SimError> {
        let mut state = Self::empty(seed, tuning)?;
        let now = state.clock.now();

        let spawn = Vec3::new(0.0, state.tuning.player.spawn_height, 0.0);
        let player = Entity::player(spawn, &state.tuning.player, now)?;
        let ground = Entity::terrain(Vec3::new(spawn.x, 0.0, spawn.z), state.tuning.world.ground_radius)?;
        let boundary = Entity::boundary(Vec3::ZERO, state.tuning.world.boundary_radius)?;

        state.insert(player);
        state.insert(ground);
        state.insert(boundary);

        log::info!("World created with seed {seed}");
        Ok(state)
    }

    /// A world with no entities, for hosts that build their own layout
    pub fn empty(seed: u64, tuning: Tuning) -> Result<Self, SimError> {
        tuning.validate()?;
        let clock = SimulationClock::new(0.0, tuning.world.time_coef);
        let spawner = Spawner::new(
            tuning.spawner.clone(),
            tuning.hostile.clone(),
            clock.now(),
            seed,
        );
        Ok(Self {
            seed,
            tuning,
            clock,
            phase: GamePhase::Playing,
            entities: Vec::new(),
            spawner,
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append an entity, assigning it an ID
    pub fn insert(&mut self, mut entity: Entity) -> EntityId {
        entity.id = self.next_entity_id();
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    /// Lowest ID the next inserted entity may receive
    pub fn id_watermark(&self) -> u32 {
        self.next_id
    }

    /// Never hand out IDs below `watermark`, even if they are unused
    pub fn reserve_ids(&mut self, watermark: u32) {
        self.next_id = self.next_id.max(watermark);
    }

    /// Replace the world with restored entities at simulation time `now`.
    ///
    /// Entities keep their saved IDs; unassigned ones get fresh IDs.
    pub fn restore(&mut self, now: f32, entities: Vec<Entity>) {
        self.clock.set_now(now);
        self.next_id = entities
            .iter()
            .map(|e| e.id.0)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        self.entities = Vec::with_capacity(entities.len());
        for entity in entities {
            if entity.id.is_assigned() {
                self.entities.push(entity);
            } else {
                self.insert(entity);
            }
        }
        self.phase = match self.player() {
            Some(p) if p.hp().is_some_and(|hp| hp > 0.0) => GamePhase::Playing,
            _ => GamePhase::GameOver,
        };
    }

    #[inline]
    pub fn now(&self) -> f32 {
        self.clock.now()
    }

    pub fn player_index(&self) -> Option<usize> {
        self.entities.iter().position(|e| e.tag() == EntityTag::Player)
    }

    pub fn player(&self) -> Option<&Entity> {
        self.entities.iter().find(|e| e.tag() == EntityTag::Player)
    }

    pub fn player_state(&self) -> Option<&Player> {
        self.player().and_then(Entity::as_player)
    }

    pub fn player_state_mut(&mut self) -> Option<&mut Player> {
        self.entities.iter_mut().find_map(Entity::as_player_mut)
    }

    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Snapshots of every live entity, in order
    pub fn views(&self) -> Vec<EntityView> {
        self.entities.iter().map(Entity::view).collect()
    }

    /// Live hostile and passive targets
    pub fn hostile_count(&self) -> usize {
        self.entities.iter().filter(|e| e.tag().counts_as_kill()).count()
    }

    pub fn scoreboard(&self) -> Scoreboard {
        let player = self.player_state();
        Scoreboard {
            player_hp: player.map(|p| p.actor.hp).unwrap_or(0.0),
            kills: player.map(|p| p.kills).unwrap_or(0),
            hostiles: self.hostile_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_layout() {
        let state = GameState::new(1).unwrap();
        let tags: Vec<_> = state.entities.iter().map(Entity::tag).collect();
        assert_eq!(
            tags,
            vec![EntityTag::Player, EntityTag::Terrain, EntityTag::Boundary]
        );
        assert_eq!(state.player().unwrap().position(), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let state = GameState::new(1).unwrap();
        let ids: Vec<_> = state.entities.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_scoreboard() {
        let mut state = GameState::new(1).unwrap();
        state.insert(Entity::passive(Vec3::new(10.0, 2.0, 0.0), Vec3::ZERO, 1.0, 2.0).unwrap());
        state.player_state_mut().unwrap().kills = 4;
        let board = state.scoreboard();
        assert_eq!(board.player_hp, 10.0);
        assert_eq!(board.kills, 4);
        assert_eq!(board.hostiles, 1);
    }

    #[test]
    fn test_restore_keeps_ids_and_assigns_missing() {
        let mut state = GameState::new(1).unwrap();
        let mut kept = Entity::passive(Vec3::ZERO, Vec3::ZERO, 1.0, 1.0).unwrap();
        kept.id = EntityId(40);
        let player = Entity::player(Vec3::ZERO, &state.tuning.player, 0.0).unwrap();
        state.restore(12.0, vec![player, kept]);

        assert_eq!(state.now(), 12.0);
        assert_eq!(state.entities[0].id, EntityId(41));
        assert_eq!(state.entities[1].id, EntityId(40));
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let mut tuning = Tuning::default();
        tuning.player.radius = -1.0;
        assert!(matches!(GameState::with_tuning(1, tuning), Err(SimError::Tuning(_))));
    }
}
