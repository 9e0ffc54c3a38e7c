//! Frame-stepped simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - Time comes from the explicit simulation clock only
//! - Seeded RNG only
//! - Stable iteration order (collection order, IDs never reused)

pub mod actor;
pub mod clock;
pub mod entity;
pub mod projectile;
pub mod resolver;
pub mod spawner;
pub mod state;
pub mod tick;

pub use actor::{Actor, Camera, Hostile, Player, Weapons};
pub use clock::SimulationClock;
pub use entity::{
    ActContext, Body, Entity, EntityId, EntityKind, EntityTag, EntityView, mutual_range,
};
pub use projectile::{Projectile, ProjectileState};
pub use resolver::resolve;
pub use spawner::Spawner;
pub use state::{GamePhase, GameState, Scoreboard};
pub use tick::{StepOutcome, TickInput, tick};
