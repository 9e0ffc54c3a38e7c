//! Per-frame simulation step
//!
//! Phases run in a fixed order: time scaling, integration, self-check,
//! interaction, culling, acting, spawning. Each phase relies on what the
//! previous one established, so they are never reordered or interleaved.

use glam::{Vec2, Vec3};

use super::entity::{ActContext, Entity, EntityTag};
use super::resolver::resolve;
use super::state::{GamePhase, GameState};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Strafe (x, positive = right) and walk (y, positive = forward) axes
    pub move_axis: Vec2,
    /// Cursor offset from screen centre (positive = turn left / look up)
    pub look_delta: Vec2,
    /// Light shot trigger
    pub fire_primary: bool,
    /// Heavy shot trigger
    pub fire_secondary: bool,
    /// Speed time up by the time coefficient
    pub fast_forward: bool,
    /// Slow time down by the time coefficient
    pub slow_motion: bool,
}

/// Result of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Running,
    /// The player was removed; the simulation is finished
    GameOver,
}

/// Advance the game by one frame of `wall_dt` real seconds
pub fn tick(state: &mut GameState, input: &TickInput, wall_dt: f32) -> StepOutcome {
    if state.phase == GamePhase::GameOver {
        return StepOutcome::GameOver;
    }

    // 1. Scaled tick length
    let dt = state
        .clock
        .advance(wall_dt, input.fast_forward, input.slow_motion);
    let now = state.clock.now();

    // 2. Integration
    let previous = integrate(&mut state.entities, dt);

    // 3. Lifecycle checks
    let mut survives: Vec<bool> = state
        .entities
        .iter_mut()
        .map(|e| e.self_check(now))
        .collect();

    // 4. Contacts, then turn flagged impacts into explosions at this instant
    resolve(&mut state.entities, &previous, &mut survives);
    for entity in &mut state.entities {
        if entity.settle_impact(now) {
            log::debug!("Projectile {} exploded on impact at {now:.3}", entity.id.0);
        }
    }

    // 5-6. Cull, then stop if the player is gone
    let player_alive = state
        .player_index()
        .is_some_and(|i| survives.get(i).copied().unwrap_or(false));
    cull(state, &survives);
    if !player_alive {
        state.phase = GamePhase::GameOver;
        let board = state.scoreboard();
        log::info!("Game over at {now:.2}s with {} kills", board.kills);
        return StepOutcome::GameOver;
    }

    // 7. Behaviour. New entities join after everyone has acted.
    let live = state.views();
    let ctx = ActContext {
        now,
        input,
        shots: &state.tuning.shots,
    };
    let spawned: Vec<Entity> = state
        .entities
        .iter_mut()
        .filter_map(|e| e.act(&ctx, &live))
        .collect();
    for entity in spawned {
        state.insert(entity);
    }

    // 8. Procedural spawning against the post-act world
    let reference = state.player().map(Entity::position).unwrap_or(Vec3::ZERO);
    let live = state.views();
    if let Some(entity) = state.spawner.try_spawn(now, reference, &live) {
        state.insert(entity);
    }

    StepOutcome::Running
}

/// Move every entity along its direction and return pre-move positions
fn integrate(entities: &mut [Entity], dt: f32) -> Vec<Vec3> {
    entities
        .iter_mut()
        .map(|e| {
            let before = e.position();
            let step = e.body().velocity_step(dt);
            e.move_by(step);
            before
        })
        .collect()
}

/// Drop removed entities and credit kills.
///
/// A dead player stays in the collection as the terminal record.
fn cull(state: &mut GameState, survives: &[bool]) {
    let mut kills = 0;
    let mut keep = survives.iter().copied();
    state.entities.retain(|e| {
        let alive = keep.next().unwrap_or(true);
        if alive || e.tag() == EntityTag::Player {
            return true;
        }
        if e.tag().counts_as_kill() {
            kills += 1;
            log::debug!("{} {} destroyed", e.tag().as_str(), e.id.0);
        }
        false
    });

    if kills > 0 {
        if let Some(player) = state.player_state_mut() {
            player.kills += kills;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::EntityKind;
    use crate::tuning::Tuning;

    fn quiet_tuning() -> Tuning {
        let mut tuning = Tuning::default();
        tuning.spawner.retries = 0;
        tuning
    }

    fn quiet_world() -> GameState {
        GameState::empty(3, quiet_tuning()).unwrap()
    }

    #[test]
    fn test_integration_scales_with_time() {
        let mut state = quiet_world();
        state.insert(Entity::player(Vec3::ZERO, &state.tuning.player, 0.0).unwrap());
        let mover = state.insert(
            Entity::hostile(Vec3::new(50.0, 0.0, 0.0), Vec3::Z, 1.0, 1.0, 2.0, 100.0, 0.0)
                .unwrap(),
        );

        let input = TickInput {
            fast_forward: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.1);
        let moved = state.find(mover).unwrap().position();
        // 2 u/s for 0.1 s scaled by 10
        assert!((moved - Vec3::new(50.0, 0.0, 2.0)).length() < 1e-5);
        assert!((state.now() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sinking_actor_restored() {
        let mut state = quiet_world();
        state.insert(Entity::player(Vec3::new(0.0, 2.0, 0.0), &state.tuning.player, 0.0).unwrap());
        state.insert(Entity::terrain(Vec3::ZERO, 100.0).unwrap());
        // Falls straight into the ground at 20 u/s
        let faller = state.insert(
            Entity::hostile(Vec3::new(20.0, 1.5, 0.0), Vec3::NEG_Y, 1.0, 3.0, 20.0, 100.0, 0.0)
                .unwrap(),
        );
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.find(faller).unwrap().position(), Vec3::new(20.0, 1.5, 0.0));
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut state = quiet_world();
        let mut tuning = state.tuning.player.clone();
        tuning.hp = 1.0;
        state.insert(Entity::player(Vec3::ZERO, &tuning, 0.0).unwrap());
        state.insert(
            Entity::projectile(Vec3::new(0.0, 0.0, 3.0), Vec3::NEG_Z, &state.tuning.shots.hostile, 0.0)
                .unwrap(),
        );

        assert_eq!(tick(&mut state, &TickInput::default(), 0.2), StepOutcome::GameOver);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.player().is_some());
        assert_eq!(state.scoreboard().kills, 0);

        let frozen = state.now();
        assert_eq!(tick(&mut state, &TickInput::default(), 1.0), StepOutcome::GameOver);
        assert_eq!(state.now(), frozen);
    }

    #[test]
    fn test_new_entities_wait_a_frame() {
        let mut state = quiet_world();
        state.insert(Entity::player(Vec3::ZERO, &state.tuning.player, 0.0).unwrap());
        let fire = TickInput {
            fire_primary: true,
            ..Default::default()
        };
        tick(&mut state, &fire, 0.1);
        assert_eq!(state.entities.len(), 2);
        let shot = &state.entities[1];
        // Spawned at the muzzle and not yet integrated
        assert!((shot.position() - Vec3::new(0.0, 0.0, 1.2)).length() < 1e-5);
        assert!(matches!(shot.kind, EntityKind::Projectile(_)));

        tick(&mut state, &TickInput::default(), 0.1);
        assert!((state.entities[1].position().z - 2.2).abs() < 1e-5);
    }

    #[test]
    fn test_spawner_runs_after_act() {
        let mut state = GameState::empty(9, Tuning::default()).unwrap();
        state.insert(Entity::player(Vec3::ZERO, &state.tuning.player, 0.0).unwrap());
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.hostile_count(), 1);
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.hostile_count(), 1);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99_999).unwrap();
        let mut b = GameState::new(99_999).unwrap();
        let inputs = [
            TickInput {
                look_delta: Vec2::new(40.0, 0.0),
                fire_primary: true,
                ..Default::default()
            },
            TickInput {
                move_axis: Vec2::new(0.0, 1.0),
                ..Default::default()
            },
            TickInput {
                fast_forward: true,
                fire_secondary: true,
                ..Default::default()
            },
        ];
        for _ in 0..40 {
            for input in &inputs {
                tick(&mut a, input, 0.05);
                tick(&mut b, input, 0.05);
            }
        }
        assert_eq!(a.entities, b.entities);
        assert_eq!(a.scoreboard(), b.scoreboard());
    }
}
