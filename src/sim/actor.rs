//! Actors: health, contact response, and per-frame behaviour
//!
//! The player is actor state plus a camera and a pair of weapon triggers,
//! composed as owned values.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::entity::{ActContext, Body, Entity, EntityTag, EntityView};
use crate::consts::MAX_PITCH;
use crate::tuning::{PlayerTuning, ShotPreset};
use crate::{heading_to_vec, look_to_vec, unit_or_zero};

/// Health shared by every actor variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub hp: f32,
}

impl Actor {
    pub fn new(hp: f32) -> Self {
        Self { hp }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Contact response, called only for entities in mutual range.
    ///
    /// Armed projectiles deal their damage here and nowhere else. Solid
    /// contacts snap the actor back to its pre-frame position.
    pub fn react(&mut self, body: &mut Body, other: &EntityView, previous: Vec3) -> bool {
        match other.tag {
            EntityTag::Projectile => {
                if let Some(damage) = other.warhead {
                    self.hp -= damage;
                }
            }
            EntityTag::Player
            | EntityTag::Passive
            | EntityTag::Hostile
            | EntityTag::Terrain
            | EntityTag::Boundary => {
                body.position = previous;
            }
        }
        self.is_alive()
    }
}

/// First-person camera angles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Heading around +Y (radians, 0 faces +Z)
    pub horizontal_angle: f32,
    /// Pitch (radians, clamped to ±π/2)
    pub vertical_angle: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
}

impl Camera {
    pub fn new(fov: f32) -> Self {
        Self {
            horizontal_angle: 0.0,
            vertical_angle: 0.0,
            fov,
        }
    }

    /// Look direction including pitch
    pub fn forward(&self) -> Vec3 {
        look_to_vec(self.horizontal_angle, self.vertical_angle)
    }

    /// Ground-plane heading, used for walking
    pub fn heading(&self) -> Vec3 {
        heading_to_vec(self.horizontal_angle)
    }

    pub fn right(&self) -> Vec3 {
        heading_to_vec(self.horizontal_angle - std::f32::consts::FRAC_PI_2)
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// Apply a cursor delta (offset from screen centre, positive = left/up)
    pub fn apply_look(&mut self, delta: Vec2, sensitivity: f32) {
        self.horizontal_angle += sensitivity * delta.x;
        self.vertical_angle =
            (self.vertical_angle + sensitivity * delta.y).clamp(-MAX_PITCH, MAX_PITCH);
    }
}

/// Two triggers sharing a cooldown length, each with its own timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weapons {
    pub cooldown: f32,
    pub next_primary: f32,
    pub next_secondary: f32,
}

impl Weapons {
    pub fn new(cooldown: f32, now: f32) -> Self {
        Self {
            cooldown,
            next_primary: now,
            next_secondary: now,
        }
    }
}

/// The player-controlled actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub actor: Actor,
    pub camera: Camera,
    pub weapons: Weapons,
    /// Look sensitivity (radians per unit of cursor delta)
    pub mouse_speed: f32,
    pub kills: u32,
}

impl Player {
    pub fn new(tuning: &PlayerTuning, now: f32) -> Self {
        Self {
            actor: Actor::new(tuning.hp),
            camera: Camera::new(tuning.fov),
            weapons: Weapons::new(tuning.cooldown, now),
            mouse_speed: tuning.mouse_speed,
            kills: 0,
        }
    }

    /// Steer from input and fire if a trigger is pulled and ready.
    ///
    /// The primary trigger wins when both are ready in the same frame.
    pub fn act(&mut self, body: &mut Body, ctx: &ActContext<'_>) -> Option<Entity> {
        let input = ctx.input;
        self.camera.apply_look(input.look_delta, self.mouse_speed);

        let axis = input.move_axis;
        let wish = self.camera.heading() * axis.y + self.camera.right() * axis.x;
        body.direction = unit_or_zero(wish);

        let aim = self.camera.forward();
        let now = ctx.now;

        if input.fire_primary && now > self.weapons.next_primary {
            self.weapons.next_primary = now + self.weapons.cooldown;
            return fire(body, aim, &ctx.shots.primary, now);
        }
        if input.fire_secondary && now > self.weapons.next_secondary {
            self.weapons.next_secondary = now + self.weapons.cooldown;
            return fire(body, aim, &ctx.shots.secondary, now);
        }
        None
    }
}

/// An actor that hunts the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hostile {
    pub actor: Actor,
    /// Seconds between shots
    pub cooldown: f32,
    pub next_fire: f32,
}

impl Hostile {
    pub fn new(hp: f32, cooldown: f32, now: f32) -> Self {
        Self {
            actor: Actor::new(hp),
            cooldown,
            next_fire: now + cooldown,
        }
    }

    /// Turn toward the first live player and shoot when the cooldown allows
    pub fn act(
        &mut self,
        body: &mut Body,
        ctx: &ActContext<'_>,
        live: &[EntityView],
    ) -> Option<Entity> {
        let target = live.iter().find(|v| v.tag == EntityTag::Player)?;

        let aim = unit_or_zero(target.body.position - body.position);
        body.direction = aim;
        if aim == Vec3::ZERO {
            return None;
        }

        if ctx.now > self.next_fire {
            self.next_fire = ctx.now + self.cooldown;
            return fire(body, aim, &ctx.shots.hostile, ctx.now);
        }
        None
    }
}

/// Launch a projectile just outside the shooter's hull
fn fire(body: &Body, aim: Vec3, preset: &ShotPreset, now: f32) -> Option<Entity> {
    let muzzle = body.position + aim * (body.radius + preset.offset);
    match Entity::projectile(muzzle, aim, preset, now) {
        Ok(shot) => Some(shot),
        Err(err) => {
            log::warn!("Dropped shot: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EntityId, EntityKind};
    use crate::sim::tick::TickInput;
    use crate::tuning::Tuning;

    fn player_entity() -> Entity {
        Entity::player(Vec3::ZERO, &PlayerTuning::default(), 0.0).unwrap()
    }

    fn player_view(position: Vec3) -> EntityView {
        let mut entity = Entity::player(position, &PlayerTuning::default(), 0.0).unwrap();
        entity.id = EntityId(1);
        entity.view()
    }

    #[test]
    fn test_camera_pitch_clamped() {
        let mut camera = Camera::new(45.0);
        camera.apply_look(Vec2::new(0.0, 10_000.0), 0.005);
        assert_eq!(camera.vertical_angle, MAX_PITCH);
        camera.apply_look(Vec2::new(0.0, -100_000.0), 0.005);
        assert_eq!(camera.vertical_angle, -MAX_PITCH);
    }

    #[test]
    fn test_camera_basis() {
        let camera = Camera::new(45.0);
        assert!((camera.forward() - Vec3::Z).length() < 1e-5);
        assert!((camera.right() - Vec3::NEG_X).length() < 1e-5);
        assert!((camera.up() - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_player_movement_is_normalized() {
        let tuning = Tuning::default();
        let input = TickInput {
            move_axis: Vec2::new(1.0, 1.0),
            ..Default::default()
        };
        let ctx = ActContext {
            now: 1.0,
            input: &input,
            shots: &tuning.shots,
        };
        let mut entity = player_entity();
        assert!(entity.act(&ctx, &[]).is_none());
        assert!((entity.direction().length() - 1.0).abs() < 1e-5);
        // Forward (+Z) and right (-X) blended
        assert!(entity.direction().z > 0.0 && entity.direction().x < 0.0);
    }

    #[test]
    fn test_player_triggers_have_independent_cooldowns() {
        let tuning = Tuning::default();
        let both = TickInput {
            fire_primary: true,
            fire_secondary: true,
            ..Default::default()
        };
        let mut entity = player_entity();

        let ctx = ActContext {
            now: 0.5,
            input: &both,
            shots: &tuning.shots,
        };
        let first = entity.act(&ctx, &[]).unwrap();
        assert_eq!(first.radius(), tuning.shots.primary.radius);

        // Primary cooling down, secondary still ready
        let ctx = ActContext {
            now: 0.6,
            input: &both,
            shots: &tuning.shots,
        };
        let second = entity.act(&ctx, &[]).unwrap();
        assert_eq!(second.radius(), tuning.shots.secondary.radius);
        assert!((second.position().z - 3.0).abs() < 1e-5);

        let ctx = ActContext {
            now: 0.7,
            input: &both,
            shots: &tuning.shots,
        };
        assert!(entity.act(&ctx, &[]).is_none());
    }

    #[test]
    fn test_hostile_aims_and_fires_after_cooldown() {
        let tuning = Tuning::default();
        let input = TickInput::default();
        let mut hostile =
            Entity::hostile(Vec3::new(0.0, 0.0, 10.0), Vec3::X, 1.0, 3.0, 1.0, 5.0, 0.0).unwrap();
        let live = [player_view(Vec3::ZERO)];

        let early = ActContext {
            now: 4.0,
            input: &input,
            shots: &tuning.shots,
        };
        assert!(hostile.act(&early, &live).is_none());
        assert!((hostile.direction() - Vec3::NEG_Z).length() < 1e-5);

        let ready = ActContext {
            now: 5.5,
            input: &input,
            shots: &tuning.shots,
        };
        let shot = hostile.act(&ready, &live).unwrap();
        assert!((shot.position() - Vec3::new(0.0, 0.0, 8.8)).length() < 1e-4);
        assert_eq!(shot.as_projectile().unwrap().damage, 2.0);
        match &hostile.kind {
            EntityKind::Hostile(h) => assert_eq!(h.next_fire, 10.5),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_hostile_without_target_idles() {
        let tuning = Tuning::default();
        let input = TickInput::default();
        let ctx = ActContext {
            now: 100.0,
            input: &input,
            shots: &tuning.shots,
        };
        let mut hostile =
            Entity::hostile(Vec3::ZERO, Vec3::X, 1.0, 3.0, 1.0, 5.0, 0.0).unwrap();
        assert!(hostile.act(&ctx, &[]).is_none());
        assert_eq!(hostile.direction(), Vec3::X);
    }

    #[test]
    fn test_actor_rollback_on_solid_contact() {
        let mut body = Body::new(Vec3::new(1.0, 0.0, 0.0), Vec3::X, 1.0, 1.0).unwrap();
        let mut actor = Actor::new(5.0);
        let other = Entity::passive(Vec3::new(1.5, 0.0, 0.0), Vec3::ZERO, 1.0, 1.0).unwrap();
        assert!(actor.react(&mut body, &other.view(), Vec3::ZERO));
        assert_eq!(body.position, Vec3::ZERO);
        assert_eq!(actor.hp, 5.0);
    }
}
