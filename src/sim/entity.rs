//! Entity model and capability contract
//!
//! Every simulated object is an [`Entity`]: a shared [`Body`] plus a closed
//! [`EntityKind`] payload. Behaviour is dispatched by matching on the kind,
//! never by probing types.
//!
//! Range checks are asymmetric. A reaction only happens when both sides
//! consider each other in range (see [`mutual_range`]).

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, Hostile, Player};
use super::projectile::Projectile;
use super::tick::TickInput;
use crate::consts::UNIT_TOLERANCE;
use crate::error::SimError;
use crate::tuning::{PlayerTuning, ShotPreset, ShotTuning};

/// Stable entity identifier, assigned when the entity joins the world
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Placeholder for entities not yet inserted into a world
    pub const UNASSIGNED: Self = Self(0);

    pub fn is_assigned(self) -> bool {
        self != Self::UNASSIGNED
    }
}

/// Shared physical state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec3,
    /// Zero ("not moving") or unit length
    pub direction: Vec3,
    /// Collision bound
    pub radius: f32,
    /// Units per second along `direction`
    pub speed: f32,
}

impl Body {
    /// Build a body, rejecting invariant violations
    pub fn new(position: Vec3, direction: Vec3, radius: f32, speed: f32) -> Result<Self, SimError> {
        let body = Self {
            position,
            direction,
            radius,
            speed,
        };
        body.validate()?;
        Ok(body)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !self.position.is_finite() {
            return Err(SimError::NonFinitePosition {
                x: self.position.x,
                y: self.position.y,
                z: self.position.z,
            });
        }
        if !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(SimError::InvalidRadius(self.radius));
        }
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(SimError::InvalidSpeed(self.speed));
        }
        let length = self.direction.length();
        if !length.is_finite() || (length != 0.0 && (length - 1.0).abs() > UNIT_TOLERANCE) {
            return Err(SimError::NonUnitDirection { length });
        }
        Ok(())
    }

    /// Displacement for one tick
    #[inline]
    pub fn velocity_step(&self, dt: f32) -> Vec3 {
        self.direction * self.speed * dt
    }
}

/// Kind discriminant used for dispatch, draw selection and save tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityTag {
    Player,
    Passive,
    Hostile,
    Projectile,
    Terrain,
    Boundary,
}

impl EntityTag {
    /// Actors carry health and are rolled back on contact
    pub fn is_actor(self) -> bool {
        matches!(self, Self::Player | Self::Passive | Self::Hostile)
    }

    /// Static entities own their range rule and never move
    pub fn is_static(self) -> bool {
        matches!(self, Self::Terrain | Self::Boundary)
    }

    /// Whether removing this entity credits the player with a kill
    pub fn counts_as_kill(self) -> bool {
        matches!(self, Self::Passive | Self::Hostile)
    }

    /// Numeric code used by the legacy save format and the renderer
    pub fn code(self) -> u32 {
        match self {
            Self::Player => 0,
            Self::Passive => 1,
            Self::Hostile => 2,
            Self::Projectile => 3,
            Self::Terrain => 4,
            Self::Boundary => 5,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Player),
            1 => Some(Self::Passive),
            2 => Some(Self::Hostile),
            3 => Some(Self::Projectile),
            4 => Some(Self::Terrain),
            5 => Some(Self::Boundary),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Passive => "passive",
            Self::Hostile => "hostile",
            Self::Projectile => "projectile",
            Self::Terrain => "terrain",
            Self::Boundary => "boundary",
        }
    }
}

/// Kind-specific state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Player(Player),
    Passive(Actor),
    Hostile(Hostile),
    Projectile(Projectile),
    Terrain,
    Boundary,
}

impl EntityKind {
    pub fn tag(&self) -> EntityTag {
        match self {
            Self::Player(_) => EntityTag::Player,
            Self::Passive(_) => EntityTag::Passive,
            Self::Hostile(_) => EntityTag::Hostile,
            Self::Projectile(_) => EntityTag::Projectile,
            Self::Terrain => EntityTag::Terrain,
            Self::Boundary => EntityTag::Boundary,
        }
    }
}

/// Read-only snapshot of an entity as seen by another one.
///
/// Interaction reads the other side through a view taken at the start of the
/// resolver pass, so every reaction in a frame observes the same state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityView {
    pub id: EntityId,
    pub tag: EntityTag,
    pub body: Body,
    /// Damage carried by a projectile that has not exploded yet
    pub warhead: Option<f32>,
}

impl EntityView {
    /// Asymmetric range predicate: does `self` consider `other` in range?
    pub fn reaches(&self, other: &EntityView) -> bool {
        match self.tag {
            // Below-ground rule: only the height above the terrain plane matters
            EntityTag::Terrain => {
                other.body.position.y - self.body.position.y < other.body.radius
            }
            // Inverted containment: triggers once `other` pokes out of the volume
            EntityTag::Boundary => {
                self.body.position.distance(other.body.position)
                    > self.body.radius - other.body.radius
            }
            // Mobile entities defer to a static entity's own rule
            _ if other.tag.is_static() => true,
            _ => {
                self.body.position.distance(other.body.position)
                    < self.body.radius + other.body.radius
            }
        }
    }
}

/// Both entities consider each other in range
#[inline]
pub fn mutual_range(a: &EntityView, b: &EntityView) -> bool {
    a.reaches(b) && b.reaches(a)
}

/// Per-frame context handed to [`Entity::act`]
#[derive(Debug, Clone, Copy)]
pub struct ActContext<'a> {
    pub now: f32,
    pub input: &'a TickInput,
    pub shots: &'a ShotTuning,
}

/// A simulated object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    body: Body,
    pub kind: EntityKind,
}

impl Entity {
    /// Assemble an entity from parts, validating the body
    pub fn from_parts(body: Body, kind: EntityKind) -> Result<Self, SimError> {
        body.validate()?;
        Ok(Self {
            id: EntityId::UNASSIGNED,
            body,
            kind,
        })
    }

    /// Player at `position`, facing +Z, standing still
    pub fn player(position: Vec3, tuning: &PlayerTuning, now: f32) -> Result<Self, SimError> {
        let body = Body::new(position, Vec3::ZERO, tuning.radius, tuning.speed)?;
        Self::from_parts(body, EntityKind::Player(Player::new(tuning, now)))
    }

    /// Stationary target with no offensive behaviour
    pub fn passive(position: Vec3, direction: Vec3, radius: f32, hp: f32) -> Result<Self, SimError> {
        let body = Body::new(position, direction, radius, 0.0)?;
        Self::from_parts(body, EntityKind::Passive(Actor::new(hp)))
    }

    /// Hostile that holds fire for one cooldown after `now`
    pub fn hostile(
        position: Vec3,
        direction: Vec3,
        radius: f32,
        hp: f32,
        speed: f32,
        cooldown: f32,
        now: f32,
    ) -> Result<Self, SimError> {
        let body = Body::new(position, direction, radius, speed)?;
        Self::from_parts(body, EntityKind::Hostile(Hostile::new(hp, cooldown, now)))
    }

    /// Projectile launched at `now`
    pub fn projectile(
        position: Vec3,
        direction: Vec3,
        preset: &ShotPreset,
        now: f32,
    ) -> Result<Self, SimError> {
        let body = Body::new(position, direction, preset.radius, preset.speed)?;
        Self::from_parts(body, EntityKind::Projectile(Projectile::new(preset, now)))
    }

    /// Ground plane at `position.y`
    pub fn terrain(position: Vec3, radius: f32) -> Result<Self, SimError> {
        let body = Body::new(position, Vec3::Y, radius, 0.0)?;
        Self::from_parts(body, EntityKind::Terrain)
    }

    /// Playable-volume limit centred on `position`
    pub fn boundary(position: Vec3, radius: f32) -> Result<Self, SimError> {
        let body = Body::new(position, Vec3::Y, radius, 0.0)?;
        Self::from_parts(body, EntityKind::Boundary)
    }

    #[inline]
    pub fn tag(&self) -> EntityTag {
        self.kind.tag()
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.body.direction
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.body.radius
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.body.speed
    }

    /// Translate by a pre-scaled delta
    #[inline]
    pub fn move_by(&mut self, delta: Vec3) {
        self.body.position += delta;
    }

    pub fn validate(&self) -> Result<(), SimError> {
        self.body.validate()
    }

    /// Health of an actor, `None` for everything else
    pub fn hp(&self) -> Option<f32> {
        self.actor().map(|a| a.hp)
    }

    pub fn actor(&self) -> Option<&Actor> {
        match &self.kind {
            EntityKind::Player(p) => Some(&p.actor),
            EntityKind::Passive(a) => Some(a),
            EntityKind::Hostile(h) => Some(&h.actor),
            _ => None,
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match &self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut Player> {
        match &mut self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_projectile(&self) -> Option<&Projectile> {
        match &self.kind {
            EntityKind::Projectile(p) => Some(p),
            _ => None,
        }
    }

    /// Blast growth for the renderer, zero unless exploding
    pub fn explosion_progress(&self, now: f32) -> f32 {
        self.as_projectile()
            .map(|p| p.explosion_progress(now))
            .unwrap_or(0.0)
    }

    pub fn view(&self) -> EntityView {
        let warhead = match &self.kind {
            EntityKind::Projectile(p) if p.is_armed() => Some(p.damage),
            _ => None,
        };
        EntityView {
            id: self.id,
            tag: self.tag(),
            body: self.body,
            warhead,
        }
    }

    /// Does `self` consider `other` within its interaction range?
    pub fn check_interaction(&self, other: &Entity) -> bool {
        self.view().reaches(&other.view())
    }

    /// React to `other`. Returns `false` iff `self` must be removed.
    ///
    /// `previous` is this entity's position before the frame's integration
    /// and is used to roll back actors on solid contact.
    pub fn interact(&mut self, other: &EntityView, previous: Vec3) -> bool {
        if !mutual_range(&self.view(), other) {
            return true;
        }
        self.react(other, previous)
    }

    /// Apply a contact already known to be in mutual range
    pub fn react(&mut self, other: &EntityView, previous: Vec3) -> bool {
        let Self { body, kind, .. } = self;
        match kind {
            EntityKind::Player(p) => p.actor.react(body, other, previous),
            EntityKind::Passive(a) => a.react(body, other, previous),
            EntityKind::Hostile(h) => h.actor.react(body, other, previous),
            EntityKind::Projectile(p) => {
                p.react(other);
                true
            }
            EntityKind::Terrain | EntityKind::Boundary => true,
        }
    }

    /// Collision-independent lifecycle check. `false` means remove.
    pub fn self_check(&mut self, now: f32) -> bool {
        let Self { body, kind, .. } = self;
        match kind {
            EntityKind::Projectile(p) => p.self_check(body, now),
            _ => true,
        }
    }

    /// Explode a projectile whose impact was flagged this frame
    pub fn settle_impact(&mut self, now: f32) -> bool {
        let Self { body, kind, .. } = self;
        match kind {
            EntityKind::Projectile(p) if p.pending_impact && !p.exploded => {
                p.explode(body, now);
                true
            }
            _ => false,
        }
    }

    /// Per-frame behaviour. May produce one new entity.
    pub fn act(&mut self, ctx: &ActContext<'_>, live: &[EntityView]) -> Option<Entity> {
        let Self { body, kind, .. } = self;
        match kind {
            EntityKind::Player(p) => p.act(body, ctx),
            EntityKind::Hostile(h) => h.act(body, ctx, live),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn view_of(entity: &Entity) -> EntityView {
        entity.view()
    }

    #[test]
    fn test_body_rejects_negative_radius() {
        let err = Body::new(Vec3::ZERO, Vec3::ZERO, -1.0, 0.0).unwrap_err();
        assert!(matches!(err, SimError::InvalidRadius(_)));
    }

    #[test]
    fn test_body_rejects_non_unit_direction() {
        let err = Body::new(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 1.0, 1.0).unwrap_err();
        assert!(matches!(err, SimError::NonUnitDirection { .. }));
        assert!(Body::new(Vec3::ZERO, Vec3::ZERO, 1.0, 1.0).is_ok());
    }

    #[test]
    fn test_body_rejects_nan() {
        let err = Body::new(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::ZERO, 1.0, 1.0).unwrap_err();
        assert!(matches!(err, SimError::NonFinitePosition { .. }));
        let err = Body::new(Vec3::ZERO, Vec3::ZERO, 1.0, f32::INFINITY).unwrap_err();
        assert!(matches!(err, SimError::InvalidSpeed(_)));
    }

    #[test]
    fn test_tag_codes_round_trip() {
        for code in 0..6 {
            let tag = EntityTag::from_code(code).unwrap();
            assert_eq!(tag.code(), code);
        }
        assert_eq!(EntityTag::from_code(6), None);
    }

    #[test]
    fn test_default_range_is_distance() {
        let a = Entity::passive(Vec3::ZERO, Vec3::ZERO, 1.0, 1.0).unwrap();
        let near = Entity::passive(Vec3::new(1.5, 0.0, 0.0), Vec3::ZERO, 1.0, 1.0).unwrap();
        let far = Entity::passive(Vec3::new(2.5, 0.0, 0.0), Vec3::ZERO, 1.0, 1.0).unwrap();
        assert!(a.check_interaction(&near));
        assert!(!a.check_interaction(&far));
    }

    #[test]
    fn test_terrain_uses_height_only() {
        let ground = Entity::terrain(Vec3::ZERO, 100.0).unwrap();
        let standing = Entity::passive(Vec3::new(500.0, 2.0, 0.0), Vec3::ZERO, 1.0, 1.0).unwrap();
        let sunk = Entity::passive(Vec3::new(500.0, 0.5, 0.0), Vec3::ZERO, 1.0, 1.0).unwrap();
        assert!(!ground.check_interaction(&standing));
        assert!(ground.check_interaction(&sunk));
        // Far outside the ground radius, the mobile side defers
        assert!(mutual_range(&view_of(&ground), &view_of(&sunk)));
    }

    #[test]
    fn test_boundary_is_inverted() {
        let wall = Entity::boundary(Vec3::ZERO, 300.0).unwrap();
        let inside = Entity::passive(Vec3::new(100.0, 0.0, 0.0), Vec3::ZERO, 1.0, 1.0).unwrap();
        let outside = Entity::passive(Vec3::new(299.5, 0.0, 0.0), Vec3::ZERO, 1.0, 1.0).unwrap();
        assert!(!wall.check_interaction(&inside));
        assert!(wall.check_interaction(&outside));
        assert!(mutual_range(&view_of(&wall), &view_of(&outside)));
    }

    #[test]
    fn test_static_entities_never_removed() {
        let mut ground = Entity::terrain(Vec3::ZERO, 100.0).unwrap();
        let shot = Entity::projectile(
            Vec3::new(0.0, 0.05, 0.0),
            Vec3::Z,
            &Tuning::default().shots.primary,
            0.0,
        )
        .unwrap();
        assert!(ground.interact(&shot.view(), Vec3::ZERO));
        assert!(ground.self_check(1000.0));
    }

    #[test]
    fn test_exploded_projectile_is_disarmed() {
        let mut shot =
            Entity::projectile(Vec3::ZERO, Vec3::Z, &Tuning::default().shots.primary, 0.0).unwrap();
        assert_eq!(shot.view().warhead, Some(1.0));
        assert!(shot.self_check(100.0));
        assert_eq!(shot.view().warhead, None);
        assert_eq!(shot.direction(), Vec3::ZERO);
    }
}
