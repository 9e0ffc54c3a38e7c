//! Legacy text save format
//!
//! ```text
//! <time>
//! <count>
//! <tag>            0 player, 1 passive, 2 hostile, 3 projectile, 4 terrain, 5 boundary
//! <body>           px py pz / dx dy dz / radius speed
//! <kind fields>    see `write_kind`
//! ...
//! ```
//!
//! Line breaks are cosmetic; the reader only sees whitespace-separated
//! tokens. Booleans are written as `0`/`1`. Entity IDs are not stored.

use std::fmt;
use std::iter::Peekable;
use std::str::{FromStr, SplitWhitespace};

use glam::Vec3;

use super::PersistError;
use crate::sim::{
    Actor, Body, Camera, Entity, EntityKind, EntityTag, GameState, Hostile, Player, Projectile,
    Weapons,
};

/// Contents of a legacy save
#[derive(Debug, Clone, PartialEq)]
pub struct LegacySave {
    pub time: f32,
    /// Player first, then the rest in resolution order
    pub entities: Vec<Entity>,
}

/// Serialize `state` in collection order. The format requires the player to
/// lead, so any other first entity is rejected.
pub fn encode(state: &GameState) -> Result<String, PersistError> {
    match state.entities.first() {
        Some(entity) if entity.tag() == EntityTag::Player => Ok(LegacyText(state).to_string()),
        _ => Err(PersistError::MissingPlayer),
    }
}

struct LegacyText<'a>(&'a GameState);

impl fmt::Display for LegacyText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.0;
        writeln!(f, "{}", state.now())?;
        writeln!(f, "{}", state.entities.len())?;

        for entity in &state.entities {
            writeln!(f, "{}", entity.tag().code())?;
            write_body(f, entity.body())?;
            write_kind(f, &entity.kind)?;
        }
        Ok(())
    }
}

fn write_body(f: &mut fmt::Formatter<'_>, body: &Body) -> fmt::Result {
    let p = body.position;
    let d = body.direction;
    writeln!(f, "{} {} {}", p.x, p.y, p.z)?;
    writeln!(f, "{} {} {}", d.x, d.y, d.z)?;
    writeln!(f, "{} {}", body.radius, body.speed)
}

fn write_kind(f: &mut fmt::Formatter<'_>, kind: &EntityKind) -> fmt::Result {
    match kind {
        EntityKind::Player(p) => {
            writeln!(f, "{}", p.actor.hp)?;
            let c = &p.camera;
            writeln!(f, "{} {} {}", c.horizontal_angle, c.vertical_angle, c.fov)?;
            // One timer on disk: keep the later so no trigger fires early
            let next_fire = p.weapons.next_primary.max(p.weapons.next_secondary);
            writeln!(
                f,
                "{} {} {} {}",
                p.kills, p.mouse_speed, p.weapons.cooldown, next_fire
            )
        }
        EntityKind::Passive(a) => writeln!(f, "{}", a.hp),
        EntityKind::Hostile(h) => {
            writeln!(f, "{}", h.actor.hp)?;
            writeln!(f, "{} {}", h.cooldown, h.next_fire)
        }
        EntityKind::Projectile(p) => writeln!(
            f,
            "{} {} {} {} {} {} {}",
            p.damage,
            p.expires_at,
            u8::from(p.exploded),
            u8::from(p.pending_impact),
            p.exploded_at,
            p.explosion_speed,
            p.explosion_duration
        ),
        EntityKind::Terrain | EntityKind::Boundary => Ok(()),
    }
}

/// Parse and validate a legacy save
pub fn decode(text: &str) -> Result<LegacySave, PersistError> {
    let mut tokens = Tokens::new(text);
    let time = tokens.float("time")?;
    let declared: usize = tokens.next("count")?;

    let mut entities = Vec::with_capacity(declared.min(1024));
    for found in 0..declared {
        if tokens.at_end() {
            return Err(PersistError::CountMismatch { declared, found });
        }
        let entity = read_entity(&mut tokens)?;
        if found == 0 && entity.tag() != EntityTag::Player {
            return Err(PersistError::MissingPlayer);
        }
        entities.push(entity);
    }
    if entities.is_empty() {
        return Err(PersistError::MissingPlayer);
    }
    if let Some(extra) = tokens.remaining() {
        return Err(PersistError::TrailingData(extra));
    }

    Ok(LegacySave { time, entities })
}

fn read_entity(tokens: &mut Tokens<'_>) -> Result<Entity, PersistError> {
    let code: u32 = tokens.next("tag")?;
    let tag = EntityTag::from_code(code).ok_or(PersistError::UnknownTag(code))?;

    let body = Body::new(
        tokens.vec3("position")?,
        tokens.vec3("direction")?,
        tokens.float("radius")?,
        tokens.float("speed")?,
    )?;

    let kind = match tag {
        EntityTag::Player => {
            let actor = Actor::new(tokens.float("hp")?);
            let camera = Camera {
                horizontal_angle: tokens.float("horizontal_angle")?,
                vertical_angle: tokens.float("vertical_angle")?,
                fov: tokens.float("fov")?,
            };
            let kills = tokens.next("kills")?;
            let mouse_speed = tokens.float("mouse_speed")?;
            let cooldown = tokens.float("cooldown")?;
            let next_fire = tokens.float("next_fire")?;
            EntityKind::Player(Player {
                actor,
                camera,
                weapons: Weapons {
                    cooldown,
                    next_primary: next_fire,
                    next_secondary: next_fire,
                },
                mouse_speed,
                kills,
            })
        }
        EntityTag::Passive => EntityKind::Passive(Actor::new(tokens.float("hp")?)),
        EntityTag::Hostile => EntityKind::Hostile(Hostile {
            actor: Actor::new(tokens.float("hp")?),
            cooldown: tokens.float("cooldown")?,
            next_fire: tokens.float("next_fire")?,
        }),
        EntityTag::Projectile => EntityKind::Projectile(Projectile {
            damage: tokens.float("damage")?,
            expires_at: tokens.float("expires_at")?,
            exploded: tokens.flag("exploded")?,
            pending_impact: tokens.flag("pending_impact")?,
            exploded_at: tokens.float("exploded_at")?,
            explosion_speed: tokens.float("explosion_speed")?,
            explosion_duration: tokens.float("explosion_duration")?,
        }),
        EntityTag::Terrain => EntityKind::Terrain,
        EntityTag::Boundary => EntityKind::Boundary,
    };

    Ok(Entity::from_parts(body, kind)?)
}

struct Tokens<'a> {
    inner: Peekable<SplitWhitespace<'a>>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace().peekable(),
        }
    }

    fn at_end(&mut self) -> bool {
        self.inner.peek().is_none()
    }

    fn remaining(&mut self) -> Option<String> {
        let rest: Vec<&str> = self.inner.by_ref().collect();
        (!rest.is_empty()).then(|| rest.join(" "))
    }

    fn next<T: FromStr>(&mut self, field: &'static str) -> Result<T, PersistError> {
        let token = self
            .inner
            .next()
            .ok_or(PersistError::UnexpectedEof { field })?;
        token.parse().map_err(|_| PersistError::InvalidNumber {
            field,
            token: token.to_string(),
        })
    }

    /// Finite float
    fn float(&mut self, field: &'static str) -> Result<f32, PersistError> {
        let value: f32 = self.next(field)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(PersistError::InvalidNumber {
                field,
                token: value.to_string(),
            })
        }
    }

    /// Strict `0`/`1`
    fn flag(&mut self, field: &'static str) -> Result<bool, PersistError> {
        match self.next::<u8>(field)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(PersistError::InvalidNumber {
                field,
                token: other.to_string(),
            }),
        }
    }

    fn vec3(&mut self, field: &'static str) -> Result<Vec3, PersistError> {
        Ok(Vec3::new(
            self.float(field)?,
            self.float(field)?,
            self.float(field)?,
        ))
    }
}
