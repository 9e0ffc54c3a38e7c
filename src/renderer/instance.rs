//! Per-entity instance record for GPU upload

use bytemuck::{Pod, Zeroable};

use crate::sim::Entity;

/// One entity as the renderer sees it
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct EntityInstance {
    pub position: [f32; 3],
    pub radius: f32,
    /// Facing, zero when not moving
    pub direction: [f32; 3],
    /// Blast growth for exploding projectiles
    pub explosion: f32,
    /// Draw dispatch code (same numbering as save tags)
    pub kind: u32,
    pub _pad: [u32; 3],
}

impl EntityInstance {
    pub fn from_entity(entity: &Entity, now: f32) -> Self {
        Self {
            position: entity.position().to_array(),
            radius: entity.radius(),
            direction: entity.direction().to_array(),
            explosion: entity.explosion_progress(now),
            kind: entity.tag().code(),
            _pad: [0; 3],
        }
    }
}
