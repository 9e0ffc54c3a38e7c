//! Player-derived camera parameters

use glam::{Mat4, Vec3};

use crate::consts::MAX_DISTANCE;
use crate::sim::Entity;

/// Eye, orientation and lens for view/projection construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    pub eye: Vec3,
    pub forward: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near plane sits at the player's hull
    pub near: f32,
    pub far: f32,
}

impl CameraParams {
    /// Camera of a player entity, `None` for anything else
    pub fn from_player(entity: &Entity) -> Option<Self> {
        let player = entity.as_player()?;
        Some(Self {
            eye: entity.position(),
            forward: player.camera.forward(),
            up: player.camera.up(),
            fov: player.camera.fov,
            near: entity.radius(),
            far: MAX_DISTANCE,
        })
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.eye + self.forward, self.up)
    }

    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::PlayerTuning;

    #[test]
    fn test_only_players_have_cameras() {
        let player = Entity::player(Vec3::ZERO, &PlayerTuning::default(), 0.0).unwrap();
        let dummy = Entity::passive(Vec3::ZERO, Vec3::ZERO, 1.0, 1.0).unwrap();
        assert!(CameraParams::from_player(&player).is_some());
        assert!(CameraParams::from_player(&dummy).is_none());
    }

    #[test]
    fn test_view_looks_down_forward() {
        let player = Entity::player(Vec3::new(0.0, 2.0, 0.0), &PlayerTuning::default(), 0.0).unwrap();
        let camera = CameraParams::from_player(&player).unwrap();
        // A point straight ahead lands on the view axis (-Z in view space)
        let ahead = camera.view().transform_point3(Vec3::new(0.0, 2.0, 10.0));
        assert!(ahead.x.abs() < 1e-4 && ahead.y.abs() < 1e-4);
        assert!((ahead.z + 10.0).abs() < 1e-4);
    }
}
