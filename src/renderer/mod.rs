//! Renderer boundary
//!
//! The simulation does not draw. It hands the renderer a [`FrameSnapshot`]:
//! one GPU-ready instance record per live entity plus camera parameters.

pub mod camera;
pub mod instance;

pub use camera::CameraParams;
pub use instance::EntityInstance;

use crate::sim::{GameState, Scoreboard};

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub instances: Vec<EntityInstance>,
    /// Absent only when the world has no player
    pub camera: Option<CameraParams>,
    pub scoreboard: Scoreboard,
}

impl FrameSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let now = state.now();
        let instances = state
            .entities
            .iter()
            .map(|e| EntityInstance::from_entity(e, now))
            .collect();
        Self {
            instances,
            camera: state.player().and_then(CameraParams::from_player),
            scoreboard: state.scoreboard(),
        }
    }

    /// Raw bytes for an instance buffer upload
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}
