//! Presentation boundary
//!
//! The simulation never touches meshes or textures. A [`Presenter`] hands out
//! opaque [`TextureHandle`]s at load time and takes them back at shutdown;
//! each step produces a [`Frame`] it can draw.

use glam::Mat3;
use serde::{Deserialize, Serialize};

use crate::sim::{EntityId, EntityKind, SimEvent};

/// Opaque handle to renderer-owned geometry/texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub u64);

/// Renderer-side collaborator
pub trait Presenter {
    /// Create the renderable for one entity kind
    fn load_template(&mut self, kind: EntityKind) -> Result<TextureHandle, String>;

    /// Free a renderable previously returned by `load_template`
    fn release_template(&mut self, handle: TextureHandle);
}

/// One drawable entity
#[derive(Debug, Clone, Serialize)]
pub struct Sprite {
    #[serde(skip)]
    pub id: EntityId,
    pub kind: EntityKind,
    pub texture: TextureHandle,
    pub transform: Mat3,
}

/// Values shown as HUD text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub lives: u32,
    pub score: u64,
}

impl Hud {
    pub fn lives_text(&self) -> String {
        format!("Ship Left: {}", self.lives)
    }

    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }
}

/// Everything the renderer needs after one step
#[derive(Debug, Clone, Default, Serialize)]
pub struct Frame {
    pub sprites: Vec<Sprite>,
    pub hud: Hud,
    pub events: Vec<SimEvent>,
}
