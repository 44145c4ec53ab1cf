//! Entity kinds, templates, and the per-slot instance record

use glam::{Mat3, Vec2};
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::presentation::TextureHandle;

/// Number of game-over banner stages
pub const BANNER_STAGES: u8 = 4;

/// What an entity is. Drives update and collision rules in the tick pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Ship,
    Bullet,
    Asteroid,
    /// Staged game-over banner (stages 1..=4)
    GameOverBanner(u8),
}

impl EntityKind {
    /// Every kind that has a template, in template-table order
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Ship,
        EntityKind::Bullet,
        EntityKind::Asteroid,
        EntityKind::GameOverBanner(1),
        EntityKind::GameOverBanner(2),
        EntityKind::GameOverBanner(3),
        EntityKind::GameOverBanner(4),
    ];

    /// Position in the template table, `None` for a banner stage outside 1..=4
    pub fn template_index(self) -> Option<usize> {
        match self {
            EntityKind::Ship => Some(0),
            EntityKind::Bullet => Some(1),
            EntityKind::Asteroid => Some(2),
            EntityKind::GameOverBanner(stage) if (1..=BANNER_STAGES).contains(&stage) => {
                Some(2 + stage as usize)
            }
            EntityKind::GameOverBanner(_) => None,
        }
    }
}

/// Shared renderable data for one kind. Immutable once loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTemplate {
    pub kind: EntityKind,
    pub texture: TextureHandle,
}

/// Index into a [`TemplateRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub(crate) usize);

/// Templates for every kind, indexed by [`EntityKind::template_index`]
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: Vec<Option<EntityTemplate>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self {
            templates: vec![None; EntityKind::ALL.len()],
        }
    }

    /// Register (or replace) the template for `template.kind`.
    /// Returns `false` if the kind has no slot in the table.
    pub fn insert(&mut self, template: EntityTemplate) -> bool {
        match template.kind.template_index() {
            Some(index) => {
                self.templates[index] = Some(template);
                true
            }
            None => false,
        }
    }

    /// Resolve a kind to its loaded template
    pub fn resolve(&self, kind: EntityKind) -> Option<TemplateId> {
        let index = kind.template_index()?;
        self.templates
            .get(index)
            .and_then(Option::as_ref)
            .map(|_| TemplateId(index))
    }

    pub fn get(&self, id: TemplateId) -> Option<&EntityTemplate> {
        self.templates.get(id.0).and_then(Option::as_ref)
    }

    /// Remove every template, yielding them for release
    pub fn drain(&mut self) -> impl Iterator<Item = EntityTemplate> + '_ {
        self.templates.iter_mut().filter_map(Option::take)
    }

    pub fn len(&self) -> usize {
        self.templates.iter().filter(|t| t.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One pool slot. Fields are only meaningful while `active` is set.
#[derive(Debug, Clone)]
pub struct EntityInstance {
    pub kind: EntityKind,
    pub template: TemplateId,
    pub active: bool,
    /// Uniform size multiplier (side length of the bounding square)
    pub scale: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Facing angle in radians, kept in (-π, π]
    pub direction: f32,
    /// Derived from position and scale each tick
    pub bounding_box: Aabb,
    /// Scale, then rotate, then translate. Presentation only.
    pub transform: Mat3,
}

impl EntityInstance {
    pub(crate) fn vacant() -> Self {
        Self {
            kind: EntityKind::Ship,
            template: TemplateId(0),
            active: false,
            scale: 1.0,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            direction: 0.0,
            bounding_box: Aabb::default(),
            transform: Mat3::IDENTITY,
        }
    }

    /// Recompute the bounding box from the current position and scale
    #[inline]
    pub fn refresh_bounds(&mut self) {
        self.bounding_box = Aabb::from_center(self.position, self.scale);
    }

    /// Recompute the presentation transform
    #[inline]
    pub fn refresh_transform(&mut self) {
        self.transform =
            Mat3::from_scale_angle_translation(Vec2::splat(self.scale), self.direction, self.position);
    }
}
