//! Fixed-capacity entity pool
//!
//! Slots are allocated once up front and recycled through their `active`
//! flag. Creation scans for the first free slot; destruction clears the flag.
//! Slot indices are stable, so an [`EntityId`] stays valid until the entity
//! is destroyed.

use glam::Vec2;

use super::entity::{EntityInstance, EntityKind, TemplateRegistry};
use crate::error::PoolError;

/// Handle to a pool slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) usize);

impl EntityId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Fixed-size slot array plus the template table instances point into
#[derive(Debug, Clone)]
pub struct EntityPool {
    slots: Vec<EntityInstance>,
    templates: TemplateRegistry,
}

impl EntityPool {
    pub fn new(capacity: usize, templates: TemplateRegistry) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, EntityInstance::vacant);
        Self { slots, templates }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub(crate) fn templates_mut(&mut self) -> &mut TemplateRegistry {
        &mut self.templates
    }

    /// Claim the first inactive slot and initialize it.
    ///
    /// Missing position/velocity default to zero. Fails with
    /// [`PoolError::Exhausted`] when every slot is active; the pool never grows.
    pub fn create(
        &mut self,
        kind: EntityKind,
        scale: f32,
        position: Option<Vec2>,
        velocity: Option<Vec2>,
        direction: f32,
    ) -> Result<EntityId, PoolError> {
        let template = self
            .templates
            .resolve(kind)
            .ok_or(PoolError::InvalidKind(kind))?;

        let capacity = self.slots.len();
        let (index, slot) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, slot)| !slot.active)
            .ok_or(PoolError::Exhausted { capacity })?;

        slot.kind = kind;
        slot.template = template;
        slot.active = true;
        slot.scale = scale;
        slot.position = position.unwrap_or(Vec2::ZERO);
        slot.velocity = velocity.unwrap_or(Vec2::ZERO);
        slot.direction = direction;
        slot.refresh_bounds();
        slot.refresh_transform();

        Ok(EntityId(index))
    }

    /// Free a slot. Destroying an inactive slot is a no-op.
    pub fn destroy(&mut self, id: EntityId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.active = false;
        }
    }

    /// Deactivate every slot
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.active = false;
        }
    }

    pub fn is_active(&self, id: EntityId) -> bool {
        self.slots.get(id.0).is_some_and(|slot| slot.active)
    }

    /// The instance behind `id`, if it is still active
    pub fn get(&self, id: EntityId) -> Option<&EntityInstance> {
        self.slots.get(id.0).filter(|slot| slot.active)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut EntityInstance> {
        self.slots.get_mut(id.0).filter(|slot| slot.active)
    }

    /// Active instances in slot order
    pub fn iter_active(&self) -> impl Iterator<Item = (EntityId, &EntityInstance)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.active)
            .map(|(index, slot)| (EntityId(index), slot))
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut EntityInstance)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| slot.active)
            .map(|(index, slot)| (EntityId(index), slot))
    }

    pub fn count_kind(&self, kind: EntityKind) -> usize {
        self.iter_active().filter(|(_, e)| e.kind == kind).count()
    }

    pub fn active_count(&self) -> usize {
        self.iter_active().count()
    }

    /// Start a cursor over active slots that tolerates destroys mid-walk
    pub fn cursor(&self) -> ActiveCursor {
        ActiveCursor { next: 0 }
    }
}

/// Slot-order walk over active entities that does not borrow the pool.
///
/// Each call to [`ActiveCursor::advance`] re-checks the `active` flag, so
/// entities destroyed after the cursor started are skipped when reached and
/// entities already visited are unaffected.
#[derive(Debug, Clone)]
pub struct ActiveCursor {
    next: usize,
}

impl ActiveCursor {
    pub fn advance(&mut self, pool: &EntityPool) -> Option<EntityId> {
        while self.next < pool.slots.len() {
            let index = self.next;
            self.next += 1;
            if pool.slots[index].active {
                return Some(EntityId(index));
            }
        }
        None
    }

    /// Like [`advance`](Self::advance), restricted to one kind
    pub fn advance_kind(&mut self, pool: &EntityPool, kind: EntityKind) -> Option<EntityId> {
        while let Some(id) = self.advance(pool) {
            if pool.slots[id.0].kind == kind {
                return Some(id);
            }
        }
        None
    }
}
