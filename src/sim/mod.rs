//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Injected RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod input;
pub mod pool;
pub mod random;
pub mod state;
pub mod tick;

#[cfg(test)]
pub(crate) mod testing;

pub use collision::{Aabb, intersects};
pub use entity::{EntityInstance, EntityKind, EntityTemplate, TemplateId, TemplateRegistry};
pub use input::{InputSnapshot, Key};
pub use pool::{ActiveCursor, EntityId, EntityPool};
pub use random::{RandomSource, seeded};
pub use state::{EndingTimer, Phase, SimEvent, SimulationState, WorldBounds};
pub use tick::{TickEnv, tick};
