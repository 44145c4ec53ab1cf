//! Test doubles shared by the simulation tests

use super::entity::{EntityKind, EntityTemplate, TemplateRegistry};
use super::random::RandomSource;
use crate::presentation::TextureHandle;

/// Registry with a template for every kind; handle = template index
pub fn full_registry() -> TemplateRegistry {
    let mut registry = TemplateRegistry::new();
    for (i, kind) in EntityKind::ALL.into_iter().enumerate() {
        registry.insert(EntityTemplate {
            kind,
            texture: TextureHandle(i as u64),
        });
    }
    registry
}

/// Replays a fixed list of values, cycling when exhausted
pub struct ScriptedRandom {
    values: Vec<f32>,
    next: usize,
}

impl ScriptedRandom {
    pub fn new(values: &[f32]) -> Self {
        Self {
            values: values.to_vec(),
            next: 0,
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}
