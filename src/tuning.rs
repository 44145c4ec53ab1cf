//! Data-driven game balance
//!
//! Defaults mirror [`crate::consts`]. A JSON file may override any subset of
//! fields; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::TuningError;

/// Gameplay tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Pool ===
    pub pool_capacity: usize,

    // === Ship ===
    pub initial_lives: u32,
    pub ship_size: f32,
    pub ship_accel_forward: f32,
    pub ship_accel_backward: f32,
    /// Radians per second
    pub ship_turn_rate: f32,
    /// Per-tick velocity multiplier in (0, 1]
    pub ship_damping: f32,

    // === Bullets ===
    /// World units per tick
    pub bullet_speed: f32,
    pub bullet_size: f32,

    // === Asteroids ===
    pub asteroid_size: f32,
    /// World units per tick
    pub asteroid_speed: f32,
    /// Seconds between spawn attempts
    pub spawn_interval: f32,
    pub asteroid_budget: u32,

    // === Scoring / end of game ===
    pub milestone_score: u64,
    /// Elapsed game-over seconds at which each banner appears
    pub banner_thresholds: [f32; 4],
    /// Game-over seconds that must pass before confirm is accepted
    pub restart_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            pool_capacity: POOL_CAPACITY,

            initial_lives: SHIP_INITIAL_LIVES,
            ship_size: SHIP_SIZE,
            ship_accel_forward: SHIP_ACCEL_FORWARD,
            ship_accel_backward: SHIP_ACCEL_BACKWARD,
            ship_turn_rate: SHIP_TURN_RATE,
            ship_damping: SHIP_DAMPING,

            bullet_speed: BULLET_SPEED,
            bullet_size: BULLET_SIZE,

            asteroid_size: ASTEROID_SIZE,
            asteroid_speed: ASTEROID_SPEED,
            spawn_interval: ASTEROID_SPAWN_INTERVAL,
            asteroid_budget: ASTEROID_BUDGET,

            milestone_score: MILESTONE_SCORE,
            banner_thresholds: BANNER_THRESHOLDS,
            restart_delay: 0.0,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read tuning from a JSON file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Using default tuning ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(TuningError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }

        if self.pool_capacity == 0 {
            return Err(TuningError::Invalid {
                field: "pool_capacity",
                reason: "must hold at least one entity".to_string(),
            });
        }

        positive("ship_size", self.ship_size)?;
        positive("ship_accel_forward", self.ship_accel_forward)?;
        positive("ship_accel_backward", self.ship_accel_backward)?;
        positive("ship_turn_rate", self.ship_turn_rate)?;
        positive("bullet_speed", self.bullet_speed)?;
        positive("bullet_size", self.bullet_size)?;
        positive("asteroid_size", self.asteroid_size)?;
        positive("asteroid_speed", self.asteroid_speed)?;
        positive("spawn_interval", self.spawn_interval)?;

        if !(self.ship_damping > 0.0 && self.ship_damping <= 1.0) {
            return Err(TuningError::Invalid {
                field: "ship_damping",
                reason: format!("must lie in (0, 1], got {}", self.ship_damping),
            });
        }

        if self.restart_delay < 0.0 || !self.restart_delay.is_finite() {
            return Err(TuningError::Invalid {
                field: "restart_delay",
                reason: format!("must be non-negative, got {}", self.restart_delay),
            });
        }

        let t = &self.banner_thresholds;
        if t[0] < 0.0 || t.windows(2).any(|w| w[0] >= w[1]) {
            return Err(TuningError::Invalid {
                field: "banner_thresholds",
                reason: format!("must be non-negative and strictly increasing, got {t:?}"),
            });
        }

        Ok(())
    }
}
