//! Asteroid Sweep - a deterministic Asteroids simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entity pool, swept collision, tick pipeline)
//! - `simulation`: Load/initialize/step/shutdown facade for a host driver
//! - `presentation`: Types handed to the renderer (sprites, HUD, texture handles)
//! - `tuning`: Data-driven game balance
//! - `error`: Error types crossing the crate boundary

pub mod error;
pub mod presentation;
pub mod sim;
pub mod simulation;
pub mod tuning;

pub use error::{LoadError, PoolError, TuningError};
pub use presentation::{Frame, Hud, Presenter, Sprite, TextureHandle};
pub use simulation::Simulation;
pub use tuning::Tuning;

use glam::Vec2;

/// Reference game constants (the defaults behind [`Tuning`])
pub mod consts {
    use std::f32::consts::PI;

    /// Entity pool capacity
    pub const POOL_CAPACITY: usize = 2048;

    /// Ship defaults
    pub const SHIP_INITIAL_LIVES: u32 = 3;
    pub const SHIP_SIZE: f32 = 60.0;
    /// Forward acceleration (world units/s²)
    pub const SHIP_ACCEL_FORWARD: f32 = 1.5;
    /// Backward acceleration (world units/s²)
    pub const SHIP_ACCEL_BACKWARD: f32 = 3.0;
    /// Turn rate (radians per second)
    pub const SHIP_TURN_RATE: f32 = 2.0 * PI;
    /// Velocity multiplier applied every tick
    pub const SHIP_DAMPING: f32 = 0.99;

    /// Bullet defaults (speed is per tick, not per second)
    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_SIZE: f32 = 15.0;

    /// Asteroid defaults (speed is per tick, not per second)
    pub const ASTEROID_SIZE: f32 = 100.0;
    pub const ASTEROID_SPEED: f32 = 1.0;
    /// Seconds between spawn attempts
    pub const ASTEROID_SPAWN_INTERVAL: f32 = 1.0;
    /// Asteroids that may be spawned before any are destroyed
    pub const ASTEROID_BUDGET: u32 = 10;

    /// Score at which the milestone event fires
    pub const MILESTONE_SCORE: u64 = 5000;

    /// Seconds after game over at which each banner stage appears
    pub const BANNER_THRESHOLDS: [f32; 4] = [0.5, 1.0, 2.0, 3.0];

    /// Default world bounds (a 1280x720 window centered on the origin)
    pub const WORLD_HALF_WIDTH: f32 = 640.0;
    pub const WORLD_HALF_HEIGHT: f32 = 360.0;
}

/// Wrap an angle to (-π, π]
///
/// Closed form, so arbitrarily large angles still take constant time.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// Wrap a scalar toroidally into [lo, hi]
///
/// A value past one end re-enters from the other, however many spans it
/// overshoots by.
#[inline]
pub fn wrap_scalar(value: f32, lo: f32, hi: f32) -> f32 {
    if (lo..=hi).contains(&value) {
        return value;
    }
    let span = hi - lo;
    lo + (value - lo).rem_euclid(span)
}

/// Unit vector pointing along `angle`
#[inline]
pub fn unit_vector(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
