//! Simulation state and core types
//!
//! Everything that persists between ticks lives in [`SimulationState`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityKind, TemplateRegistry};
use super::pool::{EntityId, EntityPool};
use crate::consts::{WORLD_HALF_HEIGHT, WORLD_HALF_WIDTH};
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Ship is controllable, asteroids spawn
    Playing,
    /// Out of lives; banners appear in stages, waiting for confirm
    Ending,
    /// Confirm received; the host should re-initialize
    RestartPending,
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A bullet destroyed an asteroid
    AsteroidDestroyed,
    /// An asteroid hit the ship
    ShipHit { lives_left: u32 },
    /// Score reached the milestone
    Milestone { score: u64 },
    /// Lives ran out
    GameOver,
    /// A game-over banner stage appeared
    BannerShown { stage: u8 },
    /// Confirm received while the game was over
    RestartRequested,
}

/// Visible world rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl WorldBounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Bounds of a `width` x `height` window centered on the origin
    pub fn centered(width: f32, height: f32) -> Self {
        let half = Vec2::new(width, height) * 0.5;
        Self {
            min: -half,
            max: half,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self::centered(WORLD_HALF_WIDTH * 2.0, WORLD_HALF_HEIGHT * 2.0)
    }
}

/// Game-over sequencing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EndingTimer {
    /// Seconds since the game entered `Ending`
    pub elapsed: f32,
    /// Which banner stages have been spawned
    pub banners_spawned: [bool; 4],
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub pool: EntityPool,
    /// The ship's slot (set by initialize, never destroyed)
    pub ship: Option<EntityId>,
    pub lives: u32,
    pub score: u64,
    /// Seconds until the next spawn attempt
    pub spawn_timer: f32,
    /// Asteroids that may still be spawned
    pub asteroid_budget: u32,
    pub phase: Phase,
    pub ending: EndingTimer,
    /// Milestone already announced this run
    pub milestone_reached: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl SimulationState {
    /// Empty state with an allocated pool; no ship until [`reset`](Self::reset)
    pub fn new(tuning: &Tuning, templates: TemplateRegistry) -> Self {
        Self {
            pool: EntityPool::new(tuning.pool_capacity, templates),
            ship: None,
            lives: tuning.initial_lives,
            score: 0,
            spawn_timer: tuning.spawn_interval,
            asteroid_budget: tuning.asteroid_budget,
            phase: Phase::Playing,
            ending: EndingTimer::default(),
            milestone_reached: false,
            time_ticks: 0,
        }
    }

    /// Clear the pool, restore counters, and spawn the ship at the origin
    pub fn reset(&mut self, tuning: &Tuning) {
        self.pool.clear();
        self.lives = tuning.initial_lives;
        self.score = 0;
        self.spawn_timer = tuning.spawn_interval;
        self.asteroid_budget = tuning.asteroid_budget;
        self.phase = Phase::Playing;
        self.ending = EndingTimer::default();
        self.milestone_reached = false;
        self.time_ticks = 0;

        self.ship = match self
            .pool
            .create(EntityKind::Ship, tuning.ship_size, None, None, 0.0)
        {
            Ok(id) => Some(id),
            Err(e) => panic!("cannot spawn ship: {e}"),
        };
    }
}
