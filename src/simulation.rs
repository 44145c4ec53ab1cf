//! Host-facing facade
//!
//! Wraps the tick pipeline with the load/initialize/step/shutdown lifecycle
//! a game loop drives. The host owns the renderer and input device and feeds
//! them in through [`Presenter`] and [`InputSnapshot`].

use crate::error::LoadError;
use crate::presentation::{Frame, Hud, Presenter, Sprite};
use crate::sim::{
    EntityKind, EntityPool, EntityTemplate, InputSnapshot, Phase, RandomSource, SimulationState,
    TemplateRegistry, TickEnv, WorldBounds, tick,
};
use crate::tuning::Tuning;

/// A loaded game, ready to be initialized and stepped
pub struct Simulation<R: RandomSource> {
    state: SimulationState,
    tuning: Tuning,
    bounds: WorldBounds,
    rng: R,
}

impl<R: RandomSource> Simulation<R> {
    /// Ask the presenter for every template and allocate the entity pool.
    ///
    /// The tuning is validated before the presenter is touched. Templates
    /// already handed out are released again if a later one fails.
    pub fn load(
        presenter: &mut impl Presenter,
        tuning: Tuning,
        bounds: WorldBounds,
        rng: R,
    ) -> Result<Self, LoadError> {
        tuning.validate()?;

        let mut templates = TemplateRegistry::new();
        for kind in EntityKind::ALL {
            match presenter.load_template(kind) {
                Ok(texture) => {
                    templates.insert(EntityTemplate { kind, texture });
                }
                Err(reason) => {
                    for template in templates.drain() {
                        presenter.release_template(template.texture);
                    }
                    return Err(LoadError::Template { kind, reason });
                }
            }
        }
        log::info!(
            "Loaded {} templates, pool capacity {}",
            templates.len(),
            tuning.pool_capacity
        );

        let state = SimulationState::new(&tuning, templates);
        Ok(Self {
            state,
            tuning,
            bounds,
            rng,
        })
    }

    /// Start (or restart) a run: empty pool, full lives, ship at the origin
    pub fn initialize(&mut self) {
        self.state.reset(&self.tuning);
        log::info!("Simulation initialized ({} lives)", self.state.lives);
    }

    /// Advance one tick and report what to draw
    pub fn step(&mut self, dt: f32, input: &InputSnapshot) -> Frame {
        let mut env = TickEnv {
            tuning: &self.tuning,
            bounds: self.bounds,
            rng: &mut self.rng,
        };
        let events = tick(&mut self.state, input, dt, &mut env);

        let mut frame = self.frame();
        frame.events = events;
        frame
    }

    /// Drawable view of the current state (no events)
    pub fn frame(&self) -> Frame {
        let pool = &self.state.pool;
        let sprites = pool
            .iter_active()
            .filter_map(|(id, entity)| {
                let template = pool.templates().get(entity.template)?;
                Some(Sprite {
                    id,
                    kind: entity.kind,
                    texture: template.texture,
                    transform: entity.transform,
                })
            })
            .collect();

        Frame {
            sprites,
            hud: self.hud(),
            events: Vec::new(),
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            lives: self.state.lives,
            score: self.state.score,
        }
    }

    /// Hand every template back to the presenter and empty the pool
    pub fn shutdown(&mut self, presenter: &mut impl Presenter) {
        let pool = &mut self.state.pool;
        pool.clear();
        let mut released = 0;
        for template in pool.templates_mut().drain() {
            presenter.release_template(template.texture);
            released += 1;
        }
        log::info!("Simulation shut down, released {released} templates");
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// The host should call [`initialize`](Self::initialize) again
    pub fn restart_pending(&self) -> bool {
        self.state.phase == Phase::RestartPending
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn pool(&self) -> &EntityPool {
        &self.state.pool
    }

    pub fn pool_mut(&mut self) -> &mut EntityPool {
        &mut self.state.pool
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }
}
