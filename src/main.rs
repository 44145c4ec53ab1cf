//! Asteroid Sweep entry point
//!
//! Headless driver: runs a scripted session against the simulation and
//! prints the final frame as JSON. Usage: `asteroid-sweep [tuning.json] [seed]`

use asteroid_sweep::presentation::{Presenter, TextureHandle};
use asteroid_sweep::sim::{EntityKind, InputSnapshot, Key, SimEvent, WorldBounds, seeded};
use asteroid_sweep::{Simulation, Tuning};

const TICK_RATE: f32 = 60.0;
const SESSION_TICKS: u32 = 60 * 30;

/// Hands out sequential handles and tracks how many are live
#[derive(Default)]
struct HeadlessPresenter {
    next: u64,
    live: usize,
}

impl Presenter for HeadlessPresenter {
    fn load_template(&mut self, kind: EntityKind) -> Result<TextureHandle, String> {
        self.next += 1;
        self.live += 1;
        log::debug!("Template {kind:?} -> handle {}", self.next);
        Ok(TextureHandle(self.next))
    }

    fn release_template(&mut self, handle: TextureHandle) {
        self.live = self.live.saturating_sub(1);
        log::debug!("Released handle {}", handle.0);
    }
}

/// Input for a given tick: steady left turn, thrust in bursts, fire every half second
fn scripted_input(tick: u32, confirm: bool) -> InputSnapshot {
    let mut input = InputSnapshot::new().with_held(Key::TurnLeft);
    if (tick / 90) % 2 == 0 {
        input.set_held(Key::ThrustForward, true);
    }
    if tick % 30 == 0 {
        input = input.with_pressed(Key::Fire);
    }
    if confirm {
        input = input.with_pressed(Key::Confirm);
    }
    input
}

fn main() {
    env_logger::init();
    log::info!("Asteroid Sweep (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);

    let mut presenter = HeadlessPresenter::default();
    let mut sim = match Simulation::load(&mut presenter, tuning, WorldBounds::default(), seeded(seed)) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Failed to load: {e}");
            std::process::exit(1);
        }
    };
    sim.initialize();

    let dt = 1.0 / TICK_RATE;
    let mut frame = sim.frame();
    let mut game_over_at = None;
    for tick in 0..SESSION_TICKS {
        // Confirm a few seconds after the banners start
        let confirm = game_over_at.is_some_and(|at| tick > at + 4 * TICK_RATE as u32);
        frame = sim.step(dt, &scripted_input(tick, confirm));

        for event in &frame.events {
            match event {
                SimEvent::GameOver => {
                    game_over_at = Some(tick);
                    log::info!("tick {tick}: {event:?}");
                }
                SimEvent::AsteroidDestroyed => log::debug!("tick {tick}: {event:?}"),
                _ => log::info!("tick {tick}: {event:?}"),
            }
        }

        if sim.restart_pending() {
            log::info!("tick {tick}: restarting");
            game_over_at = None;
            sim.initialize();
        }
    }

    println!("{}  {}", frame.hud.lives_text(), frame.hud.score_text());
    match serde_json::to_string_pretty(&frame) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize frame: {e}"),
    }

    sim.shutdown(&mut presenter);
    log::info!("Done ({} templates still live)", presenter.live);
}
