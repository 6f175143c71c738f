//! Puck Sandbox headless driver
//!
//! Runs the simulation with a fixed-step accumulator at a nominal 60 Hz frame
//! rate until the run ends or the frame cap is hit, then prints the final
//! snapshot as JSON.
//!
//! Usage: `puck-sandbox [config.json]`

#[cfg(not(target_arch = "wasm32"))]
use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use puck_sandbox::consts::*;
#[cfg(not(target_arch = "wasm32"))]
use puck_sandbox::sim::{SimEvent, Simulation, kinetic_energy};
#[cfg(not(target_arch = "wasm32"))]
use puck_sandbox::{ConfigResult, SimConfig};

/// Display frame time the driver pretends to render at
#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 1.0 / 60.0;
/// Ten minutes of frames
#[cfg(not(target_arch = "wasm32"))]
const MAX_FRAMES: u32 = 60 * 60 * 10;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
struct RunStats {
    spawned: u32,
    killed: u32,
    goals: u32,
    absorbed: u32,
    triggers: u32,
    lives_lost: u32,
}

#[cfg(not(target_arch = "wasm32"))]
impl RunStats {
    fn record(&mut self, event: &SimEvent) {
        match event {
            SimEvent::Spawned { .. } => self.spawned += 1,
            SimEvent::Killed { .. } => self.killed += 1,
            SimEvent::Goal { .. } => self.goals += 1,
            SimEvent::Absorbed { .. } => self.absorbed += 1,
            SimEvent::TriggerFired { .. } => self.triggers += 1,
            SimEvent::LifeLost { .. } => self.lives_lost += 1,
            SimEvent::GameOver => {}
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config() -> ConfigResult<SimConfig> {
    match std::env::args().nth(1) {
        Some(path) => SimConfig::load(path),
        None => {
            log::info!("No config given; using the default layout");
            Ok(SimConfig::default())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    log::info!("Puck Sandbox (headless) starting...");

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            log::error!("{}", err);
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut stats = RunStats::default();
    let mut accumulator = 0.0f32;
    let mut frames = 0;

    while frames < MAX_FRAMES && !sim.is_game_over() {
        accumulator += FRAME_DT;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            sim.advance(SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }

        for event in sim.drain_events() {
            stats.record(&event);
        }
        frames += 1;
    }

    log::info!(
        "Finished after {} frames, {} ticks ({:.1} s simulated), {} lives left, {} bodies with kinetic energy {:.1}",
        frames,
        sim.tick,
        sim.elapsed_ms / 1000.0,
        sim.lives,
        sim.bodies.len(),
        kinetic_energy(&sim.bodies)
    );
    log::info!("{:?}", stats);

    match serde_json::to_string_pretty(&sim.snapshot()) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: failed to encode snapshot: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives `Simulation::advance` itself
}
