//! Puck Sandbox - A bordered 2D arcade physics playground
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, zones, spawners, tick)
//! - `config`: Static simulation configuration (JSON, validated at construction)
//! - `error`: Configuration errors
//!
//! Windowing, input and drawing live outside this crate. A frame driver calls
//! [`sim::Simulation::advance`] once per step and renders from
//! [`sim::Simulation::snapshot`].

pub mod config;
pub mod error;
pub mod sim;

pub use config::SimConfig;
pub use error::{ConfigError, ConfigResult};
pub use sim::{Simulation, Snapshot};

use glam::Vec2;

/// Simulation defaults. Every value here can be overridden through [`SimConfig`].
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Velocities, impulses and bumper growth are measured per this much
    /// simulated time, so a speed of 1.0 moves one pixel every 120 ms
    pub const VELOCITY_UNIT_MS: f32 = 120.0;

    /// Playfield dimensions (pixels)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;
    /// Border thickness, one grid cell wide
    pub const BORDER_THICKNESS: f32 = 8.0;

    /// Puck defaults
    pub const PUCK_RADIUS: f32 = 6.0;
    pub const COLLISION_RADIUS: f32 = 5.0;
    pub const PUCK_MASS: f32 = 6.0;

    /// Velocity multiplier applied to every puck each tick
    pub const AMBIENT_DECAY: f32 = 0.991;
    /// Blocks slide further than pucks
    pub const BLOCK_DECAY: f32 = 0.998;
    /// Below this speed a puck is at rest
    pub const MIN_VELOCITY: f32 = 1.33;
    /// Shooters turn heavy below this speed...
    pub const SHOOTER_HEAVY_SPEED: f32 = 20.0;
    pub const SHOOTER_HEAVY_MASS: f32 = 24.0;
    /// ...and become regular pucks below this one
    pub const SHOOTER_CONVERT_SPEED: f32 = 12.0;
    pub const SHOOTER_CONVERT_MASS: f32 = 12.0;

    /// Fraction of the ideal elastic impulse actually exchanged
    pub const SLIPPERINESS: f32 = 0.9;
    /// Depenetration divisor: 2 fully separates, 4 is gentler
    pub const NUDGE_DIVISOR: f32 = 2.0;

    /// Lives before the run ends
    pub const MAX_LIVES: u32 = 10;

    /// Coverage thresholds per zone kind
    pub const FRICTION_THRESHOLD: f32 = 0.33;
    pub const BOOST_THRESHOLD: f32 = 0.71;
    pub const DIR_BOOST_THRESHOLD: f32 = 0.85;
    pub const KILL_THRESHOLD: f32 = 0.70;
    pub const GOAL_THRESHOLD: f32 = 0.99;
    pub const TRIGGER_THRESHOLD: f32 = 0.25;

    /// Frames a directional booster holds a puck before launching it
    pub const DIR_BOOST_DELAY_FRAMES: u32 = 4;

    /// Bumper defaults
    pub const BUMPER_TRIGGER_DISTANCE: f32 = 14.0;
    pub const BUMPER_IMPULSE: f32 = 45.0;
    pub const BUMPER_MIN_PUSH_SPEED: f32 = 10.0;
    pub const BUMPER_RESET_DELAY_MS: f64 = 2000.0;
}

/// Velocity for a spawn angle given per-axis speeds.
///
/// Angles are in degrees with screen coordinates (y down), so negative angles
/// point up: -90 is straight up, -180 is left.
#[inline]
pub fn angle_to_velocity(speed_x: f32, speed_y: f32, angle_degrees: f32) -> Vec2 {
    let theta = angle_degrees.to_radians();
    Vec2::new(speed_x * theta.cos(), speed_y * theta.sin())
}
