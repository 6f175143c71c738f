//! Timed body spawners
//!
//! A spawner waits an initial delay after being armed, emits once, then emits
//! again every cooldown. Time comes in explicitly as elapsed milliseconds so
//! spawners never read a global clock.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::BodyKind;
use crate::angle_to_velocity;

/// Slack on elapsed-time comparisons so exact cadences land on their tick
const TIME_EPSILON_MS: f64 = 1e-6;

/// Spawner identifier (index into the simulation's spawner list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SpawnerId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnerPhase {
    /// Armed at `armed_at_ms`, first emission after the initial delay
    AwaitingInitial { armed_at_ms: f64 },
    /// Emitted at `last_spawn_ms`, next emission after the cooldown
    Cooldown { last_spawn_ms: f64 },
}

/// A body a spawner wants created this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emission {
    pub spawner: SpawnerId,
    pub kind: BodyKind,
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    pub id: SpawnerId,
    pub position: Vec2,
    pub speed_x: f32,
    pub speed_y: f32,
    pub mass: f32,
    pub angle_degrees: f32,
    /// Random spread either side of `angle_degrees`
    pub angle_jitter_degrees: f32,
    pub cooldown_ms: f64,
    pub initial_delay_ms: f64,
    pub kind: BodyKind,
    pub enabled: bool,
    /// Enabled flag restored on reset
    pub enabled_at_start: bool,
    phase: SpawnerPhase,
}

impl Spawner {
    pub fn new(id: SpawnerId, position: Vec2, kind: BodyKind) -> Self {
        Self {
            id,
            position,
            speed_x: 0.0,
            speed_y: 0.0,
            mass: crate::consts::PUCK_MASS,
            angle_degrees: 0.0,
            angle_jitter_degrees: 0.0,
            cooldown_ms: 0.0,
            initial_delay_ms: 0.0,
            kind,
            enabled: true,
            enabled_at_start: true,
            phase: SpawnerPhase::AwaitingInitial { armed_at_ms: 0.0 },
        }
    }

    pub fn phase(&self) -> SpawnerPhase {
        self.phase
    }

    /// Launch velocity at a heading, scaled per axis
    pub fn velocity_at(&self, angle_degrees: f32) -> Vec2 {
        angle_to_velocity(self.speed_x, self.speed_y, angle_degrees)
    }

    /// Advance to `elapsed_ms`, returning at most one emission.
    pub fn update(&mut self, elapsed_ms: f64) -> Option<Emission> {
        if !self.enabled {
            return None;
        }

        let due = match self.phase {
            SpawnerPhase::AwaitingInitial { armed_at_ms } => {
                elapsed_ms - armed_at_ms + TIME_EPSILON_MS >= self.initial_delay_ms
            }
            SpawnerPhase::Cooldown { last_spawn_ms } => {
                elapsed_ms - last_spawn_ms + TIME_EPSILON_MS >= self.cooldown_ms
            }
        };
        if !due {
            return None;
        }

        self.phase = SpawnerPhase::Cooldown {
            last_spawn_ms: elapsed_ms,
        };
        Some(Emission {
            spawner: self.id,
            kind: self.kind,
            position: self.position,
            velocity: self.velocity_at(self.angle_degrees),
            mass: self.mass,
        })
    }

    /// Re-arm: the initial delay counts from `elapsed_ms`
    pub fn reset(&mut self, elapsed_ms: f64) {
        self.enabled = self.enabled_at_start;
        self.phase = SpawnerPhase::AwaitingInitial {
            armed_at_ms: elapsed_ms,
        };
    }

    /// Turn the spawner on. A spawner that was off starts its initial delay now.
    pub fn enable(&mut self, elapsed_ms: f64) {
        if !self.enabled {
            self.enabled = true;
            self.phase = SpawnerPhase::AwaitingInitial {
                armed_at_ms: elapsed_ms,
            };
        }
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }
}
