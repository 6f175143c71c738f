//! Simulation context and core types
//!
//! [`Simulation`] owns every body, zone and spawner plus the clock, lives and
//! RNG. Bodies live in one list sorted by id; [`BodyKind`] says which pool a
//! body belongs to.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, BodyId, BodyKind};
use super::collision::CollisionParams;
use super::spawner::{Spawner, SpawnerId};
use super::zone::{TriggerAction, Zone, ZoneId};
use crate::config::SimConfig;
use crate::consts::*;
use crate::error::ConfigResult;

/// Run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Running,
    /// Lives exhausted; `advance` does nothing
    GameOver,
}

/// Things that happened during a tick, drained by the caller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Spawned { body: BodyId, spawner: SpawnerId },
    Killed { body: BodyId, zone: ZoneId },
    Goal { body: BodyId, zone: ZoneId },
    /// Pulled into a magnet's center
    Absorbed { body: BodyId, zone: ZoneId },
    TriggerFired { zone: ZoneId, action: TriggerAction },
    LifeLost { remaining: u32 },
    GameOver,
}

/// The whole simulation
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    pub(crate) params: CollisionParams,
    /// Every body, sorted by id
    pub bodies: Vec<Body>,
    pub zones: Vec<Zone>,
    pub spawners: Vec<Spawner>,
    pub lives: u32,
    /// Simulated time since construction
    pub elapsed_ms: f64,
    pub tick: u64,
    pub phase: Phase,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<SimEvent>,
    next_id: u32,
}

impl Simulation {
    /// Validate `config` and build a simulation at its starting population
    pub fn new(config: SimConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// The stock layout
    pub fn with_defaults() -> Self {
        Self::build(SimConfig::default())
    }

    fn build(config: SimConfig) -> Self {
        let mut sim = Self {
            params: CollisionParams {
                slipperiness: config.physics.slipperiness,
                nudge_divisor: config.physics.nudge_divisor,
            },
            bodies: Vec::new(),
            zones: config.build_zones(),
            spawners: config.build_spawners(),
            lives: config.lives,
            elapsed_ms: 0.0,
            tick: 0,
            phase: Phase::Running,
            rng: Pcg32::seed_from_u64(config.seed),
            events: Vec::new(),
            next_id: 1,
            config,
        };
        sim.reset();
        sim
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Restore the starting population. Lives, clock and RNG carry on.
    pub fn reset(&mut self) {
        self.bodies.clear();

        let starting = self.config.starting_bodies.clone();
        for b in &starting {
            self.spawn_circle(b.kind, Vec2::new(b.x, b.y), Vec2::new(b.vx, b.vy), b.mass, b.radius, b.collision_radius);
        }
        let blocks = self.config.blocks.clone();
        for b in &blocks {
            self.spawn_block(Vec2::new(b.x, b.y), Vec2::new(b.vx, b.vy), b.mass, Vec2::new(b.width, b.height));
        }

        for zone in &mut self.zones {
            zone.reset();
        }
        for spawner in &mut self.spawners {
            spawner.reset(self.elapsed_ms);
        }

        log::info!(
            "Reset at {:.0} ms: {} bodies, {} lives left",
            self.elapsed_ms,
            self.bodies.len(),
            self.lives
        );
    }

    /// Allocate a new body id
    pub fn next_body_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a circular body. Ids only grow, so pushing keeps the list sorted.
    pub fn spawn_circle(
        &mut self,
        kind: BodyKind,
        pos: Vec2,
        vel: Vec2,
        mass: f32,
        drawn_radius: f32,
        collision_radius: f32,
    ) -> BodyId {
        let id = self.next_body_id();
        self.bodies
            .push(Body::circle(id, kind, pos, vel, mass, drawn_radius, collision_radius));
        id
    }

    /// Add a puck-sized body
    pub fn spawn_puck(&mut self, kind: BodyKind, pos: Vec2, vel: Vec2, mass: f32) -> BodyId {
        self.spawn_circle(kind, pos, vel, mass, PUCK_RADIUS, COLLISION_RADIUS)
    }

    pub fn spawn_block(&mut self, pos: Vec2, vel: Vec2, mass: f32, size: Vec2) -> BodyId {
        let id = self.next_body_id();
        self.bodies.push(Body::block(id, pos, vel, mass, size));
        id
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &self.bodies[i])
    }

    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies
            .binary_search_by_key(&id, |b| b.id)
            .ok()
            .map(|i| &mut self.bodies[i])
    }

    /// Active bodies of one kind
    pub fn count(&self, kind: BodyKind) -> usize {
        self.bodies.iter().filter(|b| b.active && b.kind == kind).count()
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BlockConfig, BodyConfig};

    #[test]
    fn test_default_population() {
        let sim = Simulation::with_defaults();
        assert_eq!(sim.bodies.len(), 1);
        assert_eq!(sim.bodies[0].id, BodyId(1));
        assert_eq!(sim.bodies[0].pos, Vec2::new(135.0, 540.0));
        assert_eq!(sim.bodies[0].mass, 8.0);
        assert_eq!(sim.lives, MAX_LIVES);
        assert_eq!(sim.phase, Phase::Running);
        assert_eq!(sim.zones.len(), 5);
        assert_eq!(sim.spawners.len(), 3);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = SimConfig::default();
        config.lives = 0;
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut sim = Simulation::with_defaults();
        let first = sim.bodies[0].id;
        sim.reset();
        assert_eq!(sim.bodies.len(), 1);
        assert!(sim.bodies[0].id > first);

        let a = sim.spawn_puck(BodyKind::Puck, Vec2::new(200.0, 200.0), Vec2::ZERO, PUCK_MASS);
        let b = sim.spawn_puck(BodyKind::Settling, Vec2::new(220.0, 200.0), Vec2::ZERO, PUCK_MASS);
        assert!(b > a);
        assert!(sim.bodies.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(sim.body(b).map(|body| body.kind), Some(BodyKind::Settling));
    }

    #[test]
    fn test_reset_restores_blocks() {
        let mut config = SimConfig::default();
        config.starting_bodies.push(BodyConfig {
            kind: BodyKind::Settling,
            x: 300.0,
            y: 300.0,
            ..BodyConfig::default()
        });
        config.blocks.push(BlockConfig {
            x: 400.0,
            y: 200.0,
            ..BlockConfig::default()
        });
        let mut sim = Simulation::new(config).unwrap();
        assert_eq!(sim.count(BodyKind::Block), 1);
        assert_eq!(sim.count(BodyKind::Settling), 1);

        let block = sim.bodies.iter().find(|b| b.kind == BodyKind::Block).unwrap().id;
        if let Some(body) = sim.body_mut(block) {
            body.pos = Vec2::new(100.0, 100.0);
        }
        sim.reset();
        let block = sim.bodies.iter().find(|b| b.kind == BodyKind::Block).unwrap();
        assert_eq!(block.pos, Vec2::new(400.0, 200.0));
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut sim = Simulation::with_defaults();
        sim.events.push(SimEvent::GameOver);
        assert_eq!(sim.drain_events(), vec![SimEvent::GameOver]);
        assert!(sim.drain_events().is_empty());
    }
}
