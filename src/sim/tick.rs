//! Fixed timestep simulation tick
//!
//! One tick runs five passes in a fixed order: collisions, zone effects,
//! spawning, integration, cleanup. Pool membership only changes at the end of
//! the spawn pass (new bodies appended) and in cleanup (inactive bodies
//! dropped), so every pass sees a stable body list.

use glam::Vec2;
use rand::Rng;

use super::body::{Body, BodyKind};
use super::collision::{reflect_velocity, resolve_pair};
use super::geometry::Aabb;
use super::state::{Phase, SimEvent, Simulation};
use super::zone::{TriggerAction, ZoneTag, apply_zone};
use crate::config::PhysicsConfig;
use crate::consts::VELOCITY_UNIT_MS;

impl Simulation {
    /// Advance by `dt` seconds. Does nothing once the run is over.
    pub fn advance(&mut self, dt: f32) {
        tick(self, dt);
    }
}

/// Advance the simulation by one fixed timestep
pub fn tick(sim: &mut Simulation, dt: f32) {
    if sim.phase == Phase::GameOver {
        return;
    }

    sim.tick += 1;
    sim.elapsed_ms += dt as f64 * 1000.0;

    collision_pass(sim);
    zone_pass(sim);
    spawn_pass(sim);
    integrate(sim, dt);
    cleanup(sim);
}

/// Every unordered pair of active bodies, lower id first
fn collision_pass(sim: &mut Simulation) {
    let params = sim.params;
    let bodies = &mut sim.bodies;

    for i in 0..bodies.len() {
        let (head, tail) = bodies.split_at_mut(i + 1);
        let a = &mut head[i];
        if !a.active {
            continue;
        }
        for b in tail.iter_mut().filter(|b| b.active) {
            resolve_pair(a, b, &params);
        }
    }
}

fn zone_pass(sim: &mut Simulation) {
    let first_event = sim.events.len();

    for tag in ZoneTag::PASS_ORDER {
        for zone in sim.zones.iter_mut().filter(|z| z.tag() == tag) {
            apply_zone(zone, &mut sim.bodies, sim.elapsed_ms, &mut sim.events);
        }
    }

    let fired: Vec<TriggerAction> = sim.events[first_event..]
        .iter()
        .filter_map(|event| match event {
            SimEvent::TriggerFired { action, .. } => Some(*action),
            _ => None,
        })
        .collect();
    for action in fired {
        run_trigger_action(sim, action);
    }
}

fn run_trigger_action(sim: &mut Simulation, action: TriggerAction) {
    match action {
        TriggerAction::EnableSpawner(id) => {
            if let Some(spawner) = sim.spawners.get_mut(id.0 as usize) {
                spawner.enable(sim.elapsed_ms);
            }
        }
        TriggerAction::DisableSpawner(id) => {
            if let Some(spawner) = sim.spawners.get_mut(id.0 as usize) {
                spawner.disable();
            }
        }
        // Handled by whoever drains the events
        TriggerAction::Signal(code) => log::info!("Trigger signal {}", code),
    }
}

fn spawn_pass(sim: &mut Simulation) {
    let mut emissions = Vec::new();

    for spawner in &mut sim.spawners {
        if let Some(mut emission) = spawner.update(sim.elapsed_ms) {
            let jitter = spawner.angle_jitter_degrees;
            if jitter > 0.0 {
                let offset = sim.rng.random_range(-jitter..=jitter);
                emission.velocity = spawner.velocity_at(spawner.angle_degrees + offset);
            }
            emissions.push(emission);
        }
    }

    for emission in emissions {
        let id = sim.spawn_puck(emission.kind, emission.position, emission.velocity, emission.mass);
        log::debug!(
            "Spawner {} emitted {:?} body {} at {:.0} ms",
            emission.spawner.0,
            emission.kind,
            id.0,
            sim.elapsed_ms
        );
        sim.events.push(SimEvent::Spawned {
            body: id,
            spawner: emission.spawner,
        });
    }
}

fn integrate(sim: &mut Simulation, dt: f32) {
    let physics = sim.config().physics.clone();
    let interior = sim.config().interior();
    let step = dt * 1000.0 / VELOCITY_UNIT_MS;

    for body in sim.bodies.iter_mut().filter(|b| b.active) {
        body.vel *= match body.kind {
            BodyKind::Block => physics.block_decay,
            _ => physics.ambient_decay,
        };
        body.pos += body.vel * step;
        contain(body, &interior);
        apply_rest_rules(body, &physics);
    }
}

/// Clamp a body inside the walls, bouncing it only if it is moving outward
fn contain(body: &mut Body, interior: &Aabb) {
    let extent = body.half_extents();
    let lo = interior.min + extent;
    let hi = interior.max - extent;

    if body.pos.x < lo.x {
        body.pos.x = lo.x;
        if body.vel.x < 0.0 {
            body.vel = reflect_velocity(body.vel, Vec2::X);
        }
    } else if body.pos.x > hi.x {
        body.pos.x = hi.x;
        if body.vel.x > 0.0 {
            body.vel = reflect_velocity(body.vel, Vec2::NEG_X);
        }
    }

    if body.pos.y < lo.y {
        body.pos.y = lo.y;
        if body.vel.y < 0.0 {
            body.vel = reflect_velocity(body.vel, Vec2::Y);
        }
    } else if body.pos.y > hi.y {
        body.pos.y = hi.y;
        if body.vel.y > 0.0 {
            body.vel = reflect_velocity(body.vel, Vec2::NEG_Y);
        }
    }
}

fn apply_rest_rules(body: &mut Body, physics: &PhysicsConfig) {
    let speed = body.speed();
    match body.kind {
        BodyKind::Puck => {
            if speed < physics.min_velocity {
                body.active = false;
            }
        }
        BodyKind::Settling | BodyKind::Block => {
            if speed < physics.min_velocity {
                body.vel = Vec2::ZERO;
            }
        }
        BodyKind::Shooter => {
            if speed < physics.shooter_convert_speed {
                body.kind = BodyKind::Puck;
                body.mass = physics.shooter_convert_mass;
            } else if speed < physics.shooter_heavy_speed {
                body.mass = physics.shooter_heavy_mass;
            }
        }
    }
}

fn cleanup(sim: &mut Simulation) {
    sim.bodies.retain(|b| b.active);

    if sim.count(BodyKind::Puck) > 0 {
        return;
    }

    sim.lives = sim.lives.saturating_sub(1);
    log::info!("Life lost at tick {}, {} remaining", sim.tick, sim.lives);
    sim.events.push(SimEvent::LifeLost { remaining: sim.lives });

    if sim.lives > 0 {
        sim.reset();
    } else {
        sim.phase = Phase::GameOver;
        sim.events.push(SimEvent::GameOver);
        log::info!("Game over after {} ticks ({:.1} s)", sim.tick, sim.elapsed_ms / 1000.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BodyConfig, RectConfig, SimConfig, SpawnerConfig, ZoneConfig};
    use crate::consts::*;
    use crate::sim::body::BodyId;
    use crate::sim::spawner::SpawnerId;
    use proptest::prelude::*;

    /// Empty field with a single regular puck
    fn bare_config(vx: f32, vy: f32) -> SimConfig {
        SimConfig {
            starting_bodies: vec![BodyConfig {
                x: 400.0,
                y: 300.0,
                vx,
                vy,
                ..BodyConfig::default()
            }],
            zones: Vec::new(),
            spawners: Vec::new(),
            ..SimConfig::default()
        }
    }

    fn sim_with(config: SimConfig) -> Simulation {
        Simulation::new(config).unwrap()
    }

    #[test]
    fn test_determinism() {
        let mut config = SimConfig::default();
        for spawner in &mut config.spawners {
            spawner.angle_jitter_degrees = 15.0;
        }
        config.seed = 99999;

        let mut sim1 = sim_with(config.clone());
        let mut sim2 = sim_with(config);
        for _ in 0..3000 {
            sim1.advance(SIM_DT);
            sim2.advance(SIM_DT);
        }

        assert_eq!(sim1.tick, sim2.tick);
        assert_eq!(sim1.snapshot(), sim2.snapshot());
        assert_eq!(sim1.drain_events(), sim2.drain_events());
    }

    #[test]
    fn test_game_over_is_terminal() {
        // A puck at rest dies on the first tick, costing a life every tick
        let mut sim = sim_with(bare_config(0.0, 0.0));
        for _ in 0..MAX_LIVES {
            sim.advance(SIM_DT);
        }
        assert_eq!(sim.phase, Phase::GameOver);
        assert_eq!(sim.lives, 0);

        let events = sim.drain_events();
        let lost = events.iter().filter(|e| matches!(e, SimEvent::LifeLost { .. })).count();
        assert_eq!(lost, MAX_LIVES as usize);
        assert_eq!(events.last(), Some(&SimEvent::GameOver));

        let tick = sim.tick;
        sim.advance(SIM_DT);
        assert_eq!(sim.tick, tick);
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_life_lost_resets_population() {
        let mut sim = sim_with(bare_config(0.0, 0.0));
        let first = sim.bodies[0].id;
        sim.advance(SIM_DT);

        assert_eq!(sim.lives, MAX_LIVES - 1);
        assert_eq!(sim.phase, Phase::Running);
        assert_eq!(sim.bodies.len(), 1);
        assert_ne!(sim.bodies[0].id, first);
        assert_eq!(sim.bodies[0].pos, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_settling_stays_regular_dies() {
        let mut config = bare_config(200.0, 0.0);
        config.starting_bodies.push(BodyConfig {
            kind: BodyKind::Settling,
            x: 200.0,
            y: 200.0,
            vx: 1.0,
            ..BodyConfig::default()
        });
        config.starting_bodies.push(BodyConfig {
            x: 200.0,
            y: 400.0,
            vx: 1.0,
            ..BodyConfig::default()
        });
        let mut sim = sim_with(config);
        sim.advance(SIM_DT);

        assert_eq!(sim.count(BodyKind::Settling), 1);
        assert_eq!(sim.count(BodyKind::Puck), 1);
        let settled = sim.bodies.iter().find(|b| b.kind == BodyKind::Settling).unwrap();
        assert_eq!(settled.vel, Vec2::ZERO);
    }

    #[test]
    fn test_shooter_gets_heavy_then_converts() {
        let mut config = bare_config(200.0, 0.0);
        config.starting_bodies.push(BodyConfig {
            kind: BodyKind::Shooter,
            x: 200.0,
            y: 200.0,
            vy: 15.0,
            mass: 72.0,
            ..BodyConfig::default()
        });
        let mut sim = sim_with(config);
        let shooter = sim.bodies[1].id;

        sim.advance(SIM_DT);
        let body = sim.body(shooter).unwrap();
        assert_eq!(body.kind, BodyKind::Shooter);
        assert_eq!(body.mass, SHOOTER_HEAVY_MASS);

        // 15 * 0.991^n drops below 12 after 25 ticks
        for _ in 0..30 {
            sim.advance(SIM_DT);
        }
        let body = sim.body(shooter).unwrap();
        assert_eq!(body.kind, BodyKind::Puck);
        assert_eq!(body.mass, SHOOTER_CONVERT_MASS);
    }

    #[test]
    fn test_wall_reflects_only_outward_motion() {
        let mut sim = sim_with(bare_config(200.0, 0.0));
        sim.bodies[0].pos = Vec2::new(785.0, 300.0);
        sim.advance(SIM_DT);

        let body = &sim.bodies[0];
        assert_eq!(body.pos.x, 792.0 - PUCK_RADIUS);
        assert!(body.vel.x < 0.0);

        // Already heading back in: clamped but not flipped again
        sim.bodies[0].pos = Vec2::new(790.0, 300.0);
        sim.bodies[0].vel = Vec2::new(-5.0, 0.0);
        sim.advance(SIM_DT);
        assert!(sim.bodies[0].vel.x < 0.0);
        assert_eq!(sim.bodies[0].pos.x, 792.0 - PUCK_RADIUS);
    }

    #[test]
    fn test_friction_runs_after_boost() {
        let rect = RectConfig::new(300.0, 200.0, 200.0, 200.0);
        let mut config = bare_config(10.0, 0.0);
        config.zones = vec![
            ZoneConfig::Friction {
                rect,
                coefficient: 0.5,
                threshold: None,
            },
            ZoneConfig::Booster {
                rect,
                magnitude: 100.0,
                threshold: None,
            },
        ];
        let mut sim = sim_with(config);
        sim.advance(SIM_DT);

        let expected = (10.0 + 100.0) * 0.5 * AMBIENT_DECAY;
        assert!((sim.bodies[0].vel.x - expected).abs() < 1e-3);
    }

    #[test]
    fn test_trigger_enables_spawner_same_tick() {
        let mut config = bare_config(50.0, 0.0);
        config.spawners = vec![SpawnerConfig {
            x: 200.0,
            y: 200.0,
            kind: BodyKind::Settling,
            enabled: false,
            ..SpawnerConfig::default()
        }];
        config.zones = vec![ZoneConfig::Trigger {
            rect: RectConfig::new(350.0, 250.0, 100.0, 100.0),
            delay_ticks: 0,
            action: TriggerAction::EnableSpawner(SpawnerId(0)),
            threshold: None,
        }];
        let mut sim = sim_with(config);
        sim.advance(SIM_DT);

        let events = sim.drain_events();
        assert!(matches!(events[0], SimEvent::TriggerFired { .. }));
        assert!(matches!(events[1], SimEvent::Spawned { spawner: SpawnerId(0), .. }));
        assert_eq!(sim.count(BodyKind::Settling), 1);
    }

    #[test]
    fn test_spawned_ids_follow_spawner_order() {
        let mut config = bare_config(50.0, 0.0);
        config.spawners = vec![
            SpawnerConfig {
                x: 100.0,
                y: 100.0,
                kind: BodyKind::Settling,
                ..SpawnerConfig::default()
            },
            SpawnerConfig {
                x: 600.0,
                y: 100.0,
                kind: BodyKind::Settling,
                ..SpawnerConfig::default()
            },
        ];
        let mut sim = sim_with(config);
        sim.advance(SIM_DT);

        let spawned: Vec<(BodyId, SpawnerId)> = sim
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                SimEvent::Spawned { body, spawner } => Some((body, spawner)),
                _ => None,
            })
            .collect();
        assert_eq!(spawned.len(), 2);
        assert!(spawned[0].0 < spawned[1].0);
        assert_eq!(spawned[0].1, SpawnerId(0));
        assert!(sim.bodies.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_block_slides_and_stops() {
        let mut config = bare_config(50.0, 0.0);
        config.blocks.push(crate::config::BlockConfig {
            x: 200.0,
            y: 150.0,
            vx: 1.5,
            ..Default::default()
        });
        let mut sim = sim_with(config);
        // 1.5 * 0.998^n drops below 1.33 after about 60 ticks
        for _ in 0..70 {
            sim.advance(SIM_DT);
        }
        let block = sim.bodies.iter().find(|b| b.kind == BodyKind::Block).unwrap();
        assert!(block.active);
        assert_eq!(block.vel, Vec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_bodies_stay_inside_walls(
            starts in prop::collection::vec(
                ((20.0f32..780.0, 20.0f32..580.0), (-600.0f32..600.0, -600.0f32..600.0)),
                1..12,
            ),
            blocks in prop::collection::vec(
                ((40.0f32..760.0, 40.0f32..560.0), (8.0f32..64.0, 8.0f32..64.0), (-600.0f32..600.0, -600.0f32..600.0)),
                0..4,
            ),
            ticks in 1usize..240,
        ) {
            let mut config = bare_config(300.0, 300.0);
            config.starting_bodies.extend(starts.iter().map(|&((x, y), (vx, vy))| BodyConfig {
                kind: BodyKind::Settling,
                x,
                y,
                vx,
                vy,
                ..BodyConfig::default()
            }));
            config.blocks.extend(blocks.iter().map(|&((x, y), (width, height), (vx, vy))| crate::config::BlockConfig {
                x,
                y,
                width,
                height,
                vx,
                vy,
                ..Default::default()
            }));
            let mut sim = sim_with(config);
            let interior = sim.config().interior();

            for _ in 0..ticks {
                sim.advance(SIM_DT);
                for body in sim.bodies.iter().filter(|b| b.active) {
                    let ext = body.half_extents();
                    prop_assert!(body.pos.x >= interior.min.x + ext.x - 1e-3);
                    prop_assert!(body.pos.x <= interior.max.x - ext.x + 1e-3);
                    prop_assert!(body.pos.y >= interior.min.y + ext.y - 1e-3);
                    prop_assert!(body.pos.y <= interior.max.y - ext.y + 1e-3);
                }
            }
        }
    }
}
