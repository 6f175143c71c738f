//! Static simulation configuration
//!
//! [`SimConfig`] describes a whole level: playfield, physics tunables, the
//! starting population, zones and spawners. It is read from JSON with
//! `#[serde(default)]` everywhere, so a file only needs the values it changes;
//! anything missing falls back to [`crate::consts`]. `SimConfig::default()` is
//! the stock layout: one puck, three settling spawners, four kill strips along
//! the edges and a bumper in the middle.
//!
//! The simulation reads its config once at construction. There is no reload.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::consts::*;
use crate::error::{ConfigError, ConfigResult};
use crate::sim::body::BodyKind;
use crate::sim::geometry::Aabb;
use crate::sim::spawner::{Spawner, SpawnerId};
use crate::sim::zone::{TriggerAction, Zone, ZoneId, ZoneKind};

/// Top-left anchored rectangle as written in config files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectConfig {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn to_aabb(&self) -> Aabb {
        Aabb::from_min_size(Vec2::new(self.x, self.y), Vec2::new(self.width, self.height))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldConfig {
    pub width: f32,
    pub height: f32,
    /// Wall thickness on every side
    pub border: f32,
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            border: BORDER_THICKNESS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub slipperiness: f32,
    pub nudge_divisor: f32,
    pub ambient_decay: f32,
    pub block_decay: f32,
    pub min_velocity: f32,
    pub shooter_heavy_speed: f32,
    pub shooter_heavy_mass: f32,
    pub shooter_convert_speed: f32,
    pub shooter_convert_mass: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            slipperiness: SLIPPERINESS,
            nudge_divisor: NUDGE_DIVISOR,
            ambient_decay: AMBIENT_DECAY,
            block_decay: BLOCK_DECAY,
            min_velocity: MIN_VELOCITY,
            shooter_heavy_speed: SHOOTER_HEAVY_SPEED,
            shooter_heavy_mass: SHOOTER_HEAVY_MASS,
            shooter_convert_speed: SHOOTER_CONVERT_SPEED,
            shooter_convert_mass: SHOOTER_CONVERT_MASS,
        }
    }
}

/// A circular body placed at reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub kind: BodyKind,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub mass: f32,
    pub radius: f32,
    pub collision_radius: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            kind: BodyKind::Puck,
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            mass: PUCK_MASS,
            radius: PUCK_RADIUS,
            collision_radius: COLLISION_RADIUS,
        }
    }
}

/// A rectangular block, centered on `(x, y)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub vx: f32,
    pub vy: f32,
    pub mass: f32,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 32.0,
            height: 32.0,
            vx: 0.0,
            vy: 0.0,
            mass: 24.0,
        }
    }
}

/// One zone. Optional fields fall back to the per-kind defaults in
/// [`crate::consts`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZoneConfig {
    Friction {
        rect: RectConfig,
        coefficient: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<f32>,
    },
    Booster {
        rect: RectConfig,
        magnitude: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<f32>,
    },
    DirectionalBooster {
        rect: RectConfig,
        magnitude: f32,
        angle_degrees: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        delay_frames: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<f32>,
    },
    Magnet {
        x: f32,
        y: f32,
        radius: f32,
        pull_speed: f32,
        velocity_cap: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        epsilon: Option<f32>,
    },
    Kill {
        rect: RectConfig,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<f32>,
    },
    Goal {
        rect: RectConfig,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<f32>,
    },
    Bumper {
        x: f32,
        y: f32,
        initial_radius: f32,
        target_radius: f32,
        growth_rate: f32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reset_delay_ms: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trigger_distance: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        impulse: Option<f32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_push_speed: Option<f32>,
    },
    Trigger {
        rect: RectConfig,
        delay_ticks: u32,
        action: TriggerAction,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<f32>,
    },
}

impl ZoneConfig {
    /// Build the runtime zone
    pub fn to_zone(&self, id: ZoneId) -> Zone {
        match self {
            ZoneConfig::Friction {
                rect,
                coefficient,
                threshold,
            } => {
                let mut zone = Zone::friction(id, rect.to_aabb(), *coefficient);
                if let (ZoneKind::Friction(friction), Some(t)) = (&mut zone.kind, threshold) {
                    friction.threshold = *t;
                }
                zone
            }
            ZoneConfig::Booster {
                rect,
                magnitude,
                threshold,
            } => {
                let mut zone = Zone::booster(id, rect.to_aabb(), *magnitude);
                if let (ZoneKind::Booster(booster), Some(t)) = (&mut zone.kind, threshold) {
                    booster.threshold = *t;
                }
                zone
            }
            ZoneConfig::DirectionalBooster {
                rect,
                magnitude,
                angle_degrees,
                delay_frames,
                threshold,
            } => {
                let mut zone = Zone::directional_booster(id, rect.to_aabb(), *magnitude, *angle_degrees);
                if let ZoneKind::DirectionalBooster(dir) = &mut zone.kind {
                    dir.delay_frames = delay_frames.unwrap_or(dir.delay_frames);
                    dir.threshold = threshold.unwrap_or(dir.threshold);
                }
                zone
            }
            ZoneConfig::Magnet {
                x,
                y,
                radius,
                pull_speed,
                velocity_cap,
                epsilon,
            } => {
                let mut zone = Zone::magnet(id, Vec2::new(*x, *y), *radius, *pull_speed, *velocity_cap);
                if let (ZoneKind::Magnet(magnet), Some(e)) = (&mut zone.kind, epsilon) {
                    magnet.epsilon = *e;
                }
                zone
            }
            ZoneConfig::Kill { rect, threshold } => {
                let mut zone = Zone::kill(id, rect.to_aabb());
                if let (ZoneKind::Kill(removal), Some(t)) = (&mut zone.kind, threshold) {
                    removal.threshold = *t;
                }
                zone
            }
            ZoneConfig::Goal { rect, threshold } => {
                let mut zone = Zone::goal(id, rect.to_aabb());
                if let (ZoneKind::Goal(removal), Some(t)) = (&mut zone.kind, threshold) {
                    removal.threshold = *t;
                }
                zone
            }
            ZoneConfig::Bumper {
                x,
                y,
                initial_radius,
                target_radius,
                growth_rate,
                reset_delay_ms,
                trigger_distance,
                impulse,
                min_push_speed,
            } => {
                let mut zone = Zone::bumper(id, Vec2::new(*x, *y), *initial_radius, *target_radius, *growth_rate);
                if let ZoneKind::Bumper(bumper) = &mut zone.kind {
                    bumper.reset_delay_ms = reset_delay_ms.unwrap_or(bumper.reset_delay_ms);
                    bumper.trigger_distance = trigger_distance.unwrap_or(bumper.trigger_distance);
                    bumper.impulse = impulse.unwrap_or(bumper.impulse);
                    bumper.min_push_speed = min_push_speed.unwrap_or(bumper.min_push_speed);
                }
                zone
            }
            ZoneConfig::Trigger {
                rect,
                delay_ticks,
                action,
                threshold,
            } => {
                let mut zone = Zone::trigger(id, rect.to_aabb(), *delay_ticks, *action);
                if let (ZoneKind::Trigger(trigger), Some(t)) = (&mut zone.kind, threshold) {
                    trigger.threshold = *t;
                }
                zone
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    pub x: f32,
    pub y: f32,
    pub kind: BodyKind,
    pub speed_x: f32,
    pub speed_y: f32,
    pub mass: f32,
    pub angle_degrees: f32,
    pub angle_jitter_degrees: f32,
    pub cooldown_ms: f64,
    pub initial_delay_ms: f64,
    /// Disabled spawners wait for a trigger zone to turn them on
    pub enabled: bool,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            kind: BodyKind::Puck,
            speed_x: 0.0,
            speed_y: 0.0,
            mass: PUCK_MASS,
            angle_degrees: 0.0,
            angle_jitter_degrees: 0.0,
            cooldown_ms: 1000.0,
            initial_delay_ms: 0.0,
            enabled: true,
        }
    }
}

impl SpawnerConfig {
    pub fn to_spawner(&self, id: SpawnerId) -> Spawner {
        let mut spawner = Spawner::new(id, Vec2::new(self.x, self.y), self.kind);
        spawner.speed_x = self.speed_x;
        spawner.speed_y = self.speed_y;
        spawner.mass = self.mass;
        spawner.angle_degrees = self.angle_degrees;
        spawner.angle_jitter_degrees = self.angle_jitter_degrees;
        spawner.cooldown_ms = self.cooldown_ms;
        spawner.initial_delay_ms = self.initial_delay_ms;
        spawner.enabled = self.enabled;
        spawner.enabled_at_start = self.enabled;
        spawner
    }
}

/// Full simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for spawner angle jitter
    pub seed: u64,
    pub lives: u32,
    pub playfield: PlayfieldConfig,
    pub physics: PhysicsConfig,
    pub starting_bodies: Vec<BodyConfig>,
    pub blocks: Vec<BlockConfig>,
    pub zones: Vec<ZoneConfig>,
    pub spawners: Vec<SpawnerConfig>,
}

impl Default for SimConfig {
    fn default() -> Self {
        let settling_spawner = |x: f32, y: f32, angle_degrees: f32, initial_delay_ms: f64| SpawnerConfig {
            x,
            y,
            kind: BodyKind::Settling,
            speed_x: 125.0,
            speed_y: 125.0,
            mass: PUCK_MASS,
            angle_degrees,
            initial_delay_ms,
            cooldown_ms: 2500.0,
            ..SpawnerConfig::default()
        };

        Self {
            seed: 0,
            lives: MAX_LIVES,
            playfield: PlayfieldConfig::default(),
            physics: PhysicsConfig::default(),
            starting_bodies: vec![BodyConfig {
                x: 135.0,
                y: 540.0,
                vx: 70.0,
                vy: -70.0,
                mass: 8.0,
                ..BodyConfig::default()
            }],
            blocks: Vec::new(),
            zones: vec![
                ZoneConfig::Kill {
                    rect: RectConfig::new(8.0, 8.0, 50.0, 584.0),
                    threshold: None,
                },
                ZoneConfig::Kill {
                    rect: RectConfig::new(742.0, 8.0, 50.0, 584.0),
                    threshold: None,
                },
                ZoneConfig::Kill {
                    rect: RectConfig::new(8.0, 8.0, 784.0, 50.0),
                    threshold: None,
                },
                ZoneConfig::Kill {
                    rect: RectConfig::new(8.0, 542.0, 784.0, 50.0),
                    threshold: None,
                },
                ZoneConfig::Bumper {
                    x: 390.0,
                    y: 300.0,
                    initial_radius: 12.0,
                    target_radius: 40.0,
                    growth_rate: 15.0,
                    reset_delay_ms: None,
                    trigger_distance: None,
                    impulse: None,
                    min_push_speed: None,
                },
            ],
            spawners: vec![
                settling_spawner(12.0, 87.0, 360.0, 3250.0),
                settling_spawner(12.0, 112.0, 360.0, 3000.0),
                settling_spawner(780.0, 580.0, -160.0, 2000.0),
            ],
        }
    }
}

fn check(ok: bool, field: impl FnOnce() -> String, reason: &str) -> ConfigResult<()> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::invalid(field(), reason))
    }
}

fn check_threshold(value: Option<f32>, field: impl FnOnce() -> String) -> ConfigResult<()> {
    match value {
        Some(t) => check(t.is_finite() && t > 0.0, field, "must be a positive number"),
        None => Ok(()),
    }
}

fn check_rect(rect: &RectConfig, field: impl Fn() -> String) -> ConfigResult<()> {
    check(
        rect.width > 0.0 && rect.height > 0.0,
        || format!("{}.rect", field()),
        "width and height must be positive",
    )
}

impl SimConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Check every value is in a range the simulation can run with
    pub fn validate(&self) -> ConfigResult<()> {
        check(self.lives > 0, || "lives".into(), "must be at least 1")?;

        let pf = &self.playfield;
        check(pf.border >= 0.0, || "playfield.border".into(), "must not be negative")?;
        check(
            pf.width > pf.border * 2.0 && pf.height > pf.border * 2.0,
            || "playfield".into(),
            "must be larger than its borders",
        )?;

        let ph = &self.physics;
        check(
            ph.slipperiness > 0.0 && ph.slipperiness <= 1.0,
            || "physics.slipperiness".into(),
            "must be in (0, 1]",
        )?;
        check(ph.nudge_divisor >= 1.0, || "physics.nudge_divisor".into(), "must be at least 1")?;
        for (name, decay) in [("ambient_decay", ph.ambient_decay), ("block_decay", ph.block_decay)] {
            check(decay > 0.0 && decay <= 1.0, || format!("physics.{name}"), "must be in (0, 1]")?;
        }
        check(ph.min_velocity >= 0.0, || "physics.min_velocity".into(), "must not be negative")?;
        check(
            ph.shooter_heavy_mass > 0.0 && ph.shooter_convert_mass > 0.0,
            || "physics.shooter_mass".into(),
            "must be positive",
        )?;

        // Every body has to fit between the walls
        let room = self.interior().size();
        let max_radius = room.min_element() * 0.5;

        for (i, body) in self.starting_bodies.iter().enumerate() {
            check(body.kind != BodyKind::Block, || format!("starting_bodies[{i}].kind"), "blocks go in 'blocks'")?;
            check(body.mass > 0.0, || format!("starting_bodies[{i}].mass"), "must be positive")?;
            check(
                body.radius > 0.0 && body.collision_radius > 0.0,
                || format!("starting_bodies[{i}].radius"),
                "radii must be positive",
            )?;
            check(
                body.radius <= max_radius && body.collision_radius <= max_radius,
                || format!("starting_bodies[{i}].radius"),
                "must fit inside the playfield",
            )?;
        }

        for (i, block) in self.blocks.iter().enumerate() {
            check(block.mass > 0.0, || format!("blocks[{i}].mass"), "must be positive")?;
            check(
                block.width > 0.0 && block.height > 0.0,
                || format!("blocks[{i}].size"),
                "width and height must be positive",
            )?;
            check(
                block.width <= room.x && block.height <= room.y,
                || format!("blocks[{i}].size"),
                "must fit inside the playfield",
            )?;
        }

        for (i, zone) in self.zones.iter().enumerate() {
            self.validate_zone(i, zone)?;
        }

        for (i, spawner) in self.spawners.iter().enumerate() {
            check(spawner.kind != BodyKind::Block, || format!("spawners[{i}].kind"), "cannot spawn blocks")?;
            check(spawner.mass > 0.0, || format!("spawners[{i}].mass"), "must be positive")?;
            check(spawner.cooldown_ms > 0.0, || format!("spawners[{i}].cooldown_ms"), "must be positive")?;
            check(
                spawner.initial_delay_ms >= 0.0 && spawner.angle_jitter_degrees >= 0.0,
                || format!("spawners[{i}]"),
                "delay and jitter must not be negative",
            )?;
        }

        Ok(())
    }

    fn validate_zone(&self, i: usize, zone: &ZoneConfig) -> ConfigResult<()> {
        let name = || format!("zones[{i}]");
        match zone {
            ZoneConfig::Friction {
                rect,
                coefficient,
                threshold,
            } => {
                check_rect(rect, name)?;
                check(
                    (0.0..=1.0).contains(coefficient),
                    || format!("zones[{i}].coefficient"),
                    "must be in [0, 1]",
                )?;
                check_threshold(*threshold, || format!("zones[{i}].threshold"))
            }
            ZoneConfig::Booster { rect, threshold, .. }
            | ZoneConfig::DirectionalBooster { rect, threshold, .. }
            | ZoneConfig::Kill { rect, threshold }
            | ZoneConfig::Goal { rect, threshold }
            | ZoneConfig::Trigger { rect, threshold, .. } => {
                check_rect(rect, name)?;
                check_threshold(*threshold, || format!("zones[{i}].threshold"))?;
                if let ZoneConfig::Trigger {
                    action: TriggerAction::EnableSpawner(id) | TriggerAction::DisableSpawner(id),
                    ..
                } = zone
                {
                    check(
                        (id.0 as usize) < self.spawners.len(),
                        || format!("zones[{i}].action"),
                        "refers to a spawner that does not exist",
                    )?;
                }
                Ok(())
            }
            ZoneConfig::Magnet {
                radius,
                pull_speed,
                velocity_cap,
                epsilon,
                ..
            } => {
                check(*radius > 0.0, || format!("zones[{i}].radius"), "must be positive")?;
                check(*pull_speed > 0.0, || format!("zones[{i}].pull_speed"), "must be positive")?;
                check(*velocity_cap >= 0.0, || format!("zones[{i}].velocity_cap"), "must not be negative")?;
                check(
                    epsilon.is_none_or(|e| e >= 0.0),
                    || format!("zones[{i}].epsilon"),
                    "must not be negative",
                )
            }
            ZoneConfig::Bumper {
                initial_radius,
                target_radius,
                growth_rate,
                ..
            } => {
                check(*initial_radius > 0.0, || format!("zones[{i}].initial_radius"), "must be positive")?;
                check(
                    target_radius >= initial_radius,
                    || format!("zones[{i}].target_radius"),
                    "must not be smaller than initial_radius",
                )?;
                check(*growth_rate > 0.0, || format!("zones[{i}].growth_rate"), "must be positive")
            }
        }
    }

    /// Runtime zones, ids in config order
    pub fn build_zones(&self) -> Vec<Zone> {
        self.zones
            .iter()
            .enumerate()
            .map(|(i, z)| z.to_zone(ZoneId(i as u32)))
            .collect()
    }

    /// Runtime spawners, ids in config order
    pub fn build_spawners(&self) -> Vec<Spawner> {
        self.spawners
            .iter()
            .enumerate()
            .map(|(i, s)| s.to_spawner(SpawnerId(i as u32)))
            .collect()
    }

    /// Rectangle bodies may move in
    pub fn interior(&self) -> Aabb {
        let pf = &self.playfield;
        Aabb {
            min: Vec2::splat(pf.border),
            max: Vec2::new(pf.width - pf.border, pf.height - pf.border),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::zone::ZoneArea;

    #[test]
    fn test_default_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lives, MAX_LIVES);
        assert_eq!(config.starting_bodies.len(), 1);
        assert_eq!(config.spawners.len(), 3);
        assert_eq!(config.build_zones().len(), 5);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = SimConfig::from_json(r#"{ "seed": 7, "physics": { "slipperiness": 0.5 } }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.physics.slipperiness, 0.5);
        assert_eq!(config.physics.ambient_decay, AMBIENT_DECAY);
        assert_eq!(config.playfield, PlayfieldConfig::default());
    }

    #[test]
    fn test_zone_json_uses_kind_tag() {
        let json = r#"{
            "zones": [
                { "kind": "friction", "rect": { "x": 0, "y": 0, "width": 50, "height": 50 }, "coefficient": 0.9 },
                { "kind": "magnet", "x": 300, "y": 400, "radius": 50, "pull_speed": 0.25, "velocity_cap": 10 },
                { "kind": "kill", "rect": { "x": 10, "y": 10, "width": 20, "height": 20 }, "threshold": 0.5 }
            ],
            "spawners": []
        }"#;
        let config = SimConfig::from_json(json).unwrap();
        let zones = config.build_zones();
        assert_eq!(zones.len(), 3);
        assert!(matches!(zones[1].area, ZoneArea::Circle { radius, .. } if radius == 50.0));
        let ZoneKind::Kill(kill) = &zones[2].kind else { panic!("expected kill zone") };
        assert_eq!(kill.threshold, 0.5);
        let ZoneKind::Friction(friction) = &zones[0].kind else { panic!("expected friction zone") };
        assert_eq!(friction.threshold, FRICTION_THRESHOLD);
    }

    #[test]
    fn test_invalid_values_name_the_field() {
        let mut config = SimConfig::default();
        config.physics.slipperiness = 1.5;
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "physics.slipperiness"),
            other => panic!("unexpected {:?}", other),
        }

        let mut config = SimConfig::default();
        config.zones.push(ZoneConfig::Trigger {
            rect: RectConfig::new(0.0, 0.0, 10.0, 10.0),
            delay_ticks: 0,
            action: TriggerAction::EnableSpawner(SpawnerId(9)),
            threshold: None,
        });
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "zones[5].action"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_oversized_bodies_are_rejected() {
        let mut config = SimConfig::default();
        config.starting_bodies[0].radius = 30000.0;
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "starting_bodies[0].radius"),
            other => panic!("unexpected {:?}", other),
        }
        assert!(crate::sim::Simulation::new(config).is_err());

        // Largest puck that still fits between the walls
        let mut config = SimConfig::default();
        config.starting_bodies[0].radius = 292.0;
        config.starting_bodies[0].collision_radius = 292.0;
        assert!(config.validate().is_ok());

        let mut config = SimConfig::default();
        config.blocks.push(BlockConfig {
            width: 900.0,
            ..BlockConfig::default()
        });
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "blocks[0].size"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(matches!(SimConfig::from_json("{ not json"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            SimConfig::from_json(r#"{ "zones": [ { "kind": "vortex" } ] }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("puck-sandbox-config-{}.json", std::process::id()));
        let mut config = SimConfig::default();
        config.seed = 42;
        config.save(&path).unwrap();
        let loaded = SimConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = SimConfig::load("/nonexistent/puck-sandbox.json");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_interior() {
        let interior = SimConfig::default().interior();
        assert_eq!(interior.min, Vec2::splat(8.0));
        assert_eq!(interior.max, Vec2::new(792.0, 592.0));
    }
}
