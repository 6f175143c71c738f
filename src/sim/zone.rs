//! Static effect zones
//!
//! Every zone kind is one variant of [`ZoneKind`] carrying its own parameters
//! and runtime state. [`apply_zone`] runs a whole pass for one zone: per-zone
//! bookkeeping, [`apply_effect`] for each active puck, then per-zone work that
//! needs every body at once (magnet pull, trigger countdown).
//!
//! Activation is graduated: a body's bounding square is intersected with the
//! zone rectangle and divided by the body's circle area, and each kind
//! compares that ratio against its own threshold.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::body::{Body, BodyId};
use super::geometry::{Aabb, coverage_ratio, coverage_reaches};
use super::spawner::SpawnerId;
use super::state::SimEvent;
use crate::consts::*;

/// Zone identifier (index into the simulation's zone list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub u32);

/// Region covered by a zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ZoneArea {
    Rect(Aabb),
    Circle { center: Vec2, radius: f32 },
}

impl ZoneArea {
    /// Rectangle used for coverage tests
    pub fn bounds(&self) -> Aabb {
        match *self {
            ZoneArea::Rect(rect) => rect,
            ZoneArea::Circle { center, radius } => Aabb::from_center_size(center, Vec2::splat(radius * 2.0)),
        }
    }

    pub fn center(&self) -> Vec2 {
        match *self {
            ZoneArea::Rect(rect) => rect.center(),
            ZoneArea::Circle { center, .. } => center,
        }
    }
}

/// Scales velocity down every tick a puck sits in the zone
#[derive(Debug, Clone, PartialEq)]
pub struct Friction {
    pub coefficient: f32,
    pub threshold: f32,
}

impl Friction {
    pub fn new(coefficient: f32) -> Self {
        Self {
            coefficient,
            threshold: FRICTION_THRESHOLD,
        }
    }
}

/// Adds speed along the current heading, once per puck
#[derive(Debug, Clone, PartialEq)]
pub struct Booster {
    pub magnitude: f32,
    pub threshold: f32,
    boosted: BTreeSet<BodyId>,
}

impl Booster {
    pub fn new(magnitude: f32) -> Self {
        Self {
            magnitude,
            threshold: BOOST_THRESHOLD,
            boosted: BTreeSet::new(),
        }
    }

    pub fn has_boosted(&self, id: BodyId) -> bool {
        self.boosted.contains(&id)
    }
}

/// Holds a puck for a few frames, then launches it at a fixed heading
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalBooster {
    pub magnitude: f32,
    pub angle_degrees: f32,
    pub delay_frames: u32,
    pub threshold: f32,
    /// Frames each waiting puck has spent in the zone
    waiting: BTreeMap<BodyId, u32>,
    boosted: BTreeSet<BodyId>,
}

impl DirectionalBooster {
    pub fn new(magnitude: f32, angle_degrees: f32) -> Self {
        Self {
            magnitude,
            angle_degrees,
            delay_frames: DIR_BOOST_DELAY_FRAMES,
            threshold: DIR_BOOST_THRESHOLD,
            waiting: BTreeMap::new(),
            boosted: BTreeSet::new(),
        }
    }

    pub fn has_boosted(&self, id: BodyId) -> bool {
        self.boosted.contains(&id)
    }
}

/// Velocity a held puck creeps at, fast enough to not count as resting
const DIR_BOOST_CREEP: Vec2 = Vec2::ONE;

/// Captures pucks and drags them to the center, where they are absorbed
#[derive(Debug, Clone, PartialEq)]
pub struct Magnet {
    /// Maximum distance moved toward the center per tick
    pub pull_speed: f32,
    /// Speed limit for captured pucks
    pub velocity_cap: f32,
    /// Absorb distance from the center
    pub epsilon: f32,
    captured: BTreeSet<BodyId>,
}

impl Magnet {
    pub fn new(pull_speed: f32, velocity_cap: f32) -> Self {
        Self {
            pull_speed,
            velocity_cap,
            epsilon: 0.01,
            captured: BTreeSet::new(),
        }
    }

    pub fn is_captured(&self, id: BodyId) -> bool {
        self.captured.contains(&id)
    }

    pub fn captured_count(&self) -> usize {
        self.captured.len()
    }
}

/// Kill and goal zones: remove a puck once enough of it is inside
#[derive(Debug, Clone, PartialEq)]
pub struct Removal {
    pub threshold: f32,
}

/// Bumper growth cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BumperPhase {
    Idle,
    Growing { since_ms: f64 },
    /// At full size, waiting to snap back
    Holding { since_ms: f64 },
}

/// Circular bumper that grows when something comes close and shoves pucks away
#[derive(Debug, Clone, PartialEq)]
pub struct Bumper {
    pub initial_radius: f32,
    pub target_radius: f32,
    /// Growth in pixels per [`VELOCITY_UNIT_MS`]
    pub growth_rate: f32,
    pub reset_delay_ms: f64,
    pub trigger_distance: f32,
    pub impulse: f32,
    /// Speed given to a resting puck instead of the impulse
    pub min_push_speed: f32,
    radius: f32,
    phase: BumperPhase,
}

impl Bumper {
    pub fn new(initial_radius: f32, target_radius: f32, growth_rate: f32) -> Self {
        Self {
            initial_radius,
            target_radius,
            growth_rate,
            reset_delay_ms: BUMPER_RESET_DELAY_MS,
            trigger_distance: BUMPER_TRIGGER_DISTANCE,
            impulse: BUMPER_IMPULSE,
            min_push_speed: BUMPER_MIN_PUSH_SPEED,
            radius: initial_radius,
            phase: BumperPhase::Idle,
        }
    }

    /// Current radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn phase(&self) -> BumperPhase {
        self.phase
    }

    /// Advance the growth cycle to `elapsed_ms`
    fn update(&mut self, elapsed_ms: f64) {
        match self.phase {
            BumperPhase::Idle => self.radius = self.initial_radius,
            BumperPhase::Growing { since_ms } => {
                let units = ((elapsed_ms - since_ms) / VELOCITY_UNIT_MS as f64) as f32;
                self.radius = self.initial_radius + self.growth_rate * units;
                if self.radius >= self.target_radius {
                    self.radius = self.target_radius;
                    self.phase = BumperPhase::Holding { since_ms: elapsed_ms };
                }
            }
            BumperPhase::Holding { since_ms } => {
                if elapsed_ms - since_ms >= self.reset_delay_ms {
                    self.radius = self.initial_radius;
                    self.phase = BumperPhase::Idle;
                }
            }
        }
    }

    fn trigger(&mut self, elapsed_ms: f64) {
        if self.phase == BumperPhase::Idle {
            self.phase = BumperPhase::Growing { since_ms: elapsed_ms };
        }
    }
}

/// What a trigger zone does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerAction {
    EnableSpawner(SpawnerId),
    DisableSpawner(SpawnerId),
    /// Opaque event for the screen-flow layer (level transitions etc.)
    Signal(u32),
}

/// Trigger countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerPhase {
    Waiting,
    Armed { remaining: u32 },
    Fired,
}

/// Fires its action once, a fixed number of ticks after a puck first covers it
#[derive(Debug, Clone, PartialEq)]
pub struct Trigger {
    pub threshold: f32,
    pub delay_ticks: u32,
    pub action: TriggerAction,
    phase: TriggerPhase,
}

impl Trigger {
    pub fn new(delay_ticks: u32, action: TriggerAction) -> Self {
        Self {
            threshold: TRIGGER_THRESHOLD,
            delay_ticks,
            action,
            phase: TriggerPhase::Waiting,
        }
    }

    pub fn phase(&self) -> TriggerPhase {
        self.phase
    }
}

/// Closed set of zone kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneKind {
    Friction(Friction),
    Booster(Booster),
    DirectionalBooster(DirectionalBooster),
    Magnet(Magnet),
    Kill(Removal),
    Goal(Removal),
    Bumper(Bumper),
    Trigger(Trigger),
}

/// Plain tag for a zone kind (rendering style, pass ordering)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneTag {
    Friction,
    Booster,
    DirectionalBooster,
    Magnet,
    Kill,
    Goal,
    Bumper,
    Trigger,
}

impl ZoneTag {
    /// Order zone passes run in each tick. Friction comes after the boosters
    /// so a stacked friction zone eats into a fresh boost.
    pub const PASS_ORDER: [ZoneTag; 8] = [
        ZoneTag::Kill,
        ZoneTag::Goal,
        ZoneTag::Booster,
        ZoneTag::DirectionalBooster,
        ZoneTag::Magnet,
        ZoneTag::Friction,
        ZoneTag::Bumper,
        ZoneTag::Trigger,
    ];
}

impl ZoneKind {
    pub fn tag(&self) -> ZoneTag {
        match self {
            ZoneKind::Friction(_) => ZoneTag::Friction,
            ZoneKind::Booster(_) => ZoneTag::Booster,
            ZoneKind::DirectionalBooster(_) => ZoneTag::DirectionalBooster,
            ZoneKind::Magnet(_) => ZoneTag::Magnet,
            ZoneKind::Kill(_) => ZoneTag::Kill,
            ZoneKind::Goal(_) => ZoneTag::Goal,
            ZoneKind::Bumper(_) => ZoneTag::Bumper,
            ZoneKind::Trigger(_) => ZoneTag::Trigger,
        }
    }
}

/// A static zone
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub id: ZoneId,
    pub area: ZoneArea,
    pub kind: ZoneKind,
}

impl Zone {
    pub fn new(id: ZoneId, area: ZoneArea, kind: ZoneKind) -> Self {
        Self { id, area, kind }
    }

    pub fn friction(id: ZoneId, rect: Aabb, coefficient: f32) -> Self {
        Self::new(id, ZoneArea::Rect(rect), ZoneKind::Friction(Friction::new(coefficient)))
    }

    pub fn booster(id: ZoneId, rect: Aabb, magnitude: f32) -> Self {
        Self::new(id, ZoneArea::Rect(rect), ZoneKind::Booster(Booster::new(magnitude)))
    }

    pub fn directional_booster(id: ZoneId, rect: Aabb, magnitude: f32, angle_degrees: f32) -> Self {
        Self::new(
            id,
            ZoneArea::Rect(rect),
            ZoneKind::DirectionalBooster(DirectionalBooster::new(magnitude, angle_degrees)),
        )
    }

    pub fn magnet(id: ZoneId, center: Vec2, radius: f32, pull_speed: f32, velocity_cap: f32) -> Self {
        Self::new(
            id,
            ZoneArea::Circle { center, radius },
            ZoneKind::Magnet(Magnet::new(pull_speed, velocity_cap)),
        )
    }

    pub fn kill(id: ZoneId, rect: Aabb) -> Self {
        Self::new(id, ZoneArea::Rect(rect), ZoneKind::Kill(Removal { threshold: KILL_THRESHOLD }))
    }

    pub fn goal(id: ZoneId, rect: Aabb) -> Self {
        Self::new(id, ZoneArea::Rect(rect), ZoneKind::Goal(Removal { threshold: GOAL_THRESHOLD }))
    }

    pub fn bumper(id: ZoneId, center: Vec2, initial_radius: f32, target_radius: f32, growth_rate: f32) -> Self {
        Self::new(
            id,
            ZoneArea::Circle {
                center,
                radius: initial_radius,
            },
            ZoneKind::Bumper(Bumper::new(initial_radius, target_radius, growth_rate)),
        )
    }

    pub fn trigger(id: ZoneId, rect: Aabb, delay_ticks: u32, action: TriggerAction) -> Self {
        Self::new(id, ZoneArea::Rect(rect), ZoneKind::Trigger(Trigger::new(delay_ticks, action)))
    }

    pub fn tag(&self) -> ZoneTag {
        self.kind.tag()
    }

    /// Current area, with a bumper's live radius
    pub fn current_area(&self) -> ZoneArea {
        match (&self.kind, self.area) {
            (ZoneKind::Bumper(bumper), ZoneArea::Circle { center, .. }) => ZoneArea::Circle {
                center,
                radius: bumper.radius,
            },
            (_, area) => area,
        }
    }

    /// Forget every membership, countdown and growth cycle
    pub fn reset(&mut self) {
        match &mut self.kind {
            ZoneKind::Booster(booster) => booster.boosted.clear(),
            ZoneKind::DirectionalBooster(dir) => {
                dir.waiting.clear();
                dir.boosted.clear();
            }
            ZoneKind::Magnet(magnet) => magnet.captured.clear(),
            ZoneKind::Bumper(bumper) => {
                bumper.radius = bumper.initial_radius;
                bumper.phase = BumperPhase::Idle;
            }
            ZoneKind::Trigger(trigger) => trigger.phase = TriggerPhase::Waiting,
            ZoneKind::Friction(_) | ZoneKind::Kill(_) | ZoneKind::Goal(_) => {}
        }
    }
}

/// Run one zone over every active puck.
///
/// `bodies` must be sorted by id.
pub fn apply_zone(zone: &mut Zone, bodies: &mut [Body], elapsed_ms: f64, events: &mut Vec<SimEvent>) {
    if let ZoneKind::Bumper(bumper) = &mut zone.kind {
        bumper.update(elapsed_ms);
    }

    for body in bodies.iter_mut().filter(|b| b.active && b.is_circle()) {
        apply_effect(zone, body, elapsed_ms, events);
    }

    let Zone { id, area, kind } = zone;
    match kind {
        ZoneKind::Booster(booster) => booster.boosted.retain(|&b| is_live(bodies, b)),
        ZoneKind::DirectionalBooster(dir) => {
            dir.waiting.retain(|&b, _| is_live(bodies, b));
            dir.boosted.retain(|&b| is_live(bodies, b));
        }
        ZoneKind::Magnet(magnet) => pull_captured(*id, area.center(), magnet, bodies, events),
        ZoneKind::Trigger(trigger) => tick_trigger(*id, trigger, events),
        _ => {}
    }
}

/// Whether `id` is still an active body
fn is_live(bodies: &[Body], id: BodyId) -> bool {
    bodies
        .binary_search_by_key(&id, |b| b.id)
        .is_ok_and(|i| bodies[i].active)
}

/// Apply a zone's per-body effect
pub fn apply_effect(zone: &mut Zone, body: &mut Body, elapsed_ms: f64, events: &mut Vec<SimEvent>) {
    let coverage = coverage_ratio(body.pos, body.drawn_radius, &zone.area.bounds());
    let center = zone.area.center();

    match &mut zone.kind {
        ZoneKind::Friction(friction) => {
            if coverage_reaches(coverage, friction.threshold) {
                body.vel *= friction.coefficient;
            }
        }

        ZoneKind::Booster(booster) => {
            if booster.boosted.contains(&body.id) || !coverage_reaches(coverage, booster.threshold) {
                return;
            }
            let speed = body.speed();
            // No heading to boost along; try again next tick
            if speed == 0.0 {
                return;
            }
            body.vel += body.vel / speed * booster.magnitude;
            booster.boosted.insert(body.id);
            log::debug!("zone {} boosted body {}", zone.id.0, body.id.0);
        }

        ZoneKind::DirectionalBooster(dir) => {
            if dir.boosted.contains(&body.id) || !coverage_reaches(coverage, dir.threshold) {
                return;
            }
            let frames = dir.waiting.entry(body.id).or_insert(0);
            if *frames >= dir.delay_frames {
                let theta = dir.angle_degrees.to_radians();
                body.vel = Vec2::new(theta.cos(), theta.sin()) * dir.magnitude;
                dir.waiting.remove(&body.id);
                dir.boosted.insert(body.id);
                log::debug!("zone {} launched body {}", zone.id.0, body.id.0);
            } else {
                body.vel = DIR_BOOST_CREEP;
                *frames += 1;
            }
        }

        ZoneKind::Magnet(magnet) => {
            let ZoneArea::Circle { radius, .. } = zone.area else {
                return;
            };
            if !magnet.captured.contains(&body.id) && body.pos.distance(center) <= radius + body.drawn_radius {
                magnet.captured.insert(body.id);
                log::debug!("zone {} captured body {}", zone.id.0, body.id.0);
            }
        }

        ZoneKind::Kill(removal) => {
            if coverage_reaches(coverage, removal.threshold) {
                body.active = false;
                log::debug!("zone {} killed body {}", zone.id.0, body.id.0);
                events.push(SimEvent::Killed {
                    body: body.id,
                    zone: zone.id,
                });
            }
        }

        ZoneKind::Goal(removal) => {
            if coverage_reaches(coverage, removal.threshold) {
                body.active = false;
                log::debug!("zone {} scored body {}", zone.id.0, body.id.0);
                events.push(SimEvent::Goal {
                    body: body.id,
                    zone: zone.id,
                });
            }
        }

        ZoneKind::Bumper(bumper) => {
            let delta = body.pos - center;
            let distance = delta.length();
            let reach = bumper.radius + body.collision_radius;

            if distance < reach {
                let dir = delta.normalize_or_zero();
                body.pos += dir * (reach - distance) * 0.5;
                if body.vel.x.abs() < 0.1 && body.vel.y.abs() < 0.1 {
                    body.vel = dir * bumper.min_push_speed;
                } else {
                    body.vel += dir * bumper.impulse;
                }
            }

            if distance < bumper.trigger_distance || distance < reach {
                bumper.trigger(elapsed_ms);
            }
        }

        ZoneKind::Trigger(trigger) => {
            if trigger.phase == TriggerPhase::Waiting && coverage_reaches(coverage, trigger.threshold) {
                trigger.phase = TriggerPhase::Armed {
                    remaining: trigger.delay_ticks,
                };
            }
        }
    }
}

/// Drag every captured puck toward the magnet center
fn pull_captured(id: ZoneId, center: Vec2, magnet: &mut Magnet, bodies: &mut [Body], events: &mut Vec<SimEvent>) {
    // Membership shrinks while we walk it
    let captured: Vec<BodyId> = magnet.captured.iter().copied().collect();

    for body_id in captured {
        let Ok(index) = bodies.binary_search_by_key(&body_id, |b| b.id) else {
            magnet.captured.remove(&body_id);
            continue;
        };
        let body = &mut bodies[index];
        if !body.active {
            magnet.captured.remove(&body_id);
            continue;
        }

        let speed = body.speed();
        if speed > magnet.velocity_cap {
            body.vel *= magnet.velocity_cap / speed;
        }

        let to_center = center - body.pos;
        let distance = to_center.length();
        let step = magnet.pull_speed.min(distance);
        body.pos += to_center.normalize_or_zero() * step;

        if distance - step <= magnet.epsilon {
            body.active = false;
            magnet.captured.remove(&body_id);
            events.push(SimEvent::Absorbed { body: body_id, zone: id });
        }
    }
}

/// Count an armed trigger down, firing when it reaches zero
fn tick_trigger(id: ZoneId, trigger: &mut Trigger, events: &mut Vec<SimEvent>) {
    if let TriggerPhase::Armed { remaining } = trigger.phase {
        if remaining == 0 {
            trigger.phase = TriggerPhase::Fired;
            log::debug!("trigger zone {} fired {:?}", id.0, trigger.action);
            events.push(SimEvent::TriggerFired {
                zone: id,
                action: trigger.action,
            });
        } else {
            trigger.phase = TriggerPhase::Armed { remaining: remaining - 1 };
        }
    }
}
