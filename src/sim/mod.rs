//! Deterministic simulation module
//!
//! All physics and gameplay logic lives here. This module must be pure and
//! deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body id, zone and spawner index)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod geometry;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod zone;

pub use body::{Body, BodyId, BodyKind, Shape};
pub use collision::{CollisionParams, kinetic_energy, reflect_velocity, resolve_pair};
pub use geometry::{Aabb, CircleMask, coverage_ratio};
pub use snapshot::{BodyView, Snapshot, ZoneView};
pub use spawner::{Emission, Spawner, SpawnerId, SpawnerPhase};
pub use state::{Phase, SimEvent, Simulation};
pub use tick::tick;
pub use zone::{
    BumperPhase, TriggerAction, TriggerPhase, Zone, ZoneArea, ZoneId, ZoneKind, ZoneTag, apply_effect,
    apply_zone,
};
