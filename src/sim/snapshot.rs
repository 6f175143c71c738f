//! Read-only view of the simulation for renderers and logs

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{BodyId, BodyKind, Shape};
use super::state::{Phase, Simulation};
use super::zone::{ZoneArea, ZoneId, ZoneTag};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyView {
    pub id: BodyId,
    pub kind: BodyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Drawn radius for circles
    pub radius: f32,
    /// Full size for blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneView {
    pub id: ZoneId,
    pub tag: ZoneTag,
    /// Current shape, including a bumper's live radius
    pub area: ZoneArea,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub elapsed_ms: f64,
    pub lives: u32,
    pub phase: Phase,
    pub bodies: Vec<BodyView>,
    pub zones: Vec<ZoneView>,
}

impl Simulation {
    pub fn snapshot(&self) -> Snapshot {
        let bodies = self
            .bodies
            .iter()
            .filter(|b| b.active)
            .map(|b| BodyView {
                id: b.id,
                kind: b.kind,
                pos: b.pos,
                vel: b.vel,
                radius: b.drawn_radius,
                size: match &b.shape {
                    Shape::Rect { size } => Some(*size),
                    Shape::Circle(_) => None,
                },
            })
            .collect();

        let zones = self
            .zones
            .iter()
            .map(|z| ZoneView {
                id: z.id,
                tag: z.tag(),
                area: z.current_area(),
            })
            .collect();

        Snapshot {
            tick: self.tick,
            elapsed_ms: self.elapsed_ms,
            lives: self.lives,
            phase: self.phase,
            bodies,
            zones,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_of_default_layout() {
        let sim = Simulation::with_defaults();
        let snap = sim.snapshot();
        assert_eq!(snap.tick, 0);
        assert_eq!(snap.bodies.len(), 1);
        assert_eq!(snap.bodies[0].radius, crate::consts::PUCK_RADIUS);
        assert!(snap.bodies[0].size.is_none());
        assert_eq!(snap.zones.iter().filter(|z| z.tag == ZoneTag::Kill).count(), 4);
        assert!(matches!(
            snap.zones[4].area,
            ZoneArea::Circle { radius, .. } if radius == 12.0
        ));
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let snap = Simulation::with_defaults().snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"phase\":\"Running\""));
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }
}
