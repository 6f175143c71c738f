//! Shared geometry for the playfield
//!
//! Axis-aligned rectangles for zones and blocks, pixel coverage masks for
//! pucks, and the coverage ratio every zone kind uses to decide how much of a
//! puck is inside it.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Axis-aligned rectangle in playfield pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Rectangle from its top-left corner and size
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        Self { min, max: min + size }
    }

    /// Rectangle centered on a point
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Overlapping region, if it has positive area
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        if max.x > min.x && max.y > min.y {
            Some(Aabb { min, max })
        } else {
            None
        }
    }

    /// Area of the overlapping region (0 when disjoint)
    pub fn intersection_area(&self, other: &Aabb) -> f32 {
        let w = (self.max.x.min(other.max.x) - self.min.x.max(other.min.x)).max(0.0);
        let h = (self.max.y.min(other.max.y) - self.min.y.max(other.min.y)).max(0.0);
        w * h
    }
}

/// Tolerance so a configured exact coverage (e.g. 0.70 at threshold 0.70) fires
const COVERAGE_EPSILON: f32 = 1e-5;

/// How much of a circle's area its bounding square shares with a rectangle.
///
/// The numerator is the bounding-square intersection, the denominator the true
/// circle area, so a puck fully inside a zone scores 4/π (about 1.27).
pub fn coverage_ratio(center: Vec2, radius: f32, rect: &Aabb) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    let square = Aabb::from_center_size(center, Vec2::splat(radius * 2.0));
    square.intersection_area(rect) / (PI * radius * radius)
}

/// Whether a coverage ratio reaches a zone threshold
#[inline]
pub fn coverage_reaches(ratio: f32, threshold: f32) -> bool {
    ratio + COVERAGE_EPSILON >= threshold
}

/// Pixel-accurate disc used for exact puck-vs-puck overlap tests.
///
/// The disc is rasterized into a square of `2r` pixels; a pixel is solid when
/// its center lies inside the circle.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleMask {
    size: i32,
    bits: Vec<bool>,
}

impl CircleMask {
    pub fn new(radius: f32) -> Self {
        let size = (radius * 2.0).ceil().max(1.0) as i32;
        let r2 = radius * radius;
        let cells = (size as usize).checked_mul(size as usize).unwrap_or(0);
        let mut bits = Vec::with_capacity(cells);
        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - radius;
                let dy = y as f32 + 0.5 - radius;
                bits.push(dx * dx + dy * dy <= r2);
            }
        }
        Self { size, bits }
    }

    /// Side length of the mask in pixels
    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Number of solid pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    #[inline]
    fn get(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.size && y < self.size && self.bits[y as usize * self.size as usize + x as usize]
    }

    /// Whether `other`, placed with its top-left corner at `offset` relative to
    /// this mask's top-left corner, shares any solid pixel.
    pub fn overlaps(&self, other: &CircleMask, offset: (i32, i32)) -> bool {
        let (ox, oy) = offset;
        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = self.size.min(ox + other.size);
        let y1 = self.size.min(oy + other.size);
        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - ox, y - oy) {
                    return true;
                }
            }
        }
        false
    }

    /// Overlap test between two masks centered on `a` and `b`.
    ///
    /// The center offset is truncated to whole pixels before comparing.
    pub fn overlaps_at(&self, a: Vec2, other: &CircleMask, b: Vec2) -> bool {
        let d = b - a;
        let offset = (
            d.x as i32 + self.size / 2 - other.size / 2,
            d.y as i32 + self.size / 2 - other.size / 2,
        );
        self.overlaps(other, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_intersection() {
        let a = Aabb::from_min_size(Vec2::ZERO, Vec2::new(10.0, 10.0));
        let b = Aabb::from_min_size(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
        let clip = a.intersection(&b).unwrap();
        assert_eq!(clip.min, Vec2::new(5.0, 5.0));
        assert_eq!(clip.max, Vec2::new(10.0, 10.0));
        assert!((a.intersection_area(&b) - 25.0).abs() < 1e-6);

        // Touching edges have no area
        let c = Aabb::from_min_size(Vec2::new(10.0, 0.0), Vec2::new(5.0, 5.0));
        assert!(a.intersection(&c).is_none());
        assert_eq!(a.intersection_area(&c), 0.0);
    }

    #[test]
    fn test_coverage_fully_inside() {
        let zone = Aabb::from_min_size(Vec2::ZERO, Vec2::new(100.0, 100.0));
        let ratio = coverage_ratio(Vec2::new(50.0, 50.0), 6.0, &zone);
        assert!((ratio - 4.0 / PI).abs() < 1e-4);
    }

    #[test]
    fn test_coverage_half_inside() {
        // Zone edge through the puck center covers half the bounding square
        let zone = Aabb::from_min_size(Vec2::new(50.0, 0.0), Vec2::new(100.0, 100.0));
        let ratio = coverage_ratio(Vec2::new(50.0, 50.0), 6.0, &zone);
        assert!((ratio - 2.0 / PI).abs() < 1e-4);
    }

    #[test]
    fn test_coverage_disjoint_and_degenerate() {
        let zone = Aabb::from_min_size(Vec2::ZERO, Vec2::new(10.0, 10.0));
        assert_eq!(coverage_ratio(Vec2::new(100.0, 100.0), 6.0, &zone), 0.0);
        assert_eq!(coverage_ratio(Vec2::new(5.0, 5.0), 0.0, &zone), 0.0);
    }

    #[test]
    fn test_circle_mask_shape() {
        let mask = CircleMask::new(5.0);
        assert_eq!(mask.size(), 10);
        // Roughly pi * r^2 pixels
        let count = mask.count() as f32;
        assert!((count - PI * 25.0).abs() < 10.0);
        // Corners are empty, center is solid
        assert!(!mask.get(0, 0));
        assert!(mask.get(5, 5));
    }

    #[test]
    fn test_circle_mask_playfield_sized() {
        let mask = CircleMask::new(292.0);
        assert_eq!(mask.size(), 584);
        assert!(mask.get(583, 292));
        assert!(!mask.get(583, 583));
    }

    #[test]
    fn test_circle_mask_overlap_by_distance() {
        let mask = CircleMask::new(5.0);
        let a = Vec2::new(100.0, 100.0);
        assert!(mask.overlaps_at(a, &mask, a + Vec2::new(9.0, 0.0)));
        assert!(!mask.overlaps_at(a, &mask, a + Vec2::new(11.0, 0.0)));
        // Diagonal gap wider than the bounding circles touch
        assert!(!mask.overlaps_at(a, &mask, a + Vec2::new(8.0, 8.0)));
    }

    #[test]
    fn test_circle_mask_mixed_radii() {
        let small = CircleMask::new(3.0);
        let big = CircleMask::new(7.0);
        let a = Vec2::new(50.0, 50.0);
        assert!(big.overlaps_at(a, &small, a + Vec2::new(9.0, 0.0)));
        assert!(!big.overlaps_at(a, &small, a + Vec2::new(11.0, 0.0)));
        assert!(small.overlaps_at(a + Vec2::new(9.0, 0.0), &big, a));
    }
}
