//! Wedge geometry for the directional arc weapon
//!
//! A wedge is a circular sector anchored at the hero:
//! - radius: reach from the apex
//! - half_width: angular half-extent either side of the bisector
//! - facing: yaw of the bisector (same convention as hero yaw)

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{wrap_angle, yaw_of};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wedge {
    pub radius: f32,
    /// Half of the angular width (radians)
    pub half_width: f32,
    /// Bisector yaw (radians)
    pub facing: f32,
}

impl Wedge {
    pub fn new(radius: f32, width: f32, facing: f32) -> Self {
        Self {
            radius,
            half_width: width * 0.5,
            facing: wrap_angle(facing),
        }
    }

    /// Full angular width
    #[inline]
    pub fn width(&self) -> f32 {
        self.half_width * 2.0
    }

    /// Signed angle from the bisector to `yaw`, wrapped to (-π, π]
    #[inline]
    pub fn offset_from_bisector(&self, yaw: f32) -> f32 {
        wrap_angle(yaw - self.facing)
    }

    /// Check if a yaw lies strictly within the wedge's angular extent.
    ///
    /// Uses the wrapped difference so a wedge straddling ±π behaves the same
    /// as one pointing anywhere else. A bearing exactly on an edge is outside.
    pub fn contains_angle(&self, yaw: f32) -> bool {
        self.offset_from_bisector(yaw).abs() < self.half_width
    }

    /// Check if a point at `offset` from the apex is inside the wedge,
    /// with `margin` added to the reach (target half-size)
    pub fn contains_offset(&self, offset: Vec3, margin: f32) -> bool {
        let reach = self.radius + margin;
        let planar = Vec3::new(offset.x, 0.0, offset.z);
        let dist_sq = planar.length_squared();
        if dist_sq >= reach * reach {
            return false;
        }
        // Target at the apex counts as inside
        dist_sq == 0.0 || self.contains_angle(yaw_of(planar))
    }

    /// Yaw of the wedge's starting edge (for orienting the visual)
    pub fn start_edge(&self) -> f32 {
        wrap_angle(self.facing - self.half_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facing_from_yaw;
    use std::f32::consts::PI;

    #[test]
    fn test_wedge_contains_angle_forward() {
        let wedge = Wedge::new(7.0, 45f32.to_radians(), 0.0);
        assert!(wedge.contains_angle(0.0));
        assert!(wedge.contains_angle(20f32.to_radians()));
        assert!(wedge.contains_angle(-20f32.to_radians()));
        assert!(!wedge.contains_angle(30f32.to_radians()));
        assert!(!wedge.contains_angle(PI));
    }

    #[test]
    fn test_wedge_contains_angle_wraparound() {
        // Bisector at 180°: edges at 157.5° and -157.5°
        let wedge = Wedge::new(7.0, 45f32.to_radians(), PI);
        assert!(wedge.contains_angle(PI));
        assert!(wedge.contains_angle(-PI + 0.1));
        assert!(wedge.contains_angle(PI - 0.1));
        assert!(!wedge.contains_angle(0.0));
        assert!(!wedge.contains_angle(-PI / 2.0));
    }

    #[test]
    fn test_wedge_contains_offset() {
        let facing = -90f32.to_radians(); // east
        let wedge = Wedge::new(7.0, 45f32.to_radians(), facing);
        assert!(wedge.contains_offset(facing_from_yaw(facing) * 5.0, 0.5));
        // Within reach only thanks to the margin
        assert!(wedge.contains_offset(Vec3::new(7.3, 0.0, 0.0), 0.5));
        assert!(!wedge.contains_offset(Vec3::new(7.6, 0.0, 0.0), 0.5));
        // Directly behind
        assert!(!wedge.contains_offset(Vec3::new(-3.0, 0.0, 0.0), 0.5));
        // North is 90° off the bisector
        assert!(!wedge.contains_offset(Vec3::new(0.0, 0.0, -3.0), 0.5));
    }

    #[test]
    fn test_wedge_edge_is_exclusive() {
        let yaw = 0.3;
        let mut wedge = Wedge::new(7.0, 1.0, -0.1);
        // Put the edge exactly on the bearing
        wedge.half_width = wedge.offset_from_bisector(yaw).abs();
        assert!(!wedge.contains_angle(yaw));
        assert!(wedge.contains_angle(yaw - 0.01));
    }

    #[test]
    fn test_start_edge() {
        let wedge = Wedge::new(7.0, PI / 2.0, 0.0);
        assert!((wedge.start_edge() + PI / 4.0).abs() < 1e-6);
        assert!((wedge.width() - PI / 2.0).abs() < 1e-6);
    }
}
