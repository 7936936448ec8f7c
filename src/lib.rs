//! Survivor Sim - simulation core of a top-down survival arena
//!
//! Core modules:
//! - `sim`: Simulation (movement, weapons, enemies, sector streaming, pickups)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Game configuration constants
pub mod consts {
    /// Longest frame the driver will simulate in one go (ms)
    pub const MAX_FRAME_MS: f64 = 100.0;
    /// Maximum fires of one scheduled task per advance, prevents burst storms after a stall
    pub const MAX_CATCH_UP_FIRES: u32 = 8;
    /// Undrained events kept per session; the oldest are dropped beyond this
    pub const MAX_PENDING_EVENTS: usize = 4096;

    /// Hero defaults
    pub const HERO_MAX_HEALTH: f32 = 100.0;
    pub const HERO_DEFENSE: f32 = 0.0;
    /// World units per second at full throttle
    pub const HERO_SPEED: f32 = 6.0;
    /// Cumulative experience needed for each level
    pub const EXP_LEVELS: [u32; 10] = [100, 200, 300, 500, 800, 1200, 2000, 4000, 6000, 10000];

    /// Throttle ramp while a key is held (per second)
    pub const THROTTLE_RAMP: f32 = 1.5;
    /// Throttle decay after release (per second)
    pub const THROTTLE_DECAY: f32 = 3.0;
    /// Exponential yaw damping rate (1/s)
    pub const YAW_DAMPING: f32 = 4.8;

    /// Enemy defaults
    pub const ENEMY_SPAWN_INTERVAL_MS: f64 = 700.0;
    pub const ENEMY_SPEED: f32 = 3.6;
    pub const ENEMY_HP: f32 = 100.0;
    pub const ENEMY_DAMAGE: f32 = 1.0;
    /// Edge length of the enemy box
    pub const ENEMY_SIZE: f32 = 1.0;
    pub const ENEMY_CONTACT_RADIUS: f32 = 1.0;

    /// Sector streaming
    pub const SECTOR_SIZE: f32 = 50.0;

    /// Experience orbs
    pub const PICKUPS_PER_SECTOR_MIN: u32 = 10;
    pub const PICKUPS_PER_SECTOR_MAX: u32 = 30;
    pub const PICKUP_RADIUS: f32 = 1.0;
    pub const PICKUP_EXP: u32 = 10;

    /// Orbiting projectile
    pub const ORBIT_RADIUS: f32 = 3.0;
    /// Radians per second
    pub const ORBIT_SPEED: f32 = 3.0;
    pub const ORBIT_PROJECTILE_RADIUS: f32 = 0.4;
    pub const ORBIT_DAMAGE: f32 = 50.0;

    /// Area zone
    pub const ZONE_RADIUS: f32 = 3.33;
    pub const ZONE_DAMAGE: f32 = 2.0;

    /// Directional arc
    pub const ARC_RADIUS: f32 = 7.0;
    pub const ARC_WIDTH_DEG: f32 = 45.0;
    pub const ARC_DAMAGE: f32 = 51.0;
    pub const ARC_INTERVAL_MS: f64 = 1000.0;
}

/// Clamp without panicking on inverted bounds (min wins)
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Frame-rate independent exponential approach of `current` toward `target`.
///
/// `lambda` is the approach rate per second; the result after two steps of `dt`
/// equals one step of `2 * dt`.
#[inline]
pub fn damp(current: f32, target: f32, lambda: f32, dt: f32) -> f32 {
    current + (target - current) * (1.0 - (-lambda * dt).exp())
}

/// Modulo whose result always has the sign of `divisor`
#[inline]
pub fn euclidean_modulo(value: f32, divisor: f32) -> f32 {
    ((value % divisor) + divisor) % divisor
}

/// Wrap an angle to (-π, π]
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    PI - euclidean_modulo(PI - angle, TAU)
}

/// Convert milliseconds to simulation seconds
#[inline]
pub fn ms_to_secs(ms: f64) -> f32 {
    (ms / 1000.0) as f32
}

/// Unit facing vector on the ground plane for a yaw.
///
/// Yaw 0 faces -z ("north"); yaw -90° faces +x ("east").
#[inline]
pub fn facing_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(-yaw.sin(), 0.0, -yaw.cos())
}

/// Yaw that faces along a planar offset (inverse of [`facing_from_yaw`])
#[inline]
pub fn yaw_of(offset: Vec3) -> f32 {
    (-offset.x).atan2(-offset.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damp_is_frame_length_independent() {
        let one = damp(0.0, 10.0, 4.8, 0.2);
        let two = damp(damp(0.0, 10.0, 4.8, 0.1), 10.0, 4.8, 0.1);
        assert!((one - two).abs() < 1e-4);
        assert!(one > 0.0 && one < 10.0);
    }

    #[test]
    fn test_wrap_angle_range() {
        assert!((wrap_angle(PI) - PI).abs() < 1e-6);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-6);
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_euclidean_modulo_negative() {
        assert!((euclidean_modulo(-1.0, 360.0) - 359.0).abs() < 1e-4);
        assert!((euclidean_modulo(725.0, 360.0) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_facing_round_trip() {
        let east = facing_from_yaw(-90f32.to_radians());
        assert!((east - Vec3::X).length() < 1e-5);
        let north = facing_from_yaw(0.0);
        assert!((north - Vec3::NEG_Z).length() < 1e-5);
        assert!((wrap_angle(yaw_of(Vec3::new(0.0, 0.0, 5.0))) - PI).abs() < 1e-5);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-0.5, 0.0, 1.0), 0.0);
    }
}
