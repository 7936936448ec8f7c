//! Boundary to the rendering host
//!
//! The simulation only ever creates, moves and removes visual proxies; it never
//! reads anything back from the scene.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Opaque handle to a visual proxy owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualHandle(pub u32);

/// Shape the host should build for a proxy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Hero,
    Enemy { size: f32 },
    Sector { size: f32 },
    Pickup,
    OrbitProjectile { radius: f32 },
    ZoneDisc { radius: f32 },
    /// Circular sector of `radius` spanning `width` radians
    ArcWedge { radius: f32, width: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Material {
    Hero,
    Enemy,
    Terrain,
    Experience,
    Weapon,
}

/// Placement of a proxy in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles (radians)
    pub rotation: Vec3,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Position plus a rotation about the vertical axis
    pub fn at_yaw(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            rotation: Vec3::new(0.0, yaw, 0.0),
            scale: 1.0,
        }
    }
}

/// Operations the simulation performs on the rendering layer
pub trait Scene {
    fn create_visual(&mut self, geometry: Geometry, material: Material) -> VisualHandle;
    fn set_transform(&mut self, handle: VisualHandle, transform: Transform);
    /// Damage cue in [0, 1]: 0 untouched, 1 about to die
    fn set_tint(&mut self, handle: VisualHandle, tint: f32);
    /// Removing an unknown handle is a no-op
    fn remove_visual(&mut self, handle: VisualHandle);
}

/// A live proxy as recorded by [`HeadlessScene`]
#[derive(Debug, Clone)]
pub struct VisualRecord {
    pub geometry: Geometry,
    pub material: Material,
    pub transform: Transform,
    pub tint: f32,
}

/// Scene that only records what the simulation asked for.
///
/// Used by the native runner and by tests to observe visual bookkeeping.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    visuals: HashMap<VisualHandle, VisualRecord>,
    next_handle: u32,
    pub created: u64,
    pub removed: u64,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: VisualHandle) -> Option<&VisualRecord> {
        self.visuals.get(&handle)
    }

    pub fn live_count(&self) -> usize {
        self.visuals.len()
    }

    /// Number of live proxies whose geometry satisfies `pred`
    pub fn count_where(&self, pred: impl Fn(&Geometry) -> bool) -> usize {
        self.visuals.values().filter(|v| pred(&v.geometry)).count()
    }

    /// Live proxies of a geometry kind placed exactly at `position`
    pub fn count_at(&self, pred: impl Fn(&Geometry) -> bool, position: Vec3) -> usize {
        self.visuals
            .values()
            .filter(|v| pred(&v.geometry) && v.transform.position == position)
            .count()
    }
}

impl Scene for HeadlessScene {
    fn create_visual(&mut self, geometry: Geometry, material: Material) -> VisualHandle {
        let handle = VisualHandle(self.next_handle);
        self.next_handle += 1;
        self.created += 1;
        self.visuals.insert(
            handle,
            VisualRecord {
                geometry,
                material,
                transform: Transform::default(),
                tint: 0.0,
            },
        );
        handle
    }

    fn set_transform(&mut self, handle: VisualHandle, transform: Transform) {
        if let Some(record) = self.visuals.get_mut(&handle) {
            record.transform = transform;
        }
    }

    fn set_tint(&mut self, handle: VisualHandle, tint: f32) {
        if let Some(record) = self.visuals.get_mut(&handle) {
            record.tint = tint;
        }
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        if self.visuals.remove(&handle).is_some() {
            self.removed += 1;
        } else {
            log::trace!("remove_visual: unknown handle {:?}", handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_scene_bookkeeping() {
        let mut scene = HeadlessScene::new();
        let a = scene.create_visual(Geometry::Pickup, Material::Experience);
        let b = scene.create_visual(Geometry::Hero, Material::Hero);
        assert_ne!(a, b);
        assert_eq!(scene.live_count(), 2);

        scene.set_transform(a, Transform::at(Vec3::new(1.0, 0.0, 2.0)));
        assert_eq!(scene.get(a).map(|r| r.transform.position), Some(Vec3::new(1.0, 0.0, 2.0)));

        scene.set_tint(a, 0.25);
        assert_eq!(scene.get(a).map(|r| r.tint), Some(0.25));

        scene.remove_visual(a);
        scene.remove_visual(a);
        assert_eq!(scene.live_count(), 1);
        assert_eq!(scene.removed, 1);
        assert_eq!(scene.count_where(|g| matches!(g, Geometry::Hero)), 1);
    }
}
