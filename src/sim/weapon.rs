//! Auto-firing weapons
//!
//! Each weapon kind is a damage policy over the shared enemy registry:
//! - Orbiting projectile: edge-triggered, hits once per entry into its radius
//! - Area zone: level-triggered, damages everything inside every tick
//! - Directional arc: periodic burst inside a forward-facing wedge
//!
//! Policies mutate enemy hp directly and never touch enemies already at hp <= 0.

use std::collections::HashSet;
use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::arc::Wedge;
use super::enemy::{EnemyId, EnemyRegistry};
use super::hero::HeroFrame;
use super::scene::{Geometry, Material, Scene, Transform, VisualHandle};
use super::schedule::ScheduledTask;
use crate::ms_to_secs;
use crate::tuning::{ArcTuning, OrbitTuning, Tuning, ZoneTuning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    OrbitingProjectile,
    AreaZone,
    DirectionalArc,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 3] = [
        WeaponKind::OrbitingProjectile,
        WeaponKind::AreaZone,
        WeaponKind::DirectionalArc,
    ];
}

/// Projectile circling the hero
#[derive(Debug, Clone)]
pub struct OrbitingProjectile {
    tuning: OrbitTuning,
    /// Orbit phase (radians, kept in [0, τ))
    phase: f32,
    /// Enemies currently overlapping the projectile
    hit: HashSet<EnemyId>,
    pos: Vec3,
}

impl OrbitingProjectile {
    pub fn new(tuning: OrbitTuning) -> Self {
        Self {
            tuning,
            phase: 0.0,
            hit: HashSet::new(),
            pos: Vec3::ZERO,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.pos
    }

    pub fn is_overlapping(&self, id: EnemyId) -> bool {
        self.hit.contains(&id)
    }

    fn update(&mut self, dt: f32, frame: &HeroFrame, enemies: &mut EnemyRegistry) -> u32 {
        self.phase = (self.phase + self.tuning.speed * dt).rem_euclid(TAU);
        self.pos = frame.position
            + Vec3::new(self.phase.cos(), 0.0, self.phase.sin()) * self.tuning.radius;

        // Forget enemies that were reaped since the last tick
        if !self.hit.is_empty() {
            let live: HashSet<EnemyId> = enemies.iter().map(|e| e.id).collect();
            self.hit.retain(|id| live.contains(id));
        }

        let mut hits = 0;
        for enemy in enemies.alive_mut() {
            let reach = self.tuning.projectile_radius + enemy.half_size();
            let dist = self.pos.distance(enemy.pos);

            if self.hit.contains(&enemy.id) {
                if dist > reach {
                    self.hit.remove(&enemy.id);
                }
            } else if dist < reach {
                enemy.hp -= self.tuning.damage;
                self.hit.insert(enemy.id);
                hits += 1;
            }
        }
        hits
    }
}

/// Damage disc centered on the hero
#[derive(Debug, Clone)]
pub struct AreaZone {
    tuning: ZoneTuning,
}

impl AreaZone {
    pub fn new(tuning: ZoneTuning) -> Self {
        Self { tuning }
    }

    fn update(&mut self, frame: &HeroFrame, enemies: &mut EnemyRegistry) -> u32 {
        let mut hits = 0;
        for enemy in enemies.alive_mut() {
            if frame.position.distance(enemy.pos) < self.tuning.radius + enemy.half_size() {
                enemy.hp -= self.tuning.damage;
                hits += 1;
            }
        }
        hits
    }
}

/// Periodic burst in front of the hero
#[derive(Debug, Clone)]
pub struct DirectionalArc {
    tuning: ArcTuning,
    wedge: Wedge,
    task: ScheduledTask,
}

impl DirectionalArc {
    pub fn new(tuning: ArcTuning) -> Self {
        Self {
            wedge: Wedge::new(tuning.radius, tuning.width_deg.to_radians(), 0.0),
            task: ScheduledTask::every(tuning.interval_ms),
            tuning,
        }
    }

    pub fn wedge(&self) -> &Wedge {
        &self.wedge
    }

    fn update(&mut self, elapsed_ms: f64, frame: &HeroFrame, enemies: &mut EnemyRegistry) -> u32 {
        self.wedge.facing = crate::wrap_angle(frame.yaw);

        let mut hits = 0;
        for _ in 0..self.task.advance(elapsed_ms) {
            hits += self.burst(frame, enemies);
        }
        hits
    }

    fn burst(&self, frame: &HeroFrame, enemies: &mut EnemyRegistry) -> u32 {
        let mut hits = 0;
        for enemy in enemies.alive_mut() {
            if self.wedge.contains_offset(enemy.pos - frame.position, enemy.half_size()) {
                enemy.hp -= self.tuning.damage;
                hits += 1;
            }
        }
        hits
    }
}

/// Kind-specific state of a weapon
#[derive(Debug, Clone)]
pub enum WeaponPolicy {
    Orbiting(OrbitingProjectile),
    Zone(AreaZone),
    Arc(DirectionalArc),
}

/// An equipped weapon
#[derive(Debug, Clone)]
pub struct Weapon {
    policy: WeaponPolicy,
    active: bool,
    /// Reserved for scaling, starts at 0
    level: u32,
    visual: VisualHandle,
}

impl Weapon {
    /// Build a weapon of `kind` and its visual; it starts inactive
    pub fn new(kind: WeaponKind, tuning: &Tuning, scene: &mut dyn Scene) -> Self {
        let (policy, geometry) = match kind {
            WeaponKind::OrbitingProjectile => (
                WeaponPolicy::Orbiting(OrbitingProjectile::new(tuning.orbit.clone())),
                Geometry::OrbitProjectile {
                    radius: tuning.orbit.projectile_radius,
                },
            ),
            WeaponKind::AreaZone => (
                WeaponPolicy::Zone(AreaZone::new(tuning.zone.clone())),
                Geometry::ZoneDisc {
                    radius: tuning.zone.radius,
                },
            ),
            WeaponKind::DirectionalArc => (
                WeaponPolicy::Arc(DirectionalArc::new(tuning.arc.clone())),
                Geometry::ArcWedge {
                    radius: tuning.arc.radius,
                    width: tuning.arc.width_deg.to_radians(),
                },
            ),
        };

        Self {
            policy,
            active: false,
            level: 0,
            visual: scene.create_visual(geometry, Material::Weapon),
        }
    }

    pub fn kind(&self) -> WeaponKind {
        match self.policy {
            WeaponPolicy::Orbiting(_) => WeaponKind::OrbitingProjectile,
            WeaponPolicy::Zone(_) => WeaponKind::AreaZone,
            WeaponPolicy::Arc(_) => WeaponKind::DirectionalArc,
        }
    }

    pub fn policy(&self) -> &WeaponPolicy {
        &self.policy
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// (De)activate; activation starts the orbit with a clean overlap set
    pub fn set_active(&mut self, active: bool) {
        if active {
            if let WeaponPolicy::Orbiting(orbit) = &mut self.policy {
                orbit.hit.clear();
            }
        }
        self.active = active;
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn level_up(&mut self) -> u32 {
        self.level += 1;
        self.level
    }

    /// Apply this tick's damage; returns the number of damage applications
    pub fn update_weapon(
        &mut self,
        elapsed_ms: f64,
        frame: &HeroFrame,
        enemies: &mut EnemyRegistry,
        scene: &mut dyn Scene,
    ) -> u32 {
        if !self.active {
            return 0;
        }

        let dt = ms_to_secs(elapsed_ms);
        match &mut self.policy {
            WeaponPolicy::Orbiting(orbit) => {
                let hits = orbit.update(dt, frame, enemies);
                scene.set_transform(self.visual, Transform::at(orbit.position()));
                hits
            }
            WeaponPolicy::Zone(zone) => {
                scene.set_transform(
                    self.visual,
                    Transform {
                        position: frame.position,
                        rotation: Vec3::new(-FRAC_PI_2, 0.0, 0.0),
                        scale: 1.0,
                    },
                );
                zone.update(frame, enemies)
            }
            WeaponPolicy::Arc(arc) => {
                let hits = arc.update(elapsed_ms, frame, enemies);
                scene.set_transform(
                    self.visual,
                    Transform {
                        position: frame.position,
                        rotation: Vec3::new(FRAC_PI_2, arc.wedge().start_edge(), 0.0),
                        scale: 1.0,
                    },
                );
                hits
            }
        }
    }

    /// Cancel periodic work; the weapon stays equipped but inert
    pub fn dispose(&mut self) {
        if let WeaponPolicy::Arc(arc) = &mut self.policy {
            arc.task.cancel();
        }
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::scene::HeadlessScene;
    use std::f32::consts::PI;

    fn frame_at(position: Vec3, yaw: f32) -> HeroFrame {
        HeroFrame { position, yaw }
    }

    fn armed(kind: WeaponKind, tuning: &Tuning, scene: &mut HeadlessScene) -> Weapon {
        let mut weapon = Weapon::new(kind, tuning, scene);
        weapon.set_active(true);
        weapon
    }

    fn registry() -> EnemyRegistry {
        let tuning = Tuning::default();
        EnemyRegistry::new(tuning.enemy, tuning.terrain.sector_size)
    }

    #[test]
    fn test_empty_registry_is_noop() {
        let tuning = Tuning::default();
        let mut scene = HeadlessScene::new();
        let mut enemies = registry();
        for kind in WeaponKind::ALL {
            let mut weapon = armed(kind, &tuning, &mut scene);
            for _ in 0..30 {
                assert_eq!(weapon.update_weapon(100.0, &frame_at(Vec3::ZERO, 0.0), &mut enemies, &mut scene), 0);
            }
        }
    }

    #[test]
    fn test_orbit_position_follows_phase() {
        let tuning = Tuning::default();
        let mut orbit = OrbitingProjectile::new(tuning.orbit.clone());
        let mut enemies = registry();
        orbit.update(0.5, &frame_at(Vec3::new(10.0, 0.0, 0.0), 0.0), &mut enemies);
        // phase = 3 rad/s * 0.5 s
        let expected = Vec3::new(10.0 + 1.5f32.cos() * 3.0, 0.0, 1.5f32.sin() * 3.0);
        assert!((orbit.position() - expected).length() < 1e-4);
    }

    #[test]
    fn test_orbit_damage_is_edge_triggered() {
        let mut tuning = Tuning::default();
        tuning.orbit.speed = 0.0; // projectile parked at hero + (radius, 0, 0)
        let mut scene = HeadlessScene::new();
        let mut enemies = registry();
        let mut weapon = armed(WeaponKind::OrbitingProjectile, &tuning, &mut scene);
        let frame = frame_at(Vec3::ZERO, 0.0);

        let id = enemies.spawn_at(Vec3::new(20.0, 0.0, 0.0), &mut scene);
        weapon.update_weapon(16.0, &frame, &mut enemies, &mut scene);
        assert_eq!(enemies.get(id).map(|e| e.hp), Some(100.0));

        // Enter and stay for 5 ticks
        enemies.get_mut(id).expect("enemy").pos = Vec3::new(3.0, 0.0, 0.0);
        let hits: u32 = (0..5)
            .map(|_| weapon.update_weapon(16.0, &frame, &mut enemies, &mut scene))
            .sum();
        assert_eq!(hits, 1);
        assert_eq!(enemies.get(id).map(|e| e.hp), Some(50.0));

        // Exit, then re-enter: one more hit
        enemies.get_mut(id).expect("enemy").pos = Vec3::new(20.0, 0.0, 0.0);
        weapon.update_weapon(16.0, &frame, &mut enemies, &mut scene);
        enemies.get_mut(id).expect("enemy").pos = Vec3::new(3.2, 0.0, 0.0);
        weapon.update_weapon(16.0, &frame, &mut enemies, &mut scene);
        assert_eq!(enemies.get(id).map(|e| e.hp), Some(0.0));

        // Dead enemies are never hit again
        enemies.get_mut(id).expect("enemy").pos = Vec3::new(20.0, 0.0, 0.0);
        weapon.update_weapon(16.0, &frame, &mut enemies, &mut scene);
        enemies.get_mut(id).expect("enemy").pos = Vec3::new(3.0, 0.0, 0.0);
        weapon.update_weapon(16.0, &frame, &mut enemies, &mut scene);
        assert_eq!(enemies.get(id).map(|e| e.hp), Some(0.0));
    }

    #[test]
    fn test_orbit_forgets_removed_enemies() {
        let mut tuning = Tuning::default();
        tuning.orbit.speed = 0.0;
        let mut scene = HeadlessScene::new();
        let mut enemies = registry();
        let mut weapon = armed(WeaponKind::OrbitingProjectile, &tuning, &mut scene);
        let frame = frame_at(Vec3::ZERO, 0.0);

        let id = enemies.spawn_at(Vec3::new(3.0, 0.0, 0.0), &mut scene);
        weapon.update_weapon(16.0, &frame, &mut enemies, &mut scene);
        enemies.remove(id, &mut scene);
        weapon.update_weapon(16.0, &frame, &mut enemies, &mut scene);
        let WeaponPolicy::Orbiting(orbit) = weapon.policy() else {
            panic!("orbit policy expected");
        };
        assert!(!orbit.is_overlapping(id));
    }

    #[test]
    fn test_orbit_prunes_only_removed_enemies() {
        let mut tuning = Tuning::default();
        tuning.orbit.speed = 0.0;
        tuning.orbit.damage = 1.0;
        let mut scene = HeadlessScene::new();
        let mut enemies = registry();
        let mut weapon = armed(WeaponKind::OrbitingProjectile, &tuning, &mut scene);
        let frame = frame_at(Vec3::ZERO, 0.0);

        // Four enemies stacked on the parked projectile, plus a crowd far away
        let stacked: Vec<EnemyId> = (0..4)
            .map(|i| enemies.spawn_at(Vec3::new(3.0, 0.0, 0.1 * i as f32), &mut scene))
            .collect();
        for i in 0..50 {
            enemies.spawn_at(Vec3::new(100.0 + i as f32, 0.0, 0.0), &mut scene);
        }
        assert_eq!(weapon.update_weapon(16.0, &frame, &mut enemies, &mut scene), 4);

        enemies.remove(stacked[0], &mut scene);
        enemies.remove(stacked[2], &mut scene);
        // Survivors stay inside: still no repeat hits
        assert_eq!(weapon.update_weapon(16.0, &frame, &mut enemies, &mut scene), 0);

        let WeaponPolicy::Orbiting(orbit) = weapon.policy() else {
            panic!("orbit policy expected");
        };
        assert!(!orbit.is_overlapping(stacked[0]));
        assert!(orbit.is_overlapping(stacked[1]));
        assert!(!orbit.is_overlapping(stacked[2]));
        assert!(orbit.is_overlapping(stacked[3]));
    }

    #[test]
    fn test_zone_damage_is_level_triggered() {
        let tuning = Tuning::default();
        let mut scene = HeadlessScene::new();
        let mut enemies = registry();
        let mut weapon = armed(WeaponKind::AreaZone, &tuning, &mut scene);
        let frame = frame_at(Vec3::ZERO, 0.0);

        let inside = enemies.spawn_at(Vec3::new(2.0, 0.0, 0.0), &mut scene);
        let edge = enemies.spawn_at(Vec3::new(0.0, 0.0, 3.8), &mut scene);
        let outside = enemies.spawn_at(Vec3::new(0.0, 0.0, -3.9), &mut scene);

        for _ in 0..7 {
            weapon.update_weapon(16.0, &frame, &mut enemies, &mut scene);
        }
        assert_eq!(enemies.get(inside).map(|e| e.hp), Some(100.0 - 7.0 * 2.0));
        assert_eq!(enemies.get(edge).map(|e| e.hp), Some(100.0 - 7.0 * 2.0));
        assert_eq!(enemies.get(outside).map(|e| e.hp), Some(100.0));
    }

    #[test]
    fn test_arc_bursts_forward_on_interval_only() {
        let tuning = Tuning::default();
        let mut scene = HeadlessScene::new();
        let mut enemies = registry();
        let mut weapon = armed(WeaponKind::DirectionalArc, &tuning, &mut scene);
        let frame = frame_at(Vec3::ZERO, 0.0); // facing north (-z)

        let ahead = enemies.spawn_at(Vec3::new(0.0, 0.0, -4.0), &mut scene);
        let behind = enemies.spawn_at(Vec3::new(0.0, 0.0, 4.0), &mut scene);

        let mut burst_ticks = Vec::new();
        for tick in 1..=25 {
            let hits = weapon.update_weapon(100.0, &frame, &mut enemies, &mut scene);
            if hits > 0 {
                burst_ticks.push(tick);
            }
        }
        assert_eq!(burst_ticks, vec![10, 20]);
        assert_eq!(enemies.get(ahead).map(|e| e.hp), Some(100.0 - 2.0 * 51.0));
        assert_eq!(enemies.get(behind).map(|e| e.hp), Some(100.0));
    }

    #[test]
    fn test_arc_behind_never_hit_at_any_facing() {
        let tuning = Tuning::default();
        let mut scene = HeadlessScene::new();
        for step in 0..16 {
            let yaw = step as f32 * TAU / 16.0;
            let mut enemies = registry();
            let mut weapon = armed(WeaponKind::DirectionalArc, &tuning, &mut scene);
            let behind = -crate::facing_from_yaw(yaw) * 3.0;
            let id = enemies.spawn_at(behind, &mut scene);
            weapon.update_weapon(1000.0, &frame_at(Vec3::ZERO, yaw), &mut enemies, &mut scene);
            assert_eq!(enemies.get(id).map(|e| e.hp), Some(100.0), "yaw step {step}");
        }
    }

    #[test]
    fn test_arc_straddling_wrap_boundary() {
        let tuning = Tuning::default();
        let mut scene = HeadlessScene::new();
        let mut enemies = registry();
        let mut weapon = armed(WeaponKind::DirectionalArc, &tuning, &mut scene);
        // Facing south: bisector exactly on the ±π seam
        let frame = frame_at(Vec3::ZERO, PI);

        let left = enemies.spawn_at(Vec3::new(0.5, 0.0, 4.0), &mut scene);
        let right = enemies.spawn_at(Vec3::new(-0.5, 0.0, 4.0), &mut scene);
        let wide = enemies.spawn_at(Vec3::new(3.0, 0.0, 3.0), &mut scene);

        weapon.update_weapon(1000.0, &frame, &mut enemies, &mut scene);
        assert_eq!(enemies.get(left).map(|e| e.hp), Some(49.0));
        assert_eq!(enemies.get(right).map(|e| e.hp), Some(49.0));
        // 45° off the bisector, outside the 22.5° half-width
        assert_eq!(enemies.get(wide).map(|e| e.hp), Some(100.0));
    }

    #[test]
    fn test_inactive_and_disposed_weapons_do_nothing() {
        let tuning = Tuning::default();
        let mut scene = HeadlessScene::new();
        let mut enemies = registry();
        let id = enemies.spawn_at(Vec3::new(0.0, 0.0, -2.0), &mut scene);
        let frame = frame_at(Vec3::ZERO, 0.0);

        let mut idle = Weapon::new(WeaponKind::AreaZone, &tuning, &mut scene);
        assert!(!idle.is_active());
        idle.update_weapon(16.0, &frame, &mut enemies, &mut scene);

        let mut arc = armed(WeaponKind::DirectionalArc, &tuning, &mut scene);
        arc.dispose();
        assert!(!arc.is_active());
        // Re-activating a disposed arc does not revive its timer
        arc.set_active(true);
        arc.update_weapon(5000.0, &frame, &mut enemies, &mut scene);

        assert_eq!(enemies.get(id).map(|e| e.hp), Some(100.0));
    }

    #[test]
    fn test_level_up() {
        let tuning = Tuning::default();
        let mut scene = HeadlessScene::new();
        let mut weapon = Weapon::new(WeaponKind::OrbitingProjectile, &tuning, &mut scene);
        assert_eq!(weapon.level(), 0);
        assert_eq!(weapon.level_up(), 1);
        assert_eq!(weapon.kind(), WeaponKind::OrbitingProjectile);
    }
}
