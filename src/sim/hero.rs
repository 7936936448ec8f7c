//! The player's avatar
//!
//! Owns position and orientation (through the movement controller), combat
//! stats, experience, and the equipped weapons.

use std::ops::RangeInclusive;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyRegistry;
use super::movement::MovementController;
use super::scene::{Geometry, Material, Scene, Transform, VisualHandle};
use super::weapon::{Weapon, WeaponKind};
use crate::consts::EXP_LEVELS;
use crate::ms_to_secs;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroStats {
    /// Not clamped: may go negative before the session notices the death
    pub hp: f32,
    pub max_hp: f32,
    /// Flat reduction applied to every incoming hit
    pub defense: f32,
    /// World units per second at full throttle
    pub speed: f32,
}

/// Snapshot of where the hero is and which way it faces, read by weapons
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroFrame {
    pub position: Vec3,
    pub yaw: f32,
}

pub struct Hero {
    pub stats: HeroStats,
    pos: Vec3,
    controls: MovementController,
    exp: u32,
    level: u32,
    weapons: Vec<Weapon>,
    tuning: Tuning,
    visual: VisualHandle,
}

impl Hero {
    /// Spawn at the origin with every weapon kind equipped
    pub fn new(tuning: &Tuning, scene: &mut dyn Scene) -> Self {
        let visual = scene.create_visual(Geometry::Hero, Material::Hero);
        scene.set_transform(visual, Transform::default());

        let mut hero = Self {
            stats: HeroStats {
                hp: tuning.hero.max_health,
                max_hp: tuning.hero.max_health,
                defense: tuning.hero.defense,
                speed: tuning.hero.speed,
            },
            pos: Vec3::ZERO,
            controls: MovementController::new(tuning.movement.clone()),
            exp: 0,
            level: 0,
            weapons: Vec::new(),
            tuning: tuning.clone(),
            visual,
        };
        for kind in WeaponKind::ALL {
            hero.add_weapon(kind, scene);
        }
        hero
    }

    pub fn position(&self) -> Vec3 {
        self.pos
    }

    pub fn set_position(&mut self, pos: Vec3) {
        self.pos = Vec3::new(pos.x, 0.0, pos.z);
    }

    pub fn yaw(&self) -> f32 {
        self.controls.yaw()
    }

    pub fn frame(&self) -> HeroFrame {
        HeroFrame {
            position: self.pos,
            yaw: self.controls.yaw(),
        }
    }

    pub fn controls(&self) -> &MovementController {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut MovementController {
        &mut self.controls
    }

    pub fn on_key_down(&mut self, code: &str) {
        self.controls.on_key_down(code);
    }

    pub fn on_key_up(&mut self, code: &str) {
        self.controls.on_key_up(code);
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn has_weapon(&self, kind: WeaponKind) -> bool {
        self.weapons.iter().any(|w| w.kind() == kind)
    }

    /// Equip and activate a weapon; a kind already equipped is a no-op
    pub fn add_weapon(&mut self, kind: WeaponKind, scene: &mut dyn Scene) -> bool {
        if self.has_weapon(kind) {
            return false;
        }
        let mut weapon = Weapon::new(kind, &self.tuning, scene);
        weapon.set_active(true);
        self.weapons.push(weapon);
        true
    }

    /// Raise an equipped weapon's level; None if the kind is not equipped
    pub fn level_up_weapon(&mut self, kind: WeaponKind) -> Option<u32> {
        self.weapons
            .iter_mut()
            .find(|w| w.kind() == kind)
            .map(Weapon::level_up)
    }

    pub fn exp(&self) -> u32 {
        self.exp
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Credit experience; returns the levels newly reached (possibly empty)
    pub fn add_exp(&mut self, amount: u32) -> RangeInclusive<u32> {
        self.exp = self.exp.saturating_add(amount);
        let previous = self.level;
        self.level = level_for_exp(self.exp);
        (previous + 1)..=self.level
    }

    /// Apply a hit after defense; returns the damage actually taken
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let taken = (amount - self.stats.defense).max(0.0);
        self.stats.hp -= taken;
        taken
    }

    pub fn is_dead(&self) -> bool {
        self.stats.hp <= 0.0
    }

    /// Move first, then let every weapon act from the new position
    pub fn update(&mut self, elapsed_ms: f64, enemies: &mut EnemyRegistry, scene: &mut dyn Scene) {
        let dt = ms_to_secs(elapsed_ms);
        self.controls.update(dt, self.stats.speed, &mut self.pos);
        scene.set_transform(self.visual, Transform::at_yaw(self.pos, self.controls.yaw()));

        let frame = self.frame();
        for weapon in &mut self.weapons {
            weapon.update_weapon(elapsed_ms, &frame, enemies, scene);
        }
    }

    pub fn dispose(&mut self) {
        self.controls.dispose();
        for weapon in &mut self.weapons {
            weapon.dispose();
        }
    }
}

/// Number of level thresholds reached by `exp`
pub fn level_for_exp(exp: u32) -> u32 {
    EXP_LEVELS.iter().take_while(|&&threshold| exp >= threshold).count() as u32
}
