//! Enemy registry and spawner
//!
//! Owns every live hostile. Enemies are spawned on a fixed cadence inside the
//! sectors the terrain streamer publishes, chase the hero in a straight line,
//! and are reaped (with one experience drop) once their hp reaches zero.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::consumable::Consumables;
use super::hero::Hero;
use super::scene::{Geometry, Material, Scene, Transform, VisualHandle};
use super::schedule::ScheduledTask;
use super::state::GameEvent;
use super::terrain::SectorCoord;
use crate::tuning::EnemyTuning;
use crate::{ms_to_secs, yaw_of};

/// Stable identity of an enemy for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    pub visual: VisualHandle,
    pub pos: Vec3,
    /// Facing (radians), always toward the hero after a pursuit step
    pub yaw: f32,
    pub speed: f32,
    /// Contact damage per tick
    pub damage: f32,
    pub hp: f32,
    pub max_hp: f32,
    /// Edge length of the enemy box
    pub size: f32,
}

impl Enemy {
    #[inline]
    pub fn half_size(&self) -> f32 {
        self.size * 0.5
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Share of max hp lost, in [0, 1]
    pub fn damage_ratio(&self) -> f32 {
        if self.max_hp <= 0.0 {
            return 1.0;
        }
        (1.0 - self.hp / self.max_hp).clamp(0.0, 1.0)
    }
}

pub struct EnemyRegistry {
    enemies: Vec<Enemy>,
    /// Sectors valid for spawning, replaced wholesale by the terrain each tick
    spawn_sectors: Vec<SectorCoord>,
    sector_size: f32,
    spawn_task: ScheduledTask,
    tuning: EnemyTuning,
    next_id: u32,
}

impl EnemyRegistry {
    pub fn new(tuning: EnemyTuning, sector_size: f32) -> Self {
        Self {
            enemies: Vec::new(),
            spawn_sectors: Vec::new(),
            sector_size,
            spawn_task: ScheduledTask::every(tuning.spawn_interval_ms),
            tuning,
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    /// Enemies still able to take damage (hp > 0, not yet reaped)
    pub fn alive_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.enemies.iter_mut().filter(|e| e.is_alive())
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: EnemyId) -> bool {
        self.get(id).is_some()
    }

    pub fn spawn_sectors(&self) -> &[SectorCoord] {
        &self.spawn_sectors
    }

    /// Replace the spawnable region
    pub fn set_sectors_for_spawn(&mut self, sectors: Vec<SectorCoord>) {
        self.spawn_sectors = sectors;
    }

    /// Insert a fresh enemy at `pos`
    pub fn spawn_at(&mut self, pos: Vec3, scene: &mut dyn Scene) -> EnemyId {
        let id = EnemyId(self.next_id);
        self.next_id += 1;

        let pos = Vec3::new(pos.x, 0.0, pos.z);
        let visual = scene.create_visual(
            Geometry::Enemy {
                size: self.tuning.size,
            },
            Material::Enemy,
        );
        scene.set_transform(visual, Transform::at(pos));

        // Record is complete before it becomes visible to any iteration
        self.enemies.push(Enemy {
            id,
            visual,
            pos,
            yaw: 0.0,
            speed: self.tuning.speed,
            damage: self.tuning.damage,
            hp: self.tuning.hp,
            max_hp: self.tuning.hp,
            size: self.tuning.size,
        });

        log::debug!("Enemy {:?} spawned at ({:.1}, {:.1})", id, pos.x, pos.z);
        id
    }

    /// Spawn inside a random spawnable sector; None if no sector is published
    pub fn spawn_random(&mut self, rng: &mut impl Rng, scene: &mut dyn Scene) -> Option<EnemyId> {
        if self.spawn_sectors.is_empty() {
            return None;
        }
        let sector = self.spawn_sectors[rng.random_range(0..self.spawn_sectors.len())];
        let pos = sector.random_point(self.sector_size, rng);
        Some(self.spawn_at(pos, scene))
    }

    /// Remove an enemy and its visual without loot; unknown ids are a no-op
    pub fn remove(&mut self, id: EnemyId, scene: &mut dyn Scene) -> Option<Enemy> {
        let Some(idx) = self.enemies.iter().position(|e| e.id == id) else {
            log::trace!("remove: enemy {:?} already gone", id);
            return None;
        };
        let enemy = self.enemies.remove(idx);
        scene.remove_visual(enemy.visual);
        Some(enemy)
    }

    /// One registry pass: spawn on cadence, reap the dead, pursue the hero
    pub fn update(
        &mut self,
        elapsed_ms: f64,
        hero: &mut Hero,
        consumables: &mut Consumables,
        rng: &mut impl Rng,
        scene: &mut dyn Scene,
        events: &mut Vec<GameEvent>,
    ) {
        let fires = self.spawn_task.advance(elapsed_ms);
        for _ in 0..fires {
            if let Some(id) = self.spawn_random(rng, scene) {
                events.push(GameEvent::EnemySpawned { id });
            }
        }

        self.reap(consumables, scene, events);
        self.pursue(ms_to_secs(elapsed_ms), hero, scene, events);
    }

    /// Remove every enemy at hp <= 0, dropping one experience orb each
    pub fn reap(
        &mut self,
        consumables: &mut Consumables,
        scene: &mut dyn Scene,
        events: &mut Vec<GameEvent>,
    ) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(|enemy| {
            if enemy.is_alive() {
                return true;
            }
            consumables.drop_exp_sphere(enemy.pos, scene);
            scene.remove_visual(enemy.visual);
            events.push(GameEvent::EnemyReaped {
                id: enemy.id,
                pos: enemy.pos,
            });
            log::debug!("Enemy {:?} reaped at ({:.1}, {:.1})", enemy.id, enemy.pos.x, enemy.pos.z);
            false
        });
        before - self.enemies.len()
    }

    fn pursue(&mut self, dt: f32, hero: &mut Hero, scene: &mut dyn Scene, events: &mut Vec<GameEvent>) {
        let target = hero.position();
        let contact_radius = self.tuning.contact_radius;
        let mut contact_damage = 0.0;

        for enemy in &mut self.enemies {
            let mut to_hero = target - enemy.pos;
            to_hero.y = 0.0;
            let dist = to_hero.length();

            if dist > 0.0 {
                // Never overshoot the hero
                let step = (enemy.speed * dt).min(dist);
                enemy.pos += to_hero / dist * step;
                enemy.yaw = yaw_of(to_hero);
            }
            scene.set_transform(enemy.visual, Transform::at_yaw(enemy.pos, enemy.yaw));
            scene.set_tint(enemy.visual, enemy.damage_ratio());

            if enemy.pos.distance(target) < contact_radius {
                contact_damage += hero.take_damage(enemy.damage);
            }
        }

        if contact_damage > 0.0 {
            events.push(GameEvent::HeroDamaged {
                amount: contact_damage,
            });
        }
    }

    /// Stop spawning; live enemies are left to the scene teardown
    pub fn dispose(&mut self) {
        self.spawn_task.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.spawn_task.is_cancelled()
    }
}
