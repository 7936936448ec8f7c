//! Experience orbs: seeded per sector, dropped by enemies, collected by proximity

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::hero::Hero;
use super::scene::{Geometry, Material, Scene, Transform, VisualHandle};
use super::state::GameEvent;
use super::terrain::SectorCoord;
use crate::tuning::PickupTuning;

/// Visual scale of an orb relative to the unit dodecahedron
const ORB_SCALE: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PickupId(pub u32);

/// An experience orb lying on the ground
#[derive(Debug, Clone)]
pub struct Pickup {
    pub id: PickupId,
    pub pos: Vec3,
    pub exp: u32,
    pub visual: VisualHandle,
}

pub struct Consumables {
    pickups: Vec<Pickup>,
    tuning: PickupTuning,
    sector_size: f32,
    next_id: u32,
}

impl Consumables {
    pub fn new(tuning: PickupTuning, sector_size: f32) -> Self {
        Self {
            pickups: Vec::new(),
            tuning,
            sector_size,
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.pickups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pickups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pickup> {
        self.pickups.iter()
    }

    fn place(&mut self, pos: Vec3, scene: &mut dyn Scene) -> PickupId {
        let id = PickupId(self.next_id);
        self.next_id += 1;

        let pos = Vec3::new(pos.x, 0.0, pos.z);
        let visual = scene.create_visual(Geometry::Pickup, Material::Experience);
        scene.set_transform(
            visual,
            Transform {
                position: pos,
                rotation: Vec3::ZERO,
                scale: ORB_SCALE,
            },
        );

        self.pickups.push(Pickup {
            id,
            pos,
            exp: self.tuning.exp,
            visual,
        });
        id
    }

    /// Seed a new sector with a random batch of orbs; returns how many were placed
    pub fn generate_experience(
        &mut self,
        sector: SectorCoord,
        rng: &mut impl Rng,
        scene: &mut dyn Scene,
    ) -> usize {
        let amount = rng.random_range(self.tuning.per_sector_min..=self.tuning.per_sector_max) as usize;
        for _ in 0..amount {
            let pos = sector.random_point(self.sector_size, rng);
            self.place(pos, scene);
        }
        amount
    }

    /// Drop a single orb (enemy loot)
    pub fn drop_exp_sphere(&mut self, pos: Vec3, scene: &mut dyn Scene) -> PickupId {
        self.place(pos, scene)
    }

    /// Collect every orb within reach of the hero; returns experience credited
    pub fn check_pick_up(
        &mut self,
        hero: &mut Hero,
        scene: &mut dyn Scene,
        events: &mut Vec<GameEvent>,
    ) -> u32 {
        let hero_pos = hero.position();
        let radius = self.tuning.radius;
        let mut collected = 0;

        self.pickups.retain(|pickup| {
            if pickup.pos.distance(hero_pos) >= radius {
                return true;
            }
            scene.remove_visual(pickup.visual);
            collected += pickup.exp;
            false
        });

        if collected > 0 {
            events.push(GameEvent::PickupCollected { exp: collected });
            for level in hero.add_exp(collected) {
                log::info!("Hero reached level {}", level);
                events.push(GameEvent::LevelUp { level });
            }
        }
        collected
    }
}
