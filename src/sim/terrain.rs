//! Sector streaming around the hero
//!
//! The world is an unbounded grid of square sectors. Every tick the 3x3 block
//! around the hero's sector is guaranteed to exist; sectors are never removed.

use std::collections::HashMap;
use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::consumable::Consumables;
use super::enemy::EnemyRegistry;
use super::hero::Hero;
use super::scene::{Geometry, Material, Scene, Transform, VisualHandle};
use super::state::GameEvent;
use crate::tuning::Tuning;

/// Integer grid coordinate of a sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SectorCoord {
    pub x: i32,
    pub y: i32,
}

impl SectorCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Sector whose center is nearest to `pos`, independently per axis
    pub fn from_position(pos: Vec3, sector_size: f32) -> Self {
        Self {
            x: (pos.x / sector_size).round() as i32,
            y: (pos.z / sector_size).round() as i32,
        }
    }

    /// World-space center (grid y maps to world z)
    pub fn center(&self, sector_size: f32) -> Vec3 {
        Vec3::new(self.x as f32 * sector_size, 0.0, self.y as f32 * sector_size)
    }

    /// The 8 axis and diagonal neighbors
    pub fn neighbors(&self) -> [SectorCoord; 8] {
        let Self { x, y } = *self;
        [
            Self::new(x + 1, y),
            Self::new(x, y + 1),
            Self::new(x + 1, y + 1),
            Self::new(x + 1, y - 1),
            Self::new(x - 1, y),
            Self::new(x, y - 1),
            Self::new(x - 1, y - 1),
            Self::new(x - 1, y + 1),
        ]
    }

    /// Uniformly random point inside the sector footprint
    pub fn random_point(&self, sector_size: f32, rng: &mut impl Rng) -> Vec3 {
        let center = self.center(sector_size);
        let dx = (rng.random::<f32>() - 0.5) * sector_size;
        let dz = (rng.random::<f32>() - 0.5) * sector_size;
        Vec3::new(center.x + dx, 0.0, center.z + dz)
    }
}

pub struct TerrainStreamer {
    /// Every sector created this session, with its ground visual
    sectors: HashMap<SectorCoord, VisualHandle>,
    current: SectorCoord,
    sector_size: f32,
    consumables: Consumables,
}

impl TerrainStreamer {
    /// Create the streamer and the origin sector
    pub fn new(
        tuning: &Tuning,
        rng: &mut impl Rng,
        scene: &mut dyn Scene,
        events: &mut Vec<GameEvent>,
    ) -> Self {
        let sector_size = tuning.terrain.sector_size;
        let mut terrain = Self {
            sectors: HashMap::new(),
            current: SectorCoord::default(),
            sector_size,
            consumables: Consumables::new(tuning.pickup.clone(), sector_size),
        };
        terrain.ensure_sector(SectorCoord::default(), rng, scene, events);
        terrain
    }

    pub fn current_sector(&self) -> SectorCoord {
        self.current
    }

    pub fn sector_size(&self) -> f32 {
        self.sector_size
    }

    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    pub fn has_sector(&self, coord: SectorCoord) -> bool {
        self.sectors.contains_key(&coord)
    }

    pub fn consumables(&self) -> &Consumables {
        &self.consumables
    }

    pub fn consumables_mut(&mut self) -> &mut Consumables {
        &mut self.consumables
    }

    /// Create `coord` if it does not exist yet. Returns true if it was created.
    pub fn ensure_sector(
        &mut self,
        coord: SectorCoord,
        rng: &mut impl Rng,
        scene: &mut dyn Scene,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if self.sectors.contains_key(&coord) {
            return false;
        }

        let visual = scene.create_visual(
            Geometry::Sector {
                size: self.sector_size,
            },
            Material::Terrain,
        );
        scene.set_transform(
            visual,
            Transform {
                position: coord.center(self.sector_size),
                rotation: Vec3::new(FRAC_PI_2, 0.0, 0.0),
                scale: 1.0,
            },
        );
        self.sectors.insert(coord, visual);

        let seeded = self
            .consumables
            .generate_experience(coord, rng, scene);
        log::debug!(
            "Sector ({}, {}) created with {} experience orbs",
            coord.x,
            coord.y,
            seeded
        );
        events.push(GameEvent::SectorCreated { coord });
        true
    }

    /// Re-derive the hero's sector from its position
    pub fn update_current_sector(&mut self, hero_pos: Vec3) -> SectorCoord {
        self.current = SectorCoord::from_position(hero_pos, self.sector_size);
        self.current
    }

    /// Stream the hero's sector and its neighborhood, publish the 8 neighbors
    /// as spawn sectors, then advance enemies and pickups against the hero's
    /// current position
    pub fn update(
        &mut self,
        elapsed_ms: f64,
        hero: &mut Hero,
        enemies: &mut EnemyRegistry,
        rng: &mut impl Rng,
        scene: &mut dyn Scene,
        events: &mut Vec<GameEvent>,
    ) {
        let current = self.update_current_sector(hero.position());
        // A teleport or a long step can land outside the streamed neighborhood
        self.ensure_sector(current, rng, scene, events);

        let near = current.neighbors();
        for coord in near {
            self.ensure_sector(coord, rng, scene, events);
        }
        enemies.set_sectors_for_spawn(near.to_vec());

        enemies.update(elapsed_ms, hero, &mut self.consumables, rng, scene, events);
        self.consumables.check_pick_up(hero, scene, events);
    }

    /// Tear down the enemy registry; sector visuals and pickups stay with the scene
    pub fn dispose(&mut self, enemies: &mut EnemyRegistry) {
        enemies.dispose();
    }
}
