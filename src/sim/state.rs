//! Session state and core simulation types
//!
//! One `GameState` is one independent world: it owns the hero, the enemy
//! registry and the terrain, plus the seeded RNG every random choice draws from.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{EnemyId, EnemyRegistry};
use super::hero::Hero;
use super::scene::Scene;
use super::terrain::{SectorCoord, TerrainStreamer};
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Ticks advance the simulation
    Running,
    /// Ticks are skipped; key state is still tracked
    Paused,
    /// Hero health reached zero; terminal
    GameOver,
}

/// Something the host may want to react to (sound, HUD, effects)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SectorCreated { coord: SectorCoord },
    EnemySpawned { id: EnemyId },
    EnemyReaped { id: EnemyId, pos: Vec3 },
    PickupCollected { exp: u32 },
    /// Total contact damage taken during one tick
    HeroDamaged { amount: f32 },
    LevelUp { level: u32 },
    HeroDied,
}

/// Complete state of one play session
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: SessionPhase,
    pub hero: Hero,
    pub enemies: EnemyRegistry,
    pub terrain: TerrainStreamer,
    pub(crate) rng: Pcg32,
    /// Simulated time (ms) across all running ticks
    pub time_ms: f64,
    /// Number of running ticks processed
    pub ticks: u64,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with the given seed; the origin sector is created
    /// immediately
    pub fn new(seed: u64, tuning: &Tuning, scene: &mut dyn Scene) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut events = Vec::new();

        let hero = Hero::new(tuning, scene);
        let enemies = EnemyRegistry::new(tuning.enemy.clone(), tuning.terrain.sector_size);
        let terrain = TerrainStreamer::new(tuning, &mut rng, scene, &mut events);

        log::info!("Session started (seed {})", seed);

        Self {
            seed,
            phase: SessionPhase::Running,
            hero,
            enemies,
            terrain,
            rng,
            time_ms: 0.0,
            ticks: 0,
            events,
        }
    }

    pub fn on_key_down(&mut self, code: &str) {
        self.hero.on_key_down(code);
    }

    pub fn on_key_up(&mut self, code: &str) {
        self.hero.on_key_up(code);
    }

    /// Pause or resume; has no effect once the session is over
    pub fn set_paused(&mut self, paused: bool) {
        self.phase = match (self.phase, paused) {
            (SessionPhase::GameOver, _) => SessionPhase::GameOver,
            (_, true) => SessionPhase::Paused,
            (_, false) => SessionPhase::Running,
        };
    }

    pub fn is_over(&self) -> bool {
        self.phase == SessionPhase::GameOver
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Hand pending events to the host; call once per frame, the queue is
    /// capped and drops its oldest entries when left undrained
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Cancel input, weapon timers and enemy spawning.
    ///
    /// Visuals are left to the host's scene teardown.
    pub fn dispose(&mut self) {
        self.hero.dispose();
        self.terrain.dispose(&mut self.enemies);
    }
}
