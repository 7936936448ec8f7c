//! Data-driven game balance
//!
//! Every section defaults to the values in [`crate::consts`]; a tuning file only
//! needs to name the fields it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning value `{field}` must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("pickup range is inverted: min {min} > max {max}")]
    InvertedPickupRange { min: u32, max: u32 },
}

/// Hero base stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroTuning {
    pub max_health: f32,
    pub defense: f32,
    pub speed: f32,
}

impl Default for HeroTuning {
    fn default() -> Self {
        Self {
            max_health: HERO_MAX_HEALTH,
            defense: HERO_DEFENSE,
            speed: HERO_SPEED,
        }
    }
}

/// Throttle and turning feel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    pub throttle_ramp: f32,
    pub throttle_decay: f32,
    pub yaw_damping: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            throttle_ramp: THROTTLE_RAMP,
            throttle_decay: THROTTLE_DECAY,
            yaw_damping: YAW_DAMPING,
        }
    }
}

/// Enemy archetype and spawn cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub spawn_interval_ms: f64,
    pub speed: f32,
    pub hp: f32,
    pub damage: f32,
    pub size: f32,
    pub contact_radius: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            spawn_interval_ms: ENEMY_SPAWN_INTERVAL_MS,
            speed: ENEMY_SPEED,
            hp: ENEMY_HP,
            damage: ENEMY_DAMAGE,
            size: ENEMY_SIZE,
            contact_radius: ENEMY_CONTACT_RADIUS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainTuning {
    pub sector_size: f32,
}

impl Default for TerrainTuning {
    fn default() -> Self {
        Self {
            sector_size: SECTOR_SIZE,
        }
    }
}

/// Experience orb economy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupTuning {
    pub per_sector_min: u32,
    pub per_sector_max: u32,
    pub radius: f32,
    pub exp: u32,
}

impl Default for PickupTuning {
    fn default() -> Self {
        Self {
            per_sector_min: PICKUPS_PER_SECTOR_MIN,
            per_sector_max: PICKUPS_PER_SECTOR_MAX,
            radius: PICKUP_RADIUS,
            exp: PICKUP_EXP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitTuning {
    pub radius: f32,
    /// Radians per second
    pub speed: f32,
    pub projectile_radius: f32,
    pub damage: f32,
}

impl Default for OrbitTuning {
    fn default() -> Self {
        Self {
            radius: ORBIT_RADIUS,
            speed: ORBIT_SPEED,
            projectile_radius: ORBIT_PROJECTILE_RADIUS,
            damage: ORBIT_DAMAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneTuning {
    pub radius: f32,
    /// Damage per tick
    pub damage: f32,
}

impl Default for ZoneTuning {
    fn default() -> Self {
        Self {
            radius: ZONE_RADIUS,
            damage: ZONE_DAMAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcTuning {
    pub radius: f32,
    /// Full angular width of the wedge in degrees
    pub width_deg: f32,
    pub damage: f32,
    pub interval_ms: f64,
}

impl Default for ArcTuning {
    fn default() -> Self {
        Self {
            radius: ARC_RADIUS,
            width_deg: ARC_WIDTH_DEG,
            damage: ARC_DAMAGE,
            interval_ms: ARC_INTERVAL_MS,
        }
    }
}

/// Complete balance sheet for a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub hero: HeroTuning,
    pub movement: MovementTuning,
    pub enemy: EnemyTuning,
    pub terrain: TerrainTuning,
    pub pickup: PickupTuning,
    pub orbit: OrbitTuning,
    pub zone: ZoneTuning,
    pub arc: ArcTuning,
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for dumping the effective defaults)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive: [(&'static str, f64); 7] = [
            ("terrain.sector_size", self.terrain.sector_size as f64),
            ("enemy.spawn_interval_ms", self.enemy.spawn_interval_ms),
            ("enemy.size", self.enemy.size as f64),
            ("arc.interval_ms", self.arc.interval_ms),
            ("arc.width_deg", self.arc.width_deg as f64),
            ("hero.max_health", self.hero.max_health as f64),
            ("pickup.radius", self.pickup.radius as f64),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        if self.pickup.per_sector_min > self.pickup.per_sector_max {
            return Err(TuningError::InvertedPickupRange {
                min: self.pickup.per_sector_min,
                max: self.pickup.per_sector_max,
            });
        }

        Ok(())
    }
}
