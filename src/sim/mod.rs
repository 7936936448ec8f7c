//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Time only enters through `tick`
//! - Seeded RNG only, owned by the session
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies; visuals go through `Scene`

pub mod arc;
pub mod consumable;
pub mod enemy;
pub mod hero;
pub mod input;
pub mod movement;
pub mod scene;
pub mod schedule;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod weapon;

pub use arc::Wedge;
pub use consumable::{Consumables, Pickup, PickupId};
pub use enemy::{Enemy, EnemyId, EnemyRegistry};
pub use hero::{Hero, HeroFrame, HeroStats, level_for_exp};
pub use input::{DirKey, Heading, InputState};
pub use movement::MovementController;
pub use scene::{Geometry, HeadlessScene, Material, Scene, Transform, VisualHandle};
pub use schedule::ScheduledTask;
pub use state::{GameEvent, GameState, SessionPhase};
pub use terrain::{SectorCoord, TerrainStreamer};
pub use tick::{FrameDriver, tick};
pub use weapon::{AreaZone, DirectionalArc, OrbitingProjectile, Weapon, WeaponKind, WeaponPolicy};
