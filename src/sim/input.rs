//! Keyboard state to heading resolution
//!
//! Holds at most two directional keys; the heading is re-resolved whenever the
//! held set changes, never per tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_1_SQRT_2;

/// A directional key, independent of physical layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirKey {
    Up,
    Down,
    Left,
    Right,
}

impl DirKey {
    /// Map a host key name (`w`, `ArrowUp`, ...) to a direction
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "w" | "arrowup" => Some(DirKey::Up),
            "s" | "arrowdown" => Some(DirKey::Down),
            "a" | "arrowleft" => Some(DirKey::Left),
            "d" | "arrowright" => Some(DirKey::Right),
            _ => None,
        }
    }
}

/// 8-way compass heading plus idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Heading {
    #[default]
    Idle,
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl Heading {
    /// Facing angle in degrees (None for idle: keep the current target)
    pub fn yaw_degrees(self) -> Option<f32> {
        match self {
            Heading::Idle => None,
            Heading::N => Some(0.0),
            Heading::NE => Some(-45.0),
            Heading::E => Some(-90.0),
            Heading::SE => Some(-135.0),
            Heading::S => Some(-180.0),
            Heading::SW => Some(-225.0),
            Heading::W => Some(-270.0),
            Heading::NW => Some(-315.0),
        }
    }

    /// Unit direction on the ground plane (north is -z)
    pub fn direction(self) -> Vec3 {
        let d = FRAC_1_SQRT_2;
        match self {
            Heading::Idle => Vec3::ZERO,
            Heading::N => Vec3::new(0.0, 0.0, -1.0),
            Heading::S => Vec3::new(0.0, 0.0, 1.0),
            Heading::E => Vec3::new(1.0, 0.0, 0.0),
            Heading::W => Vec3::new(-1.0, 0.0, 0.0),
            Heading::NE => Vec3::new(d, 0.0, -d),
            Heading::NW => Vec3::new(-d, 0.0, -d),
            Heading::SE => Vec3::new(d, 0.0, d),
            Heading::SW => Vec3::new(-d, 0.0, d),
        }
    }

    fn single(key: DirKey) -> Self {
        match key {
            DirKey::Up => Heading::N,
            DirKey::Down => Heading::S,
            DirKey::Left => Heading::W,
            DirKey::Right => Heading::E,
        }
    }

    /// Diagonal for an adjacent pair, None for opposite keys
    fn pair(a: DirKey, b: DirKey) -> Option<Self> {
        use DirKey::*;
        match (a, b) {
            (Up, Right) | (Right, Up) => Some(Heading::NE),
            (Up, Left) | (Left, Up) => Some(Heading::NW),
            (Down, Right) | (Right, Down) => Some(Heading::SE),
            (Down, Left) | (Left, Down) => Some(Heading::SW),
            _ => None,
        }
    }
}

/// Maximum simultaneously tracked directional keys
pub const MAX_HELD_KEYS: usize = 2;

/// Held directional keys, oldest first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputState {
    keys: Vec<DirKey>,
    any_held: bool,
    heading: Heading,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> &[DirKey] {
        &self.keys
    }

    pub fn any_held(&self) -> bool {
        self.any_held
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Register a key press; repeats of a held key are ignored
    pub fn press(&mut self, key: DirKey) {
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
        if self.keys.len() > MAX_HELD_KEYS {
            self.keys.remove(0);
        }
        self.refresh();
    }

    /// Register a key release; releasing a key that is not held is a no-op
    pub fn release(&mut self, key: DirKey) {
        if let Some(idx) = self.keys.iter().position(|k| *k == key) {
            self.keys.remove(idx);
        }
        self.refresh();
    }

    /// Drop every held key (focus loss); heading is kept
    pub fn clear(&mut self) {
        self.keys.clear();
        self.refresh();
    }

    fn refresh(&mut self) {
        self.any_held = !self.keys.is_empty();
        match self.keys.as_slice() {
            [key] => self.heading = Heading::single(*key),
            [a, b] => {
                if let Some(diagonal) = Heading::pair(*a, *b) {
                    self.heading = diagonal;
                }
            }
            _ => {}
        }
    }
}
