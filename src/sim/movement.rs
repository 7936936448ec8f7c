//! Hero movement: throttle, heading and yaw damping
//!
//! Translation is an immediate step along the heading scaled by throttle;
//! only yaw is damped, always along the shorter rotation.

use glam::Vec3;

use super::input::{DirKey, Heading, InputState};
use crate::tuning::MovementTuning;
use crate::{clamp, damp, wrap_angle};

#[derive(Debug, Clone)]
pub struct MovementController {
    input: InputState,
    /// Acceleration scalar in [0, 1]
    throttle: f32,
    /// Current yaw (radians, wrapped to (-π, π])
    yaw: f32,
    /// Yaw the heading asks for (radians)
    target_yaw: f32,
    tuning: MovementTuning,
    /// False once disposed: key events are ignored
    listening: bool,
}

impl MovementController {
    pub fn new(tuning: MovementTuning) -> Self {
        Self {
            input: InputState::new(),
            throttle: 0.0,
            yaw: 0.0,
            target_yaw: 0.0,
            tuning,
            listening: true,
        }
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn heading(&self) -> Heading {
        self.input.heading()
    }

    pub fn throttle(&self) -> f32 {
        self.throttle
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Host key-down; non-directional codes are ignored
    pub fn on_key_down(&mut self, code: &str) {
        if !self.listening {
            return;
        }
        if let Some(key) = DirKey::from_code(code) {
            self.input.press(key);
        }
    }

    /// Host key-up; non-directional codes are ignored
    pub fn on_key_up(&mut self, code: &str) {
        if !self.listening {
            return;
        }
        if let Some(key) = DirKey::from_code(code) {
            self.input.release(key);
        }
    }

    /// Advance throttle, move `position` and damp yaw toward the heading
    pub fn update(&mut self, dt: f32, speed: f32, position: &mut Vec3) {
        self.update_throttle(dt);
        self.update_movement(dt, speed, position);
        self.update_rotation(dt);
    }

    fn update_throttle(&mut self, dt: f32) {
        self.throttle = if self.input.any_held() {
            clamp(self.throttle + self.tuning.throttle_ramp * dt, 0.0, 1.0)
        } else {
            clamp(self.throttle - self.tuning.throttle_decay * dt, 0.0, 1.0)
        };
    }

    fn update_movement(&mut self, dt: f32, speed: f32, position: &mut Vec3) {
        let heading = self.input.heading();
        *position += heading.direction() * self.throttle * speed * dt;
        position.y = 0.0;

        if let Some(degrees) = heading.yaw_degrees() {
            self.target_yaw = degrees.to_radians();
        }
    }

    fn update_rotation(&mut self, dt: f32) {
        // Shorter path: approach target expressed relative to the current yaw
        let diff = wrap_angle(self.target_yaw - self.yaw);
        let next = damp(self.yaw, self.yaw + diff, self.tuning.yaw_damping, dt);
        self.yaw = wrap_angle(next);
    }

    /// Detach from input; held keys are dropped so the hero coasts to a stop
    pub fn dispose(&mut self) {
        self.listening = false;
        self.input.clear();
    }

    /// Overwrite yaw state (spawn orientation, tests)
    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = wrap_angle(yaw);
        self.target_yaw = self.yaw;
    }
}
