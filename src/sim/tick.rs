//! Per-frame simulation tick
//!
//! Order within a tick is fixed: hero movement, then weapons, then terrain
//! streaming, enemies and pickups. Every combat decision therefore sees the
//! hero's position for the current tick.

use super::scene::Scene;
use super::state::{GameEvent, GameState, SessionPhase};
use crate::consts::{MAX_FRAME_MS, MAX_PENDING_EVENTS};

/// Advance the session by `elapsed_ms` of simulated time.
///
/// Events accumulate until the host calls [`GameState::drain_events`]; a host
/// that never drains keeps only the newest `MAX_PENDING_EVENTS`.
pub fn tick(state: &mut GameState, scene: &mut dyn Scene, elapsed_ms: f64) {
    // Don't tick if paused or game over
    if state.phase != SessionPhase::Running {
        return;
    }

    let elapsed_ms = elapsed_ms.max(0.0);
    state.ticks += 1;
    state.time_ms += elapsed_ms;

    // Movement, then weapons against the registry
    state.hero.update(elapsed_ms, &mut state.enemies, scene);

    // Streaming, spawn/reap/pursuit, pickups
    state.terrain.update(
        elapsed_ms,
        &mut state.hero,
        &mut state.enemies,
        &mut state.rng,
        scene,
        &mut state.events,
    );

    if state.hero.is_dead() {
        log::info!(
            "Hero died after {:.1}s at level {} ({} exp)",
            state.time_ms / 1000.0,
            state.hero.level(),
            state.hero.exp()
        );
        state.phase = SessionPhase::GameOver;
        state.events.push(GameEvent::HeroDied);
    }

    if state.events.len() > MAX_PENDING_EVENTS {
        let excess = state.events.len() - MAX_PENDING_EVENTS;
        state.events.drain(..excess);
        log::warn!("Event queue full, dropped {} oldest events", excess);
    }
}

/// Turns host frame timestamps into tick lengths
#[derive(Debug, Clone)]
pub struct FrameDriver {
    last_timestamp_ms: Option<f64>,
    max_frame_ms: f64,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            last_timestamp_ms: None,
            max_frame_ms: MAX_FRAME_MS,
        }
    }

    /// Elapsed time since the previous frame: 0 on the first frame, never
    /// negative, capped to prevent a stalled host from teleporting entities
    pub fn elapsed(&mut self, timestamp_ms: f64) -> f64 {
        let elapsed = match self.last_timestamp_ms {
            Some(last) => (timestamp_ms - last).clamp(0.0, self.max_frame_ms),
            None => 0.0,
        };
        self.last_timestamp_ms = Some(match self.last_timestamp_ms {
            Some(last) => last.max(timestamp_ms),
            None => timestamp_ms,
        });
        elapsed
    }

    /// Forget the previous timestamp (after a pause or a hidden tab)
    pub fn reset(&mut self) {
        self.last_timestamp_ms = None;
    }

    /// Measure and run one tick; returns the elapsed time used
    pub fn frame(&mut self, state: &mut GameState, scene: &mut dyn Scene, timestamp_ms: f64) -> f64 {
        let elapsed = self.elapsed(timestamp_ms);
        tick(state, scene, elapsed);
        elapsed
    }
}
