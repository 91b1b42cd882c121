//! Air Hockey - a two-player arcade table with hazards and power-ups
//!
//! Core modules:
//! - `sim`: Simulation (physics, collisions, power-ups, spawning, match state)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, camera control and the score overlay live in the host and only
//! read [`sim::MatchState`] (or a [`sim::SceneView`] captured from it).

pub mod sim;
pub mod tuning;

pub use sim::{KeyState, MatchState, SceneView};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest simulation step accepted from the frame clock (seconds)
    pub const MAX_FRAME_DT: f32 = 0.016;

    /// Table half-extents. Side walls at y = ±2, back walls (and goals) at x = ±4
    pub const TABLE_HALF_LENGTH: f32 = 4.0;
    pub const TABLE_HALF_WIDTH: f32 = 2.0;

    /// Paddle defaults
    pub const PADDLE_BASE_RADIUS: f32 = 0.25;
    pub const PADDLE_SPEED: f32 = 4.0;
    /// Paddles never travel past this |x|
    pub const PADDLE_X_LIMIT: f32 = 3.8;
    pub const PADDLE_START_X: f32 = 3.0;

    /// Puck defaults
    pub const PUCK_RADIUS: f32 = 0.08;
    /// Per-tick velocity decay (not normalized to dt)
    pub const PUCK_DAMPING: f32 = 0.985;
    /// Puck speed after being struck by a paddle
    pub const PADDLE_FLING_SPEED: f32 = 7.0;
    /// Puck speed after glancing off an obstacle
    pub const OBSTACLE_FLING_SPEED: f32 = 5.0;

    /// Goal mouth width before any SMALL_GOAL effect
    pub const GOAL_BASE_WIDTH: f32 = 1.2;

    /// Obstacles
    pub const OBSTACLE_LIFETIME: f32 = 6.0;

    /// World power-up pickup radius
    pub const POWER_UP_RADIUS: f32 = 0.15;
    /// How long a collected effect stays active (seconds)
    pub const EFFECT_DURATION: f32 = 10.0;
    pub const BIG_PADDLE_FACTOR: f32 = 1.5;
    pub const SMALL_GOAL_FACTOR: f32 = 0.4;
    pub const FAST_PUCK_MULTIPLIER: f32 = 2.0;
}

/// Unit direction of `delta`, treating a zero-length delta as length 1.
///
/// Returns the (possibly zero) direction and the distance that was used.
/// A concentric pair therefore yields a zero direction instead of NaN.
#[inline]
pub fn guarded_direction(delta: Vec2) -> (Vec2, f32) {
    let distance = delta.length();
    let distance = if distance == 0.0 { 1.0 } else { distance };
    (delta / distance, distance)
}

/// Closest point to `point` on an axis-aligned box centered at `center`
#[inline]
pub fn closest_point_on_box(point: Vec2, center: Vec2, half_extents: Vec2) -> Vec2 {
    point.clamp(center - half_extents, center + half_extents)
}
