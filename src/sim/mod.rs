//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform code:
//! - Seeded RNG only
//! - Stable iteration order (player 1 before player 2, pucks in list order)
//! - Time comes in from the host as a timestamp; dt is clamped

pub mod collision;
pub mod effects;
pub mod input;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod view;

pub use collision::{BackWallHit, Contact};
pub use input::{KeyBindings, KeyState, MoveIntent};
pub use spawner::Spawner;
pub use state::{
    ActiveEffect, Body, GameEvent, Goal, MatchState, Obstacle, ObstacleShape, Paddle, Player,
    PowerUp, PowerUpKind, Puck, Score,
};
pub use tick::{TickInput, clamp_delta, resolve_collisions, tick};
pub use view::{SceneItem, SceneKind, SceneView};
