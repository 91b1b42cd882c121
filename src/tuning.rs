//! Gameplay tuning
//!
//! Every number the simulation uses lives here so balance can be changed
//! from a JSON file without touching code. `Tuning::default()` is the
//! arcade table as shipped.

use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Reasons a tuning file is rejected
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// A size, speed or duration that must be strictly positive was not
    NonPositive(&'static str),
    /// A `[min, max)` range that is empty
    InvertedRange(&'static str),
    /// A factor that would break the paddle/goal/puck invariants
    BadFactor(&'static str),
    /// A position that falls outside the area it must stay in
    OutOfBounds(&'static str),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::NonPositive(field) => write!(f, "`{field}` must be positive"),
            TuningError::InvertedRange(field) => write!(f, "`{field}` range must have min < max"),
            TuningError::BadFactor(field) => write!(f, "`{field}` must be a finite positive factor"),
            TuningError::OutOfBounds(field) => write!(f, "`{field}` lies outside the table"),
        }
    }
}

impl std::error::Error for TuningError {}

/// A half-open `[min, max)` interval used for random draws
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform draw from the half-open range.
    ///
    /// `random_range` on floats can round up to `max`; such draws are
    /// retried a few times and then fall back to `min`.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f32 {
        const MAX_DRAWS: usize = 8;
        for _ in 0..MAX_DRAWS {
            let v = rng.random_range(self.min..self.max);
            if v < self.max {
                return v;
            }
        }
        self.min
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v < self.max
    }
}

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Table ===
    /// Back walls at x = ±half_length
    pub table_half_length: f32,
    /// Side walls at y = ±half_width
    pub table_half_width: f32,
    /// Largest dt accepted per frame (seconds)
    pub max_frame_dt: f32,

    // === Paddles ===
    pub paddle_base_radius: f32,
    pub paddle_speed: f32,
    pub paddle_x_limit: f32,
    /// Player 1 starts at (-start_x, 0), player 2 at (start_x, 0)
    pub paddle_start_x: f32,
    pub paddle_fling_speed: f32,

    // === Pucks ===
    pub puck_radius: f32,
    pub puck_damping: f32,
    /// Extra pucks added by MULTI_PUCK sit at (+offset) and (-offset)
    pub multi_puck_offset: Vec2,

    // === Goals ===
    pub goal_base_width: f32,

    // === Obstacles ===
    pub obstacle_lifetime: f32,
    pub obstacle_fling_speed: f32,
    pub obstacle_circle_radius: Range,
    pub obstacle_box_side: Range,
    /// Obstacles appear uniformly inside ±this
    pub obstacle_spawn_half_extents: Vec2,
    pub obstacle_first_spawn: f32,
    pub obstacle_respawn: Range,

    // === Power-ups ===
    pub power_up_radius: f32,
    pub power_up_spawn_half_extents: Vec2,
    pub power_up_first_spawn: f32,
    pub power_up_respawn: Range,
    pub effect_duration: f32,
    pub big_paddle_factor: f32,
    pub small_goal_factor: f32,
    pub fast_puck_multiplier: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            table_half_length: TABLE_HALF_LENGTH,
            table_half_width: TABLE_HALF_WIDTH,
            max_frame_dt: MAX_FRAME_DT,

            paddle_base_radius: PADDLE_BASE_RADIUS,
            paddle_speed: PADDLE_SPEED,
            paddle_x_limit: PADDLE_X_LIMIT,
            paddle_start_x: PADDLE_START_X,
            paddle_fling_speed: PADDLE_FLING_SPEED,

            puck_radius: PUCK_RADIUS,
            puck_damping: PUCK_DAMPING,
            multi_puck_offset: Vec2::new(0.2, 0.2),

            goal_base_width: GOAL_BASE_WIDTH,

            obstacle_lifetime: OBSTACLE_LIFETIME,
            obstacle_fling_speed: OBSTACLE_FLING_SPEED,
            obstacle_circle_radius: Range::new(0.2, 0.4),
            obstacle_box_side: Range::new(0.3, 0.7),
            obstacle_spawn_half_extents: Vec2::new(2.5, 1.5),
            obstacle_first_spawn: 3.0,
            obstacle_respawn: Range::new(3.0, 5.0),

            power_up_radius: POWER_UP_RADIUS,
            power_up_spawn_half_extents: Vec2::new(2.0, 1.0),
            power_up_first_spawn: 10.0,
            power_up_respawn: Range::new(10.0, 15.0),
            effect_duration: EFFECT_DURATION,
            big_paddle_factor: BIG_PADDLE_FACTOR,
            small_goal_factor: SMALL_GOAL_FACTOR,
            fast_puck_multiplier: FAST_PUCK_MULTIPLIER,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and validate `json`, falling back to defaults on any problem
    pub fn load_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            log::info!("Using default tuning");
            return Self::default();
        };

        match Self::from_json(json) {
            Ok(tuning) => match tuning.validate() {
                Ok(()) => {
                    log::info!("Loaded custom tuning");
                    tuning
                }
                Err(e) => {
                    log::warn!("Rejected tuning ({e}), using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Could not parse tuning ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Check that every value keeps the simulation well-formed
    pub fn validate(&self) -> Result<(), TuningError> {
        let positives = [
            ("table_half_length", self.table_half_length),
            ("table_half_width", self.table_half_width),
            ("max_frame_dt", self.max_frame_dt),
            ("paddle_base_radius", self.paddle_base_radius),
            ("paddle_speed", self.paddle_speed),
            ("paddle_x_limit", self.paddle_x_limit),
            ("paddle_fling_speed", self.paddle_fling_speed),
            ("puck_radius", self.puck_radius),
            ("goal_base_width", self.goal_base_width),
            ("obstacle_lifetime", self.obstacle_lifetime),
            ("obstacle_fling_speed", self.obstacle_fling_speed),
            ("obstacle_first_spawn", self.obstacle_first_spawn),
            ("power_up_radius", self.power_up_radius),
            ("power_up_first_spawn", self.power_up_first_spawn),
            ("effect_duration", self.effect_duration),
            ("obstacle_spawn_half_extents.x", self.obstacle_spawn_half_extents.x),
            ("obstacle_spawn_half_extents.y", self.obstacle_spawn_half_extents.y),
            ("power_up_spawn_half_extents.x", self.power_up_spawn_half_extents.x),
            ("power_up_spawn_half_extents.y", self.power_up_spawn_half_extents.y),
        ];
        for (name, value) in positives {
            if !(value > 0.0 && value.is_finite()) {
                return Err(TuningError::NonPositive(name));
            }
        }

        let ranges = [
            ("obstacle_circle_radius", self.obstacle_circle_radius),
            ("obstacle_box_side", self.obstacle_box_side),
            ("obstacle_respawn", self.obstacle_respawn),
            ("power_up_respawn", self.power_up_respawn),
        ];
        for (name, range) in ranges {
            if !(range.min.is_finite() && range.max.is_finite() && range.min < range.max) {
                return Err(TuningError::InvertedRange(name));
            }
        }

        let factors = [
            ("puck_damping", self.puck_damping),
            ("big_paddle_factor", self.big_paddle_factor),
            ("small_goal_factor", self.small_goal_factor),
            ("fast_puck_multiplier", self.fast_puck_multiplier),
        ];
        for (name, value) in factors {
            if !(value > 0.0 && value.is_finite()) {
                return Err(TuningError::BadFactor(name));
            }
        }

        // Paddle clamping needs room on the table even at full size
        let big_radius = self.paddle_base_radius * self.big_paddle_factor;
        if big_radius >= self.table_half_width || big_radius >= self.paddle_x_limit {
            return Err(TuningError::BadFactor("big_paddle_factor"));
        }
        if self.paddle_base_radius >= self.table_half_width
            || self.paddle_base_radius >= self.paddle_x_limit
        {
            return Err(TuningError::BadFactor("paddle_base_radius"));
        }

        if self.paddle_x_limit > self.table_half_length {
            return Err(TuningError::OutOfBounds("paddle_x_limit"));
        }
        if !(self.paddle_start_x >= self.paddle_base_radius
            && self.paddle_start_x <= self.paddle_x_limit)
        {
            return Err(TuningError::OutOfBounds("paddle_start_x"));
        }

        // Extra pucks must appear fully on the table
        let offset = self.multi_puck_offset.abs();
        if !(offset.x + self.puck_radius < self.table_half_length
            && offset.y + self.puck_radius < self.table_half_width)
        {
            return Err(TuningError::OutOfBounds("multi_puck_offset"));
        }

        Ok(())
    }
}
