//! Match state and entity model
//!
//! Everything the simulation owns lives in [`MatchState`]. Entities share a
//! [`Body`] (placement on the table) and carry their own per-kind data.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::input::KeyState;
use super::spawner::Spawner;
use super::tick::{TickInput, clamp_delta, tick};
use crate::tuning::{Tuning, TuningError};

/// One of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// Defends the x = -4 end, shoots toward x = +4
    One,
    /// Defends the x = +4 end, shoots toward x = -4
    Two,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Sign of the x coordinate of the goal mouth this player shoots at
    #[inline]
    pub fn attack_sign(self) -> f32 {
        match self {
            Player::One => 1.0,
            Player::Two => -1.0,
        }
    }
}

/// Shared placement record for every entity on the table.
///
/// `z` and `scale` only matter to the renderer; physics is purely 2D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub z: f32,
    pub scale: Vec3,
    pub active: bool,
}

impl Body {
    pub fn new(pos: Vec2, z: f32, scale: Vec3) -> Self {
        Self {
            pos,
            z,
            scale,
            active: true,
        }
    }

    /// Render-space translation
    #[inline]
    pub fn translation(&self) -> Vec3 {
        self.pos.extend(self.z)
    }
}

/// A puck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Puck {
    pub body: Body,
    pub vel: Vec2,
    pub radius: f32,
}

impl Puck {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            body: Body::new(pos, 0.04, Vec3::new(radius * 2.0, radius * 2.0, radius)),
            vel: Vec2::ZERO,
            radius,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// Integrate position, then apply per-tick damping
    pub fn advance(&mut self, dt: f32, speed_multiplier: f32, damping: f32) {
        self.body.pos += self.vel * dt * speed_multiplier;
        self.vel *= damping;
    }
}

/// A player's paddle. Both paddles live for the whole match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub body: Body,
    pub owner: Player,
    pub base_radius: f32,
    /// Either `base_radius` or `base_radius * big_paddle_factor`
    pub radius: f32,
    /// Units per second along each held axis
    pub speed: f32,
    /// Outer |x| limit
    pub x_limit: f32,
    /// Side walls at y = ±half_width
    pub half_width: f32,
    /// Where the paddle goes back to after a goal
    pub start: Vec2,
}

impl Paddle {
    pub fn new(owner: Player, tuning: &Tuning) -> Self {
        let start = Vec2::new(-owner.attack_sign() * tuning.paddle_start_x, 0.0);
        let radius = tuning.paddle_base_radius;
        Self {
            body: Body::new(start, 0.05, Vec3::new(radius * 2.0, radius * 2.0, 0.1)),
            owner,
            base_radius: radius,
            radius,
            speed: tuning.paddle_speed,
            x_limit: tuning.paddle_x_limit,
            half_width: tuning.table_half_width,
            start,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
        self.body.scale = Vec3::new(radius * 2.0, radius * 2.0, 0.1);
    }

    /// Move along `dir` (one axis step per held key) and clamp to the
    /// paddle's own half of the table.
    pub fn move_by(&mut self, dir: Vec2, dt: f32) {
        let (min_x, max_x) = match self.owner {
            Player::One => (-self.x_limit, -self.radius),
            Player::Two => (self.radius, self.x_limit),
        };
        let next = self.body.pos + dir * self.speed * dt;
        self.body.pos.x = next.x.clamp(min_x, max_x);
        self.body.pos.y = next
            .y
            .clamp(-self.half_width + self.radius, self.half_width - self.radius);
    }

    pub fn reset_position(&mut self) {
        self.body.pos = self.start;
    }
}

/// Obstacle geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleShape {
    Circle { radius: f32 },
    Box { width: f32, height: f32 },
}

impl ObstacleShape {
    /// Render scale for a unit mesh
    pub fn scale(&self) -> Vec3 {
        match *self {
            ObstacleShape::Circle { radius } => Vec3::new(radius * 2.0, radius * 2.0, 0.1),
            ObstacleShape::Box { width, height } => Vec3::new(width, height, 0.1),
        }
    }
}

/// A temporary hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub body: Body,
    pub shape: ObstacleShape,
    /// Seconds left before it disappears
    pub lifetime: f32,
}

impl Obstacle {
    pub fn new(pos: Vec2, shape: ObstacleShape, lifetime: f32) -> Self {
        Self {
            body: Body::new(pos, 0.05, shape.scale()),
            shape,
            lifetime,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    /// Count down lifetime, deactivating at zero
    pub fn age(&mut self, dt: f32) {
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            self.body.active = false;
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    FastPuck,
    BigPaddle,
    MultiPuck,
    SmallGoal,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::FastPuck,
        PowerUpKind::BigPaddle,
        PowerUpKind::MultiPuck,
        PowerUpKind::SmallGoal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::FastPuck => "FAST_PUCK",
            PowerUpKind::BigPaddle => "BIG_PADDLE",
            PowerUpKind::MultiPuck => "MULTI_PUCK",
            PowerUpKind::SmallGoal => "SMALL_GOAL",
        }
    }
}

/// A collectible lying on the table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub body: Body,
    pub kind: PowerUpKind,
    pub radius: f32,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind, radius: f32) -> Self {
        Self {
            body: Body::new(pos, 0.05, Vec3::new(radius * 2.0, radius * 2.0, 0.1)),
            kind,
            radius,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }
}

/// The single effect currently modifying the rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub owner: Player,
    pub kind: PowerUpKind,
    /// Seconds left
    pub remaining: f32,
}

/// A goal mouth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub width: f32,
    pub base_width: f32,
}

impl Goal {
    pub fn new(base_width: f32) -> Self {
        Self {
            width: base_width,
            base_width,
        }
    }

    #[inline]
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn restore(&mut self) {
        self.width = self.base_width;
    }
}

/// Goals scored by each player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player1: u32,
    pub player2: u32,
}

impl Score {
    pub fn get(&self, player: Player) -> u32 {
        match player {
            Player::One => self.player1,
            Player::Two => self.player2,
        }
    }

    pub fn increment(&mut self, player: Player) {
        match player {
            Player::One => self.player1 += 1,
            Player::Two => self.player2 += 1,
        }
    }
}

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Goal { scorer: Player },
    ObstacleSpawned,
    ObstacleExpired,
    PowerUpSpawned(PowerUpKind),
    EffectActivated { owner: Player, kind: PowerUpKind },
    /// Ran out of time
    EffectExpired(PowerUpKind),
    /// Ended early by a goal or a newer pickup
    EffectCleared(PowerUpKind),
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct MatchState {
    pub tuning: Tuning,
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    /// Timestamp (ms) of the previous `update`
    pub last_time: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Live pucks; the first one survives a MULTI_PUCK collapse
    pub pucks: Vec<Puck>,
    /// Indexed by [`Player::index`]
    pub paddles: [Paddle; 2],
    /// `goals[p]` is the mouth player `p` shoots at
    pub goals: [Goal; 2],
    pub score: Score,
    pub obstacles: Vec<Obstacle>,
    /// At most one pickup on the table
    pub power_up: Option<PowerUp>,
    /// At most one effect match-wide
    pub active_effect: Option<ActiveEffect>,
    /// Exactly 1.0, or the FAST_PUCK multiplier while it is active
    pub speed_multiplier: f32,
    pub spawner: Spawner,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
}

impl MatchState {
    /// New match with default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(Tuning::default(), seed)
    }

    /// New match with custom tuning. Rejects tuning that fails
    /// [`Tuning::validate`].
    pub fn with_tuning(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(tuning, seed))
    }

    fn build(tuning: Tuning, seed: u64) -> Self {
        let goal_width = tuning.goal_base_width;
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            last_time: 0.0,
            time_ticks: 0,
            pucks: Vec::new(),
            paddles: [
                Paddle::new(Player::One, &tuning),
                Paddle::new(Player::Two, &tuning),
            ],
            goals: [Goal::new(goal_width), Goal::new(goal_width)],
            score: Score::default(),
            obstacles: Vec::new(),
            power_up: None,
            active_effect: None,
            speed_multiplier: 1.0,
            spawner: Spawner::new(&tuning),
            events: Vec::new(),
            tuning,
        };
        state.spawn_center_puck();
        log::info!("Match created (seed {seed})");
        state
    }

    /// Per-frame entry point: derive dt from the host clock and run one tick
    pub fn update(&mut self, now_ms: f64, keys: &KeyState) {
        let dt = clamp_delta(now_ms, self.last_time, self.tuning.max_frame_dt);
        self.last_time = now_ms;
        let input = TickInput::from_keys(keys);
        tick(self, &input, dt);
    }

    #[inline]
    pub fn paddle(&self, player: Player) -> &Paddle {
        &self.paddles[player.index()]
    }

    #[inline]
    pub fn paddle_mut(&mut self, player: Player) -> &mut Paddle {
        &mut self.paddles[player.index()]
    }

    /// Goal mouth `player` shoots at
    #[inline]
    pub fn goal(&self, player: Player) -> &Goal {
        &self.goals[player.index()]
    }

    /// Replace every puck with a single resting puck at the center
    pub fn spawn_center_puck(&mut self) {
        self.pucks.clear();
        self.pucks.push(Puck::new(Vec2::ZERO, self.tuning.puck_radius));
    }

    pub fn reset_paddles(&mut self) {
        for paddle in &mut self.paddles {
            paddle.reset_position();
        }
    }
}
