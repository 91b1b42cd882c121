//! Per-frame simulation tick
//!
//! One call advances the match by `dt` seconds in a fixed order: paddles,
//! pucks, spawners, obstacle lifetimes, effect timer, then a single
//! collision pass. Later collision checks see what earlier ones changed;
//! there is no second pass.

use super::collision::{self, BackWallHit};
use super::effects;
use super::input::{KeyBindings, KeyState, MoveIntent};
use super::spawner;
use super::state::{GameEvent, MatchState, Player};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Indexed by [`Player::index`]
    pub paddles: [MoveIntent; 2],
}

impl TickInput {
    /// Read both players' bindings from the key map
    pub fn from_keys(keys: &KeyState) -> Self {
        Self {
            paddles: Player::BOTH
                .map(|player| MoveIntent::from_keys(keys, &KeyBindings::for_player(player))),
        }
    }
}

/// Seconds between two host timestamps (ms), limited to `[0, max_dt]`.
///
/// The upper bound keeps a stalled frame (tab resume, debugger) from
/// teleporting pucks through walls; the lower bound stops a clock that
/// went backwards from running the simulation in reverse.
pub fn clamp_delta(now_ms: f64, last_ms: f64, max_dt: f32) -> f32 {
    let dt = ((now_ms - last_ms) / 1000.0) as f32;
    if dt.is_nan() {
        return 0.0;
    }
    dt.clamp(0.0, max_dt)
}

/// Advance the match by one step
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.time_ticks += 1;

    // 1. Paddles
    for player in Player::BOTH {
        let paddle = state.paddle_mut(player);
        for dir in input.paddles[player.index()].steps() {
            paddle.move_by(dir, dt);
        }
    }

    // 2. Pucks
    let multiplier = state.speed_multiplier;
    let damping = state.tuning.puck_damping;
    for puck in &mut state.pucks {
        puck.advance(dt, multiplier, damping);
    }

    // 3-5. Spawners and lifetimes
    spawner::advance_obstacle_timer(state, dt);
    spawner::age_obstacles(state, dt);
    spawner::advance_power_up_timer(state, dt);

    // 6. Effect timer
    effects::advance(state, dt);

    // 7. Collisions
    resolve_collisions(state);
}

/// The collision pass. Order matters and is fixed:
/// per puck (paddles, obstacles, side walls, back walls), then
/// paddles against obstacles, then paddles against the pickup.
pub fn resolve_collisions(state: &mut MatchState) {
    let paddle_fling = state.tuning.paddle_fling_speed;
    let obstacle_fling = state.tuning.obstacle_fling_speed;
    let half_width = state.tuning.table_half_width;
    let half_length = state.tuning.table_half_length;

    for i in 0..state.pucks.len() {
        let puck = &mut state.pucks[i];

        for paddle in &state.paddles {
            collision::puck_paddle(puck, paddle, paddle_fling);
        }

        for obstacle in &state.obstacles {
            collision::puck_obstacle(puck, obstacle, obstacle_fling);
        }

        collision::puck_side_walls(puck, half_width);

        let back_wall = collision::puck_back_walls(puck, &state.goals, half_length);
        if let Some(BackWallHit::Goal(scorer)) = back_wall {
            score_goal(state, scorer);
            // A goal ends the puck pass for every remaining puck this tick
            break;
        }
    }

    for paddle in &mut state.paddles {
        for obstacle in &state.obstacles {
            collision::paddle_obstacle(paddle, obstacle);
        }
    }

    // Player 1 is checked first, so a simultaneous touch goes to player 1
    let collector = state.power_up.as_ref().and_then(|power_up| {
        state
            .paddles
            .iter()
            .find(|paddle| collision::paddle_power_up(paddle, power_up))
            .map(|paddle| (paddle.owner, power_up.kind))
    });
    if let Some((owner, kind)) = collector {
        state.power_up = None;
        effects::activate(state, owner, kind);
    }
}

/// Credit a goal and put the table back to its kick-off layout
pub fn score_goal(state: &mut MatchState, scorer: Player) {
    state.score.increment(scorer);
    log::info!(
        "Goal for player {}! Score {} - {}",
        scorer.index() + 1,
        state.score.player1,
        state.score.player2
    );
    state.events.push(GameEvent::Goal { scorer });

    state.spawn_center_puck();
    if let Some(cleared) = effects::deactivate(state) {
        state.events.push(GameEvent::EffectCleared(cleared.kind));
    }
    state.reset_paddles();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, ObstacleShape, PowerUp, PowerUpKind};
    use glam::Vec2;

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_clamp_delta() {
        assert_eq!(clamp_delta(1000.0, 0.0, 0.016), 0.016);
        assert!((clamp_delta(1010.0, 1000.0, 0.016) - 0.01).abs() < 1e-6);
        assert_eq!(clamp_delta(900.0, 1000.0, 0.016), 0.0);
        assert_eq!(clamp_delta(f64::NAN, 1000.0, 0.016), 0.0);
    }

    #[test]
    fn test_held_keys_move_paddles() {
        let mut state = MatchState::new(1);
        let mut keys = KeyState::new();
        keys.press("w");
        keys.press("arrowleft");
        let input = TickInput::from_keys(&keys);
        tick(&mut state, &input, 0.01);
        assert!((state.paddle(Player::One).pos() - Vec2::new(-3.0, 0.04)).length() < 1e-6);
        assert!((state.paddle(Player::Two).pos() - Vec2::new(2.96, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_goal_scenario() {
        let mut state = MatchState::new(1);
        state.pucks[0].body.pos = Vec2::new(-4.02, 0.0);
        state.paddle_mut(Player::One).body.pos = Vec2::new(-2.0, 1.0);
        state.paddle_mut(Player::Two).body.pos = Vec2::new(1.0, -1.0);

        resolve_collisions(&mut state);

        assert_eq!(state.score.player2, 1);
        assert_eq!(state.score.player1, 0);
        assert_eq!(state.pucks.len(), 1);
        assert_eq!(state.pucks[0].pos(), Vec2::ZERO);
        assert_eq!(state.pucks[0].vel, Vec2::ZERO);
        assert_eq!(state.paddle(Player::One).pos(), Vec2::new(-3.0, 0.0));
        assert_eq!(state.paddle(Player::Two).pos(), Vec2::new(3.0, 0.0));
        assert_eq!(state.events, vec![GameEvent::Goal { scorer: Player::Two }]);
    }

    #[test]
    fn test_back_wall_bounce_scenario() {
        let mut state = MatchState::new(1);
        state.pucks[0].body.pos = Vec2::new(-4.02, 1.5);
        state.pucks[0].vel = Vec2::new(-3.0, 0.0);

        resolve_collisions(&mut state);

        assert_eq!(state.pucks[0].vel.x, 3.0);
        assert!((state.pucks[0].pos().x - (-4.0 + 0.08)).abs() < 1e-6);
        assert_eq!(state.score.player1, 0);
        assert_eq!(state.score.player2, 0);
    }

    #[test]
    fn test_goal_skips_remaining_pucks() {
        let mut state = MatchState::new(1);
        effects::activate(&mut state, Player::One, PowerUpKind::MultiPuck);
        // First puck scores, third would also score on the other side
        state.pucks[0].body.pos = Vec2::new(4.02, 0.0);
        state.pucks[2].body.pos = Vec2::new(-4.02, 0.0);

        resolve_collisions(&mut state);

        assert_eq!(state.score.player1, 1);
        assert_eq!(state.score.player2, 0);
        assert_eq!(state.pucks.len(), 1);
        assert!(state.active_effect.is_none());
        assert!(state
            .events
            .contains(&GameEvent::EffectCleared(PowerUpKind::MultiPuck)));
    }

    #[test]
    fn test_goal_clears_effect() {
        let mut state = MatchState::new(1);
        effects::activate(&mut state, Player::Two, PowerUpKind::SmallGoal);
        assert!((state.goal(Player::One).width - 0.48).abs() < 1e-6);
        state.pucks[0].body.pos = Vec2::new(-4.05, 0.1);

        resolve_collisions(&mut state);

        assert_eq!(state.score.player2, 1);
        assert!(state.active_effect.is_none());
        assert_eq!(state.goal(Player::One).width, 1.2);
        assert_eq!(state.goal(Player::Two).width, 1.2);
    }

    #[test]
    fn test_pickup_tie_goes_to_player_one() {
        let mut state = MatchState::new(1);
        state.paddle_mut(Player::One).body.pos = Vec2::new(-0.25, 0.0);
        state.paddle_mut(Player::Two).body.pos = Vec2::new(0.25, 0.0);
        state.pucks[0].body.pos = Vec2::new(0.0, 1.5);
        state.power_up = Some(PowerUp::new(Vec2::ZERO, PowerUpKind::BigPaddle, 0.15));

        resolve_collisions(&mut state);

        assert!(state.power_up.is_none());
        let effect = state.active_effect.unwrap();
        assert_eq!(effect.owner, Player::One);
        assert!((state.paddle(Player::One).radius - 0.375).abs() < 1e-6);
        assert_eq!(state.paddle(Player::Two).radius, 0.25);
    }

    #[test]
    fn test_paddle_hit_then_obstacle_overrides() {
        // Both touch in the same tick: the obstacle check runs later and wins
        let mut state = MatchState::new(1);
        let paddle_pos = state.paddle(Player::One).pos();
        state.pucks[0].body.pos = paddle_pos + Vec2::new(0.3, 0.0);
        state.obstacles.push(Obstacle::new(
            paddle_pos + Vec2::new(0.3, 0.3),
            ObstacleShape::Circle { radius: 0.25 },
            6.0,
        ));

        resolve_collisions(&mut state);

        let vel = state.pucks[0].vel;
        assert!((vel.length() - 5.0).abs() < 1e-4);
        assert!((vel.normalize() - Vec2::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn test_puck_moves_and_damps() {
        let mut state = MatchState::new(1);
        state.pucks[0].vel = Vec2::new(1.0, 0.0);
        tick(&mut state, &idle(), 0.01);
        assert!((state.pucks[0].pos().x - 0.01).abs() < 1e-6);
        assert!((state.pucks[0].vel.x - 0.985).abs() < 1e-6);
    }

    #[test]
    fn test_fast_puck_doubles_travel() {
        let mut state = MatchState::new(1);
        effects::activate(&mut state, Player::One, PowerUpKind::FastPuck);
        state.pucks[0].vel = Vec2::new(1.0, 0.0);
        tick(&mut state, &idle(), 0.01);
        assert!((state.pucks[0].pos().x - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_update_uses_host_clock() {
        let mut state = MatchState::new(1);
        state.pucks[0].vel = Vec2::new(1.0, 0.0);
        let keys = KeyState::new();
        state.update(5000.0, &keys);
        // First frame is clamped to the max step
        assert!((state.pucks[0].pos().x - 0.016).abs() < 1e-6);
        assert_eq!(state.last_time, 5000.0);
        state.update(5008.0, &keys);
        assert!((state.pucks[0].pos().x - (0.016 + 0.985 * 0.008)).abs() < 1e-6);
    }

    #[test]
    fn test_determinism() {
        let mut a = MatchState::new(99999);
        let mut b = MatchState::new(99999);
        let mut keys = KeyState::new();
        keys.press("d");
        keys.press("arrowup");

        let mut now = 0.0;
        for _ in 0..2000 {
            now += 16.0;
            a.update(now, &keys);
            b.update(now, &keys);
        }

        assert_eq!(a.pucks, b.pucks);
        assert_eq!(a.obstacles, b.obstacles);
        assert_eq!(a.power_up, b.power_up);
        assert_eq!(a.score, b.score);
        assert_eq!(a.paddles, b.paddles);
    }
}
