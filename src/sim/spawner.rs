//! Obstacle and power-up spawning
//!
//! Two independent countdowns. Each one fires when it reaches zero and is
//! reseeded with a uniform random interval from its tuning range.

use glam::Vec2;
use rand::Rng;

use super::state::{GameEvent, MatchState, Obstacle, ObstacleShape, PowerUp, PowerUpKind};
use crate::tuning::Tuning;

/// Countdown timers (seconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawner {
    pub obstacle_timer: f32,
    pub power_up_timer: f32,
}

impl Spawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            obstacle_timer: tuning.obstacle_first_spawn,
            power_up_timer: tuning.power_up_first_spawn,
        }
    }
}

/// Uniform point inside `±half_extents`
fn point_in<R: Rng>(rng: &mut R, half_extents: Vec2) -> Vec2 {
    Vec2::new(
        rng.random_range(-half_extents.x..half_extents.x),
        rng.random_range(-half_extents.y..half_extents.y),
    )
}

/// Tick the obstacle countdown; spawn and reseed when it fires
pub fn advance_obstacle_timer(state: &mut MatchState, dt: f32) {
    state.spawner.obstacle_timer -= dt;
    if state.spawner.obstacle_timer <= 0.0 {
        spawn_obstacle(state);
        state.spawner.obstacle_timer = state.tuning.obstacle_respawn.sample(&mut state.rng);
    }
}

/// Tick the power-up countdown.
///
/// When it fires a pickup is placed only if none is on the table; the timer
/// is reseeded either way.
pub fn advance_power_up_timer(state: &mut MatchState, dt: f32) {
    state.spawner.power_up_timer -= dt;
    if state.spawner.power_up_timer <= 0.0 {
        spawn_power_up(state);
        state.spawner.power_up_timer = state.tuning.power_up_respawn.sample(&mut state.rng);
    }
}

/// Age every obstacle and drop the ones whose lifetime ran out
pub fn age_obstacles(state: &mut MatchState, dt: f32) {
    for obstacle in &mut state.obstacles {
        obstacle.age(dt);
    }
    let before = state.obstacles.len();
    state.obstacles.retain(|o| o.body.active);
    for _ in state.obstacles.len()..before {
        state.events.push(GameEvent::ObstacleExpired);
    }
}

/// Place a random box or circle somewhere in the obstacle region
pub fn spawn_obstacle(state: &mut MatchState) {
    let tuning = &state.tuning;
    let rng = &mut state.rng;

    let is_box = rng.random_bool(0.5);
    let pos = point_in(rng, tuning.obstacle_spawn_half_extents);
    let shape = if is_box {
        ObstacleShape::Box {
            width: tuning.obstacle_box_side.sample(rng),
            height: tuning.obstacle_box_side.sample(rng),
        }
    } else {
        ObstacleShape::Circle {
            radius: tuning.obstacle_circle_radius.sample(rng),
        }
    };

    log::debug!("Obstacle {:?} spawned at ({:.2}, {:.2})", shape, pos.x, pos.y);
    state
        .obstacles
        .push(Obstacle::new(pos, shape, tuning.obstacle_lifetime));
    state.events.push(GameEvent::ObstacleSpawned);
}

/// Place a random pickup in the power-up region unless one already exists.
/// Returns whether a pickup was placed.
pub fn spawn_power_up(state: &mut MatchState) -> bool {
    if state.power_up.is_some() {
        return false;
    }

    let tuning = &state.tuning;
    let rng = &mut state.rng;
    let pos = point_in(rng, tuning.power_up_spawn_half_extents);
    let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];

    log::debug!("{} spawned at ({:.2}, {:.2})", kind.as_str(), pos.x, pos.y);
    state.power_up = Some(PowerUp::new(pos, kind, tuning.power_up_radius));
    state.events.push(GameEvent::PowerUpSpawned(kind));
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_obstacle_after_three_seconds() {
        let mut state = MatchState::new(5);
        advance_obstacle_timer(&mut state, 2.9);
        assert!(state.obstacles.is_empty());
        advance_obstacle_timer(&mut state, 0.2);
        assert_eq!(state.obstacles.len(), 1);
        assert!(state.tuning.obstacle_respawn.contains(state.spawner.obstacle_timer));
    }

    #[test]
    fn test_obstacles_spawn_inside_region() {
        let mut state = MatchState::new(11);
        for _ in 0..200 {
            spawn_obstacle(&mut state);
        }
        for o in &state.obstacles {
            assert!(o.pos().x.abs() <= 2.5 && o.pos().y.abs() <= 1.5);
            assert_eq!(o.lifetime, 6.0);
            match o.shape {
                ObstacleShape::Circle { radius } => assert!((0.2..0.4).contains(&radius)),
                ObstacleShape::Box { width, height } => {
                    assert!((0.3..0.7).contains(&width));
                    assert!((0.3..0.7).contains(&height));
                }
            }
        }
        assert!(state.obstacles.iter().any(|o| matches!(o.shape, ObstacleShape::Box { .. })));
        assert!(state.obstacles.iter().any(|o| matches!(o.shape, ObstacleShape::Circle { .. })));
    }

    #[test]
    fn test_only_one_power_up_at_a_time() {
        let mut state = MatchState::new(3);
        assert!(spawn_power_up(&mut state));
        let first = state.power_up.clone();
        assert!(!spawn_power_up(&mut state));
        assert_eq!(state.power_up, first);
        let pos = state.power_up.as_ref().unwrap().pos();
        assert!(pos.x.abs() <= 2.0 && pos.y.abs() <= 1.0);
    }

    #[test]
    fn test_power_up_timer_reseeds_even_when_blocked() {
        let mut state = MatchState::new(3);
        spawn_power_up(&mut state);
        state.spawner.power_up_timer = 0.01;
        advance_power_up_timer(&mut state, 0.016);
        assert!(state.tuning.power_up_respawn.contains(state.spawner.power_up_timer));
    }

    #[test]
    fn test_expired_obstacles_removed() {
        let mut state = MatchState::new(3);
        spawn_obstacle(&mut state);
        spawn_obstacle(&mut state);
        state.obstacles[0].lifetime = 0.01;
        state.events.clear();
        age_obstacles(&mut state, 0.016);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.events, vec![GameEvent::ObstacleExpired]);
    }

    #[test]
    fn test_all_kinds_eventually_drawn() {
        let mut state = MatchState::new(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            state.power_up = None;
            spawn_power_up(&mut state);
            seen.insert(state.power_up.as_ref().unwrap().kind);
        }
        assert_eq!(seen.len(), PowerUpKind::ALL.len());
    }
}
