//! Collision detection and response for the table
//!
//! Everything here is a simple penetration test: circles against circles,
//! circles against axis-aligned boxes, pucks against the four walls. A puck
//! that touches something does not reflect; its velocity is *reassigned* to
//! point away from the contact at a fixed speed.

use glam::Vec2;

use super::state::{Goal, Obstacle, ObstacleShape, Paddle, Player, PowerUp, Puck};
use crate::{closest_point_on_box, guarded_direction};

/// Result of a circle overlap test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Whether the shapes overlap
    pub hit: bool,
    /// Point on the other shape the circle is pushed away from
    pub point: Vec2,
    /// Unit direction from `point` to the circle center (zero when concentric)
    pub normal: Vec2,
    /// Overlap depth, measured with the zero-distance guard applied
    pub penetration: f32,
}

impl Contact {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }

    fn from_delta(point: Vec2, delta: Vec2, reach: f32) -> Self {
        let (normal, distance) = guarded_direction(delta);
        Self {
            hit: true,
            point,
            normal,
            penetration: reach - distance,
        }
    }
}

/// Circle vs circle
pub fn circle_circle(center: Vec2, radius: f32, other: Vec2, other_radius: f32) -> Contact {
    let delta = center - other;
    let reach = radius + other_radius;
    if delta.length_squared() < reach * reach {
        Contact::from_delta(other, delta, reach)
    } else {
        Contact::miss()
    }
}

/// Circle vs axis-aligned box (closest-point test)
pub fn circle_box(center: Vec2, radius: f32, box_center: Vec2, size: Vec2) -> Contact {
    let closest = closest_point_on_box(center, box_center, size / 2.0);
    let delta = center - closest;
    if delta.length_squared() < radius * radius {
        Contact::from_delta(closest, delta, radius)
    } else {
        Contact::miss()
    }
}

/// Circle vs obstacle of either shape
pub fn circle_obstacle(center: Vec2, radius: f32, obstacle: &Obstacle) -> Contact {
    match obstacle.shape {
        ObstacleShape::Circle { radius: r } => circle_circle(center, radius, obstacle.pos(), r),
        ObstacleShape::Box { width, height } => {
            circle_box(center, radius, obstacle.pos(), Vec2::new(width, height))
        }
    }
}

/// Puck vs paddle: fling the puck straight away from the paddle center
pub fn puck_paddle(puck: &mut Puck, paddle: &Paddle, fling_speed: f32) -> bool {
    let contact = circle_circle(puck.pos(), puck.radius, paddle.pos(), paddle.radius);
    if contact.hit {
        puck.vel = contact.normal * fling_speed;
    }
    contact.hit
}

/// Puck vs obstacle: fling away from the closest point (box) or center (circle)
pub fn puck_obstacle(puck: &mut Puck, obstacle: &Obstacle, fling_speed: f32) -> bool {
    let contact = circle_obstacle(puck.pos(), puck.radius, obstacle);
    if contact.hit {
        puck.vel = contact.normal * fling_speed;
    }
    contact.hit
}

/// Side walls at y = ±half_width: flip vy and pin the puck inside
pub fn puck_side_walls(puck: &mut Puck, half_width: f32) -> bool {
    let y = puck.body.pos.y;
    if y + puck.radius > half_width || y - puck.radius < -half_width {
        puck.vel.y = -puck.vel.y;
        puck.body.pos.y = y.signum() * (half_width - puck.radius);
        true
    } else {
        false
    }
}

/// What happened at a back wall
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackWallHit {
    /// The puck went into the mouth; the player named scores
    Goal(Player),
    /// The puck struck the wall beside the mouth and bounced
    Bounce,
}

/// Back walls at x = ±half_length.
///
/// `goals[p]` is the mouth player `p` shoots at (see [`Player::attack_sign`]).
/// On a bounce vx flips and the puck is pinned inside; on a goal the puck is
/// left where it is for the caller to reset.
pub fn puck_back_walls(puck: &mut Puck, goals: &[Goal; 2], half_length: f32) -> Option<BackWallHit> {
    let pos = puck.pos();
    let side = if pos.x - puck.radius < -half_length {
        Player::Two
    } else if pos.x + puck.radius > half_length {
        Player::One
    } else {
        return None;
    };

    if pos.y.abs() < goals[side.index()].half_width() {
        return Some(BackWallHit::Goal(side));
    }

    puck.vel.x = -puck.vel.x;
    puck.body.pos.x = side.attack_sign() * (half_length - puck.radius);
    Some(BackWallHit::Bounce)
}

/// Paddle vs obstacle: push the paddle out along the separation vector
pub fn paddle_obstacle(paddle: &mut Paddle, obstacle: &Obstacle) -> bool {
    let contact = circle_obstacle(paddle.pos(), paddle.radius, obstacle);
    if contact.hit {
        paddle.body.pos += contact.normal * contact.penetration;
    }
    contact.hit
}

/// Paddle touching the world pickup
pub fn paddle_power_up(paddle: &Paddle, power_up: &PowerUp) -> bool {
    circle_circle(paddle.pos(), paddle.radius, power_up.pos(), power_up.radius).hit
}
