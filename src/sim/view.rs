//! Read-only snapshot for the renderer
//!
//! The renderer places unit meshes with a model matrix per object. Nothing
//! here feeds back into the simulation.

use glam::{Mat4, Vec2, Vec3};
use serde::Serialize;

use super::state::{Body, MatchState, ObstacleShape, Player, PowerUpKind, Score};

/// Goal frame post thickness
const POST_THICKNESS: f32 = 0.1;
/// Goal frame height above the table
const GOAL_HEIGHT: f32 = 0.6;

/// What a scene item is, so the renderer can pick a mesh and color
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SceneKind {
    Paddle(Player),
    Puck,
    CircleObstacle,
    BoxObstacle,
    PowerUp(PowerUpKind),
    /// Frame around the mouth the named player shoots at
    GoalFrame(Player),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneItem {
    pub kind: SceneKind,
    pub model: Mat4,
}

impl SceneItem {
    fn new(kind: SceneKind, translation: Vec3, scale: Vec3) -> Self {
        Self {
            kind,
            model: Mat4::from_translation(translation) * Mat4::from_scale(scale),
        }
    }

    fn from_body(kind: SceneKind, body: &Body) -> Self {
        Self::new(kind, body.translation(), body.scale)
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneView {
    pub items: Vec<SceneItem>,
    pub score: Score,
    /// Current mouth widths, indexed by the shooting player
    pub goal_widths: [f32; 2],
    /// Paddle collision radii (the paddle mesh scale follows these)
    pub paddle_radii: [f32; 2],
}

impl SceneView {
    pub fn capture(state: &MatchState) -> Self {
        let mut items = Vec::with_capacity(
            2 + state.pucks.len() + state.obstacles.len() + 1 + 2 * 3,
        );

        for paddle in &state.paddles {
            items.push(SceneItem::from_body(SceneKind::Paddle(paddle.owner), &paddle.body));
        }

        for puck in &state.pucks {
            items.push(SceneItem::from_body(SceneKind::Puck, &puck.body));
        }

        for obstacle in &state.obstacles {
            let kind = match obstacle.shape {
                ObstacleShape::Circle { .. } => SceneKind::CircleObstacle,
                ObstacleShape::Box { .. } => SceneKind::BoxObstacle,
            };
            items.push(SceneItem::from_body(kind, &obstacle.body));
        }

        if let Some(power_up) = &state.power_up {
            items.push(SceneItem::from_body(SceneKind::PowerUp(power_up.kind), &power_up.body));
        }

        for player in Player::BOTH {
            let x = player.attack_sign() * state.tuning.table_half_length;
            push_goal_frame(&mut items, player, x, state.goal(player).width);
        }

        Self {
            items,
            score: state.score,
            goal_widths: [state.goals[0].width, state.goals[1].width],
            paddle_radii: [state.paddles[0].radius, state.paddles[1].radius],
        }
    }

    pub fn count(&self, kind: SceneKind) -> usize {
        self.items.iter().filter(|item| item.kind == kind).count()
    }
}

/// Two posts and a crossbar whose spacing follows the mouth width
fn push_goal_frame(items: &mut Vec<SceneItem>, player: Player, x: f32, width: f32) {
    let kind = SceneKind::GoalFrame(player);
    let post_y = width / 2.0 + POST_THICKNESS / 2.0;
    let post_scale = Vec3::new(POST_THICKNESS, POST_THICKNESS, GOAL_HEIGHT);

    for sign in [-1.0, 1.0] {
        items.push(SceneItem::new(
            kind,
            Vec2::new(x, sign * post_y).extend(GOAL_HEIGHT / 2.0),
            post_scale,
        ));
    }
    items.push(SceneItem::new(
        kind,
        Vec3::new(x, 0.0, GOAL_HEIGHT + POST_THICKNESS / 2.0),
        Vec3::new(POST_THICKNESS, width + POST_THICKNESS * 2.0, POST_THICKNESS),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::effects;

    #[test]
    fn test_capture_counts() {
        let state = MatchState::new(1);
        let view = SceneView::capture(&state);
        assert_eq!(view.count(SceneKind::Paddle(Player::One)), 1);
        assert_eq!(view.count(SceneKind::Paddle(Player::Two)), 1);
        assert_eq!(view.count(SceneKind::Puck), 1);
        assert_eq!(view.count(SceneKind::GoalFrame(Player::One)), 3);
        assert_eq!(view.items.len(), 2 + 1 + 6);
    }

    #[test]
    fn test_paddle_matrix_follows_radius() {
        let mut state = MatchState::new(1);
        effects::activate(&mut state, Player::One, PowerUpKind::BigPaddle);
        let view = SceneView::capture(&state);
        let item = view
            .items
            .iter()
            .find(|i| i.kind == SceneKind::Paddle(Player::One))
            .unwrap();
        let (scale, _, translation) = item.model.to_scale_rotation_translation();
        assert!((scale - Vec3::new(0.75, 0.75, 0.1)).length() < 1e-5);
        assert!((translation - Vec3::new(-3.0, 0.0, 0.05)).length() < 1e-5);
        assert!((view.paddle_radii[0] - 0.375).abs() < 1e-6);
    }

    #[test]
    fn test_goal_frame_tracks_width() {
        let mut state = MatchState::new(1);
        effects::activate(&mut state, Player::One, PowerUpKind::SmallGoal);
        let view = SceneView::capture(&state);
        // Player 2 shoots at x = -4; its mouth shrank
        let posts: Vec<Vec3> = view
            .items
            .iter()
            .filter(|i| i.kind == SceneKind::GoalFrame(Player::Two))
            .map(|i| i.model.to_scale_rotation_translation().2)
            .collect();
        assert!(posts.iter().all(|p| (p.x + 4.0).abs() < 1e-6));
        assert!(posts.iter().any(|p| (p.y - 0.29).abs() < 1e-5));
        assert!((view.goal_widths[1] - 0.48).abs() < 1e-6);
    }

    #[test]
    fn test_capture_does_not_mutate() {
        let mut state = MatchState::new(4);
        crate::sim::spawner::spawn_obstacle(&mut state);
        crate::sim::spawner::spawn_power_up(&mut state);
        let before = (state.pucks.clone(), state.obstacles.clone(), state.power_up.clone());
        let view = SceneView::capture(&state);
        assert_eq!(view.count(SceneKind::CircleObstacle) + view.count(SceneKind::BoxObstacle), 1);
        assert_eq!(
            before,
            (state.pucks.clone(), state.obstacles.clone(), state.power_up.clone())
        );
        assert!(serde_json::to_string(&view).is_ok());
    }
}
