//! Power-up effects
//!
//! At most one effect is active at a time. Activating a new one ends the
//! old one first, and every deactivation exactly undoes its activation.

use super::state::{ActiveEffect, GameEvent, MatchState, Player, PowerUpKind, Puck};

/// Start `kind` for `owner`, ending whatever effect was running
pub fn activate(state: &mut MatchState, owner: Player, kind: PowerUpKind) {
    if let Some(previous) = deactivate(state) {
        state.events.push(GameEvent::EffectCleared(previous.kind));
    }

    log::info!("Player {} activated {}", owner.index() + 1, kind.as_str());

    let tuning = &state.tuning;
    match kind {
        PowerUpKind::MultiPuck => {
            let offset = tuning.multi_puck_offset;
            let radius = tuning.puck_radius;
            state.pucks.push(Puck::new(offset, radius));
            state.pucks.push(Puck::new(-offset, radius));
        }
        PowerUpKind::BigPaddle => {
            let factor = tuning.big_paddle_factor;
            let paddle = state.paddle_mut(owner);
            paddle.set_radius(paddle.base_radius * factor);
        }
        PowerUpKind::SmallGoal => {
            // Shrink the mouth the opponent shoots at
            let factor = tuning.small_goal_factor;
            let goal = &mut state.goals[owner.opponent().index()];
            goal.width = goal.base_width * factor;
        }
        PowerUpKind::FastPuck => {
            state.speed_multiplier = tuning.fast_puck_multiplier;
        }
    }

    state.active_effect = Some(ActiveEffect {
        owner,
        kind,
        remaining: state.tuning.effect_duration,
    });
    state.events.push(GameEvent::EffectActivated { owner, kind });
}

/// End the active effect, if any, and return it. No-op when inactive.
pub fn deactivate(state: &mut MatchState) -> Option<ActiveEffect> {
    let effect = state.active_effect.take()?;
    log::info!("Deactivating {}", effect.kind.as_str());

    match effect.kind {
        PowerUpKind::MultiPuck => {
            state.pucks.truncate(1);
        }
        PowerUpKind::BigPaddle => {
            let paddle = state.paddle_mut(effect.owner);
            paddle.set_radius(paddle.base_radius);
        }
        PowerUpKind::SmallGoal => {
            for goal in &mut state.goals {
                goal.restore();
            }
        }
        PowerUpKind::FastPuck => {
            state.speed_multiplier = 1.0;
        }
    }

    Some(effect)
}

/// Count down the active effect and end it when time runs out
pub fn advance(state: &mut MatchState, dt: f32) {
    let Some(effect) = state.active_effect.as_mut() else {
        return;
    };
    effect.remaining -= dt;
    if effect.remaining > 0.0 {
        return;
    }
    if let Some(expired) = deactivate(state) {
        state.events.push(GameEvent::EffectExpired(expired.kind));
    }
}
