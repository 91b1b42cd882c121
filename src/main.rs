//! Air Hockey entry point
//!
//! The browser build drives `MatchState::update` from its render loop. The
//! native binary has no window; it plays a scripted match headlessly and
//! logs what happens.
//!
//! Usage: `air-hockey [TUNING_JSON] [SEED]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use air_hockey::sim::{GameEvent, KeyState, MatchState, SceneView};
    use air_hockey::Tuning;

    env_logger::init();
    log::info!("Air Hockey (native) starting...");

    let mut args = std::env::args().skip(1);
    let tuning_json = args.next().and_then(|path| match std::fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Could not read tuning file {path}: {e}");
            None
        }
    });
    let tuning = Tuning::load_or_default(tuning_json.as_deref());
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(2024_u64);

    let mut state = match MatchState::with_tuning(tuning, seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid tuning: {e}");
            std::process::exit(1);
        }
    };
    let mut keys = KeyState::new();

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const FRAMES: u32 = 60 * 90;

    let mut now = 0.0;
    for frame in 0..FRAMES {
        script_keys(&mut keys, frame);
        now += FRAME_MS;
        state.update(now, &keys);

        for event in &state.events {
            match event {
                GameEvent::Goal { .. } => println!(
                    "[{:6.2}s] GOAL  {} - {}",
                    now / 1000.0,
                    state.score.player1,
                    state.score.player2
                ),
                GameEvent::EffectActivated { owner, kind } => println!(
                    "[{:6.2}s] player {} picked up {}",
                    now / 1000.0,
                    owner.index() + 1,
                    kind.as_str()
                ),
                _ => {}
            }
        }
    }

    let scene = SceneView::capture(&state);
    println!(
        "Final score {} - {} after {} ticks ({} objects on the table)",
        state.score.player1,
        state.score.player2,
        state.time_ticks,
        scene.items.len()
    );
    match serde_json::to_string(&scene) {
        Ok(json) => log::debug!("Final scene: {json}"),
        Err(e) => log::warn!("Could not serialize scene: {e}"),
    }
}

/// Both players sweep their half: charge the center line, retreat, and
/// drift up and down on different periods so the rallies vary.
#[cfg(not(target_arch = "wasm32"))]
fn script_keys(keys: &mut air_hockey::sim::KeyState, frame: u32) {
    let p1_attack = frame % 120 < 60;
    keys.set("d", p1_attack);
    keys.set("a", !p1_attack);
    keys.set("w", frame % 200 < 50);
    keys.set("s", (100..150).contains(&(frame % 200)));

    let p2_attack = (frame + 30) % 150 < 70;
    keys.set("arrowleft", p2_attack);
    keys.set("arrowright", !p2_attack);
    keys.set("arrowup", frame % 170 < 40);
    keys.set("arrowdown", (85..125).contains(&(frame % 170)));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host page owns the frame loop and calls into the library
}
