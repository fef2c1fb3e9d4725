//! Hazard Pong headless runner
//!
//! Plays a level with both paddles chasing the nearest ball and logs what
//! happens. Usage: `hazard-pong [layout.json|-] [settings.json|-] [frames]`;
//! `-` or a missing argument selects the built-in demo level and the
//! default tuning.

use std::process::ExitCode;

use hazard_pong::consts::SIM_DT;
use hazard_pong::sim::{ArenaEvent, ArenaState, PaddleIntent, Side, TickInput, tick};
use hazard_pong::{ArenaSettings, ConfigError, LevelLayout};

const DEFAULT_FRAMES: u64 = 60 * 60;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let layout_path = args.next().filter(|p| p != "-");
    let settings_path = args.next().filter(|p| p != "-");

    let settings = match settings_path.as_deref().map(ArenaSettings::load) {
        Some(Ok(settings)) => settings,
        Some(Err(e)) => return config_failure(settings_path.as_deref(), &e),
        None => ArenaSettings::default(),
    };
    let layout = match layout_path.as_deref().map(LevelLayout::load) {
        Some(Ok(layout)) => layout,
        Some(Err(e)) => return config_failure(layout_path.as_deref(), &e),
        None => LevelLayout::demo(&settings),
    };
    if let Err(e) = layout.validate_for(&settings) {
        return config_failure(layout_path.as_deref(), &e);
    }

    let frames = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_FRAMES);

    log::info!("Hazard Pong (headless) running {} frames", frames);
    let mut state = ArenaState::new(settings, &layout);
    let mut peak_balls = 0;

    for _ in 0..frames {
        let input = TickInput {
            left: chase(&state, Side::Left),
            right: chase(&state, Side::Right),
        };
        for event in tick(&mut state, &input, SIM_DT) {
            match event {
                ArenaEvent::Duplicated { source, ball } => {
                    log::info!("Ball {} split off ball {}", ball, source)
                }
                ArenaEvent::Captured { ball } => log::info!("Ball {} caught by a spinner", ball),
                ArenaEvent::Released { ball } => log::info!("Ball {} released", ball),
                _ => {}
            }
        }
        peak_balls = peak_balls.max(state.live_ball_count());
    }

    log::info!(
        "Finished after {} frames: left {} - right {} ({} balls at peak)",
        state.frame,
        state.score.left,
        state.score.right,
        peak_balls
    );
    ExitCode::SUCCESS
}

fn config_failure(path: Option<&str>, err: &ConfigError) -> ExitCode {
    log::error!("Failed to load {}: {}", path.unwrap_or("built-in config"), err);
    ExitCode::FAILURE
}

/// Steer a paddle toward the closest ball heading its way
fn chase(state: &ArenaState, side: Side) -> PaddleIntent {
    let index = match side {
        Side::Left => 0,
        Side::Right => 1,
    };
    let paddle = &state.paddles[index];
    let incoming = |dx: f32| match side {
        Side::Left => dx < 0.0,
        Side::Right => dx > 0.0,
    };

    let target = state
        .balls
        .iter()
        .filter(|ball| incoming(ball.velocity.dx))
        .min_by(|a, b| {
            let da = (a.center().x - paddle.rect.center().x).abs();
            let db = (b.center().x - paddle.rect.center().x).abs();
            da.total_cmp(&db)
        })
        .map(|ball| ball.center().y);

    let Some(y) = target else {
        return PaddleIntent::default();
    };
    let center = paddle.rect.center().y;
    let dead_zone = paddle.rect.h / 4.0;
    PaddleIntent {
        up: y < center - dead_zone,
        down: y > center + dead_zone,
    }
}
