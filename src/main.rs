//! Sky Shooter entry point
//!
//! Runs a headless attract-mode session: the autopilot flies the ship
//! until it runs out of health (or the frame limit is hit), then the
//! result is recorded and printed as JSON.

use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;

use sky_shooter::audio::LogSink;
use sky_shooter::consts::SIM_DT;
use sky_shooter::input::{Action, InputEvent};
use sky_shooter::session::{FrameView, RunResult};
use sky_shooter::{Game, Phase, Settings};

/// Ten minutes of play at 60 Hz
const MAX_FRAMES: u64 = 10 * 60 * 60;

#[derive(Serialize)]
struct Summary<'a> {
    frames: u64,
    view: FrameView,
    result: Option<RunResult>,
    top_runs: Vec<&'a sky_shooter::highscores::RunEntry>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings_path = std::env::var_os("SKY_SHOOTER_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("settings.json"));
    let settings = Settings::load(&settings_path);
    log::info!("Sky Shooter starting (settings: {})", settings_path.display());

    let mut game = Game::new(settings, LogSink);
    game.set_idle_mode(true);
    game.handle(InputEvent::press(Action::Start));

    let mut frames = 0;
    while frames < MAX_FRAMES && game.phase() == Phase::Playing && !game.quit_requested() {
        game.step(SIM_DT);
        frames += 1;
    }

    if game.phase() == Phase::Playing {
        log::warn!("Frame limit reached before game over");
    }

    let summary = Summary {
        frames,
        view: game.view(),
        result: game.last_result(),
        top_runs: game.high_scores().record().leaderboard(5),
    };
    let json = serde_json::to_string_pretty(&summary).context("serializing run summary")?;
    println!("{}", json);
    Ok(())
}
