//! Hue Shift headless driver
//!
//! Loads settings, plays one session on autopilot at a fixed timestep and
//! prints the final render snapshot as JSON.

use std::collections::BTreeMap;

use hue_shift::Settings;
use hue_shift::consts::*;
use hue_shift::sim::{GameEvent, GameState, TickInput, tick};

/// Upper bound on frames, in case a session never ends
const MAX_FRAMES: u32 = 60 * 60 * 10;
/// Simulated display refresh (deliberately not a multiple of the sim rate)
const FRAME_DT: f32 = 1.0 / 50.0;

/// Game instance holding the session and its frame accumulator
struct Session {
    state: GameState,
    accumulator: f32,
    input: TickInput,
    tally: BTreeMap<&'static str, u32>,
}

impl Session {
    fn new(settings: Settings) -> Self {
        Self {
            state: GameState::new(settings),
            accumulator: 0.0,
            input: TickInput {
                autopilot: true,
                ..Default::default()
            },
            tally: BTreeMap::new(),
        }
    }

    /// Run simulation ticks for one display frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let events = tick(&mut self.state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            for event in &events {
                *self.tally.entry(event_name(event)).or_default() += 1;
            }
        }
    }
}

fn event_name(event: &GameEvent) -> &'static str {
    match event {
        GameEvent::EnemySpawned { .. } => "enemy_spawned",
        GameEvent::EnemyActivated { .. } => "enemy_activated",
        GameEvent::EnemyColorChanged { .. } => "enemy_color_changed",
        GameEvent::EnemyDied { .. } => "enemy_died",
        GameEvent::PlayerHit { .. } => "player_hit",
        GameEvent::ProjectileAbsorbed { .. } => "projectile_absorbed",
        GameEvent::PowerLevelUp { .. } => "power_level_up",
        GameEvent::KillScored { .. } => "kill_scored",
        GameEvent::StreakReset => "streak_reset",
        GameEvent::BossSpawned => "boss_spawned",
        GameEvent::BossPhaseChanged { .. } => "boss_phase_changed",
        GameEvent::BossDefeated => "boss_defeated",
        GameEvent::SessionEnded { .. } => "session_ended",
        GameEvent::TickRejected { .. } => "tick_rejected",
    }
}

fn load_settings() -> Settings {
    let Some(path) = std::env::args().nth(1) else {
        log::info!("No settings file given, using defaults");
        return Settings::default();
    };

    match Settings::load(&path) {
        Ok(settings) => settings,
        Err(err) => {
            log::warn!("Could not load settings from {}: {}, using defaults", path, err);
            Settings::default()
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Hue Shift (headless) starting...");

    let settings = load_settings();
    log::info!(
        "Seed {:#x}, {}s session, boss {}",
        settings.seed,
        settings.total_time,
        if settings.boss_enabled { "on" } else { "off" }
    );

    let mut session = Session::new(settings);
    let mut frames = 0;
    while !session.state.is_over() && frames < MAX_FRAMES {
        session.update(FRAME_DT);
        frames += 1;
    }

    if !session.state.is_over() {
        log::warn!("Stopped after {} frames without a result", frames);
    }
    for (name, count) in &session.tally {
        log::info!("{:>20}: {}", name, count);
    }

    match serde_json::to_string_pretty(&session.state.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(err) => log::error!("Failed to serialize snapshot: {}", err),
    }
}
