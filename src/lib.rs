//! Hue Shift - a two-hue arena shooter simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, combat, projectiles, scoring)
//! - `settings`: Data-driven session balance, loadable from JSON
//!
//! Rendering, audio and input devices live outside this crate. A renderer
//! consumes [`sim::RenderSnapshot`]s and [`sim::GameEvent`]s after each tick.

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (60 Hz, matches the reference frame rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Playable arena rectangle (the player is clamped to it)
    pub const ARENA_WIDTH: f32 = 1200.0;
    pub const ARENA_HEIGHT: f32 = 800.0;
    /// Projectiles beyond this distance from the origin on either axis expire
    pub const PROJECTILE_BOUND: f32 = 1500.0;

    /// Player defaults
    pub const PLAYER_START: Vec2 = Vec2::new(400.0, 300.0);
    pub const PLAYER_RADIUS: f32 = 20.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    /// Seconds between player shots
    pub const PLAYER_FIRE_INTERVAL: f32 = 0.15;
    pub const PLAYER_BULLET_SPEED: f32 = 1800.0;
    pub const PLAYER_BULLET_RADIUS: f32 = 10.0;
    /// Immunity window after an enemy body-checks the player
    pub const CONTACT_IMMUNITY: f32 = 0.5;

    /// Enemy defaults
    pub const ENEMY_RADIUS: f32 = 10.0;
    pub const ENEMY_BULLET_RADIUS: f32 = 14.0;
    /// Retaliation burst sizes
    pub const STANDARD_RETALIATION: usize = 8;
    pub const CHAMELEON_RETALIATION: usize = 12;

    /// Scoring
    pub const ENEMY_BASE_SCORE: u64 = 100;
    pub const BOSS_BASE_SCORE: u64 = 1000;
    /// Streak window extension granted for an opposite-color kill (seconds)
    pub const OPPOSITE_KILL_STREAK_BONUS: f32 = 1.0;
}

/// Unit vector pointing along `theta` (radians)
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Bearing of a vector in radians (atan2)
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Rotate a vector counter-clockwise by `theta` radians
#[inline]
pub fn rotate(v: Vec2, theta: f32) -> Vec2 {
    let (s, c) = theta.sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}
