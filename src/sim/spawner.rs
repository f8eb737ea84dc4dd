//! Session clock and the time-driven difficulty ramp
//!
//! Enemy stats are a pure function of session progress; nothing about the
//! ramp is stored between spawns.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::color::Hue;
use super::enemy::{Enemy, EnemyStats, FirePattern, Variant};

/// Spawn band (top strip of the arena)
pub const SPAWN_X_RANGE: (f32, f32) = (100.0, 1100.0);
pub const SPAWN_Y_RANGE: (f32, f32) = (80.0, 150.0);

/// One extra enemy per batch every this many seconds
pub const BATCH_GROWTH_SECS: f32 = 30.0;

/// Base HP never reaches 2x the player's damage; this is the ratio it is clamped to
pub const HP_CEILING_RATIO: f32 = 1.99;

/// Pattern bands by progress. Burst is never rolled for regular spawns.
const PATTERNS_EARLY: &[FirePattern] = &[FirePattern::Omni];
const PATTERNS_CONE: &[FirePattern] = &[FirePattern::Omni, FirePattern::Cone];
const PATTERNS_ALT: &[FirePattern] = &[
    FirePattern::Omni,
    FirePattern::Cone,
    FirePattern::Alternating,
];
const PATTERNS_LATE: &[FirePattern] = &[
    FirePattern::Omni,
    FirePattern::Cone,
    FirePattern::Alternating,
    FirePattern::Spiral,
];

/// Elapsed vs total session time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionClock {
    pub elapsed: f32,
    pub total: f32,
}

impl SessionClock {
    pub fn new(total: f32) -> Self {
        Self { elapsed: 0.0, total }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Fraction of the session elapsed, clamped to [0, 1]
    pub fn progress(&self) -> f32 {
        if self.total <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.total).clamp(0.0, 1.0)
    }

    pub fn remaining(&self) -> f32 {
        (self.total - self.elapsed).max(0.0)
    }

    pub fn is_time_up(&self) -> bool {
        self.elapsed >= self.total
    }
}

/// Format seconds as M:SS
pub fn format_time(seconds: f32) -> String {
    let secs = seconds.max(0.0) as u32;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Stats for an enemy spawned at a given point of the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnScaling {
    pub base_hp: f32,
    pub speed: f32,
    pub bullet_speed: f32,
    pub spawn_delay: f32,
    pub allowed_patterns: &'static [FirePattern],
    pub chameleon_chance: f32,
}

impl SpawnScaling {
    /// Derive the ramp for `progress` in [0, 1]
    pub fn for_progress(progress: f32, damage_est: f32, score_multiplier: u32) -> Self {
        let progress = progress.clamp(0.0, 1.0);
        let ceiling = damage_est * HP_CEILING_RATIO;

        let base_hp = (damage_est * 1.5 + progress * 0.5).min(ceiling);
        let base_hp = (base_hp + score_multiplier as f32 * 0.1).min(ceiling);

        let allowed_patterns = if progress < 0.25 {
            PATTERNS_EARLY
        } else if progress < 0.5 {
            PATTERNS_CONE
        } else if progress < 0.75 {
            PATTERNS_ALT
        } else {
            PATTERNS_LATE
        };

        Self {
            base_hp,
            speed: 100.0 + progress * 60.0,
            bullet_speed: 240.0 + progress * 120.0,
            spawn_delay: (0.8 - progress * 0.5).max(0.3),
            allowed_patterns,
            chameleon_chance: (progress * 0.5).min(0.5),
        }
    }
}

/// Everything the spawner needs to know about the world when rolling an enemy
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext {
    pub progress: f32,
    pub player_hue: Hue,
    /// Player's base damage, the yardstick for enemy HP
    pub damage_est: f32,
    pub score_multiplier: u32,
}

/// Roll one enemy. Draw order is fixed so a seed fully determines a session.
pub fn roll_enemy<R: Rng>(rng: &mut R, id: u32, ctx: &SpawnContext, pos: Option<Vec2>) -> Enemy {
    let scaling = SpawnScaling::for_progress(ctx.progress, ctx.damage_est, ctx.score_multiplier);

    let x = rng.random_range(SPAWN_X_RANGE.0..=SPAWN_X_RANGE.1);
    let y = rng.random_range(SPAWN_Y_RANGE.0..=SPAWN_Y_RANGE.1);
    let pos = pos.unwrap_or(Vec2::new(x, y));

    let hue = Hue::ALL[rng.random_range(0..Hue::ALL.len())];
    let pattern = scaling.allowed_patterns[rng.random_range(0..scaling.allowed_patterns.len())];
    let chameleon = rng.random::<f32>() < scaling.chameleon_chance;

    // Same color as the player at spawn means a tougher enemy
    let health = if hue == ctx.player_hue {
        scaling.base_hp * 2.0
    } else {
        scaling.base_hp
    };

    let stats = EnemyStats {
        health,
        speed: scaling.speed,
        bullet_speed: scaling.bullet_speed,
        spawn_delay: scaling.spawn_delay,
    };

    let (variant, hue) = if chameleon {
        (Variant::Chameleon, ctx.player_hue)
    } else {
        (Variant::Static, hue)
    };

    log::debug!(
        "Rolled enemy {} hp={:.2} hue={} pattern={} variant={:?}",
        id,
        health,
        hue.as_str(),
        pattern.name(),
        variant
    );

    Enemy::new(id, pos, hue, pattern, variant, stats)
}

/// Decision made by the spawner for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnOrder {
    /// Regular enemies to create
    pub enemies: u32,
    /// Spawn the boss now
    pub boss: bool,
}

/// Timer-driven spawner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    pub spawn_interval: f32,
    pub last_spawn_time: f32,
    pub boss_enabled: bool,
    pub boss_spawned: bool,
    pub total_spawned: u32,
}

impl Spawner {
    pub fn new(spawn_interval: f32, boss_enabled: bool) -> Self {
        Self {
            spawn_interval,
            last_spawn_time: 0.0,
            boss_enabled,
            boss_spawned: false,
            total_spawned: 0,
        }
    }

    /// Enemies per batch at `elapsed` seconds
    pub fn batch_size(elapsed: f32) -> u32 {
        1 + (elapsed.max(0.0) / BATCH_GROWTH_SECS).floor() as u32
    }

    /// Advance the spawn timer; the clock must already include `dt`
    pub fn tick(&mut self, clock: &SessionClock, dt: f32) -> SpawnOrder {
        let mut order = SpawnOrder::default();

        if clock.is_time_up() {
            if self.boss_enabled && !self.boss_spawned {
                self.boss_spawned = true;
                order.boss = true;
            }
            return order;
        }

        self.last_spawn_time += dt;
        if self.last_spawn_time >= self.spawn_interval {
            order.enemies = Self::batch_size(clock.elapsed);
            self.total_spawned += order.enemies;
            self.last_spawn_time = 0.0;
        }
        order
    }
}
