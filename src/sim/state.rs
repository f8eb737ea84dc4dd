//! Game state and core simulation types
//!
//! Everything a session needs to be replayed from its seed lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::{Boss, BossPhase};
use super::color::Hue;
use super::enemy::{Enemy, FirePattern, Variant};
use super::power::PowerMeter;
use super::projectile::ProjectileSet;
use super::scoring::ScoreState;
use super::spawner::{SessionClock, Spawner};
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Regular timed play
    Playing,
    /// Time ran out with the boss enabled
    BossFight,
    /// Player health reached zero
    Defeated,
    /// Time ran out (no boss)
    TimeUp,
    /// Boss destroyed
    Victory,
}

impl GamePhase {
    /// Terminal phases ignore further ticks
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Defeated | GamePhase::TimeUp | GamePhase::Victory)
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    Defeated,
    TimeUp,
    Victory,
}

impl From<SessionOutcome> for GamePhase {
    fn from(outcome: SessionOutcome) -> Self {
        match outcome {
            SessionOutcome::Defeated => GamePhase::Defeated,
            SessionOutcome::TimeUp => GamePhase::TimeUp,
            SessionOutcome::Victory => GamePhase::Victory,
        }
    }
}

/// Discrete notifications for the renderer, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned {
        id: u32,
        pos: Vec2,
        hue: Hue,
        variant: Variant,
        pattern: FirePattern,
    },
    EnemyActivated {
        id: u32,
    },
    EnemyColorChanged {
        id: u32,
        hue: Hue,
    },
    EnemyDied {
        id: u32,
        pos: Vec2,
        hue: Hue,
        /// Size of the retaliation burst (0 if none)
        retaliation: usize,
    },
    PlayerHit {
        damage: f32,
        health: f32,
    },
    ProjectileAbsorbed {
        power: f32,
    },
    PowerLevelUp {
        level: u32,
        multiplier: f32,
    },
    KillScored {
        points: u64,
        multiplier: u32,
        total: u64,
    },
    StreakReset,
    BossSpawned,
    BossPhaseChanged {
        phase: BossPhase,
    },
    BossDefeated,
    SessionEnded {
        outcome: SessionOutcome,
    },
    /// The tick was ignored (bad delta time)
    TickRejected {
        delta: f32,
    },
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub hue: Hue,
    pub health: f32,
    pub max_health: f32,
    pub radius: f32,
    pub base_damage: f32,
    pub power: PowerMeter,
    /// Seconds until the next shot is allowed
    pub fire_cooldown: f32,
    /// Seconds of remaining immunity to enemy body contact
    pub contact_immunity: f32,
}

impl Player {
    pub fn new(health: f32, base_damage: f32) -> Self {
        Self {
            pos: PLAYER_START,
            hue: Hue::Red,
            health,
            max_health: health,
            radius: PLAYER_RADIUS,
            base_damage,
            power: PowerMeter::default(),
            fire_cooldown: 0.0,
            contact_immunity: 0.0,
        }
    }

    pub fn power_multiplier(&self) -> f32 {
        self.power.multiplier
    }

    /// Damage dealt by one player projectile
    pub fn damage(&self) -> f32 {
        self.base_damage * self.power_multiplier()
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub rng: Pcg32,
    pub clock: SessionClock,
    pub spawner: Spawner,
    pub player: Player,
    /// Live enemies (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    pub projectiles: ProjectileSet,
    pub score: ScoreState,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a fresh session from settings.
    ///
    /// Settings that fail validation are replaced by the defaults (keeping
    /// the seed), so the clock and the difficulty ramp always stay finite.
    pub fn new(settings: Settings) -> Self {
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(err) => {
                log::warn!("Invalid settings ({}), falling back to defaults", err);
                Settings::default().with_seed(settings.seed)
            }
        };
        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            clock: SessionClock::new(settings.total_time),
            spawner: Spawner::new(settings.spawn_interval, settings.boss_enabled),
            player: Player::new(settings.player_health, settings.player_base_damage),
            enemies: Vec::new(),
            boss: None,
            projectiles: ProjectileSet::new(),
            score: ScoreState::new(settings.streak_timeout),
            phase: GamePhase::Playing,
            time_ticks: 0,
            next_id: 1,
            settings,
        }
    }

    /// Create a session with default balance and the given seed
    pub fn with_seed(seed: u64) -> Self {
        Self::new(Settings::default().with_seed(seed))
    }

    /// Throw away every entity and restart the session from the same settings
    pub fn reset(&mut self) {
        log::info!("Session reset (seed {})", self.settings.seed);
        *self = Self::new(self.settings.clone());
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Ensure enemies are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let state = GameState::with_seed(1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.health, 300.0);
        assert_eq!(state.player.hue, Hue::Red);
        assert_eq!(state.player.damage(), 1.0);
        assert!(state.enemies.is_empty());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.clock.total, 251.0);
    }

    #[test]
    fn test_entity_ids_increase() {
        let mut state = GameState::with_seed(1);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut state = GameState::with_seed(9);
        state.player.health = 10.0;
        state.phase = GamePhase::Defeated;
        state.score.register_kill(100, 10.0);
        state.reset();
        assert_eq!(state.player.health, 300.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score.total_score, 0);
        assert_eq!(state.settings.seed, 9);
    }

    #[test]
    fn test_invalid_settings_fall_back_to_defaults() {
        let settings = Settings {
            seed: 77,
            total_time: f32::NAN,
            spawn_interval: -1.0,
            ..Settings::default()
        };
        let state = GameState::new(settings);
        assert_eq!(state.settings.seed, 77);
        assert_eq!(state.settings.total_time, 251.0);
        assert_eq!(state.clock.total, 251.0);
        assert_eq!(state.spawner.spawn_interval, 0.5);
        assert!(state.clock.progress().is_finite());
    }

    #[test]
    fn test_terminal_phases() {
        assert!(!GamePhase::Playing.is_terminal());
        assert!(!GamePhase::BossFight.is_terminal());
        assert!(GamePhase::Defeated.is_terminal());
        assert!(GamePhase::from(SessionOutcome::TimeUp).is_terminal());
        assert!(GamePhase::from(SessionOutcome::Victory).is_terminal());
    }
}
