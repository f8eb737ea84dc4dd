//! Optional end-of-session boss
//!
//! Alternates between a patrol phase (orbit, sparse volleys, minion
//! summons) and an aggressive phase (homing, dense aimed spreads).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::color::Hue;
use super::combat::{DamageProfile, Defender, HitOutcome, radial_burst};
use super::projectile::Shot;
use crate::{angle_of, direction_from_angle, rotate};

pub const BOSS_SPAWN_POS: Vec2 = Vec2::new(600.0, 150.0);
pub const BOSS_RADIUS: f32 = 40.0;
pub const BOSS_SPEED: f32 = 60.0;
pub const BOSS_HEALTH: f32 = 500.0;
pub const BOSS_BULLET_SPEED: f32 = 360.0;
/// Seconds per phase before switching
pub const BOSS_PHASE_DURATION: f32 = 15.0;

const ORBIT_CENTER: Vec2 = Vec2::new(600.0, 300.0);
const ORBIT_RADIUS: f32 = 150.0;
const ORBIT_ANGULAR_SPEED: f32 = 0.5;
const PATROL_FIRE_INTERVAL: f32 = 0.6;
const AGGRESSIVE_FIRE_INTERVAL: f32 = 0.3;
const MINION_INTERVAL: f32 = 2.0;
/// Aggressive volleys are red right of this line, blue left of it
const SPLIT_X: f32 = 600.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    Patrol,
    Aggressive,
}

/// What the boss did during one update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BossTick {
    pub phase_changed: Option<BossPhase>,
    pub shots: Vec<Shot>,
    /// Summon a regular enemy at the boss position
    pub summon_minion: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub health: f32,
    pub max_health: f32,
    pub phase: BossPhase,
    pub phase_timer: f32,
    pub move_timer: f32,
    pub shoot_timer: f32,
    pub summon_timer: f32,
}

impl Default for Boss {
    fn default() -> Self {
        Self::new()
    }
}

impl Boss {
    pub fn new() -> Self {
        Self {
            pos: BOSS_SPAWN_POS,
            radius: BOSS_RADIUS,
            speed: BOSS_SPEED,
            health: BOSS_HEALTH,
            max_health: BOSS_HEALTH,
            phase: BossPhase::Patrol,
            phase_timer: 0.0,
            move_timer: 0.0,
            shoot_timer: 0.0,
            summon_timer: 0.0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// The boss takes full damage from either color and never retaliates
    pub fn defender(&self) -> Defender {
        Defender {
            pos: self.pos,
            hue: Hue::Red,
            health: self.health,
            max_health: self.max_health,
            profile: DamageProfile::Uniform,
            bullet_speed: BOSS_BULLET_SPEED,
        }
    }

    pub fn apply_hit(&mut self, outcome: &HitOutcome) {
        self.health = outcome.health;
    }

    pub fn update(&mut self, dt: f32, player_pos: Vec2) -> BossTick {
        let mut out = BossTick::default();
        self.phase_timer += dt;
        self.move_timer += dt;
        self.shoot_timer += dt;
        self.summon_timer += dt;

        if self.phase_timer >= BOSS_PHASE_DURATION {
            self.phase = match self.phase {
                BossPhase::Patrol => BossPhase::Aggressive,
                BossPhase::Aggressive => BossPhase::Patrol,
            };
            self.phase_timer = 0.0;
            out.phase_changed = Some(self.phase);
        }

        match self.phase {
            BossPhase::Patrol => {
                let angle = self.move_timer * ORBIT_ANGULAR_SPEED;
                self.pos = ORBIT_CENTER + direction_from_angle(angle) * ORBIT_RADIUS;

                if self.shoot_timer >= PATROL_FIRE_INTERVAL {
                    self.shoot_timer = 0.0;
                    out.shots = radial_burst(self.pos, 4, Hue::Red, BOSS_BULLET_SPEED, 0.0);
                }
                if self.summon_timer >= MINION_INTERVAL {
                    self.summon_timer = 0.0;
                    out.summon_minion = true;
                }
            }
            BossPhase::Aggressive => {
                let dir = (player_pos - self.pos).normalize_or_zero();
                if dir != Vec2::ZERO {
                    let wobble = (self.move_timer * 2.0).sin() * 0.3;
                    self.pos += rotate(dir, wobble) * self.speed * dt;
                }

                if self.shoot_timer >= AGGRESSIVE_FIRE_INTERVAL {
                    self.shoot_timer = 0.0;
                    out.shots = self.aimed_spread(player_pos);
                }
            }
        }

        out
    }

    fn aimed_spread(&self, player_pos: Vec2) -> Vec<Shot> {
        let to_player = player_pos - self.pos;
        if to_player.length_squared() == 0.0 {
            return Vec::new();
        }
        let bearing = angle_of(to_player);
        let hue = if self.pos.x > SPLIT_X { Hue::Red } else { Hue::Blue };
        (0..8)
            .map(|i| {
                let angle = bearing + (i as f32 - 3.5) * 0.3;
                Shot::new(self.pos, direction_from_angle(angle), hue, BOSS_BULLET_SPEED)
            })
            .collect()
    }
}
