//! Enemy agents: lifecycle state machine, movement and fire patterns

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::color::Hue;
use super::combat::{DamageProfile, Defender, HitOutcome, radial_burst};
use super::projectile::Shot;
use crate::consts::ENEMY_RADIUS;
use crate::{angle_of, direction_from_angle};

/// Lifecycle of an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyPhase {
    /// Preview only: no movement, no firing, no hits
    Spawning,
    Active,
    /// Terminal, removed at the end of the tick it was entered
    Dead,
}

/// Behavior family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Fixed color for life
    Static,
    /// Color mirrors the player's every tick
    Chameleon,
}

/// Shooting pattern, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirePattern {
    /// Floating only (legacy build: 8-way radial)
    Omni,
    /// 3 shots at the player, ±0.3 rad
    Cone,
    /// 5 shots at the player in 0.4 rad steps
    Alternating,
    /// Single aimed shot at a short interval
    Burst,
    /// 6-way radial, rotating with the agent's angle offset
    Spiral,
}

impl FirePattern {
    /// Seconds between volleys
    pub fn shoot_interval(self) -> f32 {
        match self {
            FirePattern::Omni => 0.5,
            FirePattern::Cone => 0.4,
            FirePattern::Alternating => 0.3,
            FirePattern::Burst => 0.2,
            FirePattern::Spiral => 0.6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FirePattern::Omni => "Omni",
            FirePattern::Cone => "Cone",
            FirePattern::Alternating => "Alternating",
            FirePattern::Burst => "Burst",
            FirePattern::Spiral => "Spiral",
        }
    }
}

/// Scaled stats handed over by the spawner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub health: f32,
    pub speed: f32,
    pub bullet_speed: f32,
    pub spawn_delay: f32,
}

/// What an enemy did during one update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnemyTick {
    /// Finished spawning this tick
    pub activated: bool,
    /// New color if a chameleon changed hue this tick
    pub color_changed: Option<Hue>,
    pub shots: Vec<Shot>,
}

/// An enemy agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub hue: Hue,
    pub pattern: FirePattern,
    pub variant: Variant,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub bullet_speed: f32,
    pub radius: f32,
    pub shoot_interval: f32,
    pub shoot_timer: f32,
    pub spawn_delay: f32,
    pub spawn_elapsed: f32,
    pub phase: EnemyPhase,
    /// Accumulated active time, drives spiral movement and rotating volleys
    pub angle_offset: f32,
}

impl Enemy {
    pub fn new(
        id: u32,
        pos: Vec2,
        hue: Hue,
        pattern: FirePattern,
        variant: Variant,
        stats: EnemyStats,
    ) -> Self {
        Self {
            id,
            pos,
            hue,
            pattern,
            variant,
            health: stats.health,
            max_health: stats.health,
            speed: stats.speed,
            bullet_speed: stats.bullet_speed,
            radius: ENEMY_RADIUS,
            shoot_interval: pattern.shoot_interval(),
            shoot_timer: 0.0,
            spawn_delay: stats.spawn_delay,
            spawn_elapsed: 0.0,
            phase: EnemyPhase::Spawning,
            angle_offset: 0.0,
        }
    }

    #[inline]
    pub fn is_spawning(&self) -> bool {
        self.phase == EnemyPhase::Spawning
    }

    /// Only active enemies move, fire and take hits
    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase == EnemyPhase::Active
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.phase == EnemyPhase::Dead
    }

    pub fn profile(&self) -> DamageProfile {
        match self.variant {
            Variant::Static => DamageProfile::Standard,
            Variant::Chameleon => DamageProfile::Chameleon,
        }
    }

    /// Snapshot of this enemy as a combat defender
    pub fn defender(&self) -> Defender {
        Defender {
            pos: self.pos,
            hue: self.hue,
            health: self.health,
            max_health: self.max_health,
            profile: self.profile(),
            bullet_speed: self.bullet_speed,
        }
    }

    /// Store the result of a resolved hit
    pub fn apply_hit(&mut self, outcome: &HitOutcome) {
        self.health = outcome.health;
        if outcome.dead {
            self.phase = EnemyPhase::Dead;
        }
    }

    /// Advance one tick
    pub fn update(
        &mut self,
        dt: f32,
        player_pos: Vec2,
        player_hue: Hue,
        omni_fires: bool,
    ) -> EnemyTick {
        let mut out = EnemyTick::default();
        if self.is_dead() {
            return out;
        }

        if self.variant == Variant::Chameleon && self.hue != player_hue {
            self.hue = player_hue;
            out.color_changed = Some(player_hue);
        }

        match self.phase {
            EnemyPhase::Spawning => {
                self.spawn_elapsed += dt;
                if self.spawn_elapsed >= self.spawn_delay {
                    self.phase = EnemyPhase::Active;
                    self.shoot_timer = 0.0;
                    out.activated = true;
                }
            }
            EnemyPhase::Active => {
                self.angle_offset += dt;
                self.shoot_timer += dt;
                self.move_toward(player_pos, dt);

                if self.shoot_timer >= self.shoot_interval {
                    self.shoot_timer = 0.0;
                    // Refuses to fire while mismatched with the player
                    if self.hue.matches(player_hue) {
                        out.shots = self.volley(player_pos, omni_fires);
                    }
                }
            }
            EnemyPhase::Dead => {}
        }

        out
    }

    fn move_toward(&mut self, target: Vec2, dt: f32) {
        let dir = (target - self.pos).normalize_or_zero();
        if dir == Vec2::ZERO {
            return;
        }
        let mut step = dir;
        if self.variant == Variant::Static && self.pattern == FirePattern::Omni {
            // Spiral in
            step += dir.perp() * (self.angle_offset * 5.0).sin() * 0.5;
        }
        self.pos += step * self.speed * dt;
    }

    /// Shots for one volley of this enemy's pattern
    pub fn volley(&self, player_pos: Vec2, omni_fires: bool) -> Vec<Shot> {
        let to_player = player_pos - self.pos;
        let aimed = |count: usize, step: f32| -> Vec<Shot> {
            if to_player.length_squared() == 0.0 {
                return Vec::new();
            }
            let bearing = angle_of(to_player);
            let center = (count as f32 - 1.0) / 2.0;
            (0..count)
                .map(|i| {
                    let angle = bearing + (i as f32 - center) * step;
                    Shot::new(self.pos, direction_from_angle(angle), self.hue, self.bullet_speed)
                })
                .collect()
        };

        match self.pattern {
            FirePattern::Omni if omni_fires => {
                radial_burst(self.pos, 8, self.hue, self.bullet_speed, 0.0)
            }
            FirePattern::Omni => Vec::new(),
            FirePattern::Cone => aimed(3, 0.3),
            FirePattern::Alternating => aimed(5, 0.4),
            FirePattern::Burst => aimed(1, 0.0),
            FirePattern::Spiral => radial_burst(
                self.pos,
                6,
                self.hue,
                self.bullet_speed,
                self.angle_offset * 2.0,
            ),
        }
    }
}
