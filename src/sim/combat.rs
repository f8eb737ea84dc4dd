//! Color-matching combat resolution
//!
//! Pure functions: nothing here touches game state. Callers feed in the
//! colors and health involved and apply the returned outcome.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::color::Hue;
use super::projectile::Shot;
use crate::consts::{CHAMELEON_RETALIATION, STANDARD_RETALIATION};
use crate::direction_from_angle;

/// How a defender reacts to incoming hits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageProfile {
    /// Opposite color hits twice as hard
    Standard,
    /// Same color lands full damage, opposite color only half
    Chameleon,
    /// Color-blind (the boss)
    Uniform,
}

impl DamageProfile {
    /// Damage multiplier for an attacker/defender color pair
    pub fn multiplier(self, attacker: Hue, defender: Hue) -> f32 {
        let same = attacker.matches(defender);
        match self {
            DamageProfile::Standard => {
                if same {
                    1.0
                } else {
                    2.0
                }
            }
            DamageProfile::Chameleon => {
                if same {
                    1.0
                } else {
                    0.5
                }
            }
            DamageProfile::Uniform => 1.0,
        }
    }

    /// Projectiles in the death burst
    pub fn retaliation_count(self) -> usize {
        match self {
            DamageProfile::Standard => STANDARD_RETALIATION,
            DamageProfile::Chameleon => CHAMELEON_RETALIATION,
            DamageProfile::Uniform => 0,
        }
    }
}

/// The defender side of a hit
#[derive(Debug, Clone, Copy)]
pub struct Defender {
    pub pos: Vec2,
    pub hue: Hue,
    pub health: f32,
    pub max_health: f32,
    pub profile: DamageProfile,
    /// Speed of any retaliation burst
    pub bullet_speed: f32,
}

/// Result of resolving one hit
#[derive(Debug, Clone, PartialEq)]
pub struct HitOutcome {
    pub health: f32,
    pub damage: f32,
    pub dead: bool,
    /// Radial burst in the defender's color (empty unless killed by its own color)
    pub retaliation: Vec<Shot>,
}

/// Apply one hit of `damage_base` in `attacker` color to a defender
pub fn resolve_hit(attacker: Hue, defender: &Defender, damage_base: f32) -> HitOutcome {
    let damage = damage_base * defender.profile.multiplier(attacker, defender.hue);
    let health = (defender.health - damage).min(defender.max_health);
    let dead = health <= 0.0;

    let retaliation = if dead && attacker.matches(defender.hue) {
        radial_burst(
            defender.pos,
            defender.profile.retaliation_count(),
            defender.hue,
            defender.bullet_speed,
            0.0,
        )
    } else {
        Vec::new()
    };

    HitOutcome {
        health,
        damage,
        dead,
        retaliation,
    }
}

/// `count` shots evenly spaced around a full circle, starting at `rotation`
pub fn radial_burst(origin: Vec2, count: usize, hue: Hue, speed: f32, rotation: f32) -> Vec<Shot> {
    (0..count)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / count as f32 + rotation;
            Shot::new(origin, direction_from_angle(angle), hue, speed)
        })
        .collect()
}

/// What happens when an enemy projectile reaches the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerImpact {
    /// Same color: consumed without damage, feeds the power meter
    Absorbed,
    /// Opposite color: consumed, player loses this much health
    Damaged(f32),
}

pub fn resolve_player_hit(player: Hue, projectile: Hue, hit_damage: f32) -> PlayerImpact {
    if player.matches(projectile) {
        PlayerImpact::Absorbed
    } else {
        PlayerImpact::Damaged(hit_damage)
    }
}
