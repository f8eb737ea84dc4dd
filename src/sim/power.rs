//! Power meter fed by absorbing same-color projectiles

use serde::{Deserialize, Serialize};

/// Power gained per absorbed projectile
pub const ABSORB_POWER: f32 = 5.0;
/// Meter capacity; reaching it levels up and empties the meter
pub const POWER_CAPACITY: f32 = 100.0;
/// Passive drain (power per second)
pub const POWER_DECAY_RATE: f32 = 0.5;
/// Damage multiplier gained per level
pub const MULTIPLIER_PER_LEVEL: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerMeter {
    pub power: f32,
    pub level: u32,
    pub multiplier: f32,
}

impl Default for PowerMeter {
    fn default() -> Self {
        Self {
            power: 0.0,
            level: 1,
            multiplier: 1.0,
        }
    }
}

impl PowerMeter {
    /// Absorb one projectile. Returns true on level-up.
    pub fn absorb(&mut self) -> bool {
        self.add(ABSORB_POWER)
    }

    pub fn add(&mut self, amount: f32) -> bool {
        self.power += amount;
        if self.power >= POWER_CAPACITY {
            self.power = 0.0;
            self.level += 1;
            self.multiplier = 1.0 + (self.level - 1) as f32 * MULTIPLIER_PER_LEVEL;
            return true;
        }
        false
    }

    pub fn tick(&mut self, dt: f32) {
        self.power = (self.power - POWER_DECAY_RATE * dt).max(0.0);
    }

    /// Fill fraction in [0, 1]
    pub fn fraction(&self) -> f32 {
        (self.power / POWER_CAPACITY).clamp(0.0, 1.0)
    }
}
