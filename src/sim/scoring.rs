//! Kill-streak scoring with timeout decay and rank tiers

use serde::{Deserialize, Serialize};

/// Default seconds without a kill before the streak resets
pub const STREAK_TIMEOUT: f32 = 5.0;

/// Ascending (threshold, rank) table
pub const RANK_THRESHOLDS: [(u64, &str); 5] =
    [(0, "C"), (1000, "B"), (3000, "A"), (7000, "S"), (15000, "SS")];

/// Flavour text, one per 10x of multiplier
const MULTIPLIER_MESSAGES: [&str; 10] = [
    "Dull.",
    "Keep it up!",
    "Not bad!",
    "Great!",
    "On fire!",
    "Unstoppable!",
    "Godlike!",
    "Impossible!",
    "Exalted!",
    "Legendary!",
];

/// Score, streak and multiplier for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreState {
    pub total_score: u64,
    pub kill_streak: u32,
    /// Always `max(1, kill_streak)`
    pub multiplier: u32,
    pub time_since_last_kill: f32,
    pub streak_timeout: f32,
    /// Extra window earned since the last kill, on top of `streak_timeout`
    #[serde(default)]
    pub bonus_window: f32,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new(STREAK_TIMEOUT)
    }
}

impl ScoreState {
    pub fn new(streak_timeout: f32) -> Self {
        Self {
            total_score: 0,
            kill_streak: 0,
            multiplier: 1,
            time_since_last_kill: 0.0,
            streak_timeout,
            bonus_window: 0.0,
        }
    }

    /// Count a kill and return the points it earned
    pub fn register_kill(&mut self, base_score: u64, enemy_max_health: f32) -> u64 {
        self.kill_streak += 1;
        self.multiplier = self.kill_streak.max(1);
        self.time_since_last_kill = 0.0;
        self.bonus_window = 0.0;

        let hp_bonus = (enemy_max_health * 0.5).max(0.0).floor() as u64;
        let delta = (base_score + hp_bonus) * self.multiplier as u64;
        self.total_score += delta;
        delta
    }

    /// Advance the streak timer. Returns true if the streak just expired.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.time_since_last_kill += dt;
        if self.time_since_last_kill > self.window() && self.kill_streak > 0 {
            self.kill_streak = 0;
            self.multiplier = 1;
            self.bonus_window = 0.0;
            return true;
        }
        false
    }

    /// Buy back streak time. The timer is floored at zero; whatever it
    /// cannot absorb widens the window until the next kill.
    pub fn extend_streak_window(&mut self, amount: f32) {
        let amount = amount.max(0.0);
        let absorbed = amount.min(self.time_since_last_kill);
        self.time_since_last_kill -= absorbed;
        self.bonus_window += amount - absorbed;
    }

    fn window(&self) -> f32 {
        self.streak_timeout + self.bonus_window
    }

    /// Seconds left before the streak resets
    pub fn streak_time_left(&self) -> f32 {
        (self.window() - self.time_since_last_kill).max(0.0)
    }

    pub fn rank(&self) -> &'static str {
        rank_for(self.total_score)
    }

    pub fn multiplier_message(&self) -> &'static str {
        let idx = (self.multiplier / 10) as usize;
        MULTIPLIER_MESSAGES[idx.min(MULTIPLIER_MESSAGES.len() - 1)]
    }
}

/// Highest rank whose threshold does not exceed `score`
pub fn rank_for(score: u64) -> &'static str {
    RANK_THRESHOLDS
        .iter()
        .rev()
        .find(|(threshold, _)| score >= *threshold)
        .map(|(_, rank)| *rank)
        .unwrap_or(RANK_THRESHOLDS[0].1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_kill_score() {
        let mut s = ScoreState::default();
        let delta = s.register_kill(100, 50.0);
        assert_eq!(s.kill_streak, 1);
        assert_eq!(s.multiplier, 1);
        assert_eq!(delta, 125);
        assert_eq!(s.total_score, 125);
    }

    #[test]
    fn test_streak_multiplies() {
        let mut s = ScoreState::default();
        s.register_kill(100, 0.0);
        s.tick(1.0);
        let delta = s.register_kill(100, 3.0);
        assert_eq!(s.multiplier, 2);
        assert_eq!(delta, 202);
        assert_eq!(s.time_since_last_kill, 0.0);
    }

    #[test]
    fn test_streak_times_out() {
        let mut s = ScoreState::default();
        s.register_kill(100, 0.0);
        s.register_kill(100, 0.0);
        assert!(!s.tick(5.0));
        assert_eq!(s.multiplier, 2);
        assert!(s.tick(0.1));
        assert_eq!(s.kill_streak, 0);
        assert_eq!(s.multiplier, 1);
        // Already reset, nothing more to report
        assert!(!s.tick(1.0));
    }

    #[test]
    fn test_extend_window_floors_at_zero() {
        let mut s = ScoreState::default();
        s.register_kill(100, 0.0);
        s.tick(4.0);
        s.extend_streak_window(1.5);
        assert!((s.time_since_last_kill - 2.5).abs() < 1e-6);
        assert_eq!(s.bonus_window, 0.0);
        s.extend_streak_window(10.0);
        assert_eq!(s.time_since_last_kill, 0.0);
        assert!((s.bonus_window - 7.5).abs() < 1e-6);
        assert!((s.streak_time_left() - 12.5).abs() < 1e-6);
    }

    #[test]
    fn test_extension_right_after_kill_widens_window() {
        let mut s = ScoreState::default();
        s.register_kill(100, 0.0);
        s.extend_streak_window(1.0);
        assert_eq!(s.time_since_last_kill, 0.0);
        assert_eq!(s.streak_time_left(), 6.0);

        // Survives past the plain timeout
        assert!(!s.tick(5.5));
        assert_eq!(s.kill_streak, 1);
        assert!(s.tick(0.6));
        assert_eq!(s.bonus_window, 0.0);
    }

    #[test]
    fn test_next_kill_clears_bonus() {
        let mut s = ScoreState::default();
        s.register_kill(100, 0.0);
        s.extend_streak_window(1.0);
        s.register_kill(100, 0.0);
        assert_eq!(s.streak_time_left(), 5.0);
    }

    #[test]
    fn test_rank_lookup() {
        assert_eq!(rank_for(0), "C");
        assert_eq!(rank_for(999), "C");
        assert_eq!(rank_for(1000), "B");
        assert_eq!(rank_for(3000), "A");
        assert_eq!(rank_for(14999), "S");
        assert_eq!(rank_for(15000), "SS");
        assert_eq!(rank_for(u64::MAX), "SS");
    }

    #[test]
    fn test_multiplier_message_caps() {
        let mut s = ScoreState::default();
        assert_eq!(s.multiplier_message(), "Dull.");
        s.multiplier = 12;
        assert_eq!(s.multiplier_message(), "Keep it up!");
        s.multiplier = 500;
        assert_eq!(s.multiplier_message(), "Legendary!");
    }

    proptest! {
        #[test]
        fn multiplier_never_drops_within_window(gaps in prop::collection::vec(0.0f32..4.9, 1..30)) {
            let mut s = ScoreState::default();
            let mut last = s.multiplier;
            for gap in gaps {
                s.tick(gap);
                s.register_kill(100, 10.0);
                prop_assert!(s.multiplier >= last);
                prop_assert_eq!(s.multiplier, s.kill_streak.max(1));
                last = s.multiplier;
            }
        }

        #[test]
        fn multiplier_resets_after_timeout(kills in 1u32..20, idle in 5.01f32..60.0) {
            let mut s = ScoreState::default();
            for _ in 0..kills {
                s.register_kill(100, 10.0);
            }
            s.tick(idle);
            prop_assert_eq!(s.multiplier, 1);
            prop_assert_eq!(s.kill_streak, 0);
        }
    }
}
