//! Immutable per-tick view for renderers
//!
//! A renderer running on another thread reads only these copies, never the
//! live `GameState`.

use glam::Vec2;
use serde::Serialize;

use super::boss::BossPhase;
use super::color::Hue;
use super::enemy::{EnemyPhase, FirePattern, Variant};
use super::projectile::Owner;
use super::spawner::format_time;
use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub hue: Hue,
    pub health: f32,
    pub max_health: f32,
    pub power: f32,
    pub power_level: u32,
    pub power_multiplier: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyView {
    pub id: u32,
    pub pos: Vec2,
    pub hue: Hue,
    pub variant: Variant,
    pub pattern: FirePattern,
    pub phase: EnemyPhase,
    /// Health fraction in [0, 1]
    pub health: f32,
    /// Spawn preview progress in [0, 1]
    pub spawn_progress: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub hue: Hue,
    pub radius: f32,
    pub owner: Owner,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BossView {
    pub pos: Vec2,
    pub radius: f32,
    pub health: f32,
    pub phase: BossPhase,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreView {
    pub total: u64,
    pub multiplier: u32,
    pub kill_streak: u32,
    pub streak_time_left: f32,
    pub rank: &'static str,
    pub message: &'static str,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub elapsed: f32,
    pub remaining: String,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub boss: Option<BossView>,
    pub score: ScoreView,
}

impl GameState {
    /// Copy out the drawable state
    pub fn snapshot(&self) -> RenderSnapshot {
        let player = &self.player;
        RenderSnapshot {
            tick: self.time_ticks,
            phase: self.phase,
            elapsed: self.clock.elapsed,
            remaining: format_time(self.clock.remaining()),
            player: PlayerView {
                pos: player.pos,
                hue: player.hue,
                health: player.health,
                max_health: player.max_health,
                power: player.power.fraction(),
                power_level: player.power.level,
                power_multiplier: player.power_multiplier(),
            },
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    pos: e.pos,
                    hue: e.hue,
                    variant: e.variant,
                    pattern: e.pattern,
                    phase: e.phase,
                    health: if e.max_health > 0.0 {
                        (e.health / e.max_health).clamp(0.0, 1.0)
                    } else {
                        0.0
                    },
                    spawn_progress: if e.spawn_delay > 0.0 {
                        (e.spawn_elapsed / e.spawn_delay).clamp(0.0, 1.0)
                    } else {
                        1.0
                    },
                })
                .collect(),
            projectiles: self
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    pos: p.pos,
                    hue: p.hue,
                    radius: p.radius,
                    owner: p.owner,
                })
                .collect(),
            boss: self.boss.as_ref().map(|b| BossView {
                pos: b.pos,
                radius: b.radius,
                health: (b.health / b.max_health).clamp(0.0, 1.0),
                phase: b.phase,
            }),
            score: ScoreView {
                total: self.score.total_score,
                multiplier: self.score.multiplier,
                kill_streak: self.score.kill_streak,
                streak_time_left: self.score.streak_time_left(),
                rank: self.score.rank(),
                message: self.score.multiplier_message(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_of_fresh_session() {
        let state = GameState::with_seed(4);
        let snap = state.snapshot();
        assert_eq!(snap.tick, 0);
        assert_eq!(snap.remaining, "4:11");
        assert_eq!(snap.score.rank, "C");
        assert!(snap.enemies.is_empty());
        assert!(snap.boss.is_none());
    }

    #[test]
    fn test_snapshot_is_detached_copy() {
        let mut state = GameState::with_seed(4);
        state
            .projectiles
            .spawn(Vec2::ZERO, Vec2::X, Hue::Blue, 100.0, 5.0, Owner::Enemy);
        let snap = state.snapshot();
        state.projectiles.clear();
        assert_eq!(snap.projectiles.len(), 1);
        assert_eq!(snap.projectiles[0].hue, Hue::Blue);
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_string(&GameState::with_seed(4).snapshot()).expect("serializable");
        assert!(json.contains("\"phase\":\"Playing\""));
    }
}
