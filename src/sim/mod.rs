//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod boss;
pub mod collision;
pub mod color;
pub mod combat;
pub mod enemy;
pub mod power;
pub mod projectile;
pub mod scoring;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use boss::{Boss, BossPhase};
pub use collision::{CollisionResult, circle_collision, circles_overlap};
pub use color::Hue;
pub use combat::{DamageProfile, HitOutcome, resolve_hit};
pub use enemy::{Enemy, EnemyPhase, FirePattern, Variant};
pub use power::PowerMeter;
pub use projectile::{Owner, Projectile, ProjectileSet};
pub use scoring::ScoreState;
pub use snapshot::RenderSnapshot;
pub use spawner::{SessionClock, SpawnScaling, Spawner};
pub use state::{GameEvent, GamePhase, GameState, Player, SessionOutcome};
pub use tick::{TickInput, step, tick};
