//! Simulation tick
//!
//! Core game loop that advances the simulation deterministically. Order per
//! tick: player input, spawner, enemies, boss, projectiles, collisions,
//! scoring, session end.

use glam::Vec2;

use super::boss::Boss;
use super::collision::{circle_collision, circles_overlap, clamp_to_rect};
use super::color::Hue;
use super::combat::{PlayerImpact, resolve_hit, resolve_player_hit};
use super::enemy::Variant;
use super::projectile::{Owner, ProjectileId, Shot};
use super::spawner::{SpawnContext, roll_enemy};
use super::state::{GameEvent, GamePhase, GameState, SessionOutcome};
use crate::consts::*;

/// Player input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired movement direction (normalized internally, zero = stand still)
    pub movement: Vec2,
    /// Flip the player's hue this tick
    pub toggle_color: bool,
    /// Fire toward `aim_target`
    pub fire: bool,
    pub aim_target: Vec2,
    /// Discard the session and start over
    pub restart: bool,
    /// Idle/demo mode - AI plays the game
    pub autopilot: bool,
}

/// Advance the game state by `dt` seconds, returning what happened
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.restart {
        state.reset();
        return events;
    }

    if !dt.is_finite() || dt < 0.0 {
        log::warn!("Rejected tick with delta {}", dt);
        events.push(GameEvent::TickRejected { delta: dt });
        return events;
    }

    // Nothing moves once the session is over
    if state.phase.is_terminal() {
        return events;
    }

    let input = if input.autopilot {
        autopilot_input(state, input)
    } else {
        input.clone()
    };

    state.time_ticks += 1;
    state.clock.advance(dt);

    update_player(state, &input, dt);
    run_spawner(state, dt, &mut events);
    update_enemies(state, dt, &mut events);
    update_boss(state, dt, &mut events);
    state.projectiles.tick(dt);
    resolve_collisions(state, &mut events);

    if state.score.tick(dt) {
        events.push(GameEvent::StreakReset);
    }

    check_session_end(state, &mut events);

    // Ensure deterministic ordering
    state.normalize_order();

    log::trace!(
        "tick {}: t={:.2} enemies={} projectiles={} score={}",
        state.time_ticks,
        state.clock.elapsed,
        state.enemies.len(),
        state.projectiles.len(),
        state.score.total_score
    );

    events
}

/// Pure form of [`tick`]: the previous state is left untouched
pub fn step(prev: &GameState, dt: f32, input: &TickInput) -> (GameState, Vec<GameEvent>) {
    let mut next = prev.clone();
    let events = tick(&mut next, input, dt);
    (next, events)
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let player = &mut state.player;

    let dir = input.movement.normalize_or_zero();
    player.pos += dir * PLAYER_SPEED * dt;
    player.pos = clamp_to_rect(
        player.pos,
        player.radius,
        Vec2::ZERO,
        Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
    );

    if input.toggle_color {
        player.hue.toggle();
    }

    player.fire_cooldown = (player.fire_cooldown - dt).max(0.0);
    player.contact_immunity = (player.contact_immunity - dt).max(0.0);
    player.power.tick(dt);

    if input.fire && player.fire_cooldown <= 0.0 {
        let aim = input.aim_target - player.pos;
        if aim.length_squared() > 0.0 {
            state.projectiles.spawn(
                player.pos,
                aim,
                player.hue,
                PLAYER_BULLET_SPEED,
                PLAYER_BULLET_RADIUS,
                Owner::Player,
            );
            player.fire_cooldown = PLAYER_FIRE_INTERVAL;
        }
    }
}

fn run_spawner(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    let order = state.spawner.tick(&state.clock, dt);

    for _ in 0..order.enemies {
        spawn_enemy(state, None, events);
    }

    if order.boss {
        log::info!("Time up at {:.1}s - boss incoming", state.clock.elapsed);
        state.boss = Some(Boss::new());
        state.phase = GamePhase::BossFight;
        events.push(GameEvent::BossSpawned);
    }
}

fn spawn_enemy(state: &mut GameState, pos: Option<Vec2>, events: &mut Vec<GameEvent>) {
    let ctx = SpawnContext {
        progress: state.clock.progress(),
        player_hue: state.player.hue,
        damage_est: state.player.base_damage,
        score_multiplier: state.score.multiplier,
    };
    let id = state.next_entity_id();
    let enemy = roll_enemy(&mut state.rng, id, &ctx, pos);
    events.push(GameEvent::EnemySpawned {
        id,
        pos: enemy.pos,
        hue: enemy.hue,
        variant: enemy.variant,
        pattern: enemy.pattern,
    });
    state.enemies.push(enemy);
}

fn update_enemies(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    let player_pos = state.player.pos;
    let player_hue = state.player.hue;
    let omni_fires = state.settings.legacy_omni_pattern;

    let mut shots: Vec<Shot> = Vec::new();
    for enemy in &mut state.enemies {
        let out = enemy.update(dt, player_pos, player_hue, omni_fires);
        if out.activated {
            events.push(GameEvent::EnemyActivated { id: enemy.id });
        }
        if let Some(hue) = out.color_changed {
            events.push(GameEvent::EnemyColorChanged { id: enemy.id, hue });
        }
        shots.extend(out.shots);
    }

    for shot in &shots {
        state
            .projectiles
            .spawn_shot(shot, ENEMY_BULLET_RADIUS, Owner::Enemy);
    }
}

fn update_boss(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    let player_pos = state.player.pos;
    let (out, boss_pos) = match state.boss.as_mut() {
        Some(boss) => (boss.update(dt, player_pos), boss.pos),
        None => return,
    };

    if let Some(phase) = out.phase_changed {
        log::info!("Boss phase -> {:?}", phase);
        events.push(GameEvent::BossPhaseChanged { phase });
    }
    for shot in &out.shots {
        state
            .projectiles
            .spawn_shot(shot, ENEMY_BULLET_RADIUS, Owner::Enemy);
    }
    if out.summon_minion {
        spawn_enemy(state, Some(boss_pos), events);
    }
}

/// Resolve every overlap for this tick.
///
/// Removals are collected and applied after each pass, so an entity is
/// evaluated at most once and a destroyed target is never hit twice.
fn resolve_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) {
    // --- Enemy projectiles vs player ---
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;
    let incoming: Vec<(ProjectileId, Hue)> = state
        .projectiles
        .iter_owned_by(Owner::Enemy)
        .filter(|p| circles_overlap(p.pos, p.radius, player_pos, player_radius))
        .map(|p| (p.id, p.hue))
        .collect();

    let mut consumed: Vec<ProjectileId> = Vec::with_capacity(incoming.len());
    for (id, hue) in incoming {
        consumed.push(id);
        let player = &mut state.player;
        match resolve_player_hit(player.hue, hue, state.settings.player_hit_damage) {
            PlayerImpact::Absorbed => {
                let leveled = player.power.absorb();
                events.push(GameEvent::ProjectileAbsorbed {
                    power: player.power.power,
                });
                if leveled {
                    log::info!(
                        "Power level {} (x{:.1} damage)",
                        player.power.level,
                        player.power.multiplier
                    );
                    events.push(GameEvent::PowerLevelUp {
                        level: player.power.level,
                        multiplier: player.power.multiplier,
                    });
                }
            }
            PlayerImpact::Damaged(damage) => {
                player.health -= damage;
                events.push(GameEvent::PlayerHit {
                    damage,
                    health: player.health,
                });
            }
        }
    }
    state.projectiles.remove_all(&consumed);

    // --- Player projectiles vs enemies and boss ---
    let outgoing: Vec<(ProjectileId, Vec2, f32, Hue)> = state
        .projectiles
        .iter_owned_by(Owner::Player)
        .map(|p| (p.id, p.pos, p.radius, p.hue))
        .collect();

    let damage = state.player.damage();
    let mut consumed: Vec<ProjectileId> = Vec::new();
    let mut retaliation: Vec<Shot> = Vec::new();
    let mut kills: Vec<(usize, Hue)> = Vec::new();
    let mut boss_killed = false;

    for (id, pos, radius, hue) in outgoing {
        // Dead or spawning enemies are not valid targets
        let target = state
            .enemies
            .iter()
            .position(|e| e.is_active() && circles_overlap(pos, radius, e.pos, e.radius));

        if let Some(idx) = target {
            let enemy = &mut state.enemies[idx];
            let outcome = resolve_hit(hue, &enemy.defender(), damage);
            enemy.apply_hit(&outcome);
            consumed.push(id);
            if outcome.dead {
                kills.push((idx, hue));
                retaliation.extend(outcome.retaliation);
            }
            continue;
        }

        if let Some(boss) = state.boss.as_mut() {
            if !boss.is_dead() && circles_overlap(pos, radius, boss.pos, boss.radius) {
                let outcome = resolve_hit(hue, &boss.defender(), damage);
                boss.apply_hit(&outcome);
                consumed.push(id);
                boss_killed |= outcome.dead;
            }
        }
    }
    state.projectiles.remove_all(&consumed);

    for (idx, killing_hue) in kills {
        let enemy = &state.enemies[idx];
        let burst = if killing_hue == enemy.hue {
            enemy.profile().retaliation_count()
        } else {
            0
        };
        events.push(GameEvent::EnemyDied {
            id: enemy.id,
            pos: enemy.pos,
            hue: enemy.hue,
            retaliation: burst,
        });

        let max_health = enemy.max_health;
        let opposite = killing_hue != enemy.hue;
        let points = state.score.register_kill(ENEMY_BASE_SCORE, max_health);
        if opposite {
            state.score.extend_streak_window(OPPOSITE_KILL_STREAK_BONUS);
        }
        log::debug!(
            "Enemy {} killed: +{} (x{})",
            enemy.id,
            points,
            state.score.multiplier
        );
        events.push(GameEvent::KillScored {
            points,
            multiplier: state.score.multiplier,
            total: state.score.total_score,
        });
    }
    state.enemies.retain(|e| !e.is_dead());

    for shot in &retaliation {
        state
            .projectiles
            .spawn_shot(shot, ENEMY_BULLET_RADIUS, Owner::Enemy);
    }

    if boss_killed {
        if let Some(boss) = state.boss.take() {
            let points = state.score.register_kill(BOSS_BASE_SCORE, boss.max_health);
            log::info!("Boss defeated: +{}", points);
            events.push(GameEvent::BossDefeated);
            events.push(GameEvent::KillScored {
                points,
                multiplier: state.score.multiplier,
                total: state.score.total_score,
            });
        }
    }

    // --- Player vs enemy bodies ---
    resolve_contact(state, events);
}

fn resolve_contact(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let hit_damage = state.settings.player_hit_damage;
    let player = &mut state.player;

    let bodies = state
        .enemies
        .iter()
        .filter(|e| e.is_active())
        .map(|e| (e.pos, e.radius, Some(e.hue)))
        .chain(state.boss.iter().map(|b| (b.pos, b.radius, None)));

    for (pos, radius, hue) in bodies {
        let hit = circle_collision(player.pos, player.radius, pos, radius);
        if !hit.hit {
            continue;
        }
        // Push the player out of the body
        player.pos += hit.normal * hit.penetration;

        // The boss hurts in either color
        let hurts = hue.is_none_or(|h| h != player.hue);
        if hurts && player.contact_immunity <= 0.0 {
            player.health -= hit_damage;
            player.contact_immunity = CONTACT_IMMUNITY;
            events.push(GameEvent::PlayerHit {
                damage: hit_damage,
                health: player.health,
            });
        }
    }

    player.pos = clamp_to_rect(
        player.pos,
        player.radius,
        Vec2::ZERO,
        Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
    );
}

fn check_session_end(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let outcome = if state.player.is_dead() {
        Some(SessionOutcome::Defeated)
    } else if state.phase == GamePhase::BossFight && state.boss.is_none() {
        Some(SessionOutcome::Victory)
    } else if state.phase == GamePhase::Playing
        && state.clock.is_time_up()
        && !state.settings.boss_enabled
    {
        Some(SessionOutcome::TimeUp)
    } else {
        None
    };

    if let Some(outcome) = outcome {
        log::info!(
            "Session ended: {:?} at {:.1}s, score {} (rank {})",
            outcome,
            state.clock.elapsed,
            state.score.total_score,
            state.score.rank()
        );
        state.phase = outcome.into();
        state.enemies.clear();
        state.projectiles.clear();
        events.push(GameEvent::SessionEnded { outcome });
    }
}

/// Demo AI: shoot the nearest enemy in the opposite hue and keep some distance
fn autopilot_input(state: &GameState, input: &TickInput) -> TickInput {
    let mut input = input.clone();
    let player = &state.player;

    let nearest = state
        .enemies
        .iter()
        .filter(|e| e.is_active())
        .min_by(|a, b| {
            a.pos
                .distance_squared(player.pos)
                .total_cmp(&b.pos.distance_squared(player.pos))
        });

    if let Some(enemy) = nearest {
        input.aim_target = enemy.pos;
        input.fire = true;
        // Opposite hue hits twice as hard and denies the retaliation burst.
        // Chameleons mirror us, so toggling against them is pointless.
        input.toggle_color = enemy.variant == Variant::Static && enemy.hue == player.hue;
    } else if let Some(boss) = &state.boss {
        input.aim_target = boss.pos;
        input.fire = true;
    }

    let time = state.time_ticks as f32 * SIM_DT;
    let strafe = Vec2::new((time * 0.7).sin(), (time * 0.3).cos() * 0.3);
    let retreat = nearest
        .filter(|e| e.pos.distance(player.pos) < 200.0)
        .map(|e| (player.pos - e.pos).normalize_or_zero())
        .unwrap_or(Vec2::ZERO);
    // Drift back toward the middle of the arena
    let home = (Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT * 0.6) - player.pos) / ARENA_WIDTH;
    input.movement = strafe * 0.5 + retreat * 1.5 + home;

    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::enemy::{Enemy, EnemyPhase, EnemyStats, FirePattern};
    use crate::sim::scoring::ScoreState;

    fn add_enemy(state: &mut GameState, pos: Vec2, hue: Hue, health: f32, active: bool) -> u32 {
        let id = state.next_entity_id();
        let mut enemy = Enemy::new(
            id,
            pos,
            hue,
            FirePattern::Cone,
            Variant::Static,
            EnemyStats {
                health,
                speed: 100.0,
                bullet_speed: 240.0,
                spawn_delay: 10.0,
            },
        );
        if active {
            enemy.phase = EnemyPhase::Active;
        }
        state.enemies.push(enemy);
        id
    }

    fn player_shot(state: &mut GameState, pos: Vec2, hue: Hue) -> ProjectileId {
        state
            .projectiles
            .spawn(pos, Vec2::ZERO, hue, 0.0, PLAYER_BULLET_RADIUS, Owner::Player)
    }

    fn enemy_shot(state: &mut GameState, pos: Vec2, hue: Hue) -> ProjectileId {
        state
            .projectiles
            .spawn(pos, Vec2::ZERO, hue, 0.0, ENEMY_BULLET_RADIUS, Owner::Enemy)
    }

    #[test]
    fn test_rejects_bad_delta() {
        let mut state = GameState::with_seed(1);
        for dt in [-0.1, f32::NAN, f32::INFINITY] {
            let events = tick(&mut state, &TickInput::default(), dt);
            assert!(matches!(events.as_slice(), [GameEvent::TickRejected { .. }]));
        }
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.clock.elapsed, 0.0);
    }

    #[test]
    fn test_opposite_projectile_damages_player() {
        let mut state = GameState::with_seed(1);
        let pos = state.player.pos;
        let id = enemy_shot(&mut state, pos, Hue::Blue);
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.health, 275.0);
        assert!(state.projectiles.get(id).is_none());
        assert!(events.contains(&GameEvent::PlayerHit {
            damage: 25.0,
            health: 275.0
        }));
    }

    #[test]
    fn test_same_color_projectile_is_absorbed() {
        let mut state = GameState::with_seed(1);
        let pos = state.player.pos;
        let id = enemy_shot(&mut state, pos, Hue::Red);
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.health, 300.0);
        assert_eq!(state.player.power.power, 5.0);
        assert!(state.projectiles.get(id).is_none());
        assert!(events.contains(&GameEvent::ProjectileAbsorbed { power: 5.0 }));
    }

    #[test]
    fn test_opposite_color_kill_no_burst() {
        let mut state = GameState::with_seed(1);
        state.player.base_damage = 8.0;
        let pos = Vec2::new(900.0, 600.0);
        let enemy_id = add_enemy(&mut state, pos, Hue::Red, 10.0, true);
        player_shot(&mut state, pos, Hue::Blue);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.enemy(enemy_id).is_none());
        assert_eq!(state.projectiles.iter_owned_by(Owner::Enemy).count(), 0);
        assert_eq!(state.projectiles.iter_owned_by(Owner::Player).count(), 0);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::EnemyDied { id, retaliation: 0, .. } if *id == enemy_id
        )));
        assert_eq!(state.score.total_score, 105);
        assert_eq!(state.score.kill_streak, 1);
    }

    #[test]
    fn test_same_color_kill_bursts() {
        let mut state = GameState::with_seed(1);
        let pos = Vec2::new(900.0, 600.0);
        add_enemy(&mut state, pos, Hue::Red, 1.0, true);
        player_shot(&mut state, pos, Hue::Red);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.enemies.is_empty());
        assert_eq!(state.projectiles.iter_owned_by(Owner::Enemy).count(), 8);
        assert!(state
            .projectiles
            .iter_owned_by(Owner::Enemy)
            .all(|p| p.hue == Hue::Red));
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::EnemyDied { retaliation: 8, .. })));
    }

    fn streak_after_kill(shot_hue: Hue) -> ScoreState {
        let mut state = GameState::with_seed(1);
        state.score.register_kill(ENEMY_BASE_SCORE, 0.0);
        state.score.time_since_last_kill = 3.0;
        let pos = Vec2::new(900.0, 600.0);
        add_enemy(&mut state, pos, Hue::Red, 1.0, true);
        player_shot(&mut state, pos, shot_hue);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.enemies.is_empty());
        state.score
    }

    #[test]
    fn test_opposite_color_kill_buys_streak_time() {
        let opposite = streak_after_kill(Hue::Blue);
        let same = streak_after_kill(Hue::Red);
        assert_eq!(opposite.kill_streak, 2);
        assert_eq!(same.kill_streak, 2);
        assert_eq!(opposite.time_since_last_kill, same.time_since_last_kill);
        let gained = opposite.streak_time_left() - same.streak_time_left();
        assert!((gained - OPPOSITE_KILL_STREAK_BONUS).abs() < 1e-4);
    }

    #[test]
    fn test_legacy_omni_enemies_fire_radially() {
        for (legacy, expected) in [(false, 0), (true, 8)] {
            let settings = Settings {
                legacy_omni_pattern: legacy,
                ..Settings::default()
            };
            let mut state = GameState::new(settings);
            let id = state.next_entity_id();
            let mut enemy = Enemy::new(
                id,
                Vec2::new(900.0, 600.0),
                Hue::Red,
                FirePattern::Omni,
                Variant::Static,
                EnemyStats {
                    health: 5.0,
                    speed: 100.0,
                    bullet_speed: 240.0,
                    spawn_delay: 0.0,
                },
            );
            enemy.phase = EnemyPhase::Active;
            state.enemies.push(enemy);

            tick(&mut state, &TickInput::default(), 0.5);
            assert_eq!(
                state.projectiles.iter_owned_by(Owner::Enemy).count(),
                expected
            );
        }
    }

    #[test]
    fn test_boss_summons_minion_at_its_position() {
        let settings = Settings {
            total_time: 1.0,
            boss_enabled: true,
            ..Settings::default()
        };
        let mut state = GameState::new(settings);
        tick(&mut state, &TickInput::default(), 1.0);
        assert!(state.enemies.is_empty());

        let events = tick(&mut state, &TickInput::default(), 1.0);
        let boss_pos = state.boss.as_ref().map(|b| b.pos).expect("boss alive");
        assert_eq!(state.enemies.len(), 1);
        assert!(state.enemies[0].is_spawning());
        assert_eq!(state.enemies[0].pos, boss_pos);
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::EnemySpawned { pos, .. } if *pos == boss_pos
        )));
    }

    #[test]
    fn test_spawning_enemy_is_not_a_target() {
        let mut state = GameState::with_seed(1);
        let pos = Vec2::new(900.0, 600.0);
        let enemy_id = add_enemy(&mut state, pos, Hue::Red, 1.0, false);
        let shot = player_shot(&mut state, pos, Hue::Blue);

        tick(&mut state, &TickInput::default(), SIM_DT);
        let enemy = state.enemy(enemy_id).expect("still alive");
        assert_eq!(enemy.health, 1.0);
        assert!(enemy.is_spawning());
        assert!(state.projectiles.get(shot).is_some());
    }

    #[test]
    fn test_second_projectile_on_dead_enemy_is_noop() {
        let mut state = GameState::with_seed(1);
        let pos = Vec2::new(900.0, 600.0);
        add_enemy(&mut state, pos, Hue::Red, 1.0, true);
        player_shot(&mut state, pos, Hue::Blue);
        let second = player_shot(&mut state, pos, Hue::Blue);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        let deaths = events
            .iter()
            .filter(|e| matches!(e, GameEvent::EnemyDied { .. }))
            .count();
        assert_eq!(deaths, 1);
        assert_eq!(state.score.kill_streak, 1);
        assert!(state.projectiles.get(second).is_some());
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = GameState::with_seed(1);
        let input = TickInput {
            fire: true,
            aim_target: Vec2::new(1000.0, 300.0),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.projectiles.iter_owned_by(Owner::Player).count(), 1);
        let p = state.projectiles.iter_owned_by(Owner::Player).next().expect("fired");
        assert_eq!(p.hue, Hue::Red);
        assert!(p.vel.x > 0.0);
    }

    #[test]
    fn test_toggle_and_movement() {
        let mut state = GameState::with_seed(1);
        let input = TickInput {
            movement: Vec2::new(10.0, 0.0),
            toggle_color: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.1);
        assert_eq!(state.player.hue, Hue::Blue);
        assert!((state.player.pos.x - 430.0).abs() < 1e-3);
    }

    #[test]
    fn test_player_clamped_to_arena() {
        let mut state = GameState::with_seed(1);
        let input = TickInput {
            movement: Vec2::NEG_X,
            ..Default::default()
        };
        tick(&mut state, &input, 5.0);
        assert_eq!(state.player.pos.x, PLAYER_RADIUS);
    }

    #[test]
    fn test_contact_damage_and_immunity() {
        let mut state = GameState::with_seed(1);
        let pos = state.player.pos + Vec2::new(15.0, 0.0);
        add_enemy(&mut state, pos, Hue::Blue, 5.0, true);

        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.health, 275.0);
        assert!(state.player.contact_immunity > 0.0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::PlayerHit { .. })));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.health, 275.0);
    }

    #[test]
    fn test_same_color_contact_is_harmless() {
        let mut state = GameState::with_seed(1);
        let pos = state.player.pos + Vec2::new(15.0, 0.0);
        add_enemy(&mut state, pos, Hue::Red, 5.0, true);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.player.health, 300.0);
    }

    #[test]
    fn test_defeat_ends_session_once() {
        let mut state = GameState::with_seed(1);
        state.player.health = 10.0;
        let pos = state.player.pos;
        enemy_shot(&mut state, pos, Hue::Blue);
        let events = tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.phase, GamePhase::Defeated);
        assert!(events.contains(&GameEvent::SessionEnded {
            outcome: SessionOutcome::Defeated
        }));

        let ticks = state.time_ticks;
        assert!(tick(&mut state, &TickInput::default(), SIM_DT).is_empty());
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_time_up_exactly_once() {
        let settings = Settings {
            total_time: 1.0,
            ..Settings::default()
        };
        let mut state = GameState::new(settings);
        let mut ended = 0;
        for _ in 0..5 {
            let events = tick(&mut state, &TickInput::default(), 0.5);
            ended += events
                .iter()
                .filter(|e| matches!(e, GameEvent::SessionEnded { .. }))
                .count();
        }
        assert_eq!(ended, 1);
        assert_eq!(state.phase, GamePhase::TimeUp);
        assert_eq!(state.time_ticks, 2);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_boss_fight_and_victory() {
        let settings = Settings {
            total_time: 1.0,
            boss_enabled: true,
            ..Settings::default()
        };
        let mut state = GameState::new(settings);
        let events = tick(&mut state, &TickInput::default(), 1.0);
        assert!(events.contains(&GameEvent::BossSpawned));
        assert_eq!(state.phase, GamePhase::BossFight);
        assert!(state.enemies.is_empty());

        // Still going after time is up
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.phase, GamePhase::BossFight);

        if let Some(boss) = state.boss.as_mut() {
            boss.health = 1.0;
        }
        state
            .projectiles
            .spawn(Vec2::new(600.0, 300.0), Vec2::ZERO, Hue::Blue, 0.0, 2000.0, Owner::Player);
        let events = tick(&mut state, &TickInput::default(), 0.1);
        assert!(events.contains(&GameEvent::BossDefeated));
        assert!(events.contains(&GameEvent::SessionEnded {
            outcome: SessionOutcome::Victory
        }));
        assert_eq!(state.phase, GamePhase::Victory);
        assert_eq!(state.score.total_score, 1250);
    }

    #[test]
    fn test_spawner_feeds_enemies() {
        let mut state = GameState::with_seed(2);
        let mut spawned = 0;
        for _ in 0..4 {
            spawned += tick(&mut state, &TickInput::default(), 0.25)
                .iter()
                .filter(|e| matches!(e, GameEvent::EnemySpawned { .. }))
                .count();
        }
        assert_eq!(spawned, 2);
        assert_eq!(state.enemies.len(), 2);
    }

    #[test]
    fn test_step_leaves_previous_state_alone() {
        let prev = GameState::with_seed(3);
        let (next, events) = step(&prev, SIM_DT, &TickInput::default());
        assert_eq!(prev.time_ticks, 0);
        assert_eq!(next.time_ticks, 1);
        assert!(events.is_empty());
    }

    #[test]
    fn test_restart_resets_session() {
        let mut state = GameState::with_seed(3);
        state.player.health = 1.0;
        state.phase = GamePhase::Defeated;
        let input = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.health, 300.0);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::with_seed(99999);
        let mut state2 = GameState::with_seed(99999);
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };

        for _ in 0..900 {
            let e1 = tick(&mut state1, &input, SIM_DT);
            let e2 = tick(&mut state2, &input, SIM_DT);
            assert_eq!(e1, e2);
        }

        assert_eq!(state1.snapshot(), state2.snapshot());
    }
}
