//! Player- and enemy-fired projectiles
//!
//! The set owns every projectile outright. Other entities only ever see a
//! projectile id, and removal by a stale id is a silent no-op.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::color::Hue;
use crate::consts::PROJECTILE_BOUND;

pub type ProjectileId = u32;

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// A request to fire one projectile (emitted by patterns, bursts and the boss)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub origin: Vec2,
    /// Direction of travel; normalized when spawned
    pub direction: Vec2,
    pub hue: Hue,
    pub speed: f32,
}

impl Shot {
    pub fn new(origin: Vec2, direction: Vec2, hue: Hue, speed: f32) -> Self {
        Self {
            origin,
            direction,
            hue,
            speed,
        }
    }
}

/// A live projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: ProjectileId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub hue: Hue,
    pub radius: f32,
    pub owner: Owner,
}

impl Projectile {
    /// Outside the ±bound square around the origin
    #[inline]
    pub fn out_of_bounds(&self) -> bool {
        self.pos.x.abs() > PROJECTILE_BOUND || self.pos.y.abs() > PROJECTILE_BOUND
    }
}

/// All projectiles in flight (sorted by id for determinism)
#[derive(Debug, Clone, Default)]
pub struct ProjectileSet {
    projectiles: Vec<Projectile>,
    next_id: ProjectileId,
}

impl ProjectileSet {
    pub fn new() -> Self {
        Self {
            projectiles: Vec::new(),
            next_id: 1,
        }
    }

    /// Fire a projectile; the direction is normalized (zero stays zero)
    pub fn spawn(
        &mut self,
        pos: Vec2,
        direction: Vec2,
        hue: Hue,
        speed: f32,
        radius: f32,
        owner: Owner,
    ) -> ProjectileId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.projectiles.push(Projectile {
            id,
            pos,
            vel: direction.normalize_or_zero() * speed,
            hue,
            radius,
            owner,
        });
        id
    }

    pub fn spawn_shot(&mut self, shot: &Shot, radius: f32, owner: Owner) -> ProjectileId {
        self.spawn(shot.origin, shot.direction, shot.hue, shot.speed, radius, owner)
    }

    /// Integrate positions and drop anything that left the arena bounds.
    /// Returns how many projectiles expired.
    pub fn tick(&mut self, dt: f32) -> usize {
        for p in &mut self.projectiles {
            p.pos += p.vel * dt;
        }
        let before = self.projectiles.len();
        self.projectiles.retain(|p| !p.out_of_bounds());
        before - self.projectiles.len()
    }

    /// Remove one projectile. Unknown ids are ignored.
    pub fn remove(&mut self, id: ProjectileId) -> bool {
        match self.projectiles.iter().position(|p| p.id == id) {
            Some(idx) => {
                self.projectiles.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Remove a batch collected during a collision pass
    pub fn remove_all(&mut self, ids: &[ProjectileId]) {
        if ids.is_empty() {
            return;
        }
        self.projectiles.retain(|p| !ids.contains(&p.id));
    }

    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    pub fn iter_owned_by(&self, owner: Owner) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter().filter(move |p| p.owner == owner)
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    pub fn clear(&mut self) {
        self.projectiles.clear();
    }
}
