//! ECS components for hecs entities, plus the weapon model the player owns.
//!
//! Components are plain data. Game logic lives in systems, not components.

use glam::Vec2;
use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::constants::PIERCE_UNLIMITED;
use crate::enums::*;

/// Shared base of every simulated object.
///
/// `marked_for_deletion` may be set by any stage; the entity stays in the
/// world, flagged, until the end-of-tick sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub color: ColorTag,
    pub marked_for_deletion: bool,
}

impl Body {
    pub fn new(position: Vec2, radius: f32, color: ColorTag) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius,
            color,
            marked_for_deletion: false,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }
}

/// Timed status effects on an enemy. All fields count down once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusTimers {
    pub stun_ticks: u32,
    pub slow_ticks: u32,
    pub bleed_ticks: u32,
    /// Damage dealt per tick while bleeding.
    pub bleed_damage: f32,
}

/// Kind-specific behavior state. Each variant holds only what that kind needs.
#[derive(Debug, Clone, PartialEq)]
pub enum EnemyBehavior {
    Chaser,
    TwinNode {
        partner: Option<Entity>,
        enraged: bool,
    },
    RingSegment {
        center: Vec2,
        angle: f32,
        orbit_radius: f32,
    },
    Squad {
        role: SquadRole,
        squad_id: u32,
    },
    Boss {
        boss_id: &'static str,
        summon_cooldown: u32,
    },
    /// Elite objective target. Circles the player at a distance.
    MissionTarget { orbit_angle: f32 },
}

/// Hostile entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub health: f32,
    pub max_health: f32,
    /// Contact damage per hit.
    pub damage: f32,
    pub speed: f32,
    pub xp_value: u32,
    pub behavior: EnemyBehavior,
    pub status: StatusTimers,
    pub is_boss: bool,
    /// Mission targets are never culled.
    pub is_mission_target: bool,
}

impl Enemy {
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

/// Specialized projectile motion.
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectileMotion {
    Straight,
    Homing {
        target: Option<Entity>,
        turn_rate: f32,
    },
    Chain {
        bounces_left: u32,
        /// Enemies already struck by this chain, origin first.
        visited: Vec<Entity>,
    },
    Boomerang {
        phase: BoomerangPhase,
        /// Age in ticks at which the projectile turns back.
        turn_after: u32,
    },
    Beam {
        length: f32,
        angle: f32,
    },
    Orbit {
        angle: f32,
        radius: f32,
        angular_speed: f32,
    },
    /// Swings around a point the player occupied in the past.
    Pendulum {
        anchor: Vec2,
        phase: f32,
        amplitude: f32,
        length: f32,
        angular_speed: f32,
    },
}

impl Default for ProjectileMotion {
    fn default() -> Self {
        Self::Straight
    }
}

/// Player-owned projectile. Recycled through the projectile pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub weapon: WeaponKind,
    pub damage: f32,
    /// Remaining lifetime in ticks. `None` lives until its pierce runs out.
    pub duration: Option<u32>,
    /// Remaining hits. `PIERCE_UNLIMITED` is never consumed.
    pub pierce: u32,
    pub knockback: f32,
    /// Enemies this projectile has already damaged. Never holds duplicates.
    pub hit_list: Vec<Entity>,
    pub motion: ProjectileMotion,
    /// Ticks since spawn.
    pub age: u32,
}

impl Default for Projectile {
    fn default() -> Self {
        Self {
            weapon: WeaponKind::PulseBlaster,
            damage: 0.0,
            duration: Some(0),
            pierce: 1,
            knockback: 0.0,
            hit_list: Vec::new(),
            motion: ProjectileMotion::Straight,
            age: 0,
        }
    }
}

impl Projectile {
    /// Record a hit. Returns false if the enemy was already struck.
    pub fn register_hit(&mut self, enemy: Entity) -> bool {
        if self.hit_list.contains(&enemy) {
            return false;
        }
        self.hit_list.push(enemy);
        if self.pierce != PIERCE_UNLIMITED {
            self.pierce = self.pierce.saturating_sub(1);
        }
        true
    }

    pub fn is_spent(&self) -> bool {
        self.pierce == 0 || self.duration == Some(0)
    }
}

/// Content of a supply drop, rolled when the drop is created.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SupplyContent {
    Heal(f32),
    Currency(u32),
    XpBurst(u32),
    TemporaryWeapon(WeaponKind),
    Overdrive(u32),
}

/// What a pickup grants on collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PickupKind {
    Xp,
    Currency,
    Health,
    DataShard,
    SupplyDrop(SupplyContent),
}

/// Collectible item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
    pub value: u32,
    /// Set once the player's magnet reaches the pickup; it then homes in.
    pub magnetized: bool,
}

/// Weapon stat block, both for base tables and live weapons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub damage: f32,
    pub count: u32,
    pub pierce: u32,
    /// Projectile lifetime in ticks.
    pub duration: u32,
    pub area: f32,
    pub speed: f32,
    /// Ticks between volleys.
    pub cooldown: u32,
}

/// A weapon owned by the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub stats: WeaponStats,
    pub level: u32,
    pub cooldown_remaining: u32,
    pub augment: Option<AugmentKind>,
    /// Tick at which a temporary weapon is removed.
    pub expires_at_tick: Option<u64>,
}

impl Weapon {
    pub fn new(kind: WeaponKind, stats: WeaponStats) -> Self {
        Self {
            kind,
            stats,
            level: 1,
            cooldown_remaining: 0,
            augment: None,
            expires_at_tick: None,
        }
    }

    pub fn has_augment(&self, augment: AugmentKind) -> bool {
        self.augment == Some(augment)
    }
}
