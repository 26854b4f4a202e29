//! Weapon dispatcher.
//!
//! Each weapon kind maps to a behavior function in the registry. The
//! dispatcher computes effective stats from the player's multipliers, counts
//! down cooldowns and spawns whatever the behavior returns.

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use glam::Vec2;
use hecs::{Entity, World};

use glitchrun_core::components::*;
use glitchrun_core::constants::*;
use glitchrun_core::enums::{AugmentKind, ColorTag, WeaponKind};
use glitchrun_core::player::Player;
use glitchrun_core::types::from_angle;

use crate::pool::Pool;

/// An enemy the weapons may aim at.
#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub entity: Entity,
    pub position: Vec2,
    pub distance_sq: f32,
}

/// Inputs to one volley.
pub struct Volley<'a> {
    pub weapon: &'a Weapon,
    pub stats: WeaponStats,
    pub player: &'a Player,
    /// Nearest first.
    pub targets: &'a [Target],
}

impl Volley<'_> {
    fn augment(&self, augment: AugmentKind) -> bool {
        self.weapon.has_augment(augment)
    }

    /// Unit direction toward the i-th target, cycling, or the facing.
    fn aim(&self, i: usize) -> Vec2 {
        if self.targets.is_empty() {
            return from_angle(self.player.rotation);
        }
        let target = self.targets[i % self.targets.len()];
        let dir = (target.position - self.player.position).normalize_or_zero();
        if dir == Vec2::ZERO {
            from_angle(self.player.rotation)
        } else {
            dir
        }
    }

    fn target(&self, i: usize) -> Option<Entity> {
        (!self.targets.is_empty()).then(|| self.targets[i % self.targets.len()].entity)
    }
}

pub type Shot = (Body, Projectile);
pub type Behavior = fn(&Volley<'_>, &mut Pool<Projectile>) -> Vec<Shot>;

/// Weapon kind → behavior function.
pub struct WeaponRegistry {
    behaviors: HashMap<WeaponKind, Behavior>,
}

impl Default for WeaponRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(WeaponKind::PulseBlaster, pulse_blaster);
        registry.register(WeaponKind::ArcCoil, arc_coil);
        registry.register(WeaponKind::SeekerSwarm, seeker_swarm);
        registry.register(WeaponKind::Recursor, recursor);
        registry.register(WeaponKind::PrismLance, prism_lance);
        registry.register(WeaponKind::HaloDrive, halo_drive);
        registry.register(WeaponKind::ParadoxPendulum, paradox_pendulum);
        registry
    }
}

impl WeaponRegistry {
    pub fn empty() -> Self {
        Self {
            behaviors: HashMap::new(),
        }
    }

    pub fn register(&mut self, kind: WeaponKind, behavior: Behavior) {
        self.behaviors.insert(kind, behavior);
    }

    /// Fire one volley. `alive` is the number of this weapon's projectiles
    /// already in the world. An unregistered kind fires nothing.
    pub fn fire(
        &self,
        weapon: &Weapon,
        player: &Player,
        targets: &[Target],
        alive: u32,
        pool: &mut Pool<Projectile>,
    ) -> Vec<Shot> {
        let Some(behavior) = self.behaviors.get(&weapon.kind) else {
            tracing::debug!(weapon = ?weapon.kind, "no behavior registered");
            return Vec::new();
        };
        let stats = effective_stats(weapon, player, alive);
        if stats.count == 0 {
            return Vec::new();
        }
        behavior(
            &Volley {
                weapon,
                stats,
                player,
                targets,
            },
            pool,
        )
    }
}

/// Weapon stats after the player's multipliers.
pub fn effective_stats(weapon: &Weapon, player: &Player, alive: u32) -> WeaponStats {
    let base = weapon.stats;
    let m = &player.stats;
    let mut damage = base.damage * m.damage;
    if player.overdrive_ticks > 0 {
        damage *= 1.0 + OVERDRIVE_DAMAGE_BONUS;
    }
    let mut count = base.count + m.projectile_count;
    if weapon.augment.is_some_and(|a| a.is_persistent()) {
        count = count.saturating_sub(alive);
    }
    WeaponStats {
        damage,
        count,
        pierce: base.pierce,
        duration: base.duration,
        area: base.area * m.area,
        speed: base.speed * m.speed,
        cooldown: ((base.cooldown as f32 * m.cooldown).round() as u32).max(1),
    }
}

/// Live enemies sorted nearest first. Ties keep world order.
pub fn collect_targets(world: &World, from: Vec2) -> Vec<Target> {
    let mut targets: Vec<Target> = world
        .query::<(&Body, &Enemy)>()
        .iter()
        .filter(|(_, (body, enemy))| !body.marked_for_deletion && !enemy.is_dead())
        .map(|(entity, (body, _))| Target {
            entity,
            position: body.position,
            distance_sq: body.position.distance_squared(from),
        })
        .collect();
    targets.sort_by(|a, b| a.distance_sq.total_cmp(&b.distance_sq));
    targets
}

/// Count down cooldowns and fire every ready weapon.
pub fn run(
    world: &mut World,
    player: &mut Player,
    registry: &WeaponRegistry,
    pool: &mut Pool<Projectile>,
) {
    let targets = collect_targets(world, player.position);
    let mut alive: HashMap<WeaponKind, u32> = HashMap::new();
    for (_entity, (body, projectile)) in world.query::<(&Body, &Projectile)>().iter() {
        if !body.marked_for_deletion {
            *alive.entry(projectile.weapon).or_insert(0) += 1;
        }
    }

    let mut spawned = Vec::new();
    for i in 0..player.weapons.len() {
        let remaining = player.weapons[i].cooldown_remaining.saturating_sub(1);
        player.weapons[i].cooldown_remaining = remaining;
        if remaining > 0 {
            continue;
        }
        let weapon = &player.weapons[i];
        let live = alive.get(&weapon.kind).copied().unwrap_or(0);
        let shots = registry.fire(weapon, player, &targets, live, pool);
        if shots.is_empty() {
            continue;
        }
        let cooldown = effective_stats(weapon, player, live).cooldown;
        player.weapons[i].cooldown_remaining = cooldown;
        spawned.extend(shots);
    }

    for shot in spawned {
        world.spawn(shot);
    }
}

// --- Behaviors ---

fn projectile(
    v: &Volley<'_>,
    pool: &mut Pool<Projectile>,
    damage: f32,
    pierce: u32,
    duration: Option<u32>,
    knockback: f32,
    motion: ProjectileMotion,
) -> Projectile {
    let mut p = pool.acquire();
    p.weapon = v.weapon.kind;
    p.damage = damage;
    p.pierce = pierce;
    p.duration = duration;
    p.knockback = knockback;
    p.motion = motion;
    p.age = 0;
    p
}

fn body(v: &Volley<'_>, position: Vec2, radius: f32, color: ColorTag, velocity: Vec2) -> Body {
    Body::new(position, radius * v.stats.area, color).with_velocity(velocity)
}

fn rotate(dir: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(dir)
}

fn pulse_blaster(v: &Volley<'_>, pool: &mut Pool<Projectile>) -> Vec<Shot> {
    if v.targets.is_empty() {
        return Vec::new();
    }
    let s = v.stats;
    let (pierce, speed) = if v.augment(AugmentKind::Railgun) {
        (PIERCE_UNLIMITED, s.speed * 1.5)
    } else {
        (s.pierce, s.speed)
    };
    let mut dirs: Vec<Vec2> = (0..s.count as usize).map(|i| v.aim(i)).collect();
    if v.augment(AugmentKind::Scattershot) {
        let lead = dirs[0];
        dirs.push(rotate(lead, 0.25));
        dirs.push(rotate(lead, -0.25));
    }
    dirs.into_iter()
        .map(|dir| {
            (
                body(v, v.player.position, 5.0, ColorTag::Cyan, dir * speed),
                projectile(v, pool, s.damage, pierce, Some(s.duration), 2.0, ProjectileMotion::Straight),
            )
        })
        .collect()
}

fn arc_coil(v: &Volley<'_>, pool: &mut Pool<Projectile>) -> Vec<Shot> {
    if v.targets.is_empty() {
        return Vec::new();
    }
    let s = v.stats;
    let mut bounces = CHAIN_BASE_BOUNCES + s.pierce.saturating_sub(1);
    if v.augment(AugmentKind::StormConduit) {
        bounces += 2;
    }
    (0..s.count as usize)
        .map(|i| {
            (
                body(v, v.player.position, 6.0, ColorTag::Violet, v.aim(i) * s.speed),
                projectile(
                    v,
                    pool,
                    s.damage,
                    1,
                    Some(s.duration),
                    0.0,
                    ProjectileMotion::Chain {
                        bounces_left: bounces,
                        visited: Vec::new(),
                    },
                ),
            )
        })
        .collect()
}

fn seeker_swarm(v: &Volley<'_>, pool: &mut Pool<Projectile>) -> Vec<Shot> {
    if v.targets.is_empty() {
        return Vec::new();
    }
    let s = v.stats;
    let hunter = v.augment(AugmentKind::HunterKiller);
    let count = if v.augment(AugmentKind::ClusterPayload) {
        s.count * 2
    } else {
        s.count
    };
    let (damage, turn_rate) = if hunter {
        (s.damage * 1.25, HOMING_TURN_RATE * 2.0)
    } else {
        (s.damage, HOMING_TURN_RATE)
    };
    (0..count as usize)
        .map(|i| {
            // Launch fanned out; steering brings them around.
            let fan = (i as f32 - (count as f32 - 1.0) / 2.0) * 0.4;
            let dir = rotate(v.aim(i), fan);
            (
                body(v, v.player.position, 5.0, ColorTag::Orange, dir * s.speed),
                projectile(
                    v,
                    pool,
                    damage,
                    s.pierce,
                    Some(s.duration),
                    1.0,
                    ProjectileMotion::Homing {
                        target: v.target(i),
                        turn_rate,
                    },
                ),
            )
        })
        .collect()
}

fn recursor(v: &Volley<'_>, pool: &mut Pool<Projectile>) -> Vec<Shot> {
    if v.targets.is_empty() {
        return Vec::new();
    }
    let s = v.stats;
    let mut dirs: Vec<Vec2> = (0..s.count as usize).map(|i| v.aim(i)).collect();
    if v.augment(AugmentKind::Twinrang) {
        let mirrored: Vec<Vec2> = dirs.iter().map(|d| -*d).collect();
        dirs.extend(mirrored);
    }
    dirs.into_iter()
        .map(|dir| {
            (
                body(v, v.player.position, 10.0, ColorTag::Yellow, dir * s.speed),
                projectile(
                    v,
                    pool,
                    s.damage,
                    s.pierce,
                    Some(s.duration),
                    4.0,
                    ProjectileMotion::Boomerang {
                        phase: Default::default(),
                        turn_after: s.duration / 2,
                    },
                ),
            )
        })
        .collect()
}

fn prism_lance(v: &Volley<'_>, pool: &mut Pool<Projectile>) -> Vec<Shot> {
    if v.targets.is_empty() {
        return Vec::new();
    }
    let s = v.stats;
    let overcharge = v.augment(AugmentKind::Overcharge);
    let (damage, length) = if overcharge {
        (s.damage * 1.5, 300.0 * s.area * 1.3)
    } else {
        (s.damage, 300.0 * s.area)
    };
    let mut angles: Vec<f32> = (0..s.count as usize)
        .map(|i| {
            let dir = v.aim(i);
            dir.y.atan2(dir.x)
        })
        .collect();
    if v.augment(AugmentKind::Refractor) {
        let lead = angles[0];
        angles.push(lead + 0.35);
        angles.push(lead - 0.35);
    }
    angles
        .into_iter()
        .map(|angle| {
            (
                Body::new(v.player.position, BEAM_HALF_WIDTH, ColorTag::White),
                projectile(
                    v,
                    pool,
                    damage,
                    s.pierce,
                    Some(s.duration),
                    0.0,
                    ProjectileMotion::Beam { length, angle },
                ),
            )
        })
        .collect()
}

fn halo_drive(v: &Volley<'_>, pool: &mut Pool<Projectile>) -> Vec<Shot> {
    let s = v.stats;
    let supernova = v.augment(AugmentKind::Supernova);
    let (radius, knockback) = if supernova { (1.5, 14.0) } else { (1.0, 3.0) };
    let duration = if v.augment(AugmentKind::EternalOrbit) {
        None
    } else {
        Some(s.duration)
    };
    let orbit_radius = 70.0 * s.area * radius;
    (0..s.count)
        .map(|i| {
            let angle = i as f32 * TAU / s.count as f32;
            let position = v.player.position + from_angle(angle) * orbit_radius;
            (
                body(v, position, 9.0 * radius, ColorTag::Cyan, Vec2::ZERO),
                projectile(
                    v,
                    pool,
                    s.damage,
                    PIERCE_UNLIMITED,
                    duration,
                    knockback,
                    ProjectileMotion::Orbit {
                        angle,
                        radius: orbit_radius,
                        angular_speed: s.speed,
                    },
                ),
            )
        })
        .collect()
}

fn paradox_pendulum(v: &Volley<'_>, pool: &mut Pool<Projectile>) -> Vec<Shot> {
    let s = v.stats;
    let lag = pendulum_lag(v.weapon);
    let anchor = v.player.past_position(lag);
    // Singularity blades pull instead of push.
    let knockback = if v.augment(AugmentKind::Singularity) { -6.0 } else { 6.0 };
    let length = 110.0 * s.area;
    (0..s.count)
        .map(|i| {
            let phase = i as f32 * PI / s.count as f32;
            let position = anchor + from_angle(pendulum_angle(1.2, phase)) * length;
            (
                body(v, position, 12.0, ColorTag::Magenta, Vec2::ZERO),
                projectile(
                    v,
                    pool,
                    s.damage,
                    PIERCE_UNLIMITED,
                    Some(s.duration),
                    knockback,
                    ProjectileMotion::Pendulum {
                        anchor,
                        phase,
                        amplitude: 1.2,
                        length,
                        angular_speed: s.speed,
                    },
                ),
            )
        })
        .collect()
}

/// History samples a pendulum's anchor trails the player by.
pub fn pendulum_lag(weapon: &Weapon) -> usize {
    if weapon.has_augment(AugmentKind::TimeLoop) {
        PENDULUM_HISTORY_LAG * 2
    } else {
        PENDULUM_HISTORY_LAG
    }
}

/// Swing angle for a pendulum phase; hangs straight down (-y) at rest.
pub fn pendulum_angle(amplitude: f32, phase: f32) -> f32 {
    amplitude * phase.sin() - std::f32::consts::FRAC_PI_2
}
