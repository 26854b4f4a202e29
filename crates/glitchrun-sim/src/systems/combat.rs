//! Collision resolution: projectile hits, deaths, contact damage and twin
//! link beams.

use std::collections::HashMap;

use glam::Vec2;
use hecs::{Entity, World};

use glitchrun_core::components::*;
use glitchrun_core::constants::*;
use glitchrun_core::enums::{AugmentKind, EnemyKind};
use glitchrun_core::events::GameEvent;
use glitchrun_core::player::Player;
use glitchrun_core::types::{circles_overlap, segment_overlaps_circle};

use super::chain;
use super::projectiles::beam_end;
use crate::pool::Pool;

const SINGULARITY_SLOW_TICKS: u32 = 60;

/// An enemy that died this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub entity: Entity,
    pub kind: EnemyKind,
    pub position: Vec2,
    pub xp_value: u32,
    pub is_boss: bool,
    pub is_mission_target: bool,
}

struct Hit {
    enemy: Entity,
    damage: f32,
    push: Vec2,
    augment: Option<AugmentKind>,
}

/// Resolve every collision for this tick. Returns the enemies that died.
pub fn run(
    world: &mut World,
    player: &mut Player,
    pool: &mut Pool<Projectile>,
    events: &mut Vec<GameEvent>,
) -> Vec<Kill> {
    resolve_projectiles(world, player, pool);
    let kills = resolve_deaths(world, player, events);
    contact_damage(world, player, events);
    twin_links(world, player, events);
    kills
}

fn live_enemies(world: &World) -> Vec<(Entity, Vec2, f32)> {
    world
        .query::<(&Body, &Enemy)>()
        .iter()
        .filter(|(_, (body, enemy))| !body.marked_for_deletion && !enemy.is_dead())
        .map(|(entity, (body, _))| (entity, body.position, body.radius))
        .collect()
}

fn resolve_projectiles(world: &mut World, player: &Player, pool: &mut Pool<Projectile>) {
    let enemies = live_enemies(world);
    if enemies.is_empty() {
        return;
    }

    let mut hits = Vec::new();
    // (bolt, enemy struck, where it was struck)
    let mut chain_sources: Vec<(Entity, Entity, Vec2)> = Vec::new();

    for (entity, (body, projectile)) in world.query_mut::<(&mut Body, &mut Projectile)>() {
        if body.marked_for_deletion {
            continue;
        }
        let beam = beam_end(body, projectile);
        let augment = player.weapon(projectile.weapon).and_then(|w| w.augment);

        for &(enemy, position, radius) in &enemies {
            let touching = match beam {
                Some(end) => segment_overlaps_circle(body.position, end, BEAM_HALF_WIDTH, position, radius),
                None => circles_overlap(body.position, body.radius, position, radius),
            };
            if !touching {
                continue;
            }
            if let ProjectileMotion::Chain { visited, .. } = &projectile.motion {
                if visited.contains(&enemy) {
                    continue;
                }
            }
            if !projectile.register_hit(enemy) {
                continue;
            }

            let direction = if body.velocity != Vec2::ZERO {
                body.velocity.normalize_or_zero()
            } else {
                (position - body.position).normalize_or_zero()
            };
            hits.push(Hit {
                enemy,
                damage: projectile.damage,
                push: direction * projectile.knockback,
                augment,
            });
            if matches!(projectile.motion, ProjectileMotion::Chain { .. }) {
                chain_sources.push((entity, enemy, position));
            }
            if projectile.is_spent() {
                body.marked_for_deletion = true;
                break;
            }
        }
    }

    for hit in hits {
        let Ok((body, enemy)) = world.query_one_mut::<(&mut Body, &mut Enemy)>(hit.enemy) else {
            continue;
        };
        enemy.health -= hit.damage;
        let status = &mut enemy.status;
        match hit.augment {
            Some(AugmentKind::Overload) => {
                status.stun_ticks = status.stun_ticks.max(STUN_TICKS_ON_OVERLOAD);
            }
            Some(AugmentKind::Serrated) => {
                status.bleed_ticks = BLEED_TICKS;
                status.bleed_damage = status.bleed_damage.max(hit.damage * BLEED_DAMAGE_FRACTION);
            }
            Some(AugmentKind::Singularity) => {
                status.slow_ticks = status.slow_ticks.max(SINGULARITY_SLOW_TICKS);
            }
            _ => {}
        }
        if !enemy.is_boss {
            body.position += hit.push;
        }
    }

    if chain_sources.is_empty() {
        return;
    }
    let live: Vec<(Entity, Vec2)> = live_enemies(world)
        .into_iter()
        .map(|(entity, position, _)| (entity, position))
        .collect();
    for (source, hit, hit_position) in chain_sources {
        let bolt = match world.query_one_mut::<(&Body, &Projectile)>(source) {
            Ok((body, projectile)) => chain::propagate(&live, hit, hit_position, body, projectile, pool),
            Err(_) => None,
        };
        if let Some(bolt) = bolt {
            world.spawn(bolt);
        }
    }
}

fn resolve_deaths(world: &mut World, player: &mut Player, events: &mut Vec<GameEvent>) -> Vec<Kill> {
    let mut kills = Vec::new();
    for (entity, (body, enemy)) in world.query_mut::<(&mut Body, &Enemy)>() {
        if body.marked_for_deletion || !enemy.is_dead() {
            continue;
        }
        body.marked_for_deletion = true;
        kills.push(Kill {
            entity,
            kind: enemy.kind,
            position: body.position,
            xp_value: enemy.xp_value,
            is_boss: enemy.is_boss,
            is_mission_target: enemy.is_mission_target,
        });
    }
    for kill in &kills {
        player.kills += 1;
        events.push(GameEvent::EnemyKilled {
            kind: kill.kind,
            x: kill.position.x,
            y: kill.position.y,
        });
    }
    kills
}

fn hurt(player: &mut Player, raw: f32, events: &mut Vec<GameEvent>) {
    let dealt = player.take_damage(raw);
    if dealt > 0.0 {
        events.push(GameEvent::PlayerDamaged {
            amount: dealt,
            remaining: player.health,
        });
    }
}

fn contact_damage(world: &World, player: &mut Player, events: &mut Vec<GameEvent>) {
    for (_entity, (body, enemy)) in world.query::<(&Body, &Enemy)>().iter() {
        if body.marked_for_deletion {
            continue;
        }
        if circles_overlap(body.position, body.radius, player.position, player.radius) {
            hurt(player, enemy.damage, events);
        }
    }
}

fn twin_links(world: &World, player: &mut Player, events: &mut Vec<GameEvent>) {
    let mut nodes: HashMap<Entity, Vec2> = HashMap::new();
    let mut links: Vec<(Entity, Vec2, Entity, f32)> = Vec::new();
    for (entity, (body, enemy)) in world.query::<(&Body, &Enemy)>().iter() {
        if body.marked_for_deletion {
            continue;
        }
        if let EnemyBehavior::TwinNode {
            partner: Some(partner),
            ..
        } = enemy.behavior
        {
            nodes.insert(entity, body.position);
            links.push((entity, body.position, partner, enemy.damage));
        }
    }
    for (node, position, partner, damage) in links {
        // Each pair once, from its lower id.
        if node.to_bits() > partner.to_bits() {
            continue;
        }
        let Some(&partner_position) = nodes.get(&partner) else {
            continue;
        };
        if segment_overlaps_circle(
            position,
            partner_position,
            TWIN_LINK_HALF_WIDTH,
            player.position,
            player.radius,
        ) {
            hurt(player, damage * TWIN_LINK_DAMAGE_FACTOR, events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawner::Candidate;
    use glitchrun_core::enums::{ColorTag, WeaponKind};

    fn enemy_at(world: &mut World, kind: EnemyKind, position: Vec2) -> Entity {
        let c = Candidate::new(kind, 1, position, EnemyBehavior::Chaser);
        world.spawn((c.body, c.enemy))
    }

    fn bullet(world: &mut World, position: Vec2, damage: f32, pierce: u32) -> Entity {
        world.spawn((
            Body::new(position, 5.0, ColorTag::Cyan).with_velocity(Vec2::new(1.0, 0.0)),
            Projectile {
                damage,
                pierce,
                duration: Some(60),
                knockback: 2.0,
                ..Default::default()
            },
        ))
    }

    fn far_player() -> Player {
        let mut player = Player::new();
        player.position = Vec2::new(5000.0, 5000.0);
        player
    }

    #[test]
    fn projectile_damages_once_and_spends_pierce() {
        let mut world = World::new();
        let mut player = far_player();
        let mut pool = Pool::default();
        let mut events = Vec::new();
        let enemy = enemy_at(&mut world, EnemyKind::Brute, Vec2::ZERO);
        let shot = bullet(&mut world, Vec2::ZERO, 10.0, 2);

        run(&mut world, &mut player, &mut pool, &mut events);
        run(&mut world, &mut player, &mut pool, &mut events);

        assert_eq!(world.get::<&Enemy>(enemy).unwrap().health, 50.0);
        let projectile = world.get::<&Projectile>(shot).unwrap();
        assert_eq!(projectile.hit_list, vec![enemy]);
        assert_eq!(projectile.pierce, 1);
        // Knocked back along the projectile's heading.
        assert_eq!(world.get::<&Body>(enemy).unwrap().position, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn chain_hit_draws_only_the_follow_on_bolt_from_the_pool() {
        let mut world = World::new();
        let mut player = far_player();
        let mut pool = Pool::default();
        let mut events = Vec::new();
        enemy_at(&mut world, EnemyKind::Brute, Vec2::ZERO);
        enemy_at(&mut world, EnemyKind::Brute, Vec2::new(80.0, 0.0));
        world.spawn((
            Body::new(Vec2::ZERO, 5.0, ColorTag::Cyan).with_velocity(Vec2::new(4.0, 0.0)),
            Projectile {
                weapon: WeaponKind::ArcCoil,
                damage: 10.0,
                pierce: 1,
                duration: Some(30),
                motion: ProjectileMotion::Chain {
                    bounces_left: 1,
                    visited: Vec::new(),
                },
                ..Default::default()
            },
        ));

        run(&mut world, &mut player, &mut pool, &mut events);

        assert_eq!(pool.stats(), (1, 0));
        assert_eq!(pool.available(), 0);
        assert_eq!(world.query::<&Projectile>().iter().count(), 2);
    }

    #[test]
    fn lethal_hit_is_reported_once() {
        let mut world = World::new();
        let mut player = far_player();
        let mut pool = Pool::default();
        let mut events = Vec::new();
        let enemy = enemy_at(&mut world, EnemyKind::Swarmer, Vec2::ZERO);
        bullet(&mut world, Vec2::ZERO, 50.0, 1);

        let kills = run(&mut world, &mut player, &mut pool, &mut events);
        assert_eq!(kills.len(), 1);
        assert_eq!(kills[0].entity, enemy);
        assert_eq!(kills[0].xp_value, 1);
        assert_eq!(player.kills, 1);
        assert!(world.get::<&Body>(enemy).unwrap().marked_for_deletion);
        assert!(run(&mut world, &mut player, &mut pool, &mut events).is_empty());
    }

    #[test]
    fn overload_stuns_and_serrated_bleeds() {
        let mut world = World::new();
        let mut player = far_player();
        let mut coil = Weapon::new(WeaponKind::ArcCoil, glitchrun_campaign::catalog::base_stats(WeaponKind::ArcCoil));
        coil.augment = Some(AugmentKind::Overload);
        player.weapons.push(coil);
        let mut pool = Pool::default();
        let mut events = Vec::new();
        let enemy = enemy_at(&mut world, EnemyKind::Brute, Vec2::ZERO);
        world.spawn((
            Body::new(Vec2::ZERO, 5.0, ColorTag::Violet),
            Projectile {
                weapon: WeaponKind::ArcCoil,
                damage: 5.0,
                duration: Some(10),
                motion: ProjectileMotion::Chain {
                    bounces_left: 0,
                    visited: Vec::new(),
                },
                ..Default::default()
            },
        ));
        run(&mut world, &mut player, &mut pool, &mut events);
        let status = world.get::<&Enemy>(enemy).unwrap().status;
        assert_eq!(status.stun_ticks, STUN_TICKS_ON_OVERLOAD);
        assert_eq!(status.bleed_ticks, 0);
    }

    #[test]
    fn contact_damage_respects_invulnerability() {
        let mut world = World::new();
        let mut player = Player::new();
        let mut pool = Pool::default();
        let mut events = Vec::new();
        enemy_at(&mut world, EnemyKind::Brute, Vec2::new(5.0, 0.0));
        enemy_at(&mut world, EnemyKind::Swarmer, Vec2::new(-5.0, 0.0));
        run(&mut world, &mut player, &mut pool, &mut events);
        assert_eq!(player.health, PLAYER_BASE_HEALTH - 14.0);
        let damaged = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerDamaged { .. }))
            .count();
        assert_eq!(damaged, 1);
    }

    #[test]
    fn twin_link_beam_hurts_player_between_nodes() {
        let mut world = World::new();
        let mut player = Player::new();
        let mut pool = Pool::default();
        let mut events = Vec::new();
        let a = enemy_at(&mut world, EnemyKind::TwinNode, Vec2::new(-200.0, 0.0));
        let b = enemy_at(&mut world, EnemyKind::TwinNode, Vec2::new(200.0, 0.0));
        world.get::<&mut Enemy>(a).unwrap().behavior = EnemyBehavior::TwinNode {
            partner: Some(b),
            enraged: false,
        };
        world.get::<&mut Enemy>(b).unwrap().behavior = EnemyBehavior::TwinNode {
            partner: Some(a),
            enraged: false,
        };
        run(&mut world, &mut player, &mut pool, &mut events);
        assert_eq!(player.health, PLAYER_BASE_HEALTH - 8.0 * TWIN_LINK_DAMAGE_FACTOR);
    }
}
