//! Chain lightning propagation.

use glam::Vec2;
use hecs::Entity;

use glitchrun_core::components::{Body, Projectile, ProjectileMotion};
use glitchrun_core::constants::{CHAIN_DAMAGE_FALLOFF, CHAIN_RANGE};

use crate::pool::Pool;

/// Spare ticks a follow-on bolt gets beyond its straight-line travel time.
const BOLT_SLACK_TICKS: u32 = 4;

/// After `source` struck `hit`, spawn the next bolt toward the nearest live
/// enemy it has not visited. `live` lists live, unflagged enemies; the first
/// listed wins a distance tie. Returns None when the bounce budget is spent or
/// nothing is in range.
pub fn propagate(
    live: &[(Entity, Vec2)],
    hit: Entity,
    hit_position: Vec2,
    source_body: &Body,
    source: &Projectile,
    pool: &mut Pool<Projectile>,
) -> Option<(Body, Projectile)> {
    let ProjectileMotion::Chain {
        bounces_left,
        visited,
    } = &source.motion
    else {
        return None;
    };
    if *bounces_left == 0 {
        return None;
    }

    let mut next_visited = Vec::with_capacity(visited.len() + 1);
    next_visited.extend_from_slice(visited);
    if !next_visited.contains(&hit) {
        next_visited.push(hit);
    }

    let range_sq = CHAIN_RANGE * CHAIN_RANGE;
    let mut best: Option<(Entity, Vec2, f32)> = None;
    for &(entity, position) in live {
        if next_visited.contains(&entity) {
            continue;
        }
        let d2 = position.distance_squared(hit_position);
        if d2 >= range_sq {
            continue;
        }
        if best.map_or(true, |(_, _, best_d2)| d2 < best_d2) {
            best = Some((entity, position, d2));
        }
    }
    let (_target, target_position, d2) = best?;

    let speed = source_body.velocity.length().max(1.0);
    let direction = (target_position - hit_position).normalize_or_zero();

    let mut bolt = pool.acquire();
    bolt.weapon = source.weapon;
    bolt.damage = source.damage * CHAIN_DAMAGE_FALLOFF;
    bolt.pierce = 1;
    bolt.duration = Some((d2.sqrt() / speed).ceil() as u32 + BOLT_SLACK_TICKS);
    bolt.knockback = source.knockback;
    bolt.age = 0;
    bolt.motion = ProjectileMotion::Chain {
        bounces_left: bounces_left - 1,
        visited: next_visited,
    };

    let body = Body::new(hit_position, source_body.radius, source_body.color)
        .with_velocity(direction * speed);
    Some((body, bolt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use glitchrun_core::enums::{ColorTag, WeaponKind};
    use hecs::World;

    fn bolt(bounces_left: u32, visited: Vec<Entity>) -> (Body, Projectile) {
        (
            Body::new(Vec2::ZERO, 6.0, ColorTag::Violet).with_velocity(Vec2::new(14.0, 0.0)),
            Projectile {
                weapon: WeaponKind::ArcCoil,
                damage: 10.0,
                duration: Some(40),
                pierce: 1,
                motion: ProjectileMotion::Chain {
                    bounces_left,
                    visited,
                },
                ..Default::default()
            },
        )
    }

    #[test]
    fn jumps_to_nearest_unvisited_with_falloff() {
        let mut world = World::new();
        let a = world.spawn(());
        let b = world.spawn(());
        let c = world.spawn(());
        let live = [
            (a, Vec2::ZERO),
            (b, Vec2::new(150.0, 0.0)),
            (c, Vec2::new(100.0, 0.0)),
        ];
        let (body, source) = bolt(2, Vec::new());
        let mut pool = Pool::default();
        let (next_body, next) = propagate(&live, a, Vec2::ZERO, &body, &source, &mut pool).unwrap();
        assert!((next.damage - 8.0).abs() < 1e-5);
        let ProjectileMotion::Chain {
            bounces_left,
            visited,
        } = &next.motion
        else {
            panic!("expected chain bolt");
        };
        assert_eq!(*bounces_left, 1);
        assert_eq!(visited, &vec![a]);
        assert!(next_body.velocity.x > 0.0);
        assert_eq!(next_body.position, Vec2::ZERO);
    }

    #[test]
    fn never_revisits_and_respects_range() {
        let mut world = World::new();
        let a = world.spawn(());
        let b = world.spawn(());
        let far = world.spawn(());
        let live = [
            (a, Vec2::ZERO),
            (b, Vec2::new(50.0, 0.0)),
            (far, Vec2::new(50.0 + CHAIN_RANGE, 0.0)),
        ];
        let (body, source) = bolt(3, vec![a]);
        let mut pool = Pool::default();
        assert!(propagate(&live, b, Vec2::new(50.0, 0.0), &body, &source, &mut pool).is_none());
    }

    #[test]
    fn exhausted_budget_spawns_nothing() {
        let mut world = World::new();
        let a = world.spawn(());
        let b = world.spawn(());
        let live = [(a, Vec2::ZERO), (b, Vec2::new(10.0, 0.0))];
        let (body, source) = bolt(0, Vec::new());
        let mut pool = Pool::default();
        assert!(propagate(&live, a, Vec2::ZERO, &body, &source, &mut pool).is_none());
    }

    #[test]
    fn first_listed_wins_ties() {
        let mut world = World::new();
        let a = world.spawn(());
        let left = world.spawn(());
        let right = world.spawn(());
        let live = [
            (left, Vec2::new(-60.0, 0.0)),
            (right, Vec2::new(60.0, 0.0)),
            (a, Vec2::ZERO),
        ];
        let (body, source) = bolt(1, Vec::new());
        let mut pool = Pool::default();
        let (next_body, _) = propagate(&live, a, Vec2::ZERO, &body, &source, &mut pool).unwrap();
        assert!(next_body.velocity.x < 0.0);
    }
}
