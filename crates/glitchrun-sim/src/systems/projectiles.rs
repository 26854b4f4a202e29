//! Projectile lifecycle: aging, specialized motion, expiry.

use std::collections::HashMap;

use glam::Vec2;
use hecs::{Entity, World};

use glitchrun_core::components::*;
use glitchrun_core::constants::ORBIT_REHIT_TICKS;
use glitchrun_core::enums::{BoomerangPhase, WeaponKind};
use glitchrun_core::player::Player;
use glitchrun_core::types::from_angle;

use super::movement;
use super::weapons::{pendulum_angle, pendulum_lag};

/// Advance every live projectile by one tick.
pub fn run(world: &mut World, player: &Player) {
    let enemies: HashMap<Entity, Vec2> = world
        .query::<(&Body, &Enemy)>()
        .iter()
        .filter(|(_, (body, enemy))| !body.marked_for_deletion && !enemy.is_dead())
        .map(|(entity, (body, _))| (entity, body.position))
        .collect();
    let lag = player
        .weapon(WeaponKind::ParadoxPendulum)
        .map(pendulum_lag)
        .unwrap_or(glitchrun_core::constants::PENDULUM_HISTORY_LAG);
    let anchor_now = player.past_position(lag);

    for (_entity, (body, projectile)) in world.query_mut::<(&mut Body, &mut Projectile)>() {
        if body.marked_for_deletion {
            continue;
        }
        projectile.age += 1;
        let age = projectile.age;

        match &mut projectile.motion {
            ProjectileMotion::Straight | ProjectileMotion::Chain { .. } => {}
            ProjectileMotion::Homing { target, turn_rate } => {
                match target.and_then(|t| enemies.get(&t)) {
                    Some(goal) => {
                        let speed = body.velocity.length();
                        let desired = (*goal - body.position).normalize_or_zero() * speed;
                        let steered = body.velocity.lerp(desired, *turn_rate);
                        body.velocity = steered.normalize_or_zero() * speed;
                    }
                    None => *target = None,
                }
            }
            ProjectileMotion::Boomerang { phase, turn_after } => {
                if *phase == BoomerangPhase::Outbound && age >= *turn_after {
                    *phase = BoomerangPhase::Returning;
                }
                if *phase == BoomerangPhase::Returning {
                    let to_player = player.position - body.position;
                    let speed = body.velocity.length().max(1.0);
                    if to_player.length() <= player.radius + speed {
                        // Caught.
                        body.marked_for_deletion = true;
                        continue;
                    }
                    body.velocity = to_player.normalize_or_zero() * speed;
                }
            }
            ProjectileMotion::Beam { .. } => {
                body.position = player.position;
            }
            ProjectileMotion::Orbit {
                angle,
                radius,
                angular_speed,
            } => {
                *angle += *angular_speed;
                body.position = player.position + from_angle(*angle) * *radius;
            }
            ProjectileMotion::Pendulum {
                anchor,
                phase,
                amplitude,
                length,
                angular_speed,
            } => {
                *anchor = anchor_now;
                *phase += *angular_speed;
                body.position = *anchor + from_angle(pendulum_angle(*amplitude, *phase)) * *length;
            }
        }

        if matches!(
            projectile.motion,
            ProjectileMotion::Orbit { .. } | ProjectileMotion::Pendulum { .. }
        ) && age % ORBIT_REHIT_TICKS == 0
        {
            projectile.hit_list.clear();
        }

        if let Some(duration) = &mut projectile.duration {
            *duration = duration.saturating_sub(1);
        }
        if projectile.is_spent() {
            body.marked_for_deletion = true;
        }
    }

    movement::run::<Projectile>(world);
}

/// End point of a beam projectile.
pub fn beam_end(body: &Body, projectile: &Projectile) -> Option<Vec2> {
    match projectile.motion {
        ProjectileMotion::Beam { length, angle } => Some(body.position + from_angle(angle) * length),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glitchrun_core::constants::PIERCE_UNLIMITED;
    use glitchrun_core::enums::{ColorTag, EnemyKind};

    fn shot(world: &mut World, body: Body, motion: ProjectileMotion, duration: Option<u32>) -> Entity {
        world.spawn((
            body,
            Projectile {
                duration,
                pierce: PIERCE_UNLIMITED,
                motion,
                ..Default::default()
            },
        ))
    }

    fn body_of(world: &World, e: Entity) -> Body {
        *world.get::<&Body>(e).unwrap()
    }

    #[test]
    fn straight_moves_and_expires() {
        let mut world = World::new();
        let player = Player::new();
        let body = Body::new(Vec2::ZERO, 4.0, ColorTag::Cyan).with_velocity(Vec2::new(3.0, 0.0));
        let e = shot(&mut world, body, ProjectileMotion::Straight, Some(2));
        run(&mut world, &player);
        assert_eq!(body_of(&world, e).position, Vec2::new(3.0, 0.0));
        assert!(!body_of(&world, e).marked_for_deletion);
        run(&mut world, &player);
        assert!(body_of(&world, e).marked_for_deletion);
    }

    #[test]
    fn homing_turns_toward_target_and_goes_straight_when_lost() {
        let mut world = World::new();
        let player = Player::new();
        let enemy = world.spawn((
            Body::new(Vec2::new(0.0, 100.0), 10.0, ColorTag::Red),
            crate::spawner::Candidate::new(EnemyKind::Swarmer, 1, Vec2::ZERO, EnemyBehavior::Chaser).enemy,
        ));
        let body = Body::new(Vec2::ZERO, 4.0, ColorTag::Orange).with_velocity(Vec2::new(5.0, 0.0));
        let e = shot(
            &mut world,
            body,
            ProjectileMotion::Homing {
                target: Some(enemy),
                turn_rate: 0.5,
            },
            None,
        );
        run(&mut world, &player);
        let v = body_of(&world, e).velocity;
        assert!(v.y > 0.0);
        assert!((v.length() - 5.0).abs() < 1e-4);

        world.despawn(enemy).unwrap();
        run(&mut world, &player);
        let after = body_of(&world, e).velocity;
        assert!((after - v).length() < 1e-5);
        let projectile = world.get::<&Projectile>(e).unwrap();
        assert_eq!(
            projectile.motion,
            ProjectileMotion::Homing {
                target: None,
                turn_rate: 0.5
            }
        );
    }

    #[test]
    fn boomerang_returns_and_is_caught() {
        let mut world = World::new();
        let player = Player::new();
        let body = Body::new(Vec2::ZERO, 10.0, ColorTag::Yellow).with_velocity(Vec2::new(8.0, 0.0));
        let e = shot(
            &mut world,
            body,
            ProjectileMotion::Boomerang {
                phase: BoomerangPhase::Outbound,
                turn_after: 5,
            },
            Some(100),
        );
        for _ in 0..4 {
            run(&mut world, &player);
        }
        assert!(body_of(&world, e).velocity.x > 0.0);
        run(&mut world, &player);
        assert!(body_of(&world, e).velocity.x < 0.0);
        for _ in 0..10 {
            run(&mut world, &player);
        }
        assert!(body_of(&world, e).marked_for_deletion);
    }

    #[test]
    fn orbit_follows_player_and_rehits() {
        let mut world = World::new();
        let mut player = Player::new();
        player.position = Vec2::new(50.0, 50.0);
        let e = shot(
            &mut world,
            Body::new(Vec2::ZERO, 9.0, ColorTag::Cyan),
            ProjectileMotion::Orbit {
                angle: 0.0,
                radius: 70.0,
                angular_speed: 0.0,
            },
            None,
        );
        let dummy = world.spawn(());
        world.get::<&mut Projectile>(e).unwrap().hit_list.push(dummy);
        run(&mut world, &player);
        assert!((body_of(&world, e).position - Vec2::new(120.0, 50.0)).length() < 1e-4);
        for _ in 1..ORBIT_REHIT_TICKS {
            run(&mut world, &player);
        }
        assert!(world.get::<&Projectile>(e).unwrap().hit_list.is_empty());
        assert!(!body_of(&world, e).marked_for_deletion);
    }

    #[test]
    fn pendulum_reanchors_to_player_history() {
        let mut world = World::new();
        let mut player = Player::new();
        for i in 0..80 {
            player.position = Vec2::new(i as f32 * 10.0, 0.0);
            player.record_position();
        }
        let e = shot(
            &mut world,
            Body::new(Vec2::ZERO, 12.0, ColorTag::Magenta),
            ProjectileMotion::Pendulum {
                anchor: Vec2::ZERO,
                phase: 0.0,
                amplitude: 1.2,
                length: 100.0,
                angular_speed: 0.0,
            },
            Some(10),
        );
        run(&mut world, &player);
        let anchor = player.past_position(glitchrun_core::constants::PENDULUM_HISTORY_LAG);
        // Phase 0 hangs straight along -y.
        let expected = anchor + Vec2::new(0.0, -100.0);
        assert!((body_of(&world, e).position - expected).length() < 1e-3);
    }
}
