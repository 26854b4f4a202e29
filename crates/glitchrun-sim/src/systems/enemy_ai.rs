//! Enemy behavior: status timers, then per-kind steering, then integration.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use hecs::{Entity, World};

use glitchrun_core::components::{Body, Enemy, EnemyBehavior};
use glitchrun_core::constants::*;
use glitchrun_core::enums::SquadRole;
use glitchrun_core::types::from_angle;

use super::movement;

/// Distance at which a flanker stops cutting off and closes in.
const FLANK_ARRIVE_DISTANCE: f32 = 24.0;

fn toward(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

pub fn run(world: &mut World, player_position: Vec2) {
    let mut leaders: HashMap<u32, Vec2> = HashMap::new();
    let mut live_twins: HashSet<Entity> = HashSet::new();
    for (entity, (body, enemy)) in world.query::<(&Body, &Enemy)>().iter() {
        if body.marked_for_deletion || enemy.is_dead() {
            continue;
        }
        match enemy.behavior {
            EnemyBehavior::Squad {
                role: SquadRole::Leader,
                squad_id,
            } => {
                leaders.insert(squad_id, body.position);
            }
            EnemyBehavior::TwinNode { .. } => {
                live_twins.insert(entity);
            }
            _ => {}
        }
    }

    for (_entity, (body, enemy)) in world.query_mut::<(&mut Body, &mut Enemy)>() {
        if body.marked_for_deletion {
            continue;
        }

        let status = &mut enemy.status;
        if status.bleed_ticks > 0 {
            status.bleed_ticks -= 1;
            enemy.health -= status.bleed_damage;
        }
        if status.stun_ticks > 0 {
            status.stun_ticks -= 1;
            body.velocity = Vec2::ZERO;
            continue;
        }
        let mut speed = enemy.speed;
        if status.slow_ticks > 0 {
            status.slow_ticks -= 1;
            speed *= SLOW_FACTOR;
        }

        let chase = toward(body.position, player_position) * speed;
        body.velocity = match &mut enemy.behavior {
            EnemyBehavior::Chaser => chase,
            EnemyBehavior::TwinNode { partner, enraged } => {
                if partner.is_some_and(|p| !live_twins.contains(&p)) {
                    *partner = None;
                    *enraged = true;
                }
                if *enraged {
                    chase * TWIN_ENRAGE_FACTOR
                } else {
                    chase
                }
            }
            EnemyBehavior::RingSegment {
                center,
                angle,
                orbit_radius,
            } => {
                *center += toward(*center, player_position) * speed;
                *angle += RING_ANGULAR_SPEED;
                *center + from_angle(*angle) * *orbit_radius - body.position
            }
            EnemyBehavior::Squad { role, squad_id } => match (*role, leaders.get(&*squad_id)) {
                (SquadRole::Flanker { side }, Some(leader)) => {
                    let heading = toward(*leader, player_position);
                    let perpendicular = Vec2::new(-heading.y, heading.x) * side as f32;
                    let goal = player_position + perpendicular * SQUAD_FLANK_OFFSET;
                    if body.position.distance(goal) <= FLANK_ARRIVE_DISTANCE {
                        chase
                    } else {
                        toward(body.position, goal) * speed
                    }
                }
                // Leaders, and flankers whose leader is gone, chase directly.
                _ => chase,
            },
            EnemyBehavior::Boss {
                summon_cooldown, ..
            } => {
                *summon_cooldown = summon_cooldown.saturating_sub(1);
                chase
            }
            EnemyBehavior::MissionTarget { orbit_angle } => {
                *orbit_angle += ELITE_ORBIT_SPEED;
                let goal = player_position + from_angle(*orbit_angle) * ELITE_KITE_DISTANCE;
                toward(body.position, goal) * speed
            }
        };
    }

    movement::run::<Enemy>(world);
}
