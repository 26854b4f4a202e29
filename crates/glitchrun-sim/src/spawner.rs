//! Enemy and pickup factories.
//!
//! Enemies are built as `Candidate`s and only enter the world through the
//! population manager. Pickups are spawned directly.

use glam::Vec2;
use hecs::{Entity, World};
use rand::Rng;

use glitchrun_core::components::*;
use glitchrun_core::constants::*;
use glitchrun_core::enums::*;
use glitchrun_core::types::from_angle;

/// Unscaled stats for one enemy kind.
#[derive(Debug, Clone, Copy)]
pub struct EnemyStats {
    pub kind: EnemyKind,
    pub health: f32,
    pub damage: f32,
    pub speed: f32,
    pub xp_value: u32,
    pub radius: f32,
    pub color: ColorTag,
}

const fn row(
    kind: EnemyKind,
    health: f32,
    damage: f32,
    speed: f32,
    xp_value: u32,
    radius: f32,
    color: ColorTag,
) -> EnemyStats {
    EnemyStats {
        kind,
        health,
        damage,
        speed,
        xp_value,
        radius,
        color,
    }
}

pub const ENEMY_TABLE: &[EnemyStats] = &[
    row(EnemyKind::Swarmer, 12.0, 6.0, 1.4, 1, 10.0, ColorTag::Red),
    row(EnemyKind::Runner, 8.0, 5.0, 2.4, 1, 8.0, ColorTag::Orange),
    row(EnemyKind::Brute, 60.0, 14.0, 0.8, 4, 18.0, ColorTag::Violet),
    row(EnemyKind::TwinNode, 30.0, 8.0, 1.2, 3, 12.0, ColorTag::Cyan),
    row(EnemyKind::RingSegment, 20.0, 8.0, 1.0, 2, 11.0, ColorTag::Magenta),
    row(EnemyKind::SquadLeader, 45.0, 10.0, 1.3, 4, 14.0, ColorTag::Yellow),
    row(EnemyKind::SquadFlanker, 25.0, 8.0, 1.8, 2, 11.0, ColorTag::Yellow),
    row(EnemyKind::Elite, 220.0, 18.0, 1.6, 20, 20.0, ColorTag::Green),
    row(EnemyKind::Overseer, 2000.0, 25.0, 0.9, 100, 48.0, ColorTag::Magenta),
    row(EnemyKind::Hydra, 3200.0, 30.0, 1.0, 150, 52.0, ColorTag::Green),
    row(EnemyKind::Leviathan, 4500.0, 35.0, 0.8, 200, 60.0, ColorTag::Cyan),
    row(EnemyKind::Architect, 6000.0, 40.0, 0.9, 300, 64.0, ColorTag::White),
];

/// Stat row for `kind`. A kind missing from the table uses the first row.
pub fn enemy_stats(kind: EnemyKind) -> EnemyStats {
    ENEMY_TABLE
        .iter()
        .find(|s| s.kind == kind)
        .copied()
        .unwrap_or(ENEMY_TABLE[0])
}

/// Health and damage multiplier for a wave.
pub fn wave_scaling(wave_id: u32) -> f32 {
    ENEMY_SCALING_RATE.powi(wave_id.saturating_sub(1) as i32)
}

/// An enemy waiting for admission.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub body: Body,
    pub enemy: Enemy,
    /// Candidates sharing a group are linked as twin partners once admitted.
    pub link_group: Option<u32>,
}

impl Candidate {
    pub fn new(kind: EnemyKind, wave_id: u32, position: Vec2, behavior: EnemyBehavior) -> Self {
        let stats = enemy_stats(kind);
        let scale = wave_scaling(wave_id);
        let health = stats.health * scale;
        Self {
            body: Body::new(position, stats.radius, stats.color),
            enemy: Enemy {
                kind,
                health,
                max_health: health,
                damage: stats.damage * scale,
                speed: stats.speed,
                xp_value: stats.xp_value,
                behavior,
                status: StatusTimers::default(),
                is_boss: kind.is_boss(),
                is_mission_target: false,
            },
            link_group: None,
        }
    }

    fn mission_target(mut self) -> Self {
        self.enemy.is_mission_target = true;
        self
    }
}

fn ring_point<R: Rng>(center: Vec2, distance: f32, rng: &mut R) -> Vec2 {
    center + from_angle(rng.gen_range(0.0..std::f32::consts::TAU)) * distance
}

fn jitter<R: Rng>(rng: &mut R, spread: f32) -> Vec2 {
    Vec2::new(rng.gen_range(-spread..spread), rng.gen_range(-spread..spread))
}

/// One timed spawn batch of `kind` just off-screen. `next_group` hands out
/// twin link and squad ids.
pub fn batch<R: Rng>(
    kind: EnemyKind,
    wave_id: u32,
    player_position: Vec2,
    next_group: &mut u32,
    rng: &mut R,
) -> Vec<Candidate> {
    let origin = ring_point(player_position, ENEMY_SPAWN_DISTANCE, rng);
    match kind {
        EnemyKind::Swarmer => {
            let clump = rng.gen_range(3..=5);
            (0..clump)
                .map(|_| {
                    Candidate::new(kind, wave_id, origin + jitter(rng, 30.0), EnemyBehavior::Chaser)
                })
                .collect()
        }
        EnemyKind::Runner => (0..2)
            .map(|_| Candidate::new(kind, wave_id, origin + jitter(rng, 20.0), EnemyBehavior::Chaser))
            .collect(),
        EnemyKind::TwinNode => {
            let group = *next_group;
            *next_group += 1;
            let offset = from_angle(rng.gen_range(0.0..std::f32::consts::TAU)) * 40.0;
            [origin + offset, origin - offset]
                .into_iter()
                .map(|position| {
                    let mut c = Candidate::new(
                        kind,
                        wave_id,
                        position,
                        EnemyBehavior::TwinNode {
                            partner: None,
                            enraged: false,
                        },
                    );
                    c.link_group = Some(group);
                    c
                })
                .collect()
        }
        EnemyKind::RingSegment => (0..RING_SEGMENT_COUNT)
            .map(|i| {
                let angle = i as f32 * std::f32::consts::TAU / RING_SEGMENT_COUNT as f32;
                Candidate::new(
                    kind,
                    wave_id,
                    origin + from_angle(angle) * RING_ORBIT_RADIUS,
                    EnemyBehavior::RingSegment {
                        center: origin,
                        angle,
                        orbit_radius: RING_ORBIT_RADIUS,
                    },
                )
            })
            .collect(),
        EnemyKind::SquadLeader | EnemyKind::SquadFlanker => {
            let squad_id = *next_group;
            *next_group += 1;
            let leader = Candidate::new(
                EnemyKind::SquadLeader,
                wave_id,
                origin,
                EnemyBehavior::Squad {
                    role: SquadRole::Leader,
                    squad_id,
                },
            );
            let flankers = [-1i8, 1].into_iter().map(|side| {
                Candidate::new(
                    EnemyKind::SquadFlanker,
                    wave_id,
                    origin + jitter(rng, 40.0),
                    EnemyBehavior::Squad {
                        role: SquadRole::Flanker { side },
                        squad_id,
                    },
                )
            });
            std::iter::once(leader).chain(flankers).collect()
        }
        EnemyKind::Elite => vec![elite(wave_id, player_position, rng)],
        k if k.is_boss() => vec![boss(k, wave_id, player_position, rng)],
        _ => vec![Candidate::new(kind, wave_id, origin, EnemyBehavior::Chaser)],
    }
}

/// Elimination target.
pub fn elite<R: Rng>(wave_id: u32, player_position: Vec2, rng: &mut R) -> Candidate {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    Candidate::new(
        EnemyKind::Elite,
        wave_id,
        player_position + from_angle(angle) * ELITE_SPAWN_DISTANCE,
        EnemyBehavior::MissionTarget { orbit_angle: angle },
    )
    .mission_target()
}

pub fn boss<R: Rng>(kind: EnemyKind, wave_id: u32, player_position: Vec2, rng: &mut R) -> Candidate {
    let position = ring_point(player_position, ENEMY_SPAWN_DISTANCE, rng);
    Candidate::new(
        kind,
        wave_id,
        position,
        EnemyBehavior::Boss {
            boss_id: kind.boss_id().unwrap_or("boss_unknown"),
            summon_cooldown: BOSS_SUMMON_INTERVAL,
        },
    )
    .mission_target()
}

/// Swarmers summoned around a boss.
pub fn minions<R: Rng>(boss_position: Vec2, wave_id: u32, rng: &mut R) -> Vec<Candidate> {
    (0..BOSS_SUMMON_COUNT)
        .map(|_| {
            Candidate::new(
                EnemyKind::Swarmer,
                wave_id,
                ring_point(boss_position, 80.0, rng),
                EnemyBehavior::Chaser,
            )
        })
        .collect()
}

pub fn spawn_pickup(world: &mut World, position: Vec2, kind: PickupKind, value: u32) -> Entity {
    let color = match kind {
        PickupKind::Xp => ColorTag::Cyan,
        PickupKind::Currency => ColorTag::Yellow,
        PickupKind::Health => ColorTag::Green,
        PickupKind::DataShard => ColorTag::Violet,
        PickupKind::SupplyDrop(_) => ColorTag::Orange,
    };
    world.spawn((
        Body::new(position, PICKUP_RADIUS, color),
        Pickup {
            kind,
            value,
            magnetized: false,
        },
    ))
}

/// Scatter the data shards for a retrieval mission.
pub fn spawn_data_shards<R: Rng>(world: &mut World, player_position: Vec2, rng: &mut R) {
    let start = rng.gen_range(0.0..std::f32::consts::TAU);
    for i in 0..DATA_SHARD_COUNT {
        let angle = start + i as f32 * std::f32::consts::TAU / DATA_SHARD_COUNT as f32;
        spawn_pickup(
            world,
            player_position + from_angle(angle) * DATA_SHARD_DISTANCE,
            PickupKind::DataShard,
            1,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn stats_scale_with_wave() {
        let first = Candidate::new(EnemyKind::Brute, 1, Vec2::ZERO, EnemyBehavior::Chaser);
        let later = Candidate::new(EnemyKind::Brute, 11, Vec2::ZERO, EnemyBehavior::Chaser);
        assert_eq!(first.enemy.health, 60.0);
        let expected = 60.0 * 1.06f32.powi(10);
        assert!((later.enemy.health - expected).abs() < 1e-3);
        assert_eq!(later.enemy.max_health, later.enemy.health);
        // Speed doesn't scale.
        assert_eq!(first.enemy.speed, later.enemy.speed);
    }

    #[test]
    fn twins_share_a_link_group() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut next = 7;
        let pair = batch(EnemyKind::TwinNode, 1, Vec2::ZERO, &mut next, &mut rng);
        assert_eq!(pair.len(), 2);
        assert!(pair.iter().all(|c| c.link_group == Some(7)));
        assert_eq!(next, 8);
    }

    #[test]
    fn ring_has_full_segment_count_around_one_center() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut next = 0;
        let ring = batch(EnemyKind::RingSegment, 3, Vec2::ZERO, &mut next, &mut rng);
        assert_eq!(ring.len(), RING_SEGMENT_COUNT);
        for c in &ring {
            let EnemyBehavior::RingSegment { center, .. } = &c.enemy.behavior else {
                panic!("expected ring segment");
            };
            assert!((c.body.position.distance(*center) - RING_ORBIT_RADIUS).abs() < 1e-2);
        }
    }

    #[test]
    fn squad_is_leader_plus_two_flankers() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut next = 0;
        let squad = batch(EnemyKind::SquadFlanker, 1, Vec2::ZERO, &mut next, &mut rng);
        let kinds: Vec<EnemyKind> = squad.iter().map(|c| c.enemy.kind).collect();
        assert_eq!(
            kinds,
            vec![EnemyKind::SquadLeader, EnemyKind::SquadFlanker, EnemyKind::SquadFlanker]
        );
    }

    #[test]
    fn bosses_and_elites_are_mission_targets() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let b = boss(EnemyKind::Hydra, 12, Vec2::ZERO, &mut rng);
        assert!(b.enemy.is_boss && b.enemy.is_mission_target);
        let e = elite(3, Vec2::ZERO, &mut rng);
        assert!(!e.enemy.is_boss && e.enemy.is_mission_target);
        assert!((e.body.position.length() - ELITE_SPAWN_DISTANCE).abs() < 1e-2);
    }
}
