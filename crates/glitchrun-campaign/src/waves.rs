//! Wave schedule for a run: twenty curated waves followed by procedurally
//! generated ones up to the final wave.

use glitchrun_core::constants::*;
use glitchrun_core::enums::{EnemyKind, MissionType};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One wave of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// 1-based wave number.
    pub id: u32,
    pub mission_type: MissionType,
    /// Scaled mission parameter: seconds, target count, ticks or distance
    /// depending on the mission type.
    pub mission_param: u32,
    /// Ticks between spawn batches.
    pub spawn_interval: u32,
    /// Enemy kinds this wave draws from.
    pub enemy_kinds: Vec<EnemyKind>,
    pub boss: Option<EnemyKind>,
}

/// Mission types the random slots draw from.
pub const MISSION_POOL: [MissionType; 5] = [
    MissionType::Eliminate,
    MissionType::HoldPosition,
    MissionType::Purge,
    MissionType::DataRetrieval,
    MissionType::Escort,
];

/// Scaled mission parameter for a mission type at a difficulty.
pub fn mission_param(mission: MissionType, difficulty: u32) -> u32 {
    match mission {
        MissionType::Survive => 45 + 15 * difficulty,
        MissionType::Eliminate => 2 + difficulty,
        MissionType::HoldPosition => 720 + 60 * difficulty,
        MissionType::Purge => 30 + 10 * difficulty,
        MissionType::Escort => 600 + 100 * difficulty,
        MissionType::DataRetrieval | MissionType::Boss => 0,
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Survive(u32),
    /// Random mission from the pool at this difficulty.
    Mission(u32),
    Boss(EnemyKind),
}

const EARLY_GROUPS: &[&[EnemyKind]] = &[
    &[EnemyKind::Swarmer],
    &[EnemyKind::Swarmer, EnemyKind::Runner],
    &[EnemyKind::Swarmer, EnemyKind::Runner, EnemyKind::Brute],
    &[EnemyKind::Swarmer, EnemyKind::TwinNode],
    &[EnemyKind::Runner, EnemyKind::RingSegment],
    &[EnemyKind::SquadLeader, EnemyKind::SquadFlanker, EnemyKind::Swarmer],
    &[EnemyKind::Brute, EnemyKind::TwinNode, EnemyKind::Runner],
    &[
        EnemyKind::RingSegment,
        EnemyKind::SquadLeader,
        EnemyKind::SquadFlanker,
        EnemyKind::Brute,
    ],
];

const LATE_GROUPS: &[&[EnemyKind]] = &[
    &[EnemyKind::Swarmer, EnemyKind::Runner, EnemyKind::Brute, EnemyKind::TwinNode],
    &[
        EnemyKind::RingSegment,
        EnemyKind::SquadLeader,
        EnemyKind::SquadFlanker,
        EnemyKind::Runner,
    ],
    &[EnemyKind::Brute, EnemyKind::TwinNode, EnemyKind::RingSegment],
    &[
        EnemyKind::Swarmer,
        EnemyKind::SquadLeader,
        EnemyKind::SquadFlanker,
        EnemyKind::Brute,
        EnemyKind::Runner,
    ],
];

/// (slot, spawn interval, early group index) for waves 1..=20.
const CURATED: [(Slot, u32, usize); CURATED_WAVE_COUNT as usize] = [
    (Slot::Survive(1), 60, 0),
    (Slot::Mission(1), 55, 1),
    (Slot::Survive(2), 50, 1),
    (Slot::Mission(2), 48, 2),
    (Slot::Survive(2), 45, 3),
    (Slot::Boss(EnemyKind::Overseer), 50, 1),
    (Slot::Survive(3), 42, 2),
    (Slot::Mission(3), 40, 4),
    (Slot::Survive(3), 38, 3),
    (Slot::Mission(4), 36, 5),
    (Slot::Survive(4), 34, 4),
    (Slot::Boss(EnemyKind::Hydra), 40, 3),
    (Slot::Survive(5), 32, 6),
    (Slot::Mission(5), 30, 5),
    (Slot::Boss(EnemyKind::Leviathan), 36, 6),
    (Slot::Survive(5), 28, 7),
    (Slot::Mission(6), 26, 6),
    (Slot::Survive(6), 24, 7),
    (Slot::Mission(6), 22, 7),
    (Slot::Boss(EnemyKind::Architect), 30, 7),
];

/// Draws missions from a shuffled copy of the pool, reshuffling once every
/// type has been used.
struct MissionBag {
    remaining: Vec<MissionType>,
}

impl MissionBag {
    fn new() -> Self {
        Self {
            remaining: Vec::new(),
        }
    }

    fn draw<R: Rng>(&mut self, rng: &mut R) -> MissionType {
        if self.remaining.is_empty() {
            self.remaining = MISSION_POOL.to_vec();
            self.remaining.shuffle(rng);
        }
        self.remaining.pop().unwrap_or(MissionType::Purge)
    }
}

/// Generate the full wave list for a run.
pub fn generate_run_waves<R: Rng>(rng: &mut R) -> Vec<WaveConfig> {
    let mut waves = Vec::with_capacity(FINAL_WAVE as usize);
    let mut bag = MissionBag::new();

    for (i, (slot, interval, group)) in CURATED.iter().enumerate() {
        let (mission_type, param, boss) = match *slot {
            Slot::Survive(d) => (MissionType::Survive, mission_param(MissionType::Survive, d), None),
            Slot::Mission(d) => {
                let mission = bag.draw(rng);
                (mission, mission_param(mission, d), None)
            }
            Slot::Boss(kind) => (MissionType::Boss, 0, Some(kind)),
        };
        waves.push(WaveConfig {
            id: i as u32 + 1,
            mission_type,
            mission_param: param,
            spawn_interval: *interval,
            enemy_kinds: EARLY_GROUPS[*group].to_vec(),
            boss,
        });
    }

    for id in (CURATED_WAVE_COUNT + 1)..=FINAL_WAVE {
        waves.push(late_wave(id, rng));
    }
    waves
}

/// Procedural wave past the curated block.
pub fn late_wave<R: Rng>(id: u32, rng: &mut R) -> WaveConfig {
    let difficulty = id.saturating_sub(CURATED_WAVE_COUNT) / 2;
    let (mission_type, param) = if id % 2 == 0 {
        let mission = MISSION_POOL[rng.gen_range(0..MISSION_POOL.len())];
        (mission, mission_param(mission, difficulty))
    } else {
        (MissionType::Survive, LATE_SURVIVE_SECS)
    };
    let group = LATE_GROUPS[rng.gen_range(0..LATE_GROUPS.len())];
    WaveConfig {
        id,
        mission_type,
        mission_param: param,
        spawn_interval: LATE_BASE_SPAWN_INTERVAL
            .saturating_sub(2 * difficulty)
            .max(MIN_SPAWN_INTERVAL),
        enemy_kinds: group.to_vec(),
        boss: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn waves(seed: u64) -> Vec<WaveConfig> {
        generate_run_waves(&mut ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn run_has_final_wave_count() {
        let w = waves(1);
        assert_eq!(w.len(), FINAL_WAVE as usize);
        for (i, wave) in w.iter().enumerate() {
            assert_eq!(wave.id, i as u32 + 1);
            assert!(!wave.enemy_kinds.is_empty());
        }
    }

    #[test]
    fn boss_waves_at_fixed_ordinals() {
        for seed in 0..10 {
            let bosses: Vec<(u32, Option<EnemyKind>)> = waves(seed)
                .iter()
                .filter(|w| w.mission_type == MissionType::Boss)
                .map(|w| (w.id, w.boss))
                .collect();
            assert_eq!(
                bosses,
                vec![
                    (6, Some(EnemyKind::Overseer)),
                    (12, Some(EnemyKind::Hydra)),
                    (15, Some(EnemyKind::Leviathan)),
                    (20, Some(EnemyKind::Architect)),
                ]
            );
        }
    }

    #[test]
    fn curated_mission_slots_cover_pool_before_repeating() {
        let w = waves(3);
        let slots = [2, 4, 8, 10, 14];
        let mut missions: Vec<MissionType> =
            slots.iter().map(|id| w[*id as usize - 1].mission_type).collect();
        missions.sort_by_key(|m| *m as u8);
        missions.dedup();
        assert_eq!(missions.len(), MISSION_POOL.len());
    }

    #[test]
    fn first_wave_is_short_survive() {
        let w = waves(9);
        assert_eq!(w[0].mission_type, MissionType::Survive);
        assert_eq!(w[0].mission_param, 60);
    }

    #[test]
    fn late_waves_alternate_and_speed_up() {
        let w = waves(5);
        for wave in &w[CURATED_WAVE_COUNT as usize..] {
            if wave.id % 2 == 1 {
                assert_eq!(wave.mission_type, MissionType::Survive);
                assert_eq!(wave.mission_param, LATE_SURVIVE_SECS);
            } else {
                assert!(MISSION_POOL.contains(&wave.mission_type));
            }
            assert!(wave.spawn_interval >= MIN_SPAWN_INTERVAL);
            assert!(wave.boss.is_none());
        }
        assert_eq!(w[99].spawn_interval, MIN_SPAWN_INTERVAL);
        assert_eq!(w[20].spawn_interval, LATE_BASE_SPAWN_INTERVAL);
    }

    #[test]
    fn mission_params_scale_with_difficulty() {
        assert_eq!(mission_param(MissionType::Eliminate, 3), 5);
        assert_eq!(mission_param(MissionType::HoldPosition, 2), 840);
        assert_eq!(mission_param(MissionType::Purge, 4), 70);
        assert_eq!(mission_param(MissionType::Escort, 1), 700);
        assert_eq!(mission_param(MissionType::DataRetrieval, 9), 0);
    }

    #[test]
    fn same_seed_same_schedule() {
        assert_eq!(waves(42), waves(42));
    }
}
