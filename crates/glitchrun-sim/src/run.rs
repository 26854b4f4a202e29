//! Per-run orchestration state: the wave schedule, the live mission and the
//! spawn requests the current wave makes each tick.

use glam::Vec2;
use hecs::World;
use rand::Rng;

use glitchrun_campaign::missions::MissionState;
use glitchrun_campaign::waves::{self, WaveConfig};
use glitchrun_core::components::{Body, Enemy, EnemyBehavior};
use glitchrun_core::constants::BOSS_SUMMON_INTERVAL;
use glitchrun_core::enums::{EnemyKind, MissionType};
use glitchrun_core::state::WaveView;

use crate::spawner::{self, Candidate};

#[derive(Debug, Clone)]
pub struct RunState {
    pub seed: u64,
    pub waves: Vec<WaveConfig>,
    /// Index into `waves` of the active wave.
    pub wave_index: usize,
    pub mission: MissionState,
    /// Ticks until the next timed spawn batch.
    pub spawn_timer: u32,
    next_group_id: u32,
    pub bosses_defeated: Vec<EnemyKind>,
    pub waves_completed: u32,
}

impl RunState {
    /// Generate the schedule and open wave 1.
    pub fn new<R: Rng>(seed: u64, player_position: Vec2, rng: &mut R) -> Self {
        let waves = waves::generate_run_waves(rng);
        let mission = MissionState::for_wave(&waves[0], player_position, rng);
        Self {
            seed,
            spawn_timer: waves[0].spawn_interval,
            waves,
            wave_index: 0,
            mission,
            next_group_id: 0,
            bosses_defeated: Vec::new(),
            waves_completed: 0,
        }
    }

    pub fn wave(&self) -> &WaveConfig {
        &self.waves[self.wave_index]
    }

    pub fn is_final_wave(&self) -> bool {
        self.wave_index + 1 >= self.waves.len()
    }

    /// Move to the next wave. Returns false if the current wave was the last.
    pub fn advance_wave<R: Rng>(&mut self, player_position: Vec2, rng: &mut R) -> bool {
        if self.is_final_wave() {
            return false;
        }
        self.wave_index += 1;
        let wave = &self.waves[self.wave_index];
        self.mission = MissionState::for_wave(wave, player_position, rng);
        self.spawn_timer = wave.spawn_interval;
        true
    }

    /// Mission type while the mission is still running.
    pub fn active_mission(&self) -> Option<MissionType> {
        (!self.mission.complete).then_some(self.mission.mission_type)
    }

    /// Everything the wave wants spawned this tick: the timed batch, mission
    /// targets still owed, and boss summons that came off cooldown.
    pub fn spawn_requests<R: Rng>(
        &mut self,
        world: &mut World,
        player_position: Vec2,
        rng: &mut R,
    ) -> Vec<Candidate> {
        let wave_id = self.wave().id;
        let mut candidates = Vec::new();

        self.spawn_timer = self.spawn_timer.saturating_sub(1);
        if self.spawn_timer == 0 {
            let wave = &self.waves[self.wave_index];
            self.spawn_timer = wave.spawn_interval;
            if !wave.enemy_kinds.is_empty() {
                let kind = wave.enemy_kinds[rng.gen_range(0..wave.enemy_kinds.len())];
                candidates.extend(spawner::batch(
                    kind,
                    wave_id,
                    player_position,
                    &mut self.next_group_id,
                    rng,
                ));
            }
        }

        for _ in 0..self.mission.pending_targets() {
            let target = match (self.mission.mission_type, self.wave().boss) {
                (MissionType::Boss, Some(kind)) => spawner::boss(kind, wave_id, player_position, rng),
                _ => spawner::elite(wave_id, player_position, rng),
            };
            candidates.push(target);
        }

        for (_entity, (body, enemy)) in world.query_mut::<(&Body, &mut Enemy)>() {
            if body.marked_for_deletion {
                continue;
            }
            if let EnemyBehavior::Boss { summon_cooldown, .. } = &mut enemy.behavior {
                if *summon_cooldown == 0 {
                    *summon_cooldown = BOSS_SUMMON_INTERVAL;
                    candidates.extend(spawner::minions(body.position, wave_id, rng));
                }
            }
        }

        candidates
    }

    pub fn view(&self) -> WaveView {
        let wave = self.wave();
        WaveView {
            id: wave.id,
            mission_type: wave.mission_type,
            boss: wave.boss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn first_batch_arrives_after_spawn_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut world = World::new();
        let mut run = RunState::new(5, Vec2::ZERO, &mut rng);
        let interval = run.wave().spawn_interval;
        for _ in 0..interval - 1 {
            assert!(run.spawn_requests(&mut world, Vec2::ZERO, &mut rng).is_empty());
        }
        assert!(!run.spawn_requests(&mut world, Vec2::ZERO, &mut rng).is_empty());
        assert_eq!(run.spawn_timer, interval);
    }

    #[test]
    fn boss_wave_requests_its_boss_until_tracked() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut world = World::new();
        let mut run = RunState::new(6, Vec2::ZERO, &mut rng);
        while run.wave().id < 6 {
            assert!(run.advance_wave(Vec2::ZERO, &mut rng));
        }
        let requests = run.spawn_requests(&mut world, Vec2::ZERO, &mut rng);
        let bosses: Vec<&Candidate> = requests.iter().filter(|c| c.enemy.is_boss).collect();
        assert_eq!(bosses.len(), 1);
        assert_eq!(bosses[0].enemy.kind, EnemyKind::Overseer);

        let entity = world.spawn((bosses[0].body, bosses[0].enemy.clone()));
        run.mission.add_target(entity);
        let again = run.spawn_requests(&mut world, Vec2::ZERO, &mut rng);
        assert!(again.iter().all(|c| !c.enemy.is_boss));
    }

    #[test]
    fn boss_summons_when_cooldown_expires() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut world = World::new();
        let mut run = RunState::new(7, Vec2::ZERO, &mut rng);
        let mut candidate = spawner::boss(EnemyKind::Overseer, 6, Vec2::ZERO, &mut rng);
        candidate.enemy.behavior = EnemyBehavior::Boss {
            boss_id: "boss_overseer",
            summon_cooldown: 0,
        };
        world.spawn((candidate.body, candidate.enemy));
        let requests = run.spawn_requests(&mut world, Vec2::ZERO, &mut rng);
        let minions = requests
            .iter()
            .filter(|c| c.enemy.kind == EnemyKind::Swarmer)
            .count();
        assert!(minions >= glitchrun_core::constants::BOSS_SUMMON_COUNT);
    }

    #[test]
    fn last_wave_does_not_advance() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut run = RunState::new(8, Vec2::ZERO, &mut rng);
        run.wave_index = run.waves.len() - 1;
        assert!(run.is_final_wave());
        assert!(!run.advance_wave(Vec2::ZERO, &mut rng));
    }
}
