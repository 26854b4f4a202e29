//! Simulation engine: owns the world and drives one run tick by tick.
//!
//! `SimulationEngine` owns the hecs ECS world, the player, the run state and
//! the draft, processes player commands, runs all systems in a fixed order,
//! and produces `GameStateSnapshot`s. Completely headless, enabling
//! deterministic testing.

use std::collections::VecDeque;

use glam::Vec2;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::json;

use glitchrun_campaign::catalog::base_stats;
use glitchrun_campaign::draft::{
    apply_augment, generate_upgrades, ApplyOutcome, AugmentOption, UpgradeEffect, UpgradeOption,
};
use glitchrun_campaign::missions::{MissionProgress, TickEvents};
use glitchrun_campaign::progression::{apply_permanent_upgrades, settle_run, RunSummary};
use glitchrun_core::commands::PlayerCommand;
use glitchrun_core::components::{Enemy, Projectile, Weapon};
use glitchrun_core::constants::BOSS_CURRENCY_REWARD;
use glitchrun_core::enums::{GamePhase, MissionType, TelemetryKind, WeaponKind};
use glitchrun_core::events::GameEvent;
use glitchrun_core::meta::MetaProgress;
use glitchrun_core::player::Player;
use glitchrun_core::state::GameStateSnapshot;
use glitchrun_core::types::{clamp_input, SimTime, Viewport};

use crate::collaborators::{payload, Collaborators};
use crate::config::SimConfig;
use crate::pool::Pool;
use crate::run::RunState;
use crate::spawner;
use crate::systems;
use crate::systems::combat::Kill;
use crate::systems::population::{AdmissionContext, AdmissionReport};
use crate::systems::snapshot::SnapshotInputs;
use crate::systems::weapons::WeaponRegistry;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    config: SimConfig,
    rng: ChaCha8Rng,
    runs_started: u64,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<GameEvent>,
    /// Latest movement input, already clamped.
    input: Vec2,

    player: Option<Player>,
    run: Option<RunState>,
    meta: MetaProgress,
    draft: Vec<UpgradeOption>,
    augment_choice: Option<(WeaponKind, [AugmentOption; 2])>,

    projectile_pool: Pool<Projectile>,
    registry: WeaponRegistry,
    collaborators: Collaborators,
    last_admission: AdmissionReport,
    last_summary: Option<RunSummary>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config and a fresh profile.
    pub fn new(config: SimConfig) -> Self {
        Self::with_meta(config, MetaProgress::default())
    }

    /// Create an engine for a loaded meta profile.
    pub fn with_meta(config: SimConfig, meta: MetaProgress) -> Self {
        Self {
            world: World::new(),
            time: SimTime::default(),
            phase: GamePhase::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            runs_started: 0,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            input: Vec2::ZERO,
            player: None,
            run: None,
            meta,
            draft: Vec::new(),
            augment_choice: None,
            projectile_pool: Pool::default(),
            registry: WeaponRegistry::default(),
            collaborators: Collaborators::default(),
            last_admission: AdmissionReport::default(),
            last_summary: None,
        }
    }

    /// Replace the telemetry and audio sinks.
    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = collaborators;
        self
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Playing {
            self.run_systems();
            self.time.advance();
        }
        self.collaborators.notify_audio(self.phase.into());

        let draft = if self.phase == GamePhase::LevelUp {
            self.draft.iter().map(UpgradeOption::view).collect()
        } else {
            Vec::new()
        };
        let augments = self
            .augment_choice
            .as_ref()
            .map(|(_, options)| options.iter().map(AugmentOption::view).collect())
            .unwrap_or_default();
        systems::snapshot::build_snapshot(
            &self.world,
            SnapshotInputs {
                time: self.time,
                phase: self.phase,
                player: self.player.as_ref(),
                run: self.run.as_ref(),
                draft,
                augments,
                events: std::mem::take(&mut self.events),
            },
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn run(&self) -> Option<&RunState> {
        self.run.as_ref()
    }

    /// Meta progress, including everything settled by finished runs.
    pub fn meta(&self) -> &MetaProgress {
        &self.meta
    }

    /// Options currently offered by the draft.
    pub fn draft(&self) -> &[UpgradeOption] {
        &self.draft
    }

    /// Admission report from the most recent tick.
    pub fn last_admission(&self) -> &AdmissionReport {
        &self.last_admission
    }

    /// (allocated, reused) counters of the projectile pool.
    pub fn pool_stats(&self) -> (u64, u64) {
        self.projectile_pool.stats()
    }

    /// Summary of the last run that ended, once.
    pub fn take_run_summary(&mut self) -> Option<RunSummary> {
        self.last_summary.take()
    }

    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    #[cfg(test)]
    pub fn run_mut(&mut self) -> Option<&mut RunState> {
        self.run.as_mut()
    }

    /// Replace the draft with fixed options and wait for a selection.
    #[cfg(test)]
    pub fn offer_draft(&mut self, options: Vec<UpgradeOption>) {
        self.draft = options;
        self.phase = GamePhase::LevelUp;
    }

    /// Push candidates through admission against the live player viewport.
    #[cfg(test)]
    pub fn admit_candidates(&mut self, candidates: Vec<spawner::Candidate>) -> AdmissionReport {
        let center = self.player.as_ref().map(|p| p.position).unwrap_or(Vec2::ZERO);
        let mission = self.run.as_ref().and_then(RunState::active_mission);
        let ctx = AdmissionContext {
            config: &self.config.population,
            mission,
            viewport: Viewport {
                center,
                half_extents: self.config.viewport_half_extents,
            },
        };
        systems::population::admit(&mut self.world, candidates, &ctx)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::StartRun => {
                if matches!(
                    self.phase,
                    GamePhase::MainMenu | GamePhase::GameOver | GamePhase::Victory
                ) {
                    self.start_run();
                }
            }
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Playing {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Playing;
                }
            }
            PlayerCommand::ReturnToMenu => self.return_to_menu(),
            PlayerCommand::Move { x, y } => {
                self.input = clamp_input(Vec2::new(x, y));
            }
            PlayerCommand::SelectUpgrade { index } => self.select_upgrade(index),
            PlayerCommand::SelectAugment { index } => self.select_augment(index),
        }
    }

    fn start_run(&mut self) {
        let seed = self.config.seed.wrapping_add(self.runs_started);
        self.runs_started += 1;
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.world.clear();
        self.time = SimTime::default();
        self.input = Vec2::ZERO;
        self.draft.clear();
        self.augment_choice = None;
        self.last_summary = None;

        let mut player = Player::new();
        apply_permanent_upgrades(&mut player, &self.meta);
        let starter = WeaponKind::PulseBlaster;
        player.weapons.push(Weapon::new(starter, base_stats(starter)));
        player.record_position();

        let run = RunState::new(seed, player.position, &mut self.rng);
        let first = run.view();
        if first.mission_type == MissionType::DataRetrieval {
            spawner::spawn_data_shards(&mut self.world, player.position, &mut self.rng);
        }

        self.events.push(GameEvent::RunStarted { seed });
        self.events.push(GameEvent::WaveStarted {
            wave: first.id,
            mission: first.mission_type,
        });
        self.collaborators.emit(
            TelemetryKind::RunStart,
            payload([
                ("seed", json!(seed)),
                ("runs_completed", json!(self.meta.runs_completed)),
                ("meta_currency", json!(self.meta.currency)),
            ]),
        );
        tracing::info!(seed, "run started");

        self.player = Some(player);
        self.run = Some(run);
        self.phase = GamePhase::Playing;
    }

    fn return_to_menu(&mut self) {
        if matches!(
            self.phase,
            GamePhase::Playing | GamePhase::Paused | GamePhase::LevelUp | GamePhase::AugmentSelect
        ) {
            tracing::info!("run abandoned");
            self.end_run(false);
        }
        self.world.clear();
        self.player = None;
        self.run = None;
        self.draft.clear();
        self.augment_choice = None;
        self.phase = GamePhase::MainMenu;
    }

    fn select_upgrade(&mut self, index: usize) {
        if self.phase != GamePhase::LevelUp {
            tracing::debug!(phase = ?self.phase, "ignoring upgrade selection outside draft");
            return;
        }
        let Some(option) = self.draft.get(index).cloned() else {
            tracing::warn!(index, offered = self.draft.len(), "upgrade selection out of range");
            return;
        };
        let Some(player) = self.player.as_mut() else {
            return;
        };

        player.owed_level_ups = player.owed_level_ups.saturating_sub(1);
        self.draft.clear();
        tracing::debug!(id = %option.id, "upgrade selected");

        match option.apply(player) {
            ApplyOutcome::Applied => {
                if let UpgradeEffect::NewWeapon(weapon) = option.effect {
                    self.events.push(GameEvent::WeaponAcquired { weapon });
                }
                self.continue_draft();
            }
            ApplyOutcome::AugmentChoice { weapon, options } => {
                self.augment_choice = Some((weapon, options));
                self.phase = GamePhase::AugmentSelect;
            }
        }
    }

    fn select_augment(&mut self, index: usize) {
        if self.phase != GamePhase::AugmentSelect {
            tracing::debug!(phase = ?self.phase, "ignoring augment selection outside augment choice");
            return;
        }
        let Some((weapon, options)) = self.augment_choice.as_ref() else {
            return;
        };
        let Some(choice) = options.get(index) else {
            tracing::warn!(index, "augment selection out of range");
            return;
        };
        let (weapon, augment) = (*weapon, choice.augment);
        self.augment_choice = None;

        let Some(player) = self.player.as_mut() else {
            return;
        };
        if apply_augment(player, weapon, augment) {
            self.events.push(GameEvent::AugmentApplied { weapon, augment });
        } else {
            tracing::warn!(?weapon, ?augment, "augment could not be applied");
        }
        self.continue_draft();
    }

    /// Re-open the draft while level-ups are owed, otherwise resume play.
    fn continue_draft(&mut self) {
        let owed = self.player.as_ref().map_or(0, |p| p.owed_level_ups);
        if owed > 0 {
            self.open_draft();
        } else {
            self.phase = GamePhase::Playing;
        }
    }

    fn open_draft(&mut self) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        self.draft = generate_upgrades(player, &self.meta, &mut self.rng);
        if self.draft.is_empty() {
            tracing::warn!(owed = player.owed_level_ups, "draft pool empty, forfeiting level-ups");
            player.owed_level_ups = 0;
            self.phase = GamePhase::Playing;
            return;
        }
        self.phase = GamePhase::LevelUp;
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let (Some(player), Some(run)) = (self.player.as_mut(), self.run.as_mut()) else {
            return;
        };

        // 1. Commands were drained before this call.
        // 2. Player motion
        systems::player_motion::run(player, self.input);
        // 3. Weapon dispatch
        systems::weapons::run(
            &mut self.world,
            player,
            &self.registry,
            &mut self.projectile_pool,
        );
        // 4. Projectile lifecycle
        systems::projectiles::run(&mut self.world, player);
        // 5. Spawn requests through admission
        let candidates = run.spawn_requests(&mut self.world, player.position, &mut self.rng);
        let ctx = AdmissionContext {
            config: &self.config.population,
            mission: run.active_mission(),
            viewport: Viewport {
                center: player.position,
                half_extents: self.config.viewport_half_extents,
            },
        };
        let report = systems::population::admit(&mut self.world, candidates, &ctx);
        for &entity in &report.admitted {
            let is_target = self
                .world
                .get::<&Enemy>(entity)
                .map(|enemy| enemy.is_mission_target)
                .unwrap_or(false);
            if is_target {
                run.mission.add_target(entity);
            }
        }
        self.last_admission = report;
        // 6. Enemy behavior
        systems::enemy_ai::run(&mut self.world, player.position);
        // 7. Collisions and pickups
        let kills = systems::combat::run(
            &mut self.world,
            player,
            &mut self.projectile_pool,
            &mut self.events,
        );
        systems::pickups::drop_loot(&mut self.world, &kills, player, &mut self.rng);
        let collected =
            systems::pickups::run(&mut self.world, player, self.time.tick, &mut self.events);
        for content in &collected.supply_drops {
            self.collaborators.emit(
                TelemetryKind::LootPickup,
                payload([
                    ("content", serde_json::to_value(content).unwrap_or_default()),
                    ("wave", json!(run.wave().id)),
                    ("tick", json!(self.time.tick)),
                ]),
            );
        }
        // 8. Mission progress, wave transition, death, draft
        let progress = run.mission.advance(&TickEvents {
            player_position: player.position,
            killed: kills.iter().map(|kill| kill.entity).collect(),
            shards_collected: collected.shards,
        });
        if progress == MissionProgress::Completed {
            self.complete_wave(&kills);
        }
        if self.phase == GamePhase::Playing {
            self.resolve_player_death();
        }
        if self.phase == GamePhase::Playing {
            if let Some(player) = self.player.as_ref().filter(|p| p.owed_level_ups > 0) {
                self.events.push(GameEvent::LevelUp {
                    level: player.level,
                });
                self.open_draft();
            }
        }
        // 9. Sweep
        systems::cleanup::run(
            &mut self.world,
            &mut self.projectile_pool,
            &mut self.despawn_buffer,
        );
        if let Some(player) = self.player.as_mut() {
            systems::cleanup::expire_temporary_weapons(player, self.time.tick, &mut self.events);
        }
    }

    fn complete_wave(&mut self, kills: &[Kill]) {
        let (Some(player), Some(run)) = (self.player.as_mut(), self.run.as_mut()) else {
            return;
        };
        let finished = run.view();
        run.waves_completed = finished.id;
        self.events.push(GameEvent::WaveCompleted { wave: finished.id });
        self.collaborators.emit(
            TelemetryKind::WaveComplete,
            payload([
                ("wave", json!(finished.id)),
                ("mission", json!(finished.mission_type)),
                ("tick", json!(self.time.tick)),
                ("kills", json!(player.kills)),
            ]),
        );
        tracing::info!(wave = finished.id, mission = ?finished.mission_type, "wave complete");

        if let Some(boss) = finished.boss {
            player.gain_currency(BOSS_CURRENCY_REWARD);
            let drop_at = kills
                .iter()
                .find(|kill| kill.is_boss)
                .map_or(player.position, |kill| kill.position);
            systems::pickups::spawn_supply_drop(&mut self.world, drop_at, player, &mut self.rng);
            run.bosses_defeated.push(boss);
            self.events.push(GameEvent::BossDefeated {
                boss_id: boss.boss_id().unwrap_or_default().to_string(),
            });
        }

        let victory = !run.advance_wave(player.position, &mut self.rng);
        if victory {
            self.end_run(true);
            return;
        }
        let next = run.view();
        if next.mission_type == MissionType::DataRetrieval {
            spawner::spawn_data_shards(&mut self.world, player.position, &mut self.rng);
        }
        self.events.push(GameEvent::WaveStarted {
            wave: next.id,
            mission: next.mission_type,
        });
    }

    fn resolve_player_death(&mut self) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        if !player.is_dead() {
            return;
        }
        if player.try_revive() {
            tracing::info!(lives_left = player.extra_lives, "player revived");
            self.events.push(GameEvent::PlayerRevived {
                lives_left: player.extra_lives,
            });
            return;
        }
        let wave = self.run.as_ref().map_or(0, |run| run.wave().id);
        self.collaborators.emit(
            TelemetryKind::Death,
            payload([
                ("wave", json!(wave)),
                ("tick", json!(self.time.tick)),
                ("level", json!(player.level)),
                ("kills", json!(player.kills)),
            ]),
        );
        self.end_run(false);
    }

    /// Settle the run into meta progress and move to its end phase.
    fn end_run(&mut self, victory: bool) {
        self.phase = if victory {
            GamePhase::Victory
        } else {
            GamePhase::GameOver
        };
        self.draft.clear();
        self.augment_choice = None;

        let (Some(player), Some(run)) = (self.player.as_ref(), self.run.as_ref()) else {
            return;
        };
        let summary = RunSummary {
            seed: run.seed,
            waves_completed: run.waves_completed,
            currency_earned: player.currency,
            bosses_defeated: run.bosses_defeated.clone(),
            kills: player.kills,
            victory,
        };
        let unlocked = settle_run(&mut self.meta, &summary);
        let wave = run.wave().id;
        self.events.push(GameEvent::RunEnded { victory, wave });
        tracing::info!(
            victory,
            wave,
            kills = summary.kills,
            currency = summary.currency_earned,
            unlocked = unlocked.len(),
            "run ended"
        );
        self.last_summary = Some(summary);
    }
}
