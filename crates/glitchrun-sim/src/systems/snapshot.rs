//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! This system is read-only. It never modifies the world.

use hecs::World;

use glitchrun_core::components::*;
use glitchrun_core::enums::GamePhase;
use glitchrun_core::events::GameEvent;
use glitchrun_core::player::Player;
use glitchrun_core::state::*;
use glitchrun_core::types::SimTime;

use super::projectiles::beam_end;
use crate::run::RunState;

/// Read-only inputs to a snapshot beyond the world itself.
pub struct SnapshotInputs<'a> {
    pub time: SimTime,
    pub phase: GamePhase,
    pub player: Option<&'a Player>,
    pub run: Option<&'a RunState>,
    pub draft: Vec<OptionView>,
    pub augments: Vec<OptionView>,
    pub events: Vec<GameEvent>,
}

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(world: &World, inputs: SnapshotInputs<'_>) -> GameStateSnapshot {
    GameStateSnapshot {
        time: inputs.time,
        phase: inputs.phase,
        wave: inputs.run.map(RunState::view),
        mission: inputs.run.map(|run| run.mission.view()),
        player: inputs.player.map(build_player).unwrap_or_default(),
        enemies: build_enemies(world),
        projectiles: build_projectiles(world),
        pickups: build_pickups(world),
        draft: inputs.draft,
        augments: inputs.augments,
        events: inputs.events,
    }
}

fn build_player(player: &Player) -> PlayerView {
    PlayerView {
        position: player.position,
        rotation: player.rotation,
        health: player.health,
        max_health: player.max_health,
        extra_lives: player.extra_lives,
        level: player.level,
        xp: player.xp,
        next_level_xp: player.next_level_xp,
        currency: player.currency,
        weapons: player
            .weapons
            .iter()
            .map(|w| WeaponView {
                kind: w.kind,
                level: w.level,
                stats: w.stats,
                augment: w.augment,
                temporary: w.expires_at_tick.is_some(),
            })
            .collect(),
        artifacts: player.artifacts.clone(),
        invulnerable: player.invuln_ticks > 0,
    }
}

/// Build EnemyView list, sorted by id for stable output.
fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Body, &Enemy)>()
        .iter()
        .filter(|(_, (body, _))| !body.marked_for_deletion)
        .map(|(entity, (body, enemy))| EnemyView {
            id: entity.to_bits().get(),
            kind: enemy.kind,
            position: body.position,
            radius: body.radius,
            color: body.color,
            health_fraction: if enemy.max_health > 0.0 {
                (enemy.health / enemy.max_health).clamp(0.0, 1.0)
            } else {
                0.0
            },
            is_boss: enemy.is_boss,
            is_mission_target: enemy.is_mission_target,
        })
        .collect();
    enemies.sort_by_key(|e| e.id);
    enemies
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<ProjectileView> = world
        .query::<(&Body, &Projectile)>()
        .iter()
        .filter(|(_, (body, _))| !body.marked_for_deletion)
        .map(|(entity, (body, projectile))| ProjectileView {
            id: entity.to_bits().get(),
            weapon: projectile.weapon,
            position: body.position,
            radius: body.radius,
            color: body.color,
            beam_end: beam_end(body, projectile),
        })
        .collect();
    projectiles.sort_by_key(|p| p.id);
    projectiles
}

fn build_pickups(world: &World) -> Vec<PickupView> {
    let mut pickups: Vec<PickupView> = world
        .query::<(&Body, &Pickup)>()
        .iter()
        .filter(|(_, (body, _))| !body.marked_for_deletion)
        .map(|(entity, (body, pickup))| PickupView {
            id: entity.to_bits().get(),
            kind: pickup.kind,
            position: body.position,
            value: pickup.value,
        })
        .collect();
    pickups.sort_by_key(|p| p.id);
    pickups
}
