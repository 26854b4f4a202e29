//! Events emitted by the simulation for UI and audio feedback.

use serde::{Deserialize, Serialize};

use crate::components::PickupKind;
use crate::enums::*;

/// Per-tick gameplay events, drained into each snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    RunStarted { seed: u64 },
    WaveStarted {
        wave: u32,
        mission: MissionType,
    },
    WaveCompleted { wave: u32 },
    EnemyKilled { kind: EnemyKind, x: f32, y: f32 },
    BossDefeated { boss_id: String },
    PlayerDamaged { amount: f32, remaining: f32 },
    PlayerRevived { lives_left: u32 },
    LevelUp { level: u32 },
    WeaponAcquired { weapon: WeaponKind },
    WeaponExpired { weapon: WeaponKind },
    AugmentApplied {
        weapon: WeaponKind,
        augment: AugmentKind,
    },
    PickupCollected { kind: PickupKind, value: u32 },
    RunEnded { victory: bool, wave: u32 },
}
