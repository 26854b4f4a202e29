//! Game state snapshot: the complete visible state handed to the renderer
//! after each tick. The renderer reads it and never writes back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::{PickupKind, WeaponStats};
use crate::enums::*;
use crate::events::GameEvent;
use crate::types::SimTime;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub wave: Option<WaveView>,
    pub mission: Option<MissionView>,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub pickups: Vec<PickupView>,
    /// Draft options while in `LevelUp`.
    pub draft: Vec<OptionView>,
    /// Augment options while in `AugmentSelect`.
    pub augments: Vec<OptionView>,
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveView {
    pub id: u32,
    pub mission_type: MissionType,
    pub boss: Option<EnemyKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionView {
    pub mission_type: MissionType,
    pub description: String,
    pub progress: u32,
    pub total: u32,
    pub complete: bool,
    /// Hold zone or escort payload location, when the mission has one.
    pub marker: Option<Vec2>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Vec2,
    pub rotation: f32,
    pub health: f32,
    pub max_health: f32,
    pub extra_lives: u32,
    pub level: u32,
    pub xp: u32,
    pub next_level_xp: u32,
    pub currency: u32,
    pub weapons: Vec<WeaponView>,
    pub artifacts: Vec<ArtifactKind>,
    pub invulnerable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponView {
    pub kind: WeaponKind,
    pub level: u32,
    pub stats: WeaponStats,
    pub augment: Option<AugmentKind>,
    pub temporary: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u64,
    pub kind: EnemyKind,
    pub position: Vec2,
    pub radius: f32,
    pub color: ColorTag,
    pub health_fraction: f32,
    pub is_boss: bool,
    pub is_mission_target: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: u64,
    pub weapon: WeaponKind,
    pub position: Vec2,
    pub radius: f32,
    pub color: ColorTag,
    /// Beam endpoint for beam projectiles.
    pub beam_end: Option<Vec2>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupView {
    pub id: u64,
    pub kind: PickupKind,
    pub position: Vec2,
    pub value: u32,
}

/// A selectable draft or augment option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
}
