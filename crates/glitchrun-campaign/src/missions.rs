//! Mission objectives. One `MissionState` is live per wave; the simulation
//! reports what happened each tick and the mission decides when it's done.

use glam::Vec2;
use glitchrun_core::constants::*;
use glitchrun_core::enums::MissionType;
use glitchrun_core::state::MissionView;
use glitchrun_core::types::{from_angle, secs_to_ticks};
use hecs::Entity;
use rand::Rng;

use crate::waves::WaveConfig;

/// Facts about one simulation tick that missions care about.
#[derive(Debug, Clone, Default)]
pub struct TickEvents {
    pub player_position: Vec2,
    /// Enemies killed this tick.
    pub killed: Vec<Entity>,
    pub shards_collected: u32,
}

/// Per-type tracking state.
#[derive(Debug, Clone, PartialEq)]
pub enum MissionContext {
    Survive,
    /// Tracked targets plus how many still need to be spawned.
    Targets { targets: Vec<Entity>, pending: u32 },
    Hold { center: Vec2, radius: f32 },
    Purge,
    DataRetrieval,
    Escort {
        payload: Vec2,
        destination: Vec2,
        travelled: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionProgress {
    Ongoing,
    /// Returned exactly once, on the tick the mission completes.
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MissionState {
    pub mission_type: MissionType,
    pub description: String,
    pub progress: u32,
    pub total: u32,
    pub complete: bool,
    pub context: MissionContext,
}

impl MissionState {
    /// Build the mission for a wave around the player's current position.
    pub fn for_wave<R: Rng>(wave: &WaveConfig, player_position: Vec2, rng: &mut R) -> Self {
        let param = wave.mission_param;
        let (description, total, context) = match wave.mission_type {
            MissionType::Survive => (
                format!("Survive for {}s", param),
                secs_to_ticks(param),
                MissionContext::Survive,
            ),
            MissionType::Eliminate => (
                format!("Eliminate {} elite targets", param),
                param,
                MissionContext::Targets {
                    targets: Vec::new(),
                    pending: param,
                },
            ),
            MissionType::HoldPosition => {
                let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                (
                    format!("Hold the zone for {}s", param / TICK_RATE),
                    param,
                    MissionContext::Hold {
                        center: player_position + from_angle(angle) * HOLD_ZONE_DISTANCE,
                        radius: HOLD_ZONE_RADIUS,
                    },
                )
            }
            MissionType::Purge => (
                format!("Destroy {} enemies", param),
                param,
                MissionContext::Purge,
            ),
            MissionType::DataRetrieval => (
                format!("Recover {} data shards", DATA_SHARD_COUNT),
                DATA_SHARD_COUNT,
                MissionContext::DataRetrieval,
            ),
            MissionType::Escort => {
                let angle = rng.gen_range(0.0..std::f32::consts::TAU);
                let heading = from_angle(angle);
                (
                    "Escort the payload".to_string(),
                    param,
                    MissionContext::Escort {
                        payload: player_position,
                        destination: player_position + heading * param as f32,
                        travelled: 0.0,
                    },
                )
            }
            MissionType::Boss => (
                "Defeat the boss".to_string(),
                1,
                MissionContext::Targets {
                    targets: Vec::new(),
                    pending: 1,
                },
            ),
        };
        Self {
            mission_type: wave.mission_type,
            description,
            progress: 0,
            total,
            complete: false,
            context,
        }
    }

    /// Targets that still need to be spawned.
    pub fn pending_targets(&self) -> u32 {
        match &self.context {
            MissionContext::Targets { pending, .. } => *pending,
            _ => 0,
        }
    }

    /// Start tracking a spawned target.
    pub fn add_target(&mut self, entity: Entity) {
        if let MissionContext::Targets { targets, pending } = &mut self.context {
            if *pending > 0 {
                *pending -= 1;
                targets.push(entity);
            }
        }
    }

    pub fn is_target(&self, entity: Entity) -> bool {
        match &self.context {
            MissionContext::Targets { targets, .. } => targets.contains(&entity),
            _ => false,
        }
    }

    /// Hold zone center or escort payload position.
    pub fn marker(&self) -> Option<Vec2> {
        match &self.context {
            MissionContext::Hold { center, .. } => Some(*center),
            MissionContext::Escort { payload, .. } => Some(*payload),
            _ => None,
        }
    }

    /// Fold one tick into the mission.
    pub fn advance(&mut self, events: &TickEvents) -> MissionProgress {
        if self.complete {
            return MissionProgress::Ongoing;
        }

        let done = match &mut self.context {
            MissionContext::Survive => {
                self.progress += 1;
                self.progress >= self.total
            }
            MissionContext::Targets { targets, pending } => {
                targets.retain(|t| !events.killed.contains(t));
                self.progress = self
                    .total
                    .saturating_sub(targets.len() as u32 + *pending);
                targets.is_empty() && *pending == 0
            }
            MissionContext::Hold { center, radius } => {
                if events.player_position.distance(*center) <= *radius {
                    self.progress += 1;
                }
                self.progress >= self.total
            }
            MissionContext::Purge => {
                self.progress += events.killed.len() as u32;
                self.progress >= self.total
            }
            MissionContext::DataRetrieval => {
                self.progress += events.shards_collected;
                self.progress >= self.total
            }
            MissionContext::Escort {
                payload,
                destination,
                travelled,
            } => {
                let mut arrived = *payload == *destination;
                if !arrived && events.player_position.distance(*payload) <= ESCORT_RADIUS {
                    let to_go = *destination - *payload;
                    let remaining = to_go.length();
                    if remaining <= ESCORT_SPEED {
                        *payload = *destination;
                        *travelled += remaining;
                        arrived = true;
                    } else {
                        *payload += to_go / remaining * ESCORT_SPEED;
                        *travelled += ESCORT_SPEED;
                    }
                }
                self.progress = if arrived {
                    self.total
                } else {
                    travelled.floor() as u32
                };
                arrived
            }
        };

        if done {
            self.progress = self.progress.min(self.total);
            self.complete = true;
            MissionProgress::Completed
        } else {
            MissionProgress::Ongoing
        }
    }

    pub fn view(&self) -> MissionView {
        MissionView {
            mission_type: self.mission_type,
            description: self.description.clone(),
            progress: self.progress,
            total: self.total,
            complete: self.complete,
            marker: self.marker(),
        }
    }
}
