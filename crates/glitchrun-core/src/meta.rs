//! Meta progression persisted between runs.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::enums::{ArtifactKind, WeaponKind};

/// Item ids unlocked on a fresh profile. Newly added defaults apply to old
/// saves too, because loading unions the stored set with this one.
pub const DEFAULT_UNLOCKS: &[&str] = &[
    "pulse_blaster",
    "arc_coil",
    "seeker_swarm",
    "recursor",
    "overclocked_core",
    "heat_sink",
    "magnet_coil",
    "nano_repair",
];

/// Progress carried across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaProgress {
    pub currency: u64,
    pub runs_completed: u32,
    pub defeated_bosses: BTreeSet<String>,
    pub unlocked_items: BTreeSet<String>,
    /// Permanent upgrade id → purchased level.
    pub permanent_upgrades: BTreeMap<String, u32>,
    pub max_wave_completed: u32,
}

impl Default for MetaProgress {
    fn default() -> Self {
        Self {
            currency: 0,
            runs_completed: 0,
            defeated_bosses: BTreeSet::new(),
            unlocked_items: default_unlocks(),
            permanent_upgrades: BTreeMap::new(),
            max_wave_completed: 0,
        }
    }
}

impl MetaProgress {
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked_items.contains(id)
    }

    pub fn weapon_unlocked(&self, kind: WeaponKind) -> bool {
        self.is_unlocked(kind.id())
    }

    pub fn artifact_unlocked(&self, kind: ArtifactKind) -> bool {
        self.is_unlocked(kind.id())
    }

    pub fn upgrade_level(&self, id: &str) -> u32 {
        self.permanent_upgrades.get(id).copied().unwrap_or(0)
    }

    /// Union the current default unlocks into this record.
    pub fn merge_default_unlocks(&mut self) {
        self.unlocked_items.extend(default_unlocks());
    }
}

pub fn default_unlocks() -> BTreeSet<String> {
    DEFAULT_UNLOCKS.iter().map(|s| s.to_string()).collect()
}
