//! Between-run progression: permanent upgrades bought with meta currency,
//! item unlocks earned by milestones, and settling a finished run.

use glitchrun_core::enums::EnemyKind;
use glitchrun_core::meta::MetaProgress;
use glitchrun_core::player::Player;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Permanent upgrade purchasable with meta currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermanentUpgrade {
    Might,
    Vitality,
    Swiftness,
    Greed,
    Growth,
    Magnetism,
    Revival,
}

impl PermanentUpgrade {
    pub const ALL: [PermanentUpgrade; 7] = [
        Self::Might,
        Self::Vitality,
        Self::Swiftness,
        Self::Greed,
        Self::Growth,
        Self::Magnetism,
        Self::Revival,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Might => "might",
            Self::Vitality => "vitality",
            Self::Swiftness => "swiftness",
            Self::Greed => "greed",
            Self::Growth => "growth",
            Self::Magnetism => "magnetism",
            Self::Revival => "revival",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.id() == s)
    }

    pub fn max_level(&self) -> u32 {
        match self {
            Self::Revival => 2,
            _ => 5,
        }
    }

    /// Price of the next level, or None at max level.
    pub fn cost(&self, current_level: u32) -> Option<u64> {
        if current_level >= self.max_level() {
            return None;
        }
        let base: u64 = match self {
            Self::Revival => 400,
            Self::Vitality | Self::Might => 120,
            _ => 80,
        };
        Some(base * (current_level as u64 + 1))
    }

    fn apply(&self, player: &mut Player, level: u32) {
        let n = level as f32;
        match self {
            Self::Might => player.stats.damage += 0.05 * n,
            Self::Vitality => {
                player.max_health += 10.0 * n;
                player.health = player.max_health;
            }
            Self::Swiftness => player.stats.speed += 0.03 * n,
            Self::Greed => player.stats.currency += 0.1 * n,
            Self::Growth => player.stats.xp += 0.05 * n,
            Self::Magnetism => player.stats.magnet += 0.1 * n,
            Self::Revival => player.extra_lives += level,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PurchaseError {
    #[error("unknown upgrade {0}")]
    Unknown(String),
    #[error("{0} already at max level")]
    MaxLevel(&'static str),
    #[error("insufficient currency: have {have}, need {need}")]
    Insufficient { have: u64, need: u64 },
}

/// Buy one level of a permanent upgrade. Returns the amount spent.
pub fn purchase_upgrade(meta: &mut MetaProgress, id: &str) -> Result<u64, PurchaseError> {
    let upgrade = PermanentUpgrade::parse(id).ok_or_else(|| PurchaseError::Unknown(id.to_string()))?;
    let current = meta.upgrade_level(upgrade.id());
    let cost = upgrade
        .cost(current)
        .ok_or(PurchaseError::MaxLevel(upgrade.id()))?;
    if meta.currency < cost {
        return Err(PurchaseError::Insufficient {
            have: meta.currency,
            need: cost,
        });
    }
    meta.currency -= cost;
    meta.permanent_upgrades
        .insert(upgrade.id().to_string(), current + 1);
    Ok(cost)
}

/// Apply every purchased permanent upgrade to a fresh player. Unknown ids in
/// the record are skipped.
pub fn apply_permanent_upgrades(player: &mut Player, meta: &MetaProgress) {
    for (id, level) in &meta.permanent_upgrades {
        match PermanentUpgrade::parse(id) {
            Some(upgrade) => upgrade.apply(player, (*level).min(upgrade.max_level())),
            None => tracing::debug!(id = %id, "skipping unknown permanent upgrade"),
        }
    }
}

/// Items unlocked by defeating a boss.
pub fn boss_unlocks(boss: EnemyKind) -> &'static [&'static str] {
    match boss {
        EnemyKind::Overseer => &["prism_lance", "reactive_plating"],
        EnemyKind::Hydra => &["halo_drive", "data_miner"],
        EnemyKind::Leviathan => &["paradox_pendulum", "crypto_wallet"],
        EnemyKind::Architect => &["multiplexer"],
        _ => &[],
    }
}

/// Outcome of one run, as reported by the simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    /// Highest wave fully completed.
    pub waves_completed: u32,
    pub currency_earned: u32,
    pub bosses_defeated: Vec<EnemyKind>,
    pub kills: u32,
    pub victory: bool,
}

/// Fold a finished run into the meta record. Returns the ids newly unlocked.
pub fn settle_run(meta: &mut MetaProgress, run: &RunSummary) -> Vec<String> {
    meta.currency += run.currency_earned as u64;
    meta.runs_completed += 1;
    meta.max_wave_completed = meta.max_wave_completed.max(run.waves_completed);

    let mut unlocked = Vec::new();
    for boss in &run.bosses_defeated {
        if let Some(id) = boss.boss_id() {
            meta.defeated_bosses.insert(id.to_string());
        }
        for item in boss_unlocks(*boss) {
            if meta.unlocked_items.insert(item.to_string()) {
                unlocked.push(item.to_string());
            }
        }
    }
    if !unlocked.is_empty() {
        tracing::info!(items = ?unlocked, "unlocked new items");
    }
    unlocked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purchase_spends_currency() {
        let mut meta = MetaProgress::default();
        meta.currency = 500;
        let cost = purchase_upgrade(&mut meta, "might").unwrap();
        assert_eq!(cost, 120);
        assert_eq!(meta.currency, 380);
        assert_eq!(meta.upgrade_level("might"), 1);
        // Second level costs double.
        assert_eq!(purchase_upgrade(&mut meta, "might").unwrap(), 240);
    }

    #[test]
    fn purchase_fails_without_funds() {
        let mut meta = MetaProgress::default();
        meta.currency = 10;
        assert_eq!(
            purchase_upgrade(&mut meta, "greed"),
            Err(PurchaseError::Insufficient { have: 10, need: 80 })
        );
        assert_eq!(meta.upgrade_level("greed"), 0);
    }

    #[test]
    fn purchase_stops_at_max_level() {
        let mut meta = MetaProgress::default();
        meta.currency = 10_000;
        purchase_upgrade(&mut meta, "revival").unwrap();
        purchase_upgrade(&mut meta, "revival").unwrap();
        assert_eq!(
            purchase_upgrade(&mut meta, "revival"),
            Err(PurchaseError::MaxLevel("revival"))
        );
        assert!(matches!(
            purchase_upgrade(&mut meta, "teleport"),
            Err(PurchaseError::Unknown(_))
        ));
    }

    #[test]
    fn permanent_upgrades_shape_new_player() {
        let mut meta = MetaProgress::default();
        meta.permanent_upgrades.insert("vitality".into(), 2);
        meta.permanent_upgrades.insert("revival".into(), 9);
        meta.permanent_upgrades.insert("obsolete".into(), 3);
        let mut player = Player::new();
        apply_permanent_upgrades(&mut player, &meta);
        assert_eq!(player.max_health, 120.0);
        assert_eq!(player.health, 120.0);
        // Clamped to the upgrade's max level.
        assert_eq!(player.extra_lives, 2);
    }

    #[test]
    fn settle_run_records_progress_and_unlocks() {
        let mut meta = MetaProgress::default();
        meta.max_wave_completed = 9;
        let run = RunSummary {
            seed: 1,
            waves_completed: 7,
            currency_earned: 64,
            bosses_defeated: vec![EnemyKind::Overseer],
            kills: 300,
            victory: false,
        };
        let unlocked = settle_run(&mut meta, &run);
        assert_eq!(meta.currency, 64);
        assert_eq!(meta.runs_completed, 1);
        assert_eq!(meta.max_wave_completed, 9);
        assert!(meta.defeated_bosses.contains("boss_overseer"));
        assert_eq!(unlocked, vec!["prism_lance", "reactive_plating"]);

        // Beating the same boss again unlocks nothing new.
        assert!(settle_run(&mut meta, &run).is_empty());
        assert_eq!(meta.runs_completed, 2);
    }
}
