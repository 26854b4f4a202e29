//! Level-up draft: builds the eligible option pool for the player's current
//! loadout and samples three distinct options by rarity weight.

use glitchrun_core::components::Weapon;
use glitchrun_core::constants::*;
use glitchrun_core::enums::{ArtifactKind, AugmentKind, Rarity, WeaponKind};
use glitchrun_core::meta::MetaProgress;
use glitchrun_core::player::Player;
use glitchrun_core::state::OptionView;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{self, GlitchKind, StatBoost};

/// Options offered per draft.
pub const DRAFT_SIZE: usize = 3;

/// Weight for a rarity missing from the table.
pub const DEFAULT_RARITY_WEIGHT: u32 = 10;

const RARITY_WEIGHTS: &[(Rarity, u32)] = &[
    (Rarity::Common, 50),
    (Rarity::Uncommon, 30),
    (Rarity::Rare, 15),
    (Rarity::Legendary, 5),
    (Rarity::Glitch, 1),
];

pub fn rarity_weight(rarity: Rarity) -> u32 {
    RARITY_WEIGHTS
        .iter()
        .find(|(r, _)| *r == rarity)
        .map(|(_, w)| *w)
        .unwrap_or(DEFAULT_RARITY_WEIGHT)
}

/// What picking an option does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UpgradeEffect {
    NewWeapon(WeaponKind),
    LevelUp { weapon: WeaponKind, level: u32 },
    /// Reaching the augment level opens the two-way augment choice instead of
    /// applying stats directly.
    AugmentTrigger(WeaponKind),
    /// Flat damage bonus for weapons past their authored levels.
    Overclock(WeaponKind),
    NewArtifact(ArtifactKind),
    Glitch(GlitchKind),
    Stat(StatBoost),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeOption {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rarity: Rarity,
    pub effect: UpgradeEffect,
}

impl UpgradeOption {
    pub fn view(&self) -> OptionView {
        OptionView {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            rarity: self.rarity,
        }
    }

    /// Apply the option to the player.
    pub fn apply(&self, player: &mut Player) -> ApplyOutcome {
        match self.effect {
            UpgradeEffect::NewWeapon(kind) => {
                if !player.has_weapon(kind) {
                    player
                        .weapons
                        .push(Weapon::new(kind, catalog::base_stats(kind)));
                }
            }
            UpgradeEffect::LevelUp { weapon, level } => {
                if let Some(w) = player.weapon_mut(weapon) {
                    apply_level(w, level);
                }
            }
            UpgradeEffect::AugmentTrigger(weapon) => {
                return ApplyOutcome::AugmentChoice {
                    weapon,
                    options: augment_options(weapon),
                };
            }
            UpgradeEffect::Overclock(weapon) => {
                if let Some(w) = player.weapon_mut(weapon) {
                    w.stats.damage *= 1.0 + OVERCLOCK_DAMAGE_BONUS;
                    w.level += 1;
                }
            }
            UpgradeEffect::NewArtifact(kind) => {
                if !player.artifacts.contains(&kind) && player.artifacts.len() < MAX_ARTIFACTS {
                    player.artifacts.push(kind);
                    catalog::apply_artifact(&mut player.stats, kind);
                }
            }
            UpgradeEffect::Glitch(glitch) => glitch.apply(player),
            UpgradeEffect::Stat(boost) => boost.apply(player),
        }
        ApplyOutcome::Applied
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    Applied,
    /// The player must now choose one of two augments for `weapon`.
    AugmentChoice {
        weapon: WeaponKind,
        options: [AugmentOption; 2],
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentOption {
    pub augment: AugmentKind,
    pub name: String,
    pub description: String,
}

impl AugmentOption {
    pub fn view(&self) -> OptionView {
        OptionView {
            id: self.augment.id().to_string(),
            name: self.name.clone(),
            description: self.description.clone(),
            rarity: Rarity::Legendary,
        }
    }
}

/// Exactly two augment options for `weapon`.
pub fn augment_options(weapon: WeaponKind) -> [AugmentOption; 2] {
    catalog::augment_pair(weapon).map(|augment| AugmentOption {
        augment,
        name: catalog::augment_name(augment).to_string(),
        description: catalog::augment_description(augment).to_string(),
    })
}

/// Record the chosen augment and apply the augment-level stat entry.
/// Returns false if the player doesn't own the weapon or the augment
/// belongs to a different weapon.
pub fn apply_augment(player: &mut Player, weapon: WeaponKind, augment: AugmentKind) -> bool {
    if !catalog::augment_pair(weapon).contains(&augment) {
        return false;
    }
    let Some(w) = player.weapon_mut(weapon) else {
        return false;
    };
    let next = w.level + 1;
    apply_level(w, next);
    w.augment = Some(augment);
    true
}

fn apply_level(weapon: &mut Weapon, level: u32) {
    if let Some(entry) = catalog::level_entry(weapon.kind, level) {
        for delta in entry.deltas {
            delta.apply(&mut weapon.stats);
        }
    }
    weapon.level = level;
}

/// Draw three distinct options for the player's next level-up.
pub fn generate_upgrades<R: Rng>(
    player: &Player,
    meta: &MetaProgress,
    rng: &mut R,
) -> Vec<UpgradeOption> {
    let pool = build_pool(player, meta);
    sample_weighted(pool, |o| rarity_weight(o.rarity), DRAFT_SIZE, rng)
}

/// Every option the player is currently eligible for.
pub fn build_pool(player: &Player, meta: &MetaProgress) -> Vec<UpgradeOption> {
    let mut pool = Vec::new();

    // Upgrades for permanent weapons. Temporary weapons aren't drafted.
    for weapon in player.weapons.iter().filter(|w| w.expires_at_tick.is_none()) {
        pool.push(weapon_upgrade(weapon));
    }

    if player.permanent_weapon_count() < MAX_WEAPONS {
        for kind in WeaponKind::ALL {
            if !player.has_weapon(kind) && meta.weapon_unlocked(kind) {
                pool.push(UpgradeOption {
                    id: format!("weapon:{}", kind.id()),
                    name: kind.display_name().to_string(),
                    description: format!("New weapon: {}", kind.display_name()),
                    rarity: new_weapon_rarity(kind),
                    effect: UpgradeEffect::NewWeapon(kind),
                });
            }
        }
    }

    if player.artifacts.len() < MAX_ARTIFACTS {
        for kind in ArtifactKind::ALL {
            if !player.artifacts.contains(&kind) && meta.artifact_unlocked(kind) {
                pool.push(UpgradeOption {
                    id: format!("artifact:{}", kind.id()),
                    name: catalog::artifact_name(kind).to_string(),
                    description: catalog::artifact_description(kind).to_string(),
                    rarity: catalog::artifact_rarity(kind),
                    effect: UpgradeEffect::NewArtifact(kind),
                });
            }
        }
    }

    for glitch in GlitchKind::ALL {
        pool.push(UpgradeOption {
            id: format!("glitch:{}", glitch.id()),
            name: glitch.name().to_string(),
            description: glitch.description().to_string(),
            rarity: Rarity::Glitch,
            effect: UpgradeEffect::Glitch(glitch),
        });
    }

    for boost in StatBoost::ALL {
        pool.push(UpgradeOption {
            id: format!("stat:{}", boost.id()),
            name: boost.name().to_string(),
            description: boost.description().to_string(),
            rarity: boost.rarity(),
            effect: UpgradeEffect::Stat(boost),
        });
    }

    pool
}

fn new_weapon_rarity(kind: WeaponKind) -> Rarity {
    match kind {
        WeaponKind::PrismLance | WeaponKind::HaloDrive | WeaponKind::ParadoxPendulum => {
            Rarity::Rare
        }
        _ => Rarity::Uncommon,
    }
}

fn weapon_upgrade(weapon: &Weapon) -> UpgradeOption {
    let kind = weapon.kind;
    let next = weapon.level + 1;
    let name = kind.display_name();

    if next == AUGMENT_LEVEL && weapon.augment.is_none() {
        return UpgradeOption {
            id: format!("augment:{}", kind.id()),
            name: format!("{} Augment", name),
            description: "Choose one of two specializations".to_string(),
            rarity: Rarity::Rare,
            effect: UpgradeEffect::AugmentTrigger(kind),
        };
    }

    match catalog::level_entry(kind, next) {
        Some(entry) => UpgradeOption {
            id: format!("level:{}:{}", kind.id(), next),
            name: format!("{} Lv {}", name, next),
            description: entry.description.to_string(),
            rarity: Rarity::Common,
            effect: UpgradeEffect::LevelUp { weapon: kind, level: next },
        },
        None => UpgradeOption {
            id: format!("overclock:{}", kind.id()),
            name: format!("{} Overclock", name),
            description: format!("+{}% damage", (OVERCLOCK_DAMAGE_BONUS * 100.0).round()),
            rarity: Rarity::Common,
            effect: UpgradeEffect::Overclock(kind),
        },
    }
}

/// Sample up to `picks` items without replacement. Each draw rolls a uniform
/// value in [0, total weight) and walks the cumulative weights of the
/// remaining items in their original order.
pub fn sample_weighted<T, R: Rng>(
    mut pool: Vec<T>,
    weight: impl Fn(&T) -> u32,
    picks: usize,
    rng: &mut R,
) -> Vec<T> {
    let mut chosen = Vec::with_capacity(picks.min(pool.len()));
    while chosen.len() < picks && !pool.is_empty() {
        let total: u64 = pool.iter().map(|item| weight(item) as u64).sum();
        if total == 0 {
            break;
        }
        let roll = rng.gen::<f64>() * total as f64;
        let mut acc = 0.0;
        let mut index = pool.len() - 1;
        for (i, item) in pool.iter().enumerate() {
            acc += weight(item) as f64;
            if roll < acc {
                index = i;
                break;
            }
        }
        chosen.push(pool.remove(index));
    }
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn player_with(weapons: &[WeaponKind]) -> Player {
        let mut player = Player::new();
        for kind in weapons {
            player
                .weapons
                .push(Weapon::new(*kind, catalog::base_stats(*kind)));
        }
        player
    }

    #[test]
    fn unlisted_rarity_gets_default_weight() {
        assert_eq!(rarity_weight(Rarity::Special), DEFAULT_RARITY_WEIGHT);
        assert_eq!(rarity_weight(Rarity::Common), 50);
        assert_eq!(rarity_weight(Rarity::Glitch), 1);
    }

    #[test]
    fn draft_has_three_distinct_options() {
        let player = player_with(&[WeaponKind::PulseBlaster]);
        let meta = MetaProgress::default();
        for seed in 0..50 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let draft = generate_upgrades(&player, &meta, &mut rng);
            assert_eq!(draft.len(), DRAFT_SIZE);
            let mut ids: Vec<&str> = draft.iter().map(|o| o.id.as_str()).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), DRAFT_SIZE, "duplicate option for seed {}", seed);
        }
    }

    #[test]
    fn no_new_weapons_at_weapon_cap() {
        let player = player_with(&[
            WeaponKind::PulseBlaster,
            WeaponKind::ArcCoil,
            WeaponKind::SeekerSwarm,
        ]);
        let pool = build_pool(&player, &MetaProgress::default());
        assert!(!pool
            .iter()
            .any(|o| matches!(o.effect, UpgradeEffect::NewWeapon(_))));
    }

    #[test]
    fn temporary_weapons_do_not_count_toward_cap() {
        let mut player = player_with(&[WeaponKind::PulseBlaster, WeaponKind::ArcCoil]);
        let mut temp = Weapon::new(WeaponKind::HaloDrive, catalog::base_stats(WeaponKind::HaloDrive));
        temp.expires_at_tick = Some(600);
        player.weapons.push(temp);
        let pool = build_pool(&player, &MetaProgress::default());
        assert!(pool
            .iter()
            .any(|o| o.effect == UpgradeEffect::NewWeapon(WeaponKind::SeekerSwarm)));
        // The temporary weapon never gets level-ups.
        assert!(!pool.iter().any(|o| o.id.contains("halo_drive")));
    }

    #[test]
    fn locked_weapons_are_not_offered() {
        let player = Player::new();
        let pool = build_pool(&player, &MetaProgress::default());
        assert!(!pool
            .iter()
            .any(|o| o.effect == UpgradeEffect::NewWeapon(WeaponKind::PrismLance)));
    }

    #[test]
    fn level_four_weapon_offers_augment_trigger() {
        let mut player = player_with(&[WeaponKind::ArcCoil]);
        player.weapons[0].level = 4;
        let pool = build_pool(&player, &MetaProgress::default());
        assert!(pool
            .iter()
            .any(|o| o.effect == UpgradeEffect::AugmentTrigger(WeaponKind::ArcCoil)));
    }

    #[test]
    fn augment_flow_applies_level_five() {
        let mut player = player_with(&[WeaponKind::PulseBlaster]);
        player.weapons[0].level = 4;
        let before = player.weapons[0].stats;

        let option = weapon_upgrade(&player.weapons[0]);
        let outcome = option.apply(&mut player);
        let ApplyOutcome::AugmentChoice { weapon, options } = outcome else {
            panic!("expected augment choice");
        };
        assert_eq!(weapon, WeaponKind::PulseBlaster);
        assert_eq!(options.len(), 2);
        // Nothing changes until the augment is picked.
        assert_eq!(player.weapons[0].level, 4);

        assert!(apply_augment(&mut player, weapon, options[1].augment));
        let w = &player.weapons[0];
        assert_eq!(w.level, 5);
        assert_eq!(w.augment, Some(AugmentKind::Railgun));
        assert_eq!(w.stats.pierce, before.pierce + 1);
        assert!((w.stats.damage - (before.damage + 5.0)).abs() < 1e-4);
    }

    #[test]
    fn foreign_augment_is_rejected() {
        let mut player = player_with(&[WeaponKind::PulseBlaster]);
        assert!(!apply_augment(&mut player, WeaponKind::PulseBlaster, AugmentKind::Overload));
        assert_eq!(player.weapons[0].augment, None);
    }

    #[test]
    fn overclock_past_authored_levels() {
        let mut player = player_with(&[WeaponKind::Recursor]);
        player.weapons[0].level = 8;
        player.weapons[0].augment = Some(AugmentKind::Serrated);
        let option = weapon_upgrade(&player.weapons[0]);
        assert_eq!(option.effect, UpgradeEffect::Overclock(WeaponKind::Recursor));
        let damage = player.weapons[0].stats.damage;
        option.apply(&mut player);
        assert!((player.weapons[0].stats.damage - damage * 1.1).abs() < 1e-4);
        assert_eq!(player.weapons[0].level, 9);
    }

    #[test]
    fn sampling_small_pool_returns_everything_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let picked = sample_weighted(vec![1, 2], |_| 5, 3, &mut rng);
        assert_eq!(picked.len(), 2);
        assert_ne!(picked[0], picked[1]);
    }

    #[test]
    fn remaining_pool_keeps_its_order() {
        // A zero roll always lands on the first remaining item.
        let mut rng = rand::rngs::mock::StepRng::new(0, 0);
        let picked = sample_weighted(vec!["a", "b", "c", "d"], |_| 10, 3, &mut rng);
        assert_eq!(picked, vec!["a", "b", "c"]);
    }

    #[test]
    fn heavier_options_win_more_often() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut heavy = 0;
        for _ in 0..2000 {
            let picked = sample_weighted(vec!["heavy", "light"], |s| if *s == "heavy" { 90 } else { 10 }, 1, &mut rng);
            if picked[0] == "heavy" {
                heavy += 1;
            }
        }
        assert!(heavy > 1600 && heavy < 1990, "heavy picked {} times", heavy);
    }
}
