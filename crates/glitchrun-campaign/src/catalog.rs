//! Static item tables: weapon base stats and level-ups, augments, artifacts,
//! glitch mutations and flat stat boosts.

use glitchrun_core::components::WeaponStats;
use glitchrun_core::constants::PIERCE_UNLIMITED;
use glitchrun_core::enums::{ArtifactKind, AugmentKind, Rarity, WeaponKind};
use glitchrun_core::player::{Player, StatMultipliers};
use serde::{Deserialize, Serialize};

/// Base stat block for a freshly acquired weapon.
pub fn base_stats(kind: WeaponKind) -> WeaponStats {
    match kind {
        WeaponKind::PulseBlaster => WeaponStats {
            damage: 10.0,
            count: 1,
            pierce: 1,
            duration: 90,
            area: 1.0,
            speed: 9.0,
            cooldown: 45,
        },
        // For the arc coil, pierce is the extra bounce budget on top of the base bounces.
        WeaponKind::ArcCoil => WeaponStats {
            damage: 12.0,
            count: 1,
            pierce: 1,
            duration: 40,
            area: 1.0,
            speed: 14.0,
            cooldown: 70,
        },
        WeaponKind::SeekerSwarm => WeaponStats {
            damage: 8.0,
            count: 2,
            pierce: 1,
            duration: 150,
            area: 1.0,
            speed: 6.0,
            cooldown: 80,
        },
        WeaponKind::Recursor => WeaponStats {
            damage: 14.0,
            count: 1,
            pierce: 4,
            duration: 100,
            area: 1.0,
            speed: 8.0,
            cooldown: 90,
        },
        WeaponKind::PrismLance => WeaponStats {
            damage: 20.0,
            count: 1,
            pierce: 8,
            duration: 12,
            area: 1.0,
            speed: 0.0,
            cooldown: 110,
        },
        // Orbit and pendulum speeds are angular, in radians per tick.
        WeaponKind::HaloDrive => WeaponStats {
            damage: 6.0,
            count: 2,
            pierce: PIERCE_UNLIMITED,
            duration: 240,
            area: 1.0,
            speed: 0.06,
            cooldown: 300,
        },
        WeaponKind::ParadoxPendulum => WeaponStats {
            damage: 18.0,
            count: 1,
            pierce: PIERCE_UNLIMITED,
            duration: 180,
            area: 1.0,
            speed: 0.08,
            cooldown: 240,
        },
    }
}

/// One stat change applied by a level-up entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatDelta {
    Damage(f32),
    Count(u32),
    Pierce(u32),
    Duration(u32),
    /// Fractional area increase.
    Area(f32),
    /// Fractional speed increase.
    Speed(f32),
    /// Fractional cooldown reduction.
    Cooldown(f32),
}

impl StatDelta {
    pub fn apply(&self, stats: &mut WeaponStats) {
        match *self {
            Self::Damage(d) => stats.damage += d,
            Self::Count(c) => stats.count += c,
            Self::Pierce(p) => {
                if stats.pierce != PIERCE_UNLIMITED {
                    stats.pierce = stats.pierce.saturating_add(p);
                }
            }
            Self::Duration(t) => stats.duration += t,
            Self::Area(f) => stats.area *= 1.0 + f,
            Self::Speed(f) => stats.speed *= 1.0 + f,
            Self::Cooldown(f) => {
                stats.cooldown = ((stats.cooldown as f32) * (1.0 - f)).round().max(1.0) as u32
            }
        }
    }
}

/// Authored level-up for one weapon level.
#[derive(Debug, Clone, Copy)]
pub struct LevelEntry {
    pub level: u32,
    pub description: &'static str,
    pub deltas: &'static [StatDelta],
}

use StatDelta::*;

const PULSE_LEVELS: &[LevelEntry] = &[
    LevelEntry { level: 2, description: "+5 damage", deltas: &[Damage(5.0)] },
    LevelEntry { level: 3, description: "+1 bolt", deltas: &[Count(1)] },
    LevelEntry { level: 4, description: "-10% cooldown", deltas: &[Cooldown(0.10)] },
    LevelEntry { level: 5, description: "+1 pierce, +5 damage", deltas: &[Pierce(1), Damage(5.0)] },
    LevelEntry { level: 6, description: "+1 bolt", deltas: &[Count(1)] },
    LevelEntry { level: 7, description: "+10 damage", deltas: &[Damage(10.0)] },
    LevelEntry { level: 8, description: "-15% cooldown", deltas: &[Cooldown(0.15)] },
];

const ARC_LEVELS: &[LevelEntry] = &[
    LevelEntry { level: 2, description: "+4 damage", deltas: &[Damage(4.0)] },
    LevelEntry { level: 3, description: "+1 bounce", deltas: &[Pierce(1)] },
    LevelEntry { level: 4, description: "-10% cooldown", deltas: &[Cooldown(0.10)] },
    LevelEntry { level: 5, description: "+1 arc", deltas: &[Count(1)] },
    LevelEntry { level: 6, description: "+6 damage", deltas: &[Damage(6.0)] },
    LevelEntry { level: 7, description: "+1 bounce", deltas: &[Pierce(1)] },
    LevelEntry { level: 8, description: "+1 arc", deltas: &[Count(1)] },
];

const SEEKER_LEVELS: &[LevelEntry] = &[
    LevelEntry { level: 2, description: "+1 missile", deltas: &[Count(1)] },
    LevelEntry { level: 3, description: "+4 damage", deltas: &[Damage(4.0)] },
    LevelEntry { level: 4, description: "+15% speed", deltas: &[Speed(0.15)] },
    LevelEntry { level: 5, description: "+1 missile", deltas: &[Count(1)] },
    LevelEntry { level: 6, description: "+5 damage", deltas: &[Damage(5.0)] },
    LevelEntry { level: 7, description: "-15% cooldown", deltas: &[Cooldown(0.15)] },
    LevelEntry { level: 8, description: "+2 missiles", deltas: &[Count(2)] },
];

const RECURSOR_LEVELS: &[LevelEntry] = &[
    LevelEntry { level: 2, description: "+6 damage", deltas: &[Damage(6.0)] },
    LevelEntry { level: 3, description: "+15% area", deltas: &[Area(0.15)] },
    LevelEntry { level: 4, description: "+1 disc", deltas: &[Count(1)] },
    LevelEntry { level: 5, description: "+2 pierce", deltas: &[Pierce(2)] },
    LevelEntry { level: 6, description: "+8 damage", deltas: &[Damage(8.0)] },
    LevelEntry { level: 7, description: "+1 disc", deltas: &[Count(1)] },
    LevelEntry { level: 8, description: "+30 ticks flight", deltas: &[Duration(30)] },
];

const PRISM_LEVELS: &[LevelEntry] = &[
    LevelEntry { level: 2, description: "+8 damage", deltas: &[Damage(8.0)] },
    LevelEntry { level: 3, description: "+20% length", deltas: &[Area(0.20)] },
    LevelEntry { level: 4, description: "-10% cooldown", deltas: &[Cooldown(0.10)] },
    LevelEntry { level: 5, description: "+1 beam", deltas: &[Count(1)] },
    LevelEntry { level: 6, description: "+12 damage", deltas: &[Damage(12.0)] },
    LevelEntry { level: 7, description: "+20% length", deltas: &[Area(0.20)] },
    LevelEntry { level: 8, description: "-15% cooldown", deltas: &[Cooldown(0.15)] },
];

const HALO_LEVELS: &[LevelEntry] = &[
    LevelEntry { level: 2, description: "+1 orb", deltas: &[Count(1)] },
    LevelEntry { level: 3, description: "+4 damage", deltas: &[Damage(4.0)] },
    LevelEntry { level: 4, description: "+15% radius", deltas: &[Area(0.15)] },
    LevelEntry { level: 5, description: "+2s uptime", deltas: &[Duration(120)] },
    LevelEntry { level: 6, description: "+1 orb", deltas: &[Count(1)] },
    LevelEntry { level: 7, description: "+20% spin", deltas: &[Speed(0.20)] },
    LevelEntry { level: 8, description: "+6 damage", deltas: &[Damage(6.0)] },
];

const PENDULUM_LEVELS: &[LevelEntry] = &[
    LevelEntry { level: 2, description: "+8 damage", deltas: &[Damage(8.0)] },
    LevelEntry { level: 3, description: "+15% reach", deltas: &[Area(0.15)] },
    LevelEntry { level: 4, description: "+1s swing", deltas: &[Duration(60)] },
    LevelEntry { level: 5, description: "+1 blade", deltas: &[Count(1)] },
    LevelEntry { level: 6, description: "+10 damage", deltas: &[Damage(10.0)] },
    LevelEntry { level: 7, description: "+20% swing speed", deltas: &[Speed(0.20)] },
    LevelEntry { level: 8, description: "+20% reach", deltas: &[Area(0.20)] },
];

pub fn level_table(kind: WeaponKind) -> &'static [LevelEntry] {
    match kind {
        WeaponKind::PulseBlaster => PULSE_LEVELS,
        WeaponKind::ArcCoil => ARC_LEVELS,
        WeaponKind::SeekerSwarm => SEEKER_LEVELS,
        WeaponKind::Recursor => RECURSOR_LEVELS,
        WeaponKind::PrismLance => PRISM_LEVELS,
        WeaponKind::HaloDrive => HALO_LEVELS,
        WeaponKind::ParadoxPendulum => PENDULUM_LEVELS,
    }
}

/// Authored entry for `level`, if the weapon has one.
pub fn level_entry(kind: WeaponKind, level: u32) -> Option<&'static LevelEntry> {
    level_table(kind).iter().find(|e| e.level == level)
}

/// The two augments a weapon offers at its augment level.
pub fn augment_pair(kind: WeaponKind) -> [AugmentKind; 2] {
    match kind {
        WeaponKind::PulseBlaster => [AugmentKind::Scattershot, AugmentKind::Railgun],
        WeaponKind::ArcCoil => [AugmentKind::StormConduit, AugmentKind::Overload],
        WeaponKind::SeekerSwarm => [AugmentKind::ClusterPayload, AugmentKind::HunterKiller],
        WeaponKind::Recursor => [AugmentKind::Serrated, AugmentKind::Twinrang],
        WeaponKind::PrismLance => [AugmentKind::Refractor, AugmentKind::Overcharge],
        WeaponKind::HaloDrive => [AugmentKind::EternalOrbit, AugmentKind::Supernova],
        WeaponKind::ParadoxPendulum => [AugmentKind::TimeLoop, AugmentKind::Singularity],
    }
}

pub fn augment_name(augment: AugmentKind) -> &'static str {
    match augment {
        AugmentKind::Scattershot => "Scattershot",
        AugmentKind::Railgun => "Railgun",
        AugmentKind::StormConduit => "Storm Conduit",
        AugmentKind::Overload => "Overload",
        AugmentKind::ClusterPayload => "Cluster Payload",
        AugmentKind::HunterKiller => "Hunter-Killer",
        AugmentKind::Serrated => "Serrated Edge",
        AugmentKind::Twinrang => "Twinrang",
        AugmentKind::Refractor => "Refractor",
        AugmentKind::Overcharge => "Overcharge",
        AugmentKind::EternalOrbit => "Eternal Orbit",
        AugmentKind::Supernova => "Supernova",
        AugmentKind::TimeLoop => "Time Loop",
        AugmentKind::Singularity => "Singularity",
    }
}

pub fn augment_description(augment: AugmentKind) -> &'static str {
    match augment {
        AugmentKind::Scattershot => "Each volley fans out two extra bolts",
        AugmentKind::Railgun => "Bolts pierce everything and fly 50% faster",
        AugmentKind::StormConduit => "Arcs bounce two more times",
        AugmentKind::Overload => "Arcs stun every enemy they strike",
        AugmentKind::ClusterPayload => "Double the missiles per volley",
        AugmentKind::HunterKiller => "Missiles turn twice as hard and hit 25% harder",
        AugmentKind::Serrated => "Discs make enemies bleed",
        AugmentKind::Twinrang => "Every disc is thrown in both directions",
        AugmentKind::Refractor => "The lance splits into three beams",
        AugmentKind::Overcharge => "The lance hits 50% harder and reaches 30% further",
        AugmentKind::EternalOrbit => "Orbs never expire",
        AugmentKind::Supernova => "Wider orbit with heavy knockback",
        AugmentKind::TimeLoop => "The blade anchors twice as far back in time",
        AugmentKind::Singularity => "The blade drags enemies toward it",
    }
}

/// Which weapon an augment belongs to.
pub fn augment_weapon(augment: AugmentKind) -> WeaponKind {
    WeaponKind::ALL
        .into_iter()
        .find(|w| augment_pair(*w).contains(&augment))
        .unwrap_or(WeaponKind::PulseBlaster)
}

pub fn artifact_name(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::OverclockedCore => "Overclocked Core",
        ArtifactKind::HeatSink => "Heat Sink",
        ArtifactKind::MagnetCoil => "Magnet Coil",
        ArtifactKind::NanoRepair => "Nano Repair",
        ArtifactKind::ReactivePlating => "Reactive Plating",
        ArtifactKind::Multiplexer => "Multiplexer",
        ArtifactKind::DataMiner => "Data Miner",
        ArtifactKind::CryptoWallet => "Crypto Wallet",
    }
}

pub fn artifact_description(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::OverclockedCore => "+15% damage",
        ArtifactKind::HeatSink => "-10% weapon cooldowns",
        ArtifactKind::MagnetCoil => "+40% pickup radius",
        ArtifactKind::NanoRepair => "Regenerate 0.5 health per second",
        ArtifactKind::ReactivePlating => "+2 armor",
        ArtifactKind::Multiplexer => "+1 projectile for every weapon",
        ArtifactKind::DataMiner => "+20% experience",
        ArtifactKind::CryptoWallet => "+30% currency",
    }
}

pub fn artifact_rarity(kind: ArtifactKind) -> Rarity {
    match kind {
        ArtifactKind::Multiplexer => Rarity::Legendary,
        _ => Rarity::Rare,
    }
}

/// Fold an artifact's passive bonus into the player's multipliers.
pub fn apply_artifact(stats: &mut StatMultipliers, kind: ArtifactKind) {
    match kind {
        ArtifactKind::OverclockedCore => stats.damage += 0.15,
        ArtifactKind::HeatSink => stats.cooldown *= 0.9,
        ArtifactKind::MagnetCoil => stats.magnet += 0.4,
        ArtifactKind::NanoRepair => stats.regen += 0.5,
        ArtifactKind::ReactivePlating => stats.armor += 2.0,
        ArtifactKind::Multiplexer => stats.projectile_count += 1,
        ArtifactKind::DataMiner => stats.xp += 0.2,
        ArtifactKind::CryptoWallet => stats.currency += 0.3,
    }
}

/// Mutation with a strong buff and a matching drawback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlitchKind {
    GlassCannon,
    OverclockBurn,
    BloatProtocol,
    MemoryLeak,
    BloodPact,
}

impl GlitchKind {
    pub const ALL: [GlitchKind; 5] = [
        Self::GlassCannon,
        Self::OverclockBurn,
        Self::BloatProtocol,
        Self::MemoryLeak,
        Self::BloodPact,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::GlassCannon => "glass_cannon",
            Self::OverclockBurn => "overclock_burn",
            Self::BloatProtocol => "bloat_protocol",
            Self::MemoryLeak => "memory_leak",
            Self::BloodPact => "blood_pact",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::GlassCannon => "Glass Cannon",
            Self::OverclockBurn => "Overclock Burn",
            Self::BloatProtocol => "Bloat Protocol",
            Self::MemoryLeak => "Memory Leak",
            Self::BloodPact => "Blood Pact",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::GlassCannon => "+60% damage, -40% max health",
            Self::OverclockBurn => "-30% cooldowns, -3 armor",
            Self::BloatProtocol => "+1 projectile for every weapon, -20% speed",
            Self::MemoryLeak => "+50% experience, -40% pickup radius",
            Self::BloodPact => "+1 extra life, -25% max health",
        }
    }

    pub fn apply(&self, player: &mut Player) {
        match self {
            Self::GlassCannon => {
                player.stats.damage += 0.6;
                scale_max_health(player, 0.6);
            }
            Self::OverclockBurn => {
                player.stats.cooldown *= 0.7;
                player.stats.armor -= 3.0;
            }
            Self::BloatProtocol => {
                player.stats.projectile_count += 1;
                player.stats.speed *= 0.8;
            }
            Self::MemoryLeak => {
                player.stats.xp += 0.5;
                player.stats.magnet *= 0.6;
            }
            Self::BloodPact => {
                player.extra_lives += 1;
                scale_max_health(player, 0.75);
            }
        }
    }
}

fn scale_max_health(player: &mut Player, factor: f32) {
    player.max_health = (player.max_health * factor).max(1.0);
    player.health = player.health.min(player.max_health);
}

/// Flat stat boosts that fill out the draft pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatBoost {
    Heal,
    Swiftness,
    Might,
    Expanse,
    Attraction,
    /// Promotional currency grant.
    Windfall,
}

impl StatBoost {
    pub const ALL: [StatBoost; 6] = [
        Self::Heal,
        Self::Swiftness,
        Self::Might,
        Self::Expanse,
        Self::Attraction,
        Self::Windfall,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Heal => "heal",
            Self::Swiftness => "swiftness",
            Self::Might => "might",
            Self::Expanse => "expanse",
            Self::Attraction => "attraction",
            Self::Windfall => "windfall",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Heal => "Patch Kit",
            Self::Swiftness => "Swiftness",
            Self::Might => "Might",
            Self::Expanse => "Expanse",
            Self::Attraction => "Attraction",
            Self::Windfall => "Windfall",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Heal => "Restore 30% of max health",
            Self::Swiftness => "+10% move and projectile speed",
            Self::Might => "+10% damage",
            Self::Expanse => "+10% area",
            Self::Attraction => "+25% pickup radius",
            Self::Windfall => "Gain 25 currency",
        }
    }

    pub fn rarity(&self) -> Rarity {
        match self {
            Self::Heal | Self::Swiftness | Self::Attraction => Rarity::Common,
            Self::Might | Self::Expanse => Rarity::Uncommon,
            Self::Windfall => Rarity::Special,
        }
    }

    pub fn apply(&self, player: &mut Player) {
        match self {
            Self::Heal => {
                let amount = player.max_health * 0.3;
                player.heal(amount);
            }
            Self::Swiftness => player.stats.speed += 0.1,
            Self::Might => player.stats.damage += 0.1,
            Self::Expanse => player.stats.area += 0.1,
            Self::Attraction => player.stats.magnet += 0.25,
            Self::Windfall => {
                player.gain_currency(25);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_weapon_has_an_augment_level_entry() {
        for kind in WeaponKind::ALL {
            assert!(
                level_entry(kind, glitchrun_core::constants::AUGMENT_LEVEL).is_some(),
                "{:?} is missing its augment level",
                kind
            );
        }
    }

    #[test]
    fn level_tables_are_contiguous() {
        for kind in WeaponKind::ALL {
            let levels: Vec<u32> = level_table(kind).iter().map(|e| e.level).collect();
            let expected: Vec<u32> = (2..=8).collect();
            assert_eq!(levels, expected, "{:?}", kind);
        }
    }

    #[test]
    fn augment_pairs_are_disjoint() {
        let mut seen = Vec::new();
        for kind in WeaponKind::ALL {
            for augment in augment_pair(kind) {
                assert!(!seen.contains(&augment));
                assert_eq!(augment_weapon(augment), kind);
                seen.push(augment);
            }
        }
        assert_eq!(seen.len(), 14);
    }

    #[test]
    fn unlimited_pierce_is_never_raised() {
        let mut stats = base_stats(WeaponKind::HaloDrive);
        Pierce(3).apply(&mut stats);
        assert_eq!(stats.pierce, PIERCE_UNLIMITED);
    }

    #[test]
    fn cooldown_never_drops_to_zero() {
        let mut stats = base_stats(WeaponKind::PulseBlaster);
        stats.cooldown = 1;
        Cooldown(0.9).apply(&mut stats);
        assert_eq!(stats.cooldown, 1);
    }

    #[test]
    fn glass_cannon_clamps_health() {
        let mut player = Player::new();
        GlitchKind::GlassCannon.apply(&mut player);
        assert!((player.max_health - 60.0).abs() < 1e-4);
        assert!(player.health <= player.max_health);
        assert!((player.stats.damage - 1.6).abs() < 1e-6);
    }
}
