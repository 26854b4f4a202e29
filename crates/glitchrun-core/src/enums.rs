//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Enemy archetype. Indexes the enemy stat table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Weak, numerous melee chaser.
    Swarmer,
    /// Fast, fragile chaser.
    Runner,
    /// Slow, heavily armored chaser.
    Brute,
    /// Spawns in linked pairs; the link beam hurts the player.
    TwinNode,
    /// One segment of a ring that orbits a drifting center.
    RingSegment,
    /// Squad leader; chases the player directly.
    SquadLeader,
    /// Squad flanker; cuts off the player from the side.
    SquadFlanker,
    /// Mission target spawned by elimination objectives.
    Elite,
    Overseer,
    Hydra,
    Leviathan,
    Architect,
}

impl EnemyKind {
    pub fn is_boss(&self) -> bool {
        matches!(
            self,
            Self::Overseer | Self::Hydra | Self::Leviathan | Self::Architect
        )
    }

    /// Hard-coded boss id recorded in meta progress when the boss is defeated.
    pub fn boss_id(&self) -> Option<&'static str> {
        match self {
            Self::Overseer => Some("boss_overseer"),
            Self::Hydra => Some("boss_hydra"),
            Self::Leviathan => Some("boss_leviathan"),
            Self::Architect => Some("boss_architect"),
            _ => None,
        }
    }

    /// Admission priority when a spawn batch must be truncated. Higher survives.
    pub fn spawn_priority(&self) -> u8 {
        match self {
            k if k.is_boss() => 3,
            Self::Elite => 2,
            Self::Brute | Self::TwinNode | Self::SquadLeader => 1,
            _ => 0,
        }
    }
}

/// Weapon kind. Keys the behavior registry, the base stat table and the
/// level-up table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Aimed bolts at the nearest targets.
    PulseBlaster,
    /// Chain lightning that bounces between nearby enemies.
    ArcCoil,
    /// Homing micro-missiles.
    SeekerSwarm,
    /// Boomerang discs that fly out and return.
    Recursor,
    /// Short-lived piercing beam.
    PrismLance,
    /// Orbs orbiting the player.
    HaloDrive,
    /// Blade swinging around where the player used to be.
    ParadoxPendulum,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 7] = [
        Self::PulseBlaster,
        Self::ArcCoil,
        Self::SeekerSwarm,
        Self::Recursor,
        Self::PrismLance,
        Self::HaloDrive,
        Self::ParadoxPendulum,
    ];

    /// Stable item id used by meta unlocks.
    pub fn id(&self) -> &'static str {
        match self {
            Self::PulseBlaster => "pulse_blaster",
            Self::ArcCoil => "arc_coil",
            Self::SeekerSwarm => "seeker_swarm",
            Self::Recursor => "recursor",
            Self::PrismLance => "prism_lance",
            Self::HaloDrive => "halo_drive",
            Self::ParadoxPendulum => "paradox_pendulum",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PulseBlaster => "Pulse Blaster",
            Self::ArcCoil => "Arc Coil",
            Self::SeekerSwarm => "Seeker Swarm",
            Self::Recursor => "Recursor",
            Self::PrismLance => "Prism Lance",
            Self::HaloDrive => "Halo Drive",
            Self::ParadoxPendulum => "Paradox Pendulum",
        }
    }
}

/// Weapon specialization chosen at level 5. Each weapon offers exactly two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AugmentKind {
    Scattershot,
    Railgun,
    StormConduit,
    Overload,
    ClusterPayload,
    HunterKiller,
    Serrated,
    Twinrang,
    Refractor,
    Overcharge,
    EternalOrbit,
    Supernova,
    TimeLoop,
    Singularity,
}

impl AugmentKind {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Scattershot => "scattershot",
            Self::Railgun => "railgun",
            Self::StormConduit => "storm_conduit",
            Self::Overload => "overload",
            Self::ClusterPayload => "cluster_payload",
            Self::HunterKiller => "hunter_killer",
            Self::Serrated => "serrated",
            Self::Twinrang => "twinrang",
            Self::Refractor => "refractor",
            Self::Overcharge => "overcharge",
            Self::EternalOrbit => "eternal_orbit",
            Self::Supernova => "supernova",
            Self::TimeLoop => "time_loop",
            Self::Singularity => "singularity",
        }
    }

    /// Augments whose projectiles never expire on their own.
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::EternalOrbit)
    }
}

/// Passive item held by the player (max 3 per run).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    OverclockedCore,
    HeatSink,
    MagnetCoil,
    NanoRepair,
    ReactivePlating,
    Multiplexer,
    DataMiner,
    CryptoWallet,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 8] = [
        Self::OverclockedCore,
        Self::HeatSink,
        Self::MagnetCoil,
        Self::NanoRepair,
        Self::ReactivePlating,
        Self::Multiplexer,
        Self::DataMiner,
        Self::CryptoWallet,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::OverclockedCore => "overclocked_core",
            Self::HeatSink => "heat_sink",
            Self::MagnetCoil => "magnet_coil",
            Self::NanoRepair => "nano_repair",
            Self::ReactivePlating => "reactive_plating",
            Self::Multiplexer => "multiplexer",
            Self::DataMiner => "data_miner",
            Self::CryptoWallet => "crypto_wallet",
        }
    }
}

/// Objective active during a wave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissionType {
    /// Stay alive for a number of seconds.
    #[default]
    Survive,
    /// Destroy a number of elite targets.
    Eliminate,
    /// Stay inside a zone for a number of ticks.
    HoldPosition,
    /// Destroy a number of enemies of any kind.
    Purge,
    /// Collect the data shards scattered around the arena.
    DataRetrieval,
    /// Stay near a payload until it has travelled its route.
    Escort,
    /// Defeat the wave's boss.
    Boss,
}

/// Draft option rarity. Drives the sampling weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
    Glitch,
    /// Promotional offers outside the rarity ladder.
    Special,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Playing,
    Paused,
    /// Waiting for the player to pick a draft option.
    LevelUp,
    /// Waiting for the player to pick one of two augments.
    AugmentSelect,
    GameOver,
    Victory,
}

/// Coarse playback profile for the audio collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioProfile {
    Menu,
    Playing,
    Paused,
    LevelUp,
}

impl From<GamePhase> for AudioProfile {
    fn from(phase: GamePhase) -> Self {
        match phase {
            GamePhase::MainMenu | GamePhase::GameOver | GamePhase::Victory => Self::Menu,
            GamePhase::Playing => Self::Playing,
            GamePhase::Paused => Self::Paused,
            GamePhase::LevelUp | GamePhase::AugmentSelect => Self::LevelUp,
        }
    }
}

/// Telemetry event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TelemetryKind {
    RunStart,
    WaveComplete,
    Death,
    LootPickup,
}

/// Display color of an entity. The renderer maps these to its palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorTag {
    #[default]
    White,
    Cyan,
    Magenta,
    Yellow,
    Red,
    Green,
    Orange,
    Violet,
}

/// Role of an enemy inside a squad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SquadRole {
    Leader,
    /// Flanker assigned to one side of the player (-1 or +1).
    Flanker { side: i8 },
}

/// Boomerang flight phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoomerangPhase {
    #[default]
    Outbound,
    Returning,
}
