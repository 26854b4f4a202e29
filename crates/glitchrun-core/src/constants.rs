//! Simulation constants and tuning parameters.
//!
//! Distances are world units, speeds are units per tick, durations are ticks
//! unless the name says otherwise.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Camera ---

/// Half the visible width of the play field.
pub const VIEWPORT_HALF_WIDTH: f32 = 640.0;

/// Half the visible height of the play field.
pub const VIEWPORT_HALF_HEIGHT: f32 = 360.0;

/// Margin added around the viewport for the on-screen test.
pub const OFFSCREEN_MARGIN: f32 = 100.0;

// --- Population ---

/// Global live-enemy cap.
pub const GLOBAL_ENEMY_CAP: usize = 50;

/// Live-enemy cap while a hold-position objective is active.
pub const HOLD_POSITION_ENEMY_CAP: usize = 30;

/// Distance from the player at which regular spawns appear (just off-screen).
pub const ENEMY_SPAWN_DISTANCE: f32 = 780.0;

/// Per-wave multiplicative growth of enemy health and damage.
pub const ENEMY_SCALING_RATE: f32 = 1.06;

// --- Player ---

pub const PLAYER_RADIUS: f32 = 14.0;
pub const PLAYER_BASE_HEALTH: f32 = 100.0;

/// Top movement speed before the speed multiplier.
pub const PLAYER_BASE_SPEED: f32 = 3.2;

/// Fraction of the gap to target velocity closed each tick while steering.
pub const PLAYER_ACCEL: f32 = 0.18;

/// Velocity retained per tick with no input.
pub const PLAYER_FRICTION: f32 = 0.82;

/// Samples kept in the player's position history.
pub const POSITION_HISTORY_LEN: usize = 120;

/// Invulnerability granted after taking a hit.
pub const PLAYER_INVULN_TICKS: u32 = 30;

/// Minimum damage a hit deals after armor.
pub const MIN_DAMAGE_AFTER_ARMOR: f32 = 1.0;

pub const PLAYER_BASE_MAGNET_RADIUS: f32 = 90.0;

/// Bonus damage fraction while overdrive is active.
pub const OVERDRIVE_DAMAGE_BONUS: f32 = 0.5;

// --- Experience ---

/// XP required to go from level 1 to level 2.
pub const XP_BASE_THRESHOLD: u32 = 10;

/// Multiplicative growth of the XP threshold per level.
pub const XP_THRESHOLD_GROWTH: f32 = 1.18;

/// Flat growth of the XP threshold per level.
pub const XP_THRESHOLD_STEP: u32 = 4;

// --- Weapons ---

/// Maximum distinct weapons a player may draft.
pub const MAX_WEAPONS: usize = 3;

/// Maximum artifacts a player may draft.
pub const MAX_ARTIFACTS: usize = 3;

/// Weapon level whose draft option opens the augment choice.
pub const AUGMENT_LEVEL: u32 = 5;

/// Damage bonus of the generic overclock level-up.
pub const OVERCLOCK_DAMAGE_BONUS: f32 = 0.10;

/// Search radius for the next chain-lightning target.
pub const CHAIN_RANGE: f32 = 220.0;

/// Damage multiplier applied at each chain bounce.
pub const CHAIN_DAMAGE_FALLOFF: f32 = 0.8;

/// Base bounce budget of an arc coil bolt.
pub const CHAIN_BASE_BOUNCES: u32 = 2;

/// Sentinel pierce budget that is never consumed.
pub const PIERCE_UNLIMITED: u32 = u32::MAX;

/// Ticks between hit-list resets for projectiles that live indefinitely.
pub const ORBIT_REHIT_TICKS: u32 = 30;

/// Radians per tick a homing projectile may turn.
pub const HOMING_TURN_RATE: f32 = 0.12;

/// History samples the pendulum anchor lags behind the player.
pub const PENDULUM_HISTORY_LAG: usize = 60;

/// Beam half-width used for the beam-circle overlap test.
pub const BEAM_HALF_WIDTH: f32 = 6.0;

/// Ticks a temporary weapon from a supply drop stays equipped.
pub const TEMP_WEAPON_TICKS: u64 = 1200;

// --- Enemy status ---

pub const STUN_TICKS_ON_OVERLOAD: u32 = 20;
pub const SLOW_FACTOR: f32 = 0.5;
pub const BLEED_TICKS: u32 = 120;
pub const BLEED_DAMAGE_FRACTION: f32 = 0.02;

/// Speed multiplier of a twin node whose partner died.
pub const TWIN_ENRAGE_FACTOR: f32 = 1.5;

/// Half-width of the beam connecting two twin nodes.
pub const TWIN_LINK_HALF_WIDTH: f32 = 4.0;

/// Contact damage multiplier of a twin-node link beam, per tick of contact.
pub const TWIN_LINK_DAMAGE_FACTOR: f32 = 0.5;

/// Ring segment angular speed (radians per tick).
pub const RING_ANGULAR_SPEED: f32 = 0.02;
pub const RING_ORBIT_RADIUS: f32 = 120.0;
pub const RING_SEGMENT_COUNT: usize = 8;

/// Lateral offset of squad flankers from the player.
pub const SQUAD_FLANK_OFFSET: f32 = 160.0;

// --- Bosses ---

pub const BOSS_SUMMON_INTERVAL: u32 = 240;
pub const BOSS_SUMMON_COUNT: usize = 4;
pub const BOSS_CURRENCY_REWARD: u32 = 50;

// --- Pickups ---

pub const PICKUP_RADIUS: f32 = 8.0;
pub const PICKUP_MAGNET_SPEED: f32 = 7.0;
pub const CURRENCY_DROP_CHANCE: f64 = 0.08;
pub const HEALTH_DROP_CHANCE: f64 = 0.02;
pub const HEALTH_ORB_VALUE: u32 = 15;
pub const CURRENCY_CHIP_VALUE: u32 = 1;

// --- Waves & missions ---

/// Number of hand-authored waves at the start of a run.
pub const CURATED_WAVE_COUNT: u32 = 20;

/// Final wave of a run. Completing it is a victory.
pub const FINAL_WAVE: u32 = 100;

/// Survive duration of odd late-game waves (seconds).
pub const LATE_SURVIVE_SECS: u32 = 60;

/// Floor of the spawn interval as difficulty rises.
pub const MIN_SPAWN_INTERVAL: u32 = 12;

/// Late-game spawn interval before the difficulty reduction.
pub const LATE_BASE_SPAWN_INTERVAL: u32 = 40;

pub const HOLD_ZONE_RADIUS: f32 = 140.0;
pub const HOLD_ZONE_DISTANCE: f32 = 300.0;
pub const ESCORT_RADIUS: f32 = 160.0;
pub const ESCORT_SPEED: f32 = 0.8;
pub const DATA_SHARD_COUNT: u32 = 3;
pub const DATA_SHARD_DISTANCE: f32 = 450.0;

/// Distance from the player at which elimination targets appear.
pub const ELITE_SPAWN_DISTANCE: f32 = 500.0;

/// Distance elites keep from the player while circling.
pub const ELITE_KITE_DISTANCE: f32 = 220.0;
pub const ELITE_ORBIT_SPEED: f32 = 0.008;
