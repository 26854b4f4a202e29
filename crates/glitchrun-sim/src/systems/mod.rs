//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions that take `&mut World` (or `&World` for
//! read-only) plus whatever engine state they need. They do not own state.

pub mod chain;
pub mod cleanup;
pub mod combat;
pub mod enemy_ai;
pub mod movement;
pub mod pickups;
pub mod player_motion;
pub mod population;
pub mod projectiles;
pub mod snapshot;
pub mod weapons;
