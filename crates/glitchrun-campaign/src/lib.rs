//! Run progression for GLITCHRUN.
//!
//! Everything that decides *what* the player faces and *how* they grow:
//! the wave schedule, mission objectives, the upgrade draft, and the meta
//! progression that persists between runs. Pure logic over core types; the
//! simulation crate drives it once per tick.

pub mod catalog;
pub mod draft;
pub mod missions;
pub mod persistence;
pub mod progression;
pub mod waves;

pub use glitchrun_core as core;
