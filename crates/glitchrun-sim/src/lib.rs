//! Simulation engine for GLITCHRUN.
//!
//! Owns the hecs ECS world, runs systems at a fixed tick rate,
//! and produces GameStateSnapshots for the renderer.

pub mod collaborators;
pub mod config;
pub mod engine;
pub mod pool;
pub mod run;
pub mod spawner;
pub mod systems;

pub use engine::SimulationEngine;
pub use glitchrun_campaign as campaign;
pub use glitchrun_core as core;
