//! Core types and definitions for the GLITCHRUN simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, the player model, commands, state snapshots, events, and
//! tuning constants. It has no dependency on any runtime or rendering layer.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod meta;
pub mod player;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
