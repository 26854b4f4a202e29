//! Player commands sent from the frontend to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

/// All possible player actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Run control ---
    /// Start a fresh run from the menu or an ended run.
    StartRun,
    Pause,
    Resume,
    /// Abandon the current run and return to the menu.
    ReturnToMenu,

    // --- Input ---
    /// Movement vector for the coming ticks. Clamped to magnitude 1.
    Move { x: f32, y: f32 },

    // --- Draft ---
    /// Pick one of the offered draft options.
    SelectUpgrade { index: usize },
    /// Pick one of the two offered augments.
    SelectAugment { index: usize },
}
