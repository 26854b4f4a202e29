//! The player: motion state, vitals, progression and loadout.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::Weapon;
use crate::constants::*;
use crate::enums::{ArtifactKind, WeaponKind};

/// Multiplicative and flat modifiers accumulated from drafts, artifacts and
/// permanent upgrades.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatMultipliers {
    pub damage: f32,
    /// Scales weapon cooldowns; lower is faster.
    pub cooldown: f32,
    pub area: f32,
    /// Scales both movement and projectile speed.
    pub speed: f32,
    pub magnet: f32,
    pub xp: f32,
    pub currency: f32,
    /// Flat damage reduction per hit.
    pub armor: f32,
    /// Health regenerated per second.
    pub regen: f32,
    /// Flat bonus added to every weapon's projectile count.
    pub projectile_count: u32,
}

impl Default for StatMultipliers {
    fn default() -> Self {
        Self {
            damage: 1.0,
            cooldown: 1.0,
            area: 1.0,
            speed: 1.0,
            magnet: 1.0,
            xp: 1.0,
            currency: 1.0,
            armor: 0.0,
            regen: 0.0,
            projectile_count: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Facing in radians (0 = +x).
    pub rotation: f32,
    pub radius: f32,
    pub health: f32,
    pub max_health: f32,
    pub extra_lives: u32,
    pub xp: u32,
    pub level: u32,
    pub next_level_xp: u32,
    /// Level-ups earned but not yet drafted.
    pub owed_level_ups: u32,
    /// Currency collected this run.
    pub currency: u32,
    /// Acquisition order.
    pub weapons: Vec<Weapon>,
    pub artifacts: Vec<ArtifactKind>,
    pub stats: StatMultipliers,
    /// Most recent position last.
    pub history: VecDeque<Vec2>,
    pub invuln_ticks: u32,
    pub overdrive_ticks: u32,
    pub kills: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            radius: PLAYER_RADIUS,
            health: PLAYER_BASE_HEALTH,
            max_health: PLAYER_BASE_HEALTH,
            extra_lives: 0,
            xp: 0,
            level: 1,
            next_level_xp: xp_threshold(1),
            owed_level_ups: 0,
            currency: 0,
            weapons: Vec::new(),
            artifacts: Vec::new(),
            stats: StatMultipliers::default(),
            history: VecDeque::with_capacity(POSITION_HISTORY_LEN),
            invuln_ticks: 0,
            overdrive_ticks: 0,
            kills: 0,
        }
    }

    /// Add XP (scaled by the xp multiplier). Returns the number of levels gained;
    /// each one is owed a draft.
    pub fn gain_xp(&mut self, amount: u32) -> u32 {
        let scaled = (amount as f32 * self.stats.xp).round() as u32;
        self.xp = self.xp.saturating_add(scaled);
        let mut gained = 0;
        while self.xp >= self.next_level_xp {
            self.xp -= self.next_level_xp;
            self.level += 1;
            self.next_level_xp = xp_threshold(self.level);
            gained += 1;
        }
        self.owed_level_ups += gained;
        gained
    }

    /// Add currency scaled by the currency multiplier. Returns the amount added.
    pub fn gain_currency(&mut self, amount: u32) -> u32 {
        let scaled = (amount as f32 * self.stats.currency).round() as u32;
        self.currency = self.currency.saturating_add(scaled);
        scaled
    }

    /// Apply a hit after armor. Returns the damage taken, 0 while invulnerable.
    pub fn take_damage(&mut self, raw: f32) -> f32 {
        if self.invuln_ticks > 0 || raw <= 0.0 {
            return 0.0;
        }
        let dealt = (raw - self.stats.armor).max(MIN_DAMAGE_AFTER_ARMOR);
        self.health = (self.health - dealt).max(0.0);
        self.invuln_ticks = PLAYER_INVULN_TICKS;
        dealt
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount.max(0.0)).min(self.max_health);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Spend an extra life to come back at full health.
    pub fn try_revive(&mut self) -> bool {
        if self.extra_lives == 0 {
            return false;
        }
        self.extra_lives -= 1;
        self.health = self.max_health;
        self.invuln_ticks = PLAYER_INVULN_TICKS * 4;
        true
    }

    pub fn has_weapon(&self, kind: WeaponKind) -> bool {
        self.weapons.iter().any(|w| w.kind == kind)
    }

    pub fn weapon(&self, kind: WeaponKind) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.kind == kind)
    }

    pub fn weapon_mut(&mut self, kind: WeaponKind) -> Option<&mut Weapon> {
        self.weapons.iter_mut().find(|w| w.kind == kind)
    }

    /// Weapons that count toward the draft limit (temporary ones don't).
    pub fn permanent_weapon_count(&self) -> usize {
        self.weapons
            .iter()
            .filter(|w| w.expires_at_tick.is_none())
            .count()
    }

    pub fn magnet_radius(&self) -> f32 {
        PLAYER_BASE_MAGNET_RADIUS * self.stats.magnet
    }

    /// Push a position sample, evicting the oldest past the history length.
    pub fn record_position(&mut self) {
        if self.history.len() == POSITION_HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(self.position);
    }

    /// Position `lag` samples ago, clamped to the oldest sample we have.
    pub fn past_position(&self, lag: usize) -> Vec2 {
        if self.history.is_empty() {
            return self.position;
        }
        let idx = self.history.len().saturating_sub(lag + 1);
        self.history[idx]
    }
}

/// XP needed to advance from `level` to `level + 1`.
pub fn xp_threshold(level: u32) -> u32 {
    let steps = level.saturating_sub(1);
    let growth = XP_THRESHOLD_GROWTH.powi(steps as i32);
    (XP_BASE_THRESHOLD as f32 * growth).round() as u32 + steps * XP_THRESHOLD_STEP
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gain_xp_accumulates_owed_levels() {
        let mut player = Player::new();
        let big = xp_threshold(1) + xp_threshold(2) + xp_threshold(3);
        let gained = player.gain_xp(big);
        assert_eq!(gained, 3);
        assert_eq!(player.level, 4);
        assert_eq!(player.owed_level_ups, 3);
        assert_eq!(player.xp, 0);
    }

    #[test]
    fn armor_never_reduces_hit_below_minimum() {
        let mut player = Player::new();
        player.stats.armor = 50.0;
        let dealt = player.take_damage(10.0);
        assert_eq!(dealt, MIN_DAMAGE_AFTER_ARMOR);
        // Invulnerable right after the hit.
        assert_eq!(player.take_damage(10.0), 0.0);
    }

    #[test]
    fn history_is_bounded() {
        let mut player = Player::new();
        for i in 0..(POSITION_HISTORY_LEN + 30) {
            player.position = Vec2::new(i as f32, 0.0);
            player.record_position();
        }
        assert_eq!(player.history.len(), POSITION_HISTORY_LEN);
        let newest = (POSITION_HISTORY_LEN + 29) as f32;
        assert_eq!(player.past_position(0).x, newest);
        assert_eq!(player.past_position(10).x, newest - 10.0);
        // Lag beyond the buffer clamps to the oldest sample.
        assert_eq!(player.past_position(10_000).x, 30.0);
    }

    #[test]
    fn revive_consumes_extra_life() {
        let mut player = Player::new();
        player.health = 0.0;
        assert!(!player.try_revive());
        player.extra_lives = 1;
        assert!(player.try_revive());
        assert_eq!(player.health, player.max_health);
        assert_eq!(player.extra_lives, 0);
    }
}
