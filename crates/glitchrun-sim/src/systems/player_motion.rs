//! Player motion model: inertial steering plus per-tick vitals.

use glam::Vec2;

use glitchrun_core::constants::{DT, PLAYER_ACCEL, PLAYER_BASE_SPEED, PLAYER_FRICTION};
use glitchrun_core::player::Player;
use glitchrun_core::types::clamp_input;

/// Velocity below which an idle player is considered stopped.
const REST_SPEED: f32 = 0.01;

pub fn run(player: &mut Player, input: Vec2) {
    let input = clamp_input(input);
    if input.length_squared() > 0.0 {
        let target = input * PLAYER_BASE_SPEED * player.stats.speed;
        player.velocity += (target - player.velocity) * PLAYER_ACCEL;
    } else {
        player.velocity *= PLAYER_FRICTION;
        if player.velocity.length() < REST_SPEED {
            player.velocity = Vec2::ZERO;
        }
    }
    player.position += player.velocity;

    if !player.position.is_finite() || !player.velocity.is_finite() {
        let fallback = player
            .history
            .iter()
            .rev()
            .find(|p| p.is_finite())
            .copied()
            .unwrap_or(Vec2::ZERO);
        tracing::warn!(?fallback, "non-finite player state, resetting");
        player.position = fallback;
        player.velocity = Vec2::ZERO;
    }

    if player.velocity.length_squared() > REST_SPEED * REST_SPEED {
        player.rotation = player.velocity.y.atan2(player.velocity.x);
    }

    if !player.is_dead() && player.stats.regen > 0.0 {
        player.heal(player.stats.regen * DT);
    }
    player.invuln_ticks = player.invuln_ticks.saturating_sub(1);
    player.overdrive_ticks = player.overdrive_ticks.saturating_sub(1);
    player.record_position();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_eases_toward_top_speed() {
        let mut player = Player::new();
        run(&mut player, Vec2::X);
        assert!((player.velocity.x - PLAYER_BASE_SPEED * PLAYER_ACCEL).abs() < 1e-5);
        for _ in 0..200 {
            run(&mut player, Vec2::X);
        }
        assert!((player.velocity.x - PLAYER_BASE_SPEED).abs() < 1e-3);
        assert_eq!(player.rotation, 0.0);
    }

    #[test]
    fn oversized_input_is_clamped() {
        let mut a = Player::new();
        let mut b = Player::new();
        for _ in 0..200 {
            run(&mut a, Vec2::new(0.0, 50.0));
            run(&mut b, Vec2::Y);
        }
        assert!((a.velocity - b.velocity).length() < 1e-5);
    }

    #[test]
    fn friction_stops_idle_player() {
        let mut player = Player::new();
        player.velocity = Vec2::new(3.0, 0.0);
        for _ in 0..100 {
            run(&mut player, Vec2::ZERO);
        }
        assert_eq!(player.velocity, Vec2::ZERO);
    }

    #[test]
    fn non_finite_state_falls_back_to_history() {
        let mut player = Player::new();
        player.position = Vec2::new(10.0, 20.0);
        player.record_position();
        player.velocity = Vec2::new(f32::NAN, 0.0);
        run(&mut player, Vec2::ZERO);
        assert_eq!(player.position, Vec2::new(10.0, 20.0));
        assert_eq!(player.velocity, Vec2::ZERO);

        let mut fresh = Player::new();
        fresh.position = Vec2::new(f32::INFINITY, 0.0);
        run(&mut fresh, Vec2::new(f32::NAN, 1.0));
        assert_eq!(fresh.position, Vec2::ZERO);
    }

    #[test]
    fn regen_and_countdowns_tick() {
        let mut player = Player::new();
        player.health = 50.0;
        player.stats.regen = 6.0;
        player.invuln_ticks = 2;
        player.overdrive_ticks = 1;
        run(&mut player, Vec2::ZERO);
        assert!((player.health - 50.1).abs() < 1e-4);
        assert_eq!(player.invuln_ticks, 1);
        assert_eq!(player.overdrive_ticks, 0);
        assert_eq!(player.history.len(), 1);
    }
}
