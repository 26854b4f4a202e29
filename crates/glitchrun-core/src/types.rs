//! Fundamental geometric and simulation types.
//!
//! World space is a flat 2D plane in abstract units, +y down like the
//! screen. The collision probe lives here because every pairwise
//! interaction in the simulation goes through it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::{OFFSCREEN_MARGIN, TICK_RATE, VIEWPORT_HALF_HEIGHT, VIEWPORT_HALF_WIDTH};

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the fixed tick rate.
    pub fn dt(&self) -> f64 {
        1.0 / TICK_RATE as f64
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs += self.dt();
    }
}

/// The camera's view of the world, centered on the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            half_extents: Vec2::new(VIEWPORT_HALF_WIDTH, VIEWPORT_HALF_HEIGHT),
        }
    }
}

impl Viewport {
    /// Viewport centered on `center`. A non-finite center falls back to the origin.
    pub fn centered_on(center: Vec2) -> Self {
        Self {
            center: sanitize_vec2(center, Vec2::ZERO),
            ..Self::default()
        }
    }

    /// Whether a circle touches the viewport grown by `margin` on every side.
    pub fn contains(&self, point: Vec2, radius: f32, margin: f32) -> bool {
        let reach = self.half_extents + Vec2::splat(margin + radius);
        let delta = (point - self.center).abs();
        delta.x <= reach.x && delta.y <= reach.y
    }

    /// On-screen test used for culling decisions.
    pub fn is_on_screen(&self, point: Vec2, radius: f32) -> bool {
        self.contains(point, radius, OFFSCREEN_MARGIN)
    }
}

/// Circle-circle overlap test.
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a.distance_squared(b) <= reach * reach
}

/// Distance from `point` to the segment `start..end`.
pub fn distance_to_segment(point: Vec2, start: Vec2, end: Vec2) -> f32 {
    let span = end - start;
    let len_sq = span.length_squared();
    if len_sq <= f32::EPSILON {
        return point.distance(start);
    }
    let t = ((point - start).dot(span) / len_sq).clamp(0.0, 1.0);
    point.distance(start + span * t)
}

/// Whether a circle touches a segment thickened by `half_width`.
pub fn segment_overlaps_circle(
    start: Vec2,
    end: Vec2,
    half_width: f32,
    center: Vec2,
    radius: f32,
) -> bool {
    distance_to_segment(center, start, end) <= half_width + radius
}

/// Replace a vector with `fallback` if either component is NaN or infinite.
pub fn sanitize_vec2(v: Vec2, fallback: Vec2) -> Vec2 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}

/// Clamp a raw input vector to magnitude 1. Non-finite input reads as no input.
pub fn clamp_input(raw: Vec2) -> Vec2 {
    let v = sanitize_vec2(raw, Vec2::ZERO);
    if v.length_squared() > 1.0 {
        v.normalize()
    } else {
        v
    }
}

/// Unit vector for an angle in radians (0 = +x).
pub fn from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Convert whole seconds to ticks.
pub fn secs_to_ticks(secs: u32) -> u32 {
    secs * TICK_RATE
}
