//! Kinematic integration: position += velocity, once per tick.

use hecs::{Component, World};

use glitchrun_core::components::Body;

/// Integrate every live body that also carries a `T`.
pub fn run<T: Component>(world: &mut World) {
    for (_entity, (body, _tag)) in world.query_mut::<(&mut Body, &T)>() {
        if !body.marked_for_deletion {
            body.position += body.velocity;
        }
    }
}
