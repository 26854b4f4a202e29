//! Loot drops, magnetism and collection.

use glam::Vec2;
use hecs::World;
use rand::Rng;

use glitchrun_core::components::*;
use glitchrun_core::constants::*;
use glitchrun_core::enums::WeaponKind;
use glitchrun_core::events::GameEvent;
use glitchrun_core::player::Player;
use glitchrun_core::types::circles_overlap;

use glitchrun_campaign::catalog::base_stats;

use super::combat::Kill;
use super::movement;
use crate::spawner::spawn_pickup;

const SUPPLY_HEAL: f32 = 40.0;
const OVERDRIVE_TICKS: u32 = 600;

/// What collection produced this tick, beyond what was applied to the player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collected {
    pub shards: u32,
    pub supply_drops: Vec<SupplyContent>,
}

/// Drop loot where enemies died.
pub fn drop_loot<R: Rng>(world: &mut World, kills: &[Kill], player: &Player, rng: &mut R) {
    for kill in kills {
        spawn_pickup(world, kill.position, PickupKind::Xp, kill.xp_value);
        if rng.gen_bool(CURRENCY_DROP_CHANCE) {
            let offset = Vec2::new(PICKUP_RADIUS * 2.0, 0.0);
            spawn_pickup(world, kill.position + offset, PickupKind::Currency, CURRENCY_CHIP_VALUE);
        }
        if rng.gen_bool(HEALTH_DROP_CHANCE) {
            let offset = Vec2::new(-PICKUP_RADIUS * 2.0, 0.0);
            spawn_pickup(world, kill.position + offset, PickupKind::Health, HEALTH_ORB_VALUE);
        }
        if kill.is_mission_target && !kill.is_boss {
            spawn_supply_drop(world, kill.position, player, rng);
        }
    }
}

pub fn spawn_supply_drop<R: Rng>(world: &mut World, position: Vec2, player: &Player, rng: &mut R) {
    let content = roll_supply_content(player, rng);
    spawn_pickup(world, position, PickupKind::SupplyDrop(content), 1);
}

/// Roll what a supply drop holds. Fixed at creation.
pub fn roll_supply_content<R: Rng>(player: &Player, rng: &mut R) -> SupplyContent {
    match rng.gen_range(0..5) {
        0 => SupplyContent::Heal(SUPPLY_HEAL),
        1 => SupplyContent::Currency(rng.gen_range(10..=25)),
        2 => SupplyContent::XpBurst(player.next_level_xp),
        3 => {
            let missing: Vec<WeaponKind> = WeaponKind::ALL
                .into_iter()
                .filter(|k| !player.has_weapon(*k))
                .collect();
            if missing.is_empty() {
                SupplyContent::Overdrive(OVERDRIVE_TICKS)
            } else {
                SupplyContent::TemporaryWeapon(missing[rng.gen_range(0..missing.len())])
            }
        }
        _ => SupplyContent::Overdrive(OVERDRIVE_TICKS),
    }
}

/// Magnetize, home and collect pickups.
pub fn run(world: &mut World, player: &mut Player, tick: u64, events: &mut Vec<GameEvent>) -> Collected {
    let magnet = player.magnet_radius();
    for (_entity, (body, pickup)) in world.query_mut::<(&mut Body, &mut Pickup)>() {
        if body.marked_for_deletion {
            continue;
        }
        if !pickup.magnetized && circles_overlap(body.position, body.radius, player.position, magnet) {
            pickup.magnetized = true;
        }
        if pickup.magnetized {
            body.velocity = (player.position - body.position).normalize_or_zero() * PICKUP_MAGNET_SPEED;
        }
    }
    movement::run::<Pickup>(world);

    let mut collected = Vec::new();
    for (_entity, (body, pickup)) in world.query_mut::<(&mut Body, &Pickup)>() {
        if !body.marked_for_deletion
            && circles_overlap(body.position, body.radius, player.position, player.radius)
        {
            body.marked_for_deletion = true;
            collected.push(*pickup);
        }
    }

    let mut outcome = Collected::default();
    for pickup in collected {
        match pickup.kind {
            PickupKind::Xp => {
                player.gain_xp(pickup.value);
            }
            PickupKind::Currency => {
                player.gain_currency(pickup.value);
            }
            PickupKind::Health => player.heal(pickup.value as f32),
            PickupKind::DataShard => outcome.shards += 1,
            PickupKind::SupplyDrop(content) => {
                open_supply_drop(player, content, tick, events);
                outcome.supply_drops.push(content);
            }
        }
        events.push(GameEvent::PickupCollected {
            kind: pickup.kind,
            value: pickup.value,
        });
    }
    outcome
}

fn open_supply_drop(player: &mut Player, content: SupplyContent, tick: u64, events: &mut Vec<GameEvent>) {
    match content {
        SupplyContent::Heal(amount) => player.heal(amount),
        SupplyContent::Currency(amount) => {
            player.gain_currency(amount);
        }
        SupplyContent::XpBurst(amount) => {
            player.gain_xp(amount);
        }
        SupplyContent::TemporaryWeapon(kind) if !player.has_weapon(kind) => {
            let mut weapon = Weapon::new(kind, base_stats(kind));
            weapon.expires_at_tick = Some(tick + TEMP_WEAPON_TICKS);
            player.weapons.push(weapon);
            events.push(GameEvent::WeaponAcquired { weapon: kind });
        }
        // Already owned since the roll: grant overdrive instead.
        SupplyContent::TemporaryWeapon(_) => {
            player.overdrive_ticks = player.overdrive_ticks.max(OVERDRIVE_TICKS);
        }
        SupplyContent::Overdrive(ticks) => {
            player.overdrive_ticks = player.overdrive_ticks.max(ticks);
        }
    }
}
