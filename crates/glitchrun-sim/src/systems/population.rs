//! Population manager: admits spawn candidates under the per-kind and global
//! caps. Never fails; when the world is full it culls off-screen enemies and
//! then drops the lowest-priority candidates.

use std::cmp::Reverse;
use std::collections::HashMap;

use hecs::{Entity, World};

use glitchrun_core::components::{Body, Enemy, EnemyBehavior};
use glitchrun_core::enums::{EnemyKind, MissionType};
use glitchrun_core::types::Viewport;

use crate::config::PopulationConfig;
use crate::spawner::Candidate;

pub struct AdmissionContext<'a> {
    pub config: &'a PopulationConfig,
    /// Active mission, if any. Selects the effective global cap.
    pub mission: Option<MissionType>,
    pub viewport: Viewport,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdmissionReport {
    /// Spawned entities, in batch order after truncation.
    pub admitted: Vec<Entity>,
    pub rejected_by_kind: usize,
    pub culled: usize,
    pub truncated: usize,
}

/// Truncation priority. Higher survives. Bosses outrank mission targets,
/// which outrank every kind tier from `EnemyKind::spawn_priority`.
pub fn priority(enemy: &Enemy) -> u8 {
    if enemy.is_boss {
        4
    } else if enemy.is_mission_target {
        3
    } else {
        enemy.kind.spawn_priority()
    }
}

/// Candidates admitted or rejected together. Twin partners share a unit.
fn into_units(candidates: Vec<Candidate>) -> Vec<Vec<Candidate>> {
    let mut units: Vec<Vec<Candidate>> = Vec::with_capacity(candidates.len());
    let mut unit_of_group: HashMap<u32, usize> = HashMap::new();
    for candidate in candidates {
        match candidate.link_group {
            Some(group) => match unit_of_group.get(&group) {
                Some(&index) => units[index].push(candidate),
                None => {
                    unit_of_group.insert(group, units.len());
                    units.push(vec![candidate]);
                }
            },
            None => units.push(vec![candidate]),
        }
    }
    units
}

fn unit_priority(unit: &[Candidate]) -> u8 {
    unit.iter().map(|c| priority(&c.enemy)).max().unwrap_or(0)
}

/// Admit a batch of candidates into the world.
///
/// Runs every tick, even with an empty batch, so a lowered cap still culls
/// the existing population down to it.
pub fn admit(world: &mut World, candidates: Vec<Candidate>, ctx: &AdmissionContext<'_>) -> AdmissionReport {
    let mut report = AdmissionReport::default();

    let mut valid = 0usize;
    let mut by_kind: HashMap<EnemyKind, usize> = HashMap::new();
    for (_entity, (body, enemy)) in world.query::<(&Body, &Enemy)>().iter() {
        if !body.marked_for_deletion {
            valid += 1;
            *by_kind.entry(enemy.kind).or_insert(0) += 1;
        }
    }

    // 1. Per-kind caps, counting units already accepted from this batch.
    let mut accepted: Vec<Vec<Candidate>> = Vec::new();
    for unit in into_units(candidates) {
        let mut needed: HashMap<EnemyKind, usize> = HashMap::new();
        for candidate in &unit {
            *needed.entry(candidate.enemy.kind).or_insert(0) += 1;
        }
        let fits = needed.iter().all(|(kind, n)| match ctx.config.kind_cap(*kind) {
            Some(cap) => by_kind.get(kind).copied().unwrap_or(0) + n <= cap,
            None => true,
        });
        if !fits {
            report.rejected_by_kind += unit.len();
            continue;
        }
        for (kind, n) in needed {
            *by_kind.entry(kind).or_insert(0) += n;
        }
        accepted.push(unit);
    }
    let pending: usize = accepted.iter().map(Vec::len).sum();

    // 2. Global cap for the active mission.
    let cap = ctx.config.effective_cap(ctx.mission);
    let mut excess = (valid + pending).saturating_sub(cap);

    // 3. Cull off-screen enemies, farthest first.
    if excess > 0 {
        let mut victims: Vec<(Entity, f32)> = world
            .query::<(&Body, &Enemy)>()
            .iter()
            .filter(|(_, (body, enemy))| {
                !body.marked_for_deletion
                    && !enemy.is_boss
                    && !enemy.is_mission_target
                    && !ctx.viewport.is_on_screen(body.position, body.radius)
            })
            .map(|(entity, (body, _))| {
                (entity, body.position.distance_squared(ctx.viewport.center))
            })
            .collect();
        victims.sort_by(|a, b| b.1.total_cmp(&a.1));
        for (entity, _) in victims.into_iter().take(excess) {
            if let Ok(mut body) = world.get::<&mut Body>(entity) {
                body.marked_for_deletion = true;
                report.culled += 1;
            }
        }
        excess -= report.culled;
    }

    // 4. Truncate the lowest-priority tail, whole units at a time.
    if excess > 0 {
        accepted.sort_by_key(|unit| Reverse(unit_priority(unit)));
        let mut room = pending.saturating_sub(excess);
        accepted.retain(|unit| {
            if unit.len() <= room {
                room -= unit.len();
                true
            } else {
                report.truncated += unit.len();
                false
            }
        });
    }

    let mut groups: HashMap<u32, Vec<Entity>> = HashMap::new();
    for candidate in accepted.into_iter().flatten() {
        let entity = world.spawn((candidate.body, candidate.enemy));
        if let Some(group) = candidate.link_group {
            groups.entry(group).or_default().push(entity);
        }
        report.admitted.push(entity);
    }
    for members in groups.values() {
        match members[..] {
            [a, b] => {
                link_twins(world, a, b);
                link_twins(world, b, a);
            }
            [lone] => enrage(world, lone),
            _ => {}
        }
    }

    if report.rejected_by_kind + report.culled + report.truncated > 0 {
        tracing::debug!(
            admitted = report.admitted.len(),
            rejected_by_kind = report.rejected_by_kind,
            culled = report.culled,
            truncated = report.truncated,
            cap,
            "population pressure"
        );
    }
    report
}

fn link_twins(world: &mut World, node: Entity, partner: Entity) {
    if let Ok(mut enemy) = world.get::<&mut Enemy>(node) {
        if let EnemyBehavior::TwinNode { partner: slot, .. } = &mut enemy.behavior {
            *slot = Some(partner);
        }
    }
}

/// A twin admitted without a partner starts out enraged.
fn enrage(world: &mut World, node: Entity) {
    if let Ok(mut enemy) = world.get::<&mut Enemy>(node) {
        if let EnemyBehavior::TwinNode { enraged, .. } = &mut enemy.behavior {
            *enraged = true;
        }
    }
}

/// Live (unflagged) enemy count.
pub fn live_count(world: &World) -> usize {
    world
        .query::<(&Body, &Enemy)>()
        .iter()
        .filter(|(_, (body, _))| !body.marked_for_deletion)
        .count()
}
