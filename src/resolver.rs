//! Per-step combat resolution
//!
//! One pass over the fully-applied post-move configuration: heal completed
//! actions, rebuild every live unit's trigger areas, collect engagements
//! from that snapshot, then apply them in deterministic order. The
//! avoidance roll is the only randomness in the crate.

use ahash::{AHashMap, AHashSet};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GridConfig;
use crate::constants::{MIN_DAMAGE, STUN_EXTRA_STEPS};
use crate::stats::{StatTables, UnitStats, WeaponStats};
use crate::targeting::{build_area, contains, facing_slot, TriggerArea, WeaponSlot};
use crate::units::{Unit, UnitId};

/// One attacker-defender pairing found during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engagement {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub slot: WeaponSlot,
}

/// What happened during one combat pass, for the caller's presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepEvent {
    Healed {
        unit: UnitId,
        amount: i32,
    },
    Attacked {
        attacker: UnitId,
        defender: UnitId,
        slot: WeaponSlot,
        damage: i32,
        blind_side: bool,
    },
    Avoided {
        attacker: UnitId,
        defender: UnitId,
    },
    Stunned {
        unit: UnitId,
        through_step: u32,
    },
    Defeated {
        unit: UnitId,
    },
    /// Data-integrity failure: the named id was missing from the static
    /// tables, so the unit contributed nothing this step.
    UnknownStats {
        unit: UnitId,
        id: String,
    },
}

/// Aggregate output of one combat pass
#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    pub events: Vec<StepEvent>,
    /// Defender -> every unit that engaged it this step
    pub attackers_of: AHashMap<UnitId, Vec<UnitId>>,
    /// Net HP change per unit (healing minus damage)
    pub hp_delta: AHashMap<UnitId, i32>,
}

/// Evasion probability in [0, 1]
pub fn avoidance_chance(defender: &UnitStats, weapon: &WeaponStats) -> f32 {
    defender.avoid as f32 * weapon.avoid / 100.0
}

/// Damage of a facing hit that was not avoided
pub fn compute_damage(
    attacker: &UnitStats,
    attacker_weapon: &WeaponStats,
    defender: &UnitStats,
    defender_weapon: &WeaponStats,
) -> i32 {
    let raw = attacker.attack as f32 * attacker.trion as f32 * attacker_weapon.trion_effect;
    let mitigating = defender.trion as f32 * defender.defense as f32 * defender_weapon.defense;
    ((raw - mitigating) as i32).max(MIN_DAMAGE)
}

/// Resolve combat for one step over the post-move unit configuration
///
/// `acted` holds the units that completed their declared action this step;
/// they receive the completed-action heal before targeting is evaluated.
/// `global_step` is the simulator's monotonic step index, which stun
/// expiries reference.
pub fn resolve_step(
    grid: &GridConfig,
    tables: &StatTables,
    units: &mut [Unit],
    global_step: u32,
    acted: &AHashSet<UnitId>,
    rng: &mut ChaCha8Rng,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();

    // Completed-action healing, before any targeting.
    for unit in units.iter_mut() {
        if unit.is_alive() && acted.contains(&unit.id) {
            let amount = unit.heal_for_action();
            if amount > 0 {
                *outcome.hp_delta.entry(unit.id).or_insert(0) += amount;
                outcome.events.push(StepEvent::Healed {
                    unit: unit.id,
                    amount,
                });
            }
        }
    }

    let areas = build_all_areas(grid, tables, units, &mut outcome);
    let engagements = collect_engagements(grid, units, &areas);
    debug!(
        step = global_step,
        engagements = engagements.len(),
        "resolving combat step"
    );

    for engagement in engagements {
        apply_engagement(grid, tables, units, engagement, global_step, rng, &mut outcome);
    }

    outcome
}

/// Build both trigger areas for every live unit with known stats
fn build_all_areas(
    grid: &GridConfig,
    tables: &StatTables,
    units: &[Unit],
    outcome: &mut StepOutcome,
) -> Vec<TriggerArea> {
    let mut areas = Vec::new();
    for unit in units.iter().filter(|u| u.is_alive()) {
        let Some(stats) = tables.character(&unit.character) else {
            warn!(unit = unit.id.0, character = %unit.character, "unknown character id, skipping trigger areas");
            outcome.events.push(StepEvent::UnknownStats {
                unit: unit.id,
                id: unit.character.clone(),
            });
            continue;
        };
        for (slot, weapon_id) in [
            (WeaponSlot::Main, &stats.main_weapon),
            (WeaponSlot::Sub, &stats.sub_weapon),
        ] {
            let Some(weapon) = tables.weapon(weapon_id) else {
                warn!(unit = unit.id.0, weapon = %weapon_id, "unknown weapon id, skipping trigger area");
                outcome.events.push(StepEvent::UnknownStats {
                    unit: unit.id,
                    id: weapon_id.clone(),
                });
                continue;
            };
            areas.push(build_area(grid, unit, slot, weapon));
        }
    }
    areas
}

/// Pair every area with the opposing live units it contains
///
/// Deduplicated per (attacker, defender): a defender caught by both of an
/// attacker's arcs is engaged once, by the Main arc. Order is normalized to
/// (attacker id, defender id) so resolution is reproducible.
fn collect_engagements(
    grid: &GridConfig,
    units: &[Unit],
    areas: &[TriggerArea],
) -> Vec<Engagement> {
    let by_id: AHashMap<UnitId, &Unit> = units.iter().map(|u| (u.id, u)).collect();
    let mut seen: AHashSet<(UnitId, UnitId)> = AHashSet::new();
    let mut engagements = Vec::new();

    for area in areas {
        let Some(attacker) = by_id.get(&area.unit) else {
            continue;
        };
        for defender in units.iter() {
            if !defender.is_alive() || defender.faction == attacker.faction {
                continue;
            }
            if contains(grid, area, defender.position)
                && seen.insert((area.unit, defender.id))
            {
                engagements.push(Engagement {
                    attacker: area.unit,
                    defender: defender.id,
                    slot: area.slot,
                });
            }
        }
    }

    engagements.sort_by_key(|e| (e.attacker, e.defender));
    engagements
}

/// Resolve one attacker-defender pairing and mutate the units involved
///
/// The engagement list comes from the step snapshot, so an attacker
/// defeated earlier in the same step still delivers the attacks it had
/// already earned; a defender defeated earlier is skipped.
fn apply_engagement(
    grid: &GridConfig,
    tables: &StatTables,
    units: &mut [Unit],
    engagement: Engagement,
    global_step: u32,
    rng: &mut ChaCha8Rng,
    outcome: &mut StepOutcome,
) {
    let attacker_idx = units.iter().position(|u| u.id == engagement.attacker);
    let defender_idx = units.iter().position(|u| u.id == engagement.defender);
    let (Some(attacker_idx), Some(defender_idx)) = (attacker_idx, defender_idx) else {
        return;
    };
    if units[defender_idx].defeated {
        return; // removed from targeting earlier this step
    }

    let attacker_pos = units[attacker_idx].position;
    let defender = &units[defender_idx];

    outcome
        .attackers_of
        .entry(defender.id)
        .or_default()
        .push(engagement.attacker);

    let stun_through = global_step + STUN_EXTRA_STEPS;

    let (damage, blind_side) = match facing_slot(grid, defender, attacker_pos) {
        Some(defense_slot) => {
            // The covering slot's trigger supplies the defensive multipliers.
            let Some((def_stats, def_weapon)) = defender_loadout(tables, defender, defense_slot)
            else {
                report_unknown(tables, defender, defense_slot, outcome);
                return;
            };
            let roll: f32 = rng.gen();
            if roll < avoidance_chance(def_stats, def_weapon) {
                outcome.events.push(StepEvent::Avoided {
                    attacker: engagement.attacker,
                    defender: engagement.defender,
                });
                stun(&mut units[attacker_idx], stun_through, outcome);
                return;
            }
            // Attacker stats are known: its trigger area could not have
            // been built otherwise.
            let Some(att_stats) = tables.character(&units[attacker_idx].character) else {
                return;
            };
            let att_weapon_id = match engagement.slot {
                WeaponSlot::Main => &att_stats.main_weapon,
                WeaponSlot::Sub => &att_stats.sub_weapon,
            };
            let Some(att_weapon) = tables.weapon(att_weapon_id) else {
                return;
            };
            (compute_damage(att_stats, att_weapon, def_stats, def_weapon), false)
        }
        // Blind-side: guaranteed hit for the defender's full remaining HP.
        None => (units[defender_idx].hp, true),
    };

    let defeated = units[defender_idx].apply_damage(damage);
    *outcome.hp_delta.entry(engagement.defender).or_insert(0) -= damage;
    outcome.events.push(StepEvent::Attacked {
        attacker: engagement.attacker,
        defender: engagement.defender,
        slot: engagement.slot,
        damage,
        blind_side,
    });

    stun(&mut units[attacker_idx], stun_through, outcome);
    if !blind_side {
        stun(&mut units[defender_idx], stun_through, outcome);
    }

    if defeated {
        outcome.events.push(StepEvent::Defeated {
            unit: engagement.defender,
        });
    }
}

/// Defender stats plus the weapon of the slot covering the attacker
fn defender_loadout<'a>(
    tables: &'a StatTables,
    defender: &Unit,
    slot: WeaponSlot,
) -> Option<(&'a UnitStats, &'a WeaponStats)> {
    let stats = tables.character(&defender.character)?;
    let weapon_id = match slot {
        WeaponSlot::Main => &stats.main_weapon,
        WeaponSlot::Sub => &stats.sub_weapon,
    };
    Some((stats, tables.weapon(weapon_id)?))
}

fn report_unknown(
    tables: &StatTables,
    defender: &Unit,
    slot: WeaponSlot,
    outcome: &mut StepOutcome,
) {
    let id = match tables.character(&defender.character) {
        None => defender.character.clone(),
        Some(stats) => match slot {
            WeaponSlot::Main => stats.main_weapon.clone(),
            WeaponSlot::Sub => stats.sub_weapon.clone(),
        },
    };
    warn!(unit = defender.id.0, id = %id, "unknown defender stats, engagement skipped");
    outcome.events.push(StepEvent::UnknownStats {
        unit: defender.id,
        id,
    });
}

fn stun(unit: &mut Unit, through_step: u32, outcome: &mut StepOutcome) {
    if unit.defeated {
        return;
    }
    unit.stun_through(through_step);
    outcome.events.push(StepEvent::Stunned {
        unit: unit.id,
        through_step,
    });
}
