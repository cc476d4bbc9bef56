//! Single-action resolution: the damage pipeline for one actor's turn

use super::event::{make_event, DamageLedger, TurnEvent};
use super::field::Battlefield;
use crate::codex;
use crate::content::ContentLibrary;
use crate::passive;
use crate::types::{BuffKind, DebuffKind};
use rand::Rng;
use tracing::debug;

/// Chance of a critical hit before buffs
pub const BASE_CRIT_CHANCE: f64 = 0.12;
/// Crit chance ceiling after buffs
pub const CRIT_CHANCE_CAP: f64 = 0.95;
/// Damage multiplier on a critical hit
pub const CRIT_MULTIPLIER: f64 = 1.8;
/// Fraction of the hit dealt to each cleave victim
pub const CLEAVE_PCT: f64 = 0.3;

/// Resolve one actor's complete turn
///
/// Returns None when the actor has no living opponents, which ends the
/// round. The pipeline: turn-start maintenance and incapacity, structured
/// turn-start effects, the damage formula with variance and crit, on-hit
/// and on-being-attacked hooks, cleave spill, defeat and revival handling,
/// legacy hooks, the event snapshot, and finally turn-end effects.
pub(crate) fn resolve_action(
    field: &mut Battlefield,
    library: &ContentLibrary,
    actor: usize,
    turn: i32,
    ledger: &mut DamageLedger,
    rng: &mut impl Rng,
) -> Option<TurnEvent> {
    let actor_side = field.get(actor).side;
    let opponents = field.living_on(actor_side.opponent());
    if opponents.is_empty() {
        return None;
    }
    let target = opponents[rng.gen_range(0..opponents.len())];

    // Turn-start maintenance: DoT ticks, countdown expiry, incapacity
    field.get_mut(actor).tick_status_effects();
    if field.get(actor).is_incapacitated() {
        let description = format!("{} cannot act this turn.", field.get(actor).name);
        return Some(make_event(
            field, turn, actor, target, 0, false, false, description,
        ));
    }

    passive::apply_on_turn_start(field, library, actor, turn, rng);

    // Base damage from effective stats, both floored at half base
    let effective_atk = field.get(actor).effective_attack();
    let effective_def = field.get(target).effective_defense();
    let base = (effective_atk - effective_def / 2).max(1);
    let variance = 0.85 + rng.gen::<f64>() * 0.3;
    let mut damage = ((base as f64 * variance).round() as i32).max(1);

    // Crit: guaranteed against a sleeping target
    let target_sleeping = field.get(target).has_debuff(DebuffKind::Sleep);
    let crit_chance = (BASE_CRIT_CHANCE + field.get(actor).sum_buff_pct(BuffKind::CritChanceUp))
        .min(CRIT_CHANCE_CAP);
    let crit = target_sleeping || rng.gen::<f64>() < crit_chance;
    if crit {
        damage = (damage as f64 * CRIT_MULTIPLIER).round() as i32;
    }

    let hit = passive::apply_on_hit(field, library, actor, target, damage, rng);
    damage += hit.extra_damage;
    damage = passive::apply_on_being_attacked(field, library, actor, target, damage, rng);

    {
        let t = field.get_mut(target);
        t.current_hp = (t.current_hp - damage).max(0);
        t.battle_state.damage_taken += damage as i64;
    }
    field.get_mut(actor).battle_state.damage_dealt += damage as i64;
    let actor_id = field.get(actor).id.clone();
    ledger.add(&actor_id, damage as i64);

    let mut defeated = !field.get(target).is_alive();
    let mut description = format!(
        "{} strikes {} for {} damage{}{}",
        field.get(actor).name,
        field.get(target).name,
        damage,
        if crit { " — CRITICAL!" } else { "" },
        if defeated { " and defeats them!" } else { "." },
    );

    // Cleave spills a fraction of the final hit onto extra victims; the
    // spill is environmental and not attributed to the attacker's totals
    for &cleave_target in &hit.cleave_targets {
        let cleave_damage = (damage as f64 * CLEAVE_PCT).round() as i32;
        let c = field.get_mut(cleave_target);
        c.current_hp = (c.current_hp - cleave_damage).max(0);
        let name = c.name.clone();
        let downed = !c.is_alive();
        description.push_str(&format!(" Cleave hits {name} for {cleave_damage} damage!"));
        if downed {
            description.push_str(&format!(" {name} is defeated!"));
        }
    }

    // Defeat and revival
    if defeated && passive::attempt_self_revive(field, library, target) {
        defeated = false;
        description.push_str(&format!(" But {} revives!", field.get(target).name));
    }
    if defeated {
        passive::apply_on_enemy_defeat(field, library, actor);
        if passive::apply_on_ally_defeat(field, library, target) {
            defeated = false;
            description.push_str(&format!(
                " But {} is saved from death!",
                field.get(target).name
            ));
        }
        let target_side = field.get(target).side;
        codex::apply_on_ally_defeat(field, library, target_side);
    }

    // Legacy hooks and reactive health checks
    codex::apply_on_being_attacked(field, library, actor, target);
    codex::apply_on_attack_status(field, library, actor, target, rng);
    codex::apply_thresholds(field, library, actor, target);
    passive::check_health_thresholds(field, library, target);

    debug!(
        turn,
        actor = %actor_id,
        target = %field.get(target).id,
        damage,
        crit,
        defeated,
        "action resolved"
    );

    let event = make_event(field, turn, actor, target, damage, crit, defeated, description);

    passive::apply_on_turn_end(field, library, actor, rng);
    codex::apply_on_turn_end(field, library, actor);

    Some(event)
}
