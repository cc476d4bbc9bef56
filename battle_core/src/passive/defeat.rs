//! Defeat, revival, and health-threshold structured passives

use super::{AllyDefeatEffect, PassiveEffect, ReactiveEffect, ReactiveTriggerKind, positive_duration};
use crate::battle::field::Battlefield;
use crate::content::ContentLibrary;
use tracing::debug;

/// HP fraction at or below which reactive triggers fire
const REACTIVE_HP_THRESHOLD: f64 = 0.25;

/// Missing-HP step size for scaling self buffs
const HEALTH_LOSS_STEP: f64 = 0.2;

/// Let a defeated combatant revive itself, once per battle
pub fn attempt_self_revive(
    field: &mut Battlefield,
    library: &ContentLibrary,
    idx: usize,
) -> bool {
    if field.get(idx).battle_state.revived_once {
        return false;
    }
    let Some(passive) = library.structured_passive(field.get(idx)) else {
        return false;
    };
    let PassiveEffect::SelfRevive(params) = &passive.effect else {
        return false;
    };

    let revive_pct = params.revive_hp_pct.unwrap_or(0.25);
    {
        let me = field.get_mut(idx);
        me.current_hp = (me.max_hp as f64 * revive_pct).round() as i32;
        me.battle_state.revived_once = true;
    }
    let source = field.get(idx).id.clone();
    for spec in &params.buffs {
        field.get_mut(idx).apply_buff(
            spec.kind,
            spec.value_pct.unwrap_or(0.0),
            positive_duration(spec.duration_turns),
            Some(&source),
        );
    }
    debug!(combatant = %source, "self-revive triggered");
    true
}

/// Reward the victor's defeat passive and bump its structured kill counter
pub fn apply_on_enemy_defeat(field: &mut Battlefield, library: &ContentLibrary, victor: usize) {
    let Some(passive) = library.structured_passive(field.get(victor)) else {
        return;
    };
    if let PassiveEffect::OnEnemyDefeat(params) = &passive.effect {
        let victor_id = field.get(victor).id.clone();
        let kind = params.buff.stat.as_buff_kind();
        let cap = if params.stacking { params.max_stacks } else { None };
        let under_cap = match cap {
            Some(max) => {
                let held = field
                    .get(victor)
                    .buffs
                    .iter()
                    .filter(|b| b.kind == kind && b.source_id.as_deref() == Some(&victor_id))
                    .count();
                held < max as usize
            }
            None => true,
        };
        if under_cap {
            field
                .get_mut(victor)
                .apply_buff(kind, params.buff.value_pct, Some(99), Some(&victor_id));
        }
    }
    field.get_mut(victor).battle_state.defeated_enemies += 1;
}

/// Give the defeated combatant's teammates a chance to cheat its death
///
/// Returns true when any teammate revived it.
pub fn apply_on_ally_defeat(
    field: &mut Battlefield,
    library: &ContentLibrary,
    defeated: usize,
) -> bool {
    let mut revived = false;
    let side = field.get(defeated).side;
    let team: Vec<usize> = field.indices_on(side).collect();
    for ally in team {
        if ally == defeated || !field.get(ally).is_alive() {
            continue;
        }
        let Some(passive) = library.structured_passive(field.get(ally)) else {
            continue;
        };
        let PassiveEffect::OnAllyDefeat(AllyDefeatEffect::CheatDeath {
            heal_to_hp_pct,
            apply_buff,
            once_per_battle,
        }) = &passive.effect
        else {
            continue;
        };
        if field.get(defeated).battle_state.revived_once {
            continue;
        }
        let key = format!("cheat_death_{}", field.get(ally).id);
        if *once_per_battle && field.get(ally).battle_state.once_per_battle_used.contains(&key) {
            continue;
        }

        let heal_pct = heal_to_hp_pct.unwrap_or(0.01);
        {
            let fallen = field.get_mut(defeated);
            fallen.current_hp = (fallen.max_hp as f64 * heal_pct).round() as i32;
            fallen.battle_state.revived_once = true;
        }
        if let Some(spec) = apply_buff {
            let source = field.get(ally).id.clone();
            field.get_mut(defeated).apply_buff(
                spec.kind,
                spec.value_pct.unwrap_or(1.0),
                Some(spec.duration_turns.unwrap_or(1)),
                Some(&source),
            );
        }
        if *once_per_battle {
            field
                .get_mut(ally)
                .battle_state
                .once_per_battle_used
                .insert(key);
        }
        debug!(
            granter = %field.get(ally).id,
            saved = %field.get(defeated).id,
            "cheat death triggered"
        );
        revived = true;
    }
    revived
}

/// Reactive passives that watch a combatant's health after it takes damage
pub fn check_health_thresholds(
    field: &mut Battlefield,
    library: &ContentLibrary,
    injured: usize,
) {
    let side = field.get(injured).side;
    let team: Vec<usize> = field.indices_on(side).collect();
    for ally in team {
        if !field.get(ally).is_alive() {
            continue;
        }
        let Some(passive) = library.structured_passive(field.get(ally)) else {
            continue;
        };
        let PassiveEffect::ReactiveTrigger(params) = &passive.effect else {
            continue;
        };
        match params.trigger {
            ReactiveTriggerKind::AllyHpBelow25 => {
                if field.get(injured).hp_fraction() > REACTIVE_HP_THRESHOLD {
                    continue;
                }
            }
        }
        let key = format!(
            "reactive_{}_{}",
            field.get(ally).id,
            field.get(injured).id
        );
        if params.once_per_battle
            && field.get(ally).battle_state.once_per_battle_used.contains(&key)
        {
            continue;
        }
        match params.effect {
            ReactiveEffect::Heal => {
                let heal = (field.get(injured).max_hp as f64 * params.value_pct).round() as i32;
                field.get_mut(injured).heal(heal);
            }
        }
        if params.once_per_battle {
            field
                .get_mut(ally)
                .battle_state
                .once_per_battle_used
                .insert(key);
        }
    }

    // Scaling self buff on the injured combatant itself
    let Some(passive) = library.structured_passive(field.get(injured)) else {
        return;
    };
    let PassiveEffect::SelfBuffOnHealthLoss(params) = &passive.effect else {
        return;
    };
    let missing = 1.0 - field.get(injured).hp_fraction();
    let steps = (missing / HEALTH_LOSS_STEP).floor() as i32;
    if steps <= 0 {
        return;
    }
    let total = steps as f64 * params.value_pct_per_20_pct_missing;
    let kind = params.stat.as_buff_kind();
    let me = field.get_mut(injured);
    let own_id = me.id.clone();
    // Replaces its own prior application rather than stacking with it
    me.buffs
        .retain(|b| !(b.source_id.as_deref() == Some(&own_id) && b.kind == kind));
    me.apply_stat_bonus(params.stat, total, Some(&own_id));
}
