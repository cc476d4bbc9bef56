//! Battle-start structured passives

use super::{
    AuraGrant, AuraParams, BattleStartApplication, BuffGrant, DebuffGrant, GenericResist,
    PassiveEffect, ResistKind, ResistanceParams, ResistScope, SelfBuffParams, TeamBuffParams,
    positive_duration,
};
use crate::battle::field::Battlefield;
use crate::content::ContentLibrary;
use crate::targeting::TargetRule;
use crate::types::{BuffKind, DebuffKind};
use rand::Rng;

/// Standard pools for `"random"` grants
const RANDOM_BUFF_POOL: [BuffKind; 4] = [
    BuffKind::AttackUp,
    BuffKind::DefenseUp,
    BuffKind::SpeedUp,
    BuffKind::CritChanceUp,
];
const RANDOM_DEBUFF_POOL: [DebuffKind; 4] = [
    DebuffKind::AttackDown,
    DebuffKind::DefenseDown,
    DebuffKind::SpeedDown,
    DebuffKind::AccuracyDown,
];

const RANDOM_BUFF_PCT: f64 = 0.2;
const RANDOM_DEBUFF_PCT: f64 = 0.15;
const RANDOM_EFFECT_TURNS: i32 = 3;

/// Fire every battle-start passive across both teams, in storage order
pub fn apply_on_battle_start(
    field: &mut Battlefield,
    library: &ContentLibrary,
    rng: &mut impl Rng,
) {
    for idx in 0..field.combatants.len() {
        let Some(passive) = library.structured_passive(field.get(idx)) else {
            continue;
        };
        match &passive.effect {
            PassiveEffect::Aura(params) => aura(field, idx, params, rng),
            PassiveEffect::ApplyEffectOnBattleStart(params) => {
                apply_effect(field, idx, params, rng)
            }
            PassiveEffect::TeamBuff(params) => team_buff(field, idx, params, rng),
            PassiveEffect::SelfBuff(params) => self_buff(field, idx, params),
            PassiveEffect::Resistance(params) => resistance(field, idx, params, rng),
            // Remaining hooks fire later in the battle
            PassiveEffect::OnTurnStart(_)
            | PassiveEffect::OnHitEffect(_)
            | PassiveEffect::DamageModifier(_)
            | PassiveEffect::OnBeingAttacked(_)
            | PassiveEffect::OnTurnEnd(_)
            | PassiveEffect::OnEnemyDefeat(_)
            | PassiveEffect::OnAllyDefeat(_)
            | PassiveEffect::SelfRevive(_)
            | PassiveEffect::ReactiveTrigger(_)
            | PassiveEffect::SelfBuffOnHealthLoss(_) => {}
        }
    }
}

fn aura(field: &mut Battlefield, self_idx: usize, params: &AuraParams, rng: &mut impl Rng) {
    let source = field.get(self_idx).id.clone();

    if let Some(ally_buff) = &params.ally_buff {
        for t in field.select_targets(TargetRule::Allies, self_idx, rng) {
            if let Some(cond) = &ally_buff.condition {
                if !cond.matches(field.get(t)) {
                    continue;
                }
            }
            match &ally_buff.grant {
                // Consumed each turn start instead
                AuraGrant::HealOverTime { .. } => {}
                AuraGrant::StatBuff { stat, value_pct } => {
                    for s in stat.iter() {
                        field.get_mut(t).apply_stat_bonus(s, *value_pct, Some(&source));
                    }
                }
            }
        }
    }

    if let Some(enemy_debuff) = &params.enemy_debuff {
        for t in field.select_targets(TargetRule::Enemies, self_idx, rng) {
            if let Some(cond) = &enemy_debuff.condition {
                if !cond.matches(field.get(t)) {
                    continue;
                }
            }
            field.get_mut(t).apply_debuff(
                enemy_debuff.debuff,
                enemy_debuff.value_pct.unwrap_or(0.0),
                positive_duration(enemy_debuff.duration_turns),
                Some(&source),
                false,
                rng,
            );
        }
    }
}

fn apply_effect(
    field: &mut Battlefield,
    self_idx: usize,
    params: &BattleStartApplication,
    rng: &mut impl Rng,
) {
    let source = field.get(self_idx).id.clone();
    let targets =
        field.select_targets(params.target.unwrap_or(TargetRule::Allies), self_idx, rng);

    if let Some(grant) = &params.buff {
        for &t in &targets {
            match grant {
                BuffGrant::Random(_) => {
                    let kind = RANDOM_BUFF_POOL[rng.gen_range(0..RANDOM_BUFF_POOL.len())];
                    field.get_mut(t).apply_buff(
                        kind,
                        RANDOM_BUFF_PCT,
                        Some(RANDOM_EFFECT_TURNS),
                        Some(&source),
                    );
                }
                BuffGrant::Fixed(spec) => {
                    field.get_mut(t).apply_buff(
                        spec.kind,
                        spec.value_pct.unwrap_or(0.0),
                        positive_duration(spec.duration_turns),
                        Some(&source),
                    );
                }
            }
        }
    }

    if let Some(grant) = &params.debuff {
        for &t in &targets {
            match grant {
                DebuffGrant::Random(_) => {
                    let kind = RANDOM_DEBUFF_POOL[rng.gen_range(0..RANDOM_DEBUFF_POOL.len())];
                    field.get_mut(t).apply_debuff(
                        kind,
                        RANDOM_DEBUFF_PCT,
                        Some(RANDOM_EFFECT_TURNS),
                        Some(&source),
                        false,
                        rng,
                    );
                }
                DebuffGrant::Fixed(spec) => {
                    field.get_mut(t).apply_debuff(
                        spec.kind,
                        spec.value_pct.unwrap_or(0.0),
                        positive_duration(spec.duration_turns),
                        Some(&source),
                        false,
                        rng,
                    );
                }
            }
        }

        // The secondary group only receives the random-pool treatment
        if let (Some(target2), DebuffGrant::Random(_)) = (params.target2, grant) {
            for t in field.select_targets(target2, self_idx, rng) {
                let kind = RANDOM_DEBUFF_POOL[rng.gen_range(0..RANDOM_DEBUFF_POOL.len())];
                field.get_mut(t).apply_debuff(
                    kind,
                    RANDOM_DEBUFF_PCT,
                    Some(RANDOM_EFFECT_TURNS),
                    Some(&source),
                    false,
                    rng,
                );
            }
        }
    }
}

fn team_buff(
    field: &mut Battlefield,
    self_idx: usize,
    params: &TeamBuffParams,
    rng: &mut impl Rng,
) {
    let source = field.get(self_idx).id.clone();
    for t in field.select_targets(TargetRule::Allies, self_idx, rng) {
        if let Some(cond) = &params.condition {
            if !cond.matches(field.get(t)) {
                continue;
            }
        }
        for s in params.stat.iter() {
            field.get_mut(t).apply_stat_bonus(s, params.value_pct, Some(&source));
        }
    }
}

fn self_buff(field: &mut Battlefield, self_idx: usize, params: &SelfBuffParams) {
    let me = field.get(self_idx);
    let side = me.side;
    let matched = match &params.condition {
        Some(cond) => cond.matches_with_teams(
            me,
            field.combatants.iter().filter(|c| c.side == side),
            field.combatants.iter().filter(|c| c.side != side),
        ),
        None => true,
    };
    if !matched {
        return;
    }
    let source = field.get(self_idx).id.clone();
    for s in params.stat.iter() {
        field
            .get_mut(self_idx)
            .apply_stat_bonus(s, params.value_pct, Some(&source));
    }
}

fn resistance(
    field: &mut Battlefield,
    self_idx: usize,
    params: &ResistanceParams,
    rng: &mut impl Rng,
) {
    let targets = match params.target {
        Some(ResistScope::Team) => field.select_targets(TargetRule::Allies, self_idx, rng),
        _ => vec![self_idx],
    };
    for t in targets {
        let table = &mut field.get_mut(t).resistances;
        for kind in params.resist.iter() {
            match kind {
                ResistKind::Element(element) => {
                    let grant = params.value_pct.unwrap_or(params.chance_pct);
                    let entry = table.elements.entry(*element).or_insert(0.0);
                    *entry = (*entry + grant).min(1.0);
                }
                ResistKind::Status(status) => {
                    let entry = table.status_effects.entry(*status).or_insert(0.0);
                    *entry = (*entry + params.chance_pct).min(1.0);
                }
                ResistKind::Generic(GenericResist::Debuff | GenericResist::Any) => {
                    table.debuffs = (table.debuffs + params.chance_pct).min(1.0);
                }
            }
        }
    }
}
