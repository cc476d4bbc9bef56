//! Turn-start and turn-end structured passives

use super::{AuraGrant, PassiveEffect, TurnEndEffect, TurnStartEffect, HealTarget, positive_duration};
use crate::battle::field::Battlefield;
use crate::content::ContentLibrary;
use crate::targeting::TargetRule;
use rand::Rng;

/// Fire the acting combatant's turn-start passive, if any
pub fn apply_on_turn_start(
    field: &mut Battlefield,
    library: &ContentLibrary,
    actor: usize,
    turn: i32,
    rng: &mut impl Rng,
) {
    let Some(passive) = library.structured_passive(field.get(actor)) else {
        return;
    };
    match &passive.effect {
        PassiveEffect::OnTurnStart(effect) => turn_start_effect(field, actor, effect, turn, rng),
        // A heal-over-time aura ticks on its carrier's turn
        PassiveEffect::Aura(params) => {
            if let Some(ally_buff) = &params.ally_buff {
                if let AuraGrant::HealOverTime { value_pct } = &ally_buff.grant {
                    for t in field.select_targets(TargetRule::Allies, actor, rng) {
                        let heal = (field.get(t).max_hp as f64 * value_pct).round() as i32;
                        field.get_mut(t).heal(heal);
                    }
                }
            }
        }
        _ => {}
    }
}

fn turn_start_effect(
    field: &mut Battlefield,
    actor: usize,
    effect: &TurnStartEffect,
    turn: i32,
    rng: &mut impl Rng,
) {
    match effect {
        TurnStartEffect::ReduceDebuffDuration { value } => {
            for t in field.select_targets(TargetRule::Allies, actor, rng) {
                for debuff in &mut field.get_mut(t).debuffs {
                    if let Some(expires) = debuff.expires_on_turn {
                        if expires > turn {
                            debuff.expires_on_turn = Some((expires - value).max(turn));
                        }
                    }
                }
            }
        }
        TurnStartEffect::ApplyBuff {
            target,
            buff,
            value_pct,
            duration_turns,
        } => {
            let rule = target.unwrap_or(TargetRule::SelfTarget);
            if let Some(t) = field.select_target(rule, actor, rng) {
                let source = field.get(actor).id.clone();
                field.get_mut(t).apply_buff(
                    *buff,
                    value_pct.unwrap_or(1.0),
                    Some(duration_turns.unwrap_or(1)),
                    Some(&source),
                );
            }
        }
        TurnStartEffect::ApplyDebuff {
            chance_pct,
            target,
            debuff,
            value_pct,
            duration_turns,
        } => {
            if rng.gen::<f64>() >= *chance_pct {
                return;
            }
            let rule = target.unwrap_or(TargetRule::FastestEnemy);
            if let Some(t) = field.select_target(rule, actor, rng) {
                let source = field.get(actor).id.clone();
                field.get_mut(t).apply_debuff(
                    *debuff,
                    value_pct.unwrap_or(0.0),
                    positive_duration(*duration_turns),
                    Some(&source),
                    false,
                    rng,
                );
            }
        }
    }
}

/// Fire the acting combatant's turn-end passive, if any
pub fn apply_on_turn_end(
    field: &mut Battlefield,
    library: &ContentLibrary,
    actor: usize,
    rng: &mut impl Rng,
) {
    let Some(passive) = library.structured_passive(field.get(actor)) else {
        return;
    };
    let PassiveEffect::OnTurnEnd(TurnEndEffect::Heal { target, value_pct }) = &passive.effect
    else {
        return;
    };
    match target {
        HealTarget::MostInjuredAlly => {
            if let Some(t) = field.select_target(TargetRule::MostInjuredAlly, actor, rng) {
                let heal = (field.get(t).max_hp as f64 * value_pct).round() as i32;
                field.get_mut(t).heal(heal);
            }
        }
        HealTarget::Allies => {
            for t in field.select_targets(TargetRule::Allies, actor, rng) {
                let heal = (field.get(t).max_hp as f64 * value_pct).round() as i32;
                field.get_mut(t).heal(heal);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Combatant;
    use crate::config::catalog::CharacterEntry;
    use crate::passive::{AuraAllyBuff, AuraParams, PassiveAbility};
    use crate::types::{Debuff, DebuffKind, Element, Rarity, Side};
    use rand::rngs::mock::StepRng;

    fn mid_rng() -> StepRng {
        StepRng::new(1 << 63, 0)
    }

    fn entry(slug: &str, effect: PassiveEffect) -> CharacterEntry {
        CharacterEntry {
            id: 1,
            name: slug.to_string(),
            slug: slug.to_string(),
            pantheon: "Norse".to_string(),
            rarity: Rarity::A,
            class: "Healer".to_string(),
            element: Element::Light,
            hp: 100,
            atk: 10,
            def: 10,
            spd: 10,
            passive_ability_name: None,
            passive_ability_desc: None,
            passive: Some(PassiveAbility {
                name: "Test".to_string(),
                desc: String::new(),
                effect,
            }),
        }
    }

    fn library(entries: Vec<CharacterEntry>) -> ContentLibrary {
        ContentLibrary::new(
            entries,
            Default::default(),
            Default::default(),
            Vec::new(),
            Default::default(),
        )
    }

    fn fighter(id: &str, slug: &str, side: Side) -> Combatant {
        Combatant::new(id, side, id, slug, Rarity::A).with_stats(100, 20, 10, 10)
    }

    #[test]
    fn test_reduce_debuff_duration_shortens_ally_countdowns() {
        let library = library(vec![entry(
            "isis",
            PassiveEffect::OnTurnStart(TurnStartEffect::ReduceDebuffDuration { value: 1 }),
        )]);
        let mut field = Battlefield::new(
            &[
                fighter("a1", "isis", Side::Ally),
                fighter("a2", "plain", Side::Ally),
            ],
            &[fighter("e1", "plain", Side::Enemy)],
        );
        field
            .get_mut(1)
            .debuffs
            .push(Debuff::new(DebuffKind::AttackDown, 0.1).with_duration(5));
        // Already at the current turn boundary: left untouched
        field
            .get_mut(1)
            .debuffs
            .push(Debuff::new(DebuffKind::SpeedDown, 0.1).with_duration(1));

        apply_on_turn_start(&mut field, &library, 0, 1, &mut mid_rng());

        assert_eq!(field.get(1).debuffs[0].expires_on_turn, Some(4));
        assert_eq!(field.get(1).debuffs[1].expires_on_turn, Some(1));
    }

    #[test]
    fn test_heal_over_time_aura_ticks_on_carrier_turn() {
        let library = library(vec![entry(
            "eir",
            PassiveEffect::Aura(AuraParams {
                ally_buff: Some(AuraAllyBuff {
                    condition: None,
                    grant: AuraGrant::HealOverTime { value_pct: 0.04 },
                }),
                enemy_debuff: None,
            }),
        )]);
        let mut field = Battlefield::new(
            &[
                fighter("a1", "eir", Side::Ally),
                fighter("a2", "plain", Side::Ally),
            ],
            &[fighter("e1", "plain", Side::Enemy)],
        );
        field.get_mut(0).current_hp = 50;
        field.get_mut(1).current_hp = 98;

        apply_on_turn_start(&mut field, &library, 0, 1, &mut mid_rng());

        assert_eq!(field.get(0).current_hp, 54);
        assert_eq!(field.get(1).current_hp, 100); // clamped at max
        assert_eq!(field.get(2).current_hp, 100); // enemies untouched
    }

    #[test]
    fn test_turn_start_debuff_is_chance_gated() {
        let blocked = library(vec![entry(
            "hex",
            PassiveEffect::OnTurnStart(TurnStartEffect::ApplyDebuff {
                chance_pct: 0.4,
                target: None,
                debuff: DebuffKind::SpeedDown,
                value_pct: Some(0.15),
                duration_turns: Some(2),
            }),
        )]);
        let mut field = Battlefield::new(
            &[fighter("a1", "hex", Side::Ally)],
            &[fighter("e1", "plain", Side::Enemy)],
        );
        // Mid-range roll (0.5) fails a 40% chance
        apply_on_turn_start(&mut field, &blocked, 0, 1, &mut mid_rng());
        assert!(field.get(1).debuffs.is_empty());

        let passes = library(vec![entry(
            "hex",
            PassiveEffect::OnTurnStart(TurnStartEffect::ApplyDebuff {
                chance_pct: 0.6,
                target: None,
                debuff: DebuffKind::SpeedDown,
                value_pct: Some(0.15),
                duration_turns: Some(2),
            }),
        )]);
        apply_on_turn_start(&mut field, &passes, 0, 1, &mut mid_rng());
        // Default target is the fastest enemy
        assert_eq!(field.get(1).debuffs[0].kind, DebuffKind::SpeedDown);
    }

    #[test]
    fn test_turn_end_heals_most_injured_ally() {
        let library = library(vec![entry(
            "apollo",
            PassiveEffect::OnTurnEnd(TurnEndEffect::Heal {
                target: HealTarget::MostInjuredAlly,
                value_pct: 0.08,
            }),
        )]);
        let mut field = Battlefield::new(
            &[
                fighter("a1", "apollo", Side::Ally),
                fighter("a2", "plain", Side::Ally),
            ],
            &[fighter("e1", "plain", Side::Enemy)],
        );
        field.get_mut(0).current_hp = 80;
        field.get_mut(1).current_hp = 30;

        apply_on_turn_end(&mut field, &library, 0, &mut mid_rng());

        assert_eq!(field.get(0).current_hp, 80);
        assert_eq!(field.get(1).current_hp, 38);
    }
}
