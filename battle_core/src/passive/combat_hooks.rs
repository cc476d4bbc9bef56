//! On-hit and on-being-attacked structured passives

use super::{
    DebuffList, OnHitAction, PassiveEffect, ResistKind, ResistSelector, ResistanceParams,
    positive_duration,
};
use crate::battle::field::Battlefield;
use crate::content::ContentLibrary;
use crate::types::Element;
use rand::Rng;

/// Default magnitude for guaranteed retaliation debuff lists
const RETALIATION_DEFAULT_PCT: f64 = 0.05;

/// Side effects of a landed hit, resolved before damage is applied
#[derive(Debug, Clone, Default)]
pub struct HitEffects {
    /// Bonus damage added to the hit
    pub extra_damage: i32,
    /// Extra victims of a cleave, each taking 30% of the final hit
    pub cleave_targets: Vec<usize>,
}

/// Resolve the attacker's on-hit passive against the chosen target
pub fn apply_on_hit(
    field: &mut Battlefield,
    library: &ContentLibrary,
    attacker: usize,
    target: usize,
    damage: i32,
    rng: &mut impl Rng,
) -> HitEffects {
    let mut out = HitEffects::default();
    let Some(passive) = library.structured_passive(field.get(attacker)) else {
        return out;
    };
    match &passive.effect {
        PassiveEffect::OnHitEffect(params) => {
            let chance = params.chance_pct.unwrap_or(1.0);
            if rng.gen::<f64>() > chance {
                return out;
            }
            match &params.action {
                OnHitAction::ApplyDebuff {
                    debuff,
                    value_pct,
                    duration_turns,
                } => {
                    let source = field.get(attacker).id.clone();
                    field.get_mut(target).apply_debuff(
                        *debuff,
                        value_pct.unwrap_or(0.0),
                        positive_duration(*duration_turns),
                        Some(&source),
                        false,
                        rng,
                    );
                }
                OnHitAction::Cleave => {
                    let side = field.get(attacker).side;
                    let candidates: Vec<usize> = field
                        .living_on(side.opponent())
                        .into_iter()
                        .filter(|&i| i != target)
                        .collect();
                    if !candidates.is_empty() {
                        out.cleave_targets
                            .push(candidates[rng.gen_range(0..candidates.len())]);
                    }
                }
            }
        }
        PassiveEffect::DamageModifier(params) => {
            if params.condition.matches(field.get(target)) {
                out.extra_damage = (damage as f64 * params.value_pct).round() as i32;
            }
        }
        _ => {}
    }
    out
}

/// Resolve the defender's passive; returns the (possibly zeroed) damage
pub fn apply_on_being_attacked(
    field: &mut Battlefield,
    library: &ContentLibrary,
    attacker: usize,
    target: usize,
    damage: i32,
    rng: &mut impl Rng,
) -> i32 {
    let Some(passive) = library.structured_passive(field.get(target)) else {
        return damage;
    };
    match &passive.effect {
        PassiveEffect::OnBeingAttacked(params) => {
            let source = field.get(target).id.clone();
            match &params.debuff {
                // A declared list retaliates guaranteed with small permanent debuffs
                DebuffList::Many(kinds) => {
                    for &kind in kinds {
                        field.get_mut(attacker).apply_debuff(
                            kind,
                            params.value_pct.unwrap_or(RETALIATION_DEFAULT_PCT),
                            None,
                            Some(&source),
                            true,
                            rng,
                        );
                    }
                }
                DebuffList::One(kind) => {
                    let chance = params.chance_pct.unwrap_or(1.0);
                    if rng.gen::<f64>() < chance {
                        field.get_mut(attacker).apply_debuff(
                            *kind,
                            params.value_pct.unwrap_or(0.0),
                            positive_duration(params.duration_turns),
                            Some(&source),
                            false,
                            rng,
                        );
                    }
                }
            }
            field.get_mut(target).battle_state.times_attacked += 1;
            damage
        }
        PassiveEffect::Resistance(params) => {
            // Declared physical resistance can dodge a physical attacker outright
            if resists_physical(params)
                && field.get(attacker).element == Some(Element::Physical)
                && rng.gen::<f64>() < params.chance_pct
            {
                return 0;
            }
            damage
        }
        _ => damage,
    }
}

fn resists_physical(params: &ResistanceParams) -> bool {
    matches!(
        &params.resist,
        ResistSelector::One(ResistKind::Element(Element::Physical))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Combatant;
    use crate::condition::Condition;
    use crate::config::catalog::CharacterEntry;
    use crate::passive::{
        DamageModifierParams, OnBeingAttackedParams, OnHitParams, PassiveAbility, PassiveEffect,
    };
    use crate::types::{DebuffKind, Rarity, Side};
    use rand::rngs::mock::StepRng;

    fn mid_rng() -> StepRng {
        StepRng::new(1 << 63, 0)
    }

    fn entry(slug: &str, element: Element, effect: PassiveEffect) -> CharacterEntry {
        CharacterEntry {
            id: 1,
            name: slug.to_string(),
            slug: slug.to_string(),
            pantheon: "Greek".to_string(),
            rarity: Rarity::A,
            class: "Warrior".to_string(),
            element,
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
        Combatant::new(id, side, id, slug, Rarity::A)
            .with_stats(100, 20, 10, 10)
            .with_identity(None, None, Some(Element::Physical))
    }

    #[test]
    fn test_cleave_picks_a_different_living_opponent() {
        let library = library(vec![entry(
            "reaver",
            Element::Physical,
            PassiveEffect::OnHitEffect(OnHitParams {
                chance_pct: Some(1.0),
                action: OnHitAction::Cleave,
            }),
        )]);
        let mut field = Battlefield::new(
            &[fighter("a1", "reaver", Side::Ally)],
            &[
                fighter("e1", "plain", Side::Enemy),
                fighter("e2", "plain", Side::Enemy),
            ],
        );
        let hit = apply_on_hit(&mut field, &library, 0, 1, 50, &mut mid_rng());
        assert_eq!(hit.extra_damage, 0);
        assert_eq!(hit.cleave_targets, vec![2]);

        // No second living opponent, no cleave
        field.get_mut(2).current_hp = 0;
        let hit = apply_on_hit(&mut field, &library, 0, 1, 50, &mut mid_rng());
        assert!(hit.cleave_targets.is_empty());
    }

    #[test]
    fn test_damage_modifier_respects_condition() {
        let library = library(vec![entry(
            "huntress",
            Element::Physical,
            PassiveEffect::DamageModifier(DamageModifierParams {
                condition: Condition {
                    target_hp_below: Some(0.35),
                    ..Condition::default()
                },
                value_pct: 0.3,
            }),
        )]);
        let mut field = Battlefield::new(
            &[fighter("a1", "huntress", Side::Ally)],
            &[fighter("e1", "plain", Side::Enemy)],
        );
        let hit = apply_on_hit(&mut field, &library, 0, 1, 40, &mut mid_rng());
        assert_eq!(hit.extra_damage, 0);

        field.get_mut(1).current_hp = 30;
        let hit = apply_on_hit(&mut field, &library, 0, 1, 40, &mut mid_rng());
        assert_eq!(hit.extra_damage, 12);
    }

    #[test]
    fn test_retaliation_list_is_guaranteed_and_permanent() {
        let library = library(vec![entry(
            "sobek",
            Element::Water,
            PassiveEffect::OnBeingAttacked(OnBeingAttackedParams {
                debuff: DebuffList::Many(vec![DebuffKind::AttackDown, DebuffKind::DefenseDown]),
                value_pct: Some(0.04),
                chance_pct: None,
                duration_turns: None,
            }),
        )]);
        let mut field = Battlefield::new(
            &[fighter("a1", "plain", Side::Ally)],
            &[fighter("e1", "sobek", Side::Enemy)],
        );
        let damage = apply_on_being_attacked(&mut field, &library, 0, 1, 25, &mut mid_rng());
        assert_eq!(damage, 25);
        let attacker = field.get(0);
        assert_eq!(attacker.debuffs.len(), 2);
        assert!(attacker.debuffs.iter().all(|d| d.permanent));
        assert_eq!(field.get(1).battle_state.times_attacked, 1);
    }

    #[test]
    fn test_declared_physical_resistance_can_dodge() {
        let library = library(vec![entry(
            "cat",
            Element::Physical,
            PassiveEffect::Resistance(ResistanceParams {
                resist: ResistSelector::One(ResistKind::Element(Element::Physical)),
                chance_pct: 1.0,
                value_pct: None,
                target: None,
            }),
        )]);
        let mut field = Battlefield::new(
            &[fighter("a1", "plain", Side::Ally)],
            &[fighter("e1", "cat", Side::Enemy)],
        );
        // Physical attacker: the guaranteed dodge zeroes the hit
        let damage = apply_on_being_attacked(&mut field, &library, 0, 1, 30, &mut mid_rng());
        assert_eq!(damage, 0);

        // Non-physical attacker passes straight through
        field.get_mut(0).element = Some(Element::Fire);
        let damage = apply_on_being_attacked(&mut field, &library, 0, 1, 30, &mut mid_rng());
        assert_eq!(damage, 30);
    }
}
