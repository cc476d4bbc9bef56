//! Legacy ability codex - keyword-matched fallback resolution
//!
//! B and C tier characters have no structured passive descriptor, only
//! free-form ability text. The codex maps lowercase keywords to a small,
//! fixed effect vocabulary per hook. Intentionally simpler than the
//! structured path: deterministic by keyword, not by parameters.

use crate::battle::field::Battlefield;
use crate::content::ContentLibrary;
use crate::passive::positive_duration;
use crate::types::{BuffKind, Debuff, DebuffKind, Side, StatName};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Fraction of the attacker's max HP each point of thorns reflects, scaled
/// by ten times the summed thorns percentage
const THORNS_BASE_PCT: f64 = 0.05;

/// Keyword rule tables, one list per hook
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityCodex {
    #[serde(rename = "OnBattleStart")]
    pub on_battle_start: Vec<CodexRule>,
    #[serde(rename = "OnAttack")]
    pub on_attack: Vec<CodexRule>,
    #[serde(rename = "OnBeingAttacked")]
    pub on_being_attacked: Vec<CodexRule>,
    #[serde(rename = "Thresholds")]
    pub thresholds: Vec<CodexRule>,
    #[serde(rename = "OnTurnEnd")]
    pub on_turn_end: Vec<CodexRule>,
    #[serde(rename = "OnAllyDefeat")]
    pub on_ally_defeat: Vec<CodexRule>,
}

/// One keyword and the canned effect it triggers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodexRule {
    #[serde(rename = "match")]
    pub keyword: String,
    pub effect: CodexEffect,
}

/// Which team a codex effect lands on, relative to the ability carrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodexTarget {
    OwnTeam,
    Opponents,
}

/// A permanent debuff pushed onto the attacker by a retaliation rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermanentDebuffSpec {
    pub kind: DebuffKind,
    #[serde(default)]
    pub value_pct: f64,
}

/// The constrained legacy effect vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CodexEffect {
    TeamBuff {
        #[serde(default)]
        target: Option<CodexTarget>,
        stat: StatName,
        value_pct: f64,
    },
    ApplyDebuff {
        #[serde(default)]
        target: Option<CodexTarget>,
        debuff: DebuffKind,
        #[serde(default)]
        value_pct: Option<f64>,
        #[serde(default)]
        duration_turns: Option<i32>,
    },
    ApplyDebuffChance {
        chance: f64,
        debuff: DebuffKind,
        #[serde(default)]
        value_pct: Option<f64>,
        #[serde(default)]
        duration_turns: Option<i32>,
    },
    AttackerPermanentDebuff {
        debuffs: Vec<PermanentDebuffSpec>,
    },
    ExecuteBelowPct {
        value_pct: f64,
    },
    TeamHeal {
        value_pct: f64,
    },
    HealMostInjured {
        value_pct: f64,
    },
    SelfBuff {
        stat: StatName,
        value_pct: f64,
        #[serde(default)]
        duration_turns: Option<i32>,
    },
}

fn matched_rules<'a>(rules: &'a [CodexRule], text: &'a str) -> impl Iterator<Item = &'a CodexRule> {
    rules
        .iter()
        .filter(move |r| text.contains(&r.keyword.to_lowercase()))
}

/// Battle-start codex effects for every legacy-tier combatant
pub fn apply_on_battle_start(
    field: &mut Battlefield,
    library: &ContentLibrary,
    rng: &mut impl Rng,
) {
    for idx in 0..field.combatants.len() {
        let Some(text) = library.legacy_ability_text(field.get(idx)) else {
            continue;
        };
        let own_side = field.get(idx).side;
        let source = field.get(idx).id.clone();
        for rule in matched_rules(&library.codex().on_battle_start, &text) {
            match &rule.effect {
                CodexEffect::TeamBuff {
                    target,
                    stat,
                    value_pct,
                } => {
                    // Only the three core stats translate to a team buff kind
                    let kind = match stat {
                        StatName::Atk => BuffKind::AttackUp,
                        StatName::Def => BuffKind::DefenseUp,
                        StatName::Spd => BuffKind::SpeedUp,
                        _ => continue,
                    };
                    let side = match target {
                        Some(CodexTarget::OwnTeam) => own_side,
                        _ => own_side.opponent(),
                    };
                    let members: Vec<usize> = field.indices_on(side).collect();
                    for m in members {
                        field.get_mut(m).apply_buff(kind, *value_pct, None, None);
                    }
                }
                CodexEffect::ApplyDebuff {
                    target,
                    debuff,
                    value_pct,
                    duration_turns,
                } => {
                    let side = match target {
                        Some(CodexTarget::Opponents) => own_side.opponent(),
                        _ => own_side,
                    };
                    let members: Vec<usize> = field.indices_on(side).collect();
                    for m in members {
                        field.get_mut(m).apply_debuff(
                            *debuff,
                            value_pct.unwrap_or(0.0),
                            positive_duration(*duration_turns),
                            Some(&source),
                            false,
                            rng,
                        );
                    }
                }
                _ => {}
            }
        }
    }
}

/// Retaliation rules and thorns reflect, resolved on the defender
pub fn apply_on_being_attacked(
    field: &mut Battlefield,
    library: &ContentLibrary,
    attacker: usize,
    target: usize,
) {
    let Some(text) = library.legacy_ability_text(field.get(target)) else {
        return;
    };
    let source = field.get(target).id.clone();
    let mut pushes: Vec<Debuff> = Vec::new();
    for rule in matched_rules(&library.codex().on_being_attacked, &text) {
        if let CodexEffect::AttackerPermanentDebuff { debuffs } = &rule.effect {
            for spec in debuffs {
                pushes.push(
                    Debuff::new(spec.kind, spec.value_pct).with_source(source.clone()),
                );
            }
        }
    }
    field.get_mut(attacker).debuffs.extend(pushes);

    let thorns_pct = field.get(target).sum_buff_pct(BuffKind::Thorns);
    if thorns_pct > 0.0 {
        let attacker_max = field.get(attacker).max_hp;
        let reflect =
            ((attacker_max as f64 * THORNS_BASE_PCT * thorns_pct * 10.0).round() as i32).max(1);
        let a = field.get_mut(attacker);
        a.current_hp = (a.current_hp - reflect).max(0);
    }
}

/// Chance-gated status application from the attacker's ability text
pub fn apply_on_attack_status(
    field: &mut Battlefield,
    library: &ContentLibrary,
    attacker: usize,
    target: usize,
    rng: &mut impl Rng,
) {
    let Some(text) = library.legacy_ability_text(field.get(attacker)) else {
        return;
    };
    let source = field.get(attacker).id.clone();
    for rule in matched_rules(&library.codex().on_attack, &text) {
        if let CodexEffect::ApplyDebuffChance {
            chance,
            debuff,
            value_pct,
            duration_turns,
        } = &rule.effect
        {
            if rng.gen::<f64>() < *chance {
                field.get_mut(target).apply_debuff(
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

/// Execute rules: finish off a target below an HP fraction
pub fn apply_thresholds(
    field: &mut Battlefield,
    library: &ContentLibrary,
    attacker: usize,
    target: usize,
) {
    let Some(text) = library.legacy_ability_text(field.get(attacker)) else {
        return;
    };
    for rule in matched_rules(&library.codex().thresholds, &text) {
        if let CodexEffect::ExecuteBelowPct { value_pct } = &rule.effect {
            let t = field.get(target);
            if t.is_alive() && t.hp_fraction() <= *value_pct {
                field.get_mut(target).current_hp = 0;
            }
        }
    }
}

/// Turn-end heals from the actor's ability text
pub fn apply_on_turn_end(field: &mut Battlefield, library: &ContentLibrary, actor: usize) {
    let Some(text) = library.legacy_ability_text(field.get(actor)) else {
        return;
    };
    let side = field.get(actor).side;
    for rule in matched_rules(&library.codex().on_turn_end, &text) {
        match &rule.effect {
            CodexEffect::TeamHeal { value_pct } => {
                let members: Vec<usize> = field.indices_on(side).collect();
                for m in members {
                    let heal =
                        ((field.get(m).max_hp as f64 * value_pct).round() as i32).max(1);
                    field.get_mut(m).heal(heal);
                }
            }
            CodexEffect::HealMostInjured { value_pct } => {
                let injured: Vec<usize> = field
                    .living_on(side)
                    .into_iter()
                    .filter(|&i| field.get(i).current_hp < field.get(i).max_hp)
                    .collect();
                let most_injured = injured.into_iter().min_by(|&a, &b| {
                    field
                        .get(a)
                        .hp_fraction()
                        .partial_cmp(&field.get(b).hp_fraction())
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                if let Some(t) = most_injured {
                    let heal =
                        ((field.get(t).max_hp as f64 * value_pct).round() as i32).max(1);
                    field.get_mut(t).heal(heal);
                }
            }
            _ => {}
        }
    }
}

/// Self buffs granted to legacy-tier survivors when a teammate falls
pub fn apply_on_ally_defeat(field: &mut Battlefield, library: &ContentLibrary, side: Side) {
    let members: Vec<usize> = field.living_on(side);
    for ally in members {
        let Some(text) = library.legacy_ability_text(field.get(ally)) else {
            continue;
        };
        let source = field.get(ally).id.clone();
        for rule in matched_rules(&library.codex().on_ally_defeat, &text) {
            if let CodexEffect::SelfBuff {
                stat,
                value_pct,
                duration_turns,
            } = &rule.effect
            {
                let kind = stat.as_buff_kind();
                field.get_mut(ally).apply_buff(
                    kind,
                    *value_pct,
                    positive_duration(*duration_turns),
                    Some(&source),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codex_tables() {
        let toml = r#"
[[OnBattleStart]]
match = "war cry"

[OnBattleStart.effect]
type = "TeamBuff"
target = "own_team"
stat = "ATK"
value_pct = 0.1

[[OnBeingAttacked]]
match = "spines"

[OnBeingAttacked.effect]
type = "AttackerPermanentDebuff"
debuffs = [{ kind = "attack_down", value_pct = 0.03 }]

[[Thresholds]]
match = "reap"

[Thresholds.effect]
type = "ExecuteBelowPct"
value_pct = 0.15
"#;
        let codex: AbilityCodex = toml::from_str(toml).unwrap();
        assert_eq!(codex.on_battle_start.len(), 1);
        assert_eq!(codex.on_battle_start[0].keyword, "war cry");
        assert!(matches!(
            codex.on_being_attacked[0].effect,
            CodexEffect::AttackerPermanentDebuff { .. }
        ));
        assert!(codex.on_attack.is_empty());
        assert!(matches!(
            codex.thresholds[0].effect,
            CodexEffect::ExecuteBelowPct { .. }
        ));
    }

    #[test]
    fn test_keyword_matching_is_substring_based() {
        let rules = vec![CodexRule {
            keyword: "Venom".to_string(),
            effect: CodexEffect::TeamHeal { value_pct: 0.1 },
        }];
        let hits: Vec<_> = matched_rules(&rules, "strikes with deadly venomous fangs").collect();
        assert_eq!(hits.len(), 1);
        let misses: Vec<_> = matched_rules(&rules, "a gentle breeze").collect();
        assert!(misses.is_empty());
    }

    use crate::combatant::Combatant;
    use crate::config::catalog::CharacterEntry;
    use crate::types::{Buff, Rarity};
    use rand::rngs::mock::StepRng;

    fn mid_rng() -> StepRng {
        StepRng::new(1 << 63, 0)
    }

    fn legacy_entry(slug: &str, rarity: Rarity, ability: &str) -> CharacterEntry {
        CharacterEntry {
            id: 1,
            name: slug.to_string(),
            slug: slug.to_string(),
            pantheon: "Norse".to_string(),
            rarity,
            class: "Warrior".to_string(),
            element: crate::types::Element::Physical,
            hp: 100,
            atk: 10,
            def: 10,
            spd: 10,
            passive_ability_name: Some(ability.to_string()),
            passive_ability_desc: None,
            passive: None,
        }
    }

    fn library(entries: Vec<CharacterEntry>, codex: AbilityCodex) -> ContentLibrary {
        ContentLibrary::new(
            entries,
            codex,
            Default::default(),
            Vec::new(),
            Default::default(),
        )
    }

    fn fighter(id: &str, slug: &str, side: Side, rarity: Rarity) -> Combatant {
        Combatant::new(id, side, id, slug, rarity).with_stats(100, 20, 10, 10)
    }

    fn war_cry_codex() -> AbilityCodex {
        AbilityCodex {
            on_battle_start: vec![CodexRule {
                keyword: "war cry".to_string(),
                effect: CodexEffect::TeamBuff {
                    target: Some(CodexTarget::OwnTeam),
                    stat: StatName::Atk,
                    value_pct: 0.1,
                },
            }],
            ..AbilityCodex::default()
        }
    }

    #[test]
    fn test_battle_start_keyword_buffs_own_team() {
        let library = library(
            vec![legacy_entry("tyr", Rarity::B, "Mighty War Cry")],
            war_cry_codex(),
        );
        let mut field = Battlefield::new(
            &[
                fighter("tyr", "tyr", Side::Ally, Rarity::B),
                fighter("a2", "none", Side::Ally, Rarity::C),
            ],
            &[fighter("e1", "none", Side::Enemy, Rarity::C)],
        );
        apply_on_battle_start(&mut field, &library, &mut mid_rng());

        assert!((field.get(0).sum_buff_pct(BuffKind::AttackUp) - 0.1).abs() < 1e-9);
        assert!((field.get(1).sum_buff_pct(BuffKind::AttackUp) - 0.1).abs() < 1e-9);
        assert!(field.get(2).buffs.is_empty());
    }

    #[test]
    fn test_structured_tiers_skip_the_codex() {
        let library = library(
            vec![legacy_entry("tyr", Rarity::S, "Mighty War Cry")],
            war_cry_codex(),
        );
        let mut field = Battlefield::new(
            &[fighter("tyr", "tyr", Side::Ally, Rarity::S)],
            &[fighter("e1", "none", Side::Enemy, Rarity::C)],
        );
        apply_on_battle_start(&mut field, &library, &mut mid_rng());
        assert!(field.get(0).buffs.is_empty());
    }

    #[test]
    fn test_thorns_reflect_damages_the_attacker() {
        let library = library(
            vec![legacy_entry("urchin", Rarity::C, "Prickly")],
            AbilityCodex::default(),
        );
        let mut field = Battlefield::new(
            &[fighter("att", "none", Side::Ally, Rarity::C)],
            &[fighter("urchin", "urchin", Side::Enemy, Rarity::C)],
        );
        field.get_mut(1).buffs.push(Buff::new(BuffKind::Thorns, 0.2));

        apply_on_being_attacked(&mut field, &library, 0, 1);

        // max(1, round(100 * 0.05 * 0.2 * 10)) = 10
        assert_eq!(field.get(0).current_hp, 90);
    }

    #[test]
    fn test_execute_threshold_finishes_weakened_targets() {
        let codex = AbilityCodex {
            thresholds: vec![CodexRule {
                keyword: "reap".to_string(),
                effect: CodexEffect::ExecuteBelowPct { value_pct: 0.15 },
            }],
            ..AbilityCodex::default()
        };
        let library = library(
            vec![legacy_entry("thanatos", Rarity::B, "Reaps the dying")],
            codex,
        );
        let mut field = Battlefield::new(
            &[fighter("thanatos", "thanatos", Side::Ally, Rarity::B)],
            &[fighter("e1", "none", Side::Enemy, Rarity::C)],
        );

        field.get_mut(1).current_hp = 16;
        apply_thresholds(&mut field, &library, 0, 1);
        assert_eq!(field.get(1).current_hp, 16);

        field.get_mut(1).current_hp = 15;
        apply_thresholds(&mut field, &library, 0, 1);
        assert_eq!(field.get(1).current_hp, 0);
    }

    #[test]
    fn test_turn_end_team_heal_and_most_injured() {
        let codex = AbilityCodex {
            on_turn_end: vec![
                CodexRule {
                    keyword: "mends".to_string(),
                    effect: CodexEffect::TeamHeal { value_pct: 0.03 },
                },
                CodexRule {
                    keyword: "tends the wounded".to_string(),
                    effect: CodexEffect::HealMostInjured { value_pct: 0.08 },
                },
            ],
            ..AbilityCodex::default()
        };
        let library = library(
            vec![legacy_entry("sif", Rarity::C, "She tends the wounded")],
            codex,
        );
        let mut field = Battlefield::new(
            &[
                fighter("sif", "sif", Side::Ally, Rarity::C),
                fighter("a2", "none", Side::Ally, Rarity::C),
            ],
            &[fighter("e1", "none", Side::Enemy, Rarity::C)],
        );
        field.get_mut(0).current_hp = 90;
        field.get_mut(1).current_hp = 40;

        apply_on_turn_end(&mut field, &library, 0);

        // Only the most-injured rule matches her text
        assert_eq!(field.get(0).current_hp, 90);
        assert_eq!(field.get(1).current_hp, 48);
    }
}
