//! One-shot pre-battle context: shrine bonuses and gauntlet hazards

use crate::battle::field::Battlefield;
use crate::config::environment::{EffigyEffect, HazardAction, HazardTarget};
use crate::content::ContentLibrary;
use crate::passive::positive_duration;
use crate::types::{Debuff, Side};
use serde::{Deserialize, Serialize};

/// External modifiers applied once before the first round
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleContext {
    pub shrine: Option<ShrineContext>,
    pub gauntlet: Option<GauntletContext>,
}

/// The player's persisted shrine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShrineContext {
    /// Pantheon alignment granting bonuses to matching allies
    pub alignment: Option<String>,
    /// Equipped effigy id
    pub effigy_id: Option<String>,
}

/// Gauntlet environment for this battle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GauntletContext {
    /// Single-hazard shorthand, used when `hazards` is empty
    pub id: Option<String>,
    pub hazards: Vec<String>,
}

/// Alignment and effigy bonuses for the ally team
pub fn apply_shrine_bonuses(
    field: &mut Battlefield,
    library: &ContentLibrary,
    ctx: &BattleContext,
) {
    let Some(shrine) = &ctx.shrine else {
        return;
    };

    if let Some(alignment) = &shrine.alignment {
        let bonuses = library.alignment_bonuses(alignment).to_vec();
        if !bonuses.is_empty() {
            let allies: Vec<usize> = field.indices_on(Side::Ally).collect();
            for idx in allies {
                if field.get(idx).pantheon.as_deref() != Some(alignment.as_str()) {
                    continue;
                }
                for bonus in &bonuses {
                    field
                        .get_mut(idx)
                        .apply_stat_bonus(bonus.stat, bonus.value_pct, None);
                }
            }
        }
    }

    if let Some(effigy_id) = &shrine.effigy_id {
        let Some(effigy) = library.effigy(effigy_id) else {
            return;
        };
        let effects = effigy.effects.clone();
        let allies: Vec<usize> = field.indices_on(Side::Ally).collect();
        for effect in &effects {
            let EffigyEffect::TeamBuffIf {
                condition,
                stat,
                value_pct,
            } = effect;
            for &idx in &allies {
                if condition
                    .as_ref()
                    .map_or(true, |c| c.matches(field.get(idx)))
                {
                    field.get_mut(idx).apply_stat_bonus(*stat, *value_pct, None);
                }
            }
        }
    }
}

/// Hazard effects keyed by gauntlet hazard ids
///
/// Hazard debuffs are environmental and bypass resistance rolls.
pub fn apply_gauntlet_hazards(
    field: &mut Battlefield,
    library: &ContentLibrary,
    ctx: &BattleContext,
) {
    let Some(gauntlet) = &ctx.gauntlet else {
        return;
    };
    let hazard_ids: Vec<String> = if gauntlet.hazards.is_empty() {
        gauntlet.id.iter().cloned().collect()
    } else {
        gauntlet.hazards.clone()
    };

    for hazard_id in &hazard_ids {
        let effects = library.hazard_effects(hazard_id).to_vec();
        for effect in &effects {
            let target = effect.target.unwrap_or(HazardTarget::All);
            if matches!(target, HazardTarget::All | HazardTarget::Allies) {
                apply_hazard_to_side(field, Side::Ally, &effect.action);
            }
            if matches!(target, HazardTarget::All | HazardTarget::Enemies) {
                apply_hazard_to_side(field, Side::Enemy, &effect.action);
            }
        }
    }
}

fn apply_hazard_to_side(field: &mut Battlefield, side: Side, action: &HazardAction) {
    let members: Vec<usize> = field.indices_on(side).collect();
    for idx in members {
        match action {
            HazardAction::ApplyDebuff {
                debuff,
                value_pct,
                duration_turns,
            } => {
                let mut effect = Debuff::new(*debuff, value_pct.unwrap_or(0.0));
                effect.expires_on_turn = positive_duration(*duration_turns);
                field.get_mut(idx).debuffs.push(effect);
            }
            HazardAction::ApplyDebuffIf {
                condition,
                debuff,
                value_pct,
                duration_turns,
            } => {
                if condition.matches(field.get(idx)) {
                    let mut effect = Debuff::new(*debuff, value_pct.unwrap_or(0.0));
                    effect.expires_on_turn = positive_duration(*duration_turns);
                    field.get_mut(idx).debuffs.push(effect);
                }
            }
            HazardAction::TeamBuffIf {
                condition,
                stat,
                value_pct,
            } => {
                if condition.matches(field.get(idx)) {
                    field.get_mut(idx).apply_stat_bonus(*stat, *value_pct, None);
                }
            }
        }
    }
}
