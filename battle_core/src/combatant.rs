//! Combatant - one fighter in a battle

use crate::types::{Buff, Debuff, DebuffKind, Element, GridPosition, Rarity, Side};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Per-battle transient counters
///
/// Reset implicitly for every simulation because combatants are cloned at
/// entry and the clone owns its own state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleState {
    pub revived_once: bool,
    pub defeated_enemies: u32,
    pub times_attacked: u32,
    /// Keys of one-shot effects already consumed this battle
    pub once_per_battle_used: HashSet<String>,
    pub damage_taken: i64,
    pub damage_dealt: i64,
    pub turns_since_last_action: u32,
}

/// Chance-to-resist tables, each entry 0.0 to 1.0
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResistanceTable {
    /// Generic chance to resist any debuff
    pub debuffs: f64,
    pub elements: HashMap<Element, f64>,
    pub status_effects: HashMap<DebuffKind, f64>,
}

/// One fighter instance, ally or enemy side
///
/// A pure data container: all behavior lives in the modifier engine and the
/// battle loop. `Clone` deep-copies the effect lists and the once-per-battle
/// set, so simulations never leak mutation into caller-held templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: String,
    pub side: Side,
    pub name: String,
    /// Catalog key used to resolve passives
    pub slug: String,
    #[serde(default)]
    pub pantheon: Option<String>,
    pub rarity: Rarity,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub element: Option<Element>,
    pub max_hp: i32,
    pub atk: i32,
    pub def: i32,
    pub spd: i32,
    pub current_hp: i32,
    #[serde(default)]
    pub pos: Option<GridPosition>,
    #[serde(default)]
    pub buffs: Vec<Buff>,
    #[serde(default)]
    pub debuffs: Vec<Debuff>,
    #[serde(default)]
    pub battle_state: BattleState,
    #[serde(default)]
    pub resistances: ResistanceTable,
}

impl Combatant {
    /// Create a combatant with placeholder stats; chain `with_stats` to fill
    pub fn new(
        id: impl Into<String>,
        side: Side,
        name: impl Into<String>,
        slug: impl Into<String>,
        rarity: Rarity,
    ) -> Self {
        Combatant {
            id: id.into(),
            side,
            name: name.into(),
            slug: slug.into(),
            pantheon: None,
            rarity,
            class_name: None,
            element: None,
            max_hp: 1,
            atk: 0,
            def: 0,
            spd: 0,
            current_hp: 1,
            pos: None,
            buffs: Vec::new(),
            debuffs: Vec::new(),
            battle_state: BattleState::default(),
            resistances: ResistanceTable::default(),
        }
    }

    /// Set base stats; current HP starts full
    pub fn with_stats(mut self, max_hp: i32, atk: i32, def: i32, spd: i32) -> Self {
        self.max_hp = max_hp;
        self.atk = atk;
        self.def = def;
        self.spd = spd;
        self.current_hp = max_hp;
        self
    }

    pub fn with_identity(
        mut self,
        pantheon: Option<String>,
        class_name: Option<String>,
        element: Option<Element>,
    ) -> Self {
        self.pantheon = pantheon;
        self.class_name = class_name;
        self.element = element;
        self
    }

    pub fn with_position(mut self, pos: GridPosition) -> Self {
        self.pos = Some(pos);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Current HP as a fraction of max HP
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        self.current_hp as f64 / self.max_hp as f64
    }

    /// Restore HP, clamped to max
    pub fn heal(&mut self, amount: i32) {
        self.current_hp = (self.current_hp + amount).min(self.max_hp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BuffKind;

    fn sample() -> Combatant {
        Combatant::new("c1", Side::Ally, "Odin", "odin", Rarity::S).with_stats(100, 20, 10, 15)
    }

    #[test]
    fn test_builder_fills_current_hp() {
        let c = sample();
        assert_eq!(c.current_hp, 100);
        assert!(c.is_alive());
        assert!((c.hp_fraction() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut c = sample();
        c.current_hp = 90;
        c.heal(50);
        assert_eq!(c.current_hp, 100);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut original = sample();
        original.buffs.push(Buff::new(BuffKind::AttackUp, 0.2));
        original
            .battle_state
            .once_per_battle_used
            .insert("cheat_death_c2".to_string());

        let mut copy = original.clone();
        copy.buffs[0].value_pct = 0.9;
        copy.buffs.push(Buff::new(BuffKind::SpeedUp, 0.1));
        copy.battle_state.once_per_battle_used.insert("x".to_string());
        copy.current_hp = 1;

        assert!((original.buffs[0].value_pct - 0.2).abs() < f64::EPSILON);
        assert_eq!(original.buffs.len(), 1);
        assert_eq!(original.battle_state.once_per_battle_used.len(), 1);
        assert_eq!(original.current_hp, 100);
    }
}
