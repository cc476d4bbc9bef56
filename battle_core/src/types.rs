//! Core types shared across the battle engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which team a combatant fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Ally,
    Enemy,
}

impl Side {
    /// The opposing side
    pub fn opponent(self) -> Side {
        match self {
            Side::Ally => Side::Enemy,
            Side::Enemy => Side::Ally,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Ally => write!(f, "ally"),
            Side::Enemy => write!(f, "enemy"),
        }
    }
}

/// Character rarity tier
///
/// S and A tier characters resolve their abilities through structured
/// passive descriptors; B and C tier fall back to the legacy codex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    S,
    A,
    B,
    C,
}

impl Rarity {
    /// Whether this tier carries machine-readable passive descriptors
    pub fn has_structured_passives(self) -> bool {
        matches!(self, Rarity::S | Rarity::A)
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rarity::S => write!(f, "S"),
            Rarity::A => write!(f, "A"),
            Rarity::B => write!(f, "B"),
            Rarity::C => write!(f, "C"),
        }
    }
}

/// Elemental affinity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    Fire,
    Ice,
    Water,
    Nature,
    Light,
    Dark,
    Wind,
    Lightning,
    Physical,
}

/// Slot on the 2x2 battle grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridPosition {
    FL,
    FR,
    BL,
    BR,
}

impl GridPosition {
    /// Grid slots in fill order
    pub fn all() -> &'static [GridPosition] {
        &[
            GridPosition::FL,
            GridPosition::FR,
            GridPosition::BL,
            GridPosition::BR,
        ]
    }

    /// The slot a team member occupies by join order
    pub fn for_slot(slot: usize) -> GridPosition {
        *Self::all().get(slot).unwrap_or(&GridPosition::FL)
    }
}

/// Positive effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffKind {
    AttackUp,
    DefenseUp,
    SpeedUp,
    Thorns,
    DodgeUp,
    CritChanceUp,
    HealingEffectivenessUp,
    Taunt,
    Invulnerable,
    AccuracyUp,
    DamageUp,
    HealOverTime,
    AllStatsUp,
}

/// Negative effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebuffKind {
    Poison,
    Bleed,
    Sleep,
    Stun,
    AttackDown,
    DefenseDown,
    SpeedDown,
    AccuracyDown,
    DamageDown,
    NoRevive,
    Burn,
    Freeze,
    AllStatsDown,
}

impl DebuffKind {
    /// Whether this debuff deals damage at the owner's turn start
    pub fn is_damage_over_time(self) -> bool {
        matches!(self, DebuffKind::Poison | DebuffKind::Bleed | DebuffKind::Burn)
    }

    /// Whether this debuff prevents the owner from acting
    pub fn is_incapacitating(self) -> bool {
        matches!(self, DebuffKind::Stun | DebuffKind::Sleep | DebuffKind::Freeze)
    }
}

/// Stat identifier used by passives and external bonuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatName {
    #[serde(rename = "HP")]
    Hp,
    #[serde(rename = "ATK")]
    Atk,
    #[serde(rename = "DEF")]
    Def,
    #[serde(rename = "SPD")]
    Spd,
    #[serde(rename = "all")]
    All,
    #[serde(rename = "crit_chance")]
    CritChance,
    #[serde(rename = "accuracy")]
    Accuracy,
    #[serde(rename = "healing_effectiveness")]
    HealingEffectiveness,
}

impl StatName {
    /// The buff kind a stat grant resolves to when stored as a timed buff
    ///
    /// HP grants have no percentage buff kind of their own and map to the
    /// heal-over-time tag instead.
    pub fn as_buff_kind(self) -> BuffKind {
        match self {
            StatName::Atk => BuffKind::AttackUp,
            StatName::Def => BuffKind::DefenseUp,
            StatName::Spd => BuffKind::SpeedUp,
            StatName::Hp => BuffKind::HealOverTime,
            StatName::All => BuffKind::AllStatsUp,
            StatName::CritChance => BuffKind::CritChanceUp,
            StatName::Accuracy => BuffKind::AccuracyUp,
            StatName::HealingEffectiveness => BuffKind::HealingEffectivenessUp,
        }
    }
}

/// Active positive effect on a combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub kind: BuffKind,
    /// 0.1 = +10%
    pub value_pct: f64,
    /// Remaining turn-units, ticked at the owner's turn start; None = persistent
    #[serde(default)]
    pub expires_on_turn: Option<i32>,
    #[serde(default)]
    pub stacks: Option<u32>,
    #[serde(default)]
    pub max_stacks: Option<u32>,
    #[serde(default)]
    pub once_per_battle: bool,
    /// Id of the combatant that applied this effect
    #[serde(default)]
    pub source_id: Option<String>,
}

impl Buff {
    pub fn new(kind: BuffKind, value_pct: f64) -> Self {
        Buff {
            kind,
            value_pct,
            expires_on_turn: None,
            stacks: None,
            max_stacks: None,
            once_per_battle: false,
            source_id: None,
        }
    }

    /// Set a countdown in turn-units
    pub fn with_duration(mut self, turns: i32) -> Self {
        self.expires_on_turn = Some(turns);
        self
    }

    pub fn with_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Whether the effect still counts toward stat sums
    pub fn is_active(&self) -> bool {
        self.expires_on_turn.map_or(true, |t| t > 0)
    }
}

/// Active negative effect on a combatant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debuff {
    pub kind: DebuffKind,
    /// 0.1 = -10%; status debuffs (stun, sleep, ...) carry 0
    #[serde(default)]
    pub value_pct: f64,
    /// Remaining turn-units, ticked at the owner's turn start; None = persistent
    #[serde(default)]
    pub expires_on_turn: Option<i32>,
    #[serde(default)]
    pub stacks: Option<u32>,
    /// Permanent debuffs never expire and carry no countdown
    #[serde(default)]
    pub permanent: bool,
    #[serde(default)]
    pub source_id: Option<String>,
}

impl Debuff {
    pub fn new(kind: DebuffKind, value_pct: f64) -> Self {
        Debuff {
            kind,
            value_pct,
            expires_on_turn: None,
            stacks: None,
            permanent: false,
            source_id: None,
        }
    }

    pub fn with_duration(mut self, turns: i32) -> Self {
        self.expires_on_turn = Some(turns);
        self
    }

    pub fn with_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Whether the effect still counts toward stat sums
    pub fn is_active(&self) -> bool {
        self.expires_on_turn.map_or(true, |t| t > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Ally.opponent(), Side::Enemy);
        assert_eq!(Side::Enemy.opponent(), Side::Ally);
    }

    #[test]
    fn test_structured_passive_tiers() {
        assert!(Rarity::S.has_structured_passives());
        assert!(Rarity::A.has_structured_passives());
        assert!(!Rarity::B.has_structured_passives());
        assert!(!Rarity::C.has_structured_passives());
    }

    #[test]
    fn test_buff_active_window() {
        let persistent = Buff::new(BuffKind::AttackUp, 0.1);
        assert!(persistent.is_active());

        let mut timed = Buff::new(BuffKind::AttackUp, 0.1).with_duration(2);
        assert!(timed.is_active());
        timed.expires_on_turn = Some(0);
        assert!(!timed.is_active());
    }

    #[test]
    fn test_dot_and_incapacitating_kinds() {
        assert!(DebuffKind::Poison.is_damage_over_time());
        assert!(DebuffKind::Burn.is_damage_over_time());
        assert!(!DebuffKind::Stun.is_damage_over_time());

        assert!(DebuffKind::Sleep.is_incapacitating());
        assert!(DebuffKind::Freeze.is_incapacitating());
        assert!(!DebuffKind::Poison.is_incapacitating());
    }

    #[test]
    fn test_stat_name_serde_names() {
        assert_eq!(serde_json::to_string(&StatName::Atk).unwrap(), "\"ATK\"");
        assert_eq!(serde_json::to_string(&StatName::All).unwrap(), "\"all\"");
        assert_eq!(
            serde_json::to_string(&StatName::CritChance).unwrap(),
            "\"crit_chance\""
        );
    }

    #[test]
    fn test_buff_kind_serde_names() {
        assert_eq!(
            serde_json::to_string(&BuffKind::AttackUp).unwrap(),
            "\"attack_up\""
        );
        assert_eq!(
            serde_json::to_string(&DebuffKind::AllStatsDown).unwrap(),
            "\"all_stats_down\""
        );
    }
}
