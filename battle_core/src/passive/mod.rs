//! Structured passive abilities
//!
//! S and A tier characters carry a machine-readable passive descriptor in
//! the catalog. `PassiveEffect` is a closed tagged union with one variant
//! per hook-effect combination; every dispatch site matches exhaustively,
//! so an unrecognized descriptor is a parse error instead of a silent no-op.

mod battle_start;
mod combat_hooks;
mod defeat;
mod turn;

pub use battle_start::apply_on_battle_start;
pub use combat_hooks::{apply_on_being_attacked, apply_on_hit, HitEffects};
pub use defeat::{
    apply_on_ally_defeat, apply_on_enemy_defeat, attempt_self_revive, check_health_thresholds,
};
pub use turn::{apply_on_turn_end, apply_on_turn_start};

use crate::condition::Condition;
use crate::targeting::TargetRule;
use crate::types::{BuffKind, DebuffKind, Element, StatName};
use serde::{Deserialize, Serialize};

/// A named passive ability with its machine-readable effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassiveAbility {
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(flatten)]
    pub effect: PassiveEffect,
}

/// Every structured passive the engine understands, tagged by hook
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum PassiveEffect {
    /// Battle start: a standing grant to allies and/or affliction on enemies
    Aura(AuraParams),
    /// Battle start: buff/debuff application to a selectable target group
    ApplyEffectOnBattleStart(BattleStartApplication),
    /// Battle start: stat grant to the whole team
    TeamBuff(TeamBuffParams),
    /// Battle start: conditional stat grant to self
    SelfBuff(SelfBuffParams),
    /// Battle start: resistance-table grants; also checked at damage time
    /// for the physical-dodge case
    Resistance(ResistanceParams),
    OnTurnStart(TurnStartEffect),
    OnHitEffect(OnHitParams),
    /// Bonus damage against targets matching a condition
    DamageModifier(DamageModifierParams),
    OnBeingAttacked(OnBeingAttackedParams),
    OnTurnEnd(TurnEndEffect),
    OnEnemyDefeat(EnemyDefeatParams),
    /// Cheat death for a falling teammate
    OnAllyDefeat(AllyDefeatEffect),
    SelfRevive(SelfReviveParams),
    /// Fires when any teammate crosses a health threshold
    ReactiveTrigger(ReactiveTriggerParams),
    /// Self buff scaling in steps per 20% of missing HP
    SelfBuffOnHealthLoss(HealthLossParams),
}

/// One stat or several, wherever a grant may fan out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatSelector {
    One(StatName),
    Many(Vec<StatName>),
}

impl StatSelector {
    pub fn iter(&self) -> impl Iterator<Item = StatName> + '_ {
        match self {
            StatSelector::One(s) => std::slice::from_ref(s).iter().copied(),
            StatSelector::Many(v) => v.iter().copied(),
        }
    }
}

/// Literal `"random"` in reference data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RandomToken {
    Random,
}

/// A concrete buff grant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffSpec {
    #[serde(rename = "type")]
    pub kind: BuffKind,
    #[serde(default)]
    pub value_pct: Option<f64>,
    #[serde(default)]
    pub duration_turns: Option<i32>,
}

/// A concrete debuff grant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebuffSpec {
    #[serde(rename = "type")]
    pub kind: DebuffKind,
    #[serde(default)]
    pub value_pct: Option<f64>,
    #[serde(default)]
    pub duration_turns: Option<i32>,
}

/// A fixed buff or one picked at random from the standard pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuffGrant {
    Random(RandomToken),
    Fixed(BuffSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DebuffGrant {
    Random(RandomToken),
    Fixed(DebuffSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuraParams {
    #[serde(default)]
    pub ally_buff: Option<AuraAllyBuff>,
    #[serde(default)]
    pub enemy_debuff: Option<AuraEnemyDebuff>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuraAllyBuff {
    #[serde(default)]
    pub condition: Option<Condition>,
    #[serde(flatten)]
    pub grant: AuraGrant,
}

/// What an aura gives its side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuraGrant {
    /// Healing consumed at the aura carrier's turn start
    HealOverTime { value_pct: f64 },
    StatBuff { stat: StatSelector, value_pct: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuraEnemyDebuff {
    pub debuff: DebuffKind,
    #[serde(default)]
    pub value_pct: Option<f64>,
    #[serde(default)]
    pub duration_turns: Option<i32>,
    #[serde(default)]
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleStartApplication {
    /// Defaults to the carrier's own team
    #[serde(default)]
    pub target: Option<TargetRule>,
    #[serde(default)]
    pub buff: Option<BuffGrant>,
    #[serde(default)]
    pub debuff: Option<DebuffGrant>,
    /// Secondary target group; only random debuffs land there
    #[serde(default)]
    pub target2: Option<TargetRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamBuffParams {
    pub stat: StatSelector,
    pub value_pct: f64,
    #[serde(default)]
    pub condition: Option<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfBuffParams {
    pub stat: StatSelector,
    pub value_pct: f64,
    /// May use the team-aware predicates
    #[serde(default)]
    pub condition: Option<Condition>,
}

/// What a resistance grant protects against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResistKind {
    Element(Element),
    Status(DebuffKind),
    Generic(GenericResist),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenericResist {
    Debuff,
    Any,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResistSelector {
    One(ResistKind),
    Many(Vec<ResistKind>),
}

impl ResistSelector {
    pub fn iter(&self) -> impl Iterator<Item = &ResistKind> + '_ {
        match self {
            ResistSelector::One(k) => std::slice::from_ref(k).iter(),
            ResistSelector::Many(v) => v.iter(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResistScope {
    Team,
    #[serde(rename = "self")]
    SelfOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResistanceParams {
    pub resist: ResistSelector,
    #[serde(default)]
    pub chance_pct: f64,
    /// Element grants may override the chance with a dedicated value
    #[serde(default)]
    pub value_pct: Option<f64>,
    #[serde(default)]
    pub target: Option<ResistScope>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect")]
pub enum TurnStartEffect {
    /// Shorten active debuff countdowns on every ally
    ReduceDebuffDuration {
        #[serde(default = "default_one")]
        value: i32,
    },
    ApplyBuff {
        #[serde(default)]
        target: Option<TargetRule>,
        buff: BuffKind,
        #[serde(default)]
        value_pct: Option<f64>,
        #[serde(default)]
        duration_turns: Option<i32>,
    },
    /// Chance-gated debuff, by default on the fastest enemy
    ApplyDebuff {
        chance_pct: f64,
        #[serde(default)]
        target: Option<TargetRule>,
        debuff: DebuffKind,
        #[serde(default)]
        value_pct: Option<f64>,
        #[serde(default)]
        duration_turns: Option<i32>,
    },
}

fn default_one() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnHitParams {
    /// Defaults to always firing
    #[serde(default)]
    pub chance_pct: Option<f64>,
    #[serde(flatten)]
    pub action: OnHitAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum OnHitAction {
    /// 30% of the hit spills onto one extra random living opponent
    Cleave,
    ApplyDebuff {
        debuff: DebuffKind,
        #[serde(default)]
        value_pct: Option<f64>,
        #[serde(default)]
        duration_turns: Option<i32>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageModifierParams {
    #[serde(default)]
    pub condition: Condition,
    pub value_pct: f64,
}

/// One debuff kind or a list; a list is applied guaranteed and permanent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DebuffList {
    One(DebuffKind),
    Many(Vec<DebuffKind>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnBeingAttackedParams {
    pub debuff: DebuffList,
    #[serde(default)]
    pub value_pct: Option<f64>,
    #[serde(default)]
    pub chance_pct: Option<f64>,
    #[serde(default)]
    pub duration_turns: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealTarget {
    MostInjuredAlly,
    Allies,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect")]
pub enum TurnEndEffect {
    Heal { target: HealTarget, value_pct: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatGrant {
    pub stat: StatName,
    pub value_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyDefeatParams {
    pub buff: StatGrant,
    #[serde(default)]
    pub stacking: bool,
    #[serde(default)]
    pub max_stacks: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect")]
pub enum AllyDefeatEffect {
    CheatDeath {
        #[serde(default)]
        heal_to_hp_pct: Option<f64>,
        #[serde(default)]
        apply_buff: Option<BuffSpec>,
        #[serde(default)]
        once_per_battle: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfReviveParams {
    #[serde(default)]
    pub revive_hp_pct: Option<f64>,
    #[serde(default)]
    pub buffs: Vec<BuffSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReactiveTriggerKind {
    #[serde(rename = "ally_hp_below_25")]
    AllyHpBelow25,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReactiveEffect {
    Heal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactiveTriggerParams {
    pub trigger: ReactiveTriggerKind,
    pub effect: ReactiveEffect,
    pub value_pct: f64,
    #[serde(default)]
    pub once_per_battle: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthLossParams {
    pub stat: StatName,
    pub value_pct_per_20_pct_missing: f64,
}

/// Durations of zero or less in reference data mean "no expiry"
pub(crate) fn positive_duration(duration: Option<i32>) -> Option<i32> {
    duration.filter(|d| *d > 0)
}
