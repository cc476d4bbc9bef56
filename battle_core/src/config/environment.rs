//! Hazard, effigy, and pantheon-bonus tables

use crate::condition::Condition;
use crate::types::{DebuffKind, StatName};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A flat stat grant from an external source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatBonus {
    pub stat: StatName,
    pub value_pct: f64,
}

/// Which side a hazard effect hits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardTarget {
    All,
    Allies,
    Enemies,
}

/// One environmental effect of a hazard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardEffect {
    #[serde(default)]
    pub target: Option<HazardTarget>,
    #[serde(flatten)]
    pub action: HazardAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HazardAction {
    ApplyDebuff {
        debuff: DebuffKind,
        #[serde(default)]
        value_pct: Option<f64>,
        #[serde(default)]
        duration_turns: Option<i32>,
    },
    ApplyDebuffIf {
        condition: Condition,
        debuff: DebuffKind,
        #[serde(default)]
        value_pct: Option<f64>,
        #[serde(default)]
        duration_turns: Option<i32>,
    },
    TeamBuffIf {
        condition: Condition,
        stat: StatName,
        value_pct: f64,
    },
}

/// Container for the hazard table, keyed by hazard id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HazardsConfig {
    #[serde(default)]
    pub hazards: HashMap<String, Vec<HazardEffect>>,
}

/// An equippable effigy and its team-wide effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effigy {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub effects: Vec<EffigyEffect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EffigyEffect {
    TeamBuffIf {
        #[serde(default)]
        condition: Option<Condition>,
        stat: StatName,
        value_pct: f64,
    },
}

/// Container for the effigy table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffigiesConfig {
    #[serde(default)]
    pub effigies: Vec<Effigy>,
}

/// Container for the pantheon alignment-bonus table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PantheonBonusesConfig {
    #[serde(default)]
    pub pantheons: HashMap<String, Vec<StatBonus>>,
}
