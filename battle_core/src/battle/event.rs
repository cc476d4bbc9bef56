//! Turn events, the damage ledger, and outcome aggregation

use super::field::Battlefield;
use crate::combatant::Combatant;
use crate::types::Side;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One resolved action, with deep team snapshots for replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnEvent {
    pub turn: i32,
    pub actor_id: String,
    pub actor_name: String,
    pub actor_slug: String,
    pub target_id: String,
    pub target_name: String,
    pub damage: i32,
    pub crit: bool,
    pub defeated_target: bool,
    pub description: String,
    /// Ally-side state immediately after this action
    pub allies: Vec<Combatant>,
    /// Enemy-side state immediately after this action
    pub enemies: Vec<Combatant>,
}

/// Final battle result handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub winner: Side,
    /// Number of resolved actions, i.e. the timeline length
    pub turns: usize,
    pub mvp_name: String,
    pub mvp_side: Side,
    pub timeline: Vec<TurnEvent>,
}

/// Cumulative damage attribution per combatant id
#[derive(Debug, Clone, Default)]
pub(crate) struct DamageLedger {
    totals: HashMap<String, i64>,
}

impl DamageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: &str, amount: i64) {
        *self.totals.entry(id.to_string()).or_insert(0) += amount;
    }

    pub fn total(&self, id: &str) -> i64 {
        self.totals.get(id).copied().unwrap_or(0)
    }
}

/// Winner and MVP from the terminal field state
///
/// Winner is the ally side whenever any ally survives, otherwise the enemy
/// side; a simultaneous double knockout therefore resolves to the enemy.
/// MVP is the highest cumulative damage dealer, first in storage order on
/// ties; with no damage recorded it falls back to the first living
/// combatant, allies first.
pub(crate) fn build_outcome(
    field: &Battlefield,
    ledger: &DamageLedger,
    timeline: Vec<TurnEvent>,
) -> BattleOutcome {
    let winner = if field.side_alive(Side::Ally) {
        Side::Ally
    } else {
        Side::Enemy
    };

    let mut mvp_idx: Option<usize> = None;
    let mut best = 0i64;
    for (i, c) in field.combatants.iter().enumerate() {
        let dealt = ledger.total(&c.id);
        if dealt > best {
            best = dealt;
            mvp_idx = Some(i);
        }
    }
    let mvp_idx = mvp_idx.or_else(|| field.living().first().copied()).unwrap_or(0);

    let turns = timeline.len();
    match field.combatants.get(mvp_idx) {
        Some(mvp) => BattleOutcome {
            winner,
            turns,
            mvp_name: mvp.name.clone(),
            mvp_side: mvp.side,
            timeline,
        },
        None => BattleOutcome {
            winner,
            turns,
            mvp_name: "Hero".to_string(),
            mvp_side: winner,
            timeline,
        },
    }
}

/// Snapshot the field into an event record
pub(crate) fn make_event(
    field: &Battlefield,
    turn: i32,
    actor: usize,
    target: usize,
    damage: i32,
    crit: bool,
    defeated_target: bool,
    description: String,
) -> TurnEvent {
    let a = field.get(actor);
    let t = field.get(target);
    TurnEvent {
        turn,
        actor_id: a.id.clone(),
        actor_name: a.name.clone(),
        actor_slug: a.slug.clone(),
        target_id: t.id.clone(),
        target_name: t.name.clone(),
        damage,
        crit,
        defeated_target,
        description,
        allies: field.snapshot(Side::Ally),
        enemies: field.snapshot(Side::Enemy),
    }
}
