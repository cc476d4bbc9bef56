//! Turn scheduler and simulation entry points
//!
//! A battle is a sequence of rounds. Each round orders every living
//! combatant by effective speed, recomputed fresh, and gives each one an
//! action. The loop ends when a side has no living members or the round
//! cap is reached; the cap is the only guarantee of termination.

mod action;
pub mod event;
pub mod field;

pub use event::{BattleOutcome, TurnEvent};
pub use field::Battlefield;

use crate::codex;
use crate::content::ContentLibrary;
use crate::combatant::Combatant;
use crate::context::{self, BattleContext};
use crate::passive;
use event::DamageLedger;
use rand::Rng;
use std::cmp::Reverse;
use tracing::debug;

/// Round cap used by callers that do not pick their own
pub const DEFAULT_MAX_TURNS: i32 = 18;

/// Simulate a battle using the process-wide RNG
///
/// Two calls with identical inputs are not guaranteed to produce identical
/// timelines; use [`simulate_battle_with_rng`] when determinism matters.
pub fn simulate_battle(
    library: &ContentLibrary,
    allies: &[Combatant],
    enemies: &[Combatant],
    max_turns: i32,
    ctx: &BattleContext,
) -> BattleOutcome {
    simulate_battle_with_rng(library, allies, enemies, max_turns, ctx, &mut rand::thread_rng())
}

/// Simulate a battle with an explicit RNG
///
/// Inputs are cloned at entry; the caller's teams are never mutated. Both
/// teams are expected to be non-empty with positive max HP; an empty
/// opposing team resolves immediately in favor of the non-empty side.
pub fn simulate_battle_with_rng(
    library: &ContentLibrary,
    allies: &[Combatant],
    enemies: &[Combatant],
    max_turns: i32,
    ctx: &BattleContext,
    rng: &mut impl Rng,
) -> BattleOutcome {
    let mut field = Battlefield::new(allies, enemies);
    let mut ledger = DamageLedger::new();

    // Fixed setup order: shrine, structured passives, legacy codex, hazards
    context::apply_shrine_bonuses(&mut field, library, ctx);
    passive::apply_on_battle_start(&mut field, library, rng);
    codex::apply_on_battle_start(&mut field, library, rng);
    context::apply_gauntlet_hazards(&mut field, library, ctx);

    debug!(
        allies = allies.len(),
        enemies = enemies.len(),
        max_turns,
        "battle start"
    );

    let mut timeline: Vec<TurnEvent> = Vec::new();
    let mut turn = 0;
    while !field.is_over() && turn < max_turns {
        turn += 1;
        let mut order = field.living();
        // Stable sort keeps allies ahead of enemies on speed ties
        order.sort_by_key(|&i| Reverse(field.get(i).effective_speed()));
        for actor in order {
            // Skip combatants defeated earlier in this round
            if !field.get(actor).is_alive() {
                continue;
            }
            let Some(ev) =
                action::resolve_action(&mut field, library, actor, turn, &mut ledger, rng)
            else {
                break;
            };
            timeline.push(ev);
            if field.is_over() {
                break;
            }
        }
    }

    let outcome = event::build_outcome(&field, &ledger, timeline);
    debug!(winner = %outcome.winner, turns = outcome.turns, mvp = %outcome.mvp_name, "battle over");
    outcome
}
