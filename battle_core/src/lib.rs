//! battle_core - Turn-based team battle simulation engine
//!
//! This library provides:
//! - Combatant: the value type for one fighter, with buffs, debuffs, and
//!   per-battle state
//! - Modifier engine: percentage stat composition with a 0.5x floor,
//!   resistance rolls, and timed-effect expiry
//! - Structured passives and the legacy ability codex, dispatched per hook
//! - ContentLibrary: typed reference tables injected into the simulator
//! - simulate_battle: the round-based scheduler producing a full timeline
//!   and outcome

pub mod battle;
pub mod codex;
pub mod combatant;
pub mod condition;
pub mod config;
pub mod content;
pub mod context;
pub mod modifier;
pub mod passive;
pub mod prelude;
pub mod render;
pub mod targeting;
pub mod team;
pub mod types;

// Re-export core types for convenience
pub use battle::{
    simulate_battle, simulate_battle_with_rng, BattleOutcome, TurnEvent, DEFAULT_MAX_TURNS,
};
pub use combatant::{BattleState, Combatant, ResistanceTable};
pub use config::{CharacterEntry, ConfigError};
pub use content::ContentLibrary;
pub use context::{BattleContext, GauntletContext, ShrineContext};
pub use passive::{PassiveAbility, PassiveEffect};
pub use types::{Buff, BuffKind, Debuff, DebuffKind, Element, GridPosition, Rarity, Side};
