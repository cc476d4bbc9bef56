//! Prelude module for convenient imports
//!
//! ```rust
//! use battle_core::prelude::*;
//! ```

// Core types
pub use crate::combatant::{BattleState, Combatant, ResistanceTable};
pub use crate::types::{
    Buff, BuffKind, Debuff, DebuffKind, Element, GridPosition, Rarity, Side, StatName,
};

// Simulation
pub use crate::battle::{
    simulate_battle, simulate_battle_with_rng, BattleOutcome, TurnEvent, DEFAULT_MAX_TURNS,
};
pub use crate::context::{BattleContext, GauntletContext, ShrineContext};

// Reference data
pub use crate::config::CharacterEntry;
pub use crate::content::ContentLibrary;

// Passives
pub use crate::passive::{PassiveAbility, PassiveEffect};

// Team assembly
pub use crate::team::{assemble_ally, generate_enemy_team, StatOverrides};
