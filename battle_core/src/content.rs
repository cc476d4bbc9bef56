//! ContentLibrary - typed, immutable reference tables for the simulator
//!
//! All reference data is loaded once, up front, and injected into
//! `simulate_battle`. The engine never parses anything mid-battle.

use crate::codex::AbilityCodex;
use crate::combatant::Combatant;
use crate::config::catalog::{CatalogConfig, CharacterEntry};
use crate::config::environment::{
    EffigiesConfig, Effigy, HazardEffect, HazardsConfig, PantheonBonusesConfig, StatBonus,
};
use crate::config::{load_toml, parse_toml, ConfigError};
use crate::passive::PassiveAbility;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

/// The complete set of reference tables one simulation reads
#[derive(Debug, Clone, Default)]
pub struct ContentLibrary {
    characters: Vec<CharacterEntry>,
    by_slug: HashMap<String, usize>,
    codex: AbilityCodex,
    hazards: HashMap<String, Vec<HazardEffect>>,
    effigies: HashMap<String, Effigy>,
    pantheon_bonuses: HashMap<String, Vec<StatBonus>>,
}

impl ContentLibrary {
    /// Build a library from already-parsed tables
    pub fn new(
        characters: Vec<CharacterEntry>,
        codex: AbilityCodex,
        hazards: HashMap<String, Vec<HazardEffect>>,
        effigies: Vec<Effigy>,
        pantheon_bonuses: HashMap<String, Vec<StatBonus>>,
    ) -> Self {
        let by_slug = characters
            .iter()
            .enumerate()
            .map(|(i, c)| (c.slug.clone(), i))
            .collect();
        let effigies = effigies.into_iter().map(|e| (e.id.clone(), e)).collect();
        ContentLibrary {
            characters,
            by_slug,
            codex,
            hazards,
            effigies,
            pantheon_bonuses,
        }
    }

    /// The built-in reference tables embedded in the crate
    ///
    /// A table that fails to parse degrades to empty rather than failing
    /// the caller; the engine is specified to be permissive about missing
    /// reference data.
    pub fn builtin() -> Self {
        let catalog: CatalogConfig =
            parse_or_default(include_str!("../config/characters.toml"), "characters");
        let codex: AbilityCodex =
            parse_or_default(include_str!("../config/ability_codex.toml"), "ability_codex");
        let hazards: HazardsConfig =
            parse_or_default(include_str!("../config/hazards.toml"), "hazards");
        let effigies: EffigiesConfig =
            parse_or_default(include_str!("../config/effigies.toml"), "effigies");
        let pantheons: PantheonBonusesConfig = parse_or_default(
            include_str!("../config/pantheon_bonuses.toml"),
            "pantheon_bonuses",
        );
        ContentLibrary::new(
            catalog.characters,
            codex,
            hazards.hazards,
            effigies.effigies,
            pantheons.pantheons,
        )
    }

    /// Load all tables from a directory of TOML files
    pub fn from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let catalog: CatalogConfig = load_toml(&dir.join("characters.toml"))?;
        let codex: AbilityCodex = load_toml(&dir.join("ability_codex.toml"))?;
        let hazards: HazardsConfig = load_toml(&dir.join("hazards.toml"))?;
        let effigies: EffigiesConfig = load_toml(&dir.join("effigies.toml"))?;
        let pantheons: PantheonBonusesConfig = load_toml(&dir.join("pantheon_bonuses.toml"))?;
        Ok(ContentLibrary::new(
            catalog.characters,
            codex,
            hazards.hazards,
            effigies.effigies,
            pantheons.pantheons,
        ))
    }

    /// Every catalog entry, in table order
    pub fn characters(&self) -> &[CharacterEntry] {
        &self.characters
    }

    pub fn character(&self, slug: &str) -> Option<&CharacterEntry> {
        self.by_slug.get(slug).map(|&i| &self.characters[i])
    }

    /// The structured passive for a combatant, if its tier uses them
    pub fn structured_passive(&self, combatant: &Combatant) -> Option<&PassiveAbility> {
        if !combatant.rarity.has_structured_passives() {
            return None;
        }
        self.character(&combatant.slug)?.passive.as_ref()
    }

    /// Lowercased ability text for legacy-tier combatants
    ///
    /// None for structured tiers and for combatants missing from the
    /// catalog, which skips every legacy hook for them.
    pub fn legacy_ability_text(&self, combatant: &Combatant) -> Option<String> {
        if combatant.rarity.has_structured_passives() {
            return None;
        }
        let entry = self.character(&combatant.slug)?;
        let name = entry.passive_ability_name.as_deref().unwrap_or("");
        let desc = entry.passive_ability_desc.as_deref().unwrap_or("");
        Some(format!("{name} {desc}").to_lowercase())
    }

    pub fn codex(&self) -> &AbilityCodex {
        &self.codex
    }

    pub fn hazard_effects(&self, hazard_id: &str) -> &[HazardEffect] {
        self.hazards
            .get(hazard_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn effigy(&self, effigy_id: &str) -> Option<&Effigy> {
        self.effigies.get(effigy_id)
    }

    pub fn alignment_bonuses(&self, alignment: &str) -> &[StatBonus] {
        self.pantheon_bonuses
            .get(alignment)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn parse_or_default<T: serde::de::DeserializeOwned + Default>(content: &str, table: &str) -> T {
    match parse_toml(content) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(table, %err, "built-in reference table failed to parse; using empty table");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Rarity, Side};

    #[test]
    fn test_builtin_tables_load() {
        let library = ContentLibrary::builtin();
        assert!(!library.characters().is_empty());
        assert!(library.character("odin").is_some());
        assert!(!library.codex().on_battle_start.is_empty());
        assert!(!library.hazard_effects("ashen_wastes").is_empty());
        assert!(!library.alignment_bonuses("Norse").is_empty());
    }

    #[test]
    fn test_structured_passive_requires_tier() {
        let library = ContentLibrary::builtin();
        let high = Combatant::new("1", Side::Ally, "Odin", "odin", Rarity::S)
            .with_stats(100, 10, 10, 10);
        assert!(library.structured_passive(&high).is_some());

        // Same slug demoted below the structured tiers loses the descriptor
        let low = Combatant::new("2", Side::Ally, "Odin", "odin", Rarity::B)
            .with_stats(100, 10, 10, 10);
        assert!(library.structured_passive(&low).is_none());
    }

    #[test]
    fn test_legacy_text_only_for_low_tiers() {
        let library = ContentLibrary::builtin();
        let low = Combatant::new("1", Side::Ally, "Pan", "pan", Rarity::C)
            .with_stats(100, 10, 10, 10);
        let text = library.legacy_ability_text(&low);
        assert!(text.is_some());
        assert_eq!(text.as_deref().map(|t| t == t.to_lowercase()), Some(true));

        let unknown = Combatant::new("2", Side::Ally, "Nobody", "nobody", Rarity::C)
            .with_stats(100, 10, 10, 10);
        assert!(library.legacy_ability_text(&unknown).is_none());
    }
}
