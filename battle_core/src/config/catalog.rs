//! Character catalog configuration

use crate::passive::PassiveAbility;
use crate::types::{Element, Rarity};
use serde::{Deserialize, Serialize};

/// One character's reference record
///
/// S/A tier entries carry a structured `passive`; B/C tier entries carry
/// free-text ability fields matched against the legacy codex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterEntry {
    pub id: u32,
    pub name: String,
    pub slug: String,
    pub pantheon: String,
    pub rarity: Rarity,
    pub class: String,
    pub element: Element,
    pub hp: i32,
    pub atk: i32,
    pub def: i32,
    pub spd: i32,
    #[serde(default)]
    pub passive_ability_name: Option<String>,
    #[serde(default)]
    pub passive_ability_desc: Option<String>,
    #[serde(default)]
    pub passive: Option<PassiveAbility>,
}

/// Container for the character table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub characters: Vec<CharacterEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passive::PassiveEffect;

    #[test]
    fn test_parse_catalog_entries() {
        let toml = r#"
[[characters]]
id = 1
name = "Odin"
slug = "odin"
pantheon = "Norse"
rarity = "S"
class = "Mage"
element = "Wind"
hp = 120
atk = 26
def = 14
spd = 12

[characters.passive]
name = "Allfather's Gaze"
type = "TeamBuff"
params = { stat = "ATK", value_pct = 0.12 }

[[characters]]
id = 2
name = "Pan"
slug = "pan"
pantheon = "Greek"
rarity = "C"
class = "Trickster"
element = "Nature"
hp = 80
atk = 12
def = 8
spd = 14
passive_ability_name = "Wild Mending"
passive_ability_desc = "A soothing song mends the whole party."
"#;
        let catalog: CatalogConfig = toml::from_str(toml).unwrap();
        assert_eq!(catalog.characters.len(), 2);

        let odin = &catalog.characters[0];
        assert_eq!(odin.rarity, Rarity::S);
        assert!(matches!(
            odin.passive.as_ref().map(|p| &p.effect),
            Some(PassiveEffect::TeamBuff(_))
        ));

        let pan = &catalog.characters[1];
        assert!(pan.passive.is_none());
        assert_eq!(pan.passive_ability_name.as_deref(), Some("Wild Mending"));
    }
}
