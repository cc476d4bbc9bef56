//! Attribute predicates for passives, effigies, and hazards

use crate::combatant::Combatant;
use crate::types::{Element, Rarity};
use serde::{Deserialize, Serialize};

/// A conjunction of optional attribute checks against one combatant
///
/// Every field left unset matches. `actor_*` fields describe the combatant
/// the effect originates from or lands on depending on the hook; `target_*`
/// fields are used by damage modifiers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Condition {
    pub actor_class: Option<String>,
    pub actor_class_not: Option<String>,
    pub actor_element: Option<Element>,
    pub actor_element_not: Option<Element>,
    pub element_is: Option<Element>,
    pub pantheon: Option<String>,
    pub pantheon_not: Option<String>,
    pub rarity_is: Option<Rarity>,
    pub target_class_is: Option<String>,
    pub target_rarity_is: Option<Rarity>,
    pub target_pantheon_is: Option<String>,
    pub target_element_is: Option<Element>,
    /// Matches when the combatant's HP fraction is at or below this value
    pub target_hp_below: Option<f64>,
    /// Advanced: a living teammate with this exact name must be present
    pub ally_name_present: Option<String>,
    /// Advanced: a living opponent of this class must be present
    pub enemy_class_present: Option<String>,
}

impl Condition {
    /// Basic attribute matching against a single combatant
    pub fn matches(&self, c: &Combatant) -> bool {
        if let Some(class) = &self.actor_class {
            if c.class_name.as_deref() != Some(class.as_str()) {
                return false;
            }
        }
        if let Some(class) = &self.actor_class_not {
            if c.class_name.as_deref() == Some(class.as_str()) {
                return false;
            }
        }
        if let Some(element) = self.actor_element {
            if c.element != Some(element) {
                return false;
            }
        }
        if let Some(element) = self.actor_element_not {
            if c.element == Some(element) {
                return false;
            }
        }
        if let Some(element) = self.element_is {
            if c.element != Some(element) {
                return false;
            }
        }
        if let Some(pantheon) = &self.pantheon {
            if c.pantheon.as_deref() != Some(pantheon.as_str()) {
                return false;
            }
        }
        if let Some(pantheon) = &self.pantheon_not {
            if c.pantheon.as_deref() == Some(pantheon.as_str()) {
                return false;
            }
        }
        if let Some(rarity) = self.rarity_is {
            if c.rarity != rarity {
                return false;
            }
        }
        if let Some(class) = &self.target_class_is {
            if c.class_name.as_deref() != Some(class.as_str()) {
                return false;
            }
        }
        if let Some(rarity) = self.target_rarity_is {
            if c.rarity != rarity {
                return false;
            }
        }
        if let Some(pantheon) = &self.target_pantheon_is {
            if c.pantheon.as_deref() != Some(pantheon.as_str()) {
                return false;
            }
        }
        if let Some(element) = self.target_element_is {
            if c.element != Some(element) {
                return false;
            }
        }
        if let Some(threshold) = self.target_hp_below {
            if c.hp_fraction() > threshold {
                return false;
            }
        }
        true
    }

    /// Matching with team-aware predicates
    ///
    /// The two team predicates are exclusive short-circuits, mirroring how
    /// self-buff conditions behave: when one is set it alone decides the
    /// outcome.
    pub fn matches_with_teams<'a>(
        &self,
        c: &Combatant,
        teammates: impl IntoIterator<Item = &'a Combatant>,
        opponents: impl IntoIterator<Item = &'a Combatant>,
    ) -> bool {
        if let Some(name) = &self.ally_name_present {
            return teammates
                .into_iter()
                .any(|m| m.name == *name && m.is_alive());
        }
        if let Some(class) = &self.enemy_class_present {
            return opponents
                .into_iter()
                .any(|o| o.class_name.as_deref() == Some(class.as_str()) && o.is_alive());
        }
        self.matches(c)
    }
}
