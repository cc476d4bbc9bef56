//! Team assembly from the character catalog

use crate::combatant::Combatant;
use crate::config::catalog::CharacterEntry;
use crate::content::ContentLibrary;
use crate::types::{GridPosition, Rarity, Side};
use rand::Rng;

/// Stat scaling per difficulty step above 1
const DIFFICULTY_STEP_PCT: f64 = 0.15;

/// Permissive fallbacks for partially-specified ally stats
const DEFAULT_HP: i32 = 100;
const DEFAULT_ATK: i32 = 10;
const DEFAULT_DEF: i32 = 10;
const DEFAULT_SPD: i32 = 10;

/// Stat overrides carried by a persisted team member; missing fields fall
/// back to the catalog entry, then to the permissive defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatOverrides {
    pub hp: Option<i32>,
    pub atk: Option<i32>,
    pub def: Option<i32>,
    pub spd: Option<i32>,
}

/// Spawn weight by rarity: commons dominate the pool
fn rarity_weight(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::S => 1.0,
        Rarity::A => 3.0,
        Rarity::B => 6.0,
        Rarity::C => 10.0,
    }
}

fn weighted_pick<'a, T>(
    items: &'a [T],
    weight: impl Fn(&T) -> f64,
    rng: &mut impl Rng,
) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let total: f64 = items.iter().map(&weight).sum();
    let mut r = rng.gen::<f64>() * total;
    for item in items {
        r -= weight(item);
        if r <= 0.0 {
            return Some(item);
        }
    }
    items.last()
}

/// Build an ally combatant from a catalog entry and persisted stats
pub fn assemble_ally(
    entry: &CharacterEntry,
    id: impl Into<String>,
    overrides: StatOverrides,
    slot: usize,
) -> Combatant {
    let hp = overrides.hp.unwrap_or(if entry.hp > 0 { entry.hp } else { DEFAULT_HP });
    let atk = overrides.atk.unwrap_or(if entry.atk > 0 { entry.atk } else { DEFAULT_ATK });
    let def = overrides.def.unwrap_or(if entry.def > 0 { entry.def } else { DEFAULT_DEF });
    let spd = overrides.spd.unwrap_or(if entry.spd > 0 { entry.spd } else { DEFAULT_SPD });
    Combatant::new(id, Side::Ally, entry.name.clone(), entry.slug.clone(), entry.rarity)
        .with_stats(hp, atk, def, spd)
        .with_identity(
            Some(entry.pantheon.clone()),
            Some(entry.class.clone()),
            Some(entry.element),
        )
        .with_position(GridPosition::for_slot(slot))
}

/// Roll an enemy team from the catalog
///
/// Members are picked with rarity weighting and scaled by 15% per
/// difficulty step on HP, attack, and defense; speed is left alone.
pub fn generate_enemy_team(
    library: &ContentLibrary,
    difficulty: u32,
    max_members: usize,
    rng: &mut impl Rng,
) -> Vec<Combatant> {
    let pool = library.characters();
    let scale = 1.0 + (difficulty.saturating_sub(1)) as f64 * DIFFICULTY_STEP_PCT;
    let mut team = Vec::with_capacity(max_members);
    for slot in 0..max_members {
        let Some(entry) = weighted_pick(pool, |c| rarity_weight(c.rarity), rng) else {
            break;
        };
        let id = format!("enemy_{}_{}_{}", entry.slug, slot, rng.gen_range(0..10_000));
        let max_hp = (entry.hp as f64 * scale).round() as i32;
        let atk = (entry.atk as f64 * scale).round() as i32;
        let def = (entry.def as f64 * scale).round() as i32;
        team.push(
            Combatant::new(id, Side::Enemy, entry.name.clone(), entry.slug.clone(), entry.rarity)
                .with_stats(max_hp, atk, def, entry.spd)
                .with_identity(
                    Some(entry.pantheon.clone()),
                    Some(entry.class.clone()),
                    Some(entry.element),
                )
                .with_position(GridPosition::for_slot(slot)),
        );
    }
    team
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn entry() -> CharacterEntry {
        CharacterEntry {
            id: 7,
            name: "Heimdall".to_string(),
            slug: "heimdall".to_string(),
            pantheon: "Norse".to_string(),
            rarity: Rarity::B,
            class: "Guardian".to_string(),
            element: crate::types::Element::Light,
            hp: 110,
            atk: 14,
            def: 18,
            spd: 9,
            passive_ability_name: None,
            passive_ability_desc: None,
            passive: None,
        }
    }

    #[test]
    fn test_assemble_ally_prefers_overrides() {
        let c = assemble_ally(
            &entry(),
            "relic_1",
            StatOverrides {
                hp: Some(150),
                ..StatOverrides::default()
            },
            0,
        );
        assert_eq!(c.max_hp, 150);
        assert_eq!(c.atk, 14);
        assert_eq!(c.pos, Some(GridPosition::FL));
        assert_eq!(c.side, Side::Ally);
    }

    #[test]
    fn test_assemble_ally_permissive_defaults() {
        let mut zeroed = entry();
        zeroed.hp = 0;
        zeroed.atk = 0;
        let c = assemble_ally(&zeroed, "relic_2", StatOverrides::default(), 1);
        assert_eq!(c.max_hp, DEFAULT_HP);
        assert_eq!(c.atk, DEFAULT_ATK);
        assert_eq!(c.def, 18);
    }

    #[test]
    fn test_enemy_team_scales_with_difficulty() {
        let library = ContentLibrary::new(
            vec![entry()],
            Default::default(),
            Default::default(),
            Vec::new(),
            Default::default(),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let team = generate_enemy_team(&library, 3, 2, &mut rng);
        assert_eq!(team.len(), 2);
        for member in &team {
            // 1 + 2 * 0.15 = 1.3 scale on hp/atk/def, speed untouched
            assert_eq!(member.max_hp, 143);
            assert_eq!(member.atk, 18);
            assert_eq!(member.def, 23);
            assert_eq!(member.spd, 9);
            assert_eq!(member.side, Side::Enemy);
        }
        assert_ne!(team[0].id, team[1].id);
    }

    #[test]
    fn test_weighted_pick_respects_zero_weight() {
        let items = [1, 2];
        // Mid-range rolls never land on a zero-weight prefix
        let mut rng = StepRng::new(1 << 63, 0);
        let picked = weighted_pick(&items, |&i| if i == 2 { 1.0 } else { 0.0 }, &mut rng);
        assert_eq!(picked, Some(&2));
    }
}
