//! Target selection rules for passives and codex effects

use crate::battle::field::Battlefield;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Who an effect lands on, relative to the combatant carrying it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetRule {
    #[serde(rename = "self")]
    SelfTarget,
    Allies,
    AllAllies,
    Enemies,
    AllEnemies,
    All,
    RandomAlly,
    RandomEnemy,
    FastestEnemy,
    SlowestEnemy,
    MostInjuredAlly,
    LowestHpEnemy,
    HighestAtkAlly,
}

impl Battlefield {
    /// Resolve a single-target rule; group rules resolve to None
    pub fn select_target(
        &self,
        rule: TargetRule,
        self_idx: usize,
        rng: &mut impl Rng,
    ) -> Option<usize> {
        let side = self.get(self_idx).side;
        match rule {
            TargetRule::SelfTarget => Some(self_idx),
            TargetRule::Allies | TargetRule::AllAllies => None,
            TargetRule::Enemies | TargetRule::AllEnemies | TargetRule::All => None,
            TargetRule::RandomAlly => self.living_on(side).choose(rng).copied(),
            TargetRule::RandomEnemy => self.living_on(side.opponent()).choose(rng).copied(),
            TargetRule::FastestEnemy => self.first_max_by(self.living_on(side.opponent()), |i| {
                self.get(i).effective_speed() as f64
            }),
            TargetRule::SlowestEnemy => self.first_max_by(self.living_on(side.opponent()), |i| {
                -(self.get(i).effective_speed() as f64)
            }),
            TargetRule::MostInjuredAlly => {
                let injured: Vec<usize> = self
                    .living_on(side)
                    .into_iter()
                    .filter(|&i| self.get(i).current_hp < self.get(i).max_hp)
                    .collect();
                self.first_max_by(injured, |i| -self.get(i).hp_fraction())
            }
            TargetRule::LowestHpEnemy => {
                self.first_max_by(self.living_on(side.opponent()), |i| -self.get(i).hp_fraction())
            }
            TargetRule::HighestAtkAlly => {
                self.first_max_by(self.living_on(side), |i| self.get(i).atk as f64)
            }
        }
    }

    /// Resolve a rule to a target group; single-target rules yield one entry
    pub fn select_targets(
        &self,
        rule: TargetRule,
        self_idx: usize,
        rng: &mut impl Rng,
    ) -> Vec<usize> {
        let side = self.get(self_idx).side;
        match rule {
            TargetRule::Allies | TargetRule::AllAllies => self.living_on(side),
            TargetRule::Enemies | TargetRule::AllEnemies => self.living_on(side.opponent()),
            TargetRule::All => self.living(),
            _ => self
                .select_target(rule, self_idx, rng)
                .into_iter()
                .collect(),
        }
    }

    /// First index attaining the maximum key, in storage order
    fn first_max_by(&self, candidates: Vec<usize>, key: impl Fn(usize) -> f64) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for i in candidates {
            let k = key(i);
            match best {
                Some((_, bk)) if k <= bk => {}
                _ => best = Some((i, k)),
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::Combatant;
    use crate::types::{Rarity, Side};
    use rand::rngs::mock::StepRng;

    fn fighter(id: &str, side: Side, hp: i32, spd: i32, atk: i32) -> Combatant {
        Combatant::new(id, side, id, id, Rarity::B).with_stats(hp, atk, 5, spd)
    }

    fn field() -> Battlefield {
        Battlefield::new(
            &[
                fighter("a1", Side::Ally, 100, 10, 30),
                fighter("a2", Side::Ally, 100, 12, 20),
            ],
            &[
                fighter("e1", Side::Enemy, 100, 8, 10),
                fighter("e2", Side::Enemy, 100, 20, 10),
                fighter("e3", Side::Enemy, 100, 4, 10),
            ],
        )
    }

    #[test]
    fn test_self_and_group_rules() {
        let f = field();
        let mut rng = StepRng::new(0, 0);
        assert_eq!(f.select_target(TargetRule::SelfTarget, 0, &mut rng), Some(0));
        assert_eq!(f.select_target(TargetRule::Allies, 0, &mut rng), None);
        assert_eq!(f.select_targets(TargetRule::Allies, 0, &mut rng), vec![0, 1]);
        assert_eq!(
            f.select_targets(TargetRule::Enemies, 0, &mut rng),
            vec![2, 3, 4]
        );
        assert_eq!(
            f.select_targets(TargetRule::All, 0, &mut rng),
            vec![0, 1, 2, 3, 4]
        );
    }

    #[test]
    fn test_speed_ordered_rules() {
        let f = field();
        let mut rng = StepRng::new(0, 0);
        assert_eq!(
            f.select_target(TargetRule::FastestEnemy, 0, &mut rng),
            Some(3)
        );
        assert_eq!(
            f.select_target(TargetRule::SlowestEnemy, 0, &mut rng),
            Some(4)
        );
        // Enemy side sees the allies as its enemies
        assert_eq!(
            f.select_target(TargetRule::FastestEnemy, 2, &mut rng),
            Some(1)
        );
    }

    #[test]
    fn test_most_injured_ally_skips_full_health() {
        let mut f = field();
        let mut rng = StepRng::new(0, 0);
        assert_eq!(
            f.select_target(TargetRule::MostInjuredAlly, 0, &mut rng),
            None
        );
        f.get_mut(1).current_hp = 40;
        f.get_mut(0).current_hp = 70;
        assert_eq!(
            f.select_target(TargetRule::MostInjuredAlly, 0, &mut rng),
            Some(1)
        );
    }

    #[test]
    fn test_lowest_hp_enemy_and_highest_atk_ally() {
        let mut f = field();
        let mut rng = StepRng::new(0, 0);
        f.get_mut(4).current_hp = 10;
        assert_eq!(
            f.select_target(TargetRule::LowestHpEnemy, 0, &mut rng),
            Some(4)
        );
        assert_eq!(
            f.select_target(TargetRule::HighestAtkAlly, 1, &mut rng),
            Some(0)
        );
    }

    #[test]
    fn test_dead_combatants_never_selected() {
        let mut f = field();
        let mut rng = StepRng::new(0, 0);
        f.get_mut(2).current_hp = 0;
        f.get_mut(3).current_hp = 0;
        assert_eq!(
            f.select_target(TargetRule::RandomEnemy, 0, &mut rng),
            Some(4)
        );
        f.get_mut(4).current_hp = 0;
        assert_eq!(f.select_target(TargetRule::RandomEnemy, 0, &mut rng), None);
    }
}
