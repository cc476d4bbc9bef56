//! Battlefield - the owned combatant arena for one simulation
//!
//! Combatants are stored flat, allies first, and addressed by index so hook
//! functions can mutate any mix of actors without aliasing trouble. Storage
//! order is stable for the whole battle, which keeps snapshots and speed-tie
//! ordering deterministic.

use crate::combatant::Combatant;
use crate::types::Side;

#[derive(Debug, Clone)]
pub struct Battlefield {
    pub combatants: Vec<Combatant>,
}

impl Battlefield {
    /// Clone both input teams into an owned arena, forcing sides
    pub fn new(allies: &[Combatant], enemies: &[Combatant]) -> Self {
        let mut combatants = Vec::with_capacity(allies.len() + enemies.len());
        for c in allies {
            let mut c = c.clone();
            c.side = Side::Ally;
            combatants.push(c);
        }
        for c in enemies {
            let mut c = c.clone();
            c.side = Side::Enemy;
            combatants.push(c);
        }
        Battlefield { combatants }
    }

    pub fn get(&self, idx: usize) -> &Combatant {
        &self.combatants[idx]
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut Combatant {
        &mut self.combatants[idx]
    }

    /// Indices of every combatant on one side, in storage order
    pub fn indices_on(&self, side: Side) -> impl Iterator<Item = usize> + '_ {
        self.combatants
            .iter()
            .enumerate()
            .filter(move |(_, c)| c.side == side)
            .map(|(i, _)| i)
    }

    /// Indices of living combatants on one side
    pub fn living_on(&self, side: Side) -> Vec<usize> {
        self.indices_on(side)
            .filter(|&i| self.combatants[i].is_alive())
            .collect()
    }

    /// Indices of all living combatants, allies first
    pub fn living(&self) -> Vec<usize> {
        let mut out = self.living_on(Side::Ally);
        out.extend(self.living_on(Side::Enemy));
        out
    }

    pub fn side_alive(&self, side: Side) -> bool {
        self.combatants
            .iter()
            .any(|c| c.side == side && c.is_alive())
    }

    /// The battle ends as soon as either side has no living members
    pub fn is_over(&self) -> bool {
        !self.side_alive(Side::Ally) || !self.side_alive(Side::Enemy)
    }

    /// Deep copies of one side's combatants, in storage order
    pub fn snapshot(&self, side: Side) -> Vec<Combatant> {
        self.combatants
            .iter()
            .filter(|c| c.side == side)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rarity;

    fn fighter(id: &str, side: Side, hp: i32) -> Combatant {
        Combatant::new(id, side, id, id, Rarity::C).with_stats(hp, 10, 5, 8)
    }

    fn small_field() -> Battlefield {
        Battlefield::new(
            &[fighter("a1", Side::Ally, 50), fighter("a2", Side::Ally, 50)],
            &[fighter("e1", Side::Enemy, 40)],
        )
    }

    #[test]
    fn test_sides_are_forced_on_entry() {
        // A mislabeled ally input still lands on the ally side
        let stray = fighter("x", Side::Enemy, 10);
        let field = Battlefield::new(&[stray], &[fighter("e", Side::Ally, 10)]);
        assert_eq!(field.get(0).side, Side::Ally);
        assert_eq!(field.get(1).side, Side::Enemy);
    }

    #[test]
    fn test_living_excludes_dead() {
        let mut field = small_field();
        field.get_mut(0).current_hp = 0;
        assert_eq!(field.living_on(Side::Ally), vec![1]);
        assert!(!field.is_over());
        field.get_mut(1).current_hp = 0;
        assert!(field.is_over());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut field = small_field();
        let snap = field.snapshot(Side::Ally);
        field.get_mut(0).current_hp = 1;
        assert_eq!(snap[0].current_hp, 50);
    }
}
