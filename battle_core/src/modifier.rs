//! Modifier engine - percentage buff/debuff composition, resistance rolls,
//! and timed-effect expiry
//!
//! Effective stats follow `base * max(0.5, 1 + buff_sum - debuff_sum)`. The
//! 0.5 floor means no pile of debuffs ever drops a stat below half its base
//! value. The generic all-stats kinds contribute to every stat alongside the
//! stat-specific kind.

use crate::combatant::Combatant;
use crate::types::{Buff, BuffKind, Debuff, DebuffKind, StatName};
use rand::Rng;

/// Lowest multiplier an effective stat can reach
pub const STAT_MULTIPLIER_FLOOR: f64 = 0.5;

/// Fraction of max HP each damage-over-time debuff deals per tick
pub const DOT_TICK_PCT: f64 = 0.04;

impl Combatant {
    /// Sum of active buff percentages of one kind
    pub fn sum_buff_pct(&self, kind: BuffKind) -> f64 {
        self.buffs
            .iter()
            .filter(|b| b.kind == kind && b.is_active())
            .map(|b| b.value_pct)
            .sum()
    }

    /// Sum of active debuff percentages of one kind
    pub fn sum_debuff_pct(&self, kind: DebuffKind) -> f64 {
        self.debuffs
            .iter()
            .filter(|d| d.kind == kind && d.is_active())
            .map(|d| d.value_pct)
            .sum()
    }

    pub fn has_debuff(&self, kind: DebuffKind) -> bool {
        self.debuffs.iter().any(|d| d.kind == kind && d.is_active())
    }

    /// Combined multiplier for one stat, floored at 0.5
    pub fn stat_multiplier(&self, up: BuffKind, down: DebuffKind) -> f64 {
        let buff_sum = self.sum_buff_pct(up) + self.sum_buff_pct(BuffKind::AllStatsUp);
        let debuff_sum = self.sum_debuff_pct(down) + self.sum_debuff_pct(DebuffKind::AllStatsDown);
        (1.0 + buff_sum - debuff_sum).max(STAT_MULTIPLIER_FLOOR)
    }

    pub fn effective_attack(&self) -> i32 {
        (self.atk as f64 * self.stat_multiplier(BuffKind::AttackUp, DebuffKind::AttackDown)).round()
            as i32
    }

    pub fn effective_defense(&self) -> i32 {
        (self.def as f64 * self.stat_multiplier(BuffKind::DefenseUp, DebuffKind::DefenseDown))
            .round() as i32
    }

    /// Effective speed used for turn ordering; never below 1
    pub fn effective_speed(&self) -> i32 {
        let scaled =
            (self.spd as f64 * self.stat_multiplier(BuffKind::SpeedUp, DebuffKind::SpeedDown))
                .round() as i32;
        scaled.max(1)
    }

    /// Attach a buff unconditionally
    pub fn apply_buff(
        &mut self,
        kind: BuffKind,
        value_pct: f64,
        duration: Option<i32>,
        source_id: Option<&str>,
    ) {
        self.buffs.push(Buff {
            kind,
            value_pct,
            expires_on_turn: duration,
            stacks: None,
            max_stacks: None,
            once_per_battle: false,
            source_id: source_id.map(str::to_owned),
        });
    }

    /// Attach a debuff after rolling the target's resistance tables
    ///
    /// The generic any-debuff chance and the kind-specific chance are rolled
    /// independently, so both tables can protect the same application.
    /// Returns false when the debuff was resisted; nothing is logged.
    pub fn apply_debuff(
        &mut self,
        kind: DebuffKind,
        value_pct: f64,
        duration: Option<i32>,
        source_id: Option<&str>,
        permanent: bool,
        rng: &mut impl Rng,
    ) -> bool {
        if self.resistances.debuffs > 0.0 && rng.gen::<f64>() < self.resistances.debuffs {
            return false;
        }
        if let Some(&chance) = self.resistances.status_effects.get(&kind) {
            if chance > 0.0 && rng.gen::<f64>() < chance {
                return false;
            }
        }
        self.debuffs.push(Debuff {
            kind,
            value_pct,
            expires_on_turn: if permanent { None } else { duration },
            stacks: None,
            permanent,
            source_id: source_id.map(str::to_owned),
        });
        true
    }

    /// Grant a stat bonus the way shrine/effigy/hazard bonuses do
    ///
    /// Percentage stats become persistent buffs; HP raises max and current
    /// HP immediately.
    pub fn apply_stat_bonus(&mut self, stat: StatName, value_pct: f64, source_id: Option<&str>) {
        match stat {
            StatName::Hp => {
                let bonus = (self.max_hp as f64 * value_pct).round() as i32;
                self.max_hp += bonus;
                self.current_hp += bonus;
            }
            StatName::Atk => self.apply_buff(BuffKind::AttackUp, value_pct, None, source_id),
            StatName::Def => self.apply_buff(BuffKind::DefenseUp, value_pct, None, source_id),
            StatName::Spd => self.apply_buff(BuffKind::SpeedUp, value_pct, None, source_id),
            StatName::All => self.apply_buff(BuffKind::AllStatsUp, value_pct, None, source_id),
            StatName::CritChance => {
                self.apply_buff(BuffKind::CritChanceUp, value_pct, None, source_id)
            }
            StatName::Accuracy => self.apply_buff(BuffKind::AccuracyUp, value_pct, None, source_id),
            StatName::HealingEffectiveness => {
                self.apply_buff(BuffKind::HealingEffectivenessUp, value_pct, None, source_id)
            }
        }
    }

    /// Turn-start status maintenance for this combatant
    ///
    /// Deals one tick per damage-over-time debuff carried (4% of max HP,
    /// minimum 1 each), decrements every countdown, and sweeps out effects
    /// whose countdown reached zero. Returns the total tick damage.
    pub fn tick_status_effects(&mut self) -> i32 {
        let mut total_dot = 0;
        for debuff in &mut self.debuffs {
            if debuff.kind.is_damage_over_time() {
                let tick = ((self.max_hp as f64 * DOT_TICK_PCT).round() as i32).max(1);
                total_dot += tick;
            }
            if let Some(t) = debuff.expires_on_turn.as_mut() {
                *t -= 1;
            }
        }
        for buff in &mut self.buffs {
            if let Some(t) = buff.expires_on_turn.as_mut() {
                *t -= 1;
            }
        }
        self.debuffs.retain(|d| d.expires_on_turn.map_or(true, |t| t > 0));
        self.buffs.retain(|b| b.expires_on_turn.map_or(true, |t| t > 0));

        if total_dot > 0 {
            self.current_hp = (self.current_hp - total_dot).max(0);
            self.battle_state.damage_taken += total_dot as i64;
        }
        total_dot
    }

    /// Whether a stun/sleep/freeze debuff prevents acting this turn
    pub fn is_incapacitated(&self) -> bool {
        self.debuffs
            .iter()
            .any(|d| d.kind.is_incapacitating() && d.is_active())
    }
}
