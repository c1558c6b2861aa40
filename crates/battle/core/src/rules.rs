//! Damage and healing formulas.
//!
//! Every function here is pure apart from the health change it applies to
//! the target. Health is allowed to fall below zero and buffs are not capped
//! at maximum health.

use crate::config::BattleConfig;
use crate::state::{Ability, CombatStats, Combatant, Polarity, Spell, Summon};

/// Health change produced by resolving an ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Effect {
    Damage(i32),
    Heal(i32),
}

impl Effect {
    pub fn amount(self) -> i32 {
        match self {
            Self::Damage(amount) | Self::Heal(amount) => amount,
        }
    }
}

fn mitigated(raw: i32, defense: i32) -> i32 {
    raw.saturating_sub(defense).clamp(0, BattleConfig::DAMAGE_CAP)
}

/// Physical attack: `clamp(attack - defense, 0, DAMAGE_CAP)`.
pub fn apply_attack(attacker: &CombatStats, target: &mut Combatant) -> i32 {
    let damage = mitigated(attacker.attack, target.defense);
    target.health.current = target.health.current.saturating_sub(damage);
    damage
}

/// Harmful spell: `clamp(magnitude - defense, 0, DAMAGE_CAP)`.
pub fn apply_debuff_spell(spell: &Spell, target: &mut Combatant) -> i32 {
    let damage = mitigated(spell.magnitude, target.defense);
    target.health.current = target.health.current.saturating_sub(damage);
    damage
}

/// Helpful spell: raises health by the full magnitude.
pub fn apply_buff_spell(spell: &Spell, target: &mut Combatant) -> i32 {
    target.health.current = target.health.current.saturating_add(spell.magnitude);
    spell.magnitude
}

/// Summon: the magnitude lands in full, defense does not apply.
pub fn apply_summon(summon: &Summon, target: &mut Combatant) -> i32 {
    target.health.current = target.health.current.saturating_sub(summon.magnitude);
    summon.magnitude
}

/// Applies `ability` cast with `attacker`'s stats to `target`.
pub fn resolve(attacker: &CombatStats, ability: &Ability, target: &mut Combatant) -> Effect {
    match ability {
        Ability::BasicAttack => Effect::Damage(apply_attack(attacker, target)),
        Ability::Spell(spell) => match spell.polarity {
            Polarity::Debuff => Effect::Damage(apply_debuff_spell(spell, target)),
            Polarity::Buff => Effect::Heal(apply_buff_spell(spell, target)),
        },
        Ability::Summon(summon) => Effect::Damage(apply_summon(summon, target)),
    }
}
