use crate::state::{Ability, CombatantId};

/// A committed command: `attacker` uses `ability` on `target`.
///
/// The target is re-checked when the action is dequeued, so it may be
/// redirected before it resolves.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Action {
    pub attacker: CombatantId,
    pub ability: Ability,
    pub target: CombatantId,
}

impl Action {
    pub fn new(attacker: CombatantId, ability: Ability, target: CombatantId) -> Self {
        Self {
            attacker,
            ability,
            target,
        }
    }

    pub fn attack(attacker: CombatantId, target: CombatantId) -> Self {
        Self::new(attacker, Ability::BasicAttack, target)
    }
}
