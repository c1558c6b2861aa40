use crate::error::{BattleError, ErrorSeverity};

use super::{CombatantId, Side};

/// Errors raised while assembling a roster.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleSetupError {
    #[error("{side} party is empty")]
    EmptyParty { side: Side },

    #[error("{side} party has {len} members, at most {max} are allowed")]
    PartyTooLarge { side: Side, len: usize, max: usize },

    #[error("combatant id {0} is used more than once")]
    DuplicateId(CombatantId),

    #[error("combatant {id} is listed in the {party} party but belongs to the {actual} side")]
    SideMismatch {
        id: CombatantId,
        party: Side,
        actual: Side,
    },
}

impl BattleError for BattleSetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }
}
