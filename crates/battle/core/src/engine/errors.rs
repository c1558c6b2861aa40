//! Error types for the battle engine.

use crate::error::{BattleError, ErrorSeverity};
use crate::selection::SelectionError;
use crate::state::{BattleStatus, CombatantId};

/// Errors surfaced while driving a battle through [`super::BattleEngine`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("battle is already over ({0})")]
    BattleFinished(BattleStatus),

    #[error("tick delta must be finite and non-negative, got {0}")]
    InvalidDelta(f32),

    #[error("no combatant is waiting for a command")]
    NoActiveTurn,

    #[error("no action animation is pending")]
    NoAnimationPending,

    #[error("combatant {0} is not on the roster")]
    UnknownCombatant(CombatantId),

    #[error("combatant {0} already has an action in progress")]
    CombatantBusy(CombatantId),

    #[error("combatant {0} is defeated")]
    CombatantDefeated(CombatantId),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

impl BattleError for EngineError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoActiveTurn | Self::NoAnimationPending | Self::CombatantBusy(_) => {
                ErrorSeverity::Recoverable
            }
            Self::InvalidDelta(_) | Self::CombatantDefeated(_) => ErrorSeverity::Validation,
            Self::UnknownCombatant(_) => ErrorSeverity::Internal,
            Self::Selection(err) => err.severity(),
            Self::BattleFinished(_) => ErrorSeverity::Fatal,
        }
    }
}
