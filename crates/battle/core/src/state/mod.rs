//! Battle state representation.
//!
//! [`BattleState`] is plain data: the roster, the dispatch and action queues,
//! the in-progress selection and the battle status. All mutation goes through
//! [`crate::engine::BattleEngine`].

mod ability;
mod combatant;
mod common;
mod error;
mod roster;

use std::collections::VecDeque;

pub use ability::{Ability, Polarity, Spell, Summon};
pub use combatant::{CombatStats, Combatant, CombatantTemplate};
pub use common::{CombatantId, ResourceMeter, Side, Tick};
pub use error::BattleSetupError;
pub use roster::{Party, Roster};

use crate::action::Action;
use crate::selection::TurnSelection;

/// Whether the battle is still running and, if not, how it ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleStatus {
    #[default]
    Ongoing,
    Won,
    Lost,
}

impl BattleStatus {
    pub fn is_finished(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// An action whose animation has been requested but not yet completed.
#[derive(Clone, Debug, PartialEq)]
pub struct InFlightAction {
    pub action: Action,
    /// Target after revalidation. May differ from `action.target`.
    pub target: CombatantId,
}

/// Complete mutable state of one battle.
#[derive(Clone, Debug)]
pub struct BattleState {
    pub roster: Roster,
    /// Controllable combatants whose readiness crossed the threshold, in the
    /// order they crossed it. The head is the active combatant.
    pub dispatch: VecDeque<CombatantId>,
    /// Committed actions awaiting execution.
    pub actions: VecDeque<Action>,
    pub in_flight: Option<InFlightAction>,
    pub selection: Option<TurnSelection>,
    pub status: BattleStatus,
    pub tick: Tick,
}

impl BattleState {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            dispatch: VecDeque::new(),
            actions: VecDeque::new(),
            in_flight: None,
            selection: None,
            status: BattleStatus::Ongoing,
            tick: Tick::ZERO,
        }
    }

    /// The combatant currently waiting for a command.
    pub fn active_combatant(&self) -> Option<CombatantId> {
        self.dispatch.front().copied()
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    /// True while no action is being animated.
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_none()
    }
}
