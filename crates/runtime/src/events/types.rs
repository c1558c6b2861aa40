//! Event envelope published on the bus.

use battle_core::{BattleEvent, Tick};
use serde::{Deserialize, Serialize};

use super::Topic;

/// A battle event together with the tick that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub tick: Tick,
    pub event: BattleEvent,
}

impl Event {
    pub fn new(tick: Tick, event: BattleEvent) -> Self {
        Self { tick, event }
    }

    pub fn topic(&self) -> Topic {
        match &self.event {
            BattleEvent::DamageDealt { .. }
            | BattleEvent::Healed { .. }
            | BattleEvent::TargetDefeated { .. }
            | BattleEvent::ActionQueued { .. }
            | BattleEvent::AnimationRequested { .. }
            | BattleEvent::ActionAbandoned { .. } => Topic::Combat,
            BattleEvent::TurnMeterUpdated { .. } | BattleEvent::TurnReady { .. } => Topic::Turn,
            BattleEvent::SelectionChanged { .. }
            | BattleEvent::TargetFocusChanged { .. }
            | BattleEvent::InputRejected { .. } => Topic::Selection,
            BattleEvent::BattleWon | BattleEvent::BattleLost => Topic::Outcome,
        }
    }
}
