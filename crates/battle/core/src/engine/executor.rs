//! Action queue execution.
//!
//! At most one action is in flight. An action goes through these steps:
//! dequeue → revalidate target → request animation → (wait) → apply effect →
//! release attacker → outcome check.

use tracing::{debug, info};

use super::{BattleEngine, EngineError};
use crate::events::{AnimationRequest, BattleEvent};
use crate::rules::{self, Effect};
use crate::selection::SelectionContext;
use crate::state::{CombatantId, InFlightAction, Roster, Side};

/// Returns the target an action should actually hit.
///
/// A living target is kept. A defeated target is replaced by the first living
/// member of its own side. `None` means that whole side is defeated.
pub fn revalidate_target(roster: &Roster, target: CombatantId) -> Option<CombatantId> {
    let current = roster.get(target)?;
    if current.is_alive() {
        return Some(target);
    }
    roster.first_living(current.side)
}

impl BattleEngine<'_> {
    /// Dequeues the next action if nothing is in flight.
    pub(super) fn start_next_action(&mut self, events: &mut Vec<BattleEvent>) {
        if !self.state.is_idle() || self.state.is_finished() {
            return;
        }
        let Some(action) = self.state.actions.pop_front() else {
            return;
        };

        match revalidate_target(&self.state.roster, action.target) {
            Some(target) => {
                if target != action.target {
                    debug!(
                        target: "battle::executor",
                        attacker = %action.attacker,
                        from = %action.target,
                        to = %target,
                        "redirecting action to a living target"
                    );
                }
                events.push(BattleEvent::AnimationRequested {
                    request: AnimationRequest {
                        attacker: action.attacker,
                        target,
                        ability: action.ability.clone(),
                    },
                });
                self.state.in_flight = Some(InFlightAction { action, target });
            }
            None => {
                info!(
                    target: "battle::executor",
                    attacker = %action.attacker,
                    target = %action.target,
                    "abandoning action, no living target remains"
                );
                let attacker = action.attacker;
                events.push(BattleEvent::ActionAbandoned { action });
                self.release(attacker, events);
                self.check_outcome(events);
            }
        }
    }

    /// Applies the effect of an action whose animation finished.
    pub(super) fn resolve_in_flight(
        &mut self,
        in_flight: InFlightAction,
        events: &mut Vec<BattleEvent>,
    ) -> Result<(), EngineError> {
        let InFlightAction { action, target } = in_flight;
        let attacker = action.attacker;

        let stats = self
            .state
            .roster
            .get(attacker)
            .ok_or(EngineError::UnknownCombatant(attacker))?
            .stats();
        let defender = self
            .state
            .roster
            .get_mut(target)
            .ok_or(EngineError::UnknownCombatant(target))?;

        let effect = rules::resolve(&stats, &action.ability, defender);
        let defeated = !defender.is_alive();
        debug!(
            target: "battle::executor",
            attacker = %attacker,
            target = %target,
            ability = action.ability.name(),
            effect = ?effect,
            health = defender.health.current,
            "action resolved"
        );

        events.push(match effect {
            Effect::Damage(amount) => BattleEvent::DamageDealt {
                attacker,
                target,
                amount,
            },
            Effect::Heal(amount) => BattleEvent::Healed {
                attacker,
                target,
                amount,
            },
        });

        if defeated {
            events.push(BattleEvent::TargetDefeated { target });
            if self.state.roster.prune_defeated(target) {
                self.refresh_selection(events);
            }
            self.purge_dispatch();
        }

        self.release(attacker, events);
        self.check_outcome(events);
        Ok(())
    }

    /// Clears the busy flag and empties the attacker's readiness.
    fn release(&mut self, attacker: CombatantId, events: &mut Vec<BattleEvent>) {
        let Some(combatant) = self.state.roster.get_mut(attacker) else {
            return;
        };
        combatant.busy = false;
        combatant.readiness = 0.0;
        if combatant.side == Side::Controllable {
            events.push(BattleEvent::TurnMeterUpdated {
                combatant: attacker,
                percentage: 0.0,
            });
        }
    }

    fn refresh_selection(&mut self, events: &mut Vec<BattleEvent>) {
        let Some(selection) = self.state.selection.as_mut() else {
            return;
        };
        let mut ctx = SelectionContext {
            roster: &self.state.roster,
            menu_rows: self.config.menu_rows,
            audio: self.audio,
            events,
        };
        selection.refresh(&mut ctx);
    }
}
