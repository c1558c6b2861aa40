//! Readiness accrual and the dispatch queue.

use tracing::debug;

use super::BattleEngine;
use crate::events::BattleEvent;
use crate::selection::{SelectionContext, TurnSelection};
use crate::state::{BattleState, Side};

impl BattleEngine<'_> {
    /// Adds `speed * dt` to every combatant that is alive, not busy and not
    /// already waiting in the dispatch queue.
    ///
    /// Controllable combatants report their meter and join the dispatch queue
    /// once they reach the threshold. Combatants are visited in roster order,
    /// which decides ties within one tick.
    pub(super) fn accrue_readiness(&mut self, dt: f32, events: &mut Vec<BattleEvent>) {
        let threshold = self.config.ready_threshold;
        let BattleState {
            roster, dispatch, ..
        } = &mut *self.state;

        for combatant in roster.iter_mut() {
            if !combatant.is_alive() || combatant.busy || dispatch.contains(&combatant.id) {
                continue;
            }
            combatant.readiness += combatant.speed as f32 * dt;

            if combatant.side != Side::Controllable {
                continue;
            }
            events.push(BattleEvent::TurnMeterUpdated {
                combatant: combatant.id,
                percentage: self.config.readiness_percentage(combatant.readiness),
            });
            if combatant.readiness >= threshold {
                debug!(
                    target: "battle::scheduler",
                    combatant = %combatant.id,
                    readiness = combatant.readiness,
                    "turn ready"
                );
                dispatch.push_back(combatant.id);
                events.push(BattleEvent::TurnReady {
                    combatant: combatant.id,
                });
            }
        }
    }

    /// Drops defeated combatants from the dispatch queue. A selection owned by
    /// a dropped combatant is discarded.
    pub(super) fn purge_dispatch(&mut self) {
        let BattleState {
            roster,
            dispatch,
            selection,
            ..
        } = &mut *self.state;

        dispatch.retain(|id| roster.get(*id).is_some_and(|combatant| combatant.is_alive()));

        let active = dispatch.front().copied();
        if let Some(current) = selection.as_ref()
            && Some(current.combatant()) != active
        {
            debug!(
                target: "battle::scheduler",
                combatant = %current.combatant(),
                "discarding selection of a combatant that left the dispatch queue"
            );
            *selection = None;
        }
    }

    /// Starts a selection for the head of the dispatch queue if none is open.
    pub(super) fn open_selection(&mut self, events: &mut Vec<BattleEvent>) {
        if self.state.selection.is_some() || self.state.is_finished() {
            return;
        }
        let Some(active) = self.state.active_combatant() else {
            return;
        };
        let selection = TurnSelection::new(active);
        let mut ctx = SelectionContext {
            roster: &self.state.roster,
            menu_rows: self.config.menu_rows,
            audio: self.audio,
            events,
        };
        selection.announce(&mut ctx);
        self.state.selection = Some(selection);
    }
}
