//! Battle loop reducer.
//!
//! [`BattleEngine`] is the only writer of [`BattleState`]. Each public call
//! performs one step of the loop and returns the events it produced:
//!
//! - [`BattleEngine::advance`]: accrue readiness, then start the next queued
//!   action if nothing is animating
//! - [`BattleEngine::handle_input`]: feed the active combatant's selection
//! - [`BattleEngine::complete_animation`]: resolve the in-flight action
//!
//! Calls are expected to be serialized by the owner of the state.

mod errors;
mod executor;
mod outcome;
mod scheduler;

pub use errors::EngineError;
pub use executor::revalidate_target;
pub use outcome::evaluate;

use tracing::trace;

use crate::action::Action;
use crate::config::BattleConfig;
use crate::events::{AudioSink, BattleEvent, NoopAudio};
use crate::selection::{SelectionContext, SelectionInput, SelectionStep};
use crate::state::BattleState;

static SILENT: NoopAudio = NoopAudio;

pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
    config: &'a BattleConfig,
    audio: &'a dyn AudioSink,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState, config: &'a BattleConfig) -> Self {
        Self {
            state,
            config,
            audio: &SILENT,
        }
    }

    pub fn with_audio(mut self, audio: &'a dyn AudioSink) -> Self {
        self.audio = audio;
        self
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    /// Advances the battle clock by `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> Result<Vec<BattleEvent>, EngineError> {
        self.ensure_running()?;
        if !dt.is_finite() || dt < 0.0 {
            return Err(EngineError::InvalidDelta(dt));
        }

        let mut events = Vec::new();
        self.state.tick = self.state.tick.next();
        trace!(target: "battle::engine", tick = %self.state.tick, dt, "advance");

        self.purge_dispatch();
        self.accrue_readiness(dt, &mut events);
        self.start_next_action(&mut events);
        self.open_selection(&mut events);
        Ok(events)
    }

    /// Routes a navigation input to the active combatant's selection.
    pub fn handle_input(&mut self, input: SelectionInput) -> Result<Vec<BattleEvent>, EngineError> {
        self.ensure_running()?;

        let mut events = Vec::new();
        self.open_selection(&mut events);
        let Some(mut selection) = self.state.selection.take() else {
            return Err(EngineError::NoActiveTurn);
        };

        let step = {
            let mut ctx = SelectionContext {
                roster: &self.state.roster,
                menu_rows: self.config.menu_rows,
                audio: self.audio,
                events: &mut events,
            };
            selection.handle(input, &mut ctx)?
        };

        match step {
            SelectionStep::Pending => self.state.selection = Some(selection),
            SelectionStep::Committed(action) => {
                if let Err(error) = self.enqueue(action, &mut events) {
                    self.state.selection = Some(selection);
                    return Err(error);
                }
                self.state.dispatch.pop_front();
                self.open_selection(&mut events);
            }
        }
        Ok(events)
    }

    /// Signals that the in-flight action's animation finished.
    pub fn complete_animation(&mut self) -> Result<Vec<BattleEvent>, EngineError> {
        self.ensure_running()?;
        let in_flight = self
            .state
            .in_flight
            .take()
            .ok_or(EngineError::NoAnimationPending)?;

        let mut events = Vec::new();
        self.resolve_in_flight(in_flight, &mut events)?;
        self.open_selection(&mut events);
        Ok(events)
    }

    /// Queues an action that did not come from turn selection, such as one
    /// chosen by an opposing-side controller.
    ///
    /// The attacker leaves the dispatch queue if it was waiting there.
    pub fn submit_action(&mut self, action: Action) -> Result<Vec<BattleEvent>, EngineError> {
        self.ensure_running()?;
        if self.state.roster.get(action.target).is_none() {
            return Err(EngineError::UnknownCombatant(action.target));
        }

        let mut events = Vec::new();
        self.enqueue(action, &mut events)?;
        self.purge_dispatch_of_busy();
        self.open_selection(&mut events);
        Ok(events)
    }

    fn enqueue(&mut self, action: Action, events: &mut Vec<BattleEvent>) -> Result<(), EngineError> {
        let attacker = self
            .state
            .roster
            .get_mut(action.attacker)
            .ok_or(EngineError::UnknownCombatant(action.attacker))?;
        if !attacker.is_alive() {
            return Err(EngineError::CombatantDefeated(action.attacker));
        }
        if attacker.busy {
            return Err(EngineError::CombatantBusy(action.attacker));
        }
        attacker.busy = true;

        events.push(BattleEvent::ActionQueued {
            action: action.clone(),
        });
        self.state.actions.push_back(action);
        Ok(())
    }

    fn purge_dispatch_of_busy(&mut self) {
        let roster = &self.state.roster;
        self.state
            .dispatch
            .retain(|id| roster.get(*id).is_some_and(|combatant| !combatant.busy));
        self.purge_dispatch();
    }

    fn ensure_running(&self) -> Result<(), EngineError> {
        if self.state.is_finished() {
            return Err(EngineError::BattleFinished(self.state.status));
        }
        Ok(())
    }
}
