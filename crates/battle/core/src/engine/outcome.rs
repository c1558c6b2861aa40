use tracing::info;

use super::BattleEngine;
use crate::events::{BattleEvent, SoundCue};
use crate::state::{BattleStatus, Roster, Side};

/// Decides the battle status from the roster alone.
///
/// Defeat is checked before victory, so mutual annihilation is a loss.
pub fn evaluate(roster: &Roster) -> BattleStatus {
    if !roster.any_alive(Side::Controllable) {
        BattleStatus::Lost
    } else if !roster.any_alive(Side::Opposing) {
        BattleStatus::Won
    } else {
        BattleStatus::Ongoing
    }
}

impl BattleEngine<'_> {
    pub(super) fn check_outcome(&mut self, events: &mut Vec<BattleEvent>) {
        if self.state.is_finished() {
            return;
        }
        let status = evaluate(&self.state.roster);
        if status.is_finished() {
            self.finish(status, events);
        }
    }

    /// Stops the battle. Pending actions, the dispatch queue and any open
    /// selection are dropped.
    fn finish(&mut self, status: BattleStatus, events: &mut Vec<BattleEvent>) {
        let dropped = self.state.actions.len();
        self.state.status = status;
        self.state.actions.clear();
        self.state.dispatch.clear();
        self.state.selection = None;

        info!(
            target: "battle::outcome",
            %status,
            tick = %self.state.tick,
            dropped_actions = dropped,
            "battle finished"
        );

        match status {
            BattleStatus::Won => {
                self.audio.play(SoundCue::WinFanfare);
                events.push(BattleEvent::BattleWon);
            }
            BattleStatus::Lost => {
                self.audio.play(SoundCue::LoseFanfare);
                events.push(BattleEvent::BattleLost);
            }
            BattleStatus::Ongoing => {}
        }
    }
}
