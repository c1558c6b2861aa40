//! Renders battle events for a headless session.
use std::collections::HashMap;
use std::io::Write;

use battle_core::{BattleEvent, BattleStatus, CombatantId};
use runtime::{Event, RuntimeHandle, Topic};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use crate::config::EventFormat;

/// Subscribes to every topic and writes each event out until the battle ends.
pub struct Presenter {
    format: EventFormat,
    names: HashMap<CombatantId, String>,
    combat: broadcast::Receiver<Event>,
    turn: broadcast::Receiver<Event>,
    selection: broadcast::Receiver<Event>,
    outcome: broadcast::Receiver<Event>,
}

impl Presenter {
    /// Subscribes before returning so that no event after construction is missed.
    pub async fn new(handle: &RuntimeHandle, format: EventFormat) -> runtime::Result<Self> {
        let combat = handle.subscribe(Topic::Combat);
        let turn = handle.subscribe(Topic::Turn);
        let selection = handle.subscribe(Topic::Selection);
        let outcome = handle.subscribe(Topic::Outcome);
        let state = handle.query_state().await?;
        let names = state
            .roster
            .iter()
            .map(|combatant| (combatant.id, combatant.name.clone()))
            .collect();

        Ok(Self {
            format,
            names,
            combat,
            turn,
            selection,
            outcome,
        })
    }

    /// Runs until an outcome event arrives or the bus closes.
    pub async fn run(mut self) -> Option<BattleStatus> {
        loop {
            let received = tokio::select! {
                result = self.combat.recv() => result,
                result = self.turn.recv() => result,
                result = self.selection.recv() => result,
                result = self.outcome.recv() => result,
            };

            let event = match received {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(target: "client::presenter", skipped, "Presenter lagged");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            };

            let status = match event.event {
                BattleEvent::BattleWon => Some(BattleStatus::Won),
                BattleEvent::BattleLost => Some(BattleStatus::Lost),
                _ => None,
            };
            if status.is_some() {
                self.flush();
                self.write(&event);
                return status;
            }
            self.write(&event);
        }
    }

    /// Writes whatever the other topics still hold, in tick order.
    fn flush(&mut self) {
        let mut pending = Vec::new();
        for rx in [&mut self.combat, &mut self.turn, &mut self.selection] {
            while let Ok(event) = rx.try_recv() {
                pending.push(event);
            }
        }
        pending.sort_by_key(|event| event.tick);
        for event in &pending {
            self.write(event);
        }
    }

    fn write(&self, event: &Event) {
        match self.format {
            EventFormat::Json => match serde_json::to_string(event) {
                Ok(line) => {
                    let mut stdout = std::io::stdout().lock();
                    if let Err(error) = writeln!(stdout, "{line}") {
                        warn!(target: "client::presenter", %error, "Failed to write event");
                    }
                }
                Err(error) => warn!(target: "client::presenter", %error, "Failed to encode event"),
            },
            EventFormat::Text => {
                let line = self.describe(&event.event);
                match event.event {
                    BattleEvent::TurnMeterUpdated { .. } | BattleEvent::TargetFocusChanged { .. } => {
                        debug!(target: "client::presenter", tick = %event.tick, "{line}");
                    }
                    _ => info!(target: "client::presenter", tick = %event.tick, "{line}"),
                }
            }
        }
    }

    fn name(&self, id: CombatantId) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string())
    }

    /// One line of text for `event`, with combatants shown by name.
    pub fn describe(&self, event: &BattleEvent) -> String {
        match event {
            BattleEvent::TurnMeterUpdated {
                combatant,
                percentage,
            } => format!("{} readiness {percentage:.0}%", self.name(*combatant)),
            BattleEvent::TurnReady { combatant } => format!("{} is ready", self.name(*combatant)),
            BattleEvent::SelectionChanged {
                combatant,
                phase,
                cursor,
                info_text,
            } => format!(
                "{} [{phase} {cursor}] {info_text}",
                self.name(*combatant)
            ),
            BattleEvent::TargetFocusChanged { combatant, target } => {
                format!("{} aims at {}", self.name(*combatant), self.name(*target))
            }
            BattleEvent::InputRejected { combatant, reason } => {
                format!("{}: {}", self.name(*combatant), reason.message())
            }
            BattleEvent::ActionQueued { action } => format!(
                "{} queues {} on {}",
                self.name(action.attacker),
                action.ability.name(),
                self.name(action.target)
            ),
            BattleEvent::AnimationRequested { request } => format!(
                "{} uses {} on {}",
                self.name(request.attacker),
                request.ability.name(),
                self.name(request.target)
            ),
            BattleEvent::ActionAbandoned { action } => format!(
                "{}'s {} has nothing left to hit",
                self.name(action.attacker),
                action.ability.name()
            ),
            BattleEvent::DamageDealt {
                attacker,
                target,
                amount,
            } => format!(
                "{} hits {} for {amount}",
                self.name(*attacker),
                self.name(*target)
            ),
            BattleEvent::Healed {
                attacker,
                target,
                amount,
            } => format!(
                "{} heals {} for {amount}",
                self.name(*attacker),
                self.name(*target)
            ),
            BattleEvent::TargetDefeated { target } => format!("{} is defeated", self.name(*target)),
            BattleEvent::BattleWon => "Victory!".to_string(),
            BattleEvent::BattleLost => "Defeat...".to_string(),
        }
    }
}
