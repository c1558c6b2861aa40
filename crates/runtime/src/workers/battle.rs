//! Battle worker that owns the authoritative [`battle_core::BattleState`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), runs them
//! through [`battle_core::BattleEngine`], publishes the resulting events to the
//! EventBus and plays requested animations through the configured driver.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use battle_core::{
    Action, AudioSink, BattleConfig, BattleEngine, BattleError, BattleEvent, BattleState,
    BattleStatus, EngineError, SelectionInput,
};

use crate::api::{AnimationDriver, Result, RuntimeError};
use crate::events::{Event, EventBus};

/// Commands that can be sent to the battle worker
pub enum Command {
    /// Advance the battle clock.
    Advance {
        dt: f32,
        reply: oneshot::Sender<Result<BattleStatus>>,
    },
    /// Route a navigation input to the active selection.
    Input {
        input: SelectionInput,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Queue an action chosen outside turn selection.
    SubmitAction {
        action: Action,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Resolve the in-flight action on behalf of the caller.
    CompleteAnimation { reply: oneshot::Sender<Result<()>> },
    /// Query the current battle state (read-only).
    QueryState { reply: oneshot::Sender<BattleState> },
}

/// Background task that processes battle commands.
pub struct BattleWorker {
    state: BattleState,
    config: BattleConfig,
    command_rx: mpsc::Receiver<Command>,
    completion_tx: mpsc::Sender<u64>,
    completion_rx: mpsc::Receiver<u64>,
    /// Sequence number of the last animation handed to the driver.
    animation_seq: u64,
    /// Driver animation whose completion resolves the in-flight action.
    awaiting: Option<u64>,
    event_bus: EventBus,
    audio: Arc<dyn AudioSink>,
    animation: Option<Arc<dyn AnimationDriver>>,
}

impl BattleWorker {
    pub fn new(
        state: BattleState,
        config: BattleConfig,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        audio: Arc<dyn AudioSink>,
        animation: Option<Arc<dyn AnimationDriver>>,
    ) -> Self {
        info!(
            target: "runtime::worker",
            controllable = state.roster.controllable().len(),
            opposing = state.roster.opposing().len(),
            manual_animation = animation.is_none(),
            "BattleWorker initialized"
        );

        let (completion_tx, completion_rx) = mpsc::channel(1);
        Self {
            state,
            config,
            command_rx,
            completion_tx,
            completion_rx,
            animation_seq: 0,
            awaiting: None,
            event_bus,
            audio,
            animation,
        }
    }

    /// Main worker loop. Exits once every handle has been dropped.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                Some(seq) = self.completion_rx.recv() => self.handle_driver_completion(seq),
            }
        }
        debug!(target: "runtime::worker", "BattleWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Advance { dt, reply } => {
                let result = self
                    .execute(|engine| engine.advance(dt))
                    .map(|()| self.state.status);
                if reply.send(result).is_err() {
                    debug!("Advance reply channel closed (caller dropped)");
                }
            }
            Command::Input { input, reply } => {
                debug!(target: "runtime::worker", %input, "Selection input");
                let result = self.execute(|engine| engine.handle_input(input));
                if reply.send(result).is_err() {
                    debug!("Input reply channel closed (caller dropped)");
                }
            }
            Command::SubmitAction { action, reply } => {
                let result = self.execute(|engine| engine.submit_action(action));
                if reply.send(result).is_err() {
                    debug!("SubmitAction reply channel closed (caller dropped)");
                }
            }
            Command::CompleteAnimation { reply } => {
                // A driver signal still on its way belongs to the action resolved here.
                self.awaiting = None;
                let result = self.execute(|engine| engine.complete_animation());
                if reply.send(result).is_err() {
                    debug!("CompleteAnimation reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn handle_driver_completion(&mut self, seq: u64) {
        if self.awaiting != Some(seq) {
            debug!(target: "runtime::worker", seq, "Stale animation completion dropped");
            return;
        }
        self.awaiting = None;
        if let Err(error) = self.execute(|engine| engine.complete_animation()) {
            debug!(target: "runtime::worker", %error, "Driver completion ignored");
        }
    }

    /// Runs one engine operation and publishes its events.
    fn execute(
        &mut self,
        op: impl FnOnce(&mut BattleEngine<'_>) -> std::result::Result<Vec<BattleEvent>, EngineError>,
    ) -> Result<()> {
        let outcome = {
            let mut engine =
                BattleEngine::new(&mut self.state, &self.config).with_audio(self.audio.as_ref());
            op(&mut engine)
        };

        match outcome {
            Ok(events) => {
                self.publish(events);
                Ok(())
            }
            Err(error) => {
                let severity = error.severity();
                if severity.is_internal() {
                    error!(
                        target: "runtime::worker",
                        %error,
                        severity = severity.as_str(),
                        "Battle engine failure"
                    );
                } else if severity.is_recoverable() {
                    debug!(target: "runtime::worker", %error, "Request rejected");
                } else {
                    warn!(target: "runtime::worker", %error, "Invalid request");
                }
                Err(RuntimeError::Engine(error))
            }
        }
    }

    fn publish(&mut self, events: Vec<BattleEvent>) {
        let tick = self.state.tick;
        for event in events {
            match &event {
                BattleEvent::AnimationRequested { request } => {
                    if let Some(driver) = &self.animation {
                        self.animation_seq += 1;
                        let seq = self.animation_seq;
                        self.awaiting = Some(seq);

                        let driver = Arc::clone(driver);
                        let request = request.clone();
                        let completion_tx = self.completion_tx.clone();
                        tokio::spawn(async move {
                            driver.play(&request).await;
                            // Worker gone means the battle was torn down mid-animation.
                            let _ = completion_tx.send(seq).await;
                        });
                    }
                }
                BattleEvent::BattleWon | BattleEvent::BattleLost => {
                    info!(target: "runtime::worker", %tick, outcome = ?event, "Battle over");
                }
                _ => {}
            }
            self.event_bus.publish(Event::new(tick, event));
        }
    }
}
