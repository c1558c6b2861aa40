//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! advancing the battle clock, forwarding input or streaming events from
//! specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use battle_core::{Action, BattleState, BattleStatus, SelectionInput};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Advances the battle clock by `dt` seconds and returns the status after
    /// the tick.
    pub async fn advance(&self, dt: f32) -> Result<BattleStatus> {
        self.request(|reply| Command::Advance { dt, reply }).await?
    }

    /// Forwards a navigation input to the active combatant's selection.
    pub async fn send_input(&self, input: SelectionInput) -> Result<()> {
        self.request(|reply| Command::Input { input, reply }).await?
    }

    /// Queues an action chosen outside turn selection.
    pub async fn submit_action(&self, action: Action) -> Result<()> {
        self.request(|reply| Command::SubmitAction { action, reply })
            .await?
    }

    /// Signals that the pending animation finished.
    ///
    /// Only needed when the runtime was built without an animation driver.
    pub async fn complete_animation(&self) -> Result<()> {
        self.request(|reply| Command::CompleteAnimation { reply })
            .await?
    }

    /// Query the current battle state (read-only snapshot)
    pub async fn query_state(&self) -> Result<BattleState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Combat` - queued, animated and resolved actions
    /// - `Topic::Turn` - readiness meters and ready combatants
    /// - `Topic::Selection` - menu and target focus changes
    /// - `Topic::Outcome` - battle won or lost
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut outcome_rx = handle.subscribe(Topic::Outcome);
    /// while let Ok(event) = outcome_rx.recv().await {
    ///     // Show the result screen
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }
}
