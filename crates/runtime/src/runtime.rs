//! High-level runtime orchestrator.
//!
//! The runtime owns the battle worker, wires up command/event channels, and
//! exposes a builder-based API plus a real-time clock loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use battle_core::{AudioSink, BattleConfig, BattleState, BattleStatus, EngineError, Roster};

use crate::api::{AnimationDriver, InstantAnimation, Result, RuntimeError, RuntimeHandle};
use crate::audio::TracingAudio;
use crate::events::EventBus;
use crate::workers::BattleWorker;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub battle: BattleConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Wall-clock time between clock ticks.
    pub tick_interval: Duration,
    /// Multiplier applied to the battle time each tick represents.
    pub time_scale: f32,
}

impl RuntimeConfig {
    /// Battle seconds that elapse per clock tick.
    pub fn tick_delta(&self) -> f32 {
        self.tick_interval.as_secs_f32() * self.time_scale
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            tick_interval: Duration::from_millis(50),
            time_scale: 1.0,
        }
    }
}

/// Main runtime that orchestrates a battle
///
/// Design: Runtime owns the worker and the clock.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    config: RuntimeConfig,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Ticks the battle at `tick_interval` until it finishes.
    ///
    /// Returns early with the current status after `max_ticks` ticks, if set.
    pub async fn run_clock(&self, max_ticks: Option<u64>) -> Result<BattleStatus> {
        let dt = self.config.tick_delta();
        let mut interval = tokio::time::interval(self.config.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            target: "runtime::clock",
            interval_ms = self.config.tick_interval.as_millis() as u64,
            dt,
            "Battle clock started"
        );

        let mut ticks = 0u64;
        loop {
            interval.tick().await;
            let status = match self.handle.advance(dt).await {
                Ok(status) => status,
                // An animation completion between ticks already ended the battle.
                Err(RuntimeError::Engine(EngineError::BattleFinished(status))) => status,
                Err(error) => return Err(error),
            };
            ticks += 1;

            if status.is_finished() {
                info!(target: "runtime::clock", ticks, %status, "Battle clock stopped");
                return Ok(status);
            }
            if max_ticks.is_some_and(|max| ticks >= max) {
                debug!(target: "runtime::clock", ticks, "Tick limit reached");
                return Ok(status);
            }
        }
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every cloned handle has also been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    roster: Option<Roster>,
    audio: Option<Arc<dyn AudioSink>>,
    animation: Option<Arc<dyn AnimationDriver>>,
    manual_animation: bool,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            roster: None,
            audio: None,
            animation: None,
            manual_animation: false,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the combatants taking part (required)
    pub fn roster(mut self, roster: Roster) -> Self {
        self.roster = Some(roster);
        self
    }

    /// Set the sound sink. Defaults to [`TracingAudio`].
    pub fn audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Some(Arc::new(audio));
        self
    }

    /// Set the animation driver. Defaults to [`InstantAnimation`].
    pub fn animation(mut self, driver: impl AnimationDriver + 'static) -> Self {
        self.animation = Some(Arc::new(driver));
        self.manual_animation = false;
        self
    }

    /// Disable the animation driver. Callers must then signal every
    /// completion through [`RuntimeHandle::complete_animation`].
    pub fn manual_animation(mut self) -> Self {
        self.animation = None;
        self.manual_animation = true;
        self
    }

    /// Build the runtime
    pub async fn build(self) -> Result<Runtime> {
        let roster = self.roster.ok_or(RuntimeError::MissingRoster)?;

        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let audio = self
            .audio
            .unwrap_or_else(|| Arc::new(TracingAudio) as Arc<dyn AudioSink>);
        let animation = if self.manual_animation {
            None
        } else {
            Some(
                self.animation
                    .unwrap_or_else(|| Arc::new(InstantAnimation) as Arc<dyn AnimationDriver>),
            )
        };

        let worker = BattleWorker::new(
            BattleState::new(roster),
            self.config.battle.clone(),
            command_rx,
            event_bus,
            audio,
            animation,
        );
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Ok(Runtime {
            handle,
            config: self.config,
            worker_handle,
        })
    }
}
