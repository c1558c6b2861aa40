//! Async runtime that drives a battle in real time.
//!
//! The runtime owns the authoritative [`battle_core::BattleState`] inside a
//! worker task, feeds it clock ticks and player input, plays animations
//! through an [`AnimationDriver`] and fans engine events out on a topic-based
//! [`EventBus`]. Consumers interact with it through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and clock loop
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event routing
//! - [`audio`] holds the log-backed sound sink
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod audio;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{
    AnimationDriver, InstantAnimation, Result, RuntimeError, RuntimeHandle, TimedAnimation,
};
pub use audio::TracingAudio;
pub use events::{Event, EventBus, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
