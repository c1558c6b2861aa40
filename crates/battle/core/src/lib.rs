//! Deterministic active-time battle rules.
//!
//! `battle-core` owns the battle model (roster, abilities, queues) and the
//! pure logic that drives it: readiness accrual, turn selection, action
//! execution and outcome detection. It performs no timing or I/O; callers
//! advance it tick by tick through [`engine::BattleEngine`] and relay the
//! returned [`events::BattleEvent`]s to presentation.
pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod rules;
pub mod selection;
pub mod state;

pub use action::Action;
pub use config::BattleConfig;
pub use engine::{BattleEngine, EngineError};
pub use error::{BattleError, ErrorSeverity};
pub use events::{
    AnimationRequest, AudioSink, BattleEvent, NoopAudio, PhaseKind, RejectReason, SoundCue,
};
pub use rules::Effect;
pub use selection::{
    AbilityMenu, RootCommand, SelectionError, SelectionInput, SelectionPhase, TurnSelection,
};
pub use state::{
    Ability, BattleSetupError, BattleState, BattleStatus, CombatStats, Combatant, CombatantId,
    CombatantTemplate, InFlightAction, Polarity, ResourceMeter, Roster, Side, Spell, Summon, Tick,
};
