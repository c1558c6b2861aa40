//! Outbound notifications and presentation collaborators.
//!
//! The engine never draws or plays anything itself. It reports what happened
//! as [`BattleEvent`]s and forwards sound cues to an [`AudioSink`].

use crate::action::Action;
use crate::state::{Ability, CombatantId};

/// Why a selection input was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RejectReason {
    NoSpells,
    NoSummons,
    SkillsUnavailable,
    ItemsUnavailable,
    CannotFlee,
    NoLegalTargets,
}

impl RejectReason {
    /// Message shown to the player.
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoSpells => "Fighter has no spells.",
            Self::NoSummons => "Fighter has no Bestia.",
            Self::SkillsUnavailable => "Skills are not available yet.",
            Self::ItemsUnavailable => "The inventory is not available yet.",
            Self::CannotFlee => "Can't flee this battle.",
            Self::NoLegalTargets => "There is nothing to target.",
        }
    }
}

/// Coarse phase of a turn selection, reported to presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PhaseKind {
    RootChoice,
    AbilityPick,
    TargetPick,
}

/// Request to play the animation for an action that is about to resolve.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimationRequest {
    pub attacker: CombatantId,
    pub target: CombatantId,
    pub ability: Ability,
}

impl AnimationRequest {
    /// Suggested on-screen duration in seconds, if the ability carries one.
    pub fn duration_hint(&self) -> Option<f32> {
        match &self.ability {
            Ability::Summon(summon) if summon.duration.is_finite() && summon.duration > 0.0 => {
                Some(summon.duration)
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum BattleEvent {
    /// Readiness of a controllable combatant, as a percentage of the threshold.
    TurnMeterUpdated {
        combatant: CombatantId,
        percentage: f32,
    },
    /// A controllable combatant joined the dispatch queue.
    TurnReady { combatant: CombatantId },
    SelectionChanged {
        combatant: CombatantId,
        phase: PhaseKind,
        cursor: usize,
        info_text: String,
    },
    TargetFocusChanged {
        combatant: CombatantId,
        target: CombatantId,
    },
    InputRejected {
        combatant: CombatantId,
        reason: RejectReason,
    },
    ActionQueued { action: Action },
    AnimationRequested { request: AnimationRequest },
    /// The action's target and its whole side were defeated before it resolved.
    ActionAbandoned { action: Action },
    DamageDealt {
        attacker: CombatantId,
        target: CombatantId,
        amount: i32,
    },
    Healed {
        attacker: CombatantId,
        target: CombatantId,
        amount: i32,
    },
    TargetDefeated { target: CombatantId },
    BattleWon,
    BattleLost,
}

/// Sound cues requested by the battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SoundCue {
    Navigate,
    Confirm,
    Cancel,
    WinFanfare,
    LoseFanfare,
}

/// Plays sound cues. Implementations must not block.
pub trait AudioSink: Send + Sync {
    fn play(&self, cue: SoundCue);
}

/// Audio sink that discards every cue.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAudio;

impl AudioSink for NoopAudio {
    fn play(&self, _cue: SoundCue) {}
}
