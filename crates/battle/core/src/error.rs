//! Common error infrastructure for battle-core.
//!
//! Domain errors (`BattleSetupError`, `SelectionError`, `EngineError`) live
//! next to the code that raises them. This module only carries the shared
//! severity classification so callers can choose a recovery strategy without
//! matching on every variant.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the request was rejected in the current state but may
///   succeed later (e.g. no animation is pending yet)
/// - **Validation**: malformed input that will never succeed unchanged
/// - **Internal**: state inconsistency, indicates a bug
/// - **Fatal**: the battle cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common interface implemented by every battle-core error type.
pub trait BattleError: std::error::Error {
    fn severity(&self) -> ErrorSeverity;
}
