use std::fmt;

/// Unique identifier for a combatant. Two combatants are the same combatant
/// exactly when their ids match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantId(pub u32);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which party a combatant fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Side {
    /// The party commanded through turn selection.
    Controllable,
    /// The party being fought.
    Opposing,
}

impl Side {
    pub const fn opposite(self) -> Self {
        match self {
            Self::Controllable => Self::Opposing,
            Self::Opposing => Self::Controllable,
        }
    }
}

/// Number of `advance` calls processed so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Current and maximum value of a depletable resource (health, mana).
///
/// `current` is signed: health may drop below zero, and buffs may raise it
/// above `maximum`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: i32,
    pub maximum: i32,
}

impl ResourceMeter {
    pub fn new(current: i32, maximum: i32) -> Self {
        Self { current, maximum }
    }

    /// A meter filled to its maximum.
    pub fn full(maximum: i32) -> Self {
        Self::new(maximum, maximum)
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }
}

impl fmt::Display for ResourceMeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.maximum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_depletes_at_zero_and_below() {
        assert!(!ResourceMeter::full(10).is_depleted());
        assert!(ResourceMeter::new(0, 10).is_depleted());
        assert!(ResourceMeter::new(-3, 10).is_depleted());
    }

    #[test]
    fn sides_are_opposites() {
        assert_eq!(Side::Controllable.opposite(), Side::Opposing);
        assert_eq!(Side::Opposing.opposite(), Side::Controllable);
        assert_eq!(Side::Opposing.to_string(), "opposing");
    }
}
