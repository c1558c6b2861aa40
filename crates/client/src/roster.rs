//! Roster loading.
//!
//! Rosters are written in RON as two lists of combatant templates. The
//! built-in roster is the bundled `assets/roster.ron`.
use std::path::Path;

use anyhow::{Context, Result};
use battle_core::{CombatantTemplate, Roster};
use serde::{Deserialize, Serialize};

const BUILTIN_ROSTER: &str = include_str!("../assets/roster.ron");

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RosterFile {
    pub controllable: Vec<CombatantTemplate>,
    pub opposing: Vec<CombatantTemplate>,
}

impl RosterFile {
    pub fn parse(source: &str) -> Result<Self> {
        ron::from_str(source).context("invalid roster RON")
    }

    pub fn into_roster(self) -> Result<Roster> {
        Roster::from_templates(&self.controllable, &self.opposing).context("invalid roster")
    }
}

pub fn load_roster(path: &Path) -> Result<Roster> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster {}", path.display()))?;
    RosterFile::parse(&source)
        .with_context(|| format!("failed to parse roster {}", path.display()))?
        .into_roster()
}

pub fn builtin_roster() -> Result<Roster> {
    RosterFile::parse(BUILTIN_ROSTER)?.into_roster()
}

#[cfg(test)]
mod tests {
    use battle_core::{Polarity, Side};

    use super::*;

    #[test]
    fn builtin_roster_loads() {
        let roster = builtin_roster().unwrap();
        assert_eq!(roster.controllable().len(), 3);
        assert_eq!(roster.opposing().len(), 3);

        let corin = &roster.controllable()[1];
        assert_eq!(corin.spells.len(), 2);
        assert_eq!(corin.spells[1].polarity, Polarity::Buff);
        assert_eq!(corin.health.current, 90);
        assert_eq!(roster.opposing()[0].side, Side::Opposing);
    }

    #[test]
    fn empty_party_is_reported() {
        let file = RosterFile::parse(
            r#"(controllable: [], opposing: [(name: "Rat", max_health: 5, speed: 1, attack: 1, defense: 0)])"#,
        )
        .unwrap();
        let err = file.into_roster().unwrap_err();
        assert!(format!("{err:#}").contains("controllable party is empty"));
    }

    #[test]
    fn malformed_source_is_rejected() {
        assert!(RosterFile::parse("(controllable: [").is_err());
    }
}
