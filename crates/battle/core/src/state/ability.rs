//! Ability reference data.
//!
//! Spells and summons are immutable once built and are shared between every
//! combatant that knows them, so combatants hold them behind [`Arc`].

use std::sync::Arc;

/// Whether a spell harms an opponent or helps an ally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Polarity {
    Debuff,
    Buff,
}

/// A spell definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spell {
    pub name: String,
    /// Damage before defense for debuffs, flat heal for buffs.
    pub magnitude: i32,
    /// Carried for presentation; casting does not consume mana.
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_cost: i32,
    pub polarity: Polarity,
    #[cfg_attr(feature = "serde", serde(default))]
    pub info_text: String,
}

impl Spell {
    pub fn new(name: impl Into<String>, magnitude: i32, polarity: Polarity) -> Self {
        Self {
            name: name.into(),
            magnitude,
            mana_cost: 0,
            polarity,
            info_text: String::new(),
        }
    }

    pub fn with_mana_cost(mut self, mana_cost: i32) -> Self {
        self.mana_cost = mana_cost;
        self
    }

    pub fn with_info_text(mut self, info_text: impl Into<String>) -> Self {
        self.info_text = info_text.into();
        self
    }
}

/// A summon definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summon {
    pub name: String,
    /// Damage dealt to the target, ignoring defense.
    pub magnitude: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_cost: i32,
    /// Presentation hint in seconds for how long the summon stays on screen.
    #[cfg_attr(feature = "serde", serde(default))]
    pub duration: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub info_text: String,
}

impl Summon {
    pub fn new(name: impl Into<String>, magnitude: i32) -> Self {
        Self {
            name: name.into(),
            magnitude,
            mana_cost: 0,
            duration: 0.0,
            info_text: String::new(),
        }
    }

    pub fn with_mana_cost(mut self, mana_cost: i32) -> Self {
        self.mana_cost = mana_cost;
        self
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_info_text(mut self, info_text: impl Into<String>) -> Self {
        self.info_text = info_text.into();
        self
    }
}

/// What a queued action does.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Ability {
    BasicAttack,
    Spell(Arc<Spell>),
    Summon(Arc<Summon>),
}

impl Ability {
    /// Returns true if the ability is aimed at the caster's opponents.
    pub fn is_offensive(&self) -> bool {
        match self {
            Self::BasicAttack | Self::Summon(_) => true,
            Self::Spell(spell) => spell.polarity == Polarity::Debuff,
        }
    }

    /// Side whose members are legal targets when cast by a member of `caster`.
    pub fn target_side(&self, caster: super::Side) -> super::Side {
        if self.is_offensive() {
            caster.opposite()
        } else {
            caster
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::BasicAttack => "Attack",
            Self::Spell(spell) => &spell.name,
            Self::Summon(summon) => &summon.name,
        }
    }

    pub fn info_text(&self) -> &str {
        match self {
            Self::BasicAttack => "Attack a target.",
            Self::Spell(spell) => &spell.info_text,
            Self::Summon(summon) => &summon.info_text,
        }
    }
}
