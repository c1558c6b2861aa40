use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::{CombatantId, ResourceMeter, Side, Spell, Summon};

/// Blueprint a combatant is instantiated from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatantTemplate {
    pub name: String,
    pub max_health: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_mana: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub initial_readiness: f32,
    pub speed: u32,
    pub attack: i32,
    pub defense: i32,
    /// Carried as data; no rule currently rolls against it.
    #[cfg_attr(feature = "serde", serde(default))]
    pub crit_chance: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spells: Vec<Arc<Spell>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub summons: Vec<Arc<Summon>>,
}

impl CombatantTemplate {
    pub fn new(name: impl Into<String>, max_health: i32, attack: i32, defense: i32, speed: u32) -> Self {
        Self {
            name: name.into(),
            max_health,
            max_mana: 0,
            initial_readiness: 0.0,
            speed,
            attack,
            defense,
            crit_chance: 0.0,
            spells: Vec::new(),
            summons: Vec::new(),
        }
    }

    pub fn with_mana(mut self, max_mana: i32) -> Self {
        self.max_mana = max_mana;
        self
    }

    pub fn with_initial_readiness(mut self, readiness: f32) -> Self {
        self.initial_readiness = readiness;
        self
    }

    pub fn with_crit_chance(mut self, crit_chance: f32) -> Self {
        self.crit_chance = crit_chance;
        self
    }

    pub fn with_spell(mut self, spell: Arc<Spell>) -> Self {
        self.spells.push(spell);
        self
    }

    pub fn with_summon(mut self, summon: Arc<Summon>) -> Self {
        self.summons.push(summon);
        self
    }
}

/// Stats of the acting combatant captured before an effect is applied.
///
/// Rule functions read the attacker through this snapshot so the target can
/// be borrowed mutably even when it is the attacker itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatStats {
    pub attack: i32,
    pub defense: i32,
    pub speed: u32,
    pub level: u32,
    pub crit_chance: f32,
}

/// A participant in the battle.
///
/// Equality and hashing only consider [`Combatant::id`].
#[derive(Clone, Debug)]
pub struct Combatant {
    pub id: CombatantId,
    pub side: Side,
    pub name: String,
    pub level: u32,
    pub health: ResourceMeter,
    pub mana: ResourceMeter,
    pub attack: i32,
    pub defense: i32,
    pub speed: u32,
    pub crit_chance: f32,
    /// Accumulated turn readiness.
    pub readiness: f32,
    /// True from the moment the combatant's action is committed until it has
    /// resolved or been abandoned.
    pub busy: bool,
    pub spells: Vec<Arc<Spell>>,
    pub summons: Vec<Arc<Summon>>,
}

impl Combatant {
    /// Instantiates a level 1 combatant with full health and mana.
    pub fn from_template(id: CombatantId, side: Side, template: &CombatantTemplate) -> Self {
        Self {
            id,
            side,
            name: template.name.clone(),
            level: 1,
            health: ResourceMeter::full(template.max_health),
            mana: ResourceMeter::full(template.max_mana),
            attack: template.attack,
            defense: template.defense,
            speed: template.speed,
            crit_chance: template.crit_chance,
            readiness: template.initial_readiness,
            busy: false,
            spells: template.spells.clone(),
            summons: template.summons.clone(),
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.health.is_depleted()
    }

    pub fn stats(&self) -> CombatStats {
        CombatStats {
            attack: self.attack,
            defense: self.defense,
            speed: self.speed,
            level: self.level,
            crit_chance: self.crit_chance,
        }
    }
}

impl PartialEq for Combatant {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Combatant {}

impl Hash for Combatant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Polarity;

    #[test]
    fn template_instantiates_full_level_one_combatant() {
        let template = CombatantTemplate::new("Aria", 120, 25, 8, 12)
            .with_mana(40)
            .with_spell(Arc::new(Spell::new("Fire", 30, Polarity::Debuff)));
        let combatant = Combatant::from_template(CombatantId(3), Side::Controllable, &template);

        assert_eq!(combatant.level, 1);
        assert_eq!(combatant.health, ResourceMeter::full(120));
        assert_eq!(combatant.mana, ResourceMeter::full(40));
        assert_eq!(combatant.readiness, 0.0);
        assert!(!combatant.busy);
        assert!(combatant.is_alive());
        assert_eq!(combatant.spells.len(), 1);
    }

    #[test]
    fn identity_ignores_field_values() {
        let template = CombatantTemplate::new("Twin", 50, 10, 5, 10);
        let a = Combatant::from_template(CombatantId(1), Side::Opposing, &template);
        let b = Combatant::from_template(CombatantId(2), Side::Opposing, &template);
        let mut a_hurt = a.clone();
        a_hurt.health.current = 1;

        assert_ne!(a, b);
        assert_eq!(a, a_hurt);
    }

    #[test]
    fn spells_are_shared_between_instances() {
        let fire = Arc::new(Spell::new("Fire", 30, Polarity::Debuff));
        let template = CombatantTemplate::new("Mage", 60, 5, 5, 10).with_spell(fire.clone());
        let first = Combatant::from_template(CombatantId(1), Side::Controllable, &template);
        let second = Combatant::from_template(CombatantId(2), Side::Controllable, &template);

        assert!(Arc::ptr_eq(&first.spells[0], &fire));
        assert!(Arc::ptr_eq(&second.spells[0], &fire));
    }
}
