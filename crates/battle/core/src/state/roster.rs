use std::ops::Range;

use arrayvec::ArrayVec;

use super::{BattleSetupError, Combatant, CombatantId, CombatantTemplate, Side};
use crate::config::BattleConfig;

pub type Party = ArrayVec<Combatant, { BattleConfig::MAX_PARTY_SIZE }>;

/// Both parties plus the flattened targetable view.
///
/// The targetable view lists the controllable party first, then the opposing
/// party, each in roster order. Defeated opposing combatants are removed from
/// it; controllable combatants are never removed, so indices
/// `0..controllable().len()` always address the controllable party.
#[derive(Clone, Debug)]
pub struct Roster {
    controllable: Party,
    opposing: Party,
    targetable: Vec<CombatantId>,
}

impl Roster {
    pub fn new(
        controllable: Vec<Combatant>,
        opposing: Vec<Combatant>,
    ) -> Result<Self, BattleSetupError> {
        let controllable = Self::build_party(Side::Controllable, controllable)?;
        let opposing = Self::build_party(Side::Opposing, opposing)?;

        let mut targetable = Vec::with_capacity(controllable.len() + opposing.len());
        for combatant in controllable.iter().chain(opposing.iter()) {
            if targetable.contains(&combatant.id) {
                return Err(BattleSetupError::DuplicateId(combatant.id));
            }
            targetable.push(combatant.id);
        }

        Ok(Self {
            controllable,
            opposing,
            targetable,
        })
    }

    /// Builds a roster from templates, assigning ids sequentially starting at 0
    /// with the controllable party first.
    pub fn from_templates(
        controllable: &[CombatantTemplate],
        opposing: &[CombatantTemplate],
    ) -> Result<Self, BattleSetupError> {
        let mut next_id = 0u32;
        let mut instantiate = |side: Side, templates: &[CombatantTemplate]| {
            templates
                .iter()
                .map(|template| {
                    let id = CombatantId(next_id);
                    next_id += 1;
                    Combatant::from_template(id, side, template)
                })
                .collect::<Vec<_>>()
        };
        let controllable = instantiate(Side::Controllable, controllable);
        let opposing = instantiate(Side::Opposing, opposing);
        Self::new(controllable, opposing)
    }

    fn build_party(side: Side, members: Vec<Combatant>) -> Result<Party, BattleSetupError> {
        if members.is_empty() {
            return Err(BattleSetupError::EmptyParty { side });
        }
        if members.len() > BattleConfig::MAX_PARTY_SIZE {
            return Err(BattleSetupError::PartyTooLarge {
                side,
                len: members.len(),
                max: BattleConfig::MAX_PARTY_SIZE,
            });
        }
        if let Some(stray) = members.iter().find(|member| member.side != side) {
            return Err(BattleSetupError::SideMismatch {
                id: stray.id,
                party: side,
                actual: stray.side,
            });
        }
        Ok(members.into_iter().collect())
    }

    pub fn controllable(&self) -> &[Combatant] {
        &self.controllable
    }

    pub fn opposing(&self) -> &[Combatant] {
        &self.opposing
    }

    pub fn party(&self, side: Side) -> &[Combatant] {
        match side {
            Side::Controllable => &self.controllable,
            Side::Opposing => &self.opposing,
        }
    }

    /// Every combatant in roster order, controllable party first.
    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.controllable.iter().chain(self.opposing.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.controllable.iter_mut().chain(self.opposing.iter_mut())
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.iter().find(|combatant| combatant.id == id)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.iter_mut().find(|combatant| combatant.id == id)
    }

    /// Flattened targetable view.
    pub fn targetable(&self) -> &[CombatantId] {
        &self.targetable
    }

    /// Position of `id` within the targetable view.
    pub fn targetable_index(&self, id: CombatantId) -> Option<usize> {
        self.targetable.iter().position(|candidate| *candidate == id)
    }

    /// Index range of `side`'s members within the targetable view.
    pub fn pool_bounds(&self, side: Side) -> Range<usize> {
        let split = self.controllable.len();
        match side {
            Side::Controllable => 0..split,
            Side::Opposing => split..self.targetable.len(),
        }
    }

    pub fn first_living(&self, side: Side) -> Option<CombatantId> {
        self.party(side)
            .iter()
            .find(|combatant| combatant.is_alive())
            .map(|combatant| combatant.id)
    }

    pub fn any_alive(&self, side: Side) -> bool {
        self.party(side).iter().any(Combatant::is_alive)
    }

    /// Removes a defeated opposing combatant from the targetable view.
    ///
    /// Controllable combatants are never pruned. Returns true if the view
    /// changed.
    pub fn prune_defeated(&mut self, id: CombatantId) -> bool {
        let Some(combatant) = self.get(id) else {
            return false;
        };
        if combatant.side != Side::Opposing || combatant.is_alive() {
            return false;
        }
        let before = self.targetable.len();
        self.targetable.retain(|candidate| *candidate != id);
        before != self.targetable.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str) -> CombatantTemplate {
        CombatantTemplate::new(name, 50, 10, 5, 10)
    }

    fn roster(controllable: usize, opposing: usize) -> Roster {
        let allies: Vec<_> = (0..controllable).map(|i| template(&format!("ally{i}"))).collect();
        let enemies: Vec<_> = (0..opposing).map(|i| template(&format!("enemy{i}"))).collect();
        Roster::from_templates(&allies, &enemies).expect("valid roster")
    }

    #[test]
    fn targetable_view_lists_controllable_first() {
        let roster = roster(2, 3);
        assert_eq!(
            roster.targetable(),
            &[0, 1, 2, 3, 4].map(CombatantId)
        );
        assert_eq!(roster.pool_bounds(Side::Controllable), 0..2);
        assert_eq!(roster.pool_bounds(Side::Opposing), 2..5);
    }

    #[test]
    fn rejects_empty_and_oversized_parties() {
        let err = Roster::from_templates(&[], &[template("e")]).unwrap_err();
        assert_eq!(err, BattleSetupError::EmptyParty { side: Side::Controllable });

        let crowd = vec![template("e"); BattleConfig::MAX_PARTY_SIZE + 1];
        let err = Roster::from_templates(&[template("a")], &crowd).unwrap_err();
        assert!(matches!(err, BattleSetupError::PartyTooLarge { side: Side::Opposing, .. }));
    }

    #[test]
    fn rejects_duplicate_ids_and_wrong_sides() {
        let t = template("x");
        let ally = Combatant::from_template(CombatantId(7), Side::Controllable, &t);
        let enemy = Combatant::from_template(CombatantId(7), Side::Opposing, &t);
        assert_eq!(
            Roster::new(vec![ally.clone()], vec![enemy]).unwrap_err(),
            BattleSetupError::DuplicateId(CombatantId(7))
        );

        let misplaced = Combatant::from_template(CombatantId(8), Side::Controllable, &t);
        assert!(matches!(
            Roster::new(vec![ally], vec![misplaced]).unwrap_err(),
            BattleSetupError::SideMismatch { party: Side::Opposing, .. }
        ));
    }

    #[test]
    fn prunes_only_defeated_opposing_combatants() {
        let mut roster = roster(2, 2);

        assert!(!roster.prune_defeated(CombatantId(2)), "alive enemy stays");

        roster.get_mut(CombatantId(0)).unwrap().health.current = 0;
        assert!(!roster.prune_defeated(CombatantId(0)), "allies are never pruned");

        roster.get_mut(CombatantId(2)).unwrap().health.current = -4;
        assert!(roster.prune_defeated(CombatantId(2)));
        assert_eq!(roster.targetable(), &[0, 1, 3].map(CombatantId));
        assert_eq!(roster.pool_bounds(Side::Opposing), 2..3);
        assert_eq!(roster.first_living(Side::Opposing), Some(CombatantId(3)));
    }
}
