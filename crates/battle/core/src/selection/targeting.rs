use crate::state::{CombatantId, Roster, Side};

/// Focus within one side's slice of the roster's targetable view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetCursor {
    side: Side,
    index: usize,
}

impl TargetCursor {
    /// Places the cursor on `focus`. Returns `None` if `focus` is not a
    /// targetable member of `side`.
    pub fn new(roster: &Roster, side: Side, focus: CombatantId) -> Option<Self> {
        let index = roster.targetable_index(focus)?;
        roster
            .pool_bounds(side)
            .contains(&index)
            .then_some(Self { side, index })
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Index into the targetable view.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Pulls the cursor back inside the pool after the roster shrank.
    ///
    /// An index past the end steps back to the last entry instead of
    /// wrapping to the first.
    pub fn settle(&mut self, roster: &Roster) -> Option<CombatantId> {
        let bounds = roster.pool_bounds(self.side);
        if bounds.is_empty() {
            return None;
        }
        self.index = self.index.clamp(bounds.start, bounds.end - 1);
        roster.targetable().get(self.index).copied()
    }

    /// Moves the focus by `delta` entries, wrapping within the pool.
    pub fn step(&mut self, roster: &Roster, delta: isize) -> Option<CombatantId> {
        self.settle(roster)?;
        let bounds = roster.pool_bounds(self.side);
        let stepped = self.index as isize + delta;
        self.index = if stepped < bounds.start as isize {
            bounds.end - 1
        } else if stepped >= bounds.end as isize {
            bounds.start
        } else {
            stepped as usize
        };
        roster.targetable().get(self.index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CombatantTemplate;

    fn roster() -> Roster {
        let ally = CombatantTemplate::new("Ally", 50, 10, 5, 10);
        let enemy = CombatantTemplate::new("Enemy", 50, 10, 5, 10);
        Roster::from_templates(&[ally.clone(), ally], &[enemy.clone(), enemy.clone(), enemy])
            .unwrap()
    }

    fn defeat(roster: &mut Roster, id: u32) {
        roster.get_mut(CombatantId(id)).unwrap().health.current = 0;
        roster.prune_defeated(CombatantId(id));
    }

    #[test]
    fn rejects_focus_outside_pool() {
        let roster = roster();
        assert!(TargetCursor::new(&roster, Side::Opposing, CombatantId(0)).is_none());
        assert!(TargetCursor::new(&roster, Side::Opposing, CombatantId(2)).is_some());
    }

    #[test]
    fn steps_wrap_within_pool() {
        let roster = roster();
        let mut cursor = TargetCursor::new(&roster, Side::Opposing, CombatantId(4)).unwrap();
        assert_eq!(cursor.step(&roster, 1), Some(CombatantId(2)));
        assert_eq!(cursor.step(&roster, -1), Some(CombatantId(4)));

        let mut allies = TargetCursor::new(&roster, Side::Controllable, CombatantId(0)).unwrap();
        assert_eq!(allies.step(&roster, -1), Some(CombatantId(1)));
    }

    #[test]
    fn pruning_last_entry_steps_back() {
        let mut roster = roster();
        let mut cursor = TargetCursor::new(&roster, Side::Opposing, CombatantId(4)).unwrap();
        defeat(&mut roster, 4);
        assert_eq!(cursor.settle(&roster), Some(CombatantId(3)));
    }

    #[test]
    fn pruning_middle_entry_shifts_focus_forward() {
        let mut roster = roster();
        let mut cursor = TargetCursor::new(&roster, Side::Opposing, CombatantId(3)).unwrap();
        defeat(&mut roster, 3);
        assert_eq!(cursor.settle(&roster), Some(CombatantId(4)));
    }

    #[test]
    fn empty_pool_has_no_focus() {
        let mut roster = roster();
        let mut cursor = TargetCursor::new(&roster, Side::Opposing, CombatantId(2)).unwrap();
        for id in 2..5 {
            defeat(&mut roster, id);
        }
        assert_eq!(cursor.settle(&roster), None);
        assert_eq!(cursor.step(&roster, 1), None);
    }
}
