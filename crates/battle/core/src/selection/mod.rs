//! Turn selection state machine.
//!
//! A [`TurnSelection`] walks the active combatant through
//! `RootChoice → AbilityPick → TargetPick` and yields an [`Action`] once a
//! target is confirmed. It reads the roster but never mutates it; queueing
//! the committed action is the engine's job.

mod menu;
mod targeting;

pub use menu::{MenuCursor, RootCommand};
pub use targeting::TargetCursor;

use strum::EnumCount;

use crate::action::Action;
use crate::error::{BattleError, ErrorSeverity};
use crate::events::{AudioSink, BattleEvent, PhaseKind, RejectReason, SoundCue};
use crate::state::{Ability, Combatant, CombatantId, Roster};

/// Abstract navigation input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionInput {
    Previous,
    Next,
    Left,
    Right,
    Confirm,
    Cancel,
}

impl SelectionInput {
    /// Step applied to a target focus. Both axes move by one entry.
    fn target_delta(self) -> Option<isize> {
        match self {
            Self::Previous | Self::Left => Some(-1),
            Self::Next | Self::Right => Some(1),
            Self::Confirm | Self::Cancel => None,
        }
    }
}

/// Which ability list an `AbilityPick` phase browses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AbilityMenu {
    Magic,
    Summon,
}

impl AbilityMenu {
    fn entries(self, combatant: &Combatant) -> Vec<Ability> {
        match self {
            Self::Magic => combatant.spells.iter().cloned().map(Ability::Spell).collect(),
            Self::Summon => combatant.summons.iter().cloned().map(Ability::Summon).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SelectionPhase {
    RootChoice,
    AbilityPick(AbilityMenu),
    TargetPick {
        ability: Ability,
        cursor: TargetCursor,
        focus: CombatantId,
    },
}

impl SelectionPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Self::RootChoice => PhaseKind::RootChoice,
            Self::AbilityPick(_) => PhaseKind::AbilityPick,
            Self::TargetPick { .. } => PhaseKind::TargetPick,
        }
    }
}

/// Result of feeding one input to a selection.
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionStep {
    /// Still choosing.
    Pending,
    /// A target was confirmed. The selection is finished.
    Committed(Action),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("selecting combatant {0} is not on the roster")]
    UnknownCombatant(CombatantId),
}

impl BattleError for SelectionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }
}

/// Collaborators a selection reports through.
pub struct SelectionContext<'a> {
    pub roster: &'a Roster,
    pub menu_rows: usize,
    pub audio: &'a dyn AudioSink,
    pub events: &'a mut Vec<BattleEvent>,
}

/// In-progress command selection for one combatant.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnSelection {
    combatant: CombatantId,
    phase: SelectionPhase,
    root: MenuCursor,
    ability: MenuCursor,
}

impl TurnSelection {
    pub fn new(combatant: CombatantId) -> Self {
        Self {
            combatant,
            phase: SelectionPhase::RootChoice,
            root: MenuCursor::default(),
            ability: MenuCursor::default(),
        }
    }

    pub fn combatant(&self) -> CombatantId {
        self.combatant
    }

    pub fn phase(&self) -> &SelectionPhase {
        &self.phase
    }

    /// Currently focused target, if picking one.
    pub fn focus(&self) -> Option<CombatantId> {
        match &self.phase {
            SelectionPhase::TargetPick { focus, .. } => Some(*focus),
            _ => None,
        }
    }

    /// Index highlighted in the current phase. For target picks this is the
    /// index into the roster's targetable view.
    pub fn cursor(&self) -> usize {
        match &self.phase {
            SelectionPhase::RootChoice => self.root.index(),
            SelectionPhase::AbilityPick(_) => self.ability.index(),
            SelectionPhase::TargetPick { cursor, .. } => cursor.index(),
        }
    }

    /// Text describing the highlighted entry.
    pub fn info_text(&self, roster: &Roster) -> String {
        match &self.phase {
            SelectionPhase::RootChoice => RootCommand::from_repr(self.root.index())
                .map(|command| command.info_text().to_owned())
                .unwrap_or_default(),
            SelectionPhase::AbilityPick(menu) => roster
                .get(self.combatant)
                .and_then(|caster| menu.entries(caster).into_iter().nth(self.ability.index()))
                .map(|ability| ability.info_text().to_owned())
                .unwrap_or_default(),
            SelectionPhase::TargetPick { focus, .. } => roster
                .get(*focus)
                .map(|target| format!("{}: {}", target.name, target.health))
                .unwrap_or_default(),
        }
    }

    /// Emits the event describing the current phase and cursor.
    pub fn announce(&self, ctx: &mut SelectionContext<'_>) {
        ctx.events.push(BattleEvent::SelectionChanged {
            combatant: self.combatant,
            phase: self.phase.kind(),
            cursor: self.cursor(),
            info_text: self.info_text(ctx.roster),
        });
    }

    pub fn handle(
        &mut self,
        input: SelectionInput,
        ctx: &mut SelectionContext<'_>,
    ) -> Result<SelectionStep, SelectionError> {
        let roster = ctx.roster;
        let caster = roster
            .get(self.combatant)
            .ok_or(SelectionError::UnknownCombatant(self.combatant))?;

        match self.phase.clone() {
            SelectionPhase::RootChoice => self.handle_root(input, caster, ctx),
            SelectionPhase::AbilityPick(menu) => self.handle_ability(input, menu, caster, ctx),
            SelectionPhase::TargetPick { ability, .. } => self.handle_target(input, ability, ctx),
        }
    }

    /// Re-resolves the target focus after the roster changed underneath the
    /// selection.
    pub fn refresh(&mut self, ctx: &mut SelectionContext<'_>) {
        let SelectionPhase::TargetPick { cursor, focus, .. } = &mut self.phase else {
            return;
        };
        let Some(settled) = cursor.settle(ctx.roster) else {
            return;
        };
        if settled != *focus {
            *focus = settled;
            ctx.events.push(BattleEvent::TargetFocusChanged {
                combatant: self.combatant,
                target: settled,
            });
            self.announce(ctx);
        }
    }

    fn handle_root(
        &mut self,
        input: SelectionInput,
        caster: &Combatant,
        ctx: &mut SelectionContext<'_>,
    ) -> Result<SelectionStep, SelectionError> {
        match input {
            SelectionInput::Confirm => {
                let command = RootCommand::from_repr(self.root.index()).unwrap_or(RootCommand::Attack);
                match command {
                    RootCommand::Attack => self.enter_target_pick(Ability::BasicAttack, caster, ctx),
                    RootCommand::Magic if caster.spells.is_empty() => {
                        self.reject(RejectReason::NoSpells, ctx)
                    }
                    RootCommand::Magic => self.enter_ability_pick(AbilityMenu::Magic, ctx),
                    RootCommand::Summon if caster.summons.is_empty() => {
                        self.reject(RejectReason::NoSummons, ctx)
                    }
                    RootCommand::Summon => self.enter_ability_pick(AbilityMenu::Summon, ctx),
                    RootCommand::Skill => self.reject(RejectReason::SkillsUnavailable, ctx),
                    RootCommand::Item => self.reject(RejectReason::ItemsUnavailable, ctx),
                    RootCommand::Flee => self.reject(RejectReason::CannotFlee, ctx),
                }
                Ok(SelectionStep::Pending)
            }
            // Nothing to back out of.
            SelectionInput::Cancel => Ok(SelectionStep::Pending),
            nav => {
                if self.root.navigate(nav, RootCommand::COUNT, ctx.menu_rows) {
                    ctx.audio.play(SoundCue::Navigate);
                    self.announce(ctx);
                }
                Ok(SelectionStep::Pending)
            }
        }
    }

    fn handle_ability(
        &mut self,
        input: SelectionInput,
        menu: AbilityMenu,
        caster: &Combatant,
        ctx: &mut SelectionContext<'_>,
    ) -> Result<SelectionStep, SelectionError> {
        let entries = menu.entries(caster);
        match input {
            SelectionInput::Confirm => {
                match entries.into_iter().nth(self.ability.index()) {
                    Some(ability) => self.enter_target_pick(ability, caster, ctx),
                    None => self.reject(RejectReason::NoLegalTargets, ctx),
                }
                Ok(SelectionStep::Pending)
            }
            SelectionInput::Cancel => {
                self.phase = SelectionPhase::RootChoice;
                ctx.audio.play(SoundCue::Cancel);
                self.announce(ctx);
                Ok(SelectionStep::Pending)
            }
            nav => {
                if self.ability.navigate(nav, entries.len(), ctx.menu_rows) {
                    ctx.audio.play(SoundCue::Navigate);
                    self.announce(ctx);
                }
                Ok(SelectionStep::Pending)
            }
        }
    }

    fn handle_target(
        &mut self,
        input: SelectionInput,
        ability: Ability,
        ctx: &mut SelectionContext<'_>,
    ) -> Result<SelectionStep, SelectionError> {
        let roster = ctx.roster;
        let SelectionPhase::TargetPick { cursor, focus, .. } = &mut self.phase else {
            return Ok(SelectionStep::Pending);
        };

        match input {
            SelectionInput::Confirm => {
                let Some(target) = cursor.settle(roster) else {
                    self.reject(RejectReason::NoLegalTargets, ctx);
                    return Ok(SelectionStep::Pending);
                };
                ctx.audio.play(SoundCue::Confirm);
                Ok(SelectionStep::Committed(Action::new(
                    self.combatant,
                    ability,
                    target,
                )))
            }
            SelectionInput::Cancel => {
                self.phase = match &ability {
                    Ability::BasicAttack => SelectionPhase::RootChoice,
                    Ability::Spell(_) => SelectionPhase::AbilityPick(AbilityMenu::Magic),
                    Ability::Summon(_) => SelectionPhase::AbilityPick(AbilityMenu::Summon),
                };
                ctx.audio.play(SoundCue::Cancel);
                self.announce(ctx);
                Ok(SelectionStep::Pending)
            }
            nav => {
                let delta = nav.target_delta().unwrap_or(0);
                if let Some(next) = cursor.step(roster, delta)
                    && next != *focus
                {
                    *focus = next;
                    ctx.audio.play(SoundCue::Navigate);
                    ctx.events.push(BattleEvent::TargetFocusChanged {
                        combatant: self.combatant,
                        target: next,
                    });
                    self.announce(ctx);
                }
                Ok(SelectionStep::Pending)
            }
        }
    }

    fn enter_ability_pick(&mut self, menu: AbilityMenu, ctx: &mut SelectionContext<'_>) {
        self.phase = SelectionPhase::AbilityPick(menu);
        self.ability.reset();
        ctx.audio.play(SoundCue::Confirm);
        self.announce(ctx);
    }

    fn enter_target_pick(
        &mut self,
        ability: Ability,
        caster: &Combatant,
        ctx: &mut SelectionContext<'_>,
    ) {
        let side = ability.target_side(caster.side);
        let initial = if ability.is_offensive() {
            ctx.roster.first_living(side)
        } else {
            Some(caster.id)
        };
        let placed = initial.and_then(|focus| {
            TargetCursor::new(ctx.roster, side, focus).map(|cursor| (cursor, focus))
        });
        let Some((cursor, focus)) = placed else {
            self.reject(RejectReason::NoLegalTargets, ctx);
            return;
        };

        self.phase = SelectionPhase::TargetPick {
            ability,
            cursor,
            focus,
        };
        ctx.audio.play(SoundCue::Confirm);
        ctx.events.push(BattleEvent::TargetFocusChanged {
            combatant: self.combatant,
            target: focus,
        });
        self.announce(ctx);
    }

    fn reject(&self, reason: RejectReason, ctx: &mut SelectionContext<'_>) {
        ctx.audio.play(SoundCue::Cancel);
        ctx.events.push(BattleEvent::InputRejected {
            combatant: self.combatant,
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::events::testing::RecordingAudio;
    use crate::state::{CombatantTemplate, Polarity, Spell, Summon};

    struct Harness {
        roster: Roster,
        audio: RecordingAudio,
        events: Vec<BattleEvent>,
        selection: TurnSelection,
    }

    impl Harness {
        fn new(hero: CombatantTemplate, enemies: usize) -> Self {
            let ally = CombatantTemplate::new("Squire", 80, 10, 5, 10);
            let goblin = CombatantTemplate::new("Goblin", 30, 8, 2, 10);
            let roster =
                Roster::from_templates(&[hero, ally], &vec![goblin; enemies]).unwrap();
            Self {
                roster,
                audio: RecordingAudio::default(),
                events: Vec::new(),
                selection: TurnSelection::new(CombatantId(0)),
            }
        }

        fn press(&mut self, input: SelectionInput) -> SelectionStep {
            let mut ctx = SelectionContext {
                roster: &self.roster,
                menu_rows: 3,
                audio: &self.audio,
                events: &mut self.events,
            };
            self.selection.handle(input, &mut ctx).unwrap()
        }

        fn press_all(&mut self, inputs: &[SelectionInput]) -> SelectionStep {
            let mut last = SelectionStep::Pending;
            for input in inputs {
                last = self.press(*input);
            }
            last
        }

        fn rejections(&self) -> Vec<RejectReason> {
            self.events
                .iter()
                .filter_map(|event| match event {
                    BattleEvent::InputRejected { reason, .. } => Some(*reason),
                    _ => None,
                })
                .collect()
        }
    }

    fn mage() -> CombatantTemplate {
        CombatantTemplate::new("Mage", 60, 12, 3, 10)
            .with_spell(Arc::new(
                Spell::new("Fire", 40, Polarity::Debuff).with_info_text("Burns a foe."),
            ))
            .with_spell(Arc::new(Spell::new("Cure", 25, Polarity::Buff)))
    }

    use SelectionInput::*;

    #[test]
    fn attack_commits_against_first_opponent() {
        let mut h = Harness::new(mage(), 2);
        let step = h.press_all(&[Confirm, Confirm]);
        assert_eq!(step, SelectionStep::Committed(Action::attack(CombatantId(0), CombatantId(2))));
        assert_eq!(h.audio.take(), vec![SoundCue::Confirm, SoundCue::Confirm]);
    }

    #[test]
    fn buff_focuses_caster_and_cycles_allies_only() {
        let mut h = Harness::new(mage(), 2);
        // Magic → second spell (Cure)
        h.press_all(&[Next, Confirm, Next, Confirm]);
        assert_eq!(h.selection.focus(), Some(CombatantId(0)));

        h.press(Next);
        assert_eq!(h.selection.focus(), Some(CombatantId(1)));
        h.press(Next);
        assert_eq!(h.selection.focus(), Some(CombatantId(0)), "wraps within allies");
    }

    #[test]
    fn debuff_cycles_opponents_and_wraps() {
        let mut h = Harness::new(mage(), 3);
        h.press_all(&[Next, Confirm, Confirm]);
        assert_eq!(h.selection.focus(), Some(CombatantId(2)));

        h.press(Previous);
        assert_eq!(h.selection.focus(), Some(CombatantId(4)));
        h.press(Right);
        assert_eq!(h.selection.focus(), Some(CombatantId(2)));
    }

    #[test]
    fn root_entries_without_content_are_rejected() {
        let fighter = CombatantTemplate::new("Fighter", 100, 20, 5, 10);
        let mut h = Harness::new(fighter, 1);

        // Magic, Skill, Summon, Item, Flee
        h.press_all(&[Next, Confirm, Next, Confirm, Next, Confirm, Next, Confirm, Next, Confirm]);

        assert_eq!(
            h.rejections(),
            vec![
                RejectReason::NoSpells,
                RejectReason::SkillsUnavailable,
                RejectReason::NoSummons,
                RejectReason::ItemsUnavailable,
                RejectReason::CannotFlee,
            ]
        );
        assert_eq!(h.selection.phase(), &SelectionPhase::RootChoice);
    }

    #[test]
    fn cancel_walks_back_one_phase() {
        let mut h = Harness::new(mage(), 1);
        h.press_all(&[Next, Confirm, Confirm]);
        assert_eq!(h.selection.phase().kind(), PhaseKind::TargetPick);

        h.press(Cancel);
        assert_eq!(h.selection.phase(), &SelectionPhase::AbilityPick(AbilityMenu::Magic));
        h.press(Cancel);
        assert_eq!(h.selection.phase(), &SelectionPhase::RootChoice);
        assert_eq!(h.selection.cursor(), 1, "root cursor kept its position");

        h.press_all(&[Previous, Confirm]);
        h.press(Cancel);
        assert_eq!(h.selection.phase(), &SelectionPhase::RootChoice);
    }

    #[test]
    fn summon_menu_targets_opponents() {
        let caller = CombatantTemplate::new("Caller", 70, 5, 5, 10)
            .with_summon(Arc::new(Summon::new("Ifrit", 90).with_duration(2.5)));
        let mut h = Harness::new(caller, 2);
        h.press_all(&[Next, Next, Next]);
        assert_eq!(h.selection.info_text(&h.roster), "Summon a Bestia.");

        let step = h.press_all(&[Confirm, Confirm, Next, Confirm]);
        let SelectionStep::Committed(action) = step else {
            panic!("expected a committed summon, got {step:?}");
        };
        assert!(matches!(action.ability, Ability::Summon(_)));
        assert_eq!(action.target, CombatantId(3));
    }

    #[test]
    fn info_text_follows_cursor() {
        let mut h = Harness::new(mage(), 1);
        assert_eq!(h.selection.info_text(&h.roster), "Attack a target.");
        h.press_all(&[Next, Confirm]);
        assert_eq!(h.selection.info_text(&h.roster), "Burns a foe.");
        h.press(Confirm);
        assert_eq!(h.selection.info_text(&h.roster), "Goblin: 30/30");
    }

    #[test]
    fn refresh_steps_back_after_pruning() {
        let mut h = Harness::new(mage(), 3);
        h.press_all(&[Confirm, Previous]);
        assert_eq!(h.selection.focus(), Some(CombatantId(4)));

        h.roster.get_mut(CombatantId(4)).unwrap().health.current = 0;
        h.roster.prune_defeated(CombatantId(4));
        h.events.clear();

        let mut ctx = SelectionContext {
            roster: &h.roster,
            menu_rows: 3,
            audio: &h.audio,
            events: &mut h.events,
        };
        h.selection.refresh(&mut ctx);

        assert_eq!(h.selection.focus(), Some(CombatantId(3)));
        assert!(h.events.contains(&BattleEvent::TargetFocusChanged {
            combatant: CombatantId(0),
            target: CombatantId(3),
        }));
    }
}
