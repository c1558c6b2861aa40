//! Automatic commander for the controllable party.
//!
//! Whenever a fresh turn selection opens, the commander reads the battle state,
//! plans a complete input sequence with [`plan_turn`] and replays it through
//! the runtime handle, exactly as a player pressing keys would.
use std::iter;

use battle_core::rules::{self, Effect};
use battle_core::{
    Ability, BattleEvent, BattleState, Combatant, CombatantId, PhaseKind, Polarity, Roster,
    SelectionInput, Side,
};
use runtime::{Event, RuntimeHandle, Topic};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use SelectionInput::{Confirm, Next};

/// Allies below this share of their maximum health get healed first.
const HEAL_BELOW: f32 = 0.5;

pub struct Commander {
    handle: RuntimeHandle,
}

impl Commander {
    pub fn new(handle: RuntimeHandle) -> Self {
        Self { handle }
    }

    /// Answers selections until the runtime shuts down.
    pub async fn run(self) {
        let mut selection_rx = self.handle.subscribe(Topic::Selection);
        loop {
            match selection_rx.recv().await {
                Ok(Event {
                    event:
                        BattleEvent::SelectionChanged {
                            combatant,
                            phase: PhaseKind::RootChoice,
                            cursor: 0,
                            ..
                        },
                    ..
                }) => self.command(combatant).await,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(target: "client::commander", skipped, "Selection events lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    async fn command(&self, combatant: CombatantId) {
        let state = match self.handle.query_state().await {
            Ok(state) => state,
            Err(error) => {
                warn!(target: "client::commander", %error, "State query failed");
                return;
            }
        };
        let fresh = state.selection.as_ref().is_some_and(|selection| {
            selection.combatant() == combatant && selection.phase().kind() == PhaseKind::RootChoice
        });
        if !fresh {
            return;
        }

        let inputs = plan_turn(&state, combatant);
        debug!(target: "client::commander", %combatant, ?inputs, "Planned turn");
        for input in inputs {
            if let Err(error) = self.handle.send_input(input).await {
                warn!(target: "client::commander", %combatant, %error, "Input refused");
                return;
            }
        }
    }
}

/// Plans the inputs that take `combatant` from a fresh root menu to a
/// committed action.
///
/// Heals the most wounded ally below half health if a healing spell is known.
/// Otherwise uses whichever attack, harmful spell or summon is expected to
/// deal the most damage to the weakest opponent.
pub fn plan_turn(state: &BattleState, combatant: CombatantId) -> Vec<SelectionInput> {
    let roster = &state.roster;
    let Some(caster) = roster.get(combatant) else {
        return Vec::new();
    };

    if let Some(inputs) = plan_heal(roster, caster) {
        return inputs;
    }

    let opponents = &roster.targetable()[roster.pool_bounds(Side::Opposing)];
    let Some((offset, target)) = opponents
        .iter()
        .enumerate()
        .filter_map(|(offset, id)| roster.get(*id).map(|target| (offset, target)))
        .min_by_key(|(_, target)| target.health.current)
    else {
        return vec![Confirm, Confirm];
    };

    let mut best = (expected_damage(caster, &Ability::BasicAttack, target), vec![Confirm]);
    let offensive_spells = caster
        .spells
        .iter()
        .enumerate()
        .filter(|(_, spell)| spell.polarity == Polarity::Debuff);
    for (index, spell) in offensive_spells {
        let damage = expected_damage(caster, &Ability::Spell(spell.clone()), target);
        if damage > best.0 {
            best = (damage, menu_path(1, index));
        }
    }
    for (index, summon) in caster.summons.iter().enumerate() {
        let damage = expected_damage(caster, &Ability::Summon(summon.clone()), target);
        if damage > best.0 {
            best = (damage, menu_path(3, index));
        }
    }

    let mut inputs = best.1;
    inputs.extend(iter::repeat_n(Next, offset));
    inputs.push(Confirm);
    inputs
}

fn plan_heal(roster: &Roster, caster: &Combatant) -> Option<Vec<SelectionInput>> {
    let spell_index = caster
        .spells
        .iter()
        .position(|spell| spell.polarity == Polarity::Buff)?;

    let allies = roster.party(caster.side);
    let (ally_index, _) = allies
        .iter()
        .enumerate()
        .filter(|(_, ally)| {
            ally.is_alive() && (ally.health.current as f32) < ally.health.maximum as f32 * HEAL_BELOW
        })
        .min_by_key(|(_, ally)| ally.health.current)?;
    let caster_index = allies.iter().position(|ally| ally.id == caster.id)?;

    // Buff targeting starts on the caster and wraps within the party.
    let steps = (ally_index + allies.len() - caster_index) % allies.len();
    let mut inputs = menu_path(1, spell_index);
    inputs.extend(iter::repeat_n(Next, steps));
    inputs.push(Confirm);
    Some(inputs)
}

/// Inputs that open root entry `root` and confirm ability `index` in it.
fn menu_path(root: usize, index: usize) -> Vec<SelectionInput> {
    let mut inputs: Vec<_> = iter::repeat_n(Next, root).collect();
    inputs.push(Confirm);
    inputs.extend(iter::repeat_n(Next, index));
    inputs.push(Confirm);
    inputs
}

fn expected_damage(caster: &Combatant, ability: &Ability, target: &Combatant) -> i32 {
    match rules::resolve(&caster.stats(), ability, &mut target.clone()) {
        Effect::Damage(amount) => amount,
        Effect::Heal(_) => 0,
    }
}
