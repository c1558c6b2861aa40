use super::SelectionInput;

/// Entries of the root command menu, in display order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumCount, strum::FromRepr,
)]
#[repr(usize)]
pub enum RootCommand {
    Attack = 0,
    Magic = 1,
    Skill = 2,
    Summon = 3,
    Item = 4,
    Flee = 5,
}

impl RootCommand {
    pub const fn info_text(self) -> &'static str {
        match self {
            Self::Attack => "Attack a target.",
            Self::Magic => "Choose a spell.",
            Self::Skill => "Choose a skill.",
            Self::Summon => "Summon a Bestia.",
            Self::Item => "Choose an item from the inventory.",
            Self::Flee => "Flee from the battle.",
        }
    }
}

/// Cursor over a grid menu laid out column by column.
///
/// Previous/next move by one entry, left/right jump a whole column of
/// `rows` entries. Movement wraps around both ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuCursor {
    index: usize,
}

impl MenuCursor {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Moves the cursor. Returns true if the highlighted entry changed.
    pub fn navigate(&mut self, input: SelectionInput, len: usize, rows: usize) -> bool {
        if len == 0 {
            return false;
        }
        let rows = rows.max(1) as isize;
        let delta = match input {
            SelectionInput::Previous => -1,
            SelectionInput::Next => 1,
            SelectionInput::Left => -rows,
            SelectionInput::Right => rows,
            SelectionInput::Confirm | SelectionInput::Cancel => return false,
        };
        let next = (self.index as isize + delta).rem_euclid(len as isize) as usize;
        let moved = next != self.index;
        self.index = next;
        moved
    }
}
