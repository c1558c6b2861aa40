/// Battle configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleConfig {
    /// Readiness a combatant must reach before it may be given a command.
    pub ready_threshold: f32,
    /// Rows per column in grid menus. Left/right steps jump by this amount.
    pub menu_rows: usize,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_PARTY_SIZE: usize = 8;

    // ===== rule engine bounds =====
    /// Upper clamp applied to attack and debuff damage.
    pub const DAMAGE_CAP: i32 = 9999;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_READY_THRESHOLD: f32 = 100.0;
    pub const DEFAULT_MENU_ROWS: usize = 1;

    pub fn new() -> Self {
        Self {
            ready_threshold: Self::DEFAULT_READY_THRESHOLD,
            menu_rows: Self::DEFAULT_MENU_ROWS,
        }
    }

    pub fn with_ready_threshold(mut self, ready_threshold: f32) -> Self {
        self.ready_threshold = ready_threshold;
        self
    }

    pub fn with_menu_rows(mut self, menu_rows: usize) -> Self {
        self.menu_rows = menu_rows.max(1);
        self
    }

    /// Converts a raw readiness value into a percentage of the threshold.
    pub fn readiness_percentage(&self, readiness: f32) -> f32 {
        if self.ready_threshold <= 0.0 {
            return 100.0;
        }
        readiness / self.ready_threshold * 100.0
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
