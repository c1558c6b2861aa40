//! Client configuration loaded from the environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use battle_core::BattleConfig;
use runtime::RuntimeConfig;

/// How action animations are paced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AnimationMode {
    /// Effects land on the next worker turn.
    Instant,
    /// Effects land after a fixed delay or the summon's duration.
    #[default]
    Timed,
}

/// How bus events are written out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EventFormat {
    /// Human-readable lines through `tracing`.
    #[default]
    Text,
    /// One JSON object per event on stdout.
    Json,
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub tick_interval: Duration,
    pub time_scale: f32,
    pub roster_path: Option<PathBuf>,
    pub animation: AnimationMode,
    pub animation_delay: Duration,
    pub max_ticks: Option<u64>,
    pub event_format: EventFormat,
    pub menu_rows: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(50),
            time_scale: 1.0,
            roster_path: None,
            animation: AnimationMode::default(),
            animation_delay: Duration::from_millis(400),
            max_ticks: None,
            event_format: EventFormat::default(),
            menu_rows: BattleConfig::DEFAULT_MENU_ROWS,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_TICK_MS` - Milliseconds between clock ticks (default: 50)
    /// - `BATTLE_TIME_SCALE` - Battle seconds per real second (default: 1.0)
    /// - `BATTLE_ROSTER` - Path to a RON roster file (default: built-in roster)
    /// - `BATTLE_ANIMATION` - `instant` or `timed` (default: timed)
    /// - `BATTLE_ANIMATION_MS` - Delay for timed animations (default: 400)
    /// - `BATTLE_MAX_TICKS` - Stop the clock after this many ticks (default: unlimited)
    /// - `BATTLE_EVENT_FORMAT` - `text` or `json` (default: text)
    /// - `BATTLE_MENU_ROWS` - Rows per grid menu column (default: 1)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("BATTLE_TICK_MS") {
            config.tick_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(scale) = read_env::<f32>("BATTLE_TIME_SCALE")
            && scale > 0.0
        {
            config.time_scale = scale;
        }
        config.roster_path = env::var("BATTLE_ROSTER").ok().map(PathBuf::from);
        if let Some(mode) = read_env::<AnimationMode>("BATTLE_ANIMATION") {
            config.animation = mode;
        }
        if let Some(ms) = read_env::<u64>("BATTLE_ANIMATION_MS") {
            config.animation_delay = Duration::from_millis(ms);
        }
        config.max_ticks = read_env::<u64>("BATTLE_MAX_TICKS");
        if let Some(format) = read_env::<EventFormat>("BATTLE_EVENT_FORMAT") {
            config.event_format = format;
        }
        if let Some(rows) = read_env::<usize>("BATTLE_MENU_ROWS") {
            config.menu_rows = rows.max(1);
        }

        config
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            battle: BattleConfig::default().with_menu_rows(self.menu_rows),
            tick_interval: self.tick_interval,
            time_scale: self.time_scale,
            ..RuntimeConfig::default()
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
