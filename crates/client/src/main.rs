//! Headless battle client binary.
//!
//! Loads a roster, starts the battle runtime and lets the [`Commander`] play
//! the controllable party while the [`Presenter`] reports what happens.
//!
//! # Examples
//!
//! ```bash
//! # Built-in roster, readable log on stderr
//! cargo run -p battle-client
//!
//! # Custom roster, twice as fast, events as JSON lines
//! BATTLE_ROSTER=party.ron BATTLE_TIME_SCALE=2 BATTLE_EVENT_FORMAT=json cargo run -p battle-client
//! ```

use std::time::Duration;

use anyhow::Result;
use battle_client::{AnimationMode, ClientConfig, Commander, Presenter, builtin_roster, load_roster};
use runtime::{InstantAnimation, Runtime, TimedAnimation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// How long the presenter may keep draining events once the clock stops.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let env_filter =
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env();
    let roster = match &config.roster_path {
        Some(path) => load_roster(path)?,
        None => builtin_roster()?,
    };
    tracing::info!(
        allies = roster.controllable().len(),
        enemies = roster.opposing().len(),
        animation = %config.animation,
        "Starting battle"
    );

    let builder = Runtime::builder()
        .config(config.runtime_config())
        .roster(roster);
    let builder = match config.animation {
        AnimationMode::Instant => builder.animation(InstantAnimation),
        AnimationMode::Timed => builder.animation(
            TimedAnimation::new(config.animation_delay).with_time_scale(config.time_scale),
        ),
    };
    let runtime = builder.build().await?;

    let handle = runtime.handle();
    let presenter = Presenter::new(&handle, config.event_format).await?;
    let presenter = tokio::spawn(presenter.run());
    let commander = tokio::spawn(Commander::new(handle.clone()).run());

    let status = runtime.run_clock(config.max_ticks).await?;
    tracing::info!(%status, "Clock stopped");

    if status.is_finished() {
        match tokio::time::timeout(DRAIN_TIMEOUT, presenter).await {
            Ok(Ok(_)) => {}
            Ok(Err(error)) => tracing::warn!(%error, "Presenter task failed"),
            Err(_) => tracing::warn!("Presenter did not see the outcome in time"),
        }
    } else {
        presenter.abort();
    }
    commander.abort();
    let _ = commander.await;
    drop(handle);

    runtime.shutdown().await?;
    tracing::info!("Client shutdown complete");
    Ok(())
}
