//! End-to-end battles driven through the async runtime.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use battle_core::{
    Ability, Action, AnimationRequest, AudioSink, BattleConfig, BattleEvent, BattleStatus,
    CombatantId, CombatantTemplate, EngineError, PhaseKind, Roster, SelectionInput, SoundCue,
    Summon,
};
use runtime::{AnimationDriver, Runtime, RuntimeConfig, RuntimeError, TimedAnimation, Topic};
use tokio::sync::broadcast::error::TryRecvError;
use tokio::time::timeout;

#[derive(Clone, Default)]
struct SharedAudio(Arc<Mutex<Vec<SoundCue>>>);

impl AudioSink for SharedAudio {
    fn play(&self, cue: SoundCue) {
        self.0.lock().unwrap().push(cue);
    }
}

fn duel_roster() -> Roster {
    let hero = CombatantTemplate::new("Hero", 100, 40, 5, 50);
    let slime = CombatantTemplate::new("Slime", 60, 5, 0, 1);
    Roster::from_templates(&[hero], &[slime]).expect("valid roster")
}

fn fast_config() -> RuntimeConfig {
    RuntimeConfig {
        battle: BattleConfig::default(),
        tick_interval: Duration::from_millis(1),
        time_scale: 1000.0,
        ..RuntimeConfig::default()
    }
}

#[tokio::test]
async fn scripted_commander_wins_on_the_clock() {
    let audio = SharedAudio::default();
    let runtime = Runtime::builder()
        .config(fast_config())
        .roster(duel_roster())
        .audio(audio.clone())
        .build()
        .await
        .expect("runtime builds");

    let handle = runtime.handle();
    let mut selection_rx = handle.subscribe(Topic::Selection);
    let mut outcome_rx = handle.subscribe(Topic::Outcome);

    // Confirms every menu it is shown: Attack, then the first target.
    let commander = tokio::spawn({
        let handle = handle.clone();
        async move {
            while let Ok(event) = selection_rx.recv().await {
                if let BattleEvent::SelectionChanged { phase, .. } = event.event
                    && matches!(phase, PhaseKind::RootChoice | PhaseKind::TargetPick)
                    && handle.send_input(SelectionInput::Confirm).await.is_err()
                {
                    break;
                }
            }
        }
    });

    let status = timeout(Duration::from_secs(5), runtime.run_clock(Some(10_000)))
        .await
        .expect("battle finishes in time")
        .expect("clock runs");
    assert_eq!(status, BattleStatus::Won);

    let outcome = outcome_rx.recv().await.expect("outcome published");
    assert_eq!(outcome.event, BattleEvent::BattleWon);

    let state = handle.query_state().await.expect("state");
    assert!(state.roster.opposing().iter().all(|slime| !slime.is_alive()));
    assert_eq!(audio.0.lock().unwrap().last(), Some(&SoundCue::WinFanfare));

    commander.abort();
    drop(handle);
    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn effect_waits_for_manual_animation_completion() {
    let runtime = Runtime::builder()
        .roster(duel_roster())
        .manual_animation()
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();
    let mut combat_rx = handle.subscribe(Topic::Combat);

    // Hero speed 50 reaches the threshold in two seconds.
    handle.advance(1.0).await.unwrap();
    handle.advance(1.0).await.unwrap();
    handle.send_input(SelectionInput::Confirm).await.unwrap();
    handle.send_input(SelectionInput::Confirm).await.unwrap();

    let queued = combat_rx.recv().await.unwrap();
    assert!(matches!(queued.event, BattleEvent::ActionQueued { .. }));

    handle.advance(0.0).await.unwrap();
    let requested = combat_rx.recv().await.unwrap();
    assert!(matches!(requested.event, BattleEvent::AnimationRequested { .. }));

    // Any number of ticks pass without the effect landing.
    for _ in 0..5 {
        handle.advance(0.5).await.unwrap();
    }
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.roster.opposing()[0].health.current, 60);
    assert!(matches!(combat_rx.try_recv(), Err(TryRecvError::Empty)));

    handle.complete_animation().await.unwrap();
    let dealt = combat_rx.recv().await.unwrap();
    assert!(matches!(
        dealt.event,
        BattleEvent::DamageDealt { amount: 40, .. }
    ));
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.roster.opposing()[0].health.current, 20);

    let err = handle.complete_animation().await.unwrap_err();
    assert!(matches!(
        err.as_engine(),
        Some(EngineError::NoAnimationPending)
    ));

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn timed_driver_completes_summons() {
    let ifrit = Arc::new(Summon::new("Ifrit", 80).with_duration(0.01));
    let caller = CombatantTemplate::new("Caller", 100, 5, 5, 10)
        .with_initial_readiness(100.0)
        .with_summon(ifrit.clone());
    let slime = CombatantTemplate::new("Slime", 60, 5, 0, 1);
    let roster = Roster::from_templates(&[caller], &[slime]).unwrap();

    let runtime = Runtime::builder()
        .roster(roster)
        .animation(TimedAnimation::new(Duration::from_millis(5)))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut outcome_rx = handle.subscribe(Topic::Outcome);

    handle
        .submit_action(Action::new(
            CombatantId(0),
            Ability::Summon(ifrit),
            CombatantId(1),
        ))
        .await
        .unwrap();
    handle.advance(0.0).await.unwrap();

    let outcome = timeout(Duration::from_secs(2), outcome_rx.recv())
        .await
        .expect("driver signals completion")
        .unwrap();
    assert_eq!(outcome.event, BattleEvent::BattleWon);

    let err = handle.advance(0.1).await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Engine(EngineError::BattleFinished(BattleStatus::Won))
    ));

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn clock_returns_outcome_reached_between_ticks() {
    let ifrit = Arc::new(Summon::new("Ifrit", 80).with_duration(0.02));
    let caller = CombatantTemplate::new("Caller", 100, 5, 5, 1).with_summon(ifrit.clone());
    let slime = CombatantTemplate::new("Slime", 60, 5, 0, 1);
    let roster = Roster::from_templates(&[caller], &[slime]).unwrap();

    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            tick_interval: Duration::from_millis(1),
            ..RuntimeConfig::default()
        })
        .roster(roster)
        .animation(TimedAnimation::new(Duration::from_millis(5)))
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    handle
        .submit_action(Action::new(CombatantId(0), Ability::Summon(ifrit), CombatantId(1)))
        .await
        .unwrap();

    // The summon lands from the driver task, never from an `advance` call.
    let status = timeout(Duration::from_secs(2), runtime.run_clock(None))
        .await
        .expect("clock stops")
        .expect("finished battle is not an error");
    assert_eq!(status, BattleStatus::Won);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

/// Finishes the first attacker's animations after a short delay and never
/// finishes anyone else's.
struct FirstAttackerOnly;

#[async_trait]
impl AnimationDriver for FirstAttackerOnly {
    async fn play(&self, request: &AnimationRequest) {
        if request.attacker == CombatantId(0) {
            tokio::time::sleep(Duration::from_millis(50)).await;
        } else {
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::test]
async fn late_driver_signal_does_not_resolve_the_next_action() {
    let a = CombatantTemplate::new("A", 100, 30, 5, 1);
    let b = CombatantTemplate::new("B", 100, 30, 5, 1);
    let boss = CombatantTemplate::new("Boss", 500, 5, 0, 1);
    let roster = Roster::from_templates(&[a, b], &[boss]).unwrap();

    let runtime = Runtime::builder()
        .roster(roster)
        .animation(FirstAttackerOnly)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    handle.submit_action(Action::attack(CombatantId(0), CombatantId(2))).await.unwrap();
    handle.submit_action(Action::attack(CombatantId(1), CombatantId(2))).await.unwrap();
    handle.advance(0.0).await.unwrap();

    // Resolve A by hand before its driver reports back, then put B in flight.
    handle.complete_animation().await.unwrap();
    handle.advance(0.0).await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;

    let state = handle.query_state().await.unwrap();
    assert_eq!(state.roster.opposing()[0].health.current, 470);
    let in_flight = state.in_flight.expect("B still animating");
    assert_eq!(in_flight.action.attacker, CombatantId(1));
    assert!(state.roster.get(CombatantId(1)).unwrap().busy);

    handle.complete_animation().await.unwrap();
    let state = handle.query_state().await.unwrap();
    assert_eq!(state.roster.opposing()[0].health.current, 440);

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn input_without_ready_combatant_is_rejected() {
    let runtime = Runtime::builder()
        .roster(duel_roster())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    let err = handle.send_input(SelectionInput::Confirm).await.unwrap_err();
    assert!(matches!(err.as_engine(), Some(EngineError::NoActiveTurn)));

    drop(handle);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn builder_requires_roster() {
    let result = Runtime::builder().build().await;
    assert!(matches!(result, Err(RuntimeError::MissingRoster)));
}
