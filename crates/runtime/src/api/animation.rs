//! Asynchronous abstraction for playing action animations.
//!
//! The engine pauses an action between requesting its animation and applying
//! its effect. Runtime users plug in an [`AnimationDriver`] that decides how
//! long that pause lasts: a renderer, a fixed delay, or nothing at all.
use std::time::Duration;

use async_trait::async_trait;
use battle_core::AnimationRequest;

/// Plays the animation for one action and returns once it has finished.
#[async_trait]
pub trait AnimationDriver: Send + Sync {
    async fn play(&self, request: &AnimationRequest);
}

/// Completes every animation immediately. Useful for headless runs and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstantAnimation;

#[async_trait]
impl AnimationDriver for InstantAnimation {
    async fn play(&self, _request: &AnimationRequest) {}
}

/// Sleeps for the ability's duration hint, or `base` when it has none.
#[derive(Clone, Copy, Debug)]
pub struct TimedAnimation {
    base: Duration,
    time_scale: f32,
}

impl TimedAnimation {
    pub fn new(base: Duration) -> Self {
        Self {
            base,
            time_scale: 1.0,
        }
    }

    /// Divides every delay by `time_scale`. Values below or equal to zero are
    /// ignored.
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        if time_scale > 0.0 {
            self.time_scale = time_scale;
        }
        self
    }

    pub fn delay_for(&self, request: &AnimationRequest) -> Duration {
        let delay = request
            .duration_hint()
            .and_then(|secs| Duration::try_from_secs_f32(secs).ok())
            .unwrap_or(self.base);
        delay.div_f32(self.time_scale)
    }
}

#[async_trait]
impl AnimationDriver for TimedAnimation {
    async fn play(&self, request: &AnimationRequest) {
        tokio::time::sleep(self.delay_for(request)).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use battle_core::{Ability, CombatantId, Summon};

    use super::*;

    fn request(ability: Ability) -> AnimationRequest {
        AnimationRequest {
            attacker: CombatantId(0),
            target: CombatantId(1),
            ability,
        }
    }

    #[test]
    fn summons_use_their_duration() {
        let driver = TimedAnimation::new(Duration::from_millis(500));
        let summon = Ability::Summon(Arc::new(Summon::new("Shiva", 50).with_duration(2.0)));

        assert_eq!(driver.delay_for(&request(Ability::BasicAttack)), Duration::from_millis(500));
        assert_eq!(driver.delay_for(&request(summon)), Duration::from_secs(2));
    }

    #[test]
    fn time_scale_shortens_delays() {
        let driver = TimedAnimation::new(Duration::from_secs(1)).with_time_scale(4.0);
        assert_eq!(driver.delay_for(&request(Ability::BasicAttack)), Duration::from_millis(250));
    }

    #[test]
    fn unrepresentable_durations_fall_back_to_base() {
        let driver = TimedAnimation::new(Duration::from_millis(500));
        for secs in [f32::INFINITY, 1.0e30] {
            let summon = Ability::Summon(Arc::new(Summon::new("Bahamut", 90).with_duration(secs)));
            assert_eq!(driver.delay_for(&request(summon)), Duration::from_millis(500));
        }
    }
}
