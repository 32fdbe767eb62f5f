use bevy::prelude::*;
use std::time::Duration;

/// Restartable one-shot shield timer. Arming while already armed restarts the
/// countdown from the full duration; it never accumulates.
#[derive(Debug, Clone)]
pub struct Invincibility {
    duration: Duration,
    timer: Option<Timer>,
}

impl Invincibility {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            timer: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    /// Takes effect at the next `arm`.
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    pub fn arm(&mut self) {
        self.timer = Some(Timer::new(self.duration, TimerMode::Once));
    }

    pub fn cancel(&mut self) {
        self.timer = None;
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.timer.as_ref().map(Timer::remaining)
    }

    /// Advances the countdown. Returns `true` on exactly the tick that ends the shield.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        if timer.tick(delta).finished() {
            self.timer = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_S: Duration = Duration::from_millis(5000);

    #[test]
    fn inactive_by_default() {
        let mut inv = Invincibility::new(FIVE_S);
        assert!(!inv.is_active());
        assert!(!inv.tick(Duration::from_secs(60)));
    }

    #[test]
    fn expires_exactly_at_duration() {
        let mut inv = Invincibility::new(FIVE_S);
        inv.arm();
        assert!(inv.is_active());
        assert!(!inv.tick(Duration::from_millis(4999)));
        assert!(inv.is_active());
        assert!(inv.tick(Duration::from_millis(1)));
        assert!(!inv.is_active());
        // Expiry is reported once.
        assert!(!inv.tick(Duration::from_millis(1)));
    }

    #[test]
    fn rearm_restarts_instead_of_stacking() {
        let mut inv = Invincibility::new(FIVE_S);
        inv.arm();
        assert!(!inv.tick(Duration::from_millis(3000)));
        inv.arm();
        assert_eq!(inv.remaining(), Some(FIVE_S));
        // 3000 + 4999 ms after the first pickup: still shielded by the second.
        assert!(!inv.tick(Duration::from_millis(4999)));
        assert!(inv.is_active());
        assert!(inv.tick(Duration::from_millis(1)));
        // An additive timer would still be running here.
        assert!(!inv.is_active());
    }

    #[test]
    fn cancel_suppresses_expiry() {
        let mut inv = Invincibility::new(FIVE_S);
        inv.arm();
        inv.cancel();
        assert!(!inv.tick(FIVE_S));
    }
}
