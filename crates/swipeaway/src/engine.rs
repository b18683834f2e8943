//! Percent-driven transition engine
//!
//! Sequencing wrapper around an interactively scrubbed transition. The
//! engine computes nothing visual; it guarantees that `update` only happens
//! between `begin` and a resolution, and that a resolution happens once.

use tracing::{debug, trace};

/// Where the engine is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    /// Progress follows input
    Interactive,
    /// Playing forward to completion
    Finishing,
    /// Playing back to the start
    Cancelling,
}

/// Percent-driven transition
#[derive(Debug)]
pub struct PercentDrivenTransition {
    state: EngineState,
    progress: f32,
    duration_ms: u32,
}

impl PercentDrivenTransition {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            state: EngineState::Idle,
            progress: 0.0,
            duration_ms,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Current progress in 0.0..=1.0
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Full-length playback duration
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Start a transition at progress zero; `false` if one is already running
    pub fn begin(&mut self) -> bool {
        if self.state != EngineState::Idle {
            trace!("engine: begin ignored in {:?}", self.state);
            return false;
        }
        self.state = EngineState::Interactive;
        self.progress = 0.0;
        debug!("engine: began");
        true
    }

    /// Scrub to `progress`; ignored outside the interactive phase
    pub fn update(&mut self, progress: f32) -> bool {
        if self.state != EngineState::Interactive {
            trace!("engine: update ignored in {:?}", self.state);
            return false;
        }
        self.progress = progress.clamp(0.0, 1.0);
        true
    }

    /// Play forward to the end; a second call is a no-op returning `false`
    pub fn finish(&mut self) -> bool {
        self.resolve(EngineState::Finishing)
    }

    /// Play back to the start; a second call is a no-op returning `false`
    pub fn cancel(&mut self) -> bool {
        self.resolve(EngineState::Cancelling)
    }

    fn resolve(&mut self, to: EngineState) -> bool {
        if self.state != EngineState::Interactive {
            trace!("engine: {:?} ignored in {:?}", to, self.state);
            return false;
        }
        debug!("engine: {:?} from progress {:.3}", to, self.progress);
        self.state = to;
        true
    }

    /// Time left to play after a resolution, proportional to the distance
    /// still to cover
    pub fn remaining_ms(&self) -> u32 {
        let share = match self.state {
            EngineState::Finishing => 1.0 - self.progress,
            EngineState::Cancelling => self.progress,
            EngineState::Idle | EngineState::Interactive => 0.0,
        };
        (self.duration_ms as f32 * share).round() as u32
    }

    /// Playback done; back to idle. `reached_end` is `false` when a
    /// finishing playback was cut short.
    pub fn complete(&mut self, reached_end: bool) {
        if self.state == EngineState::Finishing && reached_end {
            self.progress = 1.0;
        } else {
            self.progress = 0.0;
        }
        self.state = EngineState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_requires_begin() {
        let mut engine = PercentDrivenTransition::new(400);
        assert!(!engine.update(0.5));
        assert_eq!(engine.progress(), 0.0);

        assert!(engine.begin());
        assert!(engine.update(0.5));
        assert_eq!(engine.progress(), 0.5);
    }

    #[test]
    fn test_update_clamps() {
        let mut engine = PercentDrivenTransition::new(400);
        engine.begin();
        engine.update(1.7);
        assert_eq!(engine.progress(), 1.0);
        engine.update(-0.2);
        assert_eq!(engine.progress(), 0.0);
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut engine = PercentDrivenTransition::new(400);
        engine.begin();
        engine.update(0.25);

        assert!(engine.finish());
        let once = (engine.state(), engine.progress(), engine.remaining_ms());
        assert!(!engine.finish());
        assert!(!engine.cancel());
        assert_eq!((engine.state(), engine.progress(), engine.remaining_ms()), once);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut engine = PercentDrivenTransition::new(400);
        engine.begin();
        engine.update(0.5);

        assert!(engine.cancel());
        assert!(!engine.cancel());
        assert!(!engine.finish());
        assert_eq!(engine.state(), EngineState::Cancelling);
    }

    #[test]
    fn test_no_update_after_resolution() {
        let mut engine = PercentDrivenTransition::new(400);
        engine.begin();
        engine.update(0.3);
        engine.cancel();

        assert!(!engine.update(0.9));
        assert_eq!(engine.progress(), 0.3);
    }

    #[test]
    fn test_remaining_duration() {
        let mut engine = PercentDrivenTransition::new(400);
        engine.begin();
        engine.update(0.25);
        engine.finish();
        assert_eq!(engine.remaining_ms(), 300);

        let mut engine = PercentDrivenTransition::new(400);
        engine.begin();
        engine.update(0.25);
        engine.cancel();
        assert_eq!(engine.remaining_ms(), 100);
    }

    #[test]
    fn test_begin_rejected_until_complete() {
        let mut engine = PercentDrivenTransition::new(400);
        engine.begin();
        assert!(!engine.begin());
        engine.finish();
        assert!(!engine.begin());

        engine.complete(true);
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.progress(), 1.0);
        assert!(engine.begin());
    }

    #[test]
    fn test_cut_short_finish_lands_at_start() {
        let mut engine = PercentDrivenTransition::new(400);
        engine.begin();
        engine.update(0.6);
        engine.finish();

        engine.complete(false);
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.progress(), 0.0);
    }
}
