//! Gesture state machine
//!
//! Turns raw drag and press samples into dismiss decisions:
//!
//! ```text
//! Idle ──admission──▶ Armed ──changed──▶ Tracking ──release──▶ Committing ─┐
//!   ▲                   │                   │                                │
//!   │                   └──────release──────┴──▶ Reverting ──────────────────┤
//!   └──────────────────────────── settle ◀───────────────────────────────────┘
//! ```
//!
//! The machine itself never touches the engine, the scroll view or the host.
//! It returns a [`GestureAction`] and the controller carries it out. Samples
//! that do not fit the current state are dropped.

use swipeaway_core::{GesturePhase, GestureSample, Point, PressPhase};
use tracing::{debug, trace};

use crate::config::DismissConfig;

/// A live dismiss attempt
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DismissAttempt {
    /// Drag translation at arming time; progress is measured from here
    pub origin: Point,
    pub progress: f32,
}

/// Interaction state. At most one attempt exists, and only while armed or
/// tracking.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureState {
    Idle,
    Armed(DismissAttempt),
    Tracking(DismissAttempt),
    /// Resolved toward dismissal, waiting for playback to finish
    Committing,
    /// Resolved toward the start, waiting for playback to finish
    Reverting,
}

/// Payload-free mirror of [`GestureState`], used for history
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StateKind {
    Idle,
    Armed,
    Tracking,
    Committing,
    Reverting,
}

impl GestureState {
    pub fn kind(&self) -> StateKind {
        match self {
            GestureState::Idle => StateKind::Idle,
            GestureState::Armed(_) => StateKind::Armed,
            GestureState::Tracking(_) => StateKind::Tracking,
            GestureState::Committing => StateKind::Committing,
            GestureState::Reverting => StateKind::Reverting,
        }
    }

    pub fn attempt(&self) -> Option<&DismissAttempt> {
        match self {
            GestureState::Armed(attempt) | GestureState::Tracking(attempt) => Some(attempt),
            _ => None,
        }
    }
}

/// Why an attempt was resolved
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveCause {
    /// The drag ended or was cancelled by the platform
    Release,
    /// The drag came back to its origin
    ReturnedToOrigin,
    /// The host called for it
    Forced,
}

/// What the controller should do after a sample
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureAction {
    None,
    /// Admission passed; start the transition
    Arm { origin: Point },
    /// Scrub the transition
    Update { progress: f32 },
    /// Finish (`commit`) or cancel the transition
    Resolve {
        commit: bool,
        progress: f32,
        cause: ResolveCause,
    },
}

/// Numbers the machine decides with
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureThresholds {
    pub admission_min_velocity: f32,
    pub completion_threshold: f32,
    pub flick_velocity: f32,
    pub flick_min_distance: f32,
}

impl From<&DismissConfig> for GestureThresholds {
    fn from(config: &DismissConfig) -> Self {
        Self {
            admission_min_velocity: config.admission_min_velocity,
            completion_threshold: config.completion_threshold,
            flick_velocity: config.flick_velocity,
            flick_min_distance: config.flick_min_distance,
        }
    }
}

/// `(translation_y - origin_y) / max(1, container_height)`, clamped to 0..=1
pub fn progress_for(translation_y: f32, origin_y: f32, container_height: f32) -> f32 {
    ((translation_y - origin_y) / container_height.max(1.0)).clamp(0.0, 1.0)
}

/// Release rule. The threshold branch and the flick branch are independent.
pub fn should_commit(
    phase: GesturePhase,
    progress: f32,
    velocity_y: f32,
    travel_y: f32,
    thresholds: &GestureThresholds,
) -> bool {
    if phase == GesturePhase::Cancelled {
        return false;
    }
    let past_threshold = progress >= thresholds.completion_threshold && velocity_y >= 0.0;
    let flicked = velocity_y >= thresholds.flick_velocity && travel_y >= thresholds.flick_min_distance;
    past_threshold || flicked
}

/// Drag/press interpreter
pub struct GestureStateMachine {
    state: GestureState,
    thresholds: GestureThresholds,
    /// A `Began` was seen and no release since
    drag_active: bool,
    pointer_down: bool,
    translation: Point,
    /// History of state transitions (for debugging)
    history: Vec<(StateKind, StateKind)>,
}

impl GestureStateMachine {
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self {
            state: GestureState::Idle,
            thresholds,
            drag_active: false,
            pointer_down: false,
            translation: Point::ZERO,
            history: Vec::new(),
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == GestureState::Idle
    }

    /// Progress of the live attempt, zero when none
    pub fn progress(&self) -> f32 {
        self.state.attempt().map_or(0.0, |a| a.progress)
    }

    /// Get transition history
    pub fn history(&self) -> &[(StateKind, StateKind)] {
        &self.history
    }

    /// Pointer is down but the drag has not moved it yet
    pub fn pointer_down_without_movement(&self) -> bool {
        self.pointer_down && self.translation == Point::ZERO
    }

    /// Vertical translation of the drag in progress, zero when none
    pub fn drag_translation_y(&self) -> f32 {
        if self.drag_active {
            self.translation.y
        } else {
            0.0
        }
    }

    /// A committed transition is playing out
    pub fn dismissal_in_flight(&self) -> bool {
        self.state == GestureState::Committing
    }

    fn transition(&mut self, to: GestureState) {
        let from = self.state.kind();
        if from != to.kind() {
            debug!("gesture: {:?} -> {:?}", from, to.kind());
            self.history.push((from, to.kind()));
        }
        self.state = to;
    }

    fn velocity_admits(&self, velocity: Point) -> bool {
        velocity.y > self.thresholds.admission_min_velocity && velocity.y.abs() > velocity.x.abs()
    }

    /// Track the zero-duration press recognizer
    pub fn on_press(&mut self, phase: PressPhase) {
        self.pointer_down = phase.is_down();
    }

    /// Feed one drag sample.
    ///
    /// `admit` is consulted only while idle and only after the velocity check
    /// passed; it covers the policy half of admission.
    pub fn on_drag(
        &mut self,
        sample: &GestureSample,
        container_height: f32,
        admit: impl FnOnce(&GestureSample) -> bool,
    ) -> GestureAction {
        if sample.phase == GesturePhase::Began {
            self.drag_active = true;
        } else if !self.drag_active {
            trace!("gesture: {:?} without a began, ignored", sample.phase);
            return GestureAction::None;
        }
        self.translation = sample.translation;

        if sample.phase.is_release() {
            self.drag_active = false;
            self.translation = Point::ZERO;
            return self.release(sample, container_height);
        }

        match self.state {
            GestureState::Idle => {
                if self.velocity_admits(sample.velocity) && admit(sample) {
                    let origin = sample.translation;
                    self.transition(GestureState::Armed(DismissAttempt {
                        origin,
                        progress: 0.0,
                    }));
                    GestureAction::Arm { origin }
                } else {
                    GestureAction::None
                }
            }
            GestureState::Armed(attempt) | GestureState::Tracking(attempt) => {
                if sample.phase == GesturePhase::Began {
                    return GestureAction::None;
                }
                let progress = progress_for(sample.translation.y, attempt.origin.y, container_height);
                if progress == 0.0 {
                    self.transition(GestureState::Reverting);
                    return GestureAction::Resolve {
                        commit: false,
                        progress,
                        cause: ResolveCause::ReturnedToOrigin,
                    };
                }
                self.transition(GestureState::Tracking(DismissAttempt {
                    origin: attempt.origin,
                    progress,
                }));
                GestureAction::Update { progress }
            }
            GestureState::Committing | GestureState::Reverting => GestureAction::None,
        }
    }

    fn release(&mut self, sample: &GestureSample, container_height: f32) -> GestureAction {
        let Some(attempt) = self.state.attempt().copied() else {
            return GestureAction::None;
        };
        let progress = progress_for(sample.translation.y, attempt.origin.y, container_height);
        let travel = sample.translation.y - attempt.origin.y;
        let commit = should_commit(
            sample.phase,
            progress,
            sample.velocity.y,
            travel,
            &self.thresholds,
        );
        debug!(
            "gesture: release at progress {:.3}, velocity {:.1}, travel {:.1} -> commit: {}",
            progress, sample.velocity.y, travel, commit
        );
        self.transition(if commit {
            GestureState::Committing
        } else {
            GestureState::Reverting
        });
        GestureAction::Resolve {
            commit,
            progress,
            cause: ResolveCause::Release,
        }
    }

    /// Resolve a live attempt as a revert regardless of input
    pub fn force_revert(&mut self) -> GestureAction {
        let Some(attempt) = self.state.attempt().copied() else {
            return GestureAction::None;
        };
        self.transition(GestureState::Reverting);
        GestureAction::Resolve {
            commit: false,
            progress: attempt.progress,
            cause: ResolveCause::Forced,
        }
    }

    /// Enter `Committing` without a drag; `false` unless idle
    pub fn begin_programmatic(&mut self) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.transition(GestureState::Committing);
        true
    }

    /// Playback finished; accept new attempts again
    pub fn settle(&mut self) {
        if matches!(self.state, GestureState::Committing | GestureState::Reverting) {
            self.transition(GestureState::Idle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEIGHT: f32 = 800.0;

    fn machine() -> GestureStateMachine {
        GestureStateMachine::new(GestureThresholds::from(&DismissConfig::default()))
    }

    fn vel(vy: f32) -> Point {
        Point::new(0.0, vy)
    }

    fn armed_machine() -> GestureStateMachine {
        let mut fsm = machine();
        let action = fsm.on_drag(
            &GestureSample::began(Point::ZERO, vel(400.0)),
            HEIGHT,
            |_| true,
        );
        assert_eq!(action, GestureAction::Arm { origin: Point::ZERO });
        fsm
    }

    #[test]
    fn test_progress_formula() {
        assert_eq!(progress_for(100.0, 0.0, 800.0), 0.125);
        assert_eq!(progress_for(-50.0, 0.0, 800.0), 0.0);
        assert_eq!(progress_for(2000.0, 0.0, 800.0), 1.0);
        assert_eq!(progress_for(10.0, 0.0, 0.0), 1.0);
        assert_eq!(progress_for(150.0, 50.0, 400.0), 0.25);
    }

    #[test]
    fn test_progress_monotone_under_monotone_drag() {
        let mut fsm = armed_machine();
        let mut last = 0.0;
        for step in 1..=120 {
            let y = step as f32 * 9.0;
            if let GestureAction::Update { progress } =
                fsm.on_drag(&GestureSample::changed(Point::new(0.0, y), vel(300.0)), HEIGHT, |_| true)
            {
                assert!(progress >= last);
                assert!((0.0..=1.0).contains(&progress));
                last = progress;
            } else {
                panic!("expected an update at step {}", step);
            }
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_returning_to_origin_reverts_immediately() {
        let mut fsm = armed_machine();
        let action = fsm.on_drag(
            &GestureSample::changed(Point::new(0.0, 100.0), vel(200.0)),
            HEIGHT,
            |_| true,
        );
        assert_eq!(action, GestureAction::Update { progress: 0.125 });

        let action = fsm.on_drag(
            &GestureSample::changed(Point::ZERO, vel(-200.0)),
            HEIGHT,
            |_| true,
        );
        assert_eq!(
            action,
            GestureAction::Resolve {
                commit: false,
                progress: 0.0,
                cause: ResolveCause::ReturnedToOrigin,
            }
        );
        assert_eq!(fsm.state().kind(), StateKind::Reverting);

        // The release that follows has nothing left to resolve
        let action = fsm.on_drag(
            &GestureSample::ended(Point::ZERO, Point::ZERO),
            HEIGHT,
            |_| true,
        );
        assert_eq!(action, GestureAction::None);
    }

    #[test]
    fn test_flick_commits_below_threshold() {
        let mut fsm = armed_machine();
        fsm.on_drag(&GestureSample::changed(Point::new(0.0, 60.0), vel(900.0)), HEIGHT, |_| true);

        let action = fsm.on_drag(
            &GestureSample::ended(Point::new(0.0, 90.0), Point::new(0.0, 1300.0)),
            HEIGHT,
            |_| true,
        );
        assert!(matches!(action, GestureAction::Resolve { commit: true, .. }));
        assert!(fsm.dismissal_in_flight());
    }

    #[test]
    fn test_slow_short_release_reverts() {
        let mut fsm = armed_machine();
        fsm.on_drag(&GestureSample::changed(Point::new(0.0, 50.0), vel(40.0)), HEIGHT, |_| true);

        let action = fsm.on_drag(
            &GestureSample::ended(Point::new(0.0, 50.0), Point::new(0.0, 5.0)),
            HEIGHT,
            |_| true,
        );
        assert!(matches!(action, GestureAction::Resolve { commit: false, .. }));
    }

    #[test]
    fn test_commit_rule_branches() {
        let t = GestureThresholds::from(&DismissConfig::default());

        // Threshold branch needs a non-negative velocity
        assert!(should_commit(GesturePhase::Ended, 0.35, 0.0, 280.0, &t));
        assert!(!should_commit(GesturePhase::Ended, 0.6, -10.0, 480.0, &t));

        // Flick branch needs both speed and distance
        assert!(should_commit(GesturePhase::Ended, 0.1, 1280.0, 87.0, &t));
        assert!(!should_commit(GesturePhase::Ended, 0.1, 1280.0, 86.0, &t));
        assert!(!should_commit(GesturePhase::Ended, 0.1, 1279.0, 200.0, &t));

        // A platform cancel never commits
        assert!(!should_commit(GesturePhase::Cancelled, 0.9, 2000.0, 700.0, &t));
    }

    #[test]
    fn test_admission_requires_dominant_downward_velocity() {
        let mut fsm = machine();

        let sideways = GestureSample::began(Point::ZERO, Point::new(500.0, 200.0));
        assert_eq!(fsm.on_drag(&sideways, HEIGHT, |_| true), GestureAction::None);

        let upward = GestureSample::changed(Point::ZERO, Point::new(0.0, -300.0));
        assert_eq!(fsm.on_drag(&upward, HEIGHT, |_| true), GestureAction::None);

        let mut policy_called = false;
        let downward = GestureSample::changed(Point::new(0.0, 4.0), Point::new(10.0, 300.0));
        let action = fsm.on_drag(&downward, HEIGHT, |_| {
            policy_called = true;
            false
        });
        assert!(policy_called);
        assert_eq!(action, GestureAction::None);
        assert!(fsm.is_idle());
    }

    #[test]
    fn test_out_of_order_samples_ignored() {
        let mut fsm = machine();
        let changed = GestureSample::changed(Point::new(0.0, 30.0), Point::new(0.0, 500.0));
        assert_eq!(fsm.on_drag(&changed, HEIGHT, |_| true), GestureAction::None);

        let ended = GestureSample::ended(Point::new(0.0, 300.0), Point::new(0.0, 2000.0));
        assert_eq!(fsm.on_drag(&ended, HEIGHT, |_| true), GestureAction::None);
        assert!(fsm.is_idle());
        assert!(fsm.history().is_empty());
    }

    #[test]
    fn test_no_second_attempt_while_one_is_live() {
        let mut fsm = armed_machine();
        let mut consulted = false;
        fsm.on_drag(
            &GestureSample::changed(Point::new(0.0, 20.0), vel(400.0)),
            HEIGHT,
            |_| {
                consulted = true;
                true
            },
        );
        assert!(!consulted);
    }

    #[test]
    fn test_press_signal() {
        let mut fsm = machine();
        fsm.on_press(PressPhase::Began);
        assert!(fsm.pointer_down_without_movement());

        fsm.on_drag(&GestureSample::began(Point::ZERO, Point::ZERO), HEIGHT, |_| false);
        fsm.on_drag(&GestureSample::changed(Point::new(0.0, 12.0), Point::ZERO), HEIGHT, |_| false);
        assert!(!fsm.pointer_down_without_movement());
        assert_eq!(fsm.drag_translation_y(), 12.0);

        fsm.on_press(PressPhase::Ended);
        fsm.on_drag(&GestureSample::ended(Point::new(0.0, 12.0), Point::ZERO), HEIGHT, |_| false);
        assert!(!fsm.pointer_down_without_movement());
        assert_eq!(fsm.drag_translation_y(), 0.0);
    }

    #[test]
    fn test_force_revert_and_settle() {
        let mut fsm = armed_machine();
        assert!(matches!(
            fsm.force_revert(),
            GestureAction::Resolve { commit: false, cause: ResolveCause::Forced, .. }
        ));
        assert_eq!(fsm.force_revert(), GestureAction::None);

        fsm.settle();
        assert!(fsm.is_idle());
        assert_eq!(
            fsm.history(),
            &[
                (StateKind::Idle, StateKind::Armed),
                (StateKind::Armed, StateKind::Reverting),
                (StateKind::Reverting, StateKind::Idle),
            ]
        );
    }

    #[test]
    fn test_programmatic_dismissal_requires_idle() {
        let mut fsm = machine();
        assert!(fsm.begin_programmatic());
        assert!(fsm.dismissal_in_flight());
        assert!(!fsm.begin_programmatic());
    }
}
