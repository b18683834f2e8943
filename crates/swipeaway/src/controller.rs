//! Dismiss controller
//!
//! Ties the gesture machine, the scroll conflict monitor, the percent-driven
//! engine and the overlay choreography together. The host feeds it input
//! samples, scroll offset changes and scheduler events, always on one thread
//! and one at a time, and lends it its collaborators for each call through a
//! [`HostEnv`].

use smallvec::smallvec;
use swipeaway_animation::SchedulerEvent;
use swipeaway_core::{GestureSample, Point, PressPhase, RecognizerDescriptor, Recognizers, ViewId};
use tracing::{debug, trace};

use crate::config::DismissConfig;
use crate::engine::PercentDrivenTransition;
use crate::gesture::{GestureAction, GestureStateMachine, GestureThresholds, ResolveCause};
use crate::host::{DismissContext, HostEnv};
use crate::overlay::{OverlayChoreography, OverlayStatus};
use crate::scroll_monitor::{LockoutSignals, ScrollConflictMonitor};
use crate::variant::TransitionVariant;

/// Interactive drag-to-dismiss controller for one presented view
pub struct DismissController {
    variant: TransitionVariant,
    config: DismissConfig,
    gesture: GestureStateMachine,
    engine: PercentDrivenTransition,
    monitor: ScrollConflictMonitor,
    overlay: OverlayChoreography,
    last_translation: Point,
    last_velocity: Point,
}

impl DismissController {
    pub fn new(variant: TransitionVariant, config: DismissConfig) -> Self {
        Self {
            variant,
            gesture: GestureStateMachine::new(GestureThresholds::from(&config)),
            engine: PercentDrivenTransition::new(variant.duration_ms(&config)),
            monitor: ScrollConflictMonitor::new(variant.slides_vertically(), config.lockout_delay_ms),
            overlay: OverlayChoreography::new(variant, &config),
            config,
            last_translation: Point::ZERO,
            last_velocity: Point::ZERO,
        }
    }

    pub fn variant(&self) -> TransitionVariant {
        self.variant
    }

    pub fn config(&self) -> &DismissConfig {
        &self.config
    }

    pub fn gesture(&self) -> &GestureStateMachine {
        &self.gesture
    }

    pub fn engine(&self) -> &PercentDrivenTransition {
        &self.engine
    }

    pub fn scroll_monitor(&self) -> &ScrollConflictMonitor {
        &self.monitor
    }

    pub fn overlay(&self) -> &OverlayChoreography {
        &self.overlay
    }

    /// Recognizers the host should attach to the presented view
    pub fn registered_recognizers(&self) -> Recognizers {
        smallvec![RecognizerDescriptor::drag(), RecognizerDescriptor::press()]
    }

    /// Full transition duration for this variant
    pub fn transition_duration(&self) -> u32 {
        self.engine.duration_ms()
    }

    /// Current transition progress in 0.0..=1.0
    pub fn progress(&self) -> f32 {
        self.engine.progress()
    }

    /// Whether an attempt or its playback is under way
    pub fn is_busy(&self) -> bool {
        !self.gesture.is_idle() || self.overlay.is_active()
    }

    /// Arbitrate against `scroll_view` from now on, replacing any previous one
    pub fn monitor(&mut self, scroll_view: ViewId, env: &mut HostEnv<'_>) {
        self.monitor.monitor(Some(scroll_view), env.compositor);
        self.sync_bounce(env);
    }

    /// Stop arbitrating; the scroll view gets its own bounce setting back
    pub fn stop_monitoring(&mut self, env: &mut HostEnv<'_>) {
        self.monitor.monitor(None, env.compositor);
    }

    fn signals(&self) -> LockoutSignals {
        LockoutSignals {
            pointer_down_without_movement: self.gesture.pointer_down_without_movement(),
            drag_translation_y: self.gesture.drag_translation_y(),
            dismissal_in_flight: self.gesture.dismissal_in_flight(),
        }
    }

    fn sync_bounce(&mut self, env: &mut HostEnv<'_>) {
        let signals = self.signals();
        self.monitor.sync_bounce(signals, env.compositor);
    }

    fn context(&self, env: &HostEnv<'_>) -> DismissContext {
        DismissContext {
            variant: self.variant,
            presented_view: env.host.presented_view(),
            progress: self.engine.progress(),
            translation: self.last_translation,
            velocity: self.last_velocity,
        }
    }

    /// Feed the zero-duration press recognizer
    pub fn handle_press(&mut self, phase: PressPhase, env: &mut HostEnv<'_>) {
        self.gesture.on_press(phase);
        self.sync_bounce(env);
    }

    /// Feed one drag sample
    pub fn handle_drag(&mut self, sample: &GestureSample, env: &mut HostEnv<'_>) {
        self.last_translation = sample.translation;
        self.last_velocity = sample.velocity;
        let height = env.container_height();

        let action = {
            let Self {
                gesture,
                monitor,
                config,
                variant,
                ..
            } = self;
            let env = &*env;
            gesture.on_drag(sample, height, |sample| {
                admits(monitor, config, *variant, env, sample)
            })
        };

        match action {
            GestureAction::None => {}
            GestureAction::Arm { origin } => self.arm(origin, env),
            GestureAction::Update { progress } => {
                self.engine.update(progress);
                self.overlay.scrub(self.engine.progress(), env.compositor);
            }
            GestureAction::Resolve {
                commit,
                progress,
                cause,
            } => self.resolve(commit, progress, cause, env),
        }
        self.sync_bounce(env);
    }

    fn arm(&mut self, origin: Point, env: &mut HostEnv<'_>) {
        debug!("controller: attempt armed at {:?}", origin);
        self.monitor.reset_to_top(env.compositor);
        self.engine.begin();
        if let Some(content) = env.host.presented_view() {
            let bounds = env.host.container_bounds();
            self.overlay
                .prepare(content, bounds, env.compositor, env.animator);
        }
        let context = self.context(env);
        env.host.on_attempt_began(&context);
    }

    fn resolve(&mut self, commit: bool, progress: f32, cause: ResolveCause, env: &mut HostEnv<'_>) {
        if cause != ResolveCause::Forced {
            self.engine.update(progress);
            self.overlay.scrub(self.engine.progress(), env.compositor);
        }
        let resolved = if commit {
            self.engine.finish()
        } else {
            self.engine.cancel()
        };
        if !resolved {
            return;
        }
        debug!(
            "controller: attempt resolved ({:?}), will dismiss: {}",
            cause, commit
        );

        let context = self.context(env);
        env.host.on_attempt_resolved(&context, commit);
        if commit {
            env.host.begin_dismissal(&context);
        }
        self.play_out(commit, env);
    }

    fn play_out(&mut self, dismiss: bool, env: &mut HostEnv<'_>) {
        let status = self.overlay.drive(
            dismiss,
            self.engine.remaining_ms(),
            env.compositor,
            env.animator,
        );
        if let OverlayStatus::Finished { dismissed } = status {
            self.finish_transition(dismissed, env);
        }
    }

    fn finish_transition(&mut self, dismissed: bool, env: &mut HostEnv<'_>) {
        self.engine.complete(dismissed);
        self.gesture.settle();
        let context = self.context(env);
        debug!("controller: transition finished, dismissed: {}", dismissed);
        env.host.on_transition_finished(&context, dismissed);
        self.last_translation = Point::ZERO;
        self.last_velocity = Point::ZERO;
        self.sync_bounce(env);
    }

    /// The monitored scroll view (or any other) reported a new offset
    pub fn on_scroll_offset_changed(&mut self, view: ViewId, env: &mut HostEnv<'_>) {
        let signals = self.signals();
        self.monitor
            .observe(view, signals, env.compositor, env.animator);
    }

    /// Forward a scheduler event. Returns `true` if it belonged to this
    /// controller.
    pub fn handle_scheduler_event(&mut self, event: SchedulerEvent, env: &mut HostEnv<'_>) -> bool {
        match event {
            SchedulerEvent::AnimationCompleted { id, finished } => {
                match self
                    .overlay
                    .on_animation_completed(id, finished, env.compositor, env.animator)
                {
                    OverlayStatus::Ignored => false,
                    OverlayStatus::Running => true,
                    OverlayStatus::Finished { dismissed } => {
                        self.finish_transition(dismissed, env);
                        true
                    }
                }
            }
            SchedulerEvent::TimerFired(timer) => {
                if !self.monitor.owns_timer(timer) {
                    return false;
                }
                self.monitor.on_timer(timer);
                true
            }
        }
    }

    /// Dismiss without a drag, playing the full transition. Returns `false`
    /// if an attempt is already under way or there is nothing presented.
    pub fn dismiss(&mut self, env: &mut HostEnv<'_>) -> bool {
        if self.is_busy() {
            trace!("controller: programmatic dismiss ignored while busy");
            return false;
        }
        let Some(content) = env.host.presented_view() else {
            return false;
        };
        if !self.gesture.begin_programmatic() || !self.engine.begin() {
            return false;
        }
        self.last_translation = Point::ZERO;
        self.last_velocity = Point::ZERO;
        let bounds = env.host.container_bounds();
        self.overlay
            .prepare(content, bounds, env.compositor, env.animator);
        self.engine.finish();
        debug!("controller: programmatic dismiss");

        let context = self.context(env);
        env.host.begin_dismissal(&context);
        self.play_out(true, env);
        self.sync_bounce(env);
        true
    }

    /// Revert a live attempt, e.g. because the host was interrupted
    pub fn cancel_interaction(&mut self, env: &mut HostEnv<'_>) {
        if let GestureAction::Resolve {
            commit,
            progress,
            cause,
        } = self.gesture.force_revert()
        {
            self.resolve(commit, progress, cause, env);
            self.sync_bounce(env);
        }
    }
}

/// Policy half of admission; the velocity half lives in the gesture machine
fn admits(
    monitor: &ScrollConflictMonitor,
    config: &DismissConfig,
    variant: TransitionVariant,
    env: &HostEnv<'_>,
    sample: &GestureSample,
) -> bool {
    if monitor.blocking_window_active() {
        trace!("admission: inside scroll blocking window");
        return false;
    }
    if env.host.is_nested() && !config.allow_dismiss_when_nested {
        trace!("admission: presented view is nested");
        return false;
    }
    if !monitor.is_at_top(&*env.compositor) {
        trace!("admission: scroll view not at top");
        return false;
    }
    let presented_view = env.host.presented_view();
    if presented_view.is_none() {
        trace!("admission: nothing presented");
        return false;
    }
    let context = DismissContext {
        variant,
        presented_view,
        progress: 0.0,
        translation: sample.translation,
        velocity: sample.velocity,
    };
    env.host.can_begin_dismiss(&context)
}
