//! Scroll conflict monitor
//!
//! Arbitrates between a nested scroll view and the dismiss drag:
//!
//! - **Bounce lockout**: while a press or downward drag is live, the scroll
//!   view's native bounce is switched off so it does not rubber-band under the
//!   finger. Writes happen only when the wanted state flips, and the original
//!   value is put back afterwards.
//! - **Blocking window**: after the content has been scrolled deep (more than
//!   one viewport past the top), dismiss admission is blocked until a short
//!   quiet period has elapsed. Each deep-scroll observation re-arms the window
//!   and stamps its deferred clear with a fresh epoch; a clear whose epoch or
//!   view no longer matches does nothing.

use rustc_hash::FxHashMap;
use swipeaway_animation::{Animator, TimerId};
use swipeaway_core::{Compositor, ScrollMetrics, ViewId};
use tracing::{debug, trace};

/// Lockout bookkeeping for the monitored scroll view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollLockoutState {
    /// Bounce should currently be suppressed
    pub wants_bounce_disabled: bool,
    /// The view's own bounce setting, captured when monitoring began
    pub native_bounce_enabled: bool,
    /// Admission is blocked after a deep scroll
    pub blocking_window_active: bool,
    /// Bumped on every deep-scroll observation and every view switch
    pub scroll_epoch: u64,
}

impl Default for ScrollLockoutState {
    fn default() -> Self {
        Self {
            wants_bounce_disabled: false,
            native_bounce_enabled: true,
            blocking_window_active: false,
            scroll_epoch: 0,
        }
    }
}

/// Gesture facts the bounce decision depends on
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LockoutSignals {
    pub pointer_down_without_movement: bool,
    pub drag_translation_y: f32,
    pub dismissal_in_flight: bool,
}

/// What a deferred clear remembers from the moment it was scheduled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LockoutStamp {
    epoch: u64,
    view: ViewId,
}

/// Watches one scroll view at a time
pub struct ScrollConflictMonitor {
    view: Option<ViewId>,
    state: ScrollLockoutState,
    slides_vertically: bool,
    lockout_delay_ms: u32,
    pending_clears: FxHashMap<TimerId, LockoutStamp>,
}

impl ScrollConflictMonitor {
    pub fn new(slides_vertically: bool, lockout_delay_ms: u32) -> Self {
        Self {
            view: None,
            state: ScrollLockoutState::default(),
            slides_vertically,
            lockout_delay_ms,
            pending_clears: FxHashMap::default(),
        }
    }

    pub fn state(&self) -> &ScrollLockoutState {
        &self.state
    }

    /// The monitored scroll view, if any
    pub fn view(&self) -> Option<ViewId> {
        self.view
    }

    pub fn blocking_window_active(&self) -> bool {
        self.state.blocking_window_active
    }

    fn metrics(&self, compositor: &dyn Compositor) -> Option<(ViewId, ScrollMetrics)> {
        let view = self.view?;
        compositor.scroll_metrics(view).map(|m| (view, m))
    }

    /// Switch to `view` (or stop monitoring with `None`).
    ///
    /// The previous view gets its own bounce setting back before anything
    /// about the new one is captured.
    pub fn monitor(&mut self, view: Option<ViewId>, compositor: &mut dyn Compositor) {
        if let Some(previous) = self.view {
            if self.state.wants_bounce_disabled && compositor.contains(previous) {
                compositor.set_bounces(previous, self.state.native_bounce_enabled);
            }
        }

        let native_bounce_enabled = view
            .and_then(|v| compositor.scroll_metrics(v))
            .map_or(true, |m| m.bounces);

        self.state = ScrollLockoutState {
            wants_bounce_disabled: false,
            native_bounce_enabled,
            blocking_window_active: false,
            scroll_epoch: self.state.scroll_epoch + 1,
        };
        self.view = view;
        debug!(
            "scroll monitor: now watching {:?} (native bounce: {})",
            view, native_bounce_enabled
        );
    }

    /// Whether the scroll view, if any, permits a dismiss to start
    pub fn is_at_top(&self, compositor: &dyn Compositor) -> bool {
        self.metrics(compositor).map_or(true, |(_, m)| m.is_at_top())
    }

    /// Snap the scroll view to its top edge when the user could scroll it, so
    /// scrolling and dragging do not both move the content
    pub fn reset_to_top(&self, compositor: &mut dyn Compositor) {
        if let Some((view, metrics)) = self.metrics(compositor) {
            if metrics.scroll_enabled && metrics.offset_y != metrics.top_edge {
                trace!("scroll monitor: resetting {:?} to top", view);
                compositor.set_scroll_offset_y(view, metrics.top_edge);
            }
        }
    }

    /// Handle an offset change reported for `view`
    pub fn observe(
        &mut self,
        view: ViewId,
        signals: LockoutSignals,
        compositor: &mut dyn Compositor,
        animator: &mut dyn Animator,
    ) {
        if self.view != Some(view) {
            trace!("scroll monitor: offset from unmonitored {:?} ignored", view);
            return;
        }
        let Some(metrics) = compositor.scroll_metrics(view) else {
            return;
        };

        self.apply_bounce(view, &metrics, signals, compositor);

        if metrics.distance_past_top() > metrics.viewport_height {
            self.state.scroll_epoch += 1;
            self.state.blocking_window_active = true;
            let timer = animator.schedule(self.lockout_delay_ms);
            self.pending_clears.insert(
                timer,
                LockoutStamp {
                    epoch: self.state.scroll_epoch,
                    view,
                },
            );
            trace!(
                "scroll monitor: blocking window armed (epoch {})",
                self.state.scroll_epoch
            );
        }
    }

    /// Re-evaluate the bounce lockout after a gesture change
    pub fn sync_bounce(&mut self, signals: LockoutSignals, compositor: &mut dyn Compositor) {
        if let Some((view, metrics)) = self.metrics(compositor) {
            self.apply_bounce(view, &metrics, signals, compositor);
        }
    }

    fn apply_bounce(
        &mut self,
        view: ViewId,
        metrics: &ScrollMetrics,
        signals: LockoutSignals,
        compositor: &mut dyn Compositor,
    ) {
        let wants = signals.pointer_down_without_movement
            || signals.drag_translation_y > 0.0
            || (self.slides_vertically && signals.dismissal_in_flight && metrics.is_at_top());

        if wants == self.state.wants_bounce_disabled {
            return;
        }
        self.state.wants_bounce_disabled = wants;
        let bounces = if wants {
            false
        } else {
            self.state.native_bounce_enabled
        };
        debug!("scroll monitor: bounce on {:?} -> {}", view, bounces);
        compositor.set_bounces(view, bounces);
    }

    /// A timer fired. Returns `true` if it cleared the blocking window.
    pub fn on_timer(&mut self, timer: TimerId) -> bool {
        let Some(stamp) = self.pending_clears.remove(&timer) else {
            return false;
        };
        if self.view != Some(stamp.view) || self.state.scroll_epoch != stamp.epoch {
            trace!(
                "scroll monitor: stale clear (epoch {} vs {})",
                stamp.epoch,
                self.state.scroll_epoch
            );
            return false;
        }
        self.state.blocking_window_active = false;
        debug!("scroll monitor: blocking window cleared");
        true
    }

    /// Whether `timer` belongs to this monitor
    pub fn owns_timer(&self, timer: TimerId) -> bool {
        self.pending_clears.contains_key(&timer)
    }
}
