//! Host collaborator contract
//!
//! The controller talks to its host through three seams, bundled per call in
//! a [`HostEnv`]:
//!
//! - [`DismissHost`]: geometry, policy and notifications
//! - [`Compositor`]: view manipulation
//! - [`Animator`]: timed property animation and deferred timers

use swipeaway_animation::Animator;
use swipeaway_core::{Compositor, Point, Rect, ViewId};

use crate::variant::TransitionVariant;

/// Snapshot of the interaction handed to host hooks
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DismissContext {
    pub variant: TransitionVariant,
    pub presented_view: Option<ViewId>,
    /// Transition progress in 0.0..=1.0
    pub progress: f32,
    /// Latest drag translation, zero for programmatic dismissal
    pub translation: Point,
    /// Latest drag velocity, zero for programmatic dismissal
    pub velocity: Point,
}

/// Policy and notification hooks implemented by the presenting host
pub trait DismissHost {
    /// Bounds of the container the presented view fills
    fn container_bounds(&self) -> Rect;

    /// The presented content view, if it is still alive
    fn presented_view(&self) -> Option<ViewId>;

    /// Whether the presented view sits below the root of a navigation stack
    fn is_nested(&self) -> bool {
        false
    }

    /// Start the host's own dismissal of the presented view. Called once per
    /// committed attempt; completion is reported through
    /// [`on_transition_finished`](Self::on_transition_finished).
    fn begin_dismissal(&mut self, context: &DismissContext);

    /// Final say on whether a drag may arm a dismiss attempt
    fn can_begin_dismiss(&self, _context: &DismissContext) -> bool {
        true
    }

    fn on_attempt_began(&mut self, _context: &DismissContext) {}

    fn on_attempt_resolved(&mut self, _context: &DismissContext, _will_dismiss: bool) {}

    /// All overlay animations are done; `did_dismiss` tells whether the
    /// presented view actually left
    fn on_transition_finished(&mut self, _context: &DismissContext, _did_dismiss: bool) {}
}

/// Host collaborators borrowed for the duration of one controller call
pub struct HostEnv<'a> {
    pub host: &'a mut dyn DismissHost,
    pub compositor: &'a mut dyn Compositor,
    pub animator: &'a mut dyn Animator,
}

impl<'a> HostEnv<'a> {
    pub fn new(
        host: &'a mut dyn DismissHost,
        compositor: &'a mut dyn Compositor,
        animator: &'a mut dyn Animator,
    ) -> Self {
        Self {
            host,
            compositor,
            animator,
        }
    }

    /// Height used as the denominator of progress, never below 1
    pub fn container_height(&self) -> f32 {
        self.host.container_bounds().height().max(1.0)
    }
}
