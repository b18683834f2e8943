//! Swipeaway
//!
//! Interactive drag-to-dismiss for modally presented views.
//!
//! # Features
//!
//! - **Gesture State Machine**: admission, live progress and the
//!   commit-or-revert decision on release
//! - **Scroll Conflict Monitor**: bounce lockout for a nested scroll view and
//!   an epoch-guarded blocking window after deep scrolls
//! - **Percent-Driven Engine**: begin/update/finish/cancel sequencing
//! - **Overlay Choreography**: dimming scrim and content snapshot, driven and
//!   torn down per [`TransitionVariant`]
//!
//! # Example
//!
//! ```rust
//! use swipeaway::{DismissConfig, DismissContext, DismissController, DismissHost, HostEnv, TransitionVariant};
//! use swipeaway_animation::AnimationScheduler;
//! use swipeaway_core::{GestureSample, Point, Rect, Scene, ViewId};
//!
//! struct Sheet {
//!     content: ViewId,
//! }
//!
//! impl DismissHost for Sheet {
//!     fn container_bounds(&self) -> Rect {
//!         Rect::new(0.0, 0.0, 390.0, 800.0)
//!     }
//!
//!     fn presented_view(&self) -> Option<ViewId> {
//!         Some(self.content)
//!     }
//!
//!     fn begin_dismissal(&mut self, _context: &DismissContext) {}
//! }
//!
//! let mut scene = Scene::new();
//! let mut scheduler = AnimationScheduler::new();
//! let mut sheet = Sheet { content: scene.add_view(Rect::new(0.0, 0.0, 390.0, 800.0)) };
//! let mut controller = DismissController::new(TransitionVariant::SlideStatic, DismissConfig::default());
//!
//! let mut env = HostEnv::new(&mut sheet, &mut scene, &mut scheduler);
//! controller.handle_drag(&GestureSample::began(Point::ZERO, Point::new(0.0, 300.0)), &mut env);
//! controller.handle_drag(&GestureSample::changed(Point::new(0.0, 200.0), Point::new(0.0, 300.0)), &mut env);
//! assert_eq!(controller.progress(), 0.25);
//! ```

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod host;
pub mod overlay;
pub mod scroll_monitor;
pub mod variant;

pub use config::DismissConfig;
pub use controller::DismissController;
pub use engine::{EngineState, PercentDrivenTransition};
pub use error::{ConfigError, Result};
pub use gesture::{
    DismissAttempt, GestureAction, GestureState, GestureStateMachine, GestureThresholds,
    ResolveCause, StateKind,
};
pub use host::{DismissContext, DismissHost, HostEnv};
pub use overlay::{OverlayChoreography, OverlaySet, OverlayStatus};
pub use scroll_monitor::{LockoutSignals, ScrollConflictMonitor, ScrollLockoutState};
pub use variant::TransitionVariant;
