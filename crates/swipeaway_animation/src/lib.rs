//! Swipeaway Animation System
//!
//! The "animate property P from A to B over duration D" capability the
//! dismiss controller drives its overlays with.
//!
//! # Features
//!
//! - **Easing**: standard curves plus CSS-compatible cubic beziers
//! - **Property tweens**: one view property between two values
//! - **Scheduler**: ticks tweens against a [`Compositor`], runs deferred
//!   timers, and reports completions in FIFO order
//!
//! [`Compositor`]: swipeaway_core::Compositor

pub mod easing;
pub mod scheduler;
pub mod tween;

pub use easing::Easing;
pub use scheduler::{AnimationId, AnimationScheduler, Animator, SchedulerEvent, TimerId};
pub use tween::PropertyAnimation;
