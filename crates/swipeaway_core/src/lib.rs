//! Swipeaway Core
//!
//! Foundational types shared by the swipeaway crates:
//!
//! - **Geometry**: points, sizes, rectangles and colors
//! - **Gesture Events**: drag and press samples delivered by the host each frame
//! - **Scene**: the [`Compositor`] seam through which overlays and scroll views
//!   are manipulated, plus a headless slotmap-backed [`Scene`] implementation
//!
//! # Example
//!
//! ```rust
//! use swipeaway_core::{Compositor, Rect, Scene, ViewProperty};
//!
//! let mut scene = Scene::new();
//! let content = scene.add_view(Rect::new(0.0, 0.0, 390.0, 800.0));
//!
//! scene.set_property(content, ViewProperty::TranslateY, 120.0);
//! assert_eq!(scene.property(content, ViewProperty::TranslateY), Some(120.0));
//! ```

pub mod events;
pub mod geometry;
pub mod scene;

pub use events::{
    GesturePhase, GestureSample, PressPhase, RecognizerDescriptor, RecognizerKind, Recognizers,
};
pub use geometry::{Color, Point, Rect, Size};
pub use scene::{Compositor, Placement, Scene, ScrollMetrics, ViewId, ViewKind, ViewNode, ViewProperty};
