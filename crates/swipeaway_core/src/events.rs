//! Gesture input
//!
//! Samples the host feeds into the dismiss controller once per input frame,
//! and the descriptors the host uses to attach matching recognizers.

use smallvec::SmallVec;

use crate::geometry::Point;

/// Phase of a continuous drag gesture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GesturePhase {
    Began,
    Changed,
    /// The platform aborted the gesture (incoming call, touch stolen, ...)
    Cancelled,
    Ended,
}

impl GesturePhase {
    /// Whether this phase terminates the gesture
    pub fn is_release(&self) -> bool {
        matches!(self, GesturePhase::Cancelled | GesturePhase::Ended)
    }
}

/// One frame of drag input
///
/// Translation is cumulative since the gesture began; velocity is in points
/// per second. Positive `y` points down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSample {
    pub translation: Point,
    pub velocity: Point,
    pub phase: GesturePhase,
}

impl GestureSample {
    pub fn new(phase: GesturePhase, translation: Point, velocity: Point) -> Self {
        Self {
            translation,
            velocity,
            phase,
        }
    }

    pub fn began(translation: Point, velocity: Point) -> Self {
        Self::new(GesturePhase::Began, translation, velocity)
    }

    pub fn changed(translation: Point, velocity: Point) -> Self {
        Self::new(GesturePhase::Changed, translation, velocity)
    }

    pub fn ended(translation: Point, velocity: Point) -> Self {
        Self::new(GesturePhase::Ended, translation, velocity)
    }

    pub fn cancelled(translation: Point, velocity: Point) -> Self {
        Self::new(GesturePhase::Cancelled, translation, velocity)
    }
}

/// Phase of the zero-duration press recognizer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PressPhase {
    Began,
    Changed,
    Cancelled,
    Ended,
}

impl PressPhase {
    /// Whether the pointer is still down after this phase
    pub fn is_down(&self) -> bool {
        matches!(self, PressPhase::Began | PressPhase::Changed)
    }
}

/// Kind of recognizer the host should attach
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecognizerKind {
    Drag,
    Press,
}

/// Description of an input recognizer for the host to install on the
/// presented view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecognizerDescriptor {
    pub kind: RecognizerKind,
    /// Minimum hold before a press is reported, in milliseconds
    pub min_press_duration_ms: u32,
    /// Recognize alongside other recognizers (e.g. a nested scroll view's pan)
    pub simultaneous: bool,
    /// Whether recognition should cancel touches delivered to the view
    pub cancels_touches: bool,
}

impl RecognizerDescriptor {
    pub fn drag() -> Self {
        Self {
            kind: RecognizerKind::Drag,
            min_press_duration_ms: 0,
            simultaneous: true,
            cancels_touches: false,
        }
    }

    /// Press recognizer that fires as soon as the pointer lands
    pub fn press() -> Self {
        Self {
            kind: RecognizerKind::Press,
            min_press_duration_ms: 0,
            simultaneous: true,
            cancels_touches: false,
        }
    }
}

/// The recognizer set registered by a controller
pub type Recognizers = SmallVec<[RecognizerDescriptor; 2]>;
