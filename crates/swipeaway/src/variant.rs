//! Transition variants

use serde::{Deserialize, Serialize};
use swipeaway_animation::Easing;
use swipeaway_core::Color;

use crate::config::DismissConfig;

/// How the presented view leaves the screen
///
/// Chosen once per controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionVariant {
    /// A snapshot of the content slides down over a dark scrim
    #[default]
    SlideStatic,
    /// The live content view itself slides down over a dark scrim
    SlideDynamic,
    /// A rounded snapshot fades and shrinks over a light scrim
    Scale,
}

impl TransitionVariant {
    /// Whether the content travels vertically
    pub fn slides_vertically(&self) -> bool {
        matches!(self, TransitionVariant::SlideStatic | TransitionVariant::SlideDynamic)
    }

    /// Whether the real content is replaced by a snapshot during playback
    pub fn uses_snapshot(&self) -> bool {
        !matches!(self, TransitionVariant::SlideDynamic)
    }

    /// Whether the snapshot gets rounded corners when inserted
    pub fn rounds_snapshot(&self) -> bool {
        matches!(self, TransitionVariant::Scale)
    }

    pub fn dimming_color(&self) -> Color {
        match self {
            TransitionVariant::SlideStatic | TransitionVariant::SlideDynamic => Color::BLACK,
            TransitionVariant::Scale => Color::WHITE,
        }
    }

    /// Full playback duration; slides take longer than the scale
    pub fn duration_ms(&self, config: &DismissConfig) -> u32 {
        match self {
            TransitionVariant::SlideStatic | TransitionVariant::SlideDynamic => {
                config.slide_duration_ms
            }
            TransitionVariant::Scale => config.scale_duration_ms,
        }
    }

    /// Curve for the post-release drive
    pub fn release_easing(&self) -> Easing {
        match self {
            TransitionVariant::SlideStatic | TransitionVariant::SlideDynamic => Easing::RELEASE,
            TransitionVariant::Scale => Easing::EaseOutQuad,
        }
    }
}
