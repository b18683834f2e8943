//! Single-property tweens

use swipeaway_core::{ViewId, ViewProperty};

use crate::easing::Easing;

/// Animate one property of one view from `from` to `to`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertyAnimation {
    pub view: ViewId,
    pub property: ViewProperty,
    pub from: f32,
    pub to: f32,
    pub duration_ms: u32,
    pub easing: Easing,
}

impl PropertyAnimation {
    pub fn new(view: ViewId, property: ViewProperty, from: f32, to: f32, duration_ms: u32) -> Self {
        Self {
            view,
            property,
            from,
            to,
            duration_ms,
            easing: Easing::Linear,
        }
    }

    /// Builder: set the easing curve
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Linear progress after `elapsed_ms`, clamped to 0.0..=1.0
    pub fn progress(&self, elapsed_ms: f32) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (elapsed_ms / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    /// Interpolated value after `elapsed_ms`
    pub fn value_at(&self, elapsed_ms: f32) -> f32 {
        let eased = self.easing.apply(self.progress(elapsed_ms));
        self.from + (self.to - self.from) * eased
    }

    pub fn is_complete(&self, elapsed_ms: f32) -> bool {
        elapsed_ms >= self.duration_ms as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn view() -> ViewId {
        ViewId::from(KeyData::from_ffi(1))
    }

    #[test]
    fn test_linear_interpolation() {
        let tween = PropertyAnimation::new(view(), ViewProperty::TranslateY, 0.0, 800.0, 400);

        assert_eq!(tween.value_at(0.0), 0.0);
        assert_eq!(tween.value_at(100.0), 200.0);
        assert_eq!(tween.value_at(400.0), 800.0);
        assert_eq!(tween.value_at(1000.0), 800.0);
        assert!(tween.is_complete(400.0));
        assert!(!tween.is_complete(399.0));
    }

    #[test]
    fn test_reverse_direction() {
        let tween = PropertyAnimation::new(view(), ViewProperty::Opacity, 1.0, 0.0, 200);
        assert!((tween.value_at(50.0) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_zero_duration_jumps_to_end() {
        let tween = PropertyAnimation::new(view(), ViewProperty::Scale, 1.0, 0.9, 0);
        assert_eq!(tween.value_at(0.0), 0.9);
        assert!(tween.is_complete(0.0));
    }

    #[test]
    fn test_easing_shapes_value() {
        let tween = PropertyAnimation::new(view(), ViewProperty::TranslateY, 0.0, 100.0, 100)
            .easing(Easing::EaseOutQuad);
        assert!(tween.value_at(50.0) > 50.0);
    }
}
