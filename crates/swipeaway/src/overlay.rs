//! Overlay choreography
//!
//! Builds the transient views a dismiss transition plays on, drives their
//! properties, and tears them down once playback is over.
//!
//! A playback goes through three stages:
//!
//! 1. **Scrubbing**: a dimming scrim is inserted below the content and, for
//!    the snapshot variants, a static copy of the content above it (the real
//!    content is hidden). Progress updates write the tracks directly.
//! 2. **Driving**: every track is tweened to its end (dismiss) or start
//!    (cancel) with the variant's release curve.
//! 3. **Settling**: snapshot removed, content revealed; a cancelled scale
//!    dismiss fades its scrim out instead of dropping it, and a rounded
//!    snapshot hands its corner radius back to the content.
//!
//! Views are only ever removed in response to animation completion events,
//! so each teardown step runs once.

use smallvec::SmallVec;
use swipeaway_animation::{AnimationId, Animator, PropertyAnimation};
use swipeaway_core::{Compositor, Placement, Rect, ViewId, ViewProperty};
use tracing::{debug, trace};

use crate::config::DismissConfig;
use crate::variant::TransitionVariant;

/// Handles to the transient views of one playback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlaySet {
    pub dimming: ViewId,
    /// Absent for [`TransitionVariant::SlideDynamic`]
    pub snapshot: Option<ViewId>,
}

/// Result of feeding an event to the choreography
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayStatus {
    /// The event does not concern this playback
    Ignored,
    /// Animations are still running
    Running,
    /// All teardown is done
    Finished { dismissed: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Idle,
    Scrubbing,
    Driving { dismiss: bool },
    Settling { dismissed: bool },
}

type Track = (ViewId, ViewProperty, f32);

pub struct OverlayChoreography {
    variant: TransitionVariant,
    corner_radius_duration_ms: u32,
    scale_cancel_fade_ms: u32,
    snapshot_corner_radius: f32,
    scale_shrink: f32,

    stage: Stage,
    content: Option<ViewId>,
    height: f32,
    overlays: Option<OverlaySet>,
    /// Corner-radius intro on a freshly inserted snapshot
    intro: Option<AnimationId>,
    pending: SmallVec<[AnimationId; 4]>,
    dimming_fade: Option<AnimationId>,
    /// A drive tween was stopped before reaching its target
    interrupted: bool,
}

impl OverlayChoreography {
    pub fn new(variant: TransitionVariant, config: &DismissConfig) -> Self {
        Self {
            variant,
            corner_radius_duration_ms: config.corner_radius_duration_ms,
            scale_cancel_fade_ms: config.scale_cancel_fade_ms,
            snapshot_corner_radius: config.snapshot_corner_radius,
            scale_shrink: config.scale_shrink,
            stage: Stage::Idle,
            content: None,
            height: 1.0,
            overlays: None,
            intro: None,
            pending: SmallVec::new(),
            dimming_fade: None,
            interrupted: false,
        }
    }

    pub fn overlays(&self) -> Option<OverlaySet> {
        self.overlays
    }

    /// Whether a playback is in progress
    pub fn is_active(&self) -> bool {
        self.stage != Stage::Idle
    }

    /// Insert the overlays for `content`. Returns `false` when already
    /// prepared or when `content` is gone.
    pub fn prepare(
        &mut self,
        content: ViewId,
        bounds: Rect,
        compositor: &mut dyn Compositor,
        animator: &mut dyn Animator,
    ) -> bool {
        if self.stage != Stage::Idle {
            trace!("overlay: prepare ignored in {:?}", self.stage);
            return false;
        }
        if !compositor.contains(content) {
            debug!("overlay: content {:?} is gone, nothing to prepare", content);
            return false;
        }

        let dimming =
            compositor.insert_overlay(bounds, self.variant.dimming_color(), Placement::Below(content));
        compositor.set_property(dimming, ViewProperty::Opacity, 1.0);

        let snapshot = if self.variant.uses_snapshot() {
            compositor.insert_snapshot(content, Placement::Above(content))
        } else {
            None
        };
        if let Some(snapshot) = snapshot {
            compositor.set_hidden(content, true);
            if self.variant.rounds_snapshot() {
                compositor.set_property(snapshot, ViewProperty::CornerRadius, 0.0);
                self.intro = Some(animator.animate(PropertyAnimation::new(
                    snapshot,
                    ViewProperty::CornerRadius,
                    0.0,
                    self.snapshot_corner_radius,
                    self.corner_radius_duration_ms,
                )));
            }
        }

        self.content = Some(content);
        self.height = bounds.height().max(1.0);
        self.overlays = Some(OverlaySet { dimming, snapshot });
        self.stage = Stage::Scrubbing;
        debug!(
            "overlay: prepared {:?} (dimming {:?}, snapshot {:?})",
            self.variant, dimming, snapshot
        );
        true
    }

    /// The view that moves: the snapshot when there is one, else the content
    fn driven_view(&self) -> Option<ViewId> {
        self.overlays.and_then(|set| set.snapshot).or(self.content)
    }

    fn tracks_at(&self, progress: f32) -> SmallVec<[Track; 3]> {
        let mut tracks = SmallVec::new();
        let (Some(set), Some(driven)) = (self.overlays, self.driven_view()) else {
            return tracks;
        };
        if self.variant.slides_vertically() {
            tracks.push((driven, ViewProperty::TranslateY, progress * self.height));
            tracks.push((set.dimming, ViewProperty::Opacity, 1.0 - progress));
        } else {
            tracks.push((driven, ViewProperty::Opacity, 1.0 - progress));
            tracks.push((driven, ViewProperty::Scale, 1.0 - self.scale_shrink * progress));
        }
        tracks
    }

    /// Follow interactive progress
    pub fn scrub(&mut self, progress: f32, compositor: &mut dyn Compositor) {
        if self.stage != Stage::Scrubbing {
            return;
        }
        for (view, property, value) in self.tracks_at(progress.clamp(0.0, 1.0)) {
            compositor.set_property(view, property, value);
        }
    }

    /// Play every track to its end (`dismiss`) or back to its start
    pub fn drive(
        &mut self,
        dismiss: bool,
        duration_ms: u32,
        compositor: &mut dyn Compositor,
        animator: &mut dyn Animator,
    ) -> OverlayStatus {
        match self.stage {
            Stage::Idle => return OverlayStatus::Finished { dismissed: dismiss },
            Stage::Driving { .. } | Stage::Settling { .. } => return OverlayStatus::Running,
            Stage::Scrubbing => {}
        }

        if let Some(intro) = self.intro.take() {
            animator.cancel(intro);
        }

        let easing = self.variant.release_easing();
        for (view, property, to) in self.tracks_at(if dismiss { 1.0 } else { 0.0 }) {
            let Some(from) = compositor.property(view, property) else {
                continue;
            };
            let animation = PropertyAnimation::new(view, property, from, to, duration_ms).easing(easing);
            self.pending.push(animator.animate(animation));
        }

        self.stage = Stage::Driving { dismiss };
        debug!(
            "overlay: driving to {} over {}ms",
            if dismiss { "end" } else { "start" },
            duration_ms
        );
        if self.pending.is_empty() {
            return self.settle(dismiss, compositor, animator);
        }
        OverlayStatus::Running
    }

    /// Feed an animation completion. A drive tween that did not `finish`
    /// turns a dismissal into a cancel.
    pub fn on_animation_completed(
        &mut self,
        id: AnimationId,
        finished: bool,
        compositor: &mut dyn Compositor,
        animator: &mut dyn Animator,
    ) -> OverlayStatus {
        if self.intro == Some(id) {
            self.intro = None;
            return OverlayStatus::Running;
        }
        let Some(index) = self.pending.iter().position(|p| *p == id) else {
            return OverlayStatus::Ignored;
        };
        self.pending.swap_remove(index);
        if !finished && matches!(self.stage, Stage::Driving { .. }) {
            debug!("overlay: drive tween {:?} interrupted", id);
            self.interrupted = true;
        }

        if self.dimming_fade == Some(id) {
            self.dimming_fade = None;
            if let Some(set) = self.overlays {
                compositor.remove_view(set.dimming);
            }
        }

        if !self.pending.is_empty() {
            return OverlayStatus::Running;
        }
        match self.stage {
            Stage::Driving { dismiss } => {
                let dismissed = dismiss && !self.interrupted;
                self.settle(dismissed, compositor, animator)
            }
            Stage::Settling { dismissed } => self.finish(dismissed),
            Stage::Idle | Stage::Scrubbing => OverlayStatus::Running,
        }
    }

    fn settle(
        &mut self,
        dismissed: bool,
        compositor: &mut dyn Compositor,
        animator: &mut dyn Animator,
    ) -> OverlayStatus {
        self.stage = Stage::Settling { dismissed };
        let Some(set) = self.overlays else {
            return self.finish(dismissed);
        };
        if !dismissed {
            for (view, property, value) in self.tracks_at(0.0) {
                compositor.set_property(view, property, value);
            }
        }

        if let Some(snapshot) = set.snapshot {
            if !dismissed {
                if let Some(content) = self.content {
                    if self.variant.rounds_snapshot() {
                        self.hand_back_corner_radius(snapshot, content, compositor, animator);
                    }
                    compositor.set_hidden(content, false);
                }
            }
            compositor.remove_view(snapshot);
        }

        let fades_scrim = !dismissed && self.variant == TransitionVariant::Scale;
        match compositor.property(set.dimming, ViewProperty::Opacity) {
            Some(from) if fades_scrim => {
                let fade = animator.animate(PropertyAnimation::new(
                    set.dimming,
                    ViewProperty::Opacity,
                    from,
                    0.0,
                    self.scale_cancel_fade_ms,
                ));
                self.dimming_fade = Some(fade);
                self.pending.push(fade);
                trace!("overlay: fading scrim over {}ms", self.scale_cancel_fade_ms);
            }
            _ => {
                compositor.remove_view(set.dimming);
            }
        }

        if self.pending.is_empty() {
            return self.finish(dismissed);
        }
        OverlayStatus::Running
    }

    fn hand_back_corner_radius(
        &mut self,
        snapshot: ViewId,
        content: ViewId,
        compositor: &mut dyn Compositor,
        animator: &mut dyn Animator,
    ) {
        let Some(radius) = compositor.property(snapshot, ViewProperty::CornerRadius) else {
            return;
        };
        if radius <= 0.0 || !compositor.contains(content) {
            return;
        }
        compositor.set_property(content, ViewProperty::CornerRadius, radius);
        self.pending.push(animator.animate(PropertyAnimation::new(
            content,
            ViewProperty::CornerRadius,
            radius,
            0.0,
            self.corner_radius_duration_ms,
        )));
    }

    fn finish(&mut self, dismissed: bool) -> OverlayStatus {
        debug!("overlay: torn down (dismissed: {})", dismissed);
        self.stage = Stage::Idle;
        self.content = None;
        self.overlays = None;
        self.intro = None;
        self.dimming_fade = None;
        self.interrupted = false;
        self.pending.clear();
        OverlayStatus::Finished { dismissed }
    }
}
