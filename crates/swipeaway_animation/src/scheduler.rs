//! Animation scheduler
//!
//! Runs property tweens and deferred timers on a virtual clock. The host
//! advances the clock once per frame with [`AnimationScheduler::tick`] and
//! forwards the returned events, in order, to whoever scheduled them.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use swipeaway_core::Compositor;
use tracing::trace;

use crate::tween::PropertyAnimation;

new_key_type! {
    pub struct AnimationId;
    pub struct TimerId;
}

/// Something that happened during a tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// A tween stopped. `finished` is `false` when it was cancelled or its
    /// view disappeared before reaching the end value.
    AnimationCompleted { id: AnimationId, finished: bool },
    /// A deferred timer came due
    TimerFired(TimerId),
}

/// The animation capability the dismiss controller consumes
pub trait Animator {
    /// Start a tween; its completion is reported exactly once
    fn animate(&mut self, animation: PropertyAnimation) -> AnimationId;

    /// Stop a running tween where it is. Returns `false` for unknown ids.
    fn cancel(&mut self, id: AnimationId) -> bool;

    /// Fire a timer after `delay_ms`
    fn schedule(&mut self, delay_ms: u32) -> TimerId;
}

struct ActiveAnimation {
    animation: PropertyAnimation,
    elapsed_ms: f32,
    seq: u64,
}

struct PendingTimer {
    due_ms: f64,
    seq: u64,
}

/// Virtual-clock [`Animator`]
pub struct AnimationScheduler {
    animations: SlotMap<AnimationId, ActiveAnimation>,
    timers: SlotMap<TimerId, PendingTimer>,
    /// Cancellations waiting to be reported on the next tick
    cancelled: Vec<(u64, AnimationId)>,
    now_ms: f64,
    next_seq: u64,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            animations: SlotMap::with_key(),
            timers: SlotMap::with_key(),
            cancelled: Vec::new(),
            now_ms: 0.0,
            next_seq: 0,
        }
    }

    fn seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Advance the clock by `dt_ms`, write tween values into `compositor`
    /// and collect completions and due timers.
    ///
    /// Animation completions come first in start order, then timers in due
    /// order.
    pub fn tick(
        &mut self,
        dt_ms: f32,
        compositor: &mut dyn Compositor,
    ) -> SmallVec<[SchedulerEvent; 4]> {
        self.now_ms += dt_ms as f64;

        let mut done: SmallVec<[(u64, AnimationId, bool); 4]> = self
            .cancelled
            .drain(..)
            .map(|(seq, id)| (seq, id, false))
            .collect();

        for (id, active) in self.animations.iter_mut() {
            let animation = &active.animation;
            if !compositor.contains(animation.view) {
                done.push((active.seq, id, false));
                continue;
            }
            active.elapsed_ms += dt_ms;
            let value = animation.value_at(active.elapsed_ms);
            compositor.set_property(animation.view, animation.property, value);
            if animation.is_complete(active.elapsed_ms) {
                done.push((active.seq, id, true));
            }
        }

        done.sort_by_key(|(seq, _, _)| *seq);
        let mut events: SmallVec<[SchedulerEvent; 4]> = SmallVec::new();
        for (_, id, finished) in done {
            self.animations.remove(id);
            trace!("animation {:?} completed (finished: {})", id, finished);
            events.push(SchedulerEvent::AnimationCompleted { id, finished });
        }

        let now = self.now_ms;
        let mut due: SmallVec<[(f64, u64, TimerId); 4]> = self
            .timers
            .iter()
            .filter(|(_, timer)| timer.due_ms <= now)
            .map(|(id, timer)| (timer.due_ms, timer.seq, id))
            .collect();
        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        for (_, _, id) in due {
            self.timers.remove(id);
            events.push(SchedulerEvent::TimerFired(id));
        }

        events
    }

    /// Check if any tween or timer is still pending
    pub fn is_idle(&self) -> bool {
        self.animations.is_empty() && self.timers.is_empty() && self.cancelled.is_empty()
    }

    /// Get the number of pending timers
    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Iterate over running tweens
    pub fn animations_iter(&self) -> impl Iterator<Item = (AnimationId, &PropertyAnimation)> {
        self.animations.iter().map(|(id, a)| (id, &a.animation))
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Animator for AnimationScheduler {
    fn animate(&mut self, animation: PropertyAnimation) -> AnimationId {
        let seq = self.seq();
        self.animations.insert(ActiveAnimation {
            animation,
            elapsed_ms: 0.0,
            seq,
        })
    }

    fn cancel(&mut self, id: AnimationId) -> bool {
        match self.animations.remove(id) {
            Some(active) => {
                self.cancelled.push((active.seq, id));
                true
            }
            None => false,
        }
    }

    fn schedule(&mut self, delay_ms: u32) -> TimerId {
        let seq = self.seq();
        let due_ms = self.now_ms + delay_ms as f64;
        self.timers.insert(PendingTimer { due_ms, seq })
    }
}
