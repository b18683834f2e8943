//! Shared harness for the integration tests
//!
//! Wires a [`DismissController`] to a headless [`Scene`], a virtual-clock
//! [`AnimationScheduler`] and a host that records every notification.

#![allow(dead_code)]

use swipeaway::{
    DismissConfig, DismissContext, DismissController, DismissHost, HostEnv, TransitionVariant,
};
use swipeaway_animation::AnimationScheduler;
use swipeaway_core::{
    GestureSample, Point, PressPhase, Rect, Scene, ViewId, ViewKind,
};

pub const WIDTH: f32 = 390.0;
pub const HEIGHT: f32 = 800.0;
pub const VIEWPORT: f32 = 600.0;
pub const FRAME_MS: f32 = 16.0;

/// Opt-in log output: `RUST_LOG=swipeaway=trace cargo test`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostEvent {
    AttemptBegan,
    AttemptResolved { will_dismiss: bool },
    DismissalBegan,
    TransitionFinished { did_dismiss: bool },
}

pub struct TestHost {
    pub content: Option<ViewId>,
    pub nested: bool,
    pub veto: bool,
    pub events: Vec<HostEvent>,
    pub last_context: Option<DismissContext>,
}

impl DismissHost for TestHost {
    fn container_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, WIDTH, HEIGHT)
    }

    fn presented_view(&self) -> Option<ViewId> {
        self.content
    }

    fn is_nested(&self) -> bool {
        self.nested
    }

    fn begin_dismissal(&mut self, context: &DismissContext) {
        self.last_context = Some(*context);
        self.events.push(HostEvent::DismissalBegan);
    }

    fn can_begin_dismiss(&self, _context: &DismissContext) -> bool {
        !self.veto
    }

    fn on_attempt_began(&mut self, context: &DismissContext) {
        self.last_context = Some(*context);
        self.events.push(HostEvent::AttemptBegan);
    }

    fn on_attempt_resolved(&mut self, context: &DismissContext, will_dismiss: bool) {
        self.last_context = Some(*context);
        self.events.push(HostEvent::AttemptResolved { will_dismiss });
    }

    fn on_transition_finished(&mut self, context: &DismissContext, did_dismiss: bool) {
        self.last_context = Some(*context);
        self.events.push(HostEvent::TransitionFinished { did_dismiss });
    }
}

pub struct Harness {
    pub scene: Scene,
    pub scheduler: AnimationScheduler,
    pub host: TestHost,
    pub controller: DismissController,
    pub content: ViewId,
    pub scroll: Option<ViewId>,
}

impl Harness {
    pub fn new(variant: TransitionVariant) -> Self {
        Self::with_config(variant, DismissConfig::default())
    }

    pub fn with_config(variant: TransitionVariant, config: DismissConfig) -> Self {
        init_tracing();
        let mut scene = Scene::new();
        let content = scene.add_view(Rect::new(0.0, 0.0, WIDTH, HEIGHT));
        Self {
            scene,
            scheduler: AnimationScheduler::new(),
            host: TestHost {
                content: Some(content),
                nested: false,
                veto: false,
                events: Vec::new(),
                last_context: None,
            },
            controller: DismissController::new(variant, config),
            content,
            scroll: None,
        }
    }

    /// Add a long scroll view and start monitoring it
    pub fn with_scroll_view(mut self) -> Self {
        let scroll = self
            .scene
            .add_scroll_view(Rect::new(0.0, 0.0, WIDTH, VIEWPORT), VIEWPORT * 10.0);
        self.monitor(scroll);
        self.scroll = Some(scroll);
        self
    }

    pub fn monitor(&mut self, scroll: ViewId) {
        let mut env = HostEnv::new(&mut self.host, &mut self.scene, &mut self.scheduler);
        self.controller.monitor(scroll, &mut env);
    }

    pub fn stop_monitoring(&mut self) {
        let mut env = HostEnv::new(&mut self.host, &mut self.scene, &mut self.scheduler);
        self.controller.stop_monitoring(&mut env);
    }

    pub fn drag(&mut self, sample: GestureSample) {
        let mut env = HostEnv::new(&mut self.host, &mut self.scene, &mut self.scheduler);
        self.controller.handle_drag(&sample, &mut env);
    }

    pub fn began(&mut self, y: f32, vy: f32) {
        self.drag(GestureSample::began(Point::new(0.0, y), Point::new(0.0, vy)));
    }

    pub fn changed(&mut self, y: f32, vy: f32) {
        self.drag(GestureSample::changed(Point::new(0.0, y), Point::new(0.0, vy)));
    }

    pub fn ended(&mut self, y: f32, vy: f32) {
        self.drag(GestureSample::ended(Point::new(0.0, y), Point::new(0.0, vy)));
    }

    pub fn cancelled(&mut self, y: f32, vy: f32) {
        self.drag(GestureSample::cancelled(Point::new(0.0, y), Point::new(0.0, vy)));
    }

    pub fn press(&mut self, phase: PressPhase) {
        let mut env = HostEnv::new(&mut self.host, &mut self.scene, &mut self.scheduler);
        self.controller.handle_press(phase, &mut env);
    }

    /// Scroll the monitored view as the user would and report the change
    pub fn scroll_to(&mut self, offset_y: f32) {
        let Some(scroll) = self.scroll else {
            return;
        };
        self.scene.scroll_to(scroll, offset_y);
        let mut env = HostEnv::new(&mut self.host, &mut self.scene, &mut self.scheduler);
        self.controller.on_scroll_offset_changed(scroll, &mut env);
    }

    pub fn dismiss(&mut self) -> bool {
        let mut env = HostEnv::new(&mut self.host, &mut self.scene, &mut self.scheduler);
        self.controller.dismiss(&mut env)
    }

    pub fn cancel_interaction(&mut self) {
        let mut env = HostEnv::new(&mut self.host, &mut self.scene, &mut self.scheduler);
        self.controller.cancel_interaction(&mut env);
    }

    /// Advance the clock in frames, forwarding every event to the controller
    pub fn advance(&mut self, ms: f32) {
        let mut remaining = ms;
        while remaining > 0.0 {
            let dt = remaining.min(FRAME_MS);
            remaining -= dt;
            let events = self.scheduler.tick(dt, &mut self.scene);
            let mut env = HostEnv::new(&mut self.host, &mut self.scene, &mut self.scheduler);
            for event in events {
                self.controller.handle_scheduler_event(event, &mut env);
            }
        }
    }

    /// Advance until nothing is scheduled
    pub fn run_until_idle(&mut self) {
        for _ in 0..1000 {
            if self.scheduler.is_idle() {
                return;
            }
            self.advance(FRAME_MS);
        }
        panic!("scheduler never went idle");
    }

    pub fn finished(&self) -> Vec<bool> {
        self.host
            .events
            .iter()
            .filter_map(|e| match e {
                HostEvent::TransitionFinished { did_dismiss } => Some(*did_dismiss),
                _ => None,
            })
            .collect()
    }

    pub fn resolutions(&self) -> Vec<bool> {
        self.host
            .events
            .iter()
            .filter_map(|e| match e {
                HostEvent::AttemptResolved { will_dismiss } => Some(*will_dismiss),
                _ => None,
            })
            .collect()
    }

    pub fn dimming_views(&self) -> Vec<ViewId> {
        self.scene.views_of_kind(|k| *k == ViewKind::Overlay)
    }

    pub fn snapshot_views(&self) -> Vec<ViewId> {
        self.scene
            .views_of_kind(|k| matches!(k, ViewKind::Snapshot { .. }))
    }

    pub fn bounces(&self) -> Option<bool> {
        let scroll = self.scroll?;
        self.scene.view(scroll)?.scroll.map(|m| m.bounces)
    }
}
