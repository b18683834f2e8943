//! Scripted Dismiss Demo
//!
//! Drives a headless sheet through a few scripted gestures and prints what
//! the host is told:
//! - A slow short drag that springs back
//! - A fast flick that dismisses
//! - A drag right after a deep scroll, which is refused
//!
//! Pass a TOML file to override the defaults.
//!
//! Run with: cargo run -p swipeaway --example scripted_dismiss [config.toml]

use swipeaway::{
    DismissConfig, DismissContext, DismissController, DismissHost, HostEnv, Result,
    TransitionVariant,
};
use swipeaway_animation::AnimationScheduler;
use swipeaway_core::{GestureSample, Point, Rect, Scene, ViewId};

const BOUNDS: Rect = Rect::new(0.0, 0.0, 390.0, 844.0);

struct Sheet {
    content: ViewId,
}

impl DismissHost for Sheet {
    fn container_bounds(&self) -> Rect {
        BOUNDS
    }

    fn presented_view(&self) -> Option<ViewId> {
        Some(self.content)
    }

    fn begin_dismissal(&mut self, context: &DismissContext) {
        println!("  host: dismissing at progress {:.2}", context.progress);
    }

    fn on_attempt_began(&mut self, _context: &DismissContext) {
        println!("  host: attempt began");
    }

    fn on_attempt_resolved(&mut self, _context: &DismissContext, will_dismiss: bool) {
        println!("  host: attempt resolved, will dismiss: {}", will_dismiss);
    }

    fn on_transition_finished(&mut self, _context: &DismissContext, did_dismiss: bool) {
        println!("  host: transition finished, did dismiss: {}", did_dismiss);
    }
}

struct Stage {
    scene: Scene,
    scheduler: AnimationScheduler,
    sheet: Sheet,
    scroll: ViewId,
    controller: DismissController,
}

impl Stage {
    fn new(variant: TransitionVariant, config: DismissConfig) -> Self {
        let mut scene = Scene::new();
        let content = scene.add_view(BOUNDS);
        let scroll = scene.add_scroll_view(BOUNDS, BOUNDS.height() * 8.0);
        let mut stage = Self {
            scene,
            scheduler: AnimationScheduler::new(),
            sheet: Sheet { content },
            scroll,
            controller: DismissController::new(variant, config),
        };
        let mut env = HostEnv::new(&mut stage.sheet, &mut stage.scene, &mut stage.scheduler);
        stage.controller.monitor(scroll, &mut env);
        stage
    }

    fn drag(&mut self, samples: &[GestureSample]) {
        for sample in samples {
            let mut env = HostEnv::new(&mut self.sheet, &mut self.scene, &mut self.scheduler);
            self.controller.handle_drag(sample, &mut env);
            println!("  progress {:.3}", self.controller.progress());
        }
    }

    fn scroll_to(&mut self, offset_y: f32) {
        self.scene.scroll_to(self.scroll, offset_y);
        let mut env = HostEnv::new(&mut self.sheet, &mut self.scene, &mut self.scheduler);
        self.controller.on_scroll_offset_changed(self.scroll, &mut env);
    }

    /// Run 60fps frames until nothing is scheduled
    fn settle(&mut self) {
        while !self.scheduler.is_idle() {
            let events = self.scheduler.tick(1000.0 / 60.0, &mut self.scene);
            let mut env = HostEnv::new(&mut self.sheet, &mut self.scene, &mut self.scheduler);
            for event in events {
                self.controller.handle_scheduler_event(event, &mut env);
            }
        }
    }
}

fn drag_script(to_y: f32, release_velocity: f32) -> Vec<GestureSample> {
    let velocity = Point::new(0.0, 600.0);
    let mut samples = vec![GestureSample::began(Point::ZERO, velocity)];
    for step in 1..=4 {
        samples.push(GestureSample::changed(
            Point::new(0.0, to_y * step as f32 / 4.0),
            velocity,
        ));
    }
    samples.push(GestureSample::ended(
        Point::new(0.0, to_y),
        Point::new(0.0, release_velocity),
    ));
    samples
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => DismissConfig::load(path)?,
        None => DismissConfig::default(),
    };

    for variant in [
        TransitionVariant::SlideStatic,
        TransitionVariant::SlideDynamic,
        TransitionVariant::Scale,
    ] {
        println!("{:?} ({}ms)", variant, variant.duration_ms(&config));
        let mut stage = Stage::new(variant, config.clone());

        println!(" slow short drag:");
        stage.drag(&drag_script(120.0, 40.0));
        stage.settle();

        println!(" flick:");
        stage.drag(&drag_script(100.0, 1500.0));
        stage.settle();

        let mut stage = Stage::new(variant, config.clone());
        println!(" drag after a deep scroll:");
        stage.scroll_to(BOUNDS.height() * 2.5);
        stage.scroll_to(0.0);
        stage.drag(&drag_script(300.0, 1500.0));
        stage.settle();
    }

    Ok(())
}
