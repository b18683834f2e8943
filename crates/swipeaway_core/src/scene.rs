//! View arena and the compositing seam
//!
//! The dismiss controller never owns host views. It addresses them through
//! [`ViewId`] handles and mutates them through the [`Compositor`] trait, which
//! the host passes in per call. A handle whose view has been destroyed simply
//! stops resolving: every [`Compositor`] operation on it is a no-op.
//!
//! [`Scene`] is a headless implementation used by tests and demos, and as a
//! reference for hosts wiring a real compositor.

use slotmap::{new_key_type, SlotMap};
use tracing::trace;

use crate::geometry::{Color, Rect};

new_key_type! {
    /// Handle to a view living in the host's compositing tree
    pub struct ViewId;
}

/// Animatable view properties
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewProperty {
    /// Alpha in 0.0..=1.0
    Opacity,
    /// Vertical offset in points, positive moves down
    TranslateY,
    /// Uniform scale around the view center
    Scale,
    /// Corner radius in points
    CornerRadius,
}

impl ViewProperty {
    /// Value a freshly created view starts with
    pub fn identity(&self) -> f32 {
        match self {
            ViewProperty::Opacity | ViewProperty::Scale => 1.0,
            ViewProperty::TranslateY | ViewProperty::CornerRadius => 0.0,
        }
    }
}

/// Scroll state of a scrollable container
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMetrics {
    /// Current vertical content offset
    pub offset_y: f32,
    /// Offset at which content rests against its top edge (negative top inset)
    pub top_edge: f32,
    /// Height of the visible viewport
    pub viewport_height: f32,
    /// Total height of the scrolled content
    pub content_height: f32,
    /// Native elastic overscroll
    pub bounces: bool,
    /// Whether the user can scroll the container
    pub scroll_enabled: bool,
}

impl ScrollMetrics {
    pub fn new(viewport_height: f32, content_height: f32) -> Self {
        Self {
            offset_y: 0.0,
            top_edge: 0.0,
            viewport_height,
            content_height,
            bounces: true,
            scroll_enabled: true,
        }
    }

    /// Scrolled to the top edge, or pulled past it
    pub fn is_at_top(&self) -> bool {
        self.offset_y <= self.top_edge
    }

    /// How far the content is scrolled below its top edge
    pub fn distance_past_top(&self) -> f32 {
        self.offset_y - self.top_edge
    }
}

/// Role of a view in the scene
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewKind {
    /// Host-owned content
    Content,
    /// Flat colored overlay (dimming scrim)
    Overlay,
    /// Static visual copy of another view
    Snapshot { source: ViewId },
    /// Scrollable container
    Scroll,
}

/// Where to insert a new view in the z-order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Above(ViewId),
    Below(ViewId),
    Front,
}

/// Compositing operations the dismiss controller needs from its host
pub trait Compositor {
    /// Whether the handle still resolves to a live view
    fn contains(&self, view: ViewId) -> bool;

    /// Insert a flat colored view
    fn insert_overlay(&mut self, frame: Rect, color: Color, placement: Placement) -> ViewId;

    /// Insert a static copy of `source`; `None` when `source` is gone
    fn insert_snapshot(&mut self, source: ViewId, placement: Placement) -> Option<ViewId>;

    /// Remove a view; returns `false` when it was already gone
    fn remove_view(&mut self, view: ViewId) -> bool;

    fn set_hidden(&mut self, view: ViewId, hidden: bool);

    fn property(&self, view: ViewId, property: ViewProperty) -> Option<f32>;

    fn set_property(&mut self, view: ViewId, property: ViewProperty, value: f32);

    /// Scroll state, `None` when the view is gone or not scrollable
    fn scroll_metrics(&self, view: ViewId) -> Option<ScrollMetrics>;

    fn set_bounces(&mut self, view: ViewId, bounces: bool);

    fn set_scroll_offset_y(&mut self, view: ViewId, offset_y: f32);
}

/// A view in the headless scene
#[derive(Clone, Debug, PartialEq)]
pub struct ViewNode {
    pub kind: ViewKind,
    pub frame: Rect,
    pub background: Option<Color>,
    pub hidden: bool,
    pub opacity: f32,
    pub translate_y: f32,
    pub scale: f32,
    pub corner_radius: f32,
    pub scroll: Option<ScrollMetrics>,
}

impl ViewNode {
    fn new(kind: ViewKind, frame: Rect) -> Self {
        Self {
            kind,
            frame,
            background: None,
            hidden: false,
            opacity: 1.0,
            translate_y: 0.0,
            scale: 1.0,
            corner_radius: 0.0,
            scroll: None,
        }
    }

    pub fn get(&self, property: ViewProperty) -> f32 {
        match property {
            ViewProperty::Opacity => self.opacity,
            ViewProperty::TranslateY => self.translate_y,
            ViewProperty::Scale => self.scale,
            ViewProperty::CornerRadius => self.corner_radius,
        }
    }

    pub fn set(&mut self, property: ViewProperty, value: f32) {
        match property {
            ViewProperty::Opacity => self.opacity = value.clamp(0.0, 1.0),
            ViewProperty::TranslateY => self.translate_y = value,
            ViewProperty::Scale => self.scale = value,
            ViewProperty::CornerRadius => self.corner_radius = value.max(0.0),
        }
    }
}

/// Headless compositing tree
///
/// Views live in a slotmap arena; `order` holds them back to front.
#[derive(Default)]
pub struct Scene {
    views: SlotMap<ViewId, ViewNode>,
    order: Vec<ViewId>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            views: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Add a host content view at the front
    pub fn add_view(&mut self, frame: Rect) -> ViewId {
        self.insert(ViewNode::new(ViewKind::Content, frame), Placement::Front)
    }

    /// Add a scrollable container at the front
    pub fn add_scroll_view(&mut self, frame: Rect, content_height: f32) -> ViewId {
        let mut node = ViewNode::new(ViewKind::Scroll, frame);
        node.scroll = Some(ScrollMetrics::new(frame.height(), content_height));
        self.insert(node, Placement::Front)
    }

    /// Scroll as the user would; the host reports the change separately
    pub fn scroll_to(&mut self, view: ViewId, offset_y: f32) {
        if let Some(scroll) = self.views.get_mut(view).and_then(|v| v.scroll.as_mut()) {
            scroll.offset_y = offset_y;
        }
    }

    pub fn set_scroll_enabled(&mut self, view: ViewId, enabled: bool) {
        if let Some(scroll) = self.views.get_mut(view).and_then(|v| v.scroll.as_mut()) {
            scroll.scroll_enabled = enabled;
        }
    }

    pub fn set_top_edge(&mut self, view: ViewId, top_edge: f32) {
        if let Some(scroll) = self.views.get_mut(view).and_then(|v| v.scroll.as_mut()) {
            scroll.top_edge = top_edge;
        }
    }

    pub fn view(&self, view: ViewId) -> Option<&ViewNode> {
        self.views.get(view)
    }

    pub fn is_hidden(&self, view: ViewId) -> Option<bool> {
        self.views.get(view).map(|v| v.hidden)
    }

    /// Views back to front
    pub fn z_order(&self) -> &[ViewId] {
        &self.order
    }

    /// Views of a given kind, back to front
    pub fn views_of_kind(&self, matches: impl Fn(&ViewKind) -> bool) -> Vec<ViewId> {
        self.order
            .iter()
            .copied()
            .filter(|id| self.views.get(*id).is_some_and(|v| matches(&v.kind)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    fn insert(&mut self, node: ViewNode, placement: Placement) -> ViewId {
        let id = self.views.insert(node);
        let index = match placement {
            Placement::Front => None,
            Placement::Above(anchor) => self.order.iter().position(|v| *v == anchor).map(|i| i + 1),
            Placement::Below(anchor) => self.order.iter().position(|v| *v == anchor),
        };
        match index {
            Some(i) => self.order.insert(i, id),
            None => self.order.push(id),
        }
        id
    }
}

impl Compositor for Scene {
    fn contains(&self, view: ViewId) -> bool {
        self.views.contains_key(view)
    }

    fn insert_overlay(&mut self, frame: Rect, color: Color, placement: Placement) -> ViewId {
        let mut node = ViewNode::new(ViewKind::Overlay, frame);
        node.background = Some(color);
        self.insert(node, placement)
    }

    fn insert_snapshot(&mut self, source: ViewId, placement: Placement) -> Option<ViewId> {
        let original = self.views.get(source)?;
        let mut node = original.clone();
        node.kind = ViewKind::Snapshot { source };
        node.hidden = false;
        node.scroll = None;
        Some(self.insert(node, placement))
    }

    fn remove_view(&mut self, view: ViewId) -> bool {
        if self.views.remove(view).is_none() {
            return false;
        }
        self.order.retain(|v| *v != view);
        trace!("scene: removed view {:?}", view);
        true
    }

    fn set_hidden(&mut self, view: ViewId, hidden: bool) {
        if let Some(node) = self.views.get_mut(view) {
            node.hidden = hidden;
        }
    }

    fn property(&self, view: ViewId, property: ViewProperty) -> Option<f32> {
        self.views.get(view).map(|v| v.get(property))
    }

    fn set_property(&mut self, view: ViewId, property: ViewProperty, value: f32) {
        if let Some(node) = self.views.get_mut(view) {
            node.set(property, value);
        }
    }

    fn scroll_metrics(&self, view: ViewId) -> Option<ScrollMetrics> {
        self.views.get(view).and_then(|v| v.scroll)
    }

    fn set_bounces(&mut self, view: ViewId, bounces: bool) {
        if let Some(scroll) = self.views.get_mut(view).and_then(|v| v.scroll.as_mut()) {
            scroll.bounces = bounces;
        }
    }

    fn set_scroll_offset_y(&mut self, view: ViewId, offset_y: f32) {
        self.scroll_to(view, offset_y);
    }
}
