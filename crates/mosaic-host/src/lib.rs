//! Render host: owns a container renderable and keeps its children in sync
//! with the tree a content producer builds.
//!
//! A pass lays the tree out in the container's bounds, queries the items that
//! intersect the visible rect and hands them to the [`Reconciler`]. Passes
//! never nest: a refresh requested while one runs (from the producer, a hook,
//! or an animation completion) is deferred to the next tick. Any number of
//! [`RenderHost::set_needs_refresh`] calls before a tick produce one pass.
//!
//! ```no_run
//! # use std::rc::Rc;
//! # use mosaic_core::*;
//! # use mosaic_ui::*;
//! # use mosaic_host::*;
//! # fn demo(container: Renderable, make: MakeFn) {
//! let ticks = TickFlag::new();
//! let host = RenderHost::new(
//!     container,
//!     move |_ctx: &RenderContext| {
//!         VStack(8.0)
//!             .child(Item::fixed(Size::new(100.0, 20.0), RenderItem::from_maker(make.clone())))
//!             .boxed()
//!     },
//!     Rc::new(ImmediateAnimator),
//!     ticks.clone(),
//!     HostConfig::default(),
//! );
//! host.set_bounds(Rect::new(0.0, 0.0, 320.0, 480.0));
//! host.refresh(false);
//! # }
//! ```

pub mod animator;
pub mod config;
pub mod reconcile;
mod tests;

pub use animator::TickAnimator;
pub use config::{AnimationPolicy, HostConfig, RenderContext, TickFlag, TickSource};
pub use reconcile::Reconciler;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use web_time::Instant;

use mosaic_core::{
    Animator, EdgeInsets, PassReport, Rect, RenderItem, RenderPassContext, Renderable, Size,
    UpdateKind, Vec2,
};
use mosaic_devtools::Inspector;
use mosaic_ui::{BoxNode, Node};

type Producer = Box<dyn Fn(&RenderContext) -> BoxNode>;

struct Layout {
    bounds: Rect,
    content_offset: Vec2,
    node: Option<BoxNode>,
    content_size: Size,
}

struct HostInner {
    container: Renderable,
    producer: Producer,
    reconciler: Reconciler,
    animator: Rc<dyn Animator>,
    ticks: Rc<dyn TickSource>,
    config: RefCell<HostConfig>,
    layout: RefCell<Layout>,
    inspector: RefCell<Option<Inspector>>,
    pass: Cell<u64>,
    in_pass: Cell<bool>,
    pending: Cell<Option<UpdateKind>>,
    tick_requested: Cell<bool>,
}

/// Shared handle to a render host.
#[derive(Clone)]
pub struct RenderHost {
    inner: Rc<HostInner>,
}

/// Non-owning back-reference to a [`RenderHost`]. Producers and hooks hold
/// this instead of the host so the host's producer never owns its owner.
#[derive(Clone, Default)]
pub struct WeakHost(Weak<HostInner>);

impl WeakHost {
    pub fn upgrade(&self) -> Option<RenderHost> {
        self.0.upgrade().map(|inner| RenderHost { inner })
    }

    /// Forwards to [`RenderHost::set_needs_refresh`]; no-op once the host is gone.
    pub fn set_needs_refresh(&self, animated: bool) {
        if let Some(host) = self.upgrade() {
            host.set_needs_refresh(animated);
        }
    }
}

/// Clears the in-pass flag on every exit path.
struct PassGuard<'a>(&'a Cell<bool>);

impl<'a> PassGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(PassGuard(flag))
        }
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Per-axis offset that centers `content` in `container` when it is smaller.
pub fn centering_offset(container: Size, content: Size) -> Vec2 {
    Vec2::new(
        ((container.width - content.width) / 2.0).max(0.0),
        ((container.height - content.height) / 2.0).max(0.0),
    )
}

impl RenderHost {
    pub fn new(
        container: Renderable,
        producer: impl Fn(&RenderContext) -> BoxNode + 'static,
        animator: Rc<dyn Animator>,
        ticks: Rc<dyn TickSource>,
        config: HostConfig,
    ) -> Self {
        let inspector = config.inspector.then(Inspector::new);
        let bounds = container.frame();
        Self {
            inner: Rc::new(HostInner {
                container,
                producer: Box::new(producer),
                reconciler: Reconciler::new(),
                animator,
                ticks,
                config: RefCell::new(config),
                layout: RefCell::new(Layout {
                    bounds: Rect::from_size(bounds.size()),
                    content_offset: Vec2::ZERO,
                    node: None,
                    content_size: Size::ZERO,
                }),
                inspector: RefCell::new(inspector),
                pass: Cell::new(0),
                in_pass: Cell::new(false),
                pending: Cell::new(None),
                tick_requested: Cell::new(false),
            }),
        }
    }

    pub fn downgrade(&self) -> WeakHost {
        WeakHost(Rc::downgrade(&self.inner))
    }

    /// Rebuilds the tree and reconciles right away. Returns `None` when
    /// called during a pass; the refresh then runs on the next tick.
    pub fn refresh(&self, animated: bool) -> Option<PassReport> {
        let kind = UpdateKind::Refresh { animated };
        if self.inner.in_pass.get() {
            self.defer(kind);
            return None;
        }
        // a synchronous refresh satisfies anything queued
        let kind = match self.inner.pending.take() {
            Some(queued) => queued.merge(kind),
            None => kind,
        };
        self.run_pass(kind)
    }

    /// Schedules a refresh for the next tick. Repeated calls coalesce.
    pub fn set_needs_refresh(&self, animated: bool) {
        self.defer(UpdateKind::Refresh { animated });
    }

    /// Runs the pending pass, if any. Call from the run loop after
    /// [`TickSource::request_tick`].
    pub fn tick(&self) -> Option<PassReport> {
        if self.inner.in_pass.get() {
            return None;
        }
        self.inner.tick_requested.set(false);
        let kind = self.inner.pending.take()?;
        self.run_pass(kind)
    }

    pub fn has_pending_refresh(&self) -> bool {
        self.inner.pending.get().is_some()
    }

    pub fn is_in_pass(&self) -> bool {
        self.inner.in_pass.get()
    }

    /// Size of the laid-out content as of the last pass.
    pub fn content_size(&self) -> Size {
        self.inner.layout.borrow().content_size
    }

    pub fn bounds(&self) -> Rect {
        self.inner.layout.borrow().bounds
    }

    /// Resizes the container. Lays the existing tree out again without
    /// calling the producer.
    pub fn set_bounds(&self, bounds: Rect) {
        {
            let mut layout = self.inner.layout.borrow_mut();
            if layout.bounds == bounds {
                return;
            }
            layout.bounds = bounds;
        }
        self.bounds_changed();
    }

    pub fn content_offset(&self) -> Vec2 {
        self.inner.layout.borrow().content_offset
    }

    /// Scrolls the visible rect to `offset` in content coordinates.
    pub fn set_content_offset(&self, offset: Vec2) {
        {
            let mut layout = self.inner.layout.borrow_mut();
            if layout.content_offset == offset {
                return;
            }
            layout.content_offset = offset;
        }
        self.bounds_changed();
    }

    pub fn visible_bounds_insets(&self) -> EdgeInsets {
        self.inner.config.borrow().visible_bounds_insets
    }

    pub fn set_visible_bounds_insets(&self, insets: EdgeInsets) {
        {
            let mut config = self.inner.config.borrow_mut();
            if config.visible_bounds_insets == insets {
                return;
            }
            config.visible_bounds_insets = insets;
        }
        self.bounds_changed();
    }

    pub fn set_animation_policy(&self, policy: AnimationPolicy) {
        self.inner.config.borrow_mut().animation_policy = policy;
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.inner.reconciler
    }

    pub fn container(&self) -> &Renderable {
        &self.inner.container
    }

    /// One-line inspector summary, when the inspector is enabled.
    pub fn inspector_summary(&self) -> Option<String> {
        self.inner.inspector.borrow().as_ref().map(Inspector::summary)
    }

    /// Detaches every renderable and drops the tree. From inside a pass the
    /// renderables are detached once that pass has finished.
    pub fn unmount(&self) {
        self.inner.pending.set(None);
        self.inner.layout.borrow_mut().node = None;
        self.inner.reconciler.clear();
    }

    fn bounds_changed(&self) {
        if self.inner.in_pass.get() {
            self.defer(UpdateKind::BoundsChange);
        } else {
            self.run_pass(UpdateKind::BoundsChange);
        }
    }

    fn defer(&self, kind: UpdateKind) {
        let merged = match self.inner.pending.get() {
            Some(queued) => queued.merge(kind),
            None => kind,
        };
        self.inner.pending.set(Some(merged));
        if !self.inner.tick_requested.replace(true) {
            self.inner.ticks.request_tick();
        }
    }

    fn run_pass(&self, kind: UpdateKind) -> Option<PassReport> {
        let inner = &*self.inner;
        let Some(_guard) = PassGuard::enter(&inner.in_pass) else {
            self.defer(kind);
            return None;
        };
        let started = Instant::now();

        let (bounds, content_offset, previous) = {
            let mut layout = inner.layout.borrow_mut();
            (layout.bounds, layout.content_offset, layout.node.take())
        };
        let (insets, policy) = {
            let config = inner.config.borrow();
            (config.visible_bounds_insets, config.animation_policy.clone())
        };

        let pass = inner.pass.get() + 1;
        let mut node = match (kind, previous) {
            (UpdateKind::BoundsChange, Some(node)) => node,
            (UpdateKind::BoundsChange, None) => {
                log::trace!("bounds changed before the first refresh; nothing to lay out");
                return None;
            }
            (UpdateKind::Refresh { .. }, _) => {
                let ctx = RenderContext {
                    pass,
                    kind,
                    bounds,
                    content_offset,
                    host: self.downgrade(),
                };
                (inner.producer)(&ctx)
            }
        };
        inner.pass.set(pass);

        let ctx = RenderPassContext {
            pass,
            kind,
            animated: policy.animates(kind),
        };

        let items = Self::visible_items(&mut node, bounds, content_offset, insets);
        let content_size = node.size();
        {
            let mut layout = inner.layout.borrow_mut();
            layout.node = Some(node);
            layout.content_size = content_size;
        }

        let count = items.len();
        let report = inner
            .reconciler
            .reconcile(items, &ctx, &inner.container, inner.animator.as_ref());

        log::debug!(
            "pass {pass} ({kind:?}, animated={}): {count} items, +{} ={} ~{} -{} removing {}",
            ctx.animated,
            report.inserted,
            report.reused,
            report.resurrected,
            report.removed + report.removing,
            report.pending_removals,
        );
        if let Some(inspector) = inner.inspector.borrow_mut().as_mut() {
            inspector.record(&report, count, started.elapsed());
        }
        Some(report)
    }

    /// Lays `node` out in `bounds` and returns the visible items in container
    /// coordinates, centered when the content is smaller than the container.
    fn visible_items(
        node: &mut BoxNode,
        bounds: Rect,
        content_offset: Vec2,
        insets: EdgeInsets,
    ) -> Vec<RenderItem> {
        let container = bounds.size();
        node.layout(container);
        let centering = centering_offset(container, node.size());

        let visible = Rect::from_size(container)
            .translate(content_offset)
            .inset_by(insets)
            .translate(-centering);

        node.items(visible)
            .into_iter()
            .map(|item| item.translated(centering))
            .collect()
    }
}
