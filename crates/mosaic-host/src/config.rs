use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use mosaic_core::{EdgeInsets, Rect, UpdateKind, Vec2};

use crate::WeakHost;

/// Decides whether a pass animates.
#[derive(Clone, Default)]
pub enum AnimationPolicy {
    /// Animate explicit refreshes that asked for it; bounds changes snap.
    #[default]
    FollowRequest,
    Never,
    Always,
    Custom(Rc<dyn Fn(UpdateKind) -> bool>),
}

impl AnimationPolicy {
    pub fn animates(&self, kind: UpdateKind) -> bool {
        match self {
            AnimationPolicy::FollowRequest => kind.requested_animation(),
            AnimationPolicy::Never => false,
            AnimationPolicy::Always => true,
            AnimationPolicy::Custom(f) => f(kind),
        }
    }
}

impl fmt::Debug for AnimationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationPolicy::FollowRequest => write!(f, "FollowRequest"),
            AnimationPolicy::Never => write!(f, "Never"),
            AnimationPolicy::Always => write!(f, "Always"),
            AnimationPolicy::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct HostConfig {
    /// Applied to the visible rect before culling. Negative values extend it
    /// past the bounds so items just off screen are mounted early.
    pub visible_bounds_insets: EdgeInsets,
    pub animation_policy: AnimationPolicy,
    /// Record per-pass metrics in an [`mosaic_devtools::Inspector`].
    pub inspector: bool,
}

impl HostConfig {
    pub fn visible_bounds_insets(mut self, insets: EdgeInsets) -> Self {
        self.visible_bounds_insets = insets;
        self
    }

    pub fn animation_policy(mut self, policy: AnimationPolicy) -> Self {
        self.animation_policy = policy;
        self
    }

    pub fn inspector(mut self, enabled: bool) -> Self {
        self.inspector = enabled;
        self
    }
}

/// Run-loop hook. `request_tick` asks the embedder to call
/// [`crate::RenderHost::tick`] on a later turn; it must not call it inline.
pub trait TickSource {
    fn request_tick(&self);
}

impl<F: Fn()> TickSource for F {
    fn request_tick(&self) {
        self()
    }
}

/// Tick source for embedders that poll once per turn.
#[derive(Debug, Default)]
pub struct TickFlag(Cell<bool>);

impl TickFlag {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    /// Clears the flag, returning whether a tick was requested.
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }
}

impl TickSource for TickFlag {
    fn request_tick(&self) {
        self.0.set(true);
    }
}

/// What the content producer sees when it builds a tree.
#[derive(Clone)]
pub struct RenderContext {
    pub pass: u64,
    pub kind: UpdateKind,
    /// Container bounds; the tree is laid out in `bounds.size()`.
    pub bounds: Rect,
    pub content_offset: Vec2,
    pub(crate) host: WeakHost,
}

impl RenderContext {
    /// Non-owning handle back to the host running this pass.
    pub fn host(&self) -> &WeakHost {
        &self.host
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("pass", &self.pass)
            .field("kind", &self.kind)
            .field("bounds", &self.bounds)
            .field("content_offset", &self.content_offset)
            .finish_non_exhaustive()
    }
}
