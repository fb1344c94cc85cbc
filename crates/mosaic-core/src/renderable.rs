use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use crate::Rect;

bitflags! {
    /// Properties a layer may animate implicitly when mutated.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct AnimatedProps: u8 {
        const FRAME = 1;
        const OPACITY = 1 << 1;
        const TRANSFORM = 1 << 2;
        const ALL = Self::FRAME.bits() | Self::OPACITY.bits() | Self::TRANSFORM.bits();
    }
}

/// Operations every native handle supports, whatever backs it.
pub trait RenderableAdapter {
    fn frame(&self) -> Rect;
    fn set_frame(&self, frame: Rect);
    fn attach(&self, parent: &Renderable);
    fn detach(&self);
    fn bring_to_front(&self);
}

/// A view-backed handle.
pub trait NativeView: RenderableAdapter {}

/// A layer-backed handle. Layers animate some property changes on their own;
/// the host brackets synchronous mutations with a suppression marker.
pub trait NativeLayer: RenderableAdapter {
    fn push_implicit_suppression(&self, props: AnimatedProps);
    fn pop_implicit_suppression(&self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableKind {
    View,
    Layer,
}

/// Live native handle controlled by a render item.
#[derive(Clone)]
pub enum Renderable {
    View(Rc<dyn NativeView>),
    Layer(Rc<dyn NativeLayer>),
}

impl Renderable {
    pub fn view(v: impl NativeView + 'static) -> Self {
        Renderable::View(Rc::new(v))
    }

    pub fn layer(l: impl NativeLayer + 'static) -> Self {
        Renderable::Layer(Rc::new(l))
    }

    fn adapter(&self) -> &dyn RenderableAdapter {
        match self {
            Renderable::View(v) => v.as_ref(),
            Renderable::Layer(l) => l.as_ref(),
        }
    }

    pub fn kind(&self) -> RenderableKind {
        match self {
            Renderable::View(_) => RenderableKind::View,
            Renderable::Layer(_) => RenderableKind::Layer,
        }
    }

    pub fn frame(&self) -> Rect {
        self.adapter().frame()
    }

    pub fn set_frame(&self, frame: Rect) {
        self.adapter().set_frame(frame);
    }

    pub fn attach_to(&self, parent: &Renderable) {
        self.adapter().attach(parent);
    }

    pub fn detach(&self) {
        self.adapter().detach();
    }

    pub fn bring_to_front(&self) {
        self.adapter().bring_to_front();
    }

    /// Disables implicit animation of `props` until the guard drops.
    /// Views have no implicit animations; the guard is inert for them.
    pub fn suspend_implicit(&self, props: AnimatedProps) -> SuspendGuard {
        match self {
            Renderable::Layer(l) => {
                l.push_implicit_suppression(props);
                SuspendGuard {
                    layer: Some(l.clone()),
                }
            }
            Renderable::View(_) => SuspendGuard { layer: None },
        }
    }

    /// Sets the frame without letting a layer animate the change.
    pub fn snap_frame(&self, frame: Rect) {
        let _guard = self.suspend_implicit(AnimatedProps::FRAME);
        self.set_frame(frame);
    }

    /// Whether both handles point at the same native object.
    pub fn ptr_eq(&self, other: &Renderable) -> bool {
        match (self, other) {
            (Renderable::View(a), Renderable::View(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            (Renderable::Layer(a), Renderable::Layer(b)) => {
                std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Renderable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Renderable::View(v) => write!(f, "Renderable::View({:p})", Rc::as_ptr(v)),
            Renderable::Layer(l) => write!(f, "Renderable::Layer({:p})", Rc::as_ptr(l)),
        }
    }
}

/// Pops the implicit-animation suppression pushed by [`Renderable::suspend_implicit`].
#[must_use = "suppression ends when the guard is dropped"]
pub struct SuspendGuard {
    layer: Option<Rc<dyn NativeLayer>>,
}

impl Drop for SuspendGuard {
    fn drop(&mut self) {
        if let Some(l) = self.layer.take() {
            l.pop_implicit_suppression();
        }
    }
}
