#![allow(non_snake_case)]
//! Layout nodes.
//!
//! A node tree is rebuilt by the content producer on every explicit refresh.
//! The host calls [`Node::layout`] once on the root with the container size,
//! then asks for the [`Node::items`] that intersect the visible rect. Frames
//! returned by `items` are in the node's own coordinate space.
//!
//! Containers ask their children for an intent with [`Node::measure`] and lay
//! each child out once, so a layout visits every leaf once however deep the
//! tree is.

pub mod cache;
pub mod nodes;
pub mod stack;

pub use cache::Cached;
pub use nodes::{Empty, FixedId, Inset, Item, Spacer};
pub use stack::{CrossAlign, Stack};

use mosaic_core::{EdgeInsets, LayoutSize, Rect, RenderItem, Size};

pub trait Node {
    /// Layout intent for `container`, without placing anything.
    ///
    /// Defaults to a full [`Node::layout`]; containers override it so that
    /// measuring does not recurse into placement.
    fn measure(&mut self, container: Size) -> LayoutSize {
        self.layout(container)
    }

    /// Computes the layout intent for `container` and places children for the
    /// size that intent resolves to.
    fn layout(&mut self, container: Size) -> LayoutSize;

    /// Size resolved by the most recent `layout` call.
    fn size(&self) -> Size;

    /// Items whose frames intersect `visible`, in node-local coordinates.
    fn items(&self, visible: Rect) -> Vec<RenderItem>;
}

pub type BoxNode = Box<dyn Node>;

impl Node for BoxNode {
    fn measure(&mut self, container: Size) -> LayoutSize {
        (**self).measure(container)
    }
    fn layout(&mut self, container: Size) -> LayoutSize {
        (**self).layout(container)
    }
    fn size(&self) -> Size {
        (**self).size()
    }
    fn items(&self, visible: Rect) -> Vec<RenderItem> {
        (**self).items(visible)
    }
}

pub trait NodeExt: Node + Sized + 'static {
    fn boxed(self) -> BoxNode {
        Box::new(self)
    }

    /// Memoizes layout for an unchanged container size.
    fn cached(self) -> Cached<Self> {
        Cached::new(self)
    }

    /// Pins every item below this node under `name`, regardless of position.
    fn fixed_id(self, name: impl Into<String>) -> FixedId<Self> {
        FixedId::new(name, self)
    }

    fn inset(self, insets: EdgeInsets) -> Inset<Self> {
        Inset::new(insets, self)
    }
}

impl<N: Node + Sized + 'static> NodeExt for N {}

pub fn VStack(spacing: f32) -> Stack {
    Stack::vertical().spacing(spacing)
}

pub fn HStack(spacing: f32) -> Stack {
    Stack::horizontal().spacing(spacing)
}
