use mosaic_core::{
    Axis, LayoutSize, Rect, RenderItem, Size, Sizing, Vec2, stack_layout, stack_offsets,
};

use crate::nodes::Spacer;
use crate::{BoxNode, Node};

/// Placement of children whose cross extent is smaller than the stack's.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CrossAlign {
    #[default]
    Start,
    Center,
    End,
    /// Children are offered the stack's full cross extent.
    Stretch,
}

struct Child {
    node: BoxNode,
    key: Option<String>,
}

/// Lays children out along one axis, sharing the main extent with
/// [`stack_layout`].
///
/// Children are identified by their key when given, by index otherwise.
/// Children entirely outside the visible rect produce no items.
pub struct Stack {
    axis: Axis,
    spacing: f32,
    align: CrossAlign,
    children: Vec<Child>,
    frames: Vec<Rect>,
    size: Size,
}

impl Stack {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            spacing: 0.0,
            align: CrossAlign::Start,
            children: Vec::new(),
            frames: Vec::new(),
            size: Size::ZERO,
        }
    }

    pub fn vertical() -> Self {
        Self::new(Axis::Vertical)
    }

    pub fn horizontal() -> Self {
        Self::new(Axis::Horizontal)
    }

    pub fn spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn align(mut self, align: CrossAlign) -> Self {
        self.align = align;
        self
    }

    pub fn child(mut self, node: impl Node + 'static) -> Self {
        self.children.push(Child {
            node: Box::new(node),
            key: None,
        });
        self
    }

    /// Adds a child identified by `key` instead of its index.
    pub fn keyed_child(mut self, key: impl Into<String>, node: impl Node + 'static) -> Self {
        self.children.push(Child {
            node: Box::new(node),
            key: Some(key.into()),
        });
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = BoxNode>) -> Self {
        self.children
            .extend(nodes.into_iter().map(|node| Child { node, key: None }));
        self
    }

    /// Flexible gap along the main axis.
    pub fn spacer(self) -> Self {
        let axis = self.axis;
        self.child(Spacer::along(axis))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Child frames from the last layout, in stack coordinates.
    pub fn frames(&self) -> &[Rect] {
        &self.frames
    }

    fn segment(&self, index: usize) -> String {
        match &self.children[index].key {
            Some(k) => k.clone(),
            None => index.to_string(),
        }
    }

    fn gaps(&self) -> f32 {
        self.spacing * self.children.len().saturating_sub(1) as f32
    }

    /// Child intents for `container`, split into main and cross axis.
    fn measure_children(&mut self, container: Size) -> (Vec<Sizing>, Vec<Sizing>) {
        let axis = self.axis;
        self.children
            .iter_mut()
            .map(|c| {
                let ls = c.node.measure(container);
                (ls.along(axis), ls.along(axis.cross()))
            })
            .unzip()
    }

    fn intent(&self, mains: &[Sizing], crosses: &[Sizing]) -> LayoutSize {
        let gaps = self.gaps();
        let main_min = (mains.iter().map(Sizing::min).sum::<f32>() + gaps).max(0.0);
        let main_max = (mains.iter().map(Sizing::max).sum::<f32>() + gaps).max(main_min);
        let cross_min = crosses.iter().map(Sizing::min).fold(0.0, f32::max);
        let cross_max = crosses.iter().map(Sizing::max).fold(0.0, f32::max);
        let own_main = Sizing::range(main_min, main_max).normalized();
        let own_cross = Sizing::range(cross_min, cross_max).normalized();

        match self.axis {
            Axis::Horizontal => LayoutSize::new(own_main, own_cross),
            Axis::Vertical => LayoutSize::new(own_cross, own_main),
        }
    }
}

impl Node for Stack {
    fn measure(&mut self, container: Size) -> LayoutSize {
        if self.children.is_empty() {
            return LayoutSize::fixed(Size::ZERO);
        }
        let (mains, crosses) = self.measure_children(container);
        self.intent(&mains, &crosses)
    }

    fn layout(&mut self, container: Size) -> LayoutSize {
        let axis = self.axis;
        let cross_axis = axis.cross();
        self.frames.clear();

        if self.children.is_empty() {
            self.size = Size::ZERO;
            return LayoutSize::fixed(Size::ZERO);
        }

        let (mains, crosses) = self.measure_children(container);
        let own = self.intent(&mains, &crosses);
        self.size = own.resolve(container);

        let available = axis.extent(container) - self.gaps();
        let allocations = stack_layout(available, &mains);
        if log::log_enabled!(log::Level::Trace) {
            let used: f32 = allocations.iter().sum();
            if used > available {
                log::trace!("{axis:?} stack overflows by {}", used - available);
            }
        }

        let stack_cross = cross_axis.extent(self.size);
        let offsets = stack_offsets(&allocations, self.spacing);
        for (i, child) in self.children.iter_mut().enumerate() {
            let cross = match self.align {
                CrossAlign::Stretch => stack_cross,
                _ => crosses[i].resolve(stack_cross),
            };
            child.node.layout(axis.pack(allocations[i], cross));
            let size = child.node.size();

            let slack = stack_cross - cross_axis.extent(size);
            let cross_offset = match self.align {
                CrossAlign::Start | CrossAlign::Stretch => 0.0,
                CrossAlign::Center => slack / 2.0,
                CrossAlign::End => slack,
            };
            let origin = match axis {
                Axis::Horizontal => Vec2::new(offsets[i], cross_offset),
                Axis::Vertical => Vec2::new(cross_offset, offsets[i]),
            };
            self.frames.push(Rect {
                x: origin.x,
                y: origin.y,
                w: size.width,
                h: size.height,
            });
        }

        own
    }

    fn size(&self) -> Size {
        self.size
    }

    fn items(&self, visible: Rect) -> Vec<RenderItem> {
        let mut out = Vec::new();
        for (i, (child, frame)) in self.children.iter().zip(&self.frames).enumerate() {
            if !frame.intersects(&visible) {
                continue;
            }
            let origin = frame.origin();
            let local = visible.translate(-origin);
            let segment = self.segment(i);
            out.extend(
                child
                    .node
                    .items(local)
                    .into_iter()
                    .map(|item| item.placed(&segment, origin)),
            );
        }
        out
    }
}
