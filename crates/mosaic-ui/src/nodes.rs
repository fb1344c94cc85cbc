use mosaic_core::{
    Axis, EdgeInsets, LayoutSize, Rect, RenderItem, Renderable, Size, Sizing, Vec2,
};

use crate::Node;

/// Leaf node: one render item sized by a fixed intent.
pub struct Item {
    sizing: LayoutSize,
    template: RenderItem,
    size: Size,
}

impl Item {
    pub fn new(sizing: LayoutSize, template: RenderItem) -> Self {
        Self {
            sizing,
            template,
            size: Size::ZERO,
        }
    }

    pub fn fixed(size: Size, template: RenderItem) -> Self {
        Self::new(LayoutSize::fixed(size), template)
    }

    /// Leaf whose item is built by `make` with no hooks attached.
    pub fn with_make(sizing: LayoutSize, make: impl Fn() -> Renderable + 'static) -> Self {
        Self::new(sizing, RenderItem::new(make))
    }

    /// Adjusts the template, e.g. to attach hooks or transitions.
    pub fn map(mut self, f: impl FnOnce(RenderItem) -> RenderItem) -> Self {
        self.template = f(self.template);
        self
    }
}

impl Node for Item {
    fn measure(&mut self, _container: Size) -> LayoutSize {
        self.sizing
    }

    fn layout(&mut self, container: Size) -> LayoutSize {
        self.size = self.sizing.resolve(container);
        self.sizing
    }

    fn size(&self) -> Size {
        self.size
    }

    fn items(&self, visible: Rect) -> Vec<RenderItem> {
        let frame = Rect::from_size(self.size);
        if frame.intersects(&visible) {
            vec![self.template.clone().frame(frame)]
        } else {
            vec![]
        }
    }
}

/// Flexible gap along one axis, zero across it.
#[derive(Clone, Copy, Debug)]
pub struct Spacer {
    axis: Axis,
    min: f32,
    size: Size,
}

impl Spacer {
    pub fn along(axis: Axis) -> Self {
        Self {
            axis,
            min: 0.0,
            size: Size::ZERO,
        }
    }

    pub fn min_length(mut self, min: f32) -> Self {
        self.min = min.max(0.0);
        self
    }
}

impl Node for Spacer {
    fn measure(&mut self, _container: Size) -> LayoutSize {
        let main = Sizing::at_least(self.min).normalized();
        match self.axis {
            Axis::Horizontal => LayoutSize::new(main, Sizing::Fixed(0.0)),
            Axis::Vertical => LayoutSize::new(Sizing::Fixed(0.0), main),
        }
    }

    fn layout(&mut self, container: Size) -> LayoutSize {
        let ls = self.measure(container);
        self.size = ls.resolve(container);
        ls
    }

    fn size(&self) -> Size {
        self.size
    }

    fn items(&self, _visible: Rect) -> Vec<RenderItem> {
        vec![]
    }
}

/// Nothing at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct Empty;

impl Node for Empty {
    fn layout(&mut self, _container: Size) -> LayoutSize {
        LayoutSize::fixed(Size::ZERO)
    }

    fn size(&self) -> Size {
        Size::ZERO
    }

    fn items(&self, _visible: Rect) -> Vec<RenderItem> {
        vec![]
    }
}

/// Pads a node. Transparent for ids.
pub struct Inset<N> {
    insets: EdgeInsets,
    inner: N,
    size: Size,
}

impl<N: Node> Inset<N> {
    pub fn new(insets: EdgeInsets, inner: N) -> Self {
        Self {
            insets,
            inner,
            size: Size::ZERO,
        }
    }

    fn shrink(&self, s: Size) -> Size {
        Size {
            width: (s.width - self.insets.horizontal()).max(0.0),
            height: (s.height - self.insets.vertical()).max(0.0),
        }
    }

    fn grow(extra: f32, s: Sizing) -> Sizing {
        match s {
            Sizing::Fixed(v) => Sizing::Fixed((v + extra).max(0.0)),
            other => {
                let min = (other.min() + extra).max(0.0);
                Sizing::range(min, (other.max() + extra).max(min)).normalized()
            }
        }
    }
}

impl<N: Node> Node for Inset<N> {
    fn measure(&mut self, container: Size) -> LayoutSize {
        let inner = self.inner.measure(self.shrink(container));
        LayoutSize {
            width: Self::grow(self.insets.horizontal(), inner.width),
            height: Self::grow(self.insets.vertical(), inner.height),
        }
    }

    fn layout(&mut self, container: Size) -> LayoutSize {
        let own = self.measure(container);
        self.size = own.resolve(container);
        self.inner.layout(self.shrink(self.size));
        own
    }

    fn size(&self) -> Size {
        self.size
    }

    fn items(&self, visible: Rect) -> Vec<RenderItem> {
        let origin = Vec2::new(self.insets.left, self.insets.top);
        self.inner
            .items(visible.translate(-origin))
            .into_iter()
            .map(|item| item.translated(origin))
            .collect()
    }
}

/// Identity override: items below keep their ids when this node moves.
pub struct FixedId<N> {
    name: String,
    inner: N,
}

impl<N: Node> FixedId<N> {
    pub fn new(name: impl Into<String>, inner: N) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }
}

impl<N: Node> Node for FixedId<N> {
    fn measure(&mut self, container: Size) -> LayoutSize {
        self.inner.measure(container)
    }

    fn layout(&mut self, container: Size) -> LayoutSize {
        self.inner.layout(container)
    }

    fn size(&self) -> Size {
        self.inner.size()
    }

    fn items(&self, visible: Rect) -> Vec<RenderItem> {
        self.inner
            .items(visible)
            .into_iter()
            .map(|mut item| {
                if !item.id.is_fixed() {
                    item.id = item.id.pinned(&self.name);
                }
                item
            })
            .collect()
    }
}
