use std::cell::Cell;

use mosaic_core::{LayoutSize, Rect, RenderItem, Size};

use crate::Node;

/// Memoizes the last layout of `N`.
///
/// When `layout` is called again with exactly the same container size the
/// previous result is returned and the wrapped node is not visited. This keeps
/// scroll-only passes from relaying out the whole tree.
pub struct Cached<N> {
    inner: N,
    last: Option<(Size, LayoutSize)>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<N: Node> Cached<N> {
    pub fn new(inner: N) -> Self {
        Self {
            inner,
            last: None,
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Forgets the cached result; the next layout recurses.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn inner(&self) -> &N {
        &self.inner
    }

    /// Mutable access invalidates the cache.
    pub fn inner_mut(&mut self) -> &mut N {
        self.last = None;
        &mut self.inner
    }

    /// `(hits, misses)`. A miss is a layout that recursed; measuring an
    /// unchanged container counts as a hit.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits.get(), self.misses.get())
    }
}

impl<N: Node> Node for Cached<N> {
    fn measure(&mut self, container: Size) -> LayoutSize {
        if let Some((size, result)) = self.last
            && size == container
        {
            self.hits.set(self.hits.get() + 1);
            return result;
        }
        self.inner.measure(container)
    }

    fn layout(&mut self, container: Size) -> LayoutSize {
        if let Some((size, result)) = self.last
            && size == container
        {
            self.hits.set(self.hits.get() + 1);
            return result;
        }
        self.misses.set(self.misses.get() + 1);
        let result = self.inner.layout(container);
        self.last = Some((container, result));
        result
    }

    fn size(&self) -> Size {
        self.inner.size()
    }

    fn items(&self, visible: Rect) -> Vec<RenderItem> {
        self.inner.items(visible)
    }
}
