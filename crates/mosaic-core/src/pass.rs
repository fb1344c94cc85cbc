/// What triggered a render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateKind {
    /// Explicit refresh: the content producer runs again.
    Refresh { animated: bool },
    /// Bounds or scroll offset moved: the previous node tree is laid out again.
    BoundsChange,
}

impl UpdateKind {
    pub fn requested_animation(&self) -> bool {
        matches!(self, UpdateKind::Refresh { animated: true })
    }

    /// Combines two requests waiting for the same tick. A refresh subsumes a
    /// bounds change; animation is requested if either side asked for it.
    pub fn merge(self, other: UpdateKind) -> UpdateKind {
        match (self, other) {
            (UpdateKind::Refresh { animated: a }, UpdateKind::Refresh { animated: b }) => {
                UpdateKind::Refresh { animated: a || b }
            }
            (r @ UpdateKind::Refresh { .. }, UpdateKind::BoundsChange)
            | (UpdateKind::BoundsChange, r @ UpdateKind::Refresh { .. }) => r,
            (UpdateKind::BoundsChange, UpdateKind::BoundsChange) => UpdateKind::BoundsChange,
        }
    }
}

/// Transient state for one pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderPassContext {
    pub pass: u64,
    pub kind: UpdateKind,
    pub animated: bool,
}

/// What a reconcile pass did, by id transition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    pub pass: u64,
    pub inserted: usize,
    pub reused: usize,
    pub resurrected: usize,
    /// Detached during the pass.
    pub removed: usize,
    /// Moved into the removing map with a pending transition.
    pub removing: usize,
    /// Size of the removing map once the pass finished.
    pub pending_removals: usize,
    /// Ids expected to be mounted that had no renderable.
    pub stale_skipped: usize,
}

impl PassReport {
    pub fn touched(&self) -> usize {
        self.inserted + self.reused + self.resurrected + self.removed + self.removing
    }
}
