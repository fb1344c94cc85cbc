//! Diffing of render items against live renderables.
//!
//! Each id moves through `absent -> mounted -> removing -> absent`, with a
//! shortcut from `removing` back to `mounted` when the id reappears before its
//! removal transition completes. A resurrected renderable is the same native
//! object that was leaving; its pending completion is cancelled so the late
//! callback cannot detach it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use mosaic_core::{
    Animator, CancelHandle, Completion, NodeId, PassReport, Rect, RenderItem, RenderPassContext,
    Renderable,
};

struct Mounted {
    renderable: Renderable,
    item: RenderItem,
    /// Frame last written or animated towards.
    target: Rect,
    /// Guards the `did_insert` of a running insert transition.
    inserting: CancelHandle,
}

struct Removing {
    renderable: Renderable,
    item: RenderItem,
    cancel: CancelHandle,
}

#[derive(Default)]
struct State {
    mounted: HashMap<NodeId, Mounted>,
    removing: HashMap<NodeId, Removing>,
    /// Mounted ids in the order of the last pass.
    order: Vec<NodeId>,
}

impl State {
    /// Takes the removal entry if `token` still owns it.
    fn finish_removal(&mut self, id: &NodeId, token: &CancelHandle) -> Option<Removing> {
        match self.removing.get(id) {
            Some(r) if r.cancel.same_as(token) => self.removing.remove(id),
            _ => None,
        }
    }
}

/// Where an incoming item's renderable comes from.
enum Slot {
    Resurrect(Removing),
    Reuse { renderable: Renderable, target: Rect },
    Insert,
}

/// Completions that fired while a pass was running.
type Finished = Rc<RefCell<Vec<(NodeId, CancelHandle)>>>;

/// Marks a pass as running until dropped.
struct Active<'a>(&'a Cell<bool>);

impl<'a> Active<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        assert!(!flag.replace(true), "reconcile re-entered from a hook");
        Active(flag)
    }
}

impl Drop for Active<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Keeps live renderables in step with each pass's render items.
///
/// No borrow of the internal state is held while lifecycle hooks or the
/// animator run, so hooks may call the read-only queries, or
/// [`Reconciler::clear`], which is postponed to the end of a running pass.
#[derive(Default)]
pub struct Reconciler {
    state: Rc<RefCell<State>>,
    finished: Finished,
    active: Rc<Cell<bool>>,
    clear_requested: Cell<bool>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one pass worth of items, in order, below `container`.
    ///
    /// Ids no longer present are classified and removed before any new or
    /// reused item is touched. Panics if two items share an id.
    pub fn reconcile(
        &self,
        items: Vec<RenderItem>,
        ctx: &RenderPassContext,
        container: &Renderable,
        animator: &dyn Animator,
    ) -> PassReport {
        let mut report = PassReport {
            pass: ctx.pass,
            ..PassReport::default()
        };

        let mut next: HashMap<NodeId, usize> = HashMap::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let prev = next.insert(item.id.clone(), i);
            assert!(
                prev.is_none(),
                "duplicate render item id {:?} in pass {}",
                item.id,
                ctx.pass
            );
        }

        let active = Active::enter(&self.active);

        let leaving: Vec<(NodeId, Option<Mounted>)> = {
            let mut st = self.state.borrow_mut();
            let previous = st.order.clone();
            previous
                .into_iter()
                .filter(|id| !next.contains_key(id))
                .map(|id| {
                    let entry = st.mounted.remove(&id);
                    (id, entry)
                })
                .collect()
        };
        for (id, entry) in leaving {
            self.remove(&id, entry, ctx, animator, &mut report);
        }

        let mut order = Vec::with_capacity(next.len());
        for item in items {
            let id = item.id.clone();
            let (renderable, target) = match self.classify(&id) {
                Slot::Insert => {
                    log::trace!("pass {}: insert {id}", ctx.pass);
                    let (renderable, inserting) = Self::insert(&item, ctx, container, animator);
                    let target = item.frame;
                    self.state.borrow_mut().mounted.insert(
                        id.clone(),
                        Mounted {
                            renderable,
                            item,
                            target,
                            inserting,
                        },
                    );
                    report.inserted += 1;
                    order.push(id);
                    continue;
                }
                Slot::Resurrect(r) => {
                    log::trace!("pass {}: resurrect {id}", ctx.pass);
                    r.cancel.cancel();
                    let renderable = r.renderable.clone();
                    self.state.borrow_mut().mounted.insert(
                        id.clone(),
                        Mounted {
                            renderable: r.renderable,
                            item: r.item,
                            target: Rect::ZERO,
                            inserting: CancelHandle::new(),
                        },
                    );
                    animator.cancel(&renderable);
                    report.resurrected += 1;
                    (renderable, None)
                }
                Slot::Reuse { renderable, target } => {
                    report.reused += 1;
                    (renderable, Some(target))
                }
            };

            Self::update(&renderable, &item, target, ctx, animator);
            if let Some(m) = self.state.borrow_mut().mounted.get_mut(&id) {
                m.target = item.frame;
                m.item = item;
            }
            order.push(id);
        }
        self.state.borrow_mut().order = order;

        self.drain_finished(&mut report);
        drop(active);

        if self.clear_requested.take() {
            log::debug!("pass {}: clearing after the pass", ctx.pass);
            self.clear();
        }
        report.pending_removals = self.state.borrow().removing.len();
        report
    }

    fn classify(&self, id: &NodeId) -> Slot {
        let mut st = self.state.borrow_mut();
        if let Some(r) = st.removing.remove(id) {
            return Slot::Resurrect(r);
        }
        match st.mounted.get(id) {
            Some(m) => Slot::Reuse {
                renderable: m.renderable.clone(),
                target: m.target,
            },
            None => Slot::Insert,
        }
    }

    fn remove(
        &self,
        id: &NodeId,
        entry: Option<Mounted>,
        ctx: &RenderPassContext,
        animator: &dyn Animator,
        report: &mut PassReport,
    ) {
        debug_assert!(entry.is_some(), "no renderable mounted for {id:?}");
        let Some(Mounted {
            renderable,
            item,
            inserting,
            ..
        }) = entry
        else {
            log::warn!("pass {}: no renderable mounted for {id}; skipping removal", ctx.pass);
            report.stale_skipped += 1;
            return;
        };

        inserting.cancel();
        item.will_remove(&renderable);
        animator.cancel(&renderable);

        let transition = if ctx.animated {
            item.remove_transition.clone()
        } else {
            None
        };
        let Some(transition) = transition else {
            log::trace!("pass {}: remove {id}", ctx.pass);
            renderable.detach();
            item.did_remove(&renderable);
            report.removed += 1;
            return;
        };

        log::trace!("pass {}: begin removal of {id}", ctx.pass);
        let cancel = CancelHandle::new();
        let from = renderable.frame();
        let to = transition.offstage(from);
        let completion = self.removal_completion(id.clone(), &cancel);
        self.state.borrow_mut().removing.insert(
            id.clone(),
            Removing {
                renderable: renderable.clone(),
                item,
                cancel,
            },
        );
        report.removing += 1;
        animator.animate(&renderable, from, to, &transition.timing, completion);
    }

    fn removal_completion(&self, id: NodeId, cancel: &CancelHandle) -> Completion {
        let state: Weak<RefCell<State>> = Rc::downgrade(&self.state);
        let finished = self.finished.clone();
        let active = self.active.clone();
        let token = cancel.clone();
        Completion::cancellable(cancel, move || {
            let Some(state) = state.upgrade() else {
                return;
            };
            if active.get() {
                finished.borrow_mut().push((id, token));
                return;
            }
            let Ok(mut st) = state.try_borrow_mut() else {
                finished.borrow_mut().push((id, token));
                return;
            };
            let done = st.finish_removal(&id, &token);
            drop(st);
            if let Some(r) = done {
                r.renderable.detach();
                r.item.did_remove(&r.renderable);
            }
        })
    }

    fn insert(
        item: &RenderItem,
        ctx: &RenderPassContext,
        container: &Renderable,
        animator: &dyn Animator,
    ) -> (Renderable, CancelHandle) {
        let renderable = item.make();
        let inserting = CancelHandle::new();
        item.will_insert(&renderable);
        item.will_update(&renderable);
        renderable.attach_to(container);

        let transition = if ctx.animated {
            item.insert_transition.as_ref()
        } else {
            None
        };
        match transition {
            Some(t) => {
                let start = t.offstage(item.frame);
                renderable.snap_frame(start);
                item.update(&renderable);
                let (r, it) = (renderable.clone(), item.clone());
                animator.animate(
                    &renderable,
                    start,
                    item.frame,
                    &t.timing,
                    Completion::cancellable(&inserting, move || it.did_insert(&r)),
                );
            }
            None => {
                renderable.snap_frame(item.frame);
                item.update(&renderable);
                item.did_insert(&renderable);
            }
        }
        (renderable, inserting)
    }

    /// `target` is the frame the renderable was last sent to, `None` when
    /// unknown. An unchanged target leaves a running animation alone.
    fn update(
        renderable: &Renderable,
        item: &RenderItem,
        target: Option<Rect>,
        ctx: &RenderPassContext,
        animator: &dyn Animator,
    ) {
        item.will_update(renderable);
        renderable.bring_to_front();

        if target != Some(item.frame) {
            animator.cancel(renderable);
            let from = renderable.frame();
            match item.timing {
                Some(timing) if ctx.animated && from != item.frame => {
                    animator.animate(renderable, from, item.frame, &timing, Completion::noop());
                }
                _ => renderable.snap_frame(item.frame),
            }
        }
        item.update(renderable);
    }

    fn drain_finished(&self, report: &mut PassReport) {
        loop {
            let batch = std::mem::take(&mut *self.finished.borrow_mut());
            if batch.is_empty() {
                break;
            }
            for (id, token) in batch {
                let done = self.state.borrow_mut().finish_removal(&id, &token);
                if let Some(r) = done {
                    log::trace!("pass {}: removal of {id} finished in pass", report.pass);
                    r.renderable.detach();
                    r.item.did_remove(&r.renderable);
                    report.removed += 1;
                    report.removing = report.removing.saturating_sub(1);
                }
            }
        }
    }

    /// Detaches everything, including elements still animating out. Called
    /// during a pass, it runs once the pass has finished.
    pub fn clear(&self) {
        if self.active.get() {
            self.clear_requested.set(true);
            return;
        }
        let (mounted, removing) = {
            let mut st = self.state.borrow_mut();
            st.order.clear();
            (
                std::mem::take(&mut st.mounted),
                std::mem::take(&mut st.removing),
            )
        };
        for (_, r) in removing {
            r.cancel.cancel();
            r.renderable.detach();
            r.item.did_remove(&r.renderable);
        }
        for (_, m) in mounted {
            m.inserting.cancel();
            m.item.will_remove(&m.renderable);
            m.renderable.detach();
            m.item.did_remove(&m.renderable);
        }
    }

    pub fn renderable(&self, id: &NodeId) -> Option<Renderable> {
        let st = self.state.borrow();
        st.mounted
            .get(id)
            .map(|m| m.renderable.clone())
            .or_else(|| st.removing.get(id).map(|r| r.renderable.clone()))
    }

    pub fn is_mounted(&self, id: &NodeId) -> bool {
        self.state.borrow().mounted.contains_key(id)
    }

    pub fn is_removing(&self, id: &NodeId) -> bool {
        self.state.borrow().removing.contains_key(id)
    }

    pub fn mounted_len(&self) -> usize {
        self.state.borrow().mounted.len()
    }

    pub fn removing_len(&self) -> usize {
        self.state.borrow().removing.len()
    }

    /// Mounted ids in last-pass order.
    pub fn order(&self) -> Vec<NodeId> {
        self.state.borrow().order.clone()
    }
}
