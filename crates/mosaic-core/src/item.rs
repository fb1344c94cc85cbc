use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::{AnimationTiming, NodeId, Rect, Renderable, Transition, Vec2};

pub type MakeFn = Rc<dyn Fn() -> Renderable>;
pub type Hook = Rc<dyn Fn(&Renderable)>;

/// Hooks run in the order they were attached.
#[derive(Clone, Default)]
struct HookChain(SmallVec<[Hook; 2]>);

impl HookChain {
    fn then(mut self, hook: Hook) -> Self {
        self.0.push(hook);
        self
    }

    fn run(&self, r: &Renderable) {
        for h in &self.0 {
            h(r);
        }
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Per-pass description of one visible element.
///
/// Items are cheap to clone (hooks are shared) and are rebuilt on every pass.
/// Every `with_*` hook adder returns a new item whose hook runs after the ones
/// already attached.
#[derive(Clone)]
pub struct RenderItem {
    pub id: NodeId,
    pub frame: Rect,
    make: MakeFn,
    will_insert: HookChain,
    did_insert: HookChain,
    will_update: HookChain,
    update: HookChain,
    will_remove: HookChain,
    did_remove: HookChain,
    pub insert_transition: Option<Transition>,
    pub remove_transition: Option<Transition>,
    pub timing: Option<AnimationTiming>,
}

impl RenderItem {
    pub fn new(make: impl Fn() -> Renderable + 'static) -> Self {
        Self::from_maker(Rc::new(make))
    }

    pub fn from_maker(make: MakeFn) -> Self {
        RenderItem {
            id: NodeId::root(),
            frame: Rect::ZERO,
            make,
            will_insert: HookChain::default(),
            did_insert: HookChain::default(),
            will_update: HookChain::default(),
            update: HookChain::default(),
            will_remove: HookChain::default(),
            did_remove: HookChain::default(),
            insert_transition: None,
            remove_transition: None,
            timing: None,
        }
    }

    pub fn id(mut self, id: NodeId) -> Self {
        self.id = id;
        self
    }

    pub fn frame(mut self, frame: Rect) -> Self {
        self.frame = frame;
        self
    }

    pub fn with_make(mut self, make: impl Fn() -> Renderable + 'static) -> Self {
        self.make = Rc::new(make);
        self
    }

    pub fn with_will_insert(mut self, f: impl Fn(&Renderable) + 'static) -> Self {
        self.will_insert = self.will_insert.then(Rc::new(f));
        self
    }

    pub fn with_did_insert(mut self, f: impl Fn(&Renderable) + 'static) -> Self {
        self.did_insert = self.did_insert.then(Rc::new(f));
        self
    }

    pub fn with_will_update(mut self, f: impl Fn(&Renderable) + 'static) -> Self {
        self.will_update = self.will_update.then(Rc::new(f));
        self
    }

    pub fn with_update(mut self, f: impl Fn(&Renderable) + 'static) -> Self {
        self.update = self.update.then(Rc::new(f));
        self
    }

    pub fn with_will_remove(mut self, f: impl Fn(&Renderable) + 'static) -> Self {
        self.will_remove = self.will_remove.then(Rc::new(f));
        self
    }

    pub fn with_did_remove(mut self, f: impl Fn(&Renderable) + 'static) -> Self {
        self.did_remove = self.did_remove.then(Rc::new(f));
        self
    }

    pub fn with_insert_transition(mut self, t: Transition) -> Self {
        self.insert_transition = Some(t);
        self
    }

    pub fn with_remove_transition(mut self, t: Transition) -> Self {
        self.remove_transition = Some(t);
        self
    }

    /// Same transition on the way in and out.
    pub fn with_transition(self, t: Transition) -> Self {
        self.with_insert_transition(t.clone())
            .with_remove_transition(t)
    }

    pub fn with_timing(mut self, timing: AnimationTiming) -> Self {
        self.timing = Some(timing);
        self
    }

    pub fn make(&self) -> Renderable {
        (self.make)()
    }

    pub fn will_insert(&self, r: &Renderable) {
        self.will_insert.run(r);
    }

    pub fn did_insert(&self, r: &Renderable) {
        self.did_insert.run(r);
    }

    pub fn will_update(&self, r: &Renderable) {
        self.will_update.run(r);
    }

    pub fn update(&self, r: &Renderable) {
        self.update.run(r);
    }

    pub fn will_remove(&self, r: &Renderable) {
        self.will_remove.run(r);
    }

    pub fn did_remove(&self, r: &Renderable) {
        self.did_remove.run(r);
    }

    /// This item as placed by a parent under `segment` at `origin`.
    pub fn placed(mut self, segment: impl fmt::Display, origin: Vec2) -> Self {
        self.id = self.id.under(segment);
        self.frame = self.frame.translate(origin);
        self
    }

    pub fn translated(mut self, by: Vec2) -> Self {
        self.frame = self.frame.translate(by);
        self
    }
}

impl fmt::Debug for RenderItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderItem")
            .field("id", &self.id)
            .field("frame", &self.frame)
            .field("update_hooks", &self.update.len())
            .field("insert_transition", &self.insert_transition)
            .field("remove_transition", &self.remove_transition)
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}
