//! Adapter factories keyed by adapter kind.
//!
//! Hosts that render many items of the same native kind register one factory
//! per kind and hand out [`AdapterKey`]s. The registry is an ordinary value:
//! it lives exactly as long as the `Rc` handles pointing at it, typically for
//! the whole process when the app keeps one around, and is passed explicitly
//! to whoever builds render items.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

use crate::{MakeFn, Renderable};

new_key_type! {
    pub struct AdapterKey;
}

pub type AdapterFactory = Rc<dyn Fn() -> Renderable>;

struct Entry {
    name: &'static str,
    factory: AdapterFactory,
    made: Cell<usize>,
}

#[derive(Default)]
pub struct AdapterRegistry {
    entries: RefCell<SlotMap<AdapterKey, Entry>>,
    by_name: RefCell<HashMap<&'static str, AdapterKey>>,
}

impl AdapterRegistry {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Registers `factory` under `name`, replacing any earlier factory with
    /// that name. Existing keys for the name stay valid.
    pub fn register(
        &self,
        name: &'static str,
        factory: impl Fn() -> Renderable + 'static,
    ) -> AdapterKey {
        if let Some(&key) = self.by_name.borrow().get(name) {
            log::warn!("AdapterRegistry: replacing factory for '{name}'");
            if let Some(e) = self.entries.borrow_mut().get_mut(key) {
                e.factory = Rc::new(factory);
            }
            return key;
        }
        let key = self.entries.borrow_mut().insert(Entry {
            name,
            factory: Rc::new(factory),
            made: Cell::new(0),
        });
        self.by_name.borrow_mut().insert(name, key);
        key
    }

    /// Looks up `name`, registering the factory from `init` on first use.
    pub fn key_for(&self, name: &'static str, init: impl FnOnce() -> AdapterFactory) -> AdapterKey {
        if let Some(&key) = self.by_name.borrow().get(name) {
            return key;
        }
        let factory = init();
        let key = self.entries.borrow_mut().insert(Entry {
            name,
            factory,
            made: Cell::new(0),
        });
        self.by_name.borrow_mut().insert(name, key);
        key
    }

    pub fn make(&self, key: AdapterKey) -> Option<Renderable> {
        // Clone the factory out so it may itself touch the registry.
        let factory = {
            let entries = self.entries.borrow();
            let e = entries.get(key)?;
            e.made.set(e.made.get() + 1);
            e.factory.clone()
        };
        Some(factory())
    }

    /// A `make` callback for render items that builds through this registry.
    ///
    /// Panics at call time if `key` was never registered here.
    pub fn maker(self: &Rc<Self>, key: AdapterKey) -> MakeFn {
        let registry = self.clone();
        Rc::new(move || match registry.make(key) {
            Some(r) => r,
            None => panic!("AdapterRegistry: unknown adapter key {key:?}"),
        })
    }

    pub fn name(&self, key: AdapterKey) -> Option<&'static str> {
        self.entries.borrow().get(key).map(|e| e.name)
    }

    /// How many renderables the factory behind `key` has produced.
    pub fn made_count(&self, key: AdapterKey) -> usize {
        self.entries.borrow().get(key).map_or(0, |e| e.made.get())
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}
