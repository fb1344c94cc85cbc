use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Shared cancel flag for a deferred completion.
#[derive(Clone, Default)]
pub struct CancelHandle(Rc<Cell<bool>>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns every completion holding this handle into a no-op.
    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }

    pub fn same_as(&self, other: &CancelHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for CancelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CancelHandle")
            .field(&self.is_cancelled())
            .finish()
    }
}

/// Callback handed to an animator. Runs at most once, and not at all when its
/// cancel handle was cancelled first.
pub struct Completion {
    f: Option<Box<dyn FnOnce()>>,
    cancel: Option<CancelHandle>,
}

impl Completion {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self {
            f: Some(Box::new(f)),
            cancel: None,
        }
    }

    pub fn cancellable(cancel: &CancelHandle, f: impl FnOnce() + 'static) -> Self {
        Self {
            f: Some(Box::new(f)),
            cancel: Some(cancel.clone()),
        }
    }

    pub fn noop() -> Self {
        Self {
            f: None,
            cancel: None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelHandle::is_cancelled)
    }

    pub fn fire(mut self) {
        if self.is_cancelled() {
            self.f = None;
            return;
        }
        if let Some(f) = self.f.take() {
            f();
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.f.is_some() && !self.is_cancelled() {
            log::warn!("Completion dropped without firing; the animator broke its contract");
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("pending", &self.f.is_some())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
