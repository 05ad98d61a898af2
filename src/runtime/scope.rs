use std::any::{type_name, Any};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::trace;

use super::{ComponentId, RuntimeInner};
use crate::error::{Error, Result};

/// Cleanup returned by a mount effect, run once on unmount.
pub(crate) type Cleanup = Box<dyn FnOnce()>;
pub(crate) type MountEffect = Box<dyn FnOnce() -> Cleanup>;

/// Per-instance hook storage.
///
/// Hooks are identified by call order: the n-th hook called during a render
/// owns slot n. Slots are created on the first render and reused afterwards.
pub(crate) struct HookScope {
    id: ComponentId,
    runtime: Weak<RuntimeInner>,
    slots: RefCell<Vec<Rc<dyn Any>>>,
    cursor: Cell<usize>,
    mounted: Cell<bool>,
    pending_effects: RefCell<Vec<MountEffect>>,
    cleanups: RefCell<Vec<Cleanup>>,
    released: Cell<bool>,
}

impl HookScope {
    pub(crate) fn new(id: ComponentId, runtime: Weak<RuntimeInner>) -> Self {
        Self {
            id,
            runtime,
            slots: RefCell::new(Vec::new()),
            cursor: Cell::new(0),
            mounted: Cell::new(false),
            pending_effects: RefCell::new(Vec::new()),
            cleanups: RefCell::new(Vec::new()),
            released: Cell::new(false),
        }
    }

    pub(crate) fn id(&self) -> ComponentId {
        self.id
    }

    pub(crate) fn is_released(&self) -> bool {
        self.released.get()
    }

    pub(crate) fn begin_render(&self) {
        self.cursor.set(0);
    }

    pub(crate) fn finish_render(&self) -> Result<()> {
        let expected = self.slots.borrow().len();
        let found = self.cursor.get();
        if self.mounted.get() && found != expected {
            return Err(Error::HookCountChanged {
                id: self.id,
                expected,
                found,
            });
        }
        Ok(())
    }

    /// Claim the next hook slot.
    ///
    /// Returns the slot value and whether it was created by this call. `init`
    /// only runs when the slot does not exist yet; a failing `init` leaves no
    /// slot behind.
    pub(crate) fn slot<T: 'static>(
        &self,
        init: impl FnOnce() -> Result<T>,
    ) -> Result<(Rc<T>, bool)> {
        let index = self.cursor.get();
        self.cursor.set(index + 1);

        let existing = self.slots.borrow().get(index).cloned();
        if let Some(existing) = existing {
            let value = existing.downcast::<T>().map_err(|_| Error::HookMismatch {
                index,
                expected: type_name::<T>(),
            })?;
            return Ok((value, false));
        }

        let value = Rc::new(init()?);
        self.slots.borrow_mut().push(Rc::clone(&value) as Rc<dyn Any>);
        Ok((value, true))
    }

    pub(crate) fn queue_effect(&self, effect: MountEffect) {
        self.pending_effects.borrow_mut().push(effect);
    }

    /// Finish a successful render: run queued mount effects in order.
    pub(crate) fn commit(&self) {
        self.mounted.set(true);

        let effects = std::mem::take(&mut *self.pending_effects.borrow_mut());
        for effect in effects {
            let cleanup = effect();
            self.cleanups.borrow_mut().push(cleanup);
        }
    }

    /// Ask the runtime to render this component again.
    pub(crate) fn request_render(&self) {
        if self.released.get() {
            trace!(component = self.id, "ignoring update for released component");
            return;
        }
        if let Some(runtime) = self.runtime.upgrade() {
            runtime.enqueue(self.id);
        }
    }

    /// Deactivate: run cleanups in reverse order, then drop all hook state.
    ///
    /// Returns `false` if the scope was already released.
    pub(crate) fn release(&self) -> bool {
        if self.released.replace(true) {
            return false;
        }

        self.pending_effects.borrow_mut().clear();
        let cleanups = std::mem::take(&mut *self.cleanups.borrow_mut());
        for cleanup in cleanups.into_iter().rev() {
            cleanup();
        }

        let slots = std::mem::take(&mut *self.slots.borrow_mut());
        drop(slots);
        true
    }
}
