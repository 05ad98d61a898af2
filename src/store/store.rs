use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::trace;

use super::merge::Merge;
use super::subscription::Subscription;

static NEXT_STORE_ID: AtomicUsize = AtomicUsize::new(0);

struct Listener<T> {
    id: usize,
    active: Cell<bool>,
    callback: Box<dyn Fn(&T)>,
}

struct StoreInner<T> {
    id: usize,
    state: RefCell<T>,
    listeners: RefCell<Vec<Rc<Listener<T>>>>,
    next_listener: Cell<usize>,
    version: Cell<u64>,
}

/// An observable state container.
///
/// Cloning a `Store` yields another handle to the **same** instance. Every
/// mutation (`set`, `update`, `put`) notifies each listener exactly once,
/// synchronously, before returning to the caller. There is no equality check:
/// writing an identical value still notifies.
pub struct Store<T> {
    inner: Rc<StoreInner<T>>,
}

impl<T: Clone + 'static> Store<T> {
    /// Create a new store with the given initial state.
    pub fn new(initial: T) -> Self {
        let id = NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed);
        trace!(store = id, "store created");

        Self {
            inner: Rc::new(StoreInner {
                id,
                state: RefCell::new(initial),
                listeners: RefCell::new(Vec::new()),
                next_listener: Cell::new(0),
                version: Cell::new(0),
            }),
        }
    }

    /// Get a clone of the current state.
    pub fn get(&self) -> T {
        self.inner.state.borrow().clone()
    }

    /// Read state without cloning.
    ///
    /// # Panics
    ///
    /// Mutating the store from inside `f` panics.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        let state = self.inner.state.borrow();
        f(&*state)
    }

    /// Replace the state, then notify listeners.
    pub fn set(&self, new_state: T) {
        *self.inner.state.borrow_mut() = new_state;
        self.notify();
    }

    /// Update the state in place, then notify listeners.
    ///
    /// # Panics
    ///
    /// Reading or writing the store from inside `f` panics. Listeners run
    /// after `f` returns and may use the store freely.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        {
            let mut state = self.inner.state.borrow_mut();
            f(&mut *state);
        }
        self.notify();
    }

    /// Merge a partial value into the state, then notify listeners once.
    pub fn put(&self, partial: T::Partial)
    where
        T: Merge,
    {
        self.update(|state| state.merge(partial));
    }

    /// Register a change listener.
    ///
    /// With `emit_immediately` the callback also runs once with the current
    /// state before this returns. The listener stays registered until the
    /// returned [`Subscription`] is dropped or unsubscribed.
    pub fn listen<F>(&self, callback: F, emit_immediately: bool) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);

        let listener = Rc::new(Listener {
            id,
            active: Cell::new(true),
            callback: Box::new(callback),
        });
        self.inner.listeners.borrow_mut().push(Rc::clone(&listener));
        trace!(store = self.inner.id, listener = id, "listener registered");

        if emit_immediately {
            let snapshot = self.get();
            (listener.callback)(&snapshot);
        }

        let store = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            listener.active.set(false);
            if let Some(store) = store.upgrade() {
                store.listeners.borrow_mut().retain(|l| l.id != id);
                trace!(store = store.id, listener = id, "listener removed");
            }
        })
    }

    /// Notify all listeners of a state change.
    ///
    /// Listeners see a snapshot taken after the mutation, so they are free to
    /// read or write the store themselves.
    fn notify(&self) {
        let version = self.inner.version.get() + 1;
        self.inner.version.set(version);

        let snapshot = self.get();
        let listeners: Vec<_> = self.inner.listeners.borrow().iter().cloned().collect();
        trace!(
            store = self.inner.id,
            version,
            listeners = listeners.len(),
            "notifying listeners"
        );

        for listener in listeners {
            // Skip listeners removed earlier in this same cycle.
            if listener.active.get() {
                (listener.callback)(&snapshot);
            }
        }
    }
}

impl<T> Store<T> {
    /// Process-unique identifier of this store instance.
    pub fn id(&self) -> usize {
        self.inner.id
    }

    /// Number of mutations since creation.
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Whether both handles refer to the same store instance.
    pub fn ptr_eq(&self, other: &Store<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.inner.id)
            .field("state", &*self.inner.state.borrow())
            .field("version", &self.inner.version.get())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish()
    }
}
