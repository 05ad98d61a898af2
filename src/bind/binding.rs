use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use super::normalize::{resolve, Initializer};
use crate::error::Result;
use crate::hooks::{use_effect, use_state, use_try_memo};
use crate::store::{Store, Subscription};

/// Lifecycle of a [`Binding`].
///
/// `Unbound -> Bound -> Released`, never backwards. A binding may also go
/// straight from `Unbound` to `Released` if it is dropped before activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    /// Store resolved, no listener registered yet.
    Unbound,
    /// Listening for store changes.
    Bound,
    /// Listener removed. Terminal.
    Released,
}

/// A resolved store plus the one listener that keeps its owner up to date.
///
/// Usable on its own when there is no component runtime: call
/// [`activate`](Binding::activate) once and [`release`](Binding::release) (or
/// drop the binding) when the owner goes away.
pub struct Binding<T> {
    store: Store<T>,
    state: Cell<BindingState>,
    subscription: RefCell<Option<Subscription>>,
}

impl<T> Binding<T> {
    pub fn new(store: Store<T>) -> Self {
        Self {
            store,
            state: Cell::new(BindingState::Unbound),
            subscription: RefCell::new(None),
        }
    }

    /// The bound store. Always the same instance.
    pub fn store(&self) -> &Store<T> {
        &self.store
    }

    pub fn state(&self) -> BindingState {
        self.state.get()
    }

    /// Remove the listener. Only the first call does anything.
    pub fn release(&self) -> bool {
        if self.state.replace(BindingState::Released) == BindingState::Released {
            return false;
        }

        let subscription = self.subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
            debug!(store = self.store.id(), "binding released");
        }
        true
    }
}

impl<T: Clone + 'static> Binding<T> {
    /// Start listening: `on_change` runs once for every later store change.
    ///
    /// The current state does not trigger `on_change`. Returns `false` and does
    /// nothing unless the binding is still unbound.
    pub fn activate<F>(&self, on_change: F) -> bool
    where
        F: Fn() + 'static,
    {
        if self.state.get() != BindingState::Unbound {
            return false;
        }

        let subscription = self.store.listen(move |_| on_change(), false);
        *self.subscription.borrow_mut() = Some(subscription);
        self.state.set(BindingState::Bound);
        debug!(store = self.store.id(), "binding activated");
        true
    }
}

impl<T> Drop for Binding<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("store", &self.store)
            .field("state", &self.state.get())
            .finish()
    }
}

/// Bind the rendering component to a store and return the [`Binding`].
///
/// The initializer is resolved on the first render only; initializers passed
/// on later renders are ignored. The listener is registered once the first
/// render commits and removed when the component unmounts. Every store change
/// bumps a private render counter, which re-renders the component.
pub fn use_binding<T, I>(initializer: I) -> Result<Rc<Binding<T>>>
where
    T: Clone + 'static,
    I: Into<Initializer<T>>,
{
    let initializer = initializer.into();
    let binding = use_try_memo(move || {
        let store = resolve(initializer)?;
        Ok(Rc::new(Binding::new(store)))
    })?;
    let renders = use_state(|| 0_u64)?;

    use_effect({
        let binding = Rc::clone(&binding);
        move || {
            binding.activate(move || renders.update(|n| *n = n.wrapping_add(1)));
            move || {
                binding.release();
            }
        }
    })?;

    Ok(binding)
}

/// Bind the rendering component to a store.
///
/// Accepts plain state, a store, or a factory (see [`Initializer`]) and
/// returns the same store instance on every render of this component.
///
/// # Examples
///
/// ```
/// use serde_json::{json, Value};
/// use tincan_bind::{use_store, Runtime, Store};
///
/// let runtime = Runtime::new();
/// let shared = Store::new(json!({ "foo": "bar" }));
///
/// let mounted = runtime
///     .mount({
///         let shared = shared.clone();
///         move || {
///             let store: Store<Value> = use_store(&shared)?;
///             Ok(store.get()["foo"].to_string())
///         }
///     })
///     .unwrap();
/// assert_eq!(mounted.output(), "\"bar\"");
///
/// runtime.act(|| shared.put(json!({ "foo": "baz" }))).unwrap();
/// assert_eq!(mounted.output(), "\"baz\"");
/// assert_eq!(mounted.render_count(), 2);
/// ```
pub fn use_store<T, I>(initializer: I) -> Result<Store<T>>
where
    T: Clone + 'static,
    I: Into<Initializer<T>>,
{
    use_binding(initializer).map(|binding| binding.store().clone())
}
