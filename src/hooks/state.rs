use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::Result;
use crate::runtime::{self, HookScope};

/// Component-local state.
///
/// Every write schedules a re-render of the owning component. Writes after the
/// component unmounted still update the value but schedule nothing.
pub struct StateCell<T> {
    value: Rc<RefCell<T>>,
    scope: Weak<HookScope>,
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            value: Rc::clone(&self.value),
            scope: Weak::clone(&self.scope),
        }
    }
}

impl<T: 'static> StateCell<T> {
    /// Get a clone of the current value.
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.value.borrow().clone()
    }

    /// Read the value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    /// Set a new value and schedule a re-render.
    pub fn set(&self, value: T) {
        *self.value.borrow_mut() = value;
        self.schedule();
    }

    /// Update the value in place and schedule a re-render.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let mut value = self.value.borrow_mut();
            f(&mut *value);
        }
        self.schedule();
    }

    fn schedule(&self) {
        if let Some(scope) = self.scope.upgrade() {
            scope.request_render();
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StateCell").field(&*self.value.borrow()).finish()
    }
}

/// Create component-local state, initialized by `init` on the first render.
///
/// # Examples
///
/// ```
/// use tincan_bind::{use_state, Runtime};
///
/// let runtime = Runtime::new();
/// let mounted = runtime
///     .mount(|| {
///         let name = use_state(|| String::from("tincan"))?;
///         Ok(name.with(|name| name.len()))
///     })
///     .unwrap();
///
/// assert_eq!(mounted.output(), 6);
/// ```
pub fn use_state<T: 'static>(init: impl FnOnce() -> T) -> Result<StateCell<T>> {
    let scope = runtime::current()?;
    let (value, _) = scope.slot(|| Ok(RefCell::new(init())))?;

    Ok(StateCell {
        value,
        scope: Rc::downgrade(&scope),
    })
}
