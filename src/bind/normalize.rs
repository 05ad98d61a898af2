use tracing::{debug, trace};

use crate::error::{BoxError, Error, Result};
use crate::store::Store;

/// What a store factory produced: either plain state or a ready store.
pub enum Candidate<T> {
    Value(T),
    Store(Store<T>),
}

impl<T> Candidate<T> {
    /// Whether this is already a store instance.
    pub fn is_store(&self) -> bool {
        matches!(self, Candidate::Store(_))
    }
}

impl<T> From<Store<T>> for Candidate<T> {
    fn from(store: Store<T>) -> Self {
        Candidate::Store(store)
    }
}

impl<T> From<&Store<T>> for Candidate<T> {
    fn from(store: &Store<T>) -> Self {
        Candidate::Store(store.clone())
    }
}

type Factory<T> = Box<dyn FnOnce() -> Result<Candidate<T>, BoxError>>;

/// Everything a component may bind to: plain state, an existing store, or a
/// factory producing either.
///
/// # Examples
///
/// ```
/// use tincan_bind::{resolve, Initializer, Store};
///
/// let shared = Store::new(1);
/// let store = resolve(Initializer::from(&shared)).unwrap();
/// assert!(store.ptr_eq(&shared));
///
/// let fresh = resolve(Initializer::lazy(|| 2)).unwrap();
/// assert_eq!(fresh.get(), 2);
/// ```
pub enum Initializer<T> {
    Value(T),
    Store(Store<T>),
    Factory(Factory<T>),
}

impl<T: 'static> Initializer<T> {
    /// Seed a new store with `value`.
    pub fn value(value: T) -> Self {
        Initializer::Value(value)
    }

    /// Bind to an existing store.
    pub fn store(store: Store<T>) -> Self {
        Initializer::Store(store)
    }

    /// Defer to a factory returning plain state or a store.
    pub fn factory<F, C>(factory: F) -> Self
    where
        F: FnOnce() -> C + 'static,
        C: Into<Candidate<T>>,
    {
        Initializer::Factory(Box::new(move || -> Result<Candidate<T>, BoxError> {
            Ok(factory().into())
        }))
    }

    /// Defer to a factory returning plain state.
    pub fn lazy<F>(factory: F) -> Self
    where
        F: FnOnce() -> T + 'static,
    {
        Initializer::Factory(Box::new(move || -> Result<Candidate<T>, BoxError> {
            Ok(Candidate::Value(factory()))
        }))
    }

    /// Defer to a fallible factory. Its error surfaces as [`Error::Factory`].
    pub fn try_factory<F, C, E>(factory: F) -> Self
    where
        F: FnOnce() -> Result<C, E> + 'static,
        C: Into<Candidate<T>>,
        E: Into<BoxError>,
    {
        Initializer::Factory(Box::new(move || -> Result<Candidate<T>, BoxError> {
            factory().map(Into::into).map_err(Into::into)
        }))
    }

    /// Whether this is already a store instance.
    pub fn is_store(&self) -> bool {
        matches!(self, Initializer::Store(_))
    }

    pub fn is_factory(&self) -> bool {
        matches!(self, Initializer::Factory(_))
    }
}

impl<T> From<Store<T>> for Initializer<T> {
    fn from(store: Store<T>) -> Self {
        Initializer::Store(store)
    }
}

impl<T> From<&Store<T>> for Initializer<T> {
    fn from(store: &Store<T>) -> Self {
        Initializer::Store(store.clone())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Initializer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Initializer::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Initializer::Store(store) => f.debug_tuple("Store").field(store).finish(),
            Initializer::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// Turn an initializer into exactly one store instance.
///
/// A factory is called once. A store is returned as is; plain state seeds a
/// brand-new store. Every call with plain state creates another store, so call
/// this once per binding.
pub fn resolve<T: Clone + 'static>(initializer: Initializer<T>) -> Result<Store<T>> {
    let candidate = match initializer {
        Initializer::Value(value) => Candidate::Value(value),
        Initializer::Store(store) => Candidate::Store(store),
        Initializer::Factory(factory) => {
            trace!("invoking store factory");
            factory().map_err(Error::Factory)?
        }
    };

    let store = match candidate {
        Candidate::Store(store) => {
            debug!(store = store.id(), "binding existing store");
            store
        }
        Candidate::Value(value) => {
            let store = Store::new(value);
            debug!(store = store.id(), "created store from initial value");
            store
        }
    };
    Ok(store)
}
