//! # Tincan Bind
//!
//! Bind observable stores to hook-based components.
//!
//! A component calls [`use_store`] on every render. The first call resolves
//! the initializer (plain state, an existing [`Store`], or a factory producing
//! either) into one store instance, and every later call returns that same
//! instance. Each change to the store re-renders the component, and the
//! listener is removed when the component unmounts.
//!
//! ## Stores
//!
//! - `Store<T>` - Observable state container with `get`, `set`, `put` and `listen`
//! - `Merge` - Shallow merge used by `put`
//! - `Subscription` - RAII handle removing a listener
//!
//! ## Components
//!
//! - `Runtime` - Mounts components and re-renders them on `flush` / `act`
//! - `use_state`, `use_memo`, `use_effect` - Hook primitives
//! - `use_store`, `use_binding` - The store binding itself
//!
//! ```
//! use serde_json::{json, Value};
//! use tincan_bind::{use_store, Initializer, Runtime, Store};
//!
//! let runtime = Runtime::new();
//! let mounted = runtime
//!     .mount(|| {
//!         let store: Store<Value> = use_store(Initializer::value(json!({ "count": 1 })))?;
//!         Ok(store.get()["count"].as_i64())
//!     })
//!     .unwrap();
//!
//! assert_eq!(mounted.output(), Some(1));
//! ```

pub mod bind;
pub mod error;
pub mod hooks;
pub mod runtime;
pub mod store;

// Re-export main types for convenience
pub use bind::{resolve, use_binding, use_store, Binding, BindingState, Candidate, Initializer};
pub use error::{Error, Result};
pub use hooks::{use_effect, use_memo, use_state, use_try_memo, StateCell};
pub use runtime::{ComponentId, Mounted, Runtime, RuntimeConfig};
pub use store::{Merge, Store, Subscription};
