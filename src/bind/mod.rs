//! Store binding for components.
//!
//! [`resolve`] normalizes an [`Initializer`] into one store instance, and
//! [`use_store`] / [`use_binding`] tie that instance to a component: resolved
//! once, listened to while mounted, released on unmount.

mod binding;
mod normalize;

pub use binding::{use_binding, use_store, Binding, BindingState};
pub use normalize::{resolve, Candidate, Initializer};
