//! Observable stores.
//!
//! A [`Store`] is a shared, mutable container that notifies listeners on every
//! change. Partial updates go through [`Merge`]; listener lifetimes are tied to
//! a [`Subscription`].

mod merge;
mod store;
mod subscription;

pub use merge::Merge;
pub use store::Store;
pub use subscription::Subscription;
