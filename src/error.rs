//! Error type shared by the runtime, the hooks, and store resolution.

use crate::runtime::ComponentId;
use thiserror::Error;

/// Boxed error returned by fallible store factories.
pub type BoxError = Box<dyn std::error::Error + 'static>;

/// Errors raised while mounting, rendering, or binding components.
#[derive(Debug, Error)]
pub enum Error {
    /// A hook was called while no component was rendering.
    #[error("hook called outside of a component render")]
    NoActiveComponent,

    /// The hook at `index` holds a different type than it did on the first render.
    #[error("hook #{index} changed type between renders (expected `{expected}`)")]
    HookMismatch { index: usize, expected: &'static str },

    /// A render called a different number of hooks than the first render did.
    #[error("component {id} called {found} hooks, but its first render called {expected}")]
    HookCountChanged {
        id: ComponentId,
        expected: usize,
        found: usize,
    },

    /// The component was already unmounted.
    #[error("component {0} has been released")]
    Released(ComponentId),

    /// Flushing kept scheduling renders past the configured pass limit.
    #[error("render queue did not settle after {passes} passes")]
    RenderLoop { passes: usize },

    /// A store factory failed while resolving an initializer.
    #[error("store factory failed: {0}")]
    Factory(#[source] BoxError),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
