//! Hook primitives for components mounted on a [`Runtime`](crate::Runtime).
//!
//! Hooks are matched to their state by call order, so a component must call
//! the same hooks in the same order on every render:
//! - [`use_state`] - a cell whose writes schedule a re-render
//! - [`use_memo`] / [`use_try_memo`] - a value computed once per instance
//! - [`use_effect`] - a mount effect with an unmount cleanup

mod effect;
mod memo;
mod state;

pub use effect::use_effect;
pub use memo::{use_memo, use_try_memo};
pub use state::{use_state, StateCell};
