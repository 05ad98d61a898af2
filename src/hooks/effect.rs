use crate::error::Result;
use crate::runtime::{self, Cleanup};

// Marks the hook position of an effect.
struct EffectSlot;

/// Run a side effect once, after the component's first render commits.
///
/// The cleanup returned by `effect` runs exactly once, when the component
/// unmounts. On later renders the passed `effect` is dropped without running.
///
/// # Examples
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use tincan_bind::{use_effect, Runtime};
///
/// let log = Rc::new(Cell::new(0));
/// let runtime = Runtime::new();
/// let mounted = runtime
///     .mount({
///         let log = Rc::clone(&log);
///         move || {
///             let log = Rc::clone(&log);
///             use_effect(move || {
///                 log.set(1);
///                 move || log.set(2)
///             })
///         }
///     })
///     .unwrap();
///
/// assert_eq!(log.get(), 1);
/// mounted.unmount();
/// assert_eq!(log.get(), 2);
/// ```
pub fn use_effect<F, C>(effect: F) -> Result<()>
where
    F: FnOnce() -> C + 'static,
    C: FnOnce() + 'static,
{
    let scope = runtime::current()?;
    let (_, fresh) = scope.slot(|| Ok(EffectSlot))?;

    if fresh {
        scope.queue_effect(Box::new(move || Box::new(effect()) as Cleanup));
    }
    Ok(())
}
