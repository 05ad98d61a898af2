use crate::error::Result;
use crate::runtime;

/// A value computed on the first render and reused for the rest of the
/// component's lifetime.
///
/// Later renders drop their `init` without calling it.
pub fn use_memo<T, F>(init: F) -> Result<T>
where
    T: Clone + 'static,
    F: FnOnce() -> T,
{
    use_try_memo(|| Ok(init()))
}

/// Fallible [`use_memo`]. A failed `init` stores nothing and fails the render.
pub fn use_try_memo<T, F>(init: F) -> Result<T>
where
    T: Clone + 'static,
    F: FnOnce() -> Result<T>,
{
    let scope = runtime::current()?;
    let (value, _) = scope.slot(init)?;
    Ok((*value).clone())
}
