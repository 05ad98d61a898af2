use std::cell::RefCell;
use std::rc::Rc;

use super::scope::HookScope;
use crate::error::{Error, Result};

// Thread-local stack of the components currently rendering. Nested mounts
// push on top; hooks always talk to the innermost one.
thread_local! {
    static SCOPE_STACK: RefCell<Vec<Rc<HookScope>>> = const { RefCell::new(Vec::new()) };
}

/// The scope of the component rendering right now, if any.
pub(crate) fn current() -> Result<Rc<HookScope>> {
    SCOPE_STACK.with(|stack| stack.borrow().last().cloned().ok_or(Error::NoActiveComponent))
}

/// Run `f` with `scope` as the current rendering component.
///
/// The scope is popped again even if `f` panics.
pub(crate) fn with_scope<F, R>(scope: Rc<HookScope>, f: F) -> R
where
    F: FnOnce() -> R,
{
    SCOPE_STACK.with(|stack| {
        stack.borrow_mut().push(scope);
    });

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));

    SCOPE_STACK.with(|stack| {
        stack.borrow_mut().pop();
    });

    match result {
        Ok(r) => r,
        Err(e) => std::panic::resume_unwind(e),
    }
}
