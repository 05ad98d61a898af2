use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use tracing::{debug, trace};

use super::context;
use super::scope::HookScope;
use super::Runtime;
use crate::error::{Error, Result};

/// Identifier of a component instance within its [`Runtime`].
pub type ComponentId = usize;

pub(crate) type RenderFn<R> = Box<dyn Fn() -> Result<R>>;

/// Type-erased view of a component used by the scheduler.
pub(crate) trait Render {
    fn render(&self) -> Result<()>;
}

/// Run one render pass of `render` inside `scope`.
pub(crate) fn run_render<R>(scope: &Rc<HookScope>, render: &dyn Fn() -> Result<R>) -> Result<R> {
    if scope.is_released() {
        return Err(Error::Released(scope.id()));
    }

    context::with_scope(Rc::clone(scope), || -> Result<R> {
        scope.begin_render();
        let output = render()?;
        scope.finish_render()?;
        Ok(output)
    })
}

pub(crate) struct Component<R> {
    scope: Rc<HookScope>,
    render: RenderFn<R>,
    output: RefCell<R>,
    renders: Cell<usize>,
}

impl<R> Component<R> {
    /// Wrap an instance whose first render already succeeded.
    pub(crate) fn new(scope: Rc<HookScope>, render: RenderFn<R>, output: R) -> Self {
        Self {
            scope,
            render,
            output: RefCell::new(output),
            renders: Cell::new(1),
        }
    }

    pub(crate) fn scope(&self) -> &Rc<HookScope> {
        &self.scope
    }
}

impl<R> Render for Component<R> {
    fn render(&self) -> Result<()> {
        let output = run_render(&self.scope, &*self.render)?;
        *self.output.borrow_mut() = output;

        let renders = self.renders.get() + 1;
        self.renders.set(renders);
        trace!(component = self.scope.id(), renders, "component rendered");

        self.scope.commit();
        Ok(())
    }
}

/// Handle to a mounted component instance.
///
/// Dropping the handle unmounts the component.
pub struct Mounted<R> {
    component: Rc<Component<R>>,
    runtime: Runtime,
}

impl<R> Mounted<R> {
    pub(crate) fn new(component: Rc<Component<R>>, runtime: Runtime) -> Self {
        Self { component, runtime }
    }

    pub fn id(&self) -> ComponentId {
        self.component.scope.id()
    }

    /// Output of the most recent successful render.
    pub fn output(&self) -> R
    where
        R: Clone,
    {
        self.component.output.borrow().clone()
    }

    /// Borrow the output of the most recent successful render.
    pub fn with_output<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&R) -> T,
    {
        let output: Ref<'_, R> = self.component.output.borrow();
        f(&output)
    }

    /// Number of successful renders, the first one included.
    pub fn render_count(&self) -> usize {
        self.component.renders.get()
    }

    pub fn is_mounted(&self) -> bool {
        !self.component.scope.is_released()
    }

    /// Deactivate the component: effect cleanups run and later updates are ignored.
    pub fn unmount(self) {
        drop(self);
    }

    fn release(&self) {
        let id = self.id();
        if self.component.scope.release() {
            self.runtime.unregister(id);
            debug!(component = id, renders = self.render_count(), "component unmounted");
        }
    }
}

impl<R> Drop for Mounted<R> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<R: std::fmt::Debug> std::fmt::Debug for Mounted<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mounted")
            .field("id", &self.id())
            .field("output", &*self.component.output.borrow())
            .field("renders", &self.render_count())
            .field("mounted", &self.is_mounted())
            .finish()
    }
}
