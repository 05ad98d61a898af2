//! Component runtime.
//!
//! A small host for hook-based components: it mounts render functions,
//! tracks which instances asked to be rendered again, and re-renders them on
//! [`Runtime::flush`]. Everything runs on one thread; updates are queued and
//! coalesced until the next flush.

mod component;
mod context;
mod scope;

pub use component::{ComponentId, Mounted};

pub(crate) use context::current;
pub(crate) use scope::{Cleanup, HookScope};

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use component::{run_render, Component, Render};

/// Runtime tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Upper bound on re-render passes in a single flush. A component that
    /// schedules itself on every render trips this limit.
    pub max_render_passes: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_render_passes: 100,
        }
    }
}

/// Shared scheduler state.
pub(crate) struct RuntimeInner {
    config: RuntimeConfig,
    next_id: Cell<ComponentId>,
    components: RefCell<HashMap<ComponentId, Weak<dyn Render>>>,
    pending: RefCell<VecDeque<ComponentId>>,
    flushing: Cell<bool>,
}

impl RuntimeInner {
    /// Queue a component for re-render. Repeated requests coalesce.
    pub(crate) fn enqueue(&self, id: ComponentId) {
        let mut pending = self.pending.borrow_mut();
        if !pending.contains(&id) {
            pending.push_back(id);
            trace!(component = id, "render scheduled");
        }
    }
}

/// Resets the flushing flag even if a render panics.
struct FlushGuard<'a>(&'a Cell<bool>);

impl Drop for FlushGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Handle to a component runtime.
///
/// Cloning yields another handle to the same runtime.
///
/// # Examples
///
/// ```
/// use tincan_bind::{use_state, Runtime};
///
/// let runtime = Runtime::new();
/// let mounted = runtime
///     .mount(|| {
///         let clicks = use_state(|| 0)?;
///         Ok(clicks.get())
///     })
///     .unwrap();
///
/// assert_eq!(mounted.output(), 0);
/// assert_eq!(mounted.render_count(), 1);
/// ```
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            inner: Rc::new(RuntimeInner {
                config,
                next_id: Cell::new(0),
                components: RefCell::new(HashMap::new()),
                pending: RefCell::new(VecDeque::new()),
                flushing: Cell::new(false),
            }),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    /// Mount a component: render it once, then run its mount effects.
    ///
    /// If the first render fails the instance is released and the error is
    /// returned; nothing is retried. Updates scheduled by mount effects are
    /// rendered on the next [`flush`](Runtime::flush).
    pub fn mount<R, F>(&self, render: F) -> Result<Mounted<R>>
    where
        R: 'static,
        F: Fn() -> Result<R> + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        let scope = Rc::new(HookScope::new(id, Rc::downgrade(&self.inner)));
        let output = match run_render(&scope, &render) {
            Ok(output) => output,
            Err(err) => {
                scope.release();
                debug!(component = id, error = %err, "mount failed");
                return Err(err);
            }
        };

        let component = Rc::new(Component::new(scope, Box::new(render), output));
        let weak: Weak<dyn Render> = Rc::downgrade(&component) as Weak<dyn Render>;
        self.inner.components.borrow_mut().insert(id, weak);
        debug!(component = id, "component mounted");

        component.scope().commit();
        Ok(Mounted::new(component, self.clone()))
    }

    /// Render every component with pending updates until the queue is empty.
    ///
    /// Returns the number of renders performed. Calling `flush` from inside a
    /// flush returns `Ok(0)`; the outer flush picks the work up.
    pub fn flush(&self) -> Result<usize> {
        if self.inner.flushing.replace(true) {
            return Ok(0);
        }
        let _guard = FlushGuard(&self.inner.flushing);

        let max_passes = self.inner.config.max_render_passes;
        let mut rendered = 0;
        let mut passes = 0;

        loop {
            let batch: Vec<ComponentId> = self.inner.pending.borrow_mut().drain(..).collect();
            if batch.is_empty() {
                break;
            }
            if passes == max_passes {
                self.inner.pending.borrow_mut().clear();
                warn!(passes, "render queue did not settle");
                return Err(Error::RenderLoop { passes });
            }
            passes += 1;

            for (index, id) in batch.iter().enumerate() {
                let component = self.inner.components.borrow().get(id).and_then(Weak::upgrade);
                let Some(component) = component else {
                    continue;
                };

                if let Err(err) = component.render() {
                    for id in &batch[index + 1..] {
                        self.inner.enqueue(*id);
                    }
                    return Err(err);
                }
                rendered += 1;
            }
        }

        if rendered > 0 {
            debug!(rendered, passes, "flush complete");
        }
        Ok(rendered)
    }

    /// Run `f`, then flush every update it caused.
    pub fn act<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> T,
    {
        let output = f();
        self.flush()?;
        Ok(output)
    }

    /// Number of components waiting for a re-render.
    pub fn pending_renders(&self) -> usize {
        self.inner.pending.borrow().len()
    }

    /// Number of currently mounted components.
    pub fn mounted_count(&self) -> usize {
        self.inner.components.borrow().len()
    }

    pub(crate) fn unregister(&self, id: ComponentId) {
        self.inner.components.borrow_mut().remove(&id);
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.inner.config)
            .field("mounted", &self.mounted_count())
            .field("pending", &self.pending_renders())
            .finish()
    }
}
