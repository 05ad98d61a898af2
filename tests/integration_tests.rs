//! Integration tests for Tincan Bind

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use proptest::prelude::*;
use serde_json::{json, Value};
use tincan_bind::{
    use_binding, use_state, use_store, Binding, BindingState, Candidate, Error, Initializer,
    Mounted, Runtime, StateCell, Store,
};

type Received = Rc<RefCell<Vec<Store<Value>>>>;

/// A component rendering `store.get()["foo"]` that also hands out the store
/// it received on each render.
fn mount_foo<F>(runtime: &Runtime, initializer: F) -> (Mounted<String>, Received)
where
    F: Fn() -> Initializer<Value> + 'static,
{
    let received = Rc::new(RefCell::new(Vec::new()));
    let mounted = runtime
        .mount({
            let received = Rc::clone(&received);
            move || {
                let store: Store<Value> = use_store(initializer())?;
                received.borrow_mut().push(store.clone());
                Ok(store.get()["foo"].as_str().unwrap_or_default().to_string())
            }
        })
        .unwrap();
    (mounted, received)
}

#[test]
fn uses_store() {
    let runtime = Runtime::new();
    let shared = Store::new(json!({ "foo": "bar" }));

    let (mounted, received) = mount_foo(&runtime, {
        let shared = shared.clone();
        move || Initializer::from(&shared)
    });

    assert_eq!(mounted.output(), "bar");
    assert!(received.borrow()[0].ptr_eq(&shared));
}

#[test]
fn uses_store_with_initializer() {
    let runtime = Runtime::new();

    let (mounted, _) = mount_foo(&runtime, || {
        Initializer::factory(|| Store::new(json!({ "foo": "bar" })))
    });

    assert_eq!(mounted.output(), "bar");
}

#[test]
fn uses_new_store() {
    let runtime = Runtime::new();

    let (mounted, _) = mount_foo(&runtime, || Initializer::value(json!({ "foo": "bar" })));

    assert_eq!(mounted.output(), "bar");
}

#[test]
fn uses_new_store_with_initializer() {
    let runtime = Runtime::new();

    let (mounted, _) = mount_foo(&runtime, || Initializer::lazy(|| json!({ "foo": "bar" })));

    assert_eq!(mounted.output(), "bar");
}

#[test]
fn updates_and_resets_state() {
    let runtime = Runtime::new();
    let shared = Store::new(json!({ "foo": "bar" }));

    let (mounted, received) = mount_foo(&runtime, {
        let shared = shared.clone();
        move || Initializer::from(&shared)
    });
    let received_store = received.borrow()[0].clone();

    assert_eq!(mounted.output(), "bar");
    assert_eq!(shared.get(), json!({ "foo": "bar" }));
    assert_eq!(mounted.render_count(), 1);

    runtime.act(|| received_store.set(json!({ "foo": "baz" }))).unwrap();
    assert_eq!(mounted.output(), "baz");
    assert_eq!(shared.get(), json!({ "foo": "baz" }));
    assert_eq!(mounted.render_count(), 2);

    runtime
        .act(|| received_store.put(json!({ "foo": "bar", "ding": "dong" })))
        .unwrap();
    assert_eq!(mounted.output(), "bar");
    assert_eq!(shared.get(), json!({ "foo": "bar", "ding": "dong" }));
    assert_eq!(mounted.render_count(), 3);

    // Writing a value equal in content still re-renders.
    runtime.act(|| shared.set(json!({ "foo": "bar" }))).unwrap();
    assert_eq!(mounted.output(), "bar");
    assert_eq!(shared.get(), json!({ "foo": "bar" }));
    assert_eq!(mounted.render_count(), 4);

    runtime
        .act(|| shared.set(json!({ "foo": "baz", "yolo": "swag" })))
        .unwrap();
    assert_eq!(mounted.output(), "baz");
    assert_eq!(shared.get(), json!({ "foo": "baz", "yolo": "swag" }));
    assert_eq!(mounted.render_count(), 5);

    runtime
        .act(|| shared.put(json!({ "foo": "bar", "ding": "dong" })))
        .unwrap();
    assert_eq!(mounted.output(), "bar");
    assert_eq!(
        shared.get(),
        json!({ "foo": "bar", "yolo": "swag", "ding": "dong" })
    );
    assert_eq!(mounted.render_count(), 6);
}

#[test]
fn end_to_end_scenario() {
    let runtime = Runtime::new();
    let external: Rc<RefCell<Option<Store<Value>>>> = Rc::new(RefCell::new(None));
    let renders = Rc::new(Cell::new(0));

    let mounted = runtime
        .mount({
            let external = Rc::clone(&external);
            let renders = Rc::clone(&renders);
            move || {
                renders.set(renders.get() + 1);
                let store: Store<Value> =
                    use_store(Initializer::value(json!({ "foo": "bar" })))?;
                external.borrow_mut().get_or_insert_with(|| store.clone());

                let state = store.get();
                let foo = state["foo"].as_str().unwrap_or_default();
                let mut parts = vec![format!("foo={foo}")];
                if let Some(ding) = state.get("ding").and_then(Value::as_str) {
                    parts.push(format!("ding={ding}"));
                }
                Ok(parts.join(", "))
            }
        })
        .unwrap();
    let store = external.borrow().clone().unwrap();

    assert_eq!(mounted.output(), "foo=bar");
    assert_eq!(mounted.render_count(), 1);

    runtime.act(|| store.set(json!({ "foo": "baz" }))).unwrap();
    assert_eq!(mounted.output(), "foo=baz");
    assert_eq!(mounted.render_count(), 2);

    runtime.act(|| store.put(json!({ "ding": "dong" }))).unwrap();
    assert_eq!(mounted.output(), "foo=baz, ding=dong");
    assert_eq!(mounted.render_count(), 3);

    mounted.unmount();
    assert_eq!(store.listener_count(), 0);

    runtime.act(|| store.set(json!({ "foo": "qux" }))).unwrap();
    assert_eq!(renders.get(), 3);
    assert_eq!(runtime.pending_renders(), 0);
    assert_eq!(store.get(), json!({ "foo": "qux" }));
}

#[test]
fn repeated_renders_return_identical_store() {
    let runtime = Runtime::new();
    let (mounted, received) = mount_foo(&runtime, || Initializer::value(json!({ "foo": "a" })));

    let store = received.borrow()[0].clone();
    for value in ["b", "c", "d"] {
        runtime.act(|| store.set(json!({ "foo": value }))).unwrap();
    }

    assert_eq!(mounted.render_count(), 4);
    assert_eq!(received.borrow().len(), 4);
    assert!(received.borrow().iter().all(|s| s.ptr_eq(&store)));
    assert_eq!(store.listener_count(), 1);
}

#[test]
fn factory_runs_once_per_instance() {
    let runtime = Runtime::new();
    let calls = Rc::new(Cell::new(0));

    let (mounted, received) = mount_foo(&runtime, {
        let calls = Rc::clone(&calls);
        move || {
            let calls = Rc::clone(&calls);
            Initializer::lazy(move || {
                calls.set(calls.get() + 1);
                json!({ "foo": "bar" })
            })
        }
    });

    let store = received.borrow()[0].clone();
    runtime.act(|| store.put(json!({ "foo": "baz" }))).unwrap();
    runtime.act(|| store.put(json!({ "foo": "qux" }))).unwrap();

    assert_eq!(mounted.output(), "qux");
    assert_eq!(mounted.render_count(), 3);
    assert_eq!(calls.get(), 1);
}

#[test]
fn factory_returning_existing_store_passes_through() {
    let runtime = Runtime::new();
    let shared = Store::new(json!({ "foo": "bar" }));

    let (_mounted, received) = mount_foo(&runtime, {
        let shared = shared.clone();
        move || {
            let shared = shared.clone();
            Initializer::factory(move || Candidate::Store(shared))
        }
    });

    assert!(received.borrow()[0].ptr_eq(&shared));
}

#[test]
fn first_initializer_wins() {
    let runtime = Runtime::new();
    let first = Store::new(json!({ "foo": "first" }));
    let second = Store::new(json!({ "foo": "second" }));
    let use_second = Rc::new(Cell::new(false));

    let (mounted, _) = mount_foo(&runtime, {
        let first = first.clone();
        let second = second.clone();
        let use_second = Rc::clone(&use_second);
        move || {
            if use_second.get() {
                Initializer::from(&second)
            } else {
                Initializer::from(&first)
            }
        }
    });

    use_second.set(true);
    runtime.act(|| first.put(json!({ "foo": "still first" }))).unwrap();

    assert_eq!(mounted.output(), "still first");
    assert_eq!(second.listener_count(), 0);

    runtime.act(|| second.put(json!({ "foo": "ignored" }))).unwrap();
    assert_eq!(mounted.render_count(), 2);
}

#[test]
fn binding_existing_state_does_not_render_at_bind_time() {
    let runtime = Runtime::new();
    let shared = Store::new(json!({ "foo": "bar" }));
    shared.put(json!({ "ding": "dong" }));

    let (mounted, _) = mount_foo(&runtime, {
        let shared = shared.clone();
        move || Initializer::from(&shared)
    });

    assert_eq!(runtime.pending_renders(), 0);
    assert_eq!(runtime.flush().unwrap(), 0);
    assert_eq!(mounted.render_count(), 1);
}

#[test]
fn one_change_one_render() {
    let runtime = Runtime::new();
    let shared = Store::new(json!({ "foo": "bar" }));
    let (mounted, _) = mount_foo(&runtime, {
        let shared = shared.clone();
        move || Initializer::from(&shared)
    });

    shared.set(json!({ "foo": "baz" }));
    assert_eq!(runtime.flush().unwrap(), 1);
    assert_eq!(mounted.render_count(), 2);

    shared.put(json!({ "foo": "qux", "ding": "dong" }));
    assert_eq!(runtime.flush().unwrap(), 1);
    assert_eq!(mounted.render_count(), 3);
    assert_eq!(mounted.output(), "qux");
}

#[test]
fn components_sharing_a_store_all_rerender() {
    let runtime = Runtime::new();
    let shared = Store::new(json!({ "foo": "bar" }));

    let (left, _) = mount_foo(&runtime, {
        let shared = shared.clone();
        move || Initializer::from(&shared)
    });
    let (right, _) = mount_foo(&runtime, {
        let shared = shared.clone();
        move || Initializer::from(&shared)
    });
    assert_eq!(shared.listener_count(), 2);

    runtime.act(|| shared.set(json!({ "foo": "baz" }))).unwrap();
    assert_eq!(left.output(), "baz");
    assert_eq!(right.output(), "baz");

    drop(left);
    assert_eq!(shared.listener_count(), 1);

    runtime.act(|| shared.set(json!({ "foo": "qux" }))).unwrap();
    assert_eq!(right.output(), "qux");
    assert_eq!(right.render_count(), 3);
}

#[test]
fn failing_factory_fails_mount() {
    let runtime = Runtime::new();

    let result = runtime.mount(|| {
        let store: Store<Value> = use_store(Initializer::try_factory(|| {
            Err::<Candidate<Value>, _>(std::io::Error::other("storage unavailable"))
        }))?;
        Ok(store.get())
    });

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Factory(_)));
    assert_eq!(runtime.mounted_count(), 0);
}

#[test]
fn failed_first_render_leaves_no_listener() {
    let runtime = Runtime::new();
    let shared = Store::new(json!({ "foo": "bar" }));

    let result = runtime.mount({
        let shared = shared.clone();
        move || -> tincan_bind::Result<Value> {
            let _store: Store<Value> = use_store(&shared)?;
            Err(Error::Factory("later hook failed".into()))
        }
    });

    assert!(matches!(result, Err(Error::Factory(_))));
    assert_eq!(shared.listener_count(), 0);
    assert_eq!(runtime.mounted_count(), 0);

    runtime.act(|| shared.set(json!({ "foo": "baz" }))).unwrap();
    assert_eq!(runtime.pending_renders(), 0);
}

#[test]
fn binding_state_tracks_lifecycle() {
    let runtime = Runtime::new();
    let shared = Store::new(0_u32);
    let seen = Rc::new(RefCell::new(Vec::new()));

    let mounted = runtime
        .mount({
            let shared = shared.clone();
            let seen = Rc::clone(&seen);
            move || {
                let binding: Rc<Binding<u32>> = use_binding(&shared)?;
                seen.borrow_mut().push(binding.state());
                Ok(Rc::clone(&binding))
            }
        })
        .unwrap();
    let binding = mounted.output();

    runtime.act(|| shared.set(1)).unwrap();
    assert_eq!(
        *seen.borrow(),
        vec![BindingState::Unbound, BindingState::Bound]
    );

    mounted.unmount();
    assert_eq!(binding.state(), BindingState::Released);

    runtime.act(|| shared.set(2)).unwrap();
    assert_eq!(shared.listener_count(), 0);
}

#[test]
fn bound_component_can_hold_other_state() {
    let runtime = Runtime::new();
    let shared = Store::new(json!({ "foo": "bar" }));
    let clicks: Rc<RefCell<Option<StateCell<u32>>>> = Rc::new(RefCell::new(None));

    let mounted = runtime
        .mount({
            let shared = shared.clone();
            let clicks = Rc::clone(&clicks);
            move || {
                let store: Store<Value> = use_store(&shared)?;
                let count = use_state(|| 0_u32)?;
                *clicks.borrow_mut() = Some(count.clone());
                Ok(format!("{} x{}", store.get()["foo"], count.get()))
            }
        })
        .unwrap();
    let count = clicks.borrow().clone().unwrap();

    runtime
        .act(|| {
            count.set(2);
            shared.put(json!({ "foo": "baz" }));
        })
        .unwrap();

    assert_eq!(mounted.output(), "\"baz\" x2");
    assert_eq!(mounted.render_count(), 2);
}

proptest! {
    #[test]
    fn every_flushed_change_renders_once(values in proptest::collection::vec(any::<i64>(), 1..20)) {
        let runtime = Runtime::new();
        let shared = Store::new(0_i64);
        let received = Rc::new(RefCell::new(Vec::new()));

        let mounted = runtime
            .mount({
                let shared = shared.clone();
                let received = Rc::clone(&received);
                move || {
                    let store: Store<i64> = use_store(&shared)?;
                    received.borrow_mut().push(store.clone());
                    Ok(store.get())
                }
            })
            .unwrap();

        for value in &values {
            runtime.act(|| shared.set(*value)).unwrap();
            prop_assert_eq!(mounted.output(), *value);
        }

        prop_assert_eq!(mounted.render_count(), values.len() + 1);
        prop_assert!(received.borrow().iter().all(|s| s.ptr_eq(&shared)));
        prop_assert_eq!(shared.listener_count(), 1);

        mounted.unmount();
        prop_assert_eq!(shared.listener_count(), 0);
    }
}
