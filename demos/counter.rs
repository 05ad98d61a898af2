//! Counter components sharing one store

use std::collections::BTreeMap;

use tincan_bind::{use_effect, use_store, Initializer, Runtime, Store};

type Counters = BTreeMap<String, i64>;

fn main() -> tincan_bind::Result<()> {
    println!("=== Shared Counter Store ===\n");

    let runtime = Runtime::new();
    let shared: Store<Counters> = Store::new(BTreeMap::from([("clicks".to_string(), 0)]));

    // Subscribe a plain listener, outside any component
    let _log = shared.listen(|counters| println!("   [Store] {counters:?}"), false);

    println!("1. Mounting a display bound to the shared store");
    let display = runtime.mount({
        let shared = shared.clone();
        move || {
            let store: Store<Counters> = use_store(&shared)?;
            use_effect(|| {
                println!("   [Display] mounted");
                || println!("   [Display] unmounted")
            })?;
            Ok(store.read(|counters| format!("{counters:?}")))
        }
    })?;
    println!("   render #{}: {}", display.render_count(), display.output());

    println!("\n2. Mounting a component with its own store");
    let local = runtime.mount(|| {
        let store: Store<Counters> = use_store(Initializer::lazy(|| {
            BTreeMap::from([("local".to_string(), 100)])
        }))?;
        Ok(store.get())
    })?;
    println!("   render #{}: {:?}", local.render_count(), local.output());

    println!("\n3. Incrementing through the shared store");
    for _ in 0..3 {
        runtime.act(|| {
            shared.update(|counters| {
                *counters.entry("clicks".to_string()).or_default() += 1;
            })
        })?;
        println!("   render #{}: {}", display.render_count(), display.output());
    }

    println!("\n4. Merging a partial update");
    runtime.act(|| shared.put(BTreeMap::from([("misses".to_string(), 2)])))?;
    println!("   render #{}: {}", display.render_count(), display.output());

    println!("\n5. Unmounting the display");
    display.unmount();
    runtime.act(|| shared.set(Counters::new()))?;
    println!("   listeners left on shared store: {}", shared.listener_count());
    println!("   local component renders: {}", local.render_count());

    println!("\n=== Demo Complete ===");
    Ok(())
}
