use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use serde_json::Value;

/// Shallow merge of a partial value into existing state.
///
/// Used by [`Store::put`](crate::Store::put). Top-level entries of the partial
/// overwrite entries of the same key; everything else is kept. Nested values are
/// replaced, never merged recursively.
pub trait Merge {
    /// The partial update accepted by `merge`.
    type Partial;

    /// Merge `partial` into `self`.
    fn merge(&mut self, partial: Self::Partial);
}

impl Merge for Value {
    type Partial = Value;

    /// Object into object overwrites keys. Any other combination replaces the value.
    fn merge(&mut self, partial: Value) {
        match (self, partial) {
            (Value::Object(state), Value::Object(partial)) => {
                for (key, value) in partial {
                    state.insert(key, value);
                }
            }
            (state, partial) => *state = partial,
        }
    }
}

impl<K: Ord, V> Merge for BTreeMap<K, V> {
    type Partial = BTreeMap<K, V>;

    fn merge(&mut self, partial: Self::Partial) {
        self.extend(partial);
    }
}

impl<K: Eq + Hash, V, S: BuildHasher> Merge for HashMap<K, V, S> {
    type Partial = HashMap<K, V, S>;

    fn merge(&mut self, partial: Self::Partial) {
        self.extend(partial);
    }
}
