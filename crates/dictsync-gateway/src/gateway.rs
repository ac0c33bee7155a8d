//! Mutation gateway: bulk put/remove driven by host objects.
//!
//! Each key is an independent primitive against the collection. A per-key
//! conversion failure is logged, remembered, and skipped; the sweep still
//! processes the remaining keys and never rolls back keys already applied.
//! The first per-key failure is surfaced once the sweep completes. Storage
//! primitive failures are different: they abort immediately.

use dictsync_core::{Collection, Error};

use crate::convert::{to_key_string, to_native};
use crate::enumerate::enumerate;

/// Applies every `(key, value)` pair of `object` to the collection.
pub fn put<C: Collection>(collection: &mut C, object: &serde_json::Value) -> Result<(), Error> {
    let mut first_failure = None;

    for (key, value) in enumerate(object)? {
        match to_native(key, value) {
            Ok(native) => collection.set(key, native)?,
            Err(err) => {
                tracing::warn!(key, error = %err, "skipping unconvertible value in put");
                first_failure.get_or_insert(err);
            }
        }
    }

    match first_failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Removes the keys named by `object`'s property **values**.
///
/// The object's own keys are only indices into a list of target key names
/// stored as property values. Removing a key absent from the collection is
/// a no-op.
pub fn remove<C: Collection>(collection: &mut C, object: &serde_json::Value) -> Result<(), Error> {
    let mut first_failure = None;

    for (property, value) in enumerate(object)? {
        match to_key_string(property, value) {
            Ok(target) => {
                collection.remove(&target)?;
            }
            Err(err) => {
                tracing::warn!(property, error = %err, "skipping unconvertible key in remove");
                first_failure.get_or_insert(err);
            }
        }
    }

    match first_failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dictsync_core::{MemoryCollection, Value};
    use serde_json::json;

    /// Collection whose primitives fail on one poisoned key.
    struct FailingStore {
        inner: MemoryCollection,
        poison: &'static str,
    }

    impl FailingStore {
        fn new(poison: &'static str) -> Self {
            Self {
                inner: MemoryCollection::new(),
                poison,
            }
        }
    }

    impl Collection for FailingStore {
        fn set(&mut self, key: &str, value: Value) -> Result<(), Error> {
            if key == self.poison {
                return Err(Error::Storage("disk full".into()));
            }
            self.inner.set(key, value)
        }

        fn get(&self, key: &str) -> Option<&Value> {
            self.inner.get(key)
        }

        fn remove(&mut self, key: &str) -> Result<bool, Error> {
            if key == self.poison {
                return Err(Error::Storage("disk full".into()));
            }
            self.inner.remove(key)
        }

        fn contains_key(&self, key: &str) -> bool {
            self.inner.contains_key(key)
        }

        fn len(&self) -> usize {
            self.inner.len()
        }
    }

    #[test]
    fn put_applies_every_pair() {
        let mut coll = MemoryCollection::new();
        put(&mut coll, &json!({"x": "hello", "y": 2})).unwrap();

        assert_eq!(coll.get("x"), Some(&Value::String("hello".into())));
        assert_eq!(coll.get("y"), Some(&Value::Int(2)));
    }

    #[test]
    fn put_rejects_non_objects() {
        let mut coll = MemoryCollection::new();
        let err = put(&mut coll, &json!("not an object")).unwrap_err();
        assert_eq!(err.to_string(), "object expected");
    }

    #[test]
    fn put_conversion_failure_does_not_abort_the_sweep() {
        let mut coll = MemoryCollection::new();
        let err = put(&mut coll, &json!({"a": 1, "bad": [1, 2], "z": "ok"})).unwrap_err();

        // The offending key is named...
        assert!(err.to_string().contains("'bad'"));
        // ...while keys before and after it were applied.
        assert_eq!(coll.get("a"), Some(&Value::Int(1)));
        assert_eq!(coll.get("z"), Some(&Value::String("ok".into())));
        assert!(coll.get("bad").is_none());
    }

    #[test]
    fn put_surfaces_the_first_of_several_failures() {
        let mut coll = MemoryCollection::new();
        let err = put(&mut coll, &json!({"bad1": [], "bad2": {}})).unwrap_err();
        assert!(err.to_string().contains("'bad1'"));
    }

    #[test]
    fn put_storage_failure_aborts_the_sweep() {
        let mut coll = FailingStore::new("boom");
        let err = put(&mut coll, &json!({"a": 1, "boom": 2, "z": 3})).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));

        // Keys before the failing primitive were applied; keys after it
        // were never reached, unlike a conversion failure.
        assert_eq!(coll.get("a"), Some(&Value::Int(1)));
        assert!(coll.get("z").is_none());
    }

    #[test]
    fn remove_storage_failure_aborts_the_sweep() {
        let mut coll = FailingStore::new("boom");
        coll.set("x", Value::Int(1)).unwrap();
        coll.set("y", Value::Int(2)).unwrap();

        let err = remove(&mut coll, &json!({"0": "x", "1": "boom", "2": "y"})).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
        assert!(coll.get("x").is_none());
        assert_eq!(coll.get("y"), Some(&Value::Int(2)));
    }

    #[test]
    fn remove_targets_property_values_not_names() {
        let mut coll = MemoryCollection::new();
        coll.set("x", Value::Int(1)).unwrap();
        coll.set("k", Value::Int(2)).unwrap();

        remove(&mut coll, &json!({"k": "x"})).unwrap();

        // "x" (the property value) is gone; "k" (the property name) stays.
        assert!(coll.get("x").is_none());
        assert_eq!(coll.get("k"), Some(&Value::Int(2)));
    }

    #[test]
    fn remove_of_absent_key_is_a_noop() {
        let mut coll = MemoryCollection::new();
        coll.set("kept", Value::Int(1)).unwrap();

        remove(&mut coll, &json!({"0": "ghost"})).unwrap();
        assert_eq!(coll.len(), 1);
    }

    #[test]
    fn remove_coerces_numeric_targets() {
        let mut coll = MemoryCollection::new();
        coll.set("42", Value::Int(1)).unwrap();

        remove(&mut coll, &json!({"0": 42})).unwrap();
        assert!(coll.is_empty());
    }

    #[test]
    fn remove_skips_unstringable_targets_but_finishes() {
        let mut coll = MemoryCollection::new();
        coll.set("x", Value::Int(1)).unwrap();
        coll.set("y", Value::Int(2)).unwrap();

        let err = remove(&mut coll, &json!({"0": null, "1": "x"})).unwrap_err();
        assert!(err.to_string().contains("'0'"));
        // The sweep still removed "x".
        assert!(coll.get("x").is_none());
        assert_eq!(coll.get("y"), Some(&Value::Int(2)));
    }
}
