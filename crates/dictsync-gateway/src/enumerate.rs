//! Key-enumeration bridge over dynamic host objects.
//!
//! Turns an opaque host object handle into a finite, single-pass sequence
//! of `(key, value)` pairs in the object's own enumeration order (insertion
//! order of its keys). Nothing is buffered; a second pass means calling
//! [`enumerate`] again.

use dictsync_core::Error;

use crate::args::OBJECT_EXPECTED;

/// Lazy iterator over an object's own `(key, value)` pairs.
#[derive(Debug)]
pub struct ObjectEntries<'a> {
    iter: serde_json::map::Iter<'a>,
}

impl<'a> Iterator for ObjectEntries<'a> {
    type Item = (&'a str, &'a serde_json::Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(key, value)| (key.as_str(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for ObjectEntries<'_> {}

/// Enumerates the object's own keys and values.
///
/// Fails with `object expected` when the handle does not denote an object.
pub fn enumerate(handle: &serde_json::Value) -> Result<ObjectEntries<'_>, Error> {
    match handle {
        serde_json::Value::Object(map) => Ok(ObjectEntries { iter: map.iter() }),
        _ => Err(Error::validation(OBJECT_EXPECTED)),
    }
}
