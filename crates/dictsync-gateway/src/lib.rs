//! dictsync gateway - host-runtime binding layer.
//!
//! Translates between a dynamically-typed host runtime and the native
//! collection in `dictsync-core`: argument validation with the host's
//! fixed error messages, key enumeration over dynamic objects, value
//! conversion, the bulk put/remove mutation gateway, and the method table
//! bound on the host-visible dictionary object. Host values are
//! `serde_json::Value`; object key order is the host object model's
//! insertion order.

pub mod args;
pub mod binding;
pub mod callback;
pub mod convert;
pub mod enumerate;
pub mod gateway;

pub use args::{Args, HostArg, CALLBACK_REQUIRED, METHOD_CANNOT_BE_EMPTY, OBJECT_EXPECTED};
pub use binding::{Dictionary, METHOD_NAMES};
pub use callback::{json_callback, FnSubscriber, LoggingContext};
pub use convert::{changeset_to_host, to_host, to_key_string, to_native};
pub use enumerate::{enumerate, ObjectEntries};
pub use gateway::{put, remove};
