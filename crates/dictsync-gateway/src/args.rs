//! Host-call argument validation.
//!
//! Arguments arrive from the host runtime as a slice of [`HostArg`]s plus
//! the calling execution context. The `validated_*` helpers mirror the
//! checked coercions of the host binding layer: each failure carries the
//! fixed host-facing message asserted by the test suite.

use std::rc::Rc;

use dictsync_core::subscription::{HostContext, Subscriber};
use dictsync_core::Error;

/// Fixed message for a missing or non-callable listener argument.
pub const CALLBACK_REQUIRED: &str = "A callback function is required.";

/// Fixed message for a missing first argument to `put` / `remove`.
pub const METHOD_CANNOT_BE_EMPTY: &str = "This method cannot be empty.";

/// Fixed message for a non-object handle passed to the enumeration bridge.
pub const OBJECT_EXPECTED: &str = "object expected";

/// One argument supplied by the host runtime.
#[derive(Clone)]
pub enum HostArg {
    /// A dynamic host value.
    Value(serde_json::Value),
    /// An externally-invocable function value.
    Callback(Rc<dyn Subscriber>),
}

impl HostArg {
    /// Wrap a dynamic host value.
    pub fn value(value: serde_json::Value) -> Self {
        HostArg::Value(value)
    }

    /// Wrap a host function value.
    pub fn callback(callback: Rc<dyn Subscriber>) -> Self {
        HostArg::Callback(callback)
    }
}

impl std::fmt::Debug for HostArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostArg::Value(value) => f.debug_tuple("Value").field(value).finish(),
            HostArg::Callback(_) => f.debug_tuple("Callback").finish(),
        }
    }
}

/// Arguments of one host method call.
pub struct Args<'a> {
    context: Rc<dyn HostContext>,
    values: &'a [HostArg],
}

impl<'a> Args<'a> {
    /// Bundle the calling context with the argument slice.
    pub fn new(context: Rc<dyn HostContext>, values: &'a [HostArg]) -> Self {
        Self { context, values }
    }

    /// The calling execution context.
    pub fn context(&self) -> &Rc<dyn HostContext> {
        &self.context
    }

    /// Argument at `index`, or a validation error with `message`.
    pub fn get(&self, index: usize, message: &str) -> Result<&HostArg, Error> {
        self.values.get(index).ok_or_else(|| Error::validation(message))
    }

    /// Number of arguments supplied.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the call carried no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Coerce an argument to a callable function value.
pub fn validated_callback(arg: &HostArg) -> Result<Rc<dyn Subscriber>, Error> {
    match arg {
        HostArg::Callback(callback) => Ok(callback.clone()),
        HostArg::Value(_) => Err(Error::validation(CALLBACK_REQUIRED)),
    }
}

/// Coerce an argument to a dynamic object handle.
pub fn validated_object(arg: &HostArg) -> Result<&serde_json::Value, Error> {
    match arg {
        HostArg::Value(value) if value.is_object() => Ok(value),
        _ => Err(Error::validation(OBJECT_EXPECTED)),
    }
}
