//! Closure adapters for host callbacks and contexts.

use std::rc::Rc;

use dictsync_core::subscription::{HostContext, Subscriber};
use dictsync_core::{Changeset, Error};

use crate::convert::changeset_to_host;

/// Adapter wrapping a closure into a [`Subscriber`].
///
/// The closure receives the changeset already marshaled into the host's
/// value representation, which is what an external function value would
/// be handed.
pub struct FnSubscriber<F>(F);

impl<F> Subscriber for FnSubscriber<F>
where
    F: Fn(serde_json::Value) -> Result<(), Error>,
{
    fn on_change(&self, changeset: &Changeset) -> Result<(), Error> {
        (self.0)(changeset_to_host(changeset))
    }
}

/// Wraps `f` as an externally-invocable callback value.
///
/// The returned `Rc` carries the callback's identity: pass the same `Rc`
/// to `removeListener` to unregister it.
pub fn json_callback<F>(f: F) -> Rc<dyn Subscriber>
where
    F: Fn(serde_json::Value) -> Result<(), Error> + 'static,
{
    Rc::new(FnSubscriber(f))
}

/// Context whose error channel is the log.
///
/// Stand-in for a real host execution context in embeddings and tests.
#[derive(Debug, Default)]
pub struct LoggingContext;

impl HostContext for LoggingContext {
    fn report_error(&self, error: &Error) {
        tracing::warn!(%error, "host callback error");
    }
}
