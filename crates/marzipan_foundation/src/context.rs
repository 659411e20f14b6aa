//! Opaque caller-supplied context threaded through every operation.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A caller-supplied value forwarded to validators, computed field names,
/// and method accessors. The kernel never inspects it.
///
/// Cloning is cheap; the payload is shared.
#[derive(Clone)]
pub struct Context {
    inner: Arc<dyn Any + Send + Sync>,
}

impl Context {
    /// Wraps an arbitrary payload.
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self {
            inner: Arc::new(payload),
        }
    }

    /// Downcasts the payload to a concrete type.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Context(..)")
    }
}
