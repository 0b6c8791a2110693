use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

type Handler<T> = Arc<dyn Fn(T) + Send + Sync>;

/// A single-subscriber notification slot.
///
/// Registering a handler replaces whatever handler was there before; there is
/// no fan-out. The handler captures its own context.
pub struct CallbackSlot<T> {
    handler: Mutex<Option<Handler<T>>>,
}

impl<T> CallbackSlot<T> {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self {
            handler: Mutex::new(None),
        }
    }

    /// Install `handler`, dropping any previously registered one.
    pub fn set<F>(&self, handler: F)
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        *self.lock() = Some(Arc::new(handler));
    }

    /// Remove the current handler, if any.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    /// Whether a handler is installed.
    pub fn is_set(&self) -> bool {
        self.lock().is_some()
    }

    /// Invoke the current handler with `value`.
    ///
    /// The lock is released before the handler runs, so a handler may
    /// re-register itself or another handler.
    pub fn notify(&self, value: T) {
        let handler = self.lock().clone();
        if let Some(handler) = handler {
            handler(value);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Handler<T>>> {
        self.handler.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for CallbackSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for CallbackSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSlot")
            .field("is_set", &self.is_set())
            .finish()
    }
}
