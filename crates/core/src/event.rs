//! Typed multi-subscriber events
//!
//! Every host callback is fanned out through a [`TypedEvent`]. Handlers are
//! kept in registration order and identified by their `Arc` allocation, so the
//! same handle can be removed later.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// A registered event handler
pub type Handler<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// Multi-subscriber event carrying arguments of type `A`
pub struct TypedEvent<A: ?Sized> {
    handlers: Mutex<Vec<Handler<A>>>,
}

impl<A: ?Sized> TypedEvent<A> {
    /// Create an event with no handlers
    pub fn new() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
        }
    }

    fn handlers(&self) -> MutexGuard<'_, Vec<Handler<A>>> {
        match self.handlers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::error!("Event handler list poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Register a handler. Returns false if this exact handler is already registered.
    pub fn add_handler(&self, handler: Handler<A>) -> bool {
        let mut handlers = self.handlers();
        if handlers.iter().any(|h| same_handler(h, &handler)) {
            return false;
        }
        handlers.push(handler);
        true
    }

    /// Wrap a closure, register it and return the handle needed to remove it
    pub fn subscribe<F>(&self, f: F) -> Handler<A>
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        let handler: Handler<A> = Arc::new(f);
        self.add_handler(handler.clone());
        handler
    }

    /// Remove a handler. Returns whether it was registered.
    pub fn remove_handler(&self, handler: &Handler<A>) -> bool {
        let mut handlers = self.handlers();
        let before = handlers.len();
        handlers.retain(|h| !same_handler(h, handler));
        handlers.len() != before
    }

    /// Drop every registered handler
    pub fn remove_all_handlers(&self) {
        self.handlers().clear();
    }

    /// Number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.handlers().len()
    }

    /// Call every handler once, in registration order.
    ///
    /// The list is snapshotted first, so handlers may subscribe or
    /// unsubscribe while the event is being delivered. A panicking handler
    /// aborts delivery to the remaining ones.
    pub fn invoke(&self, args: &A) {
        let snapshot: Vec<Handler<A>> = self.handlers().clone();
        for handler in snapshot {
            handler(args);
        }
    }
}

impl<A: ?Sized> Default for TypedEvent<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized> fmt::Debug for TypedEvent<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedEvent")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

fn same_handler<A: ?Sized>(a: &Handler<A>, b: &Handler<A>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
