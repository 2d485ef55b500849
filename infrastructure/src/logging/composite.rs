//! Fan-out observer.

use enzymeml_application::ChainObserver;
use enzymeml_domain::ChainEvent;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::warn;

/// Forwards every event to each child observer in registration order.
///
/// A panicking child is logged and skipped; the remaining children still
/// receive the event.
#[derive(Default, Clone)]
pub struct CompositeChainObserver {
    observers: Vec<Arc<dyn ChainObserver>>,
}

impl CompositeChainObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn ChainObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn push(&mut self, observer: Arc<dyn ChainObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl ChainObserver for CompositeChainObserver {
    fn on_event(&self, event: &ChainEvent) {
        for observer in &self.observers {
            if catch_unwind(AssertUnwindSafe(|| observer.on_event(event))).is_err() {
                warn!(event = event.name(), "Chain observer panicked; event skipped");
            }
        }
    }
}
