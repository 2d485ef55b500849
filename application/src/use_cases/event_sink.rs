//! Fire-and-forget delivery of chain events.
//!
//! [`EventSink`] stamps each event with fresh metadata and hands it to the
//! optional observer. Observer panics are caught here and logged; they never
//! unwind into the executor or scheduler.

use crate::ports::chain_observer::ChainObserver;
use enzymeml_domain::{ChainContext, ChainEvent, ChainEventKind};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct EventSink {
    context: ChainContext,
    observer: Option<Arc<dyn ChainObserver>>,
}

impl EventSink {
    pub fn new(context: ChainContext, observer: Option<Arc<dyn ChainObserver>>) -> Self {
        Self { context, observer }
    }

    /// Sink without an observer.
    pub fn silent(context: ChainContext) -> Self {
        Self::new(context, None)
    }

    pub fn context(&self) -> &ChainContext {
        &self.context
    }

    /// Same observer, next recursion depth.
    pub fn at_depth(&self, depth: usize) -> Self {
        Self {
            context: self.context.at_depth(depth),
            observer: self.observer.clone(),
        }
    }

    pub fn emit(&self, kind: ChainEventKind) {
        let Some(observer) = &self.observer else {
            return;
        };

        let event = ChainEvent::new(self.context.snapshot(), kind);
        if catch_unwind(AssertUnwindSafe(|| observer.on_event(&event))).is_err() {
            warn!(event = event.name(), "Chain observer panicked; event dropped");
        }
    }
}

impl std::fmt::Debug for EventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSink")
            .field("context", &self.context)
            .field("observed", &self.observer.is_some())
            .finish()
    }
}
