//! Port for chain lifecycle observation.
//!
//! Defines the [`ChainObserver`] trait that receives every [`ChainEvent`]
//! emitted while a tool chain runs (planning, tool attempts, retries,
//! completion).
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while observers get the typed event stream
//! (e.g. for a JSONL transcript or a UI).

use enzymeml_domain::ChainEvent;
#[cfg(any(test, feature = "test-support"))]
use std::sync::Mutex;

/// Receiver of chain lifecycle events.
///
/// `on_event` is synchronous and never awaited by the chain. It must return
/// quickly; a panic inside it is caught by the emitter and logged, it never
/// reaches the chain.
pub trait ChainObserver: Send + Sync {
    fn on_event(&self, event: &ChainEvent);
}

/// No-op implementation for tests and when observation is disabled.
pub struct NoChainObserver;

impl ChainObserver for NoChainObserver {
    fn on_event(&self, _event: &ChainEvent) {}
}

/// Adapter for plain closures.
pub struct FnObserver<F>(pub F);

impl<F> ChainObserver for FnObserver<F>
where
    F: Fn(&ChainEvent) + Send + Sync,
{
    fn on_event(&self, event: &ChainEvent) {
        (self.0)(event)
    }
}

/// Observer that keeps every event in memory. Test double, only built
/// with the `test-support` feature.
#[cfg(any(test, feature = "test-support"))]
#[derive(Default)]
pub struct RecordingChainObserver {
    events: Mutex<Vec<ChainEvent>>,
}

#[cfg(any(test, feature = "test-support"))]
impl RecordingChainObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<ChainEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Event tag names in emission order.
    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(ChainEvent::name).collect()
    }

    /// Number of events with the given tag.
    pub fn count(&self, name: &str) -> usize {
        self.events().iter().filter(|e| e.name() == name).count()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl ChainObserver for RecordingChainObserver {
    fn on_event(&self, event: &ChainEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
