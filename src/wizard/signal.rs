// ABOUTME: Publish/subscribe channel for step completion notifications
// Any number of observers can react to a completed step without the flow
// controller holding references to them

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, error};

/// Payload broadcast when a step passes validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepCompleted {
    pub step_id: u32,
}

type Handler = Arc<dyn Fn(&StepCompleted) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    handlers: Vec<(u64, Handler)>,
}

/// Named completion broadcast, cloned by reference into every participant.
///
/// Delivery is synchronous and in subscription order. Events are not
/// retained: a handler subscribed after an emit never sees it.
#[derive(Clone, Default)]
pub struct CompletionSignal {
    inner: Arc<Mutex<Subscribers>>,
}

impl CompletionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler`; it stays registered until the returned
    /// [`Subscription`] is dropped or explicitly unsubscribed.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&StepCompleted) + Send + Sync + 'static,
    {
        let Ok(mut subs) = self.inner.lock() else {
            error!("Completion signal lock poisoned, subscription ignored");
            return Subscription::detached();
        };
        let id = subs.next_id;
        subs.next_id += 1;
        subs.handlers.push((id, Arc::new(handler)));
        debug!("Completion subscriber {} registered", id);

        Subscription {
            id,
            signal: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every current subscriber; returns how many received it
    pub fn emit(&self, event: StepCompleted) -> usize {
        // Snapshot so handlers may subscribe/unsubscribe while being called
        let handlers: Vec<Handler> = match self.inner.lock() {
            Ok(subs) => subs.handlers.iter().map(|(_, h)| Arc::clone(h)).collect(),
            Err(_) => {
                error!("Completion signal lock poisoned, event for step {} dropped", event.step_id);
                return 0;
            }
        };

        debug!("Emitting completion of step {} to {} subscribers", event.step_id, handlers.len());
        for handler in &handlers {
            handler(&event);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().map(|s| s.handlers.len()).unwrap_or(0)
    }
}

/// Handle returned by [`CompletionSignal::subscribe`]; dropping it unsubscribes
#[must_use = "dropping a Subscription immediately unsubscribes the handler"]
pub struct Subscription {
    id: u64,
    signal: Weak<Mutex<Subscribers>>,
}

impl Subscription {
    fn detached() -> Self {
        Self {
            id: u64::MAX,
            signal: Weak::new(),
        }
    }

    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.signal.upgrade() {
            if let Ok(mut subs) = inner.lock() {
                subs.handlers.retain(|(id, _)| *id != self.id);
            }
        }
    }
}
