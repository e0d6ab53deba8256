//! Event bus for lifecycle notifications.
//!
//! The bus provides a push-based subscription model: subscribers register
//! callbacks that are invoked whenever the slot lifecycle moves. The bus
//! holds strong references to subscribers, so they persist until explicitly
//! removed or the bus is dropped.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::services::slot_lifecycle::LifecycleEvent;

#[derive(Clone)]
pub struct LifecycleEventBus {
    subscribers: Arc<Mutex<Vec<Box<dyn FnMut(LifecycleEvent) + Send + 'static>>>>,
}

impl LifecycleEventBus {
    /// Create a new bus with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Subscribe to all lifecycle events.
    ///
    /// The callback is invoked for every event the controller emits, in
    /// dispatch order.
    pub async fn subscribe(&self, callback: impl FnMut(LifecycleEvent) + Send + 'static) {
        self.subscribers.lock().await.push(Box::new(callback));
    }

    /// Subscribe from a non-async context.
    ///
    /// Registration happens on a spawned task, so an event dispatched
    /// immediately afterwards may not reach this subscriber yet.
    pub fn subscribe_sync(&self, callback: impl FnMut(LifecycleEvent) + Send + 'static) {
        let subscribers = Arc::clone(&self.subscribers);
        tokio::spawn(async move {
            subscribers.lock().await.push(Box::new(callback));
        });
    }

    /// Dispatch an event to all subscribers.
    ///
    /// Each subscriber's callback is invoked with a clone of the event.
    pub async fn dispatch(&self, event: LifecycleEvent) {
        let mut subscribers = self.subscribers.lock().await;
        for subscriber in subscribers.iter_mut() {
            subscriber(event.clone());
        }
    }

    /// Get the number of subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }

    /// Clear all subscribers.
    pub async fn clear(&self) {
        self.subscribers.lock().await.clear();
    }
}

impl Default for LifecycleEventBus {
    fn default() -> Self {
        Self::new()
    }
}
