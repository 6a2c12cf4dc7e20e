//! Synchronous event bus
//!
//! Publish/subscribe over [`AppEvent`]. Handlers run to completion, in
//! subscription order, before `publish` returns. The subscriber list is
//! snapshotted before dispatch and the lock is not held while handlers run,
//! so a handler may publish or subscribe re-entrantly without corrupting the
//! list.

use regex::Regex;
use shared::events::AppEvent;
use std::sync::{Arc, Mutex};
use tracing::trace;

/// Matches event names for one subscription.
#[derive(Debug, Clone)]
pub enum EventFilter {
    /// Exact event name
    Exact(String),
    /// Regular-expression match over event names
    Pattern(Regex),
    /// Every event
    Any,
}

impl EventFilter {
    /// Exact-name filter.
    pub fn exact(name: impl Into<String>) -> Self {
        EventFilter::Exact(name.into())
    }

    /// Pattern filter; panics on an invalid expression, which is a
    /// programming error in the subscription site.
    pub fn pattern(expr: &str) -> Self {
        EventFilter::Pattern(Regex::new(expr).expect("invalid event pattern"))
    }

    fn accepts(&self, name: &str) -> bool {
        match self {
            EventFilter::Exact(exact) => exact == name,
            EventFilter::Pattern(regex) => regex.is_match(name),
            EventFilter::Any => true,
        }
    }
}

type Handler = Arc<dyn Fn(&AppEvent) + Send + Sync>;

struct Subscriber {
    filter: EventFilter,
    handler: Handler,
}

/// Synchronous publish/subscribe bus.
#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for events accepted by `filter`.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F)
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        self.subscribers
            .lock()
            .expect("event bus lock poisoned")
            .push(Subscriber {
                filter,
                handler: Arc::new(handler),
            });
    }

    /// Register a handler for one exact event name.
    pub fn on<F>(&self, name: &str, handler: F)
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        self.subscribe(EventFilter::exact(name), handler);
    }

    /// Register a handler invoked for every published event.
    pub fn subscribe_all<F>(&self, handler: F)
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        self.subscribe(EventFilter::Any, handler);
    }

    /// Publish an event to every matching handler.
    ///
    /// Handlers registered from inside a handler see only later publishes.
    pub fn publish(&self, event: &AppEvent) {
        let name = event.name();
        trace!(event = %name, "publish");

        let matching: Vec<Handler> = {
            let subscribers = self.subscribers.lock().expect("event bus lock poisoned");
            subscribers
                .iter()
                .filter(|s| s.filter.accepts(&name))
                .map(|s| Arc::clone(&s.handler))
                .collect()
        };

        for handler in matching {
            handler(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::OrderField;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn count_on(bus: &EventBus, filter: EventFilter) -> Arc<AtomicUsize> {
        let counter = Arc::new(AtomicUsize::new(0));
        let clone = Arc::clone(&counter);
        bus.subscribe(filter, move |_| {
            clone.fetch_add(1, Ordering::SeqCst);
        });
        counter
    }

    #[test]
    fn test_exact_subscription_matches_only_its_event() {
        let bus = EventBus::new();
        let basket = count_on(&bus, EventFilter::exact("basket:open"));
        let modal = count_on(&bus, EventFilter::exact("modal:open"));

        bus.publish(&AppEvent::BasketOpened);
        bus.publish(&AppEvent::BasketOpened);

        assert_eq!(basket.load(Ordering::SeqCst), 2);
        assert_eq!(modal.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_pattern_subscription_matches_field_changes() {
        let bus = EventBus::new();
        let order_fields = count_on(&bus, EventFilter::pattern(r"^order\..*:change$"));

        bus.publish(&AppEvent::OrderFieldChanged {
            field: OrderField::Address,
            value: "Main St".into(),
        });
        bus.publish(&AppEvent::ContactFieldChanged {
            field: OrderField::Email,
            value: "a@b.c".into(),
        });

        assert_eq!(order_fields.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscribe_all_sees_everything() {
        let bus = EventBus::new();
        let all = count_on(&bus, EventFilter::Any);

        bus.publish(&AppEvent::BasketOpened);
        bus.publish(&AppEvent::ModalClosed);
        bus.publish(&AppEvent::OrderSubmitted { total: 1 });

        assert_eq!(all.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_handlers_run_in_subscription_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            bus.on("modal:open", move |_| order.lock().unwrap().push(tag));
        }

        bus.publish(&AppEvent::ModalOpened);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_reentrant_publish_does_not_corrupt_dispatch() {
        let bus = Arc::new(EventBus::new());
        let closed = count_on(&bus, EventFilter::exact("modal:close"));

        let bus_clone = Arc::clone(&bus);
        bus.on("modal:open", move |_| {
            bus_clone.publish(&AppEvent::ModalClosed);
        });

        bus.publish(&AppEvent::ModalOpened);
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reentrant_subscribe_applies_to_later_publishes() {
        let bus = Arc::new(EventBus::new());
        let late = Arc::new(AtomicUsize::new(0));

        let bus_clone = Arc::clone(&bus);
        let late_clone = Arc::clone(&late);
        bus.on("modal:open", move |_| {
            let late = Arc::clone(&late_clone);
            bus_clone.on("modal:open", move |_| {
                late.fetch_add(1, Ordering::SeqCst);
            });
        });

        bus.publish(&AppEvent::ModalOpened);
        assert_eq!(late.load(Ordering::SeqCst), 0);

        bus.publish(&AppEvent::ModalOpened);
        assert_eq!(late.load(Ordering::SeqCst), 1);
    }
}
