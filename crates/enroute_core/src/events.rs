//! In-process change notification bus.
//!
//! # Responsibility
//! - Fan out payload-less change events to every subscriber of an event name.
//!
//! # Invariants
//! - Dispatch is synchronous and follows subscription order.
//! - `Subscription::unsubscribe` removes exactly the handler it was issued for.
//! - Handlers may subscribe, unsubscribe or publish while being dispatched;
//!   changes made during a dispatch apply from the next `publish` on.
//! - Scope is one process; nothing crosses process boundaries.

use log::trace;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

pub const ACTIVITIES_CHANGED: &str = "activities:changed";
pub const BOOKINGS_CHANGED: &str = "bookings:changed";
pub const PAYOUTS_CHANGED: &str = "payouts:changed";

type Handler = Rc<dyn Fn()>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    by_event: BTreeMap<String, Vec<(u64, Handler)>>,
}

/// Cloneable handle to one shared observer registry.
#[derive(Clone, Default)]
pub struct EventBus {
    listeners: Rc<RefCell<Listeners>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `event`.
    ///
    /// The handler stays registered until the returned subscription is
    /// explicitly unsubscribed; dropping the subscription does not remove it.
    pub fn subscribe(&self, event: &str, handler: impl Fn() + 'static) -> Subscription {
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners
            .by_event
            .entry(event.to_string())
            .or_default()
            .push((id, Rc::new(handler)));

        Subscription {
            listeners: Rc::downgrade(&self.listeners),
            event: event.to_string(),
            id,
        }
    }

    /// Calls every handler registered for `event` and returns how many ran.
    pub fn publish(&self, event: &str) -> usize {
        let handlers: Vec<Handler> = self
            .listeners
            .borrow()
            .by_event
            .get(event)
            .map(|entries| entries.iter().map(|(_, handler)| Rc::clone(handler)).collect())
            .unwrap_or_default();

        trace!(
            "event=bus_publish module=events name={event} listeners={}",
            handlers.len()
        );
        for handler in &handlers {
            handler();
        }
        handlers.len()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .borrow()
            .by_event
            .get(event)
            .map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let listeners = self.listeners.borrow();
        let mut map = f.debug_map();
        for (event, entries) in &listeners.by_event {
            map.entry(event, &entries.len());
        }
        map.finish()
    }
}

/// Receipt for one registered handler.
#[must_use = "keep the subscription to be able to unsubscribe later"]
#[derive(Debug)]
pub struct Subscription {
    listeners: Weak<RefCell<Listeners>>,
    event: String,
    id: u64,
}

impl Subscription {
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Removes the handler. Returns `false` when the bus is already gone.
    pub fn unsubscribe(self) -> bool {
        let Some(listeners) = self.listeners.upgrade() else {
            return false;
        };
        let mut listeners = listeners.borrow_mut();
        let Some(entries) = listeners.by_event.get_mut(&self.event) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|(id, _)| *id != self.id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            listeners.by_event.remove(&self.event);
        }
        removed
    }
}
