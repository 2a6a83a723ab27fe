//! In-process publish/subscribe bus with sticky last-value replay.
//!
//! One bus instance is owned by the simulation session and passed by
//! reference to whatever needs it. Dispatch is synchronous, on the calling
//! thread, in subscription order. Handlers for sticky kinds registered after a
//! publish are invoked once with the cached value before `subscribe` returns.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use crate::events::{EventKind, GameEvent};

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&GameEvent)>;

struct Subscriber {
    id: SubscriptionId,
    handler: Handler,
}

/// Counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BusStats {
    pub published: u64,
    pub delivered: u64,
    /// Handlers that panicked; dispatch continued past them.
    pub handler_panics: u64,
}

#[derive(Default)]
pub struct EventBus {
    subscribers: HashMap<EventKind, Vec<Subscriber>>,
    last_sticky: HashMap<EventKind, GameEvent>,
    next_id: u64,
    stats: BusStats,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `kind`. Sticky kinds with a cached value replay it
    /// to this handler immediately.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let mut subscriber = Subscriber {
            id,
            handler: Box::new(handler),
        };

        if kind.is_sticky() {
            if let Some(last) = self.last_sticky.get(&kind) {
                dispatch(&mut subscriber, last, &mut self.stats);
            }
        }

        self.subscribers.entry(kind).or_default().push(subscriber);
        id
    }

    /// Remove a handler. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, kind: EventKind, id: SubscriptionId) {
        if let Some(list) = self.subscribers.get_mut(&kind) {
            list.retain(|s| s.id != id);
            if list.is_empty() {
                self.subscribers.remove(&kind);
            }
        }
    }

    /// Deliver `event` to every handler of its kind, caching it first if sticky.
    pub fn publish(&mut self, event: GameEvent) {
        let kind = event.kind();
        self.stats.published += 1;

        if kind.is_sticky() {
            self.last_sticky.insert(kind, event.clone());
        }

        if let Some(list) = self.subscribers.get_mut(&kind) {
            for subscriber in list.iter_mut() {
                dispatch(subscriber, &event, &mut self.stats);
            }
        }
    }

    /// Last published value of a sticky kind.
    pub fn last_sticky(&self, kind: EventKind) -> Option<&GameEvent> {
        self.last_sticky.get(&kind)
    }

    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.subscribers.get(&kind).map_or(0, Vec::len)
    }

    pub fn stats(&self) -> BusStats {
        self.stats
    }

    /// Drop cached sticky values but keep subscriptions.
    pub fn clear_sticky(&mut self) {
        self.last_sticky.clear();
    }

    /// Drop every handler and every cached sticky value. Session teardown only.
    pub fn reset_all(&mut self) {
        self.subscribers.clear();
        self.last_sticky.clear();
    }
}

fn dispatch(subscriber: &mut Subscriber, event: &GameEvent, stats: &mut BusStats) {
    let handler = &mut subscriber.handler;
    match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
        Ok(()) => stats.delivered += 1,
        Err(_) => {
            stats.handler_panics += 1;
            log::error!(
                "event handler {:?} panicked on {:?}; continuing dispatch",
                subscriber.id,
                event.kind()
            );
        }
    }
}
