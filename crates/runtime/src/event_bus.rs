use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(0);

/// Handle returned by [`EventBus::on`]; pass it to [`EventBus::off`].
///
/// Unique across every bus in the process, so an id never matches a listener
/// on a bus that did not issue it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

pub type Handler<E> = Box<dyn FnMut(&E) + Send>;

struct Listener<K, E> {
    id: ListenerId,
    kind: K,
    handler: Handler<E>,
}

/// Ordered listener registry keyed by event kind.
///
/// Delivery order is registration order, so replaying the same sequence of
/// `on`/`emit` calls always invokes handlers in the same order.
pub struct EventBus<K, E> {
    listeners: Vec<Listener<K, E>>,
    emitted: u64,
}

impl<K, E> Default for EventBus<K, E> {
    fn default() -> Self {
        Self {
            listeners: Vec::new(),
            emitted: 0,
        }
    }
}

impl<K, E> std::fmt::Debug for EventBus<K, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .field("emitted", &self.emitted)
            .finish()
    }
}

impl<K: Copy + PartialEq + std::fmt::Debug, E> EventBus<K, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, kind: K, handler: Handler<E>) -> ListenerId {
        let id = ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed));
        self.listeners.push(Listener { id, kind, handler });
        id
    }

    /// Removes a listener. Returns `false` if `id` was not registered.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Delivers `event` to every listener of `kind`; returns how many ran.
    pub fn emit(&mut self, kind: K, event: &E) -> usize {
        self.emitted += 1;
        let mut delivered = 0usize;
        for listener in self.listeners.iter_mut().filter(|l| l.kind == kind) {
            (listener.handler)(event);
            delivered += 1;
        }
        trace!(?kind, delivered, "event emitted");
        delivered
    }

    pub fn listener_count(&self, kind: K) -> usize {
        self.listeners.iter().filter(|l| l.kind == kind).count()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Total number of `emit` calls, delivered or not.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

#[cfg(test)]
mod tests {
    use super::EventBus;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Copy, Clone, PartialEq)]
    enum Kind {
        A,
        B,
    }

    #[test]
    fn delivers_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut bus: EventBus<Kind, u32> = EventBus::new();
        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            bus.on(Kind::A, Box::new(move |v: &u32| seen.lock().unwrap().push((tag, *v))));
        }

        assert_eq!(bus.emit(Kind::A, &7), 2);
        assert_eq!(*seen.lock().unwrap(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn filters_by_kind() {
        let hits = Arc::new(Mutex::new(0));
        let mut bus: EventBus<Kind, ()> = EventBus::new();
        let h = Arc::clone(&hits);
        bus.on(Kind::A, Box::new(move |_: &()| *h.lock().unwrap() += 1));

        assert_eq!(bus.emit(Kind::B, &()), 0);
        assert_eq!(*hits.lock().unwrap(), 0);
        assert_eq!(bus.listener_count(Kind::A), 1);
        assert_eq!(bus.listener_count(Kind::B), 0);
        assert_eq!(bus.emitted(), 1);
    }

    #[test]
    fn off_removes_listener_once() {
        let mut bus: EventBus<Kind, ()> = EventBus::new();
        let id = bus.on(Kind::B, Box::new(|_: &()| {}));
        assert!(bus.off(id));
        assert!(!bus.off(id));
        assert!(bus.is_empty());
        assert_eq!(bus.emit(Kind::B, &()), 0);
    }

    #[test]
    fn ids_from_one_bus_do_not_match_another() {
        let mut a: EventBus<Kind, ()> = EventBus::new();
        let mut b: EventBus<Kind, ()> = EventBus::new();
        let from_a = a.on(Kind::A, Box::new(|_: &()| {}));
        let from_b = b.on(Kind::A, Box::new(|_: &()| {}));

        assert_ne!(from_a, from_b);
        assert!(!b.off(from_a));
        assert_eq!(b.listener_count(Kind::A), 1);
        assert!(a.off(from_a));
    }
}
