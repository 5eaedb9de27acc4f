use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::viewport::Subscription;

type Listener<T> = Rc<RefCell<dyn FnMut(T)>>;

struct Registry<T> {
    next_id: u64,
    listeners: Vec<(u64, Listener<T>)>,
}

impl<T> Registry<T> {
    fn contains(&self, id: u64) -> bool {
        self.listeners.iter().any(|(i, _)| *i == id)
    }
}

/// Single-threaded callback registry.
///
/// Delivery is synchronous and in subscription order. A listener removed
/// while an `emit` is in progress is skipped for the rest of that delivery.
/// Values emitted from inside a listener are queued and delivered to every
/// listener once the current value has reached all of them, so listeners
/// always finish on the latest value.
pub struct Emitter<T> {
    registry: Rc<RefCell<Registry<T>>>,
    dispatching: Cell<bool>,
    pending: RefCell<VecDeque<T>>,
}

impl<T: Clone + 'static> Emitter<T> {
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
            dispatching: Cell::new(false),
            pending: RefCell::new(VecDeque::new()),
        }
    }

    pub fn subscribe(&self, listener: impl FnMut(T) + 'static) -> Subscription {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            let listener: Listener<T> = Rc::new(RefCell::new(listener));
            registry.listeners.push((id, listener));
            id
        };
        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Subscription::new(move || {
            let Some(registry) = weak.upgrade() else {
                return;
            };
            // Drop the listener outside the borrow: it may own guards of its own.
            let removed = {
                let mut registry = registry.borrow_mut();
                registry
                    .listeners
                    .iter()
                    .position(|(i, _)| *i == id)
                    .map(|pos| registry.listeners.remove(pos))
            };
            drop(removed);
        })
    }

    /// Deliver `value` to every live listener. Returns how many calls were
    /// made, including values queued by listeners during this delivery. A
    /// nested call returns 0: its value is delivered by the outer call.
    pub fn emit(&self, value: T) -> usize {
        if self.dispatching.replace(true) {
            self.pending.borrow_mut().push_back(value);
            return 0;
        }
        let mut delivered = self.deliver(value);
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(next) = next else {
                break;
            };
            delivered += self.deliver(next);
        }
        self.dispatching.set(false);
        delivered
    }

    fn deliver(&self, value: T) -> usize {
        let snapshot: Vec<(u64, Listener<T>)> = self.registry.borrow().listeners.to_vec();
        let mut delivered = 0;
        for (id, listener) in snapshot {
            if !self.registry.borrow().contains(id) {
                continue;
            }
            (listener.borrow_mut())(value.clone());
            delivered += 1;
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every listener and drop queued values. Outstanding guards
    /// become no-ops.
    pub fn clear(&self) {
        self.pending.borrow_mut().clear();
        let removed = std::mem::take(&mut self.registry.borrow_mut().listeners);
        drop(removed);
    }
}

impl<T: Clone + 'static> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivers_in_subscription_order() {
        let emitter = Emitter::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let a = seen.clone();
        let b = seen.clone();
        let _s1 = emitter.subscribe(move |v: u32| a.borrow_mut().push(("a", v)));
        let _s2 = emitter.subscribe(move |v: u32| b.borrow_mut().push(("b", v)));
        assert_eq!(emitter.emit(7), 2);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn disposed_listener_is_not_called() {
        let emitter = Emitter::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let mut sub = emitter.subscribe(move |_: u32| h.set(h.get() + 1));
        sub.dispose();
        assert_eq!(emitter.emit(1), 0);
        assert_eq!(hits.get(), 0);
        assert!(emitter.is_empty());
    }

    #[test]
    fn listener_removed_mid_delivery_is_skipped() {
        let emitter = Emitter::new();
        let second_hits = Rc::new(Cell::new(0));
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let v = victim.clone();
        let _first = emitter.subscribe(move |_: u32| {
            if let Some(mut sub) = v.borrow_mut().take() {
                sub.dispose();
            }
        });
        let h = second_hits.clone();
        *victim.borrow_mut() = Some(emitter.subscribe(move |_: u32| h.set(h.get() + 1)));

        assert_eq!(emitter.emit(1), 1);
        assert_eq!(second_hits.get(), 0);
        assert_eq!(emitter.len(), 1);
    }

    #[test]
    fn nested_emit_is_queued_after_current_value() {
        let emitter = Rc::new(Emitter::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let inner = Rc::downgrade(&emitter);
        let a = seen.clone();
        let _first = emitter.subscribe(move |v: u32| {
            a.borrow_mut().push(("a", v));
            if v == 1
                && let Some(emitter) = inner.upgrade()
            {
                assert_eq!(emitter.emit(2), 0);
            }
        });
        let b = seen.clone();
        let _second = emitter.subscribe(move |v: u32| b.borrow_mut().push(("b", v)));

        assert_eq!(emitter.emit(1), 4);
        assert_eq!(*seen.borrow(), vec![("a", 1), ("b", 1), ("a", 2), ("b", 2)]);
        assert_eq!(emitter.emit(3), 2);
    }

    #[test]
    fn guard_outliving_emitter_is_harmless() {
        let emitter = Emitter::new();
        let mut sub = emitter.subscribe(|_: u32| {});
        drop(emitter);
        sub.dispose();
        assert!(!sub.is_active());
    }

    #[test]
    fn clear_detaches_everyone() {
        let emitter = Emitter::new();
        let mut sub = emitter.subscribe(|_: u32| {});
        let _other = emitter.subscribe(|_: u32| {});
        emitter.clear();
        assert!(emitter.is_empty());
        sub.dispose();
        assert_eq!(emitter.emit(3), 0);
    }
}
