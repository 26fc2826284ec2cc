//! Latest-value observable.
//!
//! # Invariants
//! - A new observer receives the current value before `subscribe` returns.
//! - `next` delivers to every observer synchronously, in registration order.

use std::fmt::{Debug, Formatter};

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer<T> = Box<dyn FnMut(&T)>;

/// Holds a current value and pushes every replacement to its observers.
pub struct Subject<T> {
    current: T,
    observers: Vec<(SubscriptionId, Observer<T>)>,
    next_id: u64,
}

impl<T> Subject<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    /// Current value.
    pub fn value(&self) -> &T {
        &self.current
    }

    /// Registers `observer` and replays the current value to it.
    pub fn subscribe(&mut self, mut observer: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        observer(&self.current);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` when `id` is not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(registered, _)| *registered != id);
        self.observers.len() != before
    }

    /// Replaces the current value and notifies all observers.
    pub fn next(&mut self, value: T) {
        self.current = value;
        self.notify();
    }

    /// Mutates the current value in place, then notifies all observers.
    pub fn update(&mut self, mutate: impl FnOnce(&mut T)) {
        mutate(&mut self.current);
        self.notify();
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify(&mut self) {
        for (_, observer) in &mut self.observers {
            observer(&self.current);
        }
    }
}

impl<T: Default> Default for Subject<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Debug> Debug for Subject<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject")
            .field("current", &self.current)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Subject;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn subscribe_replays_current_value() {
        let mut subject = Subject::new(7);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        subject.subscribe(move |value| sink.borrow_mut().push(*value));

        assert_eq!(*seen.borrow(), vec![7]);
    }

    #[test]
    fn next_notifies_in_registration_order() {
        let mut subject = Subject::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        for name in ["first", "second", "third"] {
            let sink = Rc::clone(&log);
            subject.subscribe(move |value: &i32| sink.borrow_mut().push((name, *value)));
        }
        log.borrow_mut().clear();

        subject.next(5);

        assert_eq!(
            *log.borrow(),
            vec![("first", 5), ("second", 5), ("third", 5)]
        );
        assert_eq!(*subject.value(), 5);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut subject = Subject::new(String::from("a"));
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);

        let id = subject.subscribe(move |_| *sink.borrow_mut() += 1);
        assert!(subject.unsubscribe(id));
        assert!(!subject.unsubscribe(id));

        subject.next(String::from("b"));
        assert_eq!(*count.borrow(), 1);
        assert_eq!(subject.observer_count(), 0);
    }

    #[test]
    fn update_mutates_in_place_and_notifies_once() {
        let mut subject = Subject::new(vec![1, 2]);
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        subject.subscribe(move |_| *sink.borrow_mut() += 1);

        subject.update(|values| values.push(3));

        assert_eq!(subject.value(), &vec![1, 2, 3]);
        assert_eq!(*count.borrow(), 2);
    }
}
