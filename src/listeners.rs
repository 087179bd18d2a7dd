use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ListenerId(u32);

impl From<u32> for ListenerId {
    fn from(id: u32) -> Self {
        ListenerId(id)
    }
}

impl From<ListenerId> for u32 {
    fn from(id: ListenerId) -> Self {
        id.0
    }
}

/// Callbacks run, in subscription order, on every event of a widget.
pub struct Listeners<E> {
    listeners: Vec<(ListenerId, Rc<dyn Fn(&E)>)>,
    last_id: u32,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self {
            listeners: vec![],
            last_id: 0,
        }
    }
}

impl<E> Listeners<E> {
    pub fn subscribe(&mut self, listener: impl Fn(&E) + 'static) -> ListenerId {
        self.last_id += 1;
        let id = ListenerId(self.last_id);
        self.listeners.push((id, Rc::new(listener)));
        id
    }

    /// Whether `id` was subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let count = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != count
    }

    pub fn notify(&self, event: &E) {
        for (_, listener) in &self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn should_notify_in_subscription_order() {
        let calls = Rc::new(RefCell::new(vec![]));
        let mut listeners = Listeners::<u32>::default();
        for name in ["first", "second"] {
            let calls = calls.clone();
            listeners.subscribe(move |event| calls.borrow_mut().push(format!("{name} {event}")));
        }

        listeners.notify(&7);

        assert_eq!(vec!["first 7", "second 7"], *calls.borrow());
    }

    #[test]
    fn should_give_distinct_ids_even_after_unsubscribing() {
        let mut listeners = Listeners::<()>::default();
        let first = listeners.subscribe(|_| {});
        assert!(listeners.unsubscribe(first));
        let second = listeners.subscribe(|_| {});

        assert_ne!(first, second);
        assert!(!listeners.unsubscribe(first));
        assert_eq!(1, listeners.len());
    }
}
