// src/services/store.rs
use tokio::sync::watch;

/// Observable value. Writers replace the value wholesale; subscribers are
/// woken on every change and always read the latest value.
pub struct StateStore<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> StateStore<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn set(&self, value: T) {
        // send_replace keeps working when nobody is subscribed
        self.tx.send_replace(value);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + PartialEq> StateStore<T> {
    /// Stores `value` and wakes subscribers only if it differs from the
    /// current one. Returns whether anything changed.
    pub fn set_if_changed(&self, value: T) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_without_subscribers_still_stores() {
        let store = StateStore::new(0);
        store.set(5);
        assert_eq!(store.get(), 5);
    }

    #[tokio::test]
    async fn subscribers_see_latest_value() {
        let store = StateStore::new("loading".to_string());
        let mut rx = store.subscribe();

        store.set("first".to_string());
        store.set("second".to_string());

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), "second");
    }

    #[tokio::test]
    async fn unchanged_value_does_not_wake_subscribers() {
        let store = StateStore::new(1);
        let rx = store.subscribe();

        assert!(!store.set_if_changed(1));
        assert!(!rx.has_changed().unwrap());

        assert!(store.set_if_changed(2));
        assert!(rx.has_changed().unwrap());
        assert_eq!(store.get(), 2);
    }
}
