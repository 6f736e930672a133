// ── Snapshot cells ──
//
// The panel's collections are always a full copy of the server's last
// reply: every load replaces the whole value, nothing merges. A `Snapshot`
// is a watch-backed cell carrying `Arc<T>` so UI shells can subscribe to
// replacements and clone cheaply.

use std::sync::Arc;

use tokio::sync::watch;

/// A reactive full-replacement cell.
pub struct Snapshot<T> {
    cell: watch::Sender<Arc<T>>,
}

impl<T: Default> Default for Snapshot<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Snapshot<T> {
    pub fn new(initial: T) -> Self {
        let (cell, _) = watch::channel(Arc::new(initial));
        Self { cell }
    }

    /// Replace the whole value. Subscribers see exactly one change.
    pub fn replace(&self, value: T) {
        self.cell.send_replace(Arc::new(value));
    }

    /// The current value (cheap `Arc` clone).
    pub fn get(&self) -> Arc<T> {
        self.cell.borrow().clone()
    }

    /// Subscribe to replacements.
    pub fn subscribe(&self) -> watch::Receiver<Arc<T>> {
        self.cell.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn replace_swaps_the_whole_value() {
        let cell: Snapshot<Vec<u32>> = Snapshot::default();
        assert!(cell.get().is_empty());

        cell.replace(vec![1, 2, 3]);
        assert_eq!(*cell.get(), vec![1, 2, 3]);

        // A second replace discards the first wholesale.
        cell.replace(vec![9]);
        assert_eq!(*cell.get(), vec![9]);
    }

    #[tokio::test]
    async fn subscribers_observe_one_change_per_replace() {
        let cell: Snapshot<u32> = Snapshot::new(0);
        let mut rx = cell.subscribe();

        cell.replace(7);
        rx.changed().await.unwrap();
        assert_eq!(**rx.borrow_and_update(), 7);
        assert!(!rx.has_changed().unwrap());
    }
}
