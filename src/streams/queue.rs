use std::collections::VecDeque;

use tokio::sync::watch;

use crate::prelude::*;

#[derive(Default)]
struct QueueState {
    items: VecDeque<EntryRef>,
    closed: bool,
}

/// In-memory FIFO of entries.
///
/// Closing stops further pushes while consumers keep draining whatever was
/// already queued, then see `None` forever. Items live in the queue until
/// popped, so `try_next` sees them even while another task waits in `next`.
pub struct MemQueue {
    name: String,
    state: Mutex<QueueState>,
    // Bumped after every push and on close so waiters re-check the state.
    version_tx: watch::Sender<u64>,
}

impl MemQueue {
    pub fn new(name: impl Into<String>) -> Self {
        let (version_tx, _) = watch::channel(0);
        Self {
            name: name.into(),
            state: Mutex::new(QueueState::default()),
            version_tx,
        }
    }

    fn bump(&self) {
        self.version_tx.send_modify(|v| *v += 1);
    }
}

impl Entry for MemQueue {
    fn name(&self) -> &str {
        &self.name
    }

    fn into_queue(self: Arc<Self>) -> Option<Arc<dyn Queue>> {
        Some(self)
    }
}

#[async_trait]
impl Queue for MemQueue {
    fn push(&self, value: EntryRef) -> bool {
        {
            let mut state = lock(&self.state);
            if state.closed {
                debug!("dropping push to closed queue {}", self.name);
                return false;
            }
            state.items.push_back(value);
        }
        self.bump();
        true
    }

    async fn next(&self) -> Option<EntryRef> {
        // Items only leave the queue under the state lock, so dropping this
        // future mid-wait never loses a value.
        let mut version_rx = self.version_tx.subscribe();
        loop {
            // Mark the current version seen before looking, so a push racing
            // with the check still wakes the wait below.
            version_rx.borrow_and_update();
            {
                let mut state = lock(&self.state);
                if let Some(item) = state.items.pop_front() {
                    return Some(item);
                }
                if state.closed {
                    return None;
                }
            }
            if version_rx.changed().await.is_err() {
                return None;
            }
        }
    }

    fn try_next(&self) -> Option<EntryRef> {
        lock(&self.state).items.pop_front()
    }

    fn close(&self) {
        {
            let mut state = lock(&self.state);
            if state.closed {
                return;
            }
            state.closed = true;
        }
        debug!("closed queue {}", self.name);
        self.bump();
    }

    fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inmem::MemString;
    use std::time::Duration;

    fn value(v: &str) -> EntryRef {
        Arc::new(MemString::new(v, v))
    }

    fn name_of(entry: Option<EntryRef>) -> Option<String> {
        entry.map(|e| e.name().to_string())
    }

    #[tokio::test]
    async fn delivers_in_push_order() {
        let queue = MemQueue::new("q");
        for v in ["a", "b", "c"] {
            assert!(queue.push(value(v)));
        }
        assert_eq!(name_of(queue.next().await).as_deref(), Some("a"));
        assert_eq!(name_of(queue.next().await).as_deref(), Some("b"));
        assert_eq!(name_of(queue.next().await).as_deref(), Some("c"));
        queue.close();
        assert!(queue.next().await.is_none());
    }

    #[tokio::test]
    async fn close_drains_then_ends() {
        let queue = MemQueue::new("q");
        queue.push(value("x"));
        queue.push(value("y"));
        queue.close();
        queue.close();
        assert!(queue.is_closed());
        assert!(!queue.push(value("z")));
        assert_eq!(name_of(queue.next().await).as_deref(), Some("x"));
        assert_eq!(name_of(queue.try_next()).as_deref(), Some("y"));
        assert!(queue.next().await.is_none());
        assert!(queue.next().await.is_none());
    }

    #[tokio::test]
    async fn try_next_does_not_wait() {
        let queue = MemQueue::new("q");
        assert!(queue.try_next().is_none());
        queue.push(value("a"));
        assert_eq!(name_of(queue.try_next()).as_deref(), Some("a"));
        assert!(queue.try_next().is_none());
    }

    #[tokio::test]
    async fn next_wakes_on_push_and_close() {
        let queue = Arc::new(MemQueue::new("q"));
        let consumer = {
            let queue = queue.clone();
            tokio::spawn(async move {
                let mut seen = Vec::new();
                while let Some(v) = queue.next().await {
                    seen.push(v.name().to_string());
                }
                seen
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        queue.push(value("late"));
        queue.close();
        let seen = consumer.await.expect("consumer task");
        assert_eq!(seen, vec!["late".to_string()]);
    }

    #[tokio::test]
    async fn timed_out_next_leaves_queue_intact() {
        let queue = MemQueue::new("q");
        let waited = tokio::time::timeout(Duration::from_millis(10), queue.next()).await;
        assert!(waited.is_err());
        queue.push(value("after"));
        assert_eq!(name_of(queue.next().await).as_deref(), Some("after"));
    }

    #[tokio::test]
    async fn try_next_sees_items_while_a_consumer_waits() {
        let queue = Arc::new(MemQueue::new("q"));
        let waiter = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.next().await })
        };
        // Let the waiter park inside `next`.
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        assert!(queue.push(value("a")));
        assert_eq!(name_of(queue.try_next()).as_deref(), Some("a"));

        queue.close();
        let woken = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter woken by close")
            .expect("waiter task");
        assert!(woken.is_none());
    }
}
