use std::collections::VecDeque;

use tokio::sync::watch;

use crate::prelude::*;

#[derive(Default)]
struct LogState {
    items: VecDeque<EntryRef>,
    /// Position of `items[0]`. Positions count every append ever made, so
    /// they stay stable when old entries are dropped.
    first: usize,
    closed: bool,
}

impl LogState {
    fn trim_before(&mut self, position: usize) -> usize {
        let drop = position.saturating_sub(self.first).min(self.items.len());
        self.items.drain(..drop);
        self.first += drop;
        drop
    }
}

/// In-memory append-only log with independent subscribers.
///
/// By default every appended entry is retained, so a subscription may start
/// at any position, including ones not yet reached. [`MemLog::with_retention`]
/// bounds how many entries are kept and [`MemLog::trim_before`] drops old ones
/// on demand; a subscriber that falls behind the oldest retained entry skips
/// ahead to it.
pub struct MemLog {
    name: String,
    retain: Option<usize>,
    state: Arc<RwLock<LogState>>,
    // Bumped after every append and on close so waiting subscribers re-check.
    version_tx: watch::Sender<u64>,
}

impl MemLog {
    pub fn new(name: impl Into<String>) -> Self {
        let (version_tx, _) = watch::channel(0);
        Self {
            name: name.into(),
            retain: None,
            state: Arc::new(RwLock::new(LogState::default())),
            version_tx,
        }
    }

    /// A log that keeps only the `keep` most recent entries (at least one).
    pub fn with_retention(name: impl Into<String>, keep: usize) -> Self {
        Self {
            retain: Some(keep.max(1)),
            ..Self::new(name)
        }
    }

    /// Drops every retained entry before `position`.
    pub fn trim_before(&self, position: usize) {
        let dropped = write_lock(&self.state).trim_before(position);
        if dropped > 0 {
            trace!("trimmed {} entries from log {}", dropped, self.name);
        }
    }

    /// Position of the oldest entry still retained.
    pub fn first_position(&self) -> usize {
        read_lock(&self.state).first
    }

    fn bump(&self) {
        self.version_tx.send_modify(|v| *v += 1);
    }
}

impl Entry for MemLog {
    fn name(&self) -> &str {
        &self.name
    }

    fn into_log(self: Arc<Self>) -> Option<Arc<dyn Log>> {
        Some(self)
    }
}

impl Log for MemLog {
    fn append(&self, value: EntryRef) -> bool {
        {
            let mut state = write_lock(&self.state);
            if state.closed {
                debug!("dropping append to closed log {}", self.name);
                return false;
            }
            state.items.push_back(value);
            if let Some(keep) = self.retain {
                let over = state.first + state.items.len().saturating_sub(keep);
                state.trim_before(over);
            }
        }
        self.bump();
        true
    }

    fn subscribe(&self, from: usize) -> Box<dyn Subscription> {
        Box::new(MemSubscription {
            state: self.state.clone(),
            version_rx: self.version_tx.subscribe(),
            position: from,
        })
    }

    fn close(&self) {
        {
            let mut state = write_lock(&self.state);
            if state.closed {
                return;
            }
            state.closed = true;
        }
        debug!("closed log {}", self.name);
        self.bump();
    }

    fn is_closed(&self) -> bool {
        read_lock(&self.state).closed
    }

    /// Number of entries ever appended, which is also the position the next
    /// append lands at.
    fn len(&self) -> usize {
        let state = read_lock(&self.state);
        state.first + state.items.len()
    }
}

struct MemSubscription {
    state: Arc<RwLock<LogState>>,
    version_rx: watch::Receiver<u64>,
    position: usize,
}

enum Poll {
    Ready(EntryRef),
    Ended,
    Pending,
}

impl MemSubscription {
    fn poll_state(&mut self) -> Poll {
        let state = read_lock(&self.state);
        if self.position < state.first {
            debug!(
                "subscriber fell behind, skipping from {} to {}",
                self.position, state.first
            );
            self.position = state.first;
        }
        if let Some(item) = state.items.get(self.position - state.first) {
            self.position += 1;
            Poll::Ready(item.clone())
        } else if state.closed {
            Poll::Ended
        } else {
            Poll::Pending
        }
    }
}

#[async_trait]
impl Subscription for MemSubscription {
    async fn next(&mut self) -> Option<EntryRef> {
        loop {
            // Mark the current version seen before looking, so an append
            // racing with the check still wakes the wait below.
            self.version_rx.borrow_and_update();
            match self.poll_state() {
                Poll::Ready(item) => return Some(item),
                Poll::Ended => return None,
                Poll::Pending => {}
            }
            if self.version_rx.changed().await.is_err() {
                // The log itself is gone; nothing more can ever arrive.
                return match self.poll_state() {
                    Poll::Ready(item) => Some(item),
                    Poll::Ended | Poll::Pending => None,
                };
            }
        }
    }

    fn try_next(&mut self) -> Option<EntryRef> {
        match self.poll_state() {
            Poll::Ready(item) => Some(item),
            Poll::Ended | Poll::Pending => None,
        }
    }

    fn position(&self) -> usize {
        self.position
    }
}
