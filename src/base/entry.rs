use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::resolve::Context;

/// Shared reference to any node in the namespace.
///
/// An absent entry is spelled `Option<EntryRef>::None` everywhere.
pub type EntryRef = Arc<dyn Entry>;

/// The universal node. Has exactly one immutable name and zero or more
/// capability sets.
///
/// Capabilities are probed with the `into_*` methods, which return `None`
/// when the entry doesn't implement the requested set. Probing takes an
/// `Arc` so the typed handle shares ownership with the entry; callers holding
/// an [`EntryRef`] clone it first (`entry.clone().into_folder()`).
pub trait Entry: Send + Sync {
    fn name(&self) -> &str;

    fn into_folder(self: Arc<Self>) -> Option<Arc<dyn Folder>> {
        None
    }
    fn into_function(self: Arc<Self>) -> Option<Arc<dyn Function>> {
        None
    }
    fn into_string(self: Arc<Self>) -> Option<Arc<dyn StringEntry>> {
        None
    }
    fn into_file(self: Arc<Self>) -> Option<Arc<dyn File>> {
        None
    }
    fn into_list(self: Arc<Self>) -> Option<Arc<dyn List>> {
        None
    }
    fn into_queue(self: Arc<Self>) -> Option<Arc<dyn Queue>> {
        None
    }
    fn into_log(self: Arc<Self>) -> Option<Arc<dyn Log>> {
        None
    }
    fn into_link(self: Arc<Self>) -> Option<Arc<dyn Link>> {
        None
    }
    fn into_shape(self: Arc<Self>) -> Option<Arc<dyn Shape>> {
        None
    }
}

/// A node with named, enumerable children.
pub trait Folder: Entry {
    /// Child names. Order carries no meaning.
    fn children(&self) -> Vec<String>;

    fn fetch(&self, name: &str) -> Option<EntryRef>;

    /// Binds `entry` under `name`, or removes the child when `entry` is `None`.
    /// Returns `false` when the folder refuses the write (frozen, or the
    /// backend rejects it); visible state is then unchanged.
    fn put(&self, name: &str, entry: Option<EntryRef>) -> bool;
}

/// A node that maps an input entry to an output entry.
#[async_trait]
pub trait Function: Entry {
    async fn invoke(&self, ctx: &Context, input: Option<EntryRef>) -> Option<EntryRef>;
}

/// A node holding a single atomic string value.
pub trait StringEntry: Entry {
    fn get(&self) -> String;
    fn set(&self, value: &str) -> bool;
}

/// A node holding a known-size buffer of bytes.
pub trait File: Entry {
    fn size(&self) -> u64;

    /// Reads up to `len` bytes at `offset`. Past the end of the buffer the
    /// read is short, possibly empty.
    fn read(&self, offset: u64, len: usize) -> Vec<u8>;

    fn write(&self, offset: u64, data: &[u8]) -> usize;
    fn truncate(&self) -> bool;
}

/// A node with ordered children.
pub trait List: Entry {
    fn items(&self) -> Vec<EntryRef>;
}

/// A FIFO pipe of foreign entries.
#[async_trait]
pub trait Queue: Entry {
    /// Returns `false` once the queue is closed.
    fn push(&self, value: EntryRef) -> bool;

    /// Waits for the next value. Returns `None` once the queue is closed and
    /// every previously pushed value has been delivered.
    async fn next(&self) -> Option<EntryRef>;

    /// Returns the next value only if one is already waiting.
    fn try_next(&self) -> Option<EntryRef>;

    fn close(&self);
    fn is_closed(&self) -> bool;
}

/// An append-only sequence broadcast to any number of subscribers.
pub trait Log: Entry {
    /// Returns `false` once the log is closed.
    fn append(&self, value: EntryRef) -> bool;

    /// Opens an independent cursor yielding every entry from position `from`
    /// onward.
    fn subscribe(&self, from: usize) -> Box<dyn Subscription>;

    fn close(&self);
    fn is_closed(&self) -> bool;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single subscriber's position in a [`Log`].
#[async_trait]
pub trait Subscription: Send + Sync {
    /// Waits for the next appended value. Returns `None` once the log is
    /// closed and this subscriber has drained it.
    async fn next(&mut self) -> Option<EntryRef>;

    fn try_next(&mut self) -> Option<EntryRef>;

    /// Index of the next value this subscriber will observe.
    fn position(&self) -> usize;
}

/// A symbolic pointer to another path. The target is an opaque string until
/// something resolves it.
pub trait Link: Entry {
    fn target(&self) -> String;
}

/// A compiled structural contract.
pub trait Shape: Entry {
    /// Never fails loudly: a mismatch of any kind is `false`.
    fn check(&self, ctx: &Context, candidate: Option<&EntryRef>) -> bool;
}

/// Names of every capability set `entry` implements, in a fixed order.
pub fn capability_names(entry: &EntryRef) -> Vec<&'static str> {
    let mut names = Vec::new();
    if entry.clone().into_folder().is_some() {
        names.push("Folder");
    }
    if entry.clone().into_function().is_some() {
        names.push("Function");
    }
    if entry.clone().into_string().is_some() {
        names.push("String");
    }
    if entry.clone().into_file().is_some() {
        names.push("File");
    }
    if entry.clone().into_list().is_some() {
        names.push("List");
    }
    if entry.clone().into_queue().is_some() {
        names.push("Queue");
    }
    if entry.clone().into_log().is_some() {
        names.push("Log");
    }
    if entry.clone().into_link().is_some() {
        names.push("Link");
    }
    if entry.clone().into_shape().is_some() {
        names.push("Shape");
    }
    names
}

/// Renders an optional entry for diagnostics, e.g. `greeting [String]`.
pub struct Describe<'a>(pub Option<&'a EntryRef>);

impl fmt::Display for Describe<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => write!(f, "<absent>"),
            Some(entry) => write!(
                f,
                "{} [{}]",
                entry.name(),
                capability_names(entry).join(", ")
            ),
        }
    }
}
