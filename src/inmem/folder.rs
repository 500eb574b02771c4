use std::sync::atomic::{AtomicBool, Ordering};

use crate::prelude::*;

/// In-memory directory of named children.
///
/// Writable on construction. Freezing burns the writable fuse: from then on
/// every `put` is refused and the child set is fixed forever.
pub struct MemFolder {
    name: String,
    frozen: AtomicBool,
    children: RwLock<IndexMap<String, EntryRef>>,
}

impl MemFolder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frozen: AtomicBool::new(false),
            children: RwLock::new(IndexMap::new()),
        }
    }

    /// Builds a writable folder pre-populated with `children`, each bound
    /// under its own name. A later child replaces an earlier one of the same
    /// name.
    pub fn new_of(name: impl Into<String>, children: impl IntoIterator<Item = EntryRef>) -> Self {
        let children = children
            .into_iter()
            .map(|child| (child.name().to_string(), child))
            .collect();
        Self {
            name: name.into(),
            frozen: AtomicBool::new(false),
            children: RwLock::new(children),
        }
    }

    /// Chainable freeze for construction sites: `MemFolder::new_of(..).frozen()`.
    pub fn frozen(self) -> Self {
        self.freeze();
        self
    }

    pub fn freeze(&self) {
        // Taken under the write lock so an in-flight put lands entirely
        // before the fuse burns.
        let _children = write_lock(&self.children);
        self.frozen.store(true, Ordering::Release);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }
}

impl Entry for MemFolder {
    fn name(&self) -> &str {
        &self.name
    }

    fn into_folder(self: Arc<Self>) -> Option<Arc<dyn Folder>> {
        Some(self)
    }
}

impl Folder for MemFolder {
    fn children(&self) -> Vec<String> {
        read_lock(&self.children).keys().cloned().collect()
    }

    fn fetch(&self, name: &str) -> Option<EntryRef> {
        read_lock(&self.children).get(name).cloned()
    }

    fn put(&self, name: &str, entry: Option<EntryRef>) -> bool {
        let mut children = write_lock(&self.children);
        if self.is_frozen() {
            return false;
        }
        match entry {
            Some(entry) => {
                children.insert(name.to_string(), entry);
            }
            None => {
                children.shift_remove(name);
            }
        }
        true
    }
}
