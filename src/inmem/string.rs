use std::sync::atomic::{AtomicBool, Ordering};

use crate::prelude::*;

/// In-memory String entry. Writable until frozen.
pub struct MemString {
    name: String,
    frozen: AtomicBool,
    value: RwLock<String>,
}

impl MemString {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frozen: AtomicBool::new(false),
            value: RwLock::new(value.into()),
        }
    }

    pub fn frozen(self) -> Self {
        self.freeze();
        self
    }

    pub fn freeze(&self) {
        let _value = write_lock(&self.value);
        self.frozen.store(true, Ordering::Release);
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::Acquire)
    }
}

impl Entry for MemString {
    fn name(&self) -> &str {
        &self.name
    }

    fn into_string(self: Arc<Self>) -> Option<Arc<dyn StringEntry>> {
        Some(self)
    }
}

impl StringEntry for MemString {
    fn get(&self) -> String {
        read_lock(&self.value).clone()
    }

    fn set(&self, value: &str) -> bool {
        let mut current = write_lock(&self.value);
        if self.is_frozen() {
            return false;
        }
        *current = value.to_string();
        true
    }
}
