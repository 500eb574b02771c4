use crate::prelude::*;

/// In-memory ordered sequence of entries, fixed at construction.
pub struct MemList {
    name: String,
    items: Vec<EntryRef>,
}

impl MemList {
    pub fn new(name: impl Into<String>, items: impl IntoIterator<Item = EntryRef>) -> Self {
        Self {
            name: name.into(),
            items: items.into_iter().collect(),
        }
    }
}

impl Entry for MemList {
    fn name(&self) -> &str {
        &self.name
    }

    fn into_list(self: Arc<Self>) -> Option<Arc<dyn List>> {
        Some(self)
    }
}

impl List for MemList {
    fn items(&self) -> Vec<EntryRef> {
        self.items.clone()
    }
}
