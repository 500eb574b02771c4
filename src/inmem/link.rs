use crate::prelude::*;

/// In-memory symbolic link. The target is stored verbatim and never checked
/// here.
pub struct MemLink {
    name: String,
    target: String,
}

impl MemLink {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
        }
    }
}

impl Entry for MemLink {
    fn name(&self) -> &str {
        &self.name
    }

    fn into_link(self: Arc<Self>) -> Option<Arc<dyn Link>> {
        Some(self)
    }
}

impl Link for MemLink {
    fn target(&self) -> String {
        self.target.clone()
    }
}
