use crate::prelude::*;

/// In-memory byte buffer.
///
/// Only reads are implemented: `write` reports zero bytes written and
/// `truncate` reports failure, so generic callers see a read-only File.
pub struct MemFile {
    name: String,
    frozen: bool,
    data: Vec<u8>,
}

impl MemFile {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            frozen: false,
            data: data.into(),
        }
    }

    /// Prevents the bytes from ever changing. Chainable.
    pub fn frozen(mut self) -> Self {
        self.frozen = true;
        self
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn refuse(&self, op: &str) {
        if self.frozen {
            debug!("refusing {} on frozen file {}", op, self.name);
        } else {
            debug!("{} is not supported on in-memory file {}", op, self.name);
        }
    }
}

impl Entry for MemFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn into_file(self: Arc<Self>) -> Option<Arc<dyn File>> {
        Some(self)
    }
}

impl File for MemFile {
    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn read(&self, offset: u64, len: usize) -> Vec<u8> {
        let Ok(start) = usize::try_from(offset) else {
            return Vec::new();
        };
        if start >= self.data.len() {
            trace!("read of {} past end at offset {}", self.name, offset);
            return Vec::new();
        }
        let end = start.saturating_add(len).min(self.data.len());
        self.data[start..end].to_vec()
    }

    // TODO: in-place writes once MemFile holds its buffer behind a lock.
    fn write(&self, _offset: u64, _data: &[u8]) -> usize {
        self.refuse("write");
        0
    }

    fn truncate(&self) -> bool {
        self.refuse("truncate");
        false
    }
}
