use std::fmt;

use crate::namespace::Namespace;
use crate::prelude::*;
use crate::utils::folder::split_path;

/// A stateful cursor into the namespace. Remembers how it got where it is.
///
/// `stack` and `names` always have the same length and never drop below the
/// root entry at index 0. Cloning copies both stacks, so a clone can walk
/// speculatively without disturbing its source.
#[derive(Clone)]
pub struct Handle {
    base_uri: Arc<str>,
    stack: Vec<EntryRef>,
    names: Vec<String>,
}

impl Handle {
    pub(crate) fn new_root(ns: &Namespace) -> Self {
        Self {
            base_uri: ns.base_uri_shared(),
            stack: vec![ns.root().clone()],
            names: vec![String::new()],
        }
    }

    /// The entry at the top of the stack.
    pub fn get(&self) -> &EntryRef {
        // The root is never popped, so the stack is never empty.
        &self.stack[self.stack.len() - 1]
    }

    pub fn stack(&self) -> &[EntryRef] {
        &self.stack
    }

    /// Names used to reach each stack level; index 0 is the root's.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of levels below the root.
    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// Absolute path of the current position, e.g. `/n/test`.
    pub fn path(&self) -> String {
        format!("/{}", self.names[1..].join("/"))
    }

    /// The current path prefixed with the namespace's base URI.
    pub fn uri(&self) -> String {
        format!("{}{}", self.base_uri, self.path())
    }

    pub fn get_folder(&self) -> Option<Arc<dyn Folder>> {
        self.get().clone().into_folder()
    }
    pub fn get_function(&self) -> Option<Arc<dyn Function>> {
        self.get().clone().into_function()
    }
    pub fn get_string(&self) -> Option<Arc<dyn StringEntry>> {
        self.get().clone().into_string()
    }
    pub fn get_file(&self) -> Option<Arc<dyn File>> {
        self.get().clone().into_file()
    }
    pub fn get_list(&self) -> Option<Arc<dyn List>> {
        self.get().clone().into_list()
    }
    pub fn get_queue(&self) -> Option<Arc<dyn Queue>> {
        self.get().clone().into_queue()
    }
    pub fn get_log(&self) -> Option<Arc<dyn Log>> {
        self.get().clone().into_log()
    }
    pub fn get_link(&self) -> Option<Arc<dyn Link>> {
        self.get().clone().into_link()
    }
    pub fn get_shape(&self) -> Option<Arc<dyn Shape>> {
        self.get().clone().into_shape()
    }

    /// Resolves a single path segment.
    ///
    /// `.` stays put, `..` pops one level (a no-op at the root), `/` returns
    /// to the root, and any other name is fetched from the current entry,
    /// which must be a Folder.
    pub fn select_name(&mut self, name: &str) -> bool {
        match name {
            "." => true,
            ".." => {
                if self.stack.len() > 1 {
                    self.stack.pop();
                    self.names.pop();
                }
                true
            }
            "/" => {
                self.stack.truncate(1);
                self.names.truncate(1);
                true
            }
            _ => {
                let Some(folder) = self.get_folder() else {
                    debug!(
                        "cannot select {} from non-Folder entry at {}",
                        name,
                        self.path()
                    );
                    return false;
                };
                match folder.fetch(name) {
                    Some(child) => {
                        self.stack.push(child);
                        self.names.push(name.to_string());
                        true
                    }
                    None => {
                        debug!("failed to select {} from {}", name, self.path());
                        false
                    }
                }
            }
        }
    }

    /// Resolves a `/`-delimited path one segment at a time.
    ///
    /// A leading `/` starts from the root. Resolution stops at the first
    /// failing segment and leaves the cursor wherever that left it; clone
    /// first when the original position matters.
    pub fn walk(&mut self, path: &str) -> bool {
        if let Some(rest) = path.strip_prefix('/') {
            self.select_name("/");
            if rest.is_empty() {
                return true;
            }
            return self.walk(rest);
        }
        path.split('/').all(|name| self.select_name(name))
    }

    /// Resolves `path` from the current position on a copy of this cursor.
    pub fn lookup(&self, path: &str) -> Option<EntryRef> {
        let mut cursor = self.clone();
        cursor.walk(path).then(|| cursor.get().clone())
    }

    /// Binds `entry` at `path` relative to the current position, or removes
    /// whatever is there when `entry` is `None`. Walks to the parent and
    /// delegates to its `put`, so mounting a foreign subtree is just a put of
    /// its root. The cursor itself doesn't move.
    pub fn put(&self, path: &str, entry: Option<EntryRef>) -> bool {
        let (dir, base) = split_path(path);
        if matches!(base, "" | "." | "..") {
            debug!("refusing put to {path}: no final name");
            return false;
        }
        let mut parent = self.clone();
        if !parent.walk(dir) {
            debug!("refusing put to {path}: {dir} not found");
            return false;
        }
        let Some(folder) = parent.get_folder() else {
            debug!("refusing put to {path}: {dir} is not a Folder");
            return false;
        };
        let mounting = entry.is_some();
        let ok = folder.put(base, entry);
        if !ok {
            debug!("{} rejected put of {}", parent.path(), base);
        } else if mounting {
            debug!("bound {} under {}", base, parent.path());
        } else {
            debug!("unbound {} from {}", base, parent.path());
        }
        ok
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle").field("uri", &self.uri()).finish()
    }
}
