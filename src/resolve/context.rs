use std::fmt;

use crate::namespace::Namespace;
use crate::prelude::*;

/// A stateless view of the namespace.
///
/// Every call starts a fresh [`Handle`] at the root and walks the whole
/// path, so a `Context` carries no position and can be shared freely
/// between tasks. It is the call context handed to Functions and Shapes.
/// Relative paths are resolved from the root.
#[derive(Clone)]
pub struct Context {
    ns: Namespace,
}

impl Context {
    pub(crate) fn new(ns: Namespace) -> Self {
        Self { ns }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.ns
    }

    /// A fresh cursor at the root, for callers that want to walk stepwise.
    pub fn handle(&self) -> Handle {
        self.ns.new_handle()
    }

    fn walked(&self, path: &str) -> Option<Handle> {
        let mut handle = self.handle();
        handle.walk(path).then_some(handle)
    }

    pub fn get(&self, path: &str) -> Option<EntryRef> {
        self.handle().lookup(path)
    }

    /// Binds `entry` at `path`, or removes whatever is there when `entry` is
    /// `None`. See [`Handle::put`].
    pub fn put(&self, path: &str, entry: Option<EntryRef>) -> bool {
        self.handle().put(path, entry)
    }

    pub fn get_folder(&self, path: &str) -> Option<Arc<dyn Folder>> {
        self.walked(path)?.get_folder()
    }
    pub fn get_function(&self, path: &str) -> Option<Arc<dyn Function>> {
        self.walked(path)?.get_function()
    }
    pub fn get_string(&self, path: &str) -> Option<Arc<dyn StringEntry>> {
        self.walked(path)?.get_string()
    }
    pub fn get_file(&self, path: &str) -> Option<Arc<dyn File>> {
        self.walked(path)?.get_file()
    }
    pub fn get_list(&self, path: &str) -> Option<Arc<dyn List>> {
        self.walked(path)?.get_list()
    }
    pub fn get_queue(&self, path: &str) -> Option<Arc<dyn Queue>> {
        self.walked(path)?.get_queue()
    }
    pub fn get_log(&self, path: &str) -> Option<Arc<dyn Log>> {
        self.walked(path)?.get_log()
    }
    pub fn get_link(&self, path: &str) -> Option<Arc<dyn Link>> {
        self.walked(path)?.get_link()
    }
    pub fn get_shape(&self, path: &str) -> Option<Arc<dyn Shape>> {
        self.walked(path)?.get_shape()
    }

    /// Resolves a Function at `path` and invokes it with this context.
    /// `None` covers both a missing Function and a Function with no output.
    pub async fn invoke(&self, path: &str, input: Option<EntryRef>) -> Option<EntryRef> {
        let Some(function) = self.get_function(path) else {
            debug!("nothing invocable at {path}");
            return None;
        };
        function.invoke(self, input).await
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("base_uri", &self.ns.base_uri())
            .finish()
    }
}
