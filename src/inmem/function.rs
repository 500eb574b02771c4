use futures::future::BoxFuture;

use crate::prelude::*;

type SyncImpl = dyn Fn(&Context, Option<EntryRef>) -> Option<EntryRef> + Send + Sync;
type AsyncImpl =
    dyn Fn(Context, Option<EntryRef>) -> BoxFuture<'static, Option<EntryRef>> + Send + Sync;

enum FunctionImpl {
    Sync(Box<SyncImpl>),
    Async(Box<AsyncImpl>),
}

/// In-memory Function entry. Brings no logic of its own: the caller supplies
/// the implementation as a closure.
pub struct MemFunction {
    name: String,
    imp: FunctionImpl,
}

impl MemFunction {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Context, Option<EntryRef>) -> Option<EntryRef> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            imp: FunctionImpl::Sync(Box::new(f)),
        }
    }

    /// Wraps an implementation that needs to await, e.g. on a Queue.
    pub fn new_async<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Context, Option<EntryRef>) -> BoxFuture<'static, Option<EntryRef>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            imp: FunctionImpl::Async(Box::new(f)),
        }
    }
}

impl Entry for MemFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn into_function(self: Arc<Self>) -> Option<Arc<dyn Function>> {
        Some(self)
    }
}

#[async_trait]
impl Function for MemFunction {
    async fn invoke(&self, ctx: &Context, input: Option<EntryRef>) -> Option<EntryRef> {
        match &self.imp {
            FunctionImpl::Sync(f) => f(ctx, input),
            FunctionImpl::Async(f) => f(ctx.clone(), input).await,
        }
    }
}
