//! Path resolution across heterogeneous entries.

mod context;
mod handle;

pub use context::Context;
pub use handle::Handle;
