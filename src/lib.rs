//! A path-addressable object space whose nodes can be backed by arbitrary
//! storage or service technologies.
//!
//! Every node is an [`Entry`] implementing zero or more capability sets
//! (Folder, Function, String, File, List, Queue, Log, Link, Shape). A
//! [`Namespace`] owns the root entry and hands out [`Handle`] cursors and
//! stateless [`Context`]s which resolve `/`-delimited paths across whatever
//! backends happen to answer at each step.

mod prelude;

pub mod base;
pub mod inmem;
pub mod namespace;
pub mod resolve;
pub mod settings;
pub mod shape;
pub mod streams;
pub mod utils;

pub use base::entry::{
    Describe, Entry, EntryRef, File, Folder, Function, Link, List, Log, Queue, Shape,
    StringEntry, Subscription, capability_names,
};
pub use base::spec::ShapeSpec;
pub use namespace::Namespace;
pub use resolve::{Context, Handle};
pub use settings::{Settings, init_logging};
pub use shape::CompiledShape;
