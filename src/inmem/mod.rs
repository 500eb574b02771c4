//! Reference in-memory implementations of the capability sets.

mod file;
mod folder;
mod function;
mod link;
mod list;
mod string;

pub use file::MemFile;
pub use folder::MemFolder;
pub use function::MemFunction;
pub use link::MemLink;
pub use list::MemList;
pub use string::MemString;
