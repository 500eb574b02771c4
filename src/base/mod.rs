pub mod entry;
pub mod spec;
