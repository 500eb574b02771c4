pub mod folder;
pub(crate) mod sync;
