//! Streaming node kinds: FIFO queues and append-broadcast logs.

mod log;
mod queue;

pub use self::log::MemLog;
pub use self::queue::MemQueue;
