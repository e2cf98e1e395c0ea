//! In-memory adapters for task lifecycle ports.

mod messages;
mod task;

pub use messages::InMemoryMessageRepository;
pub use task::InMemoryTaskRepository;
