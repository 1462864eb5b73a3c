pub mod memory;
pub mod ops;
pub mod store;
pub mod worker;

pub use memory::MemoryStore;
pub use store::{BookmarkStore, StoreResult};
pub use worker::{spawn_worker, CommandQueue, Reply, Request};
