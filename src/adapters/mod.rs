pub mod local_events;
pub mod memory_store;
pub mod redis_events;
pub mod redis_store;
