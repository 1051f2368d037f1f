pub mod axum_extract;
pub mod context;
pub mod env;
pub mod error;
pub mod events;
pub mod init;
pub mod pair_keys;
pub mod redis_pool;
pub mod state;
pub mod store;
