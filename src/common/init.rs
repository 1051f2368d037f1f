use crate::adapters::local_events::LocalPublisher;
use crate::adapters::memory_store::MemoryStore;
use crate::adapters::redis_events::RedisPublisher;
use crate::adapters::redis_store::RedisStore;
use crate::common::redis_pool::{RedisPool, RedisPoolManager};
use crate::common::state::AppState;
use crate::settings::{AppSettings, StoreBackend};
use crate::usecases::transactions::RetryPolicy;
use deadpool::Runtime;
use redis::{AsyncConnectionConfig, Commands};
use std::sync::Arc;
use tracing::info;

pub fn initialize_logging(settings: &AppSettings) {
    tracing_subscriber::fmt()
        .with_max_level(settings.level)
        // .json()
        .with_timer(tracing_subscriber::fmt::time())
        .with_level(true)
        .compact()
        .init();
}

pub fn retry_policy(settings: &AppSettings) -> RetryPolicy {
    RetryPolicy {
        max_attempts: settings.transaction_max_attempts,
        base_backoff: settings.transaction_backoff,
    }
}

/// Builds the state for the configured backend. With the memory backend the
/// returned publisher is the in-process channel consumers can subscribe to.
pub fn initialize_state(
    settings: &AppSettings,
) -> anyhow::Result<(AppState, Option<Arc<LocalPublisher>>)> {
    let retry_policy = retry_policy(settings);
    match settings.store_backend {
        StoreBackend::Memory => {
            info!("Using in-memory document store");
            let publisher = Arc::new(LocalPublisher::new(settings.event_buffer_size));
            let state = AppState {
                store: Arc::new(MemoryStore::new()),
                events: publisher.clone(),
                retry_policy,
            };
            Ok((state, Some(publisher)))
        }
        StoreBackend::Redis => {
            info!("Using redis document store");
            let redis = initialize_redis(settings)?;
            let state = AppState {
                store: Arc::new(RedisStore::new(redis.clone())),
                events: Arc::new(RedisPublisher::new(redis)),
                retry_policy,
            };
            Ok((state, None))
        }
    }
}

pub fn initialize_redis(settings: &AppSettings) -> anyhow::Result<RedisPool> {
    let redis_url = settings
        .redis_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("REDIS_URL must be set for the redis store backend"))?;
    let redis_client = redis::Client::open(redis_url)?;
    let mut conn = redis_client.get_connection_with_timeout(settings.redis_wait_timeout)?;
    let _: () = conn.ping()?;
    let redis_cfg = AsyncConnectionConfig::new()
        .set_connection_timeout(settings.redis_connection_timeout)
        .set_response_timeout(settings.redis_response_timeout);

    let redis_manager = RedisPoolManager::new(redis_client, redis_cfg);
    let redis = RedisPool::builder(redis_manager)
        .max_size(settings.redis_max_connections)
        .wait_timeout(Some(settings.redis_wait_timeout))
        .runtime(Runtime::Tokio1)
        .build()?;
    Ok(redis)
}
