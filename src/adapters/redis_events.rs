use crate::common::events::EventPublisher;
use crate::common::redis_pool::RedisPool;
use crate::models::events::RelationshipEvent;
use async_trait::async_trait;
use redis::AsyncCommands;
use std::ops::DerefMut;

/// Publishes events on their `relationships:*` pubsub channel.
pub struct RedisPublisher {
    pool: RedisPool,
}

impl RedisPublisher {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventPublisher for RedisPublisher {
    async fn publish(&self, event: &RelationshipEvent) -> anyhow::Result<()> {
        let mut redis = self.pool.get().await?;
        let _: i64 = redis.deref_mut().publish(event.channel(), event).await?;
        Ok(())
    }
}
