use crate::common::context::Context;
use crate::models::events::RelationshipEvent;
use async_trait::async_trait;
use tracing::{debug, warn};

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &RelationshipEvent) -> anyhow::Result<()>;
}

/// Publishes after commit. Failures are logged and never reach the caller,
/// since the relationship change has already been committed.
pub async fn publish<C: Context>(ctx: &C, event: RelationshipEvent) {
    match ctx.events().publish(&event).await {
        Ok(()) => debug!(channel = event.channel(), "Published relationship event"),
        Err(e) => warn!(
            channel = event.channel(),
            ?event,
            "Failed to publish relationship event: {e:?}"
        ),
    }
}
