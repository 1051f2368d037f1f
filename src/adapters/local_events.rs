use crate::common::events::EventPublisher;
use crate::models::events::RelationshipEvent;
use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::trace;

/// In-process publisher backed by a broadcast channel.
pub struct LocalPublisher {
    sender: broadcast::Sender<RelationshipEvent>,
}

impl LocalPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RelationshipEvent> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl EventPublisher for LocalPublisher {
    async fn publish(&self, event: &RelationshipEvent) -> anyhow::Result<()> {
        if self.sender.send(event.clone()).is_err() {
            trace!(channel = event.channel(), "No local subscribers for event");
        }
        Ok(())
    }
}
