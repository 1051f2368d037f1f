pub mod handlers;

use crate::common::state::AppState;
use crate::models::events::{ALL_CHANNELS, RelationshipEvent};
use crate::settings::AppSettings;
use std::convert::Infallible;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

fn spawn_handler(state: &AppState, event: RelationshipEvent) {
    let task_state = state.clone();
    tokio::spawn(async move {
        let ctx = task_state;
        let channel = event.channel();
        if let Err(e) = handlers::dispatch(&ctx, event).await {
            error!(
                channel,
                code = e.code(),
                "Failed to handle relationship event: {}",
                e.message()
            );
        }
    });
}

/// Consumes events published to redis by the api processes.
// TODO: change return type to anyhow::Result<!> when its stabilized
pub async fn serve(settings: &AppSettings, state: AppState) -> anyhow::Result<Infallible> {
    let redis_url = settings
        .redis_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("REDIS_URL must be set for the notification consumer"))?;
    let redis_client = redis::Client::open(redis_url)?;
    let mut redis_conn = redis_client.get_connection()?;
    let mut pubsub = redis_conn.as_pubsub();
    for channel in ALL_CHANNELS {
        pubsub.subscribe(channel)?;
    }
    info!(channels = ALL_CHANNELS.len(), "Subscribed to relationship events");

    loop {
        let msg = pubsub.get_message()?;
        let event: RelationshipEvent = match msg.get_payload() {
            Ok(event) => event,
            Err(e) => {
                warn!(
                    channel = msg.get_channel_name(),
                    "Discarding undecodable relationship event: {e}"
                );
                continue;
            }
        };
        spawn_handler(&state, event);
    }
}

/// Consumes events from the in-process channel until every publisher is gone.
pub async fn consume_local(state: AppState, mut receiver: broadcast::Receiver<RelationshipEvent>) {
    info!("Consuming relationship events in-process");
    loop {
        match receiver.recv().await {
            Ok(event) => spawn_handler(&state, event),
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Notification consumer lagged, events were dropped");
            }
            Err(RecvError::Closed) => break,
        }
    }
    info!("Relationship event channel closed");
}
