use relationship_service::api;
use relationship_service::common::init;
use relationship_service::settings::{AppSettings, StoreBackend};
use relationship_service::workers::daemons::notification_consumer;
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = AppSettings::get();
    init::initialize_logging(&settings);
    let (state, local_events) = init::initialize_state(&settings)?;
    match settings.app_component.as_str() {
        "api" => api::serve(settings, state).await,
        "notification-consumer" => {
            if settings.store_backend == StoreBackend::Memory {
                anyhow::bail!("The notification consumer requires STORE_BACKEND=redis");
            }
            match notification_consumer::serve(settings, state).await? {}
        }
        "standalone" => {
            if let Some(local_events) = local_events {
                let receiver = local_events.subscribe();
                tokio::spawn(notification_consumer::consume_local(state.clone(), receiver));
            } else {
                warn!("Standalone mode only consumes events with STORE_BACKEND=memory");
            }
            api::serve(settings, state).await
        }
        other => anyhow::bail!("Unknown app component: {other}"),
    }
}
